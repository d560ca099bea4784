use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::grouping::{self, GroupingConfig, OrderCheck, RankedVideo};
use crate::data::loader;
use crate::data::model::Dataset;
use crate::email::{self, EmailForm, EmailTransport};
use crate::error::LoadError;
use crate::export;
use crate::pairwise::{PairwiseSession, Side};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Load lifecycle of the metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    /// Terminal until another file is opened.
    Failed(String),
}

/// Which slice of the ranked selection is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// One representative per group.
    Full,
    /// A random subset of `experiment_size` representatives.
    Experiment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Sort,
    Pairwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Email modal contents.
#[derive(Debug, Clone, Default)]
pub struct EmailDialog {
    pub open: bool,
    pub form: EmailForm,
    /// Inline failure from the last attempt.
    pub error: Option<String>,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,
    pub grouping: GroupingConfig,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<Dataset>,
    pub phase: Phase,

    /// One ranked representative per group, in complexity order.
    pub ranked: Vec<RankedVideo>,
    /// Items in the participant's current order.
    pub items: Vec<RankedVideo>,

    pub mode: SessionMode,
    pub view: ViewMode,
    pub layout: Layout,
    pub message: Option<StatusMessage>,
    pub pairwise: Option<PairwiseSession>,
    pub email: EmailDialog,

    /// Identifiers whose parameter details are expanded.
    pub expanded: BTreeSet<String>,
    /// Colours by complexity rank.
    pub color_map: Option<ColorMap>,

    rng: StdRng,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Build with an explicit random source.
    ///
    /// An invalid grouping in `config` falls back to the default grouping.
    pub fn with_rng(config: AppConfig, rng: StdRng) -> Self {
        let grouping = config.grouping().unwrap_or_else(|e| {
            log::warn!("{e}; using default grouping");
            GroupingConfig::default()
        });
        Self {
            config,
            grouping,
            dataset: None,
            phase: Phase::Loading,
            ranked: Vec::new(),
            items: Vec::new(),
            mode: SessionMode::Full,
            view: ViewMode::Sort,
            layout: Layout::Vertical,
            message: None,
            pairwise: None,
            email: EmailDialog::default(),
            expanded: BTreeSet::new(),
            color_map: None,
            rng,
        }
    }

    // -- Loading --

    /// Load a metadata file, replacing any current dataset.
    pub fn load_path(&mut self, path: &Path) {
        self.phase = Phase::Loading;
        match loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} videos with parameters {:?}",
                    dataset.len(),
                    dataset.param_names
                );
                self.set_dataset(dataset);
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn fail(&mut self, error: LoadError) {
        log::error!("Failed to load video metadata: {error}");
        self.dataset = None;
        self.ranked.clear();
        self.items.clear();
        self.pairwise = None;
        self.phase = Phase::Failed(error.to_string());
    }

    /// Ingest a newly loaded dataset: group, rank and show everything shuffled.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.ranked = grouping::ranked_selection(&dataset.records, &self.grouping, &mut self.rng);
        if self.ranked.is_empty() {
            self.fail(LoadError::NoGroupableVideos {
                params: self.grouping.params().join(", "),
            });
            return;
        }
        log::info!(
            "{} complexity groups from {} videos",
            self.ranked.len(),
            dataset.len()
        );
        self.color_map = Some(ColorMap::new(self.ranked.len()));
        self.items = grouping::shuffled(&self.ranked, &mut self.rng);
        self.dataset = Some(dataset);
        self.mode = SessionMode::Full;
        self.message = None;
        self.expanded.clear();
        self.pairwise = None;
        if self.view == ViewMode::Pairwise {
            self.start_pairwise();
        }
        self.phase = Phase::Ready;
    }

    // -- Session transitions --

    pub fn can_start_experiment(&self) -> bool {
        self.phase == Phase::Ready && self.ranked.len() >= self.config.experiment_size
    }

    /// Swap in a fresh random subset. Returns `false` when the ranked set is
    /// too small.
    pub fn start_experiment(&mut self) -> bool {
        if !self.can_start_experiment() {
            return false;
        }
        self.items =
            grouping::random_subset(&self.ranked, self.config.experiment_size, &mut self.rng);
        self.mode = SessionMode::Experiment;
        self.after_item_change();
        true
    }

    pub fn reset_to_full(&mut self) {
        self.items = grouping::shuffled(&self.ranked, &mut self.rng);
        self.mode = SessionMode::Full;
        self.after_item_change();
    }

    pub fn shuffle(&mut self) {
        self.items = grouping::shuffled(&self.items, &mut self.rng);
        self.message = None;
    }

    fn after_item_change(&mut self) {
        self.message = None;
        if self.view == ViewMode::Pairwise {
            self.start_pairwise();
        }
    }

    // -- Ordering --

    /// Drag-and-drop or button move; ranks are untouched.
    pub fn move_item(&mut self, from: usize, to: usize) {
        if grouping::move_item(&mut self.items, from, to) && from != to {
            self.message = None;
        }
    }

    pub fn check_order(&mut self) -> OrderCheck {
        let result = grouping::check_order(self.items.iter().map(|i| i.complexity_rank));
        self.message = Some(match result {
            OrderCheck::Sorted => StatusMessage::new(
                MessageKind::Success,
                "Success! The videos are sorted correctly from Least Complex to Most Complex.",
            ),
            OrderCheck::OutOfOrder { position } => StatusMessage::new(
                MessageKind::Error,
                format!(
                    "Incorrect order (first problem at position {}). Videos should be sorted \
                     by their underlying complexity rank, 1 to {} from top to bottom.",
                    position + 1,
                    self.items.len()
                ),
            ),
            OrderCheck::Empty => {
                StatusMessage::new(MessageKind::Error, "There are no videos to check.")
            }
        });
        result
    }

    pub fn toggle_layout(&mut self) {
        self.layout = match self.layout {
            Layout::Vertical => Layout::Horizontal,
            Layout::Horizontal => Layout::Vertical,
        };
    }

    pub fn toggle_expanded(&mut self, identifier: &str) {
        if !self.expanded.remove(identifier) {
            self.expanded.insert(identifier.to_string());
        }
    }

    // -- Pairwise mode --

    pub fn set_view(&mut self, view: ViewMode) {
        if self.view == view {
            return;
        }
        self.view = view;
        if view == ViewMode::Pairwise {
            self.start_pairwise();
        }
    }

    fn start_pairwise(&mut self) {
        self.pairwise = Some(PairwiseSession::new(self.items.clone(), &mut self.rng));
    }

    pub fn choose_pair(&mut self, side: Side) {
        if let Some(session) = self.pairwise.as_mut() {
            session.choose(side);
        }
    }

    pub fn restart_pairwise(&mut self) {
        match self.pairwise.as_mut() {
            Some(session) => session.restart(&mut self.rng),
            None => self.start_pairwise(),
        }
    }

    // -- Exports --

    pub fn export_csv(&mut self, path: &Path) -> Result<()> {
        let names = self
            .dataset
            .as_ref()
            .map(|d| d.param_names.clone())
            .unwrap_or_default();
        let result = export::save_order_csv(path, &self.items, &names);
        self.report_export(result, path)
    }

    pub fn export_xlsx(&mut self, path: &Path) -> Result<()> {
        let result = export::save_xlsx(path, &self.items);
        self.report_export(result, path)
    }

    pub fn export_pairwise(&mut self, path: &Path) -> Result<()> {
        let result = (|| -> Result<()> {
            let session = self
                .pairwise
                .as_ref()
                .context("no pairwise session to export")?;
            let json = session.results_json().context("serializing choices")?;
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
        })();
        self.report_export(result, path)
    }

    fn report_export(&mut self, result: Result<()>, path: &Path) -> Result<()> {
        self.message = Some(match &result {
            Ok(()) => StatusMessage::new(MessageKind::Info, format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                StatusMessage::new(MessageKind::Error, format!("Export failed: {e:#}"))
            }
        });
        result
    }

    // -- Email --

    pub fn email_configured(&self) -> bool {
        self.config.email.is_configured()
    }

    pub fn open_email(&mut self) {
        if !self.email_configured() {
            log::warn!("Email service is not configured; sending is disabled");
        }
        self.email.open = true;
        self.email.error = None;
    }

    pub fn close_email(&mut self) {
        self.email.open = false;
    }

    /// Send the current order. On failure the dialog stays open with the
    /// error so the participant can retry.
    pub fn submit_email(&mut self, transport: &dyn EmailTransport) -> bool {
        match email::send_order(transport, &self.config.email, &self.email.form, &self.items) {
            Ok(()) => {
                self.email = EmailDialog::default();
                self.message = Some(StatusMessage::new(
                    MessageKind::Success,
                    "Message sent successfully!",
                ));
                true
            }
            Err(e) => {
                log::error!("Failed to send email: {e}");
                self.email.error = Some(e.to_string());
                false
            }
        }
    }
}
