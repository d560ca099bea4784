use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::data::grouping::{shuffled, RankedVideo};

/// Which of the two displayed videos was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One recorded comparison, keyed by video identifiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub left: String,
    pub right: String,
    pub chosen: String,
    pub recorded_at: DateTime<Utc>,
}

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStatus {
    /// Two videos are on screen.
    Comparing,
    /// The pool ran dry after at least one pair.
    Finished,
    /// Fewer than two videos were available to begin with.
    NotEnoughVideos,
}

/// Shows videos two at a time from a shuffled pool and logs each pick.
#[derive(Debug, Clone)]
pub struct PairwiseSession {
    items: Vec<RankedVideo>,
    pool: Vec<RankedVideo>,
    pair: Option<(RankedVideo, RankedVideo)>,
    results: Vec<Choice>,
    status: PairStatus,
}

impl PairwiseSession {
    pub fn new<R: Rng + ?Sized>(items: Vec<RankedVideo>, rng: &mut R) -> Self {
        let mut session = Self {
            items,
            pool: Vec::new(),
            pair: None,
            results: Vec::new(),
            status: PairStatus::NotEnoughVideos,
        };
        session.restart(rng);
        session
    }

    /// Reshuffle everything and clear recorded results.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pool = shuffled(&self.items, rng);
        self.results.clear();
        self.pair = None;
        self.status = if self.pool.len() >= 2 {
            PairStatus::Comparing
        } else {
            PairStatus::NotEnoughVideos
        };
        self.advance();
    }

    fn advance(&mut self) {
        if self.pool.len() >= 2 {
            let left = self.pool.remove(0);
            let right = self.pool.remove(0);
            self.pair = Some((left, right));
        } else {
            self.pool.clear();
            self.pair = None;
            if self.status == PairStatus::Comparing {
                self.status = PairStatus::Finished;
            }
        }
    }

    /// Record a pick for the current pair and move on. Ignored when no pair
    /// is showing.
    pub fn choose(&mut self, side: Side) -> Option<&Choice> {
        let (left, right) = self.pair.take()?;
        let chosen = match side {
            Side::Left => &left,
            Side::Right => &right,
        };
        self.results.push(Choice {
            left: left.record.identifier.clone(),
            right: right.record.identifier.clone(),
            chosen: chosen.record.identifier.clone(),
            recorded_at: Utc::now(),
        });
        self.advance();
        self.results.last()
    }

    pub fn pair(&self) -> Option<(&RankedVideo, &RankedVideo)> {
        self.pair.as_ref().map(|(l, r)| (l, r))
    }

    pub fn results(&self) -> &[Choice] {
        &self.results
    }

    pub fn status(&self) -> PairStatus {
        self.status
    }

    /// Pretty-printed JSON of the recorded choices.
    pub fn results_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.results)
    }
}
