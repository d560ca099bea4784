use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::params::{self, CaptureTimestamp};

/// Parameter name → numeric value decoded from an identifier.
pub type ParsedParameters = BTreeMap<String, f64>;

// ---------------------------------------------------------------------------
// ParamValue – a totally ordered parameter value
// ---------------------------------------------------------------------------

/// A numeric parameter value usable as a `BTreeMap`/`BTreeSet` key.
///
/// Equality goes through `total_cmp`, so grouping is exact-match with no
/// tolerance. `-0` is folded into `0`.
#[derive(Debug, Clone, Copy)]
pub struct ParamValue(pub f64);

impl ParamValue {
    fn normalized(self) -> f64 {
        // -0.0 + 0.0 == +0.0
        self.0 + 0.0
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for ParamValue {}

impl PartialOrd for ParamValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParamValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.normalized().total_cmp(&other.normalized())
    }
}

impl std::hash::Hash for ParamValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.normalized().to_bits().hash(state);
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", params::format_value(self.normalized()))
    }
}

// ---------------------------------------------------------------------------
// VideoRecord – one entry of the metadata file
// ---------------------------------------------------------------------------

/// A single video with its decoded identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    /// Path/filename of the video; unique within a dataset.
    pub identifier: String,
    /// Short label (`VID123`) shown to participants.
    pub display_name: String,
    /// The `name` field exactly as it appeared in the source file.
    pub original_name: String,
    /// Encoded suffix after the timestamp field, without the container
    /// extension (`vis=10_maxsepturn=3`).
    pub raw_parameters: String,
    pub params: ParsedParameters,
    pub captured_at: Option<CaptureTimestamp>,
}

impl VideoRecord {
    /// Build a record from the raw `id`/`name` pair of the metadata file.
    pub fn new(id: &str, name: &str) -> Self {
        let identifier = id.strip_prefix("../public").unwrap_or(id).to_string();
        let parsed = params::parse_identifier(&identifier);
        let raw_parameters = params::strip_video_extension(params::strip_path_prefix(&identifier))
            .split_once('_')
            .map(|(_, rest)| rest.to_string())
            .unwrap_or_default();

        VideoRecord {
            display_name: display_name(name),
            original_name: name.to_string(),
            raw_parameters,
            params: parsed.params,
            captured_at: parsed.captured_at,
            identifier,
        }
    }

    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }

    /// Card description (capture date plus parameter list).
    pub fn description(&self) -> String {
        params::describe(&params::ParsedIdentifier {
            params: self.params.clone(),
            captured_at: self.captured_at,
        })
    }
}

/// First `VID<digits>` token of a name, or `"Unknown Video"`.
pub fn display_name(name: &str) -> String {
    static VID_RE: OnceLock<Regex> = OnceLock::new();
    let re = VID_RE.get_or_init(|| Regex::new(r"VID\d+").expect("static regex is valid"));
    re.find(name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Unknown Video".to_string())
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded list
// ---------------------------------------------------------------------------

/// The full loaded list with pre-computed parameter indices.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in file order.
    pub records: Vec<VideoRecord>,
    /// Sorted union of parameter names seen across records.
    pub param_names: Vec<String>,
    /// For each parameter the sorted set of distinct values.
    pub unique_values: BTreeMap<String, BTreeSet<ParamValue>>,
}

impl Dataset {
    /// Build parameter indices from the loaded records.
    pub fn from_records(records: Vec<VideoRecord>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<ParamValue>> = BTreeMap::new();

        for rec in &records {
            for (name, value) in &rec.params {
                unique_values
                    .entry(name.clone())
                    .or_default()
                    .insert(ParamValue(*value));
            }
        }
        let param_names = unique_values.keys().cloned().collect();
        Dataset {
            records,
            param_names,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
