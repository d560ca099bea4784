use std::path::Path;

use serde::Deserialize;

use super::model::{Dataset, VideoRecord};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// One entry of the metadata file. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct RawVideo {
    id: String,
    name: String,
}

/// Load the video list from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `[{ "id": "...", "name": "..." }, ...]`
/// * `.csv`  – header row with `id` and `name` columns
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let records: Vec<VideoRecord> = raw
        .iter()
        .map(|r| VideoRecord::new(&r.id, &r.name))
        .collect();

    let unparsed = records.iter().filter(|r| r.params.is_empty()).count();
    if unparsed > 0 {
        log::debug!("{unparsed} records carry no parseable parameters");
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema:
///
/// ```json
/// [
///   { "id": "../public/swarm-videos//111407.893-PM-25-Aug-2025_vis=10_...mp4",
///     "name": "VID0001.mp4" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawVideo>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<RawVideo>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<RawVideo>, csv::Error>>()
        .map_err(csv_err)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_json_records() {
        let file = write_temp(
            ".json",
            r#"[
                {"id": "../public/v//111407.893-PM-25-Aug-2025_vis=10_maxsepturn=3.mp4", "name": "VID1.mp4"},
                {"id": "../public/v//111408.000-PM-25-Aug-2025_vis=5_maxsepturn=3.mp4", "name": "VID2.mp4", "extra": 1}
            ]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].display_name, "VID1");
        assert_eq!(ds.records[1].param("vis"), Some(5.0));
        assert_eq!(ds.param_names, vec!["maxsepturn", "vis"]);
    }

    #[test]
    fn loads_csv_records() {
        let file = write_temp(".csv", "id,name\nclips/t_vis=2,VID9\nclips/t_vis=4,VID10\n");
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].display_name, "VID10");
    }

    #[test]
    fn malformed_json_is_a_load_failure() {
        let file = write_temp(".json", r#"[{"id": "x"}"#);
        assert!(matches!(load_file(file.path()), Err(LoadError::Json { .. })));

        let missing_name = write_temp(".json", r#"[{"id": "x"}]"#);
        assert!(matches!(
            load_file(missing_name.path()),
            Err(LoadError::Json { .. })
        ));
    }

    #[test]
    fn missing_file_and_unknown_extension_fail() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(load_file(&missing), Err(LoadError::Io { .. })));

        let file = write_temp(".parquet", "");
        assert!(matches!(
            load_file(file.path()),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "parquet"
        ));
    }
}
