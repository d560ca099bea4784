use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::data::grouping::RankedVideo;
use crate::data::params::{format_value, param_label};

pub const CSV_FILE_NAME: &str = "video_complexity_order.csv";
pub const XLSX_FILE_NAME: &str = "Complexity_Sort_Results.xlsx";
pub const XLSX_SHEET_NAME: &str = "Sorted Results";

const MISSING_CELL: &str = "N/A";

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Write the user's order as CSV.
///
/// Columns: rank in the user's order, display name, target complexity rank,
/// then one column per entry of `param_names`.
pub fn write_order_csv<W: Write>(
    writer: W,
    items: &[RankedVideo],
    param_names: &[String],
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![
        "Rank".to_string(),
        "Video Name".to_string(),
        "Target Complexity Rank (1=Least Complex)".to_string(),
    ];
    header.extend(param_names.iter().map(|p| param_label(p).to_string()));
    wtr.write_record(&header)?;

    for (index, item) in items.iter().enumerate() {
        let mut row = vec![
            (index + 1).to_string(),
            item.record.display_name.clone(),
            item.complexity_rank.to_string(),
        ];
        row.extend(param_names.iter().map(|p| {
            item.record
                .param(p)
                .map(format_value)
                .unwrap_or_else(|| MISSING_CELL.to_string())
        }));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_order_csv(path: &Path, items: &[RankedVideo], param_names: &[String]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_order_csv(file, items, param_names).context("writing CSV")?;
    log::info!("Exported {} rows to {}", items.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Spreadsheet
// ---------------------------------------------------------------------------

/// Build the "Sorted Results" workbook: Rank, ID, Name, Complexity_Score.
pub fn build_workbook(items: &[RankedVideo]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(XLSX_SHEET_NAME)?;

    for (col, (title, width)) in [("Rank", 8), ("ID", 15), ("Name", 40), ("Complexity_Score", 20)]
        .into_iter()
        .enumerate()
    {
        worksheet.write_string_with_format(0, col as u16, title, &bold)?;
        worksheet.set_column_width(col as u16, width)?;
    }

    for (index, item) in items.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet.write_number(row, 0, (index + 1) as f64)?;
        worksheet.write_string(row, 1, &item.record.identifier)?;
        worksheet.write_string(row, 2, &item.record.display_name)?;
        worksheet.write_number(row, 3, item.complexity_rank as f64)?;
    }
    Ok(workbook)
}

pub fn save_xlsx(path: &Path, items: &[RankedVideo]) -> Result<()> {
    let mut workbook = build_workbook(items).context("building workbook")?;
    workbook
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows to {}", items.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

/// Order summary embedded in the outbound email.
pub fn order_summary(items: &[RankedVideo]) -> String {
    let mut out = String::from("User's Final Order:");
    for (index, item) in items.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} (Target Rank: {})",
            index + 1,
            item.record.display_name,
            item.complexity_rank
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use serde::Deserialize;

    use super::*;
    use crate::data::grouping::GroupKey;
    use crate::data::model::VideoRecord;

    /// The first three columns of an exported CSV row.
    #[derive(Debug, Deserialize)]
    struct OrderRow {
        #[serde(rename = "Rank")]
        rank: usize,
        #[serde(rename = "Video Name")]
        name: String,
        #[serde(rename = "Target Complexity Rank (1=Least Complex)")]
        target_rank: usize,
    }

    fn read_order_csv<R: Read>(reader: R) -> Result<Vec<OrderRow>, csv::Error> {
        csv::Reader::from_reader(reader).deserialize().collect()
    }

    fn item(id: &str, name: &str, rank: usize) -> RankedVideo {
        RankedVideo {
            record: VideoRecord::new(id, name),
            complexity_rank: rank,
            group_key: GroupKey(Vec::new()),
        }
    }

    fn sample() -> Vec<RankedVideo> {
        vec![
            item("v/t_maxsepturn=6_vis=2", "VID3", 3),
            item("v/t_maxsepturn=3_vis=5", "VID1", 1),
            item("v/t_maxsepturn=3", "VID2", 2),
        ]
    }

    #[test]
    fn csv_round_trips_rank_name_target() {
        let items = sample();
        let params = vec!["maxsepturn".to_string(), "vis".to_string()];
        let mut buf = Vec::new();
        write_order_csv(&mut buf, &items, &params).unwrap();

        let rows = read_order_csv(buf.as_slice()).unwrap();
        let expected: Vec<(usize, String, usize)> = items
            .iter()
            .enumerate()
            .map(|(i, it)| (i + 1, it.record.display_name.clone(), it.complexity_rank))
            .collect();
        let got: Vec<(usize, String, usize)> = rows
            .into_iter()
            .map(|r| (r.rank, r.name, r.target_rank))
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn csv_header_and_missing_cells() {
        let params = vec!["maxsepturn".to_string(), "vis".to_string()];
        let mut buf = Vec::new();
        write_order_csv(&mut buf, &sample(), &params).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Rank,Video Name,Target Complexity Rank (1=Least Complex),Maximum separation turn,Vision"
        );
        assert_eq!(lines.next().unwrap(), "1,VID3,3,6,2");
        assert_eq!(lines.next().unwrap(), "2,VID1,1,3,5");
        assert_eq!(lines.next().unwrap(), "3,VID2,2,3,N/A");
    }

    #[test]
    fn csv_escapes_embedded_quotes() {
        let mut odd = item("v/t_vis=1", "x", 1);
        odd.record.display_name = "say \"hi\", ok".to_string();
        let mut buf = Vec::new();
        write_order_csv(&mut buf, std::slice::from_ref(&odd), &[]).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains("\"say \"\"hi\"\", ok\""));

        let rows = read_order_csv(buf.as_slice()).unwrap();
        assert_eq!(rows[0].name, "say \"hi\", ok");
    }

    #[test]
    fn csv_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CSV_FILE_NAME);
        save_order_csv(&path, &sample(), &[]).unwrap();
        let rows = read_order_csv(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn workbook_serializes_to_xlsx() {
        let mut workbook = build_workbook(&sample()).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();
        assert!(bytes.starts_with(b"PK"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(XLSX_FILE_NAME);
        save_xlsx(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn summary_lists_user_order_with_targets() {
        assert_eq!(
            order_summary(&sample()),
            "User's Final Order:\n1. VID3 (Target Rank: 3)\n2. VID1 (Target Rank: 1)\n3. VID2 (Target Rank: 2)"
        );
    }
}
