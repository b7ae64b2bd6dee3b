use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use super::filter::FilteredView;
use super::model::DISPLAY_COLUMNS;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Render the view as CSV: UTF-8 with a byte-order mark (Excel needs it to
/// pick the right encoding), the displayed columns, dates as `DD/MM/YYYY`.
pub fn export_csv(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer
        .write_record(DISPLAY_COLUMNS)
        .context("writing CSV header")?;
    for record in view.records() {
        writer
            .write_record(record.display_cells())
            .context("writing CSV row")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {}", e.error()))
}

/// Write [`export_csv`] output to `path`.
pub fn write_csv(view: &FilteredView<'_>, path: &Path) -> Result<()> {
    let bytes = export_csv(view)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("exported {} rows to {}", view.len(), path.display());
    Ok(())
}

/// Suggested file name, e.g. `acoes_sesmt_20240305.csv`.
pub fn export_file_name(today: NaiveDate) -> String {
    format!("acoes_sesmt_{}.csv", today.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{text_search, FilteredView};
    use crate::data::model::{ActivityRecord, ActivityTable};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> ActivityTable {
        ActivityTable::from_records(vec![
            ActivityRecord::new(ymd(2024, 3, 5), "DDS", 20)
                .with_collaborator("Ana")
                .with_role("Técnica")
                .with_contract("Oeste")
                .with_type("Interno")
                .with_observations("Uso de EPI, altura"),
            ActivityRecord::new(ymd(2024, 3, 18), "Mutirão", 15)
                .with_collaborator("Bruno")
                .with_contract("Nordeste")
                .with_type("Comunidade"),
        ])
    }

    #[test]
    fn writes_bom_header_and_brazilian_dates() {
        let table = table();
        let bytes = export_csv(&FilteredView::all(&table)).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Data,Evento,Pessoas Impactadas,Colaborador,Contrato,Tipo,Observações",
                "05/03/2024,DDS,20,Ana,Oeste,Interno,\"Uso de EPI, altura\"",
                "18/03/2024,Mutirão,15,Bruno,Nordeste,Comunidade,",
            ]
        );
    }

    #[test]
    fn exports_only_the_searched_rows() {
        let table = table();
        let view = text_search(&FilteredView::all(&table), "bruno");
        let bytes = export_csv(&view).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Mutirão"));
    }

    #[test]
    fn empty_view_exports_header_only() {
        let table = ActivityTable::default();
        let bytes = export_csv(&FilteredView::all(&table)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn writes_file_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_file_name(ymd(2024, 3, 5)));
        let table = table();
        write_csv(&FilteredView::all(&table), &path).unwrap();
        assert!(path.ends_with("acoes_sesmt_20240305.csv"));
        assert!(std::fs::read(&path).unwrap().starts_with(UTF8_BOM));
    }
}
