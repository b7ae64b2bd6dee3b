use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};

use super::model::{ActivityTable, CellValue, RawTable};
use super::normalize::normalize;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and normalize an activity sheet.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet
/// * `.csv` – comma separated, UTF-8, first line is the header
///
/// A [`DataFormatError`](super::error::DataFormatError) from normalization
/// is kept as the root of the returned error so callers can `downcast_ref`
/// it.
pub fn load_file(path: &Path) -> Result<ActivityTable> {
    let raw = read_raw(path)?;
    log::debug!(
        "read {} rows with columns {:?} from {}",
        raw.rows.len(),
        raw.headers,
        path.display()
    );
    let table = normalize(&raw)?;
    Ok(table)
}

/// Read a file into an untyped [`RawTable`] without interpreting any column.
pub fn read_raw(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Read the first worksheet; its first row is the header.
fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|c| cell_from_data(c).to_string()).collect(),
        None => return Ok(RawTable::default()),
    };
    let rows = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

const UTF8_BOM: char = '\u{feff}';

/// CSV layout:  header row with column names, one record per line.
/// Every cell is kept as text; typing happens during normalization so that
/// codes such as `0012` survive untouched.
pub fn read_csv<R: Read>(input: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Spreadsheet tools prepend a BOM that csv does not strip.
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 2))?;
        rows.push(
            record
                .iter()
                .map(|value| {
                    if value.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(value.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;

    use super::*;
    use crate::data::error::DataFormatError;

    const SAMPLE: &str = "\u{feff}Data,Evento,Pessoas Impactadas,Observações,Colaborador,Cargo,Contrato,Tipo,Extra\n\
        2024-03-05,DDS,20,Tudo ok,Ana,Técnica,Oeste,Interno,x\n\
        18/03/2024,Mutirão,15,,Bruno,Engenheiro,Nordeste,Comunidade,y\n";

    #[test]
    fn csv_strips_bom_and_keeps_text() {
        let raw = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(raw.headers[0], "Data");
        assert_eq!(raw.headers.len(), 9);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[0][2], CellValue::Text("20".into()));
        assert_eq!(raw.rows[1][3], CellValue::Empty);
    }

    #[test]
    fn loads_csv_file_end_to_end() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].month_label(), "Março/2024");
        assert_eq!(table.records()[1].people_impacted, 15);
    }

    #[test]
    fn format_errors_can_be_downcast() {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        file.write_all(b"Data,Evento\n2024-01-01,DDS\n").unwrap();

        let err = load_file(file.path()).unwrap_err();
        let format_err = err.downcast_ref::<DataFormatError>();
        assert!(matches!(
            format_err,
            Some(DataFormatError::MissingColumns { missing }) if missing.len() == 4
        ));
    }

    #[test]
    fn rejects_unknown_extensions() {
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn loads_first_sheet_of_xlsx_workbook() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/acoes_sesmt.xlsx");

        let raw = read_raw(&path).unwrap();
        assert_eq!(raw.headers[0], "Data");
        assert_eq!(raw.headers[7], "Tipo");
        assert_eq!(raw.rows.len(), 2);

        let table = load_file(&path).unwrap();
        let records = table.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(records[0].month_label(), "Março/2024");
        assert_eq!(records[0].people_impacted, 20);
        assert_eq!(records[0].observations, "Tudo ok");
        assert_eq!(records[1].date(), NaiveDate::from_ymd_opt(2024, 4, 18).unwrap());
        assert_eq!(records[1].month_label(), "Abril/2024");
        assert_eq!(records[1].observations, "");
        assert!(records[1].is_community());
    }

    #[test]
    fn maps_workbook_cells() {
        assert_eq!(cell_from_data(&Data::Int(3)), CellValue::Integer(3));
        assert_eq!(
            cell_from_data(&Data::String("Oeste".into())),
            CellValue::Text("Oeste".into())
        );
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
    }
}
