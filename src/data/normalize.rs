use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use super::error::DataFormatError;
use super::model::{
    ActivityRecord, ActivityTable, CellValue, RawTable, COL_COLLABORATOR, COL_CONTRACT, COL_DATE,
    COL_EVENT, COL_OBSERVATIONS, COL_PEOPLE, COL_ROLE, COL_TYPE, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// RawTable → ActivityTable
// ---------------------------------------------------------------------------

/// Validate the header, parse every row and derive the month buckets.
///
/// Fails on the first problem found; no partial table is ever returned.
/// Rows where every cell is blank are skipped (spreadsheets often carry a
/// formatted but empty tail).
pub fn normalize(raw: &RawTable) -> Result<ActivityTable, DataFormatError> {
    if raw.headers.iter().all(String::is_empty) {
        return Err(DataFormatError::EmptySheet);
    }
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| raw.column_index(col).is_none())
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataFormatError::MissingColumns { missing });
    }

    let columns = ColumnMap::resolve(raw);
    let mut records = Vec::with_capacity(raw.rows.len());

    for (i, row) in raw.rows.iter().enumerate() {
        if row.iter().all(CellValue::is_empty) {
            continue;
        }
        // Header is spreadsheet row 1.
        let row_no = i + 2;
        let cell = |idx: Option<usize>| cell_at(row, idx);

        let date_cell = cell(Some(columns.date));
        let date = parse_date(date_cell).ok_or_else(|| DataFormatError::InvalidDate {
            row: row_no,
            value: date_cell.to_string(),
        })?;

        let people_cell = cell(Some(columns.people));
        let people = parse_people(people_cell).ok_or_else(|| {
            DataFormatError::InvalidPeopleImpacted {
                row: row_no,
                value: people_cell.to_string(),
            }
        })?;

        let record = ActivityRecord::new(date, cell(Some(columns.event)).to_string(), people)
            .with_observations(cell(columns.observations).to_string())
            .with_collaborator(cell(Some(columns.collaborator)).to_string())
            .with_role(cell(columns.role).to_string())
            .with_contract(cell(Some(columns.contract)).to_string())
            .with_type(cell(Some(columns.action_type)).to_string());
        records.push(record);
    }

    log::debug!(
        "normalized {} records ({} raw rows)",
        records.len(),
        raw.rows.len()
    );
    Ok(ActivityTable::from_records(records))
}

/// Column positions; the optional columns may be absent from the sheet.
struct ColumnMap {
    date: usize,
    event: usize,
    people: usize,
    observations: Option<usize>,
    collaborator: usize,
    role: Option<usize>,
    contract: usize,
    action_type: usize,
}

impl ColumnMap {
    /// Only called once the required columns are known to exist.
    fn resolve(raw: &RawTable) -> Self {
        let required = |name: &str| raw.column_index(name).unwrap_or_default();
        ColumnMap {
            date: required(COL_DATE),
            event: required(COL_EVENT),
            people: required(COL_PEOPLE),
            observations: raw.column_index(COL_OBSERVATIONS),
            collaborator: required(COL_COLLABORATOR),
            role: raw.column_index(COL_ROLE),
            contract: required(COL_CONTRACT),
            action_type: required(COL_TYPE),
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Short rows are padded with blanks.
fn cell_at(row: &[CellValue], idx: Option<usize>) -> &CellValue {
    idx.and_then(|j| row.get(j)).unwrap_or(&EMPTY_CELL)
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Largest serial Excel accepts (31/12/9999).
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

/// Interpret a cell as a calendar date. Time of day is dropped.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Integer(i) => excel_serial_to_date(*i as f64),
        CellValue::Float(f) => excel_serial_to_date(*f),
        CellValue::Text(s) => parse_date_text(s.trim()),
        CellValue::Bool(_) | CellValue::Empty => None,
    }
}

/// Years must be written with four digits.  `%Y` alone also takes `24`
/// (year 0024) and `020240`.
const TEXT_YEARS: std::ops::RangeInclusive<i32> = 1000..=9999;

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .filter(|date| TEXT_YEARS.contains(&date.year()))
}

/// 1900 date system; the epoch is 1899-12-30 so that Excel's phantom
/// 29/02/1900 does not shift later dates.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

/// Participant count. Blank cells count as zero.
pub fn parse_people(cell: &CellValue) -> Option<u64> {
    match cell {
        CellValue::Empty => Some(0),
        CellValue::Integer(i) => u64::try_from(*i).ok(),
        CellValue::Float(f) => whole_non_negative(*f),
        CellValue::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(0);
            }
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_non_negative))
        }
        CellValue::Bool(_) | CellValue::DateTime(_) => None,
    }
}

fn whole_non_negative(v: f64) -> Option<u64> {
    (v.is_finite() && v >= 0.0 && v.fract() == 0.0).then_some(v as u64)
}
