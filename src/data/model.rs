use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

// ---------------------------------------------------------------------------
// Spreadsheet column names
// ---------------------------------------------------------------------------

pub const COL_DATE: &str = "Data";
pub const COL_EVENT: &str = "Evento";
pub const COL_PEOPLE: &str = "Pessoas Impactadas";
pub const COL_OBSERVATIONS: &str = "Observações";
pub const COL_COLLABORATOR: &str = "Colaborador";
pub const COL_ROLE: &str = "Cargo";
pub const COL_CONTRACT: &str = "Contrato";
pub const COL_TYPE: &str = "Tipo";

/// Columns that must be present in every uploaded sheet.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_DATE,
    COL_EVENT,
    COL_PEOPLE,
    COL_COLLABORATOR,
    COL_CONTRACT,
    COL_TYPE,
];

/// Columns shown in the detail table, searched by free text and exported,
/// in display order. `Cargo` is deliberately not among them.
pub const DISPLAY_COLUMNS: [&str; 7] = [
    COL_DATE,
    COL_EVENT,
    COL_PEOPLE,
    COL_COLLABORATOR,
    COL_CONTRACT,
    COL_TYPE,
    COL_OBSERVATIONS,
];

/// `Tipo` values that mark a community action.
pub const COMMUNITY_TYPES: [&str; 2] = ["Comunidade", "Community"];

// ---------------------------------------------------------------------------
// CellValue – a single raw cell as read from the file
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Whole numbers typed into a text column come back as floats
            // from most workbooks; show them the way they were typed.
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::DateTime(dt) if dt.time() == NaiveTime::MIN => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Empty => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – header row plus untyped rows, straight from the loader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

// ---------------------------------------------------------------------------
// Month bucketing
// ---------------------------------------------------------------------------

const MONTH_NAMES_PT: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Portuguese name of a month numbered 1–12.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES_PT[(month as usize).clamp(1, 12) - 1]
}

/// Sortable year-month bucket; displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Display label such as `Março/2024`.
    pub fn label(&self) -> String {
        format!("{}/{}", month_name(self.month), self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// `DD/MM/YYYY`, the format used on screen and in exports.
pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

// ---------------------------------------------------------------------------
// ActivityRecord – one row of the activity sheet
// ---------------------------------------------------------------------------

/// A single SESMT action.
///
/// `date`, `month_key` and `month_label` are fixed at construction so the
/// derived month fields can never drift from the date.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    date: NaiveDate,
    month_key: MonthKey,
    month_label: String,
    pub event: String,
    pub people_impacted: u64,
    pub observations: String,
    pub collaborator: String,
    pub role: String,
    pub contract: String,
    pub action_type: String,
}

impl ActivityRecord {
    pub fn new(date: NaiveDate, event: impl Into<String>, people_impacted: u64) -> Self {
        let month_key = MonthKey::of(date);
        Self {
            date,
            month_key,
            month_label: month_key.label(),
            event: event.into(),
            people_impacted,
            observations: String::new(),
            collaborator: String::new(),
            role: String::new(),
            contract: String::new(),
            action_type: String::new(),
        }
    }

    pub fn with_type(mut self, action_type: impl Into<String>) -> Self {
        self.action_type = action_type.into();
        self
    }

    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = contract.into();
        self
    }

    pub fn with_collaborator(mut self, collaborator: impl Into<String>) -> Self {
        self.collaborator = collaborator.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        self.observations = observations.into();
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn month_key(&self) -> MonthKey {
        self.month_key
    }

    pub fn month_label(&self) -> &str {
        &self.month_label
    }

    pub fn is_community(&self) -> bool {
        COMMUNITY_TYPES.contains(&self.action_type.as_str())
    }

    /// The row as displayed, in [`DISPLAY_COLUMNS`] order.
    pub fn display_cells(&self) -> [String; 7] {
        [
            format_date_br(self.date),
            self.event.clone(),
            self.people_impacted.to_string(),
            self.collaborator.clone(),
            self.contract.clone(),
            self.action_type.clone(),
            self.observations.clone(),
        ]
    }
}

// ---------------------------------------------------------------------------
// ActivityTable – the normalized dataset, read-only after load
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityTable {
    records: Vec<ActivityRecord>,
}

impl ActivityTable {
    pub fn from_records(records: Vec<ActivityRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest action date, or `None` for an empty table.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(ActivityRecord::date).min()?;
        let max = self.records.iter().map(ActivityRecord::date).max()?;
        Some((min, max))
    }

    /// Distinct `Tipo` values in order of first appearance.
    pub fn distinct_types(&self) -> Vec<String> {
        distinct_in_order(self.records.iter().map(|r| r.action_type.as_str()))
    }

    /// Distinct `Contrato` values in order of first appearance.
    pub fn distinct_contracts(&self) -> Vec<String> {
        distinct_in_order(self.records.iter().map(|r| r.contract.as_str()))
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_fields_follow_the_date() {
        let record = ActivityRecord::new(date(2024, 3, 5), "Safety Talk", 20);
        assert_eq!(record.month_key().to_string(), "2024-03");
        assert_eq!(record.month_label(), "Março/2024");
    }

    #[test]
    fn every_month_has_a_portuguese_name() {
        let labels: Vec<String> = (1..=12)
            .map(|m| MonthKey { year: 2023, month: m }.label())
            .collect();
        assert_eq!(labels[0], "Janeiro/2023");
        assert_eq!(labels[1], "Fevereiro/2023");
        assert_eq!(labels[11], "Dezembro/2023");
    }

    #[test]
    fn month_keys_sort_chronologically_across_years() {
        let mut keys = vec![
            MonthKey::of(date(2024, 1, 10)),
            MonthKey::of(date(2023, 12, 1)),
            MonthKey::of(date(2023, 2, 28)),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["2023-02", "2023-12", "2024-01"]);
    }

    #[test]
    fn display_cells_use_brazilian_dates() {
        let record = ActivityRecord::new(date(2024, 3, 5), "Safety Talk", 20)
            .with_collaborator("Ana")
            .with_contract("West")
            .with_type("Internal")
            .with_role("Técnica")
            .with_observations("ok");
        assert_eq!(
            record.display_cells(),
            ["05/03/2024", "Safety Talk", "20", "Ana", "West", "Internal", "ok"]
        );
    }

    #[test]
    fn community_matches_both_labels_exactly() {
        let d = date(2024, 1, 1);
        assert!(ActivityRecord::new(d, "e", 1).with_type("Comunidade").is_community());
        assert!(ActivityRecord::new(d, "e", 1).with_type("Community").is_community());
        assert!(!ActivityRecord::new(d, "e", 1).with_type("comunidade").is_community());
    }

    #[test]
    fn table_span_and_distinct_values() {
        let table = ActivityTable::from_records(vec![
            ActivityRecord::new(date(2024, 5, 1), "a", 1).with_type("Interno").with_contract("Oeste"),
            ActivityRecord::new(date(2024, 2, 1), "b", 1).with_type("EQTL").with_contract("Oeste"),
            ActivityRecord::new(date(2024, 9, 1), "c", 1).with_type("Interno").with_contract("Nordeste"),
        ]);
        assert_eq!(table.date_span(), Some((date(2024, 2, 1), date(2024, 9, 1))));
        assert_eq!(table.distinct_types(), ["Interno", "EQTL"]);
        assert_eq!(table.distinct_contracts(), ["Oeste", "Nordeste"]);
        assert_eq!(ActivityTable::default().date_span(), None);
    }

    #[test]
    fn whole_floats_display_without_decimals() {
        assert_eq!(CellValue::Float(12.0).to_string(), "12");
        assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
