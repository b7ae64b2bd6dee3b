use chrono::NaiveDate;

use super::model::{ActivityRecord, ActivityTable};

// ---------------------------------------------------------------------------
// Filter criteria collected from the side panel
// ---------------------------------------------------------------------------

/// Inclusive date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// What the user asked to see.  `None` on any field means "no constraint"
/// (the UI shows it as "Todos").
///
/// `action_type` and `contract` are exact, case-sensitive matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub date_range: Option<DateRange>,
    pub action_type: Option<String>,
    pub contract: Option<String>,
}

impl FilterCriteria {
    /// Criteria covering the whole table, with the date range pinned to the
    /// data span so the date pickers have something to show.
    pub fn full_span(table: &ActivityTable) -> Self {
        FilterCriteria {
            date_range: table
                .date_span()
                .map(|(start, end)| DateRange { start, end }),
            ..Default::default()
        }
    }

    fn accepts(&self, record: &ActivityRecord) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(record.date()) {
                return false;
            }
        }
        if let Some(action_type) = &self.action_type {
            if record.action_type != *action_type {
                return false;
            }
        }
        if let Some(contract) = &self.contract {
            if record.contract != *contract {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// FilteredView – a row selection over a borrowed table
// ---------------------------------------------------------------------------

/// Rows of an [`ActivityTable`] that passed a filter, in table order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a ActivityTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Every row of the table.
    pub fn all(table: &'a ActivityTable) -> Self {
        FilteredView {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    /// A view over explicit row indices (as cached by the UI state).
    /// Out-of-range indices are dropped.
    pub fn from_indices(table: &'a ActivityTable, indices: &[usize]) -> Self {
        FilteredView {
            table,
            indices: indices.iter().copied().filter(|&i| i < table.len()).collect(),
        }
    }

    pub fn table(&self) -> &'a ActivityTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a ActivityRecord> + '_ {
        let records = self.table.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    fn retain(&self, mut keep: impl FnMut(&ActivityRecord) -> bool) -> Self {
        let records = self.table.records();
        FilteredView {
            table: self.table,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| keep(&records[i]))
                .collect(),
        }
    }
}

impl PartialEq for FilteredView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.table, other.table) && self.indices == other.indices
    }
}

/// Apply date range, type and contract constraints (all must hold).
pub fn filter<'a>(table: &'a ActivityTable, criteria: &FilterCriteria) -> FilteredView<'a> {
    FilteredView::all(table).retain(|r| criteria.accepts(r))
}

/// Case-insensitive substring search over the displayed cells of each row.
/// An empty query returns the view unchanged.
pub fn text_search<'a>(view: &FilteredView<'a>, query: &str) -> FilteredView<'a> {
    if query.is_empty() {
        return view.clone();
    }
    let needle = query.to_lowercase();
    view.retain(|r| {
        r.display_cells()
            .iter()
            .any(|cell| cell.to_lowercase().contains(&needle))
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_table() -> ActivityTable {
        ActivityTable::from_records(vec![
            ActivityRecord::new(ymd(2024, 1, 10), "DDS", 12)
                .with_type("Interno")
                .with_contract("Oeste")
                .with_collaborator("Ana Souza"),
            ActivityRecord::new(ymd(2024, 2, 3), "Treinamento NR-10", 25)
                .with_type("Treinamento")
                .with_contract("Nordeste")
                .with_collaborator("Bruno Lima"),
            ActivityRecord::new(ymd(2024, 2, 20), "Mutirão de limpeza", 40)
                .with_type("Comunidade")
                .with_contract("Oeste")
                .with_collaborator("Carla Dias")
                .with_observations("Parceria com a escola"),
            ActivityRecord::new(ymd(2024, 3, 1), "DDS", 8)
                .with_type("Interno")
                .with_contract("Nordeste")
                .with_collaborator("Ana Souza"),
        ])
    }

    #[test]
    fn no_criteria_returns_the_whole_table_in_order() {
        let table = sample_table();
        let view = filter(&table, &FilterCriteria::default());
        assert_eq!(view, FilteredView::all(&table));
        assert_eq!(view.indices(), &[0, 1, 2, 3]);

        let pinned = filter(&table, &FilterCriteria::full_span(&table));
        assert_eq!(pinned, view);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let table = sample_table();
        let criteria = FilterCriteria {
            date_range: Some(DateRange {
                start: ymd(2024, 2, 3),
                end: ymd(2024, 2, 20),
            }),
            ..Default::default()
        };
        assert_eq!(filter(&table, &criteria).indices(), &[1, 2]);
    }

    #[test]
    fn type_and_contract_filters_are_conjunctive() {
        let table = sample_table();
        let by_type = FilterCriteria {
            action_type: Some("Interno".into()),
            ..Default::default()
        };
        let by_contract = FilterCriteria {
            contract: Some("Nordeste".into()),
            ..Default::default()
        };
        let both = FilterCriteria {
            action_type: Some("Interno".into()),
            contract: Some("Nordeste".into()),
            ..Default::default()
        };

        let a: BTreeSet<usize> = filter(&table, &by_type).indices().iter().copied().collect();
        let b: BTreeSet<usize> = filter(&table, &by_contract).indices().iter().copied().collect();
        let combined: BTreeSet<usize> = filter(&table, &both).indices().iter().copied().collect();

        assert_eq!(combined, a.intersection(&b).copied().collect());
        assert_eq!(combined, BTreeSet::from([3]));
    }

    #[test]
    fn exact_filters_are_case_sensitive() {
        let table = sample_table();
        let criteria = FilterCriteria {
            action_type: Some("interno".into()),
            ..Default::default()
        };
        assert!(filter(&table, &criteria).is_empty());
    }

    #[test]
    fn unknown_contract_gives_an_empty_view() {
        let table = sample_table();
        let criteria = FilterCriteria {
            contract: Some("Sul".into()),
            ..Default::default()
        };
        let view = filter(&table, &criteria);
        assert!(view.is_empty());
        assert_eq!(view.records().count(), 0);
    }

    #[test]
    fn search_is_case_insensitive_across_visible_columns() {
        let table = sample_table();
        let view = FilteredView::all(&table);

        assert_eq!(text_search(&view, "ana souza").indices(), &[0, 3]);
        assert_eq!(text_search(&view, "ESCOLA").indices(), &[2]);
        // Dates are searched in their displayed form.
        assert_eq!(text_search(&view, "/02/2024").indices(), &[1, 2]);
        assert_eq!(text_search(&view, "25").indices(), &[1]);
    }

    #[test]
    fn empty_search_is_identity() {
        let table = sample_table();
        let view = filter(
            &table,
            &FilterCriteria {
                contract: Some("Oeste".into()),
                ..Default::default()
            },
        );
        assert_eq!(text_search(&view, ""), view);
    }

    #[test]
    fn role_is_not_searchable() {
        let table = ActivityTable::from_records(vec![
            ActivityRecord::new(ymd(2024, 1, 1), "DDS", 1).with_role("Supervisor")
        ]);
        let view = FilteredView::all(&table);
        assert!(text_search(&view, "supervisor").is_empty());
    }

    #[test]
    fn search_narrows_an_already_filtered_view() {
        let table = sample_table();
        let view = filter(
            &table,
            &FilterCriteria {
                contract: Some("Nordeste".into()),
                ..Default::default()
            },
        );
        assert_eq!(text_search(&view, "dds").indices(), &[3]);
    }

    #[test]
    fn from_indices_drops_stale_rows() {
        let table = sample_table();
        let view = FilteredView::from_indices(&table, &[1, 9, 3]);
        assert_eq!(view.indices(), &[1, 3]);
    }
}
