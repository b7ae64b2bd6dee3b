use std::path::Path;

use crate::data::error::DataFormatError;
use crate::data::filter::{filter, text_search, DateRange, FilterCriteria, FilteredView};
use crate::data::loader::load_file;
use crate::data::model::ActivityTable;

// ---------------------------------------------------------------------------
// Dashboard tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Categories,
    Regional,
    Community,
    Details,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Categories,
        Tab::Regional,
        Tab::Community,
        Tab::Details,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "📊 Visão Geral",
            Tab::Categories => "📈 Análise por Categoria",
            Tab::Regional => "🗺 Análise Regional",
            Tab::Community => "👥 Ações Comunitárias",
            Tab::Details => "📋 Dados Detalhados",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a valid file is loaded).
    pub dataset: Option<ActivityTable>,

    /// File name of the loaded dataset, for the top bar.
    pub source_name: Option<String>,

    /// Side-panel filter selections.
    pub criteria: FilterCriteria,

    /// Indices of records passing `criteria`, recomputed on every change.
    pub visible_indices: Vec<usize>,

    /// Free-text search of the detail table.
    pub search_text: String,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load a file, replacing the current dataset.  On failure the previous
    /// dataset is dropped too, so the screen never shows stale numbers.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} actions from {}",
                    dataset.len(),
                    path.display()
                );
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                self.set_dataset(dataset, name);
            }
            Err(e) => self.fail_load(&e),
        }
    }

    /// Ingest a newly loaded dataset and reset filters to the full span.
    pub fn set_dataset(&mut self, dataset: ActivityTable, source_name: Option<String>) {
        self.criteria = FilterCriteria::full_span(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.search_text.clear();
        self.dataset = Some(dataset);
        self.source_name = source_name;
        self.status_message = None;
    }

    pub fn fail_load(&mut self, error: &anyhow::Error) {
        log::error!("Failed to load file: {error:#}");
        self.status_message = Some(match error.downcast_ref::<DataFormatError>() {
            Some(format_error) => format!(
                "Erro ao processar arquivo: {format_error}. \
                 Verifique se o arquivo está no formato correto."
            ),
            None => format!("Erro ao processar arquivo: {error:#}"),
        });
        self.dataset = None;
        self.source_name = None;
        self.criteria = FilterCriteria::default();
        self.visible_indices.clear();
    }

    /// Recompute `visible_indices` after a criteria change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filter(ds, &self.criteria).indices().to_vec();
            log::debug!(
                "filter {:?} keeps {} of {} actions",
                self.criteria,
                self.visible_indices.len(),
                ds.len()
            );
        }
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.criteria.date_range = Some(range);
        self.refilter();
    }

    pub fn set_type_filter(&mut self, action_type: Option<String>) {
        self.criteria.action_type = action_type;
        self.refilter();
    }

    pub fn set_contract_filter(&mut self, contract: Option<String>) {
        self.criteria.contract = contract;
        self.refilter();
    }

    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = FilterCriteria::full_span(ds);
        }
        self.refilter();
    }

    /// Rows passing the side-panel filters.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_ref()
            .map(|ds| FilteredView::from_indices(ds, &self.visible_indices))
    }

    /// The filtered rows narrowed by the detail-table search box.
    pub fn searched_view(&self) -> Option<FilteredView<'_>> {
        self.view().map(|v| text_search(&v, &self.search_text))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::ActivityRecord;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> ActivityTable {
        ActivityTable::from_records(vec![
            ActivityRecord::new(ymd(2024, 1, 5), "DDS", 10)
                .with_type("Interno")
                .with_contract("Oeste"),
            ActivityRecord::new(ymd(2024, 2, 5), "Mutirão", 30)
                .with_type("Comunidade")
                .with_contract("Nordeste"),
            ActivityRecord::new(ymd(2024, 3, 5), "DDS", 12)
                .with_type("Interno")
                .with_contract("Nordeste"),
        ])
    }

    #[test]
    fn new_dataset_shows_everything() {
        let mut state = AppState::default();
        state.search_text = "old".into();
        state.set_dataset(table(), Some("acoes.xlsx".into()));

        assert_eq!(state.visible_indices, [0, 1, 2]);
        assert_eq!(
            state.criteria.date_range,
            Some(DateRange {
                start: ymd(2024, 1, 5),
                end: ymd(2024, 3, 5)
            })
        );
        assert!(state.search_text.is_empty());
        assert_eq!(state.view().unwrap().len(), 3);
    }

    #[test]
    fn filter_setters_refilter() {
        let mut state = AppState::default();
        state.set_dataset(table(), None);

        state.set_type_filter(Some("Interno".into()));
        assert_eq!(state.visible_indices, [0, 2]);

        state.set_contract_filter(Some("Nordeste".into()));
        assert_eq!(state.visible_indices, [2]);

        state.set_date_range(DateRange {
            start: ymd(2024, 1, 1),
            end: ymd(2024, 2, 28),
        });
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.view().unwrap().kpis().actions, 0);

        state.reset_filters();
        assert_eq!(state.visible_indices, [0, 1, 2]);
    }

    #[test]
    fn search_applies_on_top_of_filters() {
        let mut state = AppState::default();
        state.set_dataset(table(), None);
        state.set_contract_filter(Some("Nordeste".into()));
        state.search_text = "dds".into();
        assert_eq!(state.searched_view().unwrap().indices(), &[2]);
    }

    #[test]
    fn failed_load_clears_previous_dataset() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"Data,Evento,Pessoas Impactadas,Colaborador,Contrato,Tipo\nontem,DDS,1,Ana,Oeste,Interno\n")
            .unwrap();

        let mut state = AppState::default();
        state.set_dataset(table(), None);
        state.load_path(file.path());

        assert!(state.dataset.is_none());
        assert!(state.view().is_none());
        let message = state.status_message.unwrap();
        assert!(message.contains("row 2"), "{message}");
        assert!(message.contains("formato correto"), "{message}");
    }

    #[test]
    fn successful_load_records_the_file_name() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"Data,Evento,Pessoas Impactadas,Colaborador,Contrato,Tipo\n2024-05-02,DDS,4,Ana,Oeste,Interno\n")
            .unwrap();

        let mut state = AppState::default();
        state.load_path(file.path());

        assert_eq!(state.dataset.as_ref().map(ActivityTable::len), Some(1));
        assert!(state.source_name.unwrap().ends_with(".csv"));
        assert!(state.status_message.is_none());
    }
}
