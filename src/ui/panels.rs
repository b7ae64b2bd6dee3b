use std::path::PathBuf;

use anyhow::Result;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::export::{export_file_name, write_csv};
use crate::data::filter::{DateRange, FilteredView};
use crate::state::AppState;

/// Label of the "no constraint" choice in the filter combo boxes.
const ALL_LABEL: &str = "Todos";

// ---------------------------------------------------------------------------
// Left side panel – upload and filter widgets
// ---------------------------------------------------------------------------

/// Render the left side panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("📤 Upload de Dados");
            if ui.button("Carregar planilha de acompanhamento…").clicked() {
                open_file_dialog(state);
            }
            if let Some(name) = &state.source_name {
                ui.label(RichText::new(name).italics());
            }

            if state.dataset.is_some() {
                ui.separator();
                filters(ui, state);
            }

            ui.separator();
            ui.heading("ℹ Sobre");
            ui.strong("Rezende Energia");
            ui.label("Sistema de Business Intelligence para monitoramento de ações do SESMT");
        });
}

fn filters(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let types = dataset.distinct_types();
    let contracts = dataset.distinct_contracts();
    let span = dataset.date_span();

    ui.heading("🔍 Filtros");

    // ---- Period ----
    if let Some((min, max)) = span {
        let current = state.criteria.date_range.unwrap_or(DateRange { start: min, end: max });
        let mut start = current.start;
        let mut end = current.end;
        ui.strong("Período");
        ui.horizontal(|ui: &mut Ui| {
            ui.add(DatePickerButton::new(&mut start).id_salt("period_start"));
            ui.label("até");
            ui.add(DatePickerButton::new(&mut end).id_salt("period_end"));
        });
        // Pickers are not bounded; keep the range inside the data span.
        let picked = DateRange {
            start: start.clamp(min, max),
            end: end.clamp(min, max),
        };
        if picked != current {
            state.set_date_range(picked);
        }
    }

    // ---- Action type ----
    ui.strong("Tipo de Ação");
    let mut action_type = state.criteria.action_type.clone();
    choice_box(ui, "type_filter", &mut action_type, &types);
    if action_type != state.criteria.action_type {
        state.set_type_filter(action_type);
    }

    // ---- Contract / region ----
    ui.strong("Contrato/Região");
    let mut contract = state.criteria.contract.clone();
    choice_box(ui, "contract_filter", &mut contract, &contracts);
    if contract != state.criteria.contract {
        state.set_contract_filter(contract);
    }

    ui.add_space(6.0);
    if ui.small_button("Limpar filtros").clicked() {
        state.reset_filters();
    }
}

/// Combo box offering "Todos" (`None`) followed by every option.
fn choice_box(ui: &mut Ui, id: &str, selected: &mut Option<String>, options: &[String]) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.as_deref().unwrap_or(ALL_LABEL))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(selected, None, ALL_LABEL);
            for option in options {
                ui.selectable_value(selected, Some(option.clone()), option.as_str());
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Exportar CSV…"))
                .clicked()
            {
                export_current(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} ações carregadas, {} visíveis",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Carregar planilha de acompanhamento")
        .add_filter("Planilhas", &["xlsx", "xls", "xlsm", "xlsb", "ods", "csv"])
        .add_filter("Excel", &["xlsx", "xls", "xlsm", "xlsb"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

/// Ask where to save the view and write it.  `None` when cancelled.
pub fn save_csv_dialog(view: &FilteredView<'_>) -> Option<Result<PathBuf>> {
    let today = chrono::Local::now().date_naive();
    let path = rfd::FileDialog::new()
        .set_title("Baixar dados filtrados")
        .set_file_name(export_file_name(today))
        .add_filter("CSV", &["csv"])
        .save_file()?;
    Some(write_csv(view, &path).map(|()| path))
}

fn export_current(state: &mut AppState) {
    let result = state.searched_view().and_then(|view| save_csv_dialog(&view));
    if let Some(Err(e)) = result {
        log::error!("CSV export failed: {e:#}");
        state.status_message = Some(format!("Erro ao exportar CSV: {e:#}"));
    }
}
