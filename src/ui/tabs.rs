use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_extras::{Column, TableBuilder};

use super::{panels, plot};
use crate::color::Theme;
use crate::config::DashboardConfig;
use crate::data::filter::FilteredView;
use crate::data::model::{format_date_br, DISPLAY_COLUMNS, REQUIRED_COLUMNS};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the banner, the tab bar and the active tab.
pub fn central_panel(
    ui: &mut Ui,
    state: &mut AppState,
    theme: &Theme,
    config: &DashboardConfig,
) {
    banner(ui, theme, config);

    if state.dataset.is_none() {
        welcome(ui);
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.active_tab {
            Tab::Details => details(ui, state, theme),
            tab => {
                let Some(view) = state.view() else {
                    return;
                };
                match tab {
                    Tab::Overview => overview(ui, &view, theme),
                    Tab::Categories => categories(ui, &view, theme, config.top_n),
                    Tab::Regional => regional(ui, &view, theme),
                    Tab::Community => community(ui, &view, theme),
                    Tab::Details => {}
                }
            }
        });
}

fn banner(ui: &mut Ui, theme: &Theme, config: &DashboardConfig) {
    egui::Frame::group(ui.style())
        .fill(theme.primary)
        .stroke(Stroke::new(2.0, theme.secondary))
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(
                    RichText::new(format!("⚡ {}", config.title))
                        .size(30.0)
                        .strong()
                        .color(Color32::WHITE),
                );
                ui.label(RichText::new(&config.subtitle).size(16.0).color(Color32::WHITE));
            });
        });
    ui.add_space(8.0);
}

fn welcome(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        ui.heading("👈 Faça o upload da planilha para começar");
        ui.label(
            "Carregue o arquivo Excel com os dados de acompanhamento do SESMT na barra lateral.",
        );
    });
    ui.add_space(20.0);
    egui::CollapsingHeader::new("📖 Estrutura esperada do arquivo")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label("A planilha deve conter as seguintes colunas:");
            for col in REQUIRED_COLUMNS {
                ui.label(format!("• {col}"));
            }
            ui.label("Colunas opcionais: Observações, Cargo.");
        });
}

// ---------------------------------------------------------------------------
// Tab: overview
// ---------------------------------------------------------------------------

fn overview(ui: &mut Ui, view: &FilteredView<'_>, theme: &Theme) {
    let kpis = view.kpis();
    let total = view.table().len();
    let delta = (kpis.actions != total)
        .then(|| format!("{} ações", kpis.actions as i64 - total as i64));

    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], theme, "Total de Ações", kpis.actions.to_string(), delta);
        metric(&mut cols[1], theme, "Pessoas Impactadas", fmt_thousands(kpis.people), None);
        metric(
            &mut cols[2],
            theme,
            "Média de Participantes",
            fmt_mean(kpis.mean_people, 0),
            None,
        );
    });
    ui.separator();

    let actions = view.count_by_month();
    let people = view.sum_people_by_month();
    ui.columns(2, |cols: &mut [Ui]| {
        plot::month_line(
            &mut cols[0],
            theme,
            "actions_by_month",
            "Evolução de Ações ao Longo do Tempo",
            &actions.iter().map(|m| m.month_label.clone()).collect::<Vec<_>>(),
            &actions.iter().map(|m| m.count as f64).collect::<Vec<_>>(),
        );
        plot::category_bars(
            &mut cols[1],
            theme,
            "people_by_month",
            "Pessoas Impactadas por Mês",
            &people.iter().map(|m| m.month_label.clone()).collect::<Vec<_>>(),
            &people.iter().map(|m| m.people as f64).collect::<Vec<_>>(),
            Some(theme.secondary),
        );
    });

    ui.separator();
    let types = view.count_by_type();
    plot::pie(
        ui,
        theme,
        "type_distribution",
        "Distribuição de Ações por Tipo",
        &types.iter().map(|t| t.action_type.clone()).collect::<Vec<_>>(),
        &types.iter().map(|t| t.count as f64).collect::<Vec<_>>(),
    );
}

// ---------------------------------------------------------------------------
// Tab: by category
// ---------------------------------------------------------------------------

fn categories(ui: &mut Ui, view: &FilteredView<'_>, theme: &Theme, top_n: usize) {
    ui.heading("📊 Performance por Tipo de Evento");

    let by_count = view.top_events_by_count(top_n);
    let by_people = view.top_events_by_people_impacted(top_n);
    ui.columns(2, |cols: &mut [Ui]| {
        plot::ranking_bars(
            &mut cols[0],
            theme,
            "top_events_count",
            &format!("Top {top_n} Eventos Mais Realizados"),
            &by_count.iter().map(|e| e.event.clone()).collect::<Vec<_>>(),
            &by_count.iter().map(|e| e.count as f64).collect::<Vec<_>>(),
        );
        plot::ranking_bars(
            &mut cols[1],
            theme,
            "top_events_people",
            &format!("Top {top_n} Eventos com Maior Alcance"),
            &by_people.iter().map(|e| e.event.clone()).collect::<Vec<_>>(),
            &by_people.iter().map(|e| e.people as f64).collect::<Vec<_>>(),
        );
    });

    ui.separator();
    ui.heading("📋 Tabela Resumo por Evento");
    let rows: Vec<Vec<String>> = view
        .summary_by_event()
        .into_iter()
        .map(|s| {
            vec![
                s.event,
                s.total_people.to_string(),
                format!("{:.1}", s.mean_people),
                s.actions.to_string(),
            ]
        })
        .collect();
    table(
        ui,
        "event_summary",
        &["Evento", "Total Pessoas", "Média Pessoas", "Qtd Ações"],
        &rows,
        400.0,
    );
}

// ---------------------------------------------------------------------------
// Tab: regional
// ---------------------------------------------------------------------------

fn regional(ui: &mut Ui, view: &FilteredView<'_>, theme: &Theme) {
    ui.heading("🗺 Comparativo Regional");

    let regions = view.by_region();
    ui.columns(3, |cols: &mut [Ui]| {
        for (idx, region) in regions.iter().enumerate() {
            let ui = &mut cols[idx % 3];
            egui::Frame::group(ui.style())
                .fill(theme.primary)
                .show(ui, |ui: &mut Ui| {
                    ui.set_min_width(ui.available_width());
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.label(
                            RichText::new(&region.contract)
                                .size(22.0)
                                .strong()
                                .color(theme.secondary),
                        );
                        ui.label(
                            RichText::new(format!("{} ações", region.actions))
                                .size(16.0)
                                .color(Color32::WHITE),
                        );
                        ui.label(
                            RichText::new(format!("{} pessoas", fmt_thousands(region.people)))
                                .size(16.0)
                                .color(Color32::WHITE),
                        );
                    });
                });
            ui.add_space(6.0);
        }
    });
    ui.separator();

    let labels: Vec<String> = regions.iter().map(|r| r.contract.clone()).collect();
    ui.columns(2, |cols: &mut [Ui]| {
        plot::category_bars(
            &mut cols[0],
            theme,
            "actions_by_region",
            "Ações Realizadas por Região",
            &labels,
            &regions.iter().map(|r| r.actions as f64).collect::<Vec<_>>(),
            None,
        );
        plot::category_bars(
            &mut cols[1],
            theme,
            "people_by_region",
            "Pessoas Impactadas por Região",
            &labels,
            &regions.iter().map(|r| r.people as f64).collect::<Vec<_>>(),
            None,
        );
    });

    ui.separator();
    ui.heading("👥 Performance por Colaborador e Região");
    let rows: Vec<Vec<String>> = view
        .by_collaborator_and_region()
        .into_iter()
        .map(|c| {
            vec![
                c.contract,
                c.collaborator,
                c.people.to_string(),
                c.actions.to_string(),
            ]
        })
        .collect();
    table(
        ui,
        "collaborator_summary",
        &["Contrato", "Colaborador", "Total Pessoas", "Qtd Ações"],
        &rows,
        400.0,
    );
}

// ---------------------------------------------------------------------------
// Tab: community actions
// ---------------------------------------------------------------------------

fn community(ui: &mut Ui, view: &FilteredView<'_>, theme: &Theme) {
    ui.heading("🤝 Impacto Comunitário");

    let subset = view.community_subset();
    if subset.records.is_empty() {
        ui.label("ℹ Nenhuma ação comunitária encontrada no período selecionado.");
        return;
    }

    ui.columns(3, |cols: &mut [Ui]| {
        metric(
            &mut cols[0],
            theme,
            "Ações Comunitárias",
            subset.kpis.actions.to_string(),
            None,
        );
        metric(
            &mut cols[1],
            theme,
            "Pessoas da Comunidade",
            fmt_thousands(subset.kpis.people),
            None,
        );
        metric(
            &mut cols[2],
            theme,
            "Média por Ação",
            fmt_mean(subset.kpis.mean_people, 0),
            None,
        );
    });
    ui.separator();

    let entries: Vec<_> = subset
        .records
        .iter()
        .map(|r| (r.date(), r.people_impacted, r.event.clone()))
        .collect();
    plot::timeline(
        ui,
        theme,
        "community_timeline",
        "Timeline de Ações Comunitárias",
        &entries,
    );

    ui.separator();
    ui.heading("📋 Detalhes das Ações Comunitárias");
    for (idx, record) in subset.records.iter().enumerate() {
        let header = format!("📍 {} - {}", format_date_br(record.date()), record.event);
        egui::CollapsingHeader::new(header)
            .id_salt(("community", idx))
            .show(ui, |ui: &mut Ui| {
                ui.columns(2, |cols: &mut [Ui]| {
                    cols[0].strong("Observações:");
                    cols[0].label(record.observations.as_str());
                    cols[1].label(format!("Pessoas Impactadas: {}", record.people_impacted));
                    cols[1].label(format!("Responsável: {}", record.collaborator));
                    cols[1].label(format!("Região: {}", record.contract));
                });
            });
    }
}

// ---------------------------------------------------------------------------
// Tab: detailed data
// ---------------------------------------------------------------------------

fn details(ui: &mut Ui, state: &mut AppState, theme: &Theme) {
    ui.heading("📋 Tabela Completa de Ações");

    if let Some(view) = state.view() {
        let counts = view.distinct_counts();
        ui.columns(4, |cols: &mut [Ui]| {
            metric(&mut cols[0], theme, "Total de Registros", view.len().to_string(), None);
            metric(&mut cols[1], theme, "Tipos Diferentes", counts.types.to_string(), None);
            metric(&mut cols[2], theme, "Eventos Diferentes", counts.events.to_string(), None);
            metric(&mut cols[3], theme, "Colaboradores", counts.collaborators.to_string(), None);
        });
    }
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        ui.label("🔍 Pesquisar na tabela");
        ui.text_edit_singleline(&mut state.search_text);
    });

    let mut export_error = None;
    if let Some(view) = state.searched_view() {
        let rows: Vec<[String; 7]> = view.records().map(|r| r.display_cells()).collect();
        table(ui, "detail_table", &DISPLAY_COLUMNS, &rows, 600.0);

        ui.add_space(8.0);
        if ui.button("📥 Baixar dados filtrados (CSV)").clicked() {
            if let Some(Err(e)) = panels::save_csv_dialog(&view) {
                export_error = Some(e);
            }
        }
    }
    if let Some(e) = export_error {
        log::error!("CSV export failed: {e:#}");
        state.status_message = Some(format!("Erro ao exportar CSV: {e:#}"));
    }
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

fn metric(ui: &mut Ui, theme: &Theme, label: &str, value: String, delta: Option<String>) {
    egui::Frame::group(ui.style())
        .stroke(Stroke::new(2.0, theme.secondary))
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(label).strong().color(theme.text));
            ui.label(RichText::new(value).size(28.0).strong().color(theme.secondary));
            if let Some(delta) = delta {
                ui.label(RichText::new(delta).small().color(theme.text));
            }
        });
}

/// Striped, resizable table; the last column takes the remaining width.
fn table<R: AsRef<[String]>>(
    ui: &mut Ui,
    id: &str,
    headers: &[&str],
    rows: &[R],
    max_height: f32,
) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(max_height)
            .columns(Column::auto().at_least(80.0), headers.len().saturating_sub(1))
            .column(Column::remainder())
            .header(24.0, |mut header| {
                for h in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, rows.len(), |mut row| {
                    let cells = rows[row.index()].as_ref();
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell.as_str());
                        });
                    }
                });
            });
    });
}

/// `1234567` → `1.234.567`.
fn fmt_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn fmt_mean(mean: Option<f64>, decimals: usize) -> String {
    match mean {
        Some(m) => format!("{m:.decimals$}"),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_use_dots() {
        assert_eq!(fmt_thousands(0), "0");
        assert_eq!(fmt_thousands(999), "999");
        assert_eq!(fmt_thousands(1000), "1.000");
        assert_eq!(fmt_thousands(1234567), "1.234.567");
    }

    #[test]
    fn mean_of_empty_view_is_a_dash() {
        assert_eq!(fmt_mean(None, 0), "—");
        assert_eq!(fmt_mean(Some(14.6), 0), "15");
    }
}
