use eframe::egui;

use crate::color::Theme;
use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SesmtDashboardApp {
    pub state: AppState,
    config: DashboardConfig,
    theme: Theme,
}

impl SesmtDashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig, theme: Theme) -> Self {
        let mut visuals = egui::Visuals::light();
        visuals.selection.bg_fill = theme.secondary;
        visuals.hyperlink_color = theme.secondary;
        visuals.panel_fill = theme.background;
        visuals.override_text_color = Some(theme.text);
        cc.egui_ctx.set_visuals(visuals);

        Self {
            state: AppState::default(),
            config,
            theme,
        }
    }
}

impl eframe::App for SesmtDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: upload and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: banner and tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            tabs::central_panel(ui, &mut self.state, &self.theme, &self.config);
        });
    }
}
