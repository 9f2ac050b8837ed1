use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
}

impl ExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: search, options, selected planet ----
        egui::SidePanel::left("detail_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table and plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.catalog.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("No catalog loaded  (File → Open catalog…  or  ⟳ Refresh)");
                });
                return;
            }

            ui.heading("🔍 Exoplanet Dataset with Habitability Score");
            let table_height = (ui.available_height() * 0.4).max(120.0);
            table::planet_table(ui, &mut self.state, table_height);

            ui.separator();

            ui.columns(2, |columns| {
                plot::facility_scatter(&mut columns[0], &self.state);
                plot::habitability_scatter(&mut columns[1], &self.state);
            });
        });
    }
}
