use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::habitability_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Scored planet table (central panel, top)
// ---------------------------------------------------------------------------

const HEADERS: [&str; 8] = [
    "Planet",
    "Host",
    "Year",
    "T_eq (K)",
    "Radius (R⊕)",
    "Star T (K)",
    "Facility",
    "Habitability",
];

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "—".to_string())
}

/// Render the visible rows, best score first. Clicking a row selects it.
pub fn planet_table(ui: &mut Ui, state: &mut AppState, max_height: f32) {
    let Some(catalog) = &state.catalog else {
        return;
    };
    let records = &catalog.records;
    let indices = &state.visible_indices;
    let selected = state.selected;
    let mut clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto().at_least(120.0).clip(true))
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .max_scroll_height(max_height)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, indices.len(), |mut row| {
                let idx = indices[row.index()];
                let rec = &records[idx].record;
                let habitability = records[idx].habitability();

                row.set_selected(selected == Some(idx));
                row.col(|ui| {
                    ui.label(&rec.planet_name);
                });
                row.col(|ui| {
                    ui.label(rec.host_name.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.label(
                        rec.discovery_year
                            .map(|y| y.to_string())
                            .unwrap_or_else(|| "—".into()),
                    );
                });
                row.col(|ui| {
                    ui.label(fmt_opt(rec.equilibrium_temp, 0));
                });
                row.col(|ui| {
                    ui.label(fmt_opt(rec.planet_radius, 2));
                });
                row.col(|ui| {
                    ui.label(fmt_opt(rec.star_temp, 0));
                });
                row.col(|ui| {
                    ui.label(rec.discovery_facility.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.add(
                        egui::ProgressBar::new(f32::from(habitability) / 100.0)
                            .text(habitability.to_string())
                            .fill(habitability_color(habitability)),
                    );
                });

                if row.response().clicked() {
                    clicked = Some(idx);
                }
            });
        });

    if let Some(idx) = clicked {
        state.select(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(fmt_opt(None, 2), "—");
        assert_eq!(fmt_opt(Some(1.234), 2), "1.23");
        assert_eq!(fmt_opt(Some(254.6), 0), "255");
    }
}
