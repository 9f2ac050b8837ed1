use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::habitability::molecule::RulePreset;
use crate::habitability::score::StarPolicy;
use crate::state::AppState;

const SCORE_EXPLANATION: &str = "Score (0–100) based on:
• Temperature: 250–350 K → good
• Planet radius: 0.5–2.0 Earth radii → rocky & habitable
• Stellar type: G, K, quiet M → better
• Atmosphere: H₂O / CO₂ presence → bonus points (not yet scored)

Simple sum of the factors, capped at 100.";

// ---------------------------------------------------------------------------
// Left side panel – search, scoring options, selected planet
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🧪 Habitability Score");
    ui.label(SCORE_EXPLANATION);
    ui.separator();

    ui.strong("Search by planet or star name");
    let mut search = state.search.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut search)
            .hint_text("e.g. TRAPPIST")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        state.set_search(search);
    }
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            scoring_options(ui, state);
            ui.separator();
            planet_details(ui, state);
            ui.separator();
            molecule_details(ui, state);
        });
}

fn scoring_options(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Star temperature rule");
    let current = state.scoring.star_policy;
    egui::ComboBox::from_id_salt("star_policy")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for policy in StarPolicy::ALL {
                if ui.selectable_label(current == policy, policy.label()).clicked() {
                    state.set_star_policy(policy);
                }
            }
        });

    ui.strong("Molecule rules");
    let current = state.rule_preset;
    let current_text = current.map_or("Custom (config file)", RulePreset::label);
    egui::ComboBox::from_id_salt("rule_preset")
        .selected_text(current_text)
        .show_ui(ui, |ui: &mut Ui| {
            for preset in RulePreset::ALL {
                if ui
                    .selectable_label(current == Some(preset), preset.label())
                    .clicked()
                {
                    state.set_rule_preset(preset);
                }
            }
        });
}

fn metric_row(ui: &mut Ui, name: &str, value: String) {
    ui.label(name);
    ui.label(value);
    ui.end_row();
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string())
}

fn planet_details(ui: &mut Ui, state: &AppState) {
    let Some(scored) = state.selected_record() else {
        ui.label("Select a planet in the table.");
        return;
    };
    let rec = &scored.record;
    let s = &scored.scores;

    ui.heading(&rec.planet_name);
    ui.label(RichText::new(format!("Habitability {}/100", s.habitability)).strong());

    egui::Grid::new("planet_metrics")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            metric_row(ui, "Host star", or_dash(rec.host_name.as_deref()));
            metric_row(ui, "Discovered", or_dash(rec.discovery_year));
            metric_row(ui, "Facility", or_dash(rec.discovery_facility.as_deref()));
            metric_row(
                ui,
                "Temperature",
                or_dash(rec.equilibrium_temp.map(|t| format!("{t:.0} K"))),
            );
            metric_row(
                ui,
                "Radius",
                or_dash(rec.planet_radius.map(|r| format!("{r:.2} R⊕"))),
            );
            metric_row(
                ui,
                "Mass",
                or_dash(rec.planet_mass.map(|m| format!("{m:.2} M⊕"))),
            );
            metric_row(
                ui,
                "Star temperature",
                or_dash(rec.star_temp.map(|t| format!("{t:.0} K"))),
            );
            metric_row(ui, "Temperature score", format!("{:.1}", s.temperature_score));
            metric_row(ui, "Radius score", format!("{:.1}", s.radius_score));
            metric_row(ui, "Star score", format!("{:.1}", s.star_score));
            metric_row(ui, "Atmosphere score", format!("{:.1}", s.atmosphere_score));
        });
}

fn molecule_details(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.molecule else {
        return;
    };
    ui.strong(format!("🧬 Suggested molecule: {}", view.label));

    if let Some(resource) = &view.resolved.resource {
        ui.label(RichText::new(&resource.name).heading());
        if !resource.description.is_empty() {
            ui.label(&resource.description);
        }
        if let Some(path) = &view.resolved.image_path {
            ui.add(
                egui::Image::new(format!("file://{}", path.display()))
                    .max_width(ui.available_width())
                    .max_height(180.0),
            );
        }
        if let (Some(id), Some(url)) = (&resource.structure, resource.structure_url()) {
            ui.hyperlink_to(format!("3D structure {id} (RCSB PDB)"), url);
        }
    }

    for warning in &view.resolved.warnings {
        ui.label(RichText::new(format!("⚠ {warning}")).color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open catalog…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.selected.is_some(), egui::Button::new("Export report…"))
                .clicked()
            {
                export_report_dialog(state);
                ui.close_menu();
            }
        });

        if ui
            .button("⟳ Refresh")
            .on_hover_text("Drop the cached catalog and fetch it again")
            .clicked()
        {
            state.refresh();
        }

        ui.separator();

        if let Some(catalog) = &state.catalog {
            ui.label(format!(
                "{} planets loaded, {} shown",
                catalog.len(),
                state.visible_indices.len()
            ));
            ui.separator();
        }

        ui.label(format!("Source: {}", state.source.describe()));

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open exoplanet catalog")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}

fn report_file_name(planet: &str) -> String {
    let stem: String = planet
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}_report.txt")
}

pub fn export_report_dialog(state: &mut AppState) {
    let Some(planet) = state.selected_record().map(|r| r.record.planet_name.clone()) else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export planet report")
        .set_file_name(report_file_name(&planet))
        .add_filter("Text", &["txt"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_report(&path) {
            log::error!("Failed to export report: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_names_are_filesystem_safe() {
        assert_eq!(report_file_name("TRAPPIST-1 e"), "TRAPPIST_1_e_report.txt");
        assert_eq!(or_dash::<i32>(None), "—");
        assert_eq!(or_dash(Some(2017)), "2017");
    }
}
