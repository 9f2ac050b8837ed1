use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Plot, PlotPoint, PlotPoints, Points};

use crate::color::habitability_color;
use crate::data::model::{ScoredCatalog, ScoredRecord};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Planet size vs temperature scatter plots (central panel, bottom)
// ---------------------------------------------------------------------------

const UNKNOWN_FACILITY: &str = "Unknown facility";
const X_LABEL: &str = "Equilibrium Temperature (K)";
const Y_LABEL: &str = "Planet Radius (Earth radii)";

/// A plottable planet: temperature on x, radius on y.
struct Marker {
    x: f64,
    y: f64,
    name: String,
}

fn marker(rec: &ScoredRecord) -> Option<Marker> {
    Some(Marker {
        x: rec.record.equilibrium_temp?,
        y: rec.record.planet_radius?,
        name: rec.record.planet_name.clone(),
    })
}

/// Hover text: the planet under the cursor, if the hovered point is one.
fn hover_label(markers: &[Marker], series: &str, value: &PlotPoint) -> String {
    let planet = markers
        .iter()
        .find(|m| m.x == value.x && m.y == value.y)
        .map(|m| m.name.as_str());
    match planet {
        Some(name) => format!("{name}\n{series}\n{:.0} K, {:.2} R⊕", value.x, value.y),
        None => format!("{:.0} K, {:.2} R⊕", value.x, value.y),
    }
}

fn all_markers(catalog: &ScoredCatalog) -> Vec<Marker> {
    catalog.records.iter().filter_map(marker).collect()
}

/// Scatter coloured by discovery facility.
pub fn facility_scatter(ui: &mut Ui, state: &AppState) {
    let Some(catalog) = &state.catalog else {
        return;
    };
    ui.strong("Planet Size vs Temperature");

    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for rec in &catalog.records {
        let Some(m) = marker(rec) else { continue };
        let facility = rec
            .record
            .discovery_facility
            .as_deref()
            .unwrap_or(UNKNOWN_FACILITY);
        groups.entry(facility).or_default().push([m.x, m.y]);
    }

    let colors = state.facility_colors.as_ref();
    let markers = all_markers(catalog);
    Plot::new("facility_scatter")
        .legend(Legend::default())
        .x_axis_label(X_LABEL)
        .y_axis_label(Y_LABEL)
        .allow_boxed_zoom(true)
        .label_formatter(move |series, value| hover_label(&markers, series, value))
        .show(ui, |plot_ui| {
            for (facility, points) in groups {
                let color = colors
                    .map(|c| c.color_for(Some(facility)))
                    .unwrap_or(Color32::GRAY);
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(facility)
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}

/// Decile bucket of a score; 100 gets its own bucket.
fn bucket(habitability: u8) -> u8 {
    habitability.min(100) / 10
}

fn bucket_name(bucket: u8) -> String {
    if bucket >= 10 {
        "100".to_string()
    } else {
        format!("{}–{}", bucket * 10, bucket * 10 + 9)
    }
}

/// Scatter coloured by habitability score.
pub fn habitability_scatter(ui: &mut Ui, state: &AppState) {
    let Some(catalog) = &state.catalog else {
        return;
    };
    ui.strong("Planet Size vs Temperature (Colored by Habitability)");

    let mut groups: BTreeMap<u8, Vec<[f64; 2]>> = BTreeMap::new();
    for rec in &catalog.records {
        let Some(m) = marker(rec) else { continue };
        groups
            .entry(bucket(rec.habitability()))
            .or_default()
            .push([m.x, m.y]);
    }

    let markers = all_markers(catalog);
    Plot::new("habitability_scatter")
        .legend(Legend::default())
        .x_axis_label(X_LABEL)
        .y_axis_label(Y_LABEL)
        .allow_boxed_zoom(true)
        .label_formatter(move |series, value| hover_label(&markers, series, value))
        .show(ui, |plot_ui| {
            // Highest scores first so the legend reads top-down.
            for (b, points) in groups.into_iter().rev() {
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(bucket_name(b))
                        .color(habitability_color(b * 10))
                        .radius(2.5),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use crate::habitability::score::ScoringPolicy;

    #[test]
    fn buckets_by_decile() {
        assert_eq!(bucket(0), 0);
        assert_eq!(bucket(79), 7);
        assert_eq!(bucket(100), 10);
        assert_eq!(bucket_name(7), "70–79");
        assert_eq!(bucket_name(10), "100");
    }

    #[test]
    fn only_planets_with_both_axes_are_plotted() {
        let records = vec![
            Record {
                planet_name: "both".into(),
                equilibrium_temp: Some(300.0),
                planet_radius: Some(1.0),
                ..Default::default()
            },
            Record {
                planet_name: "no radius".into(),
                equilibrium_temp: Some(300.0),
                ..Default::default()
            },
        ];
        let catalog = ScoredCatalog::from_records(&records, &ScoringPolicy::default());
        let markers = all_markers(&catalog);
        assert_eq!(markers.len(), 1);
        let label = hover_label(&markers, "Kepler", &PlotPoint::new(300.0, 1.0));
        assert!(label.starts_with("both\nKepler"));
    }
}
