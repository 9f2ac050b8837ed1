use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::model::ScoredRecord;
use crate::habitability::molecule::MoleculeLabel;
use crate::habitability::resources::MoleculeResource;

// ---------------------------------------------------------------------------
// Single-planet report
// ---------------------------------------------------------------------------

/// Everything an exported report shows about one planet. Built from an
/// already scored record; nothing is recomputed here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetReport {
    pub planet_name: String,
    pub host_name: Option<String>,
    pub discovery_year: Option<i32>,
    pub discovery_facility: Option<String>,
    pub equilibrium_temp: Option<f64>,
    pub planet_radius: Option<f64>,
    pub star_temp: Option<f64>,
    pub temperature_score: f64,
    pub radius_score: f64,
    pub star_score: f64,
    pub atmosphere_score: f64,
    pub habitability: u8,
    pub molecule: MoleculeLabel,
    pub molecule_name: Option<String>,
    pub structure: Option<String>,
}

impl PlanetReport {
    pub fn new(
        scored: &ScoredRecord,
        molecule: MoleculeLabel,
        resource: Option<&MoleculeResource>,
    ) -> Self {
        let r = &scored.record;
        let s = &scored.scores;
        PlanetReport {
            planet_name: r.planet_name.clone(),
            host_name: r.host_name.clone(),
            discovery_year: r.discovery_year,
            discovery_facility: r.discovery_facility.clone(),
            equilibrium_temp: r.equilibrium_temp,
            planet_radius: r.planet_radius,
            star_temp: r.star_temp,
            temperature_score: s.temperature_score,
            radius_score: s.radius_score,
            star_score: s.star_score,
            atmosphere_score: s.atmosphere_score,
            habitability: s.habitability,
            molecule,
            molecule_name: resource.map(|m| m.name.clone()),
            structure: resource.and_then(|m| m.structure.clone()),
        }
    }

    /// Plain-text rendering.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialising report")
    }
}

impl fmt::Display for PlanetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AstroBioChem Explorer Report")?;
        writeln!(f, "============================")?;
        writeln!(f)?;
        writeln!(f, "Planet:              {}", self.planet_name)?;
        writeln!(f, "Host star:           {}", or_na(&self.host_name))?;
        writeln!(f, "Discovery year:      {}", or_na(&self.discovery_year))?;
        writeln!(f, "Discovery facility:  {}", or_na(&self.discovery_facility))?;
        writeln!(f, "Temperature:         {}", unit(self.equilibrium_temp, "K", 1))?;
        writeln!(f, "Radius:              {}", unit(self.planet_radius, "Earth radii", 2))?;
        writeln!(f, "Star temperature:    {}", unit(self.star_temp, "K", 0))?;
        writeln!(f)?;
        writeln!(f, "Habitability score:  {}/100", self.habitability)?;
        writeln!(f, "  temperature        {:.1}", self.temperature_score)?;
        writeln!(f, "  radius             {:.1}", self.radius_score)?;
        writeln!(f, "  host star          {:.1}", self.star_score)?;
        writeln!(f, "  atmosphere         {:.1}", self.atmosphere_score)?;
        writeln!(f)?;
        write!(f, "Suggested molecule:  {}", self.molecule)?;
        if let Some(name) = &self.molecule_name {
            write!(f, " ({name})")?;
        }
        writeln!(f)?;
        if let Some(pdb) = &self.structure {
            writeln!(f, "PDB structure:       {pdb}")?;
        }
        Ok(())
    }
}

fn or_na<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "n/a".to_string())
}

fn unit(value: Option<f64>, suffix: &str, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$} {suffix}"),
        None => "n/a".to_string(),
    }
}

/// Write a report, picking the format from the extension (`.json` or text).
pub fn write_report(path: &Path, report: &PlanetReport) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let contents = match ext.as_str() {
        "json" => report.to_json()?,
        _ => report.to_text(),
    };
    std::fs::write(path, contents)
        .with_context(|| format!("writing report to {}", path.display()))?;
    log::info!("Wrote report for {} to {}", report.planet_name, path.display());
    Ok(())
}
