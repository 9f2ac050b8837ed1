use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::habitability::score::{score, HabitabilityScores, ScoringPolicy};

// ---------------------------------------------------------------------------
// CellValue – a single raw cell before it is bound to a Record field
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from CSV / JSON / Parquet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Non-finite floats count as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer view; whole-valued floats (`2016.0`) are accepted.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            CellValue::Integer(i) => i32::try_from(*i).ok(),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => {
                i32::try_from(*v as i64).ok()
            }
            _ => None,
        }
    }

    /// Text view. Empty strings count as missing.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(v) if v.is_finite() => Some(v.to_string()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column – the nine catalog fields and their accepted header names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    PlanetName,
    HostName,
    DiscoveryYear,
    PlanetRadius,
    PlanetMass,
    EquilibriumTemp,
    StarTemp,
    StarMass,
    DiscoveryFacility,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::PlanetName,
        Column::HostName,
        Column::DiscoveryYear,
        Column::PlanetRadius,
        Column::PlanetMass,
        Column::EquilibriumTemp,
        Column::StarTemp,
        Column::StarMass,
        Column::DiscoveryFacility,
    ];

    /// Header name used in our own files and reports.
    pub fn canonical(self) -> &'static str {
        match self {
            Column::PlanetName => "planet_name",
            Column::HostName => "host_name",
            Column::DiscoveryYear => "discovery_year",
            Column::PlanetRadius => "planet_radius",
            Column::PlanetMass => "planet_mass",
            Column::EquilibriumTemp => "equilibrium_temp",
            Column::StarTemp => "star_temp",
            Column::StarMass => "star_mass",
            Column::DiscoveryFacility => "discovery_facility",
        }
    }

    /// Header name used by the NASA Exoplanet Archive.
    pub fn archive(self) -> &'static str {
        match self {
            Column::PlanetName => "pl_name",
            Column::HostName => "hostname",
            Column::DiscoveryYear => "disc_year",
            Column::PlanetRadius => "pl_rade",
            Column::PlanetMass => "pl_masse",
            Column::EquilibriumTemp => "pl_eqt",
            Column::StarTemp => "st_teff",
            Column::StarMass => "st_mass",
            Column::DiscoveryFacility => "disc_facility",
        }
    }

    /// Resolve a header (either naming scheme, case-insensitive).
    pub fn from_header(header: &str) -> Option<Column> {
        let h = header.trim();
        Column::ALL.into_iter().find(|c| {
            c.canonical().eq_ignore_ascii_case(h) || c.archive().eq_ignore_ascii_case(h)
        })
    }

    /// Identity columns, read verbatim rather than type-guessed.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            Column::PlanetName | Column::HostName | Column::DiscoveryFacility
        )
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the catalog
// ---------------------------------------------------------------------------

/// One planet / host-star observation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Record {
    pub planet_name: String,
    pub host_name: Option<String>,
    pub discovery_year: Option<i32>,
    /// Earth radii.
    pub planet_radius: Option<f64>,
    /// Earth masses.
    pub planet_mass: Option<f64>,
    /// Kelvin.
    pub equilibrium_temp: Option<f64>,
    /// Host star effective temperature, Kelvin.
    pub star_temp: Option<f64>,
    /// Solar masses.
    pub star_mass: Option<f64>,
    pub discovery_facility: Option<String>,
}

impl Record {
    /// Bind raw cells to fields. `cell` returns `None` for columns the
    /// source table does not have, which reads the same as a null cell.
    pub fn from_cells<'a>(cell: impl Fn(Column) -> Option<&'a CellValue>) -> Self {
        let text = |c| cell(c).and_then(CellValue::as_text);
        let num = |c| cell(c).and_then(CellValue::as_f64);
        Record {
            planet_name: text(Column::PlanetName).unwrap_or_default(),
            host_name: text(Column::HostName),
            discovery_year: cell(Column::DiscoveryYear).and_then(CellValue::as_i32),
            planet_radius: num(Column::PlanetRadius),
            planet_mass: num(Column::PlanetMass),
            equilibrium_temp: num(Column::EquilibriumTemp),
            star_temp: num(Column::StarTemp),
            star_mass: num(Column::StarMass),
            discovery_facility: text(Column::DiscoveryFacility),
        }
    }
}

// ---------------------------------------------------------------------------
// ScoredRecord / ScoredCatalog
// ---------------------------------------------------------------------------

/// A record together with its derived habitability scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: Record,
    #[serde(flatten)]
    pub scores: HabitabilityScores,
}

impl ScoredRecord {
    pub fn new(record: Record, policy: &ScoringPolicy) -> Self {
        let scores = score(&record, policy);
        ScoredRecord { record, scores }
    }

    pub fn habitability(&self) -> u8 {
        self.scores.habitability
    }
}

/// The scored table plus the facility index used for colouring.
#[derive(Debug, Clone, Default)]
pub struct ScoredCatalog {
    /// Rows in source order.
    pub records: Vec<ScoredRecord>,
    /// Sorted set of discovery facilities (missing values excluded).
    pub facilities: BTreeSet<String>,
}

impl ScoredCatalog {
    /// Score every record with `policy`.
    pub fn from_records(records: &[Record], policy: &ScoringPolicy) -> Self {
        let records: Vec<ScoredRecord> = records
            .iter()
            .map(|r| ScoredRecord::new(r.clone(), policy))
            .collect();
        let facilities = records
            .iter()
            .filter_map(|r| r.record.discovery_facility.clone())
            .collect();
        ScoredCatalog {
            records,
            facilities,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
