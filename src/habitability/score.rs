use serde::{Deserialize, Serialize};

use crate::data::model::Record;

// ---------------------------------------------------------------------------
// Weights and ideal bands
// ---------------------------------------------------------------------------

pub const TEMPERATURE_WEIGHT: f64 = 30.0;
pub const RADIUS_WEIGHT: f64 = 30.0;
pub const STAR_WEIGHT: f64 = 20.0;
pub const MAX_HABITABILITY: f64 = 100.0;

/// Ideal equilibrium temperature band, Kelvin (inclusive).
pub const IDEAL_TEMPERATURE: (f64, f64) = (250.0, 350.0);
const TEMPERATURE_CENTER: f64 = 300.0;
/// Kelvin of deviation per lost point.
const TEMPERATURE_FALLOFF: f64 = 5.0;

/// Ideal planet radius band, Earth radii (inclusive).
pub const IDEAL_RADIUS: (f64, f64) = (0.5, 2.0);
const RADIUS_CENTER: f64 = 1.25;
/// Points lost per Earth radius of deviation.
const RADIUS_FALLOFF: f64 = 15.0;

/// Host star band covering K, quiet M and G stars (inclusive).
pub const IDEAL_STAR_TEMPERATURE: (f64, f64) = (3700.0, 6000.0);
/// Boundary between the K/M and G sub-bands of [`StarPolicy::SplitBands`].
const STAR_SPLIT: f64 = 5200.0;
const STAR_PARTIAL_CREDIT: f64 = 10.0;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// How the host star temperature is rewarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarPolicy {
    /// 20 inside [3700, 6000] K, 10 for any other known temperature.
    #[default]
    Contiguous,
    /// 20 inside [3700, 5200] or (5200, 6000] K, nothing elsewhere.
    SplitBands,
}

impl StarPolicy {
    pub const ALL: [StarPolicy; 2] = [StarPolicy::Contiguous, StarPolicy::SplitBands];

    pub fn label(self) -> &'static str {
        match self {
            StarPolicy::Contiguous => "Contiguous band (partial credit)",
            StarPolicy::SplitBands => "K/M + G bands (no partial credit)",
        }
    }
}

/// Tunable parameters of the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub star_policy: StarPolicy,
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Sub-scores and the combined 0–100 habitability score of one record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HabitabilityScores {
    pub temperature_score: f64,
    pub radius_score: f64,
    pub star_score: f64,
    /// Placeholder factor, always 0 for now.
    pub atmosphere_score: f64,
    pub habitability: u8,
}

/// Score one record. Total over every input: missing or non-finite fields
/// contribute nothing.
pub fn score(record: &Record, policy: &ScoringPolicy) -> HabitabilityScores {
    let temperature_score = temperature_term(record.equilibrium_temp);
    let radius_score = radius_term(record.planet_radius);
    let star_score = star_term(record.star_temp, policy.star_policy);
    let atmosphere_score = atmosphere_term(record);

    let total = temperature_score + radius_score + star_score + atmosphere_score;
    let habitability = total.clamp(0.0, MAX_HABITABILITY).round() as u8;

    HabitabilityScores {
        temperature_score,
        radius_score,
        star_score,
        atmosphere_score,
        habitability,
    }
}

fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn within(value: f64, (lo, hi): (f64, f64)) -> bool {
    lo <= value && value <= hi
}

fn temperature_term(equilibrium_temp: Option<f64>) -> f64 {
    let Some(t) = known(equilibrium_temp) else {
        return 0.0;
    };
    if within(t, IDEAL_TEMPERATURE) {
        TEMPERATURE_WEIGHT
    } else {
        (TEMPERATURE_WEIGHT - (t - TEMPERATURE_CENTER).abs() / TEMPERATURE_FALLOFF).max(0.0)
    }
}

fn radius_term(planet_radius: Option<f64>) -> f64 {
    let Some(r) = known(planet_radius) else {
        return 0.0;
    };
    if within(r, IDEAL_RADIUS) {
        RADIUS_WEIGHT
    } else {
        (RADIUS_WEIGHT - (r - RADIUS_CENTER).abs() * RADIUS_FALLOFF).max(0.0)
    }
}

fn star_term(star_temp: Option<f64>, policy: StarPolicy) -> f64 {
    let Some(t) = known(star_temp) else {
        return 0.0;
    };
    match policy {
        StarPolicy::Contiguous => {
            if within(t, IDEAL_STAR_TEMPERATURE) {
                STAR_WEIGHT
            } else {
                STAR_PARTIAL_CREDIT
            }
        }
        StarPolicy::SplitBands => {
            let (lo, hi) = IDEAL_STAR_TEMPERATURE;
            if within(t, (lo, STAR_SPLIT)) || (STAR_SPLIT < t && t <= hi) {
                STAR_WEIGHT
            } else {
                0.0
            }
        }
    }
}

// Atmosphere composition (H2O / CO2) is not in the catalog yet.
fn atmosphere_term(_record: &Record) -> f64 {
    0.0
}
