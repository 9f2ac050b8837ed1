use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::model::ScoredRecord;

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Illustrative biomolecule chosen for a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoleculeLabel {
    Antifreeze,
    Rubisco,
    Sod,
    Lysozyme,
    ColdLowTempStar,
    LowHabitability,
    ModerateHighHabitability,
}

impl MoleculeLabel {
    pub const ALL: [MoleculeLabel; 7] = [
        MoleculeLabel::Antifreeze,
        MoleculeLabel::Rubisco,
        MoleculeLabel::Sod,
        MoleculeLabel::Lysozyme,
        MoleculeLabel::ColdLowTempStar,
        MoleculeLabel::LowHabitability,
        MoleculeLabel::ModerateHighHabitability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MoleculeLabel::Antifreeze => "antifreeze",
            MoleculeLabel::Rubisco => "rubisco",
            MoleculeLabel::Sod => "sod",
            MoleculeLabel::Lysozyme => "lysozyme",
            MoleculeLabel::ColdLowTempStar => "cold_low_temp_star",
            MoleculeLabel::LowHabitability => "low_habitability",
            MoleculeLabel::ModerateHighHabitability => "moderate_high_habitability",
        }
    }
}

impl fmt::Display for MoleculeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// A scored-record field a rule can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EquilibriumTemp,
    StarTemp,
    PlanetRadius,
    Habitability,
}

impl Field {
    fn value(self, scored: &ScoredRecord) -> Option<f64> {
        let value = match self {
            Field::EquilibriumTemp => scored.record.equilibrium_temp,
            Field::StarTemp => scored.record.star_temp,
            Field::PlanetRadius => scored.record.planet_radius,
            Field::Habitability => Some(f64::from(scored.scores.habitability)),
        };
        value.filter(|v| v.is_finite())
    }
}

/// Condition over one field. A missing field never satisfies a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    LessThan {
        field: Field,
        value: f64,
    },
    GreaterThan {
        field: Field,
        value: f64,
    },
    /// `min <= x <= max`, or `min < x <= max` with `min_exclusive`.
    Between {
        field: Field,
        min: f64,
        max: f64,
        #[serde(default)]
        min_exclusive: bool,
    },
}

impl Predicate {
    pub fn matches(&self, scored: &ScoredRecord) -> bool {
        match *self {
            Predicate::LessThan { field, value } => {
                field.value(scored).is_some_and(|x| x < value)
            }
            Predicate::GreaterThan { field, value } => {
                field.value(scored).is_some_and(|x| x > value)
            }
            Predicate::Between {
                field,
                min,
                max,
                min_exclusive,
            } => field.value(scored).is_some_and(|x| {
                let above = if min_exclusive { x > min } else { x >= min };
                above && x <= max
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule sets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub when: Predicate,
    pub label: MoleculeLabel,
}

impl Rule {
    pub fn new(when: Predicate, label: MoleculeLabel) -> Self {
        Rule { when, label }
    }
}

/// Built-in rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePreset {
    #[default]
    FourLabel,
    SevenLabel,
}

impl RulePreset {
    pub const ALL: [RulePreset; 2] = [RulePreset::FourLabel, RulePreset::SevenLabel];

    pub fn label(self) -> &'static str {
        match self {
            RulePreset::FourLabel => "4 molecules",
            RulePreset::SevenLabel => "7 molecules",
        }
    }

    pub fn rule_set(self) -> RuleSet {
        match self {
            RulePreset::FourLabel => RuleSet::four_label(),
            RulePreset::SevenLabel => RuleSet::seven_label(),
        }
    }
}

/// Ordered `(predicate, label)` table; the first matching rule wins and
/// `fallback` applies when none does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    pub fallback: MoleculeLabel,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::four_label()
    }
}

impl RuleSet {
    pub fn four_label() -> Self {
        RuleSet {
            rules: Self::base_rules(),
            fallback: MoleculeLabel::Lysozyme,
        }
    }

    pub fn seven_label() -> Self {
        let mut rules = Self::base_rules();
        rules.extend([
            Rule::new(
                Predicate::Between {
                    field: Field::StarTemp,
                    min: 3000.0,
                    max: 3700.0,
                    min_exclusive: false,
                },
                MoleculeLabel::ColdLowTempStar,
            ),
            Rule::new(
                Predicate::Between {
                    field: Field::Habitability,
                    min: 0.0,
                    max: 40.0,
                    min_exclusive: false,
                },
                MoleculeLabel::LowHabitability,
            ),
            Rule::new(
                Predicate::Between {
                    field: Field::Habitability,
                    min: 60.0,
                    max: 80.0,
                    min_exclusive: true,
                },
                MoleculeLabel::ModerateHighHabitability,
            ),
        ]);
        RuleSet {
            rules,
            fallback: MoleculeLabel::Lysozyme,
        }
    }

    fn base_rules() -> Vec<Rule> {
        vec![
            Rule::new(
                Predicate::LessThan {
                    field: Field::EquilibriumTemp,
                    value: 250.0,
                },
                MoleculeLabel::Antifreeze,
            ),
            Rule::new(
                Predicate::GreaterThan {
                    field: Field::Habitability,
                    value: 80.0,
                },
                MoleculeLabel::Rubisco,
            ),
            Rule::new(
                Predicate::GreaterThan {
                    field: Field::StarTemp,
                    value: 6000.0,
                },
                MoleculeLabel::Sod,
            ),
        ]
    }

    /// Pick the label for one scored record.
    pub fn classify(&self, scored: &ScoredRecord) -> MoleculeLabel {
        self.rules
            .iter()
            .find(|rule| rule.when.matches(scored))
            .map(|rule| rule.label)
            .unwrap_or(self.fallback)
    }
}

/// Classify with the given rule set.
pub fn classify(scored: &ScoredRecord, rules: &RuleSet) -> MoleculeLabel {
    rules.classify(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use crate::habitability::score::HabitabilityScores;

    fn scored(temp: Option<f64>, star: Option<f64>, habitability: u8) -> ScoredRecord {
        ScoredRecord {
            record: Record {
                planet_name: "test".into(),
                equilibrium_temp: temp,
                star_temp: star,
                ..Default::default()
            },
            scores: HabitabilityScores {
                habitability,
                ..Default::default()
            },
        }
    }

    #[test]
    fn four_label_chain() {
        let rules = RuleSet::four_label();
        assert_eq!(
            classify(&scored(Some(180.0), Some(5000.0), 30), &rules),
            MoleculeLabel::Antifreeze
        );
        assert_eq!(
            classify(&scored(Some(290.0), Some(5000.0), 85), &rules),
            MoleculeLabel::Rubisco
        );
        assert_eq!(
            classify(&scored(Some(290.0), Some(6500.0), 70), &rules),
            MoleculeLabel::Sod
        );
        assert_eq!(
            classify(&scored(Some(290.0), Some(5000.0), 70), &rules),
            MoleculeLabel::Lysozyme
        );
    }

    #[test]
    fn cold_planet_beats_high_score() {
        let rules = RuleSet::four_label();
        let rec = scored(Some(200.0), Some(5000.0), 90);
        assert_eq!(classify(&rec, &rules), MoleculeLabel::Antifreeze);
    }

    #[test]
    fn missing_fields_fall_through() {
        let rules = RuleSet::four_label();
        assert_eq!(classify(&scored(None, None, 0), &rules), MoleculeLabel::Lysozyme);
        assert_eq!(
            classify(&scored(None, Some(7000.0), 10), &rules),
            MoleculeLabel::Sod
        );
        assert_eq!(
            classify(&scored(Some(f64::NAN), None, 10), &rules),
            MoleculeLabel::Lysozyme
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let rules = RuleSet::seven_label();
        let rec = scored(Some(320.0), Some(3300.0), 65);
        let first = classify(&rec, &rules);
        for _ in 0..10 {
            assert_eq!(classify(&rec, &rules), first);
        }
    }

    #[test]
    fn seven_label_precedence() {
        let rules = RuleSet::seven_label();
        // Earlier rules still win.
        assert_eq!(
            classify(&scored(Some(100.0), Some(3300.0), 20), &rules),
            MoleculeLabel::Antifreeze
        );
        assert_eq!(
            classify(&scored(Some(300.0), Some(3300.0), 20), &rules),
            MoleculeLabel::ColdLowTempStar
        );
        assert_eq!(
            classify(&scored(Some(300.0), Some(5000.0), 40), &rules),
            MoleculeLabel::LowHabitability
        );
        assert_eq!(
            classify(&scored(Some(300.0), Some(5000.0), 60), &rules),
            MoleculeLabel::Lysozyme
        );
        assert_eq!(
            classify(&scored(Some(300.0), Some(5000.0), 61), &rules),
            MoleculeLabel::ModerateHighHabitability
        );
        assert_eq!(
            classify(&scored(Some(300.0), Some(5000.0), 80), &rules),
            MoleculeLabel::ModerateHighHabitability
        );
        assert_eq!(
            classify(&scored(Some(300.0), None, 50), &rules),
            MoleculeLabel::Lysozyme
        );
    }

    #[test]
    fn reordering_rules_changes_outcome() {
        let mut rules = RuleSet::four_label();
        rules.rules.swap(0, 1);
        let rec = scored(Some(200.0), Some(5000.0), 90);
        assert_eq!(classify(&rec, &rules), MoleculeLabel::Rubisco);
    }

    #[test]
    fn labels_use_snake_case_names() {
        for label in MoleculeLabel::ALL {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
        }
    }
}
