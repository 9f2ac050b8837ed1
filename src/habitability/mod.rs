/// Habitability core: scoring, molecule selection, and the molecule
/// resource side table.
///
/// ```text
///   Record ──score(policy)──▶ ScoredRecord ──classify(rules)──▶ MoleculeLabel
///                                                                    │
///                                                                    ▼
///                                                       ResourceMap::resolve
/// ```
///
/// Everything here is pure and takes its inputs explicitly; nothing reads
/// the session catalog cache.
pub mod molecule;
pub mod resources;
pub mod score;

pub use molecule::{classify, MoleculeLabel, RulePreset, RuleSet};
pub use resources::{MoleculeResource, ResourceMap, ResourceWarning};
pub use score::{score, HabitabilityScores, ScoringPolicy, StarPolicy};
