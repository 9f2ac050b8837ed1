pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod habitability;
pub mod report;
pub mod state;
pub mod ui;

pub use config::ExplorerConfig;
pub use data::filter::filter_and_sort;
pub use data::model::{Record, ScoredCatalog, ScoredRecord};
pub use habitability::{classify, score, MoleculeLabel, RuleSet, ScoringPolicy, StarPolicy};
