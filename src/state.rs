use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::FacilityColors;
use crate::config::ExplorerConfig;
use crate::data::fetch::{CatalogCache, CatalogQuery, CatalogSource, FileSource};
use crate::data::filter::matching_indices;
use crate::data::model::{Record, ScoredCatalog, ScoredRecord};
use crate::habitability::molecule::{MoleculeLabel, RulePreset, RuleSet};
use crate::habitability::resources::{ResourceMap, Resolved};
use crate::habitability::score::{ScoringPolicy, StarPolicy};
use crate::report::{write_report, PlanetReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Molecule chosen for the selected planet and what was found for it.
#[derive(Debug, Clone)]
pub struct MoleculeView {
    pub label: MoleculeLabel,
    pub resolved: Resolved,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Where the catalog comes from (remote archive or a local file).
    pub source: Box<dyn CatalogSource>,
    /// Fetch parameters, also the session cache key.
    pub query: CatalogQuery,
    /// Session cache of fetched tables.
    pub cache: CatalogCache,

    /// Raw records of the current table.
    pub records: Arc<Vec<Record>>,
    /// Scored table (None until a catalog is loaded).
    pub catalog: Option<ScoredCatalog>,

    pub scoring: ScoringPolicy,
    pub rules: RuleSet,
    /// Preset behind `rules`; None for a rule table from the config file.
    pub rule_preset: Option<RulePreset>,
    pub resources: ResourceMap,
    pub resource_dir: PathBuf,

    /// Search box contents.
    pub search: String,
    /// Indices into `catalog.records` passing the search, best first.
    pub visible_indices: Vec<usize>,
    /// Index into `catalog.records` of the planet shown in the detail panel.
    pub selected: Option<usize>,
    pub molecule: Option<MoleculeView>,

    pub facility_colors: Option<FacilityColors>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &ExplorerConfig, source: Box<dyn CatalogSource>) -> Self {
        let rule_preset = match config.classifier.rules {
            Some(_) => None,
            None => Some(config.classifier.preset),
        };
        Self {
            source,
            query: config.catalog.clone(),
            cache: CatalogCache::new(),
            records: Arc::new(Vec::new()),
            catalog: None,
            scoring: config.scoring,
            rules: config.classifier.rule_set(),
            rule_preset,
            resources: config.resource_map(),
            resource_dir: config.resource_dir(),
            search: String::new(),
            visible_indices: Vec::new(),
            selected: None,
            molecule: None,
            facility_colors: None,
            status_message: None,
        }
    }

    /// Load the catalog for the current query, from the session cache when
    /// possible.
    pub fn load_catalog(&mut self) {
        match self.cache.get_or_fetch(self.source.as_ref(), &self.query) {
            Ok(records) => self.set_records(records),
            Err(e) => {
                log::error!("Failed to load catalog: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Drop the cached table and fetch it again.
    pub fn refresh(&mut self) {
        self.cache.invalidate(&self.query);
        self.load_catalog();
    }

    /// Switch to a local catalog file. The current source, cache and table
    /// are kept if the file cannot be loaded.
    pub fn open_file(&mut self, path: &Path) {
        let source = FileSource {
            path: path.to_path_buf(),
        };
        match source.fetch(&self.query) {
            Ok(records) => {
                log::info!("Loaded {} records from {}", records.len(), source.describe());
                // Cached tables belong to the previous source.
                self.cache.clear();
                self.source = Box::new(source);
                let records = self.cache.store(&self.query, Arc::new(records));
                self.set_records(records);
            }
            Err(e) => {
                log::error!("Failed to open {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded table, score it and reset the view.
    pub fn set_records(&mut self, records: Arc<Vec<Record>>) {
        self.records = records;
        self.selected = None;
        self.rescore();
        self.selected = self.visible_indices.first().copied();
        self.update_molecule();
        self.status_message = None;
    }

    /// Recompute scores after a policy change. Row order is unchanged, so
    /// the selection survives.
    pub fn rescore(&mut self) {
        let catalog = ScoredCatalog::from_records(&self.records, &self.scoring);
        self.facility_colors = Some(FacilityColors::new(&catalog.facilities));
        self.catalog = Some(catalog);
        self.refilter();
        self.update_molecule();
    }

    /// Recompute `visible_indices` after a search change.
    pub fn refilter(&mut self) {
        if let Some(catalog) = &self.catalog {
            self.visible_indices = matching_indices(&catalog.records, Some(&self.search));
        }
    }

    pub fn set_search(&mut self, search: String) {
        self.search = search;
        self.refilter();
    }

    pub fn set_star_policy(&mut self, policy: StarPolicy) {
        if self.scoring.star_policy != policy {
            self.scoring.star_policy = policy;
            self.rescore();
        }
    }

    pub fn set_rule_preset(&mut self, preset: RulePreset) {
        self.rule_preset = Some(preset);
        self.rules = preset.rule_set();
        self.update_molecule();
    }

    pub fn select(&mut self, index: usize) {
        self.selected = Some(index);
        self.update_molecule();
    }

    pub fn selected_record(&self) -> Option<&ScoredRecord> {
        let catalog = self.catalog.as_ref()?;
        catalog.records.get(self.selected?)
    }

    /// Classify the selected planet and look up its resource.
    fn update_molecule(&mut self) {
        self.molecule = self.selected_record().map(|scored| {
            let label = self.rules.classify(scored);
            MoleculeView {
                label,
                resolved: self.resources.resolve(label, &self.resource_dir),
            }
        });
    }

    pub fn report(&self) -> Option<PlanetReport> {
        let scored = self.selected_record()?;
        let molecule = self.molecule.as_ref()?;
        Some(PlanetReport::new(
            scored,
            molecule.label,
            molecule.resolved.resource.as_ref(),
        ))
    }

    pub fn export_report(&mut self, path: &Path) -> Result<()> {
        let report = self.report().context("No planet selected")?;
        write_report(path, &report)?;
        self.status_message = Some(format!("Report saved to {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FixedSource {
        records: Vec<Record>,
        calls: Rc<Cell<usize>>,
    }

    impl CatalogSource for FixedSource {
        fn fetch(&self, _query: &CatalogQuery) -> Result<Vec<Record>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.records.clone())
        }

        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    fn planet(name: &str, host: &str, temp: f64, radius: f64, star: f64) -> Record {
        Record {
            planet_name: name.into(),
            host_name: Some(host.into()),
            equilibrium_temp: Some(temp),
            planet_radius: Some(radius),
            star_temp: Some(star),
            ..Default::default()
        }
    }

    fn loaded_state() -> AppState {
        loaded_state_with_calls().0
    }

    /// Loaded state plus a counter of fetches hitting the source.
    fn loaded_state_with_calls() -> (AppState, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let source = FixedSource {
            records: vec![
                // 30 + 30 + 10 = 70 (contiguous), 50 (split bands)
                planet("TRAPPIST-1 e", "TRAPPIST-1", 251.0, 0.92, 2566.0),
                // 10 + 30 + 20 = 60
                planet("Kepler-442 b", "Kepler-442", 200.0, 1.34, 4402.0),
                // 30 + 30 + 20 = 80
                planet("Kepler-1649 c", "Kepler-1649", 260.0, 1.06, 5000.0),
            ],
            calls: Rc::clone(&calls),
        };
        let mut state = AppState::new(&ExplorerConfig::default(), Box::new(source));
        state.load_catalog();
        (state, calls)
    }

    fn visible_names(state: &AppState) -> Vec<String> {
        let catalog = state.catalog.as_ref().unwrap();
        state
            .visible_indices
            .iter()
            .map(|&i| catalog.records[i].record.planet_name.clone())
            .collect()
    }

    #[test]
    fn load_scores_sorts_and_selects_best() {
        let state = loaded_state();
        assert_eq!(
            visible_names(&state),
            vec!["Kepler-1649 c", "TRAPPIST-1 e", "Kepler-442 b"]
        );
        assert_eq!(state.selected, Some(2));
        assert_eq!(state.molecule.as_ref().unwrap().label, MoleculeLabel::Lysozyme);
    }

    #[test]
    fn search_narrows_visible_rows() {
        let mut state = loaded_state();
        state.set_search("kepler".into());
        assert_eq!(visible_names(&state), vec!["Kepler-1649 c", "Kepler-442 b"]);
        state.set_search("nothing".into());
        assert!(state.visible_indices.is_empty());
        state.set_search(String::new());
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn star_policy_change_rescores() {
        let mut state = loaded_state();
        state.set_star_policy(StarPolicy::SplitBands);
        let catalog = state.catalog.as_ref().unwrap();
        assert_eq!(catalog.records[0].habitability(), 60);
        assert_eq!(
            visible_names(&state),
            vec!["Kepler-1649 c", "TRAPPIST-1 e", "Kepler-442 b"]
        );
    }

    #[test]
    fn preset_change_reclassifies_selection() {
        let mut state = loaded_state();
        state.select(1);
        assert_eq!(state.molecule.as_ref().unwrap().label, MoleculeLabel::Antifreeze);
        state.select(0);
        assert_eq!(state.molecule.as_ref().unwrap().label, MoleculeLabel::Lysozyme);
        state.set_rule_preset(RulePreset::SevenLabel);
        assert_eq!(
            state.molecule.as_ref().unwrap().label,
            MoleculeLabel::ModerateHighHabitability
        );
    }

    #[test]
    fn refresh_refetches_but_reload_hits_cache() {
        let (mut state, calls) = loaded_state_with_calls();
        assert_eq!(calls.get(), 1);
        state.load_catalog();
        assert_eq!(calls.get(), 1);
        state.refresh();
        assert_eq!(calls.get(), 2);
        assert!(state.cache.contains(&state.query));
        assert_eq!(state.records.len(), 3);
    }

    #[test]
    fn report_export_writes_selected_planet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kepler.txt");
        let mut state = loaded_state();
        state.export_report(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Kepler-1649 c"));
        assert!(text.contains("Habitability score:  80/100"));
    }

    #[test]
    fn open_missing_file_keeps_previous_source() {
        let (mut state, calls) = loaded_state_with_calls();
        state.open_file(Path::new("/definitely/not/here.csv"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(state.records.len(), 3);
        assert_eq!(state.source.describe(), "fixed");
        assert!(state.cache.contains(&state.query));

        // Refresh goes back to the original source, not the bad path.
        state.refresh();
        assert_eq!(calls.get(), 2);
        assert_eq!(state.status_message, None);
        assert_eq!(state.records.len(), 3);
    }

    #[test]
    fn open_file_replaces_source_and_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.csv");
        std::fs::write(&path, "pl_name,pl_eqt,pl_rade\nLocal b,300,1.0\n").unwrap();

        let (mut state, calls) = loaded_state_with_calls();
        state.open_file(&path);
        assert_eq!(state.status_message, None);
        assert_eq!(visible_names(&state), vec!["Local b"]);
        assert_eq!(state.source.describe(), path.display().to_string());
        assert!(state.cache.contains(&state.query));

        // A reload is served from the cache seeded by the open.
        state.load_catalog();
        assert_eq!(visible_names(&state), vec!["Local b"]);
        assert_eq!(calls.get(), 1);
    }
}
