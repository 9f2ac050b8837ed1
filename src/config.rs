use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::data::fetch::CatalogQuery;
use crate::error::ConfigError;
use crate::habitability::molecule::{MoleculeLabel, Rule, RulePreset, RuleSet};
use crate::habitability::resources::ResourceMap;
use crate::habitability::score::ScoringPolicy;

const CONFIG_FILE: &str = "config.toml";

// ---------------------------------------------------------------------------
// Config file layout
// ---------------------------------------------------------------------------

/// Contents of `config.toml`. Every section is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    pub catalog: CatalogQuery,
    pub scoring: ScoringPolicy,
    pub classifier: ClassifierConfig,
    /// Entries here replace the built-in resource of the same label.
    pub resources: ResourceMap,
    /// Base directory for relative image paths (default: current dir).
    pub resource_dir: Option<PathBuf>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            catalog: CatalogQuery::default(),
            scoring: ScoringPolicy::default(),
            classifier: ClassifierConfig::default(),
            resources: ResourceMap::empty(),
            resource_dir: None,
        }
    }
}

/// Either a preset name or an explicit ordered rule table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    pub preset: RulePreset,
    /// Replaces the preset's rules when present.
    pub rules: Option<Vec<Rule>>,
    pub fallback: Option<MoleculeLabel>,
}

impl ClassifierConfig {
    pub fn rule_set(&self) -> RuleSet {
        let mut set = self.preset.rule_set();
        if let Some(rules) = &self.rules {
            set.rules = rules.clone();
        }
        if let Some(fallback) = self.fallback {
            set.fallback = fallback;
        }
        set
    }
}

impl ExplorerConfig {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `$XDG_CONFIG_HOME/astrobiochem-explorer/config.toml` and platform
    /// equivalents.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "astrobiochem-explorer")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load `explicit` if given (it must exist), else the default location
    /// if a file is there, else built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::info!("Using config {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Built-in resources overlaid with the configured ones.
    pub fn resource_map(&self) -> ResourceMap {
        let mut map = ResourceMap::default();
        map.merge(self.resources.clone());
        map
    }

    pub fn resource_dir(&self) -> PathBuf {
        self.resource_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habitability::molecule::{Field, Predicate};
    use crate::habitability::score::StarPolicy;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = ExplorerConfig::parse("").unwrap();
        assert_eq!(cfg, ExplorerConfig::default());
        assert_eq!(cfg.scoring.star_policy, StarPolicy::Contiguous);
        assert_eq!(cfg.classifier.rule_set(), RuleSet::four_label());
        assert_eq!(cfg.catalog, CatalogQuery::default());
    }

    #[test]
    fn selects_policies_and_presets() {
        let cfg = ExplorerConfig::parse(
            r#"
            [scoring]
            star_policy = "split_bands"

            [classifier]
            preset = "seven_label"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.scoring.star_policy, StarPolicy::SplitBands);
        assert_eq!(cfg.classifier.rule_set(), RuleSet::seven_label());
    }

    #[test]
    fn explicit_rule_table() {
        let cfg = ExplorerConfig::parse(
            r#"
            [classifier]
            fallback = "rubisco"
            rules = [
                { when = { op = "greater_than", field = "star_temp", value = 6000.0 }, label = "sod" },
                { when = { op = "between", field = "habitability", min = 60.0, max = 80.0, min_exclusive = true }, label = "moderate_high_habitability" },
            ]
            "#,
        )
        .unwrap();
        let set = cfg.classifier.rule_set();
        assert_eq!(set.fallback, MoleculeLabel::Rubisco);
        assert_eq!(set.rules.len(), 2);
        assert_eq!(
            set.rules[1].when,
            Predicate::Between {
                field: Field::Habitability,
                min: 60.0,
                max: 80.0,
                min_exclusive: true,
            }
        );
    }

    #[test]
    fn resources_overlay_defaults() {
        let cfg = ExplorerConfig::parse(
            r#"
            resource_dir = "assets"

            [resources.rubisco]
            name = "Form I RuBisCO"
            image = "img/rubisco.jpg"
            "#,
        )
        .unwrap();
        let map = cfg.resource_map();
        let rubisco = map.get(MoleculeLabel::Rubisco).unwrap();
        assert_eq!(rubisco.name, "Form I RuBisCO");
        assert_eq!(rubisco.structure, None);
        assert_eq!(map.get(MoleculeLabel::Sod).unwrap().name, "Superoxide dismutase");
        assert_eq!(cfg.resource_dir(), PathBuf::from("assets"));
    }

    #[test]
    fn catalog_section_overrides_query() {
        let cfg = ExplorerConfig::parse(
            r#"
            [catalog]
            table = "ps"
            filter = "pl_rade < 2"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.catalog.table, "ps");
        assert!(cfg.catalog.adql().ends_with("from ps where pl_rade < 2"));
        assert_eq!(cfg.catalog.endpoint, CatalogQuery::default().endpoint);
    }

    #[test]
    fn bad_files_report_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\nstar_policy = \"sometimes\"\n").unwrap();
        let err = ExplorerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));

        let missing = ExplorerConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
