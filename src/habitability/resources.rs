use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::molecule::MoleculeLabel;

const RCSB_STRUCTURE_URL: &str = "https://www.rcsb.org/structure";

/// Illustrative material for one molecule label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeResource {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Image file, relative paths resolve against the resource directory.
    #[serde(default)]
    pub image: Option<PathBuf>,
    /// PDB identifier of a 3D structure.
    #[serde(default)]
    pub structure: Option<String>,
}

impl MoleculeResource {
    fn new(name: &str, description: &str, image: Option<&str>, structure: &str) -> Self {
        MoleculeResource {
            name: name.to_string(),
            description: description.to_string(),
            image: image.map(PathBuf::from),
            structure: Some(structure.to_string()),
        }
    }

    pub fn structure_url(&self) -> Option<String> {
        self.structure
            .as_ref()
            .map(|id| format!("{RCSB_STRUCTURE_URL}/{id}"))
    }
}

/// Non-fatal problems while looking up a molecule resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceWarning {
    #[error("no resource configured for molecule '{0}'")]
    NoResourceFound(MoleculeLabel),
    #[error("image for molecule '{label}' not found at {}", path.display())]
    ImageMissing { label: MoleculeLabel, path: PathBuf },
}

/// Outcome of a lookup: whatever was found plus any warnings.
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    pub resource: Option<MoleculeResource>,
    /// Absolute (or base-relative) image path, only set when the file exists.
    pub image_path: Option<PathBuf>,
    pub warnings: Vec<ResourceWarning>,
}

/// Label → resource side table, injected from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceMap {
    entries: BTreeMap<MoleculeLabel, MoleculeResource>,
}

impl Default for ResourceMap {
    fn default() -> Self {
        let entries = BTreeMap::from([
            (
                MoleculeLabel::Antifreeze,
                MoleculeResource::new(
                    "Antifreeze protein",
                    "Binds ice crystals and keeps cell fluids liquid below freezing.",
                    Some("images/antifreeze.png"),
                    "1HG7",
                ),
            ),
            (
                MoleculeLabel::Rubisco,
                MoleculeResource::new(
                    "RuBisCO",
                    "Fixes carbon dioxide in photosynthesis.",
                    Some("images/rubisco.png"),
                    "8RUC",
                ),
            ),
            (
                MoleculeLabel::Sod,
                MoleculeResource::new(
                    "Superoxide dismutase",
                    "Neutralises reactive oxygen produced under strong stellar radiation.",
                    Some("images/sod.png"),
                    "2SOD",
                ),
            ),
            (
                MoleculeLabel::Lysozyme,
                MoleculeResource::new(
                    "Lysozyme",
                    "Robust general-purpose enzyme that breaks down bacterial cell walls.",
                    Some("images/lysozyme.png"),
                    "1LYZ",
                ),
            ),
            (
                MoleculeLabel::ColdLowTempStar,
                MoleculeResource::new(
                    "Cold shock protein",
                    "Keeps RNA unfolded around dim, cool host stars.",
                    None,
                    "1CSP",
                ),
            ),
            (
                MoleculeLabel::LowHabitability,
                MoleculeResource::new(
                    "Bacteriorhodopsin",
                    "Light-driven proton pump of salt-loving extremophiles.",
                    None,
                    "1C3W",
                ),
            ),
            (
                MoleculeLabel::ModerateHighHabitability,
                MoleculeResource::new(
                    "Photosystem II",
                    "Splits water with sunlight, the source of free oxygen.",
                    None,
                    "3WU2",
                ),
            ),
        ]);
        ResourceMap { entries }
    }
}

impl ResourceMap {
    pub fn empty() -> Self {
        ResourceMap {
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, label: MoleculeLabel) -> Option<&MoleculeResource> {
        self.entries.get(&label)
    }

    /// Overlay `other` on top of this map, entry by entry.
    pub fn merge(&mut self, other: ResourceMap) {
        self.entries.extend(other.entries);
    }

    /// Look up `label`, checking that a configured image exists under
    /// `base_dir`. Never fails; problems come back as warnings.
    pub fn resolve(&self, label: MoleculeLabel, base_dir: &Path) -> Resolved {
        let Some(resource) = self.entries.get(&label) else {
            let warning = ResourceWarning::NoResourceFound(label);
            log::warn!("{warning}");
            return Resolved {
                warnings: vec![warning],
                ..Default::default()
            };
        };

        let mut warnings = Vec::new();
        let image_path = resource.image.as_ref().and_then(|image| {
            let path = base_dir.join(image);
            if path.is_file() {
                Some(path)
            } else {
                let warning = ResourceWarning::ImageMissing { label, path };
                log::warn!("{warning}");
                warnings.push(warning);
                None
            }
        });

        Resolved {
            resource: Some(resource.clone()),
            image_path,
            warnings,
        }
    }
}
