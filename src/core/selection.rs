//! Target selection persistence
//!
//! Records which cataloged targets the user wants built. The store is
//! reconciled against a fresh catalog every time it is loaded, so its key set
//! always matches what the environment can actually build.
//!
//! Selection file format (`.multibuild/selection.toml`):
//!
//! ```toml
//! version = 1
//!
//! [targets]
//! linux-x64 = true
//! windows-x64 = false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::defaults::{DEFAULT_SELECTED, SELECTION_FORMAT_VERSION};
use crate::core::catalog::TargetCatalog;
use crate::core::target::Target;
use crate::error::SelectionError;

/// On-disk representation of a selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct SelectionFile {
    /// Format version
    #[serde(default = "default_version")]
    version: u32,

    /// Target identifier to selected flag
    #[serde(default)]
    targets: BTreeMap<String, bool>,
}

fn default_version() -> u32 {
    SELECTION_FORMAT_VERSION
}

/// Changes applied by a reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Targets that appeared in the catalog and were inserted
    pub added: Vec<Target>,
    /// Targets that left the catalog and were dropped
    pub removed: Vec<Target>,
}

impl ReconcileReport {
    /// True when reconciliation changed nothing
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Mapping of target to selected flag, kept in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelectionStore {
    entries: Vec<(Target, bool)>,
}

impl TargetSelectionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the key set in line with `catalog`
    ///
    /// New targets are inserted as selected, vanished targets are dropped and
    /// surviving entries keep their flag. Entries end up in catalog order.
    pub fn reconcile(&mut self, catalog: &TargetCatalog) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let entries: Vec<(Target, bool)> = catalog
            .iter()
            .map(|target| match self.lookup(target) {
                Some(selected) => (target, selected),
                None => {
                    report.added.push(target);
                    (target, DEFAULT_SELECTED)
                }
            })
            .collect();

        report.removed = self
            .entries
            .iter()
            .map(|(target, _)| *target)
            .filter(|target| !catalog.contains(*target))
            .collect();

        for target in &report.added {
            tracing::debug!("Selection: new target {target} added");
        }
        for target in &report.removed {
            tracing::debug!("Selection: target {target} no longer buildable, removed");
        }

        self.entries = entries;
        report
    }

    /// Set the flag for a target already in the store
    pub fn toggle(&mut self, target: Target, value: bool) -> Result<(), SelectionError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|(t, _)| *t == target)
            .ok_or(SelectionError::NotCataloged { target })?;
        entry.1 = value;
        Ok(())
    }

    /// Set the flag for every entry
    pub fn set_all(&mut self, value: bool) {
        for entry in &mut self.entries {
            entry.1 = value;
        }
    }

    /// Selected targets, in catalog order
    pub fn selected(&self) -> Vec<Target> {
        self.entries
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(target, _)| *target)
            .collect()
    }

    /// Whether `target` is present and selected
    pub fn is_selected(&self, target: Target) -> bool {
        self.lookup(target).unwrap_or(false)
    }

    /// All entries, in catalog order
    pub fn entries(&self) -> &[(Target, bool)] {
        &self.entries
    }

    /// Keys of the store, in order
    pub fn targets(&self) -> Vec<Target> {
        self.entries.iter().map(|(target, _)| *target).collect()
    }

    fn lookup(&self, target: Target) -> Option<bool> {
        self.entries
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, selected)| *selected)
    }

    /// Parse a store from TOML
    ///
    /// Unknown identifiers are skipped; the next reconciliation would drop
    /// them anyway.
    fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let file: SelectionFile = toml::from_str(content)?;
        let mut entries = Vec::with_capacity(file.targets.len());
        for (identifier, selected) in file.targets {
            match identifier.parse::<Target>() {
                Ok(target) if !entries.iter().any(|(t, _)| *t == target) => {
                    entries.push((target, selected));
                }
                Ok(target) => tracing::debug!("Selection: duplicate entry for {target} ignored"),
                Err(_) => tracing::debug!("Selection: unknown target '{identifier}' ignored"),
            }
        }
        Ok(Self { entries })
    }

    fn to_toml(&self) -> Result<String, toml::ser::Error> {
        let file = SelectionFile {
            version: SELECTION_FORMAT_VERSION,
            targets: self
                .entries
                .iter()
                .map(|(target, selected)| (target.identifier().to_string(), *selected))
                .collect(),
        };
        toml::to_string_pretty(&file)
    }

    /// Load a store from `path`
    ///
    /// A missing file yields an empty store; a malformed one is an error.
    pub fn load_from_path(path: &Path) -> Result<Self, SelectionError> {
        if !path.exists() {
            tracing::debug!("No selection file at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).map_err(|e| SelectionError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|e| SelectionError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Save the store to `path`, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<(), SelectionError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SelectionError::Io {
                path: parent.to_path_buf(),
                error: e.to_string(),
            })?;
        }

        let content = self.to_toml().map_err(|e| SelectionError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        fs::write(path, content).map_err(|e| SelectionError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}
