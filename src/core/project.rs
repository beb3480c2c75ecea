//! Project session
//!
//! Ties a project directory to its manifest and state files, and runs the
//! load -> refresh -> reconcile -> save sequence every command starts with.

use std::path::{Path, PathBuf};

use crate::config::defaults::{ACTIVE_TARGET_FILE, MANIFEST_FILE, SELECTION_FILE, STATE_DIR};
use crate::core::catalog::{RestrictedProbe, TargetCatalog, TargetProbe};
use crate::core::manifest::Manifest;
use crate::core::options::ProjectMetadata;
use crate::core::selection::{ReconcileReport, TargetSelectionStore};
use crate::error::MultibuildError;

/// An opened multibuild project
#[derive(Debug, Clone)]
pub struct Project {
    dir: PathBuf,
    manifest: Manifest,
}

impl Project {
    /// Open the project rooted at `dir`
    pub fn open(dir: &Path) -> Result<Self, MultibuildError> {
        let manifest = Manifest::load(&dir.join(MANIFEST_FILE))?;
        tracing::debug!("Opened project '{}' at {}", manifest.project.name, dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            manifest,
        })
    }

    /// Project root
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Parsed manifest
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Metadata for option resolution
    pub fn metadata(&self) -> ProjectMetadata {
        self.manifest.metadata(&self.dir)
    }

    /// Per-project state directory
    pub fn state_dir(&self) -> PathBuf {
        self.dir.join(STATE_DIR)
    }

    /// Path of the persisted selection
    pub fn selection_path(&self) -> PathBuf {
        self.state_dir().join(SELECTION_FILE)
    }

    /// Path of the persisted active target
    pub fn active_target_path(&self) -> PathBuf {
        self.state_dir().join(ACTIVE_TARGET_FILE)
    }

    /// Refresh the catalog, honouring the manifest's `[catalog] only` list
    pub fn refresh_catalog(
        &self,
        probe: &impl TargetProbe,
    ) -> Result<TargetCatalog, MultibuildError> {
        let only = self.manifest.catalog_filter()?;
        Ok(TargetCatalog::refresh(&RestrictedProbe::new(probe, &only))?)
    }

    /// Load the stored selection, reconcile it with `catalog` and persist it
    pub fn load_selection(
        &self,
        catalog: &TargetCatalog,
    ) -> Result<(TargetSelectionStore, ReconcileReport), MultibuildError> {
        let path = self.selection_path();
        let mut store = TargetSelectionStore::load_from_path(&path)?;
        let report = store.reconcile(catalog);
        if !report.is_empty() || !path.exists() {
            store.save_to_path(&path)?;
        }
        Ok((store, report))
    }

    /// Persist `store`
    pub fn save_selection(&self, store: &TargetSelectionStore) -> Result<(), MultibuildError> {
        store.save_to_path(&self.selection_path())?;
        Ok(())
    }
}
