//! Manifest (multibuild.toml) parsing
//!
//! The manifest names the product and tells the backend where to put output.
//!
//! ```toml
//! [project]
//! name = "asteroids"
//! output_dir = "builds"
//!
//! [build]
//! profile = "release"
//! args = ["--locked"]
//!
//! [catalog]
//! only = ["linux-x64", "windows-x64"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults::{DEFAULT_OUTPUT_DIR, DEFAULT_PROFILE};
use crate::core::options::{absolute_output_dir, ProjectMetadata};
use crate::core::target::Target;
use crate::error::ManifestError;

/// The project manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// Project configuration
    pub project: ProjectConfig,

    /// Build configuration
    #[serde(default)]
    pub build: BuildConfig,

    /// Catalog restrictions
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    /// Product name
    pub name: String,

    /// Output directory, relative to the project root unless absolute
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildConfig {
    /// Cargo profile
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Extra arguments passed to every build
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            args: Vec::new(),
        }
    }
}

/// Catalog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// Only ever offer these targets (empty means no restriction)
    #[serde(default)]
    pub only: Vec<String>,
}

impl Manifest {
    /// Parse from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        toml::from_str(content).map_err(|e| ManifestError::Parse {
            error: e.to_string(),
        })
    }

    /// Load the manifest at `path`
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|e| ManifestError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Targets named in `[catalog] only`
    pub fn catalog_filter(&self) -> Result<Vec<Target>, ManifestError> {
        self.catalog
            .only
            .iter()
            .map(|id| id.parse::<Target>().map_err(ManifestError::from))
            .collect()
    }

    /// Project metadata for option resolution
    pub fn metadata(&self, project_dir: &Path) -> ProjectMetadata {
        ProjectMetadata {
            name: self.project.name.clone(),
            project_dir: project_dir.to_path_buf(),
            output_dir: absolute_output_dir(project_dir, &self.project.output_dir),
            profile: self.build.profile.clone(),
            extra_args: self.build.args.clone(),
        }
    }
}
