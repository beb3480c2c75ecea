//! Per-target build options
//!
//! The orchestrator never formats output paths itself. It asks an
//! [`OptionsResolver`] for the options of each target and hands them to the
//! backend untouched.

use std::path::{Path, PathBuf};

use crate::core::target::Target;

/// Project facts needed to resolve build options
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectMetadata {
    /// Product name, used for artifact file names
    pub name: String,
    /// Directory holding the project's Cargo.toml
    pub project_dir: PathBuf,
    /// Root directory for all build output
    pub output_dir: PathBuf,
    /// Cargo profile to build with
    pub profile: String,
    /// Extra arguments appended to every backend invocation
    pub extra_args: Vec<String>,
}

/// Everything the backend needs to build one target
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Target to build
    pub target: Target,
    /// Directory holding the project's Cargo.toml
    pub project_dir: PathBuf,
    /// Root directory for all build output
    pub output_root: PathBuf,
    /// Directory the artifact for this target lands in
    pub output_dir: PathBuf,
    /// Expected artifact path
    pub artifact_path: PathBuf,
    /// Cargo profile
    pub profile: String,
    /// Extra backend arguments
    pub extra_args: Vec<String>,
}

impl BuildOptions {
    /// Scratch directory for intermediate build files, `<root>/<id>/target`
    ///
    /// Never inside [`Self::output_dir`].
    pub fn scratch_dir(&self) -> PathBuf {
        self.output_root
            .join(self.target.identifier())
            .join("target")
    }
}

/// Produces build options for a target
pub trait OptionsResolver {
    /// Resolve options for `target`
    fn resolve(&self, target: Target, project: &ProjectMetadata) -> BuildOptions;
}

/// Lays output out as `<output_dir>/<display name>/<name><suffix>`
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultResolver;

impl OptionsResolver for DefaultResolver {
    fn resolve(&self, target: Target, project: &ProjectMetadata) -> BuildOptions {
        let output_dir = project.output_dir.join(target.display_name());
        let artifact_path = output_dir.join(artifact_file_name(&project.name, target));
        BuildOptions {
            target,
            project_dir: project.project_dir.clone(),
            output_root: project.output_dir.clone(),
            output_dir,
            artifact_path,
            profile: project.profile.clone(),
            extra_args: project.extra_args.clone(),
        }
    }
}

fn artifact_file_name(name: &str, target: Target) -> String {
    format!("{name}{}", target.family().executable_suffix())
}

/// Resolve a possibly relative output directory against the project root
pub fn absolute_output_dir(project_dir: &Path, output_dir: &Path) -> PathBuf {
    if output_dir.is_absolute() {
        output_dir.to_path_buf()
    } else {
        project_dir.join(output_dir)
    }
}
