//! Target catalog
//!
//! The catalog is the set of targets the current environment can build right
//! now. It is recomputed on demand from a [`TargetProbe`]; callers should not
//! hold on to one across environment changes (toolchains come and go).

use std::collections::HashSet;

use crate::core::target::Target;
use crate::error::{BuildError, CatalogError};

/// Answers whether the environment can build a given target
pub trait TargetProbe {
    /// Check one target. Errors abort the whole refresh.
    fn is_buildable(&self, target: Target) -> Result<bool, CatalogError>;
}

/// Probe backed by a fixed set of buildable targets
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    buildable: HashSet<Target>,
}

impl StaticProbe {
    /// Create a probe that reports exactly `targets` as buildable
    pub fn new(targets: impl IntoIterator<Item = Target>) -> Self {
        Self {
            buildable: targets.into_iter().collect(),
        }
    }
}

impl TargetProbe for StaticProbe {
    fn is_buildable(&self, target: Target) -> Result<bool, CatalogError> {
        Ok(self.buildable.contains(&target))
    }
}

/// Restricts another probe to an allow-list
#[derive(Debug)]
pub struct RestrictedProbe<'a, P> {
    inner: &'a P,
    only: &'a [Target],
}

impl<'a, P: TargetProbe> RestrictedProbe<'a, P> {
    /// Wrap `inner`; an empty `only` list means no restriction
    pub fn new(inner: &'a P, only: &'a [Target]) -> Self {
        Self { inner, only }
    }
}

impl<P: TargetProbe> TargetProbe for RestrictedProbe<'_, P> {
    fn is_buildable(&self, target: Target) -> Result<bool, CatalogError> {
        if !self.only.is_empty() && !self.only.contains(&target) {
            return Ok(false);
        }
        self.inner.is_buildable(target)
    }
}

/// Ordered, duplicate-free set of buildable targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetCatalog {
    targets: Vec<Target>,
}

impl TargetCatalog {
    /// Enumerate every known target and keep the ones the probe accepts
    pub fn refresh(probe: &impl TargetProbe) -> Result<Self, CatalogError> {
        let mut targets = Vec::new();
        for target in Target::ALL {
            if probe.is_buildable(target)? {
                targets.push(target);
            } else {
                tracing::debug!("Target {target} not buildable, excluded from catalog");
            }
        }
        tracing::info!("Catalog refreshed: {} buildable targets", targets.len());
        Ok(Self { targets })
    }

    /// Build a catalog from an explicit list, preserving first-seen order
    pub fn from_targets(targets: impl IntoIterator<Item = Target>) -> Self {
        let mut ordered: Vec<Target> = Vec::new();
        for target in targets {
            if !ordered.contains(&target) {
                ordered.push(target);
            }
        }
        Self { targets: ordered }
    }

    /// Whether `target` is buildable
    pub fn contains(&self, target: Target) -> bool {
        self.targets.contains(&target)
    }

    /// Reject targets outside the catalog
    pub fn ensure_contains(&self, target: Target) -> Result<(), BuildError> {
        if self.contains(target) {
            Ok(())
        } else {
            Err(BuildError::UnsupportedTarget { target })
        }
    }

    /// Targets in catalog iteration order
    pub fn iter(&self) -> impl Iterator<Item = Target> + '_ {
        self.targets.iter().copied()
    }

    /// Targets as a slice
    pub fn as_slice(&self) -> &[Target] {
        &self.targets
    }

    /// Number of buildable targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether nothing is buildable
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
