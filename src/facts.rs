//! Inbound facts: what the extraction layer hands over for one source file.
//!
//! Batches are JSON documents, one per source file, named `*.facts.json`.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::BeanError;
use crate::model::{BeanDefinition, BeanInjectionPoint, DetectionMethod, InterfaceDefinition};

/// File-name suffix of facts batches.
pub const FACTS_SUFFIX: &str = ".facts.json";

/// One `interface -> bean` edge as reported by the extractor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationFact {
    pub interface: String,
    pub bean: String,
    #[serde(default)]
    pub detection: DetectionMethod,
}

/// Every fact extracted from one source file. Re-ingesting a batch for the
/// same file replaces everything the previous batch contributed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FactBatch {
    pub file: PathBuf,
    #[serde(default)]
    pub beans: Vec<BeanDefinition>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceDefinition>,
    #[serde(default)]
    pub implementations: Vec<ImplementationFact>,
    #[serde(default)]
    pub injection_points: Vec<BeanInjectionPoint>,
}

impl FactBatch {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into(), ..Self::default() }
    }

    /// Attribute facts that carry no file of their own to the batch's file,
    /// so that evicting the file later removes them too.
    pub fn attribute_to_file(mut self) -> Self {
        for bean in &mut self.beans {
            if bean.location.file.as_os_str().is_empty() {
                bean.location.file = self.file.clone();
            }
        }
        for point in &mut self.injection_points {
            if point.location.file.as_os_str().is_empty() {
                point.location.file = self.file.clone();
            }
        }
        self.interfaces = std::mem::take(&mut self.interfaces)
            .into_iter()
            .map(|mut def| {
                if def.location.file.as_os_str().is_empty() {
                    def.location.file = self.file.clone();
                }
                def.with_derived_names()
            })
            .collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
            && self.interfaces.is_empty()
            && self.implementations.is_empty()
            && self.injection_points.is_empty()
    }
}

/// Parse a single facts batch.
pub fn load_batch(path: &Path) -> Result<FactBatch, BeanError> {
    let content = std::fs::read_to_string(path)?;
    let batch: FactBatch = serde_json::from_str(&content).map_err(|source| BeanError::Facts {
        path: path.display().to_string(),
        source,
    })?;
    Ok(batch.attribute_to_file())
}

/// Collect every `*.facts.json` under `dir`, sorted by path. Files that fail
/// to parse are skipped with a warning; partial facts are normal.
pub fn load_dir(dir: &Path) -> Result<Vec<FactBatch>, BeanError> {
    if !dir.is_dir() {
        return Err(BeanError::DirNotFound(dir.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = WalkBuilder::new(dir)
        .hidden(false)
        .git_ignore(true)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(FACTS_SUFFIX))
        })
        .collect();
    paths.sort();

    let mut batches = Vec::with_capacity(paths.len());
    for path in &paths {
        match load_batch(path) {
            Ok(batch) => batches.push(batch),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable facts batch"),
        }
    }
    info!(dir = %dir.display(), batches = batches.len(), skipped = paths.len() - batches.len(), "Loaded facts");
    Ok(batches)
}
