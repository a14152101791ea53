//! Workspace: one bean index plus one interface registry, kept in step as
//! source files are re-extracted.
//!
//! The host drives it file by file: every facts batch replaces whatever the
//! same file contributed before, and navigation requests are routed either to
//! the interface resolver or to the bean index.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::beans::{BeanIndex, BeanIndexStats, Candidate, IndexSnapshot};
use crate::facts::FactBatch;
use crate::interfaces::{InterfaceRegistry, RegistryInconsistency, RegistryStats};
use crate::model::{BeanDefinition, BeanInjectionPoint, BeanKind, DetectionMethod, InterfaceDefinition};
use crate::resolver::{resolve, DisambiguationContext, ResolutionResult};
use crate::type_match::normalize_fqn;

#[derive(Debug, Default)]
pub struct BeanWorkspace {
    beans: BeanIndex,
    interfaces: InterfaceRegistry,
}

/// Where a navigation request ended up.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "route", rename_all = "camelCase")]
pub enum Navigation<'a> {
    /// The requested type is a known interface; the cascade decided.
    Interface {
        interface: String,
        result: ResolutionResult<'a>,
    },
    /// Concrete type; ranked candidates from the bean index.
    Concrete { candidates: Vec<Candidate<'a>> },
}

impl<'a> Navigation<'a> {
    /// Beans the request points at, best first.
    pub fn targets(&self) -> Vec<&'a BeanDefinition> {
        match self {
            Self::Interface { result, .. } => result.beans(),
            Self::Concrete { candidates } => candidates.iter().map(|c| c.bean).collect(),
        }
    }

    pub fn status(&self) -> InjectionStatus {
        match self {
            Self::Interface { result, .. } => match result {
                ResolutionResult::None => InjectionStatus::Unresolved,
                ResolutionResult::Multiple(_) => InjectionStatus::Ambiguous,
                _ => InjectionStatus::Resolved,
            },
            Self::Concrete { candidates } => match candidates.len() {
                0 => InjectionStatus::Unresolved,
                1 => InjectionStatus::Resolved,
                _ => InjectionStatus::Ambiguous,
            },
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum InjectionStatus {
    Resolved,
    Ambiguous,
    Unresolved,
}

impl InjectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Ambiguous => "ambiguous",
            Self::Unresolved => "unresolved",
        }
    }
}

impl std::fmt::Display for InjectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of navigating one injection point, as reported by [`BeanWorkspace::diagnose`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InjectionDiagnostic<'a> {
    pub point: &'a BeanInjectionPoint,
    pub status: InjectionStatus,
    pub beans: Vec<&'a str>,
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStats {
    pub beans: BeanIndexStats,
    pub interfaces: RegistryStats,
}

impl BeanWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn beans(&self) -> &BeanIndex {
        &self.beans
    }

    pub fn interfaces(&self) -> &InterfaceRegistry {
        &self.interfaces
    }

    // ─── Mutation ────────────────────────────────────────────────────

    /// Replace everything `batch.file` contributed with the batch's facts.
    pub fn ingest(&mut self, batch: FactBatch) {
        let FactBatch { file, beans, interfaces, implementations, injection_points } = batch.attribute_to_file();
        self.remove_file(&file);

        // a bean redefined under an existing name takes over its edges afresh
        for bean in &beans {
            if self.beans.bean(&bean.name).is_some() {
                self.interfaces.remove_bean_implementations(&bean.name);
            }
        }

        let declared: Vec<(String, Vec<String>, BeanKind)> = beans
            .iter()
            .filter(|b| !b.implemented_interfaces.is_empty())
            .map(|b| (b.name.clone(), b.implemented_interfaces.clone(), b.kind))
            .collect();
        let bean_count = beans.len();
        self.beans.add_beans(beans);

        for def in interfaces {
            self.interfaces.register_interface(def);
        }

        for (name, fqns, kind) in declared {
            let detection = match kind {
                BeanKind::FactoryMethod => DetectionMethod::FactoryMethodReturnType,
                BeanKind::Component => DetectionMethod::ImplementsClause,
            };
            for fqn in fqns {
                self.register_implementation(&fqn, &name, detection);
            }
        }
        for fact in implementations {
            self.register_implementation(&fact.interface, &fact.bean, fact.detection);
        }

        let point_count = injection_points.len();
        self.beans.add_injection_points(injection_points);
        debug!(file = %file.display(), beans = bean_count, injection_points = point_count, "Ingested facts");
    }

    pub fn ingest_all(&mut self, batches: impl IntoIterator<Item = FactBatch>) {
        let mut files = 0usize;
        for batch in batches {
            self.ingest(batch);
            files += 1;
        }
        let mut stats = self.stats();
        if stats.beans.tombstones > stats.beans.beans + stats.beans.injection_points {
            self.compact();
            stats = self.stats();
        }
        info!(
            files,
            beans = stats.beans.beans,
            injection_points = stats.beans.injection_points,
            interfaces = stats.interfaces.interfaces,
            "Workspace indexed"
        );
    }

    /// Record `interface_fqn -> bean_name` in the registry and backfill the
    /// bean's implemented interfaces. Unknown beans are skipped.
    pub fn register_implementation(&mut self, interface_fqn: &str, bean_name: &str, detection: DetectionMethod) -> bool {
        let Some(bean) = self.beans.bean(bean_name) else {
            debug!(interface = interface_fqn, bean = bean_name, "Implementation for unknown bean ignored");
            return false;
        };
        if !self.interfaces.register_implementation(interface_fqn, bean, detection) {
            return false;
        }
        let fqn = normalize_fqn(interface_fqn);
        if !bean.implemented_interfaces.iter().any(|i| normalize_fqn(i) == fqn) {
            self.beans.add_implemented_interface(bean_name, &fqn);
        }
        true
    }

    /// Forget an interface entirely, including the backfilled entries on its
    /// implementers.
    pub fn remove_interface(&mut self, interface_fqn: &str) {
        let fqn = normalize_fqn(interface_fqn);
        for bean_name in self.interfaces.remove_interface(&fqn) {
            let stale: Vec<String> = self
                .beans
                .bean(&bean_name)
                .map(|b| {
                    b.implemented_interfaces
                        .iter()
                        .filter(|i| normalize_fqn(i) == fqn)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            for iface in stale {
                self.beans.remove_implemented_interface(&bean_name, &iface);
            }
        }
    }

    /// Evict every fact attributed to `path`. Idempotent.
    pub fn remove_file(&mut self, path: &Path) {
        for name in self.beans.remove_all_for_file(path) {
            self.interfaces.remove_bean_implementations(&name);
        }
        self.interfaces.remove_interface_definitions_for_file(path);
    }

    /// Drop tombstones left by evictions. The registry refers to beans by
    /// name, so it is unaffected.
    pub fn compact(&mut self) {
        self.beans.compact();
    }

    pub fn clear(&mut self) {
        self.beans.clear();
        self.interfaces.clear();
    }

    // ─── Navigation ──────────────────────────────────────────────────

    /// Route an injection point to the beans that satisfy it.
    pub fn navigate(&self, point: &BeanInjectionPoint) -> Navigation<'_> {
        if let Some(fqn) = self.interfaces.lookup(&point.requested_type) {
            let candidates = self.interface_candidates(fqn);
            let hint = point.qualifier_hint.clone().or_else(|| point.explicit_bean_name.clone());
            let ctx = DisambiguationContext::new(fqn, candidates)
                .with_qualifier(hint)
                .at(point.location.clone());
            return Navigation::Interface {
                interface: fqn.to_string(),
                result: resolve(&ctx),
            };
        }
        Navigation::Concrete { candidates: self.beans.find_candidates(point) }
    }

    /// Registered implementers, then beans declared with the interface type
    /// itself (`@Bean PaymentService legacy()`). The resolver filters both.
    fn interface_candidates(&self, fqn: &str) -> Vec<&BeanDefinition> {
        let mut candidates = self.implementations(fqn);
        for bean in self.beans.beans_of_type(fqn) {
            if !candidates.iter().any(|c| c.name == bean.name) {
                candidates.push(bean);
            }
        }
        candidates
    }

    /// Beans implementing `interface_fqn`, in registration order.
    pub fn implementations(&self, interface_fqn: &str) -> Vec<&BeanDefinition> {
        self.interfaces
            .get_implementations(interface_fqn)
            .iter()
            .filter_map(|name| self.beans.bean(name))
            .collect()
    }

    pub fn interfaces_for(&self, bean_name: &str) -> &[String] {
        self.interfaces.get_interfaces_for(bean_name)
    }

    pub fn all_interfaces(&self) -> Vec<&InterfaceDefinition> {
        self.interfaces.get_all_interfaces()
    }

    /// Injection points whose navigation lands on `bean_name`.
    pub fn usages_of(&self, bean_name: &str) -> Vec<&BeanInjectionPoint> {
        self.beans
            .injection_points()
            .filter(|point| self.navigate(point).targets().iter().any(|b| b.name == bean_name))
            .collect()
    }

    /// Classify every injection point.
    pub fn diagnose(&self) -> Vec<InjectionDiagnostic<'_>> {
        self.beans
            .injection_points()
            .map(|point| {
                let nav = self.navigate(point);
                InjectionDiagnostic {
                    point,
                    status: nav.status(),
                    beans: nav.targets().into_iter().map(|b| b.name.as_str()).collect(),
                }
            })
            .collect()
    }

    pub fn validate(&self) -> Vec<RegistryInconsistency> {
        self.interfaces.validate()
    }

    pub fn stats(&self) -> WorkspaceStats {
        WorkspaceStats {
            beans: self.beans.stats(),
            interfaces: self.interfaces.stats(),
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────

    pub fn snapshot(&self) -> IndexSnapshot {
        self.beans.snapshot()
    }

    /// Replace the bean index with `snapshot`. The registry starts empty and
    /// is repopulated by re-ingesting facts.
    pub fn restore(&mut self, snapshot: IndexSnapshot) {
        self.interfaces.clear();
        self.beans.restore(snapshot);
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
