//! Interface registry: the bidirectional interface ↔ implementing-bean graph.
//!
//! Interface keys are normalized FQNs (generics erased, `/` and `\` turned into
//! `.`); beans are referenced by name. Every mutation keeps the forward map
//! (interface → beans), the reverse map (bean → interfaces) and the
//! relationship log in agreement.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{BeanDefinition, DetectionMethod, ImplementationRelationship, InterfaceDefinition};
use crate::type_match::{normalize_fqn, simple_name};

#[derive(Debug, Default)]
pub struct InterfaceRegistry {
    /// normalized FQN -> definition
    interfaces: HashMap<String, InterfaceDefinition>,
    /// normalized FQN -> implementing bean names, in registration order
    implementations: HashMap<String, Vec<String>>,
    /// bean name -> normalized FQNs, in registration order
    bean_interfaces: HashMap<String, Vec<String>>,
    relationships: Vec<ImplementationRelationship>,
    /// simple name -> every known FQN with that simple name
    simple_names: HashMap<String, BTreeSet<String>>,
    clock: u64,
}

/// A divergence between the forward map, the reverse map and the relationship log.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RegistryInconsistency {
    /// Forward edge without its reverse edge.
    MissingReverse { interface: String, bean: String },
    /// Reverse edge without its forward edge.
    MissingForward { interface: String, bean: String },
    /// Edge present in the maps but absent from the relationship log.
    MissingRelationship { interface: String, bean: String },
    /// Relationship record whose edge is absent from the maps.
    OrphanRelationship { interface: String, bean: String },
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub interfaces: usize,
    pub implemented_interfaces: usize,
    pub beans: usize,
    pub relationships: usize,
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Mutation ────────────────────────────────────────────────────

    /// Insert or overwrite an interface definition (re-extraction of a
    /// modified file replaces the previous definition).
    pub fn register_interface(&mut self, def: InterfaceDefinition) {
        let fqn = normalize_fqn(&def.fully_qualified_name);
        if fqn.is_empty() {
            debug!("Ignoring interface with empty name");
            return;
        }
        self.remember_simple_name(&fqn);
        self.interfaces.insert(fqn, def);
    }

    /// Record that `bean` implements `interface_fqn`.
    ///
    /// Returns false (and records nothing) when the same edge is already
    /// present, or when the interface name is empty.
    pub fn register_implementation(
        &mut self,
        interface_fqn: &str,
        bean: &BeanDefinition,
        detection_method: DetectionMethod,
    ) -> bool {
        let fqn = normalize_fqn(interface_fqn);
        if fqn.is_empty() {
            debug!(bean = %bean.name, "Ignoring implementation of empty interface name");
            return false;
        }
        let beans = self.implementations.entry(fqn.clone()).or_default();
        if beans.iter().any(|b| b == &bean.name) {
            debug!(interface = %fqn, bean = %bean.name, "Duplicate implementation suppressed");
            return false;
        }
        beans.push(bean.name.clone());
        self.bean_interfaces
            .entry(bean.name.clone())
            .or_default()
            .push(fqn.clone());
        self.clock += 1;
        self.relationships.push(ImplementationRelationship {
            interface_fqn: fqn.clone(),
            bean_name: bean.name.clone(),
            detection_method,
            recorded_at: self.clock,
        });
        self.remember_simple_name(&fqn);
        true
    }

    /// Strip a bean from every interface it implements. No-op for unknown beans.
    pub fn remove_bean_implementations(&mut self, bean_name: &str) {
        let Some(fqns) = self.bean_interfaces.remove(bean_name) else {
            debug!(bean = bean_name, "No implementations recorded for bean");
            return;
        };
        for fqn in &fqns {
            if let Some(beans) = self.implementations.get_mut(fqn) {
                beans.retain(|b| b != bean_name);
                if beans.is_empty() {
                    self.implementations.remove(fqn);
                }
            }
            self.forget_simple_name_if_unused(fqn);
        }
        self.relationships.retain(|r| r.bean_name != bean_name);
    }

    /// Remove an interface definition together with every edge that references
    /// it. Returns the names of the beans that lost an edge. No-op for unknown
    /// interfaces.
    pub fn remove_interface(&mut self, interface_fqn: &str) -> Vec<String> {
        let fqn = normalize_fqn(interface_fqn);
        let had_def = self.interfaces.remove(&fqn).is_some();
        let beans = self.implementations.remove(&fqn).unwrap_or_default();
        if !had_def && beans.is_empty() {
            debug!(interface = %fqn, "Removal of unknown interface ignored");
            return Vec::new();
        }
        for bean in &beans {
            if let Some(fqns) = self.bean_interfaces.get_mut(bean) {
                fqns.retain(|f| f != &fqn);
                if fqns.is_empty() {
                    self.bean_interfaces.remove(bean);
                }
            }
        }
        self.relationships.retain(|r| r.interface_fqn != fqn);
        self.forget_simple_name_if_unused(&fqn);
        beans
    }

    /// Drop the definitions declared in `path`. Edges are kept: implementers
    /// in other files still implement the interface, and re-extraction of the
    /// file registers the definition again.
    pub fn remove_interface_definitions_for_file(&mut self, path: &Path) -> Vec<String> {
        let removed: Vec<String> = self
            .interfaces
            .iter()
            .filter(|(_, def)| def.location.file == path)
            .map(|(fqn, _)| fqn.clone())
            .collect();
        for fqn in &removed {
            self.interfaces.remove(fqn);
            self.forget_simple_name_if_unused(fqn);
        }
        removed
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn remember_simple_name(&mut self, fqn: &str) {
        self.simple_names
            .entry(simple_name(fqn).to_string())
            .or_default()
            .insert(fqn.to_string());
    }

    fn forget_simple_name_if_unused(&mut self, fqn: &str) {
        if self.interfaces.contains_key(fqn) || self.implementations.contains_key(fqn) {
            return;
        }
        let key = simple_name(fqn);
        if let Some(set) = self.simple_names.get_mut(key) {
            set.remove(fqn);
            if set.is_empty() {
                self.simple_names.remove(key);
            }
        }
    }

    // ─── Lookup ──────────────────────────────────────────────────────

    /// Implementing bean names for an interface, in registration order.
    pub fn get_implementations(&self, interface_fqn: &str) -> &[String] {
        self.implementations
            .get(&normalize_fqn(interface_fqn))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Interfaces a bean implements, in registration order.
    pub fn get_interfaces_for(&self, bean_name: &str) -> &[String] {
        self.bean_interfaces
            .get(bean_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get_interface(&self, interface_fqn: &str) -> Option<&InterfaceDefinition> {
        self.interfaces.get(&normalize_fqn(interface_fqn))
    }

    /// All registered definitions, sorted by FQN.
    pub fn get_all_interfaces(&self) -> Vec<&InterfaceDefinition> {
        let mut all: Vec<(&String, &InterfaceDefinition)> = self.interfaces.iter().collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all.into_iter().map(|(_, def)| def).collect()
    }

    /// Every interface FQN that has a definition or at least one implementer, sorted.
    pub fn known_interfaces(&self) -> Vec<&str> {
        let mut all: Vec<&str> = self
            .interfaces
            .keys()
            .chain(self.implementations.keys())
            .map(String::as_str)
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    /// Resolve a possibly partial type reference to a known interface FQN.
    ///
    /// The normalized name is tried first; a bare simple name resolves only
    /// when exactly one known interface carries it.
    pub fn lookup(&self, ty: &str) -> Option<&str> {
        let fqn = normalize_fqn(ty);
        if fqn.is_empty() {
            return None;
        }
        if let Some((key, _)) = self.interfaces.get_key_value(&fqn) {
            return Some(key.as_str());
        }
        if let Some((key, _)) = self.implementations.get_key_value(&fqn) {
            return Some(key.as_str());
        }
        let candidates = self.simple_names.get(simple_name(&fqn))?;
        if candidates.len() == 1 {
            candidates.iter().next().map(String::as_str)
        } else {
            debug!(ty, matches = candidates.len(), "Ambiguous simple interface name");
            None
        }
    }

    pub fn relationships(&self) -> &[ImplementationRelationship] {
        &self.relationships
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty() && self.implementations.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            interfaces: self.interfaces.len(),
            implemented_interfaces: self.implementations.len(),
            beans: self.bean_interfaces.len(),
            relationships: self.relationships.len(),
        }
    }

    // ─── Diagnostics ─────────────────────────────────────────────────

    /// Scan for divergence between the forward map, the reverse map and the
    /// relationship log. An empty result means the registry is consistent.
    pub fn validate(&self) -> Vec<RegistryInconsistency> {
        let mut issues = Vec::new();

        for (fqn, beans) in &self.implementations {
            for bean in beans {
                if !self.get_interfaces_for(bean).contains(fqn) {
                    issues.push(RegistryInconsistency::MissingReverse {
                        interface: fqn.clone(),
                        bean: bean.clone(),
                    });
                }
                if !self.relationships.iter().any(|r| &r.interface_fqn == fqn && &r.bean_name == bean) {
                    issues.push(RegistryInconsistency::MissingRelationship {
                        interface: fqn.clone(),
                        bean: bean.clone(),
                    });
                }
            }
        }

        for (bean, fqns) in &self.bean_interfaces {
            for fqn in fqns {
                if !self.get_implementations(fqn).contains(bean) {
                    issues.push(RegistryInconsistency::MissingForward {
                        interface: fqn.clone(),
                        bean: bean.clone(),
                    });
                }
            }
        }

        for r in &self.relationships {
            if !self.get_implementations(&r.interface_fqn).contains(&r.bean_name) {
                issues.push(RegistryInconsistency::OrphanRelationship {
                    interface: r.interface_fqn.clone(),
                    bean: r.bean_name.clone(),
                });
            }
        }

        if !issues.is_empty() {
            warn!(count = issues.len(), "Interface registry is inconsistent");
        }
        issues
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "interfaces_tests.rs"]
mod tests;
