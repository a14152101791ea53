//! Bean index: stores bean definitions and injection points and answers
//! "which beans satisfy this injection point" for concrete-type references.

mod types;
mod storage;
mod incremental;

pub use types::*;
pub use storage::*;

use std::path::Path;

use tracing::debug;

use crate::model::{BeanDefinition, BeanInjectionPoint};
use crate::type_match::{matches_interface, normalize_fqn, simple_name};

/// Secondary-index key for a type reference: the simple name of its normalized
/// form. Every pair accepted by `matches_interface` shares this key.
pub(crate) fn type_key(ty: &str) -> String {
    simple_name(&normalize_fqn(ty)).to_string()
}

fn push_slot(map: &mut std::collections::HashMap<String, Vec<u32>>, key: String, slot: u32) {
    map.entry(key).or_default().push(slot);
}

impl BeanIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Mutation ────────────────────────────────────────────────────

    /// Append beans. A bean whose name is already indexed replaces the old
    /// definition; no other validation is done.
    pub fn add_beans(&mut self, beans: impl IntoIterator<Item = BeanDefinition>) {
        for bean in beans {
            if let Some(&old) = self.name_index.get(&bean.name) {
                debug!(name = %bean.name, "Overwriting bean with duplicate name");
                self.evict_bean_slot(old);
            }
            let slot = self.beans.len() as u32;
            self.index_bean(&bean, slot);
            self.beans.push(Some(bean));
        }
    }

    pub fn add_injection_points(&mut self, points: impl IntoIterator<Item = BeanInjectionPoint>) {
        for point in points {
            let slot = self.injection_points.len() as u32;
            self.point_file_index
                .entry(point.location.file.clone())
                .or_default()
                .push(slot);
            self.injection_points.push(Some(point));
        }
    }

    pub(crate) fn index_bean(&mut self, bean: &BeanDefinition, slot: u32) {
        self.name_index.insert(bean.name.clone(), slot);
        push_slot(&mut self.type_index, type_key(&bean.ty), slot);
        for label in &bean.qualifiers {
            push_slot(&mut self.qualifier_index, label.clone(), slot);
        }
        let mut seen = std::collections::HashSet::new();
        for iface in &bean.implemented_interfaces {
            let key = type_key(iface);
            if seen.insert(key.clone()) {
                push_slot(&mut self.interface_index, key, slot);
            }
        }
        self.file_index
            .entry(bean.location.file.clone())
            .or_default()
            .push(slot);
    }

    /// Backfill one implemented interface. Returns false when the bean is
    /// unknown or already lists that interface.
    pub fn add_implemented_interface(&mut self, bean_name: &str, interface_fqn: &str) -> bool {
        let Some(&slot) = self.name_index.get(bean_name) else {
            debug!(bean = bean_name, "Backfill for unknown bean ignored");
            return false;
        };
        let Some(bean) = self.beans[slot as usize].as_mut() else {
            return false;
        };
        if bean.implemented_interfaces.iter().any(|i| i == interface_fqn) {
            return false;
        }
        let key = type_key(interface_fqn);
        let key_already_indexed = bean
            .implemented_interfaces
            .iter()
            .any(|i| type_key(i) == key);
        bean.implemented_interfaces.push(interface_fqn.to_string());
        if !key_already_indexed {
            let slots = self.interface_index.entry(key).or_default();
            if let Err(pos) = slots.binary_search(&slot) {
                slots.insert(pos, slot);
            }
        }
        true
    }

    /// Replace a bean's implemented interfaces wholesale. Returns false for
    /// unknown beans.
    pub fn set_implemented_interfaces(&mut self, bean_name: &str, interfaces: &[String]) -> bool {
        let Some(bean) = self.bean(bean_name) else {
            return false;
        };
        let current = bean.implemented_interfaces.clone();
        for fqn in &current {
            self.remove_implemented_interface(bean_name, fqn);
        }
        for fqn in interfaces {
            self.add_implemented_interface(bean_name, fqn);
        }
        true
    }

    /// Drop one implemented interface from a bean (used when the interface
    /// itself is removed).
    pub fn remove_implemented_interface(&mut self, bean_name: &str, interface_fqn: &str) -> bool {
        let Some(&slot) = self.name_index.get(bean_name) else {
            return false;
        };
        let Some(bean) = self.beans[slot as usize].as_mut() else {
            return false;
        };
        let before = bean.implemented_interfaces.len();
        bean.implemented_interfaces.retain(|i| i != interface_fqn);
        if bean.implemented_interfaces.len() == before {
            return false;
        }
        let key = type_key(interface_fqn);
        if !bean.implemented_interfaces.iter().any(|i| type_key(i) == key) {
            if let Some(slots) = self.interface_index.get_mut(&key) {
                slots.retain(|&s| s != slot);
                if slots.is_empty() {
                    self.interface_index.remove(&key);
                }
            }
        }
        true
    }

    // ─── Lookup ──────────────────────────────────────────────────────

    /// Rank the beans that satisfy `point`.
    ///
    /// Rules are tried in order and the first non-empty one wins: qualifier
    /// label, explicit bean name, type match (collapsed to the single primary
    /// bean when exactly one is flagged), then implemented-interface match.
    /// An empty result means the point is not resolvable.
    pub fn find_candidates(&self, point: &BeanInjectionPoint) -> Vec<Candidate<'_>> {
        if let Some(hint) = point.qualifier_hint.as_deref() {
            let found = self.live_beans(self.qualifier_index.get(hint));
            if !found.is_empty() {
                debug!(qualifier = hint, count = found.len(), "Candidates by qualifier");
                return found
                    .into_iter()
                    .map(|bean| Candidate { bean, reason: MatchReason::QualifierMatch })
                    .collect();
            }
        }

        if let Some(name) = point.explicit_bean_name.as_deref() {
            if let Some(bean) = self.bean(name) {
                debug!(name, "Candidate by explicit bean name");
                return vec![Candidate { bean, reason: MatchReason::NameMatch }];
            }
        }

        let key = type_key(&point.requested_type);
        let by_type: Vec<&BeanDefinition> = self
            .live_beans(self.type_index.get(&key))
            .into_iter()
            .filter(|bean| matches_interface(&bean.ty, &point.requested_type))
            .collect();
        if !by_type.is_empty() {
            let primaries: Vec<&BeanDefinition> =
                by_type.iter().copied().filter(|b| b.is_primary).collect();
            if let [only] = primaries.as_slice() {
                return vec![Candidate { bean: *only, reason: MatchReason::Primary }];
            }
            let mut ranked: Vec<Candidate<'_>> = by_type
                .into_iter()
                .map(|bean| Candidate {
                    bean,
                    reason: if bean.is_primary { MatchReason::Primary } else { MatchReason::TypeMatch },
                })
                .collect();
            // stable: equal scores keep registration order
            ranked.sort_by(|a, b| b.score().cmp(&a.score()));
            return ranked;
        }

        let by_interface: Vec<Candidate<'_>> = self
            .live_beans(self.interface_index.get(&key))
            .into_iter()
            .filter(|bean| bean.implements(&point.requested_type))
            .map(|bean| Candidate { bean, reason: MatchReason::SubtypeMatch })
            .collect();
        if by_interface.is_empty() {
            debug!(ty = %point.requested_type, "No candidates");
        }
        by_interface
    }

    fn live_beans(&self, slots: Option<&Vec<u32>>) -> Vec<&BeanDefinition> {
        slots
            .into_iter()
            .flatten()
            .filter_map(|&slot| self.beans.get(slot as usize).and_then(Option::as_ref))
            .collect()
    }

    pub fn bean(&self, name: &str) -> Option<&BeanDefinition> {
        let &slot = self.name_index.get(name)?;
        self.beans.get(slot as usize).and_then(Option::as_ref)
    }

    /// Live beans in registration order.
    pub fn beans(&self) -> impl Iterator<Item = &BeanDefinition> {
        self.beans.iter().flatten()
    }

    /// Live beans whose type matches `ty` (exact or short-name), in registration order.
    pub fn beans_of_type(&self, ty: &str) -> Vec<&BeanDefinition> {
        self.live_beans(self.type_index.get(&type_key(ty)))
            .into_iter()
            .filter(|bean| matches_interface(&bean.ty, ty))
            .collect()
    }

    pub fn beans_in_file(&self, path: &Path) -> Vec<&BeanDefinition> {
        self.live_beans(self.file_index.get(path))
    }

    /// Live injection points in registration order.
    pub fn injection_points(&self) -> impl Iterator<Item = &BeanInjectionPoint> {
        self.injection_points.iter().flatten()
    }

    pub fn injection_points_for_file(&self, path: &Path) -> Vec<&BeanInjectionPoint> {
        self.point_file_index
            .get(path)
            .into_iter()
            .flatten()
            .filter_map(|&slot| self.injection_points.get(slot as usize).and_then(Option::as_ref))
            .collect()
    }

    /// Every file that currently contributes a bean or an injection point, sorted.
    pub fn files(&self) -> Vec<&Path> {
        let mut files: Vec<&Path> = self
            .file_index
            .keys()
            .chain(self.point_file_index.keys())
            .map(|p| p.as_path())
            .collect();
        files.sort();
        files.dedup();
        files
    }

    pub fn bean_count(&self) -> usize {
        self.name_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_index.is_empty() && self.point_file_index.is_empty()
    }

    pub fn stats(&self) -> BeanIndexStats {
        let live_points = self.injection_points.iter().flatten().count();
        BeanIndexStats {
            beans: self.bean_count(),
            injection_points: live_points,
            files: self.files().len(),
            tombstones: (self.beans.len() - self.bean_count())
                + (self.injection_points.len() - live_points),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "beans_tests.rs"]
mod tests;
