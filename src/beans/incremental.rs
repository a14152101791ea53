//! Incremental updates for BeanIndex (per-file eviction for re-indexing).

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use super::types::*;

fn retain_slots(map: &mut std::collections::HashMap<String, Vec<u32>>, removed: &HashSet<u32>) {
    map.retain(|_, v| {
        v.retain(|idx| !removed.contains(idx));
        !v.is_empty()
    });
}

impl BeanIndex {
    /// Tombstone one bean slot and unlink it from every secondary index.
    pub(crate) fn evict_bean_slot(&mut self, slot: u32) {
        let Some(bean) = self.beans.get_mut(slot as usize).and_then(Option::take) else {
            return;
        };
        if self.name_index.get(&bean.name) == Some(&slot) {
            self.name_index.remove(&bean.name);
        }
        let removed: HashSet<u32> = [slot].into_iter().collect();
        retain_slots(&mut self.type_index, &removed);
        retain_slots(&mut self.qualifier_index, &removed);
        retain_slots(&mut self.interface_index, &removed);
        if let Some(slots) = self.file_index.get_mut(&bean.location.file) {
            slots.retain(|&s| s != slot);
            if slots.is_empty() {
                self.file_index.remove(&bean.location.file);
            }
        }
    }

    /// Evict every bean and injection point attributed to `path`.
    ///
    /// Returns the names of the evicted beans so the caller can strip them from
    /// other stores. Calling this for a file that was never indexed is a no-op.
    pub fn remove_all_for_file(&mut self, path: &Path) -> Vec<String> {
        let bean_slots = self.file_index.remove(path).unwrap_or_default();
        let point_slots = self.point_file_index.remove(path).unwrap_or_default();
        if bean_slots.is_empty() && point_slots.is_empty() {
            debug!(file = %path.display(), "Nothing indexed for file");
            return Vec::new();
        }

        let removed: HashSet<u32> = bean_slots.iter().copied().collect();
        let mut names = Vec::with_capacity(bean_slots.len());
        for &slot in &bean_slots {
            if let Some(bean) = self.beans.get_mut(slot as usize).and_then(Option::take) {
                if self.name_index.get(&bean.name) == Some(&slot) {
                    self.name_index.remove(&bean.name);
                }
                names.push(bean.name);
            }
        }
        retain_slots(&mut self.type_index, &removed);
        retain_slots(&mut self.qualifier_index, &removed);
        retain_slots(&mut self.interface_index, &removed);

        for &slot in &point_slots {
            if let Some(entry) = self.injection_points.get_mut(slot as usize) {
                *entry = None;
            }
        }

        debug!(
            file = %path.display(),
            beans = names.len(),
            injection_points = point_slots.len(),
            "Evicted file from bean index"
        );

        // Check for excessive tombstone growth
        let active_count = self.bean_count();
        let total_count = self.beans.len();
        if total_count > 0 && total_count > active_count * 2 {
            warn!(
                total = total_count,
                active = active_count,
                waste_pct = ((total_count - active_count) * 100) / total_count,
                "Bean index has significant tombstone growth, consider compacting"
            );
        }

        names
    }

    /// Rebuild dense storage without tombstones. Relative registration order is
    /// preserved.
    pub fn compact(&mut self) {
        let beans: Vec<_> = std::mem::take(&mut self.beans).into_iter().flatten().collect();
        let points: Vec<_> = std::mem::take(&mut self.injection_points)
            .into_iter()
            .flatten()
            .collect();
        *self = BeanIndex::default();
        self.add_beans(beans);
        self.add_injection_points(points);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        *self = BeanIndex::default();
    }
}
