//! Immutable, swap-on-reload zone sets.

use std::collections::HashMap;
use std::sync::Arc;

use cordon_zone::Zone;

/// A fixed collection of zones with by-name lookup.
///
/// The engine holds its current set behind an `Arc` and a reload
/// swaps the whole set at once. Code holding the old `Arc` keeps a
/// consistent snapshot for as long as it needs one; nothing is
/// mutated in place.
#[derive(Debug, Default)]
pub struct ZoneSet {
    list: Vec<Arc<Zone>>,
    by_key: HashMap<String, usize>,
}

impl ZoneSet {
    /// An empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from zones, preserving order.
    ///
    /// Keys are lowercased names. On a key collision the earlier zone
    /// wins, matching assembly in
    /// [`build_zone_set`](cordon_zone::build_zone_set), which never
    /// produces one.
    pub fn from_zones(zones: Vec<Arc<Zone>>) -> Self {
        let mut by_key = HashMap::with_capacity(zones.len());
        for (idx, zone) in zones.iter().enumerate() {
            by_key.entry(zone.key()).or_insert(idx);
        }
        Self {
            list: zones,
            by_key,
        }
    }

    /// Look up a zone by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&Arc<Zone>> {
        self.by_key
            .get(&name.to_ascii_lowercase())
            .map(|&idx| &self.list[idx])
    }

    /// Whether a zone with this name is in the set.
    pub fn contains(&self, name: &str) -> bool {
        self.by_key.contains_key(&name.to_ascii_lowercase())
    }

    /// Zones in set order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Zone>> {
        self.list.iter()
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
