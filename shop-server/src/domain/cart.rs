use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-user mapping from product id to held quantity.
///
/// Serialized as a JSON object keyed by the decimal product id,
/// e.g. `{"0":0,"1":2}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(BTreeMap<u32, u32>);

impl Cart {
    /// Number of slots a new account starts with.
    pub const SEEDED_SLOTS: u32 = 300;

    /// Cart with slots `0..SEEDED_SLOTS`, all zero.
    pub fn seeded() -> Self {
        Self((0..Self::SEEDED_SLOTS).map(|id| (id, 0)).collect())
    }

    pub fn quantity(&self, item_id: u32) -> u32 {
        self.0.get(&item_id).copied().unwrap_or(0)
    }

    /// Adds one unit; an absent slot counts as zero.
    pub fn add(&mut self, item_id: u32) -> u32 {
        let slot = self.0.entry(item_id).or_insert(0);
        *slot = slot.saturating_add(1);
        *slot
    }

    /// Removes one unit if any is held. Returns `false` when nothing changed.
    pub fn remove(&mut self, item_id: u32) -> bool {
        match self.0.get_mut(&item_id) {
            Some(slot) if *slot > 0 => {
                *slot -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(id, qty)| (*id, *qty))
    }
}
