//! In-progress slot selection for one session.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bookhub_core::types::{ResourceId, SlotIndex};

/// A session-scoped set of chosen slots for one (resource, date) pair.
///
/// Invariants: all members share the selection's resource and date, indices
/// are unique, and consumers always see them sorted ascending. A selection
/// never outlives a date or resource change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// The resource all chosen slots belong to.
    pub resource_id: ResourceId,
    /// The date all chosen slots fall on.
    pub date: NaiveDate,
    /// Chosen slot indices, kept sorted and de-duplicated.
    indices: BTreeSet<SlotIndex>,
}

impl Selection {
    /// Create an empty selection fixed to one (resource, date) pair.
    pub fn new(resource_id: ResourceId, date: NaiveDate) -> Self {
        Self {
            resource_id,
            date,
            indices: BTreeSet::new(),
        }
    }

    /// Whether the slot index is currently selected.
    pub fn contains(&self, index: SlotIndex) -> bool {
        self.indices.contains(&index)
    }

    /// Add a slot index. Returns `false` if it was already present.
    pub fn insert(&mut self, index: SlotIndex) -> bool {
        self.indices.insert(index)
    }

    /// Remove a slot index. Returns `false` if it was not present.
    pub fn remove(&mut self, index: SlotIndex) -> bool {
        self.indices.remove(&index)
    }

    /// Drop every index in `lost` (used after a commit conflict).
    pub fn retain_free(&mut self, lost: &[SlotIndex]) {
        for index in lost {
            self.indices.remove(index);
        }
    }

    /// Number of selected slots.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no slots are selected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The selected indices, sorted ascending.
    pub fn sorted_indices(&self) -> Vec<SlotIndex> {
        self.indices.iter().copied().collect()
    }
}
