//! Read-only view of the item registry.
//!
//! Items are minted, transferred and burned elsewhere. The battle engine only
//! asks one question, "how much combat power does item X carry", through
//! [`ItemLedger`]. Item id 0 means "nothing equipped" and always has power 0.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an item in the external registry.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(u64);

impl ItemId {
    /// "No item equipped."
    pub const NONE: Self = Self(0);

    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns true for [`ItemId::NONE`].
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Combat-power lookup supplied by the item registry.
pub trait ItemLedger: Send + Sync {
    /// Power of `item`; 0 for [`ItemId::NONE`] and for unknown ids.
    fn power_of(&self, item: ItemId) -> u64;
}

/// Ledger with no items at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoItems;

impl ItemLedger for NoItems {
    fn power_of(&self, _item: ItemId) -> u64 {
        0
    }
}

/// In-memory power table.
///
/// # Example
///
/// ```
/// use arena_core::items::{ItemCatalog, ItemId, ItemLedger};
///
/// let catalog = ItemCatalog::new().with_item(ItemId::new(1), 100);
/// assert_eq!(catalog.power_of(ItemId::new(1)), 100);
/// assert_eq!(catalog.power_of(ItemId::new(2)), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCatalog {
    powers: BTreeMap<ItemId, u64>,
}

impl ItemCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`ItemCatalog::insert`].
    #[must_use]
    pub fn with_item(mut self, item: ItemId, power: u64) -> Self {
        self.insert(item, power);
        self
    }

    /// Records the power of `item`. Inserting [`ItemId::NONE`] is ignored.
    pub fn insert(&mut self, item: ItemId, power: u64) {
        if item.is_none() {
            return;
        }
        self.powers.insert(item, power);
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.powers.keys().copied()
    }

    /// Number of catalogued items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.powers.len()
    }

    /// Returns true if no items are catalogued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }
}

impl ItemLedger for ItemCatalog {
    fn power_of(&self, item: ItemId) -> u64 {
        self.powers.get(&item).copied().unwrap_or(0)
    }
}
