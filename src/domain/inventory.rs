//! Per-user item quantities

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::pet::STARTING_INVENTORY;

/// Item key to quantity. Lines at zero are removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn starting() -> Self {
        let mut inv = Self::default();
        for (key, qty) in STARTING_INVENTORY {
            inv.add(key, *qty);
        }
        inv
    }

    pub fn quantity(&self, key: &str) -> u32 {
        self.items.get(key).copied().unwrap_or(0)
    }

    pub fn add(&mut self, key: &str, qty: u32) {
        if qty == 0 {
            return;
        }
        *self.items.entry(key.to_string()).or_insert(0) += qty;
    }

    /// Remove one unit. Returns false when the item is not owned.
    pub fn take_one(&mut self, key: &str) -> bool {
        match self.items.get_mut(key) {
            Some(qty) if *qty > 1 => {
                *qty -= 1;
                true
            }
            Some(_) => {
                self.items.remove(key);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
