//! Captured prizes
//!
//! Keeps the full capture history for the running total and the top few
//! prizes by value for the sidebar.

use serde::{Deserialize, Serialize};

use crate::consts::TOP_RANKED_LEN;
use crate::sim::item::{Category, Item};

/// A captured prize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedItem {
    pub id: u32,
    pub category: Category,
    pub value: u32,
    pub asset: String,
}

impl From<&Item> for CollectedItem {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            category: item.category,
            value: item.value,
            asset: item.asset.clone(),
        }
    }
}

/// Player title earned from total winnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerRank {
    Rookie,
    Pro,
    Master,
}

impl PlayerRank {
    pub fn for_total(total: u64) -> Self {
        match total {
            0..50 => PlayerRank::Rookie,
            50..100 => PlayerRank::Pro,
            _ => PlayerRank::Master,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRank::Rookie => "Rookie",
            PlayerRank::Pro => "Pro",
            PlayerRank::Master => "Master",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    capacity: usize,
    history: Vec<CollectedItem>,
    top_ranked: Vec<CollectedItem>,
    running_total: u64,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new(TOP_RANKED_LEN)
    }
}

impl Collection {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            history: Vec::new(),
            top_ranked: Vec::with_capacity(capacity + 1),
            running_total: 0,
        }
    }

    /// Record a captured item. Returns its rank in the top list (1-indexed)
    /// if it made the cut.
    pub fn record(&mut self, item: &Item) -> Option<usize> {
        let entry = CollectedItem::from(item);
        self.running_total += u64::from(entry.value);
        self.history.push(entry.clone());

        // Ties keep the earlier capture ahead
        let pos = self
            .top_ranked
            .iter()
            .position(|e| entry.value > e.value)
            .unwrap_or(self.top_ranked.len());
        self.top_ranked.insert(pos, entry);
        self.top_ranked.truncate(self.capacity);

        (pos < self.capacity).then_some(pos + 1)
    }

    pub fn top_ranked(&self) -> &[CollectedItem] {
        &self.top_ranked
    }

    pub fn history(&self) -> &[CollectedItem] {
        &self.history
    }

    pub fn running_total(&self) -> u64 {
        self.running_total
    }

    pub fn captured_count(&self) -> usize {
        self.history.len()
    }

    pub fn player_rank(&self) -> PlayerRank {
        PlayerRank::for_total(self.running_total)
    }
}
