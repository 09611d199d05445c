//! Recently viewed products
//!
//! Bounded most-recent-first list of product views, one entry per product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of remembered views
pub const RECENTLY_VIEWED_CAPACITY: usize = 10;

/// A single view record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedEntry {
    pub product_id: Uuid,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentlyViewed {
    entries: Vec<ViewedEntry>,
}

impl RecentlyViewed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored entries, newest first. Duplicates and overflow
    /// are dropped.
    pub fn from_entries(entries: Vec<ViewedEntry>) -> Self {
        let mut list = Self::new();
        for entry in entries.into_iter().rev() {
            list.record(entry.product_id, entry.viewed_at);
        }
        list
    }

    /// Record a view: drop any earlier entry for the product, put it in front,
    /// then truncate to capacity.
    pub fn record(&mut self, product_id: Uuid, viewed_at: DateTime<Utc>) {
        self.entries.retain(|e| e.product_id != product_id);
        self.entries.insert(
            0,
            ViewedEntry {
                product_id,
                viewed_at,
            },
        );
        self.entries.truncate(RECENTLY_VIEWED_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[ViewedEntry] {
        &self.entries
    }

    pub fn product_ids(&self) -> Vec<Uuid> {
        self.entries.iter().map(|e| e.product_id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
