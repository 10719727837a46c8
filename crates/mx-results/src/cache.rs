//! In-memory recipe cache keyed by batch key.

use crate::types::BatchKey;
use mx_mix::GeneratedRecipe;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub type SharedBatch = Arc<Vec<GeneratedRecipe>>;

/// Bounded map from batch key to a generated batch. The oldest insert is evicted first.
#[derive(Debug)]
pub struct RecipeCache {
    capacity: usize,
    entries: HashMap<BatchKey, SharedBatch>,
    order: VecDeque<BatchKey>,
}

impl Default for RecipeCache {
    fn default() -> Self {
        Self::new(16)
    }
}

impl RecipeCache {
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<SharedBatch> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: BatchKey, batch: SharedBatch) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.clone(), batch).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<SharedBatch> {
        self.order.retain(|k| k != key);
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
