//! Concurrent map with per-entry expiry

use std::{hash::Hash, time::Instant};

use crate::prelude::*;

pub struct TtlCache<K, V> {
  entries: DashMap<K, (Instant, V)>,
  ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
  pub fn new(ttl: Duration) -> Self {
    Self { entries: DashMap::new(), ttl }
  }

  /// Expired entries read as missing and are dropped on the spot
  pub fn get(&self, key: &K) -> Option<V> {
    let fresh = {
      let entry = self.entries.get(key)?;
      let (stored_at, value) = entry.value();
      (stored_at.elapsed() < self.ttl).then(|| value.clone())
    };

    if fresh.is_none() {
      self.entries.remove_if(key, |_, (stored_at, _)| {
        stored_at.elapsed() >= self.ttl
      });
    }
    fresh
  }

  pub fn insert(&self, key: K, value: V) {
    self.entries.insert(key, (Instant::now(), value));
  }

  /// Evicts everything past its ttl, returns how many entries went away
  pub fn gc(&self) -> usize {
    let before = self.entries.len();
    self.entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
    before.saturating_sub(self.entries.len())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }
}
