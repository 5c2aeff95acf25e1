use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::stats::kv::{KeyValueStore, MemoryStore};

/// Cumulative seconds and run count for one check.
///
/// Serialized as `[cumulativeSeconds, count]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatEntry(pub f64, pub u64);

impl StatEntry {
    pub fn total(&self) -> Duration {
        Duration::try_from_secs_f64(self.0).unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> u64 {
        self.1
    }

    pub fn average(&self) -> Duration {
        if self.1 == 0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self.0 / self.1 as f64).unwrap_or(Duration::ZERO)
    }

    /// Seconds representable as a `Duration`.
    fn is_valid(&self) -> bool {
        Duration::try_from_secs_f64(self.0).is_ok()
    }
}

/// Running timing statistics per check name, persisted on every change.
///
/// Writes are best-effort: a failing store is logged and the in-memory
/// numbers keep going.
pub struct StatsStore {
    store: Box<dyn KeyValueStore>,
    stats: BTreeMap<String, StatEntry>,
}

impl StatsStore {
    /// Key of the persisted record.
    pub const KEY: &'static str = "stats";

    pub fn open(store: impl KeyValueStore + 'static) -> Self {
        let mut stats: BTreeMap<String, StatEntry> = match store.get(Self::KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable stats record: {}", e);
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!("Failed to load stats: {}", e);
                BTreeMap::new()
            }
        };
        stats.retain(|name, entry| {
            let valid = entry.is_valid();
            if !valid {
                warn!("Dropping invalid stats for {}: {:?}", name, entry);
            }
            valid
        });
        debug!("Loaded stats for {} checks", stats.len());

        Self {
            store: Box::new(store),
            stats,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(MemoryStore::new())
    }

    pub fn add_stat(&mut self, value: Duration, test_name: &str) {
        let secs = value.as_secs_f64();
        self.stats
            .entry(test_name.to_string())
            .and_modify(|entry| {
                entry.0 += secs;
                entry.1 += 1;
            })
            .or_insert(StatEntry(secs, 1));
        self.persist();
    }

    /// Average duration for `test_name`, zero if it never ran.
    pub fn average(&self, test_name: &str) -> Duration {
        self.stats
            .get(test_name)
            .map(StatEntry::average)
            .unwrap_or(Duration::ZERO)
    }

    pub fn get(&self, test_name: &str) -> Option<StatEntry> {
        self.stats.get(test_name).copied()
    }

    /// Entries sorted by name
    pub fn entries(&self) -> impl Iterator<Item = (&str, &StatEntry)> {
        self.stats.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn clear(&mut self) {
        self.stats.clear();
        self.persist();
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.stats)
            .map_err(crate::ProbeError::from)
            .and_then(|raw| self.store.set(Self::KEY, &raw));
        if let Err(e) = result {
            warn!("Failed to save stats: {}", e);
        }
    }
}
