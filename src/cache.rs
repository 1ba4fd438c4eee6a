//! Owned cache for the country table.

use crate::models::CountryRecord;
use chrono::{DateTime, Utc};

/// Materialized `/countries` response: one row per country, in API order.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryTable {
    pub rows: Vec<CountryRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl CountryTable {
    pub fn new(rows: Vec<CountryRecord>) -> Self {
        Self {
            rows,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Holds the current table (if any) and counts how often it was (re)fetched.
///
/// A store always replaces the previous table; a failed fetch stores `None`.
#[derive(Debug, Clone, Default)]
pub struct CountryCache {
    table: Option<CountryTable>,
    fetch_attempts: usize,
}

impl CountryCache {
    pub fn get(&self) -> Option<&CountryTable> {
        self.table.as_ref()
    }

    pub fn is_populated(&self) -> bool {
        self.table.is_some()
    }

    /// Record the outcome of one fetch attempt.
    pub fn store(&mut self, table: Option<CountryTable>) {
        self.fetch_attempts += 1;
        self.table = table;
    }

    pub fn fetch_attempts(&self) -> usize {
        self.fetch_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> CountryRecord {
        CountryRecord {
            country: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn store_replaces_instead_of_merging() {
        let mut cache = CountryCache::default();
        assert!(!cache.is_populated());
        cache.store(Some(CountryTable::new(vec![row("A"), row("B")])));
        cache.store(Some(CountryTable::new(vec![row("C")])));
        let t = cache.get().unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows[0].country, "C");
        assert_eq!(cache.fetch_attempts(), 2);
    }

    #[test]
    fn failed_store_leaves_cache_empty() {
        let mut cache = CountryCache::default();
        cache.store(Some(CountryTable::new(vec![row("A")])));
        cache.store(None);
        assert!(cache.get().is_none());
        assert!(!cache.is_populated());
        assert_eq!(cache.fetch_attempts(), 2);
    }
}
