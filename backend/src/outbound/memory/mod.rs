//! In-memory implementation of every repository port.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. It mirrors the PostgreSQL schema's observable rules: unique
//! usernames, emails and asset tags, foreign keys that must resolve on write,
//! and `ON DELETE SET NULL` for every reference.

mod identity;
mod inventory;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::ports::{GroupCount, StoreError};
use crate::domain::{Asset, Employee, Maintenance, SoftwareLicense, User};

/// One table: rows keyed by id plus the next serial value.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn require_mut(&mut self, id: i32, entity: &str) -> Result<&mut T, StoreError> {
        self.rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(entity))
    }

    fn remove(&mut self, id: i32, entity: &str) -> Result<T, StoreError> {
        self.rows
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(entity))
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    employees: Table<Employee>,
    assets: Table<Asset>,
    maintenance: Table<Maintenance>,
    licenses: Table<SoftwareLicense>,
}

/// Thread-safe in-memory store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::connection("in-memory store lock poisoned"))
    }
}

/// Order two optional keys ascending with `None` last.
fn nulls_last<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order two optional keys descending with `None` last.
fn nulls_last_desc<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        _ => nulls_last(a, b),
    }
}

fn apply_limit<T>(mut rows: Vec<T>, limit: Option<i64>) -> Vec<T> {
    if let Some(limit) = limit.and_then(|value| usize::try_from(value).ok()) {
        rows.truncate(limit);
    }
    rows
}

fn count_of(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// Group-by-count with labels ascending and the null bucket last.
fn group_counts<'a>(labels: impl Iterator<Item = Option<&'a str>>) -> Vec<GroupCount> {
    let mut buckets: BTreeMap<Option<&str>, i64> = BTreeMap::new();
    for label in labels {
        *buckets.entry(label).or_default() += 1;
    }
    let mut counts: Vec<GroupCount> = buckets
        .into_iter()
        .map(|(label, count)| GroupCount {
            label: label.map(str::to_owned),
            count,
        })
        .collect();
    counts.sort_by(|a, b| nulls_last(a.label.as_ref(), b.label.as_ref()));
    counts
}
