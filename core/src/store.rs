use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{NutritionEntry, WorkoutEntry};

/// Log records that carry an identity and a wall-clock timestamp.
pub trait LogRecord {
    fn id(&self) -> &str;
    fn timestamp(&self) -> NaiveDateTime;

    fn date(&self) -> NaiveDate {
        self.timestamp().date()
    }
}

impl LogRecord for WorkoutEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl LogRecord for NutritionEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// Append-only, insertion-ordered in-memory log.
#[derive(Debug, Clone)]
pub struct LogStore<T> {
    entries: Vec<T>,
}

impl<T> Default for LogStore<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> LogStore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap entries already loaded from disk, keeping their order.
    #[must_use]
    pub fn from_entries(entries: Vec<T>) -> Self {
        Self { entries }
    }

    pub fn record(&mut self, entry: T) -> &T {
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Entries matching `predicate`, in insertion order.
    pub fn query<P>(&self, mut predicate: P) -> impl Iterator<Item = &T>
    where
        P: FnMut(&T) -> bool,
    {
        self.entries.iter().filter(move |e| predicate(e))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: LogRecord> LogStore<T> {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Entries whose calendar date falls in `from..=to`.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = &T> {
        self.query(move |e| (from..=to).contains(&e.date()))
    }

    /// Drop one entry after its file row is gone. Only the storage-backed
    /// delete path calls this; the rest of the log keeps its order.
    pub(crate) fn remove(&mut self, id: &str) -> Option<T> {
        let idx = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(idx))
    }
}

impl<'a, T> IntoIterator for &'a LogStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Both training and nutrition logs, as loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    pub workouts: LogStore<WorkoutEntry>,
    pub nutrition: LogStore<NutritionEntry>,
}

impl Journal {
    #[must_use]
    pub fn new(workouts: Vec<WorkoutEntry>, nutrition: Vec<NutritionEntry>) -> Self {
        Self {
            workouts: LogStore::from_entries(workouts),
            nutrition: LogStore::from_entries(nutrition),
        }
    }

    pub fn nutrition_on(&self, date: NaiveDate) -> impl Iterator<Item = &NutritionEntry> {
        self.nutrition.between(date, date)
    }

    pub fn workouts_on(&self, date: NaiveDate) -> impl Iterator<Item = &WorkoutEntry> {
        self.workouts.between(date, date)
    }
}
