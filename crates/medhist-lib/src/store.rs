//! In-memory record store backed by an ordered `Vec`.
//!
//! Entries keep creation order. Removal only flips the `active` flag, so a
//! removed entry stays retrievable until the store is replaced by an import
//! or pruned explicitly.

use tracing::{debug, info};

use crate::error::{MedHistError, Result};
use crate::model::{ConditionEntry, SavedDocument, SeedCondition, Status};

/// The default seed list, in display order.
pub const DEFAULT_SEED: [(&str, Status, &str, &str); 11] = [
    ("Diabetes", Status::Yes, "2018", "Type 1"),
    ("Hypertension", Status::Yes, "", ""),
    ("Thyroid Dysfunction", Status::No, "", ""),
    ("Migraine", Status::Yes, "", ""),
    ("Cardiac", Status::No, "", ""),
    ("Epilepsy", Status::No, "", ""),
    ("Asthma", Status::No, "", ""),
    ("TB", Status::Yes, "", ""),
    ("Blood Transfusion", Status::Yes, "", ""),
    ("Surgery", Status::No, "", ""),
    ("Thromboembolism", Status::No, "", ""),
];

/// The default seed list as owned rows.
#[must_use]
pub fn default_seed() -> Vec<SeedCondition> {
    DEFAULT_SEED
        .iter()
        .map(|&(name, status, since, notes)| SeedCondition {
            name: name.to_string(),
            status,
            since: since.to_string(),
            notes: notes.to_string(),
        })
        .collect()
}

/// Ordered collection of condition entries held for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    entries: Vec<ConditionEntry>,
    active_count: i64,
    /// Highest id this store has held since it was created or last loaded.
    high_water: u64,
}

impl RecordStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the default seed list.
    #[must_use]
    pub fn seeded() -> Self {
        Self::from_seed(default_seed())
    }

    /// Create a store from seed rows; ids are assigned 1..=n in order.
    #[must_use]
    pub fn from_seed(seed: impl IntoIterator<Item = SeedCondition>) -> Self {
        Self::from_entries(
            seed.into_iter()
                .zip(1_u64..)
                .map(|(row, id)| row.into_entry(id))
                .collect(),
        )
    }

    /// Create a store from existing entries. The active count is derived
    /// from the entries' `active` flags.
    #[must_use]
    pub fn from_entries(entries: Vec<ConditionEntry>) -> Self {
        let active_count = count_active(&entries);
        let high_water = max_id(&entries);
        Self {
            entries,
            active_count,
            high_water,
        }
    }

    /// Replace the whole store with the contents of a loaded document.
    ///
    /// Prior entries and ids are discarded. The active count is taken from
    /// the document as-is, even when it disagrees with the entries.
    pub fn replace_with(&mut self, document: SavedDocument) {
        let previous = self.entries.len();
        self.high_water = max_id(&document.entries);
        self.entries = document.entries;
        self.active_count = document.active_count;
        info!(
            previous,
            loaded = self.entries.len(),
            active_count = self.active_count,
            "Record store replaced"
        );
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// Set the name of an entry. Returns `false` if the id is absent.
    pub fn set_name(&mut self, id: u64, name: impl Into<String>) -> bool {
        let name = name.into();
        self.edit(id, "name", |entry| entry.name.clone_from(&name))
    }

    /// Set the status of an entry. Returns `false` if the id is absent.
    pub fn set_status(&mut self, id: u64, status: Status) -> bool {
        self.edit(id, "status", |entry| entry.status = status)
    }

    /// Set the onset text of an entry. Returns `false` if the id is absent.
    pub fn set_since(&mut self, id: u64, since: impl Into<String>) -> bool {
        let since = since.into();
        self.edit(id, "since", |entry| entry.since.clone_from(&since))
    }

    /// Set the notes of an entry. Returns `false` if the id is absent.
    pub fn set_notes(&mut self, id: u64, notes: impl Into<String>) -> bool {
        let notes = notes.into();
        self.edit(id, "notes", |entry| entry.notes.clone_from(&notes))
    }

    fn edit<F>(&mut self, id: u64, field: &str, mut apply: F) -> bool
    where
        F: FnMut(&mut ConditionEntry),
    {
        let mut touched = false;
        for entry in self.entries.iter_mut().filter(|e| e.id == id) {
            apply(entry);
            touched = true;
        }
        if touched {
            debug!(id, field, "Entry updated");
        } else {
            debug!(id, field, "Edit ignored: no such entry");
        }
        touched
    }

    /// Append a blank active entry and return its id.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the store already holds id `u64::MAX`.
    pub fn add(&mut self) -> Result<u64> {
        let id = self.next_id().ok_or_else(|| {
            MedHistError::validation("id", format!("no ids left after {}", u64::MAX))
        })?;
        self.entries.push(ConditionEntry::blank(id));
        self.high_water = id;
        self.active_count += 1;
        debug!(id, active_count = self.active_count, "Entry added");
        Ok(id)
    }

    /// Soft-delete an entry. Returns `false` if no active entry has the id.
    pub fn remove(&mut self, id: u64) -> bool {
        let mut flipped = 0_i64;
        for entry in self.entries.iter_mut().filter(|e| e.id == id && e.active) {
            entry.active = false;
            flipped += 1;
        }
        if flipped == 0 {
            debug!(id, "Remove ignored: no active entry");
            return false;
        }
        self.active_count -= flipped;
        debug!(id, active_count = self.active_count, "Entry removed");
        true
    }

    /// Physically drop soft-deleted entries. Returns how many were dropped.
    ///
    /// The id high-water mark is kept, so dropped ids are never reissued.
    pub fn prune_inactive(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.active);
        let pruned = before - self.entries.len();
        if pruned > 0 {
            info!(pruned, "Pruned inactive entries");
        }
        pruned
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The id the next `add` will assign, or `None` once ids are exhausted.
    #[must_use]
    pub fn next_id(&self) -> Option<u64> {
        self.high_water.max(max_id(&self.entries)).checked_add(1)
    }

    /// Look up an entry by id, active or not.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&ConditionEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Visible entries in creation order.
    pub fn active_entries(&self) -> impl Iterator<Item = &ConditionEntry> {
        self.entries.iter().filter(|e| e.active)
    }

    /// Every entry held, including soft-deleted ones.
    #[must_use]
    pub fn entries(&self) -> &[ConditionEntry] {
        &self.entries
    }

    /// The displayed active count.
    ///
    /// Tracks `add`/`remove` and is set verbatim by `replace_with`, so it can
    /// differ from `active_entries().count()` after loading an inconsistent
    /// document.
    #[must_use]
    pub const fn active_count(&self) -> i64 {
        self.active_count
    }

    /// Number of soft-deleted entries still held.
    #[must_use]
    pub fn inactive_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.active).count()
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

#[allow(clippy::cast_possible_wrap)]
fn count_active(entries: &[ConditionEntry]) -> i64 {
    entries.iter().filter(|e| e.active).count() as i64
}

fn max_id(entries: &[ConditionEntry]) -> u64 {
    entries.iter().map(|e| e.id).max().unwrap_or(0)
}
