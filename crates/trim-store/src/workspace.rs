//! One user session over a [`Persistence`] backend.
//!
//! Opening runs load, sample reconciliation and save-back. Every mutation
//! is applied in memory first and then written; a failed write is returned
//! to the caller but the in-memory state is kept and stays dirty until the
//! next successful write.
//!
//! Decisions, categories and the sample ledger are tracked separately. Any
//! write retries all three in the same order: ledger, decisions, categories.
//! The ledger goes first so a deleted sample can never be stored as missing
//! without also being stored as deleted.

use crate::config::Config;
use crate::error::StoreError;
use crate::port::Persistence;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use trim_core::autosave::{Debouncer, DEFAULT_DEBOUNCE};
use trim_core::category::CategoryList;
use trim_core::draft::{self, DraftExit};
use trim_core::error::CoreError;
use trim_core::id::{DecisionId, OptionId};
use trim_core::model::{Decision, Mode};
use trim_core::ops::{self, DecisionPatch, NewDecision, NewSubDecision, OptionPatch, ReorderScope};
use trim_core::reconcile::{self, ReconcileReport, SampleLedger};
use trim_core::sample::SamplePack;
use trim_core::tree;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub samples_enabled: bool,
    pub debounce: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            samples_enabled: true,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            samples_enabled: config.samples.enabled,
            debounce: config.debounce(),
        }
    }
}

pub struct Workspace<P: Persistence> {
    store: P,
    decisions: Vec<Decision>,
    categories: CategoryList,
    ledger: SampleLedger,
    pack: Option<SamplePack>,
    report: Option<ReconcileReport>,
    autosave: Debouncer,
    dirty: bool,
    ledger_dirty: bool,
    categories_dirty: bool,
}

impl<P: Persistence> Workspace<P> {
    /// Load everything from `store`, merge the sample pack and write back
    /// whatever the merge changed. Never fails; write-back errors are logged.
    pub fn open(store: P, settings: &Settings, now: DateTime<Utc>) -> Self {
        let stored = store.load_decisions();
        let stored_ledger = store.load_sample_ledger();
        let stored_categories = store.load_categories();

        let pack = if settings.samples_enabled {
            match SamplePack::bundled() {
                Ok(pack) => Some(pack),
                Err(e) => {
                    tracing::warn!(error = %e, "bundled sample pack is invalid; skipping samples");
                    None
                }
            }
        } else {
            None
        };

        let (decisions, ledger, report) = match &pack {
            Some(pack) => {
                let merged = reconcile::reconcile(stored.clone(), pack, &stored_ledger, now);
                (merged.decisions, merged.ledger, Some(merged.report))
            }
            None => (stored.clone(), stored_ledger.clone(), None),
        };

        let mut categories = CategoryList::from_stored(stored_categories.clone());
        for d in &decisions {
            if categories.adopt(&d.category) {
                tracing::debug!(category = %d.category, "adopted category used by a decision");
            }
        }

        let mut ws = Self {
            store,
            decisions,
            categories,
            ledger,
            pack,
            report,
            autosave: Debouncer::new(settings.debounce),
            dirty: false,
            ledger_dirty: false,
            categories_dirty: false,
        };

        ws.ledger_dirty = ws.ledger != stored_ledger;
        ws.dirty = ws.decisions != stored;
        ws.categories_dirty = ws.categories.names() != stored_categories.as_slice();
        if let Err(e) = ws.persist() {
            tracing::warn!(error = %e, "could not write reconciled data back; will retry on next save");
        }
        ws
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn categories(&self) -> &CategoryList {
        &self.categories
    }

    pub fn ledger(&self) -> &SampleLedger {
        &self.ledger
    }

    /// The active sample pack, or `None` when samples are disabled.
    pub fn pack(&self) -> Option<&SamplePack> {
        self.pack.as_ref()
    }

    /// What the last reconciliation did, if one ran.
    pub fn report(&self) -> Option<&ReconcileReport> {
        self.report.as_ref()
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    pub fn into_store(self) -> P {
        self.store
    }

    /// True while anything in memory differs from what was last written.
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.ledger_dirty || self.categories_dirty
    }

    /// Look up a decision by id or unique id prefix.
    pub fn resolve(&self, key: &str) -> Result<DecisionId, StoreError> {
        tree::resolve_prefix(&self.decisions, key)
            .map(|d| d.id.clone())
            .ok_or_else(|| CoreError::DecisionNotFound(key.to_string()).into())
    }

    pub fn get(&self, id: &DecisionId) -> Option<&Decision> {
        tree::find(&self.decisions, id)
    }

    /// Write every record that is out of date, ledger first. Stops at the
    /// first failure; whatever was not written stays dirty.
    fn persist(&mut self) -> Result<(), StoreError> {
        if self.ledger_dirty {
            self.store.save_sample_ledger(&self.ledger)?;
            self.ledger_dirty = false;
        }
        if self.dirty {
            self.store.save_decisions(&self.decisions)?;
            self.dirty = false;
            self.autosave.cancel();
        }
        if self.categories_dirty {
            self.store.save_categories(self.categories.names())?;
            self.categories_dirty = false;
        }
        Ok(())
    }

    /// Apply `f` to the decisions and write them.
    fn commit<T>(
        &mut self,
        f: impl FnOnce(&mut Vec<Decision>) -> Result<T, CoreError>,
    ) -> Result<T, StoreError> {
        let out = f(&mut self.decisions)?;
        self.dirty = true;
        self.persist()?;
        Ok(out)
    }

    fn check_category(&self, name: &str) -> Result<(), CoreError> {
        if self.categories.contains(name) {
            Ok(())
        } else {
            Err(CoreError::UnknownCategory(name.to_string()))
        }
    }

    // ── Decisions ───────────────────────────────────────────────────────

    pub fn create_root(&mut self, new: NewDecision, now: DateTime<Utc>) -> Result<DecisionId, StoreError> {
        self.check_category(&new.category)?;
        self.commit(|all| ops::create_root(all, new, now))
    }

    pub fn create_sub(
        &mut self,
        parent: &DecisionId,
        new: NewSubDecision,
        now: DateTime<Utc>,
    ) -> Result<DecisionId, StoreError> {
        self.commit(|all| ops::create_sub(all, parent, new, now))
    }

    pub fn update(&mut self, id: &DecisionId, patch: DecisionPatch, now: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(category) = &patch.category {
            self.check_category(category)?;
        }
        self.commit(|all| ops::update(all, id, patch, now))
    }

    /// Apply `patch` in memory and arm the autosave timer instead of
    /// writing. Pair with [`tick`](Self::tick) and [`flush`](Self::flush).
    pub fn stage_update(
        &mut self,
        id: &DecisionId,
        patch: DecisionPatch,
        now: DateTime<Utc>,
        at: Instant,
    ) -> Result<(), StoreError> {
        if let Some(category) = &patch.category {
            self.check_category(category)?;
        }
        ops::update(&mut self.decisions, id, patch, now)?;
        self.dirty = true;
        self.autosave.touch(at);
        Ok(())
    }

    /// Write staged edits if the autosave delay has elapsed. Returns true if
    /// a write happened.
    pub fn tick(&mut self, at: Instant) -> Result<bool, StoreError> {
        if !self.autosave.take_if_due(at) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Write staged or previously failed changes now, including a ledger
    /// or category list whose last write failed.
    pub fn flush(&mut self) -> Result<bool, StoreError> {
        let pending = self.autosave.take_pending();
        if !pending && !self.is_dirty() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Delete `id` and its sub-tree. Removed samples are recorded in the
    /// ledger, and the ledger is written before the decisions.
    pub fn delete(&mut self, id: &DecisionId) -> Result<Vec<DecisionId>, StoreError> {
        let removed = ops::delete(&mut self.decisions, id)?;
        self.dirty = true;
        if let Some(pack) = &self.pack {
            let recorded = self.ledger.record_deletions(&removed, pack);
            if recorded > 0 {
                tracing::debug!(count = recorded, "recorded deleted samples");
                self.ledger_dirty = true;
            }
        }
        self.persist()?;
        Ok(removed)
    }

    /// Handle navigation away from the editor of `id`.
    ///
    /// `confirm` is asked only for an empty draft with changes; returning
    /// false cancels the navigation. Returns whether navigation proceeds.
    pub fn leave_draft(
        &mut self,
        id: &DecisionId,
        changed: bool,
        confirm: impl FnOnce() -> bool,
    ) -> Result<bool, StoreError> {
        let title = self
            .get(id)
            .map(|d| d.title.clone())
            .ok_or_else(|| CoreError::DecisionNotFound(id.to_string()))?;
        match draft::exit_action(&title, changed) {
            DraftExit::SaveThenLeave => {
                self.flush()?;
                Ok(true)
            }
            DraftExit::DeleteThenLeave => {
                self.delete(id)?;
                Ok(true)
            }
            DraftExit::Confirm => {
                if !confirm() {
                    return Ok(false);
                }
                self.delete(id)?;
                Ok(true)
            }
        }
    }

    pub fn resolve_decision(&mut self, id: &DecisionId, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.commit(|all| ops::resolve(all, id, now))
    }

    pub fn reopen(&mut self, id: &DecisionId) -> Result<(), StoreError> {
        self.commit(|all| ops::reopen(all, id))
    }

    pub fn reorder(
        &mut self,
        scope: &ReorderScope,
        ids: &[DecisionId],
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.commit(|all| ops::reorder(all, scope, ids, now))
    }

    pub fn move_to(&mut self, id: &DecisionId, new_parent: Option<&DecisionId>) -> Result<(), StoreError> {
        self.commit(|all| ops::move_to(all, id, new_parent))
    }

    pub fn change_mode(&mut self, id: &DecisionId, mode: Mode) -> Result<(), StoreError> {
        self.commit(|all| ops::change_mode(all, id, mode))
    }

    // ── Options ─────────────────────────────────────────────────────────

    pub fn select_option(&mut self, id: &DecisionId, option: &OptionId) -> Result<(), StoreError> {
        self.commit(|all| ops::select_option(all, id, option))
    }

    pub fn add_option(&mut self, id: &DecisionId, title: &str) -> Result<OptionId, StoreError> {
        self.commit(|all| ops::add_option(all, id, title))
    }

    pub fn update_option(
        &mut self,
        id: &DecisionId,
        option: &OptionId,
        patch: OptionPatch,
    ) -> Result<(), StoreError> {
        self.commit(|all| ops::update_option(all, id, option, patch))
    }

    pub fn remove_option(&mut self, id: &DecisionId, option: &OptionId) -> Result<(), StoreError> {
        self.commit(|all| ops::remove_option(all, id, option))
    }

    // ── Categories ──────────────────────────────────────────────────────

    pub fn add_category(&mut self, name: &str) -> Result<(), StoreError> {
        self.categories.add(name)?;
        self.categories_dirty = true;
        self.persist()
    }

    /// Returns how many decisions were re-pointed.
    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<usize, StoreError> {
        let count = self.categories.rename(old, new, &mut self.decisions)?;
        if count > 0 {
            self.dirty = true;
        }
        self.categories_dirty = true;
        self.persist()?;
        Ok(count)
    }

    pub fn remove_category(&mut self, name: &str) -> Result<(), StoreError> {
        self.categories.remove(name, &self.decisions)?;
        self.categories_dirty = true;
        self.persist()
    }

    // ── Samples ─────────────────────────────────────────────────────────

    /// Re-run reconciliation against the current state. With `force`, the
    /// ledger is treated as belonging to another pack version, which
    /// restores deleted samples and restarts their deadlines.
    pub fn sync_samples(&mut self, force: bool, now: DateTime<Utc>) -> Result<ReconcileReport, StoreError> {
        let pack = self
            .pack
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("samples are disabled".into()))?;
        let mut ledger = self.ledger.clone();
        if force {
            ledger.synced_version = None;
        }
        let merged = reconcile::reconcile(self.decisions.clone(), pack, &ledger, now);
        self.decisions = merged.decisions;
        self.ledger = merged.ledger;
        self.report = Some(merged.report.clone());
        for d in &self.decisions {
            if self.categories.adopt(&d.category) {
                self.categories_dirty = true;
            }
        }
        self.ledger_dirty = true;
        self.dirty = true;
        self.persist()?;
        Ok(merged.report)
    }
}
