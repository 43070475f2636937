//! Merging the bundled sample pack into the user's stored decisions.
//!
//! Runs on every load. The merge is idempotent, never resurrects a sample the
//! user deleted (until the pack version is bumped), and never overwrites a
//! sample the user has edited, resolved or reopened.

use crate::error::CoreError;
use crate::id::DecisionId;
use crate::model::Decision;
use crate::sample::SamplePack;
use crate::time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Sample bookkeeping persisted next to (not inside) the decision list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleLedger {
    /// Sample ids the user deleted. Only a force-sync clears this.
    #[serde(default, rename = "deletedSamples")]
    pub deleted: BTreeSet<DecisionId>,
    /// Origin for every sample deadline, set once.
    #[serde(default)]
    pub first_view: Option<DateTime<Utc>>,
    /// Pack version seen by the last reconciliation.
    #[serde(default)]
    pub synced_version: Option<String>,
}

impl SampleLedger {
    /// Remember every reserved sample id among `removed`. Returns how many
    /// new ids were recorded.
    pub fn record_deletions(&mut self, removed: &[DecisionId], pack: &SamplePack) -> usize {
        removed
            .iter()
            .filter(|id| pack.is_reserved(id))
            .filter(|id| self.deleted.insert((*id).clone()))
            .count()
    }
}

/// What a reconciliation did, for logging and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub force_synced: bool,
    /// Templates materialized for the first time.
    pub injected: Vec<DecisionId>,
    /// Untouched samples replaced by the current template.
    pub refreshed: Vec<DecisionId>,
    /// Samples the user changed, kept as stored, and retired samples that
    /// still have children and so become user data.
    pub kept: Vec<DecisionId>,
    /// Deleted samples, or samples whose parent is gone.
    pub skipped: Vec<DecisionId>,
    /// Untouched samples that no longer exist in the pack.
    pub retired: Vec<DecisionId>,
    /// Reconciliation failed and the stored list was returned unchanged.
    pub fell_back: bool,
}

#[derive(Debug, Clone)]
pub struct Reconciled {
    pub decisions: Vec<Decision>,
    pub ledger: SampleLedger,
    pub report: ReconcileReport,
}

/// Merge `pack` into `stored`. Never fails: on any error the stored list and
/// ledger are returned unchanged.
pub fn reconcile(
    stored: Vec<Decision>,
    pack: &SamplePack,
    ledger: &SampleLedger,
    now: DateTime<Utc>,
) -> Reconciled {
    match try_reconcile(&stored, pack, ledger, now) {
        Ok(merged) => merged,
        Err(e) => {
            tracing::warn!(error = %e, "sample reconciliation failed; keeping stored decisions");
            passthrough(stored, ledger)
        }
    }
}

/// The result of not reconciling at all.
pub fn passthrough(stored: Vec<Decision>, ledger: &SampleLedger) -> Reconciled {
    Reconciled {
        decisions: stored,
        ledger: ledger.clone(),
        report: ReconcileReport {
            fell_back: true,
            ..Default::default()
        },
    }
}

/// Deadlines are re-derived from `first_view` only for samples that are
/// still pristine. A sample the user has edited keeps the deadline it has.
fn try_reconcile(
    stored: &[Decision],
    pack: &SamplePack,
    ledger: &SampleLedger,
    now: DateTime<Utc>,
) -> Result<Reconciled, CoreError> {
    let mut ledger = ledger.clone();
    let mut report = ReconcileReport::default();

    if ledger.synced_version.as_deref() != Some(pack.version()) {
        tracing::info!(
            from = ledger.synced_version.as_deref().unwrap_or("none"),
            to = pack.version(),
            "sample pack version changed; force-syncing samples"
        );
        ledger.deleted.clear();
        ledger.first_view = None;
        ledger.synced_version = Some(pack.version().to_string());
        report.force_synced = true;
    }
    let first_view = *ledger.first_view.get_or_insert(now);

    let mut by_id: HashMap<&DecisionId, &Decision> = HashMap::new();
    for d in stored {
        by_id.entry(&d.id).or_insert(d);
    }

    let mut samples: Vec<Decision> = Vec::with_capacity(pack.templates().len());
    let mut emitted: HashSet<DecisionId> = HashSet::new();
    for template in pack.templates() {
        let id = &template.id;
        if ledger.deleted.contains(id) {
            tracing::debug!(id = %id, "sample deleted by user; not injecting");
            report.skipped.push(id.clone());
            continue;
        }
        let decision = match by_id.get(id) {
            Some(existing) if existing.is_pristine_example() && !existing.resolved => {
                report.refreshed.push(id.clone());
                template.materialize(first_view)?
            }
            Some(existing) => {
                report.kept.push(id.clone());
                (*existing).clone()
            }
            None => {
                if let Some(parent) = &template.parent {
                    if !emitted.contains(parent) {
                        tracing::debug!(id = %id, parent = %parent, "sample parent missing; not injecting");
                        report.skipped.push(id.clone());
                        continue;
                    }
                }
                report.injected.push(id.clone());
                template.materialize(first_view)?
            }
        };
        emitted.insert(decision.id.clone());
        samples.push(decision);
    }

    // A stale sample is only retired once nothing that stays points at it.
    let mut retiring: HashSet<&DecisionId> = stored
        .iter()
        .filter(|d| !pack.is_reserved(&d.id) && d.is_pristine_example())
        .map(|d| &d.id)
        .collect();
    loop {
        let held: Vec<&DecisionId> = stored
            .iter()
            .filter(|d| !pack.is_reserved(&d.id) && !retiring.contains(&d.id))
            .filter_map(|d| d.parent_id.as_ref())
            .filter(|parent| retiring.contains(parent))
            .collect();
        if held.is_empty() {
            break;
        }
        for parent in held {
            retiring.remove(parent);
        }
    }

    let mut user_owned: Vec<Decision> = Vec::new();
    for d in stored {
        if pack.is_reserved(&d.id) {
            continue;
        }
        if retiring.contains(&d.id) {
            report.retired.push(d.id.clone());
            continue;
        }
        let mut d = d.clone();
        if d.is_pristine_example() {
            tracing::debug!(id = %d.id, "retired sample still has children; keeping it as user data");
            d.is_example = None;
            report.kept.push(d.id.clone());
        }
        user_owned.push(d);
    }

    // Samples keep the top of the root list; user roots follow in their
    // existing relative order.
    let base = samples
        .iter()
        .filter(|d| d.is_root())
        .map(|d| d.order + 1)
        .max()
        .unwrap_or(0);
    let mut root_positions: Vec<usize> = user_owned
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_root())
        .map(|(i, _)| i)
        .collect();
    root_positions.sort_by_key(|&i| user_owned[i].order);
    for (rank, &i) in root_positions.iter().enumerate() {
        user_owned[i].order = base + rank as i64;
    }

    for d in samples.iter_mut().filter(|d| d.is_pristine_example()) {
        d.deadline = time::deadline_after(first_view, d.time_budget)?;
    }

    tracing::debug!(
        injected = report.injected.len(),
        refreshed = report.refreshed.len(),
        kept = report.kept.len(),
        skipped = report.skipped.len(),
        "reconciled samples"
    );

    samples.extend(user_owned);
    Ok(Reconciled {
        decisions: samples,
        ledger,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{self, DecisionPatch};
    use crate::tree::fixtures::{node, now};
    use chrono::Duration;

    fn pack() -> SamplePack {
        SamplePack::bundled().unwrap()
    }

    fn ids(decisions: &[Decision]) -> Vec<&str> {
        decisions.iter().map(|d| d.id.as_str()).collect()
    }

    fn first_load(stored: Vec<Decision>) -> Reconciled {
        reconcile(stored, &pack(), &SampleLedger::default(), now())
    }

    #[test]
    fn first_load_injects_every_sample() {
        let out = first_load(vec![]);
        assert!(out.report.force_synced);
        assert_eq!(out.report.injected.len(), pack().templates().len());
        assert_eq!(out.ledger.first_view, Some(now()));
        assert_eq!(out.ledger.synced_version.as_deref(), Some(pack().version()));
        assert!(out.decisions.iter().all(|d| d.is_pristine_example()));
    }

    #[test]
    fn reconciliation_is_idempotent() {
        let user = vec![node("mine-b", None, 7), node("mine-a", None, -4), node("kid", Some("mine-a"), 9)];
        let once = first_load(user);
        let later = now() + Duration::hours(5);
        let twice = reconcile(once.decisions.clone(), &pack(), &once.ledger, later);
        assert_eq!(twice.decisions, once.decisions);
        assert_eq!(twice.ledger, once.ledger);
        assert!(!twice.report.force_synced);
        assert!(twice.report.injected.is_empty());
    }

    #[test]
    fn user_roots_follow_samples_in_relative_order() {
        let user = vec![node("mine-b", None, 7), node("mine-a", None, -4), node("kid", Some("mine-a"), 9)];
        let out = first_load(user);
        let max_sample = out
            .decisions
            .iter()
            .filter(|d| d.is_pristine_example() && d.is_root())
            .map(|d| d.order)
            .max()
            .unwrap();
        let find = |id: &str| out.decisions.iter().find(|d| d.id.as_str() == id).unwrap();
        assert_eq!(find("mine-a").order, max_sample + 1);
        assert_eq!(find("mine-b").order, max_sample + 2);
        assert_eq!(find("kid").order, 9);
    }

    #[test]
    fn deleted_samples_stay_deleted() {
        let p = pack();
        let once = first_load(vec![]);
        let mut decisions = once.decisions;
        let mut ledger = once.ledger;

        let removed = ops::delete(&mut decisions, &DecisionId::from("sample-move")).unwrap();
        assert_eq!(ledger.record_deletions(&removed, &p), 3);

        let again = reconcile(decisions, &p, &ledger, now() + Duration::days(1));
        let got = ids(&again.decisions);
        assert!(!got.contains(&"sample-move"));
        assert!(!got.contains(&"sample-move-budget"));
        assert!(!got.contains(&"sample-move-area"));
        assert!(got.contains(&"sample-lunch"));
        assert_eq!(again.report.skipped.len(), 3);
    }

    #[test]
    fn force_sync_restores_deleted_samples() {
        let p = pack();
        let once = first_load(vec![]);
        let mut decisions = once.decisions;
        let mut ledger = once.ledger;
        let removed = ops::delete(&mut decisions, &DecisionId::from("sample-lunch")).unwrap();
        ledger.record_deletions(&removed, &p);

        ledger.synced_version = Some("an-older-pack".into());
        let later = now() + Duration::days(3);
        let synced = reconcile(decisions, &p, &ledger, later);
        assert!(synced.report.force_synced);
        assert!(ids(&synced.decisions).contains(&"sample-lunch"));
        assert!(synced.ledger.deleted.is_empty());
        assert_eq!(synced.ledger.first_view, Some(later));
    }

    #[test]
    fn edited_samples_are_kept() {
        let once = first_load(vec![]);
        let mut decisions = once.decisions;
        let id = DecisionId::from("sample-lunch");
        ops::update(
            &mut decisions,
            &id,
            DecisionPatch {
                title: Some("Dinner instead".into()),
                ..Default::default()
            },
            now(),
        )
        .unwrap();

        let again = reconcile(decisions, &pack(), &once.ledger, now() + Duration::hours(1));
        let lunch = again.decisions.iter().find(|d| d.id == id).unwrap();
        assert_eq!(lunch.title, "Dinner instead");
        assert_eq!(lunch.is_example, None);
        assert!(again.report.kept.contains(&id));
    }

    #[test]
    fn stale_template_content_is_refreshed() {
        let once = first_load(vec![]);
        let mut decisions = once.decisions;
        let lunch = decisions
            .iter_mut()
            .find(|d| d.id.as_str() == "sample-lunch")
            .unwrap();
        lunch.title = "Old wording".into();
        lunch.deadline = now() - Duration::days(9);

        let again = reconcile(decisions, &pack(), &once.ledger, now());
        let lunch = again
            .decisions
            .iter()
            .find(|d| d.id.as_str() == "sample-lunch")
            .unwrap();
        assert_eq!(lunch.title, "What should I have for lunch?");
        assert_eq!(lunch.deadline, now() + Duration::minutes(10));
    }

    #[test]
    fn sample_deadlines_use_first_view() {
        let mut ledger = SampleLedger::default();
        let first = now() - Duration::days(2);
        ledger.first_view = Some(first);
        ledger.synced_version = Some(pack().version().to_string());
        let out = reconcile(vec![], &pack(), &ledger, now());
        for d in &out.decisions {
            assert_eq!(d.deadline, first + Duration::minutes(i64::from(d.time_budget)));
        }
    }

    #[test]
    fn retired_samples_are_dropped_but_user_data_kept() {
        let mut stale = node("sample-from-old-pack", None, 0);
        stale.is_example = Some(true);
        let mine = node("mine", None, 1);
        let out = first_load(vec![stale, mine]);
        let got = ids(&out.decisions);
        assert!(!got.contains(&"sample-from-old-pack"));
        assert!(got.contains(&"mine"));
        assert_eq!(out.report.retired, vec![DecisionId::from("sample-from-old-pack")]);
    }

    #[test]
    fn retired_sample_with_user_children_is_kept() {
        let mut stale = node("sample-from-old-pack", None, 0);
        stale.is_example = Some(true);
        let mut stale_child = node("sample-from-old-pack-sub", Some("sample-from-old-pack"), 0);
        stale_child.is_example = Some(true);
        let mine = node("mine", Some("sample-from-old-pack-sub"), 0);
        let mut lone = node("sample-lone", None, 1);
        lone.is_example = Some(true);

        let out = first_load(vec![stale, stale_child, mine, lone]);
        let got = ids(&out.decisions);
        assert!(got.contains(&"mine"));
        assert!(got.contains(&"sample-from-old-pack"));
        assert!(got.contains(&"sample-from-old-pack-sub"));
        assert!(!got.contains(&"sample-lone"));
        assert_eq!(out.report.retired, vec![DecisionId::from("sample-lone")]);

        let parent = out
            .decisions
            .iter()
            .find(|d| d.id.as_str() == "sample-from-old-pack")
            .unwrap();
        assert_eq!(parent.is_example, None);
        let child = out.decisions.iter().find(|d| d.id.as_str() == "mine").unwrap();
        assert_eq!(child.parent_id.as_ref().map(|p| p.as_str()), Some("sample-from-old-pack-sub"));
    }

    #[test]
    fn failure_returns_input_unchanged() {
        let mut ledger = SampleLedger::default();
        ledger.synced_version = Some(pack().version().to_string());
        ledger.first_view = Some(DateTime::<Utc>::MAX_UTC);
        let stored = vec![node("mine", None, 42)];

        let out = reconcile(stored.clone(), &pack(), &ledger, now());
        assert!(out.report.fell_back);
        assert_eq!(out.decisions, stored);
        assert_eq!(out.ledger, ledger);
    }

    #[test]
    fn ledger_wire_format() {
        let mut ledger = SampleLedger::default();
        ledger.deleted.insert(DecisionId::from("sample-gym"));
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["deletedSamples"][0], "sample-gym");
        assert!(json.get("firstView").is_some());
        assert!(json.get("syncedVersion").is_some());
    }

    #[test]
    fn record_deletions_ignores_user_ids() {
        let mut ledger = SampleLedger::default();
        let n = ledger.record_deletions(
            &[DecisionId::from("mine"), DecisionId::from("sample-gym")],
            &pack(),
        );
        assert_eq!(n, 1);
        assert_eq!(ledger.deleted.len(), 1);
    }
}
