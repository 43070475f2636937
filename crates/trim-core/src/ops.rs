//! State transitions on the decision forest.
//!
//! Every operation that changes an existing decision goes through [`edit`],
//! which applies the change to a copy, commits it only on success, and strips
//! the sample marker. A rejected operation leaves the forest untouched.

use crate::error::CoreError;
use crate::id::{DecisionId, OptionId};
use crate::model::{ComparisonMatrix, Decision, DecisionOption, Framing, Importance, Link, Mode};
use crate::time;
use crate::tree::{self, Section};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Input for a new root decision.
#[derive(Debug, Clone)]
pub struct NewDecision {
    pub title: String,
    pub category: String,
    pub importance: Importance,
    pub mode: Mode,
}

/// Input for a new sub-decision. Category and importance are fixed by the parent.
#[derive(Debug, Clone)]
pub struct NewSubDecision {
    pub title: String,
    pub mode: Mode,
}

/// Field changes for [`update`]. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct DecisionPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    /// Also resets the time budget and restarts the deadline from now.
    pub importance: Option<Importance>,
    /// Overrides the budget and restarts the deadline from now.
    pub time_budget: Option<u32>,
    /// Overrides the deadline; wins over the two fields above.
    pub deadline: Option<DateTime<Utc>>,
    pub framing: Option<Framing>,
    pub links: Option<Vec<Link>>,
    pub comparison_matrix: Option<ComparisonMatrix>,
}

impl DecisionPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.importance.is_none()
            && self.time_budget.is_none()
            && self.deadline.is_none()
            && self.framing.is_none()
            && self.links.is_none()
            && self.comparison_matrix.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OptionPatch {
    pub title: Option<String>,
    pub memo: Option<String>,
    pub pros: Option<Vec<String>>,
    pub cons: Option<Vec<String>>,
}

/// Which set of siblings a reorder applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderScope {
    /// Children of one parent.
    Children(DecisionId),
    /// Root decisions of one section.
    Roots(Section),
}

/// Apply `f` to the decision `id` atomically and strip its sample marker.
pub fn edit<T>(
    decisions: &mut [Decision],
    id: &DecisionId,
    f: impl FnOnce(&mut Decision) -> Result<T, CoreError>,
) -> Result<T, CoreError> {
    let slot = decisions
        .iter_mut()
        .find(|d| &d.id == id)
        .ok_or_else(|| CoreError::DecisionNotFound(id.to_string()))?;
    let mut draft = slot.clone();
    let out = f(&mut draft)?;
    draft.is_example = None;
    *slot = draft;
    Ok(out)
}

fn top_root_order(decisions: &[Decision], except: Option<&DecisionId>) -> i64 {
    decisions
        .iter()
        .filter(|d| d.is_root() && !d.resolved && Some(&d.id) != except)
        .map(|d| d.order - 1)
        .min()
        .unwrap_or(0)
}

fn next_child_order(decisions: &[Decision], parent: &DecisionId, except: Option<&DecisionId>) -> i64 {
    decisions
        .iter()
        .filter(|d| d.parent_id.as_ref() == Some(parent) && Some(&d.id) != except)
        .map(|d| d.order + 1)
        .max()
        .unwrap_or(0)
}

/// Create a root decision that sorts above every active root.
pub fn create_root(
    decisions: &mut Vec<Decision>,
    new: NewDecision,
    now: DateTime<Utc>,
) -> Result<DecisionId, CoreError> {
    let mut decision = Decision::new(new.title, new.category, new.importance, new.mode, now)?;
    decision.order = top_root_order(decisions, None);
    let id = decision.id.clone();
    tracing::debug!(id = %id, order = decision.order, "created root decision");
    decisions.push(decision);
    Ok(id)
}

/// Create a sub-decision at the end of `parent`'s children.
pub fn create_sub(
    decisions: &mut Vec<Decision>,
    parent: &DecisionId,
    new: NewSubDecision,
    now: DateTime<Utc>,
) -> Result<DecisionId, CoreError> {
    let category = tree::find(decisions, parent)
        .map(|p| p.category.clone())
        .ok_or_else(|| CoreError::ParentNotFound(parent.to_string()))?;
    let mut decision = Decision::new(new.title, category, Importance::Low, new.mode, now)?;
    decision.parent_id = Some(parent.clone());
    decision.order = next_child_order(decisions, parent, None);
    let id = decision.id.clone();
    tracing::debug!(id = %id, parent = %parent, "created sub-decision");
    decisions.push(decision);
    Ok(id)
}

pub fn update(
    decisions: &mut [Decision],
    id: &DecisionId,
    patch: DecisionPatch,
    now: DateTime<Utc>,
) -> Result<(), CoreError> {
    edit(decisions, id, |d| {
        if let Some(title) = patch.title {
            d.title = title;
        }
        if let Some(category) = patch.category {
            d.category = category;
        }
        if let Some(importance) = patch.importance {
            d.importance = importance;
            d.time_budget = importance.minutes();
            d.deadline = time::deadline_after(now, d.time_budget)?;
        }
        if let Some(budget) = patch.time_budget {
            d.time_budget = budget;
            d.deadline = time::deadline_after(now, budget)?;
        }
        if let Some(deadline) = patch.deadline {
            d.deadline = deadline;
        }
        if let Some(framing) = patch.framing {
            d.framing = (!framing.is_empty()).then_some(framing);
        }
        if let Some(links) = patch.links {
            d.links = links;
        }
        if let Some(matrix) = patch.comparison_matrix {
            d.comparison_matrix = Some(matrix);
        }
        Ok(())
    })
}

/// Remove `id` and its whole sub-tree. Returns every removed id, target first.
pub fn delete(decisions: &mut Vec<Decision>, id: &DecisionId) -> Result<Vec<DecisionId>, CoreError> {
    if tree::find(decisions, id).is_none() {
        return Err(CoreError::DecisionNotFound(id.to_string()));
    }
    let mut removed = vec![id.clone()];
    removed.extend(tree::descendant_ids(decisions, id));
    let doomed: HashSet<&DecisionId> = removed.iter().collect();
    decisions.retain(|d| !doomed.contains(&d.id));
    tracing::debug!(id = %id, count = removed.len(), "deleted decision sub-tree");
    Ok(removed)
}

/// Trim a decision: commit to its selected option.
pub fn resolve(decisions: &mut [Decision], id: &DecisionId, now: DateTime<Utc>) -> Result<(), CoreError> {
    edit(decisions, id, |d| {
        if d.resolved {
            return Err(CoreError::AlreadyResolved(d.id.to_string()));
        }
        if d.selected_option().is_none() {
            return Err(CoreError::NoOptionSelected(d.id.to_string()));
        }
        d.resolved = true;
        d.resolved_at = Some(now);
        Ok(())
    })
}

pub fn reopen(decisions: &mut [Decision], id: &DecisionId) -> Result<(), CoreError> {
    edit(decisions, id, |d| {
        if !d.resolved {
            return Err(CoreError::NotResolved(d.id.to_string()));
        }
        d.resolved = false;
        d.resolved_at = None;
        Ok(())
    })
}

/// Set `order` to the list position of each id.
///
/// `ids` must name exactly the members of `scope`; anything else, including
/// an id from another section, is rejected before any change is made.
pub fn reorder(
    decisions: &mut [Decision],
    scope: &ReorderScope,
    ids: &[DecisionId],
    now: DateTime<Utc>,
) -> Result<(), CoreError> {
    let members: HashSet<DecisionId> = match scope {
        ReorderScope::Children(parent) => {
            if tree::find(decisions, parent).is_none() {
                return Err(CoreError::ParentNotFound(parent.to_string()));
            }
            tree::children_of(decisions, parent)
                .into_iter()
                .map(|d| d.id.clone())
                .collect()
        }
        ReorderScope::Roots(Section::Resolved) => {
            return Err(CoreError::InvalidReorder(
                "resolved decisions have no manual order".into(),
            ));
        }
        ReorderScope::Roots(section) => tree::roots_in_section(decisions, *section, now)
            .into_iter()
            .map(|d| d.id.clone())
            .collect(),
    };

    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CoreError::InvalidReorder(format!("{} listed twice", id)));
        }
        if !members.contains(id) {
            return Err(CoreError::InvalidReorder(format!(
                "{} is not part of this list",
                id
            )));
        }
    }
    if seen.len() != members.len() {
        return Err(CoreError::InvalidReorder(format!(
            "expected {} ids, got {}",
            members.len(),
            seen.len()
        )));
    }

    for (pos, id) in ids.iter().enumerate() {
        let order = pos as i64;
        let unchanged = tree::find(decisions, id).is_some_and(|d| d.order == order);
        if !unchanged {
            edit(decisions, id, |d| {
                d.order = order;
                Ok(())
            })?;
        }
    }
    Ok(())
}

/// Move `id` under `new_parent`, or to the top of the roots when `None`.
pub fn move_to(
    decisions: &mut [Decision],
    id: &DecisionId,
    new_parent: Option<&DecisionId>,
) -> Result<(), CoreError> {
    if tree::find(decisions, id).is_none() {
        return Err(CoreError::DecisionNotFound(id.to_string()));
    }
    let order = match new_parent {
        Some(parent) => {
            if tree::find(decisions, parent).is_none() {
                return Err(CoreError::ParentNotFound(parent.to_string()));
            }
            if parent == id || tree::descendant_ids(decisions, id).contains(parent) {
                return Err(CoreError::CycleDetected {
                    id: id.to_string(),
                    target: parent.to_string(),
                });
            }
            next_child_order(decisions, parent, Some(id))
        }
        None => top_root_order(decisions, Some(id)),
    };
    edit(decisions, id, |d| {
        d.parent_id = new_parent.cloned();
        d.order = order;
        Ok(())
    })
}

/// Switch a decision's mode, swapping in the stored option set of `mode`.
pub fn change_mode(decisions: &mut [Decision], id: &DecisionId, mode: Mode) -> Result<(), CoreError> {
    edit(decisions, id, |d| {
        let stash = std::mem::take(&mut d.stashed_options);
        let active = std::mem::take(&mut d.options);
        let (options, stash) = stash.switch(d.mode, active, mode);
        d.options = options;
        d.stashed_options = stash;
        d.mode = mode;
        Ok(())
    })
}

/// Select one option exclusively; selecting the selected option clears all.
pub fn select_option(
    decisions: &mut [Decision],
    id: &DecisionId,
    option: &OptionId,
) -> Result<(), CoreError> {
    edit(decisions, id, |d| {
        let was_selected = d
            .option(option)
            .map(|o| o.is_selected)
            .ok_or_else(|| CoreError::OptionNotFound {
                decision: d.id.to_string(),
                option: option.to_string(),
            })?;
        for o in d.options.iter_mut() {
            o.is_selected = !was_selected && &o.id == option;
        }
        Ok(())
    })
}

pub fn add_option(
    decisions: &mut [Decision],
    id: &DecisionId,
    title: impl Into<String>,
) -> Result<OptionId, CoreError> {
    let option = DecisionOption::new(title);
    let option_id = option.id.clone();
    edit(decisions, id, |d| {
        d.options.push(option);
        Ok(())
    })?;
    Ok(option_id)
}

pub fn update_option(
    decisions: &mut [Decision],
    id: &DecisionId,
    option: &OptionId,
    patch: OptionPatch,
) -> Result<(), CoreError> {
    edit(decisions, id, |d| {
        let decision_id = d.id.to_string();
        let o = d.option_mut(option).ok_or_else(|| CoreError::OptionNotFound {
            decision: decision_id,
            option: option.to_string(),
        })?;
        if let Some(title) = patch.title {
            o.title = title;
        }
        if let Some(memo) = patch.memo {
            o.memo = (!memo.is_empty()).then_some(memo);
        }
        if let Some(pros) = patch.pros {
            o.pros = pros;
        }
        if let Some(cons) = patch.cons {
            o.cons = cons;
        }
        Ok(())
    })
}

pub fn remove_option(
    decisions: &mut [Decision],
    id: &DecisionId,
    option: &OptionId,
) -> Result<(), CoreError> {
    edit(decisions, id, |d| {
        let before = d.options.len();
        d.options.retain(|o| &o.id != option);
        if d.options.len() == before {
            return Err(CoreError::OptionNotFound {
                decision: d.id.to_string(),
                option: option.to_string(),
            });
        }
        if let Some(matrix) = d.comparison_matrix.as_mut() {
            matrix.scores.remove(option);
        }
        Ok(())
    })
}
