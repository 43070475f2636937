//! Read-only queries over a snapshot of the decision forest.

use crate::id::DecisionId;
use crate::model::Decision;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Upper bound on how far `ancestor_path` walks up.
pub const MAX_ANCESTOR_DEPTH: usize = 10;

/// Which list a root decision is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Active,
    Overdue,
    Resolved,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Overdue => "overdue",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "overdue" => Ok(Self::Overdue),
            "resolved" => Ok(Self::Resolved),
            other => Err(format!("unknown section '{}'", other)),
        }
    }
}

pub fn find<'a>(decisions: &'a [Decision], id: &DecisionId) -> Option<&'a Decision> {
    decisions.iter().find(|d| &d.id == id)
}

/// Resolve a decision by exact id or unique id prefix.
pub fn resolve_prefix<'a>(decisions: &'a [Decision], key: &str) -> Option<&'a Decision> {
    if let Some(d) = decisions.iter().find(|d| d.id.as_str() == key) {
        return Some(d);
    }
    if key.is_empty() {
        return None;
    }
    let mut matches = decisions.iter().filter(|d| d.id.starts_with(key));
    match (matches.next(), matches.next()) {
        (Some(d), None) => Some(d),
        _ => None,
    }
}

/// Stable sort by `order`; equal orders keep their slice position.
fn sorted_by_order(mut nodes: Vec<&Decision>) -> Vec<&Decision> {
    nodes.sort_by_key(|d| d.order);
    nodes
}

/// Direct children of `id`, ordered by `order`.
pub fn children_of<'a>(decisions: &'a [Decision], id: &DecisionId) -> Vec<&'a Decision> {
    sorted_by_order(
        decisions
            .iter()
            .filter(|d| d.parent_id.as_ref() == Some(id))
            .collect(),
    )
}

/// Root decisions, ordered by `order`.
pub fn roots(decisions: &[Decision]) -> Vec<&Decision> {
    sorted_by_order(decisions.iter().filter(|d| d.is_root()).collect())
}

/// All transitive children of `id` in breadth-first order, excluding `id`.
pub fn descendant_ids(decisions: &[Decision], id: &DecisionId) -> Vec<DecisionId> {
    let mut out = Vec::new();
    let mut seen: HashSet<&DecisionId> = HashSet::from([id]);
    let mut queue = VecDeque::from([id]);
    while let Some(current) = queue.pop_front() {
        for child in decisions.iter().filter(|d| d.parent_id.as_ref() == Some(current)) {
            if seen.insert(&child.id) {
                out.push(child.id.clone());
                queue.push_back(&child.id);
            }
        }
    }
    out
}

/// Ancestors of `id` from the root down to its immediate parent.
///
/// Stops at a missing parent and after [`MAX_ANCESTOR_DEPTH`] steps.
pub fn ancestor_path<'a>(decisions: &'a [Decision], id: &DecisionId) -> Vec<&'a Decision> {
    let mut path = Vec::new();
    let mut current = find(decisions, id).and_then(|d| d.parent_id.as_ref());
    while let Some(parent_id) = current {
        if path.len() >= MAX_ANCESTOR_DEPTH {
            break;
        }
        match find(decisions, parent_id) {
            Some(parent) => {
                path.push(parent);
                current = parent.parent_id.as_ref();
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// True if `node` or any unresolved descendant is past its deadline.
///
/// Only unresolved children are followed, so a resolved sub-tree never makes
/// its parent group overdue.
pub fn is_group_overdue(decisions: &[Decision], node: &Decision, now: DateTime<Utc>) -> bool {
    let mut seen: HashSet<&DecisionId> = HashSet::from([&node.id]);
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if current.deadline < now {
            return true;
        }
        for child in decisions
            .iter()
            .filter(|d| d.parent_id.as_ref() == Some(&current.id) && !d.resolved)
        {
            if seen.insert(&child.id) {
                stack.push(child);
            }
        }
    }
    false
}

pub fn section_of(decisions: &[Decision], node: &Decision, now: DateTime<Utc>) -> Section {
    if node.resolved {
        Section::Resolved
    } else if is_group_overdue(decisions, node, now) {
        Section::Overdue
    } else {
        Section::Active
    }
}

/// Root decisions shown in `section`, ordered by `order`.
pub fn roots_in_section(
    decisions: &[Decision],
    section: Section,
    now: DateTime<Utc>,
) -> Vec<&Decision> {
    roots(decisions)
        .into_iter()
        .filter(|d| section_of(decisions, d, now) == section)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn ids(nodes: &[&Decision]) -> Vec<String> {
        nodes.iter().map(|d| d.id.to_string()).collect()
    }

    #[test]
    fn children_sorted_by_order_with_stable_ties() {
        let all = vec![
            node("p", None, 0),
            node("c2", Some("p"), 5),
            node("c1", Some("p"), 1),
            node("c3", Some("p"), 5),
            node("other", None, 1),
        ];
        let kids = children_of(&all, &DecisionId::from("p"));
        assert_eq!(ids(&kids), vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn roots_sorted() {
        let all = vec![node("b", None, 2), node("a", None, -1), node("c", Some("a"), 0)];
        assert_eq!(ids(&roots(&all)), vec!["a", "b"]);
    }

    #[test]
    fn descendants_are_transitive() {
        let all = vec![
            node("root", None, 0),
            node("a", Some("root"), 0),
            node("b", Some("root"), 1),
            node("a1", Some("a"), 0),
            node("a1x", Some("a1"), 0),
            node("unrelated", None, 1),
        ];
        let mut got: Vec<String> = descendant_ids(&all, &DecisionId::from("root"))
            .into_iter()
            .map(|i| i.to_string())
            .collect();
        got.sort();
        assert_eq!(got, vec!["a", "a1", "a1x", "b"]);
        assert!(descendant_ids(&all, &DecisionId::from("a1x")).is_empty());
    }

    #[test]
    fn descendants_survive_corrupt_cycle() {
        let all = vec![node("x", Some("y"), 0), node("y", Some("x"), 0)];
        let got = descendant_ids(&all, &DecisionId::from("x"));
        assert_eq!(got, vec![DecisionId::from("y")]);
    }

    #[test]
    fn ancestor_path_root_first() {
        let all = vec![
            node("root", None, 0),
            node("mid", Some("root"), 0),
            node("leaf", Some("mid"), 0),
        ];
        let path = ancestor_path(&all, &DecisionId::from("leaf"));
        assert_eq!(ids(&path), vec!["root", "mid"]);
        assert!(ancestor_path(&all, &DecisionId::from("root")).is_empty());
    }

    #[test]
    fn ancestor_path_is_capped() {
        let mut all = vec![node("n0", Some("n1"), 0)];
        for i in 1..20 {
            all.push(node(&format!("n{}", i), Some(&format!("n{}", i + 1)), 0));
        }
        let path = ancestor_path(&all, &DecisionId::from("n0"));
        assert_eq!(path.len(), MAX_ANCESTOR_DEPTH);
    }

    #[test]
    fn ancestor_path_terminates_on_cycle() {
        let all = vec![node("x", Some("y"), 0), node("y", Some("x"), 0)];
        let path = ancestor_path(&all, &DecisionId::from("x"));
        assert_eq!(path.len(), MAX_ANCESTOR_DEPTH);
    }

    #[test]
    fn group_overdue_follows_unresolved_children() {
        let parent = node("p", None, 0);
        let child = overdue(node("c", Some("p"), 0));
        let mut all = vec![parent.clone(), child];
        assert!(is_group_overdue(&all, &parent, now()));
        assert_eq!(section_of(&all, &parent, now()), Section::Overdue);

        all[1].resolved = true;
        all[1].resolved_at = Some(now());
        assert!(!is_group_overdue(&all, &parent, now()));
        assert_eq!(section_of(&all, &parent, now()), Section::Active);
    }

    #[test]
    fn group_overdue_ignores_children_of_resolved_children() {
        let parent = node("p", None, 0);
        let mut child = node("c", Some("p"), 0);
        child.resolved = true;
        let grandchild = overdue(node("g", Some("c"), 0));
        let all = vec![parent.clone(), child, grandchild];
        assert!(!is_group_overdue(&all, &parent, now()));
    }

    #[test]
    fn roots_in_section_partitions() {
        let mut done = node("done", None, 0);
        done.resolved = true;
        let all = vec![
            node("fresh", None, 1),
            overdue(node("late", None, 2)),
            done,
        ];
        assert_eq!(ids(&roots_in_section(&all, Section::Active, now())), vec!["fresh"]);
        assert_eq!(ids(&roots_in_section(&all, Section::Overdue, now())), vec!["late"]);
        assert_eq!(ids(&roots_in_section(&all, Section::Resolved, now())), vec!["done"]);
    }

    #[test]
    fn resolve_prefix_requires_uniqueness() {
        let all = vec![node("abc1", None, 0), node("abc2", None, 1)];
        assert!(resolve_prefix(&all, "abc").is_none());
        assert_eq!(resolve_prefix(&all, "abc2").unwrap().id.as_str(), "abc2");
        assert_eq!(resolve_prefix(&all, "abc1").unwrap().id.as_str(), "abc1");
    }

    #[test]
    fn section_names_parse() {
        assert_eq!("Overdue".parse::<Section>(), Ok(Section::Overdue));
        assert_eq!(Section::Resolved.to_string(), "resolved");
        assert!("later".parse::<Section>().is_err());
    }
}
