use super::{now, open_workspace, print_json, summary};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashSet;
use trim_core::id::DecisionId;
use trim_core::model::Decision;
use trim_core::time::Countdown;
use trim_core::tree::{self, Section};

const SECTIONS: [Section; 3] = [Section::Active, Section::Overdue, Section::Resolved];

/// Depth-first walk of `root`'s sub-tree in display order.
fn flatten<'a>(all: &'a [Decision], root: &'a Decision) -> Vec<(usize, &'a Decision)> {
    let mut out = Vec::new();
    let mut seen: HashSet<&DecisionId> = HashSet::new();
    let mut stack = vec![(0usize, root)];
    while let Some((depth, node)) = stack.pop() {
        if !seen.insert(&node.id) {
            continue;
        }
        out.push((depth, node));
        for child in tree::children_of(all, &node.id).into_iter().rev() {
            stack.push((depth + 1, child));
        }
    }
    out
}

fn row(d: &Decision, depth: usize, section: Section, now: DateTime<Utc>) -> serde_json::Value {
    json!({
        "id": d.id,
        "title": d.title,
        "section": section,
        "depth": depth,
        "parentId": d.parent_id,
        "category": d.category,
        "importance": d.importance,
        "mode": d.mode,
        "resolved": d.resolved,
        "isExample": d.is_pristine_example(),
        "deadline": d.deadline,
        "countdown": Countdown::between(d.deadline, now),
    })
}

pub fn run(only: Option<Section>, json: bool) -> Result<()> {
    let ws = open_workspace()?;
    let now = now()?;
    let all = ws.decisions();
    let sections: Vec<Section> = match only {
        Some(s) => vec![s],
        None => SECTIONS.to_vec(),
    };

    if json {
        let mut rows = Vec::new();
        for &section in &sections {
            for root in tree::roots_in_section(all, section, now) {
                for (depth, d) in flatten(all, root) {
                    rows.push(row(d, depth, section, now));
                }
            }
        }
        return print_json(&serde_json::Value::Array(rows));
    }

    if all.is_empty() {
        println!("No decisions yet. Add one with `trim add`.");
        return Ok(());
    }

    for section in sections {
        let roots = tree::roots_in_section(all, section, now);
        if roots.is_empty() && only.is_none() {
            continue;
        }
        println!("{} ({})", section, roots.len());
        for root in roots {
            for (depth, d) in flatten(all, root) {
                println!("  {}{}", "  ".repeat(depth), summary(d, now));
            }
        }
        println!();
    }
    Ok(())
}
