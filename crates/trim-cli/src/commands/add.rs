use super::{now, open_workspace, print_json};
use anyhow::Result;
use serde_json::json;
use trim_core::model::{Importance, Mode};
use trim_core::ops::{NewDecision, NewSubDecision};

pub fn run(
    title: String,
    category: Option<String>,
    importance: Importance,
    mode: Mode,
    parent: Option<String>,
    json: bool,
) -> Result<()> {
    let mut ws = open_workspace()?;
    let now = now()?;

    let id = match parent {
        Some(parent) => {
            if category.is_some() {
                anyhow::bail!("sub-decisions use their parent's category");
            }
            let parent = ws.resolve(&parent)?;
            ws.create_sub(&parent, NewSubDecision { title, mode }, now)?
        }
        None => {
            let category = category.unwrap_or_else(|| ws.categories().first().to_string());
            ws.create_root(
                NewDecision {
                    title,
                    category,
                    importance,
                    mode,
                },
                now,
            )?
        }
    };

    if json {
        return print_json(&json!({ "id": id }));
    }
    println!("Added decision {}", id.short());
    Ok(())
}
