use super::{open_workspace, print_json};
use anyhow::Result;
use serde_json::json;

pub fn run(id: String, json: bool) -> Result<()> {
    let mut ws = open_workspace()?;
    let id = ws.resolve(&id)?;
    let removed = ws.delete(&id)?;
    if json {
        return print_json(&json!({ "removed": removed }));
    }
    match removed.len() {
        1 => println!("Deleted {}", id.short()),
        n => println!("Deleted {} and {} sub-decision(s)", id.short(), n - 1),
    }
    Ok(())
}
