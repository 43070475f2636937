use super::{now, open_workspace};
use anyhow::Result;

pub fn run(id: String) -> Result<()> {
    let mut ws = open_workspace()?;
    let id = ws.resolve(&id)?;
    ws.resolve_decision(&id, now()?)?;
    let choice = ws
        .get(&id)
        .and_then(|d| d.selected_option())
        .map(|o| o.title.clone())
        .unwrap_or_default();
    println!("Trimmed {}: {}", id.short(), choice);
    Ok(())
}

pub fn reopen(id: String) -> Result<()> {
    let mut ws = open_workspace()?;
    let id = ws.resolve(&id)?;
    ws.reopen(&id)?;
    println!("Reopened {}", id.short());
    Ok(())
}
