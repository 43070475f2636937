use super::{open_workspace, print_json};
use anyhow::Result;
use serde_json::json;

pub fn list(json: bool) -> Result<()> {
    let ws = open_workspace()?;
    let counts: Vec<(String, usize)> = ws
        .categories()
        .names()
        .iter()
        .map(|name| {
            let n = ws.decisions().iter().filter(|d| &d.category == name).count();
            (name.clone(), n)
        })
        .collect();

    if json {
        let rows: Vec<_> = counts
            .iter()
            .map(|(name, n)| json!({ "name": name, "decisions": n }))
            .collect();
        return print_json(&serde_json::Value::Array(rows));
    }
    for (name, n) in counts {
        println!("{:<20} {}", name, n);
    }
    Ok(())
}

pub fn add(name: String) -> Result<()> {
    let mut ws = open_workspace()?;
    ws.add_category(&name)?;
    println!("Added category '{}'", name.trim());
    Ok(())
}

pub fn rename(old: String, new: String) -> Result<()> {
    let mut ws = open_workspace()?;
    let count = ws.rename_category(&old, &new)?;
    println!("Renamed '{}' to '{}' ({} decision(s) updated)", old, new.trim(), count);
    Ok(())
}

pub fn delete(name: String) -> Result<()> {
    let mut ws = open_workspace()?;
    ws.remove_category(&name)?;
    println!("Deleted category '{}'", name);
    Ok(())
}
