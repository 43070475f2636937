use super::{open_workspace, print_json};
use anyhow::Result;
use serde_json::json;
use trim_core::error::CoreError;
use trim_core::id::{DecisionId, OptionId};
use trim_core::ops::OptionPatch;
use trim_store::{JsonStore, Workspace};

fn resolve_option(ws: &Workspace<JsonStore>, id: &DecisionId, key: &str) -> Result<OptionId> {
    ws.get(id)
        .and_then(|d| d.find_option(key))
        .map(|o| o.id.clone())
        .ok_or_else(|| {
            CoreError::OptionNotFound {
                decision: id.to_string(),
                option: key.to_string(),
            }
            .into()
        })
}

pub fn add(id: String, title: String, json: bool) -> Result<()> {
    let mut ws = open_workspace()?;
    let id = ws.resolve(&id)?;
    let option = ws.add_option(&id, &title)?;
    if json {
        return print_json(&json!({ "decision": id, "option": option }));
    }
    println!("Added option {} to {}", option, id.short());
    Ok(())
}

pub fn edit(
    id: String,
    option: String,
    title: Option<String>,
    memo: Option<String>,
    pros: Vec<String>,
    cons: Vec<String>,
) -> Result<()> {
    let mut ws = open_workspace()?;
    let id = ws.resolve(&id)?;
    let option = resolve_option(&ws, &id, &option)?;
    let patch = OptionPatch {
        title,
        memo,
        pros: (!pros.is_empty()).then_some(pros),
        cons: (!cons.is_empty()).then_some(cons),
    };
    ws.update_option(&id, &option, patch)?;
    println!("Updated option {}", option);
    Ok(())
}

pub fn remove(id: String, option: String) -> Result<()> {
    let mut ws = open_workspace()?;
    let id = ws.resolve(&id)?;
    let option = resolve_option(&ws, &id, &option)?;
    ws.remove_option(&id, &option)?;
    println!("Removed option {}", option);
    Ok(())
}

pub fn select(id: String, option: String) -> Result<()> {
    let mut ws = open_workspace()?;
    let id = ws.resolve(&id)?;
    let option = resolve_option(&ws, &id, &option)?;
    ws.select_option(&id, &option)?;
    let selected = ws
        .get(&id)
        .and_then(|d| d.selected_option())
        .map(|o| o.title.clone());
    match selected {
        Some(title) => println!("Selected '{}'", title),
        None => println!("Selection cleared"),
    }
    Ok(())
}
