use super::{now, open_workspace, print_json};
use anyhow::Result;
use serde_json::json;
use trim_core::id::DecisionId;

fn ids(list: &[DecisionId]) -> String {
    list.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
}

pub fn status(json: bool) -> Result<()> {
    let ws = open_workspace()?;
    let ledger = ws.ledger();
    let Some(pack) = ws.pack() else {
        if json {
            return print_json(&json!({ "enabled": false }));
        }
        println!("Samples are disabled in .trim/config.toml");
        return Ok(());
    };
    let present: Vec<&DecisionId> = pack
        .templates()
        .iter()
        .map(|t| &t.id)
        .filter(|id| ws.get(id).is_some())
        .collect();
    let pristine = present
        .iter()
        .filter(|id| ws.get(id).is_some_and(|d| d.is_pristine_example()))
        .count();

    if json {
        return print_json(&json!({
            "enabled": true,
            "packVersion": pack.version(),
            "ledger": ledger,
            "present": present,
            "pristine": pristine,
        }));
    }
    println!("Pack version:   {}", pack.version());
    println!(
        "Synced version: {}",
        ledger.synced_version.as_deref().unwrap_or("never")
    );
    if let Some(first_view) = ledger.first_view {
        println!("First view:     {}", first_view.format("%Y-%m-%d %H:%M:%S %Z"));
    }
    println!(
        "Samples:        {} of {} present, {} untouched",
        present.len(),
        pack.templates().len(),
        pristine
    );
    if !ledger.deleted.is_empty() {
        let deleted: Vec<DecisionId> = ledger.deleted.iter().cloned().collect();
        println!("Deleted:        {}", ids(&deleted));
    }
    Ok(())
}

pub fn sync(force: bool, json: bool) -> Result<()> {
    let mut ws = open_workspace()?;
    let report = ws.sync_samples(force, now()?)?;
    if json {
        return print_json(&json!(report));
    }
    if report.force_synced {
        println!("Force-synced the sample pack");
    }
    if !report.injected.is_empty() {
        println!("Injected:  {}", ids(&report.injected));
    }
    if !report.refreshed.is_empty() {
        println!("Refreshed: {}", ids(&report.refreshed));
    }
    if !report.kept.is_empty() {
        println!("Kept:      {}", ids(&report.kept));
    }
    if !report.skipped.is_empty() {
        println!("Skipped:   {}", ids(&report.skipped));
    }
    if !report.retired.is_empty() {
        println!("Retired:   {}", ids(&report.retired));
    }
    Ok(())
}
