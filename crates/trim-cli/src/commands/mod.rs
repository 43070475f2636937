pub mod add;
pub mod category;
pub mod delete;
pub mod edit;
pub mod init;
pub mod list;
pub mod mode;
pub mod option;
pub mod relocate;
pub mod reorder;
pub mod samples;
pub mod show;
pub mod trim;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::env;
use trim_core::model::Decision;
use trim_core::time::{self, Countdown};
use trim_store::{JsonStore, Settings, Workspace};

/// Current time, overridable with `TRIM_NOW` (RFC 3339) for scripted use.
pub fn now() -> Result<DateTime<Utc>> {
    match env::var("TRIM_NOW") {
        Ok(raw) => time::parse_deadline(&raw).context("invalid TRIM_NOW"),
        Err(_) => Ok(Utc::now()),
    }
}

/// Discover the workspace above the current directory and open a session.
pub fn open_workspace() -> Result<Workspace<JsonStore>> {
    let cwd = env::current_dir()?;
    let store = JsonStore::discover(&cwd).context("not a Trim workspace (run `trim init`)")?;
    let settings = Settings::from(&store.config());
    Ok(Workspace::open(store, &settings, now()?))
}

pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line summary used by `list` and `show`.
pub fn summary(d: &Decision, now: DateTime<Utc>) -> String {
    let status = if d.resolved {
        match d.selected_option() {
            Some(o) => format!("trimmed: {}", o.title),
            None => "trimmed".to_string(),
        }
    } else {
        Countdown::between(d.deadline, now).display()
    };
    let title = if d.title.is_empty() { "(untitled)" } else { d.title.as_str() };
    let sample = if d.is_pristine_example() { " (example)" } else { "" };
    format!(
        "{}  {:>13}  {}  [{}, {}]{}",
        d.id.short(),
        status,
        title,
        d.category,
        d.importance,
        sample
    )
}
