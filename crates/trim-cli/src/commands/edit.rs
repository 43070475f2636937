use super::{now, open_workspace};
use anyhow::{Context, Result};
use clap::Args;
use trim_core::model::{Importance, Link};
use trim_core::ops::DecisionPatch;
use trim_core::preview::{preview_or_fallback, OfflinePreviewer};
use trim_core::time;

#[derive(Args)]
pub struct EditArgs {
    /// Decision ID (full or unique prefix)
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub category: Option<String>,

    /// New importance; restarts the countdown with its default budget
    #[arg(short, long)]
    pub importance: Option<Importance>,

    /// Time budget in minutes; restarts the countdown
    #[arg(long)]
    pub budget: Option<u32>,

    /// Exact deadline (RFC 3339)
    #[arg(long)]
    pub deadline: Option<String>,

    #[arg(long)]
    pub what_happened: Option<String>,

    #[arg(long)]
    pub goal: Option<String>,

    #[arg(long)]
    pub constraints: Option<String>,

    #[arg(long)]
    pub dealbreakers: Option<String>,

    #[arg(long)]
    pub key_factors: Option<String>,

    /// Attach a link (repeatable)
    #[arg(long)]
    pub link: Vec<String>,

    /// Remove all links before attaching new ones
    #[arg(long)]
    pub clear_links: bool,
}

/// `Some("")` clears a framing field, `None` leaves it.
fn set_field(field: &mut Option<String>, value: Option<String>) -> bool {
    match value {
        Some(v) => {
            *field = (!v.trim().is_empty()).then_some(v);
            true
        }
        None => false,
    }
}

pub fn run(args: EditArgs) -> Result<()> {
    let mut ws = open_workspace()?;
    let now = now()?;
    let id = ws.resolve(&args.id)?;
    let current = ws
        .get(&id)
        .cloned()
        .context(format!("decision '{}' not found", args.id))?;

    let deadline = args
        .deadline
        .as_deref()
        .map(time::parse_deadline)
        .transpose()?;

    let mut framing = current.framing.clone().unwrap_or_default();
    let mut framing_changed = false;
    framing_changed |= set_field(&mut framing.what_happened, args.what_happened);
    framing_changed |= set_field(&mut framing.goal, args.goal);
    framing_changed |= set_field(&mut framing.constraints, args.constraints);
    framing_changed |= set_field(&mut framing.dealbreakers, args.dealbreakers);
    framing_changed |= set_field(&mut framing.key_factors, args.key_factors);

    let links = if args.clear_links || !args.link.is_empty() {
        let mut links: Vec<Link> = if args.clear_links {
            vec![]
        } else {
            current.links.clone()
        };
        for url in args.link {
            let preview = preview_or_fallback(&OfflinePreviewer, &url);
            links.push(Link {
                url,
                preview: Some(preview),
            });
        }
        Some(links)
    } else {
        None
    };

    let patch = DecisionPatch {
        title: args.title,
        category: args.category,
        importance: args.importance,
        time_budget: args.budget,
        deadline,
        framing: framing_changed.then_some(framing),
        links,
        comparison_matrix: None,
    };
    if patch.is_empty() {
        anyhow::bail!("nothing to change");
    }

    ws.update(&id, patch, now)?;
    println!("Updated decision {}", id.short());
    Ok(())
}
