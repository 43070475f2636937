use super::{now, open_workspace, print_json, summary};
use anyhow::{Context, Result};
use serde_json::json;
use trim_core::time::Countdown;
use trim_core::tree;

pub fn run(id: String, json: bool) -> Result<()> {
    let ws = open_workspace()?;
    let now = now()?;
    let all = ws.decisions();
    let d = tree::resolve_prefix(all, &id).context(format!("decision '{}' not found", id))?;
    let path = tree::ancestor_path(all, &d.id);
    let children = tree::children_of(all, &d.id);
    let countdown = Countdown::between(d.deadline, now);

    if json {
        let output = json!({
            "decision": d,
            "section": tree::section_of(all, d, now),
            "countdown": countdown,
            "path": path.iter().map(|p| &p.id).collect::<Vec<_>>(),
            "children": children.iter().map(|c| &c.id).collect::<Vec<_>>(),
        });
        return print_json(&output);
    }

    println!("decision {}", d.id);
    if !path.is_empty() {
        let titles: Vec<&str> = path.iter().map(|p| p.title.as_str()).collect();
        println!("Path:       {}", titles.join(" > "));
    }
    println!("Title:      {}", d.title);
    println!("Category:   {}", d.category);
    println!("Importance: {} ({} min)", d.importance, d.time_budget);
    println!("Mode:       {}", d.mode);
    println!("Created:    {}", d.created_at.format("%Y-%m-%d %H:%M:%S %Z"));
    println!("Deadline:   {}", d.deadline.format("%Y-%m-%d %H:%M:%S %Z"));
    match d.resolved_at {
        Some(at) => println!("Trimmed:    {}", at.format("%Y-%m-%d %H:%M:%S %Z")),
        None if countdown.is_overdue => println!("Overdue by: {}", countdown.display()),
        None => println!("Time left:  {}", countdown.display()),
    }
    if d.is_pristine_example() {
        println!("(built-in example; editing it makes it yours)");
    }

    if let Some(framing) = &d.framing {
        println!();
        println!("Framing:");
        for (label, value) in framing.fields() {
            if let Some(value) = value {
                println!("  {}: {}", label, value);
            }
        }
    }

    println!();
    println!("Options:");
    if d.options.is_empty() {
        println!("  (none)");
    }
    for (i, o) in d.options.iter().enumerate() {
        let marker = if o.is_selected { "*" } else { " " };
        let score = d
            .comparison_matrix
            .as_ref()
            .and_then(|m| m.total(&o.id))
            .map(|t| format!("  (score {})", t))
            .unwrap_or_default();
        println!("  {} {}. {}{}", marker, i + 1, o.title, score);
        if let Some(memo) = &o.memo {
            println!("       {}", memo);
        }
        for pro in &o.pros {
            println!("       + {}", pro);
        }
        for con in &o.cons {
            println!("       - {}", con);
        }
    }

    if !d.links.is_empty() {
        println!();
        println!("Links:");
        for link in &d.links {
            let title = link
                .preview
                .as_ref()
                .and_then(|p| p.title.as_deref())
                .unwrap_or(&link.url);
            println!("  - {} <{}>", title, link.url);
        }
    }

    if !children.is_empty() {
        println!();
        println!("Sub-decisions:");
        for child in children {
            println!("  {}", summary(child, now));
        }
    }
    Ok(())
}
