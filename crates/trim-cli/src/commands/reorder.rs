use super::{now, open_workspace};
use anyhow::Result;
use trim_core::ops::ReorderScope;
use trim_core::tree::Section;

pub fn run(ids: Vec<String>, parent: Option<String>, section: Section) -> Result<()> {
    let mut ws = open_workspace()?;
    let scope = match parent {
        Some(p) => ReorderScope::Children(ws.resolve(&p)?),
        None => ReorderScope::Roots(section),
    };
    let ids = ids
        .iter()
        .map(|key| ws.resolve(key))
        .collect::<Result<Vec<_>, _>>()?;
    ws.reorder(&scope, &ids, now()?)?;
    println!("Reordered {} decision(s)", ids.len());
    Ok(())
}
