use super::open_workspace;
use anyhow::Result;

pub fn run(id: String, parent: Option<String>, root: bool) -> Result<()> {
    if parent.is_none() && !root {
        anyhow::bail!("give a new parent with --parent, or --root");
    }
    let mut ws = open_workspace()?;
    let id = ws.resolve(&id)?;
    let parent = parent.map(|p| ws.resolve(&p)).transpose()?;
    ws.move_to(&id, parent.as_ref())?;
    match parent {
        Some(p) => println!("Moved {} under {}", id.short(), p.short()),
        None => println!("Moved {} to the top level", id.short()),
    }
    Ok(())
}
