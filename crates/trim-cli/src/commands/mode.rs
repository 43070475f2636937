use super::open_workspace;
use anyhow::Result;
use trim_core::model::Mode;

pub fn run(id: String, mode: Mode) -> Result<()> {
    let mut ws = open_workspace()?;
    let id = ws.resolve(&id)?;
    ws.change_mode(&id, mode)?;
    println!("Decision {} is now {}", id.short(), mode);
    Ok(())
}
