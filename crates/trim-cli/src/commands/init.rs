use anyhow::{Context, Result};
use std::env;
use trim_store::JsonStore;

pub fn run() -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    JsonStore::init(&cwd).context("failed to initialize workspace")?;
    println!("Initialized empty Trim workspace in {}", cwd.join(".trim").display());
    Ok(())
}
