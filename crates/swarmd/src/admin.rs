//! One-shot admin subcommands.
//!
//! Each runs a single CRUD entry point and prints the envelope as JSON on
//! stdout. A failure envelope makes the process exit non-zero.

use anyhow::bail;

use swarmgrid_registry::{Envelope, SwarmRegistry};

use crate::Command;

pub async fn run(registry: &SwarmRegistry, command: Command) -> anyhow::Result<()> {
    let envelope = dispatch(registry, command).await?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    if !envelope.is_ok() {
        bail!(
            "request failed with code {}: {}",
            envelope.code,
            envelope.message.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

async fn dispatch(registry: &SwarmRegistry, command: Command) -> anyhow::Result<Envelope> {
    let envelope = match command {
        Command::List { check_state } => registry.handle_get(Some("all"), check_state).await,
        Command::Get { name } => registry.handle_get(Some(&name), false).await,
        Command::Active => registry.handle_get(Some("active"), false).await,
        Command::Leader => registry.handle_get(Some("leader"), false).await,
        Command::Add { name, address } => registry.handle_post(&name, &address).await,
        Command::Remove { name } => registry.handle_delete(&name).await,
        Command::Activate { name } => registry.handle_put(&name, true).await,
        Command::Serve { .. } => bail!("serve is not an admin command"),
    };
    Ok(envelope)
}
