use anyhow::Result;
use colored::Colorize;
use uuid::Uuid;

use reiki_core::services::admin::{active_message, ACTIVE_FAILED, ROLE_FAILED, ROLE_UPDATED};
use reiki_core::services::AdminPanel;

use crate::commands::AppContext;
use crate::render;

pub async fn list_profiles(ctx: &AppContext, search: Option<&str>, json: bool) -> Result<()> {
    let panel = AdminPanel::open(ctx.backend()).await?;
    let profiles = panel.filter(search.unwrap_or_default());

    if json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }
    if profiles.is_empty() {
        render::print_empty("Ningún perfil coincide.");
        return Ok(());
    }
    println!("{}", render::profiles_table(&profiles));
    Ok(())
}

pub async fn toggle_role(ctx: &AppContext, id: Uuid) -> Result<()> {
    let mut panel = AdminPanel::open(ctx.backend()).await?;
    match panel.toggle_role(id).await {
        Ok(role) => {
            println!("{} {} ({})", "✓".green(), ROLE_UPDATED.green(), role);
            Ok(())
        }
        Err(e) => {
            println!("{}", ROLE_FAILED.red());
            Err(e.into())
        }
    }
}

pub async fn set_active(ctx: &AppContext, id: Uuid, active: bool) -> Result<()> {
    let mut panel = AdminPanel::open(ctx.backend()).await?;
    match panel.set_active(id, active).await {
        Ok(()) => {
            println!("{} {}", "✓".green(), active_message(active).green());
            Ok(())
        }
        Err(e) => {
            println!("{}", ACTIVE_FAILED.red());
            Err(e.into())
        }
    }
}
