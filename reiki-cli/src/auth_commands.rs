use anyhow::Result;
use colored::Colorize;

use reiki_core::services::access::{header_name, require_admin, signed_in_profile};
use reiki_core::AgendaBackend;

use crate::commands::AppContext;

pub async fn sign_up(
    ctx: &AppContext,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> Result<()> {
    match ctx.client.sign_up(email, password, name).await? {
        Some(_) => println!("{} Cuenta creada, sesión iniciada: {}", "✓".green(), email.green()),
        None => println!(
            "{} Cuenta creada. Revisá tu correo para confirmarla y después iniciá sesión.",
            "✓".green()
        ),
    }
    Ok(())
}

pub async fn sign_in(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    let session = ctx.client.sign_in_with_password(email, password).await?;
    println!(
        "{} Sesión iniciada: {} (expira en {} min)",
        "✓".green(),
        email.green(),
        session.remaining_seconds() / 60
    );
    Ok(())
}

pub async fn sign_out(ctx: &AppContext) -> Result<()> {
    ctx.client.sign_out().await?;
    println!("{} Sesión cerrada", "✓".green());
    Ok(())
}

pub async fn whoami(ctx: &AppContext, json: bool) -> Result<()> {
    let backend = ctx.backend();
    let Some(user) = backend.current_user().await? else {
        println!("{}", "No hay sesión iniciada.".yellow());
        return Ok(());
    };
    let profile = signed_in_profile(backend.as_ref()).await.map(|(_, p)| p);
    let is_admin = require_admin(backend.as_ref()).await.is_granted();

    if json {
        let value = serde_json::json!({ "user": user, "profile": profile, "is_admin": is_admin });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", header_name(&user, profile.as_ref()).cyan().bold());
    println!("  ID:    {}", user.id);
    println!("  Email: {}", user.email.as_deref().unwrap_or("-"));
    match &profile {
        Some(p) => {
            println!("  Rol:   {}", p.role);
            println!("  Activo: {}", if p.is_active { "sí" } else { "no" });
        }
        None => println!("  {}", "Sin perfil visible".yellow()),
    }
    if is_admin {
        println!("  {}", "Administrador".magenta());
    }
    Ok(())
}
