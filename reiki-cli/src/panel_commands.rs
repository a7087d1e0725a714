use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use uuid::Uuid;

use reiki_core::availability::DayWindow;
use reiki_core::services::overview::day_overview;
use reiki_core::services::therapist::save_error_message;
use reiki_core::services::{AppointmentDialog, TherapistAgenda};

use crate::commands::AppContext;
use crate::render;

async fn open_panel(ctx: &AppContext) -> Result<TherapistAgenda> {
    Ok(TherapistAgenda::open(ctx.backend(), &ctx.config).await?)
}

pub async fn list_profiles(ctx: &AppContext, json: bool) -> Result<()> {
    let panel = open_panel(ctx).await?;
    let profiles = panel.profiles().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }
    if profiles.is_empty() {
        render::print_empty("No hay perfiles visibles.");
        return Ok(());
    }
    let refs: Vec<_> = profiles.iter().collect();
    println!("{}", render::profiles_table(&refs));
    Ok(())
}

pub async fn show_agenda(
    ctx: &AppContext,
    therapist: Option<Uuid>,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let panel = open_panel(ctx).await?;
    let therapist_id = therapist.unwrap_or(panel.me().id);
    let day = date.unwrap_or_else(|| ctx.today());
    let agenda = panel.day(therapist_id, day).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agenda)?);
        return Ok(());
    }

    let title = if therapist_id == panel.me().id {
        panel.header_name()
    } else {
        panel
            .profiles()
            .await?
            .iter()
            .find(|p| p.id == therapist_id)
            .map_or_else(|| therapist_id.to_string(), |p| p.display_name().to_string())
    };
    println!("{} · {}", title.cyan().bold(), day);
    println!("{}", render::agenda_table(&agenda));
    Ok(())
}

pub async fn create_appointment(
    ctx: &AppContext,
    date: NaiveDate,
    time: &str,
    dialog: AppointmentDialog,
) -> Result<()> {
    let start = ctx.slot_start(date, time)?;
    let panel = open_panel(ctx).await?;

    match panel.create_appointment(start, dialog).await {
        Ok(appointment) => {
            let offset = DayWindow::resolve(date, &ctx.config.schedule).offset();
            println!(
                "{} Turno creado: {} {} ({})",
                "✓".green(),
                render::local_datetime(appointment.start_at, offset),
                appointment.service_label(),
                appointment.id
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", save_error_message(&e).red());
            Err(e.into())
        }
    }
}

pub async fn overview(ctx: &AppContext, date: Option<NaiveDate>, json: bool) -> Result<()> {
    let panel = open_panel(ctx).await?;
    let day = date.unwrap_or_else(|| ctx.today());
    let backend = ctx.backend();
    let days = day_overview(backend.as_ref(), day).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&days)?);
        return Ok(());
    }
    if days.is_empty() {
        render::print_empty("Ningún turno para este día.");
        return Ok(());
    }

    let names: HashMap<Uuid, String> = panel
        .profiles()
        .await?
        .into_iter()
        .map(|p| (p.id, p.display_name().to_string()))
        .collect();
    let offset = DayWindow::resolve(day, &ctx.config.schedule).offset();

    println!("{}", format!("Resumen del {day}").cyan().bold());
    for entry in &days {
        let name = entry
            .therapist_id
            .and_then(|id| names.get(&id).cloned())
            .unwrap_or_else(|| "(sin terapeuta)".to_string());
        println!("\n{}", name.bold());
        println!("{}", render::busy_table(&entry.busy, offset));
    }
    Ok(())
}
