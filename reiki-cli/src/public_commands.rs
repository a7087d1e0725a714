use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use uuid::Uuid;

use reiki_core::calendar::MonthGrid;
use reiki_core::services::public_booking::outcome_message;
use reiki_core::services::{BookingForm, PublicBooking};

use crate::commands::AppContext;
use crate::render;

async fn open_page(
    ctx: &AppContext,
    therapist: Option<Uuid>,
    date: NaiveDate,
) -> Result<PublicBooking> {
    let mut page = PublicBooking::new(ctx.backend(), &ctx.config, date);
    page.load_therapists().await?;
    if let Some(id) = therapist {
        page.select_therapist(id);
    }
    page.refresh().await?;
    Ok(page)
}

pub async fn list_therapists(ctx: &AppContext, json: bool) -> Result<()> {
    let page = open_page(ctx, None, ctx.today()).await?;
    let therapists = page.therapists();

    if json {
        println!("{}", serde_json::to_string_pretty(therapists)?);
        return Ok(());
    }
    if therapists.is_empty() {
        render::print_empty("No hay terapeutas disponibles.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Terapeuta"]);
    for t in therapists {
        table.add_row(vec![t.id.to_string(), t.display_name().to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub async fn show_slots(
    ctx: &AppContext,
    therapist: Option<Uuid>,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let page = open_page(ctx, therapist, date.unwrap_or_else(|| ctx.today())).await?;
    let Some(selected) = page.selected() else {
        render::print_empty("No hay terapeutas disponibles.");
        return Ok(());
    };
    let agenda = page.agenda();

    if json {
        println!("{}", serde_json::to_string_pretty(&agenda)?);
        return Ok(());
    }

    let name = page
        .therapists()
        .iter()
        .find(|t| t.id == selected)
        .map_or("Terapeuta", |t| t.display_name());
    println!("{} · {}", name.cyan().bold(), page.day());
    println!("{}", render::agenda_table(&agenda));
    println!("\n{} horarios libres", agenda.free_slots().count());
    Ok(())
}

pub async fn book(
    ctx: &AppContext,
    therapist: Option<Uuid>,
    date: NaiveDate,
    time: &str,
    form: BookingForm,
) -> Result<()> {
    let start = ctx.slot_start(date, time)?;
    let mut page = open_page(ctx, therapist, date).await?;

    let result = page.book(start, form).await;
    let message = outcome_message(&result);
    match result {
        Ok(()) => {
            println!("{} {}", "✓".green(), message.green());
            Ok(())
        }
        Err(e) => {
            println!("{}", message.red());
            Err(e.into())
        }
    }
}

pub fn show_calendar(
    ctx: &AppContext,
    month: Option<&str>,
    select: Option<NaiveDate>,
) -> Result<()> {
    let today = ctx.today();
    let grid = match month {
        Some(m) => MonthGrid::parse(m).with_context(|| format!("Invalid month '{}', expected YYYY-MM", m))?,
        None => MonthGrid::containing(select.unwrap_or(today)),
    };
    let selected = select.unwrap_or(today);

    println!("{}", grid.label().cyan().bold());
    println!("{}", render::calendar_table(&grid, selected, today));
    Ok(())
}
