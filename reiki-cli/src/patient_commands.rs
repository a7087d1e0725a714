use anyhow::{bail, Result};
use colored::Colorize;
use uuid::Uuid;

use reiki_core::availability::DayWindow;
use reiki_core::body_map::Toggle;
use reiki_core::services::{PatientsBook, TherapistAgenda, VisitDraft};
use reiki_types::{BodyView, PatientDraft};

use crate::cli::PatientFields;
use crate::commands::AppContext;
use crate::render;

async fn open_book(ctx: &AppContext) -> Result<PatientsBook> {
    let panel = TherapistAgenda::open(ctx.backend(), &ctx.config).await?;
    Ok(PatientsBook::new(ctx.backend(), panel.me().id))
}

/// Overlay the given fields on `draft`; fields left out keep their value.
fn apply_fields(mut draft: PatientDraft, fields: PatientFields) -> Result<PatientDraft> {
    if let Some(phone) = fields.phone {
        draft.phone = Some(phone);
    }
    if let Some(email) = fields.email {
        draft.email = Some(email);
    }
    if let Some(birth_date) = fields.birth_date {
        draft.birth_date = Some(birth_date);
    }
    if let Some(reason) = fields.reason {
        draft.consultation_reason = Some(reason);
    }
    for (column, value) in fields.history {
        if !draft.medical_history.set(&column, Some(value)) {
            bail!("Unknown medical history field '{}'", column);
        }
    }
    Ok(draft)
}

pub async fn list_patients(ctx: &AppContext, search: Option<&str>, json: bool) -> Result<()> {
    let book = open_book(ctx).await?;
    let patients = match search {
        Some(q) => book.search(q).await?,
        None => book.list().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&patients)?);
        return Ok(());
    }
    if patients.is_empty() {
        render::print_empty("No hay pacientes.");
        return Ok(());
    }
    println!("{}", render::patients_table(&patients));
    Ok(())
}

pub async fn show_patient(ctx: &AppContext, id: Uuid, json: bool) -> Result<()> {
    let book = open_book(ctx).await?;
    let file = book.open(id).await?;

    if json {
        let value = serde_json::json!({
            "patient": file.patient,
            "appointments": file.appointments,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let p = &file.patient;
    println!("{}", p.full_name.cyan().bold());
    println!("  Teléfono:   {}", p.phone.as_deref().unwrap_or("-"));
    println!("  Email:      {}", p.email.as_deref().unwrap_or("-"));
    println!("  Nacimiento: {}", p.birth_date.map_or_else(|| "-".to_string(), |d| d.to_string()));
    println!("  Motivo:     {}", p.consultation_reason.as_deref().unwrap_or("-"));

    if let Some(history) = p.medical_history.as_ref().filter(|h| !h.is_empty()) {
        println!("\n{}", "Antecedentes".bold());
        for (column, value) in history.entries() {
            println!("  {column}: {value}");
        }
    }

    println!("\n{}", "Turnos".bold());
    if file.appointments.is_empty() {
        render::print_empty("  Sin turnos.");
    } else {
        let today = ctx.today();
        let offset = DayWindow::resolve(today, &ctx.config.schedule).offset();
        println!("{}", render::appointments_table(&file.appointments, offset));
    }
    Ok(())
}

pub async fn add_patient(ctx: &AppContext, name: &str, fields: PatientFields) -> Result<()> {
    let book = open_book(ctx).await?;
    let draft = apply_fields(PatientDraft::named(name), fields)?;
    let saved = book.save(None, draft).await?;
    println!("{} Paciente creado: {} ({})", "✓".green(), saved.full_name.green(), saved.id);
    Ok(())
}

pub async fn edit_patient(
    ctx: &AppContext,
    id: Uuid,
    name: Option<String>,
    fields: PatientFields,
) -> Result<()> {
    let book = open_book(ctx).await?;
    let current = book.open(id).await?.patient;
    let mut draft = apply_fields(current.to_draft(), fields)?;
    if let Some(name) = name {
        draft.full_name = name;
    }
    let saved = book.save(Some(id), draft).await?;
    println!("{} Paciente actualizado: {}", "✓".green(), saved.full_name.green());
    Ok(())
}

pub async fn delete_patient(ctx: &AppContext, id: Uuid, yes: bool) -> Result<()> {
    if !yes {
        bail!("Deleting a patient also deletes their appointments; pass --yes to confirm");
    }
    let book = open_book(ctx).await?;
    book.delete(id).await?;
    println!("{} Paciente eliminado", "✓".green());
    Ok(())
}

/// Changes to a stored visit given on the command line, applied in field order.
#[derive(Debug, Default)]
pub struct VisitEdits {
    pub observations: Option<String>,
    pub clear: bool,
    pub undo: bool,
    pub points: Vec<(f64, f64, Option<BodyView>)>,
}

fn apply_visit_edits(mut visit: VisitDraft, edits: VisitEdits) -> VisitDraft {
    if let Some(observations) = edits.observations {
        visit.observations = observations;
    }
    if edits.clear {
        visit.body_map.clear();
    }
    if edits.undo && visit.body_map.undo().is_none() {
        tracing::debug!("Nothing to undo");
    }
    for (x, y, view) in edits.points {
        if visit.body_map.toggle(x, y, view) == Toggle::Removed {
            tracing::debug!("Point {:.3},{:.3} removed an earlier mark", x, y);
        }
    }
    visit
}

pub async fn record_visit(ctx: &AppContext, appointment: Uuid, edits: VisitEdits) -> Result<()> {
    let book = open_book(ctx).await?;

    let visit = apply_visit_edits(book.open_visit(appointment).await?, edits);
    let marks = visit.body_map.len();
    book.record_visit(appointment, &visit.observations, visit.body_map).await?;

    println!(
        "{} Sesión registrada ({} {})",
        "✓".green(),
        marks,
        if marks == 1 { "punto" } else { "puntos" }
    );
    Ok(())
}
