use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use reiki_client::SupabaseClient;
use reiki_core::availability::{local_date, DayWindow};
use reiki_core::{config, session_store, AgendaBackend};
use reiki_types::AgendaConfig;

use crate::cli::{
    AdminCommands, AuthCommands, Cli, Commands, ConfigCommands, PanelCommands, PatientCommands,
    PublicCommands,
};
use crate::{
    admin_commands, auth_commands, config_commands, panel_commands, patient_commands,
    public_commands,
};

/// Loaded configuration plus a backend client carrying the stored session.
pub struct AppContext {
    pub data_dir: PathBuf,
    pub config: AgendaConfig,
    pub client: Arc<SupabaseClient>,
}

impl AppContext {
    pub async fn open() -> Result<Self> {
        let data_dir = config::get_data_dir()?;
        let config = config::load_config()?;
        let backend = config.require_backend().with_context(|| {
            format!(
                "Backend not configured; run `reiki config set backend.url <URL>` and \
                 `reiki config set backend.anon_key <KEY>` or set {} / {}",
                config::URL_ENV,
                config::ANON_KEY_ENV
            )
        })?;
        let client = SupabaseClient::from_backend_config(backend)?;

        if let Some(session) = session_store::load_session(&data_dir)? {
            tracing::debug!("Restored session for {}", session.user.id);
            client.restore_session(session).await;
        }

        Ok(Self { data_dir, config, client: Arc::new(client) })
    }

    pub fn backend(&self) -> Arc<dyn AgendaBackend> {
        self.client.clone()
    }

    /// Today in the agenda's offset.
    pub fn today(&self) -> NaiveDate {
        local_date(&self.config.schedule, Utc::now())
    }

    /// `HH:MM` on `date`, read in the agenda's offset.
    pub fn slot_start(&self, date: NaiveDate, time: &str) -> Result<DateTime<Utc>> {
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .with_context(|| format!("Invalid time '{}', expected HH:MM", time))?;
        let offset = DayWindow::resolve(date, &self.config.schedule).offset();
        offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|t| t.with_timezone(&Utc))
            .context("Ambiguous local time")
    }

    /// Write the current session (possibly refreshed or dropped) back to disk.
    pub async fn persist_session(&self) -> Result<()> {
        match self.client.session().await {
            Some(session) => session_store::save_session(&self.data_dir, &session)?,
            None => session_store::clear_session(&self.data_dir)?,
        }
        Ok(())
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Commands::Config(cmd) => return handle_config_command(cmd),
        other => other,
    };

    let ctx = AppContext::open().await?;
    let result = match command {
        Commands::Auth(cmd) => handle_auth_command(&ctx, cmd).await,
        Commands::Public(cmd) => handle_public_command(&ctx, cmd).await,
        Commands::Panel(cmd) => handle_panel_command(&ctx, cmd).await,
        Commands::Patients(cmd) => handle_patient_command(&ctx, cmd).await,
        Commands::Admin(cmd) => handle_admin_command(&ctx, cmd).await,
        Commands::Config(_) => Ok(()),
    };
    ctx.persist_session().await?;
    result
}

pub async fn handle_auth_command(ctx: &AppContext, cmd: AuthCommands) -> Result<()> {
    match cmd {
        AuthCommands::Signup { email, password, name } => {
            auth_commands::sign_up(ctx, &email, &password, name.as_deref()).await
        }
        AuthCommands::Login { email, password } => {
            auth_commands::sign_in(ctx, &email, &password).await
        }
        AuthCommands::Logout => auth_commands::sign_out(ctx).await,
        AuthCommands::Whoami { json } => auth_commands::whoami(ctx, json).await,
    }
}

pub async fn handle_public_command(ctx: &AppContext, cmd: PublicCommands) -> Result<()> {
    match cmd {
        PublicCommands::Therapists { json } => public_commands::list_therapists(ctx, json).await,
        PublicCommands::Slots { therapist, date, json } => {
            public_commands::show_slots(ctx, therapist, date, json).await
        }
        PublicCommands::Book { therapist, date, time, phone, name, service, note } => {
            let form = reiki_core::services::BookingForm { patient_name: name, phone, service, note };
            public_commands::book(ctx, therapist, date, &time, form).await
        }
        PublicCommands::Calendar { month, select } => {
            public_commands::show_calendar(ctx, month.as_deref(), select)
        }
    }
}

pub async fn handle_panel_command(ctx: &AppContext, cmd: PanelCommands) -> Result<()> {
    match cmd {
        PanelCommands::Profiles { json } => panel_commands::list_profiles(ctx, json).await,
        PanelCommands::Agenda { therapist, date, json } => {
            panel_commands::show_agenda(ctx, therapist, date, json).await
        }
        PanelCommands::Create { date, time, name, phone, service, note } => {
            let dialog = reiki_core::services::AppointmentDialog {
                patient_name: name.unwrap_or_default(),
                phone,
                service,
                note,
            };
            panel_commands::create_appointment(ctx, date, &time, dialog).await
        }
        PanelCommands::Overview { date, json } => panel_commands::overview(ctx, date, json).await,
    }
}

pub async fn handle_patient_command(ctx: &AppContext, cmd: PatientCommands) -> Result<()> {
    match cmd {
        PatientCommands::List { search, json } => {
            patient_commands::list_patients(ctx, search.as_deref(), json).await
        }
        PatientCommands::Show { id, json } => patient_commands::show_patient(ctx, id, json).await,
        PatientCommands::Add { name, fields } => {
            patient_commands::add_patient(ctx, &name, fields).await
        }
        PatientCommands::Edit { id, name, fields } => {
            patient_commands::edit_patient(ctx, id, name, fields).await
        }
        PatientCommands::Delete { id, yes } => patient_commands::delete_patient(ctx, id, yes).await,
        PatientCommands::Visit { appointment, observations, clear, undo, points } => {
            let edits = patient_commands::VisitEdits { observations, clear, undo, points };
            patient_commands::record_visit(ctx, appointment, edits).await
        }
    }
}

pub async fn handle_admin_command(ctx: &AppContext, cmd: AdminCommands) -> Result<()> {
    match cmd {
        AdminCommands::List { search, json } => {
            admin_commands::list_profiles(ctx, search.as_deref(), json).await
        }
        AdminCommands::Role { id } => admin_commands::toggle_role(ctx, id).await,
        AdminCommands::Activate { id } => admin_commands::set_active(ctx, id, true).await,
        AdminCommands::Deactivate { id } => admin_commands::set_active(ctx, id, false).await,
    }
}

pub fn handle_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => config_commands::show_config(json),
        ConfigCommands::Path => config_commands::show_path(),
        ConfigCommands::Set { key, value } => config_commands::set_config_value(&key, &value),
    }
}
