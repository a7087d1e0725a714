use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use reiki_types::BodyView;

#[derive(Parser)]
#[command(
    name = "reiki",
    about = "Reiki Agenda - turnos, pacientes y administración desde la terminal",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(subcommand, about = "Sign up, sign in and sign out")]
    Auth(AuthCommands),

    #[command(subcommand, about = "Public booking: therapists, free slots, booking")]
    Public(PublicCommands),

    #[command(subcommand, about = "Therapist panel: agendas and new appointments")]
    Panel(PanelCommands),

    #[command(subcommand, about = "Patient files of the signed-in therapist")]
    Patients(PatientCommands),

    #[command(subcommand, about = "Admin panel: roles and activation")]
    Admin(AdminCommands),

    #[command(subcommand, about = "View and modify configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account")]
    Signup {
        #[arg(long)]
        email: String,

        #[arg(long, env = "REIKI_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, help = "Full name stored on the profile")]
        name: Option<String>,
    },

    #[command(about = "Sign in with e-mail and password")]
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "REIKI_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Sign out and forget the stored session")]
    Logout,

    #[command(about = "Show the signed-in user and role")]
    Whoami {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PublicCommands {
    #[command(about = "List therapists open for booking")]
    Therapists {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Show a therapist's slots for a day")]
    Slots {
        #[arg(long, help = "Therapist ID (defaults to the first one)")]
        therapist: Option<Uuid>,

        #[arg(long, help = "Day as YYYY-MM-DD (defaults to today)")]
        date: Option<NaiveDate>,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Book a free slot")]
    Book {
        #[arg(long, help = "Therapist ID (defaults to the first one)")]
        therapist: Option<Uuid>,

        #[arg(long, help = "Day as YYYY-MM-DD")]
        date: NaiveDate,

        #[arg(long, help = "Slot start as HH:MM")]
        time: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        service: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    #[command(about = "Print the month grid of the date picker")]
    Calendar {
        #[arg(long, help = "Month as YYYY-MM (defaults to the current one)")]
        month: Option<String>,

        #[arg(long, help = "Highlighted day as YYYY-MM-DD")]
        select: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum PanelCommands {
    #[command(about = "List profiles selectable in the panel")]
    Profiles {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Show a day of your agenda or a colleague's")]
    Agenda {
        #[arg(long, help = "Therapist ID (defaults to yourself)")]
        therapist: Option<Uuid>,

        #[arg(long, help = "Day as YYYY-MM-DD (defaults to today)")]
        date: Option<NaiveDate>,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Create an appointment on your own agenda")]
    Create {
        #[arg(long, help = "Day as YYYY-MM-DD")]
        date: NaiveDate,

        #[arg(long, help = "Slot start as HH:MM")]
        time: String,

        #[arg(long, help = "Patient name (matched or created); omit to block the slot")]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        service: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    #[command(about = "Busy intervals of every therapist for a day")]
    Overview {
        #[arg(long, help = "Day as YYYY-MM-DD (defaults to today)")]
        date: Option<NaiveDate>,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },
}

/// Patient file fields shared by `add` and `edit`.
#[derive(Args, Debug, Clone, Default)]
pub struct PatientFields {
    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, help = "Birth date as YYYY-MM-DD")]
    pub birth_date: Option<NaiveDate>,

    #[arg(long, help = "Reason for consultation")]
    pub reason: Option<String>,

    #[arg(
        long = "history",
        value_parser = parse_history_field,
        help = "Medical history field as column=value, e.g. allergies=polen (repeatable)"
    )]
    pub history: Vec<(String, String)>,
}

#[derive(Subcommand)]
pub enum PatientCommands {
    #[command(about = "List your patients")]
    List {
        #[arg(short, long, help = "Filter by name")]
        search: Option<String>,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Show a patient file with appointment history")]
    Show {
        id: Uuid,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Create a patient file")]
    Add {
        #[arg(long)]
        name: String,

        #[command(flatten)]
        fields: PatientFields,
    },

    #[command(about = "Edit a patient file; omitted fields are kept")]
    Edit {
        id: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: PatientFields,
    },

    #[command(about = "Delete a patient and their appointments")]
    Delete {
        id: Uuid,

        #[arg(long, help = "Confirm deletion")]
        yes: bool,
    },

    #[command(about = "Record session notes and body-map points on an appointment")]
    Visit {
        #[arg(help = "Appointment ID")]
        appointment: Uuid,

        #[arg(long, help = "Replace the session notes (kept when omitted)")]
        observations: Option<String>,

        #[arg(long, help = "Remove every stored mark before applying --point")]
        clear: bool,

        #[arg(long, help = "Remove the most recent mark before applying --point")]
        undo: bool,

        #[arg(
            long = "point",
            value_parser = parse_point,
            help = "Body-map click as x,y[,front|back] in 0..1 (repeatable; clicking a mark again removes it)"
        )]
        points: Vec<(f64, f64, Option<BodyView>)>,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "List profiles")]
    List {
        #[arg(short, long, help = "Filter by name or ID")]
        search: Option<String>,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Switch a profile between admin and therapist")]
    Role { id: Uuid },

    #[command(about = "Make a therapist visible for booking")]
    Activate { id: Uuid },

    #[command(about = "Hide a therapist from booking")]
    Deactivate { id: Uuid },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Print the config file path")]
    Path,

    #[command(about = "Set a configuration value, e.g. schedule.buffer_minutes 90")]
    Set { key: String, value: String },
}

/// `x,y` or `x,y,front|back`.
pub fn parse_point(s: &str) -> Result<(f64, f64, Option<BodyView>), String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let coord = |v: &str| v.parse::<f64>().map_err(|e| format!("invalid coordinate '{v}': {e}"));
    match parts.as_slice() {
        [x, y] => Ok((coord(x)?, coord(y)?, None)),
        [x, y, view] => {
            let view = match view.to_lowercase().as_str() {
                "front" => BodyView::Front,
                "back" => BodyView::Back,
                other => return Err(format!("unknown view '{other}', expected front or back")),
            };
            Ok((coord(x)?, coord(y)?, Some(view)))
        }
        _ => Err("expected x,y or x,y,front|back".to_string()),
    }
}

/// `column=value`.
pub fn parse_history_field(s: &str) -> Result<(String, String), String> {
    let (key, value) =
        s.split_once('=').ok_or_else(|| format!("expected column=value, got '{s}'"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("0.5,0.25"), Ok((0.5, 0.25, None)));
        assert_eq!(parse_point("0.1, 0.9, Back"), Ok((0.1, 0.9, Some(BodyView::Back))));
        assert!(parse_point("0.1").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("0.1,0.2,side").is_err());
    }

    #[test]
    fn test_parse_history_field() {
        assert_eq!(
            parse_history_field("allergies=polen, nuez"),
            Ok(("allergies".to_string(), "polen, nuez".to_string()))
        );
        assert!(parse_history_field("allergies").is_err());
    }

    #[test]
    fn test_visit_collects_points() {
        let cli = Cli::try_parse_from([
            "reiki", "patients", "visit", "2d1c0c39-7c6f-4b4c-8f0a-6de2f9b2c001",
            "--point", "0.5,0.5,front", "--point", "0.2,0.3",
        ])
        .expect("parses");
        match cli.command {
            Commands::Patients(PatientCommands::Visit { points, .. }) => assert_eq!(points.len(), 2),
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_visit_clear_and_undo_flags() {
        let cli = Cli::try_parse_from([
            "reiki", "patients", "visit", "2d1c0c39-7c6f-4b4c-8f0a-6de2f9b2c001", "--undo",
        ])
        .expect("parses");
        match cli.command {
            Commands::Patients(PatientCommands::Visit { clear, undo, observations, .. }) => {
                assert!(undo);
                assert!(!clear);
                assert_eq!(observations, None);
            }
            _ => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_create_without_name() {
        let cli = Cli::try_parse_from([
            "reiki", "panel", "create", "--date", "2024-05-02", "--time", "10:00",
        ])
        .expect("parses");
        match cli.command {
            Commands::Panel(PanelCommands::Create { name, .. }) => assert_eq!(name, None),
            _ => panic!("wrong subcommand"),
        }
    }
}
