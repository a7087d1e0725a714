//! Reiki Agenda CLI
//!
//! Terminal front end for the hosted agenda:
//! - `public`   - pick a therapist and day, see free slots, book one
//! - `panel`    - the therapist's own agenda, colleagues' occupancy, new appointments
//! - `patients` - patient files, medical history, visit notes and body-map marks
//! - `admin`    - switch roles and hide or show therapists
//!
//! The session is kept in `session.json` next to `config.json` between runs.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use anyhow::Result;
use clap::Parser;

mod admin_commands;
mod auth_commands;
mod cli;
mod commands;
mod config_commands;
mod panel_commands;
mod patient_commands;
mod public_commands;
mod render;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    reiki_core::logger::init_tracing(&cli.log_level);

    commands::run(cli).await
}
