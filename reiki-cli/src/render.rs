//! Tables shared by the command modules.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, Table};

use reiki_core::availability::{DayAgenda, SlotState};
use reiki_core::calendar::{MonthGrid, WEEKDAY_LABELS};
use reiki_types::{Appointment, AppointmentStatus, BusySlot, Patient, Profile, Role};

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    table
}

pub fn local_time(t: DateTime<Utc>, offset: FixedOffset) -> String {
    t.with_timezone(&offset).format("%H:%M").to_string()
}

pub fn local_datetime(t: DateTime<Utc>, offset: FixedOffset) -> String {
    t.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string()
}

pub fn agenda_table(agenda: &DayAgenda) -> Table {
    let mut table = table(vec!["Hora", "Estado", "Detalle"]);
    for slot in &agenda.slots {
        let (state, detail) = match &slot.state {
            SlotState::Free => (Cell::new("Libre").fg(Color::Green), String::new()),
            SlotState::Occupied => (Cell::new("Ocupado").fg(Color::Red), String::new()),
            SlotState::Booked(appt) => {
                let mut detail = appt.service_label().to_string();
                if let Some(note) = appt.note.as_deref().filter(|n| !n.trim().is_empty()) {
                    detail.push_str(" · ");
                    detail.push_str(note);
                }
                detail.push_str(&format!(" [{}]", appt.id));
                (Cell::new("Reservado").fg(Color::Yellow), detail)
            }
        };
        table.add_row(vec![Cell::new(slot.label()), state, Cell::new(detail)]);
    }
    table
}

pub fn calendar_table(grid: &MonthGrid, selected: NaiveDate, today: NaiveDate) -> Table {
    let mut table = table(WEEKDAY_LABELS.to_vec());
    for week in grid.cells(selected, today).chunks(7) {
        let row: Vec<Cell> = week
            .iter()
            .map(|cell| {
                let mut c = Cell::new(cell.date.format("%e").to_string());
                if !cell.in_month {
                    c = c.fg(Color::DarkGrey);
                }
                if cell.is_today {
                    c = c.add_attribute(Attribute::Bold);
                }
                if cell.is_selected {
                    c = c.fg(Color::Cyan).add_attribute(Attribute::Reverse);
                }
                c
            })
            .collect();
        table.add_row(row);
    }
    table
}

pub fn profiles_table(profiles: &[&Profile]) -> Table {
    let mut table = table(vec!["ID", "Nombre", "Rol", "Estado"]);
    for p in profiles {
        let role = match p.role {
            Role::Admin => Cell::new("admin").fg(Color::Magenta),
            Role::Therapist => Cell::new("therapist"),
        };
        let status = if p.is_active {
            Cell::new("Activo").fg(Color::Green)
        } else {
            Cell::new("Inactivo").fg(Color::Red)
        };
        table.add_row(vec![Cell::new(p.id), Cell::new(p.display_name()), role, status]);
    }
    table
}

pub fn patients_table(patients: &[Patient]) -> Table {
    let mut table = table(vec!["ID", "Nombre", "Teléfono", "Email"]);
    for p in patients {
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(&p.full_name),
            Cell::new(p.phone.as_deref().unwrap_or("-")),
            Cell::new(p.email.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

pub fn appointments_table(appointments: &[Appointment], offset: FixedOffset) -> Table {
    let mut table = table(vec!["ID", "Fecha", "Servicio", "Estado", "Observaciones", "Puntos"]);
    for a in appointments {
        let status = match a.status {
            AppointmentStatus::Scheduled => Cell::new(a.status).fg(Color::Green),
            AppointmentStatus::Cancelled | AppointmentStatus::NoShow => {
                Cell::new(a.status).fg(Color::Red)
            }
            AppointmentStatus::Blocked => Cell::new(a.status).fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(a.id),
            Cell::new(local_datetime(a.start_at, offset)),
            Cell::new(a.service_label()),
            status,
            Cell::new(a.visit_observations.as_deref().unwrap_or("-")),
            Cell::new(a.points().len()),
        ]);
    }
    table
}

pub fn busy_table(busy: &[BusySlot], offset: FixedOffset) -> Table {
    let mut table = table(vec!["Desde", "Hasta", "Estado"]);
    for b in busy {
        let status = if b.is_cancelled() {
            Cell::new(&b.status).fg(Color::DarkGrey)
        } else {
            Cell::new(&b.status)
        };
        table.add_row(vec![
            Cell::new(local_time(b.start_at, offset)),
            Cell::new(local_time(b.end_at, offset)),
            status,
        ]);
    }
    table
}

pub fn print_empty(what: &str) {
    println!("{}", what.yellow());
}
