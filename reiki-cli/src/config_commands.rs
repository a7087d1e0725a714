use anyhow::Result;
use colored::Colorize;

use reiki_core::config::{
    self, config_path, get_data_dir, load_config, load_config_from, save_config_to,
};
use reiki_types::AgendaConfig;

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(no configurada)".to_string();
    }
    let visible: String = key.chars().take(6).collect();
    format!("{visible}…")
}

fn masked(mut config: AgendaConfig) -> AgendaConfig {
    config.backend.anon_key = mask_key(&config.backend.anon_key);
    config
}

pub fn show_config(json: bool) -> Result<()> {
    let config = masked(load_config()?);

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Backend".bold());
    println!(
        "  URL:      {}",
        if config.backend.url.is_empty() { "(no configurada)" } else { &config.backend.url }
    );
    println!("  Anon key: {}", config.backend.anon_key);
    println!("  Timeout:  {}s", config.backend.timeout_secs);

    let s = &config.schedule;
    println!("\n{}", "Agenda".bold());
    println!("  Horario:  {:02}:00 - {:02}:00", s.day_start_hour, s.day_end_hour);
    println!("  Turno:    {} min", s.slot_minutes);
    println!(
        "  Margen:   {}",
        s.buffer_minutes.map_or_else(|| "sin margen".to_string(), |m| format!("{m} min"))
    );
    println!(
        "  Offset:   {}",
        s.utc_offset_minutes
            .map_or_else(|| "zona local".to_string(), |m| format!("{m:+} min respecto de UTC"))
    );

    println!("\n{}", "Reservas".bold());
    println!("  Servicio: {}", config.booking.default_service);
    println!(
        "  Control de teléfono: {}",
        if config.booking.phone_check { "sí" } else { "no" }
    );
    Ok(())
}

pub fn show_path() -> Result<()> {
    println!("{}", config_path(&get_data_dir()?).display());
    Ok(())
}

pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let data_dir = get_data_dir()?;
    let mut config = load_config_from(&data_dir)?;
    config::set_value(&mut config, key, value)?;
    save_config_to(&data_dir, &config)?;
    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(""), "(no configurada)");
        assert_eq!(mask_key("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJhbG…");
    }
}
