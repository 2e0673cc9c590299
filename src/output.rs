//! Text and JSON rendering.
//!
//! Formatting functions return `String`s; the `cli` module decides where to
//! print them. Colors come from `colored`, which disables itself when
//! `NO_COLOR` is set or stdout is not a terminal.

use colored::Colorize;
use serde::Serialize;

use crate::{
    types::{CatalogEntry, Event},
    utils,
};

pub const RAIPLAY_WEB_URL: &str = "https://www.raiplay.it";

pub fn header(title: &str) -> String {
    format!("=== {} ===", title).cyan().bold().to_string()
}

pub fn title(text: &str) -> String {
    text.green().bold().to_string()
}

pub fn channel_title(name: &str) -> String {
    name.yellow().bold().to_string()
}

/// One schedule line, plus the description when the program is on air.
pub fn format_program(event: &Event, is_current: bool, compact: bool) -> String {
    let time = event.hour_or("??:??");
    let name = event.name_or("Unknown");
    let duration = utils::format_duration(event.duration_str());

    if compact {
        let marker = if is_current { ">" } else { " " };
        return format!("{} {} {}", marker, time, name);
    }

    let (marker, name) = if is_current {
        (">>>".green().bold().to_string(), name.bold().to_string())
    } else {
        ("   ".to_string(), name.to_string())
    };

    let mut line = if duration.is_empty() {
        format!("{} {} - {}", marker, time, name)
    } else {
        format!("{} {} - {} ({})", marker, time, name, duration)
    };

    if is_current {
        if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
            line.push_str(&format!(
                "\n       {}",
                utils::truncate(description, 100).italic()
            ));
        }
    }

    line
}

/// `HH:MM - Name (duration)` without markers.
pub fn format_program_line(event: &Event, fallback_time: &str) -> String {
    let time = event.hour_or(fallback_time);
    let name = event.name_or("Unknown");
    let duration = utils::format_duration(event.duration_str());

    if duration.is_empty() {
        format!("{} - {}", time, name)
    } else {
        format!("{} - {} ({})", time, name, duration)
    }
}

pub fn format_catalog_item_short(entry: &CatalogEntry) -> String {
    let item = &entry.item;
    let name = item.name.as_deref().unwrap_or("N/A");
    let typology = item
        .is_part_of
        .as_ref()
        .and_then(|p| p.tipologia.first())
        .and_then(|t| t.nome.as_deref())
        .unwrap_or_default();

    let mut out = format!("  {}", name.bold());
    if !typology.is_empty() {
        out.push_str(&format!("  {}", format!("[{}]", typology).bright_black()));
    }

    if let Some(subtitle) = item.subtitle.as_deref() {
        if !subtitle.is_empty() && subtitle != name {
            out.push_str(&format!("\n    {}", utils::truncate(subtitle, 80).italic()));
        }
    }

    out
}

pub fn format_catalog_item_detail(entry: &CatalogEntry) -> String {
    let item = &entry.item;
    let rule = "=".repeat(60);
    let mut lines = vec![
        rule.cyan().bold().to_string(),
        item.name.as_deref().unwrap_or("N/A").yellow().bold().to_string(),
        rule.cyan().bold().to_string(),
    ];

    let mut field = |label: &str, value: &str| {
        if !value.is_empty() {
            lines.push(format!("{} {}", format!("{}:", label).bold(), value));
        }
    };

    field("Sezione", &entry.section);
    field("Sottotitolo", item.subtitle.as_deref().unwrap_or_default());

    if let Some(part) = &item.is_part_of {
        let join = |list: &[crate::types::Named]| {
            list.iter()
                .map(|n| n.nome.as_deref().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(", ")
        };

        field("Descrizione", part.description.as_deref().unwrap_or_default());
        field("Tipologia", &join(&part.tipologia));
        field("Generi", &join(&part.generi));
        field("Sottogeneri", &join(&part.sottogenere));
        field("Anno", part.anno.as_deref().unwrap_or_default());
        field("Canale", part.channel.as_deref().unwrap_or_default());
        field("Regia", part.regia.as_deref().unwrap_or_default());
        field("Interpreti", part.interpreti.as_deref().unwrap_or_default());
        field("Conduttore", part.conduttore.as_deref().unwrap_or_default());
        field("Paese", part.country.as_deref().unwrap_or_default());
        field("Durata", part.durata_first_item.as_deref().unwrap_or_default());
        if let Some(link) = part.weblink.as_deref().filter(|l| !l.is_empty()) {
            field("Link", &format!("{}{}", RAIPLAY_WEB_URL, link));
        }
    }

    lines.join("\n")
}

/// Pretty JSON with two-space indent; non-ASCII text is kept as is.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match to_json(value) {
        Ok(json) => println!("{}", json),
        Err(e) => crate::error!("Cannot serialize output: {}", e),
    }
}
