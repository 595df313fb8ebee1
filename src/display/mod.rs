use owo_colors::{OwoColorize, Stream};
use serde_json::{Value, json};

use crate::catalog::CatalogRow;
use crate::types::{CatalogItem, LifeStatus};

/// Shown for a field whose enrichment is still in flight
pub const LOADING_TEXT: &str = "loading...";

/// Status badge, coloured only when stdout supports it
pub fn format_status_colored(status: LifeStatus) -> String {
    let badge = format!("[{}]", status);
    match status {
        LifeStatus::Alive => badge
            .if_supports_color(Stream::Stdout, |b| b.green())
            .to_string(),
        LifeStatus::Dead => badge
            .if_supports_color(Stream::Stdout, |b| b.red())
            .to_string(),
        LifeStatus::Unknown => badge
            .if_supports_color(Stream::Stdout, |b| b.dimmed())
            .to_string(),
    }
}

/// Format a row for single-line display.
///
/// With `color` set, styling still only applies when stdout is a terminal
/// that supports it.
pub fn format_row_line(row: &CatalogRow<'_>, color: bool) -> String {
    let item = row.item;
    let id = format!("#{:<5}", item.id);
    let status = if color {
        format_status_colored(item.status)
    } else {
        format!("[{}]", item.status)
    };
    let id = if color {
        id.if_supports_color(Stream::Stdout, |i| i.cyan())
            .to_string()
    } else {
        id
    };

    format!(
        "{} {} {} - {}, {} | last seen: {} | first seen: {}",
        id,
        status,
        item.name,
        species_label(item),
        item.gender,
        row.location_name().unwrap_or(LOADING_TEXT),
        row.first_seen_name().unwrap_or(LOADING_TEXT),
    )
}

/// JSON object for a row, with enrichment resolved to display text
pub fn row_json(row: &CatalogRow<'_>) -> Value {
    let item = row.item;
    json!({
        "id": item.id,
        "name": item.name,
        "status": item.status,
        "species": item.species,
        "gender": item.gender,
        "image": item.image,
        "location": row.location_name(),
        "first_seen": row.first_seen_name(),
    })
}

fn species_label(item: &CatalogItem) -> &str {
    if item.species.trim().is_empty() {
        "unknown"
    } else {
        &item.species
    }
}
