use owo_colors::{OwoColorize, Stream};

use crate::catalog::build_rows;
use crate::display::{LOADING_TEXT, format_status_colored, row_json};
use crate::error::Result;
use crate::query::FilterCriteria;
use crate::types::ItemId;

/// Display a single character with its resolved location and first episode
pub async fn cmd_show(id: ItemId, output_json: bool) -> Result<()> {
    let controller = super::open_controller()?;
    let item = controller.load_detail(id).await?;

    let rows = build_rows(
        std::slice::from_ref(&item),
        &FilterCriteria::default(),
        controller.enrichment(),
    );
    let Some(row) = rows.first() else {
        return Ok(());
    };

    if output_json {
        println!("{}", serde_json::to_string_pretty(&row_json(row))?);
        return Ok(());
    }

    let id = format!("#{}", item.id);
    println!(
        "{} {}",
        id.if_supports_color(Stream::Stdout, |t| t.cyan()),
        item.name.if_supports_color(Stream::Stdout, |t| t.bold())
    );
    println!("{} {}", format_status_colored(item.status), item.species);
    if !item.subtype.is_empty() {
        println!("Type: {}", item.subtype);
    }
    println!("Gender: {}", item.gender);
    println!("Origin: {}", item.origin.name);
    println!(
        "Last known location: {}",
        row.location_name().unwrap_or(LOADING_TEXT)
    );
    println!(
        "First seen in: {}",
        row.first_seen_name().unwrap_or(LOADING_TEXT)
    );
    println!("Episodes: {}", item.episodes.len());
    if !item.image.is_empty() {
        println!(
            "Image: {}",
            item.image.if_supports_color(Stream::Stdout, |t| t.dimmed())
        );
    }

    Ok(())
}
