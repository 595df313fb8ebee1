use serde_json::json;

use crate::catalog::{CatalogEvent, LoadState};
use crate::display::{format_row_line, row_json};
use crate::error::{PortalError, Result};
use crate::query::FilterCriteria;

/// Options for the browse command
pub struct BrowseOptions {
    pub criteria: FilterCriteria,
    /// Number of pages to load, counting the first
    pub pages: u32,
    pub output_json: bool,
}

/// Load pages of the catalog the way an infinite-scroll view would, then
/// print the refined, enriched rows.
pub async fn cmd_browse(options: BrowseOptions) -> Result<()> {
    let mut controller = super::open_controller()?;
    let sensor = controller.attach_sensor();

    controller.set_filter(options.criteria);
    controller.settle().await;

    let mut loaded = 1;
    while loaded < options.pages && controller.has_more() && !controller.load_state().is_failed()
    {
        // Scrolling to the bottom of the list
        sensor.boundary_visible(true);
        match controller.next_event().await {
            CatalogEvent::SensorTriggered { issued: true } => {
                controller.settle().await;
                loaded += 1;
            }
            _ => break,
        }
    }
    controller.detach_sensor();
    controller.await_enrichment().await;

    let rows = controller.rows();
    if options.output_json {
        let value = json!({
            "criteria": controller.criteria(),
            "has_more": controller.has_more(),
            "items": rows.iter().map(row_json).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for row in &rows {
            println!("{}", format_row_line(row, true));
        }
        if rows.is_empty() {
            println!("No characters match this filter");
        }
    }

    if let LoadState::Failed {
        page,
        message,
        retryable,
    } = controller.load_state()
    {
        let hint = if *retryable { " (try again)" } else { "" };
        return Err(PortalError::Other(format!(
            "failed to load page {page}: {message}{hint}"
        )));
    }

    Ok(())
}
