//! Configuration commands.
//!
//! - `config show`: Display the effective configuration

use owo_colors::{OwoColorize, Stream};
use serde_json::json;

use crate::config::Config;
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path();

    if output_json {
        let value = json!({
            "path": path.as_ref().map(|p| p.display().to_string()),
            "api_url": config.api_url,
            "page_size": config.page_size,
            "request_timeout": config.request_timeout,
            "connect_timeout": config.connect_timeout,
            "enrichment_concurrency": config.enrichment_concurrency,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let label = "Config file:";
    let label = label.if_supports_color(Stream::Stdout, |t| t.bold());
    match path {
        Some(path) if path.exists() => println!("{} {}", label, path.display()),
        Some(path) => println!(
            "{} {} {}",
            label,
            path.display(),
            "(not found, using defaults)".if_supports_color(Stream::Stdout, |t| t.dimmed())
        ),
        None => println!(
            "{} {}",
            label,
            "(none)".if_supports_color(Stream::Stdout, |t| t.dimmed())
        ),
    }
    println!("api_url: {}", config.api_url);
    println!("page_size: {}", config.page_size);
    println!("request_timeout: {}s", config.request_timeout);
    println!("connect_timeout: {}s", config.connect_timeout);
    println!("enrichment_concurrency: {}", config.enrichment_concurrency);

    Ok(())
}
