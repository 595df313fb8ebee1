mod browse;
mod config;
mod show;

pub use browse::{BrowseOptions, cmd_browse};
pub use config::cmd_config_show;
pub use show::cmd_show;

use crate::catalog::{CatalogController, ControllerOptions};
use crate::config::Config;
use crate::error::Result;
use crate::remote::HttpGateway;

/// Build a controller over the HTTP gateway from the loaded configuration.
pub(crate) fn open_controller() -> Result<CatalogController<HttpGateway>> {
    let config = Config::load()?;
    let gateway = HttpGateway::from_config(&config)?;
    Ok(CatalogController::new(
        gateway,
        ControllerOptions::from_config(&config),
    ))
}
