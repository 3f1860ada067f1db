//! Webserver command handler

use anyhow::Result;

use jotquote_core::Config;

use crate::web;

/// Serve the quote of the day page until interrupted
pub async fn run(config: &Config) -> Result<()> {
    let addr = format!("{}:{}", config.web_ip, config.web_port);
    web::serve(&addr, config.quote_file.clone()).await
}
