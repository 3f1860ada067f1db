//! Quote of the day web server
//!
//! Two pages, both showing today's quote:
//! - `/` - the quote, author, publication and its position in the file
//! - `/tags` - the same, plus the quote's tags and the `jotquote settags`
//!   command line for retagging it
//!
//! The quote file is re-read only when its modification time changes. If it
//! cannot be read the pages render an "unavailable" notice instead of an
//! error.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::get;
use axum::Router;
use chrono::Local;
use maud::{html, Markup, DOCTYPE};
use tracing::{info, warn};

use jotquote_core::{todays_index, Quote, QuoteCache};

const PAGE_TITLE: &str = "jotquote";

struct AppState {
    cache: Mutex<QuoteCache>,
}

/// Build the router serving both pages from the given quote file
pub fn router(quote_file: PathBuf) -> Router {
    let state = Arc::new(AppState {
        cache: Mutex::new(QuoteCache::new(quote_file)),
    });

    Router::new()
        .route("/", get(quote_page))
        .route("/tags", get(tags_page))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: &str, quote_file: PathBuf) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind web server to {}", addr))?;

    info!(%addr, quote_file = ?quote_file, "web server listening");
    axum::serve(listener, router(quote_file))
        .await
        .context("Web server failed")?;
    Ok(())
}

async fn quote_page(State(state): State<Arc<AppState>>) -> Markup {
    render_off_runtime(state, false).await
}

async fn tags_page(State(state): State<Arc<AppState>>) -> Markup {
    render_off_runtime(state, true).await
}

/// Run `render` on the blocking pool, since it may read the quote file
async fn render_off_runtime(state: Arc<AppState>, show_tags: bool) -> Markup {
    match tokio::task::spawn_blocking(move || render(&state, show_tags)).await {
        Ok(markup) => markup,
        Err(e) => {
            warn!("rendering the quote page failed: {}", e);
            unavailable_page(&today())
        }
    }
}

fn today() -> String {
    Local::now().format("%A, %B %d, %Y").to_string()
}

fn render(state: &AppState, show_tags: bool) -> Markup {
    let date = today();

    let loaded = {
        let mut cache = state.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get().map_err(|e| (cache.path().to_path_buf(), e))
    };

    let quotes = match loaded {
        Ok(quotes) => quotes,
        Err((path, e)) => {
            warn!("unable to read quote file {:?}: {:#}", path, anyhow::Error::from(e));
            return unavailable_page(&date);
        }
    };

    match todays_index(quotes.len()) {
        Some(index) => quote_html(&quotes, index, &date, show_tags),
        None => unavailable_page(&date),
    }
}

fn quote_html(quotes: &[Quote], index: usize, date: &str, show_tags: bool) -> Markup {
    let quote = &quotes[index];

    page(html! {
        div.date { (date) }
        div.quote { (quote.text()) }
        div.author { (quote.author()) }
        @if let Some(publication) = quote.publication() {
            div.publication { (publication) }
        }
        div.position { "quote " (index + 1) " of " (quotes.len()) }
        @if show_tags {
            div.tags { (quote.tags().join(" ")) }
            div #settag .command {
                "$ jotquote settags -s " (quote.fingerprint()) " " (quote.tags().join(","))
            }
        }
    })
}

fn unavailable_page(date: &str) -> Markup {
    page(html! {
        div.date { (date) }
        div.unavailable { "The quote of the day is unavailable." }
    })
}

fn page(body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (PAGE_TITLE) }
            }
            body { (body) }
        }
    }
}
