//! Sortable listing tables for the Lenten sermon catalogue.
//!
//! Listing pages are rendered by the server as HTML tables. This crate
//! loads such a table into memory, applies the interactions the listing
//! offers (sorting by a header click, the `o` ordering, hiding columns) and
//! renders the result back to HTML. A changed row order can be posted back
//! to the server.

pub mod actions;
pub mod config;
pub mod save;
pub mod sort;
pub mod table;
pub mod view;

pub use actions::{ActionArgs, ActionRegistry};
pub use config::{Config, Markup, Settings};
pub use sort::{sort_table, OrderList, SortDirection, SortType};
pub use table::Table;
pub use view::{TableView, ViewError};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with a default filter, overridable through `RUST_LOG`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
