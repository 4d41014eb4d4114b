//! seeker command line: apply listing-table interactions to HTML files.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use seeker::config::{self, Config, Settings};
use seeker::save::{HttpOrderSink, SaveFlow};
use seeker::sort::order::parse_removal;
use seeker::{ActionArgs, ActionRegistry, OrderList, SortDirection, SortType, TableView};

#[derive(Parser)]
#[command(name = "seeker", version, about = "Sortable listing tables for the sermon catalogue")]
struct Cli {
    /// Explicit configuration file (TOML); otherwise standard locations are searched.
    #[arg(long, global = true, env = "SEEKER_CONFIG")]
    config: Option<String>,

    /// Id of the error area element.
    #[arg(long, global = true)]
    error_area: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sort the rows of a table by one column
    Sort {
        /// HTML file, or - for stdin
        file: PathBuf,
        /// Zero-based column index
        #[arg(long)]
        column: usize,
        /// asc or desc
        #[arg(long, default_value = "desc")]
        direction: SortDirection,
        /// text or integer
        #[arg(long = "type", default_value = "text")]
        sort_type: SortType,
        /// Which table in the file (document order)
        #[arg(long, default_value_t = 0)]
        table: usize,
    },
    /// Click the sort icon of a header cell
    Click {
        file: PathBuf,
        /// Header cell position
        #[arg(long)]
        header: usize,
        /// Header row
        #[arg(long, default_value_t = 0)]
        row: usize,
        #[arg(long, default_value_t = 0)]
        table: usize,
    },
    /// Show or hide columns
    Columns {
        file: PathBuf,
        /// Columns to toggle, in order
        #[arg(long = "toggle")]
        toggle: Vec<usize>,
        /// Current value of the `w` field
        #[arg(long, default_value = "")]
        w: String,
        #[arg(long, default_value_t = 0)]
        table: usize,
    },
    /// Compute `o` ordering parameters, or apply one to a table
    Order {
        /// Current `o` value
        #[arg(long, default_value = "")]
        current: String,
        /// Column whose header was clicked (one-based)
        #[arg(long)]
        toggle: Option<usize>,
        /// Column to drop from the ordering (`3` or `o=3`)
        #[arg(long)]
        remove: Option<String>,
        /// Apply the resulting ordering to this HTML file
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value_t = 0)]
        table: usize,
    },
    /// Post the row order of a table to the server
    Save {
        file: PathBuf,
        /// Endpoint; defaults to save_url from the configuration
        #[arg(long)]
        url: Option<String>,
        #[arg(long, default_value_t = 0)]
        table: usize,
    },
}

fn read_input(path: &PathBuf) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

async fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => {
            let mut settings = Settings::default();
            Config::from_file(path)?.apply_to_settings(&mut settings);
            settings
        }
        None => config::load_settings().await,
    };
    if let Some(ref error_area) = cli.error_area {
        settings.error_area_id = error_area.clone();
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    seeker::init_tracing("seeker=info");

    let cli = Cli::parse();
    let settings = load_settings(&cli).await?;

    match &cli.command {
        Commands::Sort {
            file,
            column,
            direction,
            sort_type,
            table,
        } => {
            let source = read_input(file)?;
            let mut view = TableView::from_html(&source, *table, &settings)?;
            view.sort(*column, *direction, *sort_type);
            info!(column = *column, direction = %direction, sort_type = %sort_type, "Sorted table");
            println!("{}", view.render());
        }
        Commands::Click {
            file,
            header,
            row,
            table,
        } => {
            let source = read_input(file)?;
            let mut view = TableView::from_html(&source, *table, &settings)?;
            let registry = ActionRegistry::standard();
            let args = ActionArgs::new().with("row", *row).with("cell", *header);
            // Failures are part of the rendered error area
            let _ = registry.dispatch("sortshow", &mut view, &args);
            println!("{}", view.render());
        }
        Commands::Columns {
            file,
            toggle,
            w,
            table,
        } => {
            let source = read_input(file)?;
            let mut view = TableView::from_html(&source, *table, &settings)?;
            view.load_columns(w)?;
            let registry = ActionRegistry::standard();
            for column in toggle {
                let args = ActionArgs::new().with("column", *column);
                let _ = registry.dispatch("colwrap", &mut view, &args);
            }
            eprintln!("w={}", view.columns().to_param());
            println!("{}", view.render());
        }
        Commands::Order {
            current,
            toggle,
            remove,
            file,
            table,
        } => {
            let mut order: OrderList = current.parse()?;
            if let Some(remove) = remove {
                order = order.without(parse_removal(remove)?);
            }
            if let Some(column) = toggle {
                order = order.suggest_for(*column)?;
            }
            match file {
                Some(file) => {
                    let source = read_input(file)?;
                    let mut view = TableView::from_html(&source, *table, &settings)?;
                    view.apply_order(&order);
                    eprintln!("o={}", order);
                    println!("{}", view.render());
                }
                None => println!("{}", order),
            }
        }
        Commands::Save { file, url, table } => {
            let source = read_input(file)?;
            let mut view = TableView::from_html(&source, *table, &settings)?;
            let sink = match url {
                Some(url) => HttpOrderSink::new(url, &settings)?,
                None => HttpOrderSink::from_settings(&settings)?,
            };
            SaveFlow::new().run(&mut view, &sink).await?;
            if let Some(fragment) = view.fragment() {
                println!("{}", fragment);
            }
        }
    }

    Ok(())
}
