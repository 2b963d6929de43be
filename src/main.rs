use clap::Parser;
use color_eyre::eyre::bail;
use color_eyre::Result;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::error;
use tracing_subscriber::EnvFilter;

use bim_assistant::aggregate::{collection_summary, wall_summary, Collector};
use bim_assistant::assistant::Assistant;
use bim_assistant::config::Settings;
use bim_assistant::export::{category_table, export_csv, export_json, thickness_table};
use bim_assistant::normalize::{Normalizer, COMMON_PROPERTIES, WALL_PROPERTIES};
use bim_assistant::parser::{load_property_database, load_rows, Scope};
use bim_assistant::store::PropertyStore;
use bim_assistant::ui::App;

const DEFAULT_LOG_FILTER: &str = "warn,bim_assistant=info";

#[derive(Parser, Debug)]
#[command(name = "bim-assistant")]
#[command(about = "BIM Assistant - chat with model properties and summarize walls by thickness")]
#[command(version)]
struct Args {
    /// JSON row batch to summarize
    #[arg(long, value_name = "FILE", conflicts_with = "props")]
    rows: Option<PathBuf>,

    /// Treat the row batch as walls and group by thickness
    #[arg(long, requires = "rows")]
    walls: bool,

    /// Model-derivative properties file to chat against
    #[arg(long, value_name = "FILE")]
    props: Option<PathBuf>,

    /// Ask one question and print the outcome instead of opening the chat
    #[arg(long, value_name = "MESSAGE", requires = "props")]
    ask: Option<String>,

    /// Print the property names to request for generic and wall rows
    #[arg(long)]
    fields: bool,

    /// Settings file (JSON)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Row ceiling per batch
    #[arg(long, env = "BIM_MAX_ROWS")]
    max_rows: Option<usize>,

    /// How long a chat waits for the property database
    #[arg(long, env = "BIM_READY_TIMEOUT_MS")]
    ready_timeout_ms: Option<u64>,

    /// Export the summary table to CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Export the full summary to JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Log file for the interactive chat
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

impl Args {
    fn interactive(&self) -> bool {
        self.props.is_some() && self.ask.is_none()
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(&args)?;

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(max_rows) = args.max_rows {
        settings.max_rows = max_rows;
    }
    if let Some(timeout) = args.ready_timeout_ms {
        settings.ready_timeout_ms = timeout;
    }

    if args.fields {
        println!("Common: {}", COMMON_PROPERTIES.join(", "));
        println!("Wall:   {}", WALL_PROPERTIES.join(", "));
        return Ok(());
    }

    if let Some(rows_path) = &args.rows {
        return summarize_rows(&args, &settings, rows_path);
    }

    let Some(props_path) = &args.props else {
        bail!("nothing to do: pass --rows, --props or --fields");
    };

    let store = Arc::new(PropertyStore::new());
    let assistant = Assistant::from_settings(&settings, Arc::clone(&store))?;

    if let Some(message) = &args.ask {
        let generation = store.begin_load();
        store.publish(generation, load_property_database(props_path)?);
        let outcome = assistant.handle(message)?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    spawn_loader(Arc::clone(&store), props_path.clone());

    let terminal = ratatui::init();
    let result = App::new(assistant, props_path.display().to_string()).run(terminal);
    ratatui::restore();
    result
}

fn init_tracing(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if !args.interactive() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    // The terminal owns stdout and stderr while the chat is open.
    if let Some(path) = &args.log {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .init();
    }
    Ok(())
}

fn summarize_rows(args: &Args, settings: &Settings, path: &Path) -> Result<()> {
    let rows = load_rows(path)?;
    let collector = Collector::new(Normalizer::new(&settings.field_keys)?, settings.max_rows);
    let scope = if args.walls { Scope::Wall } else { Scope::Generic };
    let records = collector.collect(&rows, scope)?;

    if args.walls {
        let summary = wall_summary(records);
        println!("{}", serde_json::to_string_pretty(&summary.grouped_summary)?);
        if let Some(csv_path) = &args.csv {
            export_csv(&thickness_table(&summary.thickness_aggregates), csv_path)?;
            println!("Exported to CSV: {}", csv_path.display());
        }
        if let Some(json_path) = &args.json {
            export_json(&summary, json_path)?;
            println!("Exported to JSON: {}", json_path.display());
        }
    } else {
        let summary = collection_summary(records);
        println!("{}", serde_json::to_string_pretty(&summary.category_aggregates)?);
        if let Some(csv_path) = &args.csv {
            export_csv(&category_table(&summary.category_aggregates), csv_path)?;
            println!("Exported to CSV: {}", csv_path.display());
        }
        if let Some(json_path) = &args.json {
            export_json(&summary, json_path)?;
            println!("Exported to JSON: {}", json_path.display());
        }
    }
    Ok(())
}

fn spawn_loader(store: Arc<PropertyStore>, path: PathBuf) {
    let generation = store.begin_load();
    thread::spawn(move || match load_property_database(&path) {
        Ok(database) => {
            store.publish(generation, database);
        }
        Err(err) => {
            error!(generation, error = %err, "property database load failed");
            store.abandon(generation);
        }
    });
}
