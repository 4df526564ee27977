use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use catalog_core::model::ViewerId;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, CatalogService, Clock, CourseDetailService};
use storage::local::{FileLocalStore, LocalStore};
use storage::rest::RestConfig;
use tracing::info;
use ui::{App, UiApp, build_app_context};

mod logging;

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    IncompleteRest,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::IncompleteRest => {
                write!(f, "--rest-url and --rest-key must be given together")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn viewer_id(&self) -> ViewerId {
        self.services.viewer_id().clone()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn course_detail(&self) -> Arc<CourseDetailService> {
        self.services.course_detail()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Backend {
    Sqlite { db_url: String },
    Rest { base_url: String, api_key: String },
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    backend: Backend,
    data_dir: PathBuf,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--data-dir <path>]");
    eprintln!("  cargo run -p app -- --rest-url <url> --rest-key <key> [--data-dir <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://catalog.sqlite3");
    eprintln!("  --data-dir .catalog");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CATALOG_DB_URL, CATALOG_REST_URL, CATALOG_REST_KEY, CATALOG_DATA_DIR, RUST_LOG");
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("CATALOG_DB_URL")
            .map_or_else(|| "sqlite://catalog.sqlite3".into(), normalize_sqlite_url);
        let mut rest_url = env("CATALOG_REST_URL");
        let mut rest_key = env("CATALOG_REST_KEY");
        let mut data_dir =
            env("CATALOG_DATA_DIR").map_or_else(|| PathBuf::from(".catalog"), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--rest-url" => rest_url = Some(require_value(args, "--rest-url")?),
                "--rest-key" => rest_key = Some(require_value(args, "--rest-key")?),
                "--data-dir" => data_dir = PathBuf::from(require_value(args, "--data-dir")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let backend = match (rest_url, rest_key) {
            (Some(base_url), Some(api_key)) => Backend::Rest { base_url, api_key },
            (None, None) => Backend::Sqlite { db_url },
            _ => return Err(ArgsError::IncompleteRest),
        };

        Ok(Self { backend, data_dir })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    logging::init_tracing();

    let local: Arc<dyn LocalStore> = Arc::new(FileLocalStore::in_dir(&parsed.data_dir)?);
    let clock = Clock::system();

    // The viewer id is resolved here, once, and handed to the UI by value.
    let services = match &parsed.backend {
        Backend::Sqlite { db_url } => {
            prepare_sqlite_file(db_url)?;
            info!(db_url = %db_url, "using sqlite catalog");
            AppServices::new_sqlite(db_url, clock, local).await?
        }
        Backend::Rest { base_url, api_key } => {
            info!(base_url = %base_url, "using rest catalog");
            AppServices::new_rest(&RestConfig::new(base_url, api_key), clock, local)?
        }
    };
    info!(viewer_id = %services.viewer_id(), "viewer identity ready");

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("E-Learning Platform")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
