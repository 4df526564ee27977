use std::fmt;

use catalog_core::model::{Course, CourseId, Lesson, LessonId};
use chrono::{DateTime, Duration, Utc};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("CATALOG_DB_URL")
            .unwrap_or_else(|_| "sqlite:catalog.sqlite3?mode=rwc".into());
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, now })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:catalog.sqlite3?mode=rwc)");
    eprintln!("  --now <rfc3339>           Base creation time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CATALOG_DB_URL");
}

struct SampleCourse {
    slug: &'static str,
    title: &'static str,
    description: &'static str,
    level: &'static str,
    duration: &'static str,
    lessons: &'static [(&'static str, &'static str)],
}

const SAMPLES: &[SampleCourse] = &[
    SampleCourse {
        slug: "rust-foundations",
        title: "Rust Foundations",
        description: "Ownership, borrowing and the type system from first principles.",
        level: "Beginner",
        duration: "4 weeks",
        lessons: &[
            ("Getting started", "Install the toolchain and build a first binary."),
            ("Ownership", "Moves, copies and the drop order of values."),
            ("Borrowing", "Shared and exclusive references and their rules."),
        ],
    },
    SampleCourse {
        slug: "async-services",
        title: "Async Services",
        description: "Build network services with futures and a runtime.",
        level: "Intermediate",
        duration: "6 weeks",
        lessons: &[
            ("Futures", "What an async fn desugars to."),
            ("Runtimes", "Executors, reactors and task scheduling."),
        ],
    },
    SampleCourse {
        slug: "query-engines",
        title: "Query Engines",
        description: "Parsers, planners and execution of relational queries.",
        level: "Advanced",
        duration: "8 weeks",
        lessons: &[],
    },
];

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let base = args.now.unwrap_or_else(Utc::now);

    let mut lesson_count = 0_usize;
    for (idx, sample) in SAMPLES.iter().enumerate() {
        let course_id = CourseId::new(sample.slug)?;
        let offset = i64::try_from(idx)?;
        let course = Course::new(
            course_id.clone(),
            sample.title,
            sample.description,
            format!("https://images.example.com/{}.jpg", sample.slug),
            sample.level,
            sample.duration,
            base + Duration::minutes(offset),
        )?;
        storage.courses.upsert_course(&course).await?;

        for (pos, (title, content)) in sample.lessons.iter().enumerate() {
            let order = i32::try_from(pos + 1)?;
            let lesson = Lesson::new(
                LessonId::new(format!("{}-{order}", sample.slug))?,
                course_id.clone(),
                *title,
                *content,
                order,
            )?;
            storage.lessons.upsert_lesson(&lesson).await?;
            lesson_count += 1;
        }
    }

    println!(
        "Seeded {} courses and {} lessons into {}",
        SAMPLES.len(),
        lesson_count,
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
