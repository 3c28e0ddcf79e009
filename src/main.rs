use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod aggregate;
mod models;
mod report;
mod source;
mod suggest;

use models::Record;

#[derive(Parser)]
#[command(name = "classroom-emotion-insight")]
#[command(about = "Class emotion summary and teaching suggestion tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Emotion API endpoint serving a {"data": [...]} payload
    #[arg(long)]
    url: Option<String>,
    /// Local JSON file with records (bare array or {"data": [...]})
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the overall emotion distribution
    Summarize {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print emotion counts per timestamp
    Trend {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print teaching suggestions derived from the records
    Suggest {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize { source } => {
            let records = load_records(&source).await?;
            println!("Loaded {} student submissions.", records.len());

            let summary = aggregate::summarize_emotions(&records);
            if summary.is_empty() {
                println!("No emotions recorded.");
                return Ok(());
            }

            let mut entries: Vec<(&String, &u64)> = summary.iter().collect();
            entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            println!("Emotion distribution:");
            for (label, count) in entries {
                println!("- {label}: {count}");
            }
        }
        Commands::Trend { source } => {
            let records = load_records(&source).await?;
            let trend = aggregate::emotion_trend(&records);

            if trend.is_empty() {
                println!("No submissions found.");
                return Ok(());
            }

            println!("Emotion trend over time:");
            for key in report::sort_timestamp_keys(trend.keys().map(String::as_str)) {
                let line = trend[key]
                    .iter()
                    .map(|(label, count)| format!("{label} {count}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("- {key}: {line}");
            }
        }
        Commands::Suggest { source } => {
            let records = load_records(&source).await?;
            let summary = aggregate::summarize_emotions(&records);
            let attention = report::attention_series(&records);
            let suggestions = suggest::suggest_actions(&summary, attention.as_ref());

            if suggestions.is_empty() {
                println!("{}", report::NO_CONCERNS);
                return Ok(());
            }

            for suggestion in suggestions.iter() {
                println!("- {}", suggestion.message);
            }
        }
        Commands::Report { source, out } => {
            let records = load_records(&source).await?;
            let label = source_label(&source);
            let report = report::build_report(&label, &records);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

async fn load_records(source: &SourceArgs) -> anyhow::Result<Vec<Record>> {
    match (&source.url, &source.input) {
        (Some(url), _) => {
            let client = reqwest::Client::new();
            Ok(source::fetch_records(&client, url).await)
        }
        (None, Some(path)) => source::load_records(path),
        (None, None) => bail!("either --url or --input is required"),
    }
}

fn source_label(source: &SourceArgs) -> String {
    match (&source.url, &source.input) {
        (Some(url), _) => url.clone(),
        (None, Some(path)) => path.display().to_string(),
        (None, None) => "no source".to_string(),
    }
}
