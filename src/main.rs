use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use reportlens::api::HttpReportApi;
use reportlens::config::Config;
use reportlens::indicator::IocType;
use reportlens::panel::PanelPhase;
use reportlens::viewer::{ReportViewer, toggle_matrix_label};

#[derive(Parser)]
#[command(name = "reportlens", about = "Threat-report viewer client")]
struct Cli {
    /// Report to operate on; overrides config/env
    #[arg(long, global = true)]
    report_id: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the report's sentences and print a snapshot summary
    Sentences,
    /// Look up IOC enrichment details and print the rendered panel
    Ioc {
        /// Indicator value (IP, domain, URL, hash, email)
        value: String,
        /// Indicator type as sent to the backend; inferred when omitted
        #[arg(long)]
        ioc_type: Option<String>,
        /// Write the rendered body HTML to a file instead of stdout
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
    /// Print the toggled ATT&CK matrix button label
    MatrixLabel { text: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reportlens=info".into()),
        )
        .init();

    reportlens::load_env();
    let cli = Cli::parse();
    let config = Config::load()?;
    let report_id = cli.report_id.unwrap_or(config.api.report_id);

    match cli.command {
        Command::Sentences => {
            let api = Arc::new(HttpReportApi::new(&config.api)?);
            let mut viewer = ReportViewer::new(api, report_id);
            let count = viewer.load_sentences().await?;
            let snapshot = viewer.snapshot();
            println!("report {}: {} sentences", report_id, count);
            if let (Some(first), Some(last)) =
                (snapshot.first_sentence_id(), snapshot.last_sentence_id())
            {
                println!("sentence id range: {} .. {}", first, last);
            }
            for (sentence_id, mappings) in snapshot.mappings() {
                if mappings.is_empty() {
                    continue;
                }
                let attack_ids: Vec<&str> = mappings
                    .iter()
                    .filter_map(|m| m.attack_id.as_deref())
                    .collect();
                println!("  sentence {}: {}", sentence_id, attack_ids.join(", "));
            }
        }
        Command::Ioc {
            value,
            ioc_type,
            out,
        } => {
            let api = Arc::new(HttpReportApi::new(&config.api)?);
            let mut viewer = ReportViewer::new(api, report_id);
            viewer
                .lookup_ioc(&value, ioc_type.as_deref().map(IocType::parse))
                .await;

            let panel = viewer.panel();
            match panel.title_color() {
                Some(color) => println!("{} [{}]", panel.title(), color.css()),
                None => println!("{}", panel.title()),
            }
            if let Some(path) = out {
                std::fs::write(&path, panel.body_html())?;
                info!("Wrote panel body to {}", path.display());
            } else if !panel.body_html().is_empty() {
                println!("{}", panel.body_html());
            }
            if panel.phase() == PanelPhase::Failed {
                std::process::exit(1);
            }
        }
        Command::MatrixLabel { text } => {
            println!("{}", toggle_matrix_label(&text));
        }
    }

    Ok(())
}
