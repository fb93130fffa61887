// trust-scan: audit one or more storefronts and print JSON reports
//
// Logs go to stderr (RUST_LOG, default info) so stdout stays machine-readable.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use storefront_trust_scan::utils::normalize_target_url;
use storefront_trust_scan::{
    BrowserManager, ClaudeAssessor, ScanReport, Scanner, TrustAuditor, load_yaml_config,
};

#[derive(Parser, Debug)]
#[command(name = "trust-scan", version, about = "Audit how trustworthy a storefront looks")]
struct Cli {
    /// Storefront URLs; a missing scheme defaults to https://
    #[arg(required = true)]
    urls: Vec<String>,

    /// YAML config file (default: ./trust-scan.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the AI design assessment
    #[arg(long)]
    no_ai: bool,

    /// Skip the product page pass
    #[arg(long)]
    no_product: bool,

    /// Pretty-print JSON reports
    #[arg(long)]
    pretty: bool,

    /// Print a human-readable summary instead of JSON
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_yaml_config(cli.config.as_deref())?;
    if cli.no_product {
        config.scan.product_page = false;
    }
    if cli.no_ai {
        config.ai.enabled = false;
    }

    let targets = cli
        .urls
        .iter()
        .map(|u| normalize_target_url(u))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid target URL")?;

    let manager = Arc::new(BrowserManager::new(config.browser.clone()));
    let scanner = Scanner::new(manager.clone(), &config.scan)?;
    let mut auditor = TrustAuditor::new(scanner);

    if config.ai.enabled {
        match ClaudeAssessor::from_config(&config.ai) {
            Ok(assessor) => {
                info!(model = assessor.model(), "AI design assessment enabled");
                auditor = auditor.with_assessor(
                    Arc::new(assessor),
                    Duration::from_secs(config.ai.timeout_secs),
                );
            }
            Err(e) => warn!("AI design assessment disabled: {}", e),
        }
    }

    let auditor = Arc::new(auditor);
    let mut tasks = JoinSet::new();
    for (index, url) in targets.into_iter().enumerate() {
        let auditor = auditor.clone();
        tasks.spawn(async move {
            let outcome = auditor.audit(&url).await;
            (index, url, outcome)
        });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => error!("Scan task panicked: {}", e),
        }
    }
    outcomes.sort_by_key(|(index, _, _)| *index);

    let mut succeeded = 0usize;
    for (_, url, outcome) in &outcomes {
        match outcome {
            Ok(report) => {
                succeeded += 1;
                if cli.summary {
                    println!("{}", render_summary(report));
                } else if cli.pretty {
                    println!("{}", serde_json::to_string_pretty(report)?);
                } else {
                    println!("{}", serde_json::to_string(report)?);
                }
            }
            Err(e) => error!("Scan failed for {}: {}", url, e),
        }
    }

    if let Err(e) = manager.shutdown().await {
        warn!("Browser shutdown failed: {}", e);
    }

    if succeeded == 0 {
        anyhow::bail!("All {} scan(s) failed", cli.urls.len());
    }
    Ok(())
}

fn render_summary(report: &ScanReport) -> String {
    let mut out = format!(
        "{}\n  Score: {}/100 (grade {:?})\n",
        report.signals.url, report.result.score, report.result.grade
    );

    for entry in &report.result.breakdown {
        out.push_str(&format!(
            "  [{}] {:<24} {:>2}/{}\n",
            if entry.passed { "x" } else { " " },
            entry.category.label(),
            entry.points_awarded,
            entry.max_points
        ));
    }

    if !report.result.recommendations.is_empty() {
        out.push_str("  Recommendations:\n");
        for rec in &report.result.recommendations {
            out.push_str(&format!(
                "    - {:?}: {} ({})\n",
                rec.priority, rec.issue_title, rec.estimated_cost
            ));
        }
    }

    out
}
