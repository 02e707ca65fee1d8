//! Command-line interface
//!
//! `triage train` fits a model version and writes the artifact and metrics;
//! `triage serve` runs the prediction server.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use crate::server::{run_server, ServerConfig};
use crate::training::{DataSource, Trainer, TrainerConfig, ModelVersion};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString    { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "triage")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Diabetes progression model: offline trainer and prediction server")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a model version and write the artifact plus a metrics file
    Train {
        /// Output model artifact
        #[arg(long, default_value = "models/model.bin")]
        out: PathBuf,

        /// Output metrics JSON
        #[arg(long, default_value = "out/metrics.json")]
        metrics: PathBuf,

        /// Seed for the split and for stochastic estimators
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Model version (v0.1, v0.2, v0.3)
        #[arg(long, default_value = "v0.1")]
        version: String,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value_t = 0.2)]
        test_size: f64,

        /// Training CSV with the ten feature columns and `target`; defaults to the bundled dataset
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Start the prediction server
    Serve {
        /// Bind address (overrides API_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides API_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    out: PathBuf,
    metrics: PathBuf,
    seed: u64,
    version: &str,
    test_size: f64,
    data: Option<PathBuf>,
) -> anyhow::Result<()> {
    let source = data.map(DataSource::Csv).unwrap_or_default();
    let config = TrainerConfig::new(version)
        .with_seed(seed)
        .with_test_size(test_size)
        .with_outputs(out, metrics)
        .with_data(source);

    let report = Trainer::new(config).run()?;
    let m = &report.metrics;
    let estimator = m
        .version
        .parse::<ModelVersion>()
        .map(|v| v.description())
        .unwrap_or("unknown");

    section("Train");
    step_ok(&format!("Saved model to {}", report.model_path.display()));
    step_ok(&format!("Saved metrics to {}", report.metrics_path.display()));
    println!();
    println!("  {:<12} {} {}", muted("Version"), m.version.cyan(), dim(estimator));
    println!("  {:<12} {}", muted("RMSE"), format!("{:.4}", m.rmse).white().bold());
    println!("  {:<12} {}", muted("MAE"), format!("{:.4}", m.mae).white());
    println!("  {:<12} {}", muted("R²"), format!("{:.4}", m.r2).white());
    println!("  {:<12} {} train / {} test", muted("Rows"), m.n_train, m.n_test);
    println!("  {:<12} {}", muted("Seed"), m.seed);
    println!("  {:<12} {}", muted("Time"), format!("{:.3}s", report.training_time_secs).white());
    println!();

    Ok(())
}

pub async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let base = format!("http://{}:{}", config.host, config.port);
    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Diabetes Triage".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Health ", &format!("{}/health", base)));
    line_box(&kv("Predict", &format!("{}/predict", base)));
    line_box(&kv("Model  ", &config.model_path.display().to_string()));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config).await
}
