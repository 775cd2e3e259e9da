//! # Quill CLI
//!
//! Derives and renders invoices from order records.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          quill render                                   │
//! │                                                                         │
//! │  AppConfig::load ──► load_inputs ──► normalize ──► resolve ──► audit    │
//! │                                                       │          │      │
//! │                                                       ▼          ▼      │
//! │                                         DocumentAssembler   warn! /     │
//! │                                                 │           --strict    │
//! │                                                 ▼                       │
//! │                                     render::text | render::json         │
//! │                                                 │                       │
//! │                                                 ▼                       │
//! │                                       stdout | --output <file>          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so that stdout carries only the document.

mod config;
mod input;
mod render;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use quill_core::{
    audit, resolve, AuditFinding, DocumentAssembler, NoTranslation, Order, Translator,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, CliOverrides, LogFormat};
use crate::input::{load_catalog, load_inputs};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "Derive and render invoices from order records")]
struct Cli {
    /// Configuration file (default: ./quill.toml if present)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble and render an invoice
    Render(RenderArgs),

    /// Print the monetary breakdown of an order as JSON
    Breakdown(BreakdownArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Order record, or an envelope with `order` and `user`
    #[arg(long = "order")]
    order: PathBuf,

    /// User record (overrides the envelope's user)
    #[arg(long = "user")]
    user: Option<PathBuf>,

    /// Nested JSON locale catalog
    #[arg(long = "locale")]
    locale: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    format: OutputFormat,

    /// Line width of the text format
    #[arg(long = "width", default_value_t = render::DEFAULT_WIDTH)]
    width: usize,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Site name shown in the header and footer
    #[arg(long = "site-name")]
    site_name: Option<String>,

    /// Fail when the order's amounts do not reconcile
    #[arg(long = "strict")]
    strict: bool,
}

#[derive(Args, Debug)]
struct BreakdownArgs {
    /// Order record, or an envelope with `order` and `user`
    #[arg(long = "order")]
    order: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(config.log_format, cli.verbose)?;

    match cli.command {
        Command::Render(args) => run_render(config, args),
        Command::Breakdown(args) => run_breakdown(&args),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(format: LogFormat, verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "quill_core=debug,quill=debug,info",
        _ => "quill_core=trace,quill=trace,debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))
}

fn run_render(config: AppConfig, args: RenderArgs) -> Result<()> {
    let config = config.apply(CliOverrides {
        site_name: args.site_name,
        locale_file: args.locale,
    });

    let inputs = load_inputs(&args.order, args.user.as_deref())?;
    let translator: Box<dyn Translator> = match &config.locale_file {
        Some(path) => Box::new(load_catalog(path)?),
        None => Box::new(NoTranslation),
    };

    let order = inputs.order.normalize();
    let breakdown = resolve(&order);
    check_findings(&order, &audit(&order, &breakdown), args.strict)?;

    let assembler = DocumentAssembler::new(config.invoice_settings());
    let doc = assembler.assemble(&order, &inputs.user, &breakdown, translator.as_ref());

    let rendered = match args.format {
        OutputFormat::Text => render::text(&doc, args.width),
        OutputFormat::Json => render::json(&doc).context("failed to serialize document")?,
    };
    write_output(args.output.as_deref(), &rendered)?;

    info!(
        trade_no = order.trade_no.as_deref().unwrap_or("-"),
        total = %breakdown.final_total,
        paid = doc.is_paid(),
        "invoice rendered"
    );
    Ok(())
}

fn run_breakdown(args: &BreakdownArgs) -> Result<()> {
    let inputs = load_inputs(&args.order, None)?;
    let order = inputs.order.normalize();
    let breakdown = resolve(&order);
    check_findings(&order, &audit(&order, &breakdown), false)?;

    let json = serde_json::to_string_pretty(&breakdown).context("failed to serialize breakdown")?;
    write_output(None, &json)
}

fn check_findings(order: &Order, findings: &[AuditFinding], strict: bool) -> Result<()> {
    for finding in findings {
        warn!(
            trade_no = order.trade_no.as_deref().unwrap_or("-"),
            %finding,
            "order amounts need review"
        );
    }
    if strict && !findings.is_empty() {
        bail!(
            "{} audit finding(s) for order {}",
            findings.len(),
            order.trade_no.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("could not open output surface {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    writer.write_all(contents.as_bytes())?;
    if !contents.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush().context("failed to flush output")
}
