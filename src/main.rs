//! CLI entry point for `emlextract`.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use emlextract::config::{Config, ExtractConfig};
use emlextract::discover;
use emlextract::extract::Extractor;
use emlextract::model::report::{AttachmentOutcome, BatchSummary, MessageReport, MessageStatus};

#[derive(Parser)]
#[command(
    name = "emlextract",
    version,
    about = "Extracts attachments from .eml files",
    override_usage = "emlextract [OPTIONS]"
)]
struct Cli {
    /// The directory containing the .eml files to extract attachments from
    /// (default: current working directory)
    #[arg(
        short,
        long,
        value_name = "PATH",
        value_parser = parse_dir,
        conflicts_with = "files"
    )]
    source: Option<PathBuf>,

    /// Allow recursive search for .eml files under SOURCE directory
    #[arg(short, long)]
    recursive: bool,

    /// Specify a .eml file or a list of .eml files to extract attachments from
    #[arg(short, long, value_name = "FILE", num_args = 1.., value_parser = parse_eml_file)]
    files: Vec<PathBuf>,

    /// The directory to extract attachments into (default: current working directory)
    #[arg(short, long, value_name = "PATH", value_parser = parse_dir)]
    destination: Option<PathBuf>,

    /// Exit with status 1 if any message or attachment failed
    #[arg(long)]
    strict: bool,

    /// Do not write a duplicate whose content matches the existing file
    #[arg(long)]
    skip_identical: bool,

    /// Print a JSON summary instead of the progress trace
    #[arg(long)]
    json: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,

    /// Print a man page and exit
    #[arg(long)]
    manpage: bool,
}

fn parse_dir(arg: &str) -> Result<PathBuf, String> {
    discover::validate_dir(Path::new(arg)).map_err(|e| e.to_string())
}

fn parse_eml_file(arg: &str) -> Result<PathBuf, String> {
    discover::validate_eml_file(Path::new(arg)).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        return cmd_completions(shell);
    }
    if cli.manpage {
        return cmd_manpage();
    }

    let config = emlextract::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    // Defaults are resolved once here and never re-read mid-run.
    let cwd = std::env::current_dir()?;
    let mut extract_config = ExtractConfig::resolve(&config, cli.destination.as_deref(), &cwd);
    extract_config.skip_identical |= cli.skip_identical;
    discover::validate_dir(&extract_config.destination)?;

    let files = if cli.files.is_empty() {
        let source = cli.source.clone().unwrap_or_else(|| cwd.clone());
        discover::find_eml_files(&source, cli.recursive)?
    } else {
        cli.files.clone()
    };

    // In JSON mode stdout carries only the summary; status lines go to stderr.
    if files.is_empty() {
        if cli.json {
            eprintln!("No EML files found!");
        } else {
            println!("No EML files found!");
        }
    }

    let summary = cmd_extract(&files, extract_config, cli.json);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        eprintln!("Done.");
    } else {
        print_summary(&summary);
        println!("Done.");
    }

    if (cli.strict || config.extract.strict) && summary.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = emlextract::config::log_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "emlextract.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "emlextract", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Run the extractor over all files, printing the trace as each message finishes.
fn cmd_extract(files: &[PathBuf], config: ExtractConfig, json: bool) -> BatchSummary {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Extracting [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("valid template")
            .progress_chars("#>-"),
    );
    if json {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    let extractor = Extractor::new(config);
    let summary = extractor.run_batch(files, &|current, _total, report| {
        if !json {
            pb.suspend(|| print_report(report));
        }
        pb.set_position(current as u64 + 1);
    });

    pb.finish_and_clear();
    summary
}

/// Print the per-file trace for one message.
fn print_report(report: &MessageReport) {
    println!("PROCESSING FILE \"{}\"", report.source.display());

    match &report.status {
        MessageStatus::NoAttachments => println!(">> No attachments found."),
        MessageStatus::ParseFailed { error } => println!(">> Failed to parse message: {error}"),
        MessageStatus::FolderFailed { error } => println!(">> Error creating folder: {error}"),
        MessageStatus::Extracted => {}
    }

    for outcome in &report.attachments {
        match outcome {
            AttachmentOutcome::Saved { filename, path, .. } => {
                println!(">> Attachment found: {filename}");
                println!(">> Saving attachment to \"{}\"", path.display());
            }
            AttachmentOutcome::Duplicate { filename, path, .. } => {
                println!(">> Attachment found: {filename}");
                println!(">> Moving to duplicates folder...");
                println!(">> Saving attachment to \"{}\"", path.display());
            }
            AttachmentOutcome::IdenticalSkipped { filename, existing } => {
                println!(">> Attachment found: {filename}");
                println!(
                    ">> Identical to \"{}\", not saved again",
                    existing.display()
                );
            }
            AttachmentOutcome::Unnamed { .. } => println!(">> Attachment found: None"),
            AttachmentOutcome::Failed { filename, error } => {
                println!(">> Attachment found: {filename}");
                println!(">> Error saving attachment: {error}");
            }
        }
    }
}

fn print_summary(summary: &BatchSummary) {
    if summary.messages == 0 {
        return;
    }
    println!();
    println!(
        "  Extracted {} attachment(s) ({}) from {} message(s)",
        summary.attachments_written(),
        format_size(summary.bytes_written, BINARY),
        summary.messages
    );
    if summary.duplicates > 0 {
        println!("  {:<25} {}", "Moved to duplicates", summary.duplicates);
    }
    if summary.identical_skipped > 0 {
        println!("  {:<25} {}", "Identical, skipped", summary.identical_skipped);
    }
    if summary.unnamed_skipped > 0 {
        println!("  {:<25} {}", "Unnamed, skipped", summary.unnamed_skipped);
    }
    if summary.has_failures() {
        println!(
            "  {:<25} {} message(s), {} attachment(s)",
            "Failed",
            summary.messages_failed,
            summary.attachments_failed
        );
    }
    println!();
}
