//! CLI binary for pdf2text.
//!
//! A thin shim over the library crate: maps CLI flags to `ExtractionConfig`,
//! runs the pipeline, and prints the JSON envelope on stdout. Logs go to
//! stderr. Pipeline failures are reported in the JSON body with exit code 0;
//! only argument errors exit non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfium_loader::LibrarySource;
use pdf2text::{
    process_url, ExtractionConfig, DEFAULT_MAX_DOWNLOAD_BYTES, DEFAULT_MAX_PAGES,
    DEFAULT_TIMEOUT_SECS,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract text from a remote PDF
  pdf2text https://example.com/resume.pdf

  # Only the text, via jq
  pdf2text https://example.com/resume.pdf | jq -r .extracted_text

  # Offline: use an existing pdfium and never download it
  pdf2text --pdfium-lib /opt/pdfium/libpdfium.so --no-download https://example.com/cv.pdf

OUTPUT:
  A JSON object on stdout, always, with exit code 0:
    {
      "status": "success" | "error",
      "extracted_text": "...",        ("" on error)
      "error_message": null | "..."
    }
  Check "status" rather than the exit code to detect failure.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH          Path to an existing libpdfium; skips auto-download
  PDFIUM_LOADER_CACHE_DIR  Override the pdfium cache directory
  RUST_LOG                 Override the log filter (e.g. pdf2text=debug)
"#;

/// Download a PDF from a URL and print its text as a JSON envelope.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2text",
    version,
    about = "Download a PDF from a URL and print its text as a JSON envelope",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTTP/HTTPS URL of the PDF.
    url: String,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2TEXT_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Largest accepted download, in bytes.
    #[arg(long, env = "PDF2TEXT_MAX_BYTES", default_value_t = DEFAULT_MAX_DOWNLOAD_BYTES,
          value_parser = clap::value_parser!(u64).range(1..))]
    max_bytes: u64,

    /// Largest accepted page count.
    #[arg(long, env = "PDF2TEXT_MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES,
          value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_pages: usize,

    /// Path to an existing pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Never download the pdfium engine.
    #[arg(long, env = "PDF2TEXT_NO_DOWNLOAD")]
    no_download: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TEXT_VERBOSE")]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long, env = "PDF2TEXT_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Argument errors exit 1 (clap's own default is 2); --help/--version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = build_config(&cli)?;

    // ── Ensure PDFium engine is available ────────────────────────────────
    // Best effort: when this fails the pipeline reports the engine problem
    // as a parse error in the envelope.
    if let Err(e) = prepare_engine(&config, cli.quiet) {
        warn!("PDF engine not ready: {:#}", e);
        config.allow_engine_download = false;
    }

    let envelope = process_url(&cli.url, &config).await;

    let json = serde_json::to_string_pretty(&envelope).context("Failed to serialise result")?;
    println!("{json}");

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .download_timeout_secs(cli.timeout)
        .max_download_bytes(cli.max_bytes)
        .max_pages(cli.max_pages)
        .allow_engine_download(!cli.no_download);

    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_library_path(path);
    }

    builder.build().context("Invalid configuration")
}

/// Download pdfium on first run, showing a progress bar unless quiet.
fn prepare_engine(config: &ExtractionConfig, quiet: bool) -> Result<()> {
    let options = config.loader_options();
    let source = pdfium_loader::library_source(&options).context("Failed to locate PDFium")?;
    if source != LibrarySource::Download {
        return Ok(());
    }

    if quiet {
        tokio::task::block_in_place(|| pdfium_loader::ensure_library(&options, None))
            .context("Failed to download PDFium engine")?;
        return Ok(());
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar.set_prefix("PDF engine");
    bar.enable_steady_tick(Duration::from_millis(80));

    let result = tokio::task::block_in_place(|| {
        pdfium_loader::ensure_library(
            &options,
            Some(&|downloaded, total| {
                if let Some(t) = total {
                    if bar.length() != Some(t) {
                        bar.set_length(t);
                    }
                }
                bar.set_position(downloaded);
            }),
        )
    });

    match result {
        Ok(_) => {
            bar.finish_with_message("ready ✓");
            Ok(())
        }
        Err(e) => {
            bar.abandon();
            Err(e).context("Failed to download PDFium engine")
        }
    }
}
