//! CLI binary for resume2json.
//!
//! A thin shim over the library crate: flags map to `ClientConfig`, the
//! terminal plays the part of the text area, output pane and alert.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use resume2json::{
    inspect, write_output, Alert, ClientConfig, Extraction, ExtractionProgressCallback,
    Extractor, OutputPane, PageSelection, ProgressCallback, ResumeError, Submitter, TextArea,
    DEFAULT_ENDPOINT,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── Terminal surfaces ────────────────────────────────────────────────────────

/// Alerts go to stderr so stdout stays clean for piping.
struct TerminalAlert;

impl Alert for TerminalAlert {
    fn alert(&self, message: &str) {
        eprintln!("{} {}", red("✘"), bold(message));
    }
}

/// Live progress bar over the pages being read.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Spinner until `on_extraction_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Remove the bar whether or not the extraction completed.
    fn clear(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Extracting");
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, chars: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{chars:>6} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        let msg = if error.chars().count() > 80 {
            format!("{}…", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg)
        ));
    }

    fn on_extraction_complete(&self, total_pages: usize, total_chars: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages extracted  {}",
            green("✔"),
            bold(&total_pages.to_string()),
            dim(&format!("{total_chars} chars")),
        );
    }
}

// ── Command line ─────────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract the text of a resume (stdout)
  resume2json extract resume.pdf

  # Extract to a file, pages 1-2 only
  resume2json --pages 1-2 extract resume.pdf -o resume.txt

  # Submit previously extracted (and possibly edited) text
  resume2json submit --text-file resume.txt

  # Extract, review in $EDITOR, submit, save the parsed JSON
  resume2json parse resume.pdf --edit -o resume.json

  # Against another backend
  resume2json --endpoint http://parser.internal:8080/api/parse parse resume.pdf

  # Document information (no endpoint needed)
  resume2json inspect resume.pdf

EXIT STATUS:
  0  success (including a "Parsing failed" reply)
  1  error (unreadable PDF, network failure, malformed reply, …)
  2  input alert ("Please upload a PDF", "Resume text is empty")

ENVIRONMENT VARIABLES:
  RESUME2JSON_ENDPOINT    Parse endpoint URL
  RESUME2JSON_TIMEOUT     Request timeout in seconds (default: none)
  RESUME2JSON_PASSWORD    PDF user password
  RESUME2JSON_PAGES       Page selection
  PDFIUM_LIB_PATH         Path to an existing libpdfium
  PDFIUM_LOADER_CACHE_DIR Override the pdfium cache directory
  RUST_LOG                Log filter (overrides --verbose/--quiet)
"#;

/// Extract resume text from PDFs and submit it to a parsing endpoint.
#[derive(Parser, Debug)]
#[command(
    name = "resume2json",
    version,
    about = "Extract resume text from PDFs and submit it to a parsing endpoint",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Parse endpoint receiving POST {"resumeText": …}.
    #[arg(long, global = true, env = "RESUME2JSON_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds. Default: wait indefinitely.
    #[arg(long, global = true, env = "RESUME2JSON_TIMEOUT")]
    timeout: Option<u64>,

    /// PDF user password for encrypted documents.
    #[arg(long, global = true, env = "RESUME2JSON_PASSWORD")]
    password: Option<String>,

    /// Page selection: all, 5, 3-15, or 1,3,5.
    #[arg(long, global = true, env = "RESUME2JSON_PAGES", default_value = "all")]
    pages: String,

    /// Path to libpdfium (checked before the cache and system library).
    #[arg(long, global = true, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Never download pdfium; fail if no copy is found.
    #[arg(long, global = true)]
    no_download: bool,

    /// Disable the progress bar.
    #[arg(long, global = true)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the text of a PDF.
    Extract {
        /// PDF file. Omitting it triggers the "Please upload a PDF" alert.
        file: Option<PathBuf>,

        /// Write the text to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the structured extraction (per-page text and stats) as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Submit resume text to the endpoint and print the rendered reply.
    Submit {
        /// Read the text from this file instead of stdin.
        #[arg(long)]
        text_file: Option<PathBuf>,

        /// Write the rendered reply to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract a PDF, then submit its text.
    Parse {
        /// PDF file. Omitting it triggers the "Please upload a PDF" alert.
        file: Option<PathBuf>,

        /// Review the extracted text in $VISUAL / $EDITOR before submitting.
        #[arg(long)]
        edit: bool,

        /// Write the rendered reply to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print document information without extracting text.
    Inspect {
        file: PathBuf,

        /// Emit JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    /// Only commands that open a PDF and print plain output get a bar.
    fn shows_progress(&self) -> bool {
        matches!(
            self,
            Command::Extract {
                file: Some(_),
                json: false,
                ..
            } | Command::Parse { file: Some(_), .. }
        )
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let g = &cli.global;

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs would interleave with the progress bar.
    let show_progress = !g.quiet && !g.no_progress && cli.command.shows_progress();
    let filter = if g.verbose {
        "debug"
    } else if g.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(g)?;

    let outcome = match cli.command {
        Command::Extract { file, output, json } => {
            let out = Output { path: output.as_deref(), quiet: g.quiet };
            run_extract(&config, file.as_deref(), json, show_progress, out).await
        }
        Command::Submit { text_file, output } => {
            let out = Output { path: output.as_deref(), quiet: g.quiet };
            run_submit(&config, text_file.as_deref(), out).await
        }
        Command::Parse { file, edit, output } => {
            let out = Output { path: output.as_deref(), quiet: g.quiet };
            run_parse(&config, file.as_deref(), edit, show_progress, out).await
        }
        Command::Inspect { file, json } => run_inspect(&config, &file, json).await,
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Already shown to the user by TerminalAlert.
        Err(e) if is_alert(&e) => Ok(ExitCode::from(2)),
        Err(e) => Err(e),
    }
}

fn is_alert(e: &anyhow::Error) -> bool {
    e.downcast_ref::<ResumeError>()
        .is_some_and(ResumeError::is_user_input)
}

/// Map CLI args to `ClientConfig`.
fn build_config(g: &GlobalArgs) -> Result<ClientConfig> {
    let pages: PageSelection = g.pages.parse().context("Invalid --pages")?;

    let mut builder = ClientConfig::builder()
        .endpoint(g.endpoint.as_str())
        .pages(pages)
        .allow_pdfium_download(!g.no_download);

    if let Some(secs) = g.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    if let Some(ref pwd) = g.password {
        builder = builder.password(pwd.as_str());
    }
    if let Some(ref lib) = g.pdfium_lib {
        builder = builder.pdfium_library(lib.as_path());
    }

    builder.build().context("Invalid configuration")
}

/// Where rendered output goes.
#[derive(Clone, Copy)]
struct Output<'a> {
    path: Option<&'a Path>,
    quiet: bool,
}

/// Run the extractor into `text`, with a progress bar when asked for.
async fn extract_into(
    config: &ClientConfig,
    file: Option<&Path>,
    text: &TextArea,
    show_progress: bool,
) -> Result<Extraction> {
    let progress = show_progress.then(CliProgressCallback::new_dynamic);
    let mut config = config.clone();
    if let Some(ref cb) = progress {
        config.progress_callback = Some(Arc::clone(cb) as ProgressCallback);
    }

    let result = Extractor::new(config)
        .extract(file, text, &TerminalAlert)
        .await;
    if let Some(cb) = progress {
        cb.clear();
    }
    result.context("Extraction failed")
}

async fn run_extract(
    config: &ClientConfig,
    file: Option<&Path>,
    json: bool,
    show_progress: bool,
    out: Output<'_>,
) -> Result<()> {
    let text = TextArea::new();
    let extraction = extract_into(config, file, &text, show_progress).await?;

    let rendered = if json {
        serde_json::to_string_pretty(&extraction).context("Failed to serialise extraction")? + "\n"
    } else {
        text.value()
    };

    emit(&rendered, out).await
}

async fn run_submit(config: &ClientConfig, text_file: Option<&Path>, out: Output<'_>) -> Result<()> {
    let resume_text = match text_file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read text from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    submit_and_emit(config, &TextArea::with_text(resume_text), out).await
}

async fn run_parse(
    config: &ClientConfig,
    file: Option<&Path>,
    edit: bool,
    show_progress: bool,
    out: Output<'_>,
) -> Result<()> {
    let text = TextArea::new();
    extract_into(config, file, &text, show_progress).await?;

    if edit {
        edit_in_place(&text).await?;
    }

    submit_and_emit(config, &text, out).await
}

async fn submit_and_emit(config: &ClientConfig, text: &TextArea, out: Output<'_>) -> Result<()> {
    let pane = OutputPane::new();
    let submitter = Submitter::new(config).context("Failed to create HTTP client")?;
    let rendered = submitter
        .submit(text, &pane, &TerminalAlert)
        .await
        .with_context(|| format!("Submission to {} failed", submitter.endpoint()))?;

    if !rendered.is_success() && !out.quiet {
        eprintln!("{} endpoint reported a parsing failure", red("✘"));
    }

    emit(&(pane.content() + "\n"), out).await
}

async fn run_inspect(config: &ClientConfig, file: &Path, json: bool) -> Result<()> {
    let info = inspect(file, config).await.context("Failed to inspect PDF")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&info).context("Failed to serialise document info")?
        );
        return Ok(());
    }

    println!("File:         {}", file.display());
    if let Some(ref t) = info.title {
        println!("Title:        {}", t);
    }
    if let Some(ref a) = info.author {
        println!("Author:       {}", a);
    }
    if let Some(ref s) = info.subject {
        println!("Subject:      {}", s);
    }
    println!("Pages:        {}", info.page_count);
    println!("PDF Version:  {}", info.pdf_version);
    if let Some(ref p) = info.producer {
        println!("Producer:     {}", p);
    }
    if let Some(ref c) = info.creator {
        println!("Creator:      {}", c);
    }
    Ok(())
}

/// Write to the output file when given, else stdout.
async fn emit(contents: &str, out: Output<'_>) -> Result<()> {
    match out.path {
        Some(path) => {
            write_output(path, contents).await?;
            if !out.quiet {
                eprintln!("{} wrote {}", green("✔"), bold(&path.display().to_string()));
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(contents.as_bytes())
                .context("Failed to write to stdout")?;
            handle.flush().ok();
        }
    }
    Ok(())
}

/// Let the user edit the text area through their editor.
async fn edit_in_place(text: &TextArea) -> Result<()> {
    let mut scratch = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create scratch file")?;
    scratch
        .write_all(text.value().as_bytes())
        .context("Failed to write scratch file")?;

    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string());
    let mut parts = editor.split_whitespace();
    let program = parts.next().context("Editor command is empty")?;

    let status = tokio::process::Command::new(program)
        .args(parts)
        .arg(scratch.path())
        .status()
        .await
        .with_context(|| format!("Failed to launch editor '{editor}'"))?;
    if !status.success() {
        anyhow::bail!("Editor '{editor}' exited with {status}");
    }

    let edited = tokio::fs::read_to_string(scratch.path())
        .await
        .context("Failed to read edited text")?;
    text.set(edited);
    Ok(())
}
