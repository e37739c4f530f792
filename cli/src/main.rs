//! noticedoc CLI - construction violation notice tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use noticedoc::notice::{update_photo_set, HttpNoticeStore, PhotoChange, ValidationReport};
use noticedoc::render::{self, RegistryRenderOptions};
use noticedoc::resolve::{DirectoryFetcher, HttpFetcher};
use noticedoc::{
    load_registry, read_notice_file, Column, Composer, ExportOptions, Exporter, JsonFormat,
    MarkdownOptions, Notice, NoticeDraft, PhotoFetcher, PhotoSet, SelectedUpload,
    SerializerRegistry,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "noticedoc")]
#[command(version)]
#[command(about = "Validate, export and submit construction violation notices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a notice to a document file
    Export {
        /// Notice JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Newly selected photo files, appended after the stored ones
        #[arg(long = "upload", value_name = "FILE")]
        uploads: Vec<PathBuf>,

        #[command(flatten)]
        photos: PhotoSource,
    },

    /// Validate a notice
    Validate {
        /// Notice JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show the notice registry
    Registry {
        /// JSON file with a list of notices
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Global filter over the visible columns
        #[arg(long)]
        filter: Option<String>,

        /// Visible columns by key, comma separated
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Render an HTML table instead of tab-separated text
        #[arg(long)]
        html: bool,

        /// Base URL of stored photos, used for photo links
        #[arg(long, env = "NOTICEDOC_UPLOADS_URL")]
        uploads_url: Option<String>,
    },

    /// Submit a notice to the notice API
    Submit {
        /// Notice JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// API base URL
        #[arg(long, env = "NOTICEDOC_API_URL")]
        api_url: String,

        /// Newly selected photo files
        #[arg(long = "upload", value_name = "FILE")]
        uploads: Vec<PathBuf>,

        /// Update the stored record with the file's number instead of creating one
        #[arg(long)]
        update: bool,
    },

    /// Show notice information
    Info {
        /// Notice JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct PhotoSource {
    /// Directory holding stored photos
    #[arg(long, env = "NOTICEDOC_PHOTOS_DIR", default_value = "uploads")]
    photos_dir: PathBuf,

    /// Base URL of stored photos (takes precedence over the directory)
    #[arg(long, env = "NOTICEDOC_UPLOADS_URL")]
    photos_url: Option<String>,
}

impl PhotoSource {
    fn fetcher(&self) -> Box<dyn PhotoFetcher> {
        match &self.photos_url {
            Some(url) => Box::new(HttpFetcher::new(url.clone())),
            None => Box::new(DirectoryFetcher::new(self.photos_dir.clone())),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Document IR as JSON
    Json,
    /// Markdown preview
    Md,
    /// Plain text preview
    Txt,
}

impl Format {
    fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Md => "md",
            Format::Txt => "txt",
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Export {
            input,
            output,
            format,
            compact,
            uploads,
            photos,
        }) => cmd_export(&input, output.as_deref(), format, compact, &uploads, &photos),
        Some(Commands::Validate { input }) => cmd_validate(&input),
        Some(Commands::Registry {
            input,
            output,
            filter,
            columns,
            html,
            uploads_url,
        }) => cmd_registry(
            &input,
            output.as_deref(),
            filter.as_deref(),
            &columns,
            html,
            uploads_url,
        ),
        Some(Commands::Submit {
            input,
            api_url,
            uploads,
            update,
        }) => cmd_submit(&input, &api_url, &uploads, update),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: noticedoc <COMMAND> <FILE>".yellow());
            println!("       noticedoc --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

fn selected_uploads(uploads: &[PathBuf]) -> Vec<SelectedUpload> {
    uploads.iter().map(SelectedUpload::from_path).collect()
}

fn photo_set(notice: &Notice, uploads: &[PathBuf]) -> PhotoSet {
    update_photo_set(
        &PhotoSet::from_persisted(notice.photos.iter().cloned()),
        &[PhotoChange::Select(selected_uploads(uploads))],
    )
}

fn print_report(report: &ValidationReport) {
    for issue in report.errors() {
        println!("  {} {}", "✗".red(), issue);
    }
    for issue in report.warnings() {
        println!("  {} {}", "!".yellow(), issue);
    }
}

fn cmd_export(
    input: &Path,
    output: Option<&Path>,
    format: Format,
    compact: bool,
    uploads: &[PathBuf],
    source: &PhotoSource,
) -> CliResult {
    let notice = read_notice_file(input)?;
    let photos = photo_set(&notice, uploads);
    let ext = format.extension();

    let options = ExportOptions::new()
        .with_format(ext)
        .with_json_format(if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        })
        .with_markdown_options(MarkdownOptions::new().with_frontmatter(true));

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Validating...");
    let report = noticedoc::validate(&notice);
    if report.is_blocking() {
        pb.abandon_with_message("Validation failed");
        print_report(&report);
        return Err(noticedoc::Error::Validation(report).into());
    }
    pb.inc(1);

    pb.set_message(format!("Exporting with {} photos...", photos.len()));
    let fetcher = source.fetcher();
    let exporter = Exporter::new(SerializerRegistry::with_defaults()).with_options(options);
    let rt = runtime()?;
    let artifact = match rt.block_on(exporter.export(&notice, &photos, fetcher.as_ref())) {
        Ok(artifact) => artifact,
        Err(e) => {
            pb.abandon_with_message("Export failed");
            return Err(e.into());
        }
    };
    pb.inc(1);

    pb.set_message("Writing...");
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let path = artifact.write_to(&output_dir)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    if report.warnings().next().is_some() {
        println!("\n{}", "Warnings:".yellow().bold());
        print_report(&report);
    }
    println!("\n{} {}", "Saved to".green(), path.display());
    for image in &artifact.images {
        println!("  {} {}", "└─".dimmed(), image.suggested_filename());
    }

    Ok(())
}

fn cmd_validate(input: &Path) -> CliResult {
    let notice = read_notice_file(input)?;
    let report = noticedoc::validate(&notice);

    if report.is_clean() {
        println!("{} {}", "OK".green().bold(), input.display());
        return Ok(());
    }

    print_report(&report);
    if report.is_blocking() {
        return Err(noticedoc::Error::Validation(report).into());
    }
    Ok(())
}

fn cmd_registry(
    input: &Path,
    output: Option<&Path>,
    filter: Option<&str>,
    columns: &[String],
    html: bool,
    uploads_url: Option<String>,
) -> CliResult {
    let mut registry = load_registry(input)?;

    if !columns.is_empty() {
        let selected = columns
            .iter()
            .map(|key| {
                Column::from_key(key.trim()).ok_or_else(|| format!("Unknown column: {}", key))
            })
            .collect::<Result<Vec<_>, _>>()?;
        registry.select_columns(&selected);
    }
    if let Some(query) = filter {
        registry.set_filter(query);
    }

    let content = if html {
        let mut options = RegistryRenderOptions::new();
        if let Some(url) = uploads_url {
            options = options.with_uploads_url(url);
        }
        render::registry_to_html(&registry, &options)
    } else {
        render::registry_to_text(&registry)
    };

    if let Some(path) = output {
        fs::write(path, &content)?;
        println!(
            "{} {} ({} rows)",
            "Saved to".green(),
            path.display(),
            registry.row_count()
        );
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn cmd_submit(
    input: &Path,
    api_url: &str,
    uploads: &[PathBuf],
    update: bool,
) -> CliResult {
    let notice = read_notice_file(input)?;
    let mut draft = if update {
        NoticeDraft::from_record(notice)
    } else {
        NoticeDraft::prefilled(notice)
    };
    if !uploads.is_empty() {
        draft.apply_photo_changes(&[PhotoChange::Select(selected_uploads(uploads))]);
    }

    let store = HttpNoticeStore::new(api_url);
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Submitting...");

    let rt = runtime()?;
    let saved = rt.block_on(draft.submit(&store));
    spinner.finish_and_clear();

    match saved {
        Ok(saved) => {
            println!(
                "{} notice № {} ({} photos)",
                "Saved".green().bold(),
                saved.notice_num,
                saved.photos.len()
            );
            Ok(())
        }
        Err(noticedoc::Error::Validation(report)) => {
            print_report(&report);
            Err(noticedoc::Error::Validation(report).into())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_info(input: &Path) -> CliResult {
    let notice = read_notice_file(input)?;
    let report = noticedoc::validate(&notice);
    let doc = Composer::new().compose(&notice, &[]);
    let stats = render::collect_stats(&doc);

    println!("{}", "Notice Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Number".bold(), notice.notice_num);
    if let Some(date) = notice.notice_date {
        println!(
            "{}: {}",
            "Date".bold(),
            noticedoc::compose::format_short_date(date)
        );
    }
    if !notice.org_name.is_empty() {
        println!("{}: {}", "Organization".bold(), notice.org_name);
    }
    if !notice.object_name.is_empty() {
        println!("{}: {}", "Object".bold(), notice.object_name);
    }
    println!("{}: {}", "Violations".bold(), notice.violation_count());
    println!("{}: {}", "Photos".bold(), notice.photos.len());
    println!("{}: {}", "Action".bold(), notice.actions.phrase());

    println!();
    println!("{}", "Document Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Sections".bold(), stats.section_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Words".bold(), stats.word_count);

    println!();
    println!("{}", "Validation".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if report.is_clean() {
        println!("  {}", "No issues".green());
    } else {
        print_report(&report);
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "noticedoc".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Construction violation notice tool");
    println!("Library: {}", noticedoc::VERSION.dimmed());
    println!("License: MIT");
}
