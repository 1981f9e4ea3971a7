//! rtldoc CLI - Arabic RTL document generator

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use rtldoc::render::{DEFAULT_DOCX_NAME, DEFAULT_PDF_NAME};
use rtldoc::{
    upstream, DocxMode, HeaderPolicy, JsonFormat, ReadingOrder, RenderOptions, RtlDoc,
};

#[derive(Parser)]
#[command(name = "rtldoc")]
#[command(version)]
#[command(about = "Turn extracted Arabic text into PDF, DOCX and JSON documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render extracted text to a paginated PDF
    Pdf {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "TEXT_FILE")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// TrueType font to embed instead of the bundled DejaVu Arabic cut
        #[arg(long, value_name = "TTF", env = "RTLDOC_FONT")]
        font: Option<PathBuf>,

        /// How line text is ordered before drawing
        #[arg(long, value_enum, default_value = "visual")]
        reading_order: ReadingOrderArg,

        /// Which pages carry the header band
        #[arg(long, value_enum, default_value = "first")]
        header: HeaderArg,

        /// Document title
        #[arg(long)]
        title: Option<String>,
    },

    /// Render extracted text to a flowed DOCX document
    Docx {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "TEXT_FILE")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// One paragraph per input line instead of structured content
        #[arg(long)]
        plain_lines: bool,

        /// Font family named in the document
        #[arg(long, default_value = "Amiri")]
        font_family: String,
    },

    /// Dump the parsed document model as JSON
    Json {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "TEXT_FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Compact JSON output
        #[arg(short, long)]
        compact: bool,
    },

    /// Show document structure and pagination
    Info {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "TEXT_FILE")]
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a PDF to the extraction webhook and render the result
    Extract {
        /// Input PDF file
        #[arg(value_name = "PDF_FILE")]
        input: PathBuf,

        /// Extraction webhook URL
        #[arg(long, env = "RTLDOC_WEBHOOK_URL")]
        webhook: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: ExtractFormat,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// TrueType font to embed in PDF output instead of the bundled one
        #[arg(long, value_name = "TTF", env = "RTLDOC_FONT")]
        font: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReadingOrderArg {
    /// Reorder each line with the Unicode bidi algorithm
    Visual,
    /// Reverse word order
    Mirror,
    /// Keep logical order
    Logical,
}

impl From<ReadingOrderArg> for ReadingOrder {
    fn from(arg: ReadingOrderArg) -> Self {
        match arg {
            ReadingOrderArg::Visual => ReadingOrder::Visual,
            ReadingOrderArg::Mirror => ReadingOrder::MirrorWords,
            ReadingOrderArg::Logical => ReadingOrder::Logical,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum HeaderArg {
    First,
    Every,
    Never,
}

impl From<HeaderArg> for HeaderPolicy {
    fn from(arg: HeaderArg) -> Self {
        match arg {
            HeaderArg::First => HeaderPolicy::FirstPage,
            HeaderArg::Every => HeaderPolicy::EveryPage,
            HeaderArg::Never => HeaderPolicy::Never,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExtractFormat {
    Pdf,
    Docx,
    Text,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pdf {
            input,
            output,
            font,
            reading_order,
            header,
            title,
        } => {
            let mut options = RenderOptions::new()
                .with_reading_order(reading_order.into())
                .with_header_policy(header.into());
            if let Some(font) = font {
                options = options.with_font_file(font);
            }
            if let Some(title) = title {
                options = options.with_title(title);
            }
            cmd_pdf(&input, output.as_deref(), options)
        }
        Commands::Docx {
            input,
            output,
            plain_lines,
            font_family,
        } => {
            let mode = if plain_lines {
                DocxMode::PlainLines
            } else {
                DocxMode::Structured
            };
            let options = RenderOptions::new()
                .with_docx_mode(mode)
                .with_docx_font(font_family);
            cmd_docx(&input, output.as_deref(), options)
        }
        Commands::Json {
            input,
            output,
            compact,
        } => cmd_json(&input, output.as_deref(), compact),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Extract {
            input,
            webhook,
            format,
            output,
            font,
        } => cmd_extract(&input, &webhook, format, output.as_deref(), font),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_input(input: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

fn save(path: &Path, bytes: &[u8]) -> CliResult {
    fs::write(path, bytes)?;
    println!("{} {}", "Saved to".green(), path.display());
    Ok(())
}

fn cmd_pdf(input: &Path, output: Option<&Path>, options: RenderOptions) -> CliResult {
    let text = read_input(input)?;
    let pb = spinner("Parsing text...");
    let result = RtlDoc::new().with_render_options(options).parse(&text);

    pb.set_message("Rendering PDF...");
    let pdf = result.to_pdf()?;
    pb.finish_and_clear();

    save(output.unwrap_or(Path::new(DEFAULT_PDF_NAME)), &pdf)
}

fn cmd_docx(input: &Path, output: Option<&Path>, options: RenderOptions) -> CliResult {
    let text = read_input(input)?;
    let result = RtlDoc::new().with_render_options(options).parse(&text);
    let docx = result.to_docx()?;

    save(output.unwrap_or(Path::new(DEFAULT_DOCX_NAME)), &docx)
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool) -> CliResult {
    let text = read_input(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = RtlDoc::new().parse(&text).to_json(format)?;

    if let Some(path) = output {
        save(path, json.as_bytes())
    } else {
        println!("{}", json);
        Ok(())
    }
}

fn cmd_info(input: &Path, as_json: bool) -> CliResult {
    let text = read_input(input)?;
    let result = RtlDoc::new().parse(&text);
    let model = result.model();
    let layout = result.layout();

    if as_json {
        let summary = serde_json::json!({
            "sections": model.section_count(),
            "items": model.item_count(),
            "contacts": model.contacts.len(),
            "pages": layout.page_count,
            "page_breaks": layout.page_breaks.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Lines".bold(), text.lines().count());

    println!();
    println!("{}", "Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for section in &model.sections {
        let title = if section.is_untitled() {
            "(untitled)".dimmed().to_string()
        } else if !section.has_title() {
            "(empty heading)".dimmed().to_string()
        } else {
            rtldoc::bidi::strip_bidi_controls(&section.title)
        };
        println!("  {} {} ({} items)", "├─".dimmed(), title, section.items.len());
    }
    if let Some(title) = model.contact_title() {
        println!("  {} {}", "└─".dimmed(), title);
    }

    println!();
    println!("{}: {}", "Sections".bold(), model.section_count());
    println!("{}: {}", "Items".bold(), model.item_count());
    println!("{}: {}", "Contacts".bold(), model.contacts.len());
    println!("{}: {}", "Pages".bold(), layout.page_count);
    println!("{}: {}", "Page breaks".bold(), layout.page_breaks.len());

    Ok(())
}

fn cmd_extract(
    input: &Path,
    webhook: &str,
    format: ExtractFormat,
    output: Option<&Path>,
    font: Option<PathBuf>,
) -> CliResult {
    let data = fs::read(input)?;
    if !upstream::is_pdf_upload(&data) {
        return Err("only PDF files can be uploaded".into());
    }

    let pb = spinner("Uploading to extraction service...");
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string());

    let body = match upload(webhook, data, file_name) {
        Ok(body) => body,
        Err(e) => {
            pb.finish_and_clear();
            log::debug!("upload error: {}", e);
            return Err("upload failed, check the webhook URL and service status".into());
        }
    };
    let text = upstream::extract_text(&body);
    pb.finish_with_message("Extraction completed");

    let mut options = RenderOptions::new();
    if let Some(font) = font {
        options = options.with_font_file(font);
    }
    let result = RtlDoc::new().with_render_options(options).parse(&text);

    match format {
        ExtractFormat::Pdf => save(
            output.unwrap_or(Path::new(DEFAULT_PDF_NAME)),
            &result.to_pdf()?,
        ),
        ExtractFormat::Docx => save(
            output.unwrap_or(Path::new(DEFAULT_DOCX_NAME)),
            &result.to_docx()?,
        ),
        ExtractFormat::Text => match output {
            Some(path) => save(path, text.as_bytes()),
            None => {
                println!("{}", text);
                Ok(())
            }
        },
    }
}

fn upload(
    webhook: &str,
    data: Vec<u8>,
    file_name: String,
) -> Result<String, Box<dyn std::error::Error>> {
    // Use tokio runtime for the async client
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = reqwest::Client::new()
            .post(webhook)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        Ok::<String, Box<dyn std::error::Error>>(response.text().await?)
    })
}

fn cmd_version() {
    println!("{} {}", "rtldoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Arabic RTL document generator");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_pdf_command() {
        let cli = Cli::try_parse_from([
            "rtldoc",
            "pdf",
            "input.txt",
            "--reading-order",
            "mirror",
            "--header",
            "every",
        ])
        .unwrap();
        match cli.command {
            Commands::Pdf {
                input,
                reading_order,
                header,
                ..
            } => {
                assert_eq!(input, PathBuf::from("input.txt"));
                assert_eq!(ReadingOrder::from(reading_order), ReadingOrder::MirrorWords);
                assert_eq!(HeaderPolicy::from(header), HeaderPolicy::EveryPage);
            }
            _ => panic!("expected pdf command"),
        }
    }

    #[test]
    fn test_cmd_json_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("model.json");
        fs::write(&input, "# Intro\nHello world\n").unwrap();

        cmd_json(&input, Some(&output), true).unwrap();
        let json = fs::read_to_string(&output).unwrap();
        assert!(json.contains("Intro"));
    }

    #[test]
    fn test_extract_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, "plain text").unwrap();

        let err = cmd_extract(&input, "http://localhost:1", ExtractFormat::Text, None, None)
            .unwrap_err();
        assert!(err.to_string().contains("PDF"));
    }
}
