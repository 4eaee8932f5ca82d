use clap::Parser;
use doxy_conv_rs::cli::{run_extraction, ExtractionOptions};
use doxy_conv_rs::config::Language;
use doxy_conv_rs::generator::xlsx::XlsxGeneratorOptions;
use doxy_conv_rs::generator::xml::XmlGeneratorOptions;
use doxy_conv_rs::generator::GeneratorOptions;
use doxy_conv_rs::get_generator_types;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory whose files are all class pages.
    #[arg(short = 'f', long, value_name = "DIR")]
    file_dir: Option<PathBuf>,

    /// Doxygen html directory; pages are taken from its class index.
    #[arg(short = 'd', long, value_name = "DIR")]
    html_dir: Option<PathBuf>,

    /// Glob pattern selecting pages under --file-dir.
    #[arg(long, default_value = "**/*.html")]
    glob_pattern: String,

    /// Type of output (e.g., xlsx, xml)
    #[arg(short = 't', long, value_name = "TYPE", default_value = "xlsx")]
    to_type: String,

    /// Language of the Doxygen output and of the generated labels.
    #[arg(long, value_enum, default_value_t = Language::Zh)]
    language: Language,

    /// Fill all cells with white color.
    #[arg(long = "to-shironuri", default_value_t = false)]
    to_shironuri: bool,

    /// Indent xml output by this many spaces per level.
    #[arg(long = "to-indent", value_name = "N")]
    to_indent: Option<usize>,

    /// Number of worker threads used for extraction.
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Log progress of every page.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,

    /// Output file (default: stdout)
    output: Option<String>,

    /// List available output types
    #[arg(short = 'l', long)]
    list_type: bool,
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DOXY_CONV_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    if cli.list_type {
        println!("type of output:");
        println!("{}", get_generator_types().join(" "));
        println!();
        return Ok(());
    }

    if cli.file_dir.is_none() && cli.html_dir.is_none() {
        anyhow::bail!("no input given: pass --file-dir or --html-dir");
    }

    let generator = match cli.to_type.as_str() {
        "xlsx" => GeneratorOptions::Xlsx(XlsxGeneratorOptions {
            language: cli.language,
            shironuri: cli.to_shironuri,
        }),
        "xml" => GeneratorOptions::Xml(XmlGeneratorOptions {
            indent: cli.to_indent,
        }),
        _ => anyhow::bail!(
            "Unsupported to_type: {}. Supported types are: {}",
            cli.to_type,
            get_generator_types().join(", ")
        ),
    };

    let options = ExtractionOptions {
        file_dir: cli.file_dir,
        html_dir: cli.html_dir,
        glob_pattern: cli.glob_pattern,
        captions: cli.language.captions(),
        generator,
        jobs: cli.jobs,
    };

    // Prepare output writer
    let mut output_writer: Box<dyn Write> = match cli.output {
        Some(path) if path != "-" => Box::new(File::create(path)?),
        _ => Box::new(io::stdout()),
    };

    run_extraction(&options, &mut output_writer)?;
    output_writer.flush()?;

    Ok(())
}
