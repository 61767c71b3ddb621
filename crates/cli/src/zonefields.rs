//! zonefields - Extract field values from a recognized page
//!
//! Reads a page of OCR tokens (JSON) and a template of zones, and prints
//! one formatted value per field, or the page's reading-order lines. With
//! `--names` the input is instead a list of name rows (or positioned name
//! fragments) to normalize directly.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use zonetext_core::{
    MergeParams, NameInput, PageInput, Template, extract_fields, extract_fields_par,
    normalize_names, reconstruct_page,
};

/// Output type for the extracted content.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputType {
    /// `key<TAB>value` per field, newlines in values escaped (default)
    #[default]
    Text,
    /// JSON object keyed by field, in template order
    Json,
}

/// Extract field values from zones drawn on a recognized page.
#[derive(Parser, Debug)]
#[command(name = "zonefields")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page JSON: {"width", "height", "tokens": [{"text", "x", "y", "w", "h"}]}
    input: PathBuf,

    /// Template JSON with the field zones
    #[arg(short = 't', long, required_unless_present_any = ["dump_lines", "names"])]
    template: Option<PathBuf>,

    /// Type of output to generate
    #[arg(short = 'T', long = "output-type", value_enum, default_value = "text")]
    output_type: OutputType,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Compute fields in parallel
    #[arg(short = 'j', long, action = ArgAction::SetTrue)]
    parallel: bool,

    /// Print the page's reading-order lines instead of fields
    #[arg(long = "dump-lines", action = ArgAction::SetTrue, conflicts_with = "names")]
    dump_lines: bool,

    /// Treat the input as name rows (`[["a", "b"]]`) or fragments
    /// (`[{"text", "x", "y"}]`) and print one normalized name per row
    #[arg(long, action = ArgAction::SetTrue)]
    names: bool,

    // === Threshold overrides ===
    /// Maximum horizontal gap (px) between fragments of one word
    #[arg(long = "word-gap")]
    word_gap: Option<f64>,

    /// Vertical-center distance (px) for page lines
    #[arg(long = "line-threshold")]
    line_threshold: Option<f64>,

    /// Row window (px) for names given as flat items
    #[arg(long = "name-y-threshold")]
    name_y_threshold: Option<f64>,
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Apply command line overrides on top of the template's parameters.
fn apply_overrides(params: &mut MergeParams, args: &Args) -> Result<()> {
    if let Some(v) = args.word_gap {
        params.word_gap = v;
    }
    if let Some(v) = args.line_threshold {
        params.line_threshold = v;
    }
    if let Some(v) = args.name_y_threshold {
        params.name_y_threshold = v;
    }
    params.validate().context("invalid threshold override")?;
    Ok(())
}

fn write_lines<W: Write>(writer: &mut W, page: &PageInput, params: &MergeParams) -> Result<()> {
    let recon = reconstruct_page(page, params);
    for line in &recon.lines {
        writeln!(writer, "{}", line.text)?;
    }
    Ok(())
}

fn write_names<W: Write>(writer: &mut W, input: &NameInput, params: &MergeParams) -> Result<()> {
    for name in normalize_names(input, params.name_y_threshold) {
        writeln!(writer, "{name}")?;
    }
    Ok(())
}

fn write_fields<W: Write>(
    writer: &mut W,
    page: &PageInput,
    template: &Template,
    args: &Args,
) -> Result<()> {
    let fields = if args.parallel {
        extract_fields_par(page, template)
    } else {
        extract_fields(page, template)
    };

    match args.output_type {
        OutputType::Text => {
            for (key, value) in &fields {
                writeln!(writer, "{}\t{}", key, value.replace('\n', "\\n"))?;
            }
        }
        OutputType::Json => {
            serde_json::to_writer_pretty(&mut *writer, &fields)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    if !args.input.exists() {
        bail!("file not found: {}", args.input.display());
    }
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut template = match &args.template {
        Some(path) => Template::from_path(path)
            .with_context(|| format!("failed to read template {}", path.display()))?,
        None => Template::default(),
    };
    apply_overrides(&mut template.params, &args)?;

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    if args.names {
        let input: NameInput = serde_json::from_str(&raw).context("invalid name input")?;
        write_names(&mut output, &input, &template.params)?;
    } else {
        let page = PageInput::from_json(&raw)
            .with_context(|| format!("invalid page {}", args.input.display()))?;
        tracing::debug!(
            tokens = page.tokens.len(),
            fields = template.fields.len(),
            "inputs loaded"
        );
        if args.dump_lines {
            write_lines(&mut output, &page, &template.params)?;
        } else {
            write_fields(&mut output, &page, &template, &args)?;
        }
    }
    output.flush()?;
    Ok(())
}
