//! FlyBase Remap CLI entry point
//!
//! Converts coordinates between assembly releases and updates FlyBase
//! gene IDs and symbols against FlyBase reference tables.

use anyhow::Context;
use clap::{Parser, Subcommand};
use flybase_remap::core::{create_output, open_input, open_reader, IntervalTable};
use flybase_remap::formats::{self, IdTable, SymbolTable};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "flybase-remap")]
#[command(about = "FlyBase assembly coordinate remapping and ID lookup utilities")]
#[command(version)]
#[command(author = "FlyBase Remap Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert coordinates (chr:start..end) between assembly releases
    Remap {
        /// Mapping file of aligned blocks (chr start end newchr newstart newend strand)
        mapping: PathBuf,
        /// Input file with one coordinate per line (stdin if not specified)
        input: Option<PathBuf>,
        /// Output file (optional, stdout if not specified)
        output: Option<PathBuf>,
        /// Write failed conversions here instead of the main output
        #[arg(short = 'u', long)]
        unmapped: Option<PathBuf>,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
    /// Update FBgn IDs to their current IDs
    UpdateIds {
        /// File with one FBgn ID per line
        ids: PathBuf,
        /// FBgn <=> Annotation ID table (fbgn_annotation_ID_*.tsv)
        reference: PathBuf,
        /// Output file (optional, stdout if not specified)
        output: Option<PathBuf>,
    },
    /// Look up FlyBase IDs for gene and transcript symbols
    LookupSymbols {
        /// File with one symbol per line
        symbols: PathBuf,
        /// FlyBase synonym table (fb_synonym_*.tsv)
        synonyms: PathBuf,
        /// Output file (optional, stdout if not specified)
        output: Option<PathBuf>,
    },
}

fn load_table(mapping_path: &Path) -> anyhow::Result<IntervalTable> {
    let start = Instant::now();
    eprintln!("Loading mapping file: {:?}", mapping_path);

    let table = IntervalTable::from_mapping_file(mapping_path)
        .with_context(|| format!("Failed to load mapping file {}", mapping_path.display()))?;
    if table.is_empty() {
        anyhow::bail!("Mapping file {} has no usable rows", mapping_path.display());
    }

    eprintln!(
        "Mapping file loaded in {:.2}s ({} intervals)",
        start.elapsed().as_secs_f64(),
        table.total_intervals()
    );
    Ok(table)
}

fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Remap { mapping, input, output, unmapped, threads } => {
            let table = load_table(&mapping)?;
            let reader = open_input(input.as_ref())
                .with_context(|| format!("Failed to open input {:?}", input))?;
            let mut writer = create_output(output.as_ref())?;
            let mut unmapped_writer = match &unmapped {
                Some(path) => Some(create_output(Some(path))?),
                None => None,
            };

            let stats = formats::convert_coordinates(
                reader,
                &mut writer,
                unmapped_writer.as_mut().map(|w| w as &mut dyn Write),
                &table,
                threads,
            )?;

            eprintln!("\n=== Conversion Statistics ===");
            eprintln!("Total records:   {}", stats.total);
            eprintln!("Resolved:        {}", stats.resolved);
            eprintln!("Failed:          {}", stats.failed);
            eprintln!("Skipped:         {}", stats.skipped);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::UpdateIds { ids, reference, output } => {
            let table = IdTable::from_file(&reference)
                .with_context(|| format!("Failed to load ID table {}", reference.display()))?;
            let reader = open_reader(&ids)
                .with_context(|| format!("Failed to open ID list {}", ids.display()))?;
            let mut writer = create_output(output.as_ref())?;

            let stats = formats::update_ids(
                reader,
                &mut writer,
                &table,
                &display_path(&ids),
                &display_path(&reference),
            )?;

            eprintln!("\n=== Update Statistics ===");
            eprintln!("Submitted IDs:   {}", stats.total);
            eprintln!("Current:         {}", stats.current);
            eprintln!("Updated:         {}", stats.updated);
            eprintln!("Unknown:         {}", stats.unknown);
        }

        Commands::LookupSymbols { symbols, synonyms, output } => {
            let table = SymbolTable::from_file(&synonyms)
                .with_context(|| format!("Failed to load synonym table {}", synonyms.display()))?;
            let reader = open_reader(&symbols)
                .with_context(|| format!("Failed to open symbol list {}", symbols.display()))?;
            let mut writer = create_output(output.as_ref())?;

            let stats = formats::lookup_symbols(reader, &mut writer, &table)?;

            eprintln!("\n=== Lookup Statistics ===");
            eprintln!("Submitted:       {}", stats.total);
            eprintln!("Found:           {}", stats.found);
            eprintln!("Not found:       {}", stats.missing);
        }
    }

    Ok(())
}
