use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sortdicom::extract::format_tag;
use sortdicom::logging::{LogConfig, LogFormat, init_logging};
use sortdicom::{FieldMapping, Manifest, SortOptions, SortOutcome, Sorter, UnreadablePolicy};

#[derive(Parser)]
#[command(name = "sortdicom")]
#[command(about = "Flatten nested DICOM folders into metadata-derived, deterministic file names")]
#[command(version)]
struct Cli {
    /// Root directory to scan recursively for .dcm files
    #[arg(value_name = "ROOT", required_unless_present = "list_fields")]
    root: Option<PathBuf>,

    /// Output directory for renamed copies (created if missing). Omit for a dry run
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Comma-separated semantic fields to build names from, in order
    #[arg(short, long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    /// Skip files that cannot be read as DICOM instead of aborting
    #[arg(long)]
    skip_unreadable: bool,

    /// Read headers in parallel (faster for large datasets)
    #[arg(long)]
    parallel: bool,

    /// Write a JSON manifest of the run to this path
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Pretty print the JSON manifest
    #[arg(short, long)]
    pretty: bool,

    /// Show a progress bar while reading headers
    #[arg(long)]
    progress: bool,

    /// Print the available semantic fields and exit
    #[arg(long)]
    list_fields: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format));

    if cli.list_fields {
        print_fields(FieldMapping::standard());
        return Ok(());
    }

    let Some(root) = cli.root.clone() else {
        bail!("missing ROOT directory");
    };

    let mut options = SortOptions::default()
        .with_parallel(cli.parallel)
        .with_unreadable(if cli.skip_unreadable {
            UnreadablePolicy::Skip
        } else {
            UnreadablePolicy::Abort
        });
    if let Some(output) = &cli.output {
        options = options.with_output_dir(output);
    }
    if let Some(fields) = &cli.fields {
        options = options.with_fields(fields.iter().map(|f| f.trim()));
    }

    let mut sorter = Sorter::new(options);
    if cli.progress {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .context("invalid progress bar template")?
                .progress_chars("#>-"),
        );
        sorter = sorter.with_progress(pb);
    }

    let outcome = sorter
        .run(&root)
        .with_context(|| format!("Failed to sort DICOM files under {:?}", root))?;

    if let Some(path) = &cli.manifest {
        Manifest::new(&outcome)
            .write(path, cli.pretty)
            .with_context(|| format!("Failed to write manifest {:?}", path))?;
    }

    print_mapping(&outcome);
    print_summary(&outcome);

    Ok(())
}

fn print_fields(mapping: &FieldMapping) {
    for entry in mapping.entries() {
        let field_tags: Vec<String> = entry.tags.iter().map(|tag| format_tag(*tag)).collect();
        println!("{:<22} {}", entry.name, field_tags.join(" "));
    }
}

fn print_mapping(outcome: &SortOutcome) {
    for entry in &outcome.renamed {
        println!("{}\t{}", entry.source.display(), entry.name);
    }
}

fn print_summary(outcome: &SortOutcome) {
    eprintln!("\nSort Summary:");
    eprintln!("   Total files: {}", outcome.total_files());
    eprintln!("   Renamed: {}", outcome.renamed.len());
    eprintln!("   Skipped: {}", outcome.skipped.len());
    for skipped in &outcome.skipped {
        eprintln!("     - {}: {}", skipped.source.display(), skipped.reason);
    }
    match &outcome.output_dir {
        Some(dir) => eprintln!("   Copied to: {}", dir.display()),
        None => eprintln!("   Dry run, nothing copied"),
    }
}
