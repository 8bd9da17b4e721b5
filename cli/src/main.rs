//! resume-text CLI - PDF résumé text extraction tool

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use resume_text::render::{failure_to_json, to_json};
use resume_text::{
    extract_batch, extract_file_with_options, extract_with_stats, ExtractOptions, Failure,
    JsonFormat,
};

#[derive(Parser)]
#[command(name = "resume-text")]
#[command(version)]
#[command(about = "Extract plain text from PDF résumés", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Flags shared by every extracting command.
#[derive(clap::Args, Clone)]
struct ExtractArgs {
    /// Minimum number of characters a successful extraction must yield
    #[arg(long, value_name = "N", env = "RESUME_TEXT_MIN_CHARS")]
    min_chars: Option<usize>,

    /// Accept files without a %PDF- header
    #[arg(long)]
    lenient: bool,

    /// Skip Unicode NFC normalization
    #[arg(long)]
    no_normalize: bool,
}

impl ExtractArgs {
    fn options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::new().with_unicode_normalization(!self.no_normalize);
        if let Some(chars) = self.min_chars {
            options = options.with_min_text_chars(chars);
        }
        if self.lenient {
            options = options.lenient();
        }
        log::debug!("resolved options: {:?}", options);
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract plain text
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Extract to JSON ({ text, numPages, fileName })
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show extraction statistics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Extract text from many files, writing <stem>.txt for each
    Batch {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Process files one at a time
        #[arg(long)]
        sequential: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Text {
            input,
            output,
            extract,
        }) => cmd_text(&input, output.as_deref(), &extract.options()),
        Some(Commands::Json {
            input,
            output,
            compact,
            extract,
        }) => cmd_json(&input, output.as_deref(), compact, &extract.options()),
        Some(Commands::Info {
            input,
            json,
            extract,
        }) => cmd_info(&input, json, &extract.options()),
        Some(Commands::Batch {
            inputs,
            output,
            sequential,
            extract,
        }) => {
            let mut options = extract.options();
            if sequential {
                options = options.sequential();
            }
            cmd_batch(&inputs, output.as_deref(), &options)
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: print the text if input is provided
            if let Some(input) = cli.input {
                cmd_text(&input, None, &ExtractOptions::default())
            } else {
                println!("{}", "Usage: resume-text <FILE>".yellow());
                println!("       resume-text --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        report(e.as_ref());
        std::process::exit(1);
    }
}

fn report(e: &(dyn std::error::Error + 'static)) {
    eprintln!("{}: {}", "Error".red().bold(), e);
    if let Some(err) = e.downcast_ref::<resume_text::Error>() {
        eprintln!("{}: {}", "Hint".yellow().bold(), err.hint());
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> std::io::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    options: &ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = extract_file_with_options(input, options)?;
    write_or_print(output, &result.text)?;
    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    options: &ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    match extract_file_with_options(input, options) {
        Ok(result) => {
            let json = to_json(&result, format)?;
            write_or_print(output, &json)?;
            Ok(())
        }
        Err(e) => {
            // Failures are machine-readable too; exit non-zero after printing.
            let json = failure_to_json(&e, format)?;
            write_or_print(output, &json)?;
            Err(e.into())
        }
    }
}

fn cmd_info(
    input: &Path,
    as_json: bool,
    options: &ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let (result, stats) = extract_with_stats(&data, &file_name_of(input), options);

    if as_json {
        let mut info = serde_json::json!({
            "fileName": file_name_of(input),
            "stats": stats,
        });
        match &result {
            Ok(extraction) => info["numPages"] = serde_json::json!(extraction.num_pages),
            Err(e) => info["failure"] = serde_json::to_value(Failure::from(e))?,
        }
        println!("{}", serde_json::to_string_pretty(&info)?);
        result?;
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref version) = stats.pdf_version {
        println!("{}: PDF {}", "Format".bold(), version);
    }
    if let Ok(ref extraction) = result {
        println!("{}: {}", "Pages".bold(), extraction.num_pages);
    }
    println!("{}: {}", "Objects".bold(), stats.object_count);

    println!();
    println!("{}", "Streams".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Found".bold(), stats.streams_found);
    println!("{}: {}", "Decoded".bold(), stats.streams_decoded);
    println!("{}: {}", "Ignored".bold(), stats.streams_ignored);
    println!("{}: {}", "Unsupported".bold(), stats.streams_unsupported);
    println!("{}: {}", "Failed".bold(), stats.streams_failed);

    for skipped in &stats.skipped {
        let object = skipped
            .object
            .map(|o| o.to_string())
            .unwrap_or_else(|| format!("@{}", skipped.offset));
        println!("  {} {} {:?}", "└─".dimmed(), object, skipped.reason);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Text blocks".bold(), stats.text_block_count);
    println!("{}: {}", "Fragments".bold(), stats.fragment_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    if result.is_err() {
        println!();
    }
    result?;
    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output: Option<&Path>,
    options: &ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading...");
    let mut paths = Vec::with_capacity(inputs.len());
    let mut documents = Vec::with_capacity(inputs.len());
    let mut failures: Vec<(PathBuf, String)> = Vec::new();
    for input in inputs {
        match fs::read(input) {
            Ok(data) => {
                documents.push((file_name_of(input), data));
                paths.push(input.clone());
            }
            Err(e) => {
                log::warn!("cannot read {}: {}", input.display(), e);
                failures.push((input.clone(), e.to_string()));
            }
        }
        pb.inc(1);
    }

    pb.set_position(0);
    pb.set_length(documents.len() as u64);
    pb.set_message("Extracting...");
    pb.enable_steady_tick(Duration::from_millis(100));
    let results = extract_batch(&documents, options);

    pb.set_message("Writing...");
    let targets = output_paths_for(&paths, &output_dir);
    let mut written = 0;
    for ((input, target), result) in paths.into_iter().zip(targets).zip(results) {
        match result {
            Ok(extraction) => {
                fs::write(&target, &extraction.text)?;
                log::debug!("{} -> {}", input.display(), target.display());
                written += 1;
            }
            Err(e) => {
                log::warn!("extraction failed for {}: {}", input.display(), e);
                failures.push((input, format!("{} ({})", e, e.kind())));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} files extracted",
        "Done!".green().bold(),
        written,
        inputs.len()
    );
    if !failures.is_empty() {
        println!("{}", "Failures:".red().bold());
        for (path, reason) in &failures {
            println!("  {} {}: {}", "└─".dimmed(), path.display(), reason);
        }
        return Err(format!("{} of {} files failed", failures.len(), inputs.len()).into());
    }

    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One `<stem>.txt` per input. Inputs sharing a stem get `<stem>-2.txt`,
/// `<stem>-3.txt` and so on, in input order.
fn output_paths_for(inputs: &[PathBuf], output_dir: &Path) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            let mut name = format!("{}.txt", stem);
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}-{}.txt", stem, n);
                n += 1;
            }
            output_dir.join(name)
        })
        .collect()
}

fn cmd_version() {
    println!("{} {}", "resume-text".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF résumé text extraction tool");
    println!();
    println!("License: MIT");
}
