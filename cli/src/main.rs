//! examseg CLI - exam paper question segmentation tool

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use exam_segmenter::engine::FnSink;
use exam_segmenter::source::{open_path, PageSource};
use exam_segmenter::{
    render, BatchOutcome, JsonFormat, LexiconPreset, Material, ReferenceOptions, SegmentEvent,
    Segmenter, SegmenterConfig,
};

#[derive(Parser)]
#[command(name = "examseg")]
#[command(version)]
#[command(about = "Split exam papers into numbered question JSON", long_about = None)]
struct Cli {
    /// Input paper (PDF, JSON page array or form-feed separated text)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a paper into question JSON
    #[command(alias = "seg")]
    Segment {
        /// Input paper
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Write the full report (window, units, statistics) instead of the unit list
        #[arg(long)]
        report: bool,

        /// Print every engine decision to stderr
        #[arg(long)]
        events: bool,
    },

    /// Show the detected content window
    Window {
        /// Input paper
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the sanitized text stream of the content window
    Clean {
        /// Input paper
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print sanitized reference text for question generation
    Reference {
        /// Input paper
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Keep the first page of the content window
        #[arg(long)]
        keep_first_page: bool,

        /// Stop before the first page containing this phrase ("" reads to the end)
        #[arg(long, default_value = exam_segmenter::engine::DEFAULT_STOP_PHRASE)]
        stop_phrase: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Segment many papers in parallel
    Batch {
        /// Input papers
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print a configuration preset as JSON (template for --config)
    Config {
        /// Lexicon preset
        #[arg(long, value_enum, default_value = "standard")]
        preset: PresetArg,

        /// Answer-key defaults
        #[arg(long)]
        solutions: bool,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Default)]
struct ConfigArgs {
    /// Configuration file (JSON); missing fields take their defaults
    #[arg(long, value_name = "CFG", env = "EXAMSEG_CONFIG")]
    config: Option<PathBuf>,

    /// Treat the input as an answer key (no visual-question filtering)
    #[arg(long)]
    solutions: bool,

    /// Lexicon preset
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Highest accepted top-level question number
    #[arg(long, value_name = "N")]
    max_question: Option<u32>,
}

impl ConfigArgs {
    fn load(&self) -> Result<SegmenterConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => {
                log::debug!("Loading configuration from {}", path.display());
                SegmenterConfig::from_json_file(path)?
            }
            None => SegmenterConfig::default(),
        };
        if let Some(preset) = self.preset {
            config = config.with_preset(preset.into());
        }
        if self.solutions {
            config = config.with_material(Material::Solutions);
        }
        if let Some(max) = self.max_question {
            config = config.with_max_sequence_number(max);
        }
        Ok(config)
    }

    fn segmenter(&self) -> Result<Segmenter, Box<dyn std::error::Error>> {
        Ok(Segmenter::new(self.load()?)?)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    /// Keyword list for the official papers (default)
    Standard,
    /// Wider visual-keyword list for pre-leaving papers
    Broad,
}

impl From<PresetArg> for LexiconPreset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Standard => LexiconPreset::Standard,
            PresetArg::Broad => LexiconPreset::Broad,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Segment {
            input,
            output,
            config,
            compact,
            report,
            events,
        }) => cmd_segment(&input, output.as_deref(), &config, compact, report, events),
        Some(Commands::Window { input, config }) => cmd_window(&input, &config),
        Some(Commands::Clean {
            input,
            output,
            config,
        }) => cmd_clean(&input, output.as_deref(), &config),
        Some(Commands::Reference {
            input,
            output,
            keep_first_page,
            stop_phrase,
            config,
        }) => cmd_reference(
            &input,
            output.as_deref(),
            keep_first_page,
            &stop_phrase,
            &config,
        ),
        Some(Commands::Batch {
            inputs,
            output,
            config,
            compact,
        }) => cmd_batch(&inputs, &output, &config, compact),
        Some(Commands::Config { preset, solutions }) => cmd_config(preset, solutions),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: segment if input is provided
            if let Some(input) = cli.input {
                cmd_segment(
                    &input,
                    cli.output.as_deref(),
                    &ConfigArgs::default(),
                    false,
                    false,
                    false,
                )
            } else {
                println!("{}", "Usage: examseg <FILE> [OUTPUT]".yellow());
                println!("       examseg --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn print_event(event: &SegmentEvent) {
    let line = event.to_string();
    if event.is_anomaly() {
        eprintln!("{} {}", "!".yellow().bold(), line);
    } else if event.is_discard() {
        eprintln!("{} {}", "-".red(), line.dimmed());
    } else {
        eprintln!("{} {}", "·".dimmed(), line.dimmed());
    }
}

fn cmd_segment(
    input: &Path,
    output: Option<&Path>,
    config: &ConfigArgs,
    compact: bool,
    report: bool,
    events: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let segmenter = config.segmenter()?;
    let source = open_path(input)?;

    let result = if events {
        segmenter.segment_with_sink(&*source, &mut FnSink(print_event))
    } else {
        segmenter.segment(&*source)
    };

    let format = json_format(compact);
    let json = if report {
        render::report_to_json(&result, format)?
    } else {
        render::to_json(&result, format)?
    };

    write_or_print(output, &json)?;

    if output.is_some() {
        println!(
            "{} {} kept, {} skipped, window {}",
            "Questions:".cyan().bold(),
            result.len(),
            result.stats.blocks_skipped,
            result.window
        );
    }

    Ok(())
}

fn cmd_window(input: &Path, config: &ConfigArgs) -> Result<(), Box<dyn std::error::Error>> {
    let segmenter = config.segmenter()?;
    let source = open_path(input)?;
    let page_count = source.page_count();
    let window = segmenter.locate_window(&*source);
    let range = window.range(page_count);

    println!("{}", "Content Window".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), page_count);
    println!("{}: {}", "Start page".bold(), window.start + 1);
    match window.end {
        Some(end) => println!("{}: {}", "End page".bold(), end),
        None => println!("{}: {}", "End page".bold(), "none (runs to last page)".dimmed()),
    }
    println!("{}: {}", "Pages in window".bold(), range.len());

    Ok(())
}

fn cmd_clean(
    input: &Path,
    output: Option<&Path>,
    config: &ConfigArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let segmenter = config.segmenter()?;
    let source = open_path(input)?;
    let window = segmenter.locate_window(&*source);
    let stream = segmenter.clean_stream(&*source, &window);
    write_or_print(output, &stream)
}

fn cmd_reference(
    input: &Path,
    output: Option<&Path>,
    keep_first_page: bool,
    stop_phrase: &str,
    config: &ConfigArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let segmenter = config.segmenter()?;
    let source = open_path(input)?;

    let stop_phrase = Some(stop_phrase.to_string()).filter(|p| !p.trim().is_empty());
    let options = ReferenceOptions::new()
        .with_skip_first_content_page(!keep_first_page)
        .with_stop_phrase(stop_phrase);

    let text = segmenter.reference_text(&*source, &options);
    write_or_print(output, &text)
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    config: &ConfigArgs,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let segmenter = config.segmenter()?;
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let outcomes = segmenter.segment_paths_with_progress(inputs, |outcome| {
        pb.set_message(outcome.path.display().to_string());
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    let format = json_format(compact);
    let mut failed = 0;

    let names = output_names(inputs);

    println!("\n{}", "Output files:".green().bold());
    for (outcome, name) in outcomes.iter().zip(&names) {
        let target = output_dir.join(name);
        match write_outcome(outcome, &target, format) {
            Ok(count) => {
                println!(
                    "  {} {} ({} questions)",
                    "├─".dimmed(),
                    target.display(),
                    count
                );
            }
            Err(e) => {
                failed += 1;
                println!(
                    "  {} {}: {}",
                    "├─".dimmed(),
                    outcome.path.display(),
                    e.red()
                );
            }
        }
    }

    let total = exam_segmenter::engine::total_stats(&outcomes);
    println!(
        "\n{} {} files, {} questions kept, {} skipped, {} failed",
        "Done!".green().bold(),
        outcomes.len(),
        total.blocks_accepted - total.blocks_skipped,
        total.blocks_skipped,
        failed
    );

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, outcomes.len()).into());
    }
    Ok(())
}

/// Write one batch outcome as JSON, returning its question count.
///
/// Segmentation and write failures both come back as the error message.
fn write_outcome(
    outcome: &BatchOutcome,
    target: &Path,
    format: JsonFormat,
) -> Result<usize, String> {
    let result = outcome.result.as_ref().map_err(|e| e.to_string())?;
    let json = render::to_json(result, format).map_err(|e| e.to_string())?;
    fs::write(target, json).map_err(|e| format!("{}: {}", target.display(), e))?;
    Ok(result.len())
}

/// JSON file names for batch outputs, one per input, in input order.
///
/// Inputs sharing a file stem get a numeric suffix so no output is overwritten.
fn output_names(inputs: &[PathBuf]) -> Vec<String> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|path| {
            let stem = path.file_stem().unwrap_or_default().to_string_lossy();
            let mut name = format!("{}.json", stem);
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}-{}.json", stem, n);
                n += 1;
            }
            if n > 2 {
                log::warn!(
                    "{} shares its name with another input, writing {}",
                    path.display(),
                    name
                );
            }
            name
        })
        .collect()
}

fn cmd_config(preset: PresetArg, solutions: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = SegmenterConfig::new().with_preset(preset.into());
    if solutions {
        config = config.with_material(Material::Solutions);
    }
    println!("{}", config.to_json()?);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "examseg".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Exam paper question segmentation tool");
    println!();
    println!("License: MIT");
}
