// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use tscribe::app_config::{Config, LogLevel};
use tscribe::dictionary::DictionaryValidator;
use tscribe::line_parser::parse_clock_time;
use tscribe::model::format_timestamp;
use tscribe::playback::PlaybackTracker;
use tscribe::{structural, xml_codec};

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tscribe", about = "Timestamp-aligned transcript tooling", version)]
struct Cli {
    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the blocks and words of a transcript file
    Dump {
        /// Transcript XML file
        #[arg(value_name = "TRANSCRIPT")]
        file: PathBuf,
    },

    /// List words not found in the language dictionary
    Validate {
        /// Transcript XML file
        #[arg(value_name = "TRANSCRIPT")]
        file: PathBuf,
    },

    /// Shift block timestamps over a range and write the file back
    Propagate {
        /// Transcript XML file
        #[arg(value_name = "TRANSCRIPT")]
        file: PathBuf,

        /// Time delta, e.g. "1:05" or "0:01:05.500"
        #[arg(value_name = "DELTA")]
        delta: String,

        /// First block of the range (1-based, inclusive)
        #[arg(long, default_value_t = 1)]
        start: usize,

        /// Last block of the range (1-based, inclusive; defaults to the last block)
        #[arg(long)]
        end: Option<usize>,

        /// Subtract the delta instead of adding it
        #[arg(long)]
        negate: bool,

        /// Write the result here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the playback-active block and word for an elapsed time
    Track {
        /// Transcript XML file
        #[arg(value_name = "TRANSCRIPT")]
        file: PathBuf,

        /// Elapsed playback time, e.g. "12:30" or "0:12:30.250"
        #[arg(value_name = "ELAPSED")]
        elapsed: String,
    },
}

fn load_transcript(path: &PathBuf) -> Result<(tscribe::TranscriptModel, String)> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
    let decoded = xml_codec::decode(&xml)
        .with_context(|| format!("Failed to decode transcript: {}", path.display()))?;
    Ok(decoded)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_file(&cli.config_path)?;
    let log_level = cli
        .log_level
        .map(LogLevel::from)
        .unwrap_or_else(|| config.log_level.clone());
    env_logger::Builder::new()
        .filter_level(log_level.to_level_filter())
        .init();

    match cli.command {
        Commands::Dump { file } => {
            let (model, language) = load_transcript(&file)?;
            if !language.is_empty() {
                println!("Language: {}", language);
            }
            for (i, block) in model.blocks.iter().enumerate() {
                println!(
                    "{:4} [{}] [{}]: {}",
                    i + 1,
                    format_timestamp(block.timestamp),
                    block.speaker,
                    block.text
                );
                for word in &block.words {
                    println!("       [{}] {}", format_timestamp(word.timestamp), word.text);
                }
            }
        }

        Commands::Validate { file } => {
            let (model, language) = load_transcript(&file)?;
            let language = if language.is_empty() {
                config.transcript_language.clone()
            } else {
                language
            };
            let dictionary = DictionaryValidator::load(
                &config.dictionary_dir,
                &config.corrected_words_dir,
                &language,
            );
            let sweep = dictionary.sweep(&model);
            for i in &sweep.invalid_blocks {
                println!("line {}: no timestamp", i + 1);
            }
            for (i, j) in &sweep.invalid_words {
                println!(
                    "line {} word {}: {:?} not in dictionary",
                    i + 1,
                    j + 1,
                    model.blocks[*i].words[*j].text
                );
            }
            if sweep.invalid_blocks.is_empty() && sweep.invalid_words.is_empty() {
                println!("Transcript is clean");
            }
        }

        Commands::Propagate {
            file,
            delta,
            start,
            end,
            negate,
            output,
        } => {
            let (mut model, language) = load_transcript(&file)?;
            let delta = parse_clock_time(&delta);
            let end = end.unwrap_or(model.block_count());
            structural::propagate_time(&mut model, delta, start, end, negate)?;

            let target = output.unwrap_or(file);
            let xml = xml_codec::encode(&model, &language)?;
            std::fs::write(&target, xml)
                .with_context(|| format!("Failed to write transcript: {}", target.display()))?;
            info!("Wrote {}", target.display());
        }

        Commands::Track { file, elapsed } => {
            let (model, _) = load_transcript(&file)?;
            let elapsed = parse_clock_time(&elapsed).context("Failed to parse elapsed time")?;
            let position = PlaybackTracker::scan(&model, elapsed);
            match position.block {
                Some(block) => {
                    println!("active block: {}", block + 1);
                    match position.word {
                        Some(word) => println!("active word: {}", word + 1),
                        None => println!("active word: none"),
                    }
                }
                None => println!("past the last timestamp"),
            }
        }
    }

    Ok(())
}
