use std::fs;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use it_translit::trace_init::init_tracing;
use it_translit::verify::{run_standard, VerifyReport};
use it_translit::{MappingTables, SignMode, Transliterator};

#[derive(Parser)]
#[command(name = "translit", about = "Lossless Cyrillic/Latin transliteration")]
struct Cli {
    /// Path to a custom mapping TOML (replaces the built-in table)
    #[arg(long, global = true)]
    table: Option<String>,
    /// Directory for JSON trace output (requires the `trace` feature)
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transliterate Cyrillic text to Latin
    Encode {
        /// Render soft and hard signs with `q` instead of an apostrophe
        #[arg(long)]
        use_q: bool,
        /// Text to encode; reads lines from stdin when omitted
        text: Vec<String>,
    },

    /// Transliterate Latin text back to Cyrillic
    Decode {
        /// Text to decode; reads lines from stdin when omitted
        text: Vec<String>,
    },

    /// Run the round-trip suites and the reference vectors
    Check {
        /// Longest input length per exhaustive suite
        #[arg(long, default_value = "3")]
        max_len: usize,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print one view of the mapping table
    Table {
        #[arg(long, value_enum, default_value = "forward")]
        view: View,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Forward,
    Q,
    Reverse,
}

/// Apply `f` to each argument, or to each stdin line when there are none.
fn for_each_input(text: &[String], f: impl Fn(&str) -> String) -> Result<(), String> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let write_err = |e: io::Error| format!("Failed to write: {}", e);

    if !text.is_empty() {
        writeln!(out, "{}", f(&text.join(" "))).map_err(write_err)?;
    } else {
        for line in io::stdin().lock().lines() {
            let line = line.map_err(|e| format!("Failed to read line: {}", e))?;
            writeln!(out, "{}", f(&line)).map_err(write_err)?;
        }
    }
    out.flush().map_err(write_err)
}

fn print_report(report: &VerifyReport) {
    println!(
        "Vectors: {} checked, {} failed",
        report.vectors_checked,
        report.vector_failures.len()
    );
    for f in &report.vector_failures {
        println!(
            "  FAIL {:?} (use_q={}): expected {:?}, encoded {:?}, decoded {:?}",
            f.input, f.use_q, f.expected, f.encoded, f.decoded
        );
    }
    for suite in &report.suites {
        println!(
            "Suite {} (len <= {}): {} checked, {} failed",
            suite.alphabet, suite.max_len, suite.checked, suite.failed
        );
        for f in &suite.failures {
            println!(
                "  FAIL {:?} (use_q={}): {:?} -> {:?}",
                f.input, f.use_q, f.encoded, f.decoded
            );
        }
    }
    println!();
    println!(
        "=== {} ===",
        if report.passed() { "PASSED" } else { "FAILED" }
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Held until main returns so the file writer flushes.
    let _trace_guard = init_tracing(cli.log_dir.as_deref().map(Path::new));

    match run(cli) {
        Ok(code) => code,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    if let Some(path) = &cli.table {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read mapping table {}: {}", path, e))?;
        MappingTables::init_custom(content)
            .map_err(|e| format!("Invalid mapping table {}: {}", path, e))?;
    }
    let translit = Transliterator::global();

    match cli.command {
        Command::Encode { use_q, text } => {
            let mode = SignMode::from_use_q(use_q);
            for_each_input(&text, |s| translit.encode(s, mode))?;
        }

        Command::Decode { text } => {
            for_each_input(&text, |s| translit.reverse(s))?;
        }

        Command::Check { max_len, json } => {
            let report = run_standard(&translit, max_len);
            if json {
                let out = serde_json::to_string_pretty(&report)
                    .map_err(|e| format!("JSON serialization failed: {}", e))?;
                println!("{out}");
            } else {
                print_report(&report);
            }
            if !report.passed() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::Table { view } => {
            let tables = translit.tables();
            let table = match view {
                View::Forward => tables.forward(SignMode::Apostrophe),
                View::Q => tables.forward(SignMode::Q),
                View::Reverse => tables.reverse(),
            };
            for len in (1..=table.max_len()).rev() {
                let entries = table.bucket_entries(len);
                if entries.is_empty() {
                    continue;
                }
                println!("# length {len} ({} entries)", entries.len());
                for (key, target) in entries {
                    println!("{key}\t{target}");
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
