// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for braceForge.

use std::fs::OpenOptions;
use std::io::{self, Read, Write};

use clap::Parser;

use braceforge::cli::{validate_cli, Cli, DiagnosticsSinkConfig, OutputFormat};
use braceforge::engine::{FormatMode, FormatterEngine, FormatterRunSummary};

struct DiagnosticsSink {
    writer: Option<Box<dyn Write>>,
}

impl DiagnosticsSink {
    fn from_config(config: &DiagnosticsSinkConfig) -> io::Result<Self> {
        match config {
            DiagnosticsSinkConfig::Disabled => Ok(Self { writer: None }),
            DiagnosticsSinkConfig::Stderr => Ok(Self {
                writer: Some(Box::new(io::stderr())),
            }),
            DiagnosticsSinkConfig::File { path, append } => {
                let mut opts = OpenOptions::new();
                opts.create(true).write(true);
                if *append {
                    opts.append(true);
                } else {
                    opts.truncate(true);
                }
                let file = opts.open(path)?;
                Ok(Self {
                    writer: Some(Box::new(file)),
                })
            }
        }
    }

    fn emit_line(&mut self, line: &str) {
        if let Some(writer) = &mut self.writer {
            let _ = writeln!(writer, "{line}");
        }
    }
}

fn summary_text(summary: &FormatterRunSummary, mode: FormatMode, use_color: bool) -> String {
    let changed = if use_color && summary.files_changed > 0 {
        format!("\x1b[33m{}\x1b[0m", summary.files_changed)
    } else {
        summary.files_changed.to_string()
    };
    let verb = match mode {
        FormatMode::Check => "would change",
        FormatMode::Write => "changed",
        FormatMode::Stdout => "formatted",
    };
    format!(
        "{} of {} files {}",
        changed, summary.files_seen, verb
    )
}

fn summary_json(summary: &FormatterRunSummary, mode: FormatMode) -> String {
    serde_json::json!({
        "files_seen": summary.files_seen,
        "files_changed": summary.files_changed,
        "mode": match mode {
            FormatMode::Check => "check",
            FormatMode::Write => "write",
            FormatMode::Stdout => "stdout",
        },
    })
    .to_string()
}

fn main() {
    let cli = Cli::parse();
    let cli_config = match validate_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut sink = match DiagnosticsSink::from_config(&cli_config.diagnostics_sink) {
        Ok(sink) => sink,
        Err(err) => {
            eprintln!("Failed to open diagnostics sink: {err}");
            std::process::exit(1);
        }
    };

    let use_color = std::env::var("NO_COLOR").is_err();
    let engine = FormatterEngine::new(cli_config.options.clone());

    // no input files: format stdin to stdout
    if cli_config.files.is_empty() {
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            sink.emit_line(&format!("Failed to read stdin: {err}"));
            std::process::exit(1);
        }
        print!("{}", engine.format_source(&input));
        return;
    }

    if cli_config.mode == FormatMode::Stdout {
        for path in &cli_config.files {
            match engine.format_path_to_string(path) {
                Ok(output) => print!("{output}"),
                Err(err) => {
                    sink.emit_line(&format!("{}: {err}", path.display()));
                    std::process::exit(1);
                }
            }
        }
        return;
    }

    match engine.run_paths(&cli_config.files, cli_config.mode) {
        Ok(summary) => {
            if !cli_config.quiet {
                match cli_config.format {
                    OutputFormat::Text => {
                        println!("{}", summary_text(&summary, cli_config.mode, use_color))
                    }
                    OutputFormat::Json => println!("{}", summary_json(&summary, cli_config.mode)),
                }
            }
            if cli_config.mode == FormatMode::Check && summary.files_changed > 0 {
                std::process::exit(1);
            }
        }
        Err(err) => {
            sink.emit_line(&format!("Formatting failed: {err}"));
            std::process::exit(1);
        }
    }
}
