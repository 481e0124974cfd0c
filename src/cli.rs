// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{
    parse_indent_kind, FormatterOptions, LineEndFormat, PointerAlign, ReferenceAlign, Style,
};
use crate::core::resources::FileType;
use crate::engine::FormatMode;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Source-code beautifier for brace-delimited C-family languages \
(C, C++, Objective-C, C#, Java).

Files are re-indented and re-spaced per the selected style and options.
Without --check or --write the formatted source is written to stdout;
with no input files, stdin is formatted to stdout. Options may also be
set in a .braceforge.toml file passed with --options; command-line flags
override file settings.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "braceForge",
    version = VERSION,
    about = "Beautifier for C/C++/Objective-C/C#/Java source",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select run summary output format. text is default; json enables machine-readable output."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Suppress the run summary for successful runs. Errors are still reported."
    )]
    pub quiet: bool,
    #[arg(
        short = 'E',
        long = "error",
        value_name = "FILE",
        long_help = "Write diagnostics to FILE instead of stderr."
    )]
    pub error_file: Option<PathBuf>,
    #[arg(
        long = "error-append",
        action = ArgAction::SetTrue,
        requires = "error_file",
        long_help = "Append diagnostics to --error FILE instead of truncating it."
    )]
    pub error_append: bool,
    #[arg(
        long = "no-error",
        action = ArgAction::SetTrue,
        conflicts_with_all = ["error_file", "error_append"],
        long_help = "Disable all diagnostic output routing."
    )]
    pub no_error: bool,
    #[arg(
        long = "check",
        action = ArgAction::SetTrue,
        conflicts_with = "write",
        long_help = "Report which files would change without rewriting them. Exits non-zero when changes are needed."
    )]
    pub check: bool,
    #[arg(
        long = "write",
        action = ArgAction::SetTrue,
        long_help = "Rewrite changed files in place."
    )]
    pub write: bool,
    #[arg(
        long = "options",
        value_name = "FILE",
        long_help = "Read options from FILE (.braceforge.toml format) before applying command-line flags."
    )]
    pub options_file: Option<PathBuf>,
    #[arg(
        long = "style",
        value_name = "NAME",
        long_help = "Formatting style preset: allman, java, kr, stroustrup, whitesmith, vtk, ratliff, gnu, linux, horstmann, 1tbs, google, mozilla, webkit, pico, lisp."
    )]
    pub style: Option<String>,
    #[arg(
        long = "mode",
        value_name = "LANG",
        long_help = "Source language when it cannot be taken from the file extension: c (C/C++/Objective-C), java, or cs."
    )]
    pub mode: Option<String>,
    #[arg(
        short = 's',
        long = "indent",
        value_name = "TYPE[=N]",
        long_help = "Indentation unit: spaces=N, tab=N, or force-tab=N. N is the indent width, 2 to 20; default spaces=4."
    )]
    pub indent: Option<String>,
    #[arg(
        long = "continuation-indent",
        value_name = "N",
        long_help = "Continuation indent in indent units for statements continued across lines."
    )]
    pub continuation_indent: Option<usize>,
    #[arg(
        long = "max-continuation-indent",
        value_name = "N",
        long_help = "Column cap for continuation indents. Once hit, continuation lines indent by two indent units."
    )]
    pub max_continuation_indent: Option<usize>,
    #[arg(long = "indent-classes", action = ArgAction::SetTrue,
        long_help = "Indent class and struct bodies an extra level.")]
    pub indent_classes: bool,
    #[arg(long = "indent-modifiers", action = ArgAction::SetTrue,
        long_help = "Indent class access modifiers one half indent.")]
    pub indent_modifiers: bool,
    #[arg(long = "indent-switches", action = ArgAction::SetTrue,
        long_help = "Indent switch bodies an extra level.")]
    pub indent_switches: bool,
    #[arg(long = "indent-cases", action = ArgAction::SetTrue,
        long_help = "Indent case statement bodies an extra level.")]
    pub indent_cases: bool,
    #[arg(long = "indent-namespaces", action = ArgAction::SetTrue,
        long_help = "Indent namespace and module bodies.")]
    pub indent_namespaces: bool,
    #[arg(long = "indent-labels", action = ArgAction::SetTrue,
        long_help = "Indent goto labels one indent less than the current level instead of flushing left.")]
    pub indent_labels: bool,
    #[arg(long = "indent-preproc-block", action = ArgAction::SetTrue,
        long_help = "Indent top-level preprocessor #if blocks that contain no braces or unmatched parens.")]
    pub indent_preproc_block: bool,
    #[arg(long = "indent-preproc-define", action = ArgAction::SetTrue,
        long_help = "Indent the continuation lines of multi-line #define statements.")]
    pub indent_preproc_define: bool,
    #[arg(long = "indent-preproc-cond", action = ArgAction::SetTrue,
        long_help = "Indent preprocessor conditionals to the current source level.")]
    pub indent_preproc_cond: bool,
    #[arg(long = "indent-col1-comments", action = ArgAction::SetTrue,
        long_help = "Indent line comments that start in column one.")]
    pub indent_col1_comments: bool,
    #[arg(long = "indent-after-parens", action = ArgAction::SetTrue,
        long_help = "Indent continuation lines after an open paren by the continuation indent instead of aligning past the paren.")]
    pub indent_after_parens: bool,
    #[arg(short = 'p', long = "pad-oper", action = ArgAction::SetTrue,
        long_help = "Pad operators with a space on each side.")]
    pub pad_oper: bool,
    #[arg(long = "pad-comma", action = ArgAction::SetTrue,
        long_help = "Pad commas with a trailing space.")]
    pub pad_comma: bool,
    #[arg(long = "pad-paren-out", action = ArgAction::SetTrue,
        long_help = "Pad parens on the outside only.")]
    pub pad_paren_out: bool,
    #[arg(long = "pad-paren-in", action = ArgAction::SetTrue,
        long_help = "Pad parens on the inside only.")]
    pub pad_paren_in: bool,
    #[arg(long = "pad-first-paren-out", action = ArgAction::SetTrue,
        long_help = "Pad the first paren in a series on the outside only.")]
    pub pad_first_paren_out: bool,
    #[arg(short = 'H', long = "pad-header", action = ArgAction::SetTrue,
        long_help = "Pad a space between a header (if, for, while...) and the following paren.")]
    pub pad_header: bool,
    #[arg(short = 'U', long = "unpad-paren", action = ArgAction::SetTrue,
        long_help = "Remove unrequested space padding around parens.")]
    pub unpad_paren: bool,
    #[arg(long = "align-pointer", value_name = "POS",
        long_help = "Attach pointer operators to the type, middle, or name.")]
    pub align_pointer: Option<String>,
    #[arg(long = "align-reference", value_name = "POS",
        long_help = "Attach reference operators to the type, middle, or name; defaults to the pointer setting.")]
    pub align_reference: Option<String>,
    #[arg(long = "braces", value_name = "MODE",
        long_help = "Brace placement when no style preset is given: attach, break, linux, or run-in.")]
    pub braces: Option<String>,
    #[arg(long = "attach-closing-brace", action = ArgAction::SetTrue,
        long_help = "Attach closing braces to the preceding line.")]
    pub attach_closing_brace: bool,
    #[arg(long = "attach-closing-while", action = ArgAction::SetTrue,
        long_help = "Attach the while of a do-while to the closing brace.")]
    pub attach_closing_while: bool,
    #[arg(long = "break-blocks", action = ArgAction::SetTrue,
        long_help = "Insert empty lines around header blocks (if, for, while...).")]
    pub break_blocks: bool,
    #[arg(long = "break-closing-braces", action = ArgAction::SetTrue,
        long_help = "Break closing header braces from else, catch, and while.")]
    pub break_closing_braces: bool,
    #[arg(long = "break-elseifs", action = ArgAction::SetTrue,
        long_help = "Break else-if statements onto separate lines.")]
    pub break_elseifs: bool,
    #[arg(long = "break-one-line-blocks", action = ArgAction::SetTrue,
        long_help = "Break blocks residing completely on one line.")]
    pub break_one_line_blocks: bool,
    #[arg(long = "break-one-line-headers", action = ArgAction::SetTrue,
        long_help = "Break a header from a statement residing on the same line.")]
    pub break_one_line_headers: bool,
    #[arg(long = "break-one-line-statements", action = ArgAction::SetTrue,
        long_help = "Break multiple statements residing on one line.")]
    pub break_one_line_statements: bool,
    #[arg(short = 'j', long = "add-braces", action = ArgAction::SetTrue,
        long_help = "Add braces to unbraced one-line conditional statements.")]
    pub add_braces: bool,
    #[arg(long = "add-one-line-braces", action = ArgAction::SetTrue,
        long_help = "Add one-line braces to unbraced one-line conditional statements.")]
    pub add_one_line_braces: bool,
    #[arg(long = "remove-braces", action = ArgAction::SetTrue,
        long_help = "Remove braces from single-statement conditionals.")]
    pub remove_braces: bool,
    #[arg(short = 'c', long = "convert-tabs", action = ArgAction::SetTrue,
        long_help = "Convert tabs to spaces in the non-indentation part of the line.")]
    pub convert_tabs: bool,
    #[arg(long = "close-templates", action = ArgAction::SetTrue,
        long_help = "Close whitespace between template closing angle brackets.")]
    pub close_templates: bool,
    #[arg(short = 'x', long = "delete-empty-lines", action = ArgAction::SetTrue,
        long_help = "Delete empty lines within functions.")]
    pub delete_empty_lines: bool,
    #[arg(long = "fill-empty-lines", action = ArgAction::SetTrue,
        long_help = "Fill empty lines with the whitespace of the previous line.")]
    pub fill_empty_lines: bool,
    #[arg(long = "max-code-length", value_name = "N",
        long_help = "Break lines exceeding N characters at a preferred split point (50 to 200).")]
    pub max_code_length: Option<usize>,
    #[arg(long = "break-after-logical", action = ArgAction::SetTrue,
        long_help = "With max-code-length, break lines after logical operators instead of before.")]
    pub break_after_logical: bool,
    #[arg(long = "lineend", value_name = "END",
        long_help = "Line terminator for output: windows, linux, or macold. Default keeps the dominant input terminator.")]
    pub lineend: Option<String>,
    #[arg(
        value_name = "FILE",
        action = ArgAction::Append,
        long_help = "Input source files. With no files, stdin is formatted to stdout."
    )]
    pub files: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum DiagnosticsSinkConfig {
    Disabled,
    Stderr,
    File { path: PathBuf, append: bool },
}

#[derive(Debug)]
pub struct CliConfig {
    pub options: FormatterOptions,
    pub mode: FormatMode,
    pub files: Vec<PathBuf>,
    pub diagnostics_sink: DiagnosticsSinkConfig,
    pub quiet: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Resolve the parsed arguments into a runnable configuration.
pub fn validate_cli(cli: &Cli) -> Result<CliConfig, CliError> {
    let mut options = FormatterOptions::default();

    if let Some(path) = &cli.options_file {
        options = options
            .load_from_path(path)
            .map_err(|err| CliError::new(err.to_string()))?;
    }

    if let Some(name) = &cli.style {
        let style = Style::parse(name)
            .ok_or_else(|| CliError::new(format!("unknown style '{name}'")))?;
        options = options.with_style(style);
    }

    if let Some(name) = &cli.mode {
        options.file_type = match name.to_ascii_lowercase().as_str() {
            "c" | "cpp" | "c++" | "objc" => FileType::C,
            "java" => FileType::Java,
            "cs" | "csharp" | "c#" => FileType::Sharp,
            _ => return Err(CliError::new(format!("unknown mode '{name}'"))),
        };
    }

    if let Some(value) = &cli.indent {
        options.indent = parse_indent_kind(value)
            .ok_or_else(|| CliError::new(format!("invalid indent '{value}'")))?;
    }
    if let Some(n) = cli.continuation_indent {
        options.continuation_indent = n;
    }
    if let Some(n) = cli.max_continuation_indent {
        options.max_continuation_indent = n;
    }

    if let Some(name) = &cli.braces {
        options.brace_mode = match name.to_ascii_lowercase().as_str() {
            "attach" => crate::config::BraceMode::Attach,
            "break" => crate::config::BraceMode::Break,
            "linux" => crate::config::BraceMode::Linux,
            "run-in" | "run_in" | "runin" => crate::config::BraceMode::RunIn,
            _ => return Err(CliError::new(format!("invalid brace mode '{name}'"))),
        };
    }

    if let Some(name) = &cli.align_pointer {
        options.pointer_align = match name.to_ascii_lowercase().as_str() {
            "none" => PointerAlign::None,
            "type" => PointerAlign::Type,
            "middle" => PointerAlign::Middle,
            "name" => PointerAlign::Name,
            _ => return Err(CliError::new(format!("invalid pointer alignment '{name}'"))),
        };
    }
    if let Some(name) = &cli.align_reference {
        options.reference_align = match name.to_ascii_lowercase().as_str() {
            "none" => ReferenceAlign::None,
            "type" => ReferenceAlign::Type,
            "middle" => ReferenceAlign::Middle,
            "name" => ReferenceAlign::Name,
            _ => {
                return Err(CliError::new(format!(
                    "invalid reference alignment '{name}'"
                )))
            }
        };
    }

    if let Some(name) = &cli.lineend {
        options.line_end = match name.to_ascii_lowercase().as_str() {
            "windows" | "crlf" => LineEndFormat::Windows,
            "linux" | "lf" => LineEndFormat::Linux,
            "macold" | "cr" => LineEndFormat::MacOld,
            _ => return Err(CliError::new(format!("invalid line end '{name}'"))),
        };
    }

    if let Some(max) = cli.max_code_length {
        if !(50..=200).contains(&max) {
            return Err(CliError::new(format!(
                "max-code-length must be 50 to 200, got {max}"
            )));
        }
        options.max_code_length = Some(max);
    }

    // boolean toggles layer on top of the style preset
    options.class_indent |= cli.indent_classes;
    options.modifier_indent |= cli.indent_modifiers;
    options.switch_indent |= cli.indent_switches;
    options.case_indent |= cli.indent_cases;
    options.namespace_indent |= cli.indent_namespaces;
    options.label_indent |= cli.indent_labels;
    options.indent_preproc_block |= cli.indent_preproc_block;
    options.preproc_define_indent |= cli.indent_preproc_define;
    options.preproc_conditional_indent |= cli.indent_preproc_cond;
    options.indent_col1_comments |= cli.indent_col1_comments;
    options.indent_after_paren |= cli.indent_after_parens;
    options.pad_operators |= cli.pad_oper;
    options.pad_commas |= cli.pad_comma;
    options.pad_parens_outside |= cli.pad_paren_out;
    options.pad_parens_inside |= cli.pad_paren_in;
    options.pad_first_paren_out |= cli.pad_first_paren_out;
    options.pad_header |= cli.pad_header;
    options.unpad_parens |= cli.unpad_paren;
    options.attach_closing_brace |= cli.attach_closing_brace;
    options.attach_closing_while |= cli.attach_closing_while;
    options.break_blocks |= cli.break_blocks;
    options.break_closing_header_braces |= cli.break_closing_braces;
    options.break_else_ifs |= cli.break_elseifs;
    options.break_one_line_blocks |= cli.break_one_line_blocks;
    options.break_one_line_headers |= cli.break_one_line_headers;
    options.break_one_line_statements |= cli.break_one_line_statements;
    options.add_braces |= cli.add_braces;
    options.add_one_line_braces |= cli.add_one_line_braces;
    options.remove_braces |= cli.remove_braces;
    options.convert_tabs |= cli.convert_tabs;
    options.close_templates |= cli.close_templates;
    options.delete_empty_lines |= cli.delete_empty_lines;
    options.empty_line_fill |= cli.fill_empty_lines;
    options.break_line_after_logical |= cli.break_after_logical;

    if options.add_braces && options.remove_braces {
        return Err(CliError::new(
            "add-braces and remove-braces cannot both be set",
        ));
    }

    let mode = if cli.check {
        FormatMode::Check
    } else if cli.write {
        FormatMode::Write
    } else {
        FormatMode::Stdout
    };

    if cli.files.is_empty() && mode != FormatMode::Stdout {
        return Err(CliError::new("--check and --write require input files"));
    }
    for file in &cli.files {
        if !file.exists() {
            return Err(CliError::new(format!(
                "input file not found: {}",
                file.display()
            )));
        }
    }

    let diagnostics_sink = if cli.no_error {
        DiagnosticsSinkConfig::Disabled
    } else if let Some(path) = &cli.error_file {
        DiagnosticsSinkConfig::File {
            path: path.clone(),
            append: cli.error_append,
        }
    } else {
        DiagnosticsSinkConfig::Stderr
    };

    Ok(CliConfig {
        options,
        mode,
        files: cli.files.clone(),
        diagnostics_sink,
        quiet: cli.quiet,
        format: cli.format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("braceforge").chain(args.iter().copied()))
    }

    #[test]
    fn style_and_toggles_layer_into_options() {
        let cli = parse(&["--style", "kr", "--pad-oper", "--indent", "spaces=2"]);
        let config = validate_cli(&cli).expect("validate");
        assert_eq!(config.options.brace_mode, crate::config::BraceMode::Linux);
        assert!(config.options.pad_operators);
        assert_eq!(config.options.indent_length(), 2);
        assert_eq!(config.mode, FormatMode::Stdout);
    }

    #[test]
    fn unknown_style_is_rejected() {
        let cli = parse(&["--style", "baroque"]);
        let err = validate_cli(&cli).expect_err("must fail");
        assert!(err.to_string().contains("unknown style 'baroque'"));
    }

    #[test]
    fn check_without_files_is_rejected() {
        let cli = parse(&["--check"]);
        let err = validate_cli(&cli).expect_err("must fail");
        assert!(err.to_string().contains("require input files"));
    }

    #[test]
    fn max_code_length_range_is_enforced() {
        let cli = parse(&["--max-code-length", "20"]);
        let err = validate_cli(&cli).expect_err("must fail");
        assert!(err.to_string().contains("50 to 200"));
    }

    #[test]
    fn conflicting_brace_rewrites_are_rejected() {
        let cli = parse(&["--add-braces", "--remove-braces"]);
        let err = validate_cli(&cli).expect_err("must fail");
        assert!(err.to_string().contains("cannot both be set"));
    }

    #[test]
    fn missing_input_file_is_reported() {
        let cli = parse(&["definitely-not-a-real-file.cpp"]);
        let err = validate_cli(&cli).expect_err("must fail");
        assert!(err.to_string().contains("input file not found"));
    }
}
