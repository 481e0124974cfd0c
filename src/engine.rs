// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Formatting engine: runs the full pipeline over buffers and files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::{FormatterOptions, LineEndFormat};
use crate::core::resources::{FileType, ResourceTables};
use crate::enhancer::Enhancer;
use crate::formatter::Formatter;
use crate::source::StringIterator;

/// Formatter execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    Check,
    Write,
    Stdout,
}

/// Aggregate formatter run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatterRunSummary {
    pub files_seen: usize,
    pub files_changed: usize,
}

/// Drives `source iterator -> formatter -> beautifier -> enhancer` and
/// joins the emitted lines per the line-end policy.
#[derive(Debug, Clone)]
pub struct FormatterEngine {
    options: FormatterOptions,
}

impl FormatterEngine {
    pub fn new(options: FormatterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatterOptions {
        &self.options
    }

    /// Format an in-memory buffer.
    pub fn format_source(&self, source: &str) -> String {
        self.format_source_as(source, self.options.clone())
    }

    fn format_source_as(&self, source: &str, options: FormatterOptions) -> String {
        if source.is_empty() {
            return String::new();
        }
        let iterator = StringIterator::new(source);
        let eol = match options.line_end {
            LineEndFormat::Default => iterator.dominant_line_ending().as_str(),
            LineEndFormat::Windows => "\r\n",
            LineEndFormat::Linux => "\n",
            LineEndFormat::MacOld => "\r",
        };
        let ends_with_newline = iterator.ends_with_newline();

        let shared_options = Rc::new(options.clone());
        let tables = ResourceTables::for_file_type(options.file_type);
        let mut enhancer = Enhancer::new(Rc::clone(&shared_options), tables);
        let mut formatter = Formatter::new(options, Box::new(iterator));

        let mut out = String::with_capacity(source.len() + source.len() / 8);
        let mut first = true;
        while formatter.has_more_lines() {
            let line = formatter.next_line();
            let line = if formatter.should_enhance_last_line() {
                enhancer.enhance(
                    &line,
                    formatter.is_in_preprocessor_line(),
                    formatter.is_in_sql_block(),
                )
            } else {
                line
            };
            if !first {
                out.push_str(eol);
            }
            first = false;
            out.push_str(&line);
        }
        if ends_with_newline && !out.is_empty() {
            out.push_str(eol);
        }

        debug_assert!(
            formatter.is_stream_consistent(),
            "non-whitespace checksum or scope stacks diverged"
        );
        out
    }

    /// Format one file to a string, picking the language from the
    /// extension when it is recognized.
    pub fn format_path_to_string(&self, path: &Path) -> io::Result<String> {
        let input = fs::read_to_string(path)?;
        Ok(self.format_source_as(&input, self.options_for_path(path)))
    }

    fn options_for_path(&self, path: &Path) -> FormatterOptions {
        let mut options = self.options.clone();
        if let Some(file_type) = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(FileType::from_extension)
        {
            options.file_type = file_type;
        }
        options
    }

    /// Format a list of files per the run mode.
    pub fn run_paths(
        &self,
        paths: &[PathBuf],
        mode: FormatMode,
    ) -> io::Result<FormatterRunSummary> {
        let mut summary = FormatterRunSummary::default();
        for path in paths {
            summary.files_seen += 1;
            let input = fs::read_to_string(path)?;
            let output = self.format_source_as(&input, self.options_for_path(path));
            if output != input {
                summary.files_changed += 1;
                if mode == FormatMode::Write {
                    fs::write(path, output)?;
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::{FormatMode, FormatterEngine};
    use crate::config::{FormatterOptions, LineEndFormat, Style};
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn engine_with(style: Style) -> FormatterEngine {
        FormatterEngine::new(FormatterOptions::default().with_style(style))
    }

    #[test]
    fn format_source_indents_a_function_body() {
        let engine = engine_with(Style::None);
        let output = engine.format_source("void f()\n{\nint x;\n}\n");
        assert_eq!(output, "void f()\n{\n    int x;\n}\n");
    }

    #[test]
    fn format_source_preserves_final_newline_absence() {
        let engine = engine_with(Style::None);
        let output = engine.format_source("int x;");
        assert_eq!(output, "int x;");
    }

    #[test]
    fn line_end_option_rewrites_terminators() {
        let mut options = FormatterOptions::default();
        options.line_end = LineEndFormat::Windows;
        let engine = FormatterEngine::new(options);
        let output = engine.format_source("int x;\nint y;\n");
        assert_eq!(output, "int x;\r\nint y;\r\n");
    }

    #[test]
    fn default_line_end_follows_dominant_input() {
        let engine = engine_with(Style::None);
        let output = engine.format_source("int x;\r\nint y;\r\n");
        assert_eq!(output, "int x;\r\nint y;\r\n");
    }

    #[test]
    fn run_paths_counts_seen_and_changed_for_check_mode() {
        let file = create_temp_file("check-mode", "void f()\n{\nint x;\n}\n");
        let engine = engine_with(Style::None);
        let summary = engine
            .run_paths(std::slice::from_ref(&file), FormatMode::Check)
            .expect("run formatter");
        assert_eq!(summary.files_seen, 1);
        assert_eq!(summary.files_changed, 1);
        // check mode must not rewrite the file
        assert_eq!(
            fs::read_to_string(&file).expect("reread"),
            "void f()\n{\nint x;\n}\n"
        );
    }

    #[test]
    fn run_paths_write_mode_rewrites_changed_files() {
        let file = create_temp_file("write-mode", "void f()\n{\nint x;\n}\n");
        let engine = engine_with(Style::None);
        let summary = engine
            .run_paths(std::slice::from_ref(&file), FormatMode::Write)
            .expect("run formatter");
        assert_eq!(summary.files_changed, 1);
        assert_eq!(
            fs::read_to_string(&file).expect("reread"),
            "void f()\n{\n    int x;\n}\n"
        );
    }

    fn create_temp_file(label: &str, content: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = env::temp_dir().join(format!(
            "braceforge-engine-{label}-{}-{nanos}",
            process::id()
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("sample.cpp");
        fs::write(&path, content).expect("write temp file");
        path
    }
}
