// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Post-indent alignment pass.
//!
//! Runs after the beautifier and adjusts whole-line indentation only: case
//! bodies inside `switch` blocks when `case_indent` is on, and the rows of
//! indentable event-table macros. Non-whitespace text is never changed.

use std::rc::Rc;

use crate::config::FormatterOptions;
use crate::core::chartype::{char_starts_with, is_digit_separator, is_whitespace, is_word_at};
use crate::core::resources::ResourceTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SwitchBlock {
    // brace depth of the switch statement itself; the body is one deeper
    depth: i32,
    body_open: bool,
}

pub struct Enhancer {
    options: Rc<FormatterOptions>,
    tables: Rc<ResourceTables>,
    indent_unit: String,
    is_in_comment: bool,
    is_in_quote: bool,
    quote_char: char,
    brace_depth: i32,
    switch_stack: Vec<SwitchBlock>,
    in_case_body: bool,
    event_table_end: Option<&'static str>,
}

impl Enhancer {
    pub fn new(options: Rc<FormatterOptions>, tables: Rc<ResourceTables>) -> Self {
        let indent_unit = if options.indent.uses_tabs() {
            "\t".to_string()
        } else {
            " ".repeat(options.indent_length())
        };
        Self {
            options,
            tables,
            indent_unit,
            is_in_comment: false,
            is_in_quote: false,
            quote_char: ' ',
            brace_depth: 0,
            switch_stack: Vec::new(),
            in_case_body: false,
            event_table_end: None,
        }
    }

    /// Re-indent one beautified line as needed and return it.
    pub fn enhance(&mut self, line: &str, is_in_preprocessor: bool, is_in_sql: bool) -> String {
        let chars: Vec<char> = line.chars().collect();
        let first_text = (0..chars.len()).find(|&p| !is_whitespace(chars[p]));

        // decide the adjustment before this line's braces update the state
        let mut extra_indents = 0usize;
        let starts_in_comment = self.is_in_comment;

        if let Some(first) = first_text {
            if !is_in_preprocessor && !is_in_sql && !starts_in_comment && chars[first] != '#' {
                if let Some(end_macro) = self.event_table_end {
                    if is_word_at(self.tables.file_type, &chars, first, end_macro) {
                        self.event_table_end = None;
                    } else {
                        extra_indents += 1;
                    }
                } else if let Some((_, end)) = self
                    .tables
                    .indentable_macros
                    .iter()
                    .find(|(begin, _)| is_word_at(self.tables.file_type, &chars, first, begin))
                {
                    self.event_table_end = Some(end);
                }

                if self.options.case_indent {
                    if let Some(switch) = self.switch_stack.last() {
                        if switch.body_open && self.brace_depth == switch.depth + 1 {
                            let is_label = is_word_at(self.tables.file_type, &chars, first, "case")
                                || is_word_at(self.tables.file_type, &chars, first, "default");
                            if is_label {
                                self.in_case_body = true;
                            } else if self.in_case_body
                                && chars[first] != '{'
                                && chars[first] != '}'
                            {
                                extra_indents += 1;
                            }
                        }
                    }
                }
            }
        }

        self.track_line(&chars, is_in_preprocessor, is_in_sql);

        if extra_indents == 0 || first_text.is_none() {
            return line.to_string();
        }
        let mut out = String::with_capacity(line.len() + self.indent_unit.len() * extra_indents);
        for _ in 0..extra_indents {
            out.push_str(&self.indent_unit);
        }
        out.push_str(line);
        out
    }

    /// Update quote/comment/brace/switch state from the line content.
    fn track_line(&mut self, chars: &[char], is_in_preprocessor: bool, is_in_sql: bool) {
        if is_in_preprocessor || is_in_sql {
            return;
        }
        let mut i = 0usize;
        while i < chars.len() {
            let ch = chars[i];
            if self.is_in_comment {
                if char_starts_with(chars, i, "*/") {
                    self.is_in_comment = false;
                    i += 2;
                    continue;
                }
                i += 1;
                continue;
            }
            if self.is_in_quote {
                if ch == '\\' {
                    i += 2;
                    continue;
                }
                if ch == self.quote_char {
                    self.is_in_quote = false;
                }
                i += 1;
                continue;
            }
            if char_starts_with(chars, i, "//") {
                break;
            }
            if char_starts_with(chars, i, "/*") {
                self.is_in_comment = true;
                i += 2;
                continue;
            }
            if ch == '"' || (ch == '\'' && !is_digit_separator(chars, i)) {
                self.is_in_quote = true;
                self.quote_char = ch;
                i += 1;
                continue;
            }
            if is_word_at(self.tables.file_type, chars, i, "switch") {
                self.switch_stack.push(SwitchBlock {
                    depth: self.brace_depth,
                    body_open: false,
                });
                i += 6;
                continue;
            }
            if ch == '{' {
                self.brace_depth += 1;
                if let Some(switch) = self.switch_stack.last_mut() {
                    if !switch.body_open && self.brace_depth == switch.depth + 1 {
                        switch.body_open = true;
                    }
                }
            } else if ch == '}' {
                self.brace_depth -= 1;
                if let Some(switch) = self.switch_stack.last() {
                    if switch.body_open && self.brace_depth <= switch.depth {
                        self.switch_stack.pop();
                        self.in_case_body = false;
                    }
                }
            }
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Enhancer;
    use crate::config::FormatterOptions;
    use crate::core::resources::ResourceTables;
    use std::rc::Rc;

    fn enhancer(options: FormatterOptions) -> Enhancer {
        let tables = ResourceTables::for_file_type(options.file_type);
        Enhancer::new(Rc::new(options), tables)
    }

    fn run(e: &mut Enhancer, lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| e.enhance(line, false, false)).collect()
    }

    #[test]
    fn case_bodies_gain_one_indent_when_requested() {
        let mut options = FormatterOptions::default();
        options.case_indent = true;
        let mut e = enhancer(options);
        let out = run(
            &mut e,
            &[
                "switch (x)",
                "{",
                "case 1:",
                "    y();",
                "    break;",
                "}",
            ],
        );
        assert_eq!(out[2], "case 1:");
        assert_eq!(out[3], "        y();");
        assert_eq!(out[4], "        break;");
        assert_eq!(out[5], "}");
    }

    #[test]
    fn case_bodies_unchanged_by_default() {
        let mut e = enhancer(FormatterOptions::default());
        let out = run(&mut e, &["switch (x)", "{", "case 1:", "    y();", "}"]);
        assert_eq!(out[3], "    y();");
    }

    #[test]
    fn event_table_rows_are_indented() {
        let mut e = enhancer(FormatterOptions::default());
        let out = run(
            &mut e,
            &[
                "BEGIN_EVENT_TABLE(MyFrame, wxFrame)",
                "EVT_MENU(ID_QUIT, MyFrame::OnQuit)",
                "END_EVENT_TABLE()",
            ],
        );
        assert_eq!(out[0], "BEGIN_EVENT_TABLE(MyFrame, wxFrame)");
        assert_eq!(out[1], "    EVT_MENU(ID_QUIT, MyFrame::OnQuit)");
        assert_eq!(out[2], "END_EVENT_TABLE()");
    }

    #[test]
    fn comment_interiors_are_untouched() {
        let mut options = FormatterOptions::default();
        options.case_indent = true;
        let mut e = enhancer(options);
        let out = run(
            &mut e,
            &["switch (x)", "{", "case 1:", "/* long", "comment */", "}"],
        );
        assert_eq!(out[4], "comment */");
    }
}
