// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Header recognition support and return-type split detection.

use super::state::Formatter;
use crate::core::chartype::{find_first_not_of_ws, is_legal_name_char, is_whitespace};
use crate::core::resources::Header;
use crate::source::PeekStream;

impl Formatter {
    /// Match a header at the cursor from the given list.
    pub(crate) fn find_header_at_cursor(&self, list: &[Header]) -> Option<Header> {
        self.tables.find_header(&self.current_line, self.char_num, list)
    }

    pub(crate) fn is_closing_header(&self, header: Header) -> bool {
        header.is_closing_header()
    }

    /// C# `catch` and `delegate` can be a paren or non-paren header.
    pub(crate) fn is_sharp_style_with_paren(&self, header: Option<Header>) -> bool {
        self.is_sharp_style()
            && self.peek_next_char() == '('
            && matches!(header, Some(Header::Catch | Header::Delegate))
    }

    /// More than one statement on the current line.
    pub(crate) fn is_multi_statement_line(&self) -> bool {
        let mut in_comment = false;
        let mut in_quote = false;
        let mut semi_count = 0i32;
        let mut paren_count = 0i32;
        let mut brace_count = 0i32;

        let mut i = 0usize;
        while i < self.current_line.len() {
            let ch = self.current_line[i];
            if in_comment {
                if self.sequence_at(i, "*/") {
                    in_comment = false;
                    i += 2;
                    continue;
                }
                i += 1;
                continue;
            }
            if self.sequence_at(i, "/*") {
                in_comment = true;
                i += 2;
                continue;
            }
            if self.sequence_at(i, "//") {
                return false;
            }
            if in_quote {
                if ch == '"' || ch == '\'' {
                    in_quote = false;
                }
                i += 1;
                continue;
            }
            if ch == '"' || ch == '\'' {
                in_quote = true;
                i += 1;
                continue;
            }
            if ch == '(' {
                paren_count += 1;
            }
            if ch == ')' {
                paren_count -= 1;
            }
            if paren_count > 0 {
                i += 1;
                continue;
            }
            if ch == '{' {
                brace_count += 1;
            }
            if ch == '}' {
                brace_count -= 1;
            }
            if brace_count > 0 {
                i += 1;
                continue;
            }
            if ch == ';' {
                semi_count += 1;
                if semi_count > 1 {
                    return true;
                }
            }
            i += 1;
        }
        false
    }

    /// Locate the boundary between a return-type declaration and the
    /// function name, recording the break or attach point.
    pub(crate) fn find_return_type_split_point(&mut self) {
        let line = &self.current_line;
        let Some(first) = find_first_not_of_ws(line, 0) else {
            return;
        };

        let mut word_starts: Vec<usize> = Vec::new();
        let mut angle_depth = 0i32;
        let mut open_paren: Option<usize> = None;
        let mut has_assignment = false;
        let mut i = first;
        while i < line.len() {
            let ch = line[i];
            if ch == '<' {
                angle_depth += 1;
                i += 1;
                continue;
            }
            if ch == '>' {
                angle_depth -= 1;
                i += 1;
                continue;
            }
            if angle_depth > 0 {
                i += 1;
                continue;
            }
            if ch == '(' {
                open_paren = Some(i);
                break;
            }
            if ch == '=' {
                has_assignment = true;
                break;
            }
            if ch == ';' || ch == '{' || ch == '"' || ch == '\'' {
                break;
            }
            if self.sequence_at(i, "//") || self.sequence_at(i, "/*") {
                break;
            }
            if self.sequence_at(i, "::") {
                i += 2;
                continue;
            }
            if is_legal_name_char(self.file_type(), ch)
                && (i == first || !is_legal_name_char(self.file_type(), line[i - 1]))
            {
                word_starts.push(i);
                while i < line.len() && is_legal_name_char(self.file_type(), line[i]) {
                    i += 1;
                }
                continue;
            }
            i += 1;
        }
        if has_assignment {
            return;
        }

        match open_paren {
            Some(paren_pos) => {
                // the function name is the last word before the paren; a
                // return type requires at least one word before it
                if word_starts.len() < 2 {
                    return;
                }
                // the operator keyword binds the name to the return type
                let name_start = *word_starts.last().unwrap();
                let prev_word_start = word_starts[word_starts.len() - 2];
                let prev_word: String = line[prev_word_start..]
                    .iter()
                    .take_while(|&&ch| is_legal_name_char(self.file_type(), ch))
                    .collect();
                if prev_word == "operator" {
                    return;
                }
                let is_declaration = self.declaration_semicolon_follows(paren_pos);
                let wants_break = if is_declaration {
                    self.options.break_return_type_decl
                } else {
                    self.options.break_return_type
                };
                if wants_break {
                    self.method_break_char_num = Some(name_start);
                    self.method_break_line_num = 0;
                }
            }
            None => {
                // the line holds only the return type; the name opens the
                // next line and may be attached
                if word_starts.is_empty() {
                    return;
                }
                let next_starts_name = {
                    let mut stream = PeekStream::new(&mut *self.source);
                    match stream.peek_next_line() {
                        Some(next) => {
                            let chars: Vec<char> = next.chars().collect();
                            match find_first_not_of_ws(&chars, 0) {
                                Some(pos) => {
                                    is_legal_name_char(self.tables.file_type, chars[pos])
                                        && chars.iter().any(|&ch| ch == '(')
                                }
                                None => false,
                            }
                        }
                        None => false,
                    }
                };
                if !next_starts_name {
                    return;
                }
                let is_declaration = false;
                let wants_attach = if is_declaration {
                    self.options.attach_return_type_decl
                } else {
                    self.options.attach_return_type || self.options.attach_return_type_decl
                };
                if wants_attach {
                    self.method_attach_char_num = Some(0);
                    self.method_attach_line_num = 1;
                }
            }
        }
    }

    /// A `;` at depth zero after the parameter list marks a declaration.
    fn declaration_semicolon_follows(&self, open_paren: usize) -> bool {
        let line = &self.current_line;
        let mut depth = 0i32;
        let mut i = open_paren;
        while i < line.len() {
            match line[i] {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        let rest = &line[i + 1..];
                        return rest.iter().any(|&ch| ch == ';')
                            && !rest.iter().any(|&ch| ch == '{');
                    }
                }
                _ => {}
            }
            i += 1;
        }
        false
    }

    /// Java `static` followed by `{` begins a static constructor.
    pub(crate) fn check_java_static_constructor(&mut self) {
        if self.is_java_style()
            && crate::core::chartype::is_word_at(
                self.file_type(),
                &self.current_line,
                self.char_num,
                "static",
            )
            && self.is_next_char_opening_brace(self.char_num + 6)
        {
            self.is_java_static_constructor = true;
        }
    }

    /// The keyword under the cursor begins `extern "C"`.
    pub(crate) fn is_extern_c_statement(&self) -> bool {
        let line = &self.current_line;
        let mut pos = self.char_num;
        while pos < line.len() && is_legal_name_char(self.file_type(), line[pos]) {
            pos += 1;
        }
        let Some(start_quote) = find_first_not_of_ws(line, pos) else {
            return false;
        };
        self.sequence_at(start_quote, "\"C\"")
    }

    /// Skip trailing whitespace checks for a one-line `else` pull-up.
    pub(crate) fn next_word_is_else(&self) -> bool {
        let next_word = crate::beautifier::get_next_word(
            self.file_type(),
            &self.current_line,
            self.char_num,
        );
        if next_word != "else" {
            return false;
        }
        match find_first_not_of_ws(&self.current_line, self.char_num + 1) {
            Some(next_text) => {
                let after = next_text + 4;
                after >= self.current_line.len()
                    || is_whitespace(self.current_line[after])
                    || self.current_line[after] == '{'
            }
            None => false,
        }
    }
}
