// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Character and line plumbing: cursor advance, line initialization,
//! output assembly, and look-ahead checks.

use super::state::Formatter;
use crate::core::brace_type::BraceType;
use crate::core::chartype::{find_first_not_of_ws, is_whitespace};
use crate::source::PeekStream;

impl Formatter {
    /// Advance the cursor one character, fetching a new line when needed.
    pub(crate) fn get_next_char(&mut self) -> bool {
        self.is_in_line_break = false;
        self.previous_char = self.current_char;

        if !is_whitespace(self.current_char) {
            self.previous_non_ws_char = self.current_char;
            if !self.is_in_comment
                && !self.is_in_line_comment
                && !self.is_in_quote
                && !self.is_immediately_post_comment
                && !self.is_immediately_post_line_comment
                && !self.is_in_preprocessor
                && !self.is_sequence_reached("/*")
                && !self.is_sequence_reached("//")
            {
                self.previous_command_char = self.current_char;
            }
        }

        if self.char_num + 1 < self.current_line.len()
            && (!is_whitespace(self.peek_next_char())
                || self.is_in_comment
                || self.is_in_line_comment)
        {
            self.char_num += 1;
            self.current_char = self.current_line[self.char_num];
            if self.current_char == '\t' && self.options.convert_tabs {
                self.convert_tab_to_spaces();
            }
            return true;
        }

        self.get_next_line(false)
    }

    /// Fetch the next input line and reset per-line state.
    pub(crate) fn get_next_line(&mut self, empty_line_was_deleted: bool) -> bool {
        if !self.source.has_more_lines() {
            self.end_of_code_reached = true;
            return false;
        }
        if self.append_opening_brace {
            // re-read the brace that was moved off the previous line
            self.current_line = vec!['{'];
        } else {
            let line = self.source.next_line(empty_line_was_deleted);
            self.compute_checksum_in(&line);
            self.current_line = line.chars().collect();
        }

        self.line_number += 1;
        if self.end_of_asm_reached {
            self.end_of_asm_reached = false;
            self.is_in_asm_block = false;
            self.is_in_asm = false;
        }
        self.should_keep_line_unbroken = false;
        self.is_in_comment_start_line = false;
        self.is_in_case = false;
        self.is_in_asm_one_line = false;
        self.is_header_in_multi_statement_line = false;
        self.is_in_quote_continuation =
            self.is_in_verbatim_quote || self.have_line_continuation_char;
        self.have_line_continuation_char = false;
        self.is_immediately_post_empty_line = self.line_is_empty;
        self.previous_char = ' ';

        if self.current_line.is_empty() {
            self.current_line = vec![' '];
        }

        if self.method_break_line_num > 0 {
            self.method_break_line_num -= 1;
        }
        if self.method_attach_line_num > 0 {
            self.method_attach_line_num -= 1;
        }

        // break a new line unless this is the first line of the file
        if !self.is_virgin {
            self.is_in_line_break = true;
        } else {
            self.is_virgin = false;
        }

        if self.is_immediately_post_non_in_stmt {
            self.is_char_immediately_post_non_in_stmt = true;
            self.is_immediately_post_non_in_stmt = false;
        }

        // a blank line after a '\' ends the preprocessor statement
        self.is_immediately_post_preprocessor = self.is_in_preprocessor;
        if !self.is_in_comment
            && (self.previous_non_ws_char != '\\' || self.is_empty_line(&self.current_line))
        {
            self.is_in_preprocessor = false;
            self.is_in_preprocessor_define_def = false;
        }

        if self.passed_semicolon {
            self.is_in_exec_sql = false;
        }
        self.init_new_line();

        self.current_char = self.current_line[self.char_num];
        if self.is_in_brace_run_in && self.previous_non_ws_char == '{' && !self.is_in_comment {
            self.is_in_line_break = false;
        }
        self.is_in_brace_run_in = false;

        if self.current_char == '\t' && self.options.convert_tabs {
            self.convert_tab_to_spaces();
        }

        // an empty line inside a command brace may be deleted
        if self.options.delete_empty_lines
            && self.line_is_empty
            && self.top_brace_type().intersects(BraceType::COMMAND)
        {
            if !self.options.break_blocks
                || self.previous_non_ws_char == '{'
                || !self.comment_and_header_follows()
            {
                self.is_in_preprocessor = self.is_immediately_post_preprocessor;
                self.line_is_empty = false;
                return self.get_next_line(true);
            }
        }
        true
    }

    /// Jump over the leading whitespace of the new line unless it opens a
    /// comment continuation or an unindented preprocessor definition.
    pub(crate) fn init_new_line(&mut self) {
        let len = self.current_line.len();
        let tab_size = self.options.tab_length();
        self.char_num = 0;

        if self.is_in_quote_continuation
            || (self.is_in_preprocessor && !self.options.preproc_define_indent)
        {
            return;
        }

        if self.is_in_exec_sql {
            // replace leading tabs so continuation indent is in spaces
            let mut i = 0usize;
            while i < self.current_line.len() {
                if !is_whitespace(self.current_line[i]) {
                    break;
                }
                if self.current_line[i] == '\t' {
                    let num_spaces = tab_size - (i % tab_size);
                    self.current_line.splice(i..=i, std::iter::repeat(' ').take(num_spaces));
                    i += num_spaces;
                } else {
                    i += 1;
                }
            }
            self.trim_continuation_line();
            return;
        }

        if self.is_in_comment {
            if self.no_trim_comment_continuation {
                self.leading_spaces = 0;
                self.tab_increment_in = 0;
            }
            self.trim_continuation_line();
            return;
        }

        self.is_immediately_post_comment_only =
            self.line_is_line_comment_only || self.line_ends_in_comment_only;
        self.line_is_comment_only = false;
        self.line_is_line_comment_only = false;
        self.line_ends_in_comment_only = false;
        self.does_line_start_comment = false;
        self.current_line_begins_with_brace = false;
        self.line_is_empty = false;
        self.current_line_first_brace_num = None;
        self.tab_increment_in = 0;

        while is_whitespace(self.current_line[self.char_num]) && self.char_num + 1 < len {
            if self.current_line[self.char_num] == '\t'
                && (!self.is_in_preprocessor || self.is_in_preprocessor_define_def)
            {
                self.tab_increment_in += tab_size as i32
                    - 1
                    - ((self.tab_increment_in + self.char_num as i32) % tab_size as i32);
            }
            self.char_num += 1;
        }
        self.leading_spaces = self.char_num + self.tab_increment_in as usize;

        if self.is_sequence_reached("/*") {
            self.does_line_start_comment = true;
            if self.find_substring(self.char_num + 2, "*/").is_some() {
                self.line_is_comment_only = true;
            }
        } else if self.is_sequence_reached("//") {
            self.line_is_line_comment_only = true;
        } else if self.is_sequence_reached("{") {
            self.current_line_begins_with_brace = true;
            self.current_line_first_brace_num = Some(self.char_num);
            if let Some(first_text) = find_first_not_of_ws(&self.current_line, self.char_num + 1)
            {
                if self.sequence_at(first_text, "//") {
                    self.line_is_line_comment_only = true;
                } else if self.sequence_at(first_text, "/*")
                    || self.is_exec_sql_at(first_text)
                {
                    // get the extra adjustment
                    let mut j = self.char_num + 1;
                    while j < first_text && is_whitespace(self.current_line[j]) {
                        if self.current_line[j] == '\t' {
                            self.tab_increment_in += tab_size as i32
                                - 1
                                - ((self.tab_increment_in + j as i32) % tab_size as i32);
                        }
                        j += 1;
                    }
                    self.leading_spaces = j + self.tab_increment_in as usize;
                    if self.sequence_at(first_text, "/*") {
                        self.does_line_start_comment = true;
                    }
                }
            }
        } else if is_whitespace(self.current_line[self.char_num])
            && self.char_num + 1 >= self.current_line.len()
        {
            self.line_is_empty = true;
        }

        // an indented preprocessor definition stays put
        if self.is_in_preprocessor {
            if !self.does_line_start_comment {
                self.leading_spaces = 0;
            }
            self.char_num = 0;
        }
    }

    /// Trim a comment or SQL continuation line relative to its opener.
    pub(crate) fn trim_continuation_line(&mut self) {
        let len = self.current_line.len();
        let tab_size = self.options.tab_length();
        self.char_num = 0;

        if self.leading_spaces > 0 && len > 0 {
            let mut i = 0usize;
            let mut tab_increment = 0usize;
            while i < len && (self.current_line[i] == ' ' || self.current_line[i] == '\t') {
                if self.current_line[i] == '\t' {
                    tab_increment += tab_size - 1 - ((tab_increment + i) % tab_size);
                }
                if i + tab_increment >= self.leading_spaces {
                    break;
                }
                i += 1;
            }
            if i > 0 {
                // preserve relative indentation beyond the opener column
                self.current_line.drain(..i.min(len));
            }
            if self.current_line.is_empty() {
                self.current_line = vec![' '];
            }
        }
    }

    pub(crate) fn append_current_char(&mut self, can_break_line: bool) {
        self.append_char(self.current_char, can_break_line);
    }

    /// Append one character, updating split points.
    pub(crate) fn append_char(&mut self, ch: char, can_break_line: bool) {
        if can_break_line && self.is_in_line_break {
            self.break_line(false);
        }
        self.formatted_line.push(ch);
        self.is_immediately_post_comment_only = false;
        if let Some(max) = self.max_code_length() {
            if self.is_ok_to_split_formatted_line() {
                self.update_formatted_line_split_points(ch);
            }
            if self.formatted_line.len() > max {
                self.test_for_time_to_split_formatted_line();
            }
        }
    }

    /// Append a sequence; split points are not updated.
    pub(crate) fn append_sequence(&mut self, sequence: &str, can_break_line: bool) {
        if can_break_line && self.is_in_line_break {
            self.break_line(false);
        }
        self.formatted_line.extend(sequence.chars());
        if let Some(max) = self.max_code_length() {
            if self.formatted_line.len() > max {
                self.test_for_time_to_split_formatted_line();
            }
        }
    }

    /// Append an operator sequence, updating operator split points.
    pub(crate) fn append_operator(&mut self, sequence: &str, can_break_line: bool) {
        if can_break_line && self.is_in_line_break {
            self.break_line(false);
        }
        self.formatted_line.extend(sequence.chars());
        if let Some(max) = self.max_code_length() {
            if self.is_ok_to_split_formatted_line() {
                self.update_formatted_line_split_points_operator(sequence);
            }
            if self.formatted_line.len() > max {
                self.test_for_time_to_split_formatted_line();
            }
        }
    }

    /// Append a space unless the formatted line already ends in whitespace.
    pub(crate) fn append_space_pad(&mut self) {
        if let Some(&last) = self.formatted_line.last() {
            if !is_whitespace(last) {
                self.formatted_line.push(' ');
                self.space_pad_num += 1;
                if let Some(max) = self.max_code_length() {
                    if self.is_ok_to_split_formatted_line() {
                        self.update_formatted_line_split_points(' ');
                    }
                    if self.formatted_line.len() > max {
                        self.test_for_time_to_split_formatted_line();
                    }
                }
            }
        }
    }

    /// Append a space unless the next source character is whitespace.
    pub(crate) fn append_space_after(&mut self) {
        if self.char_num + 1 < self.current_line.len()
            && !is_whitespace(self.current_line[self.char_num + 1])
        {
            self.formatted_line.push(' ');
            self.space_pad_num += 1;
            if let Some(max) = self.max_code_length() {
                if self.is_ok_to_split_formatted_line() {
                    self.update_formatted_line_split_points(' ');
                }
                if self.formatted_line.len() > max {
                    self.test_for_time_to_split_formatted_line();
                }
            }
        }
    }

    /// Register a line break: the formatted line becomes the ready line.
    pub(crate) fn break_line(&mut self, is_split_line: bool) {
        self.is_line_ready = true;
        self.is_in_line_break = false;
        self.space_pad_num = self.next_line_space_pad_num;
        self.next_line_space_pad_num = 0;
        self.ready_formatted_line = self.formatted_line.iter().collect();
        self.formatted_line.clear();
        self.prepend_empty_line = self.is_prepend_post_block_empty_line_requested;

        if !is_split_line {
            self.formatted_line_comment_num = None;
            self.clear_formatted_line_split_points();

            if self.is_append_post_block_empty_line_requested {
                self.is_append_post_block_empty_line_requested = false;
                self.is_prepend_post_block_empty_line_requested = true;
            } else {
                self.is_prepend_post_block_empty_line_requested = false;
            }
        }
    }

    pub(crate) fn go_forward(&mut self, count: usize) {
        for _ in 0..count {
            self.get_next_char();
        }
    }

    /// Next non-whitespace character on the current line, or a space.
    pub(crate) fn peek_next_char(&self) -> char {
        crate::core::chartype::peek_next_char(&self.current_line, self.char_num)
    }

    /// True when only a block comment follows on this line.
    pub(crate) fn is_before_comment(&self) -> bool {
        match find_first_not_of_ws(&self.current_line, self.char_num + 1) {
            Some(pos) => self.sequence_at(pos, "/*"),
            None => false,
        }
    }

    /// True when only a comment of either kind follows on this line.
    pub(crate) fn is_before_any_comment(&self) -> bool {
        match find_first_not_of_ws(&self.current_line, self.char_num + 1) {
            Some(pos) => self.sequence_at(pos, "/*") || self.sequence_at(pos, "//"),
            None => false,
        }
    }

    /// True when a line-end comment follows `start_pos`.
    pub(crate) fn is_before_any_line_end_comment(&self, start_pos: usize) -> bool {
        match find_first_not_of_ws(&self.current_line, start_pos + 1) {
            Some(pos) => {
                if self.sequence_at(pos, "//") {
                    true
                } else if self.sequence_at(pos, "/*") {
                    // a block comment counts when it ends the line
                    match self.find_substring(pos + 2, "*/") {
                        Some(end) => find_first_not_of_ws(&self.current_line, end + 2).is_none(),
                        None => false,
                    }
                } else {
                    false
                }
            }
            None => false,
        }
    }

    pub(crate) fn is_sequence_reached(&self, sequence: &str) -> bool {
        self.sequence_at(self.char_num, sequence)
    }

    pub(crate) fn sequence_at(&self, pos: usize, sequence: &str) -> bool {
        crate::core::chartype::char_starts_with(&self.current_line, pos, sequence)
    }

    pub(crate) fn find_substring(&self, from: usize, needle: &str) -> Option<usize> {
        let needle_chars: Vec<char> = needle.chars().collect();
        if from >= self.current_line.len() {
            return None;
        }
        (from..=self.current_line.len().saturating_sub(needle_chars.len()))
            .find(|&pos| self.current_line[pos..pos + needle_chars.len()] == needle_chars[..])
    }

    pub(crate) fn is_empty_line(&self, line: &[char]) -> bool {
        find_first_not_of_ws(line, 0).is_none()
    }

    /// Replace the tab under the cursor by spaces up to the next tab stop.
    pub(crate) fn convert_tab_to_spaces(&mut self) {
        if self.is_in_quote || self.is_in_quote_continuation {
            return;
        }
        let tab_size = self.options.tab_length();
        let num_spaces =
            tab_size - ((self.tab_increment_in as usize + self.char_num) % tab_size);
        self.current_line
            .splice(self.char_num..=self.char_num, std::iter::repeat(' ').take(num_spaces));
        self.current_char = self.current_line[self.char_num];
    }

    pub(crate) fn compute_checksum_in(&mut self, line: &str) {
        for ch in line.chars() {
            if !is_whitespace(ch) {
                self.checksum_in += ch as u64;
            }
        }
    }

    pub(crate) fn compute_checksum_out(&mut self, line: &str) {
        for ch in line.chars() {
            if !is_whitespace(ch) {
                self.checksum_out += ch as u64;
            }
        }
    }

    pub(crate) fn adjust_checksum_in(&mut self, delta: i64) {
        self.checksum_in = self.checksum_in.wrapping_add_signed(delta);
    }

    /// First non-blank, non-comment text at or after the cursor, peeking
    /// into following lines; the peek position rewinds on return.
    pub(crate) fn peek_next_text(&mut self, first_line: &str, end_on_empty_line: bool) -> String {
        let mut stream = PeekStream::new(&mut *self.source);
        peek_next_text_in(&mut stream, first_line, end_on_empty_line)
    }

    /// For delete-empty-lines with break-blocks: does a comment follow, and
    /// after it a closing header that will re-break the line anyway?
    pub(crate) fn comment_and_header_follows(&mut self) -> bool {
        let tables = std::rc::Rc::clone(&self.tables);
        let break_closing_blocks = self.options.break_closing_header_blocks;
        let mut stream = PeekStream::new(&mut *self.source);
        let Some(next_line) = stream.peek_next_line() else {
            return false;
        };
        let chars: Vec<char> = next_line.chars().collect();
        let Some(first_char) = find_first_not_of_ws(&chars, 0) else {
            return false;
        };
        if !crate::core::chartype::char_starts_with(&chars, first_char, "//")
            && !crate::core::chartype::char_starts_with(&chars, first_char, "/*")
        {
            return false;
        }
        let next_text = peek_next_text_in(&mut stream, &next_line, false);
        let text_chars: Vec<char> = next_text.chars().collect();
        if text_chars.is_empty() {
            return false;
        }
        let Some(header) = tables.find_header(&text_chars, 0, &tables.headers) else {
            return false;
        };
        if !header.is_closing_header() {
            return false;
        }
        // a closing-header break will restore the empty line itself
        !break_closing_blocks
    }
}

fn peek_next_text_in(
    stream: &mut PeekStream<'_>,
    first_line: &str,
    end_on_empty_line: bool,
) -> String {
    let mut is_first_line = true;
    let mut next_line: String = first_line.to_string();
    let mut in_comment = false;

    loop {
        if is_first_line {
            is_first_line = false;
        } else {
            match stream.peek_next_line() {
                Some(line) => next_line = line,
                None => return String::new(),
            }
        }

        let chars: Vec<char> = next_line.chars().collect();
        let Some(mut first_char) = find_first_not_of_ws(&chars, 0) else {
            if end_on_empty_line && !in_comment {
                return String::new();
            }
            continue;
        };

        if crate::core::chartype::char_starts_with(&chars, first_char, "/*") {
            first_char += 2;
            in_comment = true;
        }

        if in_comment {
            let close = (first_char..chars.len().saturating_sub(1))
                .find(|&p| chars[p] == '*' && chars[p + 1] == '/');
            let Some(close) = close else {
                continue;
            };
            in_comment = false;
            let Some(next) = find_first_not_of_ws(&chars, close + 2) else {
                continue;
            };
            first_char = next;
        }

        if crate::core::chartype::char_starts_with(&chars, first_char, "//") {
            continue;
        }

        return chars[first_char..].iter().collect();
    }
}
