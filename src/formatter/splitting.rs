// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Split-point tracking for max-code-length.
//!
//! Candidate split points are recorded as characters are appended; on
//! overflow the highest-priority candidate at or past the minimum length
//! wins, and the remainder carries into the next formatted line with the
//! offsets rebased.

use super::state::Formatter;
use crate::config::{PointerAlign, ReferenceAlign};
use crate::core::brace_type::BraceType;
use crate::core::chartype::{find_first_not_of_ws, is_legal_name_char, is_whitespace};

impl Formatter {
    pub(crate) fn update_formatted_line_split_points(&mut self, appended_char: char) {
        let Some(max_code_length) = self.max_code_length() else {
            return;
        };
        if self.formatted_line.is_empty() || !self.is_ok_to_split_formatted_line() {
            return;
        }

        let next_char = self.peek_next_char();

        // don't split before an end-of-line comment
        if next_char == '/' {
            return;
        }
        // don't split before or after a brace
        if appended_char == '{'
            || appended_char == '}'
            || self.previous_non_ws_char == '{'
            || self.previous_non_ws_char == '}'
            || next_char == '{'
            || next_char == '}'
            || self.current_char == '{'
            || self.current_char == '}'
        {
            return;
        }
        // don't split before or after a block paren
        if appended_char == '['
            || appended_char == ']'
            || self.previous_non_ws_char == '['
            || next_char == '['
            || next_char == ']'
        {
            return;
        }

        if is_whitespace(appended_char) {
            let ptr_aligns_type = self.options.pointer_align == PointerAlign::Type;
            let ref_aligns_type = self.options.reference_align == ReferenceAlign::Type
                || (self.options.reference_align == ReferenceAlign::SameAsPtr && ptr_aligns_type);
            if next_char != ')'
                && next_char != '('
                && next_char != '/'
                && next_char != ':'
                && self.current_char != ')'
                && self.current_char != '('
                && self.previous_non_ws_char != '('
                && !(next_char == '*'
                    && !is_potential_operator(self.previous_non_ws_char)
                    && ptr_aligns_type)
                && !(next_char == '&'
                    && !is_potential_operator(self.previous_non_ws_char)
                    && ref_aligns_type)
            {
                if self.formatted_line.len() - 1 <= max_code_length {
                    self.max_white_space = self.formatted_line.len() - 1;
                } else {
                    self.max_white_space_pending = self.formatted_line.len() - 1;
                }
            }
        } else if appended_char == ')' {
            // an unpadded closing paren may split after the paren
            if next_char != ')'
                && next_char != ' '
                && next_char != ';'
                && next_char != ','
                && next_char != '.'
                && !(next_char == '-' && self.pointer_symbol_follows())
            {
                if self.formatted_line.len() <= max_code_length {
                    self.max_white_space = self.formatted_line.len();
                } else {
                    self.max_white_space_pending = self.formatted_line.len();
                }
            }
        } else if appended_char == ',' {
            if self.formatted_line.len() <= max_code_length {
                self.max_comma = self.formatted_line.len();
            } else {
                self.max_comma_pending = self.formatted_line.len();
            }
        } else if appended_char == '(' {
            if next_char != ')' && next_char != '(' && next_char != '"' && next_char != '\'' {
                // break before a paren that follows an operator
                let paren_num = if self.previous_non_ws_char != ' '
                    && is_potential_operator(self.previous_non_ws_char)
                {
                    self.formatted_line.len() - 1
                } else {
                    self.formatted_line.len()
                };
                if self.formatted_line.len() <= max_code_length {
                    self.max_paren = paren_num;
                } else {
                    self.max_paren_pending = paren_num;
                }
            }
        } else if appended_char == ';' {
            if next_char != ' ' && next_char != '}' && next_char != '/' {
                if self.formatted_line.len() <= max_code_length {
                    self.max_semi = self.formatted_line.len();
                } else {
                    self.max_semi_pending = self.formatted_line.len();
                }
            }
        }
    }

    pub(crate) fn update_formatted_line_split_points_operator(&mut self, sequence: &str) {
        let Some(max_code_length) = self.max_code_length() else {
            return;
        };
        if self.formatted_line.is_empty() || !self.is_ok_to_split_formatted_line() {
            return;
        }

        let next_char = self.peek_next_char();
        if next_char == '/' {
            return;
        }

        if sequence == "||" || sequence == "&&" || sequence == "or" || sequence == "and" {
            if self.options.break_line_after_logical {
                if self.formatted_line.len() <= max_code_length {
                    self.max_and_or = self.formatted_line.len();
                } else {
                    self.max_and_or_pending = self.formatted_line.len();
                }
            } else {
                // adjust for a leading space in the sequence
                let mut sequence_length = sequence.len();
                if self.formatted_line.len() > sequence_length
                    && is_whitespace(
                        self.formatted_line[self.formatted_line.len() - sequence_length - 1],
                    )
                {
                    sequence_length += 1;
                }
                if self.formatted_line.len() - sequence_length <= max_code_length {
                    self.max_and_or = self.formatted_line.len() - sequence_length;
                } else {
                    self.max_and_or_pending = self.formatted_line.len() - sequence_length;
                }
            }
        } else if sequence == "==" || sequence == "!=" || sequence == ">=" || sequence == "<=" {
            // comparison operators split after the operator
            if self.formatted_line.len() <= max_code_length {
                self.max_white_space = self.formatted_line.len();
            } else {
                self.max_white_space_pending = self.formatted_line.len();
            }
        } else if sequence == "+" || sequence == "-" || sequence == "?" {
            // unpadded operators that split before the operator
            if self.char_num > 0
                && !(sequence == "+" && self.is_in_exponent())
                && !(sequence == "-" && self.is_in_exponent())
                && (is_legal_name_char(self.file_type(), self.current_line[self.char_num - 1])
                    || matches!(self.current_line[self.char_num - 1], ')' | ']' | '"'))
            {
                if self.formatted_line.len() - 1 <= max_code_length {
                    self.max_white_space = self.formatted_line.len() - 1;
                } else {
                    self.max_white_space_pending = self.formatted_line.len() - 1;
                }
            }
        } else if sequence == "=" || sequence == ":" {
            // these usually split after; split before when the line is long
            let split_point = if self.formatted_line.len() < max_code_length {
                self.formatted_line.len()
            } else {
                self.formatted_line.len() - 1
            };
            if self.previous_non_ws_char == ']' {
                if self.formatted_line.len() - 1 <= max_code_length {
                    self.max_white_space = split_point;
                } else {
                    self.max_white_space_pending = split_point;
                }
            } else if self.char_num > 0
                && (is_legal_name_char(self.file_type(), self.current_line[self.char_num - 1])
                    || matches!(self.current_line[self.char_num - 1], ')' | ']'))
            {
                if self.formatted_line.len() <= max_code_length {
                    self.max_white_space = split_point;
                } else {
                    self.max_white_space_pending = split_point;
                }
            }
        }
    }

    pub(crate) fn update_formatted_line_split_points_pointer_or_reference(&mut self, index: usize) {
        let Some(max_code_length) = self.max_code_length() else {
            return;
        };
        if self.formatted_line.is_empty()
            || index >= self.formatted_line.len()
            || !self.is_ok_to_split_formatted_line()
        {
            return;
        }
        if index < self.max_white_space {
            return;
        }
        if index <= max_code_length {
            self.max_white_space = index;
        } else {
            self.max_white_space_pending = index;
        }
    }

    pub(crate) fn is_ok_to_split_formatted_line(&mut self) -> bool {
        if self.should_keep_line_unbroken
            || self.is_in_line_comment
            || self.is_in_comment
            || self.is_in_quote
            || self.is_in_case
            || self.is_in_preprocessor
            || self.is_in_exec_sql
            || self.is_in_asm
            || self.is_in_asm_one_line
            || self.is_in_asm_block
            || self.is_in_template
        {
            return false;
        }

        if !self.is_ok_to_break_block(self.top_brace_type()) && self.current_char != '{' {
            self.should_keep_line_unbroken = true;
            self.clear_formatted_line_split_points();
            return false;
        }
        if self.top_brace_type().intersects(BraceType::ARRAY) {
            self.should_keep_line_unbroken = true;
            if !self.top_brace_type().intersects(BraceType::ARRAY_NIS) {
                self.clear_formatted_line_split_points();
            }
            return false;
        }
        true
    }

    /// Split the formatted line when it exceeds max-code-length.
    pub(crate) fn test_for_time_to_split_formatted_line(&mut self) {
        let Some(max_code_length) = self.max_code_length() else {
            return;
        };
        if self.formatted_line.len() <= max_code_length || self.is_line_ready {
            return;
        }
        let split_point = self.find_formatted_line_split_point();
        if split_point == 0 || split_point >= self.formatted_line.len() {
            return;
        }

        let split_line = self.formatted_line.split_off(split_point);
        self.break_line(true);
        self.formatted_line = split_line;

        // break-blocks on a one-line statement
        let next_word = crate::beautifier::get_next_word(
            self.file_type(),
            &self.current_line,
            self.char_num.saturating_sub(1),
        );
        if self.is_append_post_block_empty_line_requested
            && (next_word == "break" || next_word == "continue")
        {
            self.is_append_post_block_empty_line_requested = false;
            self.is_prepend_post_block_empty_line_requested = true;
        } else {
            self.is_prepend_post_block_empty_line_requested = false;
        }

        // rebase the split points past the split
        let rebase = |value: usize| if value > split_point { value - split_point } else { 0 };
        self.max_and_or = rebase(self.max_and_or);
        self.max_semi = rebase(self.max_semi);
        self.max_comma = rebase(self.max_comma);
        self.max_paren = rebase(self.max_paren);
        self.max_white_space = rebase(self.max_white_space);
        if self.max_semi_pending > 0 {
            self.max_semi = rebase(self.max_semi_pending);
            self.max_semi_pending = 0;
        }
        if self.max_and_or_pending > 0 {
            self.max_and_or = rebase(self.max_and_or_pending);
            self.max_and_or_pending = 0;
        }
        if self.max_comma_pending > 0 {
            self.max_comma = rebase(self.max_comma_pending);
            self.max_comma_pending = 0;
        }
        if self.max_paren_pending > 0 {
            self.max_paren = rebase(self.max_paren_pending);
            self.max_paren_pending = 0;
        }
        if self.max_white_space_pending > 0 {
            self.max_white_space = rebase(self.max_white_space_pending);
            self.max_white_space_pending = 0;
        }

        // never leave an empty formatted line
        match find_first_not_of_ws(&self.formatted_line, 0) {
            None => {
                if !self.formatted_line.is_empty() {
                    self.formatted_line.clear();
                    self.clear_formatted_line_split_points();
                    if is_whitespace(self.current_char) {
                        let mut i = self.char_num + 1;
                        while i < self.current_line.len() && is_whitespace(self.current_line[i]) {
                            self.go_forward(1);
                            i += 1;
                        }
                    }
                }
            }
            Some(first_text) if first_text > 0 => {
                self.formatted_line.drain(..first_text);
                let rebase_text =
                    |value: usize| if value > first_text { value - first_text } else { 0 };
                self.max_semi = rebase_text(self.max_semi);
                self.max_and_or = rebase_text(self.max_and_or);
                self.max_comma = rebase_text(self.max_comma);
                self.max_paren = rebase_text(self.max_paren);
                self.max_white_space = rebase_text(self.max_white_space);
            }
            _ => {}
        }

        if self.formatted_line_comment_num.is_some() {
            let line: String = self.formatted_line.iter().collect();
            self.formatted_line_comment_num =
                line.find("//").or_else(|| line.find("/*"));
        }
    }

    /// Pick the highest-priority split candidate past the minimum length.
    pub(crate) fn find_formatted_line_split_point(&self) -> usize {
        let max_code_length = self.max_code_length().unwrap_or(usize::MAX);
        let min_code_length = self.options.min_code_length();
        let mut split_point = self.max_semi;
        if self.max_and_or >= min_code_length {
            split_point = self.max_and_or;
        }
        if split_point < min_code_length {
            split_point = self.max_white_space;
            if self.max_paren > split_point || self.max_paren * 10 >= max_code_length * 7 {
                split_point = self.max_paren;
            }
            if self.max_comma > split_point || self.max_comma * 10 >= max_code_length * 3 {
                split_point = self.max_comma;
            }
        }
        // fall back to the first pending break point
        if split_point < min_code_length {
            let mut pending = usize::MAX;
            for candidate in [
                self.max_semi_pending,
                self.max_and_or_pending,
                self.max_comma_pending,
                self.max_paren_pending,
                self.max_white_space_pending,
            ] {
                if candidate > 0 && candidate < pending {
                    pending = candidate;
                }
            }
            split_point = if pending == usize::MAX { 0 } else { pending };
        } else if self.formatted_line.len() - split_point > max_code_length {
            // if the remainder after the split is still too long
            let new_char_num = if !is_whitespace(self.current_char)
                && crate::core::chartype::is_char_potential_header(
                    self.file_type(),
                    &self.current_line,
                    self.char_num,
                ) {
                crate::core::chartype::get_current_word(
                    self.file_type(),
                    &self.current_line,
                    self.char_num,
                )
                .len()
                    + self.char_num
            } else {
                self.char_num + 2
            };
            if new_char_num + 1 > self.current_line.len() {
                let mut split_point = split_point;
                if self.max_white_space > split_point + 3 {
                    split_point = self.max_white_space;
                }
                if self.max_paren > split_point {
                    split_point = self.max_paren;
                }
                return split_point;
            }
        }
        split_point
    }

    pub(crate) fn clear_formatted_line_split_points(&mut self) {
        self.max_semi = 0;
        self.max_and_or = 0;
        self.max_comma = 0;
        self.max_paren = 0;
        self.max_white_space = 0;
        self.max_semi_pending = 0;
        self.max_and_or_pending = 0;
        self.max_comma_pending = 0;
        self.max_paren_pending = 0;
        self.max_white_space_pending = 0;
    }

    /// A `->` follows on the current line.
    pub(crate) fn pointer_symbol_follows(&self) -> bool {
        match find_first_not_of_ws(&self.current_line, self.char_num + 1) {
            Some(pos) => self.sequence_at(pos, "->"),
            None => false,
        }
    }
}

fn is_potential_operator(ch: char) -> bool {
    !ch.is_alphanumeric() && !is_whitespace(ch) && ch != '_'
}
