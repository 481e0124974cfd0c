// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Operator, comma, paren, and Objective-C padding.

use super::pointers::{get_previous_word, is_numeric_variable};
use super::state::Formatter;
use crate::config::MethodColonPad;
use crate::core::chartype::{
    find_first_not_of_ws, find_last_not_of_ws, is_legal_name_char, peek_next_char,
};
use crate::core::resources::Header;

impl Formatter {
    /// Pad around a recognized operator per the taxonomy of exceptions.
    pub(crate) fn pad_operators(&mut self, new_operator: &str) {
        let next_non_ws_char = peek_next_char(&self.current_line, self.char_num);
        let should_pad = new_operator != "::"
            && new_operator != "++"
            && new_operator != "--"
            && new_operator != "!"
            && new_operator != "~"
            && new_operator != "->"
            && !(new_operator == ":"
                && !self.found_question_mark
                && (self.is_in_objc_method_definition
                    || self.is_in_objc_interface
                    || self.is_in_objc_selector
                    || self.square_bracket_count != 0))
            && !(new_operator == "-" && self.is_in_exponent())
            && !(new_operator == "+" && self.is_in_exponent())
            && !((new_operator == "+" || new_operator == "-")
                && matches!(self.previous_non_ws_char, '(' | '[' | '=' | ',' | ':' | '{'))
            && !(new_operator == "*"
                && (self.previous_non_ws_char == '.' || self.previous_non_ws_char == '>'))
            && !(new_operator == "*" && self.peek_next_char() == '>')
            && !((self.is_in_template || self.is_char_immediately_post_template)
                && (new_operator == "<" || new_operator == ">"))
            && !(new_operator == ">" && self.previous_non_ws_char == '?')
            && !(new_operator == "?"
                && self.is_java_style()
                && (self.previous_non_ws_char == '<'
                    || next_non_ws_char == '>'
                    || next_non_ws_char == '.'))
            && !(new_operator == "?"
                && self.is_sharp_style()
                && (next_non_ws_char == '.' || next_non_ws_char == '['))
            && !self.is_char_immediately_post_operator
            && !self.is_in_case
            && !self.is_in_asm
            && !self.is_in_asm_one_line
            && !self.is_in_asm_block;

        // pad before the operator
        if should_pad
            && !(new_operator == ":"
                && (!self.found_question_mark && !self.is_in_enum)
                && self.current_header != Some(Header::For))
            && !(new_operator == "?"
                && self.is_sharp_style()
                && self
                    .find_substring(self.char_num + 1, ":")
                    .is_none())
        {
            self.append_space_pad();
        }
        self.append_operator(new_operator, true);
        self.go_forward(new_operator.len() - 1);

        self.current_char = new_operator.chars().last().unwrap();
        // pad after the operator, but not after a unary plus or minus
        if should_pad
            && !self.is_before_any_comment()
            && !(new_operator == "+" && self.is_unary_operator())
            && !(new_operator == "-" && self.is_unary_operator())
            && !(self.current_line.get(self.char_num + 1) == Some(&';'))
            && !self.sequence_at(self.char_num + 1, "::")
            && !(self.peek_next_char() == ',')
            && !(new_operator == "?" && self.is_sharp_style() && self.peek_next_char() == '[')
        {
            self.append_space_after();
        }
    }

    /// Add or remove space padding around parens.
    pub(crate) fn pad_parens(&mut self) {
        if self.current_char == '(' {
            let mut spaces_outside_to_delete = self.formatted_line.len() as i32 - 1;

            if self.options.unpad_parens {
                let mut last_char = ' ';
                let mut prev_is_paren_header = false;
                if let Some(i) = find_last_not_of_ws(&self.formatted_line) {
                    if self.formatted_line[i] == '{'
                        || self.is_char_immediately_post_pointer_or_reference
                    {
                        spaces_outside_to_delete = 0;
                    } else {
                        spaces_outside_to_delete -= i as i32;
                        last_char = self.formatted_line[i];
                        let prev_word = get_previous_word(
                            self.file_type(),
                            &self.formatted_line,
                            self.formatted_line.len(),
                        );
                        let prev_chars: Vec<char> = prev_word.chars().collect();
                        let prev_header = if self.options.pad_header && !prev_chars.is_empty() {
                            self.tables.find_header(&prev_chars, 0, &self.tables.headers)
                        } else {
                            None
                        };
                        if prev_header.is_some()
                            || prev_word == "return"
                            || ((prev_word == "new" || prev_word == "delete")
                                && self.options.pad_header)
                            || (self.is_c_style()
                                && prev_word == "throw"
                                && self.options.pad_header)
                            || prev_word == "and"
                            || prev_word == "or"
                            || prev_word == "in"
                            || is_numeric_variable(&prev_word)
                        {
                            prev_is_paren_header = true;
                        }
                    }
                    if self.options.pad_parens_outside || prev_is_paren_header {
                        spaces_outside_to_delete -= 1;
                    } else if matches!(
                        last_char,
                        '|' | '&' | ',' | '<' | '?' | ':' | ';' | '=' | '+' | '-' | '*' | '/'
                            | '%' | '^'
                    ) || (last_char == '(' && self.options.pad_parens_inside)
                        || (last_char == '>' && !self.found_cast_operator)
                    {
                        spaces_outside_to_delete -= 1;
                    }
                    if spaces_outside_to_delete > 0 {
                        let from = i + 1;
                        self.formatted_line
                            .drain(from..from + spaces_outside_to_delete as usize);
                        self.space_pad_num -= spaces_outside_to_delete;
                    }
                }
            }

            // pad open paren outside
            let peeked_char_outside = self.peek_next_char();
            if self.options.pad_first_paren_out
                && self.previous_char != '('
                && peeked_char_outside != ')'
            {
                self.append_space_pad();
            } else if self.options.pad_parens_outside && peeked_char_outside != ')' {
                self.append_space_pad();
            }

            self.append_current_char(true);

            // unpad open paren inside
            if self.options.unpad_parens {
                let mut spaces_inside_to_delete = 0i32;
                if let Some(j) = find_first_not_of_ws(&self.current_line, self.char_num + 1) {
                    spaces_inside_to_delete = (j - self.char_num - 1) as i32;
                }
                if self.options.pad_parens_inside {
                    spaces_inside_to_delete -= 1;
                }
                if spaces_inside_to_delete > 0 {
                    let from = self.char_num + 1;
                    self.current_line
                        .drain(from..from + spaces_inside_to_delete as usize);
                    self.space_pad_num -= spaces_inside_to_delete;
                }
                if self.options.convert_tabs
                    && self.current_line.get(self.char_num + 1) == Some(&'\t')
                {
                    self.current_line[self.char_num + 1] = ' ';
                }
            }

            // pad open paren inside
            if self.options.pad_parens_inside && self.peek_next_char() != ')' {
                self.append_space_after();
            }
        } else if self.current_char == ')' {
            // unpad close paren inside
            if self.options.unpad_parens {
                let mut spaces_inside_to_delete = self.formatted_line.len() as i32;
                if let Some(i) = find_last_not_of_ws(&self.formatted_line) {
                    spaces_inside_to_delete = (self.formatted_line.len() - 1 - i) as i32;
                }
                if self.options.pad_parens_inside {
                    spaces_inside_to_delete -= 1;
                }
                if spaces_inside_to_delete > 0 {
                    let keep = self.formatted_line.len() - spaces_inside_to_delete as usize;
                    self.formatted_line.truncate(keep);
                    self.space_pad_num -= spaces_inside_to_delete;
                }
            }

            // pad close paren inside
            if self.options.pad_parens_inside && !(self.previous_char == '(') {
                self.append_space_pad();
            }

            self.append_current_char(true);

            // pad close paren outside; close parens inside are unchanged
            if self.options.pad_parens_outside {
                let peeked_char_outside = self.peek_next_char();
                if !matches!(peeked_char_outside, ';' | ',' | '.' | '+' | '-' | ']') {
                    self.append_space_after();
                }
            }
        }
    }

    pub(crate) fn is_in_exponent(&self) -> bool {
        if self.char_num >= 2 {
            let prev_prev = self.current_line[self.char_num - 2];
            let prev = self.current_line[self.char_num - 1];
            (prev == 'e' || prev == 'E') && (prev_prev == '.' || prev_prev.is_ascii_digit())
        } else {
            false
        }
    }

    pub(crate) fn is_unary_operator(&self) -> bool {
        // a digit following a C-style cast is unary
        if self.previous_command_char == ')' {
            if !self.peek_next_char().is_ascii_digit() {
                return false;
            }
            let Some(end) = (0..self.char_num).rev().find(|&p| self.current_line[p] == ')')
            else {
                return false;
            };
            let Some(last_char) = find_last_not_of_ws(&self.current_line[..end]) else {
                return false;
            };
            let end = if self.current_line[last_char] == '*' {
                last_char
            } else {
                end
            };
            let prev_word = get_previous_word(self.file_type(), &self.current_line, end);
            return !prev_word.is_empty() && is_numeric_variable(&prev_word);
        }

        (self.is_char_immediately_post_return
            || !is_legal_name_char(self.file_type(), self.previous_command_char))
            && !matches!(self.previous_command_char, '.' | '"' | '\'' | ']')
    }

    /// `*NOPAD*` in a trailing comment disables padding for the line.
    pub(crate) fn is_operator_padding_disabled(&self) -> bool {
        let mut comment_start = self.find_substring(self.char_num, "//");
        if comment_start.is_none() {
            comment_start = self
                .find_substring(self.char_num, "/*")
                .filter(|&start| self.find_substring(start + 2, "*/").is_some());
        }
        let Some(start) = comment_start else {
            return false;
        };
        self.find_substring(start, "*NOPAD*").is_some()
    }

    /// Space padding for the Objective-C method prefix (`-` or `+`).
    pub(crate) fn pad_objc_method_prefix(&mut self) {
        let Some(prefix) = self
            .formatted_line
            .iter()
            .position(|&ch| ch == '+' || ch == '-')
        else {
            return;
        };
        let first_char = find_first_not_of_ws(&self.formatted_line, prefix + 1)
            .unwrap_or(self.formatted_line.len());
        let spaces = first_char - prefix - 1;

        if self.options.pad_method_prefix {
            if spaces == 0 {
                self.formatted_line.insert(prefix + 1, ' ');
                self.space_pad_num += 1;
            } else if spaces > 1 {
                self.formatted_line.drain(prefix + 1..prefix + spaces);
                self.formatted_line[prefix + 1] = ' ';
                self.space_pad_num -= spaces as i32 - 1;
            }
        } else if self.options.unpad_method_prefix && spaces > 0 {
            self.formatted_line.drain(prefix + 1..prefix + 1 + spaces);
            self.space_pad_num -= spaces as i32;
        }
    }

    /// Space padding after the Objective-C return type close paren.
    pub(crate) fn pad_objc_return_type(&mut self) {
        let Some(next_text) = find_first_not_of_ws(&self.current_line, self.char_num + 1) else {
            return;
        };
        let spaces = next_text - self.char_num - 1;

        if self.options.pad_return_type {
            if spaces == 0 {
                if self.formatted_line.last() != Some(&' ') {
                    self.formatted_line.push(' ');
                    self.space_pad_num += 1;
                }
            } else if spaces > 1 {
                let from = self.char_num + 1;
                self.current_line.drain(from..from + spaces - 1);
                self.current_line[self.char_num + 1] = ' ';
                self.space_pad_num -= spaces as i32 - 1;
            }
        } else if self.options.unpad_return_type {
            if self.formatted_line.last() == Some(&' ') {
                if let Some(last_text) = find_last_not_of_ws(&self.formatted_line) {
                    self.space_pad_num -=
                        (self.formatted_line.len() - last_text - 1) as i32;
                    self.formatted_line.truncate(last_text + 1);
                }
            }
            let from = self.char_num + 1;
            self.current_line.drain(from..from + spaces);
            self.space_pad_num -= spaces as i32;
        }
    }

    /// Space padding around Objective-C parameter types.
    pub(crate) fn pad_objc_param_type(&mut self) {
        if self.current_char == '(' {
            let Some(param_open) = self.formatted_line.iter().rposition(|&ch| ch == '(') else {
                return;
            };
            let Some(prev_text) = find_last_not_of_ws(&self.formatted_line[..param_open]) else {
                return;
            };
            let spaces = param_open - prev_text - 1;

            if self.options.pad_param_type
                || matches!(
                    self.options.pad_method_colon,
                    MethodColonPad::All | MethodColonPad::After
                )
            {
                if spaces == 0 {
                    self.formatted_line.insert(param_open, ' ');
                    self.space_pad_num += 1;
                } else if spaces > 1 {
                    self.formatted_line.drain(prev_text + 1..prev_text + spaces);
                    self.formatted_line[prev_text + 1] = ' ';
                    self.space_pad_num -= spaces as i32 - 1;
                }
            } else if (self.options.unpad_param_type
                || matches!(
                    self.options.pad_method_colon,
                    MethodColonPad::None | MethodColonPad::Before
                ))
                && spaces > 0
            {
                self.formatted_line.drain(prev_text + 1..prev_text + 1 + spaces);
                self.space_pad_num -= spaces as i32;
            }
        } else if self.current_char == ')' {
            let Some(next_text) = find_first_not_of_ws(&self.current_line, self.char_num + 1)
            else {
                return;
            };
            let spaces = next_text - self.char_num - 1;

            if self.options.pad_param_type {
                if spaces == 0 {
                    if self.formatted_line.last() != Some(&' ') {
                        self.formatted_line.push(' ');
                        self.space_pad_num += 1;
                    }
                } else if spaces > 1 {
                    let from = self.char_num + 1;
                    self.current_line.drain(from..from + spaces - 1);
                    self.current_line[self.char_num + 1] = ' ';
                    self.space_pad_num -= spaces as i32 - 1;
                }
            } else if self.options.unpad_param_type {
                if self.formatted_line.last() == Some(&' ') {
                    self.space_pad_num -= 1;
                    if let Some(last_text) = find_last_not_of_ws(&self.formatted_line) {
                        self.formatted_line.truncate(last_text + 1);
                    }
                }
                if spaces > 0 {
                    let from = self.char_num + 1;
                    self.current_line.drain(from..from + spaces);
                    self.space_pad_num -= spaces as i32;
                }
            }
        }
    }

    /// Space padding around an Objective-C method colon.
    pub(crate) fn pad_objc_method_colon(&mut self) {
        let mode = self.options.pad_method_colon;
        if mode == MethodColonPad::NoChange {
            return;
        }

        // space before the colon
        match mode {
            MethodColonPad::All | MethodColonPad::Before => {
                if let Some(last_text) = find_last_not_of_ws(&self.formatted_line) {
                    let trailing = self.formatted_line.len() - last_text - 1;
                    if trailing == 0 {
                        self.formatted_line.push(' ');
                        self.space_pad_num += 1;
                    } else if trailing > 1 {
                        self.formatted_line.truncate(last_text + 2);
                        self.space_pad_num -= trailing as i32 - 1;
                    }
                }
            }
            MethodColonPad::None | MethodColonPad::After => {
                if let Some(last_text) = find_last_not_of_ws(&self.formatted_line) {
                    let trailing = self.formatted_line.len() - last_text - 1;
                    if trailing > 0 {
                        self.formatted_line.truncate(last_text + 1);
                        self.space_pad_num -= trailing as i32;
                    }
                }
            }
            MethodColonPad::NoChange => {}
        }

        // space after the colon
        let wants_space_after = matches!(mode, MethodColonPad::All | MethodColonPad::After);
        if let Some(next_text) = find_first_not_of_ws(&self.current_line, self.char_num + 1) {
            let spaces = next_text - self.char_num - 1;
            if wants_space_after {
                if spaces > 1 {
                    let from = self.char_num + 1;
                    self.current_line.drain(from..from + spaces - 1);
                    self.current_line[self.char_num + 1] = ' ';
                    self.space_pad_num -= spaces as i32 - 1;
                } else if spaces == 0 {
                    self.current_line.insert(self.char_num + 1, ' ');
                    self.space_pad_num += 1;
                }
            } else if spaces > 0 {
                let from = self.char_num + 1;
                self.current_line.drain(from..from + spaces);
                self.space_pad_num -= spaces as i32;
            }
        }
    }
}
