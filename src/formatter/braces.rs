// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Brace classification and placement.

use super::state::Formatter;
use crate::config::{BraceMode, Style};
use crate::core::brace_type::BraceType;
use crate::core::chartype::{
    char_starts_with, find_first_not_of_ws, find_last_not_of_ws, is_digit_separator,
    is_legal_name_char, is_whitespace, is_word_at,
};
use crate::core::resources::Header;
use crate::source::PeekStream;

impl Formatter {
    /// Classify the opening brace under the cursor.
    pub(crate) fn get_brace_type(&mut self) -> BraceType {
        let mut brace = BraceType::NULL;

        if (self.previous_non_ws_char == '='
            || self.top_brace_type().intersects(BraceType::ARRAY))
            && self.previous_command_char != ')'
            && !self.is_non_paren_header
        {
            brace = BraceType::ARRAY;
        } else if self.found_pre_definition_header && self.previous_command_char != ')' {
            brace = BraceType::DEFINITION;
            if self.found_namespace_header {
                brace |= BraceType::NAMESPACE;
            } else if self.found_class_header {
                brace |= BraceType::CLASS;
            } else if self.found_struct_header {
                brace |= BraceType::STRUCT;
            } else if self.found_interface_header {
                brace |= BraceType::INTERFACE;
            }
        } else if self.is_in_enum {
            brace = BraceType::ARRAY | BraceType::ENUM;
        } else {
            let mut is_command_type = self.found_pre_command_header
                || self.found_pre_command_macro
                || (self.current_header.is_some() && self.is_non_paren_header)
                || self.previous_command_char == ')'
                || (self.previous_command_char == ':' && !self.found_question_mark)
                || self.previous_command_char == ';'
                || ((self.previous_command_char == '{' || self.previous_command_char == '}')
                    && self.is_previous_brace_block_related)
                || (self.is_in_class_initializer
                    && ((!is_legal_name_char(self.file_type(), self.previous_non_ws_char)
                        && self.previous_non_ws_char != '(')
                        || self.found_pre_command_header))
                || self.found_trailing_return_type
                || self.is_in_objc_method_definition
                || self.is_in_objc_interface
                || self.is_java_static_constructor
                || self.beautifier.is_sharp_delegate;

            // C# accessors do not end with parens
            if !is_command_type
                && self.is_sharp_style()
                && self.is_next_word_sharp_non_paren_header(self.char_num + 1)
            {
                is_command_type = true;
                self.beautifier.is_sharp_accessor = true;
            }

            brace = if self.is_in_extern_c {
                if is_command_type {
                    BraceType::COMMAND
                } else {
                    BraceType::EXTERN
                }
            } else if is_command_type {
                BraceType::COMMAND
            } else {
                BraceType::ARRAY
            };
        }

        let found_one_line_block = self.is_one_line_block_reached(self.char_num);

        if found_one_line_block == 2 && brace == BraceType::COMMAND {
            brace = BraceType::ARRAY;
        }

        if found_one_line_block > 0 {
            brace |= BraceType::SINGLE_LINE;
            if self.break_current_one_line_block {
                brace |= BraceType::BREAK_BLOCK;
            }
            if found_one_line_block == 3 {
                brace |= BraceType::EMPTY_BLOCK;
            }
        }

        if brace.intersects(BraceType::ARRAY) {
            if self.is_non_in_statement_array_brace() {
                brace |= BraceType::ARRAY_NIS;
                self.beautifier.is_non_in_statement_array = true;
                self.is_immediately_post_non_in_stmt = false;
                self.beautifier.non_in_statement_brace =
                    self.formatted_line.len().saturating_sub(1) as i32;
            }
            if self.is_uniform_initializer_brace() {
                brace |= BraceType::INIT;
            }
        }

        brace
    }

    /// Scan forward for a matching `}` on the current line.
    ///
    /// Returns 0 when none, 1 when reached, 2 when followed by a comma, and
    /// 3 when the block is empty.
    pub(crate) fn is_one_line_block_reached(&self, start_char: usize) -> i32 {
        self.is_one_line_block_reached_in(&self.current_line, start_char)
    }

    pub(crate) fn is_one_line_block_reached_in(&self, line: &[char], start_char: usize) -> i32 {
        let mut in_comment = false;
        let mut in_quote = false;
        let mut has_text = false;
        let mut brace_count = 0i32;
        let mut quote_char = ' ';
        let mut prev_ch = ' ';

        let mut i = start_char;
        while i < line.len() {
            let ch = line[i];
            if in_comment {
                if char_starts_with(line, i, "*/") {
                    in_comment = false;
                    i += 1;
                }
                i += 1;
                continue;
            }
            if in_quote {
                if ch == '\\' {
                    i += 1;
                } else if ch == quote_char {
                    in_quote = false;
                }
                i += 1;
                continue;
            }
            if ch == '"' || (ch == '\'' && !is_digit_separator(line, i)) {
                in_quote = true;
                quote_char = ch;
                i += 1;
                continue;
            }
            if char_starts_with(line, i, "//") {
                break;
            }
            if char_starts_with(line, i, "/*") {
                in_comment = true;
                i += 2;
                continue;
            }
            if ch == '{' {
                brace_count += 1;
                i += 1;
                continue;
            }
            if ch == '}' {
                brace_count -= 1;
                if brace_count == 0 {
                    // is this an array?
                    if *self.paren_stack.last().unwrap() == 0 && prev_ch != '}' {
                        if let Some(peek_num) = find_first_not_of_ws(line, i + 1) {
                            if line[peek_num] == ',' {
                                return 2;
                            }
                        }
                    }
                    if !has_text {
                        return 3;
                    }
                    return 1;
                }
            }
            if ch != ';' && !is_whitespace(ch) {
                has_text = true;
                prev_ch = ch;
            }
            i += 1;
        }
        0
    }

    /// An array brace that begins or ends its line gets block indentation
    /// instead of a continuation indent.
    pub(crate) fn is_non_in_statement_array_brace(&self) -> bool {
        let mut result = false;
        let next_char = self.peek_next_char();
        if self.current_line_begins_with_brace
            && self.current_line_first_brace_num == Some(self.char_num)
            && next_char != '}'
        {
            result = true;
        }
        if is_whitespace(next_char)
            || self.is_before_any_line_end_comment(self.char_num)
            || next_char == '{'
        {
            result = true;
        }
        // Java "new Type [] {...}" is an in-statement indent
        if self.is_java_style() && self.previous_non_ws_char == ']' {
            result = false;
        }
        result
    }

    /// C++11 uniform initializers are not space padded.
    pub(crate) fn is_uniform_initializer_brace(&self) -> bool {
        if self.is_c_style() && !self.is_in_enum && !self.is_immediately_post_preprocessor {
            if self.is_in_class_initializer
                || is_legal_name_char(self.file_type(), self.previous_non_ws_char)
                || self.previous_non_ws_char == '('
            {
                return true;
            }
        }
        false
    }

    pub(crate) fn is_next_word_sharp_non_paren_header(&mut self, start_char: usize) -> bool {
        let rest: String = self.current_line[start_char.min(self.current_line.len())..]
            .iter()
            .collect();
        let next_text = self.peek_next_text(&rest, false);
        if next_text.is_empty() {
            return false;
        }
        if next_text.starts_with('[') {
            return true;
        }
        let chars: Vec<char> = next_text.chars().collect();
        ["get", "set", "add", "remove"]
            .iter()
            .any(|word| is_word_at(self.file_type(), &chars, 0, word))
    }

    pub(crate) fn is_next_char_opening_brace(&mut self, start_char: usize) -> bool {
        let rest: String = self.current_line[start_char.min(self.current_line.len())..]
            .iter()
            .collect();
        let next_text = self.peek_next_text(&rest, false);
        next_text.starts_with('{')
    }

    /// Check a struct block for access modifiers; an access-modified struct
    /// is indented like a class.
    pub(crate) fn is_struct_access_modified(&mut self, index: usize) -> bool {
        let first_line: String = self.current_line[index..].iter().collect();
        let mut next_line = first_line;
        let mut is_first_line = true;
        let mut brace_count = 0i32;
        let mut stream = PeekStream::new(&mut *self.source);

        loop {
            if is_first_line {
                is_first_line = false;
            } else {
                match stream.peek_next_line() {
                    Some(line) => next_line = line,
                    None => return false,
                }
            }
            let chars: Vec<char> = next_line.chars().collect();
            let mut i = 0usize;
            while i < chars.len() {
                let ch = chars[i];
                if char_starts_with(&chars, i, "//") {
                    break;
                }
                match ch {
                    '{' => brace_count += 1,
                    '}' => {
                        brace_count -= 1;
                        if brace_count <= 0 {
                            return false;
                        }
                    }
                    'p' => {
                        for word in ["public", "private", "protected"] {
                            if is_word_at(crate::core::resources::FileType::C, &chars, i, word) {
                                let after = i + word.len();
                                if let Some(next) = find_first_not_of_ws(&chars, after) {
                                    if chars[next] == ':' {
                                        return true;
                                    }
                                }
                            }
                        }
                    }
                    _ => {}
                }
                i += 1;
            }
        }
    }

    pub(crate) fn is_ok_to_break_block(&self, brace_type: BraceType) -> bool {
        if brace_type.intersects(BraceType::ARRAY)
            && brace_type.intersects(BraceType::SINGLE_LINE)
        {
            return false;
        }
        if brace_type.intersects(BraceType::COMMAND)
            && brace_type.intersects(BraceType::EMPTY_BLOCK)
        {
            return false;
        }
        if !brace_type.intersects(BraceType::SINGLE_LINE)
            || brace_type.intersects(BraceType::BREAK_BLOCK)
            || self.options.break_one_line_blocks
        {
            return true;
        }
        false
    }

    /// Decide whether the brace on the stack top is broken onto its own
    /// line, per the brace mode and per-style refinements.
    pub(crate) fn is_current_brace_broken(&self) -> bool {
        let stack = &self.brace_type_stack;
        let stack_end = stack.len() - 1;
        let top = stack[stack_end];

        if self.options.attach_extern_c && top.intersects(BraceType::EXTERN) {
            return false;
        }
        if self.options.attach_namespace && top.intersects(BraceType::NAMESPACE) {
            return false;
        }
        if self.options.attach_class
            && (top.intersects(BraceType::CLASS) || top.intersects(BraceType::INTERFACE))
        {
            return false;
        }
        if self.options.attach_inline
            && self.is_c_style()
            && self.brace_format_mode() != BraceMode::RunIn
            && !(self.current_line_begins_with_brace && self.peek_next_char() == '/')
            && top.intersects(BraceType::COMMAND)
        {
            for i in 1..stack.len() {
                if stack[i].intersects(BraceType::CLASS) || stack[i].intersects(BraceType::STRUCT)
                {
                    return false;
                }
            }
        }

        let mut break_brace = false;
        if top.intersects(BraceType::EXTERN) {
            if self.current_line_begins_with_brace
                || self.brace_format_mode() == BraceMode::RunIn
            {
                break_brace = true;
            }
        } else {
            match self.brace_format_mode() {
                BraceMode::None => {
                    if self.current_line_begins_with_brace
                        && self.current_line_first_brace_num == Some(self.char_num)
                    {
                        break_brace = true;
                    }
                }
                BraceMode::Break | BraceMode::RunIn => break_brace = true,
                BraceMode::Attach => {}
                BraceMode::Linux => {
                    if top.intersects(BraceType::NAMESPACE) {
                        if !matches!(
                            self.formatting_style(),
                            Style::Stroustrup | Style::Mozilla | Style::Webkit
                        ) {
                            break_brace = true;
                        }
                    } else if top.intersects(BraceType::CLASS)
                        || top.intersects(BraceType::INTERFACE)
                    {
                        if !matches!(self.formatting_style(), Style::Stroustrup | Style::Webkit) {
                            break_brace = true;
                        }
                    } else if top.intersects(BraceType::STRUCT) {
                        if self.formatting_style() == Style::Mozilla {
                            break_brace = true;
                        }
                    } else if top.intersects(BraceType::COMMAND) {
                        // break the first brace of a function
                        if stack_end == 1 {
                            break_brace = true;
                        } else if stack_end > 1 {
                            let outer = stack[stack_end - 1];
                            if outer.intersects(BraceType::NAMESPACE)
                                || outer.intersects(BraceType::CLASS)
                                || outer.intersects(BraceType::ARRAY)
                                || outer.intersects(BraceType::STRUCT)
                                || outer.intersects(BraceType::EXTERN)
                            {
                                break_brace = true;
                            }
                        }
                    }
                }
            }
        }
        break_brace
    }

    /// Place an opening command or definition brace.
    pub(crate) fn format_opening_brace(&mut self, brace_type: BraceType) {
        self.paren_stack.push(0);

        let break_brace = self.is_current_brace_broken();

        if break_brace {
            if self.is_before_any_comment()
                && self.is_ok_to_break_block(brace_type)
                && self.source.has_more_lines()
            {
                // a line-end comment stays on this line, the brace moves
                if self.is_before_any_line_end_comment(self.char_num)
                    && !self.current_line_begins_with_brace
                {
                    self.current_char = ' ';
                    if self.paren_stack.len() > 1 {
                        self.paren_stack.pop();
                    }
                    self.current_line[self.char_num] = ' ';
                    self.append_opening_brace = true;
                } else if !self.is_before_multiple_line_end_comments(self.char_num) {
                    self.break_line(false);
                }
            } else if !brace_type.intersects(BraceType::SINGLE_LINE) {
                while matches!(self.formatted_line.last(), Some(' ' | '\t')) {
                    self.formatted_line.pop();
                }
                self.break_line(false);
            } else if (self.options.break_one_line_blocks
                || brace_type.intersects(BraceType::BREAK_BLOCK))
                && !brace_type.intersects(BraceType::EMPTY_BLOCK)
            {
                self.break_line(false);
            } else if !self.is_in_line_break {
                self.append_space_pad();
            }

            self.append_current_char(true);

            // a following comment breaks from the brace
            if self.is_before_comment()
                && self.formatted_line.first() == Some(&'{')
                && self.is_ok_to_break_block(brace_type)
                && matches!(
                    self.brace_format_mode(),
                    BraceMode::Break | BraceMode::Linux
                )
            {
                self.should_break_line_at_next_char = true;
            }
        } else {
            // attach the brace
            if self.is_char_immediately_post_comment || self.is_char_immediately_post_line_comment
            {
                if self.is_ok_to_break_block(brace_type)
                    && !(self.is_char_immediately_post_comment
                        && self.is_char_immediately_post_line_comment)
                    && !self.is_immediately_post_preprocessor
                    && self.previous_command_char != '{'
                    && self.previous_command_char != '}'
                    && self.previous_command_char != ';'
                {
                    self.append_char_inside_comments();
                } else {
                    self.append_current_char(true);
                }
            } else if self.previous_command_char == '{'
                || (self.previous_command_char == '}' && !self.is_in_class_initializer)
                || self.previous_command_char == ';'
            {
                self.append_current_char(true);
            } else if self.is_empty_line(&self.formatted_line) {
                // a blank line precedes this, don't attach
                self.append_current_char(true);
            } else if self.is_ok_to_break_block(brace_type)
                && !(self.is_immediately_post_preprocessor && self.current_line_begins_with_brace)
            {
                if !brace_type.intersects(BraceType::EMPTY_BLOCK) {
                    self.append_space_pad();
                    self.append_current_char(false);
                    self.test_for_time_to_split_formatted_line();
                    if self.is_before_comment()
                        && !self.is_before_multiple_line_end_comments(self.char_num)
                        && (!self.is_before_any_line_end_comment(self.char_num)
                            || self.current_line_begins_with_brace)
                    {
                        self.should_break_line_at_next_char = true;
                        let pad = self.char_num + 1;
                        self.current_line
                            .splice(pad..pad, std::iter::repeat(' ').take(pad));
                    } else if !self.is_before_any_comment() {
                        self.should_break_line_at_next_char = true;
                    }
                } else if self.current_line_begins_with_brace
                    && self.current_line_first_brace_num == Some(self.char_num)
                {
                    self.append_space_pad();
                    self.append_current_char(false);
                    self.should_break_line_at_next_char = true;
                } else {
                    self.append_space_pad();
                    self.append_current_char(true);
                }
            } else {
                if !self.is_in_line_break {
                    self.append_space_pad();
                }
                self.append_current_char(true);
            }
        }
    }

    /// Place a closing command or definition brace.
    pub(crate) fn format_closing_brace(&mut self, brace_type: BraceType) {
        if self.paren_stack.len() > 1 {
            self.paren_stack.pop();
        }

        // braces immediately after an empty block are located with this
        if self.previous_command_char == '{' {
            self.is_immediately_post_empty_block = true;
        }

        if self.options.attach_closing_brace {
            if (self.is_empty_line(&self.formatted_line)
                || self.is_char_immediately_post_line_comment
                || self.is_char_immediately_post_comment
                || (self.is_immediately_post_preprocessor
                    && find_first_not_of_ws(&self.current_line, 0) == Some(self.char_num)))
                && (!brace_type.intersects(BraceType::SINGLE_LINE)
                    || self.is_ok_to_break_block(brace_type))
            {
                self.break_line(false);
                self.append_current_char(true);
            } else {
                if self.previous_non_ws_char != '{'
                    && (!brace_type.intersects(BraceType::SINGLE_LINE)
                        || self.is_ok_to_break_block(brace_type))
                {
                    self.append_space_pad();
                }
                self.append_current_char(false);
            }
        } else if !brace_type.intersects(BraceType::EMPTY_BLOCK)
            && (brace_type.intersects(BraceType::BREAK_BLOCK)
                || self.is_ok_to_break_block(brace_type))
        {
            self.break_line(false);
            self.append_current_char(true);
        } else {
            self.append_current_char(true);
        }

        // a declaration following a definition is space padded
        if is_legal_name_char(self.file_type(), self.peek_next_char()) {
            self.append_space_after();
        }

        if self.options.break_blocks
            && self.current_header.is_some()
            && !self.is_header_in_multi_statement_line
            && *self.paren_stack.last().unwrap() == 0
        {
            if matches!(self.current_header, Some(Header::Case | Header::Default)) {
                // do not insert a line when a 'break' follows outside braces
                let rest: String = self.current_line[(self.char_num + 1).min(self.current_line.len())..]
                    .iter()
                    .collect();
                let next_text = self.peek_next_text(&rest, false);
                if !next_text.is_empty() && !next_text.starts_with("break") {
                    self.is_append_post_block_empty_line_requested = true;
                }
            } else {
                self.is_append_post_block_empty_line_requested = true;
            }
        }
    }

    /// Place array braces, attached or broken.
    pub(crate) fn format_array_braces(&mut self, brace_type: BraceType, is_opening_array_brace: bool) {
        if self.current_char == '{' {
            if is_opening_array_brace {
                match self.brace_format_mode() {
                    BraceMode::Attach | BraceMode::Linux => {
                        // Mozilla breaks an enum
                        if brace_type.intersects(BraceType::ENUM)
                            && self.formatting_style() == Style::Mozilla
                        {
                            self.is_in_line_break = true;
                            self.append_current_char(true);
                        }
                        // don't attach to a preprocessor or '\' line
                        else if (self.is_immediately_post_preprocessor
                            || self.formatted_line.last() == Some(&'\\'))
                            && self.current_line_begins_with_brace
                        {
                            self.is_in_line_break = true;
                            self.append_current_char(true);
                        } else if self.is_char_immediately_post_comment {
                            self.append_current_char(true);
                        } else if self.is_char_immediately_post_line_comment
                            && !brace_type.intersects(BraceType::SINGLE_LINE)
                        {
                            self.append_char_inside_comments();
                        } else if self.is_empty_line(&self.formatted_line) {
                            self.append_current_char(true);
                        } else if self.current_line_begins_with_brace
                            && !brace_type.intersects(BraceType::SINGLE_LINE)
                        {
                            self.append_space_pad();
                            self.append_current_char(false);
                            self.test_for_time_to_split_formatted_line();
                            if self.current_line_first_brace_num == Some(self.char_num) {
                                self.should_break_line_at_next_char = true;
                            }
                        } else {
                            if self.previous_non_ws_char != '('
                                && !brace_type.intersects(BraceType::INIT)
                            {
                                self.append_space_pad();
                            }
                            self.append_current_char(true);
                        }
                    }
                    BraceMode::Break => {
                        if is_whitespace(self.peek_next_char()) && !self.is_in_virgin_line {
                            self.break_line(false);
                        } else if self.is_before_any_comment() && self.source.has_more_lines() {
                            if self.is_before_any_line_end_comment(self.char_num)
                                && !self.current_line_begins_with_brace
                            {
                                self.current_char = ' ';
                                self.current_line[self.char_num] = ' ';
                                self.append_opening_brace = true;
                            }
                        }
                        if !self.is_in_line_break
                            && self.previous_non_ws_char != '('
                            && !brace_type.intersects(BraceType::INIT)
                        {
                            self.append_space_pad();
                        }
                        self.append_current_char(true);
                        if self.current_line_begins_with_brace
                            && self.current_line_first_brace_num == Some(self.char_num)
                            && !brace_type.intersects(BraceType::SINGLE_LINE)
                        {
                            self.should_break_line_at_next_char = true;
                        }
                    }
                    BraceMode::RunIn => {
                        if is_whitespace(self.peek_next_char()) && !self.is_in_virgin_line {
                            self.break_line(false);
                        } else if self.is_before_any_comment() && self.source.has_more_lines() {
                            if self.is_before_any_line_end_comment(self.char_num)
                                && !self.current_line_begins_with_brace
                            {
                                self.current_char = ' ';
                                self.current_line[self.char_num] = ' ';
                                self.append_opening_brace = true;
                            }
                        }
                        if !self.is_in_line_break
                            && self.previous_non_ws_char != '('
                            && !brace_type.intersects(BraceType::INIT)
                        {
                            self.append_space_pad();
                        }
                        self.append_current_char(true);
                    }
                    BraceMode::None => {
                        if self.current_line_begins_with_brace
                            && self.current_line_first_brace_num == Some(self.char_num)
                        {
                            self.append_current_char(true);
                        } else {
                            if self.previous_non_ws_char != '('
                                && !brace_type.intersects(BraceType::INIT)
                            {
                                self.append_space_pad();
                            }
                            self.append_current_char(false);
                        }
                    }
                }
            } else {
                // not the first opening brace
                if self.brace_format_mode() == BraceMode::RunIn {
                    if self.previous_non_ws_char == '{'
                        && self.brace_type_stack.len() > 2
                        && !self.brace_type_stack[self.brace_type_stack.len() - 2]
                            .intersects(BraceType::SINGLE_LINE)
                    {
                        self.format_array_run_in();
                    }
                } else if !self.is_in_line_break
                    && !is_whitespace(self.peek_next_char())
                    && self.previous_non_ws_char == '{'
                    && self.brace_type_stack.len() > 2
                    && !self.brace_type_stack[self.brace_type_stack.len() - 2]
                        .intersects(BraceType::SINGLE_LINE)
                {
                    self.format_array_run_in();
                }
                self.append_current_char(true);
            }
        } else if self.current_char == '}' {
            if self.options.attach_closing_brace {
                if self.is_empty_line(&self.formatted_line)
                    || self.is_immediately_post_preprocessor
                    || self.is_char_immediately_post_line_comment
                    || self.is_char_immediately_post_comment
                {
                    self.append_current_char(true);
                } else {
                    self.append_space_pad();
                    self.append_current_char(false);
                }
            } else {
                // does this close the first opening brace in the array?
                if !brace_type.intersects(BraceType::INIT)
                    && (!brace_type.intersects(BraceType::SINGLE_LINE)
                        || !self.formatted_line.contains(&'{'))
                {
                    self.break_line(false);
                }
                self.append_current_char(true);
            }

            // a declaration following an enum definition is space padded
            let peeked = self.peek_next_char();
            if (is_legal_name_char(self.file_type(), peeked) && peeked != '.') || peeked == '[' {
                self.append_space_after();
            }
        }
    }

    /// Attach the following statement to a run-in brace.
    pub(crate) fn format_run_in(&mut self) {
        // keep-one-line-blocks returns without indenting the run-in
        if self.formatting_style() != Style::Pico && !self.is_ok_to_break_block(self.top_brace_type())
        {
            return;
        }

        // the line must end with a broken brace
        let Some(last_text) = find_last_not_of_ws(&self.formatted_line) else {
            return;
        };
        if self.formatted_line[last_text] != '{' {
            return;
        }
        if self
            .formatted_line
            .iter()
            .any(|&ch| ch != ' ' && ch != '\t' && ch != '{')
        {
            return;
        }
        if self.top_brace_type().intersects(BraceType::NAMESPACE) {
            return;
        }

        let mut extra_indent = false;
        let mut extra_half_indent = false;
        self.is_in_line_break = true;

        // a class modifier cannot attach without indent-classes
        if self.is_c_style()
            && crate::core::chartype::is_char_potential_header(
                self.file_type(),
                &self.current_line,
                self.char_num,
            )
            && (self.top_brace_type().intersects(BraceType::CLASS)
                || (self.top_brace_type().intersects(BraceType::STRUCT)
                    && self.beautifier.is_in_indentable_struct))
        {
            if ["public", "private", "protected"]
                .iter()
                .any(|word| is_word_at(self.file_type(), &self.current_line, self.char_num, word))
            {
                if self.options.modifier_indent {
                    extra_half_indent = true;
                } else if !self.options.class_indent {
                    return;
                }
            } else if self.options.class_indent {
                extra_indent = true;
            }
        }

        // a 'case' statement cannot attach without indent-switches
        if !self.options.switch_indent
            && crate::core::chartype::is_char_potential_header(
                self.file_type(),
                &self.current_line,
                self.char_num,
            )
            && (is_word_at(self.file_type(), &self.current_line, self.char_num, "case")
                || is_word_at(self.file_type(), &self.current_line, self.char_num, "default"))
        {
            return;
        }

        // extra indent for switch statements
        if self.options.switch_indent
            && self.pre_brace_header_stack.last() == Some(&Some(Header::Switch))
            && is_legal_name_char(self.file_type(), self.current_char)
            && !is_word_at(self.file_type(), &self.current_line, self.char_num, "case")
        {
            extra_indent = true;
        }

        self.is_in_line_break = false;
        // remove extra whitespace after the brace
        if self.formatted_line.len() > last_text + 1
            && find_first_not_of_ws(&self.formatted_line, last_text + 1).is_none()
        {
            self.formatted_line.truncate(last_text + 1);
        }

        let indent_length = self.options.indent_length();
        if extra_half_indent {
            self.run_in_indent_chars = (indent_length / 2) as i32;
            for _ in 0..(indent_length / 2).saturating_sub(1) {
                self.formatted_line.push(' ');
            }
        } else if self.options.indent.uses_tabs() {
            self.append_char('\t', false);
            self.run_in_indent_chars = 2;
            if extra_indent {
                self.append_char('\t', false);
                self.run_in_indent_chars += 1;
            }
        } else {
            for _ in 0..indent_length.saturating_sub(1) {
                self.formatted_line.push(' ');
            }
            self.run_in_indent_chars = indent_length as i32;
            if extra_indent {
                for _ in 0..indent_length {
                    self.formatted_line.push(' ');
                }
                self.run_in_indent_chars += indent_length as i32;
            }
        }
        self.is_in_brace_run_in = true;
    }

    /// Whitespace and indentation for an array run-in.
    pub(crate) fn format_array_run_in(&mut self) {
        // the brace must be broken
        if self
            .formatted_line
            .iter()
            .any(|&ch| ch != ' ' && ch != '\t' && ch != '{')
        {
            return;
        }
        let Some(last_text) = find_last_not_of_ws(&self.formatted_line) else {
            return;
        };
        if self.formatted_line[last_text] != '{' {
            return;
        }

        if self.formatted_line.len() > last_text + 1
            && find_first_not_of_ws(&self.formatted_line, last_text + 1).is_none()
        {
            self.formatted_line.truncate(last_text + 1);
        }

        if self.options.indent.uses_tabs() {
            self.append_char('\t', false);
            self.run_in_indent_chars = 2;
        } else {
            let indent = self.options.indent_length();
            for _ in 0..indent.saturating_sub(1) {
                self.formatted_line.push(' ');
            }
            self.run_in_indent_chars = indent as i32;
        }
        self.is_in_brace_run_in = true;
        self.is_in_line_break = false;
    }

    /// Insert the brace ahead of a trailing comment on the formatted line.
    pub(crate) fn append_char_inside_comments(&mut self) {
        let Some(comment_num) = self.formatted_line_comment_num else {
            self.append_current_char(true);
            return;
        };
        if comment_num == 0 {
            self.append_current_char(true);
            return;
        }

        let Some(mut beg) = find_last_not_of_ws(&self.formatted_line[..comment_num]) else {
            self.append_current_char(true);
            return;
        };
        beg += 1;

        // insert the brace
        let end = comment_num;
        if end - beg < 3 {
            let insert = 3 - (end - beg);
            self.formatted_line
                .splice(beg..beg, std::iter::repeat(' ').take(insert));
        }
        if self.formatted_line[beg] == '\t' {
            self.formatted_line.insert(beg, ' ');
        }
        self.formatted_line[beg + 1] = self.current_char;
        self.test_for_time_to_split_formatted_line();
    }

    /// Multiple line-end comments cannot have a brace inserted before them.
    pub(crate) fn is_before_multiple_line_end_comments(&self, start_pos: usize) -> bool {
        let Some(next) = find_first_not_of_ws(&self.current_line, start_pos + 1) else {
            return false;
        };
        if !self.sequence_at(next, "/*") {
            return false;
        }
        let Some(end) = self.find_substring(next + 2, "*/") else {
            return false;
        };
        match find_first_not_of_ws(&self.current_line, end + 2) {
            Some(after) => self.sequence_at(after, "/*") || self.sequence_at(after, "//"),
            None => false,
        }
    }

    /// Add braces around a single-statement header body.
    pub(crate) fn add_braces_to_statement(&mut self) -> bool {
        if !matches!(
            self.current_header,
            Some(
                Header::If
                    | Header::Else
                    | Header::For
                    | Header::While
                    | Header::Do
                    | Header::Foreach
                    | Header::Forever
            )
        ) {
            return false;
        }
        if self.current_header == Some(Header::While) && self.found_closing_header {
            // do-while
            return false;
        }
        if self.current_char == ';' {
            return false;
        }

        // do not add if a header follows
        if crate::core::chartype::is_char_potential_header(
            self.file_type(),
            &self.current_line,
            self.char_num,
        ) && self
            .tables
            .find_header(&self.current_line, self.char_num, &self.tables.headers)
            .is_some()
        {
            return false;
        }

        // find the next semicolon
        let next_semi_colon = if self.current_char == ';' {
            Some(self.char_num)
        } else {
            self.find_next_char(';', self.char_num + 1)
        };
        let Some(next_semi_colon) = next_semi_colon else {
            return false;
        };

        // add the closing brace before changing the line length
        if next_semi_colon == self.current_line.len() - 1 {
            self.current_line.extend([' ', '}']);
        } else {
            self.current_line
                .splice(next_semi_colon + 1..next_semi_colon + 1, [' ', '}']);
        }
        // add the opening brace
        self.current_line
            .splice(self.char_num..self.char_num, ['{', ' ']);
        self.compute_checksum_in("{}");
        self.current_char = '{';
        if find_first_not_of_ws(&self.current_line, 0) == Some(self.char_num) {
            self.current_line_begins_with_brace = true;
        }
        if !self.options.add_one_line_braces {
            if let Some(last_text) = find_last_not_of_ws(&self.formatted_line) {
                if self.formatted_line.len() - 1 - last_text > 1 {
                    self.formatted_line.truncate(last_text + 1);
                }
            }
        }
        true
    }

    /// Remove braces from a single-statement header body.
    pub(crate) fn remove_braces_from_statement(&mut self) -> bool {
        if !matches!(
            self.current_header,
            Some(Header::If | Header::Else | Header::For | Header::While | Header::Foreach)
        ) {
            return false;
        }
        if self.current_header == Some(Header::While) && self.found_closing_header {
            return false;
        }

        let first_line: String = if !self.is_before_any_line_end_comment(self.char_num)
            || self.current_line_begins_with_brace
        {
            self.current_line[(self.char_num + 1).min(self.current_line.len())..]
                .iter()
                .collect()
        } else {
            String::new()
        };

        let tables = std::rc::Rc::clone(&self.tables);
        let file_type = self.file_type();
        let mut stream = PeekStream::new(&mut *self.source);
        let mut next_line: Vec<char> = first_line.chars().collect();
        let mut is_first_line = true;
        let next_char;

        // find the first non-blank text
        loop {
            if is_first_line {
                is_first_line = false;
            } else {
                match stream.peek_next_line() {
                    Some(line) => next_line = line.chars().collect(),
                    None => return false,
                }
            }
            if let Some(pos) = find_first_not_of_ws(&next_line, 0) {
                next_char = pos;
                break;
            }
        }

        // don't remove if comments or a header follow the brace
        if char_starts_with(&next_line, next_char, "/*")
            || char_starts_with(&next_line, next_char, "//")
            || (crate::core::chartype::is_char_potential_header(file_type, &next_line, next_char)
                && tables
                    .find_header(&next_line, next_char, &tables.headers)
                    .is_some())
        {
            return false;
        }

        // find the next semicolon
        let next_semi_colon = if next_line[next_char] == ';' {
            Some(next_char)
        } else {
            find_next_char_in(&next_line, ';', next_char + 1)
        };
        let Some(next_semi_colon) = next_semi_colon else {
            return false;
        };

        // find the closing brace
        let mut search_from = next_semi_colon + 1;
        is_first_line = true;
        let close_char;
        loop {
            if is_first_line {
                is_first_line = false;
            } else {
                match stream.peek_next_line() {
                    Some(line) => {
                        next_line = line.chars().collect();
                        search_from = 0;
                    }
                    None => return false,
                }
            }
            if let Some(pos) = find_first_not_of_ws(&next_line, search_from) {
                close_char = pos;
                break;
            }
            search_from = 0;
        }
        if next_line.is_empty() || next_line[close_char] != '}' {
            return false;
        }
        drop(stream);

        // remove the opening brace
        self.current_line[self.char_num] = ' ';
        self.current_char = ' ';
        self.adjust_checksum_in(-('{' as i64));
        true
    }

    /// Next occurrence of `search_char` outside quotes and comments.
    pub(crate) fn find_next_char(&self, search_char: char, search_start: usize) -> Option<usize> {
        find_next_char_in(&self.current_line, search_char, search_start)
    }

    pub(crate) fn find_next_char_in_line(
        &self,
        line: &[char],
        search_char: char,
        search_start: usize,
    ) -> Option<usize> {
        find_next_char_in(line, search_char, search_start)
    }
}

fn find_next_char_in(line: &[char], search_char: char, search_start: usize) -> Option<usize> {
    let mut i = search_start;
    while i < line.len() {
        if char_starts_with(line, i, "//") {
            return None;
        }
        if char_starts_with(line, i, "/*") {
            let mut end = None;
            let mut j = i + 2;
            while j + 1 < line.len() {
                if line[j] == '*' && line[j + 1] == '/' {
                    end = Some(j);
                    break;
                }
                j += 1;
            }
            let end = end?;
            i = end + 2;
            if i >= line.len() {
                return None;
            }
        }
        if line[i] == '"' || (line[i] == '\'' && !is_digit_separator(line, i)) {
            let quote = line[i];
            loop {
                let end_quote = (i + 1..line.len()).find(|&p| line[p] == quote)?;
                i = end_quote;
                if line[end_quote - 1] != '\\' {
                    break;
                }
                if end_quote >= 2 && line[end_quote - 2] == '\\' {
                    break;
                }
            }
        }
        if line[i] == search_char {
            return Some(i);
        }
        if line[i] == '{' {
            return None;
        }
        i += 1;
    }
    None
}
