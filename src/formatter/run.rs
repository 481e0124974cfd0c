// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! The per-character dispatch loop.

use super::state::Formatter;
use crate::config::BraceMode;
use crate::core::brace_type::BraceType;
use crate::core::chartype::{
    find_first_not_of_ws, get_current_word, is_char_potential_header, is_digit_separator,
    is_legal_name_char, is_whitespace,
};
use crate::core::resources::Header;

impl Formatter {
    /// Produce the next fully formatted, beautified line.
    pub fn next_line(&mut self) -> String {
        self.is_in_virgin_line = self.is_virgin;
        self.is_char_immediately_post_comment = false;
        self.is_previous_char_post_comment = false;
        self.is_char_immediately_post_line_comment = false;
        self.is_char_immediately_post_open_block = false;
        self.is_char_immediately_post_close_block = false;
        self.is_char_immediately_post_template = false;

        while !self.is_line_ready {
            if self.should_reparse_current_char {
                self.should_reparse_current_char = false;
            } else if !self.get_next_char() {
                self.break_line(false);
                continue;
            }

            // a virgin '{' at the start of the file opens a block
            if self.is_in_virgin_line
                && self.current_char == '{'
                && self.current_line_begins_with_brace
                && self.previous_command_char == ' '
            {
                self.previous_command_char = '{';
            }
            if self.is_in_class_initializer
                && self.top_brace_type().intersects(BraceType::COMMAND)
            {
                self.is_in_class_initializer = false;
            }
            if self.is_in_brace_run_in {
                self.is_in_line_break = false;
            }
            if !is_whitespace(self.current_char) {
                self.is_in_brace_run_in = false;
            }
            self.is_previous_char_post_comment = self.is_char_immediately_post_comment;
            self.is_char_immediately_post_comment = false;
            self.is_char_immediately_post_template = false;
            self.is_char_immediately_post_return = false;
            self.is_char_immediately_post_throw = false;
            self.is_char_immediately_post_new_delete = false;
            self.is_char_immediately_post_operator = false;
            self.is_char_immediately_post_pointer_or_reference = false;
            self.is_char_immediately_post_open_block = false;
            self.is_char_immediately_post_close_block = false;

            // formatting-mode directives
            if (self.line_is_line_comment_only || self.line_is_comment_only)
                && self.is_formatting_mode_off
                && self.find_substring(self.char_num, "*INDENT-ON*").is_some()
            {
                self.is_formatting_mode_off = false;
                self.break_line(false);
                self.formatted_line = self.current_line.clone();
                self.char_num = self.current_line.len() - 1;
                continue;
            }
            if self.is_formatting_mode_off {
                self.break_line(false);
                self.formatted_line = self.current_line.clone();
                self.char_num = self.current_line.len() - 1;
                continue;
            }
            if (self.line_is_line_comment_only || self.line_is_comment_only)
                && self.find_substring(self.char_num, "*INDENT-OFF*").is_some()
            {
                self.is_formatting_mode_off = true;
                if self.is_in_line_break {
                    self.break_line(false);
                }
                self.formatted_line = self.current_line.clone();
                self.char_num = self.current_line.len() - 1;
                continue;
            }

            if self.should_break_line_at_next_char {
                if is_whitespace(self.current_char) && !self.line_is_empty {
                    continue;
                }
                self.is_in_line_break = true;
                self.should_break_line_at_next_char = false;
            }

            // embedded SQL passes through to the terminating semicolon
            if self.is_in_exec_sql && !self.passed_semicolon {
                if self.current_char == ';' {
                    self.passed_semicolon = true;
                }
                self.append_current_char(true);
                continue;
            }

            if self.is_in_line_comment {
                self.format_line_comment_body();
                continue;
            }
            if self.is_in_comment {
                self.format_comment_body();
                continue;
            }
            if self.is_in_quote {
                self.format_quote_body();
                continue;
            }

            // not in a quote or comment
            if self.is_sequence_reached("//") {
                self.format_line_comment_opener();
                self.test_for_time_to_split_formatted_line();
                continue;
            }
            if self.is_sequence_reached("/*") {
                self.format_comment_opener();
                self.test_for_time_to_split_formatted_line();
                continue;
            }
            if self.current_char == '"'
                || (self.current_char == '\''
                    && !is_digit_separator(&self.current_line, self.char_num))
            {
                self.format_quote_opener();
                self.test_for_time_to_split_formatted_line();
                continue;
            }
            // these preprocessor statements are treated as line comments
            if self.current_char == '#'
                && find_first_not_of_ws(&self.current_line, 0) == Some(self.char_num)
            {
                let preproc: String = self.current_line[self.char_num + 1..]
                    .iter()
                    .collect::<String>()
                    .trim()
                    .to_string();
                let preproc_chars: Vec<char> = preproc.chars().collect();
                if !preproc_chars.is_empty()
                    && is_char_potential_header(self.file_type(), &preproc_chars, 0)
                    && ["region", "endregion", "error", "warning", "line"].iter().any(|word| {
                        crate::core::chartype::is_word_at(self.file_type(), &preproc_chars, 0, word)
                    })
                {
                    while matches!(self.current_line.last(), Some(' ' | '\t')) {
                        self.current_line.pop();
                    }
                    if self.formatted_line.first() == Some(&'{') {
                        self.is_in_line_break = true;
                        self.is_in_brace_run_in = false;
                    }
                    if self.previous_command_char == '}' {
                        self.current_header = None;
                    }
                    self.is_in_line_comment = true;
                    self.append_current_char(true);
                    continue;
                }
            }

            if self.is_in_preprocessor {
                self.append_current_char(true);
                continue;
            }

            if self.is_in_template && self.options.close_templates {
                if self.previous_non_ws_char == '>'
                    && is_whitespace(self.current_char)
                    && self.peek_next_char() == '>'
                {
                    continue;
                }
            }

            if self.should_remove_next_closing_brace && self.current_char == '}' {
                self.current_line[self.char_num] = ' ';
                self.current_char = ' ';
                self.should_remove_next_closing_brace = false;
                self.adjust_checksum_in(-('}' as i64));
                if self.is_empty_line(&self.current_line) {
                    continue;
                }
            }

            // whitespace is appended as-is to simplify the rest
            if is_whitespace(self.current_char) {
                self.append_current_char(true);
                continue;
            }

            // a '#' in column one enters preprocessor state
            if self.current_char == '#'
                && find_first_not_of_ws(&self.current_line, 0) == Some(self.char_num)
                && !self.top_brace_type().intersects(BraceType::SINGLE_LINE)
            {
                self.is_in_preprocessor = true;
                if self.formatted_line.first() == Some(&'{') {
                    self.is_in_line_break = true;
                    self.is_in_brace_run_in = false;
                }
                self.process_preprocessor();
                // a top-level block is potentially indentable
                if self.options.indent_preproc_block
                    && (self.top_brace_type().intersects(BraceType::NULL)
                        || self.top_brace_type().intersects(BraceType::NAMESPACE))
                    && !self.found_class_header
                    && !self.is_in_class_initializer
                    && self.source.tell() > self.preproc_block_end
                {
                    let preproc =
                        crate::beautifier::extract_preprocessor_statement(&self.current_line);
                    if preproc.starts_with("if") {
                        if self.is_immediately_post_preprocessor {
                            self.break_line(false);
                        }
                        self.is_indentable_preprocessor_block =
                            self.is_indentable_preprocessor_block(self.char_num);
                        self.is_indentable_preprocessor = self.is_indentable_preprocessor_block;
                    }
                }
                if self.is_indentable_preprocessor_block
                    && self.char_num + 1 < self.current_line.len()
                    && is_whitespace(self.current_line[self.char_num + 1])
                {
                    if let Some(next_text) =
                        find_first_not_of_ws(&self.current_line, self.char_num + 1)
                    {
                        self.current_line.drain(self.char_num + 1..next_text);
                    }
                }
                if self.is_indentable_preprocessor_block
                    && self.source.tell() >= self.preproc_block_end
                {
                    self.is_indentable_preprocessor_block = false;
                }
                // fall through to reset the variables
            }

            // flip the transient immediately-post flags
            if self.is_immediately_post_comment {
                self.case_header_follows_comments = false;
                self.is_immediately_post_comment = false;
                self.is_char_immediately_post_comment = true;
            }
            if self.is_immediately_post_line_comment {
                self.case_header_follows_comments = false;
                self.is_immediately_post_line_comment = false;
                self.is_char_immediately_post_line_comment = true;
            }
            if self.is_immediately_post_return {
                self.is_immediately_post_return = false;
                self.is_char_immediately_post_return = true;
            }
            if self.is_immediately_post_throw {
                self.is_immediately_post_throw = false;
                self.is_char_immediately_post_throw = true;
            }
            if self.is_immediately_post_new_delete {
                self.is_immediately_post_new_delete = false;
                self.is_char_immediately_post_new_delete = true;
            }
            if self.is_immediately_post_operator {
                self.is_immediately_post_operator = false;
                self.is_char_immediately_post_operator = true;
            }
            if self.is_immediately_post_template {
                self.is_immediately_post_template = false;
                self.is_char_immediately_post_template = true;
            }
            if self.is_immediately_post_pointer_or_reference {
                self.is_immediately_post_pointer_or_reference = false;
                self.is_char_immediately_post_pointer_or_reference = true;
            }

            if self.is_immediately_post_header && self.handle_immediately_post_header() {
                continue;
            }

            if self.passed_semicolon {
                self.passed_semicolon = false;
                if *self.paren_stack.last().unwrap() == 0
                    && !self.is_char_immediately_post_comment
                    && self.current_char != ';'
                {
                    self.is_in_exec_sql = false;
                    self.should_reparse_current_char = true;
                    if self.formatted_line.iter().any(|&ch| !is_whitespace(ch)) {
                        self.is_in_line_break = true;
                    }
                    if self.need_header_opening_brace {
                        self.is_char_immediately_post_close_block = true;
                        self.need_header_opening_brace = false;
                    }
                    continue;
                }
            }

            if self.passed_colon {
                self.passed_colon = false;
                if *self.paren_stack.last().unwrap() == 0
                    && !self.is_before_any_comment()
                    && self.formatted_line.iter().any(|&ch| !is_whitespace(ch))
                {
                    self.should_reparse_current_char = true;
                    self.is_in_line_break = true;
                    continue;
                }
            }

            // template declaration, e.g. foo<bar>
            if !self.is_in_template && self.current_char == '<' {
                self.check_if_template_opener();
            }

            // break return type
            if let Some(break_num) = self.method_break_char_num {
                if self.char_num >= break_num && self.method_break_line_num == 0 {
                    if self.char_num == break_num {
                        self.is_in_line_break = true;
                    }
                    self.method_break_char_num = None;
                }
            }
            // attach return type
            if let Some(attach_num) = self.method_attach_char_num {
                if self.char_num >= attach_num && self.method_attach_line_num == 0 {
                    if self.char_num == attach_num {
                        self.is_in_line_break = false;
                        if !matches!(self.previous_non_ws_char, '*' | '&' | '^') {
                            self.append_space_pad();
                        }
                    }
                    self.method_attach_char_num = None;
                }
            }

            // parens and brackets
            if self.current_char == '('
                || self.current_char == '['
                || (self.is_in_template && self.current_char == '<')
            {
                self.question_mark_stack.push(self.found_question_mark);
                self.found_question_mark = false;
                *self.paren_stack.last_mut().unwrap() += 1;
                if self.current_char == '[' {
                    self.square_bracket_count += 1;
                }
            } else if self.current_char == ')'
                || self.current_char == ']'
                || (self.is_in_template && self.current_char == '>')
            {
                self.found_pre_command_header = false;
                let top = self.paren_stack.last_mut().unwrap();
                *top -= 1;
                // this can happen in preprocessor directives
                if *top < 0 {
                    *top = 0;
                }
                if let Some(saved) = self.question_mark_stack.pop() {
                    self.found_question_mark = saved;
                }
                if self.is_in_template && self.current_char == '>' {
                    self.template_depth -= 1;
                    if self.template_depth == 0 {
                        self.is_in_template = false;
                        self.is_immediately_post_template = true;
                    }
                }

                // does this paren close a header?
                if self.is_in_header && *self.paren_stack.last().unwrap() == 0 {
                    self.is_in_header = false;
                    self.is_immediately_post_header = true;
                    self.found_question_mark = false;
                }
                if self.current_char == ']' {
                    self.square_bracket_count -= 1;
                    if self.square_bracket_count <= 0 {
                        self.square_bracket_count = 0;
                        self.objc_colon_align = 0;
                    }
                }
                if self.current_char == ')' {
                    self.found_cast_operator = false;
                    if *self.paren_stack.last().unwrap() == 0 {
                        self.end_of_asm_reached = true;
                    }
                }
            }

            // braces
            if self.current_char == '{' || self.current_char == '}' {
                self.handle_brace();
                continue;
            }

            self.handle_post_block_statement();

            self.is_immediately_post_empty_block = false;

            // Objective-C method prefix with no return type
            if self.is_immediately_post_objc_method_prefix && self.current_char != '(' {
                if self.options.pad_method_prefix || self.options.unpad_method_prefix {
                    self.pad_objc_method_prefix();
                }
                self.is_immediately_post_objc_method_prefix = false;
            }

            // look for headers
            let is_potential_header =
                is_char_potential_header(self.file_type(), &self.current_line, self.char_num);

            if is_potential_header && !self.is_in_template && self.square_bracket_count == 0 {
                if self.handle_header_section() {
                    continue;
                }
            }

            if self.is_in_line_break {
                self.break_line(false);
                if self.is_in_virgin_line {
                    // adjust for the first line
                    self.beautifier.line_comment_no_beautify = self.line_comment_no_indent;
                    self.line_comment_no_indent = false;
                    if self.is_immediately_post_preprocessor {
                        self.beautifier.is_in_indentable_preproc = self.is_indentable_preprocessor;
                        self.is_indentable_preprocessor = false;
                    }
                }
            }

            if self.previous_non_ws_char == '}' || self.current_char == ';' {
                if self.current_char == ';' {
                    self.square_bracket_count = 0;
                    self.method_break_char_num = None;
                    self.method_break_line_num = 0;
                    self.method_attach_char_num = None;
                    self.method_attach_line_num = 0;

                    if ((self.options.break_one_line_statements
                        || self.top_brace_type().intersects(BraceType::SINGLE_LINE))
                        && self.is_ok_to_break_block(self.top_brace_type()))
                        && !(self.options.attach_closing_brace && self.peek_next_char() == '}')
                    {
                        self.passed_semicolon = true;
                    } else if !self.options.break_one_line_statements && self.next_word_is_else() {
                        // 'else' at the end of the line
                        self.passed_semicolon = true;
                    }

                    if self.options.break_blocks
                        && self.current_header.is_some()
                        && !matches!(self.current_header, Some(Header::Case | Header::Default))
                        && !self.is_header_in_multi_statement_line
                        && *self.paren_stack.last().unwrap() == 0
                    {
                        self.is_append_post_block_empty_line_requested = true;
                    }
                }
                if self.current_char != ';'
                    || (self.need_header_opening_brace && *self.paren_stack.last().unwrap() == 0)
                {
                    self.current_header = None;
                }
                self.reset_end_of_statement();
            }

            if self.current_char == ':'
                && self.previous_char != ':'
                && self.peek_next_char() != ':'
            {
                self.handle_colon();
            }

            if self.current_char == '?' {
                self.found_question_mark = true;
            }

            if is_potential_header && !self.is_in_template {
                if self.handle_keyword_section() {
                    continue;
                }
            }

            // Objective-C statements
            if self.handle_objc_statement() {
                continue;
            }

            // operators and potential calculations
            let is_potential_operator = !self.current_char.is_alphanumeric()
                && !is_whitespace(self.current_char)
                && self.current_char != '_';
            let mut new_operator: Option<&'static str> = None;

            if is_potential_operator {
                new_operator = self.tables.find_operator(
                    &self.current_line,
                    self.char_num,
                    &self.tables.operators,
                );

                if let Some(mut op) = new_operator {
                    if op == "=>" {
                        self.found_pre_command_header = true;
                    }
                    // two '>' closing a template are not a shift
                    if self.is_in_template && (op == ">>" || op == ">>>") {
                        op = ">";
                        new_operator = Some(op);
                    }
                    if !self.is_in_potential_calculation
                        && self.tables.is_assignment_operator(op)
                    {
                        self.found_pre_command_header = false;
                        let peeked = self.peek_next_char();
                        self.is_in_potential_calculation = !(op == "=" && peeked == '*')
                            && !(op == "=" && peeked == '&')
                            && !self.is_char_immediately_post_operator;
                    }
                }
            }

            // pointers and references
            if let Some(op) = new_operator {
                if !self.is_java_style()
                    && matches!(op, "*" | "&" | "^" | "&&")
                    && self.is_pointer_or_reference()
                {
                    if !self.is_dereference_or_address_of() && !self.is_operator_padding_disabled()
                    {
                        self.format_pointer_or_reference();
                    } else {
                        self.append_operator(op, true);
                        self.go_forward(op.len() - 1);
                    }
                    self.is_immediately_post_pointer_or_reference = true;
                    continue;
                }
            }

            if self.options.pad_operators && new_operator.is_some() {
                if !self.is_operator_padding_disabled() {
                    self.pad_operators(new_operator.unwrap());
                    continue;
                }
            }

            // remove spaces before commas
            if self.current_char == ',' {
                let len = self.formatted_line.len();
                let last_text = self.formatted_line.iter().rposition(|&ch| ch != ' ');
                if let Some(last_text) = last_text {
                    if last_text < len - 1 {
                        self.formatted_line.truncate(last_text + 1);
                        self.space_pad_num -= (len - (last_text + 1)) as i32;
                    }
                }
            }

            // pad commas and semicolons
            if self.current_char == ';'
                || (self.current_char == ','
                    && (self.options.pad_operators || self.options.pad_commas))
            {
                let next_char = self
                    .current_line
                    .get(self.char_num + 1)
                    .copied()
                    .unwrap_or(' ');
                if !is_whitespace(next_char)
                    && !matches!(next_char, '}' | ')' | ']' | '>' | ';')
                    && !self.is_before_any_comment()
                {
                    self.append_current_char(true);
                    self.append_space_after();
                    continue;
                }
            }

            // pad parens
            if self.current_char == '(' || self.current_char == ')' {
                if self.current_char == '('
                    && self.options.pad_header
                    && (self.is_char_immediately_post_return
                        || self.is_char_immediately_post_throw
                        || self.is_char_immediately_post_new_delete)
                {
                    self.append_space_pad();
                }

                if self.options.pad_parens_outside
                    || self.options.pad_parens_inside
                    || self.options.unpad_parens
                    || self.options.pad_first_paren_out
                {
                    self.pad_parens();
                } else {
                    self.append_current_char(true);
                }

                if self.is_in_objc_method_definition {
                    if self.current_char == '(' && self.is_immediately_post_objc_method_prefix {
                        if self.options.pad_method_prefix || self.options.unpad_method_prefix {
                            self.pad_objc_method_prefix();
                        }
                        self.is_immediately_post_objc_method_prefix = false;
                        self.is_in_objc_return_type = true;
                    } else if self.current_char == ')' && self.is_in_objc_return_type {
                        if self.options.pad_return_type || self.options.unpad_return_type {
                            self.pad_objc_return_type();
                        }
                        self.is_in_objc_return_type = false;
                    } else if self.is_in_objc_param
                        && (self.options.pad_param_type || self.options.unpad_param_type)
                    {
                        self.pad_objc_param_type();
                    }
                }
                continue;
            }

            // bypass the entire operator
            if let Some(op) = new_operator {
                self.append_operator(op, true);
                self.go_forward(op.len() - 1);
                continue;
            }

            self.append_current_char(true);
        }

        // the formatted line is ready: indent it
        let ready_formatted_line_length = self.ready_formatted_line.trim().len();

        let beautified;
        if self.prepend_empty_line
            && ready_formatted_line_length > 0
            && self.previous_ready_formatted_line_length > 0
        {
            // deliver a blank line first; the ready line waits one call
            self.is_line_ready = true;
            self.beautifier.in_line_number = self.line_number;
            beautified = self.beautifier.beautify("");
            self.previous_ready_formatted_line_length = 0;
            self.last_line_enhancable = true;
        } else {
            self.is_line_ready = false;
            self.beautifier.in_line_number = self.line_number;
            self.beautifier.run_in_indent_continuation = self.run_in_indent_chars;
            let ready = std::mem::take(&mut self.ready_formatted_line);
            beautified = self.beautifier.beautify(&ready);
            self.previous_ready_formatted_line_length = ready_formatted_line_length;
            self.last_line_enhancable =
                !self.beautifier.line_comment_no_beautify && !self.is_formatting_mode_off;
            self.run_in_indent_chars = 0;
            self.beautifier.line_comment_no_beautify = self.line_comment_no_indent;
            self.line_comment_no_indent = false;
            self.beautifier.is_in_indentable_preproc = self.is_indentable_preprocessor;
            self.is_indentable_preprocessor = false;
            self.beautifier.is_else_header_indent = self.else_header_follows_comments;
            self.beautifier.is_case_header_comment_indent = self.case_header_follows_comments;
            self.beautifier.objc_colon_align_subsequent = self.objc_colon_align;
            if self.is_char_immediately_post_non_in_stmt {
                self.beautifier.is_non_in_statement_array = false;
                self.is_char_immediately_post_non_in_stmt = false;
            }
            self.is_in_preprocessor_beautify = self.is_in_preprocessor;
            self.beautifier.is_in_beautify_sql = self.is_in_exec_sql;
        }

        self.prepend_empty_line = false;
        self.compute_checksum_out(&beautified);
        beautified
    }

    /// Actions taken at the first character after a completed header.
    /// Returns true when the dispatch loop should advance to the next
    /// character without further processing.
    fn handle_immediately_post_header(&mut self) -> bool {
        // should braces be added?
        if self.current_char != '{'
            && self.options.add_braces
            && self.current_char != '#'
            && (self.options.break_one_line_statements || !self.is_header_in_multi_statement_line)
            && self.is_ok_to_break_block(self.top_brace_type())
        {
            let braces_added = self.add_braces_to_statement();
            if braces_added && !self.options.add_one_line_braces {
                let first_text = find_first_not_of_ws(&self.current_line, 0);
                if first_text == Some(self.char_num) || self.options.break_one_line_headers {
                    self.break_current_one_line_block = true;
                }
            }
        }
        // should braces be removed?
        else if self.current_char == '{' && self.options.remove_braces {
            let braces_removed = self.remove_braces_from_statement();
            if braces_removed {
                self.should_remove_next_closing_brace = true;
                if self.is_before_any_line_end_comment(self.char_num) {
                    self.space_pad_num -= 1;
                } else if self.options.break_one_line_blocks
                    || (self.current_line_begins_with_brace
                        && find_first_not_of_ws(&self.current_line, 0).is_some())
                {
                    self.should_break_line_at_next_char = true;
                }
                self.is_immediately_post_header = false;
                return true;
            }
        }

        // break 'else if' when requested
        if self.options.break_else_ifs
            && self.current_header == Some(Header::Else)
            && self.is_ok_to_break_block(self.top_brace_type())
            && !self.is_before_any_comment()
            && (self.options.break_one_line_statements || !self.is_header_in_multi_statement_line)
        {
            let rest: String = self.current_line[self.char_num..].iter().collect();
            let next_text = self.peek_next_text(&rest, false);
            let chars: Vec<char> = next_text.chars().collect();
            if !chars.is_empty()
                && is_char_potential_header(self.file_type(), &chars, 0)
                && self.tables.find_header(&chars, 0, &self.tables.headers) == Some(Header::If)
            {
                self.is_in_line_break = true;
            }
        }

        // break a one-line header from its statement
        if self.options.break_one_line_headers
            && self.peek_next_char() != ' '
            && (self.options.break_one_line_statements
                || (!self.is_header_in_multi_statement_line && !self.is_multi_statement_line()))
            && self.is_ok_to_break_block(self.top_brace_type())
            && !self.is_before_any_comment()
        {
            if self.current_char == '{' {
                if !self.current_line_begins_with_brace {
                    if self.is_one_line_block_reached(self.char_num) == 3 {
                        self.is_in_line_break = false;
                    } else {
                        self.break_current_one_line_block = true;
                    }
                }
            } else if self.current_header == Some(Header::Else) {
                let rest: String = self.current_line[self.char_num..].iter().collect();
                let next_text = self.peek_next_text(&rest, true);
                let chars: Vec<char> = next_text.chars().collect();
                if !chars.is_empty()
                    && ((is_char_potential_header(self.file_type(), &chars, 0)
                        && self.tables.find_header(&chars, 0, &self.tables.headers)
                            != Some(Header::If))
                        || chars[0] == '{')
                {
                    self.is_in_line_break = true;
                }
            } else {
                self.is_in_line_break = true;
            }
        }

        self.is_immediately_post_header = false;
        false
    }

    /// The `{` / `}` section of the dispatch loop.
    fn handle_brace(&mut self) {
        // the classification was already done for an appended brace
        if self.current_char == '{' && !self.append_opening_brace {
            let new_brace_type = self.get_brace_type();
            self.break_current_one_line_block = false;
            self.found_namespace_header = false;
            self.found_class_header = false;
            self.found_struct_header = false;
            self.found_interface_header = false;
            self.found_pre_definition_header = false;
            self.found_pre_command_header = false;
            self.found_pre_command_macro = false;
            self.found_trailing_return_type = false;
            self.is_in_potential_calculation = false;
            self.is_in_objc_method_definition = false;
            self.is_immediately_post_objc_method_prefix = false;
            self.is_in_objc_interface = false;
            self.is_in_enum = false;
            self.is_java_static_constructor = false;
            self.is_char_immediately_post_non_in_stmt = false;
            self.need_header_opening_brace = false;
            self.should_keep_line_unbroken = false;
            self.return_type_checked = false;
            self.objc_colon_align = 0;
            self.method_break_char_num = None;
            self.method_break_line_num = 0;
            self.method_attach_char_num = None;
            self.method_attach_line_num = 0;

            self.is_previous_brace_block_related = !new_brace_type.intersects(BraceType::ARRAY);
            self.brace_type_stack.push(new_brace_type);
            self.pre_brace_header_stack.push(self.current_header);
            self.current_header = None;
            self.struct_stack.push(self.beautifier.is_in_indentable_struct);
            if new_brace_type.intersects(BraceType::STRUCT) && self.is_c_style() {
                self.beautifier.is_in_indentable_struct =
                    self.is_struct_access_modified(self.char_num);
            } else {
                self.beautifier.is_in_indentable_struct = false;
            }
        }

        // must be done before the stack is popped
        let brace_type = self.top_brace_type();
        let is_opening_array_brace = brace_type.intersects(BraceType::ARRAY)
            && self.brace_type_stack.len() >= 2
            && !self.brace_type_stack[self.brace_type_stack.len() - 2]
                .intersects(BraceType::ARRAY);

        if self.current_char == '}' {
            // a block ending with a brace doesn't need a post empty line
            self.is_append_post_block_empty_line_requested = false;
            if self.is_in_asm {
                self.end_of_asm_reached = true;
            }
            self.is_in_asm_one_line = false;
            self.is_in_quote = false;
            self.should_keep_line_unbroken = false;
            self.square_bracket_count = 0;

            if self.brace_type_stack.len() > 1 {
                self.previous_brace_type = *self.brace_type_stack.last().unwrap();
                self.brace_type_stack.pop();
                self.is_previous_brace_block_related = !brace_type.intersects(BraceType::ARRAY);
            } else {
                self.previous_brace_type = BraceType::NULL;
                self.is_previous_brace_block_related = false;
            }

            self.current_header = self.pre_brace_header_stack.pop().flatten();
            self.beautifier.is_in_indentable_struct = self.struct_stack.pop().unwrap_or(false);

            if self.beautifier.is_non_in_statement_array
                && (!self.top_brace_type().intersects(BraceType::ARRAY)
                    || self.peek_next_char() == ';')
            {
                self.is_immediately_post_non_in_stmt = true;
            }

            if !self.options.break_one_line_statements && self.next_word_is_else() {
                // 'else' at the end of the line
                self.should_break_line_at_next_char = true;
            }
        }

        // format the brace
        self.append_opening_brace = false;
        if brace_type.intersects(BraceType::ARRAY) {
            self.format_array_braces(brace_type, is_opening_array_brace);
        } else if self.current_char == '{' {
            self.format_opening_brace(brace_type);
        } else {
            self.format_closing_brace(brace_type);
        }
    }

    /// Break decisions for the first statement after `{` or `}`.
    fn handle_post_block_statement(&mut self) {
        let top = self.top_brace_type();
        let first_after_block = ((self.previous_command_char == '{'
            && self.is_previous_brace_block_related)
            || (self.previous_command_char == '}'
                && !self.is_immediately_post_empty_block
                && self.is_previous_brace_block_related
                && !self.is_previous_char_post_comment
                && self.peek_next_char() != ' '
                && !self.previous_brace_type.intersects(BraceType::DEFINITION)
                && !top.intersects(BraceType::DEFINITION)))
            && self.is_ok_to_break_block(top);
        let array_case = self.previous_command_char == '{'
            && top.intersects(BraceType::ARRAY)
            && !top.intersects(BraceType::SINGLE_LINE)
            && self.beautifier.is_non_in_statement_array;
        let pico_case = self.formatting_style() == crate::config::Style::Pico
            && self.previous_command_char == '{'
            && self.is_previous_brace_block_related
            && top.intersects(BraceType::COMMAND)
            && top.intersects(BraceType::SINGLE_LINE)
            && self.brace_format_mode() == BraceMode::RunIn;

        if !(first_after_block || array_case || pico_case) {
            return;
        }

        self.is_char_immediately_post_open_block = self.previous_command_char == '{';
        self.is_char_immediately_post_close_block = self.previous_command_char == '}';

        if self.is_char_immediately_post_open_block
            && !self.is_char_immediately_post_comment
            && !self.is_char_immediately_post_line_comment
        {
            self.previous_command_char = ' ';
            match self.brace_format_mode() {
                BraceMode::None => {
                    if top.intersects(BraceType::SINGLE_LINE)
                        && (top.intersects(BraceType::BREAK_BLOCK)
                            || self.options.break_one_line_blocks)
                    {
                        self.is_in_line_break = true;
                    } else if self.current_line_begins_with_brace {
                        self.format_run_in();
                    } else {
                        self.break_line(false);
                    }
                }
                BraceMode::RunIn if self.current_char != '#' => self.format_run_in(),
                _ => self.is_in_line_break = true,
            }
        } else if self.is_char_immediately_post_close_block
            && self.options.break_one_line_statements
            && !self.is_char_immediately_post_comment
            && ((is_legal_name_char(self.file_type(), self.current_char)
                && self.current_char != '.')
                || matches!(self.current_char, '+' | '-' | '*' | '&' | '('))
        {
            self.previous_command_char = ' ';
            self.is_in_line_break = true;
        }
    }

    /// Header recognition; returns true when the loop should continue.
    fn handle_header_section(&mut self) -> bool {
        self.is_non_paren_header = false;
        self.found_closing_header = false;

        let tables = std::rc::Rc::clone(&self.tables);
        let mut new_header = self.find_header_at_cursor(&tables.headers);

        if let Some(header) = new_header {
            let header_end = self.char_num + header.text().len() - 1;
            // Java can have a 'default' not in a switch
            if header == Header::Default
                && crate::core::chartype::peek_next_char(&self.current_line, header_end) != ':'
            {
                new_header = None;
            }
            // Qt headers may be variables in C++
            if self.is_c_style() && matches!(header, Header::Forever | Header::Foreach) {
                if (self.char_num..self.current_line.len())
                    .any(|p| self.current_line[p] == '=' || self.current_line[p] == ';')
                {
                    new_header = None;
                }
            }
            if self.is_java_style() && header == Header::Synchronized {
                // synchronized statements, not synchronized methods
                if !self.top_brace_type().intersects(BraceType::COMMAND) {
                    new_header = None;
                }
            } else if header == Header::Using
                && crate::core::chartype::peek_next_char(&self.current_line, header_end) != '('
            {
                new_header = None;
            }
        }

        if let Some(header) = new_header {
            self.found_closing_header = self.is_closing_header(header);

            if !self.found_closing_header {
                // closing-header pairings
                if (header == Header::While && self.current_header == Some(Header::Do))
                    || (header == Header::Finally && self.current_header == Some(Header::Try))
                {
                    self.found_closing_header = true;
                } else if self.is_sharp_style()
                    && self.previous_non_ws_char == '}'
                    && ((header == Header::Set && self.current_header == Some(Header::Get))
                        || (header == Header::Remove && self.current_header == Some(Header::Add)))
                    && self.is_ok_to_break_block(self.top_brace_type())
                {
                    // don't append an empty block between related accessors
                    self.is_append_post_block_empty_line_requested = false;
                }
            }

            let previous_header = self.current_header;
            self.current_header = Some(header);
            self.need_header_opening_brace = true;

            // is the previous statement on the same line?
            if (self.previous_non_ws_char == ';' || self.previous_non_ws_char == ':')
                && !self.is_in_line_break
                && self.is_ok_to_break_block(self.top_brace_type())
            {
                // break the line at the header unless multiple 'case'
                // statements share a line
                if self.max_code_length().is_some() && previous_header != Some(Header::Case) {
                    self.is_in_line_break = true;
                } else {
                    self.is_header_in_multi_statement_line = true;
                }
            }

            if self.found_closing_header && self.previous_non_ws_char == '}' {
                if self.is_ok_to_break_block(self.top_brace_type()) {
                    self.is_line_break_before_closing_header();
                }
                // comment adjustment for the closing header
                if self.is_in_line_break {
                    self.next_line_space_pad_num = self.get_next_line_comment_adjustment();
                } else {
                    self.space_pad_num = self.get_current_line_comment_adjustment();
                }
            }

            // check for a non-paren header
            self.is_non_paren_header = self
                .find_header_at_cursor(&tables.non_paren_headers)
                .is_some();

            if self.is_non_paren_header && matches!(header, Header::Catch | Header::Case) {
                let start_char = self.char_num + header.text().len() - 1;
                if crate::core::chartype::peek_next_char(&self.current_line, start_char) == '(' {
                    self.is_non_paren_header = false;
                }
            }

            // join 'else if' statements
            if header == Header::If
                && previous_header == Some(Header::Else)
                && self.is_in_line_break
                && !self.options.break_else_ifs
                && !self.is_char_immediately_post_line_comment
                && !self.is_immediately_post_preprocessor
            {
                // 'else' must be the last thing on the line
                let tail: String = self.formatted_line
                    [self.formatted_line.len().saturating_sub(6)..]
                    .iter()
                    .collect();
                if tail.contains("else") {
                    self.append_space_pad();
                    self.is_in_line_break = false;
                }
            }

            self.append_sequence(header.text(), true);
            self.go_forward(header.text().len() - 1);
            // a paren header gets a space after it when requested
            if self.options.pad_header
                && !self.is_non_paren_header
                && self.char_num + 1 < self.current_line.len()
                && !is_whitespace(self.current_line[self.char_num + 1])
            {
                self.append_space_pad();
            }

            // a closing while() never opens a block
            if !matches!(header, Header::Case | Header::Default)
                && !(self.found_closing_header && header == Header::While)
            {
                self.is_in_header = true;
                if self.is_non_paren_header && !self.is_sharp_style_with_paren(Some(header)) {
                    self.is_immediately_post_header = true;
                    self.is_in_header = false;
                }
            }

            if self.options.break_blocks
                && self.is_ok_to_break_block(self.top_brace_type())
                && !self.is_header_in_multi_statement_line
            {
                if previous_header.is_none()
                    && !self.found_closing_header
                    && !self.is_char_immediately_post_open_block
                    && !self.is_immediately_post_comment_only
                {
                    self.is_prepend_post_block_empty_line_requested = true;
                }

                if self.is_closing_header(header) || self.found_closing_header {
                    self.is_prepend_post_block_empty_line_requested = false;
                }

                if self.options.break_closing_header_blocks
                    && self.is_char_immediately_post_close_block
                    && !self.is_immediately_post_comment_only
                    && !(header == Header::While && self.found_closing_header)
                {
                    self.is_prepend_post_block_empty_line_requested = true;
                }
            }

            if matches!(header, Header::Case | Header::Default) {
                self.is_in_case = true;
            }
            return true;
        }

        // pre-definition headers
        if let Some(header) = self.find_header_at_cursor(&tables.pre_definition_headers) {
            if *self.paren_stack.last().unwrap() == 0 && !self.is_in_enum {
                match header {
                    Header::Namespace | Header::Module => self.found_namespace_header = true,
                    Header::Class => self.found_class_header = true,
                    Header::Struct => self.found_struct_header = true,
                    Header::Interface => {
                        if !self.found_namespace_header && !self.found_class_header {
                            self.found_interface_header = true;
                        }
                    }
                    _ => {}
                }
                self.found_pre_definition_header = true;
                self.append_sequence(header.text(), true);
                self.go_forward(header.text().len() - 1);
                return true;
            }
        }

        // pre-command headers come after the function arguments
        let found_pre_command = self.tables.pre_command_headers.iter().any(|word| {
            crate::core::chartype::is_word_at(
                self.file_type(),
                &self.current_line,
                self.char_num,
                word,
            )
        });
        if found_pre_command {
            if self.previous_non_ws_char == ')' {
                self.found_pre_command_header = true;
            }
        } else if let Some(cast) = self
            .tables
            .cast_operators
            .iter()
            .copied()
            .find(|word| {
                crate::core::chartype::is_word_at(
                    self.file_type(),
                    &self.current_line,
                    self.char_num,
                    word,
                )
            })
        {
            self.found_cast_operator = true;
            self.append_sequence(cast, true);
            self.go_forward(cast.len() - 1);
            return true;
        }

        false
    }

    /// The `:` disambiguation of the dispatch loop.
    fn handle_colon(&mut self) {
        if self.is_in_case {
            self.is_in_case = false;
            if self.options.break_one_line_statements {
                self.passed_colon = true;
            }
        } else if self.is_c_style()
            && self.is_ok_to_break_block(self.top_brace_type())
            && self.options.break_one_line_statements
            && !self.found_question_mark
            && !self.found_pre_definition_header
            && self.previous_command_char != ')'
            && !self.found_pre_command_header
            && self.square_bracket_count == 0
            && !self.is_in_objc_method_definition
            && !self.is_in_objc_interface
            && !self.is_in_objc_selector
            && !self.peek_next_char().is_ascii_digit()
            && !self.is_in_enum
            && !self.is_in_asm
            && !self.is_in_asm_one_line
            && !self.is_in_asm_block
        {
            self.passed_colon = true;
        }

        if self.is_c_style()
            && (self.square_bracket_count > 0
                || self.is_in_objc_method_definition
                || self.is_in_objc_selector)
            && !self.found_question_mark
        {
            self.is_immediately_post_objc_method_prefix = false;
            self.is_in_objc_return_type = false;
            self.is_in_objc_param = true;
            if self.options.pad_method_colon != crate::config::MethodColonPad::NoChange {
                self.pad_objc_method_colon();
            }
        }

        if self.is_in_objc_interface {
            self.append_space_pad();
            if self.char_num + 1 < self.current_line.len()
                && !is_whitespace(self.current_line[self.char_num + 1])
            {
                self.current_line.insert(self.char_num + 1, ' ');
            }
        }

        if self.is_class_initializer_colon() {
            self.is_in_class_initializer = true;
        }
    }

    /// A `:` outside ternary, parens, and enums starts a constructor
    /// initializer list.
    fn is_class_initializer_colon(&self) -> bool {
        if self.found_question_mark || *self.paren_stack.last().unwrap() > 0 || self.is_in_enum {
            return false;
        }
        self.is_c_style()
            && !self.is_in_case
            && (self.previous_command_char == ')' || self.found_pre_command_header)
    }

    /// Keyword recognition past the headers; returns true to continue.
    fn handle_keyword_section(&mut self) -> bool {
        let file_type = self.file_type();
        let word_at = |this: &Self, word: &str| {
            crate::core::chartype::is_word_at(file_type, &this.current_line, this.char_num, word)
        };

        if word_at(self, "new") || word_at(self, "delete") {
            self.is_in_potential_calculation = false;
            self.is_immediately_post_new_delete = true;
        }

        if word_at(self, "return") {
            // 'return' begins a calculation like an '=' sign
            self.is_in_potential_calculation = true;
            self.is_immediately_post_return = true;
        }

        if word_at(self, "operator") {
            self.is_immediately_post_operator = true;
        }

        if word_at(self, "enum") {
            let first_num = (0..self.current_line.len()).find(|&p| {
                matches!(self.current_line[p], '(' | ')' | '{' | '}' | ',' | '/')
            });
            match first_num {
                None => self.is_in_enum = true,
                Some(p) if self.current_line[p] == '{' || self.current_line[p] == '/' => {
                    self.is_in_enum = true
                }
                _ => {}
            }
        }

        if self.is_c_style()
            && word_at(self, "throw")
            && self.previous_command_char != ')'
            && !self.found_pre_command_header
        {
            self.is_immediately_post_throw = true;
        }

        if self.is_c_style() && word_at(self, "extern") && self.is_extern_c_statement() {
            self.is_in_extern_c = true;
        }

        if self.is_c_style()
            && word_at(self, "auto")
            && (self.top_brace_type().intersects(BraceType::NULL)
                || self.top_brace_type().intersects(BraceType::DEFINITION))
        {
            self.found_trailing_return_type = true;
        }

        // break/attach return type
        if (self.options.break_return_type
            || self.options.break_return_type_decl
            || self.options.attach_return_type
            || self.options.attach_return_type_decl)
            && (self.top_brace_type().intersects(BraceType::NULL)
                || self.top_brace_type().intersects(BraceType::DEFINITION))
            && !self.return_type_checked
            && !self.found_namespace_header
            && !self.found_class_header
            && !self.is_in_objc_method_definition
            && Some(self.char_num) == find_first_not_of_ws(&self.current_line, 0)
            && !(self.is_c_style()
                && (word_at(self, "public") || word_at(self, "private") || word_at(self, "protected")))
        {
            self.find_return_type_split_point();
            self.return_type_checked = true;
        }

        // Objective-C NSException macros are pre-command headers
        if self.is_c_style() && (word_at(self, "NS_DURING") || word_at(self, "NS_HANDLER")) {
            self.found_pre_command_macro = true;
        }

        if self.is_c_style() && self.is_exec_sql_at(self.char_num) {
            self.is_in_exec_sql = true;
        }

        if self.is_c_style() {
            if word_at(self, "asm") || word_at(self, "__asm__") {
                self.is_in_asm = true;
            } else if word_at(self, "_asm") || word_at(self, "__asm") {
                let index = if self.peek_next_char() == '_' { 5 } else { 4 };
                let peeked = crate::core::chartype::peek_next_char(
                    &self.current_line,
                    self.char_num + index,
                );
                if peeked == '{' || peeked == ' ' {
                    self.is_in_asm_block = true;
                } else {
                    self.is_in_asm_one_line = true;
                }
            }
        }

        self.check_java_static_constructor();

        if self.is_sharp_style() && (word_at(self, "delegate") || word_at(self, "unchecked")) {
            self.beautifier.is_sharp_delegate = true;
        }

        // append the entire name
        let name = get_current_word(file_type, &self.current_line, self.char_num);
        // the alternate 'and'/'or' operators are padded like operators
        if name == "and" || name == "or" {
            if self.options.pad_operators && self.previous_non_ws_char != ':' {
                self.append_space_pad();
                self.append_operator(&name, true);
                self.go_forward(name.len() - 1);
                if !self.is_before_any_comment()
                    && !(self.current_line.get(self.char_num + 1) == Some(&';'))
                    && !self.sequence_at(self.char_num + 1, "::")
                {
                    self.append_space_after();
                }
            } else {
                self.append_operator(&name, true);
                self.go_forward(name.len() - 1);
            }
        } else {
            self.append_sequence(&name, true);
            self.go_forward(name.len() - 1);
        }
        true
    }

    /// Objective-C statement openers; returns true to continue.
    fn handle_objc_statement(&mut self) -> bool {
        if self.current_char == '@'
            && self.is_c_style()
            && self.char_num + 1 < self.current_line.len()
            && !is_whitespace(self.current_line[self.char_num + 1])
            && is_char_potential_header(self.file_type(), &self.current_line, self.char_num + 1)
        {
            if crate::core::chartype::is_word_at(
                self.file_type(),
                &self.current_line,
                self.char_num + 1,
                "interface",
            ) && self.top_brace_type().intersects(BraceType::NULL)
            {
                self.is_in_objc_interface = true;
                self.append_sequence("@interface", true);
                self.go_forward("@interface".len() - 1);
                return true;
            }
            if crate::core::chartype::is_word_at(
                self.file_type(),
                &self.current_line,
                self.char_num + 1,
                "selector",
            ) {
                self.is_in_objc_selector = true;
                self.append_sequence("@selector", true);
                self.go_forward("@selector".len() - 1);
                return true;
            }
        }
        if (self.current_char == '-' || self.current_char == '+')
            && self.is_c_style()
            && find_first_not_of_ws(&self.current_line, 0) == Some(self.char_num)
            && !self.is_in_potential_calculation
            && !self.is_in_objc_method_definition
            && (self.top_brace_type().intersects(BraceType::NULL)
                || self.top_brace_type().intersects(BraceType::EXTERN))
        {
            self.is_in_objc_method_definition = true;
            self.is_immediately_post_objc_method_prefix = true;
            self.is_in_objc_param = false;
            self.is_in_objc_interface = false;
            self.append_current_char(true);
            return true;
        }
        false
    }

}
