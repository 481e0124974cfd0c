// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Comment, quote, preprocessor, and template sequence handling.

use super::state::Formatter;
use crate::config::BraceMode;
use crate::core::brace_type::BraceType;
use crate::core::chartype::{
    char_starts_with, find_first_not_of_ws, is_digit_separator, is_whitespace,
};
use crate::core::resources::Header;
use crate::source::PeekStream;

impl Formatter {
    /// Append a block-comment body, watching for the closer.
    pub(crate) fn format_comment_body(&mut self) {
        while self.char_num < self.current_line.len() {
            self.current_char = self.current_line[self.char_num];
            if self.is_sequence_reached("*/") {
                self.format_comment_closer();
                break;
            }
            if self.current_char == '\t' && self.options.convert_tabs {
                self.convert_tab_to_spaces();
            }
            self.append_current_char(true);
            self.char_num += 1;
        }
        if self.options.strip_comment_prefix {
            self.strip_comment_prefix();
        }
    }

    pub(crate) fn format_comment_opener(&mut self) {
        self.is_in_comment = true;
        self.is_in_comment_start_line = true;
        self.is_immediately_post_line_comment = false;
        if self.previous_non_ws_char == '}' {
            self.reset_end_of_statement();
        }

        // check for a header following the comment
        let mut following_header = None;
        if self.does_line_start_comment
            && !self.is_immediately_post_comment_only
            && self.top_brace_type().intersects(BraceType::COMMAND)
            && (self.options.break_else_ifs
                || self.is_in_switch_statement()
                || (self.options.break_blocks
                    && !self.is_immediately_post_empty_line
                    && self.previous_command_char != '{'))
        {
            let rest: String = self.current_line[self.char_num..].iter().collect();
            following_header = self.check_for_header_following_comment(&rest);
        }

        if self.space_pad_num != 0 && !self.is_in_line_break {
            self.adjust_comments();
        }
        self.formatted_line_comment_num = Some(self.formatted_line.len());

        // must be done before the append
        if self.previous_command_char == '{'
            && !self.is_immediately_post_comment
            && !self.is_immediately_post_line_comment
        {
            if self.top_brace_type().intersects(BraceType::NAMESPACE) {
                // a namespace run-in is always broken
                self.is_in_line_break = true;
            } else if self.brace_format_mode() == BraceMode::None {
                if self.current_line_begins_with_brace {
                    self.format_run_in();
                }
            } else if self.brace_format_mode() == BraceMode::Attach {
                if self.formatted_line.first() == Some(&'{')
                    && !self.top_brace_type().intersects(BraceType::SINGLE_LINE)
                {
                    self.is_in_line_break = true;
                }
            } else if self.brace_format_mode() == BraceMode::RunIn {
                if self.formatted_line.first() == Some(&'{') {
                    self.format_run_in();
                }
            }
        } else if !self.does_line_start_comment {
            self.no_trim_comment_continuation = true;
        }

        // the beautifier needs to know about the following statements
        if self.options.break_else_ifs && following_header == Some(Header::Else) {
            self.else_header_follows_comments = true;
        }
        if matches!(following_header, Some(Header::Case | Header::Default)) {
            self.case_header_follows_comments = true;
        }

        self.append_sequence("/*", true);
        self.go_forward(1);

        // break before the comment when an opening header follows it
        if self.options.break_blocks
            && following_header.is_some()
            && !self.is_immediately_post_empty_line
            && self.previous_command_char != '{'
        {
            if following_header.unwrap().is_closing_header() {
                if !self.options.break_closing_header_blocks {
                    self.is_prepend_post_block_empty_line_requested = false;
                }
            } else {
                self.is_prepend_post_block_empty_line_requested = true;
            }
        }

        if self.previous_command_char == '}' {
            self.current_header = None;
        }
    }

    pub(crate) fn format_comment_closer(&mut self) {
        self.is_in_comment = false;
        self.no_trim_comment_continuation = false;
        self.is_immediately_post_comment = true;
        self.append_sequence("*/", true);
        self.go_forward(1);

        if self.does_line_start_comment
            && find_first_not_of_ws(&self.current_line, self.char_num + 1).is_none()
        {
            self.line_ends_in_comment_only = true;
        }
        if self.peek_next_char() == '}'
            && self.previous_command_char != ';'
            && !self.top_brace_type().intersects(BraceType::ARRAY)
            && !self.is_in_preprocessor
            && self.is_ok_to_break_block(self.top_brace_type())
        {
            self.is_in_line_break = true;
            self.should_break_line_at_next_char = true;
        }
    }

    /// Append a line-comment body to the end of the line.
    pub(crate) fn format_line_comment_body(&mut self) {
        while self.char_num < self.current_line.len() {
            self.current_char = self.current_line[self.char_num];
            if self.current_char == '\t' && self.options.convert_tabs {
                self.convert_tab_to_spaces();
            }
            self.append_current_char(true);
            self.char_num += 1;
        }

        // a line comment always ends its line
        self.is_in_line_break = true;
        self.is_in_line_comment = false;
        self.is_immediately_post_line_comment = true;
        self.current_char = '\0';
    }

    pub(crate) fn format_line_comment_opener(&mut self) {
        self.is_in_line_comment = true;
        self.is_char_immediately_post_comment = false;
        if self.previous_non_ws_char == '}' {
            self.reset_end_of_statement();
        }

        let mut following_header = None;
        if self.line_is_line_comment_only
            && !self.is_immediately_post_comment_only
            && self.top_brace_type().intersects(BraceType::COMMAND)
            && (self.options.break_else_ifs
                || self.is_in_switch_statement()
                || (self.options.break_blocks
                    && !self.is_immediately_post_empty_line
                    && self.previous_command_char != '{'))
        {
            let rest: String = self.current_line[self.char_num..].iter().collect();
            following_header = self.check_for_header_following_comment(&rest);
        }

        // comments in column one or two are not indented
        if (!self.options.indent_col1_comments && !self.line_comment_no_indent)
            || self.found_namespace_header
        {
            if self.char_num == 0 {
                self.line_comment_no_indent = true;
            } else if self.char_num == 1 && self.current_line[0] == ' ' {
                self.line_comment_no_indent = true;
            }
        }
        if !self.line_comment_no_indent && self.space_pad_num != 0 && !self.is_in_line_break {
            self.adjust_comments();
        }
        self.formatted_line_comment_num = Some(self.formatted_line.len());

        // check for a run-in statement
        if self.previous_command_char == '{'
            && !self.is_immediately_post_comment
            && !self.is_immediately_post_line_comment
        {
            match self.brace_format_mode() {
                BraceMode::None => {
                    if self.current_line_begins_with_brace {
                        self.format_run_in();
                    }
                }
                BraceMode::RunIn => {
                    if !self.line_comment_no_indent {
                        self.format_run_in();
                    } else {
                        self.is_in_line_break = true;
                    }
                }
                BraceMode::Break => {
                    if self.formatted_line.first() == Some(&'{') {
                        self.is_in_line_break = true;
                    }
                }
                _ => {
                    if self.current_line_begins_with_brace {
                        self.is_in_line_break = true;
                    }
                }
            }
        }

        if self.options.break_else_ifs && following_header == Some(Header::Else) {
            self.else_header_follows_comments = true;
        }
        if matches!(following_header, Some(Header::Case | Header::Default)) {
            self.case_header_follows_comments = true;
        }

        self.append_sequence("//", true);
        self.go_forward(1);

        if self.options.break_blocks
            && following_header.is_some()
            && !self.is_immediately_post_empty_line
            && self.previous_command_char != '{'
        {
            if following_header.unwrap().is_closing_header() {
                if !self.options.break_closing_header_blocks {
                    self.is_prepend_post_block_empty_line_requested = false;
                }
            } else {
                self.is_prepend_post_block_empty_line_requested = true;
            }
        }

        if self.previous_command_char == '}' {
            self.current_header = None;
        }

        // with tabbed input don't convert the following tabs to spaces
        if self.options.indent.uses_tabs() && self.line_comment_no_indent {
            while self.char_num + 1 < self.current_line.len()
                && self.current_line[self.char_num + 1] == '\t'
            {
                self.char_num += 1;
                self.current_char = self.current_line[self.char_num];
                self.append_current_char(true);
            }
        }

        if self.char_num + 1 == self.current_line.len() {
            self.is_in_line_break = true;
            self.is_in_line_comment = false;
            self.is_immediately_post_line_comment = true;
            self.current_char = '\0';
        }
    }

    pub(crate) fn format_quote_body(&mut self) {
        if self.is_special_char {
            self.is_special_char = false;
        } else if self.current_char == '\\' && !self.is_in_verbatim_quote {
            if self.peek_next_char() == ' ' {
                self.have_line_continuation_char = true;
            } else {
                self.is_special_char = true;
            }
        } else if self.is_in_verbatim_quote && self.current_char == '"' {
            if self.is_c_style() {
                let delim: Vec<char> = std::iter::once(')')
                    .chain(self.verbatim_delimiter.chars())
                    .collect();
                if self.char_num >= delim.len()
                    && self.current_line[self.char_num - delim.len()..self.char_num] == delim[..]
                {
                    self.is_in_quote = false;
                    self.is_in_verbatim_quote = false;
                }
            } else if self.is_sharp_style() {
                if self.current_line.get(self.char_num + 1) == Some(&'"') {
                    self.append_sequence("\"\"", true);
                    self.go_forward(1);
                    return;
                }
                self.is_in_quote = false;
                self.is_in_verbatim_quote = false;
            }
        } else if self.quote_char == self.current_char {
            self.is_in_quote = false;
        }

        self.append_current_char(true);

        // tabs in quotes are not touched by convert-tabs
        if self.is_in_quote && self.current_char != '\\' {
            while self.char_num + 1 < self.current_line.len()
                && self.current_line[self.char_num + 1] != self.quote_char
                && self.current_line[self.char_num + 1] != '\\'
            {
                self.char_num += 1;
                self.current_char = self.current_line[self.char_num];
                self.append_current_char(true);
            }
        }
        if self.char_num + 1 >= self.current_line.len()
            && self.current_char != '\\'
            && !self.is_in_verbatim_quote
        {
            // missing closing quote
            self.is_in_quote = false;
        }
    }

    pub(crate) fn format_quote_opener(&mut self) {
        self.is_in_quote = true;
        self.quote_char = self.current_char;
        if self.is_c_style() && self.previous_char == 'R' {
            if let Some(paren_pos) = (self.char_num..self.current_line.len())
                .find(|&p| self.current_line[p] == '(')
            {
                self.is_in_verbatim_quote = true;
                self.verbatim_delimiter = self.current_line[self.char_num + 1..paren_pos]
                    .iter()
                    .collect();
            }
        } else if self.is_sharp_style() && self.previous_char == '@' {
            self.is_in_verbatim_quote = true;
        }

        // a quote following a brace is an array
        if self.previous_command_char == '{'
            && !self.is_immediately_post_comment
            && !self.is_immediately_post_line_comment
            && self.beautifier.is_non_in_statement_array
            && !self.top_brace_type().intersects(BraceType::SINGLE_LINE)
            && !is_whitespace(self.peek_next_char())
        {
            match self.brace_format_mode() {
                BraceMode::None => {
                    if self.current_line_begins_with_brace {
                        self.format_run_in();
                    }
                }
                BraceMode::RunIn => self.format_run_in(),
                BraceMode::Break => {
                    if self.formatted_line.first() == Some(&'{') {
                        self.is_in_line_break = true;
                    }
                }
                _ => {
                    if self.current_line_begins_with_brace {
                        self.is_in_line_break = true;
                    }
                }
            }
        }
        self.previous_command_char = ' ';
        self.append_current_char(true);
    }

    /// Track `#if`/`#else`/`#define` effects on the brace-type stack.
    pub(crate) fn process_preprocessor(&mut self) {
        let Some(preproc) = find_first_not_of_ws(&self.current_line, self.char_num + 1) else {
            return;
        };

        if char_starts_with(&self.current_line, preproc, "if") {
            self.preproc_brace_type_stack_size = self.brace_type_stack.len();
        } else if char_starts_with(&self.current_line, preproc, "else") {
            // discard stack entries added in the #if branch
            if self.preproc_brace_type_stack_size > 0 {
                while self.brace_type_stack.len() > self.preproc_brace_type_stack_size {
                    self.brace_type_stack.pop();
                }
            }
        } else if char_starts_with(&self.current_line, preproc, "define") {
            self.is_in_preprocessor_define_def = true;
        }
    }

    /// Scan an entire `#if`..`#endif` block for indentability: no braces,
    /// no class-constructor colon, no unmatched parens, no `\` continuation.
    pub(crate) fn is_indentable_preprocessor_block(&mut self, index: usize) -> bool {
        let first_line: String = self.current_line[index..].iter().collect();
        let mut is_first_line = true;
        let mut is_in_indentable_block = false;
        let mut block_contains_braces = false;
        let mut block_contains_define_continuation = false;
        let mut is_in_class_constructor = false;
        let mut is_potential_header_guard = false;
        let mut is_potential_header_guard2 = false;
        let mut num_block_indents = 0i32;
        let mut line_paren_count = 0i32;
        let mut next_line = first_line;
        let mut in_comment = false;
        let mut in_quote = false;
        let mut quote_char = ' ';
        let mut first_conditional = false;
        let mut peeked_bytes = 0usize;

        {
            let mut stream = PeekStream::new(&mut *self.source);
            'lines: loop {
                if is_first_line {
                    is_first_line = false;
                } else {
                    match stream.peek_next_line() {
                        Some(line) => {
                            peeked_bytes += line.len() + 1;
                            next_line = line;
                        }
                        None => break,
                    }
                }
                let chars: Vec<char> = next_line.chars().collect();
                let mut i = 0usize;
                while i < chars.len() {
                    let ch = chars[i];
                    if is_whitespace(ch) {
                        i += 1;
                        continue;
                    }
                    if char_starts_with(&chars, i, "/*") {
                        in_comment = true;
                    }
                    if in_comment {
                        if char_starts_with(&chars, i, "*/") {
                            in_comment = false;
                            i += 1;
                        }
                        i += 1;
                        continue;
                    }
                    if ch == '\\' {
                        i += 2;
                        continue;
                    }
                    if in_quote {
                        if ch == quote_char {
                            in_quote = false;
                        }
                        i += 1;
                        continue;
                    }
                    if ch == '"' || (ch == '\'' && !is_digit_separator(&chars, i)) {
                        in_quote = true;
                        quote_char = ch;
                        i += 1;
                        continue;
                    }
                    if char_starts_with(&chars, i, "//") {
                        break;
                    }
                    if ch == '#' {
                        let preproc = crate::beautifier::extract_preprocessor_statement(&chars);
                        if preproc.starts_with("if") {
                            num_block_indents += 1;
                            is_in_indentable_block = true;
                            if !self.processed_first_conditional {
                                self.processed_first_conditional = true;
                                first_conditional = true;
                                if is_ndef_preproc_statement(&chars, &preproc) {
                                    is_potential_header_guard = true;
                                }
                            }
                        } else if preproc == "endif" {
                            if num_block_indents > 0 {
                                num_block_indents -= 1;
                            }
                            if num_block_indents == 0 {
                                break 'lines;
                            }
                        } else if preproc == "define" {
                            if chars.last() == Some(&'\\') {
                                block_contains_define_continuation = true;
                            } else if is_potential_header_guard && num_block_indents == 1 {
                                is_potential_header_guard2 = true;
                            }
                        }
                        break;
                    }
                    if ch == '{' || ch == '}' {
                        block_contains_braces = true;
                    } else if ch == '(' {
                        line_paren_count += 1;
                    } else if ch == ')' {
                        line_paren_count -= 1;
                    } else if ch == ':' {
                        if chars.get(i + 1) == Some(&':') {
                            i += 1;
                        } else {
                            is_in_class_constructor = true;
                        }
                    }
                    if block_contains_braces
                        || is_in_class_constructor
                        || block_contains_define_continuation
                    {
                        break 'lines;
                    }
                    i += 1;
                }
                if line_paren_count != 0 {
                    break;
                }
            }
        }

        // the scan end position includes the lines read ahead
        self.preproc_block_end =
            (self.source.tell() + peeked_bytes).min(self.source.stream_length());
        if block_contains_braces
            || is_in_class_constructor
            || block_contains_define_continuation
            || line_paren_count != 0
            || num_block_indents != 0
        {
            is_in_indentable_block = false;
        }
        // bypass header include guards
        if first_conditional {
            let next_text = self.peek_next_text("", false);
            if next_text.is_empty() && is_potential_header_guard2 {
                is_in_indentable_block = false;
                self.preproc_block_end = 0;
            }
        }
        if !is_in_indentable_block {
            self.preproc_block_end = 0;
        }
        is_in_indentable_block
    }

    /// Determine whether a `<` opens a template parameter list.
    pub(crate) fn check_if_template_opener(&mut self) {
        let first_char = (self.char_num..self.current_line.len()).find(|&p| {
            !matches!(self.current_line[p], '<' | ' ' | '\t')
        });
        match first_char {
            None => return,
            Some(p) if self.current_line[p] == '=' => return,
            _ => {}
        }

        let mut is_first_line = true;
        let mut paren_depth = 0i32;
        let mut max_template_depth = 0i32;
        self.template_depth = 0;
        let mut next_line: String = self.current_line[self.char_num..].iter().collect();
        let mut in_comment = false;
        let mut in_quote = false;
        let mut quote_char = ' ';
        let mut depth = 0i32;
        let mut decided_template = false;

        let mut stream = PeekStream::new(&mut *self.source);
        'lines: loop {
            if is_first_line {
                is_first_line = false;
            } else {
                match stream.peek_next_line() {
                    Some(line) => next_line = line,
                    None => break,
                }
            }
            let chars: Vec<char> = next_line.chars().collect();
            let mut i = 0usize;
            while i < chars.len() {
                let ch = chars[i];
                if is_whitespace(ch) {
                    i += 1;
                    continue;
                }
                if char_starts_with(&chars, i, "/*") {
                    in_comment = true;
                }
                if in_comment {
                    if char_starts_with(&chars, i, "*/") {
                        in_comment = false;
                        i += 1;
                    }
                    i += 1;
                    continue;
                }
                if ch == '\\' {
                    i += 2;
                    continue;
                }
                if in_quote {
                    if ch == quote_char {
                        in_quote = false;
                    }
                    i += 1;
                    continue;
                }
                if ch == '"' || ch == '\'' {
                    in_quote = true;
                    quote_char = ch;
                    i += 1;
                    continue;
                }
                if char_starts_with(&chars, i, "//") {
                    break;
                }
                match ch {
                    '<' => {
                        depth += 1;
                        max_template_depth = max_template_depth.max(depth);
                    }
                    '>' => {
                        depth -= 1;
                        if depth == 0 {
                            // this is a template!
                            decided_template = true;
                            break 'lines;
                        }
                    }
                    '(' => paren_depth += 1,
                    ')' => {
                        paren_depth -= 1;
                        if paren_depth < 0 {
                            break 'lines;
                        }
                    }
                    ';' | '{' | '}' => break 'lines,
                    '&' | '|' => {
                        // '&&' or '||' is a comparison, not a template
                        if chars.get(i + 1) == Some(&ch) {
                            break 'lines;
                        }
                    }
                    _ => {}
                }
                i += 1;
            }
        }
        drop(stream);

        if decided_template {
            self.is_in_template = true;
            self.template_depth = max_template_depth;
        }
    }

    pub(crate) fn reset_end_of_statement(&mut self) {
        self.found_question_mark = false;
        self.found_namespace_header = false;
        self.found_class_header = false;
        self.found_struct_header = false;
        self.found_interface_header = false;
        self.found_pre_definition_header = false;
        self.found_pre_command_header = false;
        self.found_pre_command_macro = false;
        self.found_trailing_return_type = false;
        self.found_cast_operator = false;
        self.is_in_potential_calculation = false;
        self.beautifier.is_sharp_accessor = false;
        self.beautifier.is_sharp_delegate = false;
        self.is_in_objc_method_definition = false;
        self.is_immediately_post_objc_method_prefix = false;
        self.is_in_objc_return_type = false;
        self.is_in_objc_param = false;
        self.is_in_objc_interface = false;
        self.is_in_objc_selector = false;
        self.is_in_enum = false;
        self.is_in_extern_c = false;
        self.else_header_follows_comments = false;
        self.return_type_checked = false;
        self.beautifier.non_in_statement_brace = 0;
        self.question_mark_stack.clear();
    }

    pub(crate) fn is_in_switch_statement(&self) -> bool {
        self.pre_brace_header_stack
            .iter()
            .any(|&header| header == Some(Header::Switch))
    }

    /// Find a header following this comment (and any further comments).
    pub(crate) fn check_for_header_following_comment(
        &mut self,
        first_line: &str,
    ) -> Option<Header> {
        let next_text = self.peek_next_text(first_line, true);
        let chars: Vec<char> = next_text.chars().collect();
        if chars.is_empty() {
            return None;
        }
        self.tables.find_header(&chars, 0, &self.tables.headers)
    }

    /// Keep trailing comments aligned when padding changed the line length.
    pub(crate) fn adjust_comments(&mut self) {
        let comment_pos = (self.char_num..self.current_line.len()).find(|&p| {
            self.sequence_at(p, "//") || self.sequence_at(p, "/*")
        });
        let Some(pos) = comment_pos else {
            return;
        };
        if self.space_pad_num > 0 {
            // remove spaces before the comment, never below one
            let mut removable = 0usize;
            while removable < self.space_pad_num as usize
                && pos > self.char_num + removable + 1
                && self.current_line[pos - removable - 1] == ' '
                && self.current_line[pos - removable - 2] == ' '
            {
                removable += 1;
            }
            self.current_line.drain(pos - removable..pos);
        } else if self.space_pad_num < 0 {
            let spaces = (-self.space_pad_num) as usize;
            self.current_line
                .splice(pos..pos, std::iter::repeat(' ').take(spaces));
        }
    }

    /// Strip the leading `*` alignment prefix in block-comment bodies down
    /// to a single-space margin.
    pub(crate) fn strip_comment_prefix(&mut self) {
        if !self.is_in_comment && !self.is_in_comment_start_line {
            return;
        }
        if self.is_in_comment_start_line {
            return;
        }
        let Some(first_text) = self.formatted_line.iter().position(|&ch| !is_whitespace(ch))
        else {
            return;
        };
        if self.formatted_line.get(first_text) == Some(&'*') && first_text > 1 {
            self.formatted_line.drain(1..first_text);
        }
    }

    /// Comment adjustment when `} else` is about to break: next line form.
    pub(crate) fn get_next_line_comment_adjustment(&self) -> i32 {
        if self.char_num < 1 {
            return 0;
        }
        let last_brace = (0..self.char_num).rev().find(|&p| self.current_line[p] == '}');
        match last_brace {
            Some(pos) => pos as i32 - self.char_num as i32,
            None => 0,
        }
    }

    /// Comment adjustment when `} else` stays attached: current line form.
    pub(crate) fn get_current_line_comment_adjustment(&self) -> i32 {
        if self.char_num < 1 {
            return 2;
        }
        let last_brace = (0..self.char_num).rev().find(|&p| self.current_line[p] == '}');
        match last_brace {
            Some(_) => 0,
            None => 2,
        }
    }

    /// Decide whether a closing header (else/catch/while) breaks from its
    /// preceding `}`.
    pub(crate) fn is_line_break_before_closing_header(&mut self) {
        if self.current_header == Some(crate::core::resources::Header::While)
            && self.options.attach_closing_while
        {
            self.append_closing_header();
            return;
        }

        if matches!(self.brace_format_mode(), BraceMode::Break | BraceMode::RunIn)
            || self.options.attach_closing_brace
        {
            self.is_in_line_break = true;
        } else if self.brace_format_mode() == BraceMode::None {
            if self.options.break_closing_header_braces
                || self.options.brace_indent
                || self.options.block_indent
            {
                self.is_in_line_break = true;
            } else {
                self.append_space_pad();
                // is the closing brace broken?
                if let Some(first_char) = find_first_not_of_ws(&self.current_line, 0) {
                    if self.current_line[first_char] == '}' {
                        self.is_in_line_break = false;
                    }
                }
                if self.options.break_blocks {
                    self.is_append_post_block_empty_line_requested = false;
                }
            }
        } else {
            // attach and linux modes
            if self.options.break_closing_header_braces
                || self.options.brace_indent
                || self.options.block_indent
            {
                self.is_in_line_break = true;
            } else {
                self.append_closing_header();
                if self.options.break_blocks {
                    self.is_append_post_block_empty_line_requested = false;
                }
            }
        }
    }

    /// Attach a closing header to the previous closing brace when a blank
    /// line or one-line block does not precede it.
    pub(crate) fn append_closing_header(&mut self) {
        let previous_line_is_empty = self.is_empty_line(&self.formatted_line);
        let mut previous_line_is_one_line_block = 0;
        if let Some(first_brace) = self.find_next_char_in_line(&self.formatted_line, '{', 0) {
            previous_line_is_one_line_block =
                self.is_one_line_block_reached_in(&self.formatted_line, first_brace);
        }
        if !previous_line_is_empty && previous_line_is_one_line_block == 0 {
            self.is_in_line_break = false;
            self.append_space_pad();
            // don't count as comment padding
            self.space_pad_num = 0;
        }
    }

    /// EXEC SQL statement detection.
    pub(crate) fn is_exec_sql_at(&self, index: usize) -> bool {
        let line = &self.current_line;
        if index >= line.len() || (line[index] != 'e' && line[index] != 'E') {
            return false;
        }
        let word: String = line[index..]
            .iter()
            .take_while(|ch| ch.is_ascii_alphabetic())
            .collect();
        if !word.eq_ignore_ascii_case("exec") {
            return false;
        }
        let after = index + word.len();
        let Some(next) = find_first_not_of_ws(line, after) else {
            return false;
        };
        let second: String = line[next..]
            .iter()
            .take_while(|ch| ch.is_ascii_alphabetic())
            .collect();
        second.eq_ignore_ascii_case("sql")
    }
}

fn is_ndef_preproc_statement(line: &[char], preproc: &str) -> bool {
    if preproc == "ifndef" {
        return true;
    }
    if preproc == "if" {
        if let Some(bang) = line.iter().position(|&ch| ch == '!') {
            if let Some(next) = find_first_not_of_ws(line, bang + 1) {
                return char_starts_with(line, next, "defined");
            }
        }
    }
    false
}
