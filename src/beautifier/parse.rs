// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Per-character scan of one line, maintaining the scope stacks.

use std::rc::Rc;

use super::{get_next_word, Beautifier};
use crate::core::chartype::{
    char_starts_with, find_first_not_of_ws, is_char_potential_header, is_digit_separator,
    is_legal_name_char, is_whitespace, is_word_at, peek_next_char,
};
use crate::core::resources::Header;

impl Beautifier {
    /// Parse the current line to update `indent_count` and
    /// `space_indent_count`, tracking every scope stack along the way.
    pub(crate) fn parse_current_line(&mut self, line: &[char]) {
        let tables = Rc::clone(&self.tables);
        let file_type = self.file_type();
        let mut is_in_line_comment = false;
        let mut is_in_operator = false;
        let mut is_special_char = false;
        let mut have_case_indent = false;
        let mut have_assignment_this_line = false;
        let mut closing_brace_reached = false;
        let previous_line_probation = self.probation_header.is_some();
        let mut tab_increment_in = 0i32;

        if self.is_in_quote
            && !self.have_line_continuation_char
            && !self.is_in_verbatim_quote
            && !self.is_in_asm
        {
            // missing closing quote
            self.is_in_quote = false;
        }
        self.have_line_continuation_char = false;

        let mut i = 0usize;
        while i < line.len() {
            let mut ch = line[i];

            if self.is_in_beautify_sql {
                i += 1;
                continue;
            }

            // escape sequences inside quotes
            if self.is_in_quote && !self.is_in_verbatim_quote {
                if is_special_char {
                    is_special_char = false;
                    i += 1;
                    continue;
                }
                if char_starts_with(line, i, "\\\\") {
                    i += 2;
                    continue;
                }
                if ch == '\\' {
                    if peek_next_char(line, i) == ' ' {
                        // '\' at end of line
                        self.have_line_continuation_char = true;
                    } else {
                        is_special_char = true;
                    }
                    i += 1;
                    continue;
                }
            } else if self.is_in_define && ch == '\\' {
                i += 1;
                continue;
            }

            if is_whitespace(ch) {
                if ch == '\t' {
                    tab_increment_in += self.convert_tab_to_spaces(i, tab_increment_in);
                }
                i += 1;
                continue;
            }

            // quotes
            if !(self.is_in_comment || is_in_line_comment)
                && (ch == '"' || (ch == '\'' && !is_digit_separator(line, i)))
            {
                if !self.is_in_quote {
                    self.quote_char = ch;
                    self.is_in_quote = true;
                    let prev_ch = if i > 0 { line[i - 1] } else { ' ' };
                    if self.is_c_style() && prev_ch == 'R' {
                        if let Some(paren_pos) = (i..line.len()).find(|&p| line[p] == '(') {
                            self.is_in_verbatim_quote = true;
                            self.verbatim_delimiter = line[i + 1..paren_pos].iter().collect();
                        }
                    } else if self.is_sharp_style() && prev_ch == '@' {
                        self.is_in_verbatim_quote = true;
                    } else if self.preprocessor_cpp_extern_c_brace == 2
                        && char_starts_with(line, i, "\"C\"")
                    {
                        self.preprocessor_cpp_extern_c_brace += 1;
                    }
                } else if self.is_in_verbatim_quote && ch == '"' {
                    if self.is_c_style() {
                        let delim: Vec<char> =
                            std::iter::once(')').chain(self.verbatim_delimiter.chars()).collect();
                        if i >= delim.len() && line[i - delim.len()..i] == delim[..] {
                            self.is_in_quote = false;
                            self.is_in_verbatim_quote = false;
                        }
                    } else if self.is_sharp_style() {
                        if char_starts_with(line, i, "\"\"") {
                            i += 2;
                            continue;
                        }
                        self.is_in_quote = false;
                        self.is_in_verbatim_quote = false;
                        i += 1;
                        continue;
                    }
                } else if self.quote_char == ch {
                    self.is_in_quote = false;
                    self.is_continuation = true;
                    i += 1;
                    continue;
                }
            }
            if self.is_in_quote {
                i += 1;
                continue;
            }

            // comments
            if !(self.is_in_comment || is_in_line_comment) && char_starts_with(line, i, "//") {
                if self.is_case_header_comment_indent {
                    self.indent_count -= 1;
                }
                if self.is_else_header_indent
                    && self.line_opens_with_line_comment
                    && !self.temp_stacks.is_empty()
                {
                    self.indent_count += self.adjust_indent_count_for_break_else_if_comments();
                }
                is_in_line_comment = true;
                i += 2;
                continue;
            }
            if !(self.is_in_comment || is_in_line_comment) && char_starts_with(line, i, "/*") {
                if self.is_case_header_comment_indent && self.line_opens_with_comment {
                    self.indent_count -= 1;
                }
                if self.is_else_header_indent
                    && self.line_opens_with_comment
                    && !self.temp_stacks.is_empty()
                {
                    self.indent_count += self.adjust_indent_count_for_break_else_if_comments();
                }
                self.is_in_comment = true;
                if !self.line_opens_with_comment {
                    // continuation lines of this comment cannot be indented
                    self.block_comment_no_indent = true;
                }
                i += 2;
                continue;
            }
            if (self.is_in_comment || is_in_line_comment) && char_starts_with(line, i, "*/") {
                let first_text = find_first_not_of_ws(line, 0);
                if self.is_case_header_comment_indent && first_text == Some(i) {
                    self.indent_count -= 1;
                }
                if first_text == Some(i)
                    && self.is_else_header_indent
                    && !self.line_opens_with_comment
                    && !self.temp_stacks.is_empty()
                {
                    self.indent_count += self.adjust_indent_count_for_break_else_if_comments();
                }
                self.is_in_comment = false;
                self.block_comment_no_indent = false;
                i += 2;
                continue;
            }
            // indented preprocessor lines are treated like line comments
            if line[0] == '#' && self.is_indented_preprocessor(line, i) {
                is_in_line_comment = true;
            }

            if is_in_line_comment {
                break;
            }
            if self.is_in_comment {
                if !self.line_opens_with_comment && self.is_case_header_comment_indent {
                    self.indent_count -= 1;
                }
                if !self.line_opens_with_comment
                    && self.is_else_header_indent
                    && !self.temp_stacks.is_empty()
                {
                    self.indent_count += self.adjust_indent_count_for_break_else_if_comments();
                }
                // bypass the rest of the comment
                while i + 1 < line.len() && !char_starts_with(line, i + 1, "*/") {
                    i += 1;
                }
                i += 1;
                continue;
            }

            // not in a comment or quote from here on

            if let Some(probation) = self.probation_header {
                if (probation == Header::Static && ch == '{')
                    || (probation == Header::Synchronized && ch == '(')
                {
                    // the probation header graduates into a real header
                    self.is_in_header = true;
                    self.header_stack.push(probation);
                    self.is_in_conditional = probation == Header::Synchronized;
                    self.is_continuation = false;
                    if previous_line_probation
                        && ch == '{'
                        && !(self.options.block_indent && probation == Header::Static)
                    {
                        self.indent_count += 1;
                        self.previous_line_probation_tab = true;
                    }
                }
                self.probation_header = None;
            }

            self.prev_non_space_ch = self.current_non_space_ch;
            self.current_non_space_ch = ch;
            if !is_legal_name_char(file_type, ch) && ch != ',' && ch != ';' {
                self.prev_non_legal_ch = self.current_non_legal_ch;
                self.current_non_legal_ch = ch;
            }

            if self.is_in_header {
                self.is_in_header = false;
                self.current_header = self.header_stack.last().copied();
            } else {
                self.current_header = None;
            }

            if self.is_c_style()
                && self.is_in_template
                && (ch == '<' || ch == '>')
                && !char_starts_with(line, i, ">=")
            {
                if ch == '<' {
                    self.template_depth += 1;
                    self.continuation_indent_stack_size_stack
                        .push(self.continuation_indent_stack.len());
                    self.register_continuation_indent(
                        line,
                        i,
                        self.space_indent_count,
                        tab_increment_in,
                        0,
                        true,
                    );
                } else {
                    self.pop_last_continuation_indent();
                    self.template_depth -= 1;
                    if self.template_depth <= 0 {
                        ch = ';';
                        self.is_in_template = false;
                        self.template_depth = 0;
                    }
                }
            }

            // parentheses and square brackets
            if ch == '(' || ch == '[' || ch == ')' || ch == ']' {
                if ch == '(' || ch == '[' {
                    is_in_operator = false;
                    // a struct header followed by '(' is a declaration
                    if ch == '('
                        && self.header_stack.last() == Some(&Header::Struct)
                    {
                        self.header_stack.pop();
                        self.is_in_class_header = false;
                        let struct_on_line = (0..=line.len().saturating_sub(6))
                            .any(|p| char_starts_with(line, p, "struct") && p < i);
                        if !struct_on_line {
                            self.indent_count -= super::CLASS_INITIALIZER_INDENTS;
                        }
                        if self.indent_count < 0 {
                            self.indent_count = 0;
                        }
                    }

                    if self.paren_depth == 0 {
                        self.paren_statement_stack.push(self.is_continuation);
                        self.is_continuation = true;
                    }
                    self.paren_depth += 1;
                    if ch == '[' {
                        self.square_bracket_count += 1;
                        if self.square_bracket_count == 1 && self.is_c_style() {
                            self.is_in_objc_method_call = true;
                        }
                    }

                    self.continuation_indent_stack_size_stack
                        .push(self.continuation_indent_stack.len());

                    if self.current_header.is_some() {
                        self.register_continuation_indent(
                            line,
                            i,
                            self.space_indent_count,
                            tab_increment_in,
                            self.options.min_conditional_indent() as i32,
                            true,
                        );
                    } else if !self.is_in_objc_method_definition {
                        self.register_continuation_indent(
                            line,
                            i,
                            self.space_indent_count,
                            tab_increment_in,
                            0,
                            true,
                        );
                    }
                } else {
                    if ch == ']' {
                        self.square_bracket_count -= 1;
                    }
                    if self.square_bracket_count <= 0 {
                        self.square_bracket_count = 0;
                        if self.is_in_objc_method_call {
                            self.is_immediately_post_objc_method_call = true;
                        }
                    }
                    self.found_pre_command_header = false;
                    self.paren_depth -= 1;
                    if self.paren_depth == 0 {
                        if let Some(was_continuation) = self.paren_statement_stack.pop() {
                            self.is_continuation = was_continuation;
                        }
                        self.is_in_asm = false;
                        self.is_in_conditional = false;
                    }

                    if !self.continuation_indent_stack_size_stack.is_empty() {
                        self.pop_last_continuation_indent();
                        if let Some(popped_indent) = self.paren_indent_stack.pop() {
                            if i == 0 {
                                self.space_indent_count = popped_indent;
                            }
                        }
                    }
                }
                i += 1;
                continue;
            }

            if ch == '{' {
                // block opener or static-array opener?
                let mut is_block_opener = (self.prev_non_space_ch == '{'
                    && *self.brace_block_state_stack.last().unwrap_or(&true))
                    || self.prev_non_space_ch == '}'
                    || self.prev_non_space_ch == ')'
                    || self.prev_non_space_ch == ';'
                    || peek_next_char(line, i) == '{'
                    || self.is_in_trailing_return_type
                    || self.found_pre_command_header
                    || self.found_pre_command_macro
                    || self.is_in_class_header
                    || (self.is_in_class_initializer
                        && !is_legal_name_char(file_type, self.prev_non_space_ch))
                    || self.is_non_in_statement_array
                    || self.is_in_objc_method_definition
                    || self.is_in_objc_interface
                    || self.is_sharp_accessor
                    || self.is_sharp_delegate
                    || self.is_in_extern_c
                    || self.is_in_asm_block
                    || get_next_word(file_type, line, i) == "new"
                    || (self.is_in_define
                        && (self.prev_non_space_ch == '('
                            || is_legal_name_char(file_type, self.prev_non_space_ch)));

                if self.is_in_objc_method_definition {
                    self.objc_colon_align_subsequent = 0;
                    self.is_immediately_post_objc_method_definition = true;
                    if self.line_begins_with_open_brace {
                        self.clear_objc_method_definition_alignment();
                    }
                }

                if !is_block_opener
                    && !self.is_continuation
                    && !self.is_in_class_initializer
                    && !self.is_in_enum
                    && self.is_top_level()
                {
                    is_block_opener = true;
                }

                if !is_block_opener {
                    if let Some(header) = self.current_header {
                        if tables.is_non_paren_header(header) {
                            is_block_opener = true;
                        }
                    }
                }

                self.brace_block_state_stack.push(is_block_opener);

                if !is_block_opener {
                    // static-array brace participates in continuation indent
                    self.continuation_indent_stack_size_stack
                        .push(self.continuation_indent_stack.len());
                    self.register_continuation_indent(
                        line,
                        i,
                        self.space_indent_count,
                        tab_increment_in,
                        0,
                        true,
                    );
                    self.paren_depth += 1;
                    if i == 0 {
                        self.should_indent_braced_line = false;
                    }
                    self.is_in_enum_type_id = false;
                    i += 1;
                    continue;
                }

                // this brace is a block opener
                self.line_opening_blocks_num += 1;

                if self.is_in_class_initializer || self.is_in_enum_type_id {
                    // decrease tab count if the brace is broken
                    if self.line_begins_with_open_brace {
                        self.indent_count -= super::CLASS_INITIALIZER_INDENTS;
                        if self.header_stack.last() == Some(&Header::Class) {
                            let next_char = self.next_program_char_distance(line, i);
                            if line.len() > i + next_char && line[i + next_char] == '}' {
                                self.indent_count -= 1;
                            }
                        }
                    }
                }

                if self.is_in_objc_interface {
                    self.is_in_objc_interface = false;
                    if self.line_begins_with_open_brace {
                        self.indent_count -= 1;
                    }
                }

                if self.options.brace_indent
                    && !self.options.namespace_indent
                    && matches!(
                        self.header_stack.last(),
                        Some(Header::Namespace | Header::Module)
                    )
                {
                    self.should_indent_braced_line = false;
                    self.indent_count -= 1;
                }

                // an indentable struct is treated like a class
                if self.header_stack.last() == Some(&Header::Struct) && self.is_in_indentable_struct
                {
                    *self.header_stack.last_mut().unwrap() = Header::Class;
                }

                self.paren_depth_stack.push(self.paren_depth);
                self.block_statement_stack.push(self.is_continuation);

                if !self.continuation_indent_stack.is_empty() {
                    while !self.continuation_indent_stack.is_empty() {
                        self.pop_last_continuation_indent();
                    }
                    if self.is_in_class_initializer || self.is_in_class_header_tab {
                        if self.line_begins_with_open_brace || self.line_begins_with_comma {
                            self.space_indent_count = 0;
                        }
                    } else {
                        self.space_indent_count = 0;
                    }
                }

                self.block_tab_count += i32::from(self.is_continuation);
                if self.preprocessor_cpp_extern_c_brace == 3 {
                    self.preprocessor_cpp_extern_c_brace += 1;
                }
                self.paren_depth = 0;
                self.is_in_trailing_return_type = false;
                self.is_in_class_header = false;
                self.is_in_class_header_tab = false;
                self.is_in_class_initializer = false;
                self.is_in_enum_type_id = false;
                self.is_continuation = false;
                self.is_in_question = false;
                self.found_pre_command_header = false;
                self.found_pre_command_macro = false;
                self.is_in_extern_c = false;

                self.temp_stacks.push(Vec::new());
                self.header_stack.push(Header::OpenBrace);
                self.last_line_header = Some(Header::OpenBrace);
                i += 1;
                continue;
            }

            let is_potential_header = is_char_potential_header(file_type, line, i);

            if is_potential_header && self.square_bracket_count == 0 {
                let mut new_header = tables.find_header(line, i, &tables.headers);

                if let Some(header) = new_header {
                    // filter out ambiguous matches
                    let header_end = i + header.text().len() - 1;
                    if header == Header::Default && peek_next_char(line, header_end) != ':' {
                        new_header = None;
                    }
                    if self.is_c_style()
                        && matches!(header, Header::Forever | Header::Foreach)
                    {
                        if (i..line.len()).any(|p| line[p] == '=' || line[p] == ';') {
                            new_header = None;
                        }
                    } else if self.is_sharp_style()
                        && matches!(header, Header::Get | Header::Set)
                    {
                        if get_next_word(file_type, line, i + header.text().len() - 1) == "is" {
                            new_header = None;
                        }
                    } else if header == Header::Using && peek_next_char(line, header_end) != '(' {
                        new_header = None;
                    }
                }

                if let Some(header) = new_header {
                    let mut is_indentable_header = true;
                    self.is_in_header = true;

                    // 'else if' replaces the 'else' on the stack
                    if header == Header::If && self.last_line_header == Some(Header::Else) {
                        self.header_stack.pop();
                    } else if header == Header::Else {
                        // restack the headers between this 'else' and its 'if'
                        if let Some(last_temp) = self.temp_stacks.last_mut() {
                            if let Some(index_of_if) =
                                last_temp.iter().position(|&h| h == Header::If)
                            {
                                let restack_size = last_temp.len() - index_of_if - 1;
                                for _ in 0..restack_size {
                                    if let Some(restacked) = last_temp.pop() {
                                        self.header_stack.push(restacked);
                                    }
                                }
                                if !closing_brace_reached {
                                    self.indent_count += restack_size as i32;
                                }
                            }
                        }
                    } else if header == Header::While {
                        // 'while' may close a previous 'do'
                        if let Some(last_temp) = self.temp_stacks.last_mut() {
                            if let Some(index_of_do) =
                                last_temp.iter().position(|&h| h == Header::Do)
                            {
                                let restack_size = last_temp.len() - index_of_do - 1;
                                for _ in 0..restack_size {
                                    if let Some(restacked) = last_temp.pop() {
                                        self.header_stack.push(restacked);
                                    }
                                }
                                if !closing_brace_reached {
                                    self.indent_count += restack_size as i32;
                                }
                            }
                        }
                    } else if matches!(header, Header::Catch | Header::Finally) {
                        // 'catch' closes a previous 'try' or 'catch'
                        if let Some(last_temp) = self.temp_stacks.last_mut() {
                            let index_of_try = last_temp
                                .iter()
                                .position(|&h| h == Header::Try)
                                .or_else(|| last_temp.iter().position(|&h| h == Header::Catch));
                            if let Some(index_of_try) = index_of_try {
                                let restack_size = last_temp.len() - index_of_try - 1;
                                for _ in 0..restack_size {
                                    if let Some(restacked) = last_temp.pop() {
                                        self.header_stack.push(restacked);
                                    }
                                }
                                if !closing_brace_reached {
                                    self.indent_count += restack_size as i32;
                                }
                            }
                        }
                    } else if header == Header::Case {
                        self.is_in_case = true;
                        if !have_case_indent {
                            have_case_indent = true;
                            if !self.line_begins_with_open_brace {
                                self.indent_count -= 1;
                            }
                        }
                    } else if header == Header::Default {
                        self.is_in_case = true;
                        self.indent_count -= 1;
                    } else if matches!(header, Header::Static | Header::Synchronized) {
                        if matches!(
                            self.header_stack.last(),
                            Some(Header::Static | Header::Synchronized)
                        ) {
                            is_indentable_header = false;
                        } else {
                            is_indentable_header = false;
                            self.probation_header = Some(header);
                        }
                    } else if header == Header::Template {
                        self.is_in_template = true;
                        is_indentable_header = false;
                    }

                    if is_indentable_header {
                        self.header_stack.push(header);
                        self.is_continuation = false;
                        if !tables.is_non_paren_header(header) {
                            self.is_in_conditional = true;
                        }
                        self.last_line_header = Some(header);
                    } else {
                        self.is_in_header = false;
                    }

                    i += header.text().len();
                    continue;
                }

                // pre-command headers appear after the function arguments
                if tables
                    .pre_command_headers
                    .iter()
                    .any(|word| is_word_at(file_type, line, i, word))
                    && self.prev_non_space_ch == ')'
                {
                    self.found_pre_command_header = true;
                }

                // Objective-C exception macros count as pre-command headers
                if self.is_c_style()
                    && (is_word_at(file_type, line, i, "NS_DURING")
                        || is_word_at(file_type, line, i, "NS_HANDLER"))
                {
                    self.found_pre_command_macro = true;
                }

                if self.paren_depth == 0 && is_word_at(file_type, line, i, "enum") {
                    self.is_in_enum = true;
                }
            }

            if ch == '?' {
                self.is_in_question = true;
            }

            // colons: scope, ternary, labels, initializers, access modifiers
            if ch == ':' {
                if line.get(i + 1) == Some(&':') {
                    i += 2;
                    continue;
                }
                if self.is_in_question {
                    // ternary, nothing special
                } else if self.paren_depth > 0 {
                    // a 'for' loop or Objective-C argument, nothing special
                } else if self.is_in_enum {
                    self.is_in_enum_type_id = true;
                    if i == 0 {
                        self.indent_count += super::CLASS_INITIALIZER_INDENTS;
                    }
                } else if (self.is_c_style() || self.is_sharp_style())
                    && !self.is_in_case
                    && (self.prev_non_space_ch == ')' || self.found_pre_command_header)
                {
                    // a class constructor initializer
                    self.is_in_class_initializer = true;
                    self.register_continuation_indent_colon(line, i, tab_increment_in);
                    if i == 0 {
                        self.indent_count += super::CLASS_INITIALIZER_INDENTS;
                    }
                } else if self.is_in_class_header || self.is_in_objc_interface {
                    // 'class A : public B'
                    self.is_in_class_header_tab = true;
                    self.register_continuation_indent_colon(line, i, tab_increment_in);
                } else if self.is_in_asm || self.is_in_asm_one_line || self.is_in_asm_block {
                    // nothing special
                } else if peek_next_char(line, i).is_ascii_digit() {
                    // a bit field, nothing special
                } else if self.is_c_style() && self.is_in_class && self.prev_non_space_ch != ')' {
                    // access modifier inside a class body
                    self.indent_count -= 1;
                    if self.options.modifier_indent {
                        self.space_indent_count += self.indent_length() / 2;
                    }
                } else if self.is_c_style()
                    && !self.is_in_class
                    && self.header_stack.len() >= 2
                    && self.header_stack[self.header_stack.len() - 2] == Header::Class
                    && self.header_stack[self.header_stack.len() - 1] == Header::OpenBrace
                {
                    // access modifier on the same line as the class brace
                } else if self.is_java_style() && self.last_line_header == Some(Header::For) {
                    // a java for-each, nothing special
                } else {
                    // braces after this colon appear as block openers
                    self.current_non_space_ch = ';';
                    let peeked = peek_next_char(line, i);
                    if self.is_in_case {
                        self.is_in_case = false;
                        ch = ';';
                    } else if self.is_c_style() || (self.is_sharp_style() && peeked == ';') {
                        // a label
                        if self.options.label_indent {
                            self.indent_count -= 1;
                        } else if !self.line_begins_with_open_brace {
                            self.indent_count = 0;
                        }
                    }
                }
            }

            if (ch == ';' || (self.paren_depth > 0 && ch == ','))
                && !self.continuation_indent_stack_size_stack.is_empty()
            {
                let floor = *self.continuation_indent_stack_size_stack.last().unwrap()
                    + usize::from(self.paren_depth > 0);
                while floor < self.continuation_indent_stack.len() {
                    self.continuation_indent_stack.pop();
                }
            } else if ch == ','
                && self.is_in_enum
                && self.is_non_in_statement_array
                && !self.continuation_indent_stack.is_empty()
            {
                self.continuation_indent_stack.pop();
            }

            // a comma at the end of the line starts a continuation
            if ch == ','
                && self.paren_depth == 0
                && !self.is_continuation
                && !self.is_non_in_statement_array
            {
                let next_char = find_first_not_of_ws(line, i + 1).filter(|&p| {
                    !char_starts_with(line, p, "//") && !char_starts_with(line, p, "/*")
                });
                if next_char.is_none() {
                    if self.is_java_style() && self.is_in_class_header {
                        // nothing for now
                    } else if !self.is_in_template
                        && !self.is_in_class_header_tab
                        && !self.is_in_class_initializer
                    {
                        let prev_word = self.continuation_indent_comma(line, i);
                        let count = prev_word as i32 + self.space_indent_count + tab_increment_in;
                        self.continuation_indent_stack.push(count);
                        self.is_continuation = true;
                    }
                }
            }
            // comma-first initializers
            if ch == ','
                && self.paren_depth == 0
                && self.line_begins_with_comma
                && (self.is_in_class_initializer || self.is_in_class_header_tab)
            {
                self.space_indent_count = 0;
            }

            // ends of statements
            if (ch == ';' && self.paren_depth == 0) || ch == '}' {
                if ch == '}' {
                    // does this '}' close a block or a static array?
                    if self.brace_block_state_stack.len() > 1 {
                        let brace_block_state = self.brace_block_state_stack.pop().unwrap();
                        if !brace_block_state {
                            if !self.continuation_indent_stack_size_stack.is_empty() {
                                // this brace closes a static array
                                self.pop_last_continuation_indent();
                                self.paren_depth -= 1;
                                if i == 0 {
                                    self.should_indent_braced_line = false;
                                }
                                if let Some(popped_indent) = self.paren_indent_stack.pop() {
                                    if i == 0 {
                                        self.space_indent_count = popped_indent;
                                    }
                                }
                            }
                            i += 1;
                            continue;
                        }
                    }

                    // this brace is a block closer
                    self.line_closing_blocks_num += 1;

                    if !self.continuation_indent_stack_size_stack.is_empty() {
                        self.pop_last_continuation_indent();
                    }

                    if let Some(depth) = self.paren_depth_stack.pop() {
                        self.paren_depth = depth;
                        if let Some(was_continuation) = self.block_statement_stack.pop() {
                            self.is_continuation = was_continuation;
                            if was_continuation {
                                self.block_tab_count -= 1;
                            }
                        }
                    }

                    closing_brace_reached = true;
                    if i == 0 {
                        self.space_indent_count = 0;
                    }
                    self.is_in_asm_block = false;
                    self.is_in_asm = false;
                    self.is_in_asm_one_line = false;
                    self.is_in_quote = false;

                    if self.header_stack.contains(&Header::OpenBrace) {
                        while let Some(&popped) = self.header_stack.last() {
                            self.header_stack.pop();
                            if popped == Header::OpenBrace {
                                break;
                            }
                        }

                        if self.header_stack.is_empty() {
                            self.preprocessor_cpp_extern_c_brace = 0;
                        }

                        // an unindented namespace brace must stay unindented
                        if !self.options.namespace_indent
                            && matches!(
                                self.header_stack.last(),
                                Some(Header::Namespace | Header::Module)
                            )
                            && i == 0
                        {
                            self.should_indent_braced_line = false;
                        }

                        if self.temp_stacks.len() > 1 {
                            self.temp_stacks.pop();
                        }
                    }

                    // so that headers in '}else{' are still identified
                    ch = ' ';
                }

                // snapshot the current block's header list into the
                // enclosing temp stack so a following 'else'/'while'/'catch'
                // can restack the intermediate headers
                if let Some(temp) = self.temp_stacks.last_mut() {
                    temp.clear();
                }
                while let Some(&back) = self.header_stack.last() {
                    if back == Header::OpenBrace {
                        break;
                    }
                    self.header_stack.pop();
                    if let Some(temp) = self.temp_stacks.last_mut() {
                        temp.push(back);
                    }
                }

                if self.paren_depth == 0 && ch == ';' {
                    self.is_continuation = false;
                    self.is_in_class_initializer = false;
                }

                if self.is_in_objc_method_definition {
                    self.objc_colon_align_subsequent = 0;
                    self.is_immediately_post_objc_method_definition = true;
                }

                self.previous_last_line_header = None;
                self.is_in_class_header = false;
                self.is_in_enum = false;
                self.is_in_enum_type_id = false;
                self.is_in_question = false;
                self.is_in_template = false;
                self.is_in_objc_interface = false;
                self.found_pre_command_header = false;
                self.found_pre_command_macro = false;
                self.square_bracket_count = 0;
                i += 1;
                continue;
            }

            if is_potential_header {
                // definition headers, but not inside C/C++ parens where
                // 'struct X' would be a parameter declaration
                if !self.is_in_template && !(self.is_c_style() && self.paren_depth > 0) {
                    let mut new_header =
                        tables.find_header(line, i, &tables.pre_block_statements);
                    if new_header == Some(Header::Module) {
                        let next =
                            peek_next_char(line, i + Header::Module.text().len() - 1);
                        if self.prev_non_space_ch == ')' || !next.is_alphabetic() {
                            new_header = None;
                        }
                    }
                    if let Some(header) = new_header {
                        let is_enum_class =
                            self.is_c_style() && header == Header::Class && self.is_in_enum;
                        let is_corba_interface = self.is_c_style()
                            && header == Header::Interface
                            && self.header_stack.last() != Some(&Header::OpenBrace)
                            && !self.header_stack.is_empty();
                        if !is_enum_class && !is_corba_interface {
                            let skip_sharp_duplicate = self.is_sharp_style()
                                && matches!(header, Header::Class | Header::Struct)
                                && matches!(
                                    self.header_stack.last(),
                                    Some(Header::Class | Header::Struct)
                                );
                            if !skip_sharp_duplicate {
                                self.header_stack.push(header);
                            }

                            match self.header_stack.last() {
                                Some(Header::Class | Header::Struct | Header::Interface) => {
                                    self.is_in_class_header = true;
                                }
                                Some(Header::Namespace | Header::Module) => {
                                    // namespaces do not continue a statement
                                    self.continuation_indent_stack.pop();
                                    self.is_continuation = false;
                                }
                                _ => {}
                            }

                            i += header.text().len();
                            continue;
                        }
                    }
                }

                if let Some(header) = tables.find_header(line, i, &tables.indentable_headers) {
                    // bypass the header before registering the indent
                    i += header.text().len() - 1;
                    if !is_in_operator && !self.is_in_template && !self.is_non_in_statement_array {
                        self.register_continuation_indent(
                            line,
                            i,
                            self.space_indent_count,
                            tab_increment_in,
                            0,
                            false,
                        );
                        self.is_continuation = true;
                    }
                    i += 1;
                    continue;
                }

                if self.is_c_style() && is_word_at(file_type, line, i, "operator") {
                    is_in_operator = true;
                }

                if self.preprocessor_cpp_extern_c_brace == 1
                    && is_word_at(file_type, line, i, "extern")
                {
                    self.preprocessor_cpp_extern_c_brace += 1;
                }
                if self.preprocessor_cpp_extern_c_brace == 3 {
                    // extern "C" was not followed by a '{'
                    self.preprocessor_cpp_extern_c_brace = 0;
                }

                // the 'new' operator is a pointer, not a calculation
                if is_word_at(file_type, line, i, "new")
                    && self.is_continuation
                    && !self.continuation_indent_stack.is_empty()
                    && self.prev_non_space_ch == '='
                {
                    *self.continuation_indent_stack.last_mut().unwrap() = 0;
                }

                if self.is_c_style() && is_word_at(file_type, line, i, "auto") && self.is_top_level()
                {
                    self.is_in_trailing_return_type = true;
                }

                if self.is_c_style() {
                    if is_word_at(file_type, line, i, "asm")
                        || is_word_at(file_type, line, i, "__asm__")
                    {
                        self.is_in_asm = true;
                    } else if is_word_at(file_type, line, i, "_asm")
                        || is_word_at(file_type, line, i, "__asm")
                    {
                        let index = if peek_next_char(line, i) == '_' { 5 } else { 4 };
                        let peeked = peek_next_char(line, i + index);
                        if peeked == '{' || peeked == ' ' {
                            self.is_in_asm_block = true;
                        } else {
                            self.is_in_asm_one_line = true;
                        }
                    }
                }

                // bypass the rest of the word
                let word_len = (i..line.len())
                    .take_while(|&p| is_legal_name_char(file_type, line[p]))
                    .count();
                i += word_len.max(1);
                continue;
            }

            // Objective-C statements
            if ch == '@'
                && i + 1 < line.len()
                && !is_whitespace(line[i + 1])
                && is_char_potential_header(file_type, line, i + 1)
            {
                let cur_word = crate::core::chartype::get_current_word(file_type, line, i + 1);
                if cur_word == "interface" || cur_word == "autoreleasepool" {
                    self.is_in_objc_interface = true;
                    i += cur_word.len() + 1;
                    continue;
                }
                if self.is_in_objc_interface {
                    self.indent_count -= 1;
                    self.is_in_objc_interface = false;
                }
                if cur_word == "public" || cur_word == "private" || cur_word == "protected" {
                    self.indent_count -= 1;
                    if self.options.modifier_indent {
                        self.space_indent_count += self.indent_length() / 2;
                    }
                    i += cur_word.len() + 1;
                    continue;
                }
                if cur_word == "end" {
                    self.pop_last_continuation_indent();
                    self.space_indent_count = 0;
                    self.is_in_objc_method_definition = false;
                    i += cur_word.len() + 1;
                    continue;
                }
            } else if (ch == '-' || ch == '+')
                && (self.prev_non_space_ch == ';'
                    || self.prev_non_space_ch == '{'
                    || self.header_stack.is_empty()
                    || self.is_in_objc_interface)
                && peek_next_char(line, i) != '-'
                && peek_next_char(line, i) != '+'
                && find_first_not_of_ws(line, 0) == Some(i)
                && self.is_c_style()
            {
                if self.is_in_objc_interface {
                    self.indent_count -= 1;
                }
                self.is_in_objc_interface = false;
                self.is_in_objc_method_definition = true;
                i += 1;
                continue;
            }

            // operators
            let is_potential_operator = !ch.is_alphanumeric() && !is_whitespace(ch);
            if is_potential_operator {
                let mut found_assignment_op =
                    tables.find_operator(line, i, &tables.assignment_operators);
                let mut found_non_assignment_op =
                    tables.find_operator(line, i, &tables.non_assignment_operators);

                if let Some(op) = found_non_assignment_op {
                    if op == "=>" {
                        self.found_pre_command_header = true;
                    }
                    if self.is_in_template && op == ">>" {
                        found_non_assignment_op = None;
                    }
                }

                // '>>' vs '>>=': treat the longer match as the operator
                if let (Some(assign), Some(non_assign)) =
                    (found_assignment_op, found_non_assignment_op)
                {
                    if assign.len() < non_assign.len() {
                        found_assignment_op = None;
                    } else {
                        found_non_assignment_op = None;
                    }
                }

                if let Some(op) = found_non_assignment_op {
                    if op.len() > 1 {
                        i += op.len() - 1;
                    }

                    // align C++ stream operators when they begin a statement
                    if !is_in_operator
                        && self.continuation_indent_stack.is_empty()
                        && self.is_c_style()
                        && (op == ">>" || op == "<<")
                    {
                        if i < op.len() && self.space_indent_count == 0 {
                            self.space_indent_count += 2 * self.indent_length();
                        }
                        self.register_continuation_indent(
                            line,
                            i.saturating_sub(op.len()),
                            self.space_indent_count,
                            tab_increment_in,
                            0,
                            false,
                        );
                    }
                } else if let Some(op) = found_assignment_op {
                    // clears pre-command state for array assignments
                    self.found_pre_command_header = false;
                    self.found_pre_command_macro = false;

                    if op.len() > 1 {
                        i += op.len() - 1;
                    }

                    if !is_in_operator
                        && !self.is_in_template
                        && (!self.is_non_in_statement_array || self.is_in_enum)
                    {
                        if op == "="
                            && self.prev_non_space_ch != ']'
                            && self.statement_ends_with_comma(line, i)
                        {
                            // align multiple assignments on the previous word
                            if !have_assignment_this_line {
                                have_assignment_this_line = true;
                                let prev_word_index = self.continuation_indent_assign(line, i);
                                let count = prev_word_index as i32
                                    + self.space_indent_count
                                    + tab_increment_in;
                                self.continuation_indent_stack.push(count);
                                self.is_continuation = true;
                            }
                        } else if !self.line_begins_with_comma {
                            if i == 0 && self.space_indent_count == 0 {
                                self.space_indent_count += self.indent_length();
                            }
                            self.register_continuation_indent(
                                line,
                                i,
                                self.space_indent_count,
                                tab_increment_in,
                                0,
                                false,
                            );
                            self.is_continuation = true;
                        }
                    }
                }
            }
            i += 1;
        }
    }
}
