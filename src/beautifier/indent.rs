// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Indent arithmetic: preliminary indentation from the header stack and
//! continuation-indent registration for parens, assignments, and colons.

use super::Beautifier;
use crate::core::chartype::{
    find_first_not_of_ws, find_last_not_of_ws, is_digit_separator, is_legal_name_char,
};
use crate::core::resources::Header;

impl Beautifier {
    /// Compute indentation from the header stack and prior-line data.
    pub(crate) fn compute_preliminary_indentation(&mut self) {
        self.indent_count = 0;
        self.space_indent_count = 0;
        self.is_in_class_header_tab = false;

        if let Some(&top) = self.continuation_indent_stack.last() {
            self.space_indent_count = top;
        }

        for i in 0..self.header_stack.len() {
            self.is_in_class = false;
            let header = self.header_stack[i];
            let previous = if i > 0 {
                Some(self.header_stack[i - 1])
            } else {
                None
            };

            if self.options.block_indent {
                // opening blocks of definitions do not add a block indent
                if !matches!(
                    header,
                    Header::Namespace
                        | Header::Module
                        | Header::Class
                        | Header::Struct
                        | Header::Union
                        | Header::Interface
                        | Header::Static
                ) {
                    self.indent_count += 1;
                }
            } else if !(i > 0
                && previous != Some(Header::OpenBrace)
                && header == Header::OpenBrace)
            {
                self.indent_count += 1;
            }

            if !self.is_java_style()
                && !self.options.namespace_indent
                && matches!(previous, Some(Header::Namespace | Header::Module))
                && header == Header::OpenBrace
            {
                self.indent_count -= 1;
            }

            if self.is_c_style()
                && i >= 1
                && previous == Some(Header::Class)
                && header == Header::OpenBrace
            {
                if self.options.class_indent {
                    self.indent_count += 1;
                }
                self.is_in_class = true;
            } else if self.options.switch_indent
                && i > 1
                && previous == Some(Header::Switch)
                && header == Header::OpenBrace
            {
                self.indent_count += 1;
                self.is_in_switch = true;
            }
        }

        if self.is_in_class_header {
            if !self.is_java_style() {
                self.is_in_class_header_tab = true;
            }
            if self.line_opens_with_line_comment
                || self.line_starts_in_comment
                || self.line_opens_with_comment
            {
                if !self.line_begins_with_open_brace {
                    self.indent_count -= 1;
                }
                if let Some(&top) = self.continuation_indent_stack.last() {
                    self.space_indent_count -= top;
                }
            } else if self.options.block_indent && !self.line_begins_with_open_brace {
                self.indent_count += 1;
            }
        }

        if self.is_in_class_initializer || self.is_in_enum_type_id {
            self.indent_count += super::CLASS_INITIALIZER_INDENTS;
        }

        if self.is_in_enum
            && self.line_begins_with_comma
            && !self.continuation_indent_stack.is_empty()
        {
            // unregister the '=' indent from the previous line
            self.continuation_indent_stack.pop();
            self.is_continuation = false;
            self.space_indent_count = 0;
        }

        // Objective-C interface continuation line
        if self.is_in_objc_interface {
            self.indent_count += 1;
        }

        // unindent an indented class closing brace
        if !self.line_starts_in_comment
            && self.is_c_style()
            && self.is_in_class
            && self.options.class_indent
            && self.header_stack.len() >= 2
            && self.header_stack[self.header_stack.len() - 2] == Header::Class
            && *self.header_stack.last().unwrap() == Header::OpenBrace
            && self.line_begins_with_close_brace
            && *self.brace_block_state_stack.last().unwrap_or(&true)
        {
            self.indent_count -= 1;
        }
        // unindent an indented switch closing brace
        else if !self.line_starts_in_comment
            && self.is_in_switch
            && self.options.switch_indent
            && self.header_stack.len() >= 2
            && self.header_stack[self.header_stack.len() - 2] == Header::Switch
            && *self.header_stack.last().unwrap() == Header::OpenBrace
            && self.line_begins_with_close_brace
        {
            self.indent_count -= 1;
        }

        // run-in comment in an indented class statement
        if self.is_in_class
            && self.options.class_indent
            && self.is_in_run_in_comment
            && !self.line_opens_with_comment
            && self.header_stack.len() > 1
            && self.header_stack[self.header_stack.len() - 2] == Header::Class
        {
            self.indent_count -= 1;
        }

        if self.is_in_conditional {
            self.indent_count -= 1;
        }
        if self.preprocessor_cpp_extern_c_brace >= 4 {
            self.indent_count -= 1;
        }
    }

    /// Special-case corrections applied after the line has been parsed.
    pub(crate) fn adjust_parsed_line_indentation(
        &mut self,
        i_prelim: usize,
        is_in_extra_header_indent: bool,
    ) {
        if self.line_starts_in_comment {
            return;
        }

        // unindent a one-line statement in a header indent
        if !self.options.block_indent
            && self.line_begins_with_open_brace
            && self.header_stack.len() < i_prelim
            && is_in_extra_header_indent
            && (self.line_opening_blocks_num > 0
                && self.line_opening_blocks_num <= self.line_closing_blocks_num)
            && self.should_indent_braced_line
        {
            self.indent_count -= 1;
        }
        // if '{' follows a header such as 'for' or 'if' rather than another
        // '{', unindent it by one relative to its block
        else if !self.options.block_indent
            && self.line_begins_with_open_brace
            && !(self.line_opening_blocks_num > 0
                && self.line_opening_blocks_num <= self.line_closing_blocks_num)
            && (self.header_stack.len() > 1
                && self.header_stack[self.header_stack.len() - 2] != Header::OpenBrace)
            && self.should_indent_braced_line
        {
            self.indent_count -= 1;
        }
        // one less when more than one header is on the line
        else if self.header_stack.len() > i_prelim + 1
            && !self.options.block_indent
            && self.line_begins_with_open_brace
            && !(self.line_opening_blocks_num > 0
                && self.line_opening_blocks_num <= self.line_closing_blocks_num)
            && (self.header_stack.len() > 2
                && self.header_stack[self.header_stack.len() - 3] != Header::OpenBrace)
            && self.should_indent_braced_line
        {
            self.indent_count -= 1;
        }
        // unindent a closing brace
        else if self.line_begins_with_close_brace && self.should_indent_braced_line {
            self.indent_count -= 1;
        }
        // correctly indent one-line blocks
        else if self.line_opening_blocks_num > 0
            && self.line_opening_blocks_num == self.line_closing_blocks_num
            && self.previous_line_probation_tab
        {
            self.indent_count -= 1;
        }

        if self.indent_count < 0 {
            self.indent_count = 0;
        }

        // extra brace indentation
        if !self.line_starts_in_comment
            && self.options.brace_indent
            && self.should_indent_braced_line
            && (self.line_begins_with_open_brace || self.line_begins_with_close_brace)
        {
            if !self.options.brace_indent_vtk {
                self.indent_count += 1;
            } else {
                // a VTK-style brace is indented only below the outermost one
                let mut have_unindented_brace = false;
                let mut i = 0usize;
                while i < self.header_stack.len() {
                    let header = self.header_stack[i];
                    if matches!(
                        header,
                        Header::Namespace | Header::Module | Header::Class | Header::Struct
                    ) && i + 1 < self.header_stack.len()
                        && self.header_stack[i + 1] == Header::OpenBrace
                    {
                        i += 1;
                    } else if self.line_begins_with_open_brace {
                        if i + 1 < self.header_stack.len() && header == Header::OpenBrace {
                            have_unindented_brace = true;
                        }
                    } else if header == Header::OpenBrace {
                        have_unindented_brace = true;
                    }
                    i += 1;
                }
                if have_unindented_brace {
                    self.indent_count += 1;
                }
            }
        }
    }

    /// Register a continuation indent for an opening paren, bracket,
    /// template, or non-block brace at position `i`.
    pub(crate) fn register_continuation_indent(
        &mut self,
        line: &[char],
        i: usize,
        space_indent_count: i32,
        tab_increment_in: i32,
        min_indent: i32,
        update_paren_stack: bool,
    ) {
        let remaining_char_num = line.len().saturating_sub(i);
        let next_non_ws_char = self.next_program_char_distance(line, i);

        // if the indent is around the last char in the line, or
        // indent-after-paren is requested, use the continuation indent
        if next_non_ws_char == remaining_char_num || self.options.indent_after_paren {
            let previous_indent = self
                .continuation_indent_stack
                .last()
                .copied()
                .unwrap_or(space_indent_count);
            let mut curr_indent =
                self.options.continuation_indent as i32 * self.indent_length() + previous_indent;
            if curr_indent > self.options.max_continuation_indent as i32 && line[i] != '{' {
                curr_indent = self.indent_length() * 2 + space_indent_count;
            }
            self.continuation_indent_stack.push(curr_indent);
            if update_paren_stack {
                self.paren_indent_stack.push(previous_indent);
            }
            return;
        }

        if update_paren_stack {
            let entry = (i as i32 + space_indent_count - self.run_in_indent_continuation).max(0);
            self.paren_indent_stack.push(entry);
        }

        let mut tab_increment = tab_increment_in;
        for j in (i + 1)..(i + next_non_ws_char).min(line.len()) {
            if line[j] == '\t' {
                tab_increment += self.convert_tab_to_spaces(j, tab_increment);
            }
        }

        let mut continuation_indent_count =
            (i + next_non_ws_char) as i32 + space_indent_count + tab_increment;

        // run-in statement: the brace occupies column zero
        if i > 0 && line[0] == '{' {
            continuation_indent_count -= self.indent_length();
        }

        if continuation_indent_count < min_indent {
            continuation_indent_count = min_indent + space_indent_count;
        }

        // the cap does not apply to an in-statement array
        if continuation_indent_count > self.options.max_continuation_indent as i32
            && !(self.prev_non_legal_ch == '=' && self.current_non_legal_ch == '{')
        {
            continuation_indent_count = self.indent_length() * 2 + space_indent_count;
        }

        // monotonic floor: never less than the previous stack top
        if let Some(&top) = self.continuation_indent_stack.last() {
            if continuation_indent_count < top {
                continuation_indent_count = top;
            }
        }

        // the block opener of a non-in-statement array is not indented
        if self.is_non_in_statement_array
            && i < line.len()
            && line[i] == '{'
            && !self.is_in_enum
            && *self.brace_block_state_stack.last().unwrap_or(&false)
        {
            continuation_indent_count = 0;
        }

        self.continuation_indent_stack.push(continuation_indent_count);
    }

    /// Register a continuation indent at the first word after a class-header
    /// or class-initializer colon.
    pub(crate) fn register_continuation_indent_colon(
        &mut self,
        line: &[char],
        i: usize,
        tab_increment_in: i32,
    ) {
        let Some(first_char) = find_first_not_of_ws(line, 0) else {
            return;
        };
        if first_char == i {
            if let Some(first_word) = find_first_not_of_ws(line, first_char + 1) {
                let continuation_indent_count =
                    first_word as i32 + self.space_indent_count + tab_increment_in;
                self.continuation_indent_stack.push(continuation_indent_count);
                self.is_continuation = true;
            }
        }
    }

    /// Pop continuation indents down to the size recorded at the matching
    /// open; the sizes-stack always keeps its sentinel entry.
    pub(crate) fn pop_last_continuation_indent(&mut self) {
        let Some(&previous_size) = self.continuation_indent_stack_size_stack.last() else {
            return;
        };
        if self.continuation_indent_stack_size_stack.len() > 1 {
            self.continuation_indent_stack_size_stack.pop();
        }
        while self.continuation_indent_stack.len() > previous_size {
            self.continuation_indent_stack.pop();
        }
    }

    /// Index of the word preceding an `=`, for multi-assignment alignment.
    pub(crate) fn continuation_indent_assign(&self, line: &[char], curr_pos: usize) -> usize {
        if curr_pos == 0 {
            return 0;
        }
        let Some(end) = find_last_not_of_ws(&line[..curr_pos]) else {
            return 0;
        };
        if !is_legal_name_char(self.file_type(), line[end]) {
            return 0;
        }
        let mut start = end;
        loop {
            if !is_legal_name_char(self.file_type(), line[start]) {
                return start + 1;
            }
            if start == 0 {
                return 0;
            }
            start -= 1;
        }
    }

    /// Index of the second word on the line, for comma continuation.
    pub(crate) fn continuation_indent_comma(&self, line: &[char], curr_pos: usize) -> usize {
        let Some(first) = find_first_not_of_ws(line, 0) else {
            return 0;
        };
        if !is_legal_name_char(self.file_type(), line[first]) {
            return 0;
        }
        let mut indent = first;
        while indent < curr_pos {
            if !is_legal_name_char(self.file_type(), line[indent]) {
                break;
            }
            indent += 1;
        }
        indent += 1;
        if indent >= curr_pos || indent < 4 {
            return 0;
        }
        let Some(second) = find_first_not_of_ws(line, indent) else {
            return 0;
        };
        if second >= curr_pos {
            return 0;
        }
        second
    }

    /// True when the statement that contains the `=` at `index` ends in a
    /// comma outside quotes, comments, and parens.
    pub(crate) fn statement_ends_with_comma(&self, line: &[char], index: usize) -> bool {
        let mut in_comment = false;
        let mut in_quote = false;
        let mut quote_char = ' ';
        let mut paren_count = 0i32;
        let mut i = index + 1;

        while i < line.len() {
            let ch = line[i];
            if in_comment {
                if ch == '*' && line.get(i + 1) == Some(&'/') {
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
            if ch == '"' || (ch == '\'' && !is_digit_separator(line, i)) {
                in_quote = true;
                quote_char = ch;
                i += 1;
                continue;
            }
            if ch == '/' && line.get(i + 1) == Some(&'/') {
                break;
            }
            if ch == '/' && line.get(i + 1) == Some(&'*') {
                if self.is_line_end_comment(line, i) {
                    break;
                }
                in_comment = true;
                i += 2;
                continue;
            }
            if ch == '(' {
                paren_count += 1;
            }
            if ch == ')' {
                paren_count -= 1;
            }
            i += 1;
        }
        if in_comment || in_quote || paren_count > 0 {
            return false;
        }

        match find_last_not_of_ws(&line[..i.min(line.len())]) {
            Some(last) => line[last] == ',',
            None => false,
        }
    }

    fn is_line_end_comment(&self, line: &[char], start_pos: usize) -> bool {
        let mut i = start_pos + 2;
        while i + 1 < line.len() {
            if line[i] == '*' && line[i + 1] == '/' {
                return find_first_not_of_ws(line, i + 2).is_none();
            }
            i += 1;
        }
        false
    }

    /// Extra indents needed when comments precede an `else` that will be
    /// re-stacked from the temp stack.
    pub(crate) fn adjust_indent_count_for_break_else_if_comments(&self) -> i32 {
        self.temp_stacks
            .last()
            .map(|stack| {
                stack
                    .iter()
                    .filter(|&&header| header == Header::Else)
                    .count() as i32
            })
            .unwrap_or(0)
    }

    /// True at namespace/class/file scope, where a brace opens a definition.
    pub(crate) fn is_top_level(&self) -> bool {
        let Some(&back) = self.header_stack.last() else {
            return true;
        };
        if back == Header::OpenBrace && self.header_stack.len() >= 2 {
            if matches!(
                self.header_stack[self.header_stack.len() - 2],
                Header::Namespace
                    | Header::Module
                    | Header::Class
                    | Header::Interface
                    | Header::Struct
                    | Header::Union
            ) {
                return true;
            }
        }
        matches!(
            back,
            Header::Namespace
                | Header::Module
                | Header::Class
                | Header::Interface
                | Header::Struct
                | Header::Union
        )
    }
}
