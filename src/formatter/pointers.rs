// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Pointer and reference disambiguation and alignment.

use super::state::Formatter;
use crate::config::{PointerAlign, ReferenceAlign};
use crate::core::brace_type::BraceType;
use crate::core::chartype::{
    find_first_not_of_ws, find_last_not_of_ws, is_legal_name_char, is_whitespace,
};
use crate::core::resources::{FileType, Header};

pub(crate) fn get_previous_word(file_type: FileType, line: &[char], end: usize) -> String {
    let Some(word_end) = find_last_not_of_ws(&line[..end.min(line.len())]) else {
        return String::new();
    };
    if !is_legal_name_char(file_type, line[word_end]) {
        return String::new();
    }
    let mut start = word_end;
    while start > 0 && is_legal_name_char(file_type, line[start - 1]) {
        start -= 1;
    }
    line[start..=word_end].iter().collect()
}

pub(crate) fn is_numeric_variable(word: &str) -> bool {
    matches!(
        word,
        "bool"
            | "int"
            | "void"
            | "char"
            | "long"
            | "short"
            | "double"
            | "float"
            | "BOOL"
            | "DWORD"
            | "HWND"
            | "INT"
            | "LPSTR"
            | "VOID"
            | "LPVOID"
            | "wxFontEncoding"
    ) || (word.len() >= 4 && word.ends_with("_t"))
}

impl Formatter {
    /// Decide whether `*`, `&`, or `^` under the cursor is a pointer or
    /// reference rather than an arithmetic operator.
    pub(crate) fn is_pointer_or_reference(&mut self) -> bool {
        if self.is_java_style() {
            return false;
        }
        if self.is_char_immediately_post_operator {
            return false;
        }

        let mut last_word =
            get_previous_word(self.file_type(), &self.current_line, self.char_num);
        if last_word.is_empty() {
            last_word = " ".to_string();
        }

        // preceding or following numeric values mean arithmetic
        let rest: String = self.current_line[(self.char_num + 1).min(self.current_line.len())..]
            .iter()
            .collect();
        let mut next_text = self.peek_next_text(&rest, false);
        if next_text.is_empty() {
            next_text = " ".to_string();
        }
        let last_first = last_word.chars().next().unwrap_or(' ');
        let next_first = next_text.chars().next().unwrap_or(' ');
        if last_first.is_ascii_digit()
            || next_first.is_ascii_digit()
            || next_first == '!'
            || next_first == '~'
        {
            return false;
        }

        // multiply then a dereference (a * *b)
        let next_char = self.peek_next_char();
        if self.current_char == '*' && next_char == '*' && !self.is_pointer_to_pointer() {
            return false;
        }

        if (self.found_cast_operator && next_char == '>')
            || self.is_pointer_or_reference_variable(&last_word)
        {
            return true;
        }

        if self.is_in_class_initializer
            && self.previous_non_ws_char != '('
            && self.previous_non_ws_char != '{'
            && self.previous_command_char != ','
            && next_char != ')'
            && next_char != '}'
        {
            return false;
        }

        // rvalue reference
        if self.current_char == '&' && next_char == '&' {
            if last_word == "auto" || self.previous_non_ws_char == '>' {
                return true;
            }
            if self.current_line.len() > self.char_num + 2 {
                let following: String = self.current_line[self.char_num + 2..].iter().collect();
                let following_text = self.peek_next_text(&following, false);
                if following_text.starts_with(')') {
                    return true;
                }
            }
            if self.current_header.is_some() || self.is_in_potential_calculation {
                return false;
            }
            if *self.paren_stack.last().unwrap() > 0
                && self.top_brace_type().intersects(BraceType::COMMAND)
            {
                return false;
            }
            return true;
        }

        if next_char == '*'
            || self.previous_non_ws_char == '='
            || self.previous_non_ws_char == '('
            || self.previous_non_ws_char == '['
            || self.is_char_immediately_post_return
            || self.is_in_template
            || self.is_char_immediately_post_template
            || matches!(self.current_header, Some(Header::Catch | Header::Foreach))
        {
            return true;
        }

        if self.top_brace_type().intersects(BraceType::ARRAY)
            && is_legal_name_char(self.file_type(), last_first)
            && is_legal_name_char(self.file_type(), next_char)
            && self.previous_non_ws_char != ')'
            && self.is_array_operator(&last_word)
        {
            return false;
        }

        // operators inside parens
        if *self.paren_stack.last().unwrap() > 0
            && is_legal_name_char(self.file_type(), last_first)
            && is_legal_name_char(self.file_type(), next_char)
        {
            // followed by an assignment or colon it is a pointer or reference
            if let Some(following) = self.get_following_operator() {
                if following != "*" && following != "&" {
                    return following == "=" || following == ":";
                }
            }
            if self.top_brace_type().intersects(BraceType::COMMAND)
                || self.square_bracket_count > 0
            {
                return false;
            }
            return true;
        }

        if *self.paren_stack.last().unwrap() > 0
            && next_char == '('
            && !matches!(self.previous_non_ws_char, ',' | '(' | '!' | '&' | '*' | '|')
        {
            return false;
        }

        if next_char == '-' || next_char == '+' {
            if let Some(next_num) = find_first_not_of_ws(&self.current_line, self.char_num + 1) {
                if !self.sequence_at(next_num, "++") && !self.sequence_at(next_num, "--") {
                    return false;
                }
            }
        }

        !self.is_in_potential_calculation
            || (!is_legal_name_char(self.file_type(), self.previous_non_ws_char)
                && !(self.previous_non_ws_char == ')' && next_char == '(')
                && !(self.previous_non_ws_char == ')'
                    && self.current_char == '*'
                    && !self.is_immediately_post_cast())
                && self.previous_non_ws_char != ']')
            || (!is_whitespace(next_char)
                && next_char != '-'
                && next_char != '('
                && next_char != '['
                && !is_legal_name_char(self.file_type(), next_char))
    }

    /// A pointer/reference that is really a dereference or address-of is
    /// appended as an operator, not aligned.
    pub(crate) fn is_dereference_or_address_of(&mut self) -> bool {
        if self.is_char_immediately_post_template {
            return false;
        }

        if matches!(self.previous_non_ws_char, '=' | ',' | '.' | '{' | '>' | '<' | '?')
            || self.is_char_immediately_post_line_comment
            || self.is_char_immediately_post_comment
            || self.is_char_immediately_post_return
        {
            return true;
        }

        let next_char = self.peek_next_char();
        if self.current_char == '*' && next_char == '*' {
            if self.previous_non_ws_char == '(' {
                return true;
            }
            return self.current_line.len() < self.char_num + 2;
        }
        if self.current_char == '&' && next_char == '&' {
            if self.previous_non_ws_char == '(' || self.is_in_template {
                return true;
            }
            return self.current_line.len() < self.char_num + 2;
        }

        // check first char on the line
        if find_first_not_of_ws(&self.current_line, 0) == Some(self.char_num)
            && (self.top_brace_type().intersects(BraceType::COMMAND)
                || *self.paren_stack.last().unwrap() != 0)
        {
            return true;
        }

        let rest: String = self.current_line[(self.char_num + 1).min(self.current_line.len())..]
            .iter()
            .collect();
        let next_text = self.peek_next_text(&rest, false);
        if let Some(first) = next_text.chars().next() {
            if matches!(first, ')' | '>' | ',' | '=') {
                return false;
            }
            if first == ';' {
                return true;
            }
        }

        // reference to a pointer, *&
        if (self.current_char == '*' && next_char == '&')
            || (self.previous_non_ws_char == '*' && self.current_char == '&')
        {
            return false;
        }

        if !self.top_brace_type().intersects(BraceType::COMMAND)
            && *self.paren_stack.last().unwrap() == 0
        {
            return false;
        }

        let last_word = get_previous_word(self.file_type(), &self.current_line, self.char_num);
        if last_word == "else" || last_word == "delete" {
            return true;
        }
        if self.is_pointer_or_reference_variable(&last_word) {
            return false;
        }

        let next_first = next_text.chars().next().unwrap_or(' ');
        !(is_legal_name_char(self.file_type(), self.previous_non_ws_char)
            || self.previous_non_ws_char == '>')
            || (!next_text.is_empty()
                && !is_legal_name_char(self.file_type(), next_first)
                && next_first != '/')
            || (self.previous_non_ws_char.is_ascii_punctuation()
                && self.previous_non_ws_char != '.')
            || self.is_char_immediately_post_return
    }

    /// Centered symbol: one space on each side, no more.
    pub(crate) fn is_pointer_or_reference_centered(&self) -> bool {
        let line = &self.current_line;
        let mut pr_num = self.char_num;
        let line_length = line.len();

        if self.peek_next_char() == ' ' {
            return false;
        }
        if pr_num < 1 || line[pr_num - 1] != ' ' {
            return false;
        }
        if pr_num < 2 || line[pr_num - 2] == ' ' {
            return false;
        }
        if pr_num + 1 < line_length && (line[pr_num + 1] == '*' || line[pr_num + 1] == '&') {
            pr_num += 1;
        }
        if pr_num + 1 < line_length && line[pr_num + 1] != ' ' {
            return false;
        }
        if pr_num + 2 < line_length && line[pr_num + 2] == ' ' {
            return false;
        }
        true
    }

    pub(crate) fn is_pointer_or_reference_variable(&self, word: &str) -> bool {
        let mut result = matches!(word, "char" | "string" | "String" | "NSString" | "int" | "void")
            || (word.len() >= 6 && word.ends_with("_t"))
            || word == "INT"
            || word == "VOID";
        // C# object test "x is string"
        if result && self.is_sharp_style() {
            let word_chars: Vec<char> = word.chars().collect();
            let hit = (0..self.char_num.min(self.current_line.len())).rev().find(|&p| {
                p + word_chars.len() <= self.current_line.len()
                    && self.current_line[p..p + word_chars.len()] == word_chars[..]
            });
            if let Some(word_start) = hit {
                let prev = get_previous_word(self.file_type(), &self.current_line, word_start);
                if prev == "is" {
                    result = false;
                }
            }
        }
        result
    }

    pub(crate) fn is_pointer_to_pointer(&self) -> bool {
        let line = &self.current_line;
        if line.len() > self.char_num + 1 && line[self.char_num + 1] == '*' {
            return true;
        }
        let Some(next_text) = find_first_not_of_ws(line, self.char_num + 1) else {
            return false;
        };
        if line[next_text] != '*' {
            return false;
        }
        match find_first_not_of_ws(line, next_text + 1) {
            Some(next2) => line[next2] == ')' || line[next2] == '*',
            None => false,
        }
    }

    fn is_array_operator(&self, prev_word: &str) -> bool {
        !prev_word.is_empty() && !is_numeric_variable(prev_word)
    }

    /// Operator following the current word, for pointer disambiguation.
    pub(crate) fn get_following_operator(&self) -> Option<&'static str> {
        let line = &self.current_line;
        // bypass the following word
        let mut pos = self.char_num + 1;
        while pos < line.len() && (is_whitespace(line[pos]) || is_legal_name_char(self.file_type(), line[pos]))
        {
            pos += 1;
        }
        if pos >= line.len() {
            return None;
        }
        self.tables.find_operator(line, pos, &self.tables.operators)
    }

    /// A `)` that closes a C-style cast immediately before the cursor.
    pub(crate) fn is_immediately_post_cast(&self) -> bool {
        let line = &self.current_line;
        let close = (0..self.char_num).rev().find(|&p| line[p] == ')');
        let Some(close) = close else {
            return false;
        };
        let open = (0..close).rev().find(|&p| line[p] == '(');
        let Some(open) = open else {
            return false;
        };
        let Some(last_inside) = find_last_not_of_ws(&line[..close]) else {
            return false;
        };
        last_inside > open && line[last_inside] == '*'
    }

    /// Reposition the pointer or reference symbol per the alignment option.
    pub(crate) fn format_pointer_or_reference(&mut self) {
        let item_alignment = self.item_alignment();

        // check for ** and &&
        let mut ptr_length = 1usize;
        let mut peeked_char = self.peek_next_char();
        if (self.current_char == '*' && peeked_char == '*')
            || (self.current_char == '&' && peeked_char == '&')
        {
            ptr_length = 2;
            peeked_char = match find_first_not_of_ws(&self.current_line, self.char_num + 2) {
                Some(pos) => self.current_line[pos],
                None => ' ',
            };
        }
        // a cast is formatted on a separate path
        if peeked_char == ')' || peeked_char == '>' || peeked_char == ',' {
            self.format_pointer_or_reference_cast();
            return;
        }

        // remove a padded space
        if self.char_num > 0
            && !is_whitespace(self.current_line[self.char_num - 1])
            && matches!(self.formatted_line.last(), Some(ch) if is_whitespace(*ch))
        {
            self.formatted_line.pop();
            self.space_pad_num -= 1;
        }

        match item_alignment {
            PointerAlign::Type => self.format_pointer_or_reference_to_type(),
            PointerAlign::Middle => self.format_pointer_or_reference_to_middle(),
            PointerAlign::Name => self.format_pointer_or_reference_to_name(),
            PointerAlign::None => {
                let seq: String = self.current_line
                    [self.char_num..(self.char_num + ptr_length).min(self.current_line.len())]
                    .iter()
                    .collect();
                self.formatted_line.extend(seq.chars());
                if ptr_length > 1 {
                    self.go_forward(ptr_length - 1);
                }
            }
        }
    }

    fn item_alignment(&self) -> PointerAlign {
        if self.current_char == '*' || self.current_char == '^' {
            self.options.pointer_align
        } else {
            match self.options.reference_align {
                ReferenceAlign::SameAsPtr => self.options.pointer_align,
                ReferenceAlign::None => PointerAlign::None,
                ReferenceAlign::Type => PointerAlign::Type,
                ReferenceAlign::Middle => PointerAlign::Middle,
                ReferenceAlign::Name => PointerAlign::Name,
            }
        }
    }

    fn gather_sequence(&mut self) -> String {
        let mut sequence = String::new();
        sequence.push(self.current_char);
        if self.current_char == self.peek_next_char() {
            let mut i = self.char_num + 1;
            while i < self.current_line.len() && self.current_line[i] == self.current_char {
                sequence.push(self.current_line[i]);
                self.go_forward(1);
                i += 1;
            }
        }
        sequence
    }

    /// Align the symbol with the type token.
    fn format_pointer_or_reference_to_type(&mut self) {
        let is_old_pr_centered = self.is_pointer_or_reference_centered();
        let sequence = self.gather_sequence();

        // pull the symbol back to the last text
        let mut char_save: Vec<char> = Vec::new();
        if let Some(prev_ch) = find_last_not_of_ws(&self.formatted_line) {
            if prev_ch + 1 < self.formatted_line.len() {
                char_save = self.formatted_line.split_off(prev_ch + 1);
            }
        }
        self.formatted_line.extend(sequence.chars());
        if self.peek_next_char() != ')' {
            self.formatted_line.extend(char_save.iter());
        } else {
            self.space_pad_num -= char_save.len() as i32;
        }
        // if no space after then add one
        if self.char_num + 1 < self.current_line.len()
            && !is_whitespace(self.current_line[self.char_num + 1])
            && self.current_line[self.char_num + 1] != ')'
        {
            self.append_space_pad();
        }
        // if the old symbol was centered, remove a space
        if is_old_pr_centered
            && matches!(self.formatted_line.last(), Some(ch) if is_whitespace(*ch))
        {
            self.formatted_line.pop();
            self.space_pad_num -= 1;
        }
        if self.max_code_length().is_some() && !self.formatted_line.is_empty() {
            let index = self.formatted_line.len() - 1;
            if is_whitespace(self.formatted_line[index]) {
                self.update_formatted_line_split_points_pointer_or_reference(index);
                self.test_for_time_to_split_formatted_line();
            }
        }
    }

    /// Center the symbol between type and name.
    fn format_pointer_or_reference_to_middle(&mut self) {
        // compute the whitespace before the symbol
        let ws_before = match find_last_not_of_ws(&self.current_line[..self.char_num]) {
            Some(pos) => self.char_num - pos - 1,
            None => 0,
        };
        let mut sequence = String::new();
        sequence.push(self.current_char);
        if self.current_char == self.peek_next_char() {
            sequence = self.gather_sequence();
        } else if self.current_char == '*'
            && self.peek_next_char() == '&'
            && matches!(
                self.options.reference_align,
                ReferenceAlign::Type | ReferenceAlign::Middle | ReferenceAlign::SameAsPtr
            )
        {
            sequence = "*&".to_string();
            self.go_forward(1);
            while self.char_num < self.current_line.len().saturating_sub(1)
                && is_whitespace(self.current_line[self.char_num])
            {
                self.go_forward(1);
            }
        }

        // if a comment follows don't align, just space pad
        if self.is_before_any_comment() {
            self.append_space_pad();
            self.formatted_line.extend(sequence.chars());
            self.append_space_after();
            return;
        }

        let is_after_scope_resolution = self.previous_non_ws_char == ':';
        let char_num_save = self.char_num;

        // if this is the last thing on the line
        if find_first_not_of_ws(&self.current_line, self.char_num + 1).is_none() {
            if ws_before == 0 && !is_after_scope_resolution {
                self.formatted_line.push(' ');
            }
            self.formatted_line.extend(sequence.chars());
            return;
        }

        // move following whitespace to preceding whitespace
        while self.char_num + 1 < self.current_line.len()
            && is_whitespace(self.current_line[self.char_num + 1])
        {
            self.go_forward(1);
            if !self.formatted_line.is_empty() {
                self.formatted_line.push(self.current_line[self.char_num]);
            } else {
                self.space_pad_num -= 1;
            }
        }

        // the space padding after the symbol
        let ws_after = match find_first_not_of_ws(&self.current_line, char_num_save + 1) {
            Some(pos) if !self.is_before_any_comment() => pos - char_num_save - 1,
            _ => 0,
        };

        if is_after_scope_resolution {
            // no pad before a scope-resolution operator, pad after
            let insert_at = find_last_not_of_ws(&self.formatted_line).map_or(0, |p| p + 1);
            let seq_chars: Vec<char> = sequence.chars().collect();
            self.formatted_line.splice(insert_at..insert_at, seq_chars);
            self.append_space_pad();
        } else if !self.formatted_line.is_empty() {
            let mut ws_before = ws_before;
            let mut ws_after = ws_after;
            // whitespace must be at least two chars to center
            if ws_before + ws_after < 2 {
                let chars_to_append = 2 - (ws_before + ws_after);
                for _ in 0..chars_to_append {
                    self.formatted_line.push(' ');
                }
                self.space_pad_num += chars_to_append as i32;
                if ws_before == 0 {
                    ws_before += 1;
                }
                if ws_after == 0 {
                    ws_after += 1;
                }
            }
            let pad_after = (ws_before + ws_after) / 2;
            let index = self.formatted_line.len().saturating_sub(pad_after);
            let seq_chars: Vec<char> = sequence.chars().collect();
            if index < self.formatted_line.len() {
                self.formatted_line.splice(index..index, seq_chars);
            } else {
                self.formatted_line.extend(seq_chars);
            }
        } else {
            self.formatted_line.extend(sequence.chars());
            let ws_after = if ws_after == 0 { 1 } else { ws_after };
            for _ in 0..ws_after {
                self.formatted_line.push(' ');
            }
            self.space_pad_num += ws_after as i32;
        }

        if self.max_code_length().is_some() && !self.formatted_line.is_empty() {
            if let Some(index) = find_last_not_of_ws(&self.formatted_line) {
                if index < self.formatted_line.len() - 1 {
                    self.update_formatted_line_split_points_pointer_or_reference(index + 1);
                    self.test_for_time_to_split_formatted_line();
                }
            }
        }
    }

    /// Push the symbol to the identifier.
    fn format_pointer_or_reference_to_name(&mut self) {
        let is_old_pr_centered = self.is_pointer_or_reference_centered();

        let start_num = find_last_not_of_ws(&self.formatted_line).unwrap_or(0);
        let mut sequence = String::new();
        sequence.push(self.current_char);
        if self.current_char == self.peek_next_char() {
            sequence = self.gather_sequence();
        } else if self.current_char == '*' && self.peek_next_char() == '&' {
            // a reference to a pointer aligns both to the name
            sequence = "*&".to_string();
            self.go_forward(1);
            while self.char_num < self.current_line.len().saturating_sub(1)
                && is_whitespace(self.current_line[self.char_num])
            {
                self.go_forward(1);
            }
        }

        let peeked_char = self.peek_next_char();
        let is_after_scope_resolution = self.previous_non_ws_char == ':';

        // move the symbol forward when it is not the last thing on the line
        if (is_legal_name_char(self.file_type(), peeked_char)
            || peeked_char == '('
            || peeked_char == '['
            || peeked_char == '=')
            && find_first_not_of_ws(&self.current_line, self.char_num + 1).is_some()
        {
            while self.char_num + 1 < self.current_line.len()
                && is_whitespace(self.current_line[self.char_num + 1])
            {
                // a padded paren does not move
                if self.options.pad_parens_outside && peeked_char == '(' && !is_old_pr_centered {
                    let start = find_first_not_of_ws(&self.current_line, self.char_num + 1)
                        .filter(|&p| self.current_line[p] != '(');
                    if start.is_some() {
                        break;
                    }
                    let inner = (self.char_num + 1..self.current_line.len()).find(|&p| {
                        !matches!(self.current_line[p], '(' | ' ' | '\t')
                    });
                    if matches!(inner, Some(p) if self.current_line[p] != ')') {
                        break;
                    }
                }
                self.go_forward(1);
                if !self.formatted_line.is_empty() {
                    self.formatted_line.push(self.current_line[self.char_num]);
                } else {
                    self.space_pad_num -= 1;
                }
            }
        }

        if is_after_scope_resolution {
            // don't pad before a scope-resolution operator
            if let Some(last_text) = find_last_not_of_ws(&self.formatted_line) {
                if last_text + 1 < self.formatted_line.len() {
                    self.formatted_line.truncate(last_text + 1);
                }
            }
        } else if !self.formatted_line.is_empty()
            && (self.formatted_line.len() <= start_num + 1
                || !is_whitespace(self.formatted_line[start_num + 1]))
        {
            self.formatted_line.insert(start_num + 1, ' ');
            self.space_pad_num += 1;
        }
        self.append_sequence(&sequence, false);

        if is_old_pr_centered
            && self.formatted_line.len() > start_num + 1
            && is_whitespace(self.formatted_line[start_num + 1])
            && peeked_char != '*'
            && !self.is_before_any_comment()
        {
            self.formatted_line.remove(start_num + 1);
            self.space_pad_num -= 1;
        }

        // don't convert to *= or &=
        if peeked_char == '=' {
            self.append_space_after();
            if self.formatted_line.len() > start_num + 2
                && is_whitespace(self.formatted_line[start_num + 1])
                && is_whitespace(self.formatted_line[start_num + 2])
            {
                self.formatted_line.remove(start_num + 1);
                self.space_pad_num -= 1;
            }
        }

        if self.max_code_length().is_some() {
            let index = (0..self.formatted_line.len())
                .rev()
                .find(|&p| is_whitespace(self.formatted_line[p]));
            if let Some(index) = index {
                if index < self.formatted_line.len() - 1
                    && matches!(self.formatted_line[index + 1], '*' | '&' | '^')
                {
                    self.update_formatted_line_split_points_pointer_or_reference(index);
                    self.test_for_time_to_split_formatted_line();
                }
            }
        }
    }

    /// Pointers and references in parameter lists are processed as casts.
    pub(crate) fn format_pointer_or_reference_cast(&mut self) {
        let item_alignment = self.item_alignment();

        let mut sequence = String::new();
        sequence.push(self.current_char);
        if self.is_sequence_reached("**") || self.is_sequence_reached("&&") {
            self.go_forward(1);
            sequence.push(self.current_line[self.char_num]);
        }
        if item_alignment == PointerAlign::None {
            self.append_sequence(&sequence, false);
            return;
        }

        // remove preceding whitespace
        let mut prev_ch = ' ';
        if let Some(prev_num) = find_last_not_of_ws(&self.formatted_line) {
            prev_ch = self.formatted_line[prev_num];
            if item_alignment == PointerAlign::Type && self.current_char == '*' && prev_ch == '*' {
                // '* *' may be a multiply followed by a dereference
                if prev_num + 2 < self.formatted_line.len()
                    && is_whitespace(self.formatted_line[prev_num + 2])
                {
                    self.space_pad_num -= (self.formatted_line.len() - 2 - prev_num) as i32;
                    self.formatted_line.truncate(prev_num + 2);
                }
            } else if prev_num + 1 < self.formatted_line.len()
                && is_whitespace(self.formatted_line[prev_num + 1])
                && prev_ch != '('
            {
                self.space_pad_num -= (self.formatted_line.len() - 1 - prev_num) as i32;
                self.formatted_line.truncate(prev_num + 1);
            }
        }
        let is_after_scope_resolution = self.previous_non_ws_char == ':';
        if matches!(item_alignment, PointerAlign::Middle | PointerAlign::Name)
            && !is_after_scope_resolution
            && prev_ch != '('
        {
            self.append_space_pad();
            if self.max_code_length().is_some() && !self.formatted_line.is_empty() {
                let index = self.formatted_line.len() - 1;
                self.update_formatted_line_split_points_pointer_or_reference(index);
            }
            self.append_sequence(&sequence, false);
        } else {
            self.append_sequence(&sequence, false);
        }
    }
}
