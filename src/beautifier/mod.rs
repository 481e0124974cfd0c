// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Line-level indentation engine.
//!
//! The beautifier consumes one canonicalized line per call and prepends the
//! correct leading whitespace. Nesting context lives in value-type stacks;
//! preprocessor branches and multi-line `#define` bodies are indented by
//! cloned beautifiers that deep-copy every stack but share the immutable
//! resource tables.

mod indent;
mod parse;

use std::rc::Rc;

use crate::config::FormatterOptions;
use crate::core::chartype::{find_first_not_of_ws, is_legal_name_char, is_whitespace};
use crate::core::resources::{FileType, Header, ResourceTables};

const CLASS_INITIALIZER_INDENTS: i32 = 1;

#[derive(Debug, Clone)]
pub struct Beautifier {
    pub(crate) options: Rc<FormatterOptions>,
    pub(crate) tables: Rc<ResourceTables>,

    // cloned-context stacks
    pub(crate) waiting_beautifier_stack: Vec<Beautifier>,
    pub(crate) active_beautifier_stack: Vec<Beautifier>,
    pub(crate) waiting_stack_length_stack: Vec<usize>,
    pub(crate) active_stack_length_stack: Vec<usize>,

    // scope stacks
    pub(crate) header_stack: Vec<Header>,
    pub(crate) temp_stacks: Vec<Vec<Header>>,
    pub(crate) paren_depth_stack: Vec<i32>,
    pub(crate) block_statement_stack: Vec<bool>,
    pub(crate) paren_statement_stack: Vec<bool>,
    pub(crate) brace_block_state_stack: Vec<bool>,
    pub(crate) continuation_indent_stack: Vec<i32>,
    pub(crate) continuation_indent_stack_size_stack: Vec<usize>,
    pub(crate) paren_indent_stack: Vec<i32>,
    pub(crate) preproc_indent_stack: Vec<(i32, i32)>,

    // counters
    pub(crate) indent_count: i32,
    pub(crate) space_indent_count: i32,
    pub(crate) paren_depth: i32,
    pub(crate) template_depth: i32,
    pub(crate) square_bracket_count: i32,
    pub(crate) block_tab_count: i32,
    pub(crate) preproc_block_indent: i32,
    pub(crate) define_indent_count: i32,
    pub(crate) line_opening_blocks_num: i32,
    pub(crate) line_closing_blocks_num: i32,
    pub(crate) prev_final_line_indent_count: i32,
    pub(crate) prev_final_line_space_indent_count: i32,
    pub(crate) preprocessor_cpp_extern_c_brace: i32,

    // header bookkeeping
    pub(crate) current_header: Option<Header>,
    pub(crate) previous_last_line_header: Option<Header>,
    pub(crate) last_line_header: Option<Header>,
    pub(crate) probation_header: Option<Header>,

    // character memory
    pub(crate) prev_non_space_ch: char,
    pub(crate) current_non_space_ch: char,
    pub(crate) prev_non_legal_ch: char,
    pub(crate) current_non_legal_ch: char,
    pub(crate) quote_char: char,
    pub(crate) verbatim_delimiter: String,

    // quote/comment context
    pub(crate) is_in_quote: bool,
    pub(crate) is_in_verbatim_quote: bool,
    pub(crate) have_line_continuation_char: bool,
    pub(crate) is_in_comment: bool,
    pub(crate) is_in_preprocessor_comment: bool,
    pub(crate) was_in_preprocessor_comment: bool,
    pub(crate) is_in_run_in_comment: bool,
    pub(crate) block_comment_no_indent: bool,
    pub(crate) block_comment_no_beautify: bool,
    pub(crate) line_comment_no_beautify: bool,

    // statement context
    pub(crate) is_continuation: bool,
    pub(crate) is_in_case: bool,
    pub(crate) is_in_question: bool,
    pub(crate) is_in_header: bool,
    pub(crate) is_in_template: bool,
    pub(crate) is_in_conditional: bool,
    pub(crate) is_in_class_header: bool,
    pub(crate) is_in_class_header_tab: bool,
    pub(crate) is_in_class_initializer: bool,
    pub(crate) is_in_class: bool,
    pub(crate) is_in_switch: bool,
    pub(crate) is_in_enum: bool,
    pub(crate) is_in_enum_type_id: bool,
    pub(crate) is_in_trailing_return_type: bool,
    pub(crate) is_in_operator_decl: bool,
    pub(crate) found_pre_command_header: bool,
    pub(crate) found_pre_command_macro: bool,

    // preprocessor context
    pub(crate) is_in_define: bool,
    pub(crate) is_in_define_definition: bool,
    pub(crate) backslash_ends_prev_line: bool,
    pub(crate) is_in_indentable_preproc_block: bool,
    pub(crate) is_indent_mode_off: bool,

    // asm passthrough
    pub(crate) is_in_asm: bool,
    pub(crate) is_in_asm_one_line: bool,
    pub(crate) is_in_asm_block: bool,

    // Objective-C context
    pub(crate) is_in_objc_method_definition: bool,
    pub(crate) is_in_objc_method_call: bool,
    pub(crate) is_in_objc_interface: bool,
    pub(crate) is_immediately_post_objc_method_definition: bool,
    pub(crate) is_immediately_post_objc_method_call: bool,
    pub(crate) objc_colon_align_subsequent: i32,

    // per-line flags
    pub(crate) line_begins_with_open_brace: bool,
    pub(crate) line_begins_with_close_brace: bool,
    pub(crate) line_begins_with_comma: bool,
    pub(crate) line_is_comment_only: bool,
    pub(crate) line_is_line_comment_only: bool,
    pub(crate) line_opens_with_line_comment: bool,
    pub(crate) line_opens_with_comment: bool,
    pub(crate) line_starts_in_comment: bool,
    pub(crate) should_indent_braced_line: bool,
    pub(crate) previous_line_probation_tab: bool,

    // set by the formatter before each beautify call
    pub(crate) in_line_number: usize,
    pub(crate) run_in_indent_continuation: i32,
    pub(crate) non_in_statement_brace: i32,
    pub(crate) is_non_in_statement_array: bool,
    pub(crate) is_sharp_accessor: bool,
    pub(crate) is_sharp_delegate: bool,
    pub(crate) is_in_extern_c: bool,
    pub(crate) is_in_beautify_sql: bool,
    pub(crate) is_in_indentable_struct: bool,
    pub(crate) is_in_indentable_preproc: bool,
    pub(crate) is_else_header_indent: bool,
    pub(crate) is_case_header_comment_indent: bool,
}

impl Beautifier {
    pub fn new(options: Rc<FormatterOptions>, tables: Rc<ResourceTables>) -> Self {
        Self {
            options,
            tables,
            waiting_beautifier_stack: Vec::new(),
            active_beautifier_stack: Vec::new(),
            waiting_stack_length_stack: Vec::new(),
            active_stack_length_stack: Vec::new(),
            header_stack: Vec::new(),
            temp_stacks: vec![Vec::new()],
            paren_depth_stack: Vec::new(),
            block_statement_stack: Vec::new(),
            paren_statement_stack: Vec::new(),
            brace_block_state_stack: vec![true],
            continuation_indent_stack: Vec::new(),
            continuation_indent_stack_size_stack: vec![0],
            paren_indent_stack: Vec::new(),
            preproc_indent_stack: Vec::new(),
            indent_count: 0,
            space_indent_count: 0,
            paren_depth: 0,
            template_depth: 0,
            square_bracket_count: 0,
            block_tab_count: 0,
            preproc_block_indent: 0,
            define_indent_count: 0,
            line_opening_blocks_num: 0,
            line_closing_blocks_num: 0,
            prev_final_line_indent_count: 0,
            prev_final_line_space_indent_count: 0,
            preprocessor_cpp_extern_c_brace: 0,
            current_header: None,
            previous_last_line_header: None,
            last_line_header: None,
            probation_header: None,
            prev_non_space_ch: '{',
            current_non_space_ch: '{',
            prev_non_legal_ch: '{',
            current_non_legal_ch: '{',
            quote_char: ' ',
            verbatim_delimiter: String::new(),
            is_in_quote: false,
            is_in_verbatim_quote: false,
            have_line_continuation_char: false,
            is_in_comment: false,
            is_in_preprocessor_comment: false,
            was_in_preprocessor_comment: false,
            is_in_run_in_comment: false,
            block_comment_no_indent: false,
            block_comment_no_beautify: false,
            line_comment_no_beautify: false,
            is_continuation: false,
            is_in_case: false,
            is_in_question: false,
            is_in_header: false,
            is_in_template: false,
            is_in_conditional: false,
            is_in_class_header: false,
            is_in_class_header_tab: false,
            is_in_class_initializer: false,
            is_in_class: false,
            is_in_switch: false,
            is_in_enum: false,
            is_in_enum_type_id: false,
            is_in_trailing_return_type: false,
            is_in_operator_decl: false,
            found_pre_command_header: false,
            found_pre_command_macro: false,
            is_in_define: false,
            is_in_define_definition: false,
            backslash_ends_prev_line: false,
            is_in_indentable_preproc_block: false,
            is_indent_mode_off: false,
            is_in_asm: false,
            is_in_asm_one_line: false,
            is_in_asm_block: false,
            is_in_objc_method_definition: false,
            is_in_objc_method_call: false,
            is_in_objc_interface: false,
            is_immediately_post_objc_method_definition: false,
            is_immediately_post_objc_method_call: false,
            objc_colon_align_subsequent: 0,
            line_begins_with_open_brace: false,
            line_begins_with_close_brace: false,
            line_begins_with_comma: false,
            line_is_comment_only: false,
            line_is_line_comment_only: false,
            line_opens_with_line_comment: false,
            line_opens_with_comment: false,
            line_starts_in_comment: false,
            should_indent_braced_line: true,
            previous_line_probation_tab: false,
            in_line_number: 0,
            run_in_indent_continuation: 0,
            non_in_statement_brace: 0,
            is_non_in_statement_array: false,
            is_sharp_accessor: false,
            is_sharp_delegate: false,
            is_in_extern_c: false,
            is_in_beautify_sql: false,
            is_in_indentable_struct: false,
            is_in_indentable_preproc: false,
            is_else_header_indent: false,
            is_case_header_comment_indent: false,
        }
    }

    pub(crate) fn file_type(&self) -> FileType {
        self.tables.file_type
    }

    pub(crate) fn is_c_style(&self) -> bool {
        self.file_type() == FileType::C
    }

    pub(crate) fn is_java_style(&self) -> bool {
        self.file_type() == FileType::Java
    }

    pub(crate) fn is_sharp_style(&self) -> bool {
        self.file_type() == FileType::Sharp
    }

    pub(crate) fn indent_length(&self) -> i32 {
        self.options.indent_length() as i32
    }

    pub(crate) fn tab_length(&self) -> i32 {
        self.options.tab_length() as i32
    }

    /// True when every scope stack has unwound; checked at end of stream.
    pub fn stacks_are_balanced(&self) -> bool {
        self.header_stack.is_empty()
            && self.continuation_indent_stack.is_empty()
            && self.paren_indent_stack.is_empty()
            && self.preproc_indent_stack.is_empty()
            && self.waiting_beautifier_stack.is_empty()
            && self.active_beautifier_stack.is_empty()
    }

    /// Indent one canonicalized line.
    pub fn beautify(&mut self, original_line: &str) -> String {
        let is_in_quote_continuation =
            self.is_in_verbatim_quote || self.have_line_continuation_char;

        self.current_header = None;
        self.last_line_header = None;
        self.block_comment_no_beautify = self.block_comment_no_indent;
        self.is_in_class = false;
        self.is_in_switch = false;
        self.line_begins_with_open_brace = false;
        self.line_begins_with_close_brace = false;
        self.line_begins_with_comma = false;
        self.line_is_comment_only = false;
        self.line_is_line_comment_only = false;
        self.should_indent_braced_line = true;
        self.is_in_asm_one_line = false;
        self.line_opens_with_line_comment = false;
        self.line_opens_with_comment = false;
        self.line_starts_in_comment = self.is_in_comment;
        self.previous_line_probation_tab = false;
        self.line_opening_blocks_num = 0;
        self.line_closing_blocks_num = 0;
        if self.is_immediately_post_objc_method_definition {
            self.clear_objc_method_definition_alignment();
        }
        if self.is_immediately_post_objc_method_call {
            self.is_immediately_post_objc_method_call = false;
            self.is_in_objc_method_call = false;
            self.objc_colon_align_subsequent = 0;
        }

        // trim leading/trailing whitespace as context allows; comments
        // starting mid-line keep their relation to the preliminary indent
        let line: String = if is_in_quote_continuation {
            if original_line == " " {
                String::new()
            } else {
                original_line.to_string()
            }
        } else if self.is_in_comment || self.is_in_beautify_sql {
            let trimmed = original_line.trim_end_matches([' ', '\t']).to_string();
            let chars: Vec<char> = trimmed.chars().collect();
            if let Some(first) = find_first_not_of_ws(&chars, 0) {
                match chars[first] {
                    '{' => self.line_begins_with_open_brace = true,
                    '}' => self.line_begins_with_close_brace = true,
                    ',' => self.line_begins_with_comma = true,
                    _ => {}
                }
            }
            trimmed
        } else {
            let trimmed = original_line.trim_matches([' ', '\t']).to_string();
            if !trimmed.is_empty() {
                if trimmed.starts_with('{') {
                    self.line_begins_with_open_brace = true;
                } else if trimmed.starts_with('}') {
                    self.line_begins_with_close_brace = true;
                } else if trimmed.starts_with(',') {
                    self.line_begins_with_comma = true;
                } else if trimmed.starts_with("//") {
                    self.line_is_line_comment_only = true;
                } else if trimmed.starts_with("/*") && trimmed[2..].contains("*/") {
                    self.line_is_comment_only = true;
                }
            }

            self.is_in_run_in_comment = false;
            let chars: Vec<char> = trimmed.chars().collect();
            if let Some(j) = (0..chars.len())
                .find(|&p| chars[p] != ' ' && chars[p] != '\t' && chars[p] != '{')
            {
                if chars[j] == '/' && chars.get(j + 1) == Some(&'/') {
                    self.line_opens_with_line_comment = true;
                }
                if chars[j] == '/' && chars.get(j + 1) == Some(&'*') {
                    self.line_opens_with_comment = true;
                    if trimmed.starts_with('{') {
                        self.is_in_run_in_comment = true;
                    }
                }
            }
            trimmed
        };

        if (self.line_is_line_comment_only || self.line_is_comment_only)
            && line.contains("*INDENT-OFF*")
        {
            self.is_indent_mode_off = true;
        }

        if line.is_empty() {
            if self.backslash_ends_prev_line {
                self.backslash_ends_prev_line = false;
                // an empty line ends a multi-line #define
                if self.is_in_define_definition && !self.is_in_define {
                    self.is_in_define_definition = false;
                    self.active_beautifier_stack.pop();
                }
            }
            if self.options.empty_line_fill && !is_in_quote_continuation {
                if self.is_in_indentable_preproc_block {
                    return self.indented_line_return(
                        self.pre_line_ws(self.preproc_block_indent, 0),
                        original_line,
                    );
                }
                if !self.header_stack.is_empty() || self.is_in_enum {
                    return self.indented_line_return(
                        self.pre_line_ws(
                            self.prev_final_line_indent_count,
                            self.prev_final_line_space_indent_count,
                        ),
                        original_line,
                    );
                }
                // must fall through here
            } else {
                return line;
            }
        }

        // handle preprocessor commands
        let line_chars: Vec<char> = line.chars().collect();
        if self.is_in_indentable_preproc_block
            && !line_chars.is_empty()
            && line_chars[0] != '#'
        {
            let indented = if self.is_in_class_header_tab || self.is_in_class_initializer {
                self.pre_line_ws(
                    self.prev_final_line_indent_count,
                    self.prev_final_line_space_indent_count,
                ) + &line
            } else {
                self.pre_line_ws(self.preproc_block_indent, 0) + &line
            };
            return self.indented_line_return(indented, original_line);
        }

        if !self.is_in_comment
            && !is_in_quote_continuation
            && !line_chars.is_empty()
            && ((line_chars[0] == '#' && !self.is_indented_preprocessor(&line_chars, 0))
                || self.backslash_ends_prev_line)
        {
            if line_chars[0] == '#' && !self.is_in_define {
                let preproc = extract_preprocessor_statement(&line_chars);
                self.process_preprocessor(&preproc, &line);
                if self.is_in_indentable_preproc_block || self.is_in_indentable_preproc {
                    let indented;
                    if preproc.starts_with("if") {
                        indented = self.pre_line_ws(self.preproc_block_indent, 0) + &line;
                        self.preproc_block_indent += 1;
                        self.is_in_indentable_preproc_block = true;
                    } else if preproc == "else" || preproc == "elif" {
                        indented = self.pre_line_ws(self.preproc_block_indent - 1, 0) + &line;
                    } else if preproc == "endif" {
                        self.preproc_block_indent -= 1;
                        indented = self.pre_line_ws(self.preproc_block_indent, 0) + &line;
                        if self.preproc_block_indent == 0 {
                            self.is_in_indentable_preproc_block = false;
                        }
                    } else {
                        indented = self.pre_line_ws(self.preproc_block_indent, 0) + &line;
                    }
                    return self.indented_line_return(indented, original_line);
                }
                if self.options.preproc_conditional_indent && !preproc.is_empty() {
                    if preproc.starts_with("if") {
                        let entry = if !self.is_in_define
                            && !self.active_beautifier_stack.is_empty()
                        {
                            let mut active = self.active_beautifier_stack.pop().unwrap();
                            let entry = active.compute_preprocessor_indent();
                            self.active_beautifier_stack.push(active);
                            entry
                        } else {
                            self.compute_preprocessor_indent()
                        };
                        self.preproc_indent_stack.push(entry);
                        let indented = self.pre_line_ws(entry.0, entry.1) + &line;
                        return self.indented_line_return(indented, original_line);
                    }
                    if preproc == "else" || preproc == "elif" {
                        if let Some(&(ind, sp)) = self.preproc_indent_stack.last() {
                            let indented = self.pre_line_ws(ind, sp) + &line;
                            return self.indented_line_return(indented, original_line);
                        }
                    } else if preproc == "endif" {
                        if let Some(&(ind, sp)) = self.preproc_indent_stack.last() {
                            let indented = self.pre_line_ws(ind, sp) + &line;
                            self.preproc_indent_stack.pop();
                            return self.indented_line_return(indented, original_line);
                        }
                    }
                }
            }

            if !line_chars.is_empty() {
                self.backslash_ends_prev_line = *line_chars.last().unwrap() == '\\';
            }
            // comments within a #define can continue without the backslash
            if self.is_in_preprocessor_unterminated_comment(&line) {
                self.backslash_ends_prev_line = true;
            }

            // the end of a multi-line #define uses the cloned beautifier
            // one last time, then destroys it
            if !self.backslash_ends_prev_line && self.is_in_define_definition && !self.is_in_define
            {
                self.is_in_define_definition = false;
                let Some(mut define_beautifier) = self.active_beautifier_stack.pop() else {
                    return original_line.to_string();
                };
                let indented = define_beautifier.beautify(&line);
                return self.indented_line_return(indented, original_line);
            }

            if !self.is_in_define && !self.is_in_define_definition {
                return original_line.to_string();
            }
        }

        // delegate to the innermost cloned beautifier when one is active
        if !self.is_in_define && !self.active_beautifier_stack.is_empty() {
            let mut active = self.active_beautifier_stack.pop().unwrap();
            active.in_line_number = self.in_line_number;
            active.run_in_indent_continuation = self.run_in_indent_continuation;
            active.non_in_statement_brace = self.non_in_statement_brace;
            active.objc_colon_align_subsequent = self.objc_colon_align_subsequent;
            active.line_comment_no_beautify = self.line_comment_no_beautify;
            active.is_else_header_indent = self.is_else_header_indent;
            active.is_case_header_comment_indent = self.is_case_header_comment_indent;
            active.is_non_in_statement_array = self.is_non_in_statement_array;
            active.is_sharp_accessor = self.is_sharp_accessor;
            active.is_sharp_delegate = self.is_sharp_delegate;
            active.is_in_extern_c = self.is_in_extern_c;
            active.is_in_beautify_sql = self.is_in_beautify_sql;
            active.is_in_indentable_struct = self.is_in_indentable_struct;
            active.is_in_indentable_preproc = self.is_in_indentable_preproc;
            let result = active.beautify(original_line);
            self.active_beautifier_stack.push(active);
            return result;
        }

        // flag an indented header in case this line is a one-line block
        let is_in_extra_header_indent = !self.header_stack.is_empty()
            && self.line_begins_with_open_brace
            && (*self.header_stack.last().unwrap() != Header::OpenBrace
                || self.probation_header.is_some());

        let i_prelim = self.header_stack.len();

        self.compute_preliminary_indentation();
        self.parse_current_line(&line_chars);
        self.adjust_parsed_line_indentation(i_prelim, is_in_extra_header_indent);

        if self.is_in_objc_method_definition {
            self.adjust_objc_method_definition_indentation(&line_chars);
        }

        if self.is_in_define {
            if line.starts_with('#') {
                // the 'define' does not have to be attached to the '#'
                let preproc = line[1..].trim_start();
                if preproc.starts_with("define") {
                    if self
                        .continuation_indent_stack
                        .last()
                        .is_some_and(|&top| top > 0)
                    {
                        self.define_indent_count = self.indent_count;
                    } else {
                        self.define_indent_count = self.indent_count - 1;
                        self.indent_count -= 1;
                    }
                }
            }
            self.indent_count -= self.define_indent_count;
        }

        if self.indent_count < 0 {
            self.indent_count = 0;
        }

        if self.line_comment_no_beautify
            || self.block_comment_no_beautify
            || is_in_quote_continuation
        {
            self.indent_count = 0;
            self.space_indent_count = 0;
        }

        let indented_line = self.pre_line_ws(self.indent_count, self.space_indent_count) + &line;
        let indented_line = self.indented_line_return(indented_line, original_line);

        self.prev_final_line_space_indent_count = self.space_indent_count;
        self.prev_final_line_indent_count = self.indent_count;

        if self.last_line_header.is_some() {
            self.previous_last_line_header = self.last_line_header;
        }

        if (self.line_is_line_comment_only || self.line_is_comment_only)
            && line.contains("*INDENT-ON*")
        {
            self.is_indent_mode_off = false;
        }

        indented_line
    }

    fn indented_line_return(&self, new_line: String, original_line: &str) -> String {
        if self.is_indent_mode_off {
            original_line.to_string()
        } else {
            new_line
        }
    }

    /// Build the leading whitespace for a line.
    pub(crate) fn pre_line_ws(&self, line_indent_count: i32, line_space_indent_count: i32) -> String {
        let mut indent_count = line_indent_count;
        let mut space_count = line_space_indent_count;
        let indent_length = self.indent_length();
        let tab_length = self.tab_length();

        if self.options.indent.force_tabs() {
            if tab_length != indent_length {
                let total = indent_count * indent_length + space_count;
                indent_count = total / tab_length;
                space_count = total % tab_length;
            } else {
                indent_count += space_count / indent_length;
                space_count %= indent_length;
            }
        }

        let mut ws = String::new();
        for _ in 0..indent_count.max(0) {
            if self.options.indent.uses_tabs() {
                ws.push('\t');
            } else {
                for _ in 0..indent_length {
                    ws.push(' ');
                }
            }
        }
        for _ in 0..space_count.max(0) {
            ws.push(' ');
        }
        ws
    }

    /// Manage the cloned-beautifier stacks for preprocessor statements.
    fn process_preprocessor(&mut self, preproc: &str, line: &str) {
        if self.options.preproc_define_indent && preproc == "define" && line.ends_with('\\') {
            if !self.is_in_define_definition {
                // the original beautifier clones a worker that will indent
                // the body of this #define
                self.is_in_define_definition = true;
                let clone = self.clone();
                self.active_beautifier_stack.push(clone);
            } else {
                // this is the cloned worker itself
                self.is_in_define = true;
            }
        } else if preproc.starts_with("if") {
            if is_preprocessor_conditional_cplusplus(line)
                && self.preprocessor_cpp_extern_c_brace == 0
            {
                self.preprocessor_cpp_extern_c_brace = 1;
            }
            self.waiting_stack_length_stack
                .push(self.waiting_beautifier_stack.len());
            self.active_stack_length_stack
                .push(self.active_beautifier_stack.len());
            let snapshot = if self.active_beautifier_stack.is_empty() {
                self.clone()
            } else {
                self.active_beautifier_stack.last().unwrap().clone()
            };
            self.waiting_beautifier_stack.push(snapshot);
        } else if preproc == "else" {
            // move the waiting snapshot to the active stack
            if let Some(snapshot) = self.waiting_beautifier_stack.pop() {
                self.active_beautifier_stack.push(snapshot);
            }
        } else if preproc == "elif" {
            // copy the waiting snapshot, keeping the original
            if let Some(snapshot) = self.waiting_beautifier_stack.last() {
                let copy = snapshot.clone();
                self.active_beautifier_stack.push(copy);
            }
        } else if preproc == "endif" {
            if let Some(floor) = self.waiting_stack_length_stack.pop() {
                self.waiting_beautifier_stack.truncate(floor);
            }
            if let Some(floor) = self.active_stack_length_stack.pop() {
                self.active_beautifier_stack.truncate(floor);
            }
        }
    }

    /// Indentation entry for a `#if` line when conditional indenting is on.
    fn compute_preprocessor_indent(&mut self) -> (i32, i32) {
        self.compute_preliminary_indentation();
        let mut entry = (self.indent_count, self.space_indent_count);
        if entry.0 > 0
            && matches!(
                self.header_stack.last(),
                Some(Header::If | Header::Else | Header::For | Header::While)
            )
        {
            entry.0 -= 1;
        }
        entry
    }

    fn is_indented_preprocessor(&self, line: &[char], curr_pos: usize) -> bool {
        let next_word = get_next_word(self.file_type(), line, curr_pos);
        if next_word == "region" || next_word == "endregion" {
            return true;
        }
        if next_word == "pragma" {
            let text: String = line.iter().collect();
            if let Some(rest) = text
                .split_once("pragma")
                .map(|(_, rest)| rest.trim_start())
            {
                let second: String = rest
                    .chars()
                    .take_while(|&ch| is_legal_name_char(self.file_type(), ch))
                    .collect();
                return second == "omp" || second == "region" || second == "endregion";
            }
        }
        false
    }

    fn is_in_preprocessor_unterminated_comment(&mut self, line: &str) -> bool {
        if !self.is_in_preprocessor_comment {
            if !self.was_in_preprocessor_comment && !line.contains("/*") {
                return false;
            }
            self.was_in_preprocessor_comment = false;
        }
        if !self.was_in_preprocessor_comment && line.contains("*/") {
            self.is_in_preprocessor_comment = false;
            self.was_in_preprocessor_comment = true;
            return false;
        }
        self.is_in_preprocessor_comment = true;
        true
    }

    fn clear_objc_method_definition_alignment(&mut self) {
        self.space_indent_count = 0;
        self.is_in_objc_method_definition = false;
        self.is_immediately_post_objc_method_definition = false;
        if !self.continuation_indent_stack.is_empty() {
            self.continuation_indent_stack.pop();
        }
    }

    fn adjust_objc_method_definition_indentation(&mut self, line: &[char]) {
        // register indent for an Objective-C continuation line
        if matches!(line.first(), Some('-' | '+'))
            && (self.continuation_indent_stack.is_empty()
                || *self.continuation_indent_stack.last().unwrap() == 0)
        {
            self.continuation_indent_stack.push(self.indent_length());
            self.is_continuation = true;
        }
    }

    /// Distance to the next non-whitespace, non-comment character after `i`,
    /// or the remaining length when there is none.
    pub(crate) fn next_program_char_distance(&self, line: &[char], i: usize) -> usize {
        let remaining = line.len().saturating_sub(i);
        let mut in_comment = false;
        let mut distance = 1usize;
        while distance < remaining {
            let ch = line[i + distance];
            if in_comment {
                if ch == '*' && line.get(i + distance + 1) == Some(&'/') {
                    distance += 1;
                    in_comment = false;
                }
                distance += 1;
                continue;
            }
            if is_whitespace(ch) {
                distance += 1;
                continue;
            }
            if ch == '/' {
                match line.get(i + distance + 1) {
                    Some('/') => return remaining,
                    Some('*') => {
                        distance += 2;
                        in_comment = true;
                        continue;
                    }
                    _ => return distance,
                }
            }
            return distance;
        }
        remaining
    }

    /// Spaces needed to reach the next tab stop from column `i`.
    pub(crate) fn convert_tab_to_spaces(&self, i: usize, tab_increment_in: i32) -> i32 {
        let tab_length = self.tab_length();
        tab_length - 1 - ((tab_increment_in + i as i32) % tab_length)
    }
}

pub(crate) fn get_next_word(file_type: FileType, line: &[char], curr_pos: usize) -> String {
    if curr_pos + 1 >= line.len() {
        return String::new();
    }
    let Some(start) = find_first_not_of_ws(line, curr_pos + 1) else {
        return String::new();
    };
    if !is_legal_name_char(file_type, line[start]) {
        return String::new();
    }
    let mut end = start + 1;
    while end < line.len() && is_legal_name_char(file_type, line[end]) && line[end] != '.' {
        end += 1;
    }
    line[start..end].iter().collect()
}

pub(crate) fn extract_preprocessor_statement(line: &[char]) -> String {
    let Some(start) = (0..line.len())
        .find(|&i| !matches!(line[i], '#' | '/' | ' ' | '\t'))
    else {
        return String::new();
    };
    let end = (start..line.len())
        .find(|&i| matches!(line[i], '/' | ' ' | '\t'))
        .unwrap_or(line.len());
    line[start..end].iter().collect()
}

fn is_preprocessor_conditional_cplusplus(line: &str) -> bool {
    let preproc = line.trim_start_matches(['#', ' ', '\t']);
    if preproc.starts_with("ifdef") {
        return preproc[5..].trim_start().starts_with("__cplusplus");
    }
    if let Some(rest) = preproc.strip_prefix("if") {
        let rest = rest.trim_start();
        if let Some(rest) = rest.strip_prefix("defined") {
            let rest = rest.trim_start();
            if let Some(rest) = rest.strip_prefix('(') {
                return rest.trim_start().starts_with("__cplusplus");
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatterOptions;
    use crate::core::resources::{FileType, ResourceTables};
    use std::rc::Rc;

    fn beautifier(options: FormatterOptions) -> Beautifier {
        let tables = ResourceTables::for_file_type(options.file_type);
        Beautifier::new(Rc::new(options), tables)
    }

    fn run(b: &mut Beautifier, source: &[&str]) -> Vec<String> {
        source.iter().map(|line| b.beautify(line)).collect()
    }

    #[test]
    fn indents_block_bodies_one_level() {
        let mut b = beautifier(FormatterOptions::default());
        let out = run(&mut b, &["void f()", "{", "int x;", "}"]);
        assert_eq!(out, vec!["void f()", "{", "    int x;", "}"]);
        assert!(b.stacks_are_balanced());
    }

    #[test]
    fn nested_headers_indent_cumulatively() {
        let mut b = beautifier(FormatterOptions::default());
        let out = run(
            &mut b,
            &["void f()", "{", "if (x)", "{", "y();", "}", "}"],
        );
        assert_eq!(
            out,
            vec![
                "void f()",
                "{",
                "    if (x)",
                "    {",
                "        y();",
                "    }",
                "}"
            ]
        );
    }

    #[test]
    fn header_without_braces_indents_single_statement() {
        let mut b = beautifier(FormatterOptions::default());
        let out = run(&mut b, &["if (x)", "y();", "z();"]);
        assert_eq!(out, vec!["if (x)", "    y();", "z();"]);
    }

    #[test]
    fn preprocessor_lines_pass_through_unindented() {
        let mut b = beautifier(FormatterOptions::default());
        let out = run(&mut b, &["void f()", "{", "#ifdef A", "int x;", "#endif", "}"]);
        assert_eq!(out[2], "#ifdef A");
        assert_eq!(out[3], "    int x;");
        assert_eq!(out[4], "#endif");
    }

    #[test]
    fn preproc_branches_use_cloned_context() {
        let mut b = beautifier(FormatterOptions::default());
        // the #else branch must resume from the snapshot taken at #if
        let out = run(
            &mut b,
            &[
                "void f()",
                "{",
                "#if A",
                "if (x)",
                "{",
                "#else",
                "if (y)",
                "{",
                "#endif",
                "z();",
                "}",
                "}",
            ],
        );
        assert_eq!(out[3], "    if (x)");
        assert_eq!(out[6], "    if (y)");
        assert_eq!(out[9], "        z();");
        assert!(b.stacks_are_balanced());
    }

    #[test]
    fn define_continuation_uses_cloned_beautifier() {
        let mut options = FormatterOptions::default();
        options.preproc_define_indent = true;
        let mut b = beautifier(options);
        let first = b.beautify("#define F(x) \\");
        let second = b.beautify("do { x; } while (0)");
        assert_eq!(first, "#define F(x) \\");
        assert_eq!(second, "    do { x; } while (0)");
        assert!(b.active_beautifier_stack.is_empty());
    }

    #[test]
    fn indent_off_directive_passes_lines_through() {
        let mut b = beautifier(FormatterOptions::default());
        let out = run(
            &mut b,
            &[
                "// *INDENT-OFF*",
                "void f()",
                "{",
                "   weird();",
                "// *INDENT-ON*",
            ],
        );
        assert_eq!(out[3], "   weird();");
    }

    #[test]
    fn class_access_modifiers_unindent() {
        let mut options = FormatterOptions::default();
        options.class_indent = true;
        let mut b = beautifier(options);
        let out = run(
            &mut b,
            &["class A", "{", "public:", "int x;", "};"],
        );
        assert_eq!(out[2], "    public:");
        assert_eq!(out[3], "        int x;");
    }

    #[test]
    fn switch_case_indents_follow_options() {
        let mut b = beautifier(FormatterOptions::default());
        let out = run(
            &mut b,
            &["switch (x)", "{", "case 1:", "y();", "break;", "}"],
        );
        assert_eq!(out[2], "case 1:");
        assert_eq!(out[3], "    y();");
    }

    #[test]
    fn switch_indent_option_adds_level_inside_a_block() {
        let mut options = FormatterOptions::default();
        options.switch_indent = true;
        let mut b = beautifier(options);
        let out = run(
            &mut b,
            &["void f()", "{", "switch (x)", "{", "case 1:", "y();", "}", "}"],
        );
        assert_eq!(out[4], "        case 1:");
        assert_eq!(out[5], "            y();");
        assert_eq!(out[6], "    }");
    }

    #[test]
    fn continuation_indent_aligns_past_open_paren() {
        let mut b = beautifier(FormatterOptions::default());
        let out = run(&mut b, &["call(a,", "b);"]);
        assert_eq!(out[0], "call(a,");
        assert_eq!(out[1], "     b);");
    }

    #[test]
    fn unmatched_close_braces_do_not_underflow() {
        let mut b = beautifier(FormatterOptions::default());
        let out = run(&mut b, &["}", "}", "int x;"]);
        assert_eq!(out[2], "int x;");
        assert!(b.stacks_are_balanced());
    }
}
