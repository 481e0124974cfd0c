// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use std::rc::Rc;

use crate::beautifier::Beautifier;
use crate::config::{BraceMode, FormatterOptions, Style};
use crate::core::brace_type::BraceType;
use crate::core::resources::{FileType, Header, ResourceTables};
use crate::source::SourceIterator;

/// Character-stream formatter.
///
/// One instance formats one file; per-file state is never shared.
pub struct Formatter {
    pub(crate) options: Rc<FormatterOptions>,
    pub(crate) tables: Rc<ResourceTables>,
    pub(crate) beautifier: Beautifier,
    pub(crate) source: Box<dyn SourceIterator>,

    // current line and cursor
    pub(crate) current_line: Vec<char>,
    pub(crate) char_num: usize,
    pub(crate) current_char: char,
    pub(crate) previous_char: char,
    pub(crate) previous_non_ws_char: char,
    pub(crate) previous_command_char: char,
    pub(crate) quote_char: char,
    pub(crate) verbatim_delimiter: String,

    // output assembly
    pub(crate) formatted_line: Vec<char>,
    pub(crate) ready_formatted_line: String,
    pub(crate) previous_ready_formatted_line_length: usize,
    pub(crate) formatted_line_comment_num: Option<usize>,

    // formatter stacks
    pub(crate) paren_stack: Vec<i32>,
    pub(crate) brace_type_stack: Vec<BraceType>,
    pub(crate) pre_brace_header_stack: Vec<Option<Header>>,
    pub(crate) struct_stack: Vec<bool>,
    pub(crate) question_mark_stack: Vec<bool>,

    // counters
    pub(crate) line_number: usize,
    pub(crate) template_depth: i32,
    pub(crate) square_bracket_count: i32,
    pub(crate) space_pad_num: i32,
    pub(crate) next_line_space_pad_num: i32,
    pub(crate) tab_increment_in: i32,
    pub(crate) leading_spaces: usize,
    pub(crate) run_in_indent_chars: i32,
    pub(crate) preproc_block_end: usize,
    pub(crate) preproc_brace_type_stack_size: usize,
    pub(crate) processed_first_conditional: bool,
    pub(crate) objc_colon_align: i32,
    pub(crate) checksum_in: u64,
    pub(crate) checksum_out: u64,

    // return-type break/attach bookkeeping
    pub(crate) method_break_char_num: Option<usize>,
    pub(crate) method_break_line_num: usize,
    pub(crate) method_attach_char_num: Option<usize>,
    pub(crate) method_attach_line_num: usize,
    pub(crate) return_type_checked: bool,

    // split points for max-code-length
    pub(crate) max_semi: usize,
    pub(crate) max_and_or: usize,
    pub(crate) max_comma: usize,
    pub(crate) max_paren: usize,
    pub(crate) max_white_space: usize,
    pub(crate) max_semi_pending: usize,
    pub(crate) max_and_or_pending: usize,
    pub(crate) max_comma_pending: usize,
    pub(crate) max_paren_pending: usize,
    pub(crate) max_white_space_pending: usize,

    // line state
    pub(crate) is_virgin: bool,
    pub(crate) is_in_virgin_line: bool,
    pub(crate) is_line_ready: bool,
    pub(crate) is_in_line_break: bool,
    pub(crate) should_reparse_current_char: bool,
    pub(crate) should_break_line_at_next_char: bool,
    pub(crate) line_is_empty: bool,
    pub(crate) line_is_line_comment_only: bool,
    pub(crate) line_is_comment_only: bool,
    pub(crate) line_ends_in_comment_only: bool,
    pub(crate) does_line_start_comment: bool,
    pub(crate) current_line_begins_with_brace: bool,
    pub(crate) current_line_first_brace_num: Option<usize>,
    pub(crate) end_of_code_reached: bool,
    pub(crate) is_formatting_mode_off: bool,

    // comment/quote state
    pub(crate) is_in_comment: bool,
    pub(crate) is_in_comment_start_line: bool,
    pub(crate) is_in_line_comment: bool,
    pub(crate) no_trim_comment_continuation: bool,
    pub(crate) line_comment_no_indent: bool,
    pub(crate) is_in_quote: bool,
    pub(crate) is_in_verbatim_quote: bool,
    pub(crate) have_line_continuation_char: bool,
    pub(crate) is_in_quote_continuation: bool,
    pub(crate) is_special_char: bool,

    // preprocessor state
    pub(crate) is_in_preprocessor: bool,
    pub(crate) is_in_preprocessor_define_def: bool,
    pub(crate) is_immediately_post_preprocessor: bool,
    pub(crate) is_indentable_preprocessor: bool,
    pub(crate) is_indentable_preprocessor_block: bool,
    pub(crate) is_in_preprocessor_beautify: bool,

    // template state
    pub(crate) is_in_template: bool,

    // header state
    pub(crate) current_header: Option<Header>,
    pub(crate) is_in_header: bool,
    pub(crate) is_immediately_post_header: bool,
    pub(crate) is_non_paren_header: bool,
    pub(crate) is_header_in_multi_statement_line: bool,
    pub(crate) found_closing_header: bool,
    pub(crate) need_header_opening_brace: bool,

    // statement state
    pub(crate) passed_semicolon: bool,
    pub(crate) passed_colon: bool,
    pub(crate) is_in_case: bool,
    pub(crate) is_in_enum: bool,
    pub(crate) is_in_extern_c: bool,
    pub(crate) is_in_class_initializer: bool,
    pub(crate) is_in_potential_calculation: bool,
    pub(crate) found_question_mark: bool,
    pub(crate) found_pre_definition_header: bool,
    pub(crate) found_namespace_header: bool,
    pub(crate) found_class_header: bool,
    pub(crate) found_struct_header: bool,
    pub(crate) found_interface_header: bool,
    pub(crate) found_pre_command_header: bool,
    pub(crate) found_pre_command_macro: bool,
    pub(crate) found_cast_operator: bool,
    pub(crate) found_trailing_return_type: bool,
    pub(crate) is_java_static_constructor: bool,

    // asm / SQL passthrough
    pub(crate) is_in_asm: bool,
    pub(crate) is_in_asm_one_line: bool,
    pub(crate) is_in_asm_block: bool,
    pub(crate) end_of_asm_reached: bool,
    pub(crate) is_in_exec_sql: bool,

    // Objective-C state
    pub(crate) is_in_objc_method_definition: bool,
    pub(crate) is_in_objc_interface: bool,
    pub(crate) is_in_objc_selector: bool,
    pub(crate) is_in_objc_return_type: bool,
    pub(crate) is_in_objc_param: bool,
    pub(crate) is_immediately_post_objc_method_prefix: bool,

    // brace state
    pub(crate) previous_brace_type: BraceType,
    pub(crate) is_previous_brace_block_related: bool,
    pub(crate) is_in_brace_run_in: bool,
    pub(crate) append_opening_brace: bool,
    pub(crate) break_current_one_line_block: bool,
    pub(crate) should_keep_line_unbroken: bool,
    pub(crate) should_remove_next_closing_brace: bool,
    pub(crate) is_immediately_post_empty_block: bool,
    pub(crate) is_immediately_post_non_in_stmt: bool,
    pub(crate) is_char_immediately_post_non_in_stmt: bool,

    // empty-line requests for break-blocks
    pub(crate) prepend_empty_line: bool,
    pub(crate) is_prepend_post_block_empty_line_requested: bool,
    pub(crate) is_append_post_block_empty_line_requested: bool,
    pub(crate) is_immediately_post_empty_line: bool,
    pub(crate) is_immediately_post_comment_only: bool,

    // immediately-post flags, cleared at the top of each character step
    pub(crate) is_immediately_post_comment: bool,
    pub(crate) is_immediately_post_line_comment: bool,
    pub(crate) is_immediately_post_return: bool,
    pub(crate) is_immediately_post_throw: bool,
    pub(crate) is_immediately_post_new_delete: bool,
    pub(crate) is_immediately_post_operator: bool,
    pub(crate) is_immediately_post_template: bool,
    pub(crate) is_immediately_post_pointer_or_reference: bool,
    pub(crate) is_char_immediately_post_comment: bool,
    pub(crate) is_previous_char_post_comment: bool,
    pub(crate) is_char_immediately_post_line_comment: bool,
    pub(crate) is_char_immediately_post_open_block: bool,
    pub(crate) is_char_immediately_post_close_block: bool,
    pub(crate) is_char_immediately_post_template: bool,
    pub(crate) is_char_immediately_post_return: bool,
    pub(crate) is_char_immediately_post_throw: bool,
    pub(crate) is_char_immediately_post_new_delete: bool,
    pub(crate) is_char_immediately_post_operator: bool,
    pub(crate) is_char_immediately_post_pointer_or_reference: bool,

    // comment-follows bookkeeping for else/case indents
    pub(crate) else_header_follows_comments: bool,
    pub(crate) case_header_follows_comments: bool,

    pub(crate) last_line_enhancable: bool,
}

impl Formatter {
    pub fn new(options: FormatterOptions, source: Box<dyn SourceIterator>) -> Self {
        let options = Rc::new(options);
        let tables = ResourceTables::for_file_type(options.file_type);
        let beautifier = Beautifier::new(Rc::clone(&options), Rc::clone(&tables));

        Self {
            options,
            tables,
            beautifier,
            source,
            current_line: Vec::new(),
            char_num: 0,
            current_char: ' ',
            previous_char: ' ',
            previous_non_ws_char: ' ',
            previous_command_char: ' ',
            quote_char: '"',
            verbatim_delimiter: String::new(),
            formatted_line: Vec::new(),
            ready_formatted_line: String::new(),
            previous_ready_formatted_line_length: 0,
            formatted_line_comment_num: None,
            paren_stack: vec![0],
            brace_type_stack: vec![BraceType::NULL],
            pre_brace_header_stack: Vec::new(),
            struct_stack: Vec::new(),
            question_mark_stack: Vec::new(),
            line_number: 0,
            template_depth: 0,
            square_bracket_count: 0,
            space_pad_num: 0,
            next_line_space_pad_num: 0,
            tab_increment_in: 0,
            leading_spaces: 0,
            run_in_indent_chars: 0,
            preproc_block_end: 0,
            preproc_brace_type_stack_size: 0,
            processed_first_conditional: false,
            objc_colon_align: 0,
            checksum_in: 0,
            checksum_out: 0,
            method_break_char_num: None,
            method_break_line_num: 0,
            method_attach_char_num: None,
            method_attach_line_num: 0,
            return_type_checked: false,
            max_semi: 0,
            max_and_or: 0,
            max_comma: 0,
            max_paren: 0,
            max_white_space: 0,
            max_semi_pending: 0,
            max_and_or_pending: 0,
            max_comma_pending: 0,
            max_paren_pending: 0,
            max_white_space_pending: 0,
            is_virgin: true,
            is_in_virgin_line: false,
            is_line_ready: false,
            is_in_line_break: false,
            should_reparse_current_char: false,
            should_break_line_at_next_char: false,
            line_is_empty: false,
            line_is_line_comment_only: false,
            line_is_comment_only: false,
            line_ends_in_comment_only: false,
            does_line_start_comment: false,
            current_line_begins_with_brace: false,
            current_line_first_brace_num: None,
            end_of_code_reached: false,
            is_formatting_mode_off: false,
            is_in_comment: false,
            is_in_comment_start_line: false,
            is_in_line_comment: false,
            no_trim_comment_continuation: false,
            line_comment_no_indent: false,
            is_in_quote: false,
            is_in_verbatim_quote: false,
            have_line_continuation_char: false,
            is_in_quote_continuation: false,
            is_special_char: false,
            is_in_preprocessor: false,
            is_in_preprocessor_define_def: false,
            is_immediately_post_preprocessor: false,
            is_indentable_preprocessor: false,
            is_indentable_preprocessor_block: false,
            is_in_preprocessor_beautify: false,
            is_in_template: false,
            current_header: None,
            is_in_header: false,
            is_immediately_post_header: false,
            is_non_paren_header: false,
            is_header_in_multi_statement_line: false,
            found_closing_header: false,
            need_header_opening_brace: false,
            passed_semicolon: false,
            passed_colon: false,
            is_in_case: false,
            is_in_enum: false,
            is_in_extern_c: false,
            is_in_class_initializer: false,
            is_in_potential_calculation: false,
            found_question_mark: false,
            found_pre_definition_header: false,
            found_namespace_header: false,
            found_class_header: false,
            found_struct_header: false,
            found_interface_header: false,
            found_pre_command_header: false,
            found_pre_command_macro: false,
            found_cast_operator: false,
            found_trailing_return_type: false,
            is_java_static_constructor: false,
            is_in_asm: false,
            is_in_asm_one_line: false,
            is_in_asm_block: false,
            end_of_asm_reached: false,
            is_in_exec_sql: false,
            is_in_objc_method_definition: false,
            is_in_objc_interface: false,
            is_in_objc_selector: false,
            is_in_objc_return_type: false,
            is_in_objc_param: false,
            is_immediately_post_objc_method_prefix: false,
            previous_brace_type: BraceType::NULL,
            is_previous_brace_block_related: true,
            is_in_brace_run_in: false,
            append_opening_brace: false,
            break_current_one_line_block: false,
            should_keep_line_unbroken: false,
            should_remove_next_closing_brace: false,
            is_immediately_post_empty_block: false,
            is_immediately_post_non_in_stmt: false,
            is_char_immediately_post_non_in_stmt: false,
            prepend_empty_line: false,
            is_prepend_post_block_empty_line_requested: false,
            is_append_post_block_empty_line_requested: false,
            is_immediately_post_empty_line: false,
            is_immediately_post_comment_only: false,
            is_immediately_post_comment: false,
            is_immediately_post_line_comment: false,
            is_immediately_post_return: false,
            is_immediately_post_throw: false,
            is_immediately_post_new_delete: false,
            is_immediately_post_operator: false,
            is_immediately_post_template: false,
            is_immediately_post_pointer_or_reference: false,
            is_char_immediately_post_comment: false,
            is_previous_char_post_comment: false,
            is_char_immediately_post_line_comment: false,
            is_char_immediately_post_open_block: false,
            is_char_immediately_post_close_block: false,
            is_char_immediately_post_template: false,
            is_char_immediately_post_return: false,
            is_char_immediately_post_throw: false,
            is_char_immediately_post_new_delete: false,
            is_char_immediately_post_operator: false,
            is_char_immediately_post_pointer_or_reference: false,
            else_header_follows_comments: false,
            case_header_follows_comments: false,
            last_line_enhancable: true,
        }
    }

    pub fn has_more_lines(&self) -> bool {
        !self.end_of_code_reached || self.is_line_ready
    }

    /// Non-whitespace byte sum of the input, for integrity checks.
    pub fn checksum_in(&self) -> u64 {
        self.checksum_in
    }

    /// Non-whitespace byte sum of the output, for integrity checks.
    pub fn checksum_out(&self) -> u64 {
        self.checksum_out
    }

    /// True at end of stream when input and output checksums agree and all
    /// scope stacks have unwound.
    pub fn is_stream_consistent(&self) -> bool {
        self.checksum_in == self.checksum_out && self.beautifier.stacks_are_balanced()
    }

    /// True when the formatter is inside a namespace block; the enhancer
    /// needs this for its case alignment.
    pub fn is_in_namespace(&self) -> bool {
        self.brace_type_stack
            .last()
            .is_some_and(|brace| brace.intersects(BraceType::NAMESPACE))
    }

    pub fn is_in_preprocessor_line(&self) -> bool {
        self.is_in_preprocessor_beautify
    }

    /// False when the last returned line must bypass the enhancer.
    pub fn should_enhance_last_line(&self) -> bool {
        self.last_line_enhancable
    }

    pub fn is_in_sql_block(&self) -> bool {
        self.beautifier.is_in_beautify_sql
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

    pub(crate) fn brace_format_mode(&self) -> BraceMode {
        self.options.brace_mode
    }

    pub(crate) fn formatting_style(&self) -> Style {
        self.options.style
    }

    pub(crate) fn top_brace_type(&self) -> BraceType {
        *self.brace_type_stack.last().unwrap()
    }

    pub(crate) fn max_code_length(&self) -> Option<usize> {
        self.options.max_code_length
    }
}
