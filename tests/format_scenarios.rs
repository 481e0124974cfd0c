// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! End-to-end formatting scenarios with literal input/output pairs.

use braceforge::config::{FormatterOptions, PointerAlign, Style};
use braceforge::engine::FormatterEngine;

fn format_with(options: FormatterOptions, source: &str) -> String {
    FormatterEngine::new(options).format_source(source)
}

fn base_options(style: Style) -> FormatterOptions {
    let mut options = FormatterOptions::default().with_style(style);
    options.pad_header = true;
    options
}

#[test]
fn allman_breaks_a_one_line_block() {
    let mut options = base_options(Style::Allman);
    options.break_one_line_blocks = true;
    options.break_one_line_statements = true;
    let output = format_with(options, "if(x){y();}\n");
    assert_eq!(output, "if (x)\n{\n    y();\n}\n");
}

#[test]
fn kr_attaches_braces_and_keeps_else_if_joined() {
    let mut options = base_options(Style::KR);
    options.break_one_line_blocks = true;
    options.break_one_line_statements = true;
    let output = format_with(
        options,
        "void f()\n{\nif(x){a();}else if(y){b();}\n}\n",
    );
    assert_eq!(
        output,
        "void f()\n{\n    if (x) {\n        a();\n    } else if (y) {\n        b();\n    }\n}\n"
    );
}

#[test]
fn kr_breaks_function_definition_braces() {
    let options = base_options(Style::KR);
    let output = format_with(options, "void f() {\nreturn;\n}\n");
    assert_eq!(output, "void f()\n{\n    return;\n}\n");
}

#[test]
fn pointer_alignment_to_type() {
    let mut options = FormatterOptions::default();
    options.pointer_align = PointerAlign::Type;
    let output = format_with(options.clone(), "int *p;\n");
    assert_eq!(output, "int* p;\n");
    let output = format_with(options, "int **q;\n");
    assert_eq!(output, "int** q;\n");
}

#[test]
fn pointer_alignment_to_name() {
    let mut options = FormatterOptions::default();
    options.pointer_align = PointerAlign::Name;
    let output = format_with(options, "int* p;\n");
    assert_eq!(output, "int *p;\n");
}

#[test]
fn pointer_alignment_to_middle() {
    let mut options = FormatterOptions::default();
    options.pointer_align = PointerAlign::Middle;
    let output = format_with(options, "int *p;\n");
    assert_eq!(output, "int * p;\n");
}

#[test]
fn pointer_alignment_none_keeps_source_spacing() {
    let output = format_with(FormatterOptions::default(), "int *p, **q;\n");
    assert_eq!(output, "int *p, **q;\n");
}

#[test]
fn nested_preprocessor_blocks_indent_when_requested() {
    let mut options = FormatterOptions::default();
    options.indent_preproc_block = true;
    let output = format_with(options, "#if A\n#if B\nint x;\n#endif\n#endif\n");
    assert_eq!(
        output,
        "#if A\n    #if B\n        int x;\n    #endif\n#endif\n"
    );
}

#[test]
fn multiline_define_body_is_indented_by_cloned_context() {
    let mut options = FormatterOptions::default();
    options.preproc_define_indent = true;
    let output = format_with(options, "#define F(x) \\\ndo { x; } while (0)\n");
    assert_eq!(output, "#define F(x) \\\n    do { x; } while (0)\n");
}

#[test]
fn continuation_indent_aligns_past_the_paren() {
    let output = format_with(FormatterOptions::default(), "call(arg1,\narg2);\n");
    assert_eq!(output, "call(arg1,\n     arg2);\n");
}

#[test]
fn continuation_indent_is_capped() {
    let mut options = FormatterOptions::default();
    options.max_continuation_indent = 20;
    let output = format_with(
        options,
        "aVeryLongFunctionNameIndeed(arg1,\narg2);\n",
    );
    // past the cap the continuation line indents by two indent units
    assert_eq!(
        output,
        "aVeryLongFunctionNameIndeed(arg1,\n        arg2);\n"
    );
}

#[test]
fn operator_padding_spaces_assignments_and_comparisons() {
    let mut options = FormatterOptions::default();
    options.pad_operators = true;
    let output = format_with(options, "int x=a+b;\nif (x==y) {\nz=1;\n}\n");
    assert_eq!(output, "int x = a + b;\nif (x == y) {\n    z = 1;\n}\n");
}

#[test]
fn operator_padding_keeps_unary_and_arrow_tight() {
    let mut options = FormatterOptions::default();
    options.pad_operators = true;
    let output = format_with(options, "x = -1;\np->q = x++;\n");
    assert_eq!(output, "x = -1;\np->q = x++;\n");
}

#[test]
fn comma_padding_inserts_one_space() {
    let mut options = FormatterOptions::default();
    options.pad_commas = true;
    let output = format_with(options, "f(a,b,c);\n");
    assert_eq!(output, "f(a, b, c);\n");
}

#[test]
fn paren_padding_inside_and_unpadding() {
    let mut inside = FormatterOptions::default();
    inside.pad_parens_inside = true;
    assert_eq!(format_with(inside, "f(a);\n"), "f( a );\n");

    let mut unpad = FormatterOptions::default();
    unpad.unpad_parens = true;
    assert_eq!(format_with(unpad, "f( a );\n"), "f(a);\n");
}

#[test]
fn whitesmith_indents_braces() {
    let mut options = base_options(Style::Whitesmith);
    options.break_one_line_blocks = true;
    options.break_one_line_statements = true;
    let output = format_with(options, "void f()\n{\nif (x)\n{\ny();\n}\n}\n");
    assert_eq!(
        output,
        "void f()\n    {\n    if (x)\n        {\n        y();\n        }\n    }\n"
    );
}

#[test]
fn namespace_body_indents_only_when_requested() {
    let options = FormatterOptions::default();
    let output = format_with(options, "namespace ns\n{\nint x;\n}\n");
    assert_eq!(output, "namespace ns\n{\nint x;\n}\n");

    let mut indented = FormatterOptions::default();
    indented.namespace_indent = true;
    let output = format_with(indented, "namespace ns\n{\nint x;\n}\n");
    assert_eq!(output, "namespace ns\n{\n    int x;\n}\n");
}

#[test]
fn switch_indent_adds_a_level_inside_a_function() {
    let mut options = FormatterOptions::default();
    options.switch_indent = true;
    let output = format_with(
        options,
        "void f()\n{\nswitch (x)\n{\ncase 1:\ny();\nbreak;\n}\n}\n",
    );
    assert_eq!(
        output,
        "void f()\n{\n    switch (x)\n    {\n        case 1:\n            y();\n            break;\n    }\n}\n"
    );
}

#[test]
fn switch_case_default_layout() {
    let output = format_with(
        FormatterOptions::default(),
        "void f()\n{\nswitch (x)\n{\ncase 1:\ny();\nbreak;\ndefault:\nz();\n}\n}\n",
    );
    assert_eq!(
        output,
        "void f()\n{\n    switch (x)\n    {\n    case 1:\n        y();\n        break;\n    default:\n        z();\n    }\n}\n"
    );
}

#[test]
fn indent_off_directive_passes_region_through() {
    let output = format_with(
        FormatterOptions::default(),
        "// *INDENT-OFF*\nvoid f()\n{\n   weird();\n}\n// *INDENT-ON*\nvoid g()\n{\nok();\n}\n",
    );
    assert!(output.contains("   weird();"));
    assert!(output.contains("    ok();"));
}

#[test]
fn nopad_comment_disables_padding_for_the_line() {
    let mut options = FormatterOptions::default();
    options.pad_operators = true;
    let output = format_with(
        options,
        "a=b; // *NOPAD*\nc=d;\n",
    );
    assert!(output.contains("a=b;"), "padded despite NOPAD: {output}");
    assert!(output.contains("c = d;"), "missing padding: {output}");
}

#[test]
fn java_style_formats_java_headers() {
    let mut options = FormatterOptions::default().with_style(Style::Java);
    options.file_type = braceforge::core::resources::FileType::Java;
    options.pad_header = true;
    let output = format_with(
        options,
        "class A {\nvoid run() {\nif(x) {\ny();\n}\n}\n}\n",
    );
    assert_eq!(
        output,
        "class A {\n    void run() {\n        if (x) {\n            y();\n        }\n    }\n}\n"
    );
}

#[test]
fn line_comments_keep_their_text() {
    let output = format_with(
        FormatterOptions::default(),
        "void f()\n{\n// a comment\nint x; // trailing\n}\n",
    );
    assert!(output.contains("// a comment"));
    assert!(output.contains("// trailing"));
}

#[test]
fn block_comment_bytes_survive() {
    let source = "void f()\n{\n/* keep  this   exact */\nint x;\n}\n";
    let output = format_with(FormatterOptions::default(), source);
    assert!(output.contains("/* keep  this   exact */"));
}

#[test]
fn string_and_char_literals_are_untouched() {
    let mut options = FormatterOptions::default();
    options.pad_operators = true;
    let output = format_with(
        options,
        "const char* s = \"a+b , c\";\nchar c = 'x';\n",
    );
    assert!(output.contains("\"a+b , c\""));
    assert!(output.contains("'x'"));
}
