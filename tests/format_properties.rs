// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Property tests for the universal formatting invariants.

use braceforge::config::{FormatterOptions, Style};
use braceforge::engine::FormatterEngine;
use proptest::prelude::*;

fn non_whitespace_chars(text: &str) -> Vec<char> {
    let mut chars: Vec<char> = text.chars().filter(|ch| *ch != ' ' && *ch != '\t' && *ch != '\n' && *ch != '\r').collect();
    chars.sort_unstable();
    chars
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_map(|s| s)
}

fn statement() -> impl Strategy<Value = String> {
    prop_oneof![
        identifier().prop_map(|a| format!("int {a};")),
        (identifier(), identifier()).prop_map(|(a, b)| format!("{a} = {b} + 1;")),
        (identifier(), identifier()).prop_map(|(a, b)| format!("if ({a}) {{ {b}(); }}")),
        (identifier(), identifier())
            .prop_map(|(a, b)| format!("while ({a} < 10) {{ {b} = {b} - 1; }}")),
        (identifier(), identifier()).prop_map(|(a, b)| format!("{a}({b}, 2);")),
        identifier().prop_map(|a| format!("// note {a}")),
        (identifier(), identifier())
            .prop_map(|(a, b)| format!("for ({a} = 0; {a} < 3; {a}++) {{ {b}(); }}")),
        (identifier(), identifier()).prop_map(|(a, b)| format!("char* {a} = \"{b} + x\";")),
    ]
}

fn function_body() -> impl Strategy<Value = String> {
    (identifier(), prop::collection::vec(statement(), 1..6)).prop_map(|(name, statements)| {
        let mut out = format!("void {name}()\n{{\n");
        for statement in statements {
            out.push_str(&statement);
            out.push('\n');
        }
        out.push_str("}\n");
        out
    })
}

fn style() -> impl Strategy<Value = Style> {
    prop_oneof![
        Just(Style::None),
        Just(Style::Allman),
        Just(Style::Java),
        Just(Style::KR),
        Just(Style::Stroustrup),
        Just(Style::Whitesmith),
        Just(Style::Gnu),
        Just(Style::Linux),
        Just(Style::OneTbs),
        Just(Style::Google),
    ]
}

fn options_for(style_choice: Style, pad: bool) -> FormatterOptions {
    let mut options = FormatterOptions::default().with_style(style_choice);
    options.pad_header = true;
    if pad {
        options.pad_operators = true;
        options.pad_commas = true;
    }
    options
}

proptest! {
    #[test]
    fn formatting_preserves_the_non_whitespace_character_multiset(
        body in function_body(),
        style_choice in style(),
        pad in any::<bool>(),
    ) {
        let engine = FormatterEngine::new(options_for(style_choice, pad));
        let output = engine.format_source(&body);
        prop_assert_eq!(
            non_whitespace_chars(&body),
            non_whitespace_chars(&output),
            "input:\n{}\noutput:\n{}",
            body,
            output
        );
    }

    #[test]
    fn formatting_is_idempotent(
        body in function_body(),
        style_choice in style(),
        pad in any::<bool>(),
    ) {
        let engine = FormatterEngine::new(options_for(style_choice, pad));
        let once = engine.format_source(&body);
        let twice = engine.format_source(&once);
        prop_assert_eq!(&once, &twice, "input:\n{}", body);
    }

    #[test]
    fn convert_tabs_only_touches_whitespace(
        body in function_body(),
    ) {
        let mut options = FormatterOptions::default();
        options.convert_tabs = true;
        let tabbed = body.replace("    ", "\t");
        let engine = FormatterEngine::new(options);
        let output = engine.format_source(&tabbed);
        prop_assert_eq!(
            non_whitespace_chars(&tabbed),
            non_whitespace_chars(&output)
        );
    }

    #[test]
    fn quoted_text_survives_formatting(
        text in "[a-z +*=,()]{0,12}",
        style_choice in style(),
    ) {
        let body = format!("void f()\n{{\nconst char* s = \"{text}\";\n}}\n");
        let engine = FormatterEngine::new(options_for(style_choice, true));
        let output = engine.format_source(&body);
        prop_assert!(
            output.contains(&format!("\"{text}\"")),
            "literal changed:\n{}",
            output
        );
    }
}

#[test]
fn stream_stays_consistent_over_a_mixed_corpus() {
    let corpus = "\
#include <stddef.h>

// entry point
int main(int argc, char** argv)
{
    int total = 0;
    for (int i = 0; i < argc; i++) {
        total += i;
    }
    if (total > 10) {
        return 1;
    } else {
        return 0;
    }
}
";
    for style_choice in [Style::None, Style::Allman, Style::KR, Style::Java] {
        let engine = FormatterEngine::new(options_for(style_choice, true));
        let output = engine.format_source(corpus);
        assert_eq!(
            non_whitespace_chars(corpus),
            non_whitespace_chars(&output),
            "style {:?}",
            style_choice
        );
    }
}
