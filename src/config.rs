// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Resolved formatter options, style presets, and the configuration file
//! reader.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

use crate::core::resources::FileType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    None,
    Allman,
    Java,
    KR,
    Stroustrup,
    Whitesmith,
    Vtk,
    Ratliff,
    Gnu,
    Linux,
    Horstmann,
    OneTbs,
    Google,
    Mozilla,
    Webkit,
    Pico,
    Lisp,
}

impl Style {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "allman" | "bsd" | "break" => Some(Self::Allman),
            "java" | "attach" => Some(Self::Java),
            "kr" | "k&r" | "k/r" => Some(Self::KR),
            "stroustrup" => Some(Self::Stroustrup),
            "whitesmith" => Some(Self::Whitesmith),
            "vtk" => Some(Self::Vtk),
            "ratliff" | "banner" => Some(Self::Ratliff),
            "gnu" => Some(Self::Gnu),
            "linux" | "knf" => Some(Self::Linux),
            "horstmann" | "run-in" | "run_in" => Some(Self::Horstmann),
            "1tbs" | "otbs" => Some(Self::OneTbs),
            "google" => Some(Self::Google),
            "mozilla" => Some(Self::Mozilla),
            "webkit" => Some(Self::Webkit),
            "pico" => Some(Self::Pico),
            "lisp" | "python" => Some(Self::Lisp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BraceMode {
    #[default]
    None,
    Attach,
    Break,
    Linux,
    RunIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerAlign {
    #[default]
    None,
    Type,
    Middle,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceAlign {
    #[default]
    None,
    Type,
    Middle,
    Name,
    SameAsPtr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEndFormat {
    #[default]
    Default,
    Windows,
    Linux,
    MacOld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinConditional {
    Zero,
    One,
    OneHalf,
    #[default]
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodColonPad {
    #[default]
    NoChange,
    All,
    None,
    After,
    Before,
}

/// Indentation unit: spaces, tabs, or forced tabs with a separate tab size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentKind {
    Spaces(usize),
    Tabs(usize),
    ForceTabs { indent: usize, tab: usize },
}

impl Default for IndentKind {
    fn default() -> Self {
        Self::Spaces(4)
    }
}

impl IndentKind {
    pub fn indent_length(self) -> usize {
        match self {
            Self::Spaces(n) | Self::Tabs(n) => n,
            Self::ForceTabs { indent, .. } => indent,
        }
    }

    pub fn tab_length(self) -> usize {
        match self {
            Self::Spaces(n) | Self::Tabs(n) => n,
            Self::ForceTabs { tab, .. } => tab,
        }
    }

    pub fn uses_tabs(self) -> bool {
        !matches!(self, Self::Spaces(_))
    }

    pub fn force_tabs(self) -> bool {
        matches!(self, Self::ForceTabs { .. })
    }
}

/// The resolved, style-independent option record consumed by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterOptions {
    pub file_type: FileType,
    pub style: Style,
    pub indent: IndentKind,
    pub continuation_indent: usize,
    pub max_continuation_indent: usize,
    pub min_conditional_option: MinConditional,
    pub brace_mode: BraceMode,

    pub brace_indent: bool,
    pub brace_indent_vtk: bool,
    pub block_indent: bool,
    pub class_indent: bool,
    pub modifier_indent: bool,
    pub switch_indent: bool,
    pub case_indent: bool,
    pub namespace_indent: bool,
    pub indent_after_paren: bool,
    pub label_indent: bool,
    pub preproc_define_indent: bool,
    pub preproc_conditional_indent: bool,
    pub indent_preproc_block: bool,
    pub indent_col1_comments: bool,
    pub empty_line_fill: bool,
    pub align_method_colon: bool,

    pub pad_commas: bool,
    pub pad_operators: bool,
    pub pad_parens_outside: bool,
    pub pad_parens_inside: bool,
    pub pad_first_paren_out: bool,
    pub pad_header: bool,
    pub unpad_parens: bool,
    pub strip_comment_prefix: bool,

    pub attach_closing_brace: bool,
    pub attach_extern_c: bool,
    pub attach_namespace: bool,
    pub attach_class: bool,
    pub attach_inline: bool,
    pub attach_closing_while: bool,

    pub break_one_line_blocks: bool,
    pub break_one_line_headers: bool,
    pub break_one_line_statements: bool,
    pub break_blocks: bool,
    pub break_closing_header_blocks: bool,
    pub break_closing_header_braces: bool,
    pub break_else_ifs: bool,
    pub break_line_after_logical: bool,

    pub convert_tabs: bool,
    pub close_templates: bool,
    pub delete_empty_lines: bool,
    pub add_braces: bool,
    pub add_one_line_braces: bool,
    pub remove_braces: bool,

    pub break_return_type: bool,
    pub break_return_type_decl: bool,
    pub attach_return_type: bool,
    pub attach_return_type_decl: bool,

    pub pad_method_colon: MethodColonPad,
    pub pad_method_prefix: bool,
    pub unpad_method_prefix: bool,
    pub pad_return_type: bool,
    pub unpad_return_type: bool,
    pub pad_param_type: bool,
    pub unpad_param_type: bool,

    pub pointer_align: PointerAlign,
    pub reference_align: ReferenceAlign,
    pub line_end: LineEndFormat,
    pub max_code_length: Option<usize>,
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            file_type: FileType::C,
            style: Style::None,
            indent: IndentKind::default(),
            continuation_indent: 1,
            max_continuation_indent: 40,
            min_conditional_option: MinConditional::Two,
            brace_mode: BraceMode::None,
            brace_indent: false,
            brace_indent_vtk: false,
            block_indent: false,
            class_indent: false,
            modifier_indent: false,
            switch_indent: false,
            case_indent: false,
            namespace_indent: false,
            indent_after_paren: false,
            label_indent: false,
            preproc_define_indent: false,
            preproc_conditional_indent: false,
            indent_preproc_block: false,
            indent_col1_comments: false,
            empty_line_fill: false,
            align_method_colon: false,
            pad_commas: false,
            pad_operators: false,
            pad_parens_outside: false,
            pad_parens_inside: false,
            pad_first_paren_out: false,
            pad_header: false,
            unpad_parens: false,
            strip_comment_prefix: false,
            attach_closing_brace: false,
            attach_extern_c: false,
            attach_namespace: false,
            attach_class: false,
            attach_inline: false,
            attach_closing_while: false,
            break_one_line_blocks: false,
            break_one_line_headers: false,
            break_one_line_statements: false,
            break_blocks: false,
            break_closing_header_blocks: false,
            break_closing_header_braces: false,
            break_else_ifs: false,
            break_line_after_logical: false,
            convert_tabs: false,
            close_templates: false,
            delete_empty_lines: false,
            add_braces: false,
            add_one_line_braces: false,
            remove_braces: false,
            break_return_type: false,
            break_return_type_decl: false,
            attach_return_type: false,
            attach_return_type_decl: false,
            pad_method_colon: MethodColonPad::NoChange,
            pad_method_prefix: false,
            unpad_method_prefix: false,
            pad_return_type: false,
            unpad_return_type: false,
            pad_param_type: false,
            unpad_param_type: false,
            pointer_align: PointerAlign::None,
            reference_align: ReferenceAlign::SameAsPtr,
            line_end: LineEndFormat::Default,
            max_code_length: None,
        }
    }
}

impl FormatterOptions {
    pub fn indent_length(&self) -> usize {
        self.indent.indent_length()
    }

    pub fn tab_length(&self) -> usize {
        self.indent.tab_length()
    }

    /// Minimum split column when `max_code_length` is active.
    pub fn min_code_length(&self) -> usize {
        self.max_code_length
            .map(|max| (max / 3).max(10))
            .unwrap_or(10)
    }

    /// Concrete minimum conditional indent, resolved from the option.
    pub fn min_conditional_indent(&self) -> usize {
        let indent = self.indent_length();
        match self.min_conditional_option {
            MinConditional::Zero => 0,
            MinConditional::One => indent,
            MinConditional::OneHalf => indent / 2,
            MinConditional::Two => indent * 2,
        }
    }

    /// Apply a style preset, then return self for override layering.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        match style {
            Style::None => {}
            Style::Allman => self.brace_mode = BraceMode::Break,
            Style::Java => self.brace_mode = BraceMode::Attach,
            Style::KR => self.brace_mode = BraceMode::Linux,
            Style::Stroustrup => {
                self.brace_mode = BraceMode::Linux;
                self.attach_class = true;
            }
            Style::Whitesmith => {
                self.brace_mode = BraceMode::Break;
                self.brace_indent = true;
                self.switch_indent = true;
            }
            Style::Vtk => {
                self.brace_mode = BraceMode::Break;
                self.brace_indent_vtk = true;
            }
            Style::Ratliff => {
                self.brace_mode = BraceMode::Attach;
                self.brace_indent = true;
                self.switch_indent = true;
            }
            Style::Gnu => {
                self.brace_mode = BraceMode::Break;
                self.block_indent = true;
            }
            Style::Linux => {
                self.brace_mode = BraceMode::Linux;
                self.min_conditional_option = MinConditional::OneHalf;
            }
            Style::Horstmann => {
                self.brace_mode = BraceMode::RunIn;
                self.switch_indent = true;
            }
            Style::OneTbs => {
                self.brace_mode = BraceMode::Linux;
                self.add_braces = true;
            }
            Style::Google => {
                self.brace_mode = BraceMode::Attach;
                self.modifier_indent = true;
            }
            Style::Mozilla => self.brace_mode = BraceMode::Linux,
            Style::Webkit => {
                self.brace_mode = BraceMode::Linux;
                self.attach_inline = true;
            }
            Style::Pico => {
                self.brace_mode = BraceMode::RunIn;
                self.attach_closing_brace = true;
                self.switch_indent = true;
            }
            Style::Lisp => {
                self.brace_mode = BraceMode::Attach;
                self.attach_closing_brace = true;
            }
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl FormatterOptions {
    /// Load options from a `.braceforge.toml` file, layered over `self`.
    pub fn load_from_path(self, path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|err| {
            ConfigError::new(format!("failed to read '{}': {err}", path.display()))
        })?;
        self.parse_config(path, &text)
    }

    fn parse_config(mut self, path: &Path, source: &str) -> Result<Self, ConfigError> {
        let mut in_formatter_section = true;
        let mut seen_keys = HashSet::new();

        for (index, raw_line) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = strip_config_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                if !line.ends_with(']') {
                    return Err(config_error(path, line_no, "invalid section header"));
                }
                let name = line[1..line.len() - 1].trim();
                in_formatter_section = name.eq_ignore_ascii_case("formatter");
                continue;
            }
            if !in_formatter_section {
                continue;
            }

            let Some((raw_key, raw_value)) = line.split_once('=') else {
                return Err(config_error(path, line_no, "expected key = value"));
            };
            let key = raw_key.trim();
            let value = raw_value.trim();
            if key.is_empty() || value.is_empty() {
                return Err(config_error(path, line_no, "expected key = value"));
            }

            let canonical = key.to_ascii_lowercase().replace('-', "_");
            if !seen_keys.insert(canonical.clone()) {
                return Err(config_error(
                    path,
                    line_no,
                    format!("duplicate key '{key}'"),
                ));
            }
            self.apply_key(path, line_no, &canonical, key, value)?;
        }

        Ok(self)
    }

    fn apply_key(
        &mut self,
        path: &Path,
        line_no: usize,
        canonical: &str,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        match canonical {
            "style" => {
                let name = parse_string(path, line_no, key, value)?;
                let style = Style::parse(&name).ok_or_else(|| {
                    config_error(path, line_no, format!("unknown style '{name}'"))
                })?;
                *self = self.clone().with_style(style);
            }
            "mode" | "file_type" => {
                let name = parse_string(path, line_no, key, value)?;
                self.file_type = match name.to_ascii_lowercase().as_str() {
                    "c" | "cpp" | "c++" | "objc" => FileType::C,
                    "java" => FileType::Java,
                    "cs" | "csharp" | "c#" => FileType::Sharp,
                    _ => {
                        return Err(config_error(
                            path,
                            line_no,
                            format!("unknown file type '{name}'"),
                        ))
                    }
                };
            }
            "indent" => {
                let name = parse_string(path, line_no, key, value)?;
                self.indent = parse_indent_kind(&name)
                    .ok_or_else(|| config_error(path, line_no, format!("invalid indent '{name}'")))?;
            }
            "continuation_indent" => {
                self.continuation_indent = parse_usize(path, line_no, key, value)?
            }
            "max_continuation_indent" => {
                self.max_continuation_indent = parse_usize(path, line_no, key, value)?
            }
            "min_conditional_indent" => {
                let name = parse_string(path, line_no, key, value)?;
                self.min_conditional_option = match name.as_str() {
                    "0" | "zero" => MinConditional::Zero,
                    "1" | "one" => MinConditional::One,
                    "half" | "one_half" | "one-half" => MinConditional::OneHalf,
                    "2" | "two" => MinConditional::Two,
                    _ => {
                        return Err(config_error(
                            path,
                            line_no,
                            format!("invalid min conditional indent '{name}'"),
                        ))
                    }
                };
            }
            "braces" | "brace_mode" => {
                let name = parse_string(path, line_no, key, value)?;
                self.brace_mode = match name.to_ascii_lowercase().as_str() {
                    "none" => BraceMode::None,
                    "attach" => BraceMode::Attach,
                    "break" => BraceMode::Break,
                    "linux" => BraceMode::Linux,
                    "run_in" | "run-in" | "runin" => BraceMode::RunIn,
                    _ => {
                        return Err(config_error(
                            path,
                            line_no,
                            format!("invalid brace mode '{name}'"),
                        ))
                    }
                };
            }
            "align_pointer" | "pointer_align" => {
                let name = parse_string(path, line_no, key, value)?;
                self.pointer_align = match name.to_ascii_lowercase().as_str() {
                    "none" => PointerAlign::None,
                    "type" => PointerAlign::Type,
                    "middle" => PointerAlign::Middle,
                    "name" => PointerAlign::Name,
                    _ => {
                        return Err(config_error(
                            path,
                            line_no,
                            format!("invalid pointer alignment '{name}'"),
                        ))
                    }
                };
            }
            "align_reference" | "reference_align" => {
                let name = parse_string(path, line_no, key, value)?;
                self.reference_align = match name.to_ascii_lowercase().as_str() {
                    "none" => ReferenceAlign::None,
                    "type" => ReferenceAlign::Type,
                    "middle" => ReferenceAlign::Middle,
                    "name" => ReferenceAlign::Name,
                    "same_as_ptr" | "same-as-ptr" | "pointer" => ReferenceAlign::SameAsPtr,
                    _ => {
                        return Err(config_error(
                            path,
                            line_no,
                            format!("invalid reference alignment '{name}'"),
                        ))
                    }
                };
            }
            "pad_method_colon" => {
                let name = parse_string(path, line_no, key, value)?;
                self.pad_method_colon = match name.to_ascii_lowercase().as_str() {
                    "no_change" | "keep" => MethodColonPad::NoChange,
                    "all" => MethodColonPad::All,
                    "none" => MethodColonPad::None,
                    "after" => MethodColonPad::After,
                    "before" => MethodColonPad::Before,
                    _ => {
                        return Err(config_error(
                            path,
                            line_no,
                            format!("invalid method colon padding '{name}'"),
                        ))
                    }
                };
            }
            "line_end" => {
                let name = parse_string(path, line_no, key, value)?;
                self.line_end = match name.to_ascii_lowercase().as_str() {
                    "default" => LineEndFormat::Default,
                    "windows" | "crlf" => LineEndFormat::Windows,
                    "linux" | "lf" => LineEndFormat::Linux,
                    "mac_old" | "macold" | "cr" => LineEndFormat::MacOld,
                    _ => {
                        return Err(config_error(
                            path,
                            line_no,
                            format!("invalid line end '{name}'"),
                        ))
                    }
                };
            }
            "max_code_length" => {
                self.max_code_length = Some(parse_usize(path, line_no, key, value)?)
            }
            _ => {
                let Some(field) = self.bool_field_mut(canonical) else {
                    return Err(config_error(path, line_no, format!("unknown key '{key}'")));
                };
                *field = parse_bool(path, line_no, key, value)?;
            }
        }
        Ok(())
    }

    fn bool_field_mut(&mut self, key: &str) -> Option<&mut bool> {
        let field = match key {
            "brace_indent" => &mut self.brace_indent,
            "brace_indent_vtk" => &mut self.brace_indent_vtk,
            "block_indent" => &mut self.block_indent,
            "class_indent" | "indent_classes" => &mut self.class_indent,
            "modifier_indent" | "indent_modifiers" => &mut self.modifier_indent,
            "switch_indent" | "indent_switches" => &mut self.switch_indent,
            "case_indent" | "indent_cases" => &mut self.case_indent,
            "namespace_indent" | "indent_namespaces" => &mut self.namespace_indent,
            "indent_after_paren" => &mut self.indent_after_paren,
            "label_indent" | "indent_labels" => &mut self.label_indent,
            "preproc_define_indent" | "indent_preproc_define" => &mut self.preproc_define_indent,
            "preproc_conditional_indent" | "indent_preproc_cond" => {
                &mut self.preproc_conditional_indent
            }
            "indent_preproc_block" => &mut self.indent_preproc_block,
            "indent_col1_comments" => &mut self.indent_col1_comments,
            "empty_line_fill" | "fill_empty_lines" => &mut self.empty_line_fill,
            "align_method_colon" => &mut self.align_method_colon,
            "pad_commas" | "pad_comma" => &mut self.pad_commas,
            "pad_operators" | "pad_oper" => &mut self.pad_operators,
            "pad_parens_outside" | "pad_paren_out" => &mut self.pad_parens_outside,
            "pad_parens_inside" | "pad_paren_in" => &mut self.pad_parens_inside,
            "pad_first_paren_out" => &mut self.pad_first_paren_out,
            "pad_header" => &mut self.pad_header,
            "unpad_parens" | "unpad_paren" => &mut self.unpad_parens,
            "strip_comment_prefix" => &mut self.strip_comment_prefix,
            "attach_closing_brace" => &mut self.attach_closing_brace,
            "attach_extern_c" => &mut self.attach_extern_c,
            "attach_namespace" | "attach_namespaces" => &mut self.attach_namespace,
            "attach_class" | "attach_classes" => &mut self.attach_class,
            "attach_inline" | "attach_inlines" => &mut self.attach_inline,
            "attach_closing_while" => &mut self.attach_closing_while,
            "break_one_line_blocks" => &mut self.break_one_line_blocks,
            "break_one_line_headers" => &mut self.break_one_line_headers,
            "break_one_line_statements" => &mut self.break_one_line_statements,
            "break_blocks" => &mut self.break_blocks,
            "break_closing_header_blocks" => &mut self.break_closing_header_blocks,
            "break_closing_header_braces" | "break_closing_braces" => {
                &mut self.break_closing_header_braces
            }
            "break_else_ifs" | "break_elseifs" => &mut self.break_else_ifs,
            "break_line_after_logical" | "break_after_logical" => {
                &mut self.break_line_after_logical
            }
            "convert_tabs" => &mut self.convert_tabs,
            "close_templates" => &mut self.close_templates,
            "delete_empty_lines" => &mut self.delete_empty_lines,
            "add_braces" => &mut self.add_braces,
            "add_one_line_braces" => &mut self.add_one_line_braces,
            "remove_braces" => &mut self.remove_braces,
            "break_return_type" => &mut self.break_return_type,
            "break_return_type_decl" => &mut self.break_return_type_decl,
            "attach_return_type" => &mut self.attach_return_type,
            "attach_return_type_decl" => &mut self.attach_return_type_decl,
            "pad_method_prefix" => &mut self.pad_method_prefix,
            "unpad_method_prefix" => &mut self.unpad_method_prefix,
            "pad_return_type" => &mut self.pad_return_type,
            "unpad_return_type" => &mut self.unpad_return_type,
            "pad_param_type" => &mut self.pad_param_type,
            "unpad_param_type" => &mut self.unpad_param_type,
            _ => return None,
        };
        Some(field)
    }
}

pub fn parse_indent_kind(value: &str) -> Option<IndentKind> {
    let (kind, count) = match value.split_once('=') {
        Some((kind, count)) => (kind.trim(), count.trim()),
        None => (value.trim(), ""),
    };
    let parse_count = |text: &str, default: usize| -> Option<usize> {
        if text.is_empty() {
            return Some(default);
        }
        let n = text.parse::<usize>().ok()?;
        if (2..=20).contains(&n) {
            Some(n)
        } else {
            None
        }
    };
    match kind.to_ascii_lowercase().as_str() {
        "spaces" | "space" => Some(IndentKind::Spaces(parse_count(count, 4)?)),
        "tab" | "tabs" => Some(IndentKind::Tabs(parse_count(count, 4)?)),
        "force_tab" | "force-tab" => {
            let n = parse_count(count, 4)?;
            Some(IndentKind::ForceTabs { indent: n, tab: n })
        }
        "force_tab_x" | "force-tab-x" => {
            let tab = parse_count(count, 8)?;
            Some(IndentKind::ForceTabs { indent: 4, tab })
        }
        _ => None,
    }
}

fn config_error(path: &Path, line_no: usize, message: impl Into<String>) -> ConfigError {
    ConfigError::new(format!("{}:{}: {}", path.display(), line_no, message.into()))
}

fn parse_bool(path: &Path, line_no: usize, key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(config_error(
            path,
            line_no,
            format!("invalid boolean for '{key}': {value}"),
        )),
    }
}

fn parse_usize(path: &Path, line_no: usize, key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| {
        config_error(
            path,
            line_no,
            format!("invalid integer for '{key}': {value}"),
        )
    })
}

fn parse_string(
    path: &Path,
    line_no: usize,
    key: &str,
    value: &str,
) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        return Ok(value[1..value.len() - 1].to_string());
    }
    if value.contains(' ') || value.contains('\t') {
        return Err(config_error(
            path,
            line_no,
            format!("invalid string for '{key}': {value}"),
        ));
    }
    Ok(value.to_string())
}

fn strip_config_comment(line: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single && !escaped => in_double = !in_double,
            '#' if !in_single && !in_double => return &line[..idx],
            _ => {}
        }

        escaped = in_double && ch == '\\' && !escaped;
        if ch != '\\' {
            escaped = false;
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn default_options_are_style_neutral() {
        let opts = FormatterOptions::default();
        assert_eq!(opts.brace_mode, BraceMode::None);
        assert_eq!(opts.indent_length(), 4);
        assert_eq!(opts.continuation_indent, 1);
        assert_eq!(opts.max_continuation_indent, 40);
        assert_eq!(opts.min_conditional_indent(), 8);
        assert!(!opts.pad_operators);
    }

    #[test]
    fn style_presets_resolve_to_brace_mode_and_toggles() {
        let allman = FormatterOptions::default().with_style(Style::Allman);
        assert_eq!(allman.brace_mode, BraceMode::Break);

        let whitesmith = FormatterOptions::default().with_style(Style::Whitesmith);
        assert_eq!(whitesmith.brace_mode, BraceMode::Break);
        assert!(whitesmith.brace_indent);

        let gnu = FormatterOptions::default().with_style(Style::Gnu);
        assert!(gnu.block_indent);

        let pico = FormatterOptions::default().with_style(Style::Pico);
        assert_eq!(pico.brace_mode, BraceMode::RunIn);
        assert!(pico.attach_closing_brace);

        let otbs = FormatterOptions::default().with_style(Style::OneTbs);
        assert!(otbs.add_braces);
    }

    #[test]
    fn indent_kind_parses_all_forms() {
        assert_eq!(parse_indent_kind("spaces=2"), Some(IndentKind::Spaces(2)));
        assert_eq!(parse_indent_kind("tab"), Some(IndentKind::Tabs(4)));
        assert_eq!(
            parse_indent_kind("force_tab=8"),
            Some(IndentKind::ForceTabs { indent: 8, tab: 8 })
        );
        assert_eq!(parse_indent_kind("spaces=1"), None);
        assert_eq!(parse_indent_kind("elastic"), None);
    }

    #[test]
    fn config_file_layers_over_defaults() {
        let path = create_temp_config(
            "layering",
            "style = \"kr\"
pad_operators = true
pad_commas = true
indent = \"spaces=2\"
max_code_length = 100
",
        );
        let opts = FormatterOptions::default()
            .load_from_path(&path)
            .expect("load config");
        assert_eq!(opts.brace_mode, BraceMode::Linux);
        assert!(opts.pad_operators);
        assert_eq!(opts.indent_length(), 2);
        assert_eq!(opts.max_code_length, Some(100));
    }

    #[test]
    fn config_file_rejects_unknown_key_with_location() {
        let path = create_temp_config("unknown", "mystery = true\n");
        let err = FormatterOptions::default()
            .load_from_path(&path)
            .expect_err("unknown key must fail");
        let text = err.to_string();
        assert!(text.contains("unknown key 'mystery'"), "got: {text}");
        assert!(text.contains(":1:"), "got: {text}");
    }

    #[test]
    fn config_file_rejects_duplicate_keys() {
        let path = create_temp_config("dup", "pad_commas = true\npad_commas = false\n");
        let err = FormatterOptions::default()
            .load_from_path(&path)
            .expect_err("duplicate must fail");
        assert!(err.to_string().contains("duplicate key 'pad_commas'"));
    }

    #[test]
    fn comment_stripping_honors_quotes() {
        assert_eq!(strip_config_comment("key = \"a#b\" # trail"), "key = \"a#b\" ");
        assert_eq!(strip_config_comment("# whole line"), "");
    }

    fn create_temp_config(label: &str, content: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = env::temp_dir().join(format!(
            "braceforge-config-{label}-{}-{nanos}",
            process::id()
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join(".braceforge.toml");
        fs::write(&path, content).expect("write config");
        path
    }
}
