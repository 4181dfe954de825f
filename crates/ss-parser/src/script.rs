use std::collections::BTreeSet;

use regex::Regex;
use ss_core::{
    Diagnostic, ObjectKind, PropType, PropertyDeclaration, ScriptAst, DEFAULT_SECTION,
};

use crate::blocks::{
    location_at, match_block_body, scan_keyword_blocks, scan_property_blocks, BlockLabel,
    PROPS_KEYWORD,
};

/// Total function: always returns an AST, never fails. Irregular input is
/// reported through the AST's diagnostics.
pub fn parse_script(text: &str) -> ScriptAst {
    if text.trim().is_empty() {
        return ScriptAst::empty();
    }

    let mut diagnostics = Vec::new();
    let (name, object_kind) = parse_header(text, &mut diagnostics);

    let mut properties = Vec::new();
    let mut seen_names = BTreeSet::new();
    for block in scan_property_blocks(text) {
        let section = resolve_section(text, block.label.as_ref(), &mut diagnostics);
        if !block.closed {
            let location = location_at(text, block.keyword_offset);
            diagnostics.push(Diagnostic::error(
                location.line,
                location.column,
                format!("Unterminated \"{}\" block; missing closing brace.", PROPS_KEYWORD),
            ));
        }
        parse_declarations(
            text,
            block.body_start,
            block.body_end,
            &section,
            &mut properties,
            &mut seen_names,
            &mut diagnostics,
        );
    }

    scan_keyword_typos(text, &mut diagnostics);

    ScriptAst {
        name,
        object_kind,
        properties,
        diagnostics,
        is_empty: false,
    }
}

fn parse_header(text: &str, diagnostics: &mut Vec<Diagnostic>) -> (String, ObjectKind) {
    let header_re = Regex::new(r"\A\s*([A-Za-z_][A-Za-z0-9_]*)\s+([^\s{]+)\s*\{")
        .expect("header regex must compile");

    let Some(caps) = header_re.captures(text) else {
        let location = location_at(text, text.len() - text.trim_start().len());
        diagnostics.push(Diagnostic::error(
            location.line,
            location.column,
            "Missing script header; expected \"<kind> <name> {\".",
        ));
        return (String::new(), ObjectKind::Script);
    };

    let kind_match = caps.get(1).expect("header capture 1");
    let name_match = caps.get(2).expect("header capture 2");

    let object_kind = match ObjectKind::parse(kind_match.as_str()) {
        Some(kind) => kind,
        None => {
            let location = location_at(text, kind_match.start());
            diagnostics.push(Diagnostic::error(
                location.line,
                location.column,
                format!(
                    "Unknown object kind \"{}\"; treating the script as \"{}\".",
                    kind_match.as_str(),
                    ObjectKind::Script.as_str()
                ),
            ));
            ObjectKind::Script
        }
    };

    let name = name_match.as_str().to_string();
    if !is_identifier(&name) {
        let location = location_at(text, name_match.start());
        diagnostics.push(Diagnostic::error(
            location.line,
            location.column,
            format!("Invalid script name \"{}\".", name),
        ));
    }

    (name, object_kind)
}

fn resolve_section(
    text: &str,
    label: Option<&BlockLabel>,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    let Some(label) = label else {
        return DEFAULT_SECTION.to_string();
    };
    if is_identifier(&label.raw) {
        return label.raw.clone();
    }
    let location = location_at(text, label.offset);
    diagnostics.push(Diagnostic::warning(
        location.line,
        location.column,
        format!(
            "Invalid section label \"{}\"; using \"{}\".",
            label.raw, DEFAULT_SECTION
        ),
    ));
    DEFAULT_SECTION.to_string()
}

fn parse_declarations(
    text: &str,
    body_start: usize,
    body_end: usize,
    section: &str,
    properties: &mut Vec<PropertyDeclaration>,
    seen_names: &mut BTreeSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let decl_re = Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)[ \t]*:[ \t]*([^\s{},]+)")
        .expect("declaration regex must compile");
    let bytes = text.as_bytes();
    let mut cursor = body_start;

    while cursor < body_end {
        let Some(caps) = decl_re.captures(&text[cursor..body_end]) else {
            break;
        };
        let whole = caps.get(0).expect("declaration match");
        let name_match = caps.get(1).expect("declaration capture 1");
        let type_match = caps.get(2).expect("declaration capture 2");

        let name_offset = cursor + name_match.start();
        let type_offset = cursor + type_match.start();
        let mut next = cursor + whole.end();

        // Optional `{ ... }` option block after the type token.
        let mut options_body = None;
        let mut probe = next;
        while probe < body_end && bytes[probe].is_ascii_whitespace() {
            probe += 1;
        }
        if probe < body_end && bytes[probe] == b'{' {
            let options_start = probe + 1;
            let (options_end, closed) = match_block_body(bytes, options_start);
            let options_end = options_end.min(body_end);
            options_body = Some(&text[options_start..options_end]);
            next = if closed { options_end + 1 } else { options_end };
        }

        let name = name_match.as_str().to_string();
        if !seen_names.insert(name.clone()) {
            let location = location_at(text, name_offset);
            diagnostics.push(Diagnostic::error(
                location.line,
                location.column,
                format!("Duplicate property \"{}\"; keeping the first declaration.", name),
            ));
            cursor = next;
            continue;
        }

        let prop_type = PropType::parse(type_match.as_str());
        if !prop_type.is_known() {
            let location = location_at(text, type_offset);
            diagnostics.push(Diagnostic::warning(
                location.line,
                location.column,
                format!(
                    "Unknown property type \"{}\" for \"{}\".",
                    type_match.as_str(),
                    name
                ),
            ));
        }

        let parsed = parse_option_fields(options_body.unwrap_or(""));
        let (min, max) = match (parsed.min, parsed.max) {
            (Some(min), Some(max)) if min > max => {
                let location = location_at(text, name_offset);
                diagnostics.push(Diagnostic::warning(
                    location.line,
                    location.column,
                    format!(
                        "min {} is greater than max {} for \"{}\"; values swapped.",
                        min, max, name
                    ),
                ));
                (Some(max), Some(min))
            }
            pair => pair,
        };

        properties.push(PropertyDeclaration {
            name,
            prop_type,
            section: section.to_string(),
            default_value: parsed.default_value,
            min,
            max,
            description: parsed.description,
            options: parsed.options,
        });
        cursor = next;
    }
}

#[derive(Debug, Default)]
struct ParsedOptionFields {
    default_value: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
    description: Option<String>,
    options: Vec<String>,
}

/// Each field is parsed independently; a malformed value drops that field
/// without failing the declaration. A repeated key keeps the last value.
fn parse_option_fields(body: &str) -> ParsedOptionFields {
    let default_re = Regex::new(r#"\bdefault[ \t]*:[ \t]*("[^"]*"|[^,\n}]+)"#)
        .expect("default regex must compile");
    let min_re = Regex::new(r"\bmin[ \t]*:[ \t]*([^,\n}]+)").expect("min regex must compile");
    let max_re = Regex::new(r"\bmax[ \t]*:[ \t]*([^,\n}]+)").expect("max regex must compile");
    let description_re = Regex::new(r#"\bdescription[ \t]*:[ \t]*"([^"]*)""#)
        .expect("description regex must compile");
    let options_re =
        Regex::new(r"\boptions[ \t]*:[ \t]*\[([^\]]*)\]").expect("options regex must compile");
    let item_re = Regex::new(r#""([^"]*)""#).expect("item regex must compile");

    let default_value = default_re
        .captures_iter(body)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|capture| strip_quotes(capture.as_str().trim()).to_string());

    let min = last_finite_number(&min_re, body);
    let max = last_finite_number(&max_re, body);

    let description = description_re
        .captures_iter(body)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|capture| capture.as_str().to_string());

    let options = options_re
        .captures_iter(body)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|list| {
            item_re
                .captures_iter(list.as_str())
                .filter_map(|caps| caps.get(1))
                .map(|item| item.as_str().to_string())
                .collect()
        })
        .unwrap_or_default();

    ParsedOptionFields {
        default_value,
        min,
        max,
        description,
        options,
    }
}

fn last_finite_number(regex: &Regex, body: &str) -> Option<f64> {
    regex
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .filter_map(|capture| capture.as_str().trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .last()
}

fn strip_quotes(token: &str) -> &str {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn scan_keyword_typos(text: &str, diagnostics: &mut Vec<Diagnostic>) {
    for typo in keyword_transpositions(PROPS_KEYWORD) {
        for block in scan_keyword_blocks(text, &typo) {
            let location = location_at(text, block.keyword_offset);
            diagnostics.push(
                Diagnostic::error(
                    location.line,
                    location.column,
                    format!(
                        "Unknown keyword \"{}\"; did you mean \"{}\"?",
                        typo, PROPS_KEYWORD
                    ),
                )
                .with_suggestion(PROPS_KEYWORD),
            );
        }
    }
}

fn keyword_transpositions(keyword: &str) -> Vec<String> {
    let bytes = keyword.as_bytes();
    let mut typos = Vec::new();
    for index in 0..bytes.len().saturating_sub(1) {
        let mut swapped = bytes.to_vec();
        swapped.swap(index, index + 1);
        let typo = String::from_utf8(swapped).expect("ascii keyword");
        if typo != keyword && !typos.contains(&typo) {
            typos.push(typo);
        }
    }
    typos
}
