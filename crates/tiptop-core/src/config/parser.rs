use std::sync::OnceLock;

use regex::Regex;

use super::ConfigDocument;
use super::error::ConfigError;
use super::value::ConfigValue;

fn section_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[(.+)\]$").expect("section header regex"))
}

pub(crate) fn parse_document(text: &str) -> Result<ConfigDocument, ConfigError> {
    let mut document = ConfigDocument::new();
    let mut current_section: Option<String> = None;

    for (index, line) in text.lines().enumerate() {
        let stripped = strip_comment(line).trim();
        if stripped.is_empty() {
            continue;
        }

        if let Some(captures) = section_header_re().captures(stripped) {
            let name = captures[1].trim().to_string();
            if name.is_empty() {
                return Err(ConfigError::Syntax { line: index + 1 });
            }
            document.ensure_section(&name);
            current_section = Some(name);
            continue;
        }

        let Some(section) = current_section.as_deref() else {
            // Key before any section header: dropped, matching the dialect.
            continue;
        };
        if let Some((key, raw_value)) = stripped.split_once('=') {
            let key = key.trim();
            let raw_value = raw_value.trim();
            if key.is_empty() {
                continue;
            }
            let value = if raw_value.is_empty() {
                ConfigValue::Str(String::new())
            } else {
                ConfigValue::parse(raw_value)
            };
            document.set(section, key, value);
        }
    }

    Ok(document)
}

/// Remove a trailing `;` or `#` comment, honouring quotes and bracket depth.
/// Scanner state never carries across lines.
pub(crate) fn strip_comment(line: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;
    let mut bracket_depth = 0usize;

    for (i, ch) in line.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '[' => bracket_depth += 1,
            ']' => bracket_depth = bracket_depth.saturating_sub(1),
            ';' | '#' if !in_single && !in_double && bracket_depth == 0 => {
                return &line[..i];
            }
            _ => {}
        }
    }
    line
}
