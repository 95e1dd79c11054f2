//! Client-side configuration checks.
//!
//! Catches the problems the service reports only as an opaque non-zero
//! exit code: missing core sections, missing required keys, and values of
//! the wrong shape. Unknown sections and keys are warnings, not errors:
//! the server regularly grows parameters this client has not heard of.

pub mod rules;

use serde::Serialize;

use crate::config::ConfigDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        write!(f, "{label}: {}", self.message)
    }
}

/// Check a document against the rule tables. An empty result means valid.
pub fn validate(document: &ConfigDocument) -> Vec<Issue> {
    let mut issues = Vec::new();

    for rule in rules::SECTION_RULES {
        if !document.contains_section(rule.name) {
            if rule.core {
                issues.push(Issue::error(format!(
                    "Missing required section [{}]",
                    rule.name
                )));
            }
            continue;
        }
        for key in rule.required_keys {
            if document.get(rule.name, key).is_none() {
                issues.push(Issue::error(format!(
                    "Missing required key '{key}' in [{}]",
                    rule.name
                )));
            }
        }
    }

    let mut unknown_sections: Vec<&str> = document
        .section_names()
        .filter(|name| rules::rule_for(name).is_none())
        .collect();
    unknown_sections.sort_unstable();
    for name in unknown_sections {
        issues.push(Issue::warning(format!(
            "Unknown section [{name}] (may be a newer TIPTOP parameter)"
        )));
    }

    for (name, section) in document.sections() {
        let Some(rule) = rules::rule_for(name) else {
            continue;
        };
        if rule.known_keys.is_empty() {
            continue;
        }
        let mut unknown_keys: Vec<&str> = section
            .keys()
            .map(String::as_str)
            .filter(|key| !rule.known_keys.contains(key))
            .collect();
        unknown_keys.sort_unstable();
        for key in unknown_keys {
            issues.push(Issue::warning(format!(
                "Unknown key '{key}' in [{name}] (may be a newer TIPTOP parameter)"
            )));
        }
    }

    for (section, key) in rules::NUMERIC_PARAMS {
        if let Some(value) = document.get(section, key) {
            if !value.is_null() && value.as_f64().is_none() {
                issues.push(Issue::error(format!(
                    "'{key}' in [{section}] should be numeric, got {}: {value}",
                    value.type_name()
                )));
            }
        }
    }

    for (section, key) in rules::LIST_PARAMS {
        if let Some(value) = document.get(section, key) {
            if !value.is_null() && value.as_list().is_none() {
                issues.push(Issue::warning(format!(
                    "'{key}' in [{section}] is typically a list, got {}: {value}",
                    value.type_name()
                )));
            }
        }
    }

    issues
}
