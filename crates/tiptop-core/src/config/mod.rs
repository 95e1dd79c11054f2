//! TIPTOP configuration dialect.
//!
//! The service accepts a non-standard `.ini` dialect: Python-style list
//! literals, scientific notation without a decimal point, `None` values,
//! both `;` and `#` comments, and `=` inside quoted strings. The parser is
//! deliberately tolerant (unrecognized value syntax degrades to a string,
//! broken section headers are skipped); the server, not this client, is
//! the authority on what a parameter means.
//!
//! Value grammar and comment handling live in `value` and `parser`;
//! serialization guarantees value-equality round-trips, not byte-identical
//! text.

pub mod error;
pub mod parser;
pub mod value;

use std::path::Path;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

pub use error::ConfigError;
pub use value::ConfigValue;

/// One section: insertion-ordered key/value pairs.
pub type Section = IndexMap<String, ConfigValue>;

/// An ordered section → key → value configuration document.
///
/// Section and key order is insertion order; duplicate keys are
/// last-write-wins. The document carries no implicit defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    sections: IndexMap<String, Section>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse dialect text into a document.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        parser::parse_document(text)
    }

    /// Read and parse a dialect file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Serialize the document back to dialect text.
    ///
    /// Sections and keys are emitted in insertion order, one key per line,
    /// with a blank line after each section.
    pub fn serialize(&self) -> String {
        let mut lines = Vec::new();
        for (name, section) in &self.sections {
            lines.push(format!("[{name}]"));
            for (key, value) in section {
                lines.push(format!("{key} = {}", value.format()));
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }

    /// Write the serialized document to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.serialize())?;
        Ok(())
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&ConfigValue> {
        self.sections.get(section).and_then(|s| s.get(key))
    }

    /// Set a value, creating the section if needed. Replacing an existing
    /// key keeps its position.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<ConfigValue>) {
        self.ensure_section(section)
            .insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, section: &str, key: &str) -> Option<ConfigValue> {
        self.sections
            .get_mut(section)
            .and_then(|s| s.shift_remove(key))
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Replace a whole section, creating it if needed.
    pub fn set_section(&mut self, name: &str, section: Section) {
        self.sections.insert(name.to_string(), section);
    }

    pub(crate) fn ensure_section(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, s)| (name.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Serialize for ConfigDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (name, section) in &self.sections {
            map.serialize_entry(name, section)?;
        }
        map.end()
    }
}
