use serde::ser::{Serialize, SerializeSeq, Serializer};

/// A single configuration value in the TIPTOP dialect.
///
/// Equality is structural; floats compare by value, not by the text they
/// were parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ConfigValue>),
}

impl ConfigValue {
    /// Parse a raw value string per the dialect grammar.
    ///
    /// Priority: quoted string, literal (number / bool / None / nested
    /// list), bare scientific notation, bracket list, and finally the raw
    /// text unchanged. Unrecognized syntax degrades to a string; this
    /// function never fails.
    pub fn parse(raw: &str) -> ConfigValue {
        let raw = raw.trim();
        if let Some(inner) = strip_matching_quotes(raw) {
            return ConfigValue::Str(inner.to_string());
        }
        if let Some(value) = parse_literal(raw) {
            return value;
        }
        ConfigValue::Str(raw.to_string())
    }

    /// Format the value in the dialect's serialized form.
    pub fn format(&self) -> String {
        match self {
            ConfigValue::Null => "None".to_string(),
            ConfigValue::Bool(true) => "True".to_string(),
            ConfigValue::Bool(false) => "False".to_string(),
            ConfigValue::Int(value) => value.to_string(),
            // The {:?} form always keeps a decimal point or exponent, so a
            // float re-parses as a float.
            ConfigValue::Float(value) => format!("{value:?}"),
            ConfigValue::Str(value) => format!("'{value}'"),
            ConfigValue::List(items) => {
                let formatted: Vec<String> = items.iter().map(ConfigValue::format).collect();
                format!("[{}]", formatted.join(", "))
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view: integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Int(value) => Some(*value as f64),
            ConfigValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short type label used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Float(_) => "float",
            ConfigValue::Str(_) => "string",
            ConfigValue::List(_) => "list",
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Str(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        ConfigValue::List(items)
    }
}

impl From<Vec<f64>> for ConfigValue {
    fn from(items: Vec<f64>) -> Self {
        ConfigValue::List(items.into_iter().map(ConfigValue::Float).collect())
    }
}

impl From<Vec<i64>> for ConfigValue {
    fn from(items: Vec<i64>) -> Self {
        ConfigValue::List(items.into_iter().map(ConfigValue::Int).collect())
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Null => serializer.serialize_unit(),
            ConfigValue::Bool(value) => serializer.serialize_bool(*value),
            ConfigValue::Int(value) => serializer.serialize_i64(*value),
            ConfigValue::Float(value) => serializer.serialize_f64(*value),
            ConfigValue::Str(value) => serializer.serialize_str(value),
            ConfigValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Outer matching quotes, stripped without any escape processing.
fn strip_matching_quotes(raw: &str) -> Option<&str> {
    if raw.len() < 2 {
        return None;
    }
    let bytes = raw.as_bytes();
    let first = bytes[0];
    if (first == b'\'' || first == b'"') && bytes[bytes.len() - 1] == first {
        return Some(&raw[1..raw.len() - 1]);
    }
    None
}

fn parse_literal(raw: &str) -> Option<ConfigValue> {
    match raw {
        "None" => return Some(ConfigValue::Null),
        "True" => return Some(ConfigValue::Bool(true)),
        "False" => return Some(ConfigValue::Bool(false)),
        _ => {}
    }

    if (raw.starts_with('[') && raw.ends_with(']'))
        || (raw.starts_with('(') && raw.ends_with(')'))
    {
        let inner = raw[1..raw.len() - 1].trim();
        if inner.is_empty() {
            return Some(ConfigValue::List(Vec::new()));
        }
        let items = split_top_level(inner)
            .into_iter()
            .map(ConfigValue::parse)
            .collect();
        return Some(ConfigValue::List(items));
    }

    if let Ok(value) = raw.parse::<i64>() {
        return Some(ConfigValue::Int(value));
    }
    // Gate the float path on a leading numeric character so words such as
    // "inf" or "nan" stay strings, as they do in the original dialect.
    if raw
        .bytes()
        .next()
        .is_some_and(|b| b.is_ascii_digit() || b == b'+' || b == b'-' || b == b'.')
    {
        if let Ok(value) = raw.parse::<f64>() {
            return Some(ConfigValue::Float(value));
        }
    }
    None
}

/// Split a list body on top-level commas, respecting nested brackets,
/// parentheses and quotes.
fn split_top_level(inner: &str) -> Vec<&str> {
    let mut elements = Vec::new();
    let mut depth = 0usize;
    let mut in_single = false;
    let mut in_double = false;
    let mut start = 0usize;

    for (i, ch) in inner.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '[' | '(' if !in_single && !in_double => depth += 1,
            ']' | ')' if !in_single && !in_double => depth = depth.saturating_sub(1),
            ',' if depth == 0 && !in_single && !in_double => {
                let element = inner[start..i].trim();
                if !element.is_empty() {
                    elements.push(element);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = inner[start..].trim();
    if !tail.is_empty() {
        elements.push(tail);
    }
    elements
}

#[cfg(test)]
mod tests {
    use super::ConfigValue;

    #[test]
    fn parse_scientific_notation_without_decimal_point() {
        assert_eq!(ConfigValue::parse("500e-9"), ConfigValue::Float(5e-7));
        assert_eq!(ConfigValue::parse("589E-9"), ConfigValue::Float(5.89e-7));
    }

    #[test]
    fn parse_none_and_bools() {
        assert_eq!(ConfigValue::parse("None"), ConfigValue::Null);
        assert_eq!(ConfigValue::parse("True"), ConfigValue::Bool(true));
        assert_eq!(ConfigValue::parse("False"), ConfigValue::Bool(false));
    }

    #[test]
    fn parse_list_of_null() {
        assert_eq!(
            ConfigValue::parse("[None]"),
            ConfigValue::List(vec![ConfigValue::Null])
        );
    }

    #[test]
    fn parse_list_with_scientific_notation() {
        let value = ConfigValue::parse("[2200e-9, 1.6e-6, 589e-9]");
        let items = value.as_list().expect("list");
        assert_eq!(items.len(), 3);
        let expected = [2.2e-6, 1.6e-6, 5.89e-7];
        for (item, want) in items.iter().zip(expected) {
            let got = item.as_f64().expect("float");
            assert!((got - want).abs() < 1e-15);
        }
    }

    #[test]
    fn parse_nested_lists() {
        assert_eq!(
            ConfigValue::parse("[[2500.0, 2500.0, 0.0]]"),
            ConfigValue::List(vec![ConfigValue::List(vec![
                ConfigValue::Float(2500.0),
                ConfigValue::Float(2500.0),
                ConfigValue::Float(0.0),
            ])])
        );
    }

    #[test]
    fn parse_tuple_becomes_list() {
        assert_eq!(
            ConfigValue::parse("(1, 2)"),
            ConfigValue::List(vec![ConfigValue::Int(1), ConfigValue::Int(2)])
        );
    }

    #[test]
    fn parse_quoted_strings() {
        assert_eq!(
            ConfigValue::parse("'Shack-Hartmann'"),
            ConfigValue::Str("Shack-Hartmann".to_string())
        );
        assert_eq!(
            ConfigValue::parse("\"wcog\""),
            ConfigValue::Str("wcog".to_string())
        );
        assert_eq!(ConfigValue::parse("''"), ConfigValue::Str(String::new()));
    }

    #[test]
    fn parse_quoted_list_inside_list() {
        assert_eq!(
            ConfigValue::parse("['a,b', 2]"),
            ConfigValue::List(vec![
                ConfigValue::Str("a,b".to_string()),
                ConfigValue::Int(2),
            ])
        );
    }

    #[test]
    fn parse_unrecognized_falls_back_to_string() {
        assert_eq!(
            ConfigValue::parse("optimize"),
            ConfigValue::Str("optimize".to_string())
        );
        assert_eq!(
            ConfigValue::parse("inf"),
            ConfigValue::Str("inf".to_string())
        );
    }

    #[test]
    fn parse_empty_list() {
        assert_eq!(ConfigValue::parse("[]"), ConfigValue::List(Vec::new()));
    }

    #[test]
    fn format_floats_reparse_as_floats() {
        let value = ConfigValue::Float(40.0);
        assert_eq!(value.format(), "40.0");
        assert_eq!(ConfigValue::parse(&value.format()), value);
    }

    #[test]
    fn format_round_trips_supported_domain() {
        let values = [
            ConfigValue::Null,
            ConfigValue::Bool(true),
            ConfigValue::Int(480),
            ConfigValue::Float(0.3),
            ConfigValue::Float(5e-7),
            ConfigValue::Str("gaussian".to_string()),
            ConfigValue::List(vec![
                ConfigValue::Float(2.2e-6),
                ConfigValue::List(vec![ConfigValue::Int(1), ConfigValue::Null]),
            ]),
        ];
        for value in values {
            assert_eq!(ConfigValue::parse(&value.format()), value);
        }
    }
}
