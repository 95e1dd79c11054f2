use super::error::FitsError;
use super::layout;

/// Sequential block-aligned access over the container bytes.
pub struct BlockReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BlockReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn read_block(&mut self) -> Result<&'a [u8], FitsError> {
        let end = self.pos + layout::BLOCK_LEN;
        if end > self.bytes.len() {
            return Err(FitsError::TooShort {
                needed: end,
                actual: self.bytes.len(),
            });
        }
        let block = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(block)
    }

    /// Read a data segment of `data_len` bytes, consuming its block padding.
    pub fn read_data(&mut self, data_len: usize) -> Result<&'a [u8], FitsError> {
        let padded = data_len.div_ceil(layout::BLOCK_LEN) * layout::BLOCK_LEN;
        let end = self.pos + padded;
        if end > self.bytes.len() {
            return Err(FitsError::TooShort {
                needed: end,
                actual: self.bytes.len(),
            });
        }
        let data = &self.bytes[self.pos..self.pos + data_len];
        self.pos = end;
        Ok(data)
    }
}

/// Parsed value of a header card.
#[derive(Debug, Clone, PartialEq)]
pub enum CardValue {
    Logical(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl CardValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CardValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CardValue::Int(value) => Some(*value as f64),
            CardValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CardValue::Str(value) => Some(value),
            _ => None,
        }
    }
}

pub fn card_keyword(card: &[u8]) -> String {
    String::from_utf8_lossy(&card[..layout::KEYWORD_LEN])
        .trim()
        .to_string()
}

/// Parse one 80-byte card into keyword and value.
///
/// Commentary cards (COMMENT/HISTORY, or anything without the `= `
/// indicator) yield `None`.
pub fn parse_card(card: &[u8]) -> Option<(String, CardValue)> {
    let keyword = card_keyword(card);
    if keyword.is_empty() || keyword == "COMMENT" || keyword == "HISTORY" {
        return None;
    }
    if &card[layout::KEYWORD_LEN..layout::KEYWORD_LEN + 2] != layout::VALUE_INDICATOR {
        return None;
    }
    let text = String::from_utf8_lossy(&card[layout::KEYWORD_LEN + 2..]);
    parse_card_value(&text).map(|value| (keyword, value))
}

fn parse_card_value(text: &str) -> Option<CardValue> {
    let trimmed = text.trim_start();
    if let Some(rest) = trimmed.strip_prefix('\'') {
        return Some(CardValue::Str(parse_quoted(rest)));
    }
    // Strip an inline comment: everything after the first `/`.
    let token = trimmed.split('/').next().unwrap_or("").trim();
    if token.is_empty() {
        return None;
    }
    match token {
        "T" => return Some(CardValue::Logical(true)),
        "F" => return Some(CardValue::Logical(false)),
        _ => {}
    }
    if let Ok(value) = token.parse::<i64>() {
        return Some(CardValue::Int(value));
    }
    // FITS allows a Fortran-style D exponent.
    let normalized = token.replace(['D', 'd'], "E");
    if let Ok(value) = normalized.parse::<f64>() {
        return Some(CardValue::Float(value));
    }
    Some(CardValue::Str(token.to_string()))
}

/// String value body: doubled quotes are escapes, trailing blanks are not
/// significant.
fn parse_quoted(rest: &str) -> String {
    let mut out = String::new();
    let mut chars = rest.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                out.push('\'');
            } else {
                break;
            }
        } else {
            out.push(ch);
        }
    }
    out.trim_end().to_string()
}
