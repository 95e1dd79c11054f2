use std::borrow::Cow;

use serde::Serialize;
use thiserror::Error;

use super::layout;

#[derive(Debug, Error)]
pub enum MultipartError {
    #[error("response Content-Type carries no boundary parameter: {content_type}")]
    MissingBoundary { content_type: String },
    #[error("multipart body contains no parts")]
    Empty,
    #[error("multipart body truncated in part {index}")]
    Truncated { index: usize },
}

/// One part of the outbound form-data request.
pub struct FormPart<'a> {
    pub name: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub body: &'a [u8],
}

/// One decoded part of the multipart response.
#[derive(Debug, Clone)]
pub struct ResponsePart {
    pub content_type: String,
    pub disposition: String,
    pub body: Vec<u8>,
}

impl ResponsePart {
    /// Media-type token without parameters, lower-cased.
    pub fn media_type(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase()
    }

    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn summary(&self) -> PartSummary {
        PartSummary {
            content_type: self.content_type.clone(),
            disposition: self.disposition.clone(),
            preview: truncate(&self.text_lossy(), layout::PART_PREVIEW_LEN),
        }
    }
}

/// Diagnostic digest of a received part, kept in `MissingResult` errors.
#[derive(Debug, Clone, Serialize)]
pub struct PartSummary {
    pub content_type: String,
    pub disposition: String,
    pub preview: String,
}

/// Truncate to a bounded number of characters, marking elision.
pub(crate) fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push_str("...");
    out
}

/// Encode the fixed two-part request body.
///
/// Returns the Content-Type header value (with boundary) and the body.
pub fn encode_request(parts: &[FormPart<'_>]) -> (String, Vec<u8>) {
    let boundary = layout::REQUEST_BOUNDARY;
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, part.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.extend_from_slice(part.body);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

/// Extract the boundary parameter from a Content-Type header value.
pub fn boundary_from_content_type(content_type: &str) -> Result<String, MultipartError> {
    for param in content_type.split(';').skip(1) {
        let param = param.trim();
        if let Some(value) = param
            .strip_prefix("boundary=")
            .or_else(|| param.strip_prefix("BOUNDARY="))
        {
            let value = value.trim().trim_matches('"');
            if !value.is_empty() {
                return Ok(value.to_string());
            }
        }
    }
    Err(MultipartError::MissingBoundary {
        content_type: content_type.to_string(),
    })
}

/// Decode a multipart response body using the boundary declared in the
/// response's own Content-Type header.
pub fn decode_response(
    body: &[u8],
    content_type: &str,
) -> Result<Vec<ResponsePart>, MultipartError> {
    let boundary = boundary_from_content_type(content_type)?;
    let delimiter = format!("--{boundary}").into_bytes();

    let mut parts = Vec::new();
    let mut cursor = find_subslice(body, &delimiter).ok_or(MultipartError::Empty)?;
    cursor += delimiter.len();

    loop {
        if body[cursor..].starts_with(b"--") {
            break;
        }
        // Transport padding before the CRLF that ends the delimiter line.
        match find_subslice(&body[cursor..], b"\r\n") {
            Some(offset) => cursor += offset + 2,
            None => break,
        }

        let index = parts.len();
        let header_end = find_subslice(&body[cursor..], b"\r\n\r\n")
            .ok_or(MultipartError::Truncated { index })?;
        let headers = &body[cursor..cursor + header_end];
        cursor += header_end + 4;

        let mut next = Vec::with_capacity(delimiter.len() + 2);
        next.extend_from_slice(b"\r\n");
        next.extend_from_slice(&delimiter);
        let body_end =
            find_subslice(&body[cursor..], &next).ok_or(MultipartError::Truncated { index })?;

        parts.push(build_part(headers, &body[cursor..cursor + body_end]));
        cursor += body_end + next.len();
    }

    if parts.is_empty() {
        return Err(MultipartError::Empty);
    }
    Ok(parts)
}

fn build_part(headers: &[u8], body: &[u8]) -> ResponsePart {
    let mut content_type = String::new();
    let mut disposition = String::new();
    for line in String::from_utf8_lossy(headers).split("\r\n") {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.eq_ignore_ascii_case("content-type") {
                content_type = value.trim().to_string();
            } else if name.eq_ignore_ascii_case("content-disposition") {
                disposition = value.trim().to_string();
            }
        }
    }
    ResponsePart {
        content_type,
        disposition,
        body: body.to_vec(),
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
