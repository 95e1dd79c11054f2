use thiserror::Error;

use super::multipart::{MultipartError, PartSummary};
use crate::fits::FitsError;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("TIPTOP server returned HTTP {status}: {body}")]
    ServerHttp { status: u16, body: String },
    #[error("config file could not be parsed by the server: {detail}")]
    ConfigRejected { detail: String },
    #[error("TIPTOP reported exit code {code}: {message}")]
    ServiceExit { code: i64, message: String },
    #[error(
        "TIPTOP sent no usable FITS part; received {} part(s):{}",
        parts.len(),
        format_parts(parts)
    )]
    MissingResult { parts: Vec<PartSummary> },
    #[error("multipart decode failed: {0}")]
    Multipart(#[from] MultipartError),
    #[error("FITS decode failed: {0}")]
    Container(#[from] FitsError),
}

fn format_parts(parts: &[PartSummary]) -> String {
    let mut out = String::new();
    for (index, part) in parts.iter().enumerate() {
        out.push_str(&format!(
            "\n  [{index}] content-type: {}; disposition: {}; preview: {}",
            part.content_type, part.disposition, part.preview
        ));
    }
    out
}
