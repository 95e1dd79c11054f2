use std::io::Read;
use std::time::Duration;

use log::{debug, error, info, warn};

use super::error::ProtocolError;
use super::layout;
use super::multipart::{self, FormPart, ResponsePart};
use super::status::decode_status;
use crate::fits::BinaryContainer;

/// The fixed service-descriptor resource, sent unmodified with every
/// request.
pub const SERVICE_DESCRIPTOR: &str = include_str!("../../resources/serviceDescription.json");

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(layout::DEFAULT_TIMEOUT_SECS);

/// Blocking client for the TIPTOP PSF-simulation service.
///
/// One request in flight per call, no retries; retry policy belongs to the
/// caller.
pub struct Client {
    endpoint: String,
    agent: ureq::Agent,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Client against the production service endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(layout::SERVICE_URL)
    }

    /// Client against an alternative endpoint (tests, mirrors).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit serialized config text and return the decoded result
    /// container.
    ///
    /// Explicit service-reported failures always win over the mere presence
    /// of result bytes: a rejection phrase or a non-zero exit code turns
    /// into an error even when a binary part arrived too.
    pub fn send(&self, ini: &str, timeout: Duration) -> Result<BinaryContainer, ProtocolError> {
        debug!("parameter file contents:\n{ini}");
        let parts = [
            FormPart {
                name: layout::DESCRIPTOR_PART_NAME,
                filename: layout::DESCRIPTOR_FILENAME,
                content_type: layout::MEDIA_JSON,
                body: SERVICE_DESCRIPTOR.as_bytes(),
            },
            FormPart {
                name: layout::PARAMETER_PART_NAME,
                filename: layout::PARAMETER_FILENAME,
                content_type: layout::MEDIA_TEXT,
                body: ini.as_bytes(),
            },
        ];
        let (content_type, body) = multipart::encode_request(&parts);

        debug!("POST {} ({} request bytes)", self.endpoint, body.len());
        let response = match self
            .agent
            .post(&self.endpoint)
            .timeout(timeout)
            .set("Content-Type", &content_type)
            .send_bytes(&body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = multipart::truncate(
                    &response.into_string().unwrap_or_default(),
                    layout::HTTP_BODY_TRUNCATE,
                );
                return Err(ProtocolError::ServerHttp { status, body });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(ProtocolError::Transport(transport.to_string()));
            }
        };
        if response.status() != 200 {
            let status = response.status();
            let body = multipart::truncate(
                &response.into_string().unwrap_or_default(),
                layout::HTTP_BODY_TRUNCATE,
            );
            return Err(ProtocolError::ServerHttp { status, body });
        }

        let response_type = response
            .header("Content-Type")
            .unwrap_or_default()
            .to_string();
        // Materialize the body before the transport reader goes away; the
        // container must never reference request-scoped resources.
        let mut payload = Vec::new();
        response
            .into_reader()
            .take(layout::MAX_RESPONSE_LEN)
            .read_to_end(&mut payload)
            .map_err(|err| ProtocolError::Transport(err.to_string()))?;
        debug!("received {} response bytes", payload.len());

        decode_exchange(&payload, &response_type)
    }

    /// Check whether the service endpoint is reachable.
    pub fn ping(&self) -> bool {
        let result = self
            .agent
            .get(&self.endpoint)
            .timeout(Duration::from_secs(layout::PING_TIMEOUT_SECS))
            .call();
        match result {
            Ok(_) => true,
            Err(ureq::Error::Status(status, _)) => status < 500,
            Err(ureq::Error::Transport(_)) => false,
        }
    }
}

/// Decode the multipart exchange and apply the failure-priority cascade.
pub(crate) fn decode_exchange(
    payload: &[u8],
    content_type: &str,
) -> Result<BinaryContainer, ProtocolError> {
    let parts = multipart::decode_response(payload, content_type)?;

    let mut exit_failure: Option<(i64, String)> = None;
    let mut result_part: Option<&ResponsePart> = None;

    for part in &parts {
        match part.media_type().as_str() {
            layout::MEDIA_JSON => {
                let text = part.text_lossy();
                debug!("received JSON part: {text}");
                if text.contains(layout::REJECTION_MARKER) {
                    return Err(ProtocolError::ConfigRejected {
                        detail: multipart::truncate(&text, layout::HTTP_BODY_TRUNCATE),
                    });
                }
                if let Some(status) = decode_status(&part.body) {
                    if status.exit_code == 0 {
                        info!("TIPTOP completed successfully");
                    } else {
                        error!(
                            "TIPTOP reported exit code {}: {}",
                            status.exit_code, status.message
                        );
                        exit_failure.get_or_insert((status.exit_code, status.message));
                    }
                }
            }
            layout::MEDIA_OCTET_STREAM => {
                if part.disposition.contains(layout::RESULT_FILENAME) {
                    info!("TIPTOP sent back a FITS file ({} bytes)", part.body.len());
                    result_part = Some(part);
                } else {
                    error!(
                        "received an octet-stream part that is not the expected result: {}",
                        part.disposition
                    );
                }
            }
            layout::MEDIA_TEXT => {
                debug!("received text part: {}", part.text_lossy());
            }
            other => {
                warn!("received part with unexpected content-type: {other}");
            }
        }
    }

    if let Some((code, message)) = exit_failure {
        return Err(ProtocolError::ServiceExit { code, message });
    }
    let Some(part) = result_part else {
        return Err(ProtocolError::MissingResult {
            parts: parts.iter().map(ResponsePart::summary).collect(),
        });
    };
    Ok(BinaryContainer::parse(part.body.clone())?)
}
