pub const SERVICE_URL: &str = "https://www.eso.org/p2services/any/tiptop";

pub const DESCRIPTOR_PART_NAME: &str = "serviceDescription";
pub const DESCRIPTOR_FILENAME: &str = "serviceDescription.json";
pub const PARAMETER_PART_NAME: &str = "parameterFile";
pub const PARAMETER_FILENAME: &str = "tiptop.ini";
/// The server names the returned container after the uploaded parameter
/// file; the result part is matched on this filename.
pub const RESULT_FILENAME: &str = "tiptop.fits";

/// Request boundary is client-chosen and independent of the response
/// boundary, which is read from the response Content-Type.
pub const REQUEST_BOUNDARY: &str = "----tiptop-request-5a3d1c9e7b42f08a";

pub const MEDIA_JSON: &str = "application/json";
pub const MEDIA_TEXT: &str = "text/plain";
pub const MEDIA_OCTET_STREAM: &str = "application/octet-stream";

/// Phrase the server embeds in a JSON part when it could not parse the
/// submitted configuration.
pub const REJECTION_MARKER: &str = "cannot extract JSON structure from service output";

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const PING_TIMEOUT_SECS: u64 = 10;

/// Error-body and diagnostic previews are truncated to these lengths.
pub const HTTP_BODY_TRUNCATE: usize = 2048;
pub const PART_PREVIEW_LEN: usize = 200;

pub const MAX_RESPONSE_LEN: u64 = 256 * 1024 * 1024;
