use serde_json::Value;

/// Administrative status reported by the service in a JSON part.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ServiceStatus {
    pub exit_code: i64,
    pub message: String,
}

/// Decode the service status object, tolerating unknown structure.
///
/// Returns `None` when the part is not JSON or carries no
/// `admin.exitCode` field.
pub(crate) fn decode_status(body: &[u8]) -> Option<ServiceStatus> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let exit_code = value.get("admin")?.get("exitCode")?.as_i64()?;
    let service = value.get("service");
    let message = service
        .and_then(|s| s.get("message"))
        .and_then(Value::as_str)
        .or_else(|| {
            service
                .and_then(|s| s.get("error"))
                .and_then(Value::as_str)
        })
        .unwrap_or("")
        .to_string();
    Some(ServiceStatus { exit_code, message })
}
