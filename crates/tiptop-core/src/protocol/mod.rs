//! Wire protocol for the TIPTOP microservice.
//!
//! The exchange is a single blocking HTTP POST: a two-part
//! multipart/form-data request (fixed JSON service descriptor plus the
//! serialized parameter file) answered by a multipart response whose
//! boundary is declared in the response's own Content-Type. This module
//! implements exactly that shape, not a general multipart library.
//!
//! Failure priority: server-side rejection phrase, then a non-zero
//! administrative exit code, then the absence of a usable binary part.
//! Each failure carries full diagnostic context, since the service is
//! otherwise opaque.

pub mod client;
pub mod error;
pub mod layout;
pub mod multipart;
pub mod status;

pub use client::{Client, DEFAULT_TIMEOUT, SERVICE_DESCRIPTOR};
pub use error::ProtocolError;
pub use multipart::{MultipartError, PartSummary, ResponsePart};
