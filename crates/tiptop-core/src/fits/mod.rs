//! Binary result container decoding.
//!
//! The service returns its simulation result as a FITS file: 2880-byte
//! blocks of 80-character header cards followed by big-endian array
//! payloads. This module decodes exactly the subset the service emits (a
//! header-only primary frame plus IMAGE extension frames) and materializes
//! every payload into memory up front. Byte-level constants live in
//! `layout`, block/card access in `reader`, frame decoding in `parser`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::FitsError;
pub use parser::{BinaryContainer, DataArray, Frame, Header};
pub use reader::CardValue;
