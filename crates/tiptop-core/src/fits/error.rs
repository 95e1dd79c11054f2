use thiserror::Error;

#[derive(Debug, Error)]
pub enum FitsError {
    #[error("container too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("not a FITS container: first card is not SIMPLE")]
    NotFits,
    #[error("frame {frame}: missing {keyword} card")]
    MissingCard { frame: usize, keyword: String },
    #[error("frame {frame}: {keyword} card is not an integer")]
    InvalidCard { frame: usize, keyword: String },
    #[error("frame {frame}: unsupported BITPIX {bitpix}")]
    UnsupportedBitpix { frame: usize, bitpix: i64 },
}
