pub const BLOCK_LEN: usize = 2880;
pub const CARD_LEN: usize = 80;
pub const KEYWORD_LEN: usize = 8;
pub const VALUE_INDICATOR: &[u8; 2] = b"= ";

pub const SIMPLE_KEYWORD: &str = "SIMPLE";
pub const END_KEYWORD: &str = "END";
pub const BITPIX_KEYWORD: &str = "BITPIX";
pub const NAXIS_KEYWORD: &str = "NAXIS";
pub const BSCALE_KEYWORD: &str = "BSCALE";
pub const BZERO_KEYWORD: &str = "BZERO";
pub const CONTENT_KEYWORD: &str = "CONTENT";

pub const COORD_X_PREFIX: &str = "CCX";
pub const COORD_Y_PREFIX: &str = "CCY";
pub const STREHL_PREFIX: &str = "SR";
pub const FWHM_PREFIX: &str = "FWHM";

/// Indexed card series use a 4-digit zero-padded suffix; the scan bound
/// guarantees termination on malformed headers.
pub const INDEX_DIGITS: usize = 4;
pub const MAX_INDEXED_CARDS: usize = 10_000;
