use super::error::FitsError;
use super::layout;
use super::reader::{BlockReader, CardValue, card_keyword, parse_card};

/// Ordered header cards of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    cards: Vec<(String, CardValue)>,
}

impl Header {
    pub fn get(&self, keyword: &str) -> Option<&CardValue> {
        self.cards
            .iter()
            .find(|(name, _)| name == keyword)
            .map(|(_, value)| value)
    }

    pub fn get_i64(&self, keyword: &str) -> Option<i64> {
        self.get(keyword).and_then(CardValue::as_i64)
    }

    pub fn get_f64(&self, keyword: &str) -> Option<f64> {
        self.get(keyword).and_then(CardValue::as_f64)
    }

    pub fn get_str(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).and_then(CardValue::as_str)
    }

    pub fn cards(&self) -> impl Iterator<Item = (&str, &CardValue)> {
        self.cards.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Collect an indexed card family (`PREFIX0000`, `PREFIX0001`, ...).
    ///
    /// Scanning stops at the first missing index and is bounded by
    /// `MAX_INDEXED_CARDS` so malformed headers cannot stall it.
    pub fn indexed_series(&self, prefix: &str) -> Vec<f64> {
        let mut values = Vec::new();
        for index in 0..layout::MAX_INDEXED_CARDS {
            let keyword = format!("{prefix}{index:0width$}", width = layout::INDEX_DIGITS);
            match self.get_f64(&keyword) {
                Some(value) => values.push(value),
                None => break,
            }
        }
        values
    }
}

/// N-dimensional numeric payload of a frame, eagerly converted to `f64`.
///
/// The shape is slowest-axis first, so a PSF cube frame reads as
/// `(positions, height, width)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl DataArray {
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> Self {
        Self { shape, values }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Slice one plane of a 3-D array into a 2-D array.
    pub fn plane(&self, index: usize) -> Option<DataArray> {
        if self.shape.len() != 3 || index >= self.shape[0] {
            return None;
        }
        let plane_len = self.shape[1] * self.shape[2];
        let start = index * plane_len;
        Some(DataArray {
            shape: vec![self.shape[1], self.shape[2]],
            values: self.values[start..start + plane_len].to_vec(),
        })
    }

    /// One row of a 2-D array.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if self.shape.len() != 2 || index >= self.shape[0] {
            return None;
        }
        let width = self.shape[1];
        Some(&self.values[index * width..(index + 1) * width])
    }
}

/// One frame: header cards plus an optional array payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub header: Header,
    pub data: Option<DataArray>,
}

/// The fully materialized binary result container.
///
/// Owns both the decoded frames and the raw bytes they came from; nothing
/// references transport-scoped buffers after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryContainer {
    raw: Vec<u8>,
    frames: Vec<Frame>,
}

impl BinaryContainer {
    /// Decode a container from its raw bytes, reading every frame's array
    /// payload into memory.
    pub fn parse(raw: Vec<u8>) -> Result<Self, FitsError> {
        let frames = parse_frames(&raw)?;
        Ok(Self { raw, frames })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The raw container bytes as received from the service.
    pub fn bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Write the raw container to a file.
    pub fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        std::fs::write(path, &self.raw)
    }
}

fn parse_frames(bytes: &[u8]) -> Result<Vec<Frame>, FitsError> {
    let mut reader = BlockReader::new(bytes);
    let mut frames = Vec::new();

    while !reader.is_at_end() {
        let frame_index = frames.len();
        let header = read_header(&mut reader)?;
        if frame_index == 0 && header.get(layout::SIMPLE_KEYWORD).is_none() {
            return Err(FitsError::NotFits);
        }
        let data = read_data(&mut reader, &header, frame_index)?;
        frames.push(Frame { header, data });
    }

    if frames.is_empty() {
        return Err(FitsError::TooShort {
            needed: layout::BLOCK_LEN,
            actual: bytes.len(),
        });
    }
    Ok(frames)
}

fn read_header(reader: &mut BlockReader<'_>) -> Result<Header, FitsError> {
    let mut header = Header::default();
    loop {
        let block = reader.read_block()?;
        for card in block.chunks_exact(layout::CARD_LEN) {
            if card_keyword(card) == layout::END_KEYWORD {
                return Ok(header);
            }
            if let Some((keyword, value)) = parse_card(card) {
                header.cards.push((keyword, value));
            }
        }
    }
}

fn read_data(
    reader: &mut BlockReader<'_>,
    header: &Header,
    frame_index: usize,
) -> Result<Option<DataArray>, FitsError> {
    let naxis = require_int(header, layout::NAXIS_KEYWORD, frame_index)?;
    if naxis == 0 {
        return Ok(None);
    }

    let bitpix = require_int(header, layout::BITPIX_KEYWORD, frame_index)?;
    let bytes_per_value = match bitpix {
        8 => 1,
        16 => 2,
        32 | -32 => 4,
        64 | -64 => 8,
        other => {
            return Err(FitsError::UnsupportedBitpix {
                frame: frame_index,
                bitpix: other,
            });
        }
    };

    let mut dims = Vec::with_capacity(naxis as usize);
    for axis in 1..=naxis {
        let keyword = format!("{}{axis}", layout::NAXIS_KEYWORD);
        let dim = header.get_i64(&keyword).ok_or_else(|| FitsError::MissingCard {
            frame: frame_index,
            keyword: keyword.clone(),
        })?;
        dims.push(dim.max(0) as usize);
    }
    let count: usize = dims.iter().product();
    if count == 0 {
        return Ok(None);
    }

    let raw = reader.read_data(count * bytes_per_value)?;
    let mut values = Vec::with_capacity(count);
    for chunk in raw.chunks_exact(bytes_per_value) {
        values.push(decode_value(bitpix, chunk));
    }

    let bscale = header.get_f64(layout::BSCALE_KEYWORD).unwrap_or(1.0);
    let bzero = header.get_f64(layout::BZERO_KEYWORD).unwrap_or(0.0);
    if bscale != 1.0 || bzero != 0.0 {
        for value in &mut values {
            *value = *value * bscale + bzero;
        }
    }

    // FITS orders axes fastest-first; expose the numpy-style reverse.
    dims.reverse();
    Ok(Some(DataArray::new(dims, values)))
}

fn require_int(header: &Header, keyword: &str, frame_index: usize) -> Result<i64, FitsError> {
    match header.get(keyword) {
        Some(value) => value.as_i64().ok_or_else(|| FitsError::InvalidCard {
            frame: frame_index,
            keyword: keyword.to_string(),
        }),
        None => Err(FitsError::MissingCard {
            frame: frame_index,
            keyword: keyword.to_string(),
        }),
    }
}

fn decode_value(bitpix: i64, chunk: &[u8]) -> f64 {
    match bitpix {
        8 => chunk[0] as f64,
        16 => i16::from_be_bytes([chunk[0], chunk[1]]) as f64,
        32 => i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as f64,
        64 => i64::from_be_bytes([
            chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
        ]) as f64,
        -32 => f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as f64,
        _ => f64::from_be_bytes([
            chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
        ]),
    }
}
