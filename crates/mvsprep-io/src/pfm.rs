use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

/// Error types for the PFM module.
#[derive(Debug, thiserror::Error)]
pub enum PfmError {
    /// Error reading or writing file
    #[error("error reading or writing file")]
    IoError(#[from] std::io::Error),

    /// The header is not a valid PFM header.
    #[error("Invalid PFM header: {0}")]
    InvalidHeader(String),

    /// Only gray (`Pf`) and color (`PF`) maps exist.
    #[error("Unsupported number of channels: {0}")]
    UnsupportedChannels(usize),

    /// The data does not match the map size.
    #[error("Data length ({0}) does not match the map size ({1})")]
    InvalidDataLength(usize, usize),
}

/// A float map, rows stored top to bottom and channels interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct PfmImage {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl PfmImage {
    /// Create a float map from its data.
    ///
    /// # Arguments
    ///
    /// * `width` - The number of columns.
    /// * `height` - The number of rows.
    /// * `channels` - 1 for a depth map, 3 for a color map.
    /// * `data` - `width * height * channels` values, first row first.
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<f32>) -> Result<Self, PfmError> {
        if channels != 1 && channels != 3 {
            return Err(PfmError::UnsupportedChannels(channels));
        }

        let expected = width * height * channels;
        if data.len() != expected {
            return Err(PfmError::InvalidDataLength(data.len(), expected));
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// The number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// The values, first row first.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consume the map and return its values.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Encode a float map as little-endian PFM.
///
/// PFM stores rows bottom to top; a negative scale marks little-endian data.
pub fn encode_pfm<W: Write>(writer: &mut W, image: &PfmImage) -> Result<(), PfmError> {
    let magic = if image.channels == 3 { "PF" } else { "Pf" };
    write!(writer, "{magic}\n{} {}\n{:.6}\n", image.width, image.height, -1.0f64)?;

    let row_len = image.width * image.channels;
    if row_len > 0 {
        for row in image.data.chunks_exact(row_len).rev() {
            for value in row {
                writer.write_all(&value.to_le_bytes())?;
            }
        }
    }

    Ok(())
}

fn read_header_line<R: BufRead>(reader: &mut R, what: &str) -> Result<String, PfmError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(PfmError::InvalidHeader(format!("missing {what}")));
    }
    Ok(line.trim().to_string())
}

/// Decode a PFM stream written in either byte order.
pub fn decode_pfm<R: BufRead>(reader: &mut R) -> Result<PfmImage, PfmError> {
    let channels = match read_header_line(reader, "magic")?.as_str() {
        "PF" => 3,
        "Pf" => 1,
        other => return Err(PfmError::InvalidHeader(format!("not a PFM file: '{other}'"))),
    };

    let dims = read_header_line(reader, "dimensions")?;
    let (width, height) = match dims.split_whitespace().collect::<Vec<_>>().as_slice() {
        [w, h] => (
            w.parse::<usize>()
                .map_err(|e| PfmError::InvalidHeader(format!("width {w}: {e}")))?,
            h.parse::<usize>()
                .map_err(|e| PfmError::InvalidHeader(format!("height {h}: {e}")))?,
        ),
        _ => return Err(PfmError::InvalidHeader(format!("malformed dimensions '{dims}'"))),
    };

    let scale_line = read_header_line(reader, "scale")?;
    let scale = scale_line
        .parse::<f64>()
        .map_err(|e| PfmError::InvalidHeader(format!("scale {scale_line}: {e}")))?;
    let little_endian = scale < 0.0;

    let num_bytes = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| PfmError::InvalidHeader(format!("map size {width}x{height} is too large")))?;

    // the header size is untrusted, let the data bound the allocation
    let mut bytes = Vec::new();
    reader.by_ref().take(num_bytes as u64).read_to_end(&mut bytes)?;
    if bytes.len() != num_bytes {
        return Err(PfmError::InvalidDataLength(bytes.len() / 4, num_bytes / 4));
    }

    let values = bytes
        .chunks_exact(4)
        .map(|b| {
            let b = [b[0], b[1], b[2], b[3]];
            if little_endian {
                f32::from_le_bytes(b)
            } else {
                f32::from_be_bytes(b)
            }
        })
        .collect::<Vec<_>>();

    // flip back to top to bottom rows
    let row_len = width * channels;
    let data = if row_len > 0 {
        values
            .chunks_exact(row_len)
            .rev()
            .flatten()
            .copied()
            .collect()
    } else {
        values
    };

    PfmImage::new(width, height, channels, data)
}

/// Write a float map to a PFM file, replacing any existing file.
pub fn write_pfm(path: impl AsRef<Path>, image: &PfmImage) -> Result<(), PfmError> {
    let mut writer = BufWriter::new(File::create(path)?);
    encode_pfm(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}

/// Read a PFM file.
pub fn read_pfm(path: impl AsRef<Path>) -> Result<PfmImage, PfmError> {
    let mut reader = BufReader::new(File::open(path)?);
    decode_pfm(&mut reader)
}
