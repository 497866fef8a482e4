use binrw::io::{Read, Seek};
use binrw::{BinReaderExt, BinResult};

/// The data type for the indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexBufferFormat {
    UInt16,
    UInt32,
}

/// Reads indices starting from the current position of a borrowed reader.
#[derive(Debug)]
pub struct IndexBufferReader<'a, R> {
    reader: &'a mut R,
    format: IndexBufferFormat,
}

impl<'a, R: Read + Seek> IndexBufferReader<'a, R> {
    pub fn new(reader: &'a mut R, format: IndexBufferFormat) -> Self {
        Self { reader, format }
    }

    pub fn format(&self) -> IndexBufferFormat {
        self.format
    }

    /// Reads the next index.
    /// Indices are converted to [u32] regardless of the actual data type.
    pub fn read_index(&mut self) -> BinResult<u32> {
        match self.format {
            IndexBufferFormat::UInt16 => self.reader.read_le::<u16>().map(u32::from),
            IndexBufferFormat::UInt32 => self.reader.read_le::<u32>(),
        }
    }

    /// Reads the next `count` indices.
    pub fn read_indices(&mut self, count: usize) -> BinResult<Vec<u32>> {
        // Bound the initial allocation in case count is malformed.
        let mut indices = Vec::with_capacity(std::cmp::min(count, 1024));
        for _ in 0..count {
            indices.push(self.read_index()?);
        }
        Ok(indices)
    }
}
