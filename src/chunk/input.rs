//! chunk stream reader
//!
//! reads the label table up front, then walks nested chunks on demand. parsers
//! are registered per session, keyed by (label, parent label), and receive the
//! object being filled as `&mut dyn Any`.

use std::any::Any;
use std::collections::HashMap;
use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, trace};

use super::error::ChunkError;
use super::{CHUNK_HEADER_SIZE, CHUNK_MAGIC};

/// metadata for the chunk currently being parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChunkInfo {
    pub label: String,
    /// label of the enclosing chunk, empty at top level
    pub parent_label: String,
    pub version: u16,
    pub data_size: usize,
}

/// parse callback: (reader, chunk info, receiving object)
pub type DataChunkParser =
    fn(&mut DataChunkInput, &DataChunkInfo, &mut dyn Any) -> Result<(), ChunkError>;

#[derive(Debug)]
struct OpenChunk {
    label: String,
    end: u64,
}

/// one parse session over a chunk file
pub struct DataChunkInput {
    cursor: Cursor<Vec<u8>>,
    labels: HashMap<u32, String>,
    parsers: HashMap<(String, String), DataChunkParser>,
    open: Vec<OpenChunk>,
    end: u64,
}

impl DataChunkInput {
    /// validate the magic and load the label table
    pub fn new(bytes: Vec<u8>) -> Result<Self, ChunkError> {
        if bytes.len() < CHUNK_MAGIC.len() || &bytes[..CHUNK_MAGIC.len()] != CHUNK_MAGIC {
            return Err(ChunkError::BadMagic);
        }

        let end = bytes.len() as u64;
        let mut cursor = Cursor::new(bytes);
        cursor.set_position(CHUNK_MAGIC.len() as u64);

        let labels = read_label_table(&mut cursor)
            .map_err(|e| ChunkError::malformed(format!("label table: {}", e)))?;

        debug!(labels = labels.len(), "loaded chunk label table");

        Ok(Self {
            cursor,
            labels,
            parsers: HashMap::new(),
            open: Vec::new(),
            end,
        })
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ChunkError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::new(bytes)
    }

    /// register `parser` for chunks named `label` nested directly in `parent_label`
    ///
    /// registering the same pair again replaces the previous parser.
    pub fn register_parser(&mut self, label: &str, parent_label: &str, parser: DataChunkParser) {
        trace!(label, parent_label, "registering chunk parser");
        self.parsers
            .insert((label.to_string(), parent_label.to_string()), parser);
    }

    /// dispatch every chunk in the current scope to its registered parser
    ///
    /// chunks without a parser are skipped. the first parser error stops the
    /// walk and is returned.
    pub fn parse(&mut self, target: &mut dyn Any) -> Result<(), ChunkError> {
        while !self.at_end_of_chunk() {
            let info = self.open_data_chunk()?;
            let parser = self
                .parsers
                .get(&(info.label.clone(), info.parent_label.clone()))
                .copied();

            match parser {
                Some(parser) => parser(self, &info, &mut *target)?,
                None => debug!(
                    label = %info.label,
                    parent = %info.parent_label,
                    size = info.data_size,
                    "skipping chunk with no registered parser"
                ),
            }

            self.close_data_chunk();
        }

        Ok(())
    }

    /// true when the innermost open chunk (or the file) has no bytes left
    pub fn at_end_of_chunk(&self) -> bool {
        self.cursor.position() >= self.scope_end()
    }

    /// read the next chunk header and enter it
    pub fn open_data_chunk(&mut self) -> Result<DataChunkInfo, ChunkError> {
        self.ensure(CHUNK_HEADER_SIZE, "chunk header")?;

        let id = self.cursor.read_u32::<LittleEndian>()?;
        let version = self.cursor.read_u16::<LittleEndian>()?;
        let size = self.cursor.read_i32::<LittleEndian>()?;

        let label = self
            .labels
            .get(&id)
            .cloned()
            .ok_or(ChunkError::UnknownLabel(id))?;

        let data_size = usize::try_from(size)
            .map_err(|_| ChunkError::malformed(format!("negative size {} for '{}'", size, label)))?;
        self.ensure(data_size as u64, "chunk body")?;

        let parent_label = self
            .open
            .last()
            .map(|c| c.label.clone())
            .unwrap_or_default();

        self.open.push(OpenChunk {
            label: label.clone(),
            end: self.cursor.position() + data_size as u64,
        });

        Ok(DataChunkInfo {
            label,
            parent_label,
            version,
            data_size,
        })
    }

    /// leave the innermost chunk, skipping whatever its parser did not read
    pub fn close_data_chunk(&mut self) {
        if let Some(chunk) = self.open.pop() {
            self.cursor.set_position(chunk.end);
        }
    }

    pub fn read_i32(&mut self) -> Result<i32, ChunkError> {
        self.ensure(4, "int")?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    pub fn read_real(&mut self) -> Result<f32, ChunkError> {
        self.ensure(4, "real")?;
        Ok(self.cursor.read_f32::<LittleEndian>()?)
    }

    pub fn read_byte(&mut self) -> Result<u8, ChunkError> {
        self.ensure(1, "byte")?;
        Ok(self.cursor.read_u8()?)
    }

    /// u16 length followed by single-byte characters
    pub fn read_ascii_string(&mut self) -> Result<String, ChunkError> {
        self.ensure(2, "string length")?;
        let len = self.cursor.read_u16::<LittleEndian>()? as usize;
        self.ensure(len as u64, "string")?;

        let mut buf = vec![0u8; len];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf.into_iter().map(char::from).collect())
    }

    fn scope_end(&self) -> u64 {
        self.open.last().map(|c| c.end).unwrap_or(self.end)
    }

    fn ensure(&self, len: u64, what: &str) -> Result<(), ChunkError> {
        if self.cursor.position() + len > self.scope_end() {
            return Err(ChunkError::malformed(format!(
                "unexpected end of data reading {}",
                what
            )));
        }
        Ok(())
    }
}

fn read_label_table(cursor: &mut Cursor<Vec<u8>>) -> std::io::Result<HashMap<u32, String>> {
    let count = cursor.read_i32::<LittleEndian>()?;
    let mut labels = HashMap::new();

    for _ in 0..count.max(0) {
        let len = cursor.read_u8()? as usize;
        let mut name = vec![0u8; len];
        cursor.read_exact(&mut name)?;
        let id = cursor.read_u32::<LittleEndian>()?;
        labels.insert(id, name.into_iter().map(char::from).collect());
    }

    Ok(labels)
}
