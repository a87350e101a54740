//! chunk stream writer

use byteorder::{ByteOrder, LittleEndian};
use tracing::warn;

use super::CHUNK_MAGIC;

/// true when `value` survives [`DataChunkOutput::write_ascii_string`] unchanged
pub fn fits_ascii_string(value: &str) -> bool {
    value.chars().count() <= u16::MAX as usize && value.chars().all(|c| u8::try_from(c).is_ok())
}

/// builds a chunk file in memory; the label table is emitted by `finish`
#[derive(Debug, Default)]
pub struct DataChunkOutput {
    body: Vec<u8>,
    labels: Vec<String>,
    /// offsets of the size fields of currently open chunks
    open: Vec<usize>,
}

impl DataChunkOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_data_chunk(&mut self, label: &str, version: u16) {
        let id = self.label_id(label);
        self.write_u32(id);
        self.write_u16(version);
        self.open.push(self.body.len());
        self.write_i32(0);
    }

    /// patch the size of the innermost open chunk
    pub fn close_data_chunk(&mut self) {
        if let Some(offset) = self.open.pop() {
            let size = self.body.len() - (offset + 4);
            let size = i32::try_from(size).unwrap_or(i32::MAX);
            LittleEndian::write_i32(&mut self.body[offset..offset + 4], size);
        }
    }

    pub fn write_i32(&mut self, value: i32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_i32(&mut buf, value);
        self.body.extend_from_slice(&buf);
    }

    pub fn write_real(&mut self, value: f32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_f32(&mut buf, value);
        self.body.extend_from_slice(&buf);
    }

    pub fn write_byte(&mut self, value: u8) {
        self.body.push(value);
    }

    /// characters above U+00FF are written as '?', anything past 65535
    /// characters is cut off
    pub fn write_ascii_string(&mut self, value: &str) {
        if !fits_ascii_string(value) {
            warn!(
                chars = value.chars().count(),
                "string is not stored as written: non latin-1 characters or too long"
            );
        }
        let bytes: Vec<u8> = value
            .chars()
            .map(|c| u8::try_from(c).unwrap_or(b'?'))
            .take(u16::MAX as usize)
            .collect();
        self.write_u16(bytes.len() as u16);
        self.body.extend_from_slice(&bytes);
    }

    /// close anything still open and return magic + label table + body
    pub fn finish(mut self) -> Vec<u8> {
        while !self.open.is_empty() {
            self.close_data_chunk();
        }

        let mut out = Vec::with_capacity(self.body.len() + 64);
        out.extend_from_slice(CHUNK_MAGIC);

        let mut buf = [0u8; 4];
        LittleEndian::write_i32(&mut buf, self.labels.len() as i32);
        out.extend_from_slice(&buf);

        for (i, label) in self.labels.iter().enumerate() {
            let name = &label.as_bytes()[..label.len().min(u8::MAX as usize)];
            out.push(name.len() as u8);
            out.extend_from_slice(name);
            LittleEndian::write_u32(&mut buf, i as u32 + 1);
            out.extend_from_slice(&buf);
        }

        out.extend_from_slice(&self.body);
        out
    }

    fn label_id(&mut self, label: &str) -> u32 {
        let index = match self.labels.iter().position(|l| l == label) {
            Some(index) => index,
            None => {
                self.labels.push(label.to_string());
                self.labels.len() - 1
            }
        };
        index as u32 + 1
    }

    fn write_u32(&mut self, value: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.body.extend_from_slice(&buf);
    }

    fn write_u16(&mut self, value: u16) {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, value);
        self.body.extend_from_slice(&buf);
    }
}
