//! Fixed-size character window chunking.
//!
//! Sizes are counted in Unicode scalar values (`char`s), never bytes, so a
//! window never splits a code point.

use crate::types::{Chunk, DocumentSegment};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkError {
    #[error("Invalid chunker configuration: chunk_size ({chunk_size}) must be greater than overlap ({overlap})")]
    InvalidConfig { chunk_size: usize, overlap: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextChunker {
    /// Create a chunker. `chunk_overlap` must be strictly smaller than
    /// `chunk_size`, otherwise windows would never advance.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ChunkError> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(ChunkError::InvalidConfig {
                chunk_size,
                overlap: chunk_overlap,
            });
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split raw text into windows of at most `chunk_size` chars where
    /// consecutive windows share exactly `chunk_overlap` chars.
    ///
    /// Returns `(start_char, text)` pairs. Only the last window may be shorter.
    pub fn chunk(&self, text: &str) -> Vec<(usize, String)> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let step = self.chunk_size - self.chunk_overlap;

        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push((start, chars[start..end].iter().collect()));
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }

    /// Split every segment independently, carrying its metadata onto each chunk.
    pub fn split(&self, segments: &[DocumentSegment]) -> Vec<Chunk> {
        segments
            .iter()
            .flat_map(|segment| {
                self.chunk(&segment.text)
                    .into_iter()
                    .enumerate()
                    .map(move |(chunk_index, (start_char, text))| Chunk {
                        text,
                        metadata: segment.metadata.clone(),
                        chunk_index,
                        start_char,
                    })
            })
            .collect()
    }
}
