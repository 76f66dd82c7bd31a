use integer_encoding::VarIntWriter;
use rustc_hash::FxHashMap;

use crate::ngram::{self, Ngram};
use crate::{ByteOffset, RuneOffset, RUNE_OFFSET_STRIDE};

// The rune/byte ranges a document occupies live implicitly in the builder's
// end_runes/end_byte history; not reconstructed here.
#[derive(Debug, Clone)]
pub struct SearchableString {
    bytes: Vec<u8>,
}

impl SearchableString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// Owns one coalesced corpus (contents, or names, across a shard). Per ngram,
// a varint-delta-encoded byte stream of absolute rune positions, plus a
// sampled rune->byte offset table.
pub struct PostingsBuilder {
    postings: FxHashMap<Ngram, Vec<u8>>,
    last_offset: FxHashMap<Ngram, RuneOffset>,
    rune_offsets: Vec<ByteOffset>,
    rune_count: RuneOffset,
    end_runes: Vec<RuneOffset>,
    end_byte: ByteOffset,
}

impl Default for PostingsBuilder {
    fn default() -> Self {
        Self {
            postings: FxHashMap::default(),
            last_offset: FxHashMap::default(),
            rune_offsets: Vec::new(),
            rune_count: 0,
            end_runes: Vec::new(),
            end_byte: 0,
        }
    }
}

impl PostingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, bytes: &[u8]) -> SearchableString {
        let start_rune = self.rune_count;

        // Doesn't go through ngram::extract: that only emits events for a full
        // window, but rune_offsets/rune_count/end_byte need to advance on
        // every decoded scalar, including the first two of the document.
        let text = match std::str::from_utf8(bytes) {
            Ok(t) => t,
            Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
        };

        let mut local_rune_index: u32 = 0;
        let mut window: [Option<char>; 3] = [None, None, None];

        for (byte_offset, c) in text.char_indices() {
            if self.rune_count % RUNE_OFFSET_STRIDE == 0 {
                self.rune_offsets.push(self.end_byte + byte_offset as u32);
            }

            window[0] = window[1];
            window[1] = window[2];
            window[2] = Some(c);

            if local_rune_index + 1 >= 3 {
                if let (Some(r0), Some(r1), Some(r2)) = (window[0], window[1], window[2]) {
                    let g = ngram::runes_to_ngram(r0, r1, r2);
                    let new_off = start_rune + (local_rune_index - 2);
                    let last = self.last_offset.get(&g).copied().unwrap_or(0);
                    let delta = new_off - last;
                    self.postings
                        .entry(g)
                        .or_default()
                        .write_varint(delta)
                        .expect("writing to a Vec<u8> is infallible");
                    self.last_offset.insert(g, new_off);
                }
            }

            local_rune_index += 1;
            self.rune_count += 1;
        }

        self.end_runes.push(self.rune_count);
        self.end_byte += bytes.len() as u32;

        SearchableString {
            bytes: bytes.to_vec(),
        }
    }

    pub fn postings(&self) -> &FxHashMap<Ngram, Vec<u8>> {
        &self.postings
    }

    pub fn rune_offsets(&self) -> &[ByteOffset] {
        &self.rune_offsets
    }

    pub fn end_runes(&self) -> &[RuneOffset] {
        &self.end_runes
    }

    pub fn rune_count(&self) -> RuneOffset {
        self.rune_count
    }

    pub fn end_byte(&self) -> ByteOffset {
        self.end_byte
    }

    // Decodes the absolute rune positions of ngram `g` across the whole
    // corpus, increasing order.
    pub fn decode_positions(&self, g: Ngram) -> Vec<RuneOffset> {
        let Some(buf) = self.postings.get(&g) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cursor = buf.as_slice();
        let mut last: RuneOffset = 0;
        while !cursor.is_empty() {
            let delta: u32 = integer_encoding::VarIntReader::read_varint(&mut cursor).unwrap();
            last += delta;
            out.push(last);
        }
        out
    }
}
