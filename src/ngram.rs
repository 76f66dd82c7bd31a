use crate::NGRAM_SIZE;

const RUNE_BITS: u32 = 21;
const RUNE_MASK: u64 = (1 << RUNE_BITS) - 1;

// Packs 3 Unicode scalar values into a u64. Largest scalar value (0x10FFFF)
// needs 21 bits, so 3 fit in 63 with room to spare. Injective.
pub type Ngram = u64;

pub fn runes_to_ngram(r0: char, r1: char, r2: char) -> Ngram {
    ((r0 as u64) << (2 * RUNE_BITS)) | ((r1 as u64) << RUNE_BITS) | (r2 as u64)
}

// Only used by tests; production code never unpacks an ngram.
pub fn ngram_to_runes(g: Ngram) -> (char, char, char) {
    let r0 = ((g >> (2 * RUNE_BITS)) & RUNE_MASK) as u32;
    let r1 = ((g >> RUNE_BITS) & RUNE_MASK) as u32;
    let r2 = (g & RUNE_MASK) as u32;
    (
        char::from_u32(r0).unwrap_or(char::REPLACEMENT_CHARACTER),
        char::from_u32(r1).unwrap_or(char::REPLACEMENT_CHARACTER),
        char::from_u32(r2).unwrap_or(char::REPLACEMENT_CHARACTER),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub ngram: Ngram,
    pub rune_index: u32,
    pub byte_size: u8,
}

// Slides a 3-rune window over `bytes`, emitting one Event per scalar once the
// window fills (skips the first two, which only prime it). Window resets per
// call: trigrams never span a document boundary.
//
// Never panics on invalid UTF-8: decodes best-effort via str::from_utf8, and
// stops emitting at the first invalid byte. The classifier is expected to
// reject non-UTF-8 buffers before they reach this.
pub fn extract(bytes: &[u8]) -> impl Iterator<Item = Event> + '_ {
    let text = match std::str::from_utf8(bytes) {
        Ok(t) => t,
        Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
    };

    let mut window = [None, None, None];
    let mut rune_index: u32 = 0;

    text.char_indices().filter_map(move |(_, c)| {
        window[0] = window[1];
        window[1] = window[2];
        window[2] = Some(c);

        let idx = rune_index;
        rune_index += 1;

        let (Some(r0), Some(r1), Some(r2)) = (window[0], window[1], window[2]) else {
            return None;
        };

        if idx + 1 < NGRAM_SIZE as u32 {
            return None;
        }

        Some(Event {
            ngram: runes_to_ngram(r0, r1, r2),
            rune_index: idx,
            byte_size: c.len_utf8() as u8,
        })
    })
}
