use crate::ngram::runes_to_ngram;
use crate::{MAX_LINE_SIZE, MAX_TRIGRAM_COUNT, NGRAM_SIZE};
use rustc_hash::FxHashSet;

// Rejects: a NUL byte, a line longer than MAX_LINE_SIZE, invalid UTF-8, or
// more than MAX_TRIGRAM_COUNT distinct trigrams. Buffers shorter than
// NGRAM_SIZE are always accepted.
pub fn is_text(bytes: &[u8]) -> bool {
    if bytes.contains(&0) {
        return false;
    }

    if bytes.split(|&b| b == b'\n').any(|line| line.len() > MAX_LINE_SIZE) {
        return false;
    }

    let text = match std::str::from_utf8(bytes) {
        Ok(t) => t,
        Err(_) => return false,
    };

    if bytes.len() < NGRAM_SIZE {
        return true;
    }

    let mut window = [None, None, None];
    let mut seen = FxHashSet::default();
    for c in text.chars() {
        window[0] = window[1];
        window[1] = window[2];
        window[2] = Some(c);

        if let (Some(r0), Some(r1), Some(r2)) = (window[0], window[1], window[2]) {
            seen.insert(runes_to_ngram(r0, r1, r2));
            if seen.len() > MAX_TRIGRAM_COUNT {
                return false;
            }
        }
    }

    true
}
