//! Response chunking.
//!
//! Splits an arbitrary-length response into contiguous, bounded fragments.
//! Lengths are counted in characters, so a fragment never ends in the middle
//! of a UTF-8 sequence.

use crate::message::ResponseChunk;

/// Default maximum characters per delivered message.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 1500;

/// Split `text` into ordered chunks of at most `max_len` characters.
///
/// Concatenating the chunk texts in order reproduces `text` exactly. A text
/// that already fits (including the empty string) yields a single chunk.
/// A `max_len` of zero is treated as one.
pub fn chunk(text: &str, max_len: usize) -> Vec<ResponseChunk> {
    let max_len = max_len.max(1);

    let mut pieces: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (offset, _) in text.char_indices() {
        if count == max_len {
            pieces.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    pieces.push(&text[start..]);

    let total = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| ResponseChunk {
            index: i + 1,
            total,
            text: piece.to_string(),
        })
        .collect()
}
