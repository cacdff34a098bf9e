//! Helpers for splitting payloads into chunks, shared by tests and benches.

use alloc::vec::Vec;

/// Split `payload` into `parts` chunks of roughly equal size without
/// breaking UTF-8 code points.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0);
    let len = payload.len();
    let chunk_size = len.div_ceil(parts);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = core::cmp::min(start + chunk_size, len);
        while end < len && !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

/// Split `payload` at the given byte budgets (each at least one byte),
/// rounding every cut forward to the next code-point boundary. Whatever the
/// budgets do not cover becomes one final chunk.
#[must_use]
pub fn chunks_by_sizes<'a>(payload: &'a str, sizes: &[usize]) -> Vec<&'a str> {
    let len = payload.len();
    let mut chunks = Vec::new();
    let mut start = 0;
    for &size in sizes {
        if start >= len {
            break;
        }
        let mut end = core::cmp::min(start + size.max(1), len);
        while end < len && !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    if start < len {
        chunks.push(&payload[start..]);
    }
    chunks
}
