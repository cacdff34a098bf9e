//! Feeding multi-megabyte streams must behave exactly like a one-call parse:
//! the consumed prefix is discarded along the way, but no emitted value,
//! error, or source position may change.

use alloc::{string::String, vec::Vec};

use crate::{DefaultStreamParser, StreamMode, SyntaxError, Value};

const UNIT: &str = "{\"seq\":\"0123456789abcdef\"}\n";

fn payload() -> (String, usize) {
    let count = (2 * 1024 * 1024) / UNIT.len() + 1;
    (UNIT.repeat(count), count)
}

#[test]
fn long_stream_emits_every_value() {
    let (src, count) = payload();
    let mut parser = DefaultStreamParser::new(StreamMode::ValueStream);
    let mut values = Vec::new();
    for chunk in src.as_bytes().chunks(64 * 1024) {
        values.extend(parser.absorb(chunk).unwrap());
    }
    values.extend(parser.finish().unwrap());
    assert_eq!(values.len(), count);
    let expected = {
        let mut one = DefaultStreamParser::new(StreamMode::SingleValue);
        let mut vs = one.absorb(UNIT.trim_end()).unwrap();
        vs.extend(one.finish().unwrap());
        vs.remove(0)
    };
    assert!(values.iter().all(|v| *v == expected));
}

#[test]
fn positions_survive_compaction() {
    let (src, count) = payload();

    // Chunked feed, then a violation on the line after the stream.
    let mut chunked = DefaultStreamParser::new(StreamMode::ValueStream);
    for chunk in src.as_bytes().chunks(64 * 1024) {
        chunked.absorb(chunk).unwrap();
    }
    let chunked_err = chunked.absorb("]").unwrap_err();

    // The same bytes in a single call.
    let mut whole = DefaultStreamParser::new(StreamMode::ValueStream);
    let mut all = src.clone();
    all.push(']');
    let whole_err = whole.absorb(all).unwrap_err();

    assert_eq!(chunked_err.kind, SyntaxError::Grammar("expected json value"));
    assert_eq!(chunked_err.kind, whole_err.kind);
    assert_eq!(chunked_err.line, whole_err.line);
    assert_eq!(chunked_err.column, whole_err.column);
    assert_eq!(chunked_err.line as usize, count + 1);
    assert_eq!(chunked_err.column, 0);
}

#[test]
fn oversized_single_value_stays_intact() {
    // One string value bigger than the compaction threshold.
    let body: String = core::iter::repeat('x').take((1 << 20) + 4096).collect();
    let mut src = String::new();
    src.push('"');
    src.push_str(&body);
    src.push('"');

    let mut parser = DefaultStreamParser::new(StreamMode::SingleValue);
    let mut values = Vec::new();
    for chunk in src.as_bytes().chunks(64 * 1024) {
        values.extend(parser.absorb(chunk).unwrap());
    }
    values.extend(parser.finish().unwrap());
    assert_eq!(values, [Value::String(body)]);
}
