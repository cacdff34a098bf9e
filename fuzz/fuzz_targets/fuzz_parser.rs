//! Differential fuzzing: any partition of the input must produce the same
//! values and the same verdict as a one-call parse.
#![no_main]

use jsondrip::{DefaultStreamParser, ParseError, StreamMode, Value};
use libfuzzer_sys::fuzz_target;

fn run_chunked(mode: StreamMode, cuts: &[u16], data: &[u8]) -> Result<Vec<Value>, ParseError> {
    let mut parser = DefaultStreamParser::new(mode);
    let mut values = Vec::new();
    let mut rest = data;
    for &cut in cuts {
        if rest.is_empty() {
            break;
        }
        let take = (cut as usize % rest.len()) + 1;
        let (head, tail) = rest.split_at(take);
        values.extend(parser.absorb(head)?);
        rest = tail;
    }
    values.extend(parser.absorb(rest)?);
    values.extend(parser.finish()?);
    Ok(values)
}

fn run_whole(mode: StreamMode, data: &[u8]) -> Result<Vec<Value>, ParseError> {
    let mut parser = DefaultStreamParser::new(mode);
    let mut values = parser.absorb(data)?;
    values.extend(parser.finish()?);
    Ok(values)
}

fuzz_target!(|input: (u8, Vec<u16>, &[u8])| {
    let (mode, cuts, data) = input;
    let mode = match mode % 3 {
        0 => StreamMode::UnwrapArray,
        1 => StreamMode::ValueStream,
        _ => StreamMode::SingleValue,
    };
    let chunked = run_chunked(mode, &cuts, data);
    let whole = run_whole(mode, data);
    assert_eq!(chunked.is_ok(), whole.is_ok());
    if let (Ok(a), Ok(b)) = (chunked, whole) {
        assert_eq!(a, b);
    }
});
