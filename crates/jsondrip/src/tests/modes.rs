use alloc::{string::ToString, vec, vec::Vec};

use crate::{DefaultStreamParser, StreamMode, SyntaxError, Value};

fn collect(mode: StreamMode, chunks: &[&str]) -> Vec<Value> {
    let mut parser = DefaultStreamParser::new(mode);
    let mut values = Vec::new();
    for &chunk in chunks {
        values.extend(parser.absorb(chunk).unwrap());
    }
    values.extend(parser.finish().unwrap());
    values
}

#[test]
fn single_value_array_across_chunks() {
    let mut parser = DefaultStreamParser::new(StreamMode::SingleValue);
    assert!(parser.absorb("[\"a\",").unwrap().is_empty());
    let values = parser.absorb("1,true]").unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].to_string(), "[\"a\",1,true]");
    assert!(parser.finish().unwrap().is_empty());
}

#[test]
fn single_value_number_needs_finish() {
    let mut parser = DefaultStreamParser::new(StreamMode::SingleValue);
    assert!(parser.absorb("42").unwrap().is_empty());
    assert_eq!(parser.finish().unwrap(), vec![Value::Number(42.0)]);
}

#[test]
fn value_stream_emits_in_input_order() {
    let mut parser = DefaultStreamParser::new(StreamMode::ValueStream);
    assert_eq!(parser.absorb("1 2").unwrap(), vec![Value::Number(1.0)]);
    assert_eq!(parser.absorb(" 3").unwrap(), vec![Value::Number(2.0)]);
    assert_eq!(parser.finish().unwrap(), vec![Value::Number(3.0)]);
}

#[test]
fn unwrap_array_emits_elements() {
    let mut parser = DefaultStreamParser::new(StreamMode::UnwrapArray);
    assert_eq!(parser.absorb("[1,").unwrap(), vec![Value::Number(1.0)]);
    assert_eq!(
        parser.absorb("2, 3]").unwrap(),
        vec![Value::Number(2.0), Value::Number(3.0)]
    );
    assert!(parser.finish().unwrap().is_empty());
}

#[test]
fn unwrap_array_downgrades_on_non_array() {
    let values = collect(StreamMode::UnwrapArray, &["{\"k\":1}"]);
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].to_string(), "{\"k\":1}");
}

#[test]
fn unwrap_array_downgrade_rejects_second_value() {
    let mut parser = DefaultStreamParser::new(StreamMode::UnwrapArray);
    let err = parser.absorb("1 2").unwrap_err();
    assert_eq!(err.kind, SyntaxError::Grammar("expected eof"));
}

#[test]
fn unwrap_array_elements_may_be_arrays() {
    // The second `[` opens a value, not the outer array.
    assert_eq!(
        collect(StreamMode::UnwrapArray, &["[[1], [2, [3]]]"]),
        vec![
            Value::Array(vec![Value::Number(1.0)]),
            Value::Array(vec![
                Value::Number(2.0),
                Value::Array(vec![Value::Number(3.0)]),
            ]),
        ]
    );
}

#[test]
fn unwrap_array_accepts_leading_whitespace() {
    assert_eq!(
        collect(StreamMode::UnwrapArray, &[" \n\t[ 1 , 2 ]\n"]),
        vec![Value::Number(1.0), Value::Number(2.0)]
    );
}

#[test]
fn unwrap_empty_array_emits_nothing() {
    assert!(collect(StreamMode::UnwrapArray, &["[]"]).is_empty());
}

#[test]
fn unwrap_array_requires_closing_bracket() {
    let mut parser = DefaultStreamParser::new(StreamMode::UnwrapArray);
    parser.absorb("[1, 2").unwrap();
    let err = parser.finish().unwrap_err();
    assert_eq!(err.kind, SyntaxError::ExhaustedInput);
}

#[test]
fn unwrap_array_rejects_content_after_close() {
    let mut parser = DefaultStreamParser::new(StreamMode::UnwrapArray);
    let err = parser.absorb("[1] 2").unwrap_err();
    assert_eq!(err.kind, SyntaxError::Grammar("expected eof"));
}

#[test]
fn unwrap_array_rejects_leading_comma() {
    let mut parser = DefaultStreamParser::new(StreamMode::UnwrapArray);
    let err = parser.absorb("[,").unwrap_err();
    assert_eq!(err.kind, SyntaxError::Grammar("expected json value"));
}

#[test]
fn unwrap_array_rejects_missing_separator() {
    let mut parser = DefaultStreamParser::new(StreamMode::UnwrapArray);
    let err = parser.absorb("[1 2]").unwrap_err();
    assert_eq!(err.kind, SyntaxError::Grammar("expected ] or ,"));
}

#[test]
fn unwrap_array_rejects_nested_open_after_element() {
    let mut parser = DefaultStreamParser::new(StreamMode::UnwrapArray);
    let err = parser.absorb("[1 [").unwrap_err();
    assert_eq!(err.kind, SyntaxError::Grammar("expected , or ]"));
}

#[test]
fn value_stream_accepts_empty_input() {
    assert!(collect(StreamMode::ValueStream, &[""]).is_empty());
}

#[test]
fn value_stream_handles_adjacent_containers() {
    assert_eq!(
        collect(StreamMode::ValueStream, &["{}{}[]"]).len(),
        3
    );
}

#[test]
fn value_stream_rejects_comma_separators() {
    let mut parser = DefaultStreamParser::new(StreamMode::ValueStream);
    let err = parser.absorb("1,2").unwrap_err();
    assert_eq!(err.kind, SyntaxError::Grammar("expected json value"));
}

#[test]
fn value_stream_parses_json_lines() {
    let values = collect(
        StreamMode::ValueStream,
        &["{\"n\":1}\n{\"n\"", ":2}\n{\"n\":3}\n"],
    );
    assert_eq!(values.len(), 3);
    assert_eq!(values[2].to_string(), "{\"n\":3}");
}

#[test]
fn single_value_accepts_trailing_whitespace() {
    assert_eq!(
        collect(StreamMode::SingleValue, &["false \n\t "]),
        vec![Value::Boolean(false)]
    );
}

#[test]
fn empty_input_is_empty_output() {
    // No value is not a truncated value.
    assert!(collect(StreamMode::SingleValue, &[]).is_empty());
    assert!(collect(StreamMode::ValueStream, &[]).is_empty());
}

#[test]
fn unwrap_array_empty_input_is_truncation() {
    let mut parser = DefaultStreamParser::new(StreamMode::UnwrapArray);
    let err = parser.finish().unwrap_err();
    assert_eq!(err.kind, SyntaxError::ExhaustedInput);
}
