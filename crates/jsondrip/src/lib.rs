//! Incremental, resumable JSON parsing that emits complete values as their
//! bytes arrive.
//!
//! A [`StreamParser`] accepts JSON input as byte chunks of arbitrary size and
//! hands back fully parsed values as soon as each value's final byte has been
//! seen. A [`StreamMode`] selects how multiple top-level values are
//! interpreted: a single value, a whitespace-separated stream of values, or
//! the elements of one outer array unwrapped into a stream.
//!
//! The parser is polymorphic over a [`JsonBuilder`], so it never commits to a
//! concrete value representation; [`StdBuilder`] provides the crate's own
//! [`Value`] enum as a ready-made default.
//!
//! # Examples
//!
//! ```rust
//! use jsondrip::{DefaultStreamParser, StreamMode};
//!
//! let mut parser = DefaultStreamParser::new(StreamMode::ValueStream);
//! let mut values = parser.absorb("{\"a\": 1} [2, 3").unwrap();
//! values.extend(parser.absorb("] 4").unwrap());
//! values.extend(parser.finish().unwrap());
//! assert_eq!(values.len(), 3);
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod builder;
mod byte_buffer;
mod error;
mod options;
mod parser;
mod position;
mod value;

#[doc(hidden)]
pub mod chunk_utils;

pub use builder::JsonBuilder;
pub use error::{ParseError, SyntaxError};
pub use options::StreamMode;
pub use parser::{DefaultStreamParser, StreamParser};
pub use value::{Array, Map, StdBuilder, StdFrame, Value};

#[cfg(test)]
mod tests;
