//! The incremental streaming parser.
//!
//! [`StreamParser`] absorbs byte chunks of arbitrary size and emits each
//! top-level JSON value as soon as its final byte has been seen. Between
//! values an outer state machine enforces the selected [`StreamMode`]; within
//! a value the grammar layer in [`grammar`] does the recursive descent.
//!
//! Running out of buffered bytes mid-value is not an error: the grammar layer
//! records a checkpoint at every recoverable position and reports a suspend,
//! which the drive loop turns into "return the values produced so far". The
//! next [`absorb`] call resumes from the checkpoint.
//!
//! [`absorb`]: StreamParser::absorb

mod grammar;

use alloc::vec::Vec;
use core::fmt;

use crate::{
    builder::JsonBuilder,
    byte_buffer::ByteBuffer,
    error::{ParseError, SyntaxError},
    options::StreamMode,
    position::LineTracker,
    value::StdBuilder,
};

use grammar::{preceding_comma, GrammarState};

/// Control-flow escape used by every buffer read in the grammar layer.
///
/// `Suspend` never crosses the public boundary; it is caught by the drive
/// loop and means "the buffer has no more bytes, but the caller may provide
/// more".
#[derive(Debug)]
pub(crate) enum Interrupt {
    Suspend,
    Fail(ParseError),
}

pub(crate) type Scan<T> = Result<T, Interrupt>;

/// Driver position between top-level values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OuterState {
    /// Unwrap mode, before the opening `[` has been seen.
    Prestart,
    /// Inside the outer array, right after `[`.
    Start,
    /// Ready for the next value: after `,` in the outer array, or between
    /// the values of a stream.
    Preval,
    /// After an element of the outer array; `,`, `]`, or whitespace follow.
    Postval,
    /// Only trailing whitespace is legal.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outer(OuterState),
    Grammar(GrammarState),
}

/// One open container enclosing the current parse position, innermost last
/// on the stack.
pub(crate) enum Frame<B: JsonBuilder> {
    Array(B::Frame),
    Object(B::Frame),
}

impl<B: JsonBuilder> Clone for Frame<B>
where
    B::Frame: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Frame::Array(ctx) => Frame::Array(ctx.clone()),
            Frame::Object(ctx) => Frame::Object(ctx.clone()),
        }
    }
}

impl<B: JsonBuilder> fmt::Debug for Frame<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Frame::Array(_) => "Array",
            Frame::Object(_) => "Object",
        })
    }
}

/// Incremental, resumable JSON parser emitting complete top-level values.
///
/// The parser is a pure state machine over caller-supplied bytes: it does no
/// I/O, keeps no global state, and all mutation goes through `&mut self`.
/// Emission is in strict input order, within and across calls.
///
/// # Examples
///
/// ```rust
/// use jsondrip::{DefaultStreamParser, StreamMode};
///
/// let mut parser = DefaultStreamParser::new(StreamMode::UnwrapArray);
/// let mut values = parser.absorb("[1, 2,").unwrap();
/// values.extend(parser.absorb(" 3]").unwrap());
/// parser.finish().unwrap();
/// assert_eq!(values.len(), 3);
/// ```
pub struct StreamParser<B: JsonBuilder> {
    builder: B,
    buf: ByteBuffer,
    tracker: LineTracker,
    state: State,
    /// Offset of the next unexamined byte; doubles as the grammar resume
    /// checkpoint.
    curr: usize,
    stack: Vec<Frame<B>>,
    mode: StreamMode,
}

/// [`StreamParser`] over the crate's own [`Value`](crate::Value)
/// representation.
pub type DefaultStreamParser = StreamParser<StdBuilder>;

impl<B: JsonBuilder + Default> StreamParser<B> {
    /// Creates a parser using the builder's default instance.
    #[must_use]
    pub fn new(mode: StreamMode) -> Self {
        Self::with_builder(mode, B::default())
    }
}

impl<B: JsonBuilder> StreamParser<B> {
    /// Creates a parser producing values through `builder`.
    #[must_use]
    pub fn with_builder(mode: StreamMode, builder: B) -> Self {
        Self {
            builder,
            buf: ByteBuffer::new(),
            tracker: LineTracker::new(),
            state: State::Outer(match mode {
                StreamMode::UnwrapArray => OuterState::Prestart,
                StreamMode::ValueStream | StreamMode::SingleValue => OuterState::Preval,
            }),
            curr: 0,
            stack: Vec::new(),
            mode,
        }
    }

    /// Feeds a chunk of input and returns the values completed by it.
    ///
    /// Values emitted by earlier calls are not repeated; concatenating the
    /// returned lists across calls yields the same sequence a single-call
    /// parse would have produced. Absorbing after [`finish`] is a contract
    /// violation with unspecified results.
    ///
    /// [`finish`]: StreamParser::finish
    ///
    /// # Errors
    ///
    /// Returns the first grammatical violation found. After an error the
    /// instance should be discarded; its future behavior is unspecified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsondrip::{DefaultStreamParser, StreamMode};
    ///
    /// let mut parser = DefaultStreamParser::new(StreamMode::SingleValue);
    /// assert!(parser.absorb("[1, ").unwrap().is_empty());
    /// let values = parser.absorb("2]").unwrap();
    /// assert_eq!(values.len(), 1);
    /// assert_eq!(values[0].to_string(), "[1,2]");
    /// ```
    pub fn absorb(&mut self, chunk: impl AsRef<[u8]>) -> Result<Vec<B::Value>, ParseError> {
        self.buf.clear_done();
        self.buf.extend(chunk.as_ref());
        self.churn()
    }

    /// Signals end of input and returns any remaining values.
    ///
    /// # Errors
    ///
    /// Returns a truncation error when the input stops mid-value, and any
    /// grammatical violation found in the remaining bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsondrip::{DefaultStreamParser, StreamMode, Value};
    ///
    /// let mut parser = DefaultStreamParser::new(StreamMode::ValueStream);
    /// // A number at the end of the buffer could still grow more digits, so
    /// // it is only emitted once the input is known to be complete.
    /// assert!(parser.absorb("42").unwrap().is_empty());
    /// assert_eq!(parser.finish().unwrap(), vec![Value::Number(42.0)]);
    /// ```
    pub fn finish(&mut self) -> Result<Vec<B::Value>, ParseError> {
        self.buf.mark_done();
        self.churn()
    }

    /// Returns an independent deep copy of the parser, buffer included.
    ///
    /// Forking an in-flight parse lets a caller explore speculative input
    /// without disturbing the original.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsondrip::{DefaultStreamParser, StreamMode};
    ///
    /// let mut parser = DefaultStreamParser::new(StreamMode::SingleValue);
    /// parser.absorb("[1, ").unwrap();
    /// let mut fork = parser.snapshot();
    /// assert!(parser.finish().is_err()); // truncated
    /// assert_eq!(fork.absorb("2]").unwrap().len(), 1);
    /// ```
    #[must_use]
    pub fn snapshot(&self) -> Self
    where
        B: Clone,
        B::Frame: Clone,
    {
        self.clone()
    }

    /// The drive loop: alternates between the outer byte scan and the
    /// grammar layer until the buffer drains or an error surfaces.
    fn churn(&mut self) -> Result<Vec<B::Value>, ParseError> {
        let mut emitted = Vec::new();
        loop {
            match self.state {
                State::Outer(outer) => {
                    let Some(b) = self.buf.byte(self.curr) else {
                        return self.drained(emitted);
                    };
                    match b {
                        b' ' | b'\t' | b'\r' => self.curr += 1,
                        b'\n' => {
                            self.tracker.newline(self.curr);
                            self.curr += 1;
                        }
                        b'[' => match outer {
                            OuterState::Prestart => {
                                self.curr += 1;
                                self.state = State::Outer(OuterState::Start);
                            }
                            OuterState::End => return Err(self.outer_error("expected eof")),
                            OuterState::Postval => {
                                return Err(self.outer_error("expected , or ]"));
                            }
                            // The `[` opens a value, not the outer array; it
                            // stays unconsumed for the grammar layer.
                            OuterState::Start | OuterState::Preval => {
                                self.state = State::Grammar(GrammarState::Value);
                            }
                        },
                        b',' => match outer {
                            OuterState::Postval => {
                                self.curr += 1;
                                self.state = State::Outer(OuterState::Preval);
                            }
                            OuterState::End => return Err(self.outer_error("expected eof")),
                            _ => return Err(self.outer_error("expected json value")),
                        },
                        b']' => match outer {
                            OuterState::Postval | OuterState::Start
                                if self.mode == StreamMode::UnwrapArray =>
                            {
                                self.curr += 1;
                                self.state = State::Outer(OuterState::End);
                            }
                            OuterState::End => return Err(self.outer_error("expected eof")),
                            _ => {
                                // The close after a comma faults the comma.
                                let at = preceding_comma(&self.buf, self.curr)
                                    .unwrap_or(self.curr);
                                return Err(self.outer_error_at("expected json value", at));
                            }
                        },
                        _ => match outer {
                            OuterState::End => return Err(self.outer_error("expected eof")),
                            OuterState::Postval => {
                                return Err(self.outer_error("expected ] or ,"));
                            }
                            _ => {
                                // The outer value is not an array after all:
                                // downgrade and parse it as a single value.
                                if outer == OuterState::Prestart
                                    && self.mode == StreamMode::UnwrapArray
                                {
                                    self.mode = StreamMode::SingleValue;
                                }
                                self.state = State::Grammar(GrammarState::Value);
                            }
                        },
                    }
                }
                State::Grammar(state) => {
                    let compacted = self.buf.compact(self.curr);
                    if compacted != self.curr {
                        self.tracker.rebase(self.curr - compacted);
                        self.curr = compacted;
                    }
                    match self.run_grammar(state) {
                        Ok((value, next)) => {
                            self.curr = next;
                            self.stack.clear();
                            emitted.push(value);
                            self.state = State::Outer(match self.mode {
                                StreamMode::UnwrapArray => OuterState::Postval,
                                StreamMode::ValueStream => OuterState::Preval,
                                StreamMode::SingleValue => OuterState::End,
                            });
                        }
                        Err(Interrupt::Suspend) => return self.drained(emitted),
                        Err(Interrupt::Fail(err)) => return Err(err),
                    }
                }
            }
        }
    }

    /// The buffer ran out while a value or delimiter was still expected.
    fn drained(&self, emitted: Vec<B::Value>) -> Result<Vec<B::Value>, ParseError> {
        if !self.buf.is_done() {
            return Ok(emitted);
        }
        match self.state {
            State::Outer(OuterState::Preval | OuterState::End) => Ok(emitted),
            _ => Err(ParseError::unpositioned(SyntaxError::ExhaustedInput)),
        }
    }

    fn outer_error(&self, msg: &'static str) -> ParseError {
        self.outer_error_at(msg, self.curr)
    }

    fn outer_error_at(&self, msg: &'static str, at: usize) -> ParseError {
        ParseError::at(SyntaxError::Grammar(msg), at, &self.tracker)
    }

    /// Persists the grammar resume point. Called before every read that may
    /// suspend, so that `(state, curr, stack)` is always enough to continue.
    #[inline(always)]
    pub(crate) fn checkpoint(&mut self, state: GrammarState, i: usize) {
        self.state = State::Grammar(state);
        self.curr = i;
    }
}

impl<B> Clone for StreamParser<B>
where
    B: JsonBuilder + Clone,
    B::Frame: Clone,
{
    fn clone(&self) -> Self {
        Self {
            builder: self.builder.clone(),
            buf: self.buf.clone(),
            tracker: self.tracker,
            state: self.state,
            curr: self.curr,
            stack: self.stack.clone(),
            mode: self.mode,
        }
    }
}

impl<B: JsonBuilder> fmt::Debug for StreamParser<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamParser")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("curr", &self.curr)
            .field("buffered", &self.buf.len())
            .field("depth", &self.stack.len())
            .finish()
    }
}
