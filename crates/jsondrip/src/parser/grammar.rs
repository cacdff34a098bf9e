//! The synchronous recursive-descent core.
//!
//! Given the byte buffer and a start offset, this layer parses exactly one
//! JSON value and reports the offset immediately past it. Every buffer read
//! returns a [`Scan`], so running out of buffered bytes propagates as
//! [`Interrupt::Suspend`] by early return rather than by unwinding.
//!
//! The machine keeps no private state across a suspend. Before every read
//! that may suspend, the current `(state, offset)` pair is persisted through
//! [`StreamParser::checkpoint`]; the open-container stack already lives on
//! the driver. Mid-token progress is deliberately discarded: a token that
//! suspends re-scans from its checkpointed start once more bytes arrive.

use alloc::{borrow::Cow, string::String, vec::Vec};

use crate::{
    builder::JsonBuilder,
    byte_buffer::ByteBuffer,
    error::{ParseError, SyntaxError},
    position::LineTracker,
};

use super::{Frame, Interrupt, Scan, StreamParser};

/// Grammar positions at which a suspended parse can resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GrammarState {
    /// Before a value: a fresh top-level entry, after `:`, or after `,` in
    /// an array.
    Value,
    /// Right after `[`: the first element or `]`.
    ArrayFirst,
    /// Right after `{`: the first key or `}`.
    ObjectFirst,
    /// Before an object key.
    Key,
    /// After an object key, before its `:`.
    Colon,
    /// After an array element: `,` or `]`.
    AfterElement,
    /// After an object member: `,` or `}`.
    AfterMember,
}

impl<B: JsonBuilder> StreamParser<B> {
    /// Parses one JSON value starting from the stored checkpoint, returning
    /// the value and the offset immediately past it.
    pub(super) fn run_grammar(&mut self, mut state: GrammarState) -> Scan<(B::Value, usize)> {
        let mut i = self.curr;
        loop {
            self.checkpoint(state, i);
            let (j, b) = self.skip_whitespace(i)?;
            i = j;
            match state {
                GrammarState::Value => {
                    let value = match b {
                        b'[' => {
                            let ctx = self.builder.begin_array();
                            self.stack.push(Frame::Array(ctx));
                            state = GrammarState::ArrayFirst;
                            i += 1;
                            continue;
                        }
                        b'{' => {
                            let ctx = self.builder.begin_object();
                            self.stack.push(Frame::Object(ctx));
                            state = GrammarState::ObjectFirst;
                            i += 1;
                            continue;
                        }
                        b'"' => {
                            let (text, j) = scan_string(&self.buf, &self.tracker, i)?;
                            i = j;
                            self.builder.string(&text)
                        }
                        b't' => {
                            i = scan_literal(&self.buf, &self.tracker, i, b"true")?;
                            self.builder.boolean(true)
                        }
                        b'f' => {
                            i = scan_literal(&self.buf, &self.tracker, i, b"false")?;
                            self.builder.boolean(false)
                        }
                        b'n' => {
                            i = scan_literal(&self.buf, &self.tracker, i, b"null")?;
                            self.builder.null()
                        }
                        b'-' | b'0'..=b'9' => {
                            let (literal, fraction, j) =
                                scan_number(&self.buf, &self.tracker, i)?;
                            i = j;
                            self.builder.number(literal, fraction)
                        }
                        _ => {
                            // A closing delimiter where an element was
                            // required is the fault of the comma that
                            // demanded it.
                            let at = match b {
                                b']' | b'}' => preceding_comma(&self.buf, i).unwrap_or(i),
                                _ => i,
                            };
                            return Err(fail(
                                &self.tracker,
                                SyntaxError::Grammar("expected json value"),
                                at,
                            ));
                        }
                    };
                    match self.settle(value) {
                        Ok(next) => state = next,
                        Err(root) => return Ok((root, i)),
                    }
                }

                GrammarState::ArrayFirst => {
                    if b == b']' {
                        i += 1;
                        let value = self.finish_array(i)?;
                        match self.settle(value) {
                            Ok(next) => state = next,
                            Err(root) => return Ok((root, i)),
                        }
                    } else {
                        state = GrammarState::Value;
                    }
                }

                GrammarState::ObjectFirst => match b {
                    b'}' => {
                        i += 1;
                        let value = self.finish_object(i)?;
                        match self.settle(value) {
                            Ok(next) => state = next,
                            Err(root) => return Ok((root, i)),
                        }
                    }
                    b'"' => state = GrammarState::Key,
                    _ => {
                        return Err(fail(
                            &self.tracker,
                            SyntaxError::Grammar("expected object key or }"),
                            i,
                        ));
                    }
                },

                GrammarState::Key => {
                    if b != b'"' {
                        let at = if b == b'}' {
                            preceding_comma(&self.buf, i).unwrap_or(i)
                        } else {
                            i
                        };
                        return Err(fail(
                            &self.tracker,
                            SyntaxError::Grammar("expected object key"),
                            at,
                        ));
                    }
                    let (key, j) = scan_string(&self.buf, &self.tracker, i)?;
                    match self.stack.last_mut() {
                        Some(Frame::Object(ctx)) => self.builder.add_key(ctx, &key),
                        _ => {
                            return Err(fail(
                                &self.tracker,
                                SyntaxError::Grammar("object key outside object"),
                                i,
                            ));
                        }
                    }
                    i = j;
                    state = GrammarState::Colon;
                }

                GrammarState::Colon => {
                    if b != b':' {
                        return Err(fail(&self.tracker, SyntaxError::Grammar("expected :"), i));
                    }
                    i += 1;
                    state = GrammarState::Value;
                }

                GrammarState::AfterElement => match b {
                    b',' => {
                        i += 1;
                        state = GrammarState::Value;
                    }
                    b']' => {
                        i += 1;
                        let value = self.finish_array(i)?;
                        match self.settle(value) {
                            Ok(next) => state = next,
                            Err(root) => return Ok((root, i)),
                        }
                    }
                    _ => {
                        return Err(fail(
                            &self.tracker,
                            SyntaxError::Grammar("expected , or ]"),
                            i,
                        ));
                    }
                },

                GrammarState::AfterMember => match b {
                    b',' => {
                        i += 1;
                        state = GrammarState::Key;
                    }
                    b'}' => {
                        i += 1;
                        let value = self.finish_object(i)?;
                        match self.settle(value) {
                            Ok(next) => state = next,
                            Err(root) => return Ok((root, i)),
                        }
                    }
                    _ => {
                        return Err(fail(
                            &self.tracker,
                            SyntaxError::Grammar("expected , or }"),
                            i,
                        ));
                    }
                },
            }
        }
    }

    /// Consumes inter-token whitespace from `i` and returns the first
    /// non-whitespace byte with its offset. Advances the checkpoint as it
    /// goes so that consumed newlines are never counted twice.
    fn skip_whitespace(&mut self, mut i: usize) -> Scan<(usize, u8)> {
        loop {
            match self.buf.byte(i) {
                Some(b' ' | b'\t' | b'\r') => {
                    i += 1;
                    self.curr = i;
                }
                Some(b'\n') => {
                    self.tracker.newline(i);
                    i += 1;
                    self.curr = i;
                }
                Some(b) => return Ok((i, b)),
                None => return Err(Interrupt::Suspend),
            }
        }
    }

    /// Feeds a finished value into the innermost open container and reports
    /// the grammar state that follows it, or gives the value back when no
    /// container is open and the top-level value is complete.
    fn settle(&mut self, value: B::Value) -> Result<GrammarState, B::Value> {
        match self.stack.last_mut() {
            Some(Frame::Array(ctx)) => {
                self.builder.add_value(ctx, value);
                Ok(GrammarState::AfterElement)
            }
            Some(Frame::Object(ctx)) => {
                self.builder.add_value(ctx, value);
                Ok(GrammarState::AfterMember)
            }
            None => Err(value),
        }
    }

    fn finish_array(&mut self, i: usize) -> Scan<B::Value> {
        match self.stack.pop() {
            Some(Frame::Array(ctx)) => Ok(self.builder.finish(ctx)),
            _ => Err(fail(&self.tracker, SyntaxError::Grammar("unbalanced ]"), i)),
        }
    }

    fn finish_object(&mut self, i: usize) -> Scan<B::Value> {
        match self.stack.pop() {
            Some(Frame::Object(ctx)) => Ok(self.builder.finish(ctx)),
            _ => Err(fail(&self.tracker, SyntaxError::Grammar("unbalanced }"), i)),
        }
    }
}

#[inline(always)]
fn byte_at(buf: &ByteBuffer, i: usize) -> Scan<u8> {
    buf.byte(i).ok_or(Interrupt::Suspend)
}

/// Offset of the comma directly before `i`, looking back across same-line
/// whitespace only. Past a newline the tracker has moved on and a position
/// on an earlier line would no longer satisfy the line/column contract.
pub(super) fn preceding_comma(buf: &ByteBuffer, i: usize) -> Option<usize> {
    let mut k = i;
    while k > 0 {
        k -= 1;
        match buf.byte(k) {
            Some(b' ' | b'\t' | b'\r') => {}
            Some(b',') => return Some(k),
            _ => return None,
        }
    }
    None
}

fn fail(tracker: &LineTracker, kind: SyntaxError, i: usize) -> Interrupt {
    Interrupt::Fail(ParseError::at(kind, i, tracker))
}

/// Scans the string literal whose opening quote is at `i` and returns the
/// decoded text with the offset past the closing quote. The fast path
/// borrows the unescaped span straight from the buffer; the first backslash
/// falls back to an owned decode.
fn scan_string<'b>(
    buf: &'b ByteBuffer,
    tracker: &LineTracker,
    i: usize,
) -> Scan<(Cow<'b, str>, usize)> {
    let start = i + 1;
    let mut j = start;
    loop {
        match byte_at(buf, j)? {
            b'"' => {
                let text = buf
                    .slice(start, j)
                    .ok_or_else(|| fail(tracker, SyntaxError::InvalidUtf8, start))?;
                return Ok((Cow::Borrowed(text), j + 1));
            }
            b'\\' => return scan_string_slow(buf, tracker, start, j),
            b if b < 0x20 => return Err(fail(tracker, SyntaxError::ControlCharacter, j)),
            _ => j += 1,
        }
    }
}

/// Escape-bearing slow path. `esc` is the offset of the first backslash; the
/// plain prefix `[start, esc)` seeds the owned output.
fn scan_string_slow<'b>(
    buf: &'b ByteBuffer,
    tracker: &LineTracker,
    start: usize,
    esc: usize,
) -> Scan<(Cow<'b, str>, usize)> {
    let mut out = Vec::with_capacity(esc - start + 16);
    out.extend_from_slice(buf.raw(start, esc));
    let mut j = esc;
    loop {
        match byte_at(buf, j)? {
            b'"' => {
                let text = String::from_utf8(out)
                    .map_err(|_| fail(tracker, SyntaxError::InvalidUtf8, start))?;
                return Ok((Cow::Owned(text), j + 1));
            }
            b'\\' => match byte_at(buf, j + 1)? {
                b'"' => {
                    out.push(b'"');
                    j += 2;
                }
                b'\\' => {
                    out.push(b'\\');
                    j += 2;
                }
                b'/' => {
                    out.push(b'/');
                    j += 2;
                }
                b'b' => {
                    out.push(0x08);
                    j += 2;
                }
                b'f' => {
                    out.push(0x0C);
                    j += 2;
                }
                b'n' => {
                    out.push(b'\n');
                    j += 2;
                }
                b'r' => {
                    out.push(b'\r');
                    j += 2;
                }
                b't' => {
                    out.push(b'\t');
                    j += 2;
                }
                b'u' => {
                    let (ch, next) = scan_unicode_escape(buf, tracker, j)?;
                    let mut utf8 = [0u8; 4];
                    out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                    j = next;
                }
                other => {
                    return Err(fail(tracker, SyntaxError::InvalidEscape(other as char), j + 1));
                }
            },
            b if b < 0x20 => return Err(fail(tracker, SyntaxError::ControlCharacter, j)),
            _ => {
                // Bulk-copy the plain run up to the next delimiter or the end
                // of the buffered bytes.
                let run = j;
                while let Some(b) = buf.byte(j) {
                    if b == b'"' || b == b'\\' || b < 0x20 {
                        break;
                    }
                    j += 1;
                }
                out.extend_from_slice(buf.raw(run, j));
            }
        }
    }
}

/// Decodes `\uXXXX`, combining a surrogate pair into one code point, from
/// the backslash offset `j`. Returns the character and the offset past the
/// escape.
fn scan_unicode_escape(buf: &ByteBuffer, tracker: &LineTracker, j: usize) -> Scan<(char, usize)> {
    let hi = scan_hex4(buf, tracker, j + 2)?;
    if (0xDC00..=0xDFFF).contains(&hi) {
        return Err(fail(tracker, SyntaxError::UnpairedSurrogate(hi), j + 2));
    }
    if (0xD800..=0xDBFF).contains(&hi) {
        if byte_at(buf, j + 6)? != b'\\' || byte_at(buf, j + 7)? != b'u' {
            return Err(fail(tracker, SyntaxError::UnpairedSurrogate(hi), j + 6));
        }
        let lo = scan_hex4(buf, tracker, j + 8)?;
        if !(0xDC00..=0xDFFF).contains(&lo) {
            return Err(fail(tracker, SyntaxError::UnpairedSurrogate(hi), j + 8));
        }
        let code = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
        let ch = char::from_u32(code)
            .ok_or_else(|| fail(tracker, SyntaxError::UnpairedSurrogate(hi), j + 2))?;
        return Ok((ch, j + 12));
    }
    let ch = char::from_u32(hi)
        .ok_or_else(|| fail(tracker, SyntaxError::UnpairedSurrogate(hi), j + 2))?;
    Ok((ch, j + 6))
}

fn scan_hex4(buf: &ByteBuffer, tracker: &LineTracker, i: usize) -> Scan<u32> {
    let mut value = 0u32;
    for k in 0..4 {
        let b = byte_at(buf, i + k)?;
        let digit = (b as char).to_digit(16).ok_or_else(|| {
            fail(tracker, SyntaxError::InvalidUnicodeEscapeChar(b as char), i + k)
        })?;
        value = (value << 4) | digit;
    }
    Ok(value)
}

/// Matches the exact literal bytes of `true`, `false`, or `null` at `i`.
fn scan_literal(
    buf: &ByteBuffer,
    tracker: &LineTracker,
    i: usize,
    text: &'static [u8],
) -> Scan<usize> {
    for (k, &expected) in text.iter().enumerate() {
        let b = byte_at(buf, i + k)?;
        if b != expected {
            return Err(fail(tracker, SyntaxError::InvalidCharacter(b as char), i + k));
        }
    }
    Ok(i + text.len())
}

/// Scans the number literal starting at `start`; returns its lexical span,
/// whether a fraction or exponent part appeared, and the offset past it.
///
/// A number ending flush with the buffer could still grow more digits, so it
/// terminates there only once the input is known to be complete; otherwise
/// the scan suspends and re-runs when more bytes arrive.
fn scan_number<'b>(
    buf: &'b ByteBuffer,
    tracker: &LineTracker,
    start: usize,
) -> Scan<(&'b str, bool, usize)> {
    let mut i = start;
    let mut fraction_or_exponent = false;

    if buf.byte(i) == Some(b'-') {
        i += 1;
    }
    match buf.byte(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            i += 1;
            while let Some(b'0'..=b'9') = buf.byte(i) {
                i += 1;
            }
        }
        Some(_) => return Err(fail(tracker, SyntaxError::Grammar("expected digit"), i)),
        None => return Err(Interrupt::Suspend),
    }

    if buf.byte(i) == Some(b'.') {
        fraction_or_exponent = true;
        i += 1;
        match buf.byte(i) {
            Some(b'0'..=b'9') => {
                i += 1;
                while let Some(b'0'..=b'9') = buf.byte(i) {
                    i += 1;
                }
            }
            Some(_) => return Err(fail(tracker, SyntaxError::Grammar("expected digit"), i)),
            None => return Err(Interrupt::Suspend),
        }
    }

    if let Some(b'e' | b'E') = buf.byte(i) {
        fraction_or_exponent = true;
        i += 1;
        if let Some(b'+' | b'-') = buf.byte(i) {
            i += 1;
        }
        match buf.byte(i) {
            Some(b'0'..=b'9') => {
                i += 1;
                while let Some(b'0'..=b'9') = buf.byte(i) {
                    i += 1;
                }
            }
            Some(_) => return Err(fail(tracker, SyntaxError::Grammar("expected digit"), i)),
            None => return Err(Interrupt::Suspend),
        }
    }

    if buf.byte(i).is_none() && !buf.is_done() {
        return Err(Interrupt::Suspend);
    }
    let literal = buf
        .slice(start, i)
        .ok_or_else(|| fail(tracker, SyntaxError::InvalidUtf8, start))?;
    Ok((literal, fraction_or_exponent, i))
}
