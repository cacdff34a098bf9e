//! Abstraction over JSON value construction.
//!
//! The parser never builds concrete values. It opens *frames* for arrays and
//! objects, feeds them keys and finished values, and finalizes each frame
//! into a single opaque value when its closing delimiter arrives. Any type
//! implementing [`JsonBuilder`] turns the parser into a producer of that
//! builder's value type.

/// Factory for the values and container frames of one JSON representation.
///
/// Number literals are handed over as their raw lexical span together with a
/// flag telling whether a fraction or exponent part appeared; all numeric
/// interpretation is the builder's business.
pub trait JsonBuilder {
    /// The finished JSON value.
    type Value;
    /// An array or object under construction.
    type Frame;

    fn null(&self) -> Self::Value;
    fn boolean(&self, value: bool) -> Self::Value;
    fn string(&self, text: &str) -> Self::Value;
    fn number(&self, literal: &str, has_fraction_or_exponent: bool) -> Self::Value;

    fn begin_array(&self) -> Self::Frame;
    fn begin_object(&self) -> Self::Frame;

    /// Stages `key` for the next [`add_value`] call. Only ever invoked on
    /// frames created by [`begin_object`], once per member, before the
    /// member's value.
    ///
    /// [`add_value`]: JsonBuilder::add_value
    /// [`begin_object`]: JsonBuilder::begin_object
    fn add_key(&self, frame: &mut Self::Frame, key: &str);

    /// Appends a finished value to the container: the next array element, or
    /// the member named by the most recent [`add_key`].
    ///
    /// Duplicate object keys are passed through as-is; whether the first or
    /// the last occurrence wins is the builder's policy.
    ///
    /// [`add_key`]: JsonBuilder::add_key
    fn add_value(&self, frame: &mut Self::Frame, value: Self::Value);

    /// Finalizes the frame into a single value.
    fn finish(&self, frame: Self::Frame) -> Self::Value;
}
