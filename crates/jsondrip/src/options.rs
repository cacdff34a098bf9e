/// Determines how multiple top-level JSON values in one input are
/// interpreted.
///
/// The mode is fixed at construction, with one exception: under
/// [`UnwrapArray`], an input whose first non-whitespace byte is not `[`
/// downgrades the parser to [`SingleValue`] before any value is parsed.
///
/// [`UnwrapArray`]: StreamMode::UnwrapArray
/// [`SingleValue`]: StreamMode::SingleValue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamMode {
    /// If the input is one outer JSON array, emit its elements one by one as
    /// they complete and require the closing `]`. Any other input is treated
    /// as a single value.
    ///
    /// This suits long server responses shaped as one large array, where the
    /// caller wants elements without waiting for the final byte.
    UnwrapArray,
    /// Zero or more whitespace-separated JSON values, emitted in order. This
    /// covers JSON Lines and arbitrary concatenations of values.
    ValueStream,
    /// Exactly one JSON value followed by optional whitespace; any further
    /// non-whitespace input is an error.
    #[default]
    SingleValue,
}
