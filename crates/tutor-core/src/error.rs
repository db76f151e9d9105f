//! Error types for tutor-core.
//!
//! Uses `thiserror` for structured, matchable error variants. [`ExprError`]
//! covers parsing of plotted expressions; [`PlotError`] covers the whole
//! plot pipeline from request validation to PNG encoding.

use thiserror::Error;

/// Errors produced while parsing an allow-listed expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// The input does not contain an `f(x) = ...` definition.
    #[error("Invalid function format. Use f(x) = ...")]
    InvalidFormat,

    /// Nothing to parse after trimming.
    #[error("empty expression")]
    Empty,

    /// A character that no token starts with.
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    /// A numeric literal that does not parse as `f64`.
    #[error("invalid number '{text}' at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    /// An identifier outside the allow-list.
    #[error("name '{name}' is not defined")]
    UnknownName { name: String },

    /// A token in a position the grammar does not allow.
    #[error("unexpected '{found}' at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    /// Input ended in the middle of an expression.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// An allow-listed function called with the wrong number of arguments.
    #[error("{name}() takes exactly one argument ({got} given)")]
    Arity { name: String, got: usize },

    /// A constant or the variable used as a function.
    #[error("'{name}' is not callable")]
    NotCallable { name: String },

    /// A function name used without a call.
    #[error("function '{name}' must be called with an argument")]
    MissingCall { name: String },

    /// Parentheses, calls, signs or powers nested past the parser's limit.
    #[error("expression is nested too deeply (limit {max})")]
    TooDeep { max: usize },

    /// More tokens than the parser accepts.
    #[error("expression is too long (limit {max} tokens)")]
    TooLong { max: usize },
}

/// Errors produced by the plot pipeline.
#[derive(Debug, Error)]
pub enum PlotError {
    /// No `f(x) = ...` definition in the request text.
    #[error("Invalid function format. Use f(x) = ...")]
    InvalidFormat,

    /// `x_min` / `x_max` (or their distance) are not finite numbers.
    #[error("x_min and x_max must be finite numbers")]
    NonFiniteDomain,

    /// `x_min >= x_max`.
    #[error("x_min must be less than x_max")]
    EmptyDomain,

    /// The expression could not be parsed.
    #[error("Error evaluating function: {0}")]
    Evaluation(ExprError),

    /// Every sample was NaN or infinite.
    #[error("Error evaluating function: function has no finite values on the requested domain")]
    NoFiniteValues,

    /// The charting backend failed.
    #[error("plot rendering failed: {0}")]
    Render(String),

    /// PNG encoding failed.
    #[error("plot encoding failed: {0}")]
    Encode(String),
}

impl PlotError {
    /// Whether the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PlotError::Render(_) | PlotError::Encode(_))
    }
}

impl From<ExprError> for PlotError {
    fn from(err: ExprError) -> Self {
        match err {
            ExprError::InvalidFormat => PlotError::InvalidFormat,
            other => PlotError::Evaluation(other),
        }
    }
}
