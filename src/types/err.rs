//! Error types used in the library.
//!
//! - Configuration errors are fatal and surfaced before any encoding is attempted.
//! - Encoding, solver, and decode errors are fatal for the batch in which they
//!   arise; a fit wraps them with the index of that batch.
//! - A solver which produces no solution line is surfaced as an explicit
//!   [SolverError::NoSolutionLine] rather than decoded as an empty assignment,
//!   as the absence signals a timeout or failure of the external process.
//!
//! Names of the error enums --- for the most part --- overlap with corresponding
//  concerns, and so throughout the library err::{self} is used to prefix the types with `err::`.

use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Config(ConfigError),
    Encoding(EncodingError),
    Solver(SolverError),
    Decode(DecodeError),

    /// A failure attributed to a specific training batch, 0-indexed.
    Batch {
        index: usize,
        source: Box<ErrorKind>,
    },

    /// A prediction was requested of a learner with no trained model.
    UntrainedModel,
}

impl ErrorKind {
    /// The error, attributed to the given batch.
    pub fn in_batch(self, index: usize) -> Self {
        ErrorKind::Batch {
            index,
            source: Box::new(self),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration: {e}"),
            Self::Encoding(e) => write!(f, "encoding: {e}"),
            Self::Solver(e) => write!(f, "solver: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Batch { index, source } => write!(f, "batch {index}: {source}"),
            Self::UntrainedModel => write!(f, "no model has been trained"),
        }
    }
}

/// Noted errors in the configuration of a learner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A requested batch count of zero.
    ZeroBatchCount,

    /// A requested batch count which is not a power of two.
    ///
    /// The partitioner bisects recursively, and so is defined only for powers of two.
    BatchCountNotPowerOfTwo(usize),

    /// A requested rule of zero clauses.
    ZeroClauseCount,

    /// The solver executable could not be found.
    MissingSolver(PathBuf),

    /// A schema group claims a column out of order, or not at all.
    SchemaColumnOrder { expected: usize, found: usize },

    /// A schema's label count differs from the columns its groups claim.
    SchemaLabelCount { columns: usize, labels: usize },
}

impl From<ConfigError> for ErrorKind {
    fn from(e: ConfigError) -> Self {
        ErrorKind::Config(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroBatchCount => write!(f, "a batch count of zero"),
            Self::BatchCountNotPowerOfTwo(count) => {
                write!(f, "a batch count of {count}, which is not a power of two")
            }
            Self::ZeroClauseCount => write!(f, "a clause count of zero"),
            Self::MissingSolver(path) => {
                write!(f, "no solver executable at '{}'", path.display())
            }
            Self::SchemaColumnOrder { expected, found } => {
                write!(f, "schema groups claim column {found} where {expected} was expected")
            }
            Self::SchemaLabelCount { columns, labels } => {
                write!(f, "schema groups claim {columns} columns but {labels} labels were given")
            }
        }
    }
}

/// Noted errors while encoding a sample block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodingError {
    /// A feature matrix without columns.
    EmptyFeatureBlock,

    /// A sample block without samples.
    EmptySampleBlock,

    /// A sample count inconsistent with the label count.
    LengthMismatch { samples: usize, labels: usize },

    /// A matrix row whose width differs from the others.
    RowWidth { expected: usize, found: usize },

    /// A matrix whose width differs from the schema's column count.
    SchemaWidth { matrix: usize, schema: usize },
}

impl From<EncodingError> for ErrorKind {
    fn from(e: EncodingError) -> Self {
        ErrorKind::Encoding(e)
    }
}

impl std::fmt::Display for EncodingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFeatureBlock => write!(f, "the feature matrix has no columns"),
            Self::EmptySampleBlock => write!(f, "the sample block is empty"),
            Self::LengthMismatch { samples, labels } => {
                write!(f, "{samples} samples against {labels} labels")
            }
            Self::RowWidth { expected, found } => {
                write!(f, "a row of width {found} in a matrix of width {expected}")
            }
            Self::SchemaWidth { matrix, schema } => {
                write!(f, "a matrix of width {matrix} against a schema of {schema} columns")
            }
        }
    }
}

/// Noted errors while invoking the external solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolverError {
    /// The solver process could not be launched.
    Launch(std::io::ErrorKind),

    /// The problem file could not be written.
    ProblemFile(std::io::ErrorKind),

    /// No line beginning with the solution marker was found in the solver's
    /// output --- a timeout or failure of the solve.
    NoSolutionLine,
}

impl From<SolverError> for ErrorKind {
    fn from(e: SolverError) -> Self {
        ErrorKind::Solver(e)
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Launch(kind) => write!(f, "failed to launch the solver ({kind})"),
            Self::ProblemFile(kind) => write!(f, "failed to write the problem file ({kind})"),
            Self::NoSolutionLine => {
                write!(f, "no solution line in the solver output (timeout or failure)")
            }
        }
    }
}

/// Noted errors while decoding a solution line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer assignment tokens than the variable layout requires.
    TokenCount { expected: usize, found: usize },

    /// A token which does not parse as a signed literal.
    Token(String),

    /// An assignment token out of variable order.
    VariableOrder { position: usize },
}

impl From<DecodeError> for ErrorKind {
    fn from(e: DecodeError) -> Self {
        ErrorKind::Decode(e)
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenCount { expected, found } => {
                write!(f, "{found} assignment tokens where at least {expected} were expected")
            }
            Self::Token(token) => write!(f, "unreadable assignment token '{token}'"),
            Self::VariableOrder { position } => {
                write!(f, "assignment token out of variable order at position {position}")
            }
        }
    }
}
