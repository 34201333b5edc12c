//! Error types for every stage of the depiction pipeline.
//!
//! Degenerate bond geometry has no variant here: an edge whose endpoints
//! are not finite is logged and skipped by [`crate::geometry`], it never
//! surfaces as an error value.

use thiserror::Error;

/// Structural violations of the graph model.
///
/// Ids are positional indices into the vertex and edge sequences, so an id
/// outside the current bounds is a contract violation by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A vertex id does not reference an existing vertex.
    #[error("vertex id {id} out of bounds (graph has {len} vertices)")]
    VertexOutOfBounds { id: usize, len: usize },
    /// An edge id does not reference an existing edge.
    #[error("edge id {id} out of bounds (graph has {len} edges)")]
    EdgeOutOfBounds { id: usize, len: usize },
}

/// The force-directed sub-layout did not produce usable positions.
///
/// Recoverable: the caller is expected to fall back to a cruder placement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The energy grew beyond the configured ceiling or became non-finite.
    #[error("force layout diverged: energy {energy} exceeds ceiling {max_energy}")]
    Diverged { energy: f64, max_energy: f64 },
    /// The iteration budget ran out before the energy fell below the threshold.
    #[error("force layout did not converge after {iterations} iterations (energy {energy})")]
    NotConverged { energy: f64, iterations: usize },
    /// The vertex subset handed to the layout was empty.
    #[error("force layout called with an empty vertex subset")]
    EmptySubset,
}

/// Misuse of the per-atom annotation store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// An annotation with this name is already registered.
    #[error("annotation '{name}' is already registered")]
    Duplicate { name: String },
    /// No annotation with this name has been registered.
    #[error("annotation '{name}' is not registered")]
    NotRegistered { name: String },
    /// The value kind does not match the registered default.
    #[error("annotation '{name}' expects a different value kind")]
    TypeMismatch { name: String },
}

/// Errors produced while reading a SMILES string into a parse tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    /// The input string was empty or contained only whitespace.
    #[error("empty SMILES string")]
    EmptyInput,
    /// An unexpected character was encountered at the given position.
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    /// A bracket atom `[` was opened but never closed with `]`.
    #[error("unclosed bracket atom starting at position {pos}")]
    UnclosedBracket { pos: usize },
    /// A bracket atom did not contain a recognizable element symbol.
    #[error("invalid element '{text}' at position {pos}")]
    InvalidElement { pos: usize, text: String },
    /// A charge specifier inside a bracket atom could not be parsed.
    #[error("invalid charge at position {pos}")]
    InvalidCharge { pos: usize },
    /// A number inside a bracket atom overflowed.
    #[error("number overflow at position {pos}")]
    NumberOverflow { pos: usize },
    /// A parenthesis was opened without a matching close, or vice versa.
    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },
    /// A ring-closure digit appeared before any atom.
    #[error("ring bond {digit} at position {pos} has no preceding atom")]
    InvalidRingBond { digit: u16, pos: usize },
    /// A ring-opening digit was never matched by a ring-closing digit.
    #[error("unclosed ring {digit}")]
    UnclosedRing { digit: u16 },
    /// A bond symbol was not followed by an atom.
    #[error("dangling bond at position {pos}")]
    DanglingBond { pos: usize },
}

/// Drawing options that cannot produce a drawing.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid options document: {0}")]
    Json(#[from] serde_json::Error),
    /// A length that must be a positive finite number.
    #[error("option '{field}' must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Top-level error for a full drawing pass.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Smiles(#[from] SmilesError),
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
}
