use std::fmt;

use thiserror::Error;

use crate::cell::CellId;

/// Grid axis named in structural-edit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// Hard failures of the grid and evaluator layers.
///
/// Malformed formulas never produce one of these; they degrade to an empty
/// or not-a-number result inside the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// Right operand of `/` was zero
    #[error("Division by zero.")]
    DivisionByZero,

    /// Operator the evaluator cannot apply (e.g. a dangling `(`)
    #[error("Invalid operator: {0}")]
    InvalidOperator(char),

    /// Coordinate outside the current grid
    #[error("Invalid cell reference: ({row}, {col})")]
    InvalidReference { row: usize, col: usize },

    /// Insertion index outside `0..=count`
    #[error("Invalid {axis} index {index} (count {count})")]
    InvalidIndex { axis: Axis, index: usize, count: usize },

    /// Removal index outside `0..count`
    #[error("Invalid operation. Cannot remove {axis} {index} (count {count})")]
    InvalidOperation { axis: Axis, index: usize, count: usize },

    /// A grid needs at least one row and one column
    #[error("Invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Propagation re-entered a cell on its own notification path
    #[error("Circular reference detected at cell {cell}")]
    CircularReference { cell: CellId },

    /// The CSV writer rejected the export
    #[error("Export failed: {message}")]
    Export { message: String },
}

impl SheetError {
    /// Stable error code for UI collaborators
    pub fn code(&self) -> &'static str {
        match self {
            SheetError::DivisionByZero => "DIVISION_BY_ZERO",
            SheetError::InvalidOperator(_) => "INVALID_OPERATOR",
            SheetError::InvalidReference { .. } => "INVALID_REFERENCE",
            SheetError::InvalidIndex { .. } => "INVALID_INDEX",
            SheetError::InvalidOperation { .. } => "INVALID_OPERATION",
            SheetError::InvalidDimensions { .. } => "INVALID_DIMENSIONS",
            SheetError::CircularReference { .. } => "CIRCULAR_REFERENCE",
            SheetError::Export { .. } => "EXPORT_FAILED",
        }
    }
}

pub type SheetResult<T> = Result<T, SheetError>;
