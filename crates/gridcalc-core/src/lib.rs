pub mod cell;
pub mod config;
pub mod text;
pub mod error;
pub mod grid;
pub mod reference;
pub mod resolver;

pub use cell::{format_number, Cell, CellId, EdgeSet, FormulaValue};
pub use config::GridConfig;
pub use error::{Axis, SheetError, SheetResult};
pub use grid::Grid;
pub use reference::{col_from_label, col_to_label, next_col_label, CellRef, RangeRef};
pub use resolver::{is_formula, FormulaResolver, NullResolver};
