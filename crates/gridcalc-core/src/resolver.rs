use crate::cell::{CellId, FormulaValue};
use crate::error::SheetResult;
use crate::grid::Grid;

/// True iff `text` is formula syntax (starts with `=`)
pub fn is_formula(text: &str) -> bool {
    text.starts_with('=')
}

/// Evaluates formula text on behalf of a cell.
///
/// The grid calls the resolver whenever a formula cell is assigned or
/// recomputed. Implementations read other cells through the grid and are
/// expected to wire relation edges with [`Grid::link`] while they do so.
pub trait FormulaResolver {
    /// Compute the value of `formula` for `owner`
    fn resolve(&self, formula: &str, owner: CellId, grid: &mut Grid) -> SheetResult<FormulaValue>;

    /// Register the references in `formula` as edges of `owner` without evaluating
    fn register_references(&self, formula: &str, owner: CellId, grid: &mut Grid) -> SheetResult<()>;
}

/// Resolver that evaluates every formula to the empty string
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl FormulaResolver for NullResolver {
    fn resolve(&self, _formula: &str, _owner: CellId, _grid: &mut Grid) -> SheetResult<FormulaValue> {
        Ok(FormulaValue::empty())
    }

    fn register_references(&self, _formula: &str, _owner: CellId, _grid: &mut Grid) -> SheetResult<()> {
        Ok(())
    }
}
