pub mod calculator;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod reducers;

pub use calculator::{Calculator, Operator};
pub use interpreter::{FormulaInterpreter, FormulaKind};
pub use lexer::{Lexer, Token};
pub use reducers::{calc_avg, calc_sum, get_range_values, CellValueSource, Reducer};

use gridcalc_core::SheetResult;

/// Evaluate an arithmetic expression such as `(2 + 3) * 4`
pub fn evaluate(expression: &str) -> SheetResult<f64> {
    Calculator::new().evaluate(expression)
}

/// Extract the cell references of a formula, ranges fully expanded
pub fn extract_references(formula: &str) -> Vec<(usize, usize)> {
    FormulaInterpreter::new()
        .extract_cell_references(formula)
        .map(|cell| (cell.row, cell.col))
        .collect()
}
