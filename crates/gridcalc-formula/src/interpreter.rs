use std::borrow::Cow;

use regex::{Captures, Regex};

use gridcalc_core::{
    format_number, is_formula, CellId, CellRef, FormulaResolver, FormulaValue, Grid, RangeRef,
    SheetResult,
};

use crate::calculator::Calculator;
use crate::parser;
use crate::reducers::Reducer;

/// Cell references (`A1`) and ranges (`A1:B2`) anywhere in a formula
const REFERENCE_PATTERN: &str = r"\b([A-Z]+[0-9]+):([A-Z]+[0-9]+)\b|\b([A-Z]+[0-9]+)\b";
/// Sub-calls that make a `CALC` formula need substitution
const SUBCALL_PATTERN: &str = r"\b(REF|SUM|AVG)\b";
const REF_CALL_PATTERN: &str = r"REF\((\w+\d+)\)";
const SUM_CALL_PATTERN: &str = r"SUM\((\w+\d+):(\w+\d+)\)";
const AVG_CALL_PATTERN: &str = r"AVG\((\w+\d+):(\w+\d+)\)";

/// The formula functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaKind {
    Ref,
    Sum,
    Avg,
    Calc,
}

impl FormulaKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "REF" => Some(FormulaKind::Ref),
            "SUM" => Some(FormulaKind::Sum),
            "AVG" => Some(FormulaKind::Avg),
            "CALC" => Some(FormulaKind::Calc),
            _ => None,
        }
    }
}

/// Formula engine for grid cells.
///
/// Understands `=REF(A1)`, `=SUM(A1:B2)`, `=AVG(A1:B2)` and
/// `=CALC(expression)`, where a `CALC` expression may embed the other three.
/// Before dispatching, every reference in the formula is registered as a
/// dependency of the owning cell.
pub struct FormulaInterpreter {
    calculator: Calculator,
    references: Regex,
    subcall: Regex,
    ref_call: Regex,
    sum_call: Regex,
    avg_call: Regex,
}

impl Default for FormulaInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaInterpreter {
    pub fn new() -> Self {
        Self {
            calculator: Calculator::new(),
            references: Regex::new(REFERENCE_PATTERN).expect("valid reference pattern"),
            subcall: Regex::new(SUBCALL_PATTERN).expect("valid sub-call pattern"),
            ref_call: Regex::new(REF_CALL_PATTERN).expect("valid REF pattern"),
            sum_call: Regex::new(SUM_CALL_PATTERN).expect("valid SUM pattern"),
            avg_call: Regex::new(AVG_CALL_PATTERN).expect("valid AVG pattern"),
        }
    }

    pub fn is_formula(&self, text: &str) -> bool {
        is_formula(text)
    }

    /// Reference tokens of `formula` as spans; a single reference is a one-cell span
    fn reference_spans<'a>(&'a self, formula: &'a str) -> impl Iterator<Item = RangeRef> + 'a {
        self.references.captures_iter(formula).filter_map(|caps| {
            match (caps.get(1), caps.get(2)) {
                (Some(start), Some(end)) => Some(RangeRef::new(
                    CellRef::parse(start.as_str())?,
                    CellRef::parse(end.as_str())?,
                )),
                _ => {
                    let cell = CellRef::parse(caps.get(3)?.as_str())?;
                    Some(RangeRef::new(cell, cell))
                }
            }
        })
    }

    /// Every reference in `formula`, ranges expanded lazily column by column.
    ///
    /// Tokens that are not valid A1 notation are ignored.
    pub fn extract_cell_references<'a>(&'a self, formula: &'a str) -> impl Iterator<Item = CellRef> + 'a {
        self.reference_spans(formula).flatten()
    }

    /// Link `owner` to every cell `formula` references.
    ///
    /// A span reaching outside the grid fails with `InvalidReference` for its
    /// far corner before any of its cells is linked; links made for earlier
    /// references stay in place.
    pub fn update_cell_observers(&self, owner: CellId, formula: &str, grid: &mut Grid) -> SheetResult<()> {
        for span in self.reference_spans(formula) {
            if span.is_reversed() {
                continue;
            }
            grid.cell_id(span.end.row, span.end.col)?;

            for cell in span {
                let referenced = grid.cell_id(cell.row, cell.col)?;
                grid.link(owner, referenced);
            }
        }
        Ok(())
    }

    /// Evaluate `formula` on behalf of `owner`.
    ///
    /// Non-formula text and unknown function names evaluate to the empty
    /// string.
    pub fn compute_formula_value(
        &self,
        formula: &str,
        owner: CellId,
        grid: &mut Grid,
    ) -> SheetResult<FormulaValue> {
        if !self.is_formula(formula) {
            return Ok(FormulaValue::empty());
        }

        self.update_cell_observers(owner, formula, grid)?;

        let kind = parser::formula_name(formula).and_then(FormulaKind::from_name);
        match kind {
            Some(FormulaKind::Ref) => self.handle_ref_formula(formula, grid),
            Some(FormulaKind::Sum) => self.handle_range_formula(formula, Reducer::Sum, grid),
            Some(FormulaKind::Avg) => self.handle_range_formula(formula, Reducer::Average, grid),
            Some(FormulaKind::Calc) => self.handle_calc_formula(formula, grid),
            None => {
                tracing::debug!(formula, "unrecognised formula");
                Ok(FormulaValue::empty())
            }
        }
    }

    fn handle_ref_formula(&self, formula: &str, grid: &Grid) -> SheetResult<FormulaValue> {
        match parser::ref_argument(formula) {
            Some(cell) => Ok(FormulaValue::Text(grid.cell_value(cell.row, cell.col)?.to_string())),
            None => Ok(FormulaValue::empty()),
        }
    }

    fn handle_range_formula(&self, formula: &str, reducer: Reducer, grid: &Grid) -> SheetResult<FormulaValue> {
        match parser::range_argument(formula) {
            Some(range) => Ok(FormulaValue::Number(reducer.reduce_range(grid, range)?)),
            None => Ok(FormulaValue::Number(0.0)),
        }
    }

    fn handle_calc_formula(&self, formula: &str, grid: &Grid) -> SheetResult<FormulaValue> {
        let formula: Cow<'_, str> = if self.subcall.is_match(formula) {
            Cow::Owned(self.replace_with_values(formula, grid)?)
        } else {
            Cow::Borrowed(formula)
        };

        let Some(expression) = parser::calc_expression(&formula) else {
            return Ok(FormulaValue::empty());
        };

        let result = self.calculator.evaluate(expression)?;
        if result.is_nan() {
            Ok(FormulaValue::Text(expression.replace('+', "")))
        } else {
            Ok(FormulaValue::Text(format_number(result)))
        }
    }

    /// Substitute embedded `REF`, `SUM` and `AVG` calls with their values, in that order
    fn replace_with_values(&self, formula: &str, grid: &Grid) -> SheetResult<String> {
        let text = replace_calls(&self.ref_call, formula, |caps| {
            match CellRef::parse(&caps[1]) {
                Some(cell) => Ok(grid.cell_value(cell.row, cell.col)?.to_string()),
                None => Ok(String::new()),
            }
        })?;
        let text = replace_calls(&self.sum_call, &text, |caps| range_call_value(caps, Reducer::Sum, grid))?;
        replace_calls(&self.avg_call, &text, |caps| range_call_value(caps, Reducer::Average, grid))
    }
}

impl FormulaResolver for FormulaInterpreter {
    fn resolve(&self, formula: &str, owner: CellId, grid: &mut Grid) -> SheetResult<FormulaValue> {
        self.compute_formula_value(formula, owner, grid)
    }

    fn register_references(&self, formula: &str, owner: CellId, grid: &mut Grid) -> SheetResult<()> {
        self.update_cell_observers(owner, formula, grid)
    }
}

fn range_call_value(caps: &Captures<'_>, reducer: Reducer, grid: &Grid) -> SheetResult<String> {
    match (CellRef::parse(&caps[1]), CellRef::parse(&caps[2])) {
        (Some(start), Some(end)) => Ok(format_number(reducer.reduce_range(grid, RangeRef::new(start, end))?)),
        _ => Ok(format_number(0.0)),
    }
}

/// `Regex::replace_all` with a fallible replacement
fn replace_calls<F>(pattern: &Regex, text: &str, mut replacement: F) -> SheetResult<String>
where
    F: FnMut(&Captures<'_>) -> SheetResult<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(&replacement(&caps)?);
        last = whole.end();
    }
    out.push_str(&text[last..]);

    Ok(out)
}
