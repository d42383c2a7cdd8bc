//! Range reductions used by `SUM` and `AVG`.

use gridcalc_core::{Grid, RangeRef, SheetResult};

/// Read access to cell text by zero-based coordinate
pub trait CellValueSource {
    fn read_value(&self, row: usize, col: usize) -> SheetResult<String>;
}

impl CellValueSource for Grid {
    fn read_value(&self, row: usize, col: usize) -> SheetResult<String> {
        self.cell_value(row, col).map(str::to_string)
    }
}

/// Aggregate applied to the numbers of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    Average,
}

impl Reducer {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SUM" => Some(Reducer::Sum),
            "AVG" => Some(Reducer::Average),
            _ => None,
        }
    }

    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Reducer::Sum => calc_sum(values),
            Reducer::Average => calc_avg(values),
        }
    }

    /// Collect the numbers of `range` from `source` and reduce them
    pub fn reduce_range(self, source: &dyn CellValueSource, range: RangeRef) -> SheetResult<f64> {
        let values = get_range_values(
            source,
            range.start.col,
            range.start.row,
            range.end.col,
            range.end.row,
        )?;
        Ok(self.apply(&values))
    }
}

/// Numeric reading of a cell's text: blank reads as zero, garbage as `None`
fn coerce_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numbers of the rectangle spanned by the two corners, row by row.
///
/// Empty cells count as `0`; cells whose text is not a finite number are
/// skipped. A reversed rectangle yields no values. Any coordinate outside
/// the grid fails with `InvalidReference`.
pub fn get_range_values(
    source: &dyn CellValueSource,
    start_col: usize,
    start_row: usize,
    end_col: usize,
    end_row: usize,
) -> SheetResult<Vec<f64>> {
    let mut values = Vec::new();

    for row in start_row..=end_row {
        for col in start_col..=end_col {
            let text = source.read_value(row, col)?;
            match coerce_number(&text) {
                Some(n) => values.push(n),
                None => tracing::warn!(row, col, value = %text, "skipping non-numeric cell in range"),
            }
        }
    }

    Ok(values)
}

pub fn calc_sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean; `0` for no values
pub fn calc_avg(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    calc_sum(values) / values.len() as f64
}
