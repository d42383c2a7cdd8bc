use std::collections::HashSet;
use std::fmt;

use crate::config::{DEFAULT_CELL_COLOR, DEFAULT_TEXT_COLOR};

/// Stable identity of a cell inside a grid's arena.
///
/// Ids are never reused, so an id held by another cell's relation set after
/// its row or column was removed simply stops resolving.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Insertion-ordered set of cell ids.
///
/// Iteration follows insertion order; membership is answered by a hash set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet {
    order: Vec<CellId>,
    members: HashSet<CellId>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id was already present
    pub fn insert(&mut self, id: CellId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn remove(&mut self, id: CellId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        self.order.retain(|existing| *existing != id);
        true
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
        self.order.iter().copied()
    }
}

/// Result of evaluating a formula
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    Text(String),
    Number(f64),
}

impl FormulaValue {
    pub fn empty() -> Self {
        FormulaValue::Text(String::new())
    }
}

impl fmt::Display for FormulaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaValue::Text(s) => f.write_str(s),
            FormulaValue::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

/// Render a number the way it is stored as a display value.
///
/// Shortest round-trip digits, positional for decimal exponents `-7 < e < 21`
/// and exponent form (`1e+21`, `1.5e-7`) outside that window. `-0` prints as
/// `0`, and the non-finite values print as `NaN`, `Infinity` and `-Infinity`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    } else if n == f64::INFINITY {
        return "Infinity".to_string();
    } else if n == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    } else if n == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{:e}", n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{}", n);
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return format!("{}", n);
    };

    if (-7 < exponent) && (exponent < 21) {
        format!("{}", n)
    } else if exponent > 0 {
        format!("{}e+{}", mantissa, exponent)
    } else {
        format!("{}e{}", mantissa, exponent)
    }
}

/// A single grid cell.
///
/// The cell is plain state: its display value, the formula it was derived
/// from (if any) and its two relation sets. Evaluation and propagation are
/// driven by the owning [`Grid`](crate::grid::Grid).
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    display_value: String,
    formula: Option<String>,
    /// Cells this cell's formula reads from
    dependencies: EdgeSet,
    /// Cells to notify after this cell is assigned
    observers: EdgeSet,
    cell_color: String,
    text_color: String,
}

impl Cell {
    /// Create a literal cell with the given colours
    pub fn new(
        initial_value: impl Into<String>,
        cell_color: impl Into<String>,
        text_color: impl Into<String>,
    ) -> Self {
        Cell {
            display_value: initial_value.into(),
            formula: None,
            dependencies: EdgeSet::new(),
            observers: EdgeSet::new(),
            cell_color: cell_color.into(),
            text_color: text_color.into(),
        }
    }

    /// Create a literal cell with the default white/black colours
    pub fn literal(value: impl Into<String>) -> Self {
        Cell::new(value, DEFAULT_CELL_COLOR, DEFAULT_TEXT_COLOR)
    }

    pub fn value(&self) -> &str {
        &self.display_value
    }

    /// The formula source, present only for formula-derived cells
    pub fn formula(&self) -> Option<&str> {
        self.formula.as_deref()
    }

    pub fn is_formula(&self) -> bool {
        self.formula.is_some()
    }

    /// Store a literal value and drop any formula association
    pub(crate) fn assign_literal(&mut self, value: &str) {
        self.display_value = value.to_string();
        self.formula = None;
    }

    pub(crate) fn assign_formula(&mut self, formula: &str) {
        self.formula = Some(formula.to_string());
    }

    pub(crate) fn set_display_value(&mut self, value: String) {
        self.display_value = value;
    }

    pub fn dependencies(&self) -> &EdgeSet {
        &self.dependencies
    }

    pub fn observers(&self) -> &EdgeSet {
        &self.observers
    }

    pub fn add_dependency(&mut self, id: CellId) {
        self.dependencies.insert(id);
    }

    pub fn remove_dependency(&mut self, id: CellId) {
        self.dependencies.remove(id);
    }

    pub fn add_observer(&mut self, id: CellId) {
        self.observers.insert(id);
        tracing::trace!(
            value = %self.display_value,
            observers = self.observers.len(),
            "added observer {}",
            id
        );
    }

    pub fn remove_observer(&mut self, id: CellId) {
        self.observers.remove(id);
    }

    pub fn cell_color(&self) -> &str {
        &self.cell_color
    }

    pub fn set_cell_color(&mut self, color: impl Into<String>) {
        self.cell_color = color.into();
    }

    pub fn text_color(&self) -> &str {
        &self.text_color
    }

    pub fn set_text_color(&mut self, color: impl Into<String>) {
        self.text_color = color.into();
    }
}
