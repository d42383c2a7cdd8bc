use std::fmt;
use std::rc::Rc;

use crate::cell::{Cell, CellId};
use crate::config::GridConfig;
use crate::error::{Axis, SheetError, SheetResult};
use crate::resolver::{is_formula, FormulaResolver};
use crate::text;

/// Work item of a propagation pass
enum Visit {
    Enter(CellId),
    Leave,
}

/// Rectangular grid of cells.
///
/// Cells live in an arena addressed by [`CellId`]; the row layout only holds
/// ids. Relation edges between cells are ids too, so removing a row or column
/// frees the arena slots and any edge still pointing at them is skipped when
/// a notification reaches it.
pub struct Grid {
    arena: Vec<Option<Cell>>,
    rows: Vec<Vec<CellId>>,
    next_seed: u64,
    config: GridConfig,
    resolver: Rc<dyn FormulaResolver>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.row_count())
            .field("columns", &self.column_count())
            .field("next_seed", &self.next_seed)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Grid {
    /// Create a `rows` x `columns` grid seeded `"1"`, `"2"`, ... row by row
    pub fn new(rows: usize, columns: usize, resolver: Rc<dyn FormulaResolver>) -> SheetResult<Self> {
        Self::with_config(rows, columns, GridConfig::default(), resolver)
    }

    pub fn with_config(
        rows: usize,
        columns: usize,
        config: GridConfig,
        resolver: Rc<dyn FormulaResolver>,
    ) -> SheetResult<Self> {
        if rows == 0 || columns == 0 {
            return Err(SheetError::InvalidDimensions { rows, cols: columns });
        }

        let mut grid = Grid {
            arena: Vec::with_capacity(rows * columns),
            rows: Vec::with_capacity(rows),
            next_seed: config.first_seed,
            config,
            resolver,
        };

        for _ in 0..rows {
            let row = grid.create_row(columns);
            grid.rows.push(row);
        }

        Ok(grid)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    fn create_cell(&mut self) -> CellId {
        let seed = self.next_seed;
        self.next_seed += 1;

        let id = CellId(self.arena.len());
        self.arena.push(Some(Cell::new(
            seed.to_string(),
            self.config.default_cell_color.as_str(),
            self.config.default_text_color.as_str(),
        )));
        id
    }

    fn create_row(&mut self, columns: usize) -> Vec<CellId> {
        (0..columns).map(|_| self.create_cell()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Id of the cell at `(row, col)`
    pub fn cell_id(&self, row: usize, col: usize) -> SheetResult<CellId> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .ok_or(SheetError::InvalidReference { row, col })
    }

    pub fn cell(&self, row: usize, col: usize) -> SheetResult<&Cell> {
        let id = self.cell_id(row, col)?;
        self.cell_by_id(id).ok_or(SheetError::InvalidReference { row, col })
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> SheetResult<&mut Cell> {
        let id = self.cell_id(row, col)?;
        self.cell_by_id_mut(id).ok_or(SheetError::InvalidReference { row, col })
    }

    pub fn cell_value(&self, row: usize, col: usize) -> SheetResult<&str> {
        self.cell(row, col).map(Cell::value)
    }

    /// Look up a cell by id; `None` once its row or column was removed
    pub fn cell_by_id(&self, id: CellId) -> Option<&Cell> {
        self.arena.get(id.0).and_then(Option::as_ref)
    }

    pub fn cell_by_id_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.arena.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Record that `owner` reads `referenced`, in both directions
    pub fn link(&mut self, owner: CellId, referenced: CellId) {
        if let Some(cell) = self.cell_by_id_mut(owner) {
            cell.add_dependency(referenced);
        }
        if let Some(cell) = self.cell_by_id_mut(referenced) {
            cell.add_observer(owner);
        }
    }

    /// Assign raw text to the cell at `(row, col)`.
    ///
    /// Formula writes additionally re-register the formula's references and
    /// notify the cell's observers a second time.
    pub fn set_cell_value(&mut self, row: usize, col: usize, text: &str) -> SheetResult<()> {
        let id = self.cell_id(row, col)?;

        self.set_value(id, text)?;

        if is_formula(text) {
            let resolver = Rc::clone(&self.resolver);
            resolver.register_references(text, id, self)?;
            self.notify_observers(id)?;
        }

        Ok(())
    }

    /// Reset the cell at `(row, col)` to the empty string
    pub fn clear_cell(&mut self, row: usize, col: usize) -> SheetResult<()> {
        self.set_cell_value(row, col, "")
    }

    /// Full reassignment of a cell.
    ///
    /// Text starting with `=` is stored as the formula source and evaluated;
    /// anything else is stored verbatim and clears the formula. Either way
    /// the cell's observers and then its dependencies are updated.
    pub fn set_value(&mut self, id: CellId, text: &str) -> SheetResult<()> {
        let Some(cell) = self.cell_by_id_mut(id) else {
            tracing::trace!("skipping assignment to removed cell {}", id);
            return Ok(());
        };

        if is_formula(text) {
            cell.assign_formula(text);
            let display = self.evaluate(id, text)?;
            if let Some(cell) = self.cell_by_id_mut(id) {
                cell.set_display_value(display);
            }
        } else {
            cell.assign_literal(text);
        }

        let roots: Vec<CellId> = match self.cell_by_id(id) {
            Some(cell) => cell.observers().iter().chain(cell.dependencies().iter()).collect(),
            None => Vec::new(),
        };
        self.propagate(roots)
    }

    /// Re-run the cell's formula, then update its dependencies.
    ///
    /// No-op for literal cells. Unlike [`Grid::set_value`], observers are not
    /// notified.
    pub fn update_value(&mut self, id: CellId) -> SheetResult<()> {
        self.propagate(vec![id])
    }

    /// Update every observer of `id`
    pub fn notify_observers(&mut self, id: CellId) -> SheetResult<()> {
        let roots: Vec<CellId> = self
            .cell_by_id(id)
            .map(|cell| cell.observers().iter().collect())
            .unwrap_or_default();
        self.propagate(roots)
    }

    /// Update every dependency of `id`
    pub fn notify_dependencies(&mut self, id: CellId) -> SheetResult<()> {
        let roots: Vec<CellId> = self
            .cell_by_id(id)
            .map(|cell| cell.dependencies().iter().collect())
            .unwrap_or_default();
        self.propagate(roots)
    }

    fn evaluate(&mut self, id: CellId, formula: &str) -> SheetResult<String> {
        let resolver = Rc::clone(&self.resolver);
        let value = resolver.resolve(formula, id, self)?;
        tracing::debug!(cell = %id, formula, value = %value, "evaluated formula");
        Ok(value.to_string())
    }

    /// Depth-first `update_value` cascade over `roots`, in order.
    ///
    /// Each formula cell is recomputed and its dependencies are visited next.
    /// With `detect_cycles` set, reaching a cell that is already being
    /// updated further up the same chain fails with `CircularReference`.
    fn propagate(&mut self, roots: Vec<CellId>) -> SheetResult<()> {
        let detect_cycles = self.config.detect_cycles;
        let mut path: Vec<CellId> = Vec::new();
        let mut stack: Vec<Visit> = roots.into_iter().rev().map(Visit::Enter).collect();

        while let Some(visit) = stack.pop() {
            let id = match visit {
                Visit::Enter(id) => id,
                Visit::Leave => {
                    path.pop();
                    continue;
                }
            };

            let formula = match self.cell_by_id(id) {
                Some(cell) => match cell.formula() {
                    Some(formula) => formula.to_string(),
                    None => continue,
                },
                None => {
                    tracing::trace!("skipping removed cell {}", id);
                    continue;
                }
            };

            if detect_cycles && path.contains(&id) {
                tracing::warn!("circular reference at cell {}", id);
                return Err(SheetError::CircularReference { cell: id });
            }

            tracing::trace!(cell = %id, "updating");
            let display = self.evaluate(id, &formula)?;

            let children: Vec<CellId> = match self.cell_by_id_mut(id) {
                Some(cell) => {
                    cell.set_display_value(display);
                    cell.dependencies().iter().collect()
                }
                None => continue,
            };

            if detect_cycles {
                path.push(id);
                stack.push(Visit::Leave);
            }
            stack.extend(children.into_iter().rev().map(Visit::Enter));
        }

        Ok(())
    }

    /// Insert a row of freshly seeded cells at `at` (`0..=row_count`)
    pub fn add_row(&mut self, at: usize) -> SheetResult<()> {
        let count = self.row_count();
        if at > count {
            return Err(SheetError::InvalidIndex {
                axis: Axis::Row,
                index: at,
                count,
            });
        }

        let row = self.create_row(self.column_count());
        self.rows.insert(at, row);
        tracing::debug!(at, rows = self.row_count(), "added row");
        Ok(())
    }

    /// Remove the row at `at` (`0..row_count`)
    pub fn remove_row(&mut self, at: usize) -> SheetResult<()> {
        let count = self.row_count();
        if at >= count {
            return Err(SheetError::InvalidOperation {
                axis: Axis::Row,
                index: at,
                count,
            });
        }

        for id in self.rows.remove(at) {
            self.arena[id.0] = None;
        }
        tracing::debug!(at, rows = self.row_count(), "removed row");
        Ok(())
    }

    /// Insert a column of freshly seeded cells at `at` (`0..=column_count`)
    pub fn add_column(&mut self, at: usize) -> SheetResult<()> {
        let count = self.column_count();
        if at > count {
            return Err(SheetError::InvalidIndex {
                axis: Axis::Column,
                index: at,
                count,
            });
        }

        for row in 0..self.rows.len() {
            let id = self.create_cell();
            self.rows[row].insert(at, id);
        }
        tracing::debug!(at, columns = self.column_count(), "added column");
        Ok(())
    }

    /// Remove the column at `at` (`0..column_count`)
    pub fn remove_column(&mut self, at: usize) -> SheetResult<()> {
        let count = self.column_count();
        if at >= count {
            return Err(SheetError::InvalidOperation {
                axis: Axis::Column,
                index: at,
                count,
            });
        }

        for row in 0..self.rows.len() {
            let id = self.rows[row].remove(at);
            self.arena[id.0] = None;
        }
        tracing::debug!(at, columns = self.column_count(), "removed column");
        Ok(())
    }

    /// Display values of every row, top to bottom
    pub fn values(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|id| self.cell_by_id(*id).map(|c| c.value().to_string()).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    /// Export every display value as quoted CSV, rows joined by `\n`
    pub fn to_csv(&self) -> SheetResult<String> {
        text::rows_to_csv(self.rows.iter().map(move |row| {
            row.iter()
                .map(move |id| self.cell_by_id(*id).map_or("", Cell::value))
        }))
    }
}
