use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

use gridcalc_core::{text, Cell, Grid, SheetResult};
use gridcalc_formula::FormulaInterpreter;

use crate::config::Config;
use crate::error::Result;

/// Spreadsheet data model exposed to UI collaborators.
///
/// Wraps a [`Grid`] wired to the [`FormulaInterpreter`], so formula writes
/// evaluate and propagate immediately.
#[derive(Debug)]
pub struct Spreadsheet {
    grid: Grid,
}

impl Spreadsheet {
    /// Create a `rows` x `columns` sheet seeded `"1"`, `"2"`, ... row by row
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        Self::with_config(rows, columns, &Config::default())
    }

    pub fn with_config(rows: usize, columns: usize, config: &Config) -> Result<Self> {
        let resolver = Rc::new(FormulaInterpreter::new());
        let grid = Grid::with_config(rows, columns, config.grid.clone(), resolver)?;
        tracing::debug!(rows, columns, "created spreadsheet");
        Ok(Self { grid })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.grid.column_count()
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Result<&Cell> {
        Ok(self.grid.cell(row, col)?)
    }

    pub fn get_cell_value(&self, row: usize, col: usize) -> Result<&str> {
        Ok(self.grid.cell_value(row, col)?)
    }

    /// Assign raw text (literal or `=` formula) to a cell
    pub fn set_cell_value(&mut self, row: usize, col: usize, text: &str) -> Result<()> {
        Ok(self.grid.set_cell_value(row, col, text)?)
    }

    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<()> {
        Ok(self.grid.clear_cell(row, col)?)
    }

    pub fn add_row(&mut self, at: usize) -> Result<()> {
        Ok(self.grid.add_row(at)?)
    }

    pub fn remove_row(&mut self, at: usize) -> Result<()> {
        Ok(self.grid.remove_row(at)?)
    }

    pub fn add_column(&mut self, at: usize) -> Result<()> {
        Ok(self.grid.add_column(at)?)
    }

    pub fn remove_column(&mut self, at: usize) -> Result<()> {
        Ok(self.grid.remove_column(at)?)
    }

    pub fn cell_color(&self, row: usize, col: usize) -> Result<&str> {
        Ok(self.grid.cell(row, col)?.cell_color())
    }

    pub fn set_cell_color(&mut self, row: usize, col: usize, color: &str) -> Result<()> {
        self.grid.cell_mut(row, col)?.set_cell_color(color);
        Ok(())
    }

    pub fn text_color(&self, row: usize, col: usize) -> Result<&str> {
        Ok(self.grid.cell(row, col)?.text_color())
    }

    pub fn set_text_color(&mut self, row: usize, col: usize, color: &str) -> Result<()> {
        self.grid.cell_mut(row, col)?.set_text_color(color);
        Ok(())
    }

    /// Display values of every cell, row by row
    pub fn values(&self) -> Vec<Vec<String>> {
        self.grid.values()
    }

    /// Quoted CSV of every display value, rows joined by `\n`
    pub fn to_csv(&self) -> Result<String> {
        Ok(self.grid.to_csv()?)
    }

    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.to_csv()?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))?;
        tracing::debug!(path = %path.display(), "saved csv");
        Ok(())
    }

    /// Replay comma/newline separated text into the sheet, starting at `A1`.
    ///
    /// Fields are trimmed but not unquoted. Fails on the first field that
    /// lands outside the grid; fields before it stay applied.
    pub fn import_text(&mut self, text: &str) -> Result<()> {
        let rows = text::parse_import_text(text);
        tracing::debug!(rows = rows.len(), "importing text");
        Ok(replay(&mut self.grid, &rows)?)
    }
}

fn replay(grid: &mut Grid, rows: &[Vec<String>]) -> SheetResult<()> {
    for (row, fields) in rows.iter().enumerate() {
        for (col, field) in fields.iter().enumerate() {
            grid.set_cell_value(row, col, field)?;
        }
    }
    Ok(())
}
