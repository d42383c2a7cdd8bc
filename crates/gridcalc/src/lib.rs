mod api;
pub mod config;
pub mod error;

pub use api::Spreadsheet;
pub use config::Config;
pub use error::{Result, SpreadsheetError};

pub use gridcalc_core::{Cell, CellId, CellRef, GridConfig, RangeRef, SheetError};
pub use gridcalc_formula::FormulaInterpreter;
