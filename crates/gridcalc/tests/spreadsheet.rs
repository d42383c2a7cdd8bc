use gridcalc::{Config, GridConfig, SheetError, Spreadsheet, SpreadsheetError};
use pretty_assertions::assert_eq;

fn sheet(rows: usize, cols: usize) -> Spreadsheet {
    Spreadsheet::new(rows, cols).unwrap()
}

fn sheet_error(err: SpreadsheetError) -> SheetError {
    match err {
        SpreadsheetError::Sheet(err) => err,
        other => panic!("expected a sheet error, got {:?}", other),
    }
}

#[test]
fn test_ref_reads_raw_value() {
    let mut sheet = sheet(3, 4);
    sheet.set_cell_value(0, 0, "5").unwrap();
    sheet.set_cell_value(0, 1, "=REF(A1)").unwrap();

    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "5");
    assert_eq!(sheet.get_cell(0, 1).unwrap().formula(), Some("=REF(A1)"));
}

#[test]
fn test_ref_propagates_on_change() {
    let mut sheet = sheet(3, 4);
    sheet.set_cell_value(0, 1, "=REF(A1)").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "1");

    sheet.set_cell_value(0, 0, "hello").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "hello");
}

#[test]
fn test_sum_and_avg() {
    let mut sheet = sheet(4, 3);
    for (row, value) in ["1", "2", "3", "4"].iter().enumerate() {
        sheet.set_cell_value(row, 0, value).unwrap();
    }

    sheet.set_cell_value(0, 1, "=SUM(A1:A4)").unwrap();
    sheet.set_cell_value(1, 1, "=AVG(A1:A4)").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "10");
    assert_eq!(sheet.get_cell_value(1, 1).unwrap(), "2.5");

    sheet.set_cell_value(1, 0, "20").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "28");
    assert_eq!(sheet.get_cell_value(1, 1).unwrap(), "7");
}

#[test]
fn test_sum_skips_text_and_counts_blanks() {
    let mut sheet = sheet(4, 2);
    sheet.set_cell_value(0, 0, "4").unwrap();
    sheet.set_cell_value(1, 0, "n/a").unwrap();
    sheet.set_cell_value(2, 0, "").unwrap();
    sheet.set_cell_value(3, 0, "8").unwrap();

    sheet.set_cell_value(0, 1, "=SUM(A1:A4)").unwrap();
    sheet.set_cell_value(1, 1, "=AVG(A1:A4)").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "12");
    assert_eq!(sheet.get_cell_value(1, 1).unwrap(), "4");
}

#[test]
fn test_calc() {
    let mut sheet = sheet(2, 2);
    sheet.set_cell_value(0, 0, "=CALC(1+2)").unwrap();
    assert_eq!(sheet.get_cell_value(0, 0).unwrap(), "3");

    sheet.set_cell_value(1, 0, "=CALC((2+3)*4)").unwrap();
    assert_eq!(sheet.get_cell_value(1, 0).unwrap(), "20");
}

#[test]
fn test_calc_with_ref_propagates() {
    let mut sheet = sheet(2, 2);
    sheet.set_cell_value(0, 0, "6").unwrap();
    sheet.set_cell_value(0, 1, "=CALC(REF(A1)*2)").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "12");

    sheet.set_cell_value(0, 0, "10").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "20");
}

#[test]
fn test_calc_text_concatenation() {
    let mut sheet = sheet(1, 3);
    sheet.set_cell_value(0, 0, "foo").unwrap();
    sheet.set_cell_value(0, 1, "bar").unwrap();
    sheet.set_cell_value(0, 2, "=CALC(REF(A1)+REF(B1))").unwrap();
    assert_eq!(sheet.get_cell_value(0, 2).unwrap(), "foobar");
}

#[test]
fn test_division_by_zero_surfaces() {
    let mut sheet = sheet(1, 2);
    let err = sheet.set_cell_value(0, 0, "=CALC(1/0)").unwrap_err();
    assert_eq!(sheet_error(err), SheetError::DivisionByZero);

    // Formula is kept, display value is untouched
    let cell = sheet.get_cell(0, 0).unwrap();
    assert_eq!(cell.formula(), Some("=CALC(1/0)"));
    assert_eq!(cell.value(), "1");
}

#[test]
fn test_out_of_bounds_reference_in_formula() {
    let mut sheet = sheet(2, 2);
    let err = sheet.set_cell_value(0, 0, "=REF(C3)").unwrap_err();
    assert_eq!(sheet_error(err), SheetError::InvalidReference { row: 2, col: 2 });
}

#[test]
fn test_oversized_range_reports_invalid_reference() {
    let mut sheet = sheet(2, 2);
    let err = sheet.set_cell_value(0, 0, "=SUM(A1:ZZZZ99999999)").unwrap_err();
    assert_eq!(err.code(), "INVALID_REFERENCE");

    // The formula is recorded but no edge was registered
    let cell = sheet.get_cell(0, 0).unwrap();
    assert_eq!(cell.formula(), Some("=SUM(A1:ZZZZ99999999)"));
    assert!(cell.dependencies().is_empty());
    assert_eq!(cell.value(), "1");
}

#[test]
fn test_malformed_formulas_fail_soft() {
    let mut sheet = sheet(2, 2);

    sheet.set_cell_value(0, 0, "=FOO(A2)").unwrap();
    assert_eq!(sheet.get_cell_value(0, 0).unwrap(), "");

    sheet.set_cell_value(0, 1, "=REF(a1)").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "");

    sheet.set_cell_value(1, 1, "=SUM(A1)").unwrap();
    assert_eq!(sheet.get_cell_value(1, 1).unwrap(), "0");
}

#[test]
fn test_literal_clears_formula() {
    let mut sheet = sheet(2, 2);
    sheet.set_cell_value(0, 1, "=REF(A1)").unwrap();
    sheet.set_cell_value(0, 1, "plain").unwrap();

    assert!(!sheet.get_cell(0, 1).unwrap().is_formula());

    // No longer follows A1
    sheet.set_cell_value(0, 0, "99").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "plain");
}

#[test]
fn test_csv_of_fresh_grid() {
    let sheet = sheet(3, 4);
    assert_eq!(
        sheet.to_csv().unwrap(),
        "\"1\",\"2\",\"3\",\"4\"\n\"5\",\"6\",\"7\",\"8\"\n\"9\",\"10\",\"11\",\"12\""
    );
}

#[test]
fn test_csv_escapes_quotes_and_newlines() {
    let mut sheet = sheet(1, 2);
    sheet.set_cell_value(0, 0, "say \"hi\"\nbye").unwrap();
    assert_eq!(sheet.to_csv().unwrap(), "\"say \"\"hi\"\"\nbye\",\"2\"");
}

#[test]
fn test_import_then_export() {
    let mut sheet = sheet(2, 2);
    sheet.import_text("3,4\n=SUM(A1:B1), x ").unwrap();
    assert_eq!(sheet.to_csv().unwrap(), "\"3\",\"4\"\n\"7\",\"x\"");
}

#[test]
fn test_row_add_remove_inverse() {
    let mut sheet = sheet(3, 4);
    for at in 0..=3 {
        sheet.add_row(at).unwrap();
        assert_eq!(sheet.row_count(), 4);
        sheet.remove_row(at).unwrap();
        assert_eq!(sheet.row_count(), 3);
    }
}

#[test]
fn test_column_add_remove_inverse() {
    let mut sheet = sheet(3, 4);
    for at in 0..=4 {
        sheet.add_column(at).unwrap();
        assert_eq!(sheet.column_count(), 5);
        sheet.remove_column(at).unwrap();
        assert_eq!(sheet.column_count(), 4);
    }
}

#[test]
fn test_structural_bounds() {
    let mut sheet = sheet(3, 4);

    let err = sheet.add_row(4).unwrap_err();
    assert_eq!(err.code(), "INVALID_INDEX");
    let err = sheet.remove_row(3).unwrap_err();
    assert_eq!(err.code(), "INVALID_OPERATION");
    let err = sheet.add_column(5).unwrap_err();
    assert_eq!(err.code(), "INVALID_INDEX");
    let err = sheet.remove_column(4).unwrap_err();
    assert_eq!(err.code(), "INVALID_OPERATION");

    assert_eq!((sheet.row_count(), sheet.column_count()), (3, 4));
}

#[test]
fn test_new_cells_continue_seed() {
    let mut sheet = sheet(2, 2);
    sheet.add_row(2).unwrap();
    sheet.add_column(0).unwrap();
    assert_eq!(
        sheet.values(),
        vec![
            vec!["7", "1", "2"],
            vec!["8", "3", "4"],
            vec!["9", "5", "6"],
        ]
    );
}

#[test]
fn test_removed_cells_are_skipped() {
    let mut sheet = sheet(3, 2);
    sheet.set_cell_value(0, 1, "=REF(A3)").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "5");

    sheet.remove_row(2).unwrap();

    // The edge to the removed cell is skipped
    sheet.set_cell_value(0, 1, "x").unwrap();
    assert_eq!(sheet.get_cell_value(0, 1).unwrap(), "x");

    let err = sheet.set_cell_value(0, 1, "=REF(A3)").unwrap_err();
    assert_eq!(sheet_error(err), SheetError::InvalidReference { row: 2, col: 0 });
}

#[test]
fn test_cycle_detection_opt_in() {
    let config = Config {
        grid: GridConfig::with_cycle_detection(),
    };
    let mut sheet = Spreadsheet::with_config(2, 2, &config).unwrap();

    sheet.set_cell_value(0, 0, "=REF(B1)").unwrap();
    let err = sheet.set_cell_value(0, 1, "=REF(A1)").unwrap_err();
    assert!(matches!(sheet_error(err), SheetError::CircularReference { .. }));
}

#[test]
fn test_config_seed_and_colors() {
    let config = Config::from_json(r#"{"grid": {"firstSeed": 100, "defaultCellColor": "grey"}}"#).unwrap();
    let sheet = Spreadsheet::with_config(1, 2, &config).unwrap();

    assert_eq!(sheet.values(), vec![vec!["100", "101"]]);
    assert_eq!(sheet.cell_color(0, 1).unwrap(), "grey");
    assert_eq!(sheet.text_color(0, 1).unwrap(), "black");
}
