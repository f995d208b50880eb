//! End-to-end tests for editing, evaluating and printing a sheet

use pretty_assertions::assert_eq;
use tabula::prelude::*;

fn pos(addr: &str) -> Position {
    Position::parse(addr).unwrap()
}

fn set(sheet: &mut Sheet, addr: &str, text: &str) {
    sheet.set_cell(pos(addr), text).unwrap();
}

fn value(sheet: &Sheet, addr: &str) -> CellValue {
    sheet.get_cell(pos(addr)).unwrap().unwrap().value()
}

fn text(sheet: &Sheet, addr: &str) -> String {
    sheet.get_cell(pos(addr)).unwrap().unwrap().text()
}

fn printed_values(sheet: &Sheet) -> String {
    let mut out = Vec::new();
    sheet.print_values(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn printed_texts(sheet: &Sheet) -> String {
    let mut out = Vec::new();
    sheet.print_texts(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_get_cell_before_and_after_set() {
    let mut sheet = Sheet::new();
    assert!(sheet.get_cell(pos("B2")).unwrap().is_none());

    set(&mut sheet, "B2", "");
    let cell = sheet.get_cell(pos("B2")).unwrap().unwrap();
    assert_eq!(cell.kind(), &CellKind::Empty);
    assert_eq!(cell.text(), "");
    assert_eq!(cell.value(), CellValue::empty());
}

#[test]
fn test_formula_reads_referenced_text() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "5");
    set(&mut sheet, "B1", "=A1*2");

    assert_eq!(value(&sheet, "A1"), CellValue::text("5"));
    assert_eq!(value(&sheet, "B1"), CellValue::Number(10.0));
    assert_eq!(text(&sheet, "B1"), "=A1*2");
}

#[test]
fn test_cycle_leaves_both_cells_unchanged() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "=B1");
    let before = printed_texts(&sheet);

    let err = sheet.set_cell(pos("B1"), "=A1").unwrap_err();
    assert_eq!(err, Error::CircularDependency(pos("B1")));
    assert_eq!(text(&sheet, "A1"), "=B1");
    assert_eq!(text(&sheet, "B1"), "");
    assert_eq!(printed_texts(&sheet), before);
}

#[test]
fn test_long_cycle_through_chain() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "=A2");
    set(&mut sheet, "A2", "=A3+B3");
    set(&mut sheet, "A3", "=A4");
    set(&mut sheet, "B3", "=A4*2");

    assert!(matches!(
        sheet.set_cell(pos("A4"), "=1+A1"),
        Err(Error::CircularDependency(_))
    ));
    // Not a cycle: A4 only reads a cell outside the chain
    set(&mut sheet, "A4", "=C9+1");
    assert_eq!(value(&sheet, "A1"), CellValue::Number(3.0));
}

#[test]
fn test_apostrophe_escape() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "'123");
    set(&mut sheet, "A2", "=A1+1");

    assert_eq!(text(&sheet, "A1"), "'123");
    assert_eq!(value(&sheet, "A1"), CellValue::text("123"));
    assert_eq!(value(&sheet, "A2"), CellValue::Number(124.0));
}

#[test]
fn test_lone_equals_sign_is_text() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "=");

    assert_eq!(sheet.get_cell(pos("A1")).unwrap().unwrap().kind(), &CellKind::Text("=".into()));
    assert_eq!(value(&sheet, "A1"), CellValue::text("="));
}

#[test]
fn test_division_by_zero_displays_arithm() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "=1/0");

    assert_eq!(value(&sheet, "A1"), CellValue::Error(FormulaError::Div0));
    assert_eq!(printed_values(&sheet), "#ARITHM!\n");
}

#[test]
fn test_syntax_error_leaves_sheet_unchanged() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "=1+2");

    for bad in ["=1+", "=(1", "=a1", "=1 2", "=A1#"] {
        let err = sheet.set_cell(pos("A1"), bad).unwrap_err();
        assert!(matches!(err, Error::FormulaSyntax { .. }), "{bad}: {err:?}");
    }
    assert_eq!(text(&sheet, "A1"), "=1+2");
    assert_eq!(value(&sheet, "A1"), CellValue::Number(3.0));
}

#[test]
fn test_repeated_reads_compute_once() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "=2*3");

    let start = sheet.evaluation_count();
    let first = value(&sheet, "A1");
    let second = value(&sheet, "A1");
    assert_eq!(first, second);
    assert_eq!(sheet.evaluation_count() - start, 1);
}

#[test]
fn test_edit_invalidates_chain_without_recomputing() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "1");
    set(&mut sheet, "B1", "=A1");
    set(&mut sheet, "C1", "=B1");
    assert_eq!(value(&sheet, "C1"), CellValue::Number(1.0));

    set(&mut sheet, "A1", "2");
    let before = sheet.evaluation_count();
    for addr in ["A1", "B1", "C1"] {
        assert!(!sheet.get_cell(pos(addr)).unwrap().unwrap().is_cached(), "{addr}");
    }
    // Nothing is recomputed until something is read
    assert_eq!(sheet.evaluation_count(), before);

    assert_eq!(value(&sheet, "C1"), CellValue::Number(2.0));
    assert_eq!(sheet.evaluation_count() - before, 3);

    // Everything on the chain is now cached
    assert_eq!(value(&sheet, "B1"), CellValue::Number(2.0));
    assert_eq!(sheet.evaluation_count() - before, 3);
}

#[test]
fn test_unrelated_edit_keeps_caches() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "1");
    set(&mut sheet, "B1", "=A1+1");
    assert_eq!(value(&sheet, "B1"), CellValue::Number(2.0));

    set(&mut sheet, "D4", "=7");
    assert!(sheet.get_cell(pos("B1")).unwrap().unwrap().is_cached());
}

#[test]
fn test_printable_size() {
    let mut sheet = Sheet::new();
    assert_eq!(sheet.printable_size(), Size::new(0, 0));

    set(&mut sheet, "C5", "x");
    assert_eq!(sheet.printable_size(), Size::new(5, 3));

    sheet.clear_cell(pos("C5")).unwrap();
    assert_eq!(sheet.printable_size(), Size::new(0, 0));

    // A referenced cell exists even before it gets text
    set(&mut sheet, "A1", "=C3");
    assert_eq!(sheet.printable_size(), Size::new(3, 3));
    assert_eq!(printed_texts(&sheet), "=C3\t\t\n\t\t\n\t\t\n");
}

#[test]
fn test_print_grid() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "2");
    set(&mut sheet, "B1", "=A1 / 4");
    set(&mut sheet, "A2", "hello");
    set(&mut sheet, "C3", "=(A1+B1)*-(A1-1)");
    set(&mut sheet, "B3", "=A2+1");

    assert_eq!(
        printed_texts(&sheet),
        "2\t=A1/4\t\nhello\t\t\n\t=A2+1\t=(A1+B1)*-(A1-1)\n"
    );
    assert_eq!(
        printed_values(&sheet),
        "2\t0.5\t\nhello\t\t\n\t#VALUE!\t-2.5\n"
    );
}

#[test]
fn test_out_of_grid_reference() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "=B1+ZZZZ1");

    assert_eq!(value(&sheet, "A1"), CellValue::Error(FormulaError::Ref));
    assert_eq!(text(&sheet, "A1"), "=B1+ZZZZ1");
    assert_eq!(
        sheet.get_cell(pos("A1")).unwrap().unwrap().referenced_cells(),
        &[pos("B1")]
    );
}

#[test]
fn test_errors_display_in_printed_values() {
    let mut sheet = Sheet::new();
    set(&mut sheet, "A1", "=XFE1");
    set(&mut sheet, "B1", "=A1*2");
    set(&mut sheet, "C1", "word");
    set(&mut sheet, "D1", "=C1");

    assert_eq!(printed_values(&sheet), "#REF!\t#REF!\tword\t#VALUE!\n");
}
