//! Nom-based parsing of formula call shapes.
//!
//! Formulas are `=NAME(...)`. These parsers recognise the head and the
//! exact argument shapes `REF`, `SUM` and `AVG` accept; anything that does
//! not match is reported as `None` so callers can fail soft.

use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{all_consuming, map_opt},
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};

use gridcalc_core::{CellRef, RangeRef};

// =============================================================================
// Helper Combinators
// =============================================================================

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A run of word characters (`[A-Za-z0-9_]+`)
fn word(input: &str) -> IResult<&str, &str> {
    take_while1(is_word_char)(input)
}

/// A word that is also valid A1 notation
fn cell_ref(input: &str) -> IResult<&str, CellRef> {
    map_opt(word, CellRef::parse)(input)
}

/// `Ref1:Ref2`
fn range_ref(input: &str) -> IResult<&str, RangeRef> {
    let (input, (start, end)) = separated_pair(cell_ref, char(':'), cell_ref)(input)?;
    Ok((input, RangeRef::new(start, end)))
}

// =============================================================================
// Public API
// =============================================================================

/// Function name of a formula: `"SUM"` for `=SUM(A1:A2)`
pub fn formula_name(formula: &str) -> Option<&str> {
    preceded(char('='), word)(formula)
        .ok()
        .map(|(_, name)| name)
}

/// Argument of a formula that is exactly `=REF(Ref)`
pub fn ref_argument(formula: &str) -> Option<CellRef> {
    all_consuming(delimited(tag("=REF("), cell_ref, char(')')))(formula)
        .ok()
        .map(|(_, cell)| cell)
}

/// Argument of a formula that is exactly `=NAME(Ref1:Ref2)`
pub fn range_argument(formula: &str) -> Option<RangeRef> {
    all_consuming(tuple((char('='), word, delimited(char('('), range_ref, char(')')))))(formula)
        .ok()
        .map(|(_, (_, _, range))| range)
}

/// Expression of a `CALC` formula: the text between `=CALC(` and the last `)`
pub fn calc_expression(formula: &str) -> Option<&str> {
    let (body, _) = tag::<_, _, nom::error::Error<&str>>("=CALC(")(formula).ok()?;
    let end = body.rfind(')')?;
    Some(&body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_formula_name() {
        assert_eq!(formula_name("=SUM(A1:A2)"), Some("SUM"));
        assert_eq!(formula_name("=CALC(1+2)"), Some("CALC"));
        assert_eq!(formula_name("=(1)"), None);
        assert_eq!(formula_name("SUM(A1)"), None);
    }

    #[test]
    fn test_ref_argument() {
        assert_eq!(ref_argument("=REF(B3)"), Some(CellRef::new(2, 1)));
        assert_eq!(ref_argument("=REF(B3) "), None);
        assert_eq!(ref_argument("=REF(b3)"), None);
        assert_eq!(ref_argument("=REF(A1:A2)"), None);
        assert_eq!(ref_argument("=REF()"), None);
    }

    #[test]
    fn test_range_argument() {
        assert_eq!(
            range_argument("=SUM(A1:A4)"),
            Some(RangeRef::new(CellRef::new(0, 0), CellRef::new(3, 0)))
        );
        assert_eq!(
            range_argument("=AVG(B2:A1)"),
            Some(RangeRef::new(CellRef::new(1, 1), CellRef::new(0, 0)))
        );
        assert_eq!(range_argument("=SUM(A1)"), None);
        assert_eq!(range_argument("=SUM(A1:A4)+1"), None);
        assert_eq!(range_argument("=SUM(A1, A4)"), None);
    }

    #[test]
    fn test_calc_expression() {
        assert_eq!(calc_expression("=CALC(1+2)"), Some("1+2"));
        assert_eq!(calc_expression("=CALC((1+2)*3)"), Some("(1+2)*3"));
        assert_eq!(calc_expression("=CALC(1+2"), None);
        assert_eq!(calc_expression("=SUM(A1:A2)"), None);
    }
}
