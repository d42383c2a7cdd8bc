use gridcalc_core::{SheetError, SheetResult};

use crate::lexer::{Lexer, Token};

/// Binary operators understood by the calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    fn from_token(token: Token) -> Option<Self> {
        match token {
            Token::Plus => Some(Operator::Add),
            Token::Minus => Some(Operator::Subtract),
            Token::Multiply => Some(Operator::Multiply),
            Token::Divide => Some(Operator::Divide),
            Token::Power => Some(Operator::Power),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
            Operator::Power => 3,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Power => '^',
        }
    }

    /// Apply the operator to `a` and `b` (in that order)
    pub fn apply(self, a: f64, b: f64) -> SheetResult<f64> {
        match self {
            Operator::Add => Ok(a + b),
            Operator::Subtract => Ok(a - b),
            Operator::Multiply => Ok(a * b),
            Operator::Divide => {
                if b == 0.0 {
                    return Err(SheetError::DivisionByZero);
                }
                Ok(a / b)
            }
            Operator::Power => Ok(a.powf(b)),
        }
    }
}

/// Entry on the operator stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Operator(Operator),
    OpenParen,
}

/// Two-stack (shunting-yard) evaluator for `CALC` expressions.
///
/// Supports `+ - * / ^` and parentheses over non-negative number literals.
/// There is no unary minus. Operands missing from the number stack read as
/// NaN, so incomplete input evaluates to NaN instead of failing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Calculator
    }

    /// Evaluate `expression` to a number.
    ///
    /// Empty or token-free input yields NaN. Division by a zero right operand
    /// fails with [`SheetError::DivisionByZero`]; an unmatched `(` left on the
    /// operator stack fails with [`SheetError::InvalidOperator`].
    pub fn evaluate(&self, expression: &str) -> SheetResult<f64> {
        let tokens = Lexer::new(expression).tokenize();
        if tokens.is_empty() {
            return Ok(f64::NAN);
        }

        let mut numbers: Vec<f64> = Vec::new();
        let mut operators: Vec<Pending> = Vec::new();

        for token in tokens {
            match token {
                Token::Number(n) => numbers.push(n),
                Token::LeftParen => operators.push(Pending::OpenParen),
                Token::RightParen => {
                    while let Some(Pending::Operator(_)) = operators.last() {
                        apply_top(&mut numbers, &mut operators)?;
                    }
                    // Discard the matching `(`, if any
                    operators.pop();
                }
                _ => {
                    let Some(op) = Operator::from_token(token) else {
                        continue;
                    };
                    while let Some(&top) = operators.last() {
                        if !has_precedence(top, op) {
                            break;
                        }
                        apply_top(&mut numbers, &mut operators)?;
                    }
                    operators.push(Pending::Operator(op));
                }
            }
        }

        while !operators.is_empty() {
            apply_top(&mut numbers, &mut operators)?;
        }

        Ok(numbers.pop().unwrap_or(0.0))
    }
}

/// Whether `top` must be applied before `incoming` is pushed.
///
/// `^` forces reduction from either side; other operators reduce while the
/// stacked one binds at least as tightly, which keeps `- /` left-associative.
fn has_precedence(top: Pending, incoming: Operator) -> bool {
    match top {
        Pending::OpenParen => false,
        Pending::Operator(top) => {
            if top == Operator::Power || incoming == Operator::Power {
                return true;
            }
            top.precedence() >= incoming.precedence()
        }
    }
}

fn apply_top(numbers: &mut Vec<f64>, operators: &mut Vec<Pending>) -> SheetResult<()> {
    let b = numbers.pop().unwrap_or(f64::NAN);
    let a = numbers.pop().unwrap_or(f64::NAN);

    match operators.pop() {
        Some(Pending::Operator(op)) => {
            numbers.push(op.apply(a, b)?);
            Ok(())
        }
        Some(Pending::OpenParen) => Err(SheetError::InvalidOperator('(')),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eval(expression: &str) -> SheetResult<f64> {
        Calculator::new().evaluate(expression)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(eval("20 - 4 / 2").unwrap(), 18.0);
        assert_eq!(eval("2 * 3 + 4").unwrap(), 10.0);
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(eval("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(eval("((10 - 5) * 2) / 2").unwrap(), 5.0);
        assert_eq!(eval("(()())").unwrap(), 0.0);
    }

    #[test]
    fn test_power() {
        assert_eq!(eval("3 ^ 4").unwrap(), 81.0);
        assert_eq!(eval("2 ^ 3 * 2").unwrap(), 16.0);
        assert_eq!(eval("2 * 3 ^ 2").unwrap(), 36.0);
        // Chains reduce left to right
        assert_eq!(eval("2 ^ 3 ^ 2").unwrap(), 64.0);
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(eval("10 - 3 - 2").unwrap(), 5.0);
        assert_eq!(eval("100 / 10 / 5").unwrap(), 2.0);
    }

    #[test]
    fn test_decimals() {
        assert_eq!(eval("1.5 + .5").unwrap(), 2.0);
        assert_eq!(eval("7 / 2").unwrap(), 3.5);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("5 / 0"), Err(SheetError::DivisionByZero));
        assert_eq!(eval("5 / (2 - 2)"), Err(SheetError::DivisionByZero));
    }

    #[test]
    fn test_incomplete_input_is_nan() {
        assert!(eval("").unwrap().is_nan());
        assert!(eval("abc").unwrap().is_nan());
        assert!(eval("2 +").unwrap().is_nan());
        assert!(eval("++++").unwrap().is_nan());
        assert!(eval("-5").unwrap().is_nan());
    }

    #[test]
    fn test_unmatched_open_paren() {
        assert_eq!(eval("(2 + 3"), Err(SheetError::InvalidOperator('(')));
    }

    #[test]
    fn test_extra_close_paren_ignored() {
        assert_eq!(eval("2 + 3)").unwrap(), 5.0);
    }

    #[test]
    fn test_has_precedence() {
        let add = Pending::Operator(Operator::Add);
        let mul = Pending::Operator(Operator::Multiply);
        let pow = Pending::Operator(Operator::Power);

        assert!(!has_precedence(Pending::OpenParen, Operator::Power));
        assert!(has_precedence(pow, Operator::Add));
        assert!(has_precedence(add, Operator::Power));
        assert!(has_precedence(mul, Operator::Add));
        assert!(has_precedence(add, Operator::Subtract));
        assert!(!has_precedence(add, Operator::Multiply));
    }

    #[test]
    fn test_operator_symbols() {
        let symbols: String = [
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
            Operator::Power,
        ]
        .iter()
        .map(|op| op.symbol())
        .collect();
        assert_eq!(symbols, "+-*/^");
    }

    proptest! {
        #[test]
        fn prop_multiplication_binds_tighter(a in 0u32..1000, b in 0u32..1000, c in 0u32..1000) {
            let expr = format!("{} + {} * {}", a, b, c);
            let expected = a as f64 + (b as f64 * c as f64);
            prop_assert_eq!(eval(&expr).unwrap(), expected);
        }

        #[test]
        fn prop_subtraction_is_left_associative(a in 0u32..1000, b in 0u32..1000, c in 0u32..1000) {
            let expr = format!("{} - {} - {}", a, b, c);
            let expected = (a as f64 - b as f64) - c as f64;
            prop_assert_eq!(eval(&expr).unwrap(), expected);
        }

        #[test]
        fn prop_power_chains_left_to_right(a in 1u32..6, b in 0u32..4, c in 0u32..4) {
            let expr = format!("{} ^ {} ^ {}", a, b, c);
            let expected = (a as f64).powf(b as f64).powf(c as f64);
            prop_assert_eq!(eval(&expr).unwrap(), expected);
        }
    }
}
