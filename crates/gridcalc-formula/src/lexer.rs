/// Token types for arithmetic expressions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),

    // Operators
    Plus,
    Minus,
    Multiply,
    Divide,
    Power, // ^

    // Delimiters
    LeftParen,
    RightParen,
}

/// Lexer for `CALC` expressions.
///
/// Recognises number literals (`12`, `1.5`, `.5`), the five binary operators
/// and parentheses. Every other character is dropped, so malformed input
/// yields fewer tokens rather than an error.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while self.position < self.input.len() {
            if let Some(token) = self.next_token() {
                tokens.push(token);
            }
        }

        tokens
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.position += 1;
        c
    }

    fn next_token(&mut self) -> Option<Token> {
        let c = self.advance()?;

        match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Multiply),
            '/' => Some(Token::Divide),
            '^' => Some(Token::Power),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            '0'..='9' => {
                self.position -= 1;
                self.read_number()
            }
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => {
                self.position -= 1;
                self.read_number()
            }
            _ => None,
        }
    }

    fn read_number(&mut self) -> Option<Token> {
        let mut s = String::new();

        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            s.push(c);
            self.advance();
        }

        // A fraction needs at least one digit after the dot
        if self.peek() == Some('.') && self.peek_next().is_some_and(|n| n.is_ascii_digit()) {
            s.push('.');
            self.advance();
            while let Some(c) = self.peek().filter(char::is_ascii_digit) {
                s.push(c);
                self.advance();
            }
        }

        s.parse::<f64>().ok().map(Token::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            tokens("1 + 2 * 3"),
            vec![
                Token::Number(1.0),
                Token::Plus,
                Token::Number(2.0),
                Token::Multiply,
                Token::Number(3.0),
            ]
        );
    }

    #[test]
    fn test_decimals() {
        assert_eq!(tokens("1.5"), vec![Token::Number(1.5)]);
        assert_eq!(tokens(".25"), vec![Token::Number(0.25)]);
        assert_eq!(tokens("1.2.3"), vec![Token::Number(1.2), Token::Number(0.3)]);
        assert_eq!(tokens("7."), vec![Token::Number(7.0)]);
    }

    #[test]
    fn test_unknown_characters_dropped() {
        assert_eq!(tokens("abc"), vec![]);
        assert_eq!(tokens("2 x 3"), vec![Token::Number(2.0), Token::Number(3.0)]);
        assert_eq!(
            tokens("(4)^2"),
            vec![
                Token::LeftParen,
                Token::Number(4.0),
                Token::RightParen,
                Token::Power,
                Token::Number(2.0),
            ]
        );
    }
}
