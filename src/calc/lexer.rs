//! Expression tokenizer

use super::CalcError;

/// A lexical token of the expression grammar
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    LParen,
    RParen,
    Comma,
}

/// Split an expression into tokens.
///
/// Numbers are decimal literals with an optional fractional part.
/// Identifiers are ASCII `[a-zA-Z_][a-zA-Z0-9_]*`; whether they name a
/// known constant, variable, or function is decided later.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                let mut seen_dot = false;
                while let Some(&d) = chars.peek() {
                    match d {
                        '0'..='9' => literal.push(d),
                        '.' if !seen_dot => {
                            seen_dot = true;
                            literal.push(d);
                        }
                        _ => break,
                    }
                    chars.next();
                }
                let value: f64 = literal
                    .parse()
                    .map_err(|_| CalcError::Syntax(format!("invalid number: {}", literal)))?;
                tokens.push(Token::Number(value));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut ident = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        ident.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::StarStar);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            other => {
                return Err(CalcError::Syntax(format!(
                    "unexpected character: {:?}",
                    other
                )));
            }
        }
    }

    if tokens.is_empty() {
        return Err(CalcError::Syntax("empty expression".to_string()));
    }

    Ok(tokens)
}
