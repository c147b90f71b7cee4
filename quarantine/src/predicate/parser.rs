//! Recursive-descent parser: tokens -> [`Expr`].
//!
//! Precedence, loosest to tightest: `||`, `&&`, unary `!`, comparison,
//! primary. Comparisons do not chain (`a > b > c` is a syntax error,
//! matching the grammar in spec §3 which only lists binary comparisons).

use super::ast::{CompareOp, Expr};
use super::lexer::{Token, tokenize};
use super::value::Value;

use super::PredicateError;

pub fn parse(src: &str) -> Result<Expr, PredicateError> {
    let tokens = tokenize(src).map_err(|e| PredicateError(e.to_string()))?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(PredicateError(format!(
            "trailing tokens after expression at token {}",
            parser.pos
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn parse_or(&mut self) -> Result<Expr, PredicateError> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Some(Token::OrOr)) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, PredicateError> {
        let mut left = self.parse_unary()?;
        while matches!(self.peek(), Some(Token::AndAnd)) {
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, PredicateError> {
        if matches!(self.peek(), Some(Token::Bang)) {
            self.advance();
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, PredicateError> {
        let left = self.parse_primary()?;
        let op = match self.peek() {
            Some(Token::Gt) => Some(CompareOp::Gt),
            Some(Token::Lt) => Some(CompareOp::Lt),
            Some(Token::EqEq) => Some(CompareOp::Eq),
            Some(Token::NotEq) => Some(CompareOp::Ne),
            _ => None,
        };
        let Some(op) = op else {
            return Ok(left);
        };
        self.advance();
        let right = self.parse_primary()?;
        Ok(Expr::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, PredicateError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Literal(Value::Number(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Str(s))),
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(PredicateError("expected closing ')'".to_string())),
                }
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok(Expr::Literal(Value::Bool(true))),
                "false" => Ok(Expr::Literal(Value::Bool(false))),
                _ => {
                    if matches!(self.peek(), Some(Token::LBracket)) {
                        self.advance();
                        let key = match self.advance() {
                            Some(Token::Str(s)) => s,
                            _ => {
                                return Err(PredicateError(
                                    "expected string key inside '[...]'".to_string(),
                                ));
                            }
                        };
                        match self.advance() {
                            Some(Token::RBracket) => {}
                            _ => return Err(PredicateError("expected closing ']'".to_string())),
                        }
                        Ok(Expr::Index { base: name, key })
                    } else {
                        Ok(Expr::Var(name))
                    }
                }
            },
            other => Err(PredicateError(format!(
                "unexpected token in expression: {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_comparison() {
        let expr = parse("cpu > 8000").unwrap();
        assert!(matches!(expr, Expr::Compare { .. }));
    }

    #[test]
    fn parses_metadata_index() {
        let expr = parse(r#"metadata["untrusted"] == "true""#).unwrap();
        match expr {
            Expr::Compare { left, .. } => {
                assert!(matches!(*left, Expr::Index { .. }));
            }
            _ => panic!("expected comparison"),
        }
    }

    #[test]
    fn rejects_garbled_operator() {
        // spec scenario 3: "cpu >>> 8000" must fail to compile, not panic.
        assert!(parse("cpu >>> 8000").is_err());
    }

    #[test]
    fn parses_logical_combination() {
        let expr = parse(r#"cpu > 8000 && mem > 100"#).unwrap();
        assert!(matches!(expr, Expr::And(_, _)));
    }
}
