//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query      → or_expr
//! or_expr    → and_expr (("OR" | <adjacent>) and_expr)*
//! and_expr   → unary ("AND" unary)*
//! unary      → "NOT" unary | primary
//! primary    → (TERM | PHRASE | WILDCARD | FUZZY | field_expr | "(" or_expr ")") ("^" NUMBER)?
//! field_expr → FIELD_PREFIX (TERM | PHRASE | WILDCARD | FUZZY | RANGE | "(" or_expr ")")
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. Field prefix: `field:`
//! 3. Boost: `^n`
//! 4. Negation: `NOT`, `-`, `!`
//! 5. AND: `AND`, `&&`
//! 6. OR: `OR`, `||`, or plain adjacency

use crate::{
    ast::QueryExpr,
    error::{ParseError, QueryError},
    lexer::{Spanned, Token, tokenize_spanned},
};

/// Recursive descent parser for query expressions.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Spanned>,
    /// Current position in token stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the token stream into a query expression.
    fn parse(mut self) -> Result<Option<QueryExpr>, ParseError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let expr = self.parse_or_expr()?;

        if let Some(token) = self.peek() {
            return Err(self.error(format!("unexpected token: {}", describe(token))));
        }

        Ok(Some(expr))
    }

    /// Parses: or_expr → and_expr (("OR" | <adjacent>) and_expr)*
    fn parse_or_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut alternatives = vec![self.parse_and_expr()?];

        loop {
            if self.check(&Token::Or) {
                self.advance();
                alternatives.push(self.parse_and_expr()?);
            } else if self.can_start_unary() {
                alternatives.push(self.parse_and_expr()?);
            } else {
                break;
            }
        }

        Ok(QueryExpr::or(alternatives))
    }

    /// Parses: and_expr → unary ("AND" unary)*
    fn parse_and_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut operands = vec![self.parse_unary()?];

        while self.check(&Token::And) {
            self.advance();
            operands.push(self.parse_unary()?);
        }

        Ok(QueryExpr::and(operands))
    }

    /// Checks if the current token can start a unary expression.
    fn can_start_unary(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Term(_)
                    | Token::Phrase(_)
                    | Token::Wildcard(_)
                    | Token::Fuzzy { .. }
                    | Token::Range { .. }
                    | Token::Not
                    | Token::LParen
                    | Token::FieldPrefix(_)
            )
        )
    }

    /// Parses: unary → "NOT" unary | primary
    fn parse_unary(&mut self) -> Result<QueryExpr, ParseError> {
        if self.check(&Token::Not) {
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(QueryExpr::Not(Box::new(expr)));
        }

        self.parse_primary()
    }

    /// Parses a primary expression and an optional boost suffix.
    fn parse_primary(&mut self) -> Result<QueryExpr, ParseError> {
        let expr = match self.peek().cloned() {
            Some(Token::FieldPrefix(name)) => {
                self.advance();
                self.parse_field_expr(name)?
            }
            Some(Token::LParen) => self.parse_group("expected closing parenthesis")?,
            Some(Token::Range { .. }) => {
                return Err(self.error("a range needs a field, e.g. pageCount:[1 TO 5]"));
            }
            Some(token @ (Token::Or | Token::And)) => {
                return Err(self.error(format!(
                    "unexpected {} (needs expression before it)",
                    describe(&token)
                )));
            }
            Some(Token::RParen) => return Err(self.error("unexpected closing parenthesis")),
            Some(Token::Boost(_)) => {
                return Err(self.error("unexpected boost (needs expression before it)"));
            }
            Some(Token::Not) => return Err(self.error("unexpected negation")),
            Some(_) => self.parse_leaf(false)?,
            None => return Err(self.error("unexpected end of query")),
        };

        Ok(self.maybe_apply_boost(expr))
    }

    /// Applies a boost suffix if one follows.
    fn maybe_apply_boost(&mut self, expr: QueryExpr) -> QueryExpr {
        if let Some(Token::Boost(factor)) = self.peek() {
            let factor = *factor;
            self.advance();
            QueryExpr::boost(expr, factor)
        } else {
            expr
        }
    }

    /// Parses the expression after a field prefix.
    fn parse_field_expr(&mut self, name: String) -> Result<QueryExpr, ParseError> {
        let expr = match self.peek() {
            Some(Token::LParen) => {
                self.parse_group("expected closing parenthesis after field expression")?
            }
            Some(
                Token::Term(_)
                | Token::Phrase(_)
                | Token::Wildcard(_)
                | Token::Fuzzy { .. }
                | Token::Range { .. },
            ) => self.parse_leaf(true)?,
            _ => {
                return Err(self.error(format!(
                    "expected term, phrase, range, or group after '{name}:'"
                )));
            }
        };

        Ok(QueryExpr::field(name, expr))
    }

    /// Consumes a single-token expression. Ranges are only allowed in a field.
    fn parse_leaf(&mut self, allow_range: bool) -> Result<QueryExpr, ParseError> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error("unexpected end of query"));
        };

        let expr = match token {
            Token::Term(text) => QueryExpr::Term(text),
            Token::Wildcard(pattern) => QueryExpr::Wildcard(pattern),
            Token::Fuzzy { term, distance } => QueryExpr::Fuzzy { term, distance },
            Token::Range { lower, upper } if allow_range => QueryExpr::Range { lower, upper },
            Token::Phrase(text) => {
                let words: Vec<String> = text.split_whitespace().map(String::from).collect();
                match words.len() {
                    0 => return Err(self.error("empty phrase")),
                    1 => QueryExpr::Term(words.into_iter().collect()),
                    _ => QueryExpr::Phrase(words),
                }
            }
            other => return Err(self.error(format!("unexpected token: {}", describe(&other)))),
        };

        self.advance();
        Ok(expr)
    }

    /// Parses a parenthesized group, consuming the surrounding parentheses.
    fn parse_group(&mut self, missing_rparen_msg: &str) -> Result<QueryExpr, ParseError> {
        self.advance();
        let inner = self.parse_or_expr()?;

        if !self.check(&Token::RParen) {
            return Err(self.error(missing_rparen_msg));
        }
        self.advance();

        Ok(inner)
    }

    /// Builds an error pointing at the current token.
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.tokens.get(self.position).map(|s| s.offset))
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|s| &s.token)
    }

    /// Checks if the current token equals the given operator token.
    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Human-readable name of a token for error messages.
fn describe(token: &Token) -> String {
    match token {
        Token::Term(t) | Token::Wildcard(t) => format!("'{t}'"),
        Token::Phrase(p) => format!("\"{p}\""),
        Token::Fuzzy { term, distance } => format!("'{term}~{distance}'"),
        Token::Range { .. } => "range".into(),
        Token::And => "AND".into(),
        Token::Or => "OR".into(),
        Token::Not => "NOT".into(),
        Token::LParen => "'('".into(),
        Token::RParen => "')'".into(),
        Token::FieldPrefix(f) => format!("'{f}:'"),
        Token::Boost(b) => format!("'^{b}'"),
    }
}

/// Parses a query string into an AST.
///
/// Returns `Ok(None)` for empty queries, `Ok(Some(expr))` for valid queries,
/// or `Err(QueryError)` for invalid syntax.
pub fn parse(input: &str) -> Result<Option<QueryExpr>, QueryError> {
    let tokens = tokenize_spanned(input)?;
    Parser::new(tokens)
        .parse()
        .map_err(|e| QueryError::parse(e.message, e.position, Some(input.to_string())))
}
