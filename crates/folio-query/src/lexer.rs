//! Query lexer.
//!
//! Converts a query string into a stream of tokens, each tagged with the byte
//! offset where it starts so that parse errors can point back into the input.

use std::{iter::Peekable, ops::Bound, str::Chars};

use crate::error::LexError;

/// Largest edit distance accepted by the fuzzy operator.
const MAX_FUZZY_DISTANCE: u8 = 2;

/// A token in the query language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A bare word.
    Term(String),

    /// A quoted phrase (the quotes are stripped, content preserved).
    Phrase(String),

    /// A word containing `*` or `?`.
    Wildcard(String),

    /// A word followed by `~` and an optional edit distance.
    Fuzzy {
        /// The word to match approximately.
        term: String,
        /// Maximum edit distance.
        distance: u8,
    },

    /// A bracketed range such as `[2 TO 10]` or `{a TO *}`.
    Range {
        /// Lower end of the range.
        lower: Bound<String>,
        /// Upper end of the range.
        upper: Bound<String>,
    },

    /// `AND` or `&&`.
    And,

    /// `OR` or `||`.
    Or,

    /// `NOT`, `-` or `!`.
    Not,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// Field prefix (`fileName:` produces `FieldPrefix("fileName")`).
    FieldPrefix(String),

    /// Boost operator with factor (`^2.5` produces `Boost(2.5)`).
    Boost(f32),
}

/// A token together with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    /// The token.
    pub token: Token,
    /// Byte offset of the first character of the token.
    pub offset: usize,
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input.
    fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.chars.peek().is_none() {
                break;
            }
            let offset = self.position;
            if let Some(token) = self.next_token()? {
                tokens.push(Spanned { token, offset });
            }
        }

        Ok(tokens)
    }

    /// Returns the next token, or None at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        match ch {
            '"' => self.read_phrase(),
            '(' => {
                self.advance();
                Ok(Some(Token::LParen))
            }
            ')' => {
                self.advance();
                Ok(Some(Token::RParen))
            }
            '-' | '!' => {
                self.advance();
                Ok(Some(Token::Not))
            }
            '[' | '{' => self.read_range(),
            '^' => self.read_boost(),
            '~' => Err(self.error_at("'~' must follow a term", self.position)),
            '&' | '|' => self.read_symbolic_operator(ch),
            _ => self.read_word(),
        }
    }

    /// Reads `&&` or `||`; a lone `&` or `|` is part of a word.
    fn read_symbolic_operator(&mut self, ch: char) -> Result<Option<Token>, LexError> {
        let doubled = self.input[self.position..].starts_with(if ch == '&' { "&&" } else { "||" });
        if !doubled {
            return self.read_word();
        }
        self.advance();
        self.advance();
        Ok(Some(if ch == '&' { Token::And } else { Token::Or }))
    }

    /// Reads a quoted phrase.
    fn read_phrase(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        self.advance();

        let mut content = String::new();
        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance();
                    return Ok(Some(Token::Phrase(content)));
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => return Err(self.error_at("unclosed quote", start_pos)),
            }
        }
    }

    /// Reads a word: a term, wildcard, fuzzy term, keyword, or field prefix.
    fn read_word(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | '^' | '~') {
                break;
            }

            if ch == ':' {
                self.advance();
                if word.is_empty() {
                    // A stray colon carries no meaning; skip it.
                    continue;
                }
                return Ok(Some(Token::FieldPrefix(word)));
            }

            word.push(ch);
            self.advance();
        }

        if word.is_empty() {
            return Ok(None);
        }

        match word.as_str() {
            "AND" => return Ok(Some(Token::And)),
            "OR" => return Ok(Some(Token::Or)),
            "NOT" => return Ok(Some(Token::Not)),
            _ => {}
        }

        let is_wildcard = word.contains(['*', '?']);

        if self.chars.peek() == Some(&'~') {
            if is_wildcard {
                return Err(self.error_at("wildcard terms cannot be fuzzy", start_pos));
            }
            let distance = self.read_fuzzy_distance()?;
            return Ok(Some(Token::Fuzzy {
                term: word,
                distance,
            }));
        }

        if is_wildcard {
            Ok(Some(Token::Wildcard(word)))
        } else {
            Ok(Some(Token::Term(word)))
        }
    }

    /// Reads `~` and an optional single-digit distance.
    fn read_fuzzy_distance(&mut self) -> Result<u8, LexError> {
        let start_pos = self.position;
        self.advance();

        let mut digits = String::new();
        while let Some(&ch) = self.chars.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            self.advance();
        }

        if digits.is_empty() {
            return Ok(1);
        }

        match digits.parse::<u8>() {
            Ok(distance) if distance <= MAX_FUZZY_DISTANCE => Ok(distance),
            _ => Err(self.error_at(
                format!("fuzzy distance must be at most {MAX_FUZZY_DISTANCE}, got {digits}"),
                start_pos,
            )),
        }
    }

    /// Reads a range: `[` or `{`, lower, `TO`, upper, `]` or `}`.
    fn read_range(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        let inclusive_lower = self.chars.peek() == Some(&'[');
        self.advance();

        let mut body = String::new();
        let inclusive_upper = loop {
            match self.chars.peek() {
                Some(&']') => break true,
                Some(&'}') => break false,
                Some(&ch) => {
                    body.push(ch);
                    self.advance();
                }
                None => return Err(self.error_at("unclosed range", start_pos)),
            }
        };
        self.advance();

        let parts: Vec<&str> = body.split_whitespace().collect();
        let [lower, "TO", upper] = parts.as_slice() else {
            return Err(self.error_at("range must have the form [lower TO upper]", start_pos));
        };

        Ok(Some(Token::Range {
            lower: range_bound(lower, inclusive_lower),
            upper: range_bound(upper, inclusive_upper),
        }))
    }

    /// Reads a boost operator (`^N` or `^N.N`).
    fn read_boost(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        self.advance();

        let mut number = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() || (ch == '.' && !number.contains('.')) {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if number.is_empty() {
            return Err(self.error_at("expected number after '^'", start_pos));
        }

        match number.parse::<f32>() {
            Ok(factor) => Ok(Some(Token::Boost(factor))),
            Err(_) => Err(self.error_at(format!("invalid boost value: {number}"), start_pos)),
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Maps one end of a range to a bound; `*` leaves that end open.
fn range_bound(value: &str, inclusive: bool) -> Bound<String> {
    match value {
        "*" => Bound::Unbounded,
        v if inclusive => Bound::Included(v.to_string()),
        v => Bound::Excluded(v.to_string()),
    }
}

/// Tokenizes a query string, keeping token offsets.
pub(crate) fn tokenize_spanned(input: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(input).tokenize()
}

/// Tokenizes a query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Ok(tokenize_spanned(input)?
        .into_iter()
        .map(|s| s.token)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> Token {
        Token::Term(s.into())
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
        assert_eq!(tokenize("   ").unwrap(), vec![]);
    }

    #[test]
    fn adjacent_terms() {
        assert_eq!(
            tokenize("annual  report").unwrap(),
            vec![term("annual"), term("report")]
        );
    }

    #[test]
    fn quoted_phrase() {
        assert_eq!(
            tokenize("\"annual report\"").unwrap(),
            vec![Token::Phrase("annual report".into())]
        );
    }

    #[test]
    fn unclosed_quote_error() {
        let err = tokenize("revenue \"annual report").unwrap_err();
        assert_eq!(err.position, 8);
        assert!(err.message.contains("unclosed"));
    }

    #[test]
    fn keywords_are_uppercase_only() {
        assert_eq!(
            tokenize("a AND b OR c NOT d").unwrap(),
            vec![
                term("a"),
                Token::And,
                term("b"),
                Token::Or,
                term("c"),
                Token::Not,
                term("d")
            ]
        );
        assert_eq!(
            tokenize("cats and dogs").unwrap(),
            vec![term("cats"), term("and"), term("dogs")]
        );
    }

    #[test]
    fn symbolic_operators() {
        assert_eq!(
            tokenize("a && b || !c").unwrap(),
            vec![
                term("a"),
                Token::And,
                term("b"),
                Token::Or,
                Token::Not,
                term("c")
            ]
        );
    }

    #[test]
    fn lone_ampersand_is_part_of_term() {
        assert_eq!(tokenize("r&d").unwrap(), vec![term("r&d")]);
    }

    #[test]
    fn hyphen_inside_word_is_not_negation() {
        assert_eq!(
            tokenize("e-mail -spam").unwrap(),
            vec![term("e-mail"), Token::Not, term("spam")]
        );
    }

    #[test]
    fn wildcards() {
        assert_eq!(
            tokenize("rev* gr?w").unwrap(),
            vec![Token::Wildcard("rev*".into()), Token::Wildcard("gr?w".into())]
        );
    }

    #[test]
    fn fuzzy_default_and_explicit_distance() {
        assert_eq!(
            tokenize("revnue~ growht~2").unwrap(),
            vec![
                Token::Fuzzy {
                    term: "revnue".into(),
                    distance: 1
                },
                Token::Fuzzy {
                    term: "growht".into(),
                    distance: 2
                }
            ]
        );
    }

    #[test]
    fn fuzzy_distance_too_large() {
        let err = tokenize("revenue~5").unwrap_err();
        assert!(err.message.contains("at most 2"));
        assert_eq!(err.position, 7);
    }

    #[test]
    fn fuzzy_wildcard_rejected() {
        assert!(tokenize("rev*~1").is_err());
    }

    #[test]
    fn dangling_tilde_rejected() {
        assert!(tokenize("\"a b\"~2").is_err());
    }

    #[test]
    fn field_prefix() {
        assert_eq!(
            tokenize("fileName:report").unwrap(),
            vec![Token::FieldPrefix("fileName".into()), term("report")]
        );
    }

    #[test]
    fn inclusive_range() {
        assert_eq!(
            tokenize("pageCount:[2 TO 10]").unwrap(),
            vec![
                Token::FieldPrefix("pageCount".into()),
                Token::Range {
                    lower: Bound::Included("2".into()),
                    upper: Bound::Included("10".into())
                }
            ]
        );
    }

    #[test]
    fn mixed_and_open_range() {
        assert_eq!(
            tokenize("{* TO 5]").unwrap(),
            vec![Token::Range {
                lower: Bound::Unbounded,
                upper: Bound::Included("5".into())
            }]
        );
    }

    #[test]
    fn malformed_range() {
        assert!(tokenize("[1 10]").is_err());
        assert!(tokenize("[1 TO 10").unwrap_err().message.contains("unclosed"));
    }

    #[test]
    fn boost_values() {
        assert_eq!(
            tokenize("revenue^2.5 \"net income\"^3").unwrap(),
            vec![
                term("revenue"),
                Token::Boost(2.5),
                Token::Phrase("net income".into()),
                Token::Boost(3.0)
            ]
        );
    }

    #[test]
    fn boost_missing_number() {
        let err = tokenize("revenue^").unwrap_err();
        assert!(err.message.contains("expected number"));
    }

    #[test]
    fn offsets_are_byte_positions() {
        let spans = tokenize_spanned("é OR b").unwrap();
        let offsets: Vec<usize> = spans.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 3, 6]);
    }
}
