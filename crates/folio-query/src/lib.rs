//! Query language for folio document search.
//!
//! The syntax follows the familiar Lucene conventions:
//!
//! - **Terms**: `revenue` - adjacent terms are alternatives (default OR)
//! - **Phrases**: `"annual report"` - exact sequences
//! - **Boolean operators**: `a AND b`, `a OR b`, `NOT a`, `-a`
//! - **Wildcards**: `rev*`, `gr?w` - `*` matches any run, `?` one character
//! - **Fuzzy**: `revnue~` or `revnue~2` - edit distance matching
//! - **Fields**: `fileName:report` - search a single field
//! - **Ranges**: `pageCount:[2 TO 10]`, `pageCount:{* TO 5}`
//! - **Boosting**: `revenue^2.5` - adjust term importance
//!
//! # Example
//!
//! ```
//! use folio_query::parse;
//!
//! let expr = parse("fileName:report (revenue OR profit) -draft").unwrap();
//! assert!(expr.is_some());
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::QueryExpr;
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Token, tokenize};
pub use parser::parse;
