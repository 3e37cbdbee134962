//! Query compilation against the folio index.
//!
//! Parsing lives in `folio-query`; this module turns the resulting AST into
//! Tantivy queries and extracts the words used for page matching and
//! snippets.
//!
//! - **Terms**: `revenue` searches fileName, content and metadata
//! - **Phrases**: `"revenue growth"`
//! - **Operators**: `a OR b`, `a AND b`, `-draft`, adjacency means OR
//! - **Fields**: `fileName:report`, `contentType:application/pdf`
//! - **Wildcards and fuzzy terms**: `rev*`, `gr?w`, `revnue~`
//! - **Ranges**: `pageCount:[2 TO 10]`

mod compile;

pub use compile::QueryCompiler;
pub use folio_query::{QueryError, QueryErrorKind, QueryExpr, parse};

use crate::{pages::clean_terms, schema::names};

/// Cleaned words a matching document is expected to contain.
///
/// Drawn from the parsed query's positive text terms, so operators, field
/// names and excluded words are left out. When the query does not parse,
/// the raw string is cleaned instead.
pub fn match_terms(query: &str) -> Vec<String> {
    match parse(query) {
        Ok(Some(expr)) => clean_terms(expr.positive_words(&is_text_field)),
        Ok(None) => Vec::new(),
        Err(_) => clean_terms(query.split_whitespace()),
    }
}

/// Whether a field name refers to an analyzed text field.
fn is_text_field(name: &str) -> bool {
    [names::CONTENT, names::FILE_NAME, names::METADATA]
        .iter()
        .any(|field| field.eq_ignore_ascii_case(name))
}
