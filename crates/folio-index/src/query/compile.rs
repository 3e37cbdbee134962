//! Query compiler.
//!
//! Compiles a query AST into Tantivy queries against the folio schema.

use std::ops::Bound;

use folio_query::{QueryError, QueryExpr};
use tantivy::{
    Term,
    query::{
        AllQuery, BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, PhraseQuery, Query, RangeQuery,
        RegexQuery, TermQuery,
    },
    schema::{Field, IndexRecordOption},
    tokenizer::TextAnalyzer,
};

use crate::{
    analyzer::analyze,
    schema::{IndexSchema, boost, names},
};

/// A compiled query, or `None` when the input analyzed to nothing.
type Compiled = Result<Option<Box<dyn Query>>, QueryError>;

/// Where a sub-expression is evaluated.
#[derive(Debug, Clone, Copy)]
enum Scope {
    /// Every analyzed text field, each with its boost.
    All,
    /// One analyzed text field.
    Text(Field, f32),
    /// The raw content type field.
    ContentType,
    /// The numeric page count field.
    PageCount,
}

/// Compiles query AST nodes into Tantivy queries.
pub struct QueryCompiler {
    /// Index schema for field references.
    schema: IndexSchema,
    /// Analyzer for query words; the one the index was built with.
    analyzer: TextAnalyzer,
}

impl QueryCompiler {
    /// Creates a compiler for `schema` using `analyzer` on query words.
    pub fn new(schema: IndexSchema, analyzer: TextAnalyzer) -> Self {
        Self { schema, analyzer }
    }

    /// Compiles a query expression into a Tantivy query.
    ///
    /// Returns `None` when every word analyzed away, e.g. a query of
    /// punctuation only.
    pub fn compile(&mut self, expr: &QueryExpr) -> Compiled {
        self.compile_in(expr, Scope::All)
    }

    /// Compiles `expr` within `scope`.
    fn compile_in(&mut self, expr: &QueryExpr, scope: Scope) -> Compiled {
        match expr {
            QueryExpr::Term(text) => self.compile_term(text, scope),
            QueryExpr::Phrase(words) => self.compile_phrase(words, scope),
            QueryExpr::Wildcard(pattern) => self.compile_wildcard(pattern, scope),
            QueryExpr::Fuzzy { term, distance } => self.compile_fuzzy(term, *distance, scope),
            QueryExpr::Range { lower, upper } => compile_range(lower, upper, scope),
            QueryExpr::Not(inner) => {
                let Some(excluded) = self.compile_in(inner, scope)? else {
                    return Ok(None);
                };
                Ok(Some(Box::new(BooleanQuery::new(vec![
                    (Occur::Must, Box::new(AllQuery) as Box<dyn Query>),
                    (Occur::MustNot, excluded),
                ]))))
            }
            QueryExpr::And(exprs) => self.compile_boolean(exprs, Occur::Must, scope),
            QueryExpr::Or(exprs) => self.compile_boolean(exprs, Occur::Should, scope),
            QueryExpr::Field { name, expr } => self.compile_field(name, expr, scope),
            QueryExpr::Boost { expr, factor } => Ok(self
                .compile_in(expr, scope)?
                .map(|inner| Box::new(BoostQuery::new(inner, *factor)) as Box<dyn Query>)),
        }
    }

    /// Compiles a conjunction (`Must`) or disjunction (`Should`).
    ///
    /// Directly negated children become `MustNot` clauses of the whole group.
    /// With no positive child, the exclusions apply to all documents.
    fn compile_boolean(&mut self, exprs: &[QueryExpr], occur: Occur, scope: Scope) -> Compiled {
        let mut positive = Vec::new();
        let mut negative = Vec::new();

        for expr in exprs {
            match expr {
                QueryExpr::Not(inner) => {
                    if let Some(q) = self.compile_in(inner, scope)? {
                        negative.push(q);
                    }
                }
                other => {
                    if let Some(q) = self.compile_in(other, scope)? {
                        positive.push(q);
                    }
                }
            }
        }

        if positive.is_empty() && negative.is_empty() {
            return Ok(None);
        }

        let mut clauses: Vec<(Occur, Box<dyn Query>)> =
            positive.into_iter().map(|q| (occur, q)).collect();
        if clauses.is_empty() {
            clauses.push((Occur::Must, Box::new(AllQuery)));
        }
        clauses.extend(negative.into_iter().map(|q| (Occur::MustNot, q)));

        Ok(Some(Box::new(BooleanQuery::new(clauses))))
    }

    /// Compiles `name:expr`.
    fn compile_field(&mut self, name: &str, expr: &QueryExpr, scope: Scope) -> Compiled {
        if !matches!(scope, Scope::All) {
            return Err(QueryError::compile(format!(
                "field '{name}' cannot be nested inside another field"
            )));
        }

        let inner = match name.to_ascii_lowercase().as_str() {
            "content" => Scope::Text(self.schema.content, boost::CONTENT),
            "filename" => Scope::Text(self.schema.file_name, boost::FILE_NAME),
            "metadata" => Scope::Text(self.schema.metadata, boost::METADATA),
            "contenttype" => Scope::ContentType,
            "pagecount" => Scope::PageCount,
            _ => return Err(QueryError::compile(format!("unknown field: {name}"))),
        };
        self.compile_in(expr, inner)
    }

    /// Compiles a bare word.
    fn compile_term(&mut self, text: &str, scope: Scope) -> Compiled {
        match scope {
            Scope::ContentType => Ok(Some(raw_term_query(self.schema.content_type, text))),
            Scope::PageCount => {
                let count = parse_count(text)?;
                Ok(Some(Box::new(TermQuery::new(
                    Term::from_field_u64(self.schema.page_count, count),
                    IndexRecordOption::Basic,
                ))))
            }
            Scope::All | Scope::Text(..) => {
                let tokens = analyze(&mut self.analyzer, text);
                Ok(self.text_query(&tokens, scope))
            }
        }
    }

    /// Compiles a quoted phrase.
    fn compile_phrase(&mut self, words: &[String], scope: Scope) -> Compiled {
        match scope {
            Scope::ContentType => Ok(Some(raw_term_query(
                self.schema.content_type,
                &words.join(" "),
            ))),
            Scope::PageCount => Err(QueryError::compile("pageCount does not accept phrases")),
            Scope::All | Scope::Text(..) => {
                let tokens: Vec<String> = words
                    .iter()
                    .flat_map(|w| analyze(&mut self.analyzer, w))
                    .collect();
                Ok(self.text_query(&tokens, scope))
            }
        }
    }

    /// Compiles a `*`/`?` pattern.
    ///
    /// Patterns match indexed terms directly, so text patterns are lowercased
    /// but not stemmed.
    fn compile_wildcard(&mut self, pattern: &str, scope: Scope) -> Compiled {
        match scope {
            Scope::ContentType => Ok(Some(Box::new(regex_query(
                self.schema.content_type,
                pattern,
            )?))),
            Scope::PageCount => Err(QueryError::compile("pageCount does not accept wildcards")),
            Scope::All | Scope::Text(..) => {
                let pattern = pattern.to_lowercase();
                let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
                for (field, weight) in self.fields_for(scope) {
                    let query = regex_query(field, &pattern)?;
                    clauses.push((Occur::Should, boosted(Box::new(query), weight)));
                }
                Ok(Some(single_or_should(clauses)))
            }
        }
    }

    /// Compiles `term~N`.
    fn compile_fuzzy(&mut self, text: &str, distance: u8, scope: Scope) -> Compiled {
        match scope {
            Scope::ContentType => Ok(Some(Box::new(FuzzyTermQuery::new(
                Term::from_field_text(self.schema.content_type, text),
                distance,
                true,
            )))),
            Scope::PageCount => Err(QueryError::compile("pageCount does not accept fuzzy terms")),
            Scope::All | Scope::Text(..) => {
                let tokens = analyze(&mut self.analyzer, text);
                if tokens.is_empty() {
                    return Ok(None);
                }
                let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
                for (field, weight) in self.fields_for(scope) {
                    let per_token: Vec<(Occur, Box<dyn Query>)> = tokens
                        .iter()
                        .map(|token| {
                            let fuzzy = FuzzyTermQuery::new(
                                Term::from_field_text(field, token),
                                distance,
                                true,
                            );
                            (Occur::Must, Box::new(fuzzy) as Box<dyn Query>)
                        })
                        .collect();
                    clauses.push((Occur::Should, boosted(single_or_should(per_token), weight)));
                }
                Ok(Some(single_or_should(clauses)))
            }
        }
    }

    /// Builds a term or phrase query over the text fields of `scope`.
    fn text_query(&self, tokens: &[String], scope: Scope) -> Option<Box<dyn Query>> {
        if tokens.is_empty() {
            return None;
        }

        let clauses: Vec<(Occur, Box<dyn Query>)> = self
            .fields_for(scope)
            .into_iter()
            .map(|(field, weight)| {
                let query: Box<dyn Query> = if let [token] = tokens {
                    Box::new(TermQuery::new(
                        Term::from_field_text(field, token),
                        IndexRecordOption::WithFreqs,
                    ))
                } else {
                    let terms: Vec<Term> = tokens
                        .iter()
                        .map(|t| Term::from_field_text(field, t))
                        .collect();
                    Box::new(PhraseQuery::new(terms))
                };
                (Occur::Should, boosted(query, weight))
            })
            .collect();

        Some(single_or_should(clauses))
    }

    /// Text fields searched within `scope`, with their boosts.
    fn fields_for(&self, scope: Scope) -> Vec<(Field, f32)> {
        match scope {
            Scope::Text(field, weight) => vec![(field, weight)],
            _ => self.schema.text_fields().to_vec(),
        }
    }
}

/// Compiles a `[a TO b]` range; only the page count is ordered.
fn compile_range(lower: &Bound<String>, upper: &Bound<String>, scope: Scope) -> Compiled {
    let Scope::PageCount = scope else {
        return Err(QueryError::compile(format!(
            "ranges are only supported on {}",
            names::PAGE_COUNT
        )));
    };

    let bound = |b: &Bound<String>| -> Result<Bound<u64>, QueryError> {
        Ok(match b {
            Bound::Included(v) => Bound::Included(parse_count(v)?),
            Bound::Excluded(v) => Bound::Excluded(parse_count(v)?),
            Bound::Unbounded => Bound::Unbounded,
        })
    };

    Ok(Some(Box::new(RangeQuery::new_u64_bounds(
        names::PAGE_COUNT.to_string(),
        bound(lower)?,
        bound(upper)?,
    ))))
}

/// Parses a page count value.
fn parse_count(text: &str) -> Result<u64, QueryError> {
    text.parse()
        .map_err(|_| QueryError::compile(format!("{} expects a number, got '{text}'", names::PAGE_COUNT)))
}

/// Exact, untokenized term match.
fn raw_term_query(field: Field, text: &str) -> Box<dyn Query> {
    Box::new(TermQuery::new(
        Term::from_field_text(field, text),
        IndexRecordOption::Basic,
    ))
}

/// Builds a regex query from a `*`/`?` pattern.
fn regex_query(field: Field, pattern: &str) -> Result<RegexQuery, QueryError> {
    let mut regex = String::with_capacity(pattern.len() * 2);
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            other => regex.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    RegexQuery::from_pattern(&regex, field)
        .map_err(|e| QueryError::compile(format!("invalid wildcard '{pattern}': {e}")))
}

/// Wraps `query` in a boost unless the weight is neutral.
fn boosted(query: Box<dyn Query>, weight: f32) -> Box<dyn Query> {
    if (weight - 1.0).abs() < f32::EPSILON {
        query
    } else {
        Box::new(BoostQuery::new(query, weight))
    }
}

/// Unwraps a lone clause, otherwise combines the clauses.
fn single_or_should(mut clauses: Vec<(Occur, Box<dyn Query>)>) -> Box<dyn Query> {
    if clauses.len() == 1
        && let Some((_, query)) = clauses.pop()
    {
        return query;
    }
    Box::new(BooleanQuery::new(clauses))
}

#[cfg(test)]
mod tests {
    use folio_query::parse;

    use super::*;
    use crate::analyzer::AnalyzerKind;

    fn compiler() -> QueryCompiler {
        QueryCompiler::new(IndexSchema::new(), AnalyzerKind::default().build().unwrap())
    }

    fn compile(query: &str) -> Compiled {
        let expr = parse(query).unwrap().unwrap();
        compiler().compile(&expr)
    }

    #[test]
    fn term_compiles() {
        assert!(compile("revenue").unwrap().is_some());
    }

    #[test]
    fn punctuation_only_compiles_to_nothing() {
        assert!(compile("...").unwrap().is_none());
    }

    #[test]
    fn unknown_field_is_error() {
        let err = compile("author:ada").unwrap_err();
        assert!(err.message().contains("unknown field: author"));
    }

    #[test]
    fn field_names_are_case_insensitive() {
        assert!(compile("FILENAME:report").unwrap().is_some());
        assert!(compile("contentType:application/pdf").is_ok());
    }

    #[test]
    fn range_only_on_page_count() {
        assert!(compile("pageCount:[2 TO 5]").unwrap().is_some());
        assert!(compile("pageCount:{* TO 3}").unwrap().is_some());
        let err = compile("content:[a TO b]").unwrap_err();
        assert!(err.message().contains("pageCount"));
    }

    #[test]
    fn page_count_needs_numbers() {
        assert!(compile("pageCount:3").unwrap().is_some());
        assert!(compile("pageCount:many").is_err());
        assert!(compile("pageCount:\"two pages\"").is_err());
    }

    #[test]
    fn nested_fields_rejected() {
        let err = compile("content:(fileName:x)").unwrap_err();
        assert!(err.message().contains("nested"));
    }

    #[test]
    fn wildcard_and_fuzzy_compile() {
        assert!(compile("rev*").unwrap().is_some());
        assert!(compile("gr?w").unwrap().is_some());
        assert!(compile("revnue~").unwrap().is_some());
        assert!(compile("content:revnue~2").unwrap().is_some());
    }

    #[test]
    fn negation_only_compiles() {
        assert!(compile("-draft").unwrap().is_some());
        assert!(compile("NOT draft AND NOT final").unwrap().is_some());
    }

    #[test]
    fn regex_escapes_literals() {
        assert!(regex_query(IndexSchema::new().content, "a.b+c*").is_ok());
    }
}
