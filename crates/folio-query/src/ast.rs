//! Query abstract syntax tree.
//!
//! Represents parsed query expressions before they are compiled against an
//! index schema.

use std::{fmt, ops::Bound};

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
    /// A single search term.
    Term(String),

    /// An exact phrase (sequence of words).
    Phrase(Vec<String>),

    /// A term pattern where `*` matches any run and `?` a single character.
    Wildcard(String),

    /// A term matched within an edit distance.
    Fuzzy {
        /// The term as written.
        term: String,
        /// Maximum edit distance.
        distance: u8,
    },

    /// A range over a field's values.
    Range {
        /// Lower end.
        lower: Bound<String>,
        /// Upper end.
        upper: Bound<String>,
    },

    /// Negation: results must NOT match this expression.
    Not(Box<Self>),

    /// Conjunction: all sub-expressions must match.
    And(Vec<Self>),

    /// Disjunction: at least one sub-expression must match.
    Or(Vec<Self>),

    /// Field-scoped query.
    Field {
        /// Field name as written in the query.
        name: String,
        /// Expression to match within that field.
        expr: Box<Self>,
    },

    /// Boosted query: multiplies the score of the inner expression.
    Boost {
        /// The expression to boost.
        expr: Box<Self>,
        /// The boost factor.
        factor: f32,
    },
}

impl QueryExpr {
    /// Creates an And expression, flattening nested Ands.
    pub fn and(exprs: Vec<Self>) -> Self {
        Self::flatten(exprs, true)
    }

    /// Creates an Or expression, flattening nested Ors.
    pub fn or(exprs: Vec<Self>) -> Self {
        Self::flatten(exprs, false)
    }

    /// Shared body of [`Self::and`] and [`Self::or`].
    fn flatten(exprs: Vec<Self>, conjunction: bool) -> Self {
        let mut flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::And(inner) if conjunction => inner,
                Self::Or(inner) if !conjunction => inner,
                other => vec![other],
            })
            .collect();

        if flattened.len() == 1
            && let Some(only) = flattened.pop()
        {
            return only;
        }

        if conjunction {
            Self::And(flattened)
        } else {
            Self::Or(flattened)
        }
    }

    /// Creates a boosted expression.
    pub fn boost(expr: Self, factor: f32) -> Self {
        Self::Boost {
            expr: Box::new(expr),
            factor,
        }
    }

    /// Creates a field-scoped expression.
    pub fn field(name: impl Into<String>, expr: Self) -> Self {
        Self::Field {
            name: name.into(),
            expr: Box::new(expr),
        }
    }

    /// Collects the words a matching document is expected to contain.
    ///
    /// Negated branches and ranges contribute nothing. Each visited field
    /// scope is passed to `keep_field`; returning false skips that subtree.
    pub fn positive_words(&self, keep_field: &dyn Fn(&str) -> bool) -> Vec<String> {
        let mut words = Vec::new();
        self.collect_words(keep_field, &mut words);
        words
    }

    /// Recursive worker for [`Self::positive_words`].
    fn collect_words(&self, keep_field: &dyn Fn(&str) -> bool, out: &mut Vec<String>) {
        match self {
            Self::Term(w) | Self::Wildcard(w) | Self::Fuzzy { term: w, .. } => out.push(w.clone()),
            Self::Phrase(words) => out.extend(words.iter().cloned()),
            Self::Range { .. } | Self::Not(_) => {}
            Self::And(exprs) | Self::Or(exprs) => {
                for expr in exprs {
                    expr.collect_words(keep_field, out);
                }
            }
            Self::Field { name, expr } => {
                if keep_field(name) {
                    expr.collect_words(keep_field, out);
                }
            }
            Self::Boost { expr, .. } => expr.collect_words(keep_field, out),
        }
    }

    /// Formats the expression as a tree with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term(s) => writeln!(f, "{prefix}Term({s:?})"),
            Self::Phrase(words) => writeln!(f, "{prefix}Phrase({words:?})"),
            Self::Wildcard(p) => writeln!(f, "{prefix}Wildcard({p:?})"),
            Self::Fuzzy { term, distance } => writeln!(f, "{prefix}Fuzzy({term:?}, {distance})"),
            Self::Range { lower, upper } => writeln!(f, "{prefix}Range({lower:?}, {upper:?})"),
            Self::Not(inner) => {
                writeln!(f, "{prefix}Not")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::And(exprs) | Self::Or(exprs) => {
                let label = if matches!(self, Self::And(_)) { "And" } else { "Or" };
                writeln!(f, "{prefix}{label}")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Field { name, expr } => {
                writeln!(f, "{prefix}Field({name:?})")?;
                expr.fmt_tree(f, indent + 1)
            }
            Self::Boost { expr, factor } => {
                writeln!(f, "{prefix}Boost({factor})")?;
                expr.fmt_tree(f, indent + 1)
            }
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
