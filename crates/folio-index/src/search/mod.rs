//! Point-in-time reads of the folio index.
//!
//! A [`Snapshot`] wraps a Tantivy searcher pinned to one commit. Later
//! commits never change what an existing snapshot sees.
//!
//! Search runs in three steps:
//!
//! 1. **Compile**: parse the query and compile it against the schema, with
//!    unscoped words expanded over fileName (3.0), content (1.0) and
//!    metadata (1.5).
//! 2. **Collect**: top-k BM25 collection, then a sort by descending score
//!    with ascending document address breaking ties. The tie-break orders
//!    hits inside the top k only; which of several equal-scored documents
//!    make the cut at `max_results` is left to the collector.
//! 3. **Enrich**: copy stored fields, locate matching pages in the page blob
//!    and cut a snippet from the full content.

#[cfg(test)]
mod tests;
mod types;

use tantivy::{
    DocAddress, Searcher, TantivyDocument, Term,
    collector::TopDocs,
    query::TermQuery,
    schema::IndexRecordOption,
    tokenizer::TextAnalyzer,
};
use tracing::debug;
pub use types::{DocumentSummary, IndexStats, SearchResult};

use crate::{
    IndexError,
    pages::matching_pages,
    query::{QueryCompiler, match_terms, parse},
    schema::IndexSchema,
    snippet::make_snippet,
};

/// A read-only view of one commit.
#[derive(Clone)]
pub struct Snapshot {
    /// Searcher pinned to the commit.
    searcher: Searcher,
    /// Field handles.
    schema: IndexSchema,
    /// Analyzer the index was built with.
    analyzer: TextAnalyzer,
    /// Snippet window in characters.
    snippet_chars: usize,
}

impl Snapshot {
    /// Wraps a searcher.
    pub(crate) fn new(
        searcher: Searcher,
        schema: IndexSchema,
        analyzer: TextAnalyzer,
        snippet_chars: usize,
    ) -> Self {
        Self {
            searcher,
            schema,
            analyzer,
            snippet_chars,
        }
    }

    /// Runs `query` and returns at most `max_results` hits, best first.
    ///
    /// An empty query returns no hits. Parse errors and unknown fields are
    /// returned as [`IndexError::Query`] carrying the query text.
    pub fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, IndexError> {
        let Some(expr) = parse(query)? else {
            return Ok(Vec::new());
        };

        let mut compiler = QueryCompiler::new(self.schema.clone(), self.analyzer.clone());
        let compiled = compiler
            .compile(&expr)
            .map_err(|e| IndexError::Query(e.with_query(query)))?;
        let Some(compiled) = compiled else {
            return Ok(Vec::new());
        };
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let mut hits = self
            .searcher
            .search(&*compiled, &TopDocs::with_limit(max_results))
            .map_err(|e| IndexError::read(&e))?;
        hits.sort_by(|(a_score, a_addr), (b_score, b_addr)| {
            b_score.total_cmp(a_score).then_with(|| a_addr.cmp(b_addr))
        });

        let terms = match_terms(query);
        let results = hits
            .into_iter()
            .map(|(score, address)| self.enrich(score, address, &terms))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(query, hits = results.len(), "search complete");
        Ok(results)
    }

    /// Builds a result from a hit's stored fields.
    fn enrich(&self, score: f32, address: DocAddress, terms: &[String]) -> Result<SearchResult, IndexError> {
        let doc = self.doc(address)?;
        let summary = DocumentSummary::from_doc(&self.schema, &doc)?;
        let pages = types::text(&doc, self.schema.pages);
        let content = types::text(&doc, self.schema.content);

        Ok(SearchResult {
            document_id: summary.id,
            file_path: summary.file_path,
            file_name: summary.file_name,
            content_type: summary.content_type,
            score,
            file_size: summary.file_size,
            last_modified: summary.last_modified,
            indexed_at: summary.indexed_at,
            page_count: summary.page_count,
            matched_pages: matching_pages(&pages, terms),
            snippet: make_snippet(&content, terms, self.snippet_chars),
        })
    }

    /// Lists up to `max` live documents in index order, without scoring.
    pub fn list_all_documents(&self, max: usize) -> Result<Vec<DocumentSummary>, IndexError> {
        let mut summaries = Vec::new();
        for (segment_ord, segment) in self.searcher.segment_readers().iter().enumerate() {
            for doc_id in segment.doc_ids_alive() {
                if summaries.len() >= max {
                    return Ok(summaries);
                }
                let doc = self.doc(DocAddress::new(segment_ord as u32, doc_id))?;
                summaries.push(DocumentSummary::from_doc(&self.schema, &doc)?);
            }
        }
        Ok(summaries)
    }

    /// Looks up one document by id.
    pub fn get_document(&self, id: &str) -> Result<Option<DocumentSummary>, IndexError> {
        let query = TermQuery::new(
            Term::from_field_text(self.schema.id, id),
            IndexRecordOption::Basic,
        );
        let hits = self
            .searcher
            .search(&query, &TopDocs::with_limit(1))
            .map_err(|e| IndexError::read(&e))?;

        match hits.first() {
            Some((_, address)) => {
                let doc = self.doc(*address)?;
                Ok(Some(DocumentSummary::from_doc(&self.schema, &doc)?))
            }
            None => Ok(None),
        }
    }

    /// Document counts for this snapshot.
    pub fn get_stats(&self) -> IndexStats {
        let segments = self.searcher.segment_readers();
        IndexStats {
            total_documents: self.searcher.num_docs(),
            deleted_documents: segments
                .iter()
                .map(|s| u64::from(s.num_deleted_docs()))
                .sum(),
            max_doc: segments.iter().map(|s| u64::from(s.max_doc())).sum(),
            segments: segments.len(),
        }
    }

    /// Loads stored fields.
    fn doc(&self, address: DocAddress) -> Result<TantivyDocument, IndexError> {
        self.searcher
            .doc(address)
            .map_err(|e| IndexError::read(&e))
    }
}
