use std::thread;

use tempfile::TempDir;

use super::*;
use crate::{
    analyzer::AnalyzerKind,
    record::DocumentRecord,
    store::{IndexStore, StoreOptions},
};

fn open_store(options: StoreOptions) -> (TempDir, IndexStore) {
    let temp = TempDir::new().unwrap();
    let store = IndexStore::create(temp.path(), options).unwrap();
    (temp, store)
}

fn store_with(records: &[DocumentRecord]) -> (TempDir, IndexStore) {
    let (temp, store) = open_store(StoreOptions::default());
    {
        let mut session = store.writer().unwrap();
        let summary = session.index_documents(records).unwrap();
        assert_eq!(summary.failed_count(), 0);
    }
    (temp, store)
}

fn ids(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.document_id.as_str()).collect()
}

fn report() -> DocumentRecord {
    DocumentRecord::new("doc1", "/archive/report.pdf", "Annual report discusses revenue growth")
        .with_content_type("application/pdf")
        .with_pages(["Intro page", "Revenue grew 20% this year"])
}

#[test]
fn round_trip_finds_page_and_snippet() {
    let (_temp, store) = store_with(&[report()]);
    let results = store.snapshot().unwrap().search("revenue", 10).unwrap();

    assert_eq!(results.len(), 1);
    let hit = &results[0];
    assert_eq!(hit.document_id, "doc1");
    assert_eq!(hit.file_name, "report.pdf");
    assert_eq!(hit.matched_pages, vec![2]);
    assert_eq!(hit.page_count, Some(2));
    assert!(hit.snippet.contains("revenue"), "{}", hit.snippet);
    assert!(hit.score > 0.0);
}

#[test]
fn reindexing_same_id_replaces() {
    let (_temp, store) = open_store(StoreOptions::default());
    let mut session = store.writer().unwrap();

    session
        .index_document(&DocumentRecord::new("a", "fruit.txt", "apple"))
        .unwrap();
    session.commit().unwrap();
    session
        .index_document(&DocumentRecord::new("a", "fruit.txt", "banana"))
        .unwrap();
    session.commit().unwrap();

    let snapshot = store.snapshot().unwrap();
    assert!(snapshot.search("apple", 10).unwrap().is_empty());
    assert_eq!(ids(&snapshot.search("banana", 10).unwrap()), vec!["a"]);
    assert_eq!(snapshot.get_stats().total_documents, 1);
}

#[test]
fn file_name_match_outranks_content_match() {
    let (_temp, store) = store_with(&[
        DocumentRecord::new("content-hit", "/n/notes.txt", "the budget is attached here"),
        DocumentRecord::new("name-hit", "/n/budget.txt", "nothing relevant inside"),
    ]);
    let results = store.snapshot().unwrap().search("budget", 10).unwrap();
    assert_eq!(ids(&results), vec!["name-hit", "content-hit"]);
    assert!(results[0].score > results[1].score);
}

#[test]
fn metadata_is_searchable() {
    let (_temp, store) = store_with(&[
        DocumentRecord::new("a", "a.txt", "quarterly numbers").with_metadata("author", "Ada Lovelace"),
        DocumentRecord::new("b", "b.txt", "lovelace biography"),
    ]);
    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.search("lovelace", 10).unwrap().len(), 2);
    assert_eq!(ids(&snapshot.search("metadata:lovelace", 10).unwrap()), vec!["a"]);
}

#[test]
fn long_content_is_fully_indexed() {
    let mut content = "filler ".repeat(7200);
    content.push_str("zanzibar");
    assert!(content.chars().count() >= 50_000);

    let (_temp, store) = store_with(&[DocumentRecord::new("long", "long.txt", content)]);
    let results = store.snapshot().unwrap().search("zanzibar", 10).unwrap();
    assert_eq!(ids(&results), vec!["long"]);
    assert!(results[0].snippet.contains("zanzibar"));
    assert!(results[0].snippet.starts_with("..."));
}

#[test]
fn document_count_matches_indexed() {
    for n in [0usize, 1, 7, 40] {
        let records: Vec<_> = (0..n)
            .map(|i| DocumentRecord::new(format!("d{i}"), format!("{i}.txt"), "same text"))
            .collect();
        let (_temp, store) = store_with(&records);
        let stats = store.snapshot().unwrap().get_stats();
        assert_eq!(stats.total_documents, n as u64);
    }
}

#[test]
fn term_only_on_second_page() {
    let record = DocumentRecord::new("p", "p.pdf", "alpha beta gamma").with_pages(["alpha", "beta", "gamma"]);
    let (_temp, store) = store_with(&[record]);
    let results = store.snapshot().unwrap().search("beta", 10).unwrap();
    assert_eq!(results[0].matched_pages, vec![2]);
}

#[test]
fn punctuated_word_does_not_match_unrelated_page() {
    let record = DocumentRecord::new("mail", "mail.pdf", "the quick fox please send an email today")
        .with_pages(["the quick fox", "please send an email today", "nothing here"]);
    let (_temp, store) = store_with(&[record]);
    let results = store.snapshot().unwrap().search("send U.S.", 10).unwrap();
    assert_eq!(ids(&results), vec!["mail"]);
    assert_eq!(results[0].matched_pages, vec![2]);
    assert!(results[0].snippet.contains("send"));
}

#[test]
fn unpaged_results_have_no_pages() {
    let (_temp, store) = store_with(&[DocumentRecord::new("a", "a.txt", "revenue")]);
    let hit = &store.snapshot().unwrap().search("revenue", 10).unwrap()[0];
    assert!(hit.matched_pages.is_empty());
    assert_eq!(hit.page_count, None);
}

#[test]
fn delete_visible_only_to_new_snapshots() {
    let (_temp, store) = store_with(&[
        DocumentRecord::new("keep", "keep.txt", "shared word"),
        DocumentRecord::new("gone", "gone.txt", "shared word"),
    ]);
    let before = store.snapshot().unwrap();

    let mut session = store.writer().unwrap();
    session.delete_document("gone");
    assert_eq!(store.snapshot().unwrap().get_stats().total_documents, 2);
    assert!(session.commit().unwrap());

    let after = store.snapshot().unwrap();
    assert_eq!(ids(&after.search("shared", 10).unwrap()), vec!["keep"]);
    assert!(after.get_document("gone").unwrap().is_none());
    assert_eq!(before.search("shared", 10).unwrap().len(), 2);
    assert_eq!(before.get_stats().total_documents, 2);
}

#[test]
fn default_operator_is_or() {
    let (_temp, store) = store_with(&[
        DocumentRecord::new("a", "a.txt", "apple"),
        DocumentRecord::new("b", "b.txt", "banana"),
        DocumentRecord::new("c", "c.txt", "cherry"),
    ]);
    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.search("apple banana", 10).unwrap().len(), 2);
    assert!(snapshot.search("apple AND banana", 10).unwrap().is_empty());
}

#[test]
fn negation_excludes_from_disjunction() {
    let (_temp, store) = store_with(&[
        DocumentRecord::new("a", "a.txt", "report final"),
        DocumentRecord::new("b", "b.txt", "report draft"),
        DocumentRecord::new("c", "c.txt", "memo"),
    ]);
    let snapshot = store.snapshot().unwrap();
    assert_eq!(ids(&snapshot.search("report -draft", 10).unwrap()), vec!["a"]);

    let mut negative_only = ids(&snapshot.search("NOT draft", 10).unwrap())
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    negative_only.sort();
    assert_eq!(negative_only, vec!["a", "c"]);
}

#[test]
fn phrase_requires_adjacency() {
    let (_temp, store) = store_with(&[
        DocumentRecord::new("a", "a.txt", "revenue growth was strong"),
        DocumentRecord::new("b", "b.txt", "growth in revenue"),
    ]);
    let results = store.snapshot().unwrap().search("\"revenue growth\"", 10).unwrap();
    assert_eq!(ids(&results), vec!["a"]);
}

#[test]
fn wildcard_and_fuzzy_match() {
    let (_temp, store) = store_with(&[
        DocumentRecord::new("a", "a.txt", "revenue grew"),
        DocumentRecord::new("b", "b.txt", "expenses fell"),
    ]);
    let snapshot = store.snapshot().unwrap();
    assert_eq!(ids(&snapshot.search("reven*", 10).unwrap()), vec!["a"]);
    assert_eq!(ids(&snapshot.search("gr?w", 10).unwrap()), vec!["a"]);
    assert_eq!(ids(&snapshot.search("revenu~", 10).unwrap()), vec!["a"]);
    assert!(snapshot.search("revenu", 10).unwrap().is_empty());
}

#[test]
fn content_type_and_page_count_filters() {
    let (_temp, store) = store_with(&[
        report(),
        DocumentRecord::new("plain", "plain.txt", "revenue notes"),
        DocumentRecord::new("long", "long.pdf", "revenue appendix")
            .with_content_type("application/pdf")
            .with_pages(["a", "b", "c", "d", "e"]),
    ]);
    let snapshot = store.snapshot().unwrap();

    let mut pdfs = ids(&snapshot.search("revenue AND contentType:application/pdf", 10).unwrap())
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    pdfs.sort();
    assert_eq!(pdfs, vec!["doc1", "long"]);

    assert_eq!(
        ids(&snapshot.search("revenue AND pageCount:[3 TO *]", 10).unwrap()),
        vec!["long"]
    );
    assert_eq!(ids(&snapshot.search("pageCount:2", 10).unwrap()), vec!["doc1"]);
}

#[test]
fn query_errors_carry_the_query() {
    let (_temp, store) = store_with(&[report()]);
    let snapshot = store.snapshot().unwrap();

    let err = snapshot.search("author:ada", 10).unwrap_err();
    let IndexError::Query(query_err) = &err else {
        panic!("expected query error, got {err}");
    };
    assert!(query_err.message().contains("unknown field"));
    assert!(err.to_string().contains("author:ada"));

    assert!(matches!(
        snapshot.search("(revenue", 10),
        Err(IndexError::Query(_))
    ));
}

#[test]
fn empty_query_and_zero_limit_return_nothing() {
    let (_temp, store) = store_with(&[report()]);
    let snapshot = store.snapshot().unwrap();
    assert!(snapshot.search("", 10).unwrap().is_empty());
    assert!(snapshot.search("   ", 10).unwrap().is_empty());
    assert!(snapshot.search("revenue", 0).unwrap().is_empty());
}

#[test]
fn limit_bounds_results() {
    let records: Vec<_> = (0..12)
        .map(|i| DocumentRecord::new(format!("d{i}"), format!("{i}.txt"), "common"))
        .collect();
    let (_temp, store) = store_with(&records);
    assert_eq!(store.snapshot().unwrap().search("common", 5).unwrap().len(), 5);
}

#[test]
fn equal_scores_keep_index_order() {
    let (_temp, store) = store_with(&[
        DocumentRecord::new("first", "x.txt", "identical words"),
        DocumentRecord::new("second", "x.txt", "identical words"),
    ]);
    let results = store.snapshot().unwrap().search("identical", 10).unwrap();
    assert_eq!(ids(&results), vec!["first", "second"]);
}

#[test]
fn list_returns_live_documents_up_to_max() {
    let records: Vec<_> = (0..6)
        .map(|i| {
            DocumentRecord::new(format!("d{i}"), format!("/f/{i}.txt"), "text")
                .with_metadata("index", i.to_string())
        })
        .collect();
    let (_temp, store) = store_with(&records);
    {
        let mut session = store.writer().unwrap();
        session.delete_document("d0");
        session.commit().unwrap();
    }

    let snapshot = store.snapshot().unwrap();
    let all = snapshot.list_all_documents(100).unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|d| d.id != "d0"));
    assert_eq!(all.iter().find(|d| d.id == "d3").unwrap().metadata["index"], "3");

    assert_eq!(snapshot.list_all_documents(2).unwrap().len(), 2);
    assert!(snapshot.list_all_documents(0).unwrap().is_empty());
}

#[test]
fn get_document_reads_stored_fields() {
    let (_temp, store) = store_with(&[report().with_metadata("author", "Ada")]);
    let doc = store.snapshot().unwrap().get_document("doc1").unwrap().unwrap();
    assert_eq!(doc.file_path, "/archive/report.pdf");
    assert_eq!(doc.content_type, "application/pdf");
    assert_eq!(doc.page_count, Some(2));
    assert_eq!(doc.metadata["author"], "Ada");
}

#[test]
fn stemming_applies_to_queries() {
    let options = StoreOptions {
        analyzer: AnalyzerKind::from_settings("default", "english").unwrap(),
        ..StoreOptions::default()
    };
    let (_temp, store) = open_store(options);
    let mut session = store.writer().unwrap();
    let summary = session
        .index_documents(&[DocumentRecord::new("a", "a.txt", "the team was running late")])
        .unwrap();
    assert_eq!(summary.indexed_count(), 1);

    assert_eq!(ids(&store.snapshot().unwrap().search("runs", 10).unwrap()), vec!["a"]);
}

#[test]
fn cjk_index_segments_words() {
    let options = StoreOptions {
        analyzer: AnalyzerKind::Cjk,
        ..StoreOptions::default()
    };
    let (_temp, store) = open_store(options);
    let mut session = store.writer().unwrap();
    let summary = session
        .index_documents(&[
            DocumentRecord::new("zh", "zh.txt", "我们中出了一个叛徒"),
            DocumentRecord::new("en", "en.txt", "nothing to see"),
        ])
        .unwrap();
    assert_eq!(summary.indexed_count(), 2);

    assert_eq!(ids(&store.snapshot().unwrap().search("叛徒", 10).unwrap()), vec!["zh"]);
}

#[test]
fn snapshots_serve_concurrent_readers() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Snapshot>();
    assert_send_sync::<IndexStore>();

    let (_temp, store) = store_with(&[report()]);
    let snapshot = store.snapshot().unwrap();
    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| snapshot.search("revenue", 10).unwrap().len()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    });
}

#[test]
fn results_serialize_to_json() {
    let (_temp, store) = store_with(&[report()]);
    let results = store.snapshot().unwrap().search("revenue", 10).unwrap();
    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json[0]["document_id"], "doc1");
    assert_eq!(json[0]["matched_pages"][0], 2);
}
