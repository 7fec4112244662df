#[cfg(test)]
mod tests {
    use crate::evidence::{EvidenceItem, EvidenceSearcher, LocalCorpusSearcher};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn corpus_json() -> &'static str {
        r#"{
            "items": [
                {
                    "id": "e1",
                    "content": "Overall survival was significantly improved in the treatment arm",
                    "evidence_type": "text",
                    "source": "section 3.1"
                },
                {
                    "id": "e2",
                    "content": "Kaplan-Meier curve of overall survival by treatment group",
                    "evidence_type": "image",
                    "source": "figure 2"
                },
                {
                    "id": "e3",
                    "content": "Adverse events were reported in both groups",
                    "evidence_type": "table",
                    "source": "table 4"
                }
            ],
            "type_weights": {
                "image": 2.0,
                "text": 1.0
            }
        }"#
    }

    async fn searcher_from_fixture() -> LocalCorpusSearcher {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(corpus_json().as_bytes()).unwrap();
        LocalCorpusSearcher::from_file(file.path()).await.unwrap()
    }

    #[tokio::test]
    async fn test_search_returns_matching_items() {
        let searcher = searcher_from_fixture().await;

        let results = searcher.search("overall survival", 10).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|e| e.id.as_str()).collect();

        assert!(ids.contains(&"e1"));
        assert!(ids.contains(&"e2"));
        assert!(!ids.contains(&"e3"));
    }

    #[tokio::test]
    async fn test_type_weights_reorder_results() {
        let searcher = searcher_from_fixture().await;

        // 两条证据命中率相同，image的权重更高应排在前面
        let results = searcher.search("overall survival", 10).await.unwrap();
        assert_eq!(results[0].id, "e2");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_top_k_truncates() {
        let searcher = searcher_from_fixture().await;

        let results = searcher.search("overall survival treatment", 1).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_no_match_returns_empty() {
        let searcher = searcher_from_fixture().await;

        let results = searcher.search("pharmacokinetics dosing", 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_empty_searcher() {
        let searcher = LocalCorpusSearcher::empty();
        let results = searcher.search("anything", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_corpus_file_errors() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();

        assert!(LocalCorpusSearcher::from_file(file.path()).await.is_err());
    }

    #[test]
    fn test_item_defaults_on_deserialize() {
        let item: EvidenceItem =
            serde_json::from_str(r#"{"id": "x", "content": "some content"}"#).unwrap();
        assert_eq!(item.evidence_type, "text");
        assert_eq!(item.source, "");
        assert_eq!(item.score, 0.0);
    }
}
