#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};
    use tokio::sync::Mutex;

    use crate::generator::multipage::MultiPageOrchestrator;
    use crate::generator::pipeline::PageExecutor;
    use crate::generator::planner::{PagePlan, PageSpec};
    use crate::generator::types::{PageResult, PresentationError};

    /// 受控的页面执行器：可注入每页延迟与失败，并记录并发情况
    struct MockExecutor {
        latencies_ms: HashMap<usize, u64>,
        failing_pages: HashSet<usize>,
        evidence_per_page: usize,
        running: AtomicUsize,
        peak: AtomicUsize,
        windows: Arc<Mutex<Vec<(usize, Instant, Instant)>>>,
    }

    impl MockExecutor {
        fn new() -> Self {
            Self {
                latencies_ms: HashMap::new(),
                failing_pages: HashSet::new(),
                evidence_per_page: 4,
                running: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                windows: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn with_latencies(mut self, latencies: &[(usize, u64)]) -> Self {
            self.latencies_ms = latencies.iter().copied().collect();
            self
        }

        fn with_failing_pages(mut self, pages: &[usize]) -> Self {
            self.failing_pages = pages.iter().copied().collect();
            self
        }

        fn peak_concurrency(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageExecutor for MockExecutor {
        async fn run(&self, spec: &PageSpec) -> PageResult {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let started = Instant::now();
            let delay = self.latencies_ms.get(&spec.page_number).copied().unwrap_or(10);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.running.fetch_sub(1, Ordering::SeqCst);
            self.windows
                .lock()
                .await
                .push((spec.page_number, started, Instant::now()));

            if self.failing_pages.contains(&spec.page_number) {
                PageResult::failed(spec.page_number, &spec.title, "injected failure".to_string(), 0.0)
            } else {
                PageResult {
                    page_number: spec.page_number,
                    title: spec.title.clone(),
                    success: true,
                    evidence_count: self.evidence_per_page,
                    html_fragment: format!("<section>content of page {}</section>", spec.page_number),
                    processing_time: 0.0,
                    error: None,
                }
            }
        }
    }

    fn plan_of(total: usize) -> PagePlan {
        PagePlan {
            total_pages: total,
            theme: "Study Overview".to_string(),
            reasoning: "test plan".to_string(),
            pages: (1..=total)
                .map(|number| PageSpec {
                    page_number: number,
                    title: format!("Page {}", number),
                    topic_query: format!("topic {}", number),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_runs_exactly_k_pages_within_limit() {
        let executor = MockExecutor::new();
        let plan = plan_of(6);

        let result = MultiPageOrchestrator::new(2)
            .run("query", &plan, &executor)
            .await
            .unwrap();

        assert_eq!(result.pages_processed, Some(6));
        assert_eq!(result.page_details.len(), 6);
        assert!(executor.peak_concurrency() <= 2);
    }

    #[tokio::test]
    async fn test_page_details_sorted_despite_reversed_latencies() {
        // 页码越小延迟越大，完成顺序与规划顺序相反
        let executor =
            MockExecutor::new().with_latencies(&[(1, 80), (2, 60), (3, 40), (4, 20)]);
        let plan = plan_of(4);

        let result = MultiPageOrchestrator::new(4)
            .run("query", &plan, &executor)
            .await
            .unwrap();

        let numbers: Vec<usize> = result.page_details.iter().map(|r| r.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_only_successful_fragments() {
        let executor = MockExecutor::new().with_failing_pages(&[1, 3]);
        let plan = plan_of(3);

        let result = MultiPageOrchestrator::new(3)
            .run("query", &plan, &executor)
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.pages_successful, Some(1));
        assert_eq!(result.page_details.len(), 3);
        assert!(result.html_content.contains("content of page 2"));
        assert!(!result.html_content.contains("content of page 1"));
        assert!(!result.html_content.contains("content of page 3"));
    }

    #[tokio::test]
    async fn test_all_failures_return_total_failure() {
        let executor = MockExecutor::new().with_failing_pages(&[1, 2, 3]);
        let plan = plan_of(3);

        let err = MultiPageOrchestrator::new(3)
            .run("query", &plan, &executor)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PresentationError::TotalMultiPageFailure { attempted: 3 }
        ));
    }

    #[tokio::test]
    async fn test_evidence_count_sums_over_all_pages() {
        let executor = MockExecutor::new().with_failing_pages(&[2]);
        let plan = plan_of(4);

        let result = MultiPageOrchestrator::new(2)
            .run("query", &plan, &executor)
            .await
            .unwrap();

        let expected: usize = result.page_details.iter().map(|r| r.evidence_count).sum();
        assert_eq!(result.total_evidence_count, expected);
        // 失败页计0条，3页成功各4条
        assert_eq!(result.total_evidence_count, 12);
    }

    #[tokio::test]
    async fn test_limit_one_runs_strictly_sequential() {
        let executor = MockExecutor::new().with_latencies(&[(1, 30), (2, 30), (3, 30)]);
        let plan = plan_of(3);

        MultiPageOrchestrator::new(1)
            .run("query", &plan, &executor)
            .await
            .unwrap();

        let mut windows = executor.windows.lock().await.clone();
        windows.sort_by_key(|(_, start, _)| *start);
        for pair in windows.windows(2) {
            let (_, _, first_end) = pair[0];
            let (_, second_start, _) = pair[1];
            assert!(second_start >= first_end, "page windows overlap");
        }
        assert_eq!(executor.peak_concurrency(), 1);
    }
}
