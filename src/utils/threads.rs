use futures::{StreamExt, stream};
use std::future::Future;

/// 按限定并发度执行一组异步任务
///
/// 任务按传入顺序提交（FIFO），同时运行的任务数不超过limit，
/// 结果按传入顺序返回，与各任务的完成先后无关。
pub async fn do_parallel_with_limit<F, T>(futures: Vec<F>, limit: usize) -> Vec<T>
where
    F: Future<Output = T>,
{
    stream::iter(futures)
        .buffered(limit.max(1))
        .collect::<Vec<T>>()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_preserve_submission_order() {
        // 倒序延迟：先提交的任务最后完成
        let futures: Vec<_> = (0..4u64)
            .map(|i| async move {
                tokio::time::sleep(Duration::from_millis(40 - i * 10)).await;
                i
            })
            .collect();

        let results = do_parallel_with_limit(futures, 4).await;
        assert_eq!(results, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let futures: Vec<_> = (0..8)
            .map(|_| {
                let running = running.clone();
                let peak = peak.clone();
                async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                }
            })
            .collect();

        do_parallel_with_limit(futures, 3).await;
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_zero_limit_is_clamped() {
        let futures: Vec<_> = (0..2).map(|i| async move { i }).collect();
        let results = do_parallel_with_limit(futures, 0).await;
        assert_eq!(results, vec![0, 1]);
    }
}
