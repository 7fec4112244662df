//! 多页编排器
//!
//! 按规划对每页发起一次页面执行，经有界并发池收集结果后
//! 组装为带导航的演示文稿。只要有一页成功即视为成功，
//! 全部失败时返回错误交由上层回退。

use crate::generator::pipeline::PageExecutor;
use crate::generator::planner::PagePlan;
use crate::generator::types::{
    OrchestratorKind, PresentationError, PresentationResult, ProcessingTime,
};
use crate::html;
use crate::utils::threads::do_parallel_with_limit;

pub struct MultiPageOrchestrator {
    max_concurrent_pages: usize,
}

impl MultiPageOrchestrator {
    pub fn new(max_concurrent_pages: usize) -> Self {
        Self {
            max_concurrent_pages,
        }
    }

    /// 执行多页规划
    ///
    /// 页任务按规划顺序提交，最多max_concurrent_pages个并发。
    /// 失败页不计入合并后的html_content，但保留在page_details中。
    pub async fn run(
        &self,
        query: &str,
        plan: &PagePlan,
        executor: &dyn PageExecutor,
    ) -> Result<PresentationResult, PresentationError> {
        println!(
            "🚀 多页生成启动: {} 页，最大并发 {}",
            plan.total_pages, self.max_concurrent_pages
        );

        let futures: Vec<_> = plan.pages.iter().map(|spec| executor.run(spec)).collect();
        let mut results = do_parallel_with_limit(futures, self.max_concurrent_pages).await;

        // 收集顺序即规划顺序，这里按页码再排一次以保证聚合键是page_number
        results.sort_by_key(|r| r.page_number);

        let pages_processed = results.len();
        let pages_successful = results.iter().filter(|r| r.success).count();
        let total_evidence_count: usize = results.iter().map(|r| r.evidence_count).sum();

        if pages_successful == 0 {
            eprintln!("❌ 多页生成失败: {} 个页面均未成功", pages_processed);
            return Err(PresentationError::TotalMultiPageFailure {
                attempted: pages_processed,
            });
        }

        let fragments: Vec<(usize, String, String)> = results
            .iter()
            .filter(|r| r.success)
            .map(|r| (r.page_number, r.title.clone(), r.html_fragment.clone()))
            .collect();
        let html_content = html::merge_pages(&plan.theme, &fragments);

        println!(
            "✅ 多页生成完成: {} / {} 页成功",
            pages_successful, pages_processed
        );

        Ok(PresentationResult {
            success: true,
            user_query: query.to_string(),
            is_multi_page: true,
            orchestrator_used: OrchestratorKind::MultiPage,
            page_plan: Some(plan.clone()),
            pages_processed: Some(pages_processed),
            pages_successful: Some(pages_successful),
            total_evidence_count,
            html_content,
            page_details: results,
            processing_time: ProcessingTime::default(),
            output_path: None,
            fallback_reason: None,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests;
