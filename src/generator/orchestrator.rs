//! 顶层编排
//!
//! 路由单页/多页两条路径，并保证多页路径的任何失败都能
//! 回退到以原始查询驱动的单页处理。除最后兜底的单页路径
//! 自身失败外，调用方拿到的始终是结构完整的结果对象。

use std::sync::Arc;
use std::time::Instant;

use crate::generator::GeneratorContext;
use crate::generator::multipage::MultiPageOrchestrator;
use crate::generator::pipeline::{PageExecutor, SinglePagePipeline};
use crate::generator::planner::{PagePlanner, PageSpec, PlanDecision};
use crate::generator::types::{
    OrchestratorKind, PresentationResult, ProcessOptions, ProcessingTime,
};
use crate::html;

pub struct EnhancedOrchestrator {
    context: GeneratorContext,
    planner: PagePlanner,
    executor: Arc<dyn PageExecutor>,
}

impl EnhancedOrchestrator {
    pub fn new(context: GeneratorContext) -> Self {
        let executor = Arc::new(SinglePagePipeline::new(context.clone()));
        Self::with_executor(context, executor)
    }

    /// 使用指定的页面执行器构造，测试中用来注入受控实现
    pub fn with_executor(context: GeneratorContext, executor: Arc<dyn PageExecutor>) -> Self {
        let planner = PagePlanner::new(context.clone());
        Self {
            context,
            planner,
            executor,
        }
    }

    /// 处理一次查询
    pub async fn process_query(
        &self,
        query: &str,
        options: &ProcessOptions,
    ) -> PresentationResult {
        let total_started = Instant::now();
        let presentation = self.context.config.presentation.clone();

        if options.force_single_page {
            println!("📋 强制单页处理");
            let result = self.run_single_page(query, None).await;
            return finish(result, 0.0, total_started);
        }
        if !presentation.enable_multi_page {
            println!("📋 多页功能已禁用，按单页处理");
            let result = self.run_single_page(query, None).await;
            return finish(result, 0.0, total_started);
        }
        if !presentation.auto_page_detection && !options.force_multi_page {
            println!("📋 页面自动探测已禁用，按单页处理");
            let result = self.run_single_page(query, None).await;
            return finish(result, 0.0, total_started);
        }

        let planning_started = Instant::now();
        let decision = if options.force_multi_page {
            // 强制多页：跳过启发式规则，直接LLM规划
            println!("📋 强制多页处理");
            match self.planner.analyze_with_llm(query).await {
                Ok(decision) => decision,
                Err(e) => {
                    eprintln!("⚠️ 强制多页规划失败: {}", e);
                    PlanDecision::SinglePage
                }
            }
        } else {
            self.planner.analyze_query(query).await
        };
        let planning_seconds = planning_started.elapsed().as_secs_f64();

        let result = match decision {
            PlanDecision::SinglePage => {
                let fallback_reason = if options.force_multi_page {
                    Some("强制多页模式下规划仍判定为单页".to_string())
                } else {
                    None
                };
                self.run_single_page(query, fallback_reason).await
            }
            PlanDecision::MultiPage(plan) => {
                let orchestrator =
                    MultiPageOrchestrator::new(presentation.max_concurrent_pages);
                match orchestrator.run(query, &plan, self.executor.as_ref()).await {
                    Ok(result) => result,
                    Err(e) => {
                        println!("⚠️ 多页生成失败，回退到单页处理: {}", e);
                        self.run_single_page(query, Some(e.to_string())).await
                    }
                }
            }
        };

        finish(result, planning_seconds, total_started)
    }

    /// 单页路径，兼作多页失败后的兜底
    async fn run_single_page(
        &self,
        query: &str,
        fallback_reason: Option<String>,
    ) -> PresentationResult {
        let spec = PageSpec {
            page_number: 1,
            title: derive_title(query),
            topic_query: query.to_string(),
        };

        let page = self.executor.run(&spec).await;
        let html_content = if page.success {
            html::render_single_document(&spec.title, &page.html_fragment)
        } else {
            html::render_error_document(page.error.as_deref().unwrap_or("unknown error"))
        };

        PresentationResult {
            success: page.success,
            user_query: query.to_string(),
            is_multi_page: false,
            orchestrator_used: OrchestratorKind::SinglePage,
            page_plan: None,
            pages_processed: Some(1),
            pages_successful: Some(if page.success { 1 } else { 0 }),
            total_evidence_count: page.evidence_count,
            html_content,
            error: page.error.clone(),
            page_details: vec![page],
            processing_time: ProcessingTime::default(),
            output_path: None,
            fallback_reason,
        }
    }
}

fn finish(
    mut result: PresentationResult,
    planning_seconds: f64,
    total_started: Instant,
) -> PresentationResult {
    let total_seconds = total_started.elapsed().as_secs_f64();
    result.processing_time = ProcessingTime {
        total_seconds,
        planning_seconds,
        generation_seconds: total_seconds - planning_seconds,
    };
    result
}

/// 从查询派生单页标题，过长时截断到前若干词
fn derive_title(query: &str) -> String {
    let words: Vec<&str> = query.split_whitespace().collect();
    if words.len() <= 8 {
        query.to_string()
    } else {
        format!("{}…", words[..8].join(" "))
    }
}
