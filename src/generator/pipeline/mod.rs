//! 单页流水线
//!
//! 证据检索 → 内容合成 → 片段渲染的三段式流水线。
//! 任何阶段失败都吸收为success=false的PageResult，
//! 不会把错误抛过本层边界。

use async_trait::async_trait;
use std::time::Instant;

use crate::evidence::EvidenceItem;
use crate::generator::GeneratorContext;
use crate::generator::planner::PageSpec;
use crate::generator::types::{PageResult, PresentationError};
use crate::html;

const PAGE_CONTENT_CACHE_CATEGORY: &str = "page_content";

/// 页面执行接口，多页编排通过该接口驱动每页的生成
#[async_trait]
pub trait PageExecutor: Send + Sync {
    async fn run(&self, spec: &PageSpec) -> PageResult;
}

pub struct SinglePagePipeline {
    context: GeneratorContext,
}

impl SinglePagePipeline {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }

    async fn run_inner(&self, spec: &PageSpec) -> anyhow::Result<(usize, String)> {
        let top_k = self.context.config.presentation.top_k_results;
        let evidence = self
            .context
            .searcher
            .search(&spec.topic_query, top_k)
            .await?;
        println!(
            "📋 第 {} 页检索到 {} 条证据: {}",
            spec.page_number,
            evidence.len(),
            spec.title
        );

        let user_prompt = build_synthesis_prompt(spec, &evidence);
        let content = match self
            .context
            .get_from_cache::<String>(PAGE_CONTENT_CACHE_CATEGORY, &user_prompt)
            .await
        {
            Some(cached) => {
                println!("💾 第 {} 页命中内容缓存", spec.page_number);
                cached
            }
            None => {
                let content = self
                    .context
                    .llm_client
                    .prompt(SYNTHESIS_SYSTEM_PROMPT, &user_prompt)
                    .await?;
                self.context
                    .set_cache(PAGE_CONTENT_CACHE_CATEGORY, &user_prompt, &content)
                    .await?;
                content
            }
        };

        let fragment = html::render_page_fragment(&spec.title, &content);
        Ok((evidence.len(), fragment))
    }
}

#[async_trait]
impl PageExecutor for SinglePagePipeline {
    async fn run(&self, spec: &PageSpec) -> PageResult {
        let started = Instant::now();

        match self.run_inner(spec).await {
            Ok((evidence_count, html_fragment)) => PageResult {
                page_number: spec.page_number,
                title: spec.title.clone(),
                success: true,
                evidence_count,
                html_fragment,
                processing_time: started.elapsed().as_secs_f64(),
                error: None,
            },
            Err(e) => {
                let error = PresentationError::PageExecution(e.to_string());
                eprintln!("❌ 第 {} 页生成失败: {}", spec.page_number, error);
                PageResult::failed(
                    spec.page_number,
                    &spec.title,
                    error.to_string(),
                    started.elapsed().as_secs_f64(),
                )
            }
        }
    }
}

fn build_synthesis_prompt(spec: &PageSpec, evidence: &[EvidenceItem]) -> String {
    let mut prompt = format!(
        "Topic: {}\nPage title: {}\n\nEvidence:\n",
        spec.topic_query, spec.title
    );
    if evidence.is_empty() {
        prompt.push_str("(no evidence retrieved; state clearly that data is unavailable)\n");
    }
    for item in evidence {
        prompt.push_str(&format!(
            "- [{}] ({}) {}\n",
            item.evidence_type, item.source, item.content
        ));
    }
    prompt.push_str(
        "\nSynthesize the evidence into well-structured HTML body content for this page. \
         Use only tags valid inside <body>, no <html>/<head>/<body> wrappers.",
    );
    prompt
}

const SYNTHESIS_SYSTEM_PROMPT: &str = r#"You are a presentation content writer.
You turn retrieved evidence into concise, well-structured HTML page content.
Stay faithful to the evidence; never invent numbers or findings."#;
