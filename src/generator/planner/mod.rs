//! 页面规划器
//!
//! 先用零成本的启发式规则判定单页/多页，规则未命中时
//! 再通过LLM结构化提取生成页面规划。规划阶段的任何失败
//! 都就地降级为单页决策，不向外传播错误。

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::generator::GeneratorContext;
use crate::generator::types::PresentationError;

pub mod heuristics;

const PLANNER_CACHE_CATEGORY: &str = "planner";

/// 单个页面的规划
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageSpec {
    /// 页码，从1开始连续编号
    pub page_number: usize,
    /// 页面标题
    pub title: String,
    /// 本页的检索与内容合成子查询
    pub topic_query: String,
}

/// 多页演示文稿的完整规划
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagePlan {
    pub total_pages: usize,
    /// 演示文稿的整体主题
    pub theme: String,
    /// 规划依据说明
    pub reasoning: String,
    pub pages: Vec<PageSpec>,
}

/// 规划决策
#[derive(Debug, Clone)]
pub enum PlanDecision {
    SinglePage,
    MultiPage(PagePlan),
}

/// LLM结构化提取的规划草稿，经校验后转为PagePlan
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PagePlanDraft {
    /// 该查询是否需要多页展示
    pub is_multi_page: bool,
    /// 规划的总页数
    pub total_pages: usize,
    /// 演示文稿的整体主题
    pub theme: String,
    /// 判定依据
    pub reasoning: String,
    /// 各页规划，单页时可为空
    pub pages: Vec<PageSpec>,
}

pub struct PagePlanner {
    context: GeneratorContext,
}

impl PagePlanner {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }

    /// 分析查询，给出单页或多页的规划决策
    pub async fn analyze_query(&self, query: &str) -> PlanDecision {
        let presentation = &self.context.config.presentation;

        if let Some(decision) = heuristics::classify(query, presentation) {
            println!("📋 启发式规则命中，跳过LLM规划");
            return decision;
        }

        match self.analyze_with_llm(query).await {
            Ok(decision) => decision,
            Err(e) => {
                eprintln!("⚠️ 页面规划失败，降级为单页处理: {}", e);
                PlanDecision::SinglePage
            }
        }
    }

    /// 跳过启发式规则，直接通过LLM规划（强制多页模式使用）
    pub async fn analyze_with_llm(&self, query: &str) -> Result<PlanDecision> {
        let user_prompt = build_user_prompt(query);

        let draft = match self
            .context
            .get_from_cache::<PagePlanDraft>(PLANNER_CACHE_CATEGORY, &user_prompt)
            .await
        {
            Some(cached) => {
                println!("💾 命中规划缓存");
                cached
            }
            None => {
                let draft = self
                    .context
                    .llm_client
                    .extract::<PagePlanDraft>(PLANNER_SYSTEM_PROMPT, &user_prompt)
                    .await?;
                self.context
                    .set_cache(PLANNER_CACHE_CATEGORY, &user_prompt, &draft)
                    .await?;
                draft
            }
        };

        let max_pages = self.context.config.presentation.max_pages_per_presentation;
        Ok(validate_draft(draft, max_pages)?)
    }
}

/// 校验规划草稿
///
/// 页数与pages长度不一致时以pages为准；页码重新从1连续编号；
/// 超出页数上限或内容缺失视为规划失败。
pub fn validate_draft(
    draft: PagePlanDraft,
    max_pages: usize,
) -> Result<PlanDecision, PresentationError> {
    if !draft.is_multi_page || draft.total_pages <= 1 || draft.pages.len() <= 1 {
        return Ok(PlanDecision::SinglePage);
    }

    let mut pages = draft.pages;
    if pages.len() > max_pages {
        return Err(PresentationError::Planning(format!(
            "规划页数 {} 超出上限 {}",
            pages.len(),
            max_pages
        )));
    }
    if pages
        .iter()
        .any(|p| p.title.trim().is_empty() || p.topic_query.trim().is_empty())
    {
        return Err(PresentationError::Planning(
            "规划中存在标题或子查询为空的页面".to_string(),
        ));
    }

    // 以pages长度为准并重新编号
    for (i, page) in pages.iter_mut().enumerate() {
        page.page_number = i + 1;
    }
    let total_pages = pages.len();

    Ok(PlanDecision::MultiPage(PagePlan {
        total_pages,
        theme: draft.theme,
        reasoning: draft.reasoning,
        pages,
    }))
}

fn build_user_prompt(query: &str) -> String {
    format!(
        r#"Analyze this query and determine if it needs multiple presentation pages:

Query: "{}"

Consider:
1. Does the query explicitly mention multiple topics or pages?
2. Would a comprehensive answer require multiple distinct sections?
3. Keep plans focused: prefer fewer pages over thin pages."#,
        query
    )
}

const PLANNER_SYSTEM_PROMPT: &str = r#"You are a presentation planning assistant.
Your job is to analyze user queries and determine if they require single or multiple pages.
For multi-page plans, break the query into focused per-page topics. Each page needs a
concise title and a self-contained topic query usable for evidence retrieval.
For single-page queries set is_multi_page to false and leave pages empty."#;

#[cfg(test)]
mod tests;
