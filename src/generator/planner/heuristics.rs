//! 规划启发式规则
//!
//! 按序短路求值的纯函数规则，不涉及任何外部调用。
//! 规则命中即为最终决策，未命中返回None交由LLM分类。

use regex::Regex;
use std::sync::LazyLock;

use crate::config::PresentationConfig;
use crate::generator::planner::{PagePlan, PageSpec, PlanDecision};

static PAGE_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,3})[\s-]*(?:pages?|slides?)\b").unwrap());

static TOPIC_LEAD_IN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:covering|including|about|across)\b|:").unwrap());

const COMPREHENSIVENESS_KEYWORDS: &[&str] = &[
    "overview",
    "comprehensive",
    "complete",
    "full analysis",
    "detailed",
    "in-depth",
];

/// 启发式分类
///
/// 规则依次为：显式页数模式、短查询、主题列表。
/// 显式页数优先于短查询判定，"3-page deck"这类短查询仍按多页处理。
pub fn classify(query: &str, config: &PresentationConfig) -> Option<PlanDecision> {
    if let Some(decision) = classify_explicit_page_count(query, config) {
        return Some(decision);
    }

    let word_count = query.split_whitespace().count();
    if word_count <= config.short_query_word_limit {
        return Some(PlanDecision::SinglePage);
    }

    classify_topic_list(query, config)
}

/// 规则：查询中出现"N-page"/"N slides"模式
fn classify_explicit_page_count(
    query: &str,
    config: &PresentationConfig,
) -> Option<PlanDecision> {
    let captures = PAGE_COUNT_RE.captures(query)?;
    let requested: usize = captures[1].parse().ok()?;

    if requested <= 1 {
        return Some(PlanDecision::SinglePage);
    }
    let total_pages = requested.min(config.max_pages_per_presentation);

    // 主题列表长度与页数吻合时按主题分页，否则合成均分的子查询
    let topics = detect_topic_list(query);
    let pages = if topics.len() == total_pages {
        topics_to_pages(&topics)
    } else {
        (1..=total_pages)
            .map(|number| PageSpec {
                page_number: number,
                title: format!("Part {} of {}", number, total_pages),
                topic_query: format!("{} (part {} of {})", query, number, total_pages),
            })
            .collect()
    };

    Some(PlanDecision::MultiPage(PagePlan {
        total_pages,
        theme: query.to_string(),
        reasoning: format!("查询中显式要求 {} 页", requested),
        pages,
    }))
}

/// 规则：≥3个主题短语且带综述性关键词
fn classify_topic_list(query: &str, config: &PresentationConfig) -> Option<PlanDecision> {
    let query_lower = query.to_lowercase();
    if !COMPREHENSIVENESS_KEYWORDS
        .iter()
        .any(|k| query_lower.contains(k))
    {
        return None;
    }

    let mut topics = detect_topic_list(query);
    if topics.len() < 3 {
        return None;
    }
    topics.truncate(config.max_pages_per_presentation);

    Some(PlanDecision::MultiPage(PagePlan {
        total_pages: topics.len(),
        theme: query.to_string(),
        reasoning: format!("查询列举了 {} 个主题并要求综述性展示", topics.len()),
        pages: topics_to_pages(&topics),
    }))
}

/// 从查询中提取逗号/"and"分隔的主题列表
///
/// 优先取最后一个引导词（covering/including/about/across/冒号）之后
/// 的部分作为列表主体，没有引导词时对整个查询切分。
pub fn detect_topic_list(query: &str) -> Vec<String> {
    let tail = TOPIC_LEAD_IN_RE
        .find_iter(query)
        .last()
        .map(|m| &query[m.end()..])
        .unwrap_or(query);

    tail.split(',')
        .flat_map(|segment| segment.split(" and "))
        .map(|phrase| {
            phrase
                .trim()
                .trim_start_matches("and ")
                .trim_end_matches('.')
                .trim()
        })
        .filter(|phrase| !phrase.is_empty())
        .map(|phrase| phrase.to_string())
        .collect()
}

fn topics_to_pages(topics: &[String]) -> Vec<PageSpec> {
    topics
        .iter()
        .enumerate()
        .map(|(i, topic)| PageSpec {
            page_number: i + 1,
            title: capitalize(topic),
            topic_query: topic.clone(),
        })
        .collect()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
