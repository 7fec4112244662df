use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// 证据条目
///
/// 来自预处理后的证据语料库（evidence.json），页面内容合成时
/// 作为上下文注入到LLM的prompt中。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub id: String,
    pub content: String,
    /// 证据类型，如"text"、"table"、"image"
    #[serde(default = "default_evidence_type")]
    pub evidence_type: String,
    #[serde(default)]
    pub source: String,
    /// 检索得分，由搜索器填充
    #[serde(default)]
    pub score: f64,
}

fn default_evidence_type() -> String {
    "text".to_string()
}

/// 证据语料库文件的反序列化结构
#[derive(Debug, Deserialize)]
struct EvidenceCorpus {
    items: Vec<EvidenceItem>,
    /// 各证据类型的权重，用于调整排序得分
    #[serde(default)]
    type_weights: HashMap<String, f64>,
}

/// 证据检索接口
///
/// 抽象出检索能力，便于在测试中注入受控实现。
#[async_trait]
pub trait EvidenceSearcher: Send + Sync {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<EvidenceItem>>;
}

/// 基于关键词匹配的本地语料检索器
///
/// 对查询分词后统计各证据条目的词命中率，按证据类型权重
/// 加权排序，返回得分最高的top_k条。
pub struct LocalCorpusSearcher {
    items: Vec<EvidenceItem>,
    type_weights: HashMap<String, f64>,
}

impl LocalCorpusSearcher {
    /// 从JSON语料文件加载检索器
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("无法读取证据语料文件: {}", path.display()))?;
        let corpus: EvidenceCorpus =
            serde_json::from_str(&content).context("证据语料文件格式无效")?;

        println!("📋 证据语料库已加载: {} 条", corpus.items.len());

        Ok(Self {
            items: corpus.items,
            type_weights: corpus.type_weights,
        })
    }

    /// 构造空语料检索器，所有查询均返回空结果
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            type_weights: HashMap::new(),
        }
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.len() > 2)
            .map(|t| t.to_lowercase())
            .collect()
    }

    fn score_item(&self, query_tokens: &[String], item: &EvidenceItem) -> f64 {
        if query_tokens.is_empty() {
            return 0.0;
        }

        let content_lower = item.content.to_lowercase();
        let hits = query_tokens
            .iter()
            .filter(|t| content_lower.contains(t.as_str()))
            .count();

        let base = hits as f64 / query_tokens.len() as f64;
        let weight = self
            .type_weights
            .get(&item.evidence_type)
            .copied()
            .unwrap_or(1.0);

        base * weight
    }
}

#[async_trait]
impl EvidenceSearcher for LocalCorpusSearcher {
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<EvidenceItem>> {
        let query_tokens = Self::tokenize(query);

        let mut scored: Vec<EvidenceItem> = self
            .items
            .iter()
            .filter_map(|item| {
                let score = self.score_item(&query_tokens, item);
                if score > 0.0 {
                    let mut hit = item.clone();
                    hit.score = score;
                    Some(hit)
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored)
    }
}

#[cfg(test)]
mod tests;
