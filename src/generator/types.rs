use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generator::planner::PagePlan;

/// 单次请求的处理选项
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// 强制单页处理，跳过规划
    pub force_single_page: bool,
    /// 强制多页处理（仍受enable_multi_page开关约束）
    pub force_multi_page: bool,
    /// 保存HTML时使用的文件名，缺省时自动生成
    pub filename: Option<String>,
}

/// 使用的编排路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrchestratorKind {
    #[serde(rename = "single_page")]
    SinglePage,
    #[serde(rename = "multi_page")]
    MultiPage,
}

/// 单个页面的处理结果
///
/// 页面级失败不向外传播错误，统一吸收为success=false的结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub page_number: usize,
    pub title: String,
    pub success: bool,
    pub evidence_count: usize,
    pub html_fragment: String,
    /// 本页处理耗时（秒）
    pub processing_time: f64,
    pub error: Option<String>,
}

impl PageResult {
    /// 构造失败结果
    pub fn failed(page_number: usize, title: &str, error: String, processing_time: f64) -> Self {
        Self {
            page_number,
            title: title.to_string(),
            success: false,
            evidence_count: 0,
            html_fragment: String::new(),
            processing_time,
            error: Some(error),
        }
    }
}

/// 各阶段耗时（秒）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingTime {
    pub total_seconds: f64,
    pub planning_seconds: f64,
    pub generation_seconds: f64,
}

/// 一次请求的最终结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationResult {
    pub success: bool,
    pub user_query: String,
    pub is_multi_page: bool,
    pub orchestrator_used: OrchestratorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_plan: Option<PagePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_processed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_successful: Option<usize>,
    pub total_evidence_count: usize,
    pub html_content: String,
    /// 各页明细，始终按page_number升序
    pub page_details: Vec<PageResult>,
    pub processing_time: ProcessingTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// 多页路径失败回退到单页时记录的原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 演示文稿生成过程的错误分类
#[derive(Debug, Error)]
pub enum PresentationError {
    /// 页面规划失败，就地降级为单页决策
    #[error("页面规划失败: {0}")]
    Planning(String),
    /// 单个页面生成失败，吸收为失败的PageResult
    #[error("页面生成失败: {0}")]
    PageExecution(String),
    /// 多页生成全军覆没，由上层回退到单页路径
    #[error("多页生成失败: {attempted} 个页面均未成功")]
    TotalMultiPageFailure { attempted: usize },
}
