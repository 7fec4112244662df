use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// 输出路径
    pub output_path: PathBuf,

    /// 内部工作目录路径 (.prism)
    pub internal_path: PathBuf,

    /// 证据语料文件路径（JSON）
    pub evidence_path: PathBuf,

    /// 是否将最终HTML保存到磁盘
    pub save_html: bool,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// 演示文稿编排配置
    pub presentation: PresentationConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，优先用于常规推理任务（页面规划、内容合成）
    pub model_efficient: String,

    /// 高质量模型，作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 缓存配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,

    /// 缓存过期时间（小时）
    pub expire_hours: u64,
}

/// 演示文稿编排配置
///
/// 各字段均可通过环境变量覆盖。配置显式作为结构体传入各组件，
/// 而不是在使用处读取环境，便于测试按用例变更限制。
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PresentationConfig {
    /// 页面并发上限（环境变量 MAX_CONCURRENT_PAGES）
    pub max_concurrent_pages: usize,

    /// 多页功能开关（环境变量 ENABLE_MULTI_PAGE）
    pub enable_multi_page: bool,

    /// 是否自动检测单页/多页（环境变量 AUTO_PAGE_DETECTION），关闭时恒为单页
    pub auto_page_detection: bool,

    /// 单次演示文稿的页数硬上限（环境变量 MAX_PAGES_PER_PRESENTATION）
    pub max_pages_per_presentation: usize,

    /// 短查询词数阈值，词数小于等于该值的查询直接判定为单页
    pub short_query_word_limit: usize,

    /// 每页检索的证据条数上限
    pub top_k_results: usize,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("./prism.out"),
            internal_path: PathBuf::from("./.prism"),
            evidence_path: PathBuf::from("./evidence.json"),
            save_html: true,
            llm: LLMConfig::default(),
            cache: CacheConfig::default(),
            presentation: PresentationConfig::default(),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("PRISM_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api-inference.modelscope.cn/v1"),
            model_efficient: String::from("Qwen/Qwen3-Next-80B-A3B-Instruct"),
            model_powerful: String::from("Qwen/Qwen3-235B-A22B-Instruct-2507"),
            max_tokens: 32768,
            temperature: 0.3,
            retry_attempts: 5,
            retry_delay_ms: 5000,
            timeout_seconds: 300,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".prism/cache"),
            expire_hours: 8760,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pages: env_usize("MAX_CONCURRENT_PAGES", 3),
            enable_multi_page: env_bool("ENABLE_MULTI_PAGE", true),
            auto_page_detection: env_bool("AUTO_PAGE_DETECTION", true),
            max_pages_per_presentation: env_usize("MAX_PAGES_PER_PRESENTATION", 10),
            short_query_word_limit: 5,
            top_k_results: 20,
        }
    }
}
