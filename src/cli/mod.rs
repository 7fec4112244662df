use crate::config::{Config, LLMProvider};
use crate::generator::types::ProcessOptions;
use clap::Parser;
use std::path::PathBuf;

/// Prism-RS - 由Rust与AI驱动的HTML演示文稿生成引擎
#[derive(Parser, Debug)]
#[command(name = "prism-rs")]
#[command(
    about = "AI-powered generation engine for HTML presentations. It analyzes a user query, plans a single-page or multi-page presentation, retrieves supporting evidence and assembles the final HTML document."
)]
#[command(author = "Sopaco")]
#[command(version)]
pub struct Args {
    /// 用户查询
    pub query: String,

    /// 输出路径
    #[arg(short, long, default_value = "./prism.out")]
    pub output_path: PathBuf,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 证据语料文件路径
    #[arg(short, long)]
    pub evidence_path: Option<PathBuf>,

    /// 输出文件名（可选，默认按时间戳生成）
    #[arg(short, long)]
    pub filename: Option<String>,

    /// 强制单页处理，跳过单页/多页判定
    #[arg(long)]
    pub force_single_page: bool,

    /// 强制多页处理，跳过单页/多页判定
    #[arg(long)]
    pub force_multi_page: bool,

    /// 不将HTML保存到磁盘，仅输出结果JSON
    #[arg(long)]
    pub no_save: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 高能效模型，优先用于常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 页面并发上限
    #[arg(long)]
    pub max_concurrent_pages: Option<usize>,

    /// 单次演示文稿的页数硬上限
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// LLM Provider (openai, moonshot, deepseek, openrouter, anthropic, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// 是否禁用缓存
    #[arg(long)]
    pub no_cache: bool,

    /// 仅检查模型连接后退出
    #[arg(long)]
    pub check_connection: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn to_config(&self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path).unwrap_or_else(|_| {
                panic!("⚠️ 警告: 无法读取配置文件 {:?}", config_path)
            })
        } else {
            // 如果没有显式指定配置文件，尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| std::path::PathBuf::from("."))
                .join("prism.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|_| {
                    panic!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}",
                        default_config_path
                    )
                })
            } else {
                // 默认配置文件不存在，使用默认值
                Config::default()
            }
        };

        // 覆盖配置文件中的设置
        config.output_path = self.output_path.clone();
        if let Some(evidence_path) = &self.evidence_path {
            config.evidence_path = evidence_path.clone();
        }
        if self.no_save {
            config.save_html = false;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = &self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url.clone();
        }
        if let Some(llm_api_key) = &self.llm_api_key {
            config.llm.api_key = llm_api_key.clone();
        }
        if let Some(model_efficient) = &self.model_efficient {
            config.llm.model_efficient = model_efficient.clone();
        }
        if let Some(model_powerful) = &self.model_powerful {
            config.llm.model_powerful = model_powerful.clone();
        } else if self.model_efficient.is_some() {
            config.llm.model_powerful = config.llm.model_efficient.to_string();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 编排配置
        if let Some(max_concurrent_pages) = self.max_concurrent_pages {
            config.presentation.max_concurrent_pages = max_concurrent_pages;
        }
        if let Some(max_pages) = self.max_pages {
            config.presentation.max_pages_per_presentation = max_pages;
        }

        // 缓存配置
        if self.no_cache {
            config.cache.enabled = false;
        }

        config.verbose = self.verbose;

        config
    }

    /// 将CLI参数转换为单次请求的处理选项
    pub fn to_options(&self) -> ProcessOptions {
        ProcessOptions {
            force_single_page: self.force_single_page,
            force_multi_page: self.force_multi_page,
            filename: self.filename.clone(),
        }
    }
}
