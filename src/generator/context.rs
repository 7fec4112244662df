use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;

use crate::{
    cache::CacheManager,
    config::Config,
    evidence::{EvidenceSearcher, LocalCorpusSearcher},
    llm::client::LLMClient,
    memory::Memory,
};

#[derive(Clone)]
pub struct GeneratorContext {
    /// LLM调用器，用于与AI通信。
    pub llm_client: LLMClient,
    /// 配置
    pub config: Config,
    /// 缓存管理器
    pub cache_manager: Arc<RwLock<CacheManager>>,
    /// 生成器记忆
    pub memory: Arc<RwLock<Memory>>,
    /// 证据检索器
    pub searcher: Arc<dyn EvidenceSearcher>,
}

impl GeneratorContext {
    /// 创建新的生成器上下文
    pub async fn new(config: Config) -> Result<Self> {
        let searcher: Arc<dyn EvidenceSearcher> = if config.evidence_path.exists() {
            Arc::new(LocalCorpusSearcher::from_file(&config.evidence_path).await?)
        } else {
            println!(
                "⚠️ 未找到证据语料文件 {}，使用空语料库",
                config.evidence_path.display()
            );
            Arc::new(LocalCorpusSearcher::empty())
        };

        Self::with_searcher(config, searcher)
    }

    /// 使用指定的证据检索器创建上下文
    pub fn with_searcher(config: Config, searcher: Arc<dyn EvidenceSearcher>) -> Result<Self> {
        let llm_client = LLMClient::new(config.clone())?;
        let cache_manager = Arc::new(RwLock::new(CacheManager::new(config.cache.clone())));
        let memory = Arc::new(RwLock::new(Memory::new()));

        Ok(Self {
            llm_client,
            config,
            cache_manager,
            memory,
            searcher,
        })
    }

    /// 存储数据到 Memory
    pub async fn store_to_memory<T>(&self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize + Send + Sync,
    {
        let mut memory = self.memory.write().await;
        memory.store(scope, key, data)
    }

    /// 从 Memory 获取数据
    pub async fn get_from_memory<T>(&self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a> + Send + Sync,
    {
        let mut memory = self.memory.write().await;
        memory.get(scope, key)
    }

    /// 检查Memory中是否存在指定数据
    pub async fn has_memory_data(&self, scope: &str, key: &str) -> bool {
        let memory = self.memory.read().await;
        memory.has_data(scope, key)
    }

    /// 读取缓存
    pub async fn get_from_cache<T>(&self, category: &str, prompt: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let cache = self.cache_manager.read().await;
        cache.get(category, prompt).await.ok().flatten()
    }

    /// 写入缓存
    pub async fn set_cache<T>(&self, category: &str, prompt: &str, data: T) -> Result<()>
    where
        T: Serialize,
    {
        let cache = self.cache_manager.read().await;
        cache.set(category, prompt, data).await
    }
}
