use anyhow::Result;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

use crate::config::CacheConfig;

/// 缓存管理器
///
/// 以prompt的MD5作为键，将LLM调用结果按类别落盘为JSON，
/// 相同prompt的重复请求直接命中缓存，避免重复调用模型服务。
pub struct CacheManager {
    config: CacheConfig,
}

/// 缓存条目
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: u64,
    /// prompt的MD5哈希值，用于缓存键的生成和验证
    pub prompt_hash: String,
}

impl CacheManager {
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// 生成prompt的MD5哈希
    pub fn hash_prompt(&self, prompt: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(prompt.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// 获取缓存文件路径
    fn get_cache_path(&self, category: &str, hash: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(category)
            .join(format!("{}.json", hash))
    }

    /// 检查缓存是否过期
    fn is_expired(&self, timestamp: u64) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let expire_seconds = self.config.expire_hours * 3600;
        now.saturating_sub(timestamp) > expire_seconds
    }

    /// 获取缓存
    pub async fn get<T>(&self, category: &str, prompt: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        if !self.config.enabled {
            return Ok(None);
        }

        let hash = self.hash_prompt(prompt);
        let cache_path = self.get_cache_path(category, &hash);

        if !cache_path.exists() {
            return Ok(None);
        }

        match fs::read_to_string(&cache_path).await {
            Ok(content) => match serde_json::from_str::<CacheEntry<T>>(&content) {
                Ok(entry) => {
                    if self.is_expired(entry.timestamp) {
                        // 删除过期缓存
                        let _ = fs::remove_file(&cache_path).await;
                        return Ok(None);
                    }
                    Ok(Some(entry.data))
                }
                Err(e) => {
                    eprintln!("⚠️ 缓存反序列化失败（{}）: {}", category, e);
                    Ok(None)
                }
            },
            Err(e) => {
                eprintln!("⚠️ 缓存读取失败（{}）: {}", category, e);
                Ok(None)
            }
        }
    }

    /// 设置缓存
    pub async fn set<T>(&self, category: &str, prompt: &str, data: T) -> Result<()>
    where
        T: Serialize,
    {
        if !self.config.enabled {
            return Ok(());
        }

        let hash = self.hash_prompt(prompt);
        let cache_path = self.get_cache_path(category, &hash);

        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let entry = CacheEntry {
            data,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            prompt_hash: hash,
        };

        let content = serde_json::to_string(&entry)?;
        fs::write(&cache_path, content).await?;
        Ok(())
    }

    /// 清空指定类别的缓存
    pub async fn clear_category(&self, category: &str) -> Result<()> {
        let dir = self.config.cache_dir.join(category);
        if dir.exists() {
            fs::remove_dir_all(&dir).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache(enabled: bool) -> (CacheManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = CacheConfig {
            enabled,
            cache_dir: temp_dir.path().to_path_buf(),
            expire_hours: 1,
        };
        (CacheManager::new(config), temp_dir)
    }

    #[tokio::test]
    async fn test_set_and_get_roundtrip() {
        let (cache, _dir) = test_cache(true);

        cache.set("planner", "some prompt", "plan data").await.unwrap();
        let hit: Option<String> = cache.get("planner", "some prompt").await.unwrap();
        assert_eq!(hit, Some("plan data".to_string()));
    }

    #[tokio::test]
    async fn test_miss_on_unknown_prompt() {
        let (cache, _dir) = test_cache(true);

        let hit: Option<String> = cache.get("planner", "never stored").await.unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_never_hits() {
        let (cache, _dir) = test_cache(false);

        cache.set("planner", "prompt", "data").await.unwrap();
        let hit: Option<String> = cache.get("planner", "prompt").await.unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_clear_category() {
        let (cache, _dir) = test_cache(true);

        cache.set("page_content", "prompt", "data").await.unwrap();
        cache.clear_category("page_content").await.unwrap();

        let hit: Option<String> = cache.get("page_content", "prompt").await.unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_hash_prompt_stable() {
        let (cache, _dir) = test_cache(true);
        assert_eq!(cache.hash_prompt("abc"), cache.hash_prompt("abc"));
        assert_ne!(cache.hash_prompt("abc"), cache.hash_prompt("abd"));
    }
}
