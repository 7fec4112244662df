//! 磁盘出口
//!
//! 从Memory中取出最终HTML并落盘，文件名带时间戳以免覆盖
//! 此前的生成结果。

use anyhow::{Result, anyhow};
use chrono::Local;
use std::path::PathBuf;
use tokio::fs;

use crate::generator::GeneratorContext;
use crate::generator::workflow::{MEMORY_KEY_HTML, MEMORY_SCOPE_PRESENTATION};

/// 保存最终HTML到输出目录，返回写入的文件路径
pub async fn save(
    context: &GeneratorContext,
    is_multi_page: bool,
    filename: Option<&str>,
) -> Result<PathBuf> {
    let html: String = context
        .get_from_memory(MEMORY_SCOPE_PRESENTATION, MEMORY_KEY_HTML)
        .await
        .ok_or_else(|| anyhow!("Memory中没有待保存的HTML内容"))?;

    let filename = match filename {
        Some(name) => name.to_string(),
        None => {
            let kind = if is_multi_page { "multipage" } else { "single" };
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            format!("prism_{}_{}.html", kind, timestamp)
        }
    };

    let output_dir = &context.config.output_path;
    fs::create_dir_all(output_dir).await?;

    let output_path = output_dir.join(filename);
    fs::write(&output_path, html).await?;
    println!("💾 已保存HTML: {}", output_path.display());

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::evidence::LocalCorpusSearcher;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn test_context(output_dir: &TempDir) -> GeneratorContext {
        let mut config = Config::default();
        config.output_path = output_dir.path().to_path_buf();
        config.cache.enabled = false;
        GeneratorContext::with_searcher(config, Arc::new(LocalCorpusSearcher::empty())).unwrap()
    }

    #[tokio::test]
    async fn test_save_with_generated_filename() {
        let dir = TempDir::new().unwrap();
        let context = test_context(&dir).await;
        context
            .store_to_memory(MEMORY_SCOPE_PRESENTATION, MEMORY_KEY_HTML, "<html></html>")
            .await
            .unwrap();

        let path = save(&context, true, None).await.unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("prism_multipage_"));
        assert!(name.ends_with(".html"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn test_save_with_explicit_filename() {
        let dir = TempDir::new().unwrap();
        let context = test_context(&dir).await;
        context
            .store_to_memory(MEMORY_SCOPE_PRESENTATION, MEMORY_KEY_HTML, "<p>x</p>")
            .await
            .unwrap();

        let path = save(&context, false, Some("report.html")).await.unwrap();
        assert_eq!(path, dir.path().join("report.html"));
    }

    #[tokio::test]
    async fn test_save_without_html_in_memory_errors() {
        let dir = TempDir::new().unwrap();
        let context = test_context(&dir).await;

        assert!(save(&context, false, None).await.is_err());
    }
}
