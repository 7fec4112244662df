use crate::config::Config;
use crate::generator::context::GeneratorContext;
use crate::generator::orchestrator::EnhancedOrchestrator;
use crate::generator::types::{PresentationResult, ProcessOptions};

use anyhow::Result;
use std::collections::HashMap;
use std::time::Duration;

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Option<std::time::Instant>,
    phase_start_times: HashMap<String, std::time::Instant>,
    phase_durations: HashMap<String, Duration>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Some(std::time::Instant::now()),
            phase_start_times: HashMap::new(),
            phase_durations: HashMap::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), std::time::Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        if let Some(start_time) = self.phase_start_times.remove(phase_name) {
            let duration = start_time.elapsed();
            self.phase_durations
                .insert(phase_name.to_string(), duration);
            Some(duration)
        } else {
            None
        }
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Option<Duration> {
        self.start_time.map(|start| start.elapsed())
    }

    /// 获取所有阶段的执行时间
    pub fn get_phase_durations(&self) -> &HashMap<String, Duration> {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = String::new();

        if let Some(total_duration) = self.get_total_duration() {
            report.push_str(&format!(
                "总执行时间: {:.2}秒\n",
                total_duration.as_secs_f64()
            ));
        }

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const GENERATION: &'static str = "generation";
    pub const OUTPUT: &'static str = "output";
}

/// 最终HTML在Memory中的存放位置
pub const MEMORY_SCOPE_PRESENTATION: &str = "presentation";
pub const MEMORY_KEY_HTML: &str = "html";
pub const MEMORY_KEY_RESULT: &str = "result";

/// 启动演示文稿生成工作流
pub async fn launch(
    config: &Config,
    query: &str,
    options: &ProcessOptions,
) -> Result<PresentationResult> {
    let mut timing = TimingScope::new();
    let context = GeneratorContext::new(config.clone()).await?;

    println!("🚀 开始处理查询: {}", query);

    timing.start_phase(TimingKeys::GENERATION);
    let orchestrator = EnhancedOrchestrator::new(context.clone());
    let mut result = orchestrator.process_query(query, options).await;
    timing.end_phase(TimingKeys::GENERATION);

    context
        .store_to_memory(MEMORY_SCOPE_PRESENTATION, MEMORY_KEY_HTML, &result.html_content)
        .await?;
    context
        .store_to_memory(MEMORY_SCOPE_PRESENTATION, MEMORY_KEY_RESULT, &result)
        .await?;

    if config.save_html && !result.html_content.is_empty() {
        timing.start_phase(TimingKeys::OUTPUT);
        let output_path =
            crate::outlet::save(&context, result.is_multi_page, options.filename.as_deref())
                .await?;
        result.output_path = Some(output_path.display().to_string());
        timing.end_phase(TimingKeys::OUTPUT);
    }

    if config.verbose {
        println!("{}", timing.generate_timing_report());
    }

    Ok(result)
}
