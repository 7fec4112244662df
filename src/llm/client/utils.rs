use crate::config::LLMConfig;

/// 按prompt规模选择模型
///
/// 短prompt优先使用高效模型，失败时以强力模型兜底；
/// 超长prompt直接使用强力模型，无兜底。
pub fn evaluate_befitting_model(
    llm_config: &LLMConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> (String, Option<String>) {
    if system_prompt.len() + user_prompt.len() <= 32 * 1024 {
        return (
            llm_config.model_efficient.clone(),
            Some(llm_config.model_powerful.clone()),
        );
    }
    (llm_config.model_powerful.clone(), None)
}
