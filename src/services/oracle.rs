//! 答题服务 - 业务能力层
//!
//! 只负责"根据简历回答一个问题"，不关心问题在页面上是什么控件
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 默认指向本地 Ollama 的 OpenAI 兼容端点
//! - 任何失败（网络、超时、空回答）都折叠为 `None`

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// 答题能力
///
/// 返回 `None` 表示没有答案，调用方各自决定默认值
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn ask(&self, question: &str, context: &str) -> Option<String>;
}

/// 答题失败的原因，只在本模块内部使用
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("LLM API 调用失败: {0}")]
    Api(#[from] OpenAIError),
    #[error("LLM 返回内容为空")]
    EmptyContent,
    #[error("LLM 调用超时 ({0:?})")]
    TimedOut(Duration),
}

const SYSTEM_MESSAGE: &str =
    "You fill in job application forms on behalf of the candidate whose resume you are given. \
     Answer only from the resume and follow the output rules exactly.";

/// 基于 LLM 的答题服务
///
/// 职责：
/// - 拼装简历 + 问题的提示词
/// - 调用 OpenAI 兼容的接口
/// - 限定单次调用时间
pub struct LlmOracle {
    client: Client<OpenAIConfig>,
    model_name: String,
    timeout: Duration,
}

impl LlmOracle {
    /// 创建新的答题服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            timeout: config.oracle_timeout,
        }
    }

    /// 发送一次对话请求
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String, OracleError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.3)
            .max_tokens(256u32)
            .build()?;

        let response = self.client.chat().create(request).await?;
        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .ok_or(OracleError::EmptyContent)?;

        Ok(content.to_string())
    }

    async fn ask_within_timeout(&self, question: &str, context: &str) -> Result<String, OracleError> {
        let prompt = build_prompt(question, context);
        tokio::time::timeout(self.timeout, self.send_to_llm(&prompt, Some(SYSTEM_MESSAGE)))
            .await
            .map_err(|_| OracleError::TimedOut(self.timeout))?
    }
}

#[async_trait]
impl Oracle for LlmOracle {
    async fn ask(&self, question: &str, context: &str) -> Option<String> {
        match self.ask_within_timeout(question, context).await {
            Ok(answer) => {
                debug!("LLM 回答: {}", answer);
                Some(answer)
            }
            Err(e) => {
                warn!("⚠️ 没有得到答案 ({}): {}", question, e);
                None
            }
        }
    }
}

/// 构建答题提示词
pub fn build_prompt(question: &str, resume: &str) -> String {
    format!(
        r#"[Resume]
{}

[Question]
{}

Answer STRICTLY following these rules:
1. For numeric questions (years/months): Return ONLY the number. If unsure, return 0.
2. For yes/no questions: Return EXACTLY 'Yes' or 'No'.
3. For dropdowns: Return EXACT option text from these choices: None, Conversational, Professional, Native or bilingual.
4. For other questions: Concise answer using resume info only."#,
        resume.trim(),
        question.trim()
    )
}
