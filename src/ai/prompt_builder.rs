use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};

use crate::core::models::{FeedEntry, SummaryPrompt};

/// Fixed instructions: plain and concise, exactly three bullet lines,
/// translated into Japanese, ending with a conclusion.
pub const SYSTEM_INSTRUCTIONS: &str = "```
与えられたフィードの情報を、以下の制約条件をもとに要約を出力してください。

制約条件:
・文章は簡潔にわかりやすく。
・箇条書きで3行で出力。
・要約した文章は日本語へ翻訳。
・最終的な結論を含めること。

期待する出力フォーマット:
1.
2.
3.
```";

/// Builds the summarization prompt for a single feed entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryRequestBuilder;

impl SummaryRequestBuilder {
    /// Title and summary joined by a newline. The summary is passed through
    /// untruncated.
    #[must_use]
    pub fn build(entry: &FeedEntry) -> SummaryPrompt {
        SummaryPrompt {
            system_instructions: SYSTEM_INSTRUCTIONS.to_string(),
            user_content: format!("{}\n{}", entry.title, entry.summary_text),
        }
    }
}

impl SummaryPrompt {
    /// Chat messages in request order: system first, then user.
    #[must_use]
    pub fn to_messages(&self) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(self.system_instructions.clone()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(self.user_content.clone()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }
}
