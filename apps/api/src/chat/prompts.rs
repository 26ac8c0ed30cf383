// Prompt templates for the wellbeing chat.

use crate::llm_client::prompts::RESPOND_IN_KOREAN;

/// Builds the persona prompt around one user message.
pub fn build_chat_prompt(message: &str, is_first_message: bool) -> String {
    let opening = if is_first_message {
        "This is the user's first message of the session: greet them briefly before answering."
    } else {
        "Continue the conversation naturally without greeting again."
    };

    format!(
        r#"You are a supportive companion for people looking for work.
You are warm and empathetic first, and you mix in light, kind humour when the mood allows.
Never be rude or cold. Keep replies short (2-4 sentences).
{opening}

Classify the user's emotion as exactly one of: sad, angry, anxious, happy, neutral.
Only when the emotion is sad, angry or anxious, open with a short comforting phrase.

Return a JSON object with this exact shape:
{{"emotion": "<one of the five labels>", "response": "<your reply>"}}
{RESPOND_IN_KOREAN}

User message: "{message}""#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_message_and_first_flag() {
        let first = build_chat_prompt("hello", true);
        assert!(first.contains("User message: \"hello\""));
        assert!(first.contains("first message"));

        let later = build_chat_prompt("again", false);
        assert!(later.contains("without greeting"));
    }
}
