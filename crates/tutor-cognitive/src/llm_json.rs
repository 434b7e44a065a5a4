//! Shared helper for LLM calls that must return strict JSON (spec §4.2,
//! §4.4: "rejects and retries on malformed output").

use serde::de::DeserializeOwned;
use tutor_core::{ChatMessage, CompletionOptions, LlmGateway};
use tutor_types::error::{TutorError, TutorResult};

pub struct JsonCompletionSpec {
    /// Additional attempts after the first, each with a sharper reminder to
    /// emit valid JSON only.
    pub retries: u32,
    pub max_output_tokens: u32,
}

fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Calls the gateway expecting a JSON object matching `T`, retrying up to
/// `spec.retries` times with a stricter reminder before giving up with
/// `TutorError::ProviderMalformed`.
pub async fn complete_json<T: DeserializeOwned>(
    llm: &dyn LlmGateway,
    prompt: &str,
    spec: &JsonCompletionSpec,
) -> TutorResult<T> {
    let options = CompletionOptions { max_output_tokens: spec.max_output_tokens, ..CompletionOptions::default() };
    let mut attempt = 0;
    let mut last_error: Option<TutorError> = None;
    loop {
        let messages = if attempt == 0 {
            vec![ChatMessage::system("Respond with strict JSON only, no prose."), ChatMessage::user(prompt)]
        } else {
            vec![
                ChatMessage::system(
                    "Your previous response was not valid JSON. Respond with ONLY a single JSON object, \
                     no markdown fences, no commentary.",
                ),
                ChatMessage::user(prompt),
            ]
        };

        match llm.complete(&messages, &options).await {
            Ok(raw) => match extract_json_object(&raw).and_then(|json| serde_json::from_str::<T>(json).ok()) {
                Some(parsed) => return Ok(parsed),
                None => {
                    last_error = Some(TutorError::ProviderMalformed(format!(
                        "could not parse JSON from LLM response: {raw:?}"
                    )));
                }
            },
            Err(error) => {
                if !error.retryable() {
                    return Err(error);
                }
                last_error = Some(error);
            }
        }

        attempt += 1;
        if attempt > spec.retries {
            return Err(last_error.unwrap_or_else(|| TutorError::ProviderMalformed("no response".to_string())));
        }
    }
}
