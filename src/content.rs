//! Content requesters
//!
//! Ask the generative service for material about a vocabulary item. The
//! requester owns the prompt text and the response parsing; every call goes
//! through the shared [`RequestGovernor`]. A response that cannot be parsed
//! counts as a transient failure and is retried like a network error.
//!
//! No transport ships with this crate: callers supply a [`ContentBackend`].
//! The CLI therefore does not build a governor or a requester.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::governor::{GovernorFailure, RequestGovernor, ServiceError};
use crate::review::VocabularyItem;

/// Transport to the generative service: one prompt in, raw text out
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ServiceError>;
}

#[derive(Error, Debug)]
pub enum ContentError {
    /// The item cannot be turned into a prompt; nothing was sent
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error(transparent)]
    Governor(#[from] GovernorFailure<ServiceError>),
}

impl ContentError {
    /// True when the UI should show "try again later"
    pub fn is_quota_exhausted(&self) -> bool {
        match self {
            Self::InvalidItem(_) => false,
            Self::Governor(failure) => failure.is_quota_exhausted(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;

/// Generated explanation of a term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermDescription {
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

pub struct ContentRequester<B> {
    backend: B,
    governor: RequestGovernor,
}

impl<B: ContentBackend> ContentRequester<B> {
    pub fn new(backend: B, governor: RequestGovernor) -> Self {
        Self { backend, governor }
    }

    pub fn governor(&self) -> &RequestGovernor {
        &self.governor
    }

    /// Definition, example sentence, and synonyms for a term
    pub async fn describe_term(&self, item: &VocabularyItem) -> Result<TermDescription> {
        check_item(item)?;
        let prompt = format!(
            "Describe the word \"{}\" for a language learner. Reply with JSON only: \
             {{\"definition\": string, \"example\": string, \"synonyms\": [string]}}",
            item.term
        );
        let backend = &self.backend;
        let prompt = prompt.as_str();

        let description = self
            .governor
            .execute_default(move || async move {
                backend
                    .generate(prompt)
                    .await
                    .and_then(|raw| parse_description(&raw))
            })
            .await?;

        log::debug!("Described term {}", item.term);
        Ok(description)
    }

    /// A fresh example sentence that differs from the one already stored
    pub async fn alternate_example(&self, item: &VocabularyItem) -> Result<String> {
        check_item(item)?;
        let mut prompt = format!(
            "Write one new example sentence using the word \"{}\" ({}). \
             Reply with the sentence only.",
            item.term, item.meaning
        );
        if let Some(existing) = &item.example {
            prompt.push_str(&format!(" Do not reuse this sentence: \"{}\"", existing));
        }
        let backend = &self.backend;
        let prompt = prompt.as_str();

        let example = self
            .governor
            .execute_default(move || async move {
                backend
                    .generate(prompt)
                    .await
                    .and_then(|raw| parse_sentence(&raw))
            })
            .await?;

        Ok(example)
    }
}

fn check_item(item: &VocabularyItem) -> Result<()> {
    if item.term.trim().is_empty() {
        return Err(ContentError::InvalidItem(format!("item {} has an empty term", item.id)));
    }
    Ok(())
}

/// Strip a Markdown code fence the model may wrap around JSON
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_description(raw: &str) -> std::result::Result<TermDescription, ServiceError> {
    let description: TermDescription = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| ServiceError::transient(format!("malformed description: {}", e)))?;
    if description.definition.trim().is_empty() {
        return Err(ServiceError::transient("description has an empty definition"));
    }
    Ok(description)
}

fn parse_sentence(raw: &str) -> std::result::Result<String, ServiceError> {
    let sentence = raw.trim().trim_matches('"').trim();
    if sentence.is_empty() {
        return Err(ServiceError::transient("empty example sentence"));
    }
    Ok(sentence.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GovernorConfig;
    use std::sync::Mutex;

    /// Replays canned responses in order
    struct ScriptedBackend {
        responses: Mutex<Vec<std::result::Result<String, ServiceError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(mut responses: Vec<std::result::Result<String, ServiceError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ContentBackend for ScriptedBackend {
        async fn generate(&self, prompt: &str) -> std::result::Result<String, ServiceError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(ServiceError::transient("script exhausted")))
        }
    }

    fn requester(responses: Vec<std::result::Result<String, ServiceError>>) -> ContentRequester<ScriptedBackend> {
        let config = GovernorConfig {
            cooldown_secs: 60,
            max_retries: 2,
            initial_delay_ms: 100,
        };
        ContentRequester::new(
            ScriptedBackend::new(responses),
            RequestGovernor::from_config("content", &config),
        )
    }

    fn item() -> VocabularyItem {
        let mut item = VocabularyItem::new("serendipity".into(), "happy accident".into());
        item.example = Some("Finding the book was pure serendipity.".into());
        item
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_describe_term_parses_fenced_json() {
        let requester = requester(vec![Ok(
            "```json\n{\"definition\":\"a fortunate discovery\",\"synonyms\":[\"luck\"]}\n```".into(),
        )]);

        let description = requester.describe_term(&item()).await.unwrap();
        assert_eq!(description.definition, "a fortunate discovery");
        assert_eq!(description.synonyms, vec!["luck".to_string()]);
        assert!(description.example.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_response_is_retried() {
        let requester = requester(vec![
            Ok("Sure! Here is the description.".into()),
            Ok("{\"definition\":\"chance luck\"}".into()),
        ]);

        let description = requester.describe_term(&item()).await.unwrap();
        assert_eq!(description.definition, "chance luck");
        assert_eq!(requester.backend.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_alternate_example_avoids_existing() {
        let requester = requester(vec![Ok("\"By serendipity, we met again.\"\n".into())]);

        let example = requester.alternate_example(&item()).await.unwrap();
        assert_eq!(example, "By serendipity, we met again.");
        let prompts = requester.backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Do not reuse"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_term_is_rejected_before_sending() {
        let requester = requester(vec![Ok("{\"definition\":\"unused\"}".into())]);
        let blank = VocabularyItem::new("   ".into(), "nothing".into());

        let error = requester.describe_term(&blank).await.unwrap_err();
        assert!(matches!(error, ContentError::InvalidItem(_)));
        assert!(!error.is_quota_exhausted());

        let error = requester.alternate_example(&blank).await.unwrap_err();
        assert!(matches!(error, ContentError::InvalidItem(_)));

        assert_eq!(requester.backend.calls(), 0);
        assert!(!requester.governor().is_cooling_down());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_exhaustion_blocks_later_requests() {
        let requester = requester(vec![Err(ServiceError::new(
            Some(429),
            "RESOURCE_EXHAUSTED: quota exceeded",
        ))]);

        let first = requester.describe_term(&item()).await.unwrap_err();
        assert!(first.is_quota_exhausted());
        assert!(requester.governor().is_cooling_down());

        let second = requester.alternate_example(&item()).await.unwrap_err();
        assert!(matches!(
            second,
            ContentError::Governor(GovernorFailure::QuotaExhausted { .. })
        ));
        assert_eq!(requester.backend.calls(), 1);
    }
}
