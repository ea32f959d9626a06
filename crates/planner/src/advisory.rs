//! Study advice from a generative-language provider.
//!
//! One prompt per generation, built from every subject's name, strengths and
//! weaknesses. The provider's reply is returned verbatim.

use std::sync::Arc;

use learnveda_core::error::ProviderError;
use learnveda_core::message::Message;
use learnveda_core::plan::SubjectPlan;
use learnveda_core::provider::{Provider, ProviderRequest};
use tracing::debug;

/// Sends the study-strategy prompt to a provider.
#[derive(Clone)]
pub struct AdvisoryClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl AdvisoryClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Format the three parallel lists into the study-strategy prompt.
    ///
    /// Lists are written as `['Math', 'History']`.
    pub fn build_prompt(subjects: &[String], strengths: &[String], weaknesses: &[String]) -> String {
        format!(
            "Given the following subjects, strengths, and weaknesses:\n\
             Subjects: {}\n\
             Strengths: {}\n\
             Weaknesses: {}\n\
             Generate a study strategy prioritizing weak areas while maintaining strengths.",
            quoted_list(subjects),
            quoted_list(strengths),
            quoted_list(weaknesses),
        )
    }

    /// Ask the provider for a study strategy and return its text unchanged.
    pub async fn get_advisory(
        &self,
        subjects: &[String],
        strengths: &[String],
        weaknesses: &[String],
    ) -> Result<String, ProviderError> {
        let prompt = Self::build_prompt(subjects, strengths, weaknesses);

        let request = ProviderRequest {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            ..ProviderRequest::new(&self.model, Message::user(prompt))
        };

        debug!(
            provider = %self.provider.name(),
            model = %self.model,
            subjects = subjects.len(),
            "Requesting study advice"
        );

        let response = self.provider.complete(request).await?;
        Ok(response.message.content)
    }

    /// Convenience wrapper that splits subject records into the three lists.
    pub async fn advise(&self, plans: &[SubjectPlan]) -> Result<String, ProviderError> {
        let subjects: Vec<String> = plans.iter().map(|p| p.name.clone()).collect();
        let strengths: Vec<String> = plans.iter().map(|p| p.strengths.clone()).collect();
        let weaknesses: Vec<String> = plans.iter().map(|p| p.weaknesses.clone()).collect();
        self.get_advisory(&subjects, &strengths, &weaknesses).await
    }
}

/// `['a', 'b']`, each item quoted by [`quote`].
fn quoted_list(items: &[String]) -> String {
    let items: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", items.join(", "))
}

/// Single quotes, or double quotes when the text has a `'` and no `"`.
/// Backslashes, the chosen quote and control characters are escaped.
fn quote(text: &str) -> String {
    let delim = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(delim);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FailingProvider, RecordingProvider};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prompt_lists_every_input() {
        let prompt = AdvisoryClient::build_prompt(
            &strings(&["Math", "History"]),
            &strings(&["", "good with dates"]),
            &strings(&["I struggle with algebra", ""]),
        );
        assert!(prompt.starts_with("Given the following subjects, strengths, and weaknesses:"));
        assert!(prompt.contains("Subjects: ['Math', 'History']\n"));
        assert!(prompt.contains("Strengths: ['', 'good with dates']\n"));
        assert!(prompt.contains("Weaknesses: ['I struggle with algebra', '']\n"));
        assert!(prompt.ends_with("while maintaining strengths."));
    }

    #[tokio::test]
    async fn returns_reply_verbatim() {
        let provider = Arc::new(RecordingProvider::new("  Focus on algebra first.\n"));
        let client = AdvisoryClient::new(provider.clone(), "gemini-1.5-flash")
            .with_temperature(0.2)
            .with_max_tokens(256);

        let text = client
            .advise(&[SubjectPlan::new("Math", 10).with_weaknesses("struggle")])
            .await
            .unwrap();
        assert_eq!(text, "  Focus on algebra first.\n");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gemini-1.5-flash");
        assert_eq!(requests[0].max_tokens, Some(256));
        assert!((requests[0].temperature - 0.2).abs() < f32::EPSILON);
        assert!(requests[0].messages[0].content.contains("Subjects: ['Math']"));
    }

    #[test]
    fn quoting_matches_list_literals() {
        assert_eq!(quoted_list(&[]), "[]");
        assert_eq!(quote("Math"), "'Math'");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("don't panic"), r#""don't panic""#);
        assert_eq!(quote(r#"it's "hard""#), r#"'it\'s "hard"'"#);
        assert_eq!(quote("say \"hi\""), r#"'say "hi"'"#);
        assert_eq!(quote("a\\b"), r"'a\\b'");
        assert_eq!(quote("line\nbreak\ttab"), r"'line\nbreak\ttab'");
        assert_eq!(quote("\u{1}"), r"'\x01'");
        assert_eq!(quote("Géographie"), "'Géographie'");
    }

    #[tokio::test]
    async fn provider_errors_are_returned() {
        let client = AdvisoryClient::new(
            Arc::new(FailingProvider::new(ProviderError::AuthenticationFailed(
                "bad key".into(),
            ))),
            "m",
        );
        let result = client.advise(&[SubjectPlan::new("Math", 1)]).await;
        assert!(matches!(result, Err(ProviderError::AuthenticationFailed(_))));
    }

    #[test]
    fn accessors() {
        let client = AdvisoryClient::new(Arc::new(RecordingProvider::new("x")), "model-a");
        assert_eq!(client.model(), "model-a");
        assert_eq!(client.provider_name(), "recording");
    }
}
