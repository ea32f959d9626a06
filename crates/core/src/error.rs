//! Error types for the LearnVeda domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all LearnVeda operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Advisory provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Plan input errors ---
    #[error("Invalid plan: {0}")]
    Plan(#[from] PlanError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// --- Bounded context errors ---

/// A failed request to the generative-language service.
///
/// The planner recovers from every variant by substituting the fallback
/// advice; none of them abort a timetable generation.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// A generation request that violates the planner's preconditions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("at least one subject is required")]
    NoSubjects,

    #[error("subject '{subject}' must have at least one chapter")]
    NoChapters { subject: String },

    #[error("total days must be at least 1")]
    NoDays,

    #[error("daily hours must be a positive number, got {0}")]
    InvalidDailyHours(f64),

    #[error("{count} subjects requested, at most {max} allowed")]
    TooManySubjects { count: usize, max: usize },

    #[error("{days} days requested, at most {max} allowed")]
    TooManyDays { days: u32, max: u32 },
}
