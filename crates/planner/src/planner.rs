//! The generate action: allocation plus one advisory request.

use std::sync::Arc;

use learnveda_config::{AppConfig, DEFAULT_FALLBACK_ADVICE};
use learnveda_core::error::{Error, PlanError};
use learnveda_core::plan::{AdvisoryStatus, PlanRequest, ScheduleConstraints, StudyPlan, SubjectPlan};
use learnveda_core::provider::Provider;
use tracing::{info, warn};

use crate::advisory::AdvisoryClient;
use crate::allocation::{self, AllocationOptions};

/// Produces a [`StudyPlan`] for each generate action.
///
/// Holds no per-run state, so one instance can serve any number of runs.
#[derive(Clone)]
pub struct Planner {
    advisor: AdvisoryClient,
    options: AllocationOptions,
    fallback_advice: String,
}

impl Planner {
    pub fn new(advisor: AdvisoryClient) -> Self {
        Self {
            advisor,
            options: AllocationOptions::default(),
            fallback_advice: DEFAULT_FALLBACK_ADVICE.into(),
        }
    }

    /// Build the planner from configuration.
    ///
    /// Only the default provider is built. Fails with a configuration error
    /// when it cannot be set up.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let provider = learnveda_providers::build_default_provider(config)?;
        Ok(Self::with_provider(provider, config))
    }

    /// Build the planner around an existing provider, taking the rest of the
    /// settings from configuration.
    pub fn with_provider(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        let advisor = AdvisoryClient::new(provider, config.model_for(&config.default_provider))
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens);

        Self::new(advisor)
            .with_options(AllocationOptions {
                renormalize_hours: config.planner.renormalize_hours,
                max_days: config.planner.max_days,
                max_subjects: config.planner.max_subjects as usize,
            })
            .with_fallback_advice(config.planner.fallback_advice.clone())
    }

    pub fn with_options(mut self, options: AllocationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_fallback_advice(mut self, text: impl Into<String>) -> Self {
        self.fallback_advice = text.into();
        self
    }

    pub fn advisor(&self) -> &AdvisoryClient {
        &self.advisor
    }

    pub fn options(&self) -> AllocationOptions {
        self.options
    }

    /// Build the timetable and fetch study advice.
    ///
    /// Invalid input is rejected before the provider is contacted. A failed
    /// advice request is logged and replaced by the fallback text; the
    /// timetable is returned either way.
    pub async fn generate_timetable(
        &self,
        subjects: &[SubjectPlan],
        constraints: ScheduleConstraints,
    ) -> Result<StudyPlan, PlanError> {
        let timetable = allocation::allocate(subjects, &constraints, self.options)?;

        info!(
            subjects = subjects.len(),
            days = constraints.total_days,
            daily_hours = constraints.daily_hours,
            scheduled_hours = timetable.total_hours(),
            "Timetable allocated"
        );

        let (advisory_text, advisory) = match self.advisor.advise(subjects).await {
            Ok(text) => (
                text,
                AdvisoryStatus::Generated {
                    model: self.advisor.model().to_string(),
                },
            ),
            Err(e) => {
                warn!(
                    provider = %self.advisor.provider_name(),
                    error = %e,
                    "Study advice unavailable, using fallback text"
                );
                (
                    self.fallback_advice.clone(),
                    AdvisoryStatus::Fallback {
                        reason: e.to_string(),
                    },
                )
            }
        };

        Ok(StudyPlan {
            timetable,
            advisory_text,
            advisory,
        })
    }

    /// [`Planner::generate_timetable`] for a bundled request.
    pub async fn generate(&self, request: &PlanRequest) -> Result<StudyPlan, PlanError> {
        self.generate_timetable(&request.subjects, request.constraints())
            .await
    }
}
