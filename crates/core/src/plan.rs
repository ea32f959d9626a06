//! Study plan domain types.
//!
//! Inputs flow in as [`SubjectPlan`]s plus one [`ScheduleConstraints`]; the
//! planner turns them into a [`Timetable`] (one [`DayPlan`] per day and
//! subject) and wraps it with the advisory text in a [`StudyPlan`].
//! Nothing here is persisted: every generation rebuilds the whole timetable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One subject as entered by the student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPlan {
    /// Subject name, used as the row label in the timetable
    pub name: String,

    /// Number of chapters to cover (at least 1)
    #[serde(alias = "chapters")]
    pub chapter_count: u32,

    /// Free-text self-assessment of strengths
    #[serde(default)]
    pub strengths: String,

    /// Free-text self-assessment of weaknesses
    #[serde(default)]
    pub weaknesses: String,
}

impl SubjectPlan {
    /// Create a subject with empty strength/weakness notes.
    pub fn new(name: impl Into<String>, chapter_count: u32) -> Self {
        Self {
            name: name.into(),
            chapter_count,
            strengths: String::new(),
            weaknesses: String::new(),
        }
    }

    pub fn with_strengths(mut self, strengths: impl Into<String>) -> Self {
        self.strengths = strengths.into();
        self
    }

    pub fn with_weaknesses(mut self, weaknesses: impl Into<String>) -> Self {
        self.weaknesses = weaknesses.into();
        self
    }
}

/// How much time the student has.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConstraints {
    /// Number of study days (at least 1)
    pub total_days: u32,

    /// Study hours available per day (positive)
    pub daily_hours: f64,
}

impl ScheduleConstraints {
    pub fn new(total_days: u32, daily_hours: f64) -> Self {
        Self {
            total_days,
            daily_hours,
        }
    }

    /// Total hours available over the whole schedule.
    pub fn total_hours(&self) -> f64 {
        f64::from(self.total_days) * self.daily_hours
    }
}

/// One generation request: the subjects plus the schedule constraints.
///
/// This is the shape of plan files and of the gateway's request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub subjects: Vec<SubjectPlan>,
    pub total_days: u32,
    pub daily_hours: f64,
}

impl PlanRequest {
    pub fn constraints(&self) -> ScheduleConstraints {
        ScheduleConstraints::new(self.total_days, self.daily_hours)
    }
}

/// Inclusive span of chapters assigned to one subject on one day.
///
/// A subject with fewer chapters than days gets some empty ranges, where
/// `end < start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRange {
    pub start: u32,
    pub end: u32,
}

impl ChapterRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether no chapter falls on this day.
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Number of chapters in the range.
    pub fn len(&self) -> u32 {
        self.end.saturating_add(1).saturating_sub(self.start)
    }
}

impl fmt::Display for ChapterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Which side of the student's self-assessment a day's session targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusLabel {
    #[serde(rename = "Weak Areas")]
    WeakAreas,
    #[serde(rename = "Strong Areas")]
    StrongAreas,
}

impl FocusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeakAreas => "Weak Areas",
            Self::StrongAreas => "Strong Areas",
        }
    }
}

impl fmt::Display for FocusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The allocation for one subject on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub chapters: ChapterRange,
    /// Hours for this subject on this day, rounded to two decimals
    pub hours: f64,
    pub focus: FocusLabel,
}

/// A subject's row within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectDay {
    pub subject: String,
    #[serde(flatten)]
    pub plan: DayPlan,
}

/// Every subject's plan for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// 1-based day index
    pub day: u32,
    /// Subjects in input order
    pub subjects: Vec<SubjectDay>,
}

impl DaySchedule {
    /// Heading used when rendering, e.g. "Day 3".
    pub fn label(&self) -> String {
        format!("Day {}", self.day)
    }

    /// Look up a subject's plan for this day (first match by name).
    pub fn get(&self, subject: &str) -> Option<&DayPlan> {
        self.subjects
            .iter()
            .find(|s| s.subject == subject)
            .map(|s| &s.plan)
    }

    /// Hours scheduled across all subjects on this day.
    pub fn total_hours(&self) -> f64 {
        self.subjects.iter().map(|s| s.plan.hours).sum()
    }
}

/// The full per-day plan, ordered by day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Timetable {
    pub days: Vec<DaySchedule>,
}

impl Timetable {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The schedule for a 1-based day index.
    pub fn day(&self, day: u32) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Total hours scheduled over all days and subjects.
    pub fn total_hours(&self) -> f64 {
        self.days.iter().map(DaySchedule::total_hours).sum()
    }

    /// Per-day plans for one subject, in day order.
    pub fn subject_days<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a DayPlan> + 'a {
        self.days.iter().filter_map(move |d| d.get(subject))
    }

    /// Number of chapters of `subject` covered over the whole schedule.
    pub fn chapters_covered(&self, subject: &str) -> u32 {
        self.subject_days(subject).map(|p| p.chapters.len()).sum()
    }
}

/// Whether the advisory text came from the model or is the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdvisoryStatus {
    /// The model answered
    Generated { model: String },
    /// The request failed and the fallback text was used
    Fallback { reason: String },
}

impl AdvisoryStatus {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// The result of one generation: the timetable plus the advisory text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub timetable: Timetable,
    pub advisory_text: String,
    pub advisory: AdvisoryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_day() -> DaySchedule {
        DaySchedule {
            day: 2,
            subjects: vec![
                SubjectDay {
                    subject: "Math".into(),
                    plan: DayPlan {
                        chapters: ChapterRange::new(6, 10),
                        hours: 4.8,
                        focus: FocusLabel::WeakAreas,
                    },
                },
                SubjectDay {
                    subject: "History".into(),
                    plan: DayPlan {
                        chapters: ChapterRange::new(3, 4),
                        hours: 1.25,
                        focus: FocusLabel::StrongAreas,
                    },
                },
            ],
        }
    }

    #[test]
    fn chapter_range_display_and_len() {
        let range = ChapterRange::new(6, 10);
        assert_eq!(range.to_string(), "6 - 10");
        assert_eq!(range.len(), 5);
        assert!(!range.is_empty());
    }

    #[test]
    fn empty_chapter_range() {
        let range = ChapterRange::new(1, 0);
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(range.to_string(), "1 - 0");
    }

    #[test]
    fn focus_label_serializes_as_display_text() {
        let json = serde_json::to_string(&FocusLabel::WeakAreas).unwrap();
        assert_eq!(json, "\"Weak Areas\"");
        let parsed: FocusLabel = serde_json::from_str("\"Strong Areas\"").unwrap();
        assert_eq!(parsed, FocusLabel::StrongAreas);
    }

    #[test]
    fn subject_plan_accepts_chapters_alias_and_defaults() {
        let json = r#"{"name": "Biology", "chapters": 12}"#;
        let subject: SubjectPlan = serde_json::from_str(json).unwrap();
        assert_eq!(subject.chapter_count, 12);
        assert!(subject.strengths.is_empty());
        assert!(subject.weaknesses.is_empty());
    }

    #[test]
    fn plan_request_from_toml() {
        let toml_str = r#"
total_days = 4
daily_hours = 3.5

[[subjects]]
name = "Math"
chapters = 10
weaknesses = "I struggle with algebra"

[[subjects]]
name = "History"
chapter_count = 8
strengths = "Good memory for dates"
"#;
        let request: PlanRequest = toml::from_str(toml_str).unwrap();
        assert_eq!(request.subjects.len(), 2);
        assert_eq!(request.subjects[1].chapter_count, 8);
        let constraints = request.constraints();
        assert_eq!(constraints.total_days, 4);
        assert!((constraints.total_hours() - 14.0).abs() < 1e-9);
    }

    #[test]
    fn day_schedule_lookup() {
        let day = sample_day();
        assert_eq!(day.label(), "Day 2");
        assert_eq!(day.get("Math").unwrap().chapters.start, 6);
        assert!(day.get("Chemistry").is_none());
        assert!((day.total_hours() - 6.05).abs() < 1e-9);
    }

    #[test]
    fn subject_day_flattens_plan() {
        let day = sample_day();
        let json = serde_json::to_value(&day.subjects[0]).unwrap();
        assert_eq!(json["subject"], "Math");
        assert_eq!(json["focus"], "Weak Areas");
        assert_eq!(json["chapters"]["start"], 6);
    }

    #[test]
    fn timetable_aggregates() {
        let mut first = sample_day();
        first.day = 1;
        first.subjects[0].plan.chapters = ChapterRange::new(1, 5);
        first.subjects[1].plan.chapters = ChapterRange::new(1, 2);
        let timetable = Timetable {
            days: vec![first, sample_day()],
        };
        assert_eq!(timetable.len(), 2);
        assert_eq!(timetable.chapters_covered("Math"), 10);
        assert_eq!(timetable.chapters_covered("History"), 4);
        assert!((timetable.total_hours() - 12.1).abs() < 1e-9);
        assert_eq!(timetable.day(2).unwrap().label(), "Day 2");
        assert!(timetable.day(3).is_none());
    }

    #[test]
    fn advisory_status_is_tagged() {
        let status = AdvisoryStatus::Fallback {
            reason: "Network error: refused".into(),
        };
        assert!(status.is_fallback());
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "fallback");
        assert_eq!(json["reason"], "Network error: refused");
    }
}
