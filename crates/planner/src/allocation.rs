//! Time and chapter allocation.
//!
//! Pure and deterministic: the same subjects and constraints always produce
//! the same [`Timetable`]. No I/O happens here.
//!
//! Hours are split in proportion to chapter counts, then nudged per subject:
//! a weakness mentioning "struggle" gets 20% more time, a strength mentioning
//! "good" gets 20% less. The nudges are not renormalized unless
//! [`AllocationOptions::renormalize_hours`] is set, so the scheduled total can
//! drift away from `total_days * daily_hours`.

use learnveda_core::error::PlanError;
use learnveda_core::plan::{
    ChapterRange, DayPlan, DaySchedule, FocusLabel, ScheduleConstraints, SubjectDay, SubjectPlan,
    Timetable,
};

/// Weakness keyword that flags a subject for extra time.
pub const STRUGGLE_KEYWORD: &str = "struggle";
/// Strength keyword that lets a subject give up some time.
pub const STRENGTH_KEYWORD: &str = "good";

const STRUGGLE_FACTOR: f64 = 1.2;
const STRENGTH_FACTOR: f64 = 0.8;

/// Largest schedule accepted unless configured otherwise.
pub const DEFAULT_MAX_DAYS: u32 = 366;
/// Most subjects accepted unless configured otherwise.
pub const DEFAULT_MAX_SUBJECTS: usize = 50;

/// Switches and limits for the allocation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationOptions {
    /// Rescale adjusted hours so they sum to the available total.
    pub renormalize_hours: bool,
    /// Upper bound on `total_days`; the timetable holds one entry per day.
    pub max_days: u32,
    /// Upper bound on the number of subjects.
    pub max_subjects: usize,
}

impl Default for AllocationOptions {
    fn default() -> Self {
        Self {
            renormalize_hours: false,
            max_days: DEFAULT_MAX_DAYS,
            max_subjects: DEFAULT_MAX_SUBJECTS,
        }
    }
}

/// Whether the student reports struggling with this subject.
pub fn struggles(subject: &SubjectPlan) -> bool {
    subject.weaknesses.to_lowercase().contains(STRUGGLE_KEYWORD)
}

/// Whether the student reports being good at this subject.
pub fn reports_strength(subject: &SubjectPlan) -> bool {
    subject.strengths.to_lowercase().contains(STRENGTH_KEYWORD)
}

/// The focus label for a subject; only the weakness keyword decides it.
pub fn focus_for(subject: &SubjectPlan) -> FocusLabel {
    if struggles(subject) {
        FocusLabel::WeakAreas
    } else {
        FocusLabel::StrongAreas
    }
}

/// Reject inputs the allocation formula cannot handle.
///
/// Runs before anything is allocated, so oversized requests are refused
/// without building any part of the timetable.
pub fn validate(
    subjects: &[SubjectPlan],
    constraints: &ScheduleConstraints,
    options: AllocationOptions,
) -> Result<(), PlanError> {
    if subjects.is_empty() {
        return Err(PlanError::NoSubjects);
    }
    if subjects.len() > options.max_subjects {
        return Err(PlanError::TooManySubjects {
            count: subjects.len(),
            max: options.max_subjects,
        });
    }
    if constraints.total_days == 0 {
        return Err(PlanError::NoDays);
    }
    if constraints.total_days > options.max_days {
        return Err(PlanError::TooManyDays {
            days: constraints.total_days,
            max: options.max_days,
        });
    }
    if !(constraints.daily_hours.is_finite() && constraints.daily_hours > 0.0) {
        return Err(PlanError::InvalidDailyHours(constraints.daily_hours));
    }
    if let Some(subject) = subjects.iter().find(|s| s.chapter_count == 0) {
        return Err(PlanError::NoChapters {
            subject: subject.name.clone(),
        });
    }
    Ok(())
}

/// Total hours per subject over the whole schedule, after the keyword nudges.
///
/// Inputs must already be validated.
pub fn subject_hours(
    subjects: &[SubjectPlan],
    constraints: &ScheduleConstraints,
    options: AllocationOptions,
) -> Vec<f64> {
    let total_hours = constraints.total_hours();
    let total_chapters: f64 = subjects.iter().map(|s| f64::from(s.chapter_count)).sum();

    let mut hours: Vec<f64> = subjects
        .iter()
        .map(|s| {
            let mut h = (f64::from(s.chapter_count) / total_chapters) * total_hours;
            if struggles(s) {
                h *= STRUGGLE_FACTOR;
            }
            if reports_strength(s) {
                h *= STRENGTH_FACTOR;
            }
            h
        })
        .collect();

    if options.renormalize_hours {
        let adjusted: f64 = hours.iter().sum();
        if adjusted > 0.0 {
            let scale = total_hours / adjusted;
            hours.iter_mut().for_each(|h| *h *= scale);
        }
    }

    hours
}

/// Chapters of a subject that fall on 1-based `day`.
///
/// Equivalent to `floor((day-1) * rate) + 1 ..= floor(day * rate)` with
/// `rate = chapter_count / total_days`, computed exactly in integers.
pub fn chapter_range(chapter_count: u32, total_days: u32, day: u32) -> ChapterRange {
    let chapters = u64::from(chapter_count);
    let days = u64::from(total_days);
    let day = u64::from(day);
    let start = (day - 1) * chapters / days + 1;
    let end = day * chapters / days;
    // Both bounds are at most chapter_count + 1, so they fit back in u32.
    ChapterRange::new(start as u32, end as u32)
}

/// Round to two decimal places, ties to even.
///
/// The tie is decided on the exact binary value of `hours`, not on the
/// already-rounded product `hours * 100`: 0.125 is a true tie and gives 0.12,
/// while 2.675 is stored slightly below the tie and gives 2.67.
pub fn round_hours(hours: f64) -> f64 {
    let lower = (hours * 100.0).floor();
    // Fused multiply-add rounds once, so the sign of the distance to the
    // midpoint is exact.
    let distance = hours.mul_add(100.0, -(lower + 0.5));
    let cents = if distance > 0.0 {
        lower + 1.0
    } else if distance < 0.0 {
        lower
    } else if lower % 2.0 == 0.0 {
        lower
    } else {
        lower + 1.0
    };
    cents / 100.0
}

/// Build the full timetable.
pub fn allocate(
    subjects: &[SubjectPlan],
    constraints: &ScheduleConstraints,
    options: AllocationOptions,
) -> Result<Timetable, PlanError> {
    validate(subjects, constraints, options)?;

    let total_days = constraints.total_days;
    let per_day: Vec<(f64, FocusLabel)> = subject_hours(subjects, constraints, options)
        .into_iter()
        .zip(subjects)
        .map(|(hours, s)| (round_hours(hours / f64::from(total_days)), focus_for(s)))
        .collect();

    let days = (1..=total_days)
        .map(|day| DaySchedule {
            day,
            subjects: subjects
                .iter()
                .zip(&per_day)
                .map(|(s, &(hours, focus))| SubjectDay {
                    subject: s.name.clone(),
                    plan: DayPlan {
                        chapters: chapter_range(s.chapter_count, total_days, day),
                        hours,
                        focus,
                    },
                })
                .collect(),
        })
        .collect();

    Ok(Timetable { days })
}
