//! Plain-text rendering of a study plan for terminals.

use learnveda_core::plan::{AdvisoryStatus, DaySchedule, StudyPlan};
use std::fmt::Write;

const HEADERS: [&str; 4] = ["Subject", "Chapters", "Hours", "Focus"];

/// Render the advice block followed by one table per day.
pub fn render_text(plan: &StudyPlan) -> String {
    let mut out = String::new();

    heading(&mut out, "Personalized Study Recommendations");
    out.push_str(plan.advisory_text.trim_end());
    out.push('\n');
    if let AdvisoryStatus::Fallback { reason } = &plan.advisory {
        let _ = writeln!(out, "\nNote: study advice could not be generated ({reason}).");
    }
    out.push('\n');

    heading(&mut out, "Your Study Timetable");
    for day in &plan.timetable.days {
        let _ = writeln!(out, "{}", day.label());
        out.push_str(&render_day(day));
        out.push('\n');
    }

    out
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    out.push('\n');
}

/// Render one day as a boxed table.
pub fn render_day(day: &DaySchedule) -> String {
    let rows: Vec<[String; 4]> = day
        .subjects
        .iter()
        .map(|s| {
            let chapters = if s.plan.chapters.is_empty() {
                "none".to_string()
            } else {
                s.plan.chapters.to_string()
            };
            [
                s.subject.clone(),
                chapters,
                format!("{:.2}", s.plan.hours),
                s.plan.focus.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    border(&mut out, &widths, '┌', '┬', '┐');
    line(&mut out, &widths, &HEADERS.map(String::from));
    border(&mut out, &widths, '├', '┼', '┤');
    for row in &rows {
        line(&mut out, &widths, row);
    }
    border(&mut out, &widths, '└', '┴', '┘');
    out
}

fn border(out: &mut String, widths: &[usize; 4], left: char, mid: char, right: char) {
    out.push(left);
    for (i, width) in widths.iter().enumerate() {
        out.push_str(&"─".repeat(width + 2));
        out.push(if i + 1 == widths.len() { right } else { mid });
    }
    out.push('\n');
}

fn line(out: &mut String, widths: &[usize; 4], cells: &[String; 4]) {
    out.push('│');
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - cell.chars().count();
        let _ = write!(out, " {cell}{} │", " ".repeat(pad));
    }
    out.push('\n');
}
