//! Interactive study form on the terminal.
//!
//! Asks for the number of subjects, then each subject's name, chapter count,
//! strengths and weaknesses, then the days and hours available. A blank
//! answer takes the default shown in brackets; numbers that do not parse, are
//! not positive, or exceed the configured limits are asked again.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use learnveda_config::PlannerConfig;
use learnveda_core::plan::{PlanRequest, SubjectPlan};

pub struct Form<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Form<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Walk through the whole form and return the filled-in request.
    pub fn read_request(&mut self, defaults: &PlannerConfig) -> io::Result<PlanRequest> {
        let count = self.ask_count(
            "Number of Subjects",
            defaults.default_subjects,
            defaults.max_subjects,
        )?;

        let mut subjects = Vec::new();
        for i in 1..=count {
            writeln!(self.output)?;
            let fallback_name = format!("Subject {i}");
            let name = self.ask_text(&format!("Name of Subject {i}"), Some(&fallback_name))?;
            let chapters = self.ask_count(
                &format!("Number of Chapters for {name}"),
                defaults.default_chapters,
                u32::MAX,
            )?;
            let strengths = self.ask_text(&format!("Your Strengths in {name}"), None)?;
            let weaknesses = self.ask_text(&format!("Your Weaknesses in {name}"), None)?;

            subjects.push(
                SubjectPlan::new(name, chapters)
                    .with_strengths(strengths)
                    .with_weaknesses(weaknesses),
            );
        }

        writeln!(self.output)?;
        let total_days = self.ask_count(
            "Total Days Available",
            defaults.default_days,
            defaults.max_days,
        )?;
        let daily_hours = self.ask_number(
            "Daily Study Hours",
            defaults.default_daily_hours,
            |h: f64| h.is_finite() && h > 0.0,
            "a positive number",
        )?;

        Ok(PlanRequest {
            subjects,
            total_days,
            daily_hours,
        })
    }

    fn ask_count(&mut self, label: &str, default: u32, max: u32) -> io::Result<u32> {
        let expected = if max == u32::MAX {
            "a whole number of at least 1".to_string()
        } else {
            format!("a whole number from 1 to {max}")
        };
        self.ask_number(label, default, |n: u32| (1..=max).contains(&n), &expected)
    }

    fn ask_number<T>(
        &mut self,
        label: &str,
        default: T,
        is_valid: impl Fn(T) -> bool,
        expected: &str,
    ) -> io::Result<T>
    where
        T: FromStr + Display + Copy,
    {
        loop {
            let answer = self.ask(&format!("{label} [{default}]"))?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<T>() {
                Ok(value) if is_valid(value) => return Ok(value),
                _ => writeln!(self.output, "  Please enter {expected}.")?,
            }
        }
    }

    fn ask_text(&mut self, label: &str, default: Option<&str>) -> io::Result<String> {
        let prompt = match default {
            Some(d) => format!("{label} [{d}]"),
            None => label.to_string(),
        };
        let answer = self.ask(&prompt)?;
        Ok(match default {
            Some(d) if answer.is_empty() => d.to_string(),
            _ => answer,
        })
    }

    /// Print the prompt and read one trimmed line. End of input is an error so
    /// a closed stdin cannot loop forever on a re-asked question.
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before the form was complete",
            ));
        }
        Ok(line.trim().to_string())
    }
}
