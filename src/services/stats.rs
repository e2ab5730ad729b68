//! Read-only statistics over a snapshot of the task collection.
//!
//! Everything here is a pure function: no mutation, no storage, and no
//! hidden wall-clock reads. Functions anchored on "today" take the
//! anchor date explicitly.

use jiff::Span;
use jiff::civil::Date;

use crate::models::task::Task;

fn completion_rate(tasks: impl Iterator<Item = bool>) -> u32 {
    let mut total = 0u32;
    let mut completed = 0u32;
    for is_completed in tasks {
        total += 1;
        if is_completed {
            completed += 1;
        }
    }
    if total == 0 {
        return 0;
    }
    (100.0 * f64::from(completed) / f64::from(total)).round() as u32
}

/// Percentage of completed tasks in a group, 0..=100. A group with no
/// tasks reports 0.
pub fn group_progress(tasks: &[Task], group_id: &str) -> u32 {
    completion_rate(
        tasks
            .iter()
            .filter(|task| task.group_id == group_id)
            .map(|task| task.completed),
    )
}

/// Same formula scoped by the embedded tag snapshot's id.
pub fn tag_completion_rate(tasks: &[Task], tag_id: &str) -> u32 {
    completion_rate(
        tasks
            .iter()
            .filter(|task| task.tag.id == tag_id)
            .map(|task| task.completed),
    )
}

/// Task count per calendar day for the last `days` days ending at
/// `today`, oldest first. Labels are "MM-DD".
pub fn daily_counts(tasks: &[Task], today: Date, days: usize) -> Vec<(String, usize)> {
    let mut counts = Vec::with_capacity(days);

    for offset in (0..days as i64).rev() {
        let Ok(day) = today.checked_sub(Span::new().days(offset)) else {
            continue;
        };
        let count = tasks
            .iter()
            .filter(|task| task.scheduled_day() == Some(day))
            .count();
        counts.push((day.strftime("%m-%d").to_string(), count));
    }

    counts
}

/// Percentage change of task volume between the last 7 calendar days
/// (including `today`) and the 7 days before that. 0.0 when the
/// previous window is empty.
pub fn week_over_week_change(tasks: &[Task], today: Date) -> f64 {
    let mut this_window = 0u32;
    let mut previous_window = 0u32;

    for task in tasks {
        let Some(day) = task.scheduled_day() else {
            continue;
        };
        let Ok(span) = day.until(today) else {
            continue;
        };
        match span.get_days() {
            0..=6 => this_window += 1,
            7..=13 => previous_window += 1,
            _ => {}
        }
    }

    if previous_window == 0 {
        return 0.0;
    }
    (f64::from(this_window) - f64::from(previous_window)) / f64::from(previous_window) * 100.0
}

pub struct PointsSummary {
    pub total: u32,
    pub completed: u32,
}

/// Total points across all tasks and the share already earned.
pub fn points_summary(tasks: &[Task]) -> PointsSummary {
    PointsSummary {
        total: tasks.iter().map(|task| task.points).sum(),
        completed: tasks
            .iter()
            .filter(|task| task.completed)
            .map(|task| task.points)
            .sum(),
    }
}

/// (completed, pending) counts over the whole collection.
pub fn status_counts(tasks: &[Task]) -> (usize, usize) {
    let completed = tasks.iter().filter(|task| task.completed).count();
    (completed, tasks.len() - completed)
}
