use colored::*;

use crate::models::{group::Group, task::Task, task::parse_timestamp};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the appropriate status glyph for a task
pub fn get_status_glyph(task: &Task) -> ColoredString {
    if task.completed {
        "✓".dimmed()
    } else {
        "○".normal()
    }
}

/// Parse a "#RRGGBB" color token; anything else renders uncolored
fn parse_color_token(token: &str) -> Option<(u8, u8, u8)> {
    let hex = token.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Tint text with an entity's color token
pub fn colorize(text: &str, token: &str) -> ColoredString {
    match parse_color_token(token) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// Build the context string for a task: scheduled time, tag, estimate
/// and points
pub fn get_task_context(task: &Task) -> String {
    let mut parts = vec![];

    if let Some(datetime) = parse_timestamp(&task.date) {
        parts.push(datetime.strftime("%m-%d %H:%M").to_string());
    }
    parts.push(task.tag.name.clone());
    parts.push(format!("{}m", task.time));
    parts.push(format!("{}pt", task.points));

    parts.join(" · ")
}

/// Render a single task line with id, glyph, title, and right-aligned
/// dimmed context
pub fn render_task_line(task: &Task) {
    let terminal_width = get_terminal_width();

    let glyph = get_status_glyph(task);
    let left_section = format!("  {}  {}  {}", task.id.dimmed(), glyph, task.title);

    let styled_left = if task.completed {
        left_section.dimmed()
    } else {
        left_section.normal()
    };

    let right_section = get_task_context(task);
    let left_visible_len = 2 + task.id.len() + 2 + 1 + 2 + task.title.chars().count();
    let right_visible_len = right_section.chars().count();

    let total_content = left_visible_len + right_visible_len;
    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", styled_left, " ".repeat(padding), right_section.dimmed());
    } else {
        println!("{}", styled_left);
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let task_word = if count == 1 { "task" } else { "tasks" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, task_word);
}

/// Render a group header with its completion bar
pub fn render_group_header(group: &Group, task_count: usize, progress: u32, selected: bool) {
    let marker = if selected { "▸" } else { " " };
    let fold = if group.expanded { "" } else { " [collapsed]" };
    println!(
        "{} {} {}  {} {}%{}",
        marker,
        colorize("●", &group.color),
        group.name.bold(),
        render_progress_bar(progress),
        progress,
        fold.dimmed(),
    );
    println!(
        "    {}",
        format!("{} {}", task_count, if task_count == 1 { "task" } else { "tasks" }).dimmed()
    );
}

/// Fixed-width completion bar, filled proportionally to 0..=100
pub fn render_progress_bar(progress: u32) -> String {
    const WIDTH: u32 = 20;
    let filled = (progress.min(100) * WIDTH) / 100;
    format!(
        "{}{}",
        "█".repeat(filled as usize),
        "░".repeat((WIDTH - filled) as usize)
    )
}

/// Render one bar of the daily-counts chart
pub fn render_count_bar(label: &str, count: usize, max_count: usize) {
    const WIDTH: usize = 30;
    let filled = if max_count == 0 {
        0
    } else {
        (count * WIDTH) / max_count
    };
    println!(
        "  {}  {}{} {}",
        label.dimmed(),
        "▇".repeat(filled),
        if filled == 0 { "·".dimmed().to_string() } else { String::new() },
        count
    );
}

/// Render a signed percentage with a direction arrow
pub fn render_percent_change(label: &str, change: f64) {
    let arrow = if change >= 0.0 {
        format!("▲ {:.1}%", change).green()
    } else {
        format!("▼ {:.1}%", change.abs()).red()
    };
    println!("  {}  {}", label, arrow);
}

/// Render a section separator
pub fn render_section_separator() {
    println!();
}
