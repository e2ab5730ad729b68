use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;

use crate::{
    models::store::Store,
    services::{
        groups::{
            AddGroupError, AddGroupParameters, DeleteGroupError, SelectGroupError,
            ToggleGroupError, add_group, delete_group, select_group, toggle_group_expanded,
        },
        schedule::{DropTarget, MoveTaskError, MoveTaskParameters, move_task},
        stats,
        tags::{AddTagError, AddTagParameters, DeleteTagError, add_tag, delete_tag},
        tasks::{
            AddTaskError, AddTaskParameters, DeleteTaskError, EditTaskError, EditTaskParameters,
            ToggleTaskError, add_task, delete_task, edit_task, toggle_task,
        },
    },
    storage::{Storage, json::JsonFileStorage},
};

mod models;
mod services;
mod storage;
mod ui;

#[derive(Parser)]
#[command(
    name = "tablo",
    about = "A task board with groups, tags and calendar scheduling"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the full board (all groups and their tasks)
    Board,

    /// Show tasks in the selected group
    List,

    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Tag name (defaults to the first tag)
        #[arg(short, long)]
        tag: Option<String>,

        /// Group name (defaults to the selected group)
        #[arg(short, long)]
        group: Option<String>,

        /// Schedule timestamp, e.g. "2025-03-01T09:00:00" or "2025-03-01"
        /// (defaults to now)
        #[arg(short, long)]
        date: Option<String>,

        /// Estimated minutes
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        time: u32,

        /// Point value
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        points: u32,
    },

    /// Toggle a task between pending and completed
    Toggle {
        /// Task id
        task_id: String,
    },

    /// Edit fields of an existing task
    Edit {
        /// Task id
        task_id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New tag name (re-snapshots the tag)
        #[arg(short, long)]
        tag: Option<String>,

        /// New group name
        #[arg(short, long)]
        group: Option<String>,

        /// New schedule timestamp
        #[arg(short, long)]
        date: Option<String>,

        /// New estimate in minutes
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        time: Option<u32>,

        /// New point value
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        points: Option<u32>,
    },

    /// Delete a task
    Rm {
        /// Task id
        task_id: String,
    },

    /// Move a task to a calendar slot (day + hour)
    Move {
        /// Task id
        task_id: String,

        /// Target date, e.g. "2025-03-01"
        date: Option<String>,

        /// Target hour of day, 0-23
        hour: Option<i8>,

        /// Composite slot key "{date}-{hour}" as emitted by the calendar
        /// views, e.g. "2025-03-01-14"
        #[arg(long, conflicts_with_all = ["date", "hour"])]
        slot: Option<String>,
    },

    /// Manage tags
    #[command(subcommand)]
    Tag(TagCommands),

    /// Manage groups
    #[command(subcommand)]
    Group(GroupCommands),

    /// Show completion and scheduling statistics
    Stats {
        /// Number of trailing days in the daily chart
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,
    },
}

#[derive(Debug, Subcommand)]
enum TagCommands {
    /// Create a new tag
    Add {
        name: String,

        /// Display color token, e.g. "#5252FF"
        #[arg(short, long, default_value = "#5252FF")]
        color: String,
    },
    /// Delete a tag (refused while tasks still use it)
    Rm { tag_id: String },
    /// List all tags
    List,
}

#[derive(Debug, Subcommand)]
enum GroupCommands {
    /// Create a new group
    Add {
        name: String,

        /// Display color token, e.g. "#5252FF"
        #[arg(short, long, default_value = "#5252FF")]
        color: String,
    },
    /// Delete a group (refused while it still contains tasks)
    Rm { group_id: String },
    /// Select the group shown by `list`
    Select { group_id: String },
    /// Collapse or expand a group on the board
    Toggle { group_id: String },
    /// List all groups
    List,
}

fn render_board(store: &Store) {
    if store.groups.is_empty() {
        println!("No groups");
        return;
    }

    ui::render_view_header("BOARD", store.tasks.len());

    for group in &store.groups {
        let group_tasks: Vec<_> = store.tasks_in_group(&group.id).collect();
        let progress = stats::group_progress(&store.tasks, &group.id);
        let selected = store.selected_group_id.as_deref() == Some(group.id.as_str());

        ui::render_group_header(group, group_tasks.len(), progress, selected);

        if group.expanded {
            for task in group_tasks {
                ui::render_task_line(task);
            }
        }

        ui::render_section_separator();
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize storage
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tablo");

    std::fs::create_dir_all(&data_dir).unwrap_or_else(|e| {
        eprintln!("Error: Failed to create data directory: {}", e);
        std::process::exit(1);
    });

    let storage = JsonFileStorage::new(data_dir);

    let persisted = match storage.load() {
        Ok(persisted) => persisted,
        Err(e) => {
            eprintln!("Error: Failed to load store: {}", e);
            std::process::exit(1);
        }
    };

    let (mut store, seeded) = Store::from_persisted(persisted);
    if seeded {
        // First activation: persist the defaults so later loads are stable.
        // A failed write is best-effort; the session stays usable.
        if let Err(e) = storage.save(&store) {
            eprintln!("Warning: Failed to persist seeded defaults: {}", e);
        }
    }

    match cli.command {
        Some(Commands::Board) | None => {
            render_board(&store);
        }
        Some(Commands::List) => {
            let Some(selected) = store.selected_group_id.clone() else {
                println!("No group selected");
                return;
            };

            let name = store
                .get_group(&selected)
                .map(|g| g.name.clone())
                .unwrap_or_else(|| selected.clone());
            let tasks: Vec<_> = store.tasks_in_group(&selected).collect();

            if tasks.is_empty() {
                println!("No tasks in {}", name);
            } else {
                ui::render_view_header(&name, tasks.len());
                for task in tasks {
                    ui::render_task_line(task);
                }
            }
        }
        Some(Commands::Add {
            title,
            tag,
            group,
            date,
            time,
            points,
        }) => {
            let params = AddTaskParameters {
                title,
                tag,
                group,
                date,
                time,
                points,
            };
            match add_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task added: {} {}", task.id.dimmed(), task.title.bold());
                }
                Err(e @ AddTaskError::AmbiguousTagName(_))
                | Err(e @ AddTaskError::AmbiguousGroupName(_)) => {
                    eprintln!("Error: {}", e);
                    eprintln!("\nPlease be more specific.");
                    std::process::exit(1);
                }
                Err(AddTaskError::Storage(e)) => {
                    eprintln!("Error: Failed to save task: {}", e);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Toggle { task_id }) => match toggle_task(&mut store, &storage, &task_id) {
            Ok(Some(task)) => {
                let state = if task.completed { "completed" } else { "pending" };
                println!("✓ Task {} is now {}", task.title.bold(), state);
            }
            Ok(None) => {
                println!("No task with id '{}'", task_id);
            }
            Err(ToggleTaskError::Storage(e)) => {
                eprintln!("Error: Failed to save task: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Edit {
            task_id,
            title,
            tag,
            group,
            date,
            time,
            points,
        }) => {
            let params = EditTaskParameters {
                title,
                tag,
                group,
                date,
                time,
                points,
            };
            match edit_task(&mut store, &storage, &task_id, params) {
                Ok(task) => {
                    println!("✓ Task updated: {} {}", task.id.dimmed(), task.title.bold());
                }
                Err(EditTaskError::Update(e)) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Rm { task_id }) => match delete_task(&mut store, &storage, &task_id) {
            Ok(Some(task)) => {
                println!("✓ Task deleted: {}", task.title);
            }
            Ok(None) => {
                println!("No task with id '{}'", task_id);
            }
            Err(DeleteTaskError::Storage(e)) => {
                eprintln!("Error: Failed to save: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Move {
            task_id,
            date,
            hour,
            slot,
        }) => {
            let target = match (slot, date, hour) {
                (Some(slot), _, _) => match DropTarget::from_slot_key(&slot) {
                    Ok(target) => target,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                },
                (None, Some(date), Some(hour)) => DropTarget { date, hour },
                _ => {
                    eprintln!("Error: Provide <date> <hour> or --slot \"{{date}}-{{hour}}\"");
                    std::process::exit(2);
                }
            };

            let params = MoveTaskParameters { task_id, target };
            match move_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task {} moved to {}", task.title.bold(), task.date);
                }
                Err(MoveTaskError::Update(e)) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Tag(TagCommands::Add { name, color })) => {
            let params = AddTagParameters { name, color };
            match add_tag(&mut store, &storage, params) {
                Ok(tag) => {
                    println!(
                        "✓ Tag {} created: {}",
                        ui::colorize(&tag.name, &tag.color).bold(),
                        tag.id.dimmed()
                    );
                }
                Err(AddTagError::Storage(e)) => {
                    eprintln!("Error: Failed to create tag: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Tag(TagCommands::Rm { tag_id })) => {
            match delete_tag(&mut store, &storage, &tag_id) {
                Ok(tag) => {
                    println!("✓ Tag deleted: {}", tag.name);
                }
                Err(e @ DeleteTagError::StillReferenced(..)) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
                Err(DeleteTagError::TagNotFound(id)) => {
                    eprintln!("Error: Tag '{}' not found", id);

                    if !store.tags.is_empty() {
                        eprintln!("\nAvailable tags:");
                        for tag in &store.tags {
                            eprintln!("  - {} ({})", tag.name, tag.id);
                        }
                    }
                    std::process::exit(1);
                }
                Err(DeleteTagError::Storage(e)) => {
                    eprintln!("Error: Failed to delete tag: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Tag(TagCommands::List)) => {
            if store.tags.is_empty() {
                println!("No tags found");
            } else {
                println!(
                    "{} ({} {})\n",
                    "TAGS".cyan(),
                    store.tags.len(),
                    if store.tags.len() == 1 { "tag" } else { "tags" }
                );

                for tag in &store.tags {
                    let count = store.tasks.iter().filter(|t| t.tag.id == tag.id).count();
                    let rate = stats::tag_completion_rate(&store.tasks, &tag.id);
                    println!(
                        "  {} {} {} {}",
                        ui::colorize("●", &tag.color),
                        tag.name.bold(),
                        format!("({} {})", count, if count == 1 { "task" } else { "tasks" })
                            .dimmed(),
                        format!("{}% done", rate).dimmed()
                    );
                }
            }
        }
        Some(Commands::Group(GroupCommands::Add { name, color })) => {
            let params = AddGroupParameters { name, color };
            match add_group(&mut store, &storage, params) {
                Ok(group) => {
                    println!(
                        "✓ Group {} created: {}",
                        ui::colorize(&group.name, &group.color).bold(),
                        group.id.dimmed()
                    );
                }
                Err(AddGroupError::Storage(e)) => {
                    eprintln!("Error: Failed to create group: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Group(GroupCommands::Rm { group_id })) => {
            match delete_group(&mut store, &storage, &group_id) {
                Ok(group) => {
                    println!("✓ Group deleted: {}", group.name);
                }
                Err(e @ DeleteGroupError::StillReferenced(..)) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
                Err(DeleteGroupError::GroupNotFound(id)) => {
                    eprintln!("Error: Group '{}' not found", id);

                    if !store.groups.is_empty() {
                        eprintln!("\nAvailable groups:");
                        for group in &store.groups {
                            eprintln!("  - {} ({})", group.name, group.id);
                        }
                    }
                    std::process::exit(1);
                }
                Err(DeleteGroupError::Storage(e)) => {
                    eprintln!("Error: Failed to delete group: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Group(GroupCommands::Select { group_id })) => {
            match select_group(&mut store, &storage, &group_id) {
                Ok(()) => {
                    let name = store
                        .get_group(&group_id)
                        .map(|g| g.name.clone())
                        .unwrap_or(group_id);
                    println!("✓ Selected group: {}", name.bold());
                }
                Err(SelectGroupError::Storage(e)) => {
                    eprintln!("Error: Failed to save selection: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Group(GroupCommands::Toggle { group_id })) => {
            match toggle_group_expanded(&mut store, &storage, &group_id) {
                Ok(Some(group)) => {
                    let state = if group.expanded { "expanded" } else { "collapsed" };
                    println!("✓ Group {} is now {}", group.name.bold(), state);
                }
                Ok(None) => {
                    println!("No group with id '{}'", group_id);
                }
                Err(ToggleGroupError::Storage(e)) => {
                    eprintln!("Error: Failed to save group: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Group(GroupCommands::List)) => {
            if store.groups.is_empty() {
                println!("No groups found");
            } else {
                println!(
                    "{} ({} {})\n",
                    "GROUPS".cyan(),
                    store.groups.len(),
                    if store.groups.len() == 1 {
                        "group"
                    } else {
                        "groups"
                    }
                );

                for group in &store.groups {
                    let count = store.tasks_in_group(&group.id).count();
                    let progress = stats::group_progress(&store.tasks, &group.id);
                    let selected = store.selected_group_id.as_deref() == Some(group.id.as_str());
                    ui::render_group_header(group, count, progress, selected);
                    println!();
                }
            }
        }
        Some(Commands::Stats { days }) => {
            let today = jiff::Zoned::now().date();

            let (completed, pending) = stats::status_counts(&store.tasks);
            let summary = stats::points_summary(&store.tasks);

            ui::render_view_header("STATS", store.tasks.len());
            println!("  completed {} · pending {}", completed, pending);
            println!(
                "  points earned {} / {}",
                summary.completed, summary.total
            );
            ui::render_percent_change(
                "week over week",
                stats::week_over_week_change(&store.tasks, today),
            );

            ui::render_section_separator();
            let counts = stats::daily_counts(&store.tasks, today, days as usize);
            let max_count = counts.iter().map(|(_, count)| *count).max().unwrap_or(0);
            for (label, count) in &counts {
                ui::render_count_bar(label, *count, max_count);
            }

            ui::render_section_separator();
            for tag in &store.tags {
                let rate = stats::tag_completion_rate(&store.tasks, &tag.id);
                println!(
                    "  {} {}  {} {}%",
                    ui::colorize("●", &tag.color),
                    tag.name,
                    ui::render_progress_bar(rate),
                    rate
                );
            }
        }
    }
}
