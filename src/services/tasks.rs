use thiserror::Error;

use crate::{
    models::{
        store::Store,
        task::{Task, is_valid_timestamp},
    },
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AddTaskError {
    #[error("Tag '{0}' not found")]
    TagNotFound(String),

    #[error("Tag name is ambiguous. Multiple tags found: {}", .0.join(", "))]
    AmbiguousTagName(Vec<String>),

    #[error("Group '{0}' not found")]
    GroupNotFound(String),

    #[error("Group name is ambiguous. Multiple groups found: {}", .0.join(", "))]
    AmbiguousGroupName(Vec<String>),

    #[error("No group given and no group selected")]
    NoGroupSelected,

    #[error("Invalid task date '{0}'")]
    InvalidDate(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddTaskParameters {
    pub title: String,
    /// Tag name to match (case-insensitive substring); defaults to the
    /// first tag when omitted
    pub tag: Option<String>,
    /// Group name to match; defaults to the selected group when omitted
    pub group: Option<String>,
    /// ISO-8601 timestamp; defaults to now
    pub date: Option<String>,
    pub time: u32,
    pub points: u32,
}

pub fn add_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddTaskParameters,
) -> Result<Task, AddTaskError> {
    // 1. Resolve the tag name to a tag and snapshot it by value
    let tag = if let Some(tag_name) = parameters.tag {
        let matching_tags: Vec<_> = store
            .tags
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&tag_name.to_lowercase()))
            .collect();

        match matching_tags.len() {
            0 => return Err(AddTaskError::TagNotFound(tag_name)),
            1 => matching_tags[0].clone(),
            _ => {
                let names: Vec<String> = matching_tags.iter().map(|t| t.name.clone()).collect();
                return Err(AddTaskError::AmbiguousTagName(names));
            }
        }
    } else {
        store
            .tags
            .first()
            .cloned()
            .ok_or_else(|| AddTaskError::TagNotFound(String::from("<default>")))?
    };

    // 2. Resolve the group name, falling back to the selected group
    let group_id = if let Some(group_name) = parameters.group {
        let matching_groups: Vec<_> = store
            .groups
            .iter()
            .filter(|g| g.name.to_lowercase().contains(&group_name.to_lowercase()))
            .collect();

        match matching_groups.len() {
            0 => return Err(AddTaskError::GroupNotFound(group_name)),
            1 => matching_groups[0].id.clone(),
            _ => {
                let names: Vec<String> = matching_groups.iter().map(|g| g.name.clone()).collect();
                return Err(AddTaskError::AmbiguousGroupName(names));
            }
        }
    } else {
        let selected = store
            .selected_group_id
            .clone()
            .ok_or(AddTaskError::NoGroupSelected)?;
        if !store.group_exists(&selected) {
            return Err(AddTaskError::GroupNotFound(selected));
        }
        selected
    };

    // 3. Validate the date, defaulting to the current wall-clock time
    let date = parameters
        .date
        .unwrap_or_else(|| jiff::Zoned::now().strftime("%Y-%m-%dT%H:%M:%S").to_string());
    if !is_valid_timestamp(&date) {
        return Err(AddTaskError::InvalidDate(date));
    }

    let task = Task {
        id: store.mint_task_id(),
        title: parameters.title,
        completed: false,
        tag,
        group_id,
        date,
        time: parameters.time,
        points: parameters.points,
    };

    store.tasks.push(task.clone());

    storage.save(store)?;

    Ok(task)
}

#[derive(Debug, Error)]
pub enum ToggleTaskError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Flip a task's completed flag. An unknown id is a no-op and nothing
/// is persisted; `Ok(None)` tells the caller so.
pub fn toggle_task(
    store: &mut Store,
    storage: &impl Storage,
    task_id: &str,
) -> Result<Option<Task>, ToggleTaskError> {
    let Some(task) = store.get_task_mut(task_id) else {
        return Ok(None);
    };
    task.completed = !task.completed;
    let toggled = task.clone();

    storage.save(store)?;

    Ok(Some(toggled))
}

#[derive(Debug, Error)]
pub enum UpdateTaskError {
    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Invalid task date '{0}'")]
    InvalidDate(String),

    #[error("Group '{0}' not found")]
    GroupNotFound(String),

    #[error("Task '{0}' has an unparseable date '{1}'; update aborted")]
    DateInvariantViolated(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Replace a task record wholesale. This is the single update path; the
/// scheduler funnels through it too. Before committing, every task in
/// the resulting collection is re-checked for a parseable date and the
/// previous collection is retained if any fails.
pub fn update_task(
    store: &mut Store,
    storage: &impl Storage,
    replacement: Task,
) -> Result<Task, UpdateTaskError> {
    if !is_valid_timestamp(&replacement.date) {
        return Err(UpdateTaskError::InvalidDate(replacement.date));
    }
    if !store.group_exists(&replacement.group_id) {
        return Err(UpdateTaskError::GroupNotFound(replacement.group_id));
    }

    let Some(index) = store.tasks.iter().position(|t| t.id == replacement.id) else {
        return Err(UpdateTaskError::TaskNotFound(replacement.id));
    };

    let mut candidate = store.tasks.clone();
    candidate[index] = replacement.clone();

    if let Some(bad) = candidate.iter().find(|t| !is_valid_timestamp(&t.date)) {
        return Err(UpdateTaskError::DateInvariantViolated(
            bad.id.clone(),
            bad.date.clone(),
        ));
    }

    store.tasks = candidate;

    storage.save(store)?;

    Ok(replacement)
}

#[derive(Debug, Error)]
pub enum EditTaskError {
    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Tag '{0}' not found")]
    TagNotFound(String),

    #[error("Tag name is ambiguous. Multiple tags found: {}", .0.join(", "))]
    AmbiguousTagName(Vec<String>),

    #[error("Group '{0}' not found")]
    GroupNotFound(String),

    #[error("Group name is ambiguous. Multiple groups found: {}", .0.join(", "))]
    AmbiguousGroupName(Vec<String>),

    #[error(transparent)]
    Update(#[from] UpdateTaskError),
}

#[derive(Default)]
pub struct EditTaskParameters {
    pub title: Option<String>,
    /// New tag by name; re-snapshots the matching tag onto the task
    pub tag: Option<String>,
    /// New group by name
    pub group: Option<String>,
    pub date: Option<String>,
    pub time: Option<u32>,
    pub points: Option<u32>,
}

/// Apply a partial edit by building a full replacement record and
/// funnelling it through `update_task`.
pub fn edit_task(
    store: &mut Store,
    storage: &impl Storage,
    task_id: &str,
    parameters: EditTaskParameters,
) -> Result<Task, EditTaskError> {
    let Some(task) = store.get_task(task_id) else {
        return Err(EditTaskError::TaskNotFound(String::from(task_id)));
    };
    let mut replacement = task.clone();

    if let Some(title) = parameters.title {
        replacement.title = title;
    }

    if let Some(tag_name) = parameters.tag {
        let matching_tags: Vec<_> = store
            .tags
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&tag_name.to_lowercase()))
            .collect();

        replacement.tag = match matching_tags.len() {
            0 => return Err(EditTaskError::TagNotFound(tag_name)),
            1 => matching_tags[0].clone(),
            _ => {
                let names: Vec<String> = matching_tags.iter().map(|t| t.name.clone()).collect();
                return Err(EditTaskError::AmbiguousTagName(names));
            }
        };
    }

    if let Some(group_name) = parameters.group {
        let matching_groups: Vec<_> = store
            .groups
            .iter()
            .filter(|g| g.name.to_lowercase().contains(&group_name.to_lowercase()))
            .collect();

        replacement.group_id = match matching_groups.len() {
            0 => return Err(EditTaskError::GroupNotFound(group_name)),
            1 => matching_groups[0].id.clone(),
            _ => {
                let names: Vec<String> = matching_groups.iter().map(|g| g.name.clone()).collect();
                return Err(EditTaskError::AmbiguousGroupName(names));
            }
        };
    }

    if let Some(date) = parameters.date {
        replacement.date = date;
    }
    if let Some(time) = parameters.time {
        replacement.time = time;
    }
    if let Some(points) = parameters.points {
        replacement.points = points;
    }

    Ok(update_task(store, storage, replacement)?)
}

#[derive(Debug, Error)]
pub enum DeleteTaskError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Remove a task unconditionally. An unknown id is a no-op.
pub fn delete_task(
    store: &mut Store,
    storage: &impl Storage,
    task_id: &str,
) -> Result<Option<Task>, DeleteTaskError> {
    let Some(index) = store.tasks.iter().position(|t| t.id == task_id) else {
        return Ok(None);
    };
    let removed = store.tasks.remove(index);

    storage.save(store)?;

    Ok(Some(removed))
}
