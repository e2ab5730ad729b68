use thiserror::Error;

use crate::{
    models::{group::Group, store::Store},
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AddGroupError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddGroupParameters {
    pub name: String,
    pub color: String,
}

pub fn add_group(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddGroupParameters,
) -> Result<Group, AddGroupError> {
    let group = Group {
        id: store.mint_group_id(),
        name: parameters.name,
        color: parameters.color,
        expanded: true,
    };

    store.groups.push(group.clone());

    storage.save(store)?;

    Ok(group)
}

#[derive(Debug, Error)]
pub enum DeleteGroupError {
    #[error("Group '{0}' not found")]
    GroupNotFound(String),

    #[error("Group '{0}' still contains {1} task(s) and cannot be deleted")]
    StillReferenced(String, usize),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Delete a group, refused while any task still points at it. When the
/// deleted group was the selected one, selection falls back to the first
/// remaining group.
pub fn delete_group(
    store: &mut Store,
    storage: &impl Storage,
    group_id: &str,
) -> Result<Group, DeleteGroupError> {
    let Some(index) = store.groups.iter().position(|g| g.id == group_id) else {
        return Err(DeleteGroupError::GroupNotFound(String::from(group_id)));
    };

    let references = store.tasks_in_group(group_id).count();
    if references > 0 {
        return Err(DeleteGroupError::StillReferenced(
            store.groups[index].name.clone(),
            references,
        ));
    }

    let removed = store.groups.remove(index);

    if store.selected_group_id.as_deref() == Some(group_id) {
        store.selected_group_id = store.groups.first().map(|g| g.id.clone());
    }

    storage.save(store)?;

    Ok(removed)
}

#[derive(Debug, Error)]
pub enum SelectGroupError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Point the board filter at a group and persist the pointer. No
/// existence guard; a dangling selection just yields an empty board.
pub fn select_group(
    store: &mut Store,
    storage: &impl Storage,
    group_id: &str,
) -> Result<(), SelectGroupError> {
    store.selected_group_id = Some(String::from(group_id));

    storage.save(store)?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum ToggleGroupError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Flip a group's expanded flag. An unknown id is a no-op and nothing
/// is persisted.
pub fn toggle_group_expanded(
    store: &mut Store,
    storage: &impl Storage,
    group_id: &str,
) -> Result<Option<Group>, ToggleGroupError> {
    let Some(group) = store.get_group_mut(group_id) else {
        return Ok(None);
    };
    group.expanded = !group.expanded;
    let toggled = group.clone();

    storage.save(store)?;

    Ok(Some(toggled))
}
