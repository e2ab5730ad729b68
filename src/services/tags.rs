use thiserror::Error;

use crate::{
    models::{store::Store, tag::Tag},
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AddTagError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddTagParameters {
    pub name: String,
    pub color: String,
}

pub fn add_tag(
    store: &mut Store,
    storage: &impl Storage,
    parameters: AddTagParameters,
) -> Result<Tag, AddTagError> {
    let tag = Tag {
        id: store.mint_tag_id(),
        name: parameters.name,
        color: parameters.color,
    };

    store.tags.push(tag.clone());

    storage.save(store)?;

    Ok(tag)
}

#[derive(Debug, Error)]
pub enum DeleteTagError {
    #[error("Tag '{0}' not found")]
    TagNotFound(String),

    #[error("Tag '{0}' is still used by {1} task(s) and cannot be deleted")]
    StillReferenced(String, usize),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Delete a tag, refused while any task still carries its snapshot.
/// Tasks are never cascade-deleted.
pub fn delete_tag(
    store: &mut Store,
    storage: &impl Storage,
    tag_id: &str,
) -> Result<Tag, DeleteTagError> {
    let Some(index) = store.tags.iter().position(|t| t.id == tag_id) else {
        return Err(DeleteTagError::TagNotFound(String::from(tag_id)));
    };

    let references = store
        .tasks
        .iter()
        .filter(|task| task.tag.id == tag_id)
        .count();
    if references > 0 {
        return Err(DeleteTagError::StillReferenced(
            store.tags[index].name.clone(),
            references,
        ));
    }

    let removed = store.tags.remove(index);

    storage.save(store)?;

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::store::PersistedState;
    use crate::models::task::Task;

    struct NoopStorage;

    impl Storage for NoopStorage {
        fn load(&self) -> Result<PersistedState, StorageError> {
            Ok(PersistedState::default())
        }

        fn save(&self, _store: &Store) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn seeded_store() -> Store {
        Store::from_persisted(PersistedState::default()).0
    }

    #[test]
    fn test_add_tag_mints_id_and_appends() {
        let mut store = seeded_store();

        let tag = add_tag(
            &mut store,
            &NoopStorage,
            AddTagParameters {
                name: String::from("Urgent"),
                color: String::from("#FF0000"),
            },
        )
        .unwrap();

        assert_eq!(store.tags.len(), 4);
        assert_eq!(tag.id.len(), 9);
        assert!(store.get_tag(&tag.id).is_some());
    }

    #[test]
    fn test_delete_referenced_tag_is_rejected() {
        let mut store = seeded_store();
        let tag = store.tags[0].clone();
        store.tasks.push(Task {
            id: String::from("t1"),
            title: String::from("Holds the tag"),
            tag: tag.clone(),
            group_id: store.groups[0].id.clone(),
            date: String::from("2024-03-10T09:00:00"),
            time: 15,
            points: 1,
            ..Task::default()
        });

        let result = delete_tag(&mut store, &NoopStorage, &tag.id);

        assert!(matches!(result, Err(DeleteTagError::StillReferenced(_, 1))));
        assert_eq!(store.tags.len(), 3);
    }

    #[test]
    fn test_delete_unreferenced_tag_succeeds() {
        let mut store = seeded_store();
        let tag_id = store.tags[2].id.clone();

        let removed = delete_tag(&mut store, &NoopStorage, &tag_id).unwrap();

        assert_eq!(removed.id, tag_id);
        assert_eq!(store.tags.len(), 2);
        assert!(store.get_tag(&tag_id).is_none());
    }

    #[test]
    fn test_delete_unknown_tag_fails() {
        let mut store = seeded_store();

        let result = delete_tag(&mut store, &NoopStorage, "missing");

        assert!(matches!(result, Err(DeleteTagError::TagNotFound(_))));
    }
}
