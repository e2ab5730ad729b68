use uuid::Uuid;

use crate::models::{
    group::{Group, default_groups},
    tag::{Tag, default_tags},
    task::Task,
};

/// The three collections loaded from storage, each absent when its key
/// has never been persisted. Produced by `Storage::load`.
#[derive(Default)]
pub struct PersistedState {
    pub tasks: Option<Vec<Task>>,
    pub tags: Option<Vec<Tag>>,
    pub groups: Option<Vec<Group>>,
    /// Outer `None` = key absent from storage; inner `None` = persisted
    /// null (no group selected, only possible once every group is gone).
    pub selected_group_id: Option<Option<String>>,
}

/// The authoritative in-memory state. Constructed once at startup and
/// passed by reference to every service; services are the only writers.
pub struct Store {
    pub tasks: Vec<Task>,
    pub tags: Vec<Tag>,
    pub groups: Vec<Group>,
    pub selected_group_id: Option<String>,
}

impl Store {
    /// Build the store from whatever was persisted, seeding defaults for
    /// any absent collection. Returns `true` when anything was seeded so
    /// the caller can persist immediately and make subsequent loads stable.
    pub fn from_persisted(state: PersistedState) -> (Self, bool) {
        let mut seeded = false;

        let tasks = state.tasks.unwrap_or_else(|| {
            seeded = true;
            vec![]
        });
        let tags = state.tags.unwrap_or_else(|| {
            seeded = true;
            default_tags()
        });
        let groups = state.groups.unwrap_or_else(|| {
            seeded = true;
            default_groups()
        });
        let selected_group_id = match state.selected_group_id {
            Some(selection) => selection,
            None => {
                seeded = true;
                groups.first().map(|group| group.id.clone())
            }
        };

        (
            Self {
                tasks,
                tags,
                groups,
                selected_group_id,
            },
            seeded,
        )
    }

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn get_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn get_tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn get_group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn get_group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|group| group.id == id)
    }

    pub fn group_exists(&self, id: &str) -> bool {
        self.groups.iter().any(|group| group.id == id)
    }

    pub fn tasks_in_group<'a>(&'a self, group_id: &'a str) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter().filter(move |task| task.group_id == group_id)
    }

    pub fn mint_task_id(&self) -> String {
        mint_id(|candidate| self.tasks.iter().any(|task| task.id == candidate))
    }

    pub fn mint_tag_id(&self) -> String {
        mint_id(|candidate| self.tags.iter().any(|tag| tag.id == candidate))
    }

    pub fn mint_group_id(&self) -> String {
        mint_id(|candidate| self.groups.iter().any(|group| group.id == candidate))
    }
}

/// Short opaque id token: the first 9 hex characters of a v4 UUID.
/// Regenerated until it collides with nothing in the target collection.
fn mint_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = Uuid::new_v4().simple().to_string()[..9].to_string();
        if !taken(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_defaults_when_nothing_persisted() {
        let (store, seeded) = Store::from_persisted(PersistedState::default());

        assert!(seeded);
        assert_eq!(store.tasks.len(), 0);
        assert_eq!(store.tags.len(), 3);
        assert_eq!(store.groups.len(), 3);
        assert_eq!(
            store.selected_group_id.as_deref(),
            Some(store.groups[0].id.as_str())
        );
    }

    #[test]
    fn test_persisted_collections_are_not_reseeded() {
        let state = PersistedState {
            tasks: Some(vec![]),
            tags: Some(vec![]),
            groups: Some(vec![]),
            selected_group_id: Some(Some(String::from("grp-inbox"))),
        };
        let (store, seeded) = Store::from_persisted(state);

        assert!(!seeded);
        assert_eq!(store.tags.len(), 0);
        assert_eq!(store.groups.len(), 0);
    }

    #[test]
    fn test_minted_ids_are_short_and_unique() {
        let (store, _) = Store::from_persisted(PersistedState::default());

        let a = store.mint_task_id();
        let b = store.mint_task_id();
        assert_eq!(a.len(), 9);
        assert_ne!(a, b);
    }

    #[test]
    fn test_tasks_in_group_filters_by_foreign_key() {
        let (mut store, _) = Store::from_persisted(PersistedState::default());
        let group_id = store.groups[0].id.clone();
        store.tasks.push(Task {
            id: String::from("t1"),
            title: String::from("Review PR"),
            tag: store.tags[0].clone(),
            group_id: group_id.clone(),
            date: String::from("2024-03-10T09:00:00"),
            time: 30,
            points: 2,
            ..Task::default()
        });

        assert_eq!(store.tasks_in_group(&group_id).count(), 1);
        assert_eq!(store.tasks_in_group(&store.groups[1].id).count(), 0);
        assert!(store.group_exists(&group_id));
        assert!(!store.group_exists("missing"));
    }
}
