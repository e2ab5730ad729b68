use thiserror::Error;

use crate::{
    models::{
        store::Store,
        task::{Task, parse_timestamp},
    },
    services::tasks::{UpdateTaskError, update_task},
    storage::Storage,
};

#[derive(Debug, Error)]
pub enum MoveTaskError {
    #[error("Invalid drop target '{0}'")]
    InvalidDropTarget(String),

    #[error("Drop hour {0} is outside 0-23")]
    HourOutOfRange(i8),

    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error(transparent)]
    Update(#[from] UpdateTaskError),
}

/// Destination of a calendar drag: a target day plus an hour slot.
pub struct DropTarget {
    /// Calendar date, e.g. "2024-03-10"; a full timestamp is accepted
    /// and reduced to its date
    pub date: String,
    pub hour: i8,
}

impl DropTarget {
    /// Parse the legacy composite slot key `{date}-{hour}`. The date
    /// itself contains the separator, so the split is on the last
    /// occurrence.
    pub fn from_slot_key(key: &str) -> Result<Self, MoveTaskError> {
        let Some((date, hour)) = key.rsplit_once('-') else {
            return Err(MoveTaskError::InvalidDropTarget(String::from(key)));
        };
        let hour: i8 = hour
            .parse()
            .map_err(|_| MoveTaskError::InvalidDropTarget(String::from(key)))?;
        Ok(Self {
            date: String::from(date),
            hour,
        })
    }
}

pub struct MoveTaskParameters {
    pub task_id: String,
    pub target: DropTarget,
}

/// Reschedule a task onto a drop target. Drops snap to the hour
/// boundary: minutes and seconds are zeroed. Only the date changes;
/// title, tag, group, time and points are left untouched. Dropping a
/// task onto its current slot is a legal no-op that still persists.
pub fn move_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: MoveTaskParameters,
) -> Result<Task, MoveTaskError> {
    let target = parameters.target;

    if !(0..=23).contains(&target.hour) {
        return Err(MoveTaskError::HourOutOfRange(target.hour));
    }

    let Some(day) = parse_timestamp(&target.date).map(|datetime| datetime.date()) else {
        return Err(MoveTaskError::InvalidDropTarget(target.date));
    };

    let snapped = day.at(target.hour, 0, 0, 0);

    let Some(task) = store.get_task(&parameters.task_id) else {
        return Err(MoveTaskError::TaskNotFound(parameters.task_id));
    };

    let mut rescheduled = task.clone();
    rescheduled.date = snapped.to_string();

    Ok(update_task(store, storage, rescheduled)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::store::PersistedState;
    use crate::services::tasks::{AddTaskParameters, add_task};
    use crate::storage::StorageError;

    struct NoopStorage;

    impl Storage for NoopStorage {
        fn load(&self) -> Result<PersistedState, StorageError> {
            Ok(PersistedState::default())
        }

        fn save(&self, _store: &Store) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn store_with_task(date: &str) -> (Store, String) {
        let mut store = Store::from_persisted(PersistedState::default()).0;
        let task = add_task(
            &mut store,
            &NoopStorage,
            AddTaskParameters {
                title: String::from("Review PR"),
                tag: None,
                group: None,
                date: Some(String::from(date)),
                time: 30,
                points: 2,
            },
        )
        .unwrap();
        (store, task.id)
    }

    #[test]
    fn test_move_snaps_to_hour_boundary() {
        let (mut store, task_id) = store_with_task("2024-02-01T08:45:30");

        let moved = move_task(
            &mut store,
            &NoopStorage,
            MoveTaskParameters {
                task_id: task_id.clone(),
                target: DropTarget {
                    date: String::from("2024-03-10"),
                    hour: 14,
                },
            },
        )
        .unwrap();

        assert_eq!(moved.date, "2024-03-10T14:00:00");
        assert_eq!(store.get_task(&task_id).unwrap().date, "2024-03-10T14:00:00");
    }

    #[test]
    fn test_move_changes_only_the_date() {
        let (mut store, task_id) = store_with_task("2024-02-01T08:00:00");
        let before = store.get_task(&task_id).unwrap().clone();

        let moved = move_task(
            &mut store,
            &NoopStorage,
            MoveTaskParameters {
                task_id,
                target: DropTarget {
                    date: String::from("2024-03-10"),
                    hour: 9,
                },
            },
        )
        .unwrap();

        assert_eq!(moved.title, before.title);
        assert_eq!(moved.tag.id, before.tag.id);
        assert_eq!(moved.group_id, before.group_id);
        assert_eq!(moved.time, before.time);
        assert_eq!(moved.points, before.points);
    }

    #[test]
    fn test_move_to_current_slot_is_legal_noop() {
        let (mut store, task_id) = store_with_task("2024-03-10T14:00:00");

        let moved = move_task(
            &mut store,
            &NoopStorage,
            MoveTaskParameters {
                task_id,
                target: DropTarget {
                    date: String::from("2024-03-10"),
                    hour: 14,
                },
            },
        )
        .unwrap();

        assert_eq!(moved.date, "2024-03-10T14:00:00");
    }

    #[test]
    fn test_move_rejects_unparseable_date_without_mutation() {
        let (mut store, task_id) = store_with_task("2024-02-01T08:00:00");

        let result = move_task(
            &mut store,
            &NoopStorage,
            MoveTaskParameters {
                task_id: task_id.clone(),
                target: DropTarget {
                    date: String::from("not-a-date"),
                    hour: 10,
                },
            },
        );

        assert!(matches!(result, Err(MoveTaskError::InvalidDropTarget(_))));
        assert_eq!(store.get_task(&task_id).unwrap().date, "2024-02-01T08:00:00");
    }

    #[test]
    fn test_move_rejects_out_of_range_hour() {
        let (mut store, task_id) = store_with_task("2024-02-01T08:00:00");

        let result = move_task(
            &mut store,
            &NoopStorage,
            MoveTaskParameters {
                task_id,
                target: DropTarget {
                    date: String::from("2024-03-10"),
                    hour: 24,
                },
            },
        );

        assert!(matches!(result, Err(MoveTaskError::HourOutOfRange(24))));
    }

    #[test]
    fn test_move_unknown_task_fails() {
        let mut store = Store::from_persisted(PersistedState::default()).0;

        let result = move_task(
            &mut store,
            &NoopStorage,
            MoveTaskParameters {
                task_id: String::from("missing"),
                target: DropTarget {
                    date: String::from("2024-03-10"),
                    hour: 10,
                },
            },
        );

        assert!(matches!(result, Err(MoveTaskError::TaskNotFound(_))));
    }

    #[test]
    fn test_slot_key_splits_on_last_separator() {
        let target = DropTarget::from_slot_key("2024-03-10-14").unwrap();

        assert_eq!(target.date, "2024-03-10");
        assert_eq!(target.hour, 14);
    }

    #[test]
    fn test_slot_key_without_hour_is_rejected() {
        assert!(matches!(
            DropTarget::from_slot_key("2024-03-10-notanhour"),
            Err(MoveTaskError::InvalidDropTarget(_))
        ));
        assert!(matches!(
            DropTarget::from_slot_key("nodash"),
            Err(MoveTaskError::InvalidDropTarget(_))
        ));
    }
}
