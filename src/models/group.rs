use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Clone)]
pub struct Group {
    /// Short opaque id, unique within the group collection
    pub id: String,
    /// Display name of the group
    pub name: String,
    /// Opaque display color token (hex string)
    pub color: String,
    /// Whether the group is expanded in board/list views. UI state,
    /// persisted alongside the entity but irrelevant to task validity.
    pub expanded: bool,
}

/// Groups seeded on first run.
pub fn default_groups() -> Vec<Group> {
    vec![
        Group {
            id: String::from("grp-inbox"),
            name: String::from("Inbox"),
            color: String::from("#5252FF"),
            expanded: true,
        },
        Group {
            id: String::from("grp-work"),
            name: String::from("Work"),
            color: String::from("#FF7452"),
            expanded: true,
        },
        Group {
            id: String::from("grp-personal"),
            name: String::from("Personal"),
            color: String::from("#FFC300"),
            expanded: true,
        },
    ]
}
