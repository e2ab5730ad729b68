use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Clone)]
pub struct Tag {
    /// Short opaque id, unique within the tag collection
    pub id: String,
    /// Display name of the tag
    pub name: String,
    /// Opaque display color token (hex string)
    pub color: String,
}

/// Tags seeded on first run, before the user has created any.
pub fn default_tags() -> Vec<Tag> {
    vec![
        Tag {
            id: String::from("tag-dev"),
            name: String::from("Dev"),
            color: String::from("#5252FF"),
        },
        Tag {
            id: String::from("tag-meetings"),
            name: String::from("Meetings"),
            color: String::from("#FF7452"),
        },
        Tag {
            id: String::from("tag-breaks"),
            name: String::from("Breaks"),
            color: String::from("#FFC300"),
        },
    ]
}
