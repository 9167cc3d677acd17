use serde::{Deserialize, Serialize};

/// An arbitrarily nested list, as consumed by [`flatten`](crate::helpers::sequences::flatten).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nested<T> {
    Item(T),
    List(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    pub fn item(value: T) -> Self {
        Nested::Item(value)
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Nested<T>>,
    {
        Nested::List(items.into_iter().collect())
    }
}

/// How [`merge_dicts`](crate::helpers::sequences::merge_dicts) resolves a key
/// present on both sides with scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnConflict {
    /// Fail with [`MiscError::MergeConflict`](crate::MiscError::MergeConflict).
    Strict,
    Left,
    Right,
}
