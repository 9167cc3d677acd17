use crate::domain::model::{Nested, OnConflict};
use crate::utils::error::{MiscError, Result};
use serde_json::{Map, Value};

/// Iterator returned by [`moving_window`].
#[derive(Debug, Clone)]
pub struct MovingWindow<I> {
    iter: I,
    size: usize,
}

impl<I: Iterator> Iterator for MovingWindow<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let window: Vec<I::Item> = self.iter.by_ref().take(self.size).collect();
        if window.is_empty() {
            None
        } else {
            Some(window)
        }
    }
}

/// Splits `iterable` into consecutive windows of `size` items. The last
/// window holds whatever is left and may be shorter.
pub fn moving_window<I>(iterable: I, size: usize) -> Result<MovingWindow<I::IntoIter>>
where
    I: IntoIterator,
{
    if size == 0 {
        return Err(MiscError::InvalidArgument {
            name: "size".to_string(),
            reason: "window size must be at least 1".to_string(),
        });
    }
    Ok(MovingWindow {
        iter: iterable.into_iter(),
        size,
    })
}

/// Flattens an arbitrarily nested sequence depth-first, keeping order.
pub fn flatten<T: Clone>(sequence: &[Nested<T>]) -> Vec<T> {
    let mut flattened = Vec::new();
    let mut stack: Vec<(&[Nested<T>], usize)> = vec![(sequence, 0)];

    while let Some((mut current, mut index)) = stack.pop() {
        while index < current.len() {
            let item = &current[index];
            index += 1;
            match item {
                Nested::List(inner) => {
                    stack.push((current, index));
                    current = inner.as_slice();
                    index = 0;
                }
                Nested::Item(value) => flattened.push(value.clone()),
            }
        }
    }

    flattened
}

/// Merges two JSON objects.
///
/// Keys found on one side only are copied as they are. Objects on both sides
/// are merged recursively. Arrays on both sides are concatenated, left first,
/// when `merge_sequences` is set; otherwise the side picked by `on_conflict`
/// wins, with `Strict` keeping the left array. Other values present on both
/// sides are resolved by `on_conflict`.
pub fn merge_dicts(
    left: &Map<String, Value>,
    right: &Map<String, Value>,
    on_conflict: OnConflict,
    merge_sequences: bool,
) -> Result<Map<String, Value>> {
    let mut output: Map<String, Value> = left
        .iter()
        .filter(|(key, _)| !right.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    for (key, value) in right {
        let Some(left_value) = left.get(key) else {
            output.insert(key.clone(), value.clone());
            continue;
        };

        let merged = match (left_value, value) {
            (Value::Array(left_items), Value::Array(right_items)) => {
                if merge_sequences {
                    Value::Array(left_items.iter().chain(right_items).cloned().collect())
                } else if on_conflict == OnConflict::Right {
                    value.clone()
                } else {
                    left_value.clone()
                }
            }
            (Value::Object(left_inner), Value::Object(right_inner)) => {
                Value::Object(merge_dicts(left_inner, right_inner, on_conflict, merge_sequences)?)
            }
            // A container on the right never replaces a value of another type.
            (_, Value::Array(_)) | (_, Value::Object(_)) => left_value.clone(),
            _ => match on_conflict {
                OnConflict::Strict => {
                    return Err(MiscError::MergeConflict { key: key.clone() });
                }
                OnConflict::Left => left_value.clone(),
                OnConflict::Right => value.clone(),
            },
        };
        output.insert(key.clone(), merged);
    }

    Ok(output)
}

/// Lifts a predicate on `T` to one that looks at the first element of a pair.
pub fn predicate_from_first<T, U, R, P>(predicate: P) -> impl Fn(&(T, U)) -> R
where
    P: Fn(&T) -> R,
{
    move |pair| predicate(&pair.0)
}

/// Like `enumerate`, but yields `(item, index)` and counts from `start`.
pub fn indexsecond_enumerate<I>(iterable: I, start: usize) -> impl Iterator<Item = (I::Item, usize)>
where
    I: IntoIterator,
{
    iterable.into_iter().zip(start..)
}
