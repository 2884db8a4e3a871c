//! Records that carry a stable backend identity.

use std::collections::HashMap;
use std::hash::Hash;

pub trait Entity {
    /// Strongly-typed identifier (the row's primary key).
    type Id: Copy + Eq + Ord + Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;
}

/// Drop repeated ids, keeping the first occurrence and the input order.
///
/// Also returns the position of every kept id in the output.
pub fn dedup_first<E, I>(records: I) -> (Vec<E>, HashMap<E::Id, usize>)
where
    E: Entity,
    I: IntoIterator<Item = E>,
{
    let mut kept = Vec::new();
    let mut index = HashMap::new();
    for record in records {
        let id = record.id();
        if index.contains_key(&id) {
            continue;
        }
        index.insert(id, kept.len());
        kept.push(record);
    }
    (kept, index)
}
