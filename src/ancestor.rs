//! Shared-union detection.
//!
//! A union referenced by more than one child implies a real ancestor even
//! when the sheet never names them.

use std::collections::HashMap;

use crate::identity::ParentKeys;
use crate::record::{Person, PersonId};

/// Number of persons whose own parent keys equal `(father, mother)`.
pub fn count_unions_with(persons: &[Person], mother: &str, father: &str) -> usize {
    persons
        .iter()
        .enumerate()
        .filter(|(idx, person)| {
            let keys = ParentKeys::resolve(PersonId(*idx), person);
            keys.mother == mother && keys.father == father
        })
        .count()
}

pub fn is_shared(persons: &[Person], mother: &str, father: &str) -> bool {
    count_unions_with(persons, mother, father) > 1
}

/// Precomputed child counts per union key. Answers the same queries as
/// [`count_unions_with`] without rescanning the collection.
#[derive(Debug, Clone, Default)]
pub struct UnionIndex {
    counts: HashMap<String, usize>,
}

impl UnionIndex {
    pub fn build(persons: &[Person]) -> Self {
        let mut counts = HashMap::new();
        for (idx, person) in persons.iter().enumerate() {
            let key = ParentKeys::resolve(PersonId(idx), person).union_key();
            *counts.entry(key).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, keys: &ParentKeys) -> usize {
        self.counts.get(&keys.union_key()).copied().unwrap_or(0)
    }

    pub fn is_shared(&self, keys: &ParentKeys) -> bool {
        self.count(keys) > 1
    }
}
