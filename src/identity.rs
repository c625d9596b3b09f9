//! String identities for persons, parents and unions.
//!
//! Mermaid node ids are derived from names, so every place that builds a key
//! must go through [`identifier`] or edges stop deduplicating.

use std::collections::HashMap;

use crate::record::{Person, PersonId};

/// Prefix of the father key shared by all children of an unknown father.
pub const FAMILY_PREFIX: &str = "Family_";
/// Prefix of the father key for a person with no father and no surname.
pub const UNKNOWN_PREFIX: &str = "Unknown_";
/// Color-class key for persons without a surname.
pub const MISSING_FAMILY: &str = "missing";

pub fn identifier(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Explicit father name, else `Family_<surname>`, else `Unknown_<id>`.
///
/// The last form is unique per person: comparing it against another
/// person's key never matches.
pub fn father_key(id: PersonId, person: &Person) -> String {
    if !person.father_fullname.trim().is_empty() {
        return identifier(&person.father_fullname);
    }
    let surname = identifier(&person.surname);
    if !surname.is_empty() {
        return format!("{FAMILY_PREFIX}{surname}");
    }
    format!("{UNKNOWN_PREFIX}{id}")
}

/// Mothers get no synthetic fallback: unknown is the empty key.
pub fn mother_key(person: &Person) -> String {
    identifier(&person.mother_fullname)
}

pub fn union_key(father: &str, mother: &str) -> String {
    format!("{father}={mother}")
}

/// Surname key used for color classes.
pub fn family_key(person: &Person) -> String {
    let surname = identifier(&person.surname);
    if surname.is_empty() {
        MISSING_FAMILY.to_string()
    } else {
        surname
    }
}

/// `Name_Surname`, the node id a person renders under.
pub fn display_key(person: &Person) -> String {
    identifier(&person.full_name())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentKeys {
    pub father: String,
    pub mother: String,
}

impl ParentKeys {
    pub fn resolve(id: PersonId, person: &Person) -> Self {
        Self {
            father: father_key(id, person),
            mother: mother_key(person),
        }
    }

    pub fn union_key(&self) -> String {
        union_key(&self.father, &self.mother)
    }

    /// A union whose mother is unknown; its key ends with `=`.
    pub fn is_partial(&self) -> bool {
        self.mother.is_empty()
    }
}

/// Render keys per [`PersonId`], with same-name persons either suffixed
/// (`_2`, `_3`, ...) or merged.
#[derive(Debug, Clone, Default)]
pub struct RenderKeys {
    keys: Vec<String>,
    collisions: usize,
}

impl RenderKeys {
    pub fn assign(persons: &[Person], disambiguate: bool) -> Self {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut keys = Vec::with_capacity(persons.len());
        let mut collisions = 0;
        for person in persons {
            let base = display_key(person);
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                keys.push(base);
                continue;
            }
            collisions += 1;
            if disambiguate {
                let key = format!("{base}_{count}");
                tracing::warn!(person = %base, renamed = %key, "duplicate person name");
                keys.push(key);
            } else {
                tracing::warn!(person = %base, "duplicate person name, merging nodes");
                keys.push(base);
            }
        }
        Self { keys, collisions }
    }

    pub fn get(&self, id: PersonId) -> &str {
        &self.keys[id.0]
    }

    pub fn collisions(&self) -> usize {
        self.collisions
    }
}
