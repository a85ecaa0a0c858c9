//! Entity records for the generated family graph.
//!
//! Ids are plain strings with a kind-specific prefix (`id…` for persons,
//! `u…` for unions), wrapped in transparent newtypes so the two id spaces
//! cannot be mixed up at compile time while still serializing as bare
//! strings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::registry::Registry;

/// Id of a [`Person`] (`"id1"`, `"id2"`, …).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for PersonId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Id of a [`Union`] (`"u1"`, `"u2"`, …).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnionId(pub String);

impl UnionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for UnionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Gender assigned at creation. Root founders are male/female; generated
/// children are female and their introduced partners male, so every union
/// pairs one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// A person in the generated tree.
///
/// `own_unions` lists the unions this person belongs to as a partner;
/// `parent_union` is the union this person was born into (`None` for the two
/// root founders). Both fields are kept bidirectionally consistent with the
/// referenced [`Union`] records by the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub gender: Gender,
    /// Display name derived from the allocation sequence (`"Person 3"`).
    pub name: String,
    /// Derived from the allocation sequence as well; monotonically
    /// increasing in creation order.
    pub birthyear: u32,
    pub own_unions: Vec<UnionId>,
    pub parent_union: Option<UnionId>,
}

/// A partnership between (eventually) exactly two persons, with the children
/// born into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Union {
    pub id: UnionId,
    /// 0–2 partner ids. A union may be registered before both partners are
    /// attached, but by the end of construction every union holds exactly 2.
    pub partner: Vec<PersonId>,
    pub children: Vec<PersonId>,
}

/// An undirected person/union edge, serialized as a 2-element array.
///
/// Partner edges are recorded person-first, child edges union-first; the
/// builder's duplicate check treats both orders as the same edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link(pub String, pub String);

/// The assembled output of one construction pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyGraph {
    /// Id of the first person created; callers use it as a traversal root.
    pub start: PersonId,
    pub persons: Registry<PersonId, Person>,
    pub unions: Registry<UnionId, Union>,
    pub links: Vec<Link>,
}
