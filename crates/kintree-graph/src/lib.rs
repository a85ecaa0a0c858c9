//! Kintree: deterministic genealogical test graphs.
//!
//! This crate synthesizes a bounded-depth family tree of [`Person`] and
//! [`Union`] (partnership) entities connected by a deduplicated undirected
//! edge set. The output is fixture data: every run with the same depth
//! produces the identical graph, which makes it suitable for visualization
//! demos and for exercising graph algorithms against a known shape.
//!
//! The generated structure is a perfect binary tree of families: every union
//! has exactly two partners, and every non-leaf union has exactly two
//! children, each of whom is paired with a newly introduced partner and
//! recursively founds the next generation.
//!
//! ## Module Organization
//!
//! - `model`: entity records ([`Person`], [`Union`], [`Link`], [`FamilyGraph`])
//! - `registry`: insertion-order-preserving id → entity mappings
//! - `builder`: id allocation, person/union linking, and the recursive
//!   construction pass ([`build_data`])
//!
//! ## Example
//!
//! ```
//! use kintree_graph::build_data;
//!
//! let graph = build_data(2).expect("construction is self-contained");
//! assert_eq!(graph.start.as_str(), "id1");
//! assert_eq!(graph.unions.len(), 7); // 2^(2+1) - 1
//! assert_eq!(graph.persons.len(), 14);
//! ```

pub mod builder;
pub mod model;
pub mod registry;

// Re-export key types
pub use builder::{build_data, BuildError, GraphBuilder, DEFAULT_MAX_LEVELS};
pub use model::{FamilyGraph, Gender, Link, Person, PersonId, Union, UnionId};
pub use registry::Registry;
