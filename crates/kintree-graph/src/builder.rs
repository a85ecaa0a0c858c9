//! The recursive family-tree construction pass.
//!
//! All mutable state (the two entity registries, the link set, and the two id
//! counters) lives in one [`GraphBuilder`] threaded through the recursion.
//! Every [`build_data`] call constructs fresh, independent state; nothing is
//! shared across invocations, which keeps the output deterministic.
//!
//! Construction is a single synchronous depth-first pass:
//!
//! 1. create the root couple (male, then female),
//! 2. found their union,
//! 3. while the depth budget allows, give every union two children, pair
//!    each child with a newly introduced partner, and recurse.
//!
//! The depth check happens *after* a union is created and its partners are
//! linked, so a negative `max_levels` behaves exactly like 0: the root union
//! still exists, it just has no children. That quirk is intentional and
//! covered by tests.

use std::collections::HashSet;

use thiserror::Error;

use crate::model::{FamilyGraph, Gender, Link, Person, PersonId, Union, UnionId};
use crate::registry::Registry;

/// Depth used when callers have no opinion (two generations below the root
/// couple: 7 unions, 14 persons).
pub const DEFAULT_MAX_LEVELS: i32 = 2;

#[derive(Debug, Error)]
pub enum BuildError {
    /// Raised by the update-style link when the person id was never
    /// registered. The builder always creates a person before linking it, so
    /// hitting this indicates a construction bug at the call site; it is
    /// fatal, not retryable.
    #[error("person not found with id {id}")]
    EntityNotFound { id: String },
}

/// Build the genealogical test graph.
///
/// `max_levels` is the number of generations below the root couple; negative
/// values behave like 0. The result is fully deterministic: ids, names, and
/// birthyears all follow the same allocation sequence on every call.
pub fn build_data(max_levels: i32) -> Result<FamilyGraph, BuildError> {
    GraphBuilder::new(max_levels).build()
}

/// Which endpoint a recorded edge lists first. Partner edges are recorded
/// person-first, child edges union-first; deduplication ignores the order.
#[derive(Clone, Copy)]
enum LinkOrder {
    PersonFirst,
    UnionFirst,
}

/// Exclusive owner of all construction state for one generation pass.
pub struct GraphBuilder {
    max_levels: i32,
    persons: Registry<PersonId, Person>,
    unions: Registry<UnionId, Union>,
    links: Vec<Link>,
    /// Canonical `(person, union)` pairs already linked, so the duplicate
    /// check is O(1) and insensitive to which endpoint a link lists first.
    linked: HashSet<(PersonId, UnionId)>,
    person_counter: u32,
    union_counter: u32,
}

impl GraphBuilder {
    pub fn new(max_levels: i32) -> Self {
        Self {
            max_levels,
            persons: Registry::new(),
            unions: Registry::new(),
            links: Vec::new(),
            linked: HashSet::new(),
            person_counter: 0,
            union_counter: 0,
        }
    }

    /// Run the full pass and assemble the output graph.
    pub fn build(mut self) -> Result<FamilyGraph, BuildError> {
        let partner1 = self.create_person(Gender::Male, Vec::new(), None);
        let partner2 = self.create_person(Gender::Female, Vec::new(), None);
        self.create_family(&partner1, &partner2, 0)?;

        tracing::debug!(
            max_levels = self.max_levels,
            persons = self.persons.len(),
            unions = self.unions.len(),
            links = self.links.len(),
            "built family graph"
        );

        Ok(FamilyGraph {
            start: partner1,
            persons: self.persons,
            unions: self.unions,
            links: self.links,
        })
    }

    fn next_person_seq(&mut self) -> u32 {
        self.person_counter += 1;
        self.person_counter
    }

    fn next_union_id(&mut self) -> UnionId {
        self.union_counter += 1;
        UnionId(format!("u{}", self.union_counter))
    }

    /// Register a new person and link it into the supplied unions.
    ///
    /// Registration happens first, so unlike [`Self::update_person`] this
    /// cannot fail.
    pub fn create_person(
        &mut self,
        gender: Gender,
        own_unions: Vec<UnionId>,
        parent_union: Option<UnionId>,
    ) -> PersonId {
        let seq = self.next_person_seq();
        let id = PersonId(format!("id{seq}"));
        let person = Person {
            id: id.clone(),
            gender,
            name: format!("Person {seq}"),
            birthyear: seq,
            own_unions: own_unions.clone(),
            parent_union: parent_union.clone(),
        };
        self.persons.insert(id.clone(), person);
        self.link_person(&id, &own_unions, parent_union.as_ref());
        id
    }

    /// Re-link an existing person and rewrite its union fields to exactly the
    /// supplied arguments.
    ///
    /// The rewrite is a full replace, not a merge: callers must pass the
    /// person's complete intended membership every time. Unions the person
    /// was previously linked into keep their membership lists and edges; only
    /// the person-side fields are replaced.
    pub fn update_person(
        &mut self,
        id: &PersonId,
        own_unions: Vec<UnionId>,
        parent_union: Option<UnionId>,
    ) -> Result<(), BuildError> {
        if !self.persons.contains_key(id) {
            return Err(BuildError::EntityNotFound { id: id.to_string() });
        }
        self.link_person(id, &own_unions, parent_union.as_ref());
        if let Some(person) = self.persons.get_mut(id) {
            person.own_unions = own_unions;
            person.parent_union = parent_union;
        }
        Ok(())
    }

    /// Establish bidirectional consistency between a person and the unions it
    /// participates in, recording one edge per pair.
    ///
    /// Idempotent: unions and edges are only created or appended to when the
    /// person is not already attached.
    fn link_person(
        &mut self,
        person_id: &PersonId,
        own_unions: &[UnionId],
        parent_union: Option<&UnionId>,
    ) {
        for union_id in own_unions {
            match self.unions.get_mut(union_id) {
                Some(union) => {
                    if !union.partner.contains(person_id) {
                        union.partner.push(person_id.clone());
                    }
                }
                None => {
                    self.unions.insert(
                        union_id.clone(),
                        Union {
                            id: union_id.clone(),
                            partner: vec![person_id.clone()],
                            children: Vec::new(),
                        },
                    );
                }
            }
            self.record_link(person_id, union_id, LinkOrder::PersonFirst);
        }

        if let Some(union_id) = parent_union {
            match self.unions.get_mut(union_id) {
                Some(union) => {
                    if !union.children.contains(person_id) {
                        union.children.push(person_id.clone());
                    }
                }
                None => {
                    self.unions.insert(
                        union_id.clone(),
                        Union {
                            id: union_id.clone(),
                            partner: Vec::new(),
                            children: vec![person_id.clone()],
                        },
                    );
                }
            }
            self.record_link(person_id, union_id, LinkOrder::UnionFirst);
        }
    }

    fn record_link(&mut self, person_id: &PersonId, union_id: &UnionId, order: LinkOrder) {
        if !self.linked.insert((person_id.clone(), union_id.clone())) {
            return;
        }
        let link = match order {
            LinkOrder::PersonFirst => Link(person_id.0.clone(), union_id.0.clone()),
            LinkOrder::UnionFirst => Link(union_id.0.clone(), person_id.0.clone()),
        };
        self.links.push(link);
    }

    /// Found a union for the two partners and, depth permitting, spawn the
    /// next generation below it.
    fn create_family(
        &mut self,
        partner1: &PersonId,
        partner2: &PersonId,
        level: i32,
    ) -> Result<(), BuildError> {
        let union_id = self.next_union_id();

        // Each partner is re-linked with its complete membership: the new
        // union plus whatever parent union was recorded at its creation.
        let parent1 = self
            .persons
            .get(partner1)
            .and_then(|p| p.parent_union.clone());
        let parent2 = self
            .persons
            .get(partner2)
            .and_then(|p| p.parent_union.clone());
        self.update_person(partner1, vec![union_id.clone()], parent1)?;
        self.update_person(partner2, vec![union_id.clone()], parent2)?;

        if level >= self.max_levels {
            return Ok(());
        }

        for _ in 0..2 {
            let child = self.create_person(Gender::Female, Vec::new(), Some(union_id.clone()));
            let child_partner = self.create_person(Gender::Male, Vec::new(), None);
            self.create_family(&child, &child_partner, level + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: &str) -> PersonId {
        PersonId(raw.to_string())
    }

    fn uid(raw: &str) -> UnionId {
        UnionId(raw.to_string())
    }

    #[test]
    fn depth_zero_is_exactly_the_root_couple() {
        let graph = build_data(0).expect("build");

        assert_eq!(graph.start, pid("id1"));
        let keys: Vec<&str> = graph.persons.keys().map(PersonId::as_str).collect();
        assert_eq!(keys, ["id1", "id2"]);

        let p1 = graph.persons.get("id1").expect("id1");
        assert_eq!(p1.gender, Gender::Male);
        assert_eq!(p1.name, "Person 1");
        assert_eq!(p1.birthyear, 1);
        assert_eq!(p1.own_unions, vec![uid("u1")]);
        assert_eq!(p1.parent_union, None);

        let p2 = graph.persons.get("id2").expect("id2");
        assert_eq!(p2.gender, Gender::Female);
        assert_eq!(p2.name, "Person 2");
        assert_eq!(p2.birthyear, 2);
        assert_eq!(p2.own_unions, vec![uid("u1")]);
        assert_eq!(p2.parent_union, None);

        assert_eq!(graph.unions.len(), 1);
        let u1 = graph.unions.get("u1").expect("u1");
        assert_eq!(u1.partner, vec![pid("id1"), pid("id2")]);
        assert!(u1.children.is_empty());

        assert_eq!(
            graph.links,
            vec![
                Link("id1".to_string(), "u1".to_string()),
                Link("id2".to_string(), "u1".to_string()),
            ]
        );
    }

    #[test]
    fn negative_depth_behaves_like_zero() {
        let negative = build_data(-3).expect("build");
        let zero = build_data(0).expect("build");
        assert_eq!(negative, zero);
    }

    #[test]
    fn depth_one_links_partner_edges_person_first_and_child_edges_union_first() {
        let graph = build_data(1).expect("build");

        let keys: Vec<&str> = graph.persons.keys().map(PersonId::as_str).collect();
        assert_eq!(keys, ["id1", "id2", "id3", "id4", "id5", "id6"]);

        // Children keep their birth union; introduced partners have none.
        assert_eq!(graph.persons.get("id3").unwrap().parent_union, Some(uid("u1")));
        assert_eq!(graph.persons.get("id4").unwrap().parent_union, None);
        assert_eq!(graph.persons.get("id5").unwrap().parent_union, Some(uid("u1")));
        assert_eq!(graph.persons.get("id6").unwrap().parent_union, None);

        let u1 = graph.unions.get("u1").expect("u1");
        assert_eq!(u1.partner, vec![pid("id1"), pid("id2")]);
        assert_eq!(u1.children, vec![pid("id3"), pid("id5")]);

        let u2 = graph.unions.get("u2").expect("u2");
        assert_eq!(u2.partner, vec![pid("id3"), pid("id4")]);
        assert!(u2.children.is_empty());

        let expected: Vec<Link> = [
            ("id1", "u1"),
            ("id2", "u1"),
            ("u1", "id3"),
            ("id3", "u2"),
            ("id4", "u2"),
            ("u1", "id5"),
            ("id5", "u3"),
            ("id6", "u3"),
        ]
        .into_iter()
        .map(|(a, b)| Link(a.to_string(), b.to_string()))
        .collect();
        assert_eq!(graph.links, expected);
    }

    #[test]
    fn default_depth_counts() {
        let graph = build_data(DEFAULT_MAX_LEVELS).expect("build");
        assert_eq!(graph.unions.len(), 7);
        assert_eq!(graph.persons.len(), 14);
        // One edge per partner slot (2 per union) plus one per child.
        assert_eq!(graph.links.len(), 20);
    }

    #[test]
    fn updating_an_unknown_person_is_entity_not_found() {
        let mut builder = GraphBuilder::new(0);
        let err = builder
            .update_person(&pid("id99"), vec![uid("u1")], None)
            .expect_err("must fail");
        assert_eq!(err.to_string(), "person not found with id id99");
    }

    #[test]
    fn relinking_is_idempotent() {
        let mut builder = GraphBuilder::new(0);
        let person = builder.create_person(Gender::Male, Vec::new(), None);
        let union = uid("u1");

        builder
            .update_person(&person, vec![union.clone()], None)
            .expect("first link");
        builder
            .update_person(&person, vec![union.clone()], None)
            .expect("second link");

        assert_eq!(builder.unions.get("u1").unwrap().partner, vec![person.clone()]);
        assert_eq!(builder.links.len(), 1);

        // Same for the child side.
        let child = builder.create_person(Gender::Female, Vec::new(), Some(union.clone()));
        builder
            .update_person(&child, Vec::new(), Some(union.clone()))
            .expect("relink child");
        assert_eq!(builder.unions.get("u1").unwrap().children, vec![child]);
        assert_eq!(builder.links.len(), 2);
    }

    #[test]
    fn update_replaces_union_fields_wholesale() {
        let mut builder = GraphBuilder::new(0);
        let person = builder.create_person(Gender::Male, vec![uid("u1")], None);

        builder
            .update_person(&person, vec![uid("u2")], None)
            .expect("update");

        let record = builder.persons.get(person.as_str()).unwrap();
        assert_eq!(record.own_unions, vec![uid("u2")]);
        assert_eq!(record.parent_union, None);

        // Union-side state is append-only: the old membership and edge stay.
        assert!(builder.unions.get("u1").unwrap().partner.contains(&person));
        assert_eq!(builder.links.len(), 2);
    }

    #[test]
    fn child_union_is_created_on_demand_with_empty_partner_list() {
        let mut builder = GraphBuilder::new(0);
        let child = builder.create_person(Gender::Female, Vec::new(), Some(uid("u9")));

        let union = builder.unions.get("u9").expect("created on demand");
        assert!(union.partner.is_empty());
        assert_eq!(union.children, vec![child.clone()]);
        assert_eq!(
            builder.links,
            vec![Link("u9".to_string(), child.0.clone())]
        );
    }
}
