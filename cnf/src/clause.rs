use bcdr_collections::{create_id_type, Store};
use std::collections::BTreeSet;

use crate::literal::Literal;

create_id_type!(
    /// Unique within the batch that produced it (§4.2); provenance for
    /// conflict extraction is traced through these indices.
    ClauseId
);

/// A disjunctive clause. `literals` is the *working* set (mutated during a
/// single unit-propagation run: satisfied clauses are dropped, falsified
/// literals removed); `literals_original` is the immutable snapshot taken at
/// construction time, used to trace unit-propagation supports back to a
/// conflict (§4.3, §9 "Conflict provenance").
#[derive(Clone, Debug)]
pub struct Clause {
    pub literals: BTreeSet<Literal>,
    pub literals_original: BTreeSet<Literal>,
}

impl Clause {
    /// Builds a simplified clause from a raw disjunct list: duplicate
    /// literals are merged and a clause containing both a literal and its
    /// complement is dropped (it is a tautology) by returning `None` (§4.2).
    pub fn new(literals: Vec<Literal>) -> Option<Clause> {
        let set: BTreeSet<Literal> = literals.into_iter().collect();
        for l in &set {
            let complement = l.negate();
            if set.contains(&complement) {
                return None;
            }
        }
        Some(Clause {
            literals_original: set.clone(),
            literals: set,
        })
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_satisfied_by(&self, assigned: &BTreeSet<Literal>) -> bool {
        self.literals.iter().any(|l| assigned.contains(l))
    }

    /// Drops every literal falsified by `assigned` (i.e. whose complement is
    /// assigned). Leaves `literals_original` untouched.
    pub fn remove_false_literals(&mut self, assigned: &BTreeSet<Literal>) {
        self.literals
            .retain(|l| !assigned.iter().any(|a| a.is_complement(l)));
    }
}

#[derive(Clone, Debug, Default)]
pub struct ClausePool {
    clauses: Store<ClauseId, Clause>,
}

impl ClausePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, clause: Clause) -> ClauseId {
        self.clauses.push(clause)
    }

    pub fn get(&self, id: ClauseId) -> &Clause {
        self.clauses.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClauseId, &Clause)> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
