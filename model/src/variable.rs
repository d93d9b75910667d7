use bcdr_collections::create_id_type;

create_id_type!(
    /// Stable index into a [`crate::Problem`]'s variable store. Assignments,
    /// literals and conflicts key on `VarId` rather than borrowing `&Variable`,
    /// so they stay `Copy`/hashable and outlive any particular borrow of the
    /// problem.
    VarId
);

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum VarKind {
    Binary,
    FiniteDomain,
}

/// A finite-domain (or binary) decision/state variable. Names are unique
/// within a [`crate::Problem`] (enforced by `add_variable`).
#[derive(Clone, Debug)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    /// Non-empty, order-preserved, de-duplicated domain. `{"True", "False"}`
    /// for binary variables.
    pub domain: Vec<String>,
    pub is_decision: bool,
}

impl Variable {
    pub fn binary(name: impl Into<String>, is_decision: bool) -> Self {
        Variable {
            name: name.into(),
            kind: VarKind::Binary,
            domain: vec!["True".to_string(), "False".to_string()],
            is_decision,
        }
    }

    pub fn finite_domain(name: impl Into<String>, domain: Vec<String>, is_decision: bool) -> Self {
        Variable {
            name: name.into(),
            kind: VarKind::FiniteDomain,
            domain,
            is_decision,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.domain.iter().any(|d| d == value)
    }
}

/// An assignment `var = value`. Canonical and value-equal: two `Assignment`s
/// are the same iff they name the same variable and the same domain value.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Assignment {
    pub var: VarId,
    pub value: String,
}

impl Assignment {
    pub fn new(var: VarId, value: impl Into<String>) -> Self {
        Assignment {
            var,
            value: value.into(),
        }
    }
}

/// A set of [`Assignment`]s. *Self-consistent* iff no two elements share a
/// variable (§3). A `BTreeSet` gives deterministic iteration order, which
/// matters for reproducing the same accepted assignment across runs (§5).
pub type PartialAssignment = std::collections::BTreeSet<Assignment>;

pub fn is_self_consistent(assignments: &PartialAssignment) -> bool {
    let distinct_vars: std::collections::HashSet<VarId> =
        assignments.iter().map(|a| a.var).collect();
    distinct_vars.len() == assignments.len()
}

/// `M` manifests `gamma` iff `gamma ⊆ M` (glossary).
pub fn manifests(assignments: &PartialAssignment, conflict: &PartialAssignment) -> bool {
    conflict.is_subset(assignments)
}

/// `M` resolves `gamma` iff `M ∪ gamma` is not self-consistent (glossary).
pub fn resolves(assignments: &PartialAssignment, conflict: &PartialAssignment) -> bool {
    let union: PartialAssignment = assignments.union(conflict).cloned().collect();
    !is_self_consistent(&union)
}
