use bcdr_model::Assignment;

/// A signed atom: `(assignment, polarity)`. Atoms are [`Assignment`]s (§3),
/// after CNF conversion has resolved every bare variable reference to
/// `var=True`/`var=False`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Literal {
    pub atom: Assignment,
    pub positive: bool,
}

impl Literal {
    pub fn new(atom: Assignment, positive: bool) -> Self {
        Literal { atom, positive }
    }

    pub fn positive(atom: Assignment) -> Self {
        Literal::new(atom, true)
    }

    pub fn negative(atom: Assignment) -> Self {
        Literal::new(atom, false)
    }

    /// The complement literal: same atom, opposite polarity (§3).
    pub fn negate(&self) -> Literal {
        Literal::new(self.atom.clone(), !self.positive)
    }

    /// Two literals are complements iff same atom, opposite polarity (§3).
    pub fn is_complement(&self, other: &Literal) -> bool {
        self.atom == other.atom && self.positive != other.positive
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.positive {
            write!(f, "{}={}", self.atom.var, self.atom.value)
        } else {
            write!(f, "~{}={}", self.atom.var, self.atom.value)
        }
    }
}
