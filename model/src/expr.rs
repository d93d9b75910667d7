use crate::variable::{Assignment, VarId};

/// The typed propositional expression tree (§3), after post-parse typing has
/// resolved every bare identifier to a [`VarId`] and every `var=value` atom
/// to an [`Assignment`].
///
/// The specification's `Term` variant is the *pre-typing* representation of
/// a bare identifier; it only exists transiently inside the parser
/// (`parser::RawExpr::Term`) before `Problem::typecheck` resolves it to
/// either [`Expr::Var`] (a bare reference to a binary variable) or an error.
/// See `DESIGN.md` for the rationale.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Expr {
    /// A bare reference to a binary variable, equivalent to `var=True`.
    Var(VarId),
    Assignment(Assignment),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Xor(Vec<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    Iff(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn not(e: Expr) -> Expr {
        Expr::Not(Box::new(e))
    }
}
