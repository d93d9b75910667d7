use bcdr_collections::Store;
use itertools::Itertools;

use crate::errors::{DeclarationError, ProblemError, TypeError};
use crate::expr::Expr;
use crate::parser::{self, RawExpr};
use crate::variable::{Assignment, VarId, VarKind, Variable};

/// The propositional model of a problem instance (§4.1): variables,
/// explicit constraints, and the parser that produces typed [`Expr`]s from
/// infix strings.
#[derive(Clone, Debug, Default)]
pub struct Problem {
    variables: Store<VarId, Variable>,
    name_to_id: std::collections::HashMap<String, VarId>,
    constraints: Vec<Expr>,
}

impl Problem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        kind: VarKind,
        domain: Option<Vec<String>>,
        is_decision: bool,
    ) -> Result<VarId, DeclarationError> {
        let name = name.into();
        if self.name_to_id.contains_key(&name) {
            return Err(DeclarationError::DuplicateVariable(name));
        }
        let var = match kind {
            VarKind::Binary => {
                if domain.is_some() {
                    // binary variables always have the canonical {True, False} domain
                    tracing::debug!(variable = %name, "ignoring explicit domain for binary variable");
                }
                Variable::binary(name.clone(), is_decision)
            }
            VarKind::FiniteDomain => {
                let domain = domain.unwrap_or_default();
                if domain.is_empty() {
                    return Err(DeclarationError::EmptyDomain(name));
                }
                let domain: Vec<String> = domain.into_iter().unique().collect();
                Variable::finite_domain(name.clone(), domain, is_decision)
            }
        };
        let id = self.variables.push(var);
        self.name_to_id.insert(name, id);
        Ok(id)
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        self.variables.get(id)
    }

    pub fn variable_id(&self, name: &str) -> Option<VarId> {
        self.name_to_id.get(name).copied()
    }

    pub fn variables(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.variables.iter()
    }

    pub fn get_decision_variables(&self) -> Vec<VarId> {
        self.variables
            .iter()
            .filter(|(_, v)| v.is_decision)
            .map(|(id, _)| id)
            .collect()
    }

    /// Parses `s` per the grammar in §6 and resolves it against this
    /// problem's declared variables.
    pub fn parse_expression(&self, s: &str) -> Result<Expr, ProblemError> {
        let raw = parser::parse(s)?;
        Ok(self.typecheck(raw)?)
    }

    pub fn add_constraint(&mut self, expression: &str) -> Result<(), ProblemError> {
        let expr = self.parse_expression(expression)?;
        self.constraints.push(expr);
        Ok(())
    }

    fn typecheck(&self, raw: RawExpr) -> Result<Expr, ProblemError> {
        match raw {
            RawExpr::Term(name) => {
                let id = self
                    .name_to_id
                    .get(&name)
                    .copied()
                    .ok_or_else(|| DeclarationError::UnknownVariable(name.clone()))?;
                let var = self.variables.get(id);
                if var.kind != VarKind::Binary {
                    return Err(TypeError::BareFiniteDomainVariable(name).into());
                }
                Ok(Expr::Var(id))
            }
            RawExpr::Eq(var_name, value) => {
                let id = self
                    .name_to_id
                    .get(&var_name)
                    .copied()
                    .ok_or_else(|| DeclarationError::UnknownVariable(var_name.clone()))?;
                let var = self.variables.get(id);
                if !var.contains(&value) {
                    return Err(DeclarationError::DomainError {
                        var: var_name,
                        value,
                    }
                    .into());
                }
                Ok(Expr::Assignment(Assignment::new(id, value)))
            }
            RawExpr::Not(inner) => Ok(Expr::not(self.typecheck(*inner)?)),
            RawExpr::And(terms) => Ok(Expr::And(
                terms
                    .into_iter()
                    .map(|t| self.typecheck(t))
                    .collect::<Result<_, _>>()?,
            )),
            RawExpr::Or(terms) => Ok(Expr::Or(
                terms
                    .into_iter()
                    .map(|t| self.typecheck(t))
                    .collect::<Result<_, _>>()?,
            )),
            RawExpr::Xor(terms) => Ok(Expr::Xor(
                terms
                    .into_iter()
                    .map(|t| self.typecheck(t))
                    .collect::<Result<_, _>>()?,
            )),
            RawExpr::Implies(a, b) => Ok(Expr::Implies(
                Box::new(self.typecheck(*a)?),
                Box::new(self.typecheck(*b)?),
            )),
            RawExpr::Iff(a, b) => Ok(Expr::Iff(
                Box::new(self.typecheck(*a)?),
                Box::new(self.typecheck(*b)?),
            )),
        }
    }

    /// Implicit structural ("exactly one") constraints for every declared
    /// variable (§4.1): `V=d1 | ... | V=dk` plus pairwise
    /// `~(V=di & V=dj)` for every `i != j`.
    pub fn structural_constraints(&self) -> Vec<Expr> {
        let mut out = Vec::new();
        for (id, var) in self.variables.iter() {
            let atoms: Vec<Expr> = var
                .domain
                .iter()
                .map(|v| Expr::Assignment(Assignment::new(id, v.clone())))
                .collect();
            out.push(Expr::Or(atoms.clone()));
            for pair in atoms.iter().combinations(2) {
                let (a, b) = (pair[0].clone(), pair[1].clone());
                out.push(Expr::not(Expr::And(vec![a, b])));
            }
        }
        out
    }

    /// All constraints that must hold: the implicit structural constraints
    /// plus every explicitly declared one.
    pub fn all_constraints(&self) -> Vec<Expr> {
        let mut cs = self.structural_constraints();
        cs.extend(self.constraints.iter().cloned());
        cs
    }

    pub fn explicit_constraints(&self) -> &[Expr] {
        &self.constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Problem {
        let mut p = Problem::new();
        p.add_variable("x", VarKind::Binary, None, true).unwrap();
        p.add_variable("y", VarKind::Binary, None, true).unwrap();
        p
    }

    #[test]
    fn add_variable_rejects_duplicates() {
        let mut p = sample();
        let err = p.add_variable("x", VarKind::Binary, None, true).unwrap_err();
        assert_eq!(err, DeclarationError::DuplicateVariable("x".into()));
    }

    #[test]
    fn finite_domain_requires_nonempty_domain() {
        let mut p = Problem::new();
        let err = p
            .add_variable("v", VarKind::FiniteDomain, Some(vec![]), true)
            .unwrap_err();
        assert_eq!(err, DeclarationError::EmptyDomain("v".into()));
    }

    #[test]
    fn parse_unknown_variable_is_declaration_error() {
        let p = sample();
        let err = p.parse_expression("z").unwrap_err();
        assert!(matches!(err, ProblemError::Declaration(DeclarationError::UnknownVariable(n)) if n == "z"));
    }

    #[test]
    fn parse_bare_finite_domain_variable_is_type_error() {
        let mut p = Problem::new();
        p.add_variable(
            "path_choice",
            VarKind::FiniteDomain,
            Some(vec!["one".into(), "two".into()]),
            true,
        )
        .unwrap();
        let err = p.parse_expression("path_choice").unwrap_err();
        assert!(matches!(err, ProblemError::Type(TypeError::BareFiniteDomainVariable(_))));
    }

    #[test]
    fn parse_out_of_domain_value_is_domain_error() {
        let mut p = Problem::new();
        p.add_variable(
            "path_choice",
            VarKind::FiniteDomain,
            Some(vec!["one".into(), "two".into()]),
            true,
        )
        .unwrap();
        let err = p.parse_expression("path_choice=three").unwrap_err();
        assert!(matches!(
            err,
            ProblemError::Declaration(DeclarationError::DomainError { .. })
        ));
    }

    #[test]
    fn parse_implication_round_trip() {
        let p = sample();
        let e = p.parse_expression("x => y").unwrap();
        assert!(matches!(e, Expr::Implies(_, _)));
    }

    #[test]
    fn structural_constraints_cover_every_pair() {
        let mut p = Problem::new();
        p.add_variable(
            "v",
            VarKind::FiniteDomain,
            Some(vec!["a".into(), "b".into(), "c".into()]),
            true,
        )
        .unwrap();
        // one exactly-one disjunction + 3 pairwise negations (3 choose 2)
        assert_eq!(p.structural_constraints().len(), 4);
    }
}
