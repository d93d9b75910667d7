use bcdr_model::{Assignment, Expr};
use itertools::Itertools;

use crate::clause::{Clause, ClausePool};
use crate::literal::Literal;

/// Converts a batch of typed expressions (implicit structural constraints
/// plus explicit ones, or an assignment set to be asserted) into a
/// [`ClausePool`] (§4.2).
///
/// Three passes, mirroring `cda_star/clauses.py`'s `CNFGenerator`:
/// 1. [`compile_away`] eliminates `=>`, `<=>`, `^` via their standard
///    boolean identities.
/// 2. [`to_clause_lists`] pushes negations inward (De Morgan,
///    double-negation elimination) and distributes `|` over `&`.
/// 3. [`Clause::new`] simplifies each resulting disjunct list: drops
///    tautological clauses (containing a literal and its complement) and
///    de-duplicates literals.
pub fn to_cnf(expressions: &[Expr]) -> ClausePool {
    let mut pool = ClausePool::new();
    for expr in expressions {
        let compiled = compile_away(expr.clone());
        for literals in to_clause_lists(&compiled) {
            if let Some(clause) = Clause::new(literals) {
                pool.add(clause);
            }
        }
    }
    pool
}

/// Eliminates `Implies`/`Iff`/`Xor`, leaving only `Var`/`Assignment`/`Not`/`And`/`Or`.
fn compile_away(expr: Expr) -> Expr {
    match expr {
        Expr::Var(_) | Expr::Assignment(_) => expr,
        Expr::Not(inner) => Expr::not(compile_away(*inner)),
        Expr::And(terms) => Expr::And(terms.into_iter().map(compile_away).collect()),
        Expr::Or(terms) => Expr::Or(terms.into_iter().map(compile_away).collect()),
        Expr::Xor(terms) => compile_away(expand_xor(terms)),
        Expr::Implies(a, b) => compile_away(Expr::Or(vec![Expr::not(*a), *b])),
        Expr::Iff(a, b) => compile_away(Expr::Or(vec![
            Expr::And(vec![*a.clone(), *b.clone()]),
            Expr::And(vec![Expr::not(*a), Expr::not(*b)]),
        ])),
    }
}

fn expand_xor(terms: Vec<Expr>) -> Expr {
    let disjuncts = (0..terms.len())
        .map(|i| {
            let conjuncts = terms
                .iter()
                .enumerate()
                .map(|(j, t)| if i == j { Expr::not(t.clone()) } else { t.clone() })
                .collect();
            Expr::And(conjuncts)
        })
        .collect();
    Expr::Or(disjuncts)
}

/// Converts a compiled (no `=>`/`<=>`/`^`) expression into a list of
/// disjunctive clauses, each a list of [`Literal`]s.
fn to_clause_lists(expr: &Expr) -> Vec<Vec<Literal>> {
    match expr {
        Expr::Var(id) => vec![vec![Literal::positive(Assignment::new(*id, "True"))]],
        Expr::Assignment(a) => vec![vec![Literal::positive(a.clone())]],
        Expr::Not(inner) => match inner.as_ref() {
            Expr::Var(id) => vec![vec![Literal::negative(Assignment::new(*id, "True"))]],
            Expr::Assignment(a) => vec![vec![Literal::negative(a.clone())]],
            Expr::Not(inner2) => to_clause_lists(inner2),
            Expr::And(terms) => {
                to_clause_lists(&Expr::Or(terms.iter().cloned().map(Expr::not).collect()))
            }
            Expr::Or(terms) => {
                to_clause_lists(&Expr::And(terms.iter().cloned().map(Expr::not).collect()))
            }
            // Implies/Iff/Xor never appear here: `compile_away` removes them before
            // `to_clause_lists` is called.
            Expr::Xor(_) | Expr::Implies(_, _) | Expr::Iff(_, _) => {
                unreachable!("compile_away removes Xor/Implies/Iff before CNF conversion")
            }
        },
        Expr::And(terms) => terms.iter().flat_map(to_clause_lists).collect(),
        Expr::Or(terms) => {
            let per_disjunct: Vec<Vec<Vec<Literal>>> = terms.iter().map(to_clause_lists).collect();
            cartesian_union(&per_disjunct)
        }
        Expr::Xor(_) | Expr::Implies(_, _) | Expr::Iff(_, _) => {
            unreachable!("compile_away removes Xor/Implies/Iff before CNF conversion")
        }
    }
}

/// Distributes `|` over `&`: the cross product of each disjunct's own clause
/// list, unioning the literals of each combination into one clause.
fn cartesian_union(per_disjunct: &[Vec<Vec<Literal>>]) -> Vec<Vec<Literal>> {
    per_disjunct
        .iter()
        .fold(vec![Vec::new()], |acc, clauses_for_one_disjunct| {
            acc.iter()
                .cartesian_product(clauses_for_one_disjunct.iter())
                .map(|(prefix, clause)| {
                    let mut combined = prefix.clone();
                    combined.extend(clause.iter().cloned());
                    combined
                })
                .collect()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcdr_model::{Problem, VarKind};

    fn binary_problem(names: &[&str]) -> (Problem, Vec<bcdr_model::VarId>) {
        let mut p = Problem::new();
        let ids = names
            .iter()
            .map(|n| p.add_variable(*n, VarKind::Binary, None, true).unwrap())
            .collect();
        (p, ids)
    }

    #[test]
    fn implication_becomes_clause_of_negation_and_consequent() {
        let (p, _) = binary_problem(&["x", "y"]);
        let e = p.parse_expression("x => y").unwrap();
        let pool = to_cnf(std::slice::from_ref(&e));
        assert_eq!(pool.len(), 1);
        let clause = pool.get(pool.iter().next().unwrap().0);
        assert_eq!(clause.len(), 2);
    }

    #[test]
    fn tautological_clause_is_dropped() {
        let (p, _) = binary_problem(&["x"]);
        let e = p.parse_expression("x | ~x").unwrap();
        let pool = to_cnf(std::slice::from_ref(&e));
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn conjunction_produces_one_clause_per_conjunct() {
        let (p, _) = binary_problem(&["x", "y"]);
        let e = p.parse_expression("x & y").unwrap();
        let pool = to_cnf(std::slice::from_ref(&e));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn double_negation_is_eliminated() {
        let (p, _) = binary_problem(&["x"]);
        let e = p.parse_expression("~(~x)").unwrap();
        let pool = to_cnf(std::slice::from_ref(&e));
        assert_eq!(pool.len(), 1);
        let clause = pool.get(pool.iter().next().unwrap().0);
        assert!(clause.literals.iter().next().unwrap().positive);
    }

    #[test]
    fn iff_produces_two_two_literal_clauses_after_distribution() {
        let (p, _) = binary_problem(&["x", "y"]);
        let e = p.parse_expression("x <=> y").unwrap();
        let pool = to_cnf(std::slice::from_ref(&e));
        // (x&y) | (~x&~y) distributes into (x|~x)(x|~y)(y|~x)(y|~y); the two
        // tautologies (x|~x) and (y|~y) are dropped, leaving 2 clauses.
        assert_eq!(pool.len(), 2);
    }
}
