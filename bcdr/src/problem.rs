use std::collections::HashMap;

use bcdr_dc::BellmanFordDcChecker;
use bcdr_model::{VarId, VarKind};
use bcdr_relax::BnbMilpSolver;
use bcdr_tpn::{ConstraintId, DcChecker, EventId, Network, TpnConstraint};

use crate::error::BuildError;
use crate::outcome::Outcome;
use crate::search;

/// The solver-facing facade (§4.1, §4.4, §6): a propositional [`bcdr_model::Problem`]
/// plus a [`Network`] of temporal constraints over name-interned events, and
/// the per-assignment rewards the search maximizes.
#[derive(Clone, Debug, Default)]
pub struct Problem {
    pub(crate) model: bcdr_model::Problem,
    pub(crate) network: Network,
    events: HashMap<String, EventId>,
    pub(crate) rewards: HashMap<VarId, HashMap<String, f64>>,
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
    ) -> Result<VarId, BuildError> {
        Ok(self.model.add_variable(name, kind, domain, is_decision)?)
    }

    pub fn add_constraint(&mut self, expression: &str) -> Result<(), BuildError> {
        Ok(self.model.add_constraint(expression)?)
    }

    /// Interns an event name to a stable [`EventId`]; [`Network`] itself is
    /// name-agnostic (§3), so this registry is the only place event names
    /// are remembered.
    fn event(&mut self, name: &str) -> EventId {
        let next = EventId::from_u32(self.events.len() as u32);
        *self.events.entry(name.to_string()).or_insert(next)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_temporal_constraint(
        &mut self,
        start: &str,
        end: &str,
        label: Option<&str>,
        lb: f64,
        ub: f64,
        name: impl Into<String>,
        lb_relaxable: bool,
        ub_relaxable: bool,
        lb_lin_cost: f64,
        ub_lin_cost: f64,
    ) -> Result<ConstraintId, BuildError> {
        let start = self.event(start);
        let end = self.event(end);
        let label = label.map(|l| self.model.parse_expression(l)).transpose()?;
        Ok(self.network.add_constraint(TpnConstraint::new(
            start,
            end,
            label,
            lb,
            ub,
            name,
            lb_relaxable,
            ub_relaxable,
            lb_lin_cost,
            ub_lin_cost,
        )))
    }

    /// Sets the reward contributed by assigning `var = value` (§4.7's
    /// reward function, summed over a complete assignment).
    pub fn set_reward(&mut self, var: VarId, value: impl Into<String>, reward: f64) {
        self.rewards.entry(var).or_default().insert(value.into(), reward);
    }

    pub fn variable_id(&self, name: &str) -> Option<VarId> {
        self.model.variable_id(name)
    }

    /// Runs the search with the reference backends: [`BellmanFordDcChecker`]
    /// for dynamic controllability and [`BnbMilpSolver`] for relaxation.
    pub fn run(&self) -> Outcome {
        let mut dc = BellmanFordDcChecker::new();
        let mut milp = BnbMilpSolver::new();
        self.run_with(&mut dc, &mut milp)
    }

    /// Runs the search against caller-supplied backends (§6 "DC checker
    /// contract", "MILP solver contract") — e.g. an external DC checker or
    /// MILP solver swapped in for the bundled reference implementations.
    pub fn run_with(&self, dc: &mut dyn DcChecker, milp: &mut dyn bcdr_relax::MilpSolver) -> Outcome {
        search::run(self, dc, milp)
    }
}
