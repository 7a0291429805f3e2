//! Decision variables and hard constraints of the assignment model.
//!
//! Boolean variables exist only for feasible tuples: a variable
//! `x[s, d, k, r]` is created when staff `s` is qualified for role `r`,
//! available for `(d, k)`, and the cell carries demand. Availability and
//! qualification are therefore enforced structurally, never as constraints.

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use std::collections::BTreeMap;

use crate::normalize::CanonicalProblem;

/// Key of one assignment decision: `(staff, day, shift, role)` indices.
pub type AssignKey = (usize, usize, usize, usize);

/// Shortage variable of one demanded cell, ranging over `[0, required]`.
pub struct CellShortage {
    pub var: Variable,
    pub required: u32,
}

/// Weekly minimum-hours shortfall of one staff member, in tenths.
pub struct MinHoursShortfall {
    pub var: Variable,
    pub target_tenths: i64,
}

/// The assembled variables and hard constraints, pre-objective.
pub struct AssignmentModel {
    pub vars: ProblemVariables,
    pub assign: BTreeMap<AssignKey, Variable>,
    /// Keyed by `(day, shift, role)`.
    pub shortage: BTreeMap<(usize, usize, usize), CellShortage>,
    /// Keyed by staff index; input order, so warnings follow it.
    pub min_shortage: BTreeMap<usize, MinHoursShortfall>,
    pub constraints: Vec<Constraint>,
}

impl AssignmentModel {
    /// 0/1 expression for whether `s` works shift `k` on day `d` in any
    /// role. `None` when no assignment variable exists for the cell.
    pub fn works_cell(&self, s: usize, d: usize, k: usize) -> Option<Expression> {
        let mut vars = self
            .assign
            .range((s, d, k, 0)..=(s, d, k, usize::MAX))
            .map(|(_, v)| *v)
            .peekable();
        vars.peek()?;
        Some(vars.sum())
    }

    /// Total scheduled tenths-of-hours of staff `s`.
    pub fn weekly_hours_tenths(&self, problem: &CanonicalProblem, s: usize) -> Expression {
        let mut hours = Expression::from(0);
        for (&(_, _, k, _), &var) in self
            .assign
            .range((s, 0, 0, 0)..=(s, usize::MAX, usize::MAX, usize::MAX))
        {
            hours += problem.shifts[k].hours_tenths as f64 * var;
        }
        hours
    }
}

pub fn build_model(problem: &CanonicalProblem) -> AssignmentModel {
    let mut vars = ProblemVariables::new();

    let mut assign = BTreeMap::new();
    for &(d, k, r) in problem.demand.keys() {
        for s in 0..problem.staff.len() {
            if problem.role_rank.contains_key(&(s, r)) && problem.available.contains(&(s, d, k)) {
                assign.insert((s, d, k, r), vars.add(variable().binary()));
            }
        }
    }

    let mut shortage = BTreeMap::new();
    for (&cell, &required) in &problem.demand {
        let var = vars.add(variable().integer().min(0.0).max(required as f64));
        shortage.insert(cell, CellShortage { var, required });
    }

    let mut min_shortage = BTreeMap::new();
    for (s, member) in problem.staff.iter().enumerate() {
        let target_tenths = member.min_hours_per_week.unwrap_or(0) as i64 * 10;
        if target_tenths > 0 {
            let var = vars.add(variable().integer().min(0.0).max(target_tenths as f64));
            min_shortage.insert(
                s,
                MinHoursShortfall {
                    var,
                    target_tenths,
                },
            );
        }
    }

    let mut model = AssignmentModel {
        vars,
        assign,
        shortage,
        min_shortage,
        constraints: Vec::new(),
    };

    // At most one role per (staff, day, shift).
    let mut cell_vars: BTreeMap<(usize, usize, usize), Vec<Variable>> = BTreeMap::new();
    for (&(s, d, k, _), &var) in &model.assign {
        cell_vars.entry((s, d, k)).or_default().push(var);
    }
    for vars_in_cell in cell_vars.values() {
        if vars_in_cell.len() > 1 {
            let sum: Expression = vars_in_cell.iter().copied().sum();
            model.constraints.push(constraint!(sum <= 1));
        }
    }

    // Demand linking: assignments plus shortage cover the requirement, and
    // a demanded cell is never over-filled.
    let mut demand_vars: BTreeMap<(usize, usize, usize), Vec<Variable>> = BTreeMap::new();
    for (&(_, d, k, r), &var) in &model.assign {
        demand_vars.entry((d, k, r)).or_default().push(var);
    }
    for (cell_key, cell) in &model.shortage {
        let assigned: Expression = demand_vars
            .get(cell_key)
            .map(|vars| vars.iter().copied().sum())
            .unwrap_or_else(|| Expression::from(0));
        let required = cell.required as f64;
        model
            .constraints
            .push(constraint!(assigned.clone() + cell.var >= required));
        model.constraints.push(constraint!(assigned <= required));
    }

    // Weekly hour bounds.
    for (s, member) in problem.staff.iter().enumerate() {
        let hours = model.weekly_hours_tenths(problem, s);
        if let Some(max_hours) = member.max_hours_per_week {
            model
                .constraints
                .push(constraint!(hours.clone() <= (max_hours as i64 * 10) as f64));
        }
        if let Some(shortfall) = model.min_shortage.get(&s) {
            model.constraints.push(constraint!(
                hours + shortfall.var >= shortfall.target_tenths as f64
            ));
        }
    }

    model
}
