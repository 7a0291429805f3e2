//! The five-level weighted objective.
//!
//! One minimised weighted sum stands in for lexicographic optimisation: each
//! weight exceeds the worst case of everything below it at the problem sizes
//! this service targets, so a lower level can never buy back a higher-level
//! loss. All terms are non-negative.

use good_lp::{constraint, variable, Expression};
use std::collections::HashSet;

use crate::domain::ShiftPreference;
use crate::model::AssignmentModel;
use crate::normalize::CanonicalProblem;

/// Level 1: one missing head at a demanded cell.
pub const WEIGHT_DEMAND_SHORTAGE: f64 = 10_000.0;
/// Level 2: one missing tenth-of-an-hour below a weekly minimum.
pub const WEIGHT_MIN_HOURS_SHORTAGE: f64 = 2_000.0;
/// Level 3: one half-day against the configured shift preference.
pub const WEIGHT_SHIFT_PREFERENCE: f64 = 100.0;
/// Level 4: one unworked feasible cell of a prioritised staff member.
pub const WEIGHT_STAFF_PRIORITY: f64 = 20.0;
/// Level 5: one assignment one rank below the staff member's favourite role.
pub const WEIGHT_ROLE_PREFERENCE: f64 = 10.0;

/// Builds the combined objective, adding the auxiliary full-day indicator
/// variables and their linking constraints to `model` as a side effect.
pub fn build_objective(model: &mut AssignmentModel, problem: &CanonicalProblem) -> Expression {
    let mut objective = Expression::from(0);

    // Level 1: demand shortage.
    for cell in model.shortage.values() {
        objective += WEIGHT_DEMAND_SHORTAGE * cell.var;
    }

    // Level 2: minimum-hours shortfall, in tenths.
    for shortfall in model.min_shortage.values() {
        objective += WEIGHT_MIN_HOURS_SHORTAGE * shortfall.var;
    }

    // Level 3: shift preference over contiguous same-day pairs.
    if problem.shift_preference != ShiftPreference::None {
        add_shift_preference_terms(model, problem, &mut objective);
    }

    // Level 4: staff priority. Earlier list positions carry larger
    // coefficients; the penalty counts feasible cells left unworked, which
    // keeps the term non-negative (at most one role per cell is assignable).
    let list_len = problem.staff_priority.len();
    for (position, &s) in problem.staff_priority.iter().enumerate() {
        let coefficient = (list_len - position) as f64;
        let mut cells = HashSet::new();
        let mut worked = Expression::from(0);
        for (&(_, d, k, _), &var) in model
            .assign
            .range((s, 0, 0, 0)..=(s, usize::MAX, usize::MAX, usize::MAX))
        {
            cells.insert((d, k));
            worked += var;
        }
        if !cells.is_empty() {
            let unworked = cells.len() as f64 - worked;
            objective += WEIGHT_STAFF_PRIORITY * coefficient * unworked;
        }
    }

    // Level 5: role preference. Rank 0 is free; each rank below it costs one
    // unit per assignment.
    for (&(s, _, _, r), &var) in &model.assign {
        let rank = problem.role_rank[&(s, r)];
        if rank > 0 {
            objective += WEIGHT_ROLE_PREFERENCE * rank as f64 * var;
        }
    }

    objective
}

/// Emits the per-(staff, day, pair) preference penalty.
///
/// `full` is an AND indicator over the two cell expressions: it is forced to
/// 1 exactly when both shifts of the pair are worked. `FullDays` penalises
/// the pair's half-day count `worksA + worksB - 2*full`; `HalfDays`
/// penalises `full`.
fn add_shift_preference_terms(
    model: &mut AssignmentModel,
    problem: &CanonicalProblem,
    objective: &mut Expression,
) {
    for s in 0..problem.staff.len() {
        for d in 0..crate::domain::DayOfWeek::ALL.len() {
            for &(a, b) in &problem.consecutive_pairs {
                let works_a = model.works_cell(s, d, a);
                let works_b = model.works_cell(s, d, b);
                match (works_a, works_b) {
                    (None, None) => {}
                    (Some(works), None) | (None, Some(works)) => {
                        // Only half the pair is reachable, so working it can
                        // never complete a full day.
                        if problem.shift_preference == ShiftPreference::FullDays {
                            *objective += WEIGHT_SHIFT_PREFERENCE * works;
                        }
                    }
                    (Some(works_a), Some(works_b)) => {
                        let full = model.vars.add(variable().binary());
                        model
                            .constraints
                            .push(constraint!(works_a.clone() - full >= 0));
                        model
                            .constraints
                            .push(constraint!(works_b.clone() - full >= 0));
                        model.constraints.push(constraint!(
                            works_a.clone() + works_b.clone() - full <= 1
                        ));
                        match problem.shift_preference {
                            ShiftPreference::FullDays => {
                                *objective += WEIGHT_SHIFT_PREFERENCE
                                    * (works_a + works_b - 2.0 * full);
                            }
                            ShiftPreference::HalfDays => {
                                *objective += WEIGHT_SHIFT_PREFERENCE * full;
                            }
                            ShiftPreference::None => unreachable!(),
                        }
                    }
                }
            }
        }
    }
}
