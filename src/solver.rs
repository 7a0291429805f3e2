//! Solve orchestration: normalisation, model assembly, HiGHS invocation,
//! and solution extraction.

use good_lp::{default_solver, ResolutionError, Solution, SolverModel};
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::domain::{
    DayOfWeek, Schedule, ScheduleRequest, SolveOutcome, SolvedSchedule, Warning,
};
use crate::model::{build_model, AssignmentModel, CellShortage, MinHoursShortfall};
use crate::normalize::{normalize, CanonicalProblem};
use crate::objective::build_objective;

/// Default wall-clock budget for one solve call, in seconds.
const DEFAULT_TIME_LIMIT_SECS: u64 = 180;

/// Message returned when the hard constraints admit no assignment at all.
const INFEASIBLE_MESSAGE: &str = "Could not generate any schedule due to \
    conflicting hard constraints (e.g. unavailability, max hours).";

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Hard wall-clock limit handed to the MILP backend.
    pub time_limit: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
        }
    }
}

/// Solves a weekly scheduling request with the default configuration.
pub fn solve(request: &ScheduleRequest) -> SolveOutcome {
    solve_with_config(request, &SolverConfig::default())
}

/// Solves a weekly scheduling request under an explicit configuration.
pub fn solve_with_config(request: &ScheduleRequest, config: &SolverConfig) -> SolveOutcome {
    let started = Instant::now();

    let problem = normalize(request);
    info!(
        staff = problem.staff.len(),
        shifts = problem.shifts.len(),
        roles = problem.roles.len(),
        demanded_cells = problem.demand.len(),
        "building assignment model"
    );

    let mut model = build_model(&problem);
    let objective = build_objective(&mut model, &problem);
    debug!(
        assignments = model.assign.len(),
        constraints = model.constraints.len(),
        "model ready"
    );

    // Nothing to decide: no demanded cell is reachable and no minimum is in
    // force. Skip the backend and report the empty week directly.
    if model.assign.is_empty() && model.shortage.is_empty() && model.min_shortage.is_empty() {
        return SolveOutcome::Solved(SolvedSchedule {
            schedule: Schedule::new(),
            warnings: Vec::new(),
            calculation_time_ms: elapsed_ms(started),
        });
    }

    let AssignmentModel {
        vars,
        assign,
        shortage,
        min_shortage,
        constraints,
    } = model;

    let mut milp = vars
        .minimise(objective)
        .using(default_solver)
        .set_option("output_flag", "false")
        .set_option("time_limit", config.time_limit.as_secs_f64());
    for c in constraints {
        milp.add_constraint(c);
    }

    let solution = match milp.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            info!("model infeasible");
            return SolveOutcome::Infeasible {
                message: INFEASIBLE_MESSAGE.to_string(),
            };
        }
        Err(ResolutionError::Unbounded) => {
            return SolveOutcome::Error {
                message: "scheduling model is unbounded".to_string(),
            };
        }
        Err(err) => {
            let message = err.to_string();
            if message.to_ascii_lowercase().contains("time") {
                // The deadline passed without any feasible incumbent.
                return SolveOutcome::Infeasible {
                    message: format!(
                        "No feasible schedule found within the {}s time limit ({message}).",
                        config.time_limit.as_secs()
                    ),
                };
            }
            return SolveOutcome::Error {
                message: format!("solver failed: {message}"),
            };
        }
    };

    // Walk the accepted assignments.
    let mut schedule = Schedule::new();
    let mut assigned_per_cell: HashMap<(usize, usize, usize), u32> = HashMap::new();
    let mut achieved_tenths: HashMap<usize, i64> = HashMap::new();
    let mut total_assignments = 0u32;
    for (&(s, d, k, r), &var) in &assign {
        if solution.value(var) > 0.5 {
            schedule
                .entry(DayOfWeek::ALL[d])
                .or_default()
                .entry(problem.shifts[k].name.clone())
                .or_default()
                .entry(problem.roles[r].clone())
                .or_default()
                .push(problem.staff[s].id.clone());
            *assigned_per_cell.entry((d, k, r)).or_default() += 1;
            *achieved_tenths.entry(s).or_default() += problem.shifts[k].hours_tenths;
            total_assignments += 1;
        }
    }

    // A roster that holds qualifications for demanded work but cannot place
    // a single person is a hard-constraint conflict, not a schedule. A
    // roster with no qualification for any demanded role is merely short,
    // exactly like an empty one.
    let any_qualified_for_demand = shortage.keys().any(|&(_, _, r)| {
        (0..problem.staff.len()).any(|s| problem.role_rank.contains_key(&(s, r)))
    });
    if total_assignments == 0 && any_qualified_for_demand {
        info!("no assignment admitted by the hard constraints");
        return SolveOutcome::Infeasible {
            message: INFEASIBLE_MESSAGE.to_string(),
        };
    }

    let warnings = collect_warnings(&problem, &shortage, &min_shortage, &assigned_per_cell, &achieved_tenths);

    let calculation_time_ms = elapsed_ms(started);
    info!(
        assignments = total_assignments,
        warnings = warnings.len(),
        calculation_time_ms,
        "schedule generated"
    );

    SolveOutcome::Solved(SolvedSchedule {
        schedule,
        warnings,
        calculation_time_ms,
    })
}

/// Demand-shortage warnings in day/shift/role order, then minimum-hours
/// warnings in staff input order.
fn collect_warnings(
    problem: &CanonicalProblem,
    shortage: &BTreeMap<(usize, usize, usize), CellShortage>,
    min_shortage: &BTreeMap<usize, MinHoursShortfall>,
    assigned_per_cell: &HashMap<(usize, usize, usize), u32>,
    achieved_tenths: &HashMap<usize, i64>,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for (&(d, k, r), cell) in shortage {
        let assigned = assigned_per_cell.get(&(d, k, r)).copied().unwrap_or(0);
        let missing = cell.required.saturating_sub(assigned);
        if missing > 0 {
            warnings.push(Warning::DemandShortage {
                day: DayOfWeek::ALL[d],
                shift: problem.shifts[k].name.clone(),
                role: problem.roles[r].clone(),
                missing,
            });
        }
    }
    for (&s, shortfall) in min_shortage {
        let achieved = achieved_tenths.get(&s).copied().unwrap_or(0);
        if achieved < shortfall.target_tenths {
            warnings.push(Warning::MinHoursShortage {
                staff_name: problem.staff[s].name.clone(),
                target_tenths: shortfall.target_tenths,
                achieved_tenths: achieved,
            });
        }
    }
    warnings
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
