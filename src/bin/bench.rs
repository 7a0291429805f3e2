//! Benchmark for the scheduling core.
//!
//! Run with: cargo run --release --bin bench

use restaurant_scheduling::demo_data::{self, DemoData};
use restaurant_scheduling::domain::SolveOutcome;
use restaurant_scheduling::{solver, validate};
use std::time::Instant;

fn main() {
    let dto = demo_data::generate(DemoData::Large);

    println!("Benchmark: weekly schedule solve");
    println!("  Staff: {}", dto.staff_list.len());
    println!("  Shifts: {}", dto.shift_definitions.len());
    println!(
        "  Demanded cells: {}",
        dto.weekly_needs
            .values()
            .flat_map(|day| day.values())
            .map(|roles| roles.len())
            .sum::<usize>()
    );
    println!();

    let request = validate::validate(&dto).expect("demo data must validate");

    let start = Instant::now();
    let outcome = solver::solve(&request);
    let elapsed = start.elapsed();

    match outcome {
        SolveOutcome::Solved(result) => {
            let assignments: usize = result
                .schedule
                .values()
                .flat_map(|shifts| shifts.values())
                .flat_map(|roles| roles.values())
                .map(|ids| ids.len())
                .sum();
            println!("Results:");
            println!("  Assignments: {}", assignments);
            println!("  Warnings: {}", result.warnings.len());
            println!("  Reported solve time: {} ms", result.calculation_time_ms);
            println!("  Wall time: {:.2?}", elapsed);
        }
        SolveOutcome::Infeasible { message } => {
            println!("Infeasible: {message}");
        }
        SolveOutcome::Error { message } => {
            println!("Error: {message}");
        }
    }
}
