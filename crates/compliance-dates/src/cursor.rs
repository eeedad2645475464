//! Which quarterly review is next due

use caseload_types::Quarter;

/// Pick the next due quarter from the completion flags.
///
/// The cursor follows the highest completed quarter: completing Q3 moves it to
/// Q4 even while Q1 and Q2 are still open. Once Q4 is complete (or nothing is)
/// the cursor sits on Q1 for the next cycle.
pub fn next_due_quarter(completed: [bool; 4]) -> Quarter {
    match completed.iter().rposition(|done| *done) {
        Some(highest) => Quarter::ALL[highest].next(),
        None => Quarter::Q1,
    }
}
