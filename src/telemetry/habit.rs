//! Habit operation span helpers.

use tracing::Span;

use crate::model::HabitId;

/// Start a span for a habit operation.
///
/// The `habit.streak` field is declared empty and can be filled via
/// [`record_streak`] once the operation knows the new streak.
pub fn start_habit_span(operation: &str, id: &HabitId) -> Span {
    tracing::info_span!(
        "habit.operation",
        "habit.operation" = operation,
        "habit.id" = %id,
        "habit.streak" = tracing::field::Empty,
    )
}

/// Record the resulting streak on the span.
pub fn record_streak(span: &Span, streak: u32) {
    span.record("habit.streak", streak);
}
