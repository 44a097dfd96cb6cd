//! Metric instrument factories for growbit.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without a configured provider every instrument is a no-op.

use opentelemetry::metrics::{Counter, Meter};

/// Returns the shared meter for growbit instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("growbit")
}

/// Counter: habits created.
pub fn habits_created() -> Counter<u64> {
    meter()
        .u64_counter("growbit.habit.created")
        .with_description("Number of habits created")
        .build()
}

/// Counter: habits deleted.
pub fn habits_deleted() -> Counter<u64> {
    meter()
        .u64_counter("growbit.habit.deleted")
        .with_description("Number of habits deleted")
        .build()
}

/// Counter: habit completions recorded.
pub fn completions() -> Counter<u64> {
    meter()
        .u64_counter("growbit.habit.completions")
        .with_description("Number of habit completions recorded")
        .build()
}

/// Counter: completions undone.
pub fn uncompletions() -> Counter<u64> {
    meter()
        .u64_counter("growbit.habit.uncompletions")
        .with_description("Number of habit completions undone")
        .build()
}

/// Counter: badges unlocked.
/// Labels: `badge`.
pub fn badges_unlocked() -> Counter<u64> {
    meter()
        .u64_counter("growbit.badge.unlocked")
        .with_description("Number of badges unlocked")
        .build()
}

/// Counter: persistence failures.
/// Labels: `operation` ("load" | "save" | "decode").
pub fn store_failures() -> Counter<u64> {
    meter()
        .u64_counter("growbit.store.failures")
        .with_description("Number of failed persistence operations")
        .build()
}
