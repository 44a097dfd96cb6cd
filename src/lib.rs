//! # growbit
//!
//! Habit tracking engine for the Growbit app.
//!
//! Tracks daily completions per habit and derives streaks, experience,
//! levels and badges from them. State is owned by a [`engine::Tracker`]
//! and persisted through a pluggable [`store::Store`]; tracing and
//! OpenTelemetry provide observability.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod stats;
pub mod store;
pub mod telemetry;
