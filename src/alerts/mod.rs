// Fleet alert engine.
//
// Architecture:
// - model.rs: Alert record, severity and subject kinds
// - rules.rs: Per-rule evaluation over drone/base snapshots
// - engine.rs: Thresholds, rule toggles, ordered evaluation and ranking

pub mod engine;
pub mod model;
pub mod rules;
