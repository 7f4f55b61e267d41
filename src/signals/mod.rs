// =============================================================================
// Signals Module
// =============================================================================
//
// Turns an indicator-annotated series into discrete signal events:
// - Rule sets as data (ordered condition -> kind list, first match wins)
// - Single-pass scanner over bars 1..N

pub mod rules;
pub mod scanner;

pub use rules::{RulePreset, RuleSet, SignalRule};
pub use scanner::scan;
