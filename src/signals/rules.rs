// =============================================================================
// Signal Rules — ordered predicate -> kind mappings
// =============================================================================
//
// A rule set is plain data: an ordered list of `(condition, kind)` pairs.  For
// each bar the first rule whose condition holds decides the event kind, so the
// list order is the priority order.
//
// Conditions compare the bar's own close / indicator values.  A comparison
// against an undefined indicator is false, so a rule that needs a value the
// series does not have yet simply does not match.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::SignalKind;

/// Everything a condition may look at for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BarContext {
    pub close: f64,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub vwap: Option<f64>,
    pub rsi: Option<f64>,
    pub rsi_ma: Option<f64>,
    pub shooting_star: bool,
}

/// A predicate over a `BarContext`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    CloseAtOrAboveUpper,
    CloseAtOrBelowLower,
    CloseAboveVwap,
    CloseBelowVwap,
    RsiAboveMa,
    RsiBelowMa,
    RsiAbove { value: f64 },
    RsiBelow { value: f64 },
    ShootingStar,
    All { conditions: Vec<Condition> },
    Any { conditions: Vec<Condition> },
}

impl Condition {
    pub fn holds(&self, ctx: &BarContext) -> bool {
        let close = Some(ctx.close);
        match self {
            Self::CloseAtOrAboveUpper => compare(close, ctx.upper_band, |a, b| a >= b),
            Self::CloseAtOrBelowLower => compare(close, ctx.lower_band, |a, b| a <= b),
            Self::CloseAboveVwap => compare(close, ctx.vwap, |a, b| a > b),
            Self::CloseBelowVwap => compare(close, ctx.vwap, |a, b| a < b),
            Self::RsiAboveMa => compare(ctx.rsi, ctx.rsi_ma, |a, b| a > b),
            Self::RsiBelowMa => compare(ctx.rsi, ctx.rsi_ma, |a, b| a < b),
            Self::RsiAbove { value } => compare(ctx.rsi, Some(*value), |a, b| a > b),
            Self::RsiBelow { value } => compare(ctx.rsi, Some(*value), |a, b| a < b),
            Self::ShootingStar => ctx.shooting_star,
            Self::All { conditions } => conditions.iter().all(|c| c.holds(ctx)),
            Self::Any { conditions } => conditions.iter().any(|c| c.holds(ctx)),
        }
    }

    fn all(conditions: Vec<Condition>) -> Self {
        Self::All { conditions }
    }
}

fn compare(lhs: Option<f64>, rhs: Option<f64>, op: impl Fn(f64, f64) -> bool) -> bool {
    match (lhs, rhs) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

/// One entry of a rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRule {
    pub kind: SignalKind,
    pub condition: Condition,
}

/// Built-in rule sets selectable from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePreset {
    /// Band touch + VWAP side + RSI vs. its moving average, with a
    /// shooting-star reversal check in between.
    #[default]
    BreakoutReversal,
    /// Fixed RSI overbought / oversold thresholds.
    RsiThreshold,
}

impl std::fmt::Display for RulePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BreakoutReversal => write!(f, "breakout_reversal"),
            Self::RsiThreshold => write!(f, "rsi_threshold"),
        }
    }
}

/// Ordered rules; the first match wins.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    rules: Vec<SignalRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<SignalRule>) -> Self {
        Self { rules }
    }

    /// 1. Breakout          close >= upper && close > vwap && rsi > rsi_ma
    /// 2. PotentialReversal close >= upper && shooting star
    /// 3. BuySignal         close <= lower && close < vwap && rsi < rsi_ma
    pub fn breakout_reversal() -> Self {
        Self::new(vec![
            SignalRule {
                kind: SignalKind::Breakout,
                condition: Condition::all(vec![
                    Condition::CloseAtOrAboveUpper,
                    Condition::CloseAboveVwap,
                    Condition::RsiAboveMa,
                ]),
            },
            SignalRule {
                kind: SignalKind::PotentialReversal,
                condition: Condition::all(vec![
                    Condition::CloseAtOrAboveUpper,
                    Condition::ShootingStar,
                ]),
            },
            SignalRule {
                kind: SignalKind::BuySignal,
                condition: Condition::all(vec![
                    Condition::CloseAtOrBelowLower,
                    Condition::CloseBelowVwap,
                    Condition::RsiBelowMa,
                ]),
            },
        ])
    }

    pub fn rsi_threshold(overbought: f64, oversold: f64) -> Self {
        Self::new(vec![
            SignalRule {
                kind: SignalKind::RsiOverbought,
                condition: Condition::RsiAbove { value: overbought },
            },
            SignalRule {
                kind: SignalKind::RsiOversold,
                condition: Condition::RsiBelow { value: oversold },
            },
        ])
    }

    pub fn from_preset(preset: RulePreset, overbought: f64, oversold: f64) -> Self {
        match preset {
            RulePreset::BreakoutReversal => Self::breakout_reversal(),
            RulePreset::RsiThreshold => Self::rsi_threshold(overbought, oversold),
        }
    }

    /// Kind of the first rule that holds for `ctx`, if any.
    pub fn first_match(&self, ctx: &BarContext) -> Option<SignalKind> {
        self.rules
            .iter()
            .find(|rule| rule.condition.holds(ctx))
            .map(|rule| rule.kind)
    }

    pub fn rules(&self) -> &[SignalRule] {
        &self.rules
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::breakout_reversal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> BarContext {
        BarContext {
            close: 100.0,
            upper_band: Some(100.0),
            lower_band: Some(90.0),
            vwap: Some(95.0),
            rsi: Some(60.0),
            rsi_ma: Some(55.0),
            shooting_star: false,
        }
    }

    #[test]
    fn breakout_on_exact_upper_touch() {
        let rules = RuleSet::breakout_reversal();
        assert_eq!(rules.first_match(&ctx()), Some(SignalKind::Breakout));
    }

    #[test]
    fn breakout_beats_reversal() {
        let rules = RuleSet::breakout_reversal();
        let c = BarContext {
            shooting_star: true,
            ..ctx()
        };
        assert_eq!(rules.first_match(&c), Some(SignalKind::Breakout));
    }

    #[test]
    fn reversal_when_breakout_fails() {
        let rules = RuleSet::breakout_reversal();
        let c = BarContext {
            rsi: Some(50.0),
            shooting_star: true,
            ..ctx()
        };
        assert_eq!(rules.first_match(&c), Some(SignalKind::PotentialReversal));
    }

    #[test]
    fn buy_signal_below_lower() {
        let rules = RuleSet::breakout_reversal();
        let c = BarContext {
            close: 89.0,
            rsi: Some(30.0),
            rsi_ma: Some(40.0),
            ..ctx()
        };
        assert_eq!(rules.first_match(&c), Some(SignalKind::BuySignal));
    }

    #[test]
    fn undefined_rsi_ma_blocks_breakout_only() {
        let rules = RuleSet::breakout_reversal();
        let c = BarContext {
            rsi_ma: None,
            ..ctx()
        };
        assert_eq!(rules.first_match(&c), None);

        let c = BarContext {
            rsi_ma: None,
            shooting_star: true,
            ..ctx()
        };
        assert_eq!(rules.first_match(&c), Some(SignalKind::PotentialReversal));
    }

    #[test]
    fn undefined_bands_never_match() {
        let rules = RuleSet::breakout_reversal();
        let c = BarContext {
            upper_band: None,
            lower_band: None,
            shooting_star: true,
            ..ctx()
        };
        assert_eq!(rules.first_match(&c), None);
    }

    #[test]
    fn rsi_threshold_preset() {
        let rules = RuleSet::from_preset(RulePreset::RsiThreshold, 70.0, 30.0);
        let hot = BarContext { rsi: Some(75.0), ..ctx() };
        let cold = BarContext { rsi: Some(25.0), ..ctx() };
        let mid = BarContext { rsi: Some(70.0), ..ctx() };
        assert_eq!(rules.first_match(&hot), Some(SignalKind::RsiOverbought));
        assert_eq!(rules.first_match(&cold), Some(SignalKind::RsiOversold));
        assert_eq!(rules.first_match(&mid), None);
    }

    #[test]
    fn any_condition() {
        let cond = Condition::Any {
            conditions: vec![Condition::ShootingStar, Condition::RsiAbove { value: 50.0 }],
        };
        assert!(cond.holds(&ctx()));
        assert!(!cond.holds(&BarContext { rsi: None, ..ctx() }));
    }

    #[test]
    fn custom_rules_deserialise() {
        let json = r#"[
            { "kind": "rsi_oversold",
              "condition": { "type": "all", "conditions": [
                  { "type": "rsi_below", "value": 25.0 },
                  { "type": "close_below_vwap" }
              ] } }
        ]"#;
        let rules: Vec<SignalRule> = serde_json::from_str(json).unwrap();
        let set = RuleSet::new(rules);
        let c = BarContext {
            close: 90.0,
            rsi: Some(20.0),
            ..ctx()
        };
        assert_eq!(set.first_match(&c), Some(SignalKind::RsiOversold));
    }
}
