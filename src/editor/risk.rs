//! Risk rule list editors
//!
//! Every operation returns a new list so the owning strategy update is a pure
//! replace. Changing a record's type clears every field that belongs to a
//! different type: a leftover `winRate` must not survive a switch from
//! `kelly` to `fixed-amount`.

use crate::models::risk::{
    PositionSizingRule, PositionSizingType, StopLossRule, StopLossType, TakeProfitRule,
    TakeProfitType, TimeExitRule, TimeExitType, TrailingStopRule, TrailingStopType,
};

/// Common surface of all risk rule records.
pub trait RiskRecord: Clone {
    fn id(&self) -> &str;
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

macro_rules! impl_risk_record {
    ($ty:ty) => {
        impl RiskRecord for $ty {
            fn id(&self) -> &str {
                &self.id
            }
            fn set_enabled(&mut self, enabled: bool) {
                self.enabled = enabled;
            }
            fn is_enabled(&self) -> bool {
                self.enabled
            }
        }
    };
}

impl_risk_record!(StopLossRule);
impl_risk_record!(TakeProfitRule);
impl_risk_record!(TrailingStopRule);
impl_risk_record!(TimeExitRule);
impl_risk_record!(PositionSizingRule);

/// Append a fresh record with the family's defaults.
pub fn add_rule<R: RiskRecord + Default>(rules: &[R]) -> Vec<R> {
    let mut next = rules.to_vec();
    next.push(R::default());
    next
}

/// Drop the record with the given id; unrelated siblings are preserved.
pub fn remove_rule<R: RiskRecord>(rules: &[R], id: &str) -> Vec<R> {
    rules.iter().filter(|r| r.id() != id).cloned().collect()
}

/// Flip a record's enabled flag.
pub fn toggle_rule<R: RiskRecord>(rules: &[R], id: &str) -> Vec<R> {
    rules
        .iter()
        .cloned()
        .map(|mut r| {
            if r.id() == id {
                let flipped = !r.is_enabled();
                r.set_enabled(flipped);
            }
            r
        })
        .collect()
}

fn default_stop_loss_value(rule_type: StopLossType) -> f64 {
    match rule_type {
        StopLossType::Percentage => 2.0,
        StopLossType::Atr => 1.5,
        StopLossType::Fixed => 100.0,
    }
}

/// Switch a stop-loss record's type, clearing type-foreign fields.
pub fn set_stop_loss_type(
    rules: &[StopLossRule],
    id: &str,
    rule_type: StopLossType,
) -> Vec<StopLossRule> {
    rules
        .iter()
        .cloned()
        .map(|mut r| {
            if r.id == id && r.rule_type != rule_type {
                r.rule_type = rule_type;
                r.value = default_stop_loss_value(rule_type);
                r.atr_period = match rule_type {
                    StopLossType::Atr => Some(14),
                    _ => None,
                };
            }
            r
        })
        .collect()
}

fn default_take_profit_value(rule_type: TakeProfitType) -> f64 {
    match rule_type {
        TakeProfitType::Percentage => 5.0,
        TakeProfitType::Atr => 3.0,
        TakeProfitType::RiskReward => 2.0,
    }
}

pub fn set_take_profit_type(
    rules: &[TakeProfitRule],
    id: &str,
    rule_type: TakeProfitType,
) -> Vec<TakeProfitRule> {
    rules
        .iter()
        .cloned()
        .map(|mut r| {
            if r.id == id && r.rule_type != rule_type {
                r.rule_type = rule_type;
                r.value = default_take_profit_value(rule_type);
                r.atr_period = match rule_type {
                    TakeProfitType::Atr => Some(14),
                    _ => None,
                };
            }
            r
        })
        .collect()
}

pub fn set_trailing_stop_type(
    rules: &[TrailingStopRule],
    id: &str,
    rule_type: TrailingStopType,
) -> Vec<TrailingStopRule> {
    rules
        .iter()
        .cloned()
        .map(|mut r| {
            if r.id == id && r.rule_type != rule_type {
                r.rule_type = rule_type;
                r.value = match rule_type {
                    TrailingStopType::Percentage => 1.5,
                    TrailingStopType::Atr => 2.0,
                };
                r.atr_period = match rule_type {
                    TrailingStopType::Atr => Some(14),
                    TrailingStopType::Percentage => None,
                };
            }
            r
        })
        .collect()
}

pub fn set_time_exit_type(
    rules: &[TimeExitRule],
    id: &str,
    rule_type: TimeExitType,
) -> Vec<TimeExitRule> {
    rules
        .iter()
        .cloned()
        .map(|mut r| {
            if r.id == id && r.rule_type != rule_type {
                r.rule_type = rule_type;
                match rule_type {
                    TimeExitType::Bars => {
                        r.value = 24.0;
                        r.exit_time = None;
                    }
                    TimeExitType::Time => {
                        r.value = 0.0;
                        r.exit_time = Some("16:00".to_string());
                    }
                }
            }
            r
        })
        .collect()
}

fn default_position_sizing_value(rule_type: PositionSizingType) -> f64 {
    match rule_type {
        PositionSizingType::FixedAmount => 1000.0,
        PositionSizingType::PercentEquity => 1.0,
        PositionSizingType::RiskBased => 1.0,
        PositionSizingType::Kelly => 0.5,
    }
}

pub fn set_position_sizing_type(
    rules: &[PositionSizingRule],
    id: &str,
    rule_type: PositionSizingType,
) -> Vec<PositionSizingRule> {
    rules
        .iter()
        .cloned()
        .map(|mut r| {
            if r.id == id && r.rule_type != rule_type {
                r.rule_type = rule_type;
                r.value = default_position_sizing_value(rule_type);
                match rule_type {
                    PositionSizingType::Kelly => {
                        r.win_rate = Some(0.5);
                        r.payoff_ratio = Some(1.5);
                    }
                    _ => {
                        r.win_rate = None;
                        r.payoff_ratio = None;
                    }
                }
            }
            r
        })
        .collect()
}
