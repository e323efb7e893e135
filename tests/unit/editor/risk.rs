//! Unit tests for risk rule list editors

use stratforge::editor::risk::{
    add_rule, remove_rule, set_position_sizing_type, set_stop_loss_type, set_take_profit_type,
    set_time_exit_type, toggle_rule,
};
use stratforge::models::{
    PositionSizingRule, PositionSizingType, StopLossRule, StopLossType, TakeProfitType,
    TimeExitRule, TimeExitType,
};

#[test]
fn add_rule_appends_family_default() {
    let rules: Vec<StopLossRule> = Vec::new();
    let rules = add_rule(&rules);
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].rule_type, StopLossType::Percentage);
    assert_eq!(rules[0].value, 2.0);
}

#[test]
fn remove_rule_preserves_siblings() {
    let rules = add_rule(&add_rule::<StopLossRule>(&[]));
    let target = rules[0].id.clone();
    let survivor = rules[1].id.clone();

    let rules = remove_rule(&rules, &target);
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].id, survivor);
}

#[test]
fn remove_unknown_id_is_noop() {
    let rules = add_rule::<StopLossRule>(&[]);
    let rules = remove_rule(&rules, "sl-does-not-exist");
    assert_eq!(rules.len(), 1);
}

#[test]
fn toggle_flips_only_the_target() {
    let rules = add_rule(&add_rule::<StopLossRule>(&[]));
    let target = rules[0].id.clone();

    let rules = toggle_rule(&rules, &target);
    assert!(!rules[0].enabled);
    assert!(rules[1].enabled);

    let rules = toggle_rule(&rules, &target);
    assert!(rules[0].enabled);
}

#[test]
fn stop_loss_type_switch_sets_atr_period() {
    let rules = add_rule::<StopLossRule>(&[]);
    let id = rules[0].id.clone();

    let rules = set_stop_loss_type(&rules, &id, StopLossType::Atr);
    assert_eq!(rules[0].rule_type, StopLossType::Atr);
    assert_eq!(rules[0].value, 1.5);
    assert_eq!(rules[0].atr_period, Some(14));

    let rules = set_stop_loss_type(&rules, &id, StopLossType::Percentage);
    assert_eq!(rules[0].atr_period, None);
    assert_eq!(rules[0].value, 2.0);
}

#[test]
fn take_profit_type_switch_resets_value() {
    let rules = add_rule::<stratforge::models::TakeProfitRule>(&[]);
    let id = rules[0].id.clone();

    let rules = set_take_profit_type(&rules, &id, TakeProfitType::RiskReward);
    assert_eq!(rules[0].rule_type, TakeProfitType::RiskReward);
    assert_eq!(rules[0].value, 2.0);
    assert_eq!(rules[0].atr_period, None);
}

#[test]
fn time_exit_type_switch_swaps_value_channels() {
    let rules = add_rule::<TimeExitRule>(&[]);
    let id = rules[0].id.clone();

    let rules = set_time_exit_type(&rules, &id, TimeExitType::Time);
    assert_eq!(rules[0].exit_time.as_deref(), Some("16:00"));

    let rules = set_time_exit_type(&rules, &id, TimeExitType::Bars);
    assert_eq!(rules[0].exit_time, None);
    assert_eq!(rules[0].value, 24.0);
}

#[test]
fn kelly_fields_cleared_when_leaving_kelly() {
    let rules = add_rule::<PositionSizingRule>(&[]);
    let id = rules[0].id.clone();

    let rules = set_position_sizing_type(&rules, &id, PositionSizingType::Kelly);
    assert_eq!(rules[0].win_rate, Some(0.5));
    assert_eq!(rules[0].payoff_ratio, Some(1.5));

    let rules = set_position_sizing_type(&rules, &id, PositionSizingType::FixedAmount);
    assert_eq!(rules[0].rule_type, PositionSizingType::FixedAmount);
    assert_eq!(rules[0].win_rate, None);
    assert_eq!(rules[0].payoff_ratio, None);
    assert_eq!(rules[0].value, 1000.0);
}

#[test]
fn setting_same_type_leaves_rule_untouched() {
    let mut rules = add_rule::<PositionSizingRule>(&[]);
    rules[0].value = 3.5;
    let id = rules[0].id.clone();

    let rules = set_position_sizing_type(&rules, &id, PositionSizingType::PercentEquity);
    assert_eq!(rules[0].value, 3.5);
}
