//! Unit tests for the pseudocode generator

use stratforge::catalog::Catalog;
use stratforge::codegen::PseudocodeGenerator;
use stratforge::editor::ConditionEditor;
use stratforge::models::{
    ConditionGroup, GroupOperator, PositionSizingRule, PositionSizingType, StopLossRule,
    StrategyConfig,
};

fn strategy_with_entry(conditions: Vec<stratforge::models::IndicatorCondition>) -> StrategyConfig {
    let mut strategy = StrategyConfig::new("Readable Strategy");
    let mut group = ConditionGroup::new(GroupOperator::And);
    group.conditions = conditions;
    strategy.entry_long.condition_groups.push(group);
    strategy
}

#[test]
fn document_has_all_sections() {
    let catalog = Catalog::new();
    let strategy = StrategyConfig::new("Sections");
    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);

    assert!(text.contains("STRATEGY: Sections"));
    assert!(text.contains("ENTRY LONG:"));
    assert!(text.contains("ENTRY SHORT:"));
    assert!(text.contains("EXIT LONG:"));
    assert!(text.contains("EXIT SHORT:"));
    assert!(text.contains("RISK MANAGEMENT:"));
}

#[test]
fn empty_rule_states_no_conditions() {
    let catalog = Catalog::new();
    let strategy = StrategyConfig::new("Empty");
    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(text.contains("(no conditions defined)"));
}

#[test]
fn description_renders_under_the_title() {
    let catalog = Catalog::new();
    let mut strategy = StrategyConfig::new("Described");
    strategy.description = "Buys oversold dips.".to_string();
    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(text.contains("Buys oversold dips."));
}

#[test]
fn conditions_read_as_sentences() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);
    let strategy = strategy_with_entry(vec![editor.new_condition("rsi")]);

    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(text.contains("Relative Strength Index is less than 30"));
    assert!(text.contains("THEN OPEN LONG POSITION"));
}

#[test]
fn and_joiner_appears_between_conditions() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);
    let rsi = editor.new_condition("rsi");
    let mut macd = editor.new_condition("macd");
    editor.set_logic(&mut macd, "histogram_positive");
    let strategy = strategy_with_entry(vec![rsi, macd]);

    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(text.contains("Relative Strength Index is less than 30 AND"));
    assert!(text.contains("histogram is positive"));
}

#[test]
fn groups_separated_by_or_lines() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut strategy = StrategyConfig::new("Two Groups");
    let mut g1 = ConditionGroup::new(GroupOperator::And);
    g1.conditions.push(editor.new_condition("rsi"));
    let mut g2 = ConditionGroup::new(GroupOperator::And);
    g2.conditions.push(editor.new_condition("cci"));
    strategy.entry_long.condition_groups.push(g1);
    strategy.entry_long.condition_groups.push(g2);

    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(text.contains("  OR\n"));
}

#[test]
fn secondary_indicator_described_inline() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);
    let mut condition = editor.new_condition("ema");
    editor.set_logic(&mut condition, "crosses_above");
    let strategy = strategy_with_entry(vec![condition]);

    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(text.contains("Exponential Moving Average crosses above SMA(20) of close"));
}

#[test]
fn unknown_logic_passes_through() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);
    let mut condition = editor.new_condition("rsi");
    condition.logic = "wobbles".to_string();
    condition.value = "42".to_string();
    let strategy = strategy_with_entry(vec![condition]);

    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(text.contains("Relative Strength Index wobbles 42"));
}

#[test]
fn nondefault_timeframe_is_mentioned() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);
    let mut condition = editor.new_condition("rsi");
    condition.timeframe = "4h".to_string();
    let strategy = strategy_with_entry(vec![condition]);

    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(text.contains("on the 4h timeframe"));
}

#[test]
fn risk_section_lists_every_enabled_rule_and_guards() {
    let catalog = Catalog::new();
    let mut strategy = StrategyConfig::new("Risky");
    strategy.risk_management.stop_loss.push(StopLossRule::default());
    strategy.risk_management.position_sizing.push(PositionSizingRule {
        rule_type: PositionSizingType::Kelly,
        value: 0.5,
        win_rate: Some(0.6),
        payoff_ratio: Some(2.0),
        ..PositionSizingRule::default()
    });

    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(text.contains("Stop loss at 2% below entry price"));
    assert!(text.contains("Kelly fraction 0.5 (win rate 0.6, payoff 2)"));
    assert!(text.contains("Maximum 1 open position(s)"));
    assert!(text.contains("Halt trading at 20% drawdown"));
    assert!(text.contains("Pause after 5 consecutive losses"));
}

#[test]
fn scalar_guards_render_unconditionally() {
    let catalog = Catalog::new();
    let mut strategy = StrategyConfig::new("Guarded");
    strategy.risk_management.profit_target = 30.0;
    strategy.risk_management.risk_reward_minimum = 1.5;
    strategy.risk_management.pyramiding = 2;

    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(text.contains("Profit target at 30%"));
    assert!(text.contains("Minimum 1.5:1 reward-to-risk on entries"));
    assert!(text.contains("Pyramiding: 2 additional entries allowed"));

    // Guards are listed even at their defaults.
    let plain = StrategyConfig::new("Plain");
    let text = PseudocodeGenerator::new(&catalog).generate(&plain);
    assert!(text.contains("Profit target at 0%"));
    assert!(text.contains("Minimum 0:1 reward-to-risk on entries"));
    assert!(text.contains("Pyramiding: 0 additional entries allowed"));
}

#[test]
fn disabled_rules_are_omitted() {
    let catalog = Catalog::new();
    let mut strategy = StrategyConfig::new("Quiet");
    let mut rule = StopLossRule::default();
    rule.enabled = false;
    strategy.risk_management.stop_loss.push(rule);

    let text = PseudocodeGenerator::new(&catalog).generate(&strategy);
    assert!(!text.contains("Stop loss at"));
}

#[test]
fn generation_is_deterministic() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);
    let strategy = strategy_with_entry(vec![editor.new_condition("bollinger")]);

    let generator = PseudocodeGenerator::new(&catalog);
    assert_eq!(generator.generate(&strategy), generator.generate(&strategy));
}
