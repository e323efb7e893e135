//! Unit tests for the condition editor binder

use stratforge::catalog::{Catalog, ParamValue};
use stratforge::editor::{ConditionEditor, EditOutcome};

#[test]
fn switching_indicator_resets_everything_schema_bound() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("rsi");
    editor.set_param(&mut condition, "period", ParamValue::Number(7.0));
    editor.set_value(&mut condition, "25");

    assert_eq!(editor.set_indicator(&mut condition, "macd"), EditOutcome::Applied);

    // Params are the new schema's defaults; the old period=7 is gone.
    assert_eq!(condition.indicator, "macd");
    assert_eq!(
        condition.params.get("fastPeriod"),
        Some(&ParamValue::Number(12.0))
    );
    assert!(condition.params.get("period").is_none());

    // Logic and value follow the new indicator's defaults.
    assert_eq!(condition.logic, "crosses_above_signal");
    assert_eq!(condition.value, "0");

    // Component defaults to the declared one.
    assert_eq!(condition.parameter.as_deref(), Some("line"));
}

#[test]
fn switching_indicator_drops_secondary() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("sma");
    editor.set_logic(&mut condition, "crosses_above");
    assert!(condition.secondary_indicator.is_some());

    editor.set_indicator(&mut condition, "rsi");
    assert!(condition.secondary_indicator.is_none());
}

#[test]
fn switching_to_unknown_indicator_is_ignored() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("rsi");
    let before = condition.clone();
    assert_eq!(
        editor.set_indicator(&mut condition, "ichimoku"),
        EditOutcome::Ignored
    );
    assert_eq!(condition, before);
}

#[test]
fn switching_logic_resets_value_only() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("rsi");
    editor.set_param(&mut condition, "period", ParamValue::Number(7.0));
    editor.set_value(&mut condition, "25");

    assert_eq!(
        editor.set_logic(&mut condition, "greater_than"),
        EditOutcome::Applied
    );

    // Value follows the new logic's default; params survive.
    assert_eq!(condition.value, "70");
    assert_eq!(
        condition.params.get("period"),
        Some(&ParamValue::Number(7.0))
    );
}

#[test]
fn unknown_logic_is_ignored() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("rsi");
    let before = condition.clone();
    assert_eq!(
        editor.set_logic(&mut condition, "teleports"),
        EditOutcome::Ignored
    );
    assert_eq!(condition, before);
}

#[test]
fn crossover_logic_auto_initializes_secondary_to_first_ma() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("ema");
    assert!(condition.secondary_indicator.is_none());

    editor.set_logic(&mut condition, "crosses_above");
    let secondary = condition.secondary_indicator.as_ref().unwrap();
    assert_eq!(secondary.kind, "sma");
    assert!(secondary.params.contains_key("period"));
}

#[test]
fn crossover_logic_keeps_existing_secondary() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("ema");
    editor.set_logic(&mut condition, "crosses_above");
    editor.set_secondary_indicator(&mut condition, "wma");

    editor.set_logic(&mut condition, "crosses_below");
    assert_eq!(condition.secondary_indicator.as_ref().unwrap().kind, "wma");
}

#[test]
fn non_ma_indicator_gets_no_auto_secondary() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("rsi");
    editor.set_logic(&mut condition, "crosses_above");
    assert!(condition.secondary_indicator.is_none());
}

#[test]
fn value_gate_rejects_non_numeric_input() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("rsi");
    assert_eq!(condition.value, "30");

    assert_eq!(editor.set_value(&mut condition, "not a number"), EditOutcome::Rejected);
    assert_eq!(condition.value, "30");

    assert_eq!(editor.set_value(&mut condition, ""), EditOutcome::Rejected);
    assert_eq!(condition.value, "30");

    assert_eq!(editor.set_value(&mut condition, " 42.5 "), EditOutcome::Applied);
    assert_eq!(condition.value, "42.5");

    assert_eq!(editor.set_value(&mut condition, "-12"), EditOutcome::Applied);
    assert_eq!(condition.value, "-12");
}

#[test]
fn indicator_reference_bypasses_numeric_gate() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("sma");
    assert_eq!(
        editor.set_value(&mut condition, "indicator:ema"),
        EditOutcome::Applied
    );
    assert!(condition.references_indicator());
    assert_eq!(condition.referenced_indicator(), Some("ema"));
}

#[test]
fn set_component_validates_against_catalog() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("macd");
    assert_eq!(editor.set_component(&mut condition, "histogram"), EditOutcome::Applied);
    assert_eq!(condition.parameter.as_deref(), Some("histogram"));

    assert_eq!(editor.set_component(&mut condition, "basis"), EditOutcome::Ignored);
    assert_eq!(condition.parameter.as_deref(), Some("histogram"));
}

#[test]
fn switching_secondary_replaces_params_with_defaults() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("sma");
    editor.set_logic(&mut condition, "crosses_above");
    editor.set_secondary_param(&mut condition, "period", ParamValue::Number(200.0));

    editor.set_secondary_indicator(&mut condition, "ema");
    let secondary = condition.secondary_indicator.as_ref().unwrap();
    assert_eq!(secondary.kind, "ema");
    assert_eq!(
        secondary.params.get("period"),
        Some(&ParamValue::Number(21.0))
    );
}

#[test]
fn hydrate_backfills_missing_params_without_overwriting() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("bollinger");
    condition.params.remove("stdDev");
    condition.params.insert("period".to_string(), ParamValue::Number(50.0));

    editor.hydrate_defaults(&mut condition);

    assert_eq!(
        condition.params.get("stdDev"),
        Some(&ParamValue::Number(2.0))
    );
    assert_eq!(
        condition.params.get("period"),
        Some(&ParamValue::Number(50.0))
    );
}

#[test]
fn visible_parameters_respect_show_if() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("price");
    let visible: Vec<&str> = editor
        .visible_parameters(&condition)
        .iter()
        .map(|p| p.key)
        .collect();
    assert!(!visible.contains(&"retestTolerance"));

    editor.set_param(&mut condition, "requireRetest", ParamValue::Bool(true));
    let visible: Vec<&str> = editor
        .visible_parameters(&condition)
        .iter()
        .map(|p| p.key)
        .collect();
    assert!(visible.contains(&"retestTolerance"));
}

#[test]
fn hidden_parameter_keeps_its_value() {
    let catalog = Catalog::new();
    let editor = ConditionEditor::new(&catalog);

    let mut condition = editor.new_condition("price");
    editor.set_param(&mut condition, "requireRetest", ParamValue::Bool(true));
    editor.set_param(&mut condition, "retestTolerance", ParamValue::Number(1.2));
    editor.set_param(&mut condition, "requireRetest", ParamValue::Bool(false));

    // The edit survives even while hidden.
    assert_eq!(
        condition.params.get("retestTolerance"),
        Some(&ParamValue::Number(1.2))
    );
}
