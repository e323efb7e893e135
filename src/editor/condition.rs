//! Condition editor binder
//!
//! Keeps one `IndicatorCondition` internally consistent as the indicator,
//! logic, or individual fields change. The rules are reset-heavy on purpose:
//! parameter values belong to a schema, and switching schemas discards them
//! rather than carrying incompatible values across.

use crate::catalog::types::default_logic_params;
use crate::catalog::{Catalog, ParamValue, ParameterSpec};
use crate::models::strategy::{IndicatorCondition, SecondaryIndicator};

/// What happened to an edit. Invalid edits are soft failures: the condition
/// is left untouched, but the caller can still tell and surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edit was applied.
    Applied,
    /// The edit was invalid (e.g. non-numeric input) and dropped.
    Rejected,
    /// The edit referenced an unknown key and was a no-op.
    Ignored,
}

impl EditOutcome {
    pub fn applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

/// Stateless binder over the catalog. Conditions are owned by the caller and
/// passed in by mutable reference; every operation either applies fully or
/// leaves the condition unchanged.
pub struct ConditionEditor<'a> {
    catalog: &'a Catalog,
}

impl<'a> ConditionEditor<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Create a condition for an indicator with everything defaulted.
    /// Unknown keys yield a bare condition the generators will degrade on.
    pub fn new_condition(&self, indicator: &str) -> IndicatorCondition {
        let mut condition = IndicatorCondition::new(indicator);
        self.hydrate_defaults(&mut condition);
        condition
    }

    /// Switch the condition to a different indicator. Resets logic to the new
    /// indicator's default, parameters to schema defaults, value to the
    /// logic's default, and drops any secondary indicator: nothing from the
    /// old schema is guaranteed compatible.
    pub fn set_indicator(&self, condition: &mut IndicatorCondition, key: &str) -> EditOutcome {
        let Some(meta) = self.catalog.lookup(key) else {
            return EditOutcome::Ignored;
        };

        condition.indicator = key.to_string();
        condition.params = meta.default_params();
        condition.parameter = meta.default_component.map(str::to_string);
        condition.secondary_indicator = None;

        match meta.default_logic_option() {
            Some(logic) => {
                condition.logic = logic.value.to_string();
                condition.value = logic.default_value.unwrap_or("0").to_string();
            }
            None => {
                condition.logic = String::new();
                condition.value = "0".to_string();
            }
        }
        EditOutcome::Applied
    }

    /// Switch the condition's logic. Indicator and parameters are preserved;
    /// the value is reset because different logics have different valid
    /// ranges. Crossover logics on moving-average-family indicators get a
    /// secondary indicator initialized if none is set.
    pub fn set_logic(&self, condition: &mut IndicatorCondition, logic_key: &str) -> EditOutcome {
        let Some(meta) = self.catalog.lookup(&condition.indicator) else {
            return EditOutcome::Ignored;
        };
        let Some(logic) = meta.logic(logic_key) else {
            return EditOutcome::Ignored;
        };

        condition.logic = logic.value.to_string();
        condition.value = logic.default_value.unwrap_or("0").to_string();

        if logic.custom_input
            && self.catalog.is_moving_average(&condition.indicator)
            && condition.secondary_indicator.is_none()
        {
            if let Some(ma_key) = self.catalog.moving_average_keys().first() {
                condition.secondary_indicator = Some(SecondaryIndicator {
                    kind: ma_key.to_string(),
                    params: self.catalog.default_params(ma_key),
                });
            }
        }
        EditOutcome::Applied
    }

    /// Set the scalar comparison value. The channel is numeric: a string
    /// that does not parse is rejected and the prior value retained.
    /// `indicator:` references are catalog pointers, not scalars, and bypass
    /// the numeric gate.
    pub fn set_value(&self, condition: &mut IndicatorCondition, raw: &str) -> EditOutcome {
        let trimmed = raw.trim();
        if trimmed.starts_with("indicator:") {
            condition.value = trimmed.to_string();
            return EditOutcome::Applied;
        }
        if trimmed.parse::<f64>().is_err() {
            return EditOutcome::Rejected;
        }
        condition.value = trimmed.to_string();
        EditOutcome::Applied
    }

    /// Shallow-merge one parameter value.
    pub fn set_param(
        &self,
        condition: &mut IndicatorCondition,
        key: &str,
        value: ParamValue,
    ) -> EditOutcome {
        condition.params.insert(key.to_string(), value);
        EditOutcome::Applied
    }

    /// Select which component of a multi-output indicator the condition
    /// reads. Unknown components for the indicator are ignored.
    pub fn set_component(&self, condition: &mut IndicatorCondition, component: &str) -> EditOutcome {
        let Some(meta) = self.catalog.lookup(&condition.indicator) else {
            return EditOutcome::Ignored;
        };
        if !meta.components.iter().any(|c| c.value == component) {
            return EditOutcome::Ignored;
        }
        condition.parameter = Some(component.to_string());
        EditOutcome::Applied
    }

    /// Replace the secondary indicator entirely with the new type's
    /// defaults. Old secondary params are discarded: they may not apply.
    pub fn set_secondary_indicator(
        &self,
        condition: &mut IndicatorCondition,
        key: &str,
    ) -> EditOutcome {
        if self.catalog.lookup(key).is_none() {
            return EditOutcome::Ignored;
        }
        condition.secondary_indicator = Some(SecondaryIndicator {
            kind: key.to_string(),
            params: self.catalog.default_params(key),
        });
        EditOutcome::Applied
    }

    /// Shallow-merge one secondary-indicator parameter. No-op when no
    /// secondary indicator is set.
    pub fn set_secondary_param(
        &self,
        condition: &mut IndicatorCondition,
        key: &str,
        value: ParamValue,
    ) -> EditOutcome {
        match condition.secondary_indicator.as_mut() {
            Some(secondary) => {
                secondary.params.insert(key.to_string(), value);
                EditOutcome::Applied
            }
            None => EditOutcome::Ignored,
        }
    }

    /// Back-fill every declared parameter missing from the condition with
    /// its schema default, and pick a logic if none is set. Pure and
    /// idempotent: existing values are never overwritten, so it is safe to
    /// call at condition creation without a guard flag.
    pub fn hydrate_defaults(&self, condition: &mut IndicatorCondition) {
        let Some(meta) = self.catalog.lookup(&condition.indicator) else {
            return;
        };

        for spec in &meta.parameters {
            condition
                .params
                .entry(spec.key.to_string())
                .or_insert_with(|| spec.default.clone());
        }

        if condition.logic.is_empty() {
            if let Some(logic) = meta.default_logic_option() {
                condition.logic = logic.value.to_string();
                condition.value = logic.default_value.unwrap_or("0").to_string();
            }
        }

        if condition.parameter.is_none() {
            condition.parameter = meta.default_component.map(str::to_string);
        }

        if let Some(secondary) = condition.secondary_indicator.as_mut() {
            if let Some(logic) = meta.logic(&condition.logic) {
                let defaults = default_logic_params(&logic.logic_params);
                for (key, value) in defaults {
                    secondary.params.entry(key).or_insert(value);
                }
            }
        }
    }

    /// Parameters currently visible for the condition: no `showIf`, or the
    /// predicate holds over the current values. Hidden parameters keep their
    /// stored values so prior edits reappear when the governing field flips
    /// back.
    pub fn visible_parameters(&self, condition: &IndicatorCondition) -> Vec<&'a ParameterSpec> {
        match self.catalog.lookup(&condition.indicator) {
            Some(meta) => meta
                .parameters
                .iter()
                .filter(|spec| spec.is_visible(&condition.params))
                .collect(),
            None => Vec::new(),
        }
    }
}
