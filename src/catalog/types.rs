//! Metadata types for the indicator catalog
//!
//! Everything here is static descriptive data: what an indicator is called,
//! which parameters it exposes, and which comparison logics a condition on it
//! may select. The catalog itself never computes indicator values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current values for an indicator's parameters, keyed by parameter key.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// A single parameter value, typed instead of stringly.
///
/// Select, source and timeframe parameters store their chosen option as
/// `Text`; the schema's `ParamType` says how to interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value the way generated code expects it (no quoting).
    pub fn render(&self) -> String {
        match self {
            ParamValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

/// Declared type of a parameter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Number,
    Select,
    Boolean,
    Source,
    Timeframe,
    Text,
}

/// One choice in a select parameter or a named indicator component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl SelectOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Predicate deciding whether a parameter is visible given the current values.
pub type ShowIf = fn(&ParamMap) -> bool;

/// Schema for one configurable input of an indicator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub key: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub default: ParamValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
    pub advanced: bool,
    pub required: bool,
    /// Conditional visibility over the full current parameter map.
    /// Not serialized: the UI receives visibility through the editor.
    #[serde(skip)]
    pub show_if: Option<ShowIf>,
}

impl ParameterSpec {
    pub fn number(key: &'static str, name: &'static str, default: f64) -> Self {
        Self {
            key,
            name,
            param_type: ParamType::Number,
            default: ParamValue::Number(default),
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            description: "",
            advanced: false,
            required: true,
            show_if: None,
        }
    }

    pub fn select(key: &'static str, name: &'static str, default: &'static str, options: Vec<SelectOption>) -> Self {
        Self {
            key,
            name,
            param_type: ParamType::Select,
            default: ParamValue::Text(default.to_string()),
            min: None,
            max: None,
            step: None,
            options,
            description: "",
            advanced: false,
            required: true,
            show_if: None,
        }
    }

    pub fn boolean(key: &'static str, name: &'static str, default: bool) -> Self {
        Self {
            key,
            name,
            param_type: ParamType::Boolean,
            default: ParamValue::Bool(default),
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            description: "",
            advanced: false,
            required: true,
            show_if: None,
        }
    }

    pub fn source(key: &'static str, name: &'static str) -> Self {
        let mut spec = Self::select(key, name, "close", price_sources());
        spec.param_type = ParamType::Source;
        spec
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn show_if(mut self, predicate: ShowIf) -> Self {
        self.show_if = Some(predicate);
        self
    }

    /// Whether this parameter is visible for the given parameter values.
    pub fn is_visible(&self, params: &ParamMap) -> bool {
        match self.show_if {
            Some(predicate) => predicate(params),
            None => true,
        }
    }
}

/// Value channel expected by a logic option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicValueType {
    Number,
    String,
    Boolean,
    Select,
}

/// One selectable comparison/condition for an indicator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
    pub requires_value: bool,
    pub value_type: LogicValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<&'static str>,
    /// Whether this logic compares against another computed series rather
    /// than (or in addition to) a scalar value.
    pub custom_input: bool,
    /// Editable fields of the secondary indicator, same shape as the
    /// indicator's own parameter schema.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub logic_params: Vec<ParameterSpec>,
    /// Groups logic options that conceptually share one edited value
    /// (declared for UI grouping; value reset stays per-logic).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_key: Option<&'static str>,
}

impl LogicOption {
    /// A logic that takes a user-entered numeric value.
    pub fn numeric(value: &'static str, label: &'static str, default_value: &'static str) -> Self {
        Self {
            value,
            label,
            description: "",
            requires_value: true,
            value_type: LogicValueType::Number,
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            default_value: Some(default_value),
            custom_input: false,
            logic_params: Vec::new(),
            sync_key: None,
        }
    }

    /// A logic that needs no user value (a semantic state test).
    pub fn flag(value: &'static str, label: &'static str) -> Self {
        Self {
            value,
            label,
            description: "",
            requires_value: false,
            value_type: LogicValueType::Boolean,
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            default_value: None,
            custom_input: false,
            logic_params: Vec::new(),
            sync_key: None,
        }
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Marks this logic as comparing against a secondary indicator described
    /// by the given parameter schema.
    pub fn custom_input(mut self, logic_params: Vec<ParameterSpec>) -> Self {
        self.custom_input = true;
        self.logic_params = logic_params;
        self
    }

    pub fn sync_key(mut self, key: &'static str) -> Self {
        self.sync_key = Some(key);
        self
    }
}

/// Indicator category, used for UI grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorCategory {
    Trend,
    Momentum,
    Volatility,
    Volume,
    Price,
    Custom,
}

/// One catalog entry: everything the editor and the generators need to know
/// about an indicator, short of its math.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorMetadata {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: IndicatorCategory,
    pub parameters: Vec<ParameterSpec>,
    pub logic_options: Vec<LogicOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_logic: Option<&'static str>,
    /// Named sub-outputs (e.g. MACD line/signal/histogram).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_component: Option<&'static str>,
}

impl IndicatorMetadata {
    /// Find a logic option by key.
    pub fn logic(&self, key: &str) -> Option<&LogicOption> {
        self.logic_options.iter().find(|l| l.value == key)
    }

    /// The declared default logic, falling back to the first option.
    pub fn default_logic_option(&self) -> Option<&LogicOption> {
        self.default_logic
            .and_then(|key| self.logic(key))
            .or_else(|| self.logic_options.first())
    }

    /// Find a parameter spec by key.
    pub fn parameter(&self, key: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.key == key)
    }

    /// Fresh parameter values from the schema defaults.
    pub fn default_params(&self) -> ParamMap {
        self.parameters
            .iter()
            .map(|p| (p.key.to_string(), p.default.clone()))
            .collect()
    }

    /// Parameters shown in the main section of the editor.
    pub fn standard_parameters(&self) -> Vec<&ParameterSpec> {
        self.parameters.iter().filter(|p| !p.advanced).collect()
    }

    /// Parameters grouped into the collapsible advanced section.
    pub fn advanced_parameters(&self) -> Vec<&ParameterSpec> {
        self.parameters.iter().filter(|p| p.advanced).collect()
    }
}

/// The standard price source options shared by most indicators.
pub fn price_sources() -> Vec<SelectOption> {
    vec![
        SelectOption::new("close", "Close"),
        SelectOption::new("open", "Open"),
        SelectOption::new("high", "High"),
        SelectOption::new("low", "Low"),
        SelectOption::new("hl2", "HL2"),
        SelectOption::new("hlc3", "HLC3"),
        SelectOption::new("ohlc4", "OHLC4"),
    ]
}

/// Default parameter values for a secondary-indicator schema.
pub fn default_logic_params(schema: &[ParameterSpec]) -> ParamMap {
    schema
        .iter()
        .map(|p| (p.key.to_string(), p.default.clone()))
        .collect()
}
