//! Strategy builder data models
//!
//! The condition language is deliberately two-level: a position rule is an OR
//! of condition groups, and each group is a flat AND or flat OR of leaf
//! conditions. There is no deeper nesting.

use serde::{Deserialize, Serialize};

use crate::catalog::ParamMap;
use crate::models::ids;
use crate::models::risk::RiskManagementConfig;

/// Auxiliary indicator a condition compares against (e.g. "crosses above
/// EMA(50)"). Present only for `customInput` logics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryIndicator {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: ParamMap,
}

/// One leaf boolean test: indicator + logic + value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorCondition {
    pub id: String,
    /// Catalog key of the indicator.
    pub indicator: String,
    /// Optional sub-output selector (e.g. which MACD component).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// Logic key, one of the indicator's logic options.
    pub logic: String,
    /// Scalar comparison value, string-encoded. Values prefixed with
    /// `indicator:` reference another indicator's series instead.
    pub value: String,
    /// Candle interval the condition evaluates on.
    pub timeframe: String,
    /// Current values for the indicator's own parameters. Missing keys imply
    /// the schema default.
    #[serde(default)]
    pub params: ParamMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_indicator: Option<SecondaryIndicator>,
}

impl IndicatorCondition {
    /// A bare condition for an indicator key; the editor hydrates defaults.
    pub fn new(indicator: impl Into<String>) -> Self {
        Self {
            id: ids::next_id("cond"),
            indicator: indicator.into(),
            parameter: None,
            logic: String::new(),
            value: "0".to_string(),
            timeframe: "1h".to_string(),
            params: ParamMap::new(),
            secondary_indicator: None,
        }
    }

    /// Whether the comparison value references another indicator's series.
    pub fn references_indicator(&self) -> bool {
        self.value.starts_with("indicator:")
    }

    /// The referenced indicator key, if `value` is an `indicator:` reference.
    pub fn referenced_indicator(&self) -> Option<&str> {
        self.value.strip_prefix("indicator:")
    }
}

/// How conditions inside a group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupOperator {
    And,
    Or,
}

impl GroupOperator {
    pub fn keyword(&self) -> &'static str {
        match self {
            GroupOperator::And => "and",
            GroupOperator::Or => "or",
        }
    }
}

/// A flat AND/OR collection of conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionGroup {
    pub id: String,
    pub conditions: Vec<IndicatorCondition>,
    pub operator: GroupOperator,
}

impl ConditionGroup {
    pub fn new(operator: GroupOperator) -> Self {
        Self {
            id: ids::next_id("group"),
            conditions: Vec::new(),
            operator,
        }
    }

    /// Evaluate the group against a leaf predicate. An empty group is false:
    /// a rule never fires on vacuous truth.
    pub fn evaluate<F>(&self, leaf: &F) -> bool
    where
        F: Fn(&IndicatorCondition) -> bool,
    {
        if self.conditions.is_empty() {
            return false;
        }
        match self.operator {
            GroupOperator::And => self.conditions.iter().all(leaf),
            GroupOperator::Or => self.conditions.iter().any(leaf),
        }
    }
}

/// An OR-of-groups expression governing one rule slot (long entry, short
/// entry, long exit, short exit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRule {
    pub id: String,
    pub condition_groups: Vec<ConditionGroup>,
}

impl PositionRule {
    pub fn new() -> Self {
        Self {
            id: ids::next_id("rule"),
            condition_groups: Vec::new(),
        }
    }

    /// Groups combine with OR; each group combines per its own operator.
    pub fn evaluate<F>(&self, leaf: &F) -> bool
    where
        F: Fn(&IndicatorCondition) -> bool,
    {
        self.condition_groups.iter().any(|group| group.evaluate(leaf))
    }

    /// Total number of leaf conditions across all groups.
    pub fn condition_count(&self) -> usize {
        self.condition_groups.iter().map(|g| g.conditions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.condition_count() == 0
    }
}

impl Default for PositionRule {
    fn default() -> Self {
        Self::new()
    }
}

/// The full strategy aggregate: four rule slots, risk management, identity.
/// This is the unit of persistence and the input to both code generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub entry_long: PositionRule,
    pub entry_short: PositionRule,
    pub exit_long: PositionRule,
    pub exit_short: PositionRule,
    pub risk_management: RiskManagementConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl StrategyConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ids::next_id("strategy"),
            name: name.into(),
            description: String::new(),
            entry_long: PositionRule::new(),
            entry_short: PositionRule::new(),
            exit_long: PositionRule::new(),
            exit_short: PositionRule::new(),
            risk_management: RiskManagementConfig::default(),
            is_public: None,
        }
    }

    /// The four rule slots in generation order.
    pub fn rules(&self) -> [(&'static str, &PositionRule); 4] {
        [
            ("entryLong", &self.entry_long),
            ("entryShort", &self.entry_short),
            ("exitLong", &self.exit_long),
            ("exitShort", &self.exit_short),
        ]
    }

    /// Sum of conditions across all four rules.
    pub fn total_conditions(&self) -> usize {
        self.rules().iter().map(|(_, rule)| rule.condition_count()).sum()
    }

    /// Every indicator key referenced anywhere, deduplicated in first-seen
    /// order, including secondary indicators.
    pub fn indicators_used(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut keys = Vec::new();
        for (_, rule) in self.rules() {
            for group in &rule.condition_groups {
                for condition in &group.conditions {
                    if seen.insert(condition.indicator.clone()) {
                        keys.push(condition.indicator.clone());
                    }
                    if let Some(secondary) = &condition.secondary_indicator {
                        if seen.insert(secondary.kind.clone()) {
                            keys.push(secondary.kind.clone());
                        }
                    }
                }
            }
        }
        keys
    }

    /// Whether any condition carries a secondary indicator.
    pub fn has_secondary_indicators(&self) -> bool {
        self.rules().iter().any(|(_, rule)| {
            rule.condition_groups.iter().any(|group| {
                group
                    .conditions
                    .iter()
                    .any(|c| c.secondary_indicator.is_some())
            })
        })
    }
}
