//! Risk management configuration
//!
//! Each rule family is a list of independently toggleable records with a
//! `type` discriminant. Only the fields relevant to a record's type are
//! meaningful; the editor clears the rest on type change.

use serde::{Deserialize, Serialize};

use crate::models::ids;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopLossType {
    Percentage,
    Atr,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopLossRule {
    pub id: String,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub rule_type: StopLossType,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr_period: Option<u32>,
}

impl Default for StopLossRule {
    fn default() -> Self {
        Self {
            id: ids::next_id("sl"),
            enabled: true,
            rule_type: StopLossType::Percentage,
            value: 2.0,
            atr_period: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TakeProfitType {
    Percentage,
    Atr,
    RiskReward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeProfitRule {
    pub id: String,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub rule_type: TakeProfitType,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr_period: Option<u32>,
}

impl Default for TakeProfitRule {
    fn default() -> Self {
        Self {
            id: ids::next_id("tp"),
            enabled: true,
            rule_type: TakeProfitType::Percentage,
            value: 5.0,
            atr_period: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrailingStopType {
    Percentage,
    Atr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailingStopRule {
    pub id: String,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub rule_type: TrailingStopType,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr_period: Option<u32>,
    /// Profit percentage at which the trail activates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation: Option<f64>,
}

impl Default for TrailingStopRule {
    fn default() -> Self {
        Self {
            id: ids::next_id("ts"),
            enabled: false,
            rule_type: TrailingStopType::Percentage,
            value: 1.5,
            atr_period: None,
            activation: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeExitType {
    Bars,
    Time,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeExitRule {
    pub id: String,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub rule_type: TimeExitType,
    /// Bar count for `bars` exits.
    pub value: f64,
    /// Wall-clock exit for `time` exits, "HH:MM".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<String>,
}

impl Default for TimeExitRule {
    fn default() -> Self {
        Self {
            id: ids::next_id("te"),
            enabled: false,
            rule_type: TimeExitType::Bars,
            value: 24.0,
            exit_time: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionSizingType {
    FixedAmount,
    PercentEquity,
    RiskBased,
    Kelly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSizingRule {
    pub id: String,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub rule_type: PositionSizingType,
    pub value: f64,
    /// Kelly inputs; meaningless for other types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_ratio: Option<f64>,
}

impl Default for PositionSizingRule {
    fn default() -> Self {
        Self {
            id: ids::next_id("ps"),
            enabled: true,
            rule_type: PositionSizingType::PercentEquity,
            value: 1.0,
            win_rate: None,
            payoff_ratio: None,
        }
    }
}

/// Optional session-time filter: only trade between start and end ("HH:MM").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFilter {
    pub start: String,
    pub end: String,
}

/// The full risk configuration: five rule families plus scalar guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskManagementConfig {
    #[serde(default)]
    pub stop_loss: Vec<StopLossRule>,
    #[serde(default)]
    pub take_profit: Vec<TakeProfitRule>,
    #[serde(default)]
    pub trailing_stop: Vec<TrailingStopRule>,
    #[serde(default)]
    pub time_exit: Vec<TimeExitRule>,
    #[serde(default)]
    pub position_sizing: Vec<PositionSizingRule>,
    pub max_open_positions: u32,
    /// Percentage of equity at which the strategy halts.
    pub max_drawdown: f64,
    pub max_daily_loss: f64,
    pub max_consecutive_losses: u32,
    pub profit_target: f64,
    pub risk_reward_minimum: f64,
    pub pyramiding: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_filter: Option<SessionFilter>,
}

impl Default for RiskManagementConfig {
    fn default() -> Self {
        Self {
            stop_loss: Vec::new(),
            take_profit: Vec::new(),
            trailing_stop: Vec::new(),
            time_exit: Vec::new(),
            position_sizing: Vec::new(),
            max_open_positions: 1,
            max_drawdown: 20.0,
            max_daily_loss: 5.0,
            max_consecutive_losses: 5,
            profit_target: 0.0,
            risk_reward_minimum: 0.0,
            pyramiding: 0,
            leverage_enabled: None,
            leverage_ratio: None,
            session_filter: None,
        }
    }
}

impl RiskManagementConfig {
    /// First enabled rule of each family, the one the generators render.
    pub fn active_stop_loss(&self) -> Option<&StopLossRule> {
        self.stop_loss.iter().find(|r| r.enabled)
    }

    pub fn active_take_profit(&self) -> Option<&TakeProfitRule> {
        self.take_profit.iter().find(|r| r.enabled)
    }

    pub fn active_trailing_stop(&self) -> Option<&TrailingStopRule> {
        self.trailing_stop.iter().find(|r| r.enabled)
    }

    pub fn active_time_exit(&self) -> Option<&TimeExitRule> {
        self.time_exit.iter().find(|r| r.enabled)
    }

    pub fn active_position_sizing(&self) -> Option<&PositionSizingRule> {
        self.position_sizing.iter().find(|r| r.enabled)
    }
}
