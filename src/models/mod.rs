//! Shared data models spanning the builder layers.

pub mod ids;
pub mod risk;
pub mod strategy;

pub use risk::{
    PositionSizingRule, PositionSizingType, RiskManagementConfig, SessionFilter, StopLossRule,
    StopLossType, TakeProfitRule, TakeProfitType, TimeExitRule, TimeExitType, TrailingStopRule,
    TrailingStopType,
};
pub use strategy::{
    ConditionGroup, GroupOperator, IndicatorCondition, PositionRule, SecondaryIndicator,
    StrategyConfig,
};
