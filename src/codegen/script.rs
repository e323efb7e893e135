//! Pine-style script generator
//!
//! Emits, in order: the strategy declaration and risk inputs, one indicator
//! definition per distinct indicator, the four boolean rule expressions, risk
//! management statements, the execution block, and chart plots. Output is
//! deterministic: the same strategy always renders byte-identical text.

use std::fmt::Write as FmtWrite;

use crate::catalog::Catalog;
use crate::codegen::{
    collect_indicators, logic_token, secondary_expression, source_expression, variable_name,
    IndicatorUse, LogicToken,
};
use crate::models::risk::{StopLossType, TakeProfitType, TrailingStopType};
use crate::models::strategy::{ConditionGroup, IndicatorCondition, PositionRule, StrategyConfig};

pub struct ScriptGenerator<'a> {
    catalog: &'a Catalog,
}

impl<'a> ScriptGenerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Render the full script. Pure: the strategy is not mutated.
    pub fn generate(&self, strategy: &StrategyConfig) -> String {
        let mut out = String::with_capacity(4096);
        let indicators = collect_indicators(strategy);

        self.header(&mut out, strategy);
        self.indicator_definitions(&mut out, &indicators);
        self.rule_expressions(&mut out, strategy);
        self.risk_statements(&mut out, strategy, &indicators);
        self.execution(&mut out, strategy);
        self.plots(&mut out, &indicators);
        out
    }

    fn header(&self, out: &mut String, strategy: &StrategyConfig) {
        let risk = &strategy.risk_management;
        let risk_per_trade = risk
            .active_position_sizing()
            .map(|r| r.value)
            .unwrap_or(1.0);

        writeln!(out, "//@version=5").ok();
        writeln!(
            out,
            "strategy(\"{}\", overlay=true, initial_capital=10000, pyramiding={})",
            strategy.name, risk.pyramiding
        )
        .ok();
        writeln!(out).ok();
        writeln!(
            out,
            "riskPerTrade = input.float({}, \"Risk Per Trade (%)\", minval=0.1)",
            format_num(risk_per_trade)
        )
        .ok();
        writeln!(
            out,
            "maxPositions = input.int({}, \"Max Open Positions\", minval=1)",
            risk.max_open_positions
        )
        .ok();
        writeln!(
            out,
            "maxDrawdown = input.float({}, \"Max Drawdown (%)\", minval=1)",
            format_num(risk.max_drawdown)
        )
        .ok();
        writeln!(out).ok();
    }

    fn indicator_definitions(&self, out: &mut String, indicators: &[IndicatorUse]) {
        if indicators.is_empty() {
            return;
        }
        writeln!(out, "// Indicators").ok();
        for ind in indicators {
            let var = variable_name(&ind.key);
            let expr = source_expression(self.catalog, &ind.key, &ind.params);
            match ind.key.as_str() {
                "macd" => {
                    writeln!(out, "[{var}, {var}Signal, {var}Hist] = {expr}").ok();
                }
                "bollinger" => {
                    writeln!(out, "[{var}, {var}Upper, {var}Lower] = {expr}").ok();
                }
                "adx" => {
                    writeln!(out, "[{var}PlusDi, {var}MinusDi, {var}] = {expr}").ok();
                }
                "supertrend" => {
                    writeln!(out, "[{var}, {var}Dir] = {expr}").ok();
                }
                "stochastic" => {
                    writeln!(out, "{var} = {expr}").ok();
                    let d_period = ind
                        .params
                        .get("dPeriod")
                        .and_then(|v| v.as_number())
                        .unwrap_or(3.0);
                    writeln!(out, "{var}D = ta.sma({var}, {})", format_num(d_period)).ok();
                }
                "volume" => {
                    writeln!(out, "{var} = {expr}").ok();
                    let ma = ind
                        .params
                        .get("maPeriod")
                        .and_then(|v| v.as_number())
                        .unwrap_or(20.0);
                    writeln!(out, "{var}Avg = ta.sma(volume, {})", format_num(ma)).ok();
                }
                _ => {
                    writeln!(out, "{var} = {expr}").ok();
                }
            }
        }
        writeln!(out).ok();
    }

    fn rule_expressions(&self, out: &mut String, strategy: &StrategyConfig) {
        writeln!(out, "// Conditions").ok();
        let slots = [
            ("longEntryCondition", &strategy.entry_long),
            ("shortEntryCondition", &strategy.entry_short),
            ("longExitCondition", &strategy.exit_long),
            ("shortExitCondition", &strategy.exit_short),
        ];
        for (name, rule) in slots {
            writeln!(out, "{} = {}", name, self.rule_expression(rule)).ok();
        }
        writeln!(out).ok();
    }

    /// `group1 or group2 or ...`; an empty rule renders `false` so a missing
    /// slot can never fire.
    fn rule_expression(&self, rule: &PositionRule) -> String {
        let groups: Vec<String> = rule
            .condition_groups
            .iter()
            .filter(|g| !g.conditions.is_empty())
            .map(|g| self.group_expression(g))
            .collect();
        if groups.is_empty() {
            return "false".to_string();
        }
        groups.join(" or ")
    }

    fn group_expression(&self, group: &ConditionGroup) -> String {
        let parts: Vec<String> = group
            .conditions
            .iter()
            .map(|c| self.condition_expression(c))
            .collect();
        format!("({})", parts.join(&format!(" {} ", group.operator.keyword())))
    }

    /// Render one leaf condition. Unknown indicators and unknown logic keys
    /// degrade into a literal `<var> <logic> <value>` token.
    fn condition_expression(&self, condition: &IndicatorCondition) -> String {
        let var = self.component_variable(condition);
        match logic_token(&condition.logic) {
            LogicToken::Compare(op) => format!("{} {} {}", var, op, condition.value),
            LogicToken::Crossover(func) => {
                if let Some(other) = condition.referenced_indicator() {
                    format!("{}({}, {})", func, var, variable_name(other))
                } else if let Some(secondary) = &condition.secondary_indicator {
                    let expr =
                        secondary_expression(self.catalog, &secondary.kind, &secondary.params);
                    format!("{}({}, {})", func, var, expr)
                } else {
                    format!("{}({}, {})", func, var, condition.value)
                }
            }
            LogicToken::Phrase(template) => template
                .replace("{var}", &var)
                .replace("{value}", &condition.value),
            LogicToken::Unknown => {
                format!("{} {} {}", var, condition.logic, condition.value)
            }
        }
    }

    /// Variable for the condition's selected component, e.g. the MACD signal
    /// line reads `macdValueSignal`.
    fn component_variable(&self, condition: &IndicatorCondition) -> String {
        let base = variable_name(&condition.indicator);
        let Some(component) = condition.parameter.as_deref() else {
            return base;
        };
        let suffix = match (condition.indicator.as_str(), component) {
            ("macd", "signal") => "Signal",
            ("macd", "histogram") => "Hist",
            ("bollinger", "upper") => "Upper",
            ("bollinger", "lower") => "Lower",
            ("stochastic", "d") => "D",
            ("adx", "plus_di") => "PlusDi",
            ("adx", "minus_di") => "MinusDi",
            _ => "",
        };
        format!("{}{}", base, suffix)
    }

    fn risk_statements(
        &self,
        out: &mut String,
        strategy: &StrategyConfig,
        indicators: &[IndicatorUse],
    ) {
        let risk = &strategy.risk_management;
        writeln!(out, "// Risk management").ok();

        // ATR-based rules need an ATR series even when no condition uses one.
        let atr_var = if indicators.iter().any(|i| i.key == "atr") {
            variable_name("atr")
        } else {
            "riskAtr".to_string()
        };
        let needs_risk_atr = atr_var == "riskAtr"
            && (matches!(risk.active_stop_loss().map(|r| r.rule_type), Some(StopLossType::Atr))
                || matches!(
                    risk.active_take_profit().map(|r| r.rule_type),
                    Some(TakeProfitType::Atr)
                )
                || matches!(
                    risk.active_trailing_stop().map(|r| r.rule_type),
                    Some(TrailingStopType::Atr)
                ));
        if needs_risk_atr {
            let period = risk
                .active_stop_loss()
                .and_then(|r| r.atr_period)
                .or_else(|| risk.active_take_profit().and_then(|r| r.atr_period))
                .or_else(|| risk.active_trailing_stop().and_then(|r| r.atr_period))
                .unwrap_or(14);
            writeln!(out, "riskAtr = ta.atr({})", period).ok();
        }

        match risk.active_stop_loss() {
            Some(rule) => match rule.rule_type {
                StopLossType::Percentage => {
                    let v = format_num(rule.value);
                    writeln!(out, "stopLossLong = strategy.position_avg_price * (1 - {v} / 100)").ok();
                    writeln!(out, "stopLossShort = strategy.position_avg_price * (1 + {v} / 100)").ok();
                }
                StopLossType::Atr => {
                    let v = format_num(rule.value);
                    writeln!(out, "stopLossLong = strategy.position_avg_price - {atr_var} * {v}").ok();
                    writeln!(out, "stopLossShort = strategy.position_avg_price + {atr_var} * {v}").ok();
                }
                StopLossType::Fixed => {
                    let v = format_num(rule.value);
                    writeln!(out, "stopLossLong = strategy.position_avg_price - {v}").ok();
                    writeln!(out, "stopLossShort = strategy.position_avg_price + {v}").ok();
                }
            },
            None => {
                // Default 2% protective stop.
                writeln!(out, "stopLossLong = strategy.position_avg_price * (1 - 2 / 100)").ok();
                writeln!(out, "stopLossShort = strategy.position_avg_price * (1 + 2 / 100)").ok();
            }
        }

        match risk.active_take_profit() {
            Some(rule) => match rule.rule_type {
                TakeProfitType::Percentage => {
                    let v = format_num(rule.value);
                    writeln!(out, "takeProfitLong = strategy.position_avg_price * (1 + {v} / 100)").ok();
                    writeln!(out, "takeProfitShort = strategy.position_avg_price * (1 - {v} / 100)").ok();
                }
                TakeProfitType::Atr => {
                    let v = format_num(rule.value);
                    writeln!(out, "takeProfitLong = strategy.position_avg_price + {atr_var} * {v}").ok();
                    writeln!(out, "takeProfitShort = strategy.position_avg_price - {atr_var} * {v}").ok();
                }
                TakeProfitType::RiskReward => {
                    let v = format_num(rule.value);
                    writeln!(
                        out,
                        "takeProfitLong = strategy.position_avg_price + (strategy.position_avg_price - stopLossLong) * {v}"
                    )
                    .ok();
                    writeln!(
                        out,
                        "takeProfitShort = strategy.position_avg_price - (stopLossShort - strategy.position_avg_price) * {v}"
                    )
                    .ok();
                }
            },
            None => {
                // Default 5% target.
                writeln!(out, "takeProfitLong = strategy.position_avg_price * (1 + 5 / 100)").ok();
                writeln!(out, "takeProfitShort = strategy.position_avg_price * (1 - 5 / 100)").ok();
            }
        }

        if let Some(rule) = risk.active_trailing_stop() {
            let v = format_num(rule.value);
            match rule.rule_type {
                TrailingStopType::Percentage => {
                    writeln!(out, "trailOffset = close * {v} / 100 / syminfo.mintick").ok();
                }
                TrailingStopType::Atr => {
                    writeln!(out, "trailOffset = {atr_var} * {v} / syminfo.mintick").ok();
                }
            }
        }
        writeln!(out).ok();
    }

    fn execution(&self, out: &mut String, strategy: &StrategyConfig) {
        let has_trailing = strategy.risk_management.active_trailing_stop().is_some();
        writeln!(out, "// Execution").ok();
        writeln!(out, "if longEntryCondition and strategy.position_size == 0").ok();
        writeln!(out, "    strategy.entry(\"Long\", strategy.long)").ok();
        writeln!(out, "if shortEntryCondition and strategy.position_size == 0").ok();
        writeln!(out, "    strategy.entry(\"Short\", strategy.short)").ok();
        writeln!(out, "if longExitCondition and strategy.position_size > 0").ok();
        writeln!(out, "    strategy.close(\"Long\")").ok();
        writeln!(out, "if shortExitCondition and strategy.position_size < 0").ok();
        writeln!(out, "    strategy.close(\"Short\")").ok();
        if has_trailing {
            writeln!(
                out,
                "strategy.exit(\"Long Stop\", from_entry=\"Long\", stop=stopLossLong, limit=takeProfitLong, trail_points=trailOffset, trail_offset=trailOffset)"
            )
            .ok();
            writeln!(
                out,
                "strategy.exit(\"Short Stop\", from_entry=\"Short\", stop=stopLossShort, limit=takeProfitShort, trail_points=trailOffset, trail_offset=trailOffset)"
            )
            .ok();
        } else {
            writeln!(
                out,
                "strategy.exit(\"Long Stop\", from_entry=\"Long\", stop=stopLossLong, limit=takeProfitLong)"
            )
            .ok();
            writeln!(
                out,
                "strategy.exit(\"Short Stop\", from_entry=\"Short\", stop=stopLossShort, limit=takeProfitShort)"
            )
            .ok();
        }
        writeln!(out).ok();
    }

    fn plots(&self, out: &mut String, indicators: &[IndicatorUse]) {
        if indicators.is_empty() {
            return;
        }
        writeln!(out, "// Plots").ok();
        for ind in indicators {
            let var = variable_name(&ind.key);
            let title = self
                .catalog
                .lookup(&ind.key)
                .map(|m| m.name)
                .unwrap_or(ind.key.as_str());
            writeln!(out, "plot({}, title=\"{}\")", var, title).ok();
        }
    }
}

/// Trim trailing `.0` from whole numbers so generated code reads naturally.
fn format_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
