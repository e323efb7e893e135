//! Human-readable pseudocode generator
//!
//! Renders the same strategy the script generator compiles, but as a plain
//! English document a non-programmer can review. Sections mirror the editor
//! layout: indicators, the four rule slots, then risk management.

use std::fmt::Write as FmtWrite;

use crate::catalog::Catalog;
use crate::codegen::{collect_indicators, describe_indicator, logic_phrase};
use crate::models::risk::{
    PositionSizingType, RiskManagementConfig, StopLossType, TakeProfitType, TimeExitType,
    TrailingStopType,
};
use crate::models::strategy::{ConditionGroup, IndicatorCondition, PositionRule, StrategyConfig};

pub struct PseudocodeGenerator<'a> {
    catalog: &'a Catalog,
}

impl<'a> PseudocodeGenerator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn generate(&self, strategy: &StrategyConfig) -> String {
        let mut out = String::with_capacity(2048);

        writeln!(out, "STRATEGY: {}", strategy.name).ok();
        if !strategy.description.is_empty() {
            writeln!(out, "{}", strategy.description).ok();
        }
        writeln!(out).ok();

        self.indicator_section(&mut out, strategy);
        self.rule_section(&mut out, "ENTRY LONG", &strategy.entry_long, "OPEN LONG POSITION");
        self.rule_section(&mut out, "ENTRY SHORT", &strategy.entry_short, "OPEN SHORT POSITION");
        self.rule_section(&mut out, "EXIT LONG", &strategy.exit_long, "CLOSE LONG POSITION");
        self.rule_section(&mut out, "EXIT SHORT", &strategy.exit_short, "CLOSE SHORT POSITION");
        self.risk_section(&mut out, &strategy.risk_management);
        out
    }

    fn indicator_section(&self, out: &mut String, strategy: &StrategyConfig) {
        let indicators = collect_indicators(strategy);
        if indicators.is_empty() {
            return;
        }
        writeln!(out, "INDICATORS:").ok();
        for ind in &indicators {
            writeln!(
                out,
                "  - {}",
                describe_indicator(self.catalog, &ind.key, &ind.params)
            )
            .ok();
        }
        writeln!(out).ok();
    }

    fn rule_section(&self, out: &mut String, title: &str, rule: &PositionRule, action: &str) {
        writeln!(out, "{}:", title).ok();
        let groups: Vec<&ConditionGroup> = rule
            .condition_groups
            .iter()
            .filter(|g| !g.conditions.is_empty())
            .collect();
        if groups.is_empty() {
            writeln!(out, "  (no conditions defined)").ok();
            writeln!(out).ok();
            return;
        }
        for (i, group) in groups.iter().enumerate() {
            if i > 0 {
                writeln!(out, "  OR").ok();
            }
            let joiner = group.operator.keyword().to_uppercase();
            writeln!(out, "  IF (").ok();
            for (j, condition) in group.conditions.iter().enumerate() {
                let suffix = if j + 1 < group.conditions.len() {
                    format!(" {}", joiner)
                } else {
                    String::new()
                };
                writeln!(out, "    {}{}", self.condition_sentence(condition), suffix).ok();
            }
            writeln!(out, "  ) THEN {}", action).ok();
        }
        writeln!(out).ok();
    }

    /// One condition as an English sentence. Unknown indicators and logic
    /// keys pass through literally rather than aborting the document.
    fn condition_sentence(&self, condition: &IndicatorCondition) -> String {
        let subject = match self.catalog.lookup(&condition.indicator) {
            Some(meta) => match condition.parameter.as_deref() {
                Some(component) => format!("{} {}", meta.name, component.replace('_', " ")),
                None => meta.name.to_string(),
            },
            None => condition.indicator.clone(),
        };
        let phrase = logic_phrase(&condition.logic);

        // Self-contained phrases carry their own object ("is rising").
        let needs_object = matches!(
            condition.logic.as_str(),
            "greater_than"
                | "less_than"
                | "equals"
                | "crosses_above"
                | "crosses_below"
                | "breakout_above"
                | "breakout_below"
                | "spike"
                | "percent_b_above"
                | "percent_b_below"
        ) || matches!(crate::codegen::logic_token(&condition.logic), crate::codegen::LogicToken::Unknown);

        let mut sentence = format!("{} {}", subject, phrase);
        if needs_object {
            let object = match condition.referenced_indicator() {
                Some(key) => match self.catalog.lookup(key) {
                    Some(meta) => meta.name.to_string(),
                    None => key.to_string(),
                },
                None => match &condition.secondary_indicator {
                    Some(secondary) => {
                        describe_indicator(self.catalog, &secondary.kind, &secondary.params)
                    }
                    None => condition.value.clone(),
                },
            };
            sentence.push(' ');
            sentence.push_str(&object);
        }
        if condition.timeframe != "1h" {
            sentence.push_str(&format!(" on the {} timeframe", condition.timeframe));
        }
        sentence
    }

    fn risk_section(&self, out: &mut String, risk: &RiskManagementConfig) {
        writeln!(out, "RISK MANAGEMENT:").ok();

        for rule in risk.stop_loss.iter().filter(|r| r.enabled) {
            let line = match rule.rule_type {
                StopLossType::Percentage => {
                    format!("Stop loss at {}% below entry price", rule.value)
                }
                StopLossType::Atr => format!(
                    "Stop loss at {} x ATR({}) from entry price",
                    rule.value,
                    rule.atr_period.unwrap_or(14)
                ),
                StopLossType::Fixed => {
                    format!("Stop loss {} price units from entry", rule.value)
                }
            };
            writeln!(out, "  - {}", line).ok();
        }
        for rule in risk.take_profit.iter().filter(|r| r.enabled) {
            let line = match rule.rule_type {
                TakeProfitType::Percentage => {
                    format!("Take profit at {}% above entry price", rule.value)
                }
                TakeProfitType::Atr => format!(
                    "Take profit at {} x ATR({}) from entry price",
                    rule.value,
                    rule.atr_period.unwrap_or(14)
                ),
                TakeProfitType::RiskReward => {
                    format!("Take profit at {}:1 reward-to-risk", rule.value)
                }
            };
            writeln!(out, "  - {}", line).ok();
        }
        for rule in risk.trailing_stop.iter().filter(|r| r.enabled) {
            let line = match rule.rule_type {
                TrailingStopType::Percentage => {
                    format!("Trailing stop at {}% behind the high-water mark", rule.value)
                }
                TrailingStopType::Atr => format!(
                    "Trailing stop at {} x ATR({}) behind the high-water mark",
                    rule.value,
                    rule.atr_period.unwrap_or(14)
                ),
            };
            writeln!(out, "  - {}", line).ok();
            if let Some(activation) = rule.activation {
                writeln!(out, "    (activates after {}% profit)", activation).ok();
            }
        }
        for rule in risk.time_exit.iter().filter(|r| r.enabled) {
            let line = match rule.rule_type {
                TimeExitType::Bars => format!("Exit after {} bars in position", rule.value),
                TimeExitType::Time => format!(
                    "Exit at {} each day",
                    rule.exit_time.as_deref().unwrap_or("16:00")
                ),
            };
            writeln!(out, "  - {}", line).ok();
        }
        for rule in risk.position_sizing.iter().filter(|r| r.enabled) {
            let line = match rule.rule_type {
                PositionSizingType::FixedAmount => {
                    format!("Position size: fixed {} per trade", rule.value)
                }
                PositionSizingType::PercentEquity => {
                    format!("Position size: {}% of equity per trade", rule.value)
                }
                PositionSizingType::RiskBased => {
                    format!("Position size: risk {}% of equity per trade", rule.value)
                }
                PositionSizingType::Kelly => format!(
                    "Position size: Kelly fraction {} (win rate {}, payoff {})",
                    rule.value,
                    rule.win_rate.unwrap_or(0.5),
                    rule.payoff_ratio.unwrap_or(1.5)
                ),
            };
            writeln!(out, "  - {}", line).ok();
        }

        writeln!(out, "  - Maximum {} open position(s)", risk.max_open_positions).ok();
        writeln!(out, "  - Halt trading at {}% drawdown", risk.max_drawdown).ok();
        writeln!(out, "  - Stop for the day after {}% daily loss", risk.max_daily_loss).ok();
        writeln!(
            out,
            "  - Pause after {} consecutive losses",
            risk.max_consecutive_losses
        )
        .ok();
        writeln!(out, "  - Profit target at {}%", risk.profit_target).ok();
        writeln!(
            out,
            "  - Minimum {}:1 reward-to-risk on entries",
            risk.risk_reward_minimum
        )
        .ok();
        writeln!(out, "  - Pyramiding: {} additional entries allowed", risk.pyramiding).ok();
        if let Some(filter) = &risk.session_filter {
            writeln!(out, "  - Trade only between {} and {}", filter.start, filter.end).ok();
        }
    }
}
