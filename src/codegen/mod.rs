//! Code generators
//!
//! Two independent renderers over the same `StrategyConfig`: an executable
//! Pine-style script and a human-readable pseudocode document. Both are pure
//! and deterministic; they share the logic-keyword table and the
//! indicator-expression builders in this module.

pub mod export;
pub mod pseudocode;
pub mod script;

pub use export::{export, export_filename, StrategyExport};
pub use pseudocode::PseudocodeGenerator;
pub use script::ScriptGenerator;

use crate::catalog::{Catalog, ParamMap, ParamValue};
use crate::models::strategy::StrategyConfig;

/// How a logic key renders in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicToken {
    /// Plain binary comparison operator.
    Compare(&'static str),
    /// Two-argument crossover function.
    Crossover(&'static str),
    /// Fixed expression template; `{var}` is replaced by the indicator's
    /// variable name and `{value}` by the condition's value.
    Phrase(&'static str),
    /// Not in the table; the key passes through literally (fail-open).
    Unknown,
}

/// Static lookup from logic key to rendering token. Unknown keys fall
/// through to `Unknown` so a stale strategy degrades instead of crashing.
pub(crate) fn logic_token(logic: &str) -> LogicToken {
    match logic {
        "greater_than" => LogicToken::Compare(">"),
        "less_than" => LogicToken::Compare("<"),
        "equals" => LogicToken::Compare("=="),
        "breakout_above" => LogicToken::Compare(">"),
        "breakout_below" => LogicToken::Compare("<"),
        "spike" => LogicToken::Phrase("{var} > {var}Avg * {value}"),
        "percent_b_above" => {
            LogicToken::Phrase("(close - {var}Lower) / ({var}Upper - {var}Lower) > {value}")
        }
        "percent_b_below" => {
            LogicToken::Phrase("(close - {var}Lower) / ({var}Upper - {var}Lower) < {value}")
        }

        "crosses_above" => LogicToken::Crossover("ta.crossover"),
        "crosses_below" => LogicToken::Crossover("ta.crossunder"),

        "crosses_above_signal" => LogicToken::Phrase("ta.crossover({var}, {var}Signal)"),
        "crosses_below_signal" => LogicToken::Phrase("ta.crossunder({var}, {var}Signal)"),
        "histogram_positive" => LogicToken::Phrase("{var}Hist > 0"),
        "histogram_negative" => LogicToken::Phrase("{var}Hist < 0"),

        "enters_overbought" => LogicToken::Phrase("{var} > 70 and {var}[1] <= 70"),
        "exits_overbought" => LogicToken::Phrase("{var} < 70 and {var}[1] >= 70"),
        "enters_oversold" => LogicToken::Phrase("{var} < 30 and {var}[1] >= 30"),
        "exits_oversold" => LogicToken::Phrase("{var} > 30 and {var}[1] <= 30"),

        "bullish_divergence" => {
            LogicToken::Phrase("{var} > {var}[1] and close < close[1]")
        }
        "bearish_divergence" => {
            LogicToken::Phrase("{var} < {var}[1] and close > close[1]")
        }

        "price_above" => LogicToken::Phrase("close > {var}"),
        "price_below" => LogicToken::Phrase("close < {var}"),
        "rising" => LogicToken::Phrase("{var} > {var}[1]"),
        "falling" => LogicToken::Phrase("{var} < {var}[1]"),

        "flips_bullish" => LogicToken::Phrase("ta.crossover(close, {var})"),
        "flips_bearish" => LogicToken::Phrase("ta.crossunder(close, {var})"),

        "strong_trend" => LogicToken::Phrase("{var} > 25 and {var} > {var}[1]"),
        "weak_trend" => LogicToken::Phrase("{var} < 20"),
        "di_bullish_cross" => LogicToken::Phrase("ta.crossover({var}PlusDi, {var}MinusDi)"),
        "di_bearish_cross" => LogicToken::Phrase("ta.crossover({var}MinusDi, {var}PlusDi)"),

        "k_crosses_above_d" => LogicToken::Phrase("ta.crossover({var}, {var}D)"),
        "k_crosses_below_d" => LogicToken::Phrase("ta.crossunder({var}, {var}D)"),

        "touches_upper_band" => LogicToken::Phrase("high >= {var}Upper"),
        "touches_lower_band" => LogicToken::Phrase("low <= {var}Lower"),
        "closes_above_upper" => LogicToken::Phrase("close > {var}Upper"),
        "closes_below_lower" => LogicToken::Phrase("close < {var}Lower"),
        "squeeze" => LogicToken::Phrase("({var}Upper - {var}Lower) < ({var}Upper[1] - {var}Lower[1])"),
        "expansion" => LogicToken::Phrase("({var}Upper - {var}Lower) > ({var}Upper[1] - {var}Lower[1])"),

        "above_average" => LogicToken::Phrase("{var} > {var}Avg"),
        "below_average" => LogicToken::Phrase("{var} < {var}Avg"),

        _ => LogicToken::Unknown,
    }
}

/// Human-readable phrasing for a logic key in pseudocode output.
pub(crate) fn logic_phrase(logic: &str) -> &str {
    match logic {
        "greater_than" => "is greater than",
        "less_than" => "is less than",
        "equals" => "equals",
        "crosses_above" => "crosses above",
        "crosses_below" => "crosses below",
        "crosses_above_signal" => "crosses above its signal line",
        "crosses_below_signal" => "crosses below its signal line",
        "histogram_positive" => "histogram is positive",
        "histogram_negative" => "histogram is negative",
        "enters_overbought" => "enters the overbought zone",
        "exits_overbought" => "exits the overbought zone",
        "enters_oversold" => "enters the oversold zone",
        "exits_oversold" => "exits the oversold zone",
        "bullish_divergence" => "shows bullish divergence",
        "bearish_divergence" => "shows bearish divergence",
        "price_above" => "is below price",
        "price_below" => "is above price",
        "rising" => "is rising",
        "falling" => "is falling",
        "flips_bullish" => "flips bullish",
        "flips_bearish" => "flips bearish",
        "strong_trend" => "signals a strong trend",
        "weak_trend" => "signals a weak trend",
        "di_bullish_cross" => "+DI crosses above -DI",
        "di_bearish_cross" => "-DI crosses above +DI",
        "k_crosses_above_d" => "%K crosses above %D",
        "k_crosses_below_d" => "%K crosses below %D",
        "touches_upper_band" => "touches its upper band",
        "touches_lower_band" => "touches its lower band",
        "closes_above_upper" => "closes above its upper band",
        "closes_below_lower" => "closes below its lower band",
        "squeeze" => "bands are squeezing",
        "expansion" => "bands are expanding",
        "percent_b_above" => "%B is above",
        "percent_b_below" => "%B is below",
        "breakout_above" => "breaks out above",
        "breakout_below" => "breaks out below",
        "spike" => "spikes above its average by",
        "above_average" => "is above its average",
        "below_average" => "is below its average",
        other => other,
    }
}

/// One distinct indicator referenced by a strategy, with the parameter values
/// of its first-seen use.
#[derive(Debug, Clone)]
pub(crate) struct IndicatorUse {
    pub key: String,
    pub params: ParamMap,
}

/// Collect every distinct indicator key referenced across the four rules,
/// including secondary indicators and `indicator:` value references,
/// deduplicated in first-reference order. Each indicator is defined once even
/// when used in multiple conditions.
pub(crate) fn collect_indicators(strategy: &StrategyConfig) -> Vec<IndicatorUse> {
    let mut seen = std::collections::HashSet::new();
    let mut uses = Vec::new();
    for (_, rule) in strategy.rules() {
        for group in &rule.condition_groups {
            for condition in &group.conditions {
                if seen.insert(condition.indicator.clone()) {
                    uses.push(IndicatorUse {
                        key: condition.indicator.clone(),
                        params: condition.params.clone(),
                    });
                }
                if let Some(secondary) = &condition.secondary_indicator {
                    if seen.insert(secondary.kind.clone()) {
                        uses.push(IndicatorUse {
                            key: secondary.kind.clone(),
                            params: secondary.params.clone(),
                        });
                    }
                }
                // A value reference names a series by key only; schema
                // defaults fill in at expression-build time.
                if let Some(referenced) = condition.referenced_indicator() {
                    if seen.insert(referenced.to_string()) {
                        uses.push(IndicatorUse {
                            key: referenced.to_string(),
                            params: ParamMap::new(),
                        });
                    }
                }
            }
        }
    }
    uses
}

/// Script variable name for an indicator key, e.g. `rsi` -> `rsiValue`.
pub(crate) fn variable_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 5);
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' || c == '-' {
            upper_next = true;
        } else if upper_next {
            name.extend(c.to_uppercase());
            upper_next = false;
        } else {
            name.push(c);
        }
    }
    name.push_str("Value");
    name
}

fn param_or(params: &ParamMap, key: &str, fallback: f64) -> f64 {
    params
        .get(key)
        .and_then(ParamValue::as_number)
        .unwrap_or(fallback)
}

fn source_or_close(params: &ParamMap) -> String {
    params
        .get("source")
        .and_then(ParamValue::as_text)
        .unwrap_or("close")
        .to_string()
}

/// The `ta.*` source expression defining an indicator's primary series.
/// Unknown keys get a generic fallback expression.
pub(crate) fn source_expression(catalog: &Catalog, key: &str, params: &ParamMap) -> String {
    if catalog.lookup(key).is_none() {
        return format!("ta.{}(close)", key);
    }
    let source = source_or_close(params);
    match key {
        "sma" => format!("ta.sma({}, {})", source, param_or(params, "period", 20.0)),
        "ema" => format!("ta.ema({}, {})", source, param_or(params, "period", 21.0)),
        "wma" => format!("ta.wma({}, {})", source, param_or(params, "period", 20.0)),
        "vwap" => "ta.vwap".to_string(),
        "rsi" => format!("ta.rsi({}, {})", source, param_or(params, "period", 14.0)),
        "cci" => format!("ta.cci({}, {})", source, param_or(params, "period", 20.0)),
        "atr" => format!("ta.atr({})", param_or(params, "period", 14.0)),
        "obv" => "ta.obv".to_string(),
        "volume" => "volume".to_string(),
        "price" => source,
        "supertrend" => format!(
            "ta.supertrend({}, {})",
            param_or(params, "multiplier", 3.0),
            param_or(params, "period", 10.0)
        ),
        "macd" => format!(
            "ta.macd({}, {}, {}, {})",
            source,
            param_or(params, "fastPeriod", 12.0),
            param_or(params, "slowPeriod", 26.0),
            param_or(params, "signalPeriod", 9.0)
        ),
        "bollinger" => format!(
            "ta.bb({}, {}, {})",
            source,
            param_or(params, "period", 20.0),
            param_or(params, "stdDev", 2.0)
        ),
        "stochastic" => format!(
            "ta.stoch(close, high, low, {})",
            param_or(params, "kPeriod", 14.0)
        ),
        "adx" => format!("ta.dmi({}, {})", param_or(params, "diLength", 14.0), param_or(params, "period", 14.0)),
        other => format!("ta.{}(close)", other),
    }
}

/// Inline expression for a secondary indicator (used as the second argument
/// of crossover calls), built from its own params.
pub(crate) fn secondary_expression(catalog: &Catalog, key: &str, params: &ParamMap) -> String {
    // The secondary schema may carry an maType select that overrides the key.
    let effective_key = params
        .get("maType")
        .and_then(ParamValue::as_text)
        .unwrap_or(key);
    source_expression(catalog, effective_key, params)
}

/// Short human description of an indicator instance for pseudocode output.
pub(crate) fn describe_indicator(catalog: &Catalog, key: &str, params: &ParamMap) -> String {
    match catalog.lookup(key) {
        Some(meta) => match key {
            "sma" | "ema" | "wma" => format!(
                "{}({}) of {}",
                key.to_uppercase(),
                param_or(params, "period", 20.0),
                source_or_close(params)
            ),
            "rsi" => format!("RSI({})", param_or(params, "period", 14.0)),
            "macd" => format!(
                "MACD({}, {}, {})",
                param_or(params, "fastPeriod", 12.0),
                param_or(params, "slowPeriod", 26.0),
                param_or(params, "signalPeriod", 9.0)
            ),
            "bollinger" => format!(
                "Bollinger Bands({}, {})",
                param_or(params, "period", 20.0),
                param_or(params, "stdDev", 2.0)
            ),
            "stochastic" => format!(
                "Stochastic({}, {})",
                param_or(params, "kPeriod", 14.0),
                param_or(params, "dPeriod", 3.0)
            ),
            "atr" => format!("ATR({})", param_or(params, "period", 14.0)),
            "adx" => format!("ADX({})", param_or(params, "period", 14.0)),
            "cci" => format!("CCI({})", param_or(params, "period", 20.0)),
            "supertrend" => format!(
                "SuperTrend({}, {})",
                param_or(params, "period", 10.0),
                param_or(params, "multiplier", 3.0)
            ),
            _ => meta.name.to_string(),
        },
        None => format!("{} = ta.{}(close)", key, key),
    }
}
