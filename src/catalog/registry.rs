//! The static indicator catalog
//!
//! A compiled constant table: built once, never mutated, safe to share behind
//! an `Arc` across request handlers. Lookups on unknown keys return `None`
//! rather than panicking so a stale strategy document degrades instead of
//! crashing the editor.

use std::collections::HashMap;

use super::types::{
    price_sources, IndicatorCategory, IndicatorMetadata, LogicOption, ParamMap, ParamValue,
    ParameterSpec, SelectOption,
};

/// Read-only registry of indicator metadata.
pub struct Catalog {
    entries: Vec<IndicatorMetadata>,
    index: HashMap<&'static str, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        let entries = build_entries();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key, i))
            .collect();
        Self { entries, index }
    }

    /// Look up an indicator by key. Absence is a recoverable condition.
    pub fn lookup(&self, key: &str) -> Option<&IndicatorMetadata> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> &[IndicatorMetadata] {
        &self.entries
    }

    /// All indicator keys in catalog order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.key).collect()
    }

    /// Whether an indicator belongs to the moving-average family: its name
    /// contains "moving average", or one of its logic options carries a
    /// secondary-indicator schema with moving-average-labeled options.
    pub fn is_moving_average(&self, key: &str) -> bool {
        let Some(meta) = self.lookup(key) else {
            return false;
        };
        if meta.name.to_lowercase().contains("moving average") {
            return true;
        }
        meta.logic_options.iter().any(|logic| {
            logic.logic_params.iter().any(|param| {
                param
                    .options
                    .iter()
                    .any(|opt| opt.label.to_lowercase().contains("moving average"))
            })
        })
    }

    /// Keys of moving-average-family indicators, in catalog order.
    pub fn moving_average_keys(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|e| self.is_moving_average(e.key))
            .map(|e| e.key)
            .collect()
    }

    /// Default parameter values for an indicator, empty for unknown keys.
    pub fn default_params(&self, key: &str) -> ParamMap {
        self.lookup(key)
            .map(|meta| meta.default_params())
            .unwrap_or_default()
    }

    /// Parameters of an indicator partitioned into (standard, advanced).
    pub fn parameters_of(&self, key: &str) -> (Vec<&ParameterSpec>, Vec<&ParameterSpec>) {
        match self.lookup(key) {
            Some(meta) => (meta.standard_parameters(), meta.advanced_parameters()),
            None => (Vec::new(), Vec::new()),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Secondary-indicator schema for crossover logics: which moving average to
/// cross against and how it is configured.
fn moving_average_schema(default_period: f64) -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::select(
            "maType",
            "MA Type",
            "sma",
            vec![
                SelectOption::new("sma", "Simple Moving Average"),
                SelectOption::new("ema", "Exponential Moving Average"),
                SelectOption::new("wma", "Weighted Moving Average"),
            ],
        ),
        ParameterSpec::number("period", "Period", default_period).with_bounds(1.0, 500.0),
        ParameterSpec::source("source", "Source"),
    ]
}

fn moving_average_entry(
    key: &'static str,
    name: &'static str,
    description: &'static str,
    default_period: f64,
) -> IndicatorMetadata {
    IndicatorMetadata {
        key,
        name,
        description,
        category: IndicatorCategory::Trend,
        parameters: vec![
            ParameterSpec::number("period", "Period", default_period)
                .with_bounds(1.0, 500.0)
                .describe("Number of candles in the average"),
            ParameterSpec::source("source", "Source"),
            ParameterSpec::number("offset", "Offset", 0.0)
                .with_bounds(-100.0, 100.0)
                .advanced()
                .optional(),
        ],
        logic_options: vec![
            LogicOption::flag("price_above", "Price is above"),
            LogicOption::flag("price_below", "Price is below"),
            LogicOption::numeric("crosses_above", "Crosses above", "0")
                .custom_input(moving_average_schema(50.0))
                .describe("Crosses above another moving average"),
            LogicOption::numeric("crosses_below", "Crosses below", "0")
                .custom_input(moving_average_schema(50.0))
                .describe("Crosses below another moving average"),
            LogicOption::numeric("greater_than", "Greater than", "0"),
            LogicOption::numeric("less_than", "Less than", "0"),
            LogicOption::flag("rising", "Rising"),
            LogicOption::flag("falling", "Falling"),
        ],
        default_logic: Some("price_above"),
        components: Vec::new(),
        default_component: None,
    }
}

fn build_entries() -> Vec<IndicatorMetadata> {
    vec![
        moving_average_entry(
            "sma",
            "Simple Moving Average",
            "Arithmetic mean of price over a lookback window",
            20.0,
        ),
        moving_average_entry(
            "ema",
            "Exponential Moving Average",
            "Moving average weighted toward recent prices",
            21.0,
        ),
        moving_average_entry(
            "wma",
            "Weighted Moving Average",
            "Moving average with linearly decreasing weights",
            20.0,
        ),
        IndicatorMetadata {
            key: "vwap",
            name: "Volume Weighted Average Price",
            description: "Average price weighted by traded volume",
            category: IndicatorCategory::Volume,
            parameters: vec![
                ParameterSpec::select(
                    "anchor",
                    "Anchor",
                    "session",
                    vec![
                        SelectOption::new("session", "Session"),
                        SelectOption::new("week", "Week"),
                        SelectOption::new("month", "Month"),
                    ],
                ),
                ParameterSpec::source("source", "Source").advanced(),
            ],
            logic_options: vec![
                LogicOption::flag("price_above", "Price is above"),
                LogicOption::flag("price_below", "Price is below"),
                LogicOption::numeric("crosses_above", "Crosses above", "0")
                    .custom_input(moving_average_schema(50.0)),
                LogicOption::numeric("crosses_below", "Crosses below", "0")
                    .custom_input(moving_average_schema(50.0)),
            ],
            default_logic: Some("price_above"),
            components: Vec::new(),
            default_component: None,
        },
        IndicatorMetadata {
            key: "supertrend",
            name: "SuperTrend",
            description: "ATR-based trend-following overlay",
            category: IndicatorCategory::Trend,
            parameters: vec![
                ParameterSpec::number("period", "ATR Period", 10.0).with_bounds(1.0, 100.0),
                ParameterSpec::number("multiplier", "Multiplier", 3.0)
                    .with_bounds(0.5, 10.0)
                    .with_step(0.5),
            ],
            logic_options: vec![
                LogicOption::flag("flips_bullish", "Flips bullish"),
                LogicOption::flag("flips_bearish", "Flips bearish"),
                LogicOption::flag("price_above", "Price is above"),
                LogicOption::flag("price_below", "Price is below"),
            ],
            default_logic: Some("flips_bullish"),
            components: Vec::new(),
            default_component: None,
        },
        IndicatorMetadata {
            key: "adx",
            name: "Average Directional Index",
            description: "Strength of the prevailing trend",
            category: IndicatorCategory::Trend,
            parameters: vec![
                ParameterSpec::number("period", "Period", 14.0).with_bounds(2.0, 100.0),
                ParameterSpec::number("diLength", "DI Length", 14.0)
                    .with_bounds(2.0, 100.0)
                    .advanced(),
            ],
            logic_options: vec![
                LogicOption::numeric("greater_than", "Greater than", "25"),
                LogicOption::numeric("less_than", "Less than", "20"),
                LogicOption::flag("strong_trend", "Trend is strong")
                    .describe("ADX above 25 and rising"),
                LogicOption::flag("weak_trend", "Trend is weak"),
                LogicOption::flag("di_bullish_cross", "+DI crosses above -DI"),
                LogicOption::flag("di_bearish_cross", "-DI crosses above +DI"),
            ],
            default_logic: Some("greater_than"),
            components: vec![
                SelectOption::new("adx", "ADX"),
                SelectOption::new("plus_di", "+DI"),
                SelectOption::new("minus_di", "-DI"),
            ],
            default_component: Some("adx"),
        },
        IndicatorMetadata {
            key: "rsi",
            name: "Relative Strength Index",
            description: "Momentum oscillator bounded between 0 and 100",
            category: IndicatorCategory::Momentum,
            parameters: vec![
                ParameterSpec::number("period", "Period", 14.0).with_bounds(2.0, 100.0),
                ParameterSpec::source("source", "Source"),
                ParameterSpec::number("overbought", "Overbought Level", 70.0)
                    .with_bounds(50.0, 100.0)
                    .advanced(),
                ParameterSpec::number("oversold", "Oversold Level", 30.0)
                    .with_bounds(0.0, 50.0)
                    .advanced(),
            ],
            logic_options: vec![
                LogicOption::numeric("less_than", "Less than", "30")
                    .with_bounds(0.0, 100.0)
                    .sync_key("neutral_low"),
                LogicOption::numeric("greater_than", "Greater than", "70")
                    .with_bounds(0.0, 100.0)
                    .sync_key("neutral_high"),
                LogicOption::numeric("crosses_above", "Crosses above", "30").with_bounds(0.0, 100.0),
                LogicOption::numeric("crosses_below", "Crosses below", "70").with_bounds(0.0, 100.0),
                LogicOption::flag("enters_overbought", "Enters overbought"),
                LogicOption::flag("exits_overbought", "Exits overbought"),
                LogicOption::flag("enters_oversold", "Enters oversold"),
                LogicOption::flag("exits_oversold", "Exits oversold"),
                LogicOption::flag("bullish_divergence", "Bullish divergence"),
                LogicOption::flag("bearish_divergence", "Bearish divergence"),
            ],
            default_logic: Some("less_than"),
            components: Vec::new(),
            default_component: None,
        },
        IndicatorMetadata {
            key: "macd",
            name: "MACD",
            description: "Moving average convergence/divergence",
            category: IndicatorCategory::Momentum,
            parameters: vec![
                ParameterSpec::number("fastPeriod", "Fast Period", 12.0).with_bounds(1.0, 100.0),
                ParameterSpec::number("slowPeriod", "Slow Period", 26.0).with_bounds(1.0, 200.0),
                ParameterSpec::number("signalPeriod", "Signal Period", 9.0).with_bounds(1.0, 100.0),
                ParameterSpec::source("source", "Source").advanced(),
            ],
            logic_options: vec![
                LogicOption::flag("crosses_above_signal", "Crosses above signal"),
                LogicOption::flag("crosses_below_signal", "Crosses below signal"),
                LogicOption::numeric("greater_than", "Greater than", "0"),
                LogicOption::numeric("less_than", "Less than", "0"),
                LogicOption::flag("histogram_positive", "Histogram is positive"),
                LogicOption::flag("histogram_negative", "Histogram is negative"),
                LogicOption::flag("bullish_divergence", "Bullish divergence"),
                LogicOption::flag("bearish_divergence", "Bearish divergence"),
            ],
            default_logic: Some("crosses_above_signal"),
            components: vec![
                SelectOption::new("line", "MACD Line"),
                SelectOption::new("signal", "Signal Line"),
                SelectOption::new("histogram", "Histogram"),
            ],
            default_component: Some("line"),
        },
        IndicatorMetadata {
            key: "stochastic",
            name: "Stochastic Oscillator",
            description: "Position of the close within the recent range",
            category: IndicatorCategory::Momentum,
            parameters: vec![
                ParameterSpec::number("kPeriod", "%K Period", 14.0).with_bounds(1.0, 100.0),
                ParameterSpec::number("dPeriod", "%D Period", 3.0).with_bounds(1.0, 50.0),
                ParameterSpec::number("smooth", "Smoothing", 3.0)
                    .with_bounds(1.0, 50.0)
                    .advanced(),
            ],
            logic_options: vec![
                LogicOption::numeric("less_than", "Less than", "20").with_bounds(0.0, 100.0),
                LogicOption::numeric("greater_than", "Greater than", "80").with_bounds(0.0, 100.0),
                LogicOption::flag("k_crosses_above_d", "%K crosses above %D"),
                LogicOption::flag("k_crosses_below_d", "%K crosses below %D"),
                LogicOption::flag("enters_overbought", "Enters overbought"),
                LogicOption::flag("exits_overbought", "Exits overbought"),
                LogicOption::flag("enters_oversold", "Enters oversold"),
                LogicOption::flag("exits_oversold", "Exits oversold"),
            ],
            default_logic: Some("less_than"),
            components: vec![
                SelectOption::new("k", "%K"),
                SelectOption::new("d", "%D"),
            ],
            default_component: Some("k"),
        },
        IndicatorMetadata {
            key: "cci",
            name: "Commodity Channel Index",
            description: "Deviation of price from its statistical mean",
            category: IndicatorCategory::Momentum,
            parameters: vec![
                ParameterSpec::number("period", "Period", 20.0).with_bounds(2.0, 200.0),
                ParameterSpec::source("source", "Source").advanced(),
            ],
            logic_options: vec![
                LogicOption::numeric("greater_than", "Greater than", "100"),
                LogicOption::numeric("less_than", "Less than", "-100"),
                LogicOption::numeric("crosses_above", "Crosses above", "100"),
                LogicOption::numeric("crosses_below", "Crosses below", "-100"),
            ],
            default_logic: Some("greater_than"),
            components: Vec::new(),
            default_component: None,
        },
        IndicatorMetadata {
            key: "bollinger",
            name: "Bollinger Bands",
            description: "Volatility bands around a moving basis",
            category: IndicatorCategory::Volatility,
            parameters: vec![
                ParameterSpec::number("period", "Period", 20.0).with_bounds(1.0, 200.0),
                ParameterSpec::number("stdDev", "Std Dev", 2.0)
                    .with_bounds(0.1, 10.0)
                    .with_step(0.1),
                ParameterSpec::source("source", "Source").advanced(),
            ],
            logic_options: vec![
                LogicOption::flag("touches_lower_band", "Touches lower band"),
                LogicOption::flag("touches_upper_band", "Touches upper band"),
                LogicOption::flag("closes_below_lower", "Closes below lower band"),
                LogicOption::flag("closes_above_upper", "Closes above upper band"),
                LogicOption::flag("squeeze", "Bands are squeezing"),
                LogicOption::flag("expansion", "Bands are expanding"),
                LogicOption::numeric("percent_b_above", "%B above", "0.8")
                    .with_bounds(0.0, 1.0)
                    .with_step(0.05),
                LogicOption::numeric("percent_b_below", "%B below", "0.2")
                    .with_bounds(0.0, 1.0)
                    .with_step(0.05),
            ],
            default_logic: Some("touches_lower_band"),
            components: vec![
                SelectOption::new("upper", "Upper Band"),
                SelectOption::new("middle", "Basis"),
                SelectOption::new("lower", "Lower Band"),
            ],
            default_component: Some("middle"),
        },
        IndicatorMetadata {
            key: "atr",
            name: "Average True Range",
            description: "Average candle range as a volatility gauge",
            category: IndicatorCategory::Volatility,
            parameters: vec![
                ParameterSpec::number("period", "Period", 14.0).with_bounds(1.0, 100.0),
                ParameterSpec::select(
                    "smoothing",
                    "Smoothing",
                    "rma",
                    vec![
                        SelectOption::new("rma", "RMA"),
                        SelectOption::new("sma", "SMA"),
                        SelectOption::new("ema", "EMA"),
                        SelectOption::new("wma", "WMA"),
                    ],
                )
                .advanced(),
            ],
            logic_options: vec![
                LogicOption::numeric("greater_than", "Greater than", "0"),
                LogicOption::numeric("less_than", "Less than", "0"),
                LogicOption::flag("rising", "Rising"),
                LogicOption::flag("falling", "Falling"),
            ],
            default_logic: Some("greater_than"),
            components: Vec::new(),
            default_component: None,
        },
        IndicatorMetadata {
            key: "obv",
            name: "On-Balance Volume",
            description: "Cumulative volume signed by price direction",
            category: IndicatorCategory::Volume,
            parameters: vec![ParameterSpec::number("smoothing", "Smoothing", 1.0)
                .with_bounds(1.0, 100.0)
                .advanced()
                .optional()],
            logic_options: vec![
                LogicOption::flag("rising", "Rising"),
                LogicOption::flag("falling", "Falling"),
                LogicOption::flag("bullish_divergence", "Bullish divergence"),
                LogicOption::flag("bearish_divergence", "Bearish divergence"),
                LogicOption::numeric("crosses_above", "Crosses above", "0")
                    .custom_input(moving_average_schema(20.0))
                    .describe("Crosses above a moving average of OBV"),
            ],
            default_logic: Some("rising"),
            components: Vec::new(),
            default_component: None,
        },
        IndicatorMetadata {
            key: "volume",
            name: "Volume",
            description: "Raw traded volume per candle",
            category: IndicatorCategory::Volume,
            parameters: vec![
                ParameterSpec::number("maPeriod", "Average Period", 20.0).with_bounds(1.0, 200.0)
            ],
            logic_options: vec![
                LogicOption::numeric("spike", "Spikes above average by", "2")
                    .with_bounds(1.0, 20.0)
                    .with_step(0.5)
                    .describe("Volume exceeds its average times this multiplier"),
                LogicOption::flag("above_average", "Above average"),
                LogicOption::flag("below_average", "Below average"),
                LogicOption::flag("rising", "Rising"),
                LogicOption::flag("falling", "Falling"),
            ],
            default_logic: Some("spike"),
            components: Vec::new(),
            default_component: None,
        },
        IndicatorMetadata {
            key: "price",
            name: "Price",
            description: "Raw price action of the selected source",
            category: IndicatorCategory::Price,
            parameters: vec![
                ParameterSpec::source("source", "Source"),
                ParameterSpec::boolean("requireRetest", "Require Retest", false)
                    .describe("Only trigger breakouts after the level is retested"),
                ParameterSpec::number("retestTolerance", "Retest Tolerance %", 0.5)
                    .with_bounds(0.0, 5.0)
                    .with_step(0.1)
                    .advanced()
                    .show_if(|params| {
                        params
                            .get("requireRetest")
                            .and_then(|v| v.as_bool())
                            .unwrap_or(false)
                    }),
            ],
            logic_options: vec![
                LogicOption::numeric("greater_than", "Greater than", "0"),
                LogicOption::numeric("less_than", "Less than", "0"),
                LogicOption::numeric("crosses_above", "Crosses above", "0")
                    .custom_input(moving_average_schema(50.0)),
                LogicOption::numeric("crosses_below", "Crosses below", "0")
                    .custom_input(moving_average_schema(50.0)),
                LogicOption::numeric("breakout_above", "Breaks out above", "0"),
                LogicOption::numeric("breakout_below", "Breaks out below", "0"),
            ],
            default_logic: Some("greater_than"),
            components: Vec::new(),
            default_component: None,
        },
    ]
}
