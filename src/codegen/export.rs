//! JSON export
//!
//! The export envelope is the strategy itself flattened at the top level,
//! plus a `meta` block with summary counts and an export timestamp. Parsing
//! an export as a `StrategyConfig` therefore round-trips.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::strategy::StrategyConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub total_conditions: usize,
    pub indicators_used: Vec<String>,
    pub has_secondary_indicators: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyExport {
    #[serde(flatten)]
    pub strategy: StrategyConfig,
    pub meta: ExportMeta,
    pub exported_at: DateTime<Utc>,
}

/// Build the export envelope for a strategy. Pure: the timestamp is supplied
/// by the caller, so the same inputs always produce the same document.
pub fn export(strategy: &StrategyConfig, exported_at: DateTime<Utc>) -> StrategyExport {
    StrategyExport {
        meta: ExportMeta {
            total_conditions: strategy.total_conditions(),
            indicators_used: strategy.indicators_used(),
            has_secondary_indicators: strategy.has_secondary_indicators(),
        },
        strategy: strategy.clone(),
        exported_at,
    }
}

/// Download filename for an export: the strategy name with whitespace
/// collapsed to underscores.
pub fn export_filename(strategy: &StrategyConfig) -> String {
    let stem: String = strategy
        .name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{}.json", stem)
}
