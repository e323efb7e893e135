//! Indicator catalog: static metadata describing indicators, their parameter
//! schemas, and the comparison logics available on each.

pub mod registry;
pub mod types;

pub use registry::Catalog;
pub use types::{
    IndicatorCategory, IndicatorMetadata, LogicOption, LogicValueType, ParamMap, ParamType,
    ParamValue, ParameterSpec, SelectOption,
};
