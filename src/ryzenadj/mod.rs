pub mod library;

pub use library::RyzenAdjLibrary;

use serde::Serialize;

/// A tunable SMU limit exposed by libryzenadj as a getter/setter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
    StapmLimit,
    FastLimit,
    SlowLimit,
    SlowTime,
    StapmTime,
    TctlTemp,
    VrmmaxCurrent,
}

impl Field {
    /// All fields, in the order a profile is applied.
    pub const ALL: [Field; 7] = [
        Field::StapmLimit,
        Field::FastLimit,
        Field::SlowLimit,
        Field::SlowTime,
        Field::StapmTime,
        Field::TctlTemp,
        Field::VrmmaxCurrent,
    ];

    /// Key used for this field in the profile store.
    pub fn key(self) -> &'static str {
        match self {
            Field::StapmLimit => "stapm-limit",
            Field::FastLimit => "fast-limit",
            Field::SlowLimit => "slow-limit",
            Field::SlowTime => "slow-time",
            Field::StapmTime => "stapm-time",
            Field::TctlTemp => "tctl-temp",
            Field::VrmmaxCurrent => "vrmmax-current",
        }
    }

    /// Name used in confirmations, as in the libryzenadj symbols.
    pub fn name(self) -> &'static str {
        match self {
            Field::StapmLimit => "stapm_limit",
            Field::FastLimit => "fast_limit",
            Field::SlowLimit => "slow_limit",
            Field::SlowTime => "slow_time",
            Field::StapmTime => "stapm_time",
            Field::TctlTemp => "tctl_temp",
            Field::VrmmaxCurrent => "vrmmax_current",
        }
    }

    pub fn setter(self) -> &'static str {
        match self {
            Field::StapmLimit => "set_stapm_limit",
            Field::FastLimit => "set_fast_limit",
            Field::SlowLimit => "set_slow_limit",
            Field::SlowTime => "set_slow_time",
            Field::StapmTime => "set_stapm_time",
            Field::TctlTemp => "set_tctl_temp",
            Field::VrmmaxCurrent => "set_vrmmax_current",
        }
    }

    pub fn getter(self) -> &'static str {
        match self {
            Field::StapmLimit => "get_stapm_limit",
            Field::FastLimit => "get_fast_limit",
            Field::SlowLimit => "get_slow_limit",
            Field::SlowTime => "get_slow_time",
            Field::StapmTime => "get_stapm_time",
            Field::TctlTemp => "get_tctl_temp",
            Field::VrmmaxCurrent => "get_vrmmax_current",
        }
    }

    /// Multiplier from the value the getter reports to the unit the store uses.
    /// Power limits read back in W and current in A, while profiles hold mW/mA.
    pub fn read_scale(self) -> f32 {
        match self {
            Field::StapmLimit | Field::FastLimit | Field::SlowLimit | Field::VrmmaxCurrent => {
                1000.0
            }
            Field::SlowTime | Field::StapmTime | Field::TctlTemp => 1.0,
        }
    }

    /// Convert a raw getter reading into the integer the store would hold.
    /// Halves round to even.
    pub fn to_store_value(self, raw: f32) -> i64 {
        (f64::from(raw) * f64::from(self.read_scale())).round_ties_even() as i64
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// The two mutually exclusive SMU performance modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceMode {
    MaxPerformance,
    PowerSaving,
}

impl PerformanceMode {
    pub fn from_max_performance(max: bool) -> Self {
        if max {
            PerformanceMode::MaxPerformance
        } else {
            PerformanceMode::PowerSaving
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PerformanceMode::MaxPerformance => "set_max_performance",
            PerformanceMode::PowerSaving => "set_power_saving",
        }
    }
}

impl std::fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerformanceMode::MaxPerformance => write!(f, "max_performance"),
            PerformanceMode::PowerSaving => write!(f, "power_saving"),
        }
    }
}

/// Outcome of a single libryzenadj setter call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "code")]
pub enum SetStatus {
    Ok,
    UnsupportedFamily,
    UnsupportedSmu,
    Rejected,
    Failed(i32),
}

impl SetStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => SetStatus::Ok,
            -1 => SetStatus::UnsupportedFamily,
            -3 => SetStatus::UnsupportedSmu,
            -4 => SetStatus::Rejected,
            other => SetStatus::Failed(other),
        }
    }

    pub fn is_ok(self) -> bool {
        self == SetStatus::Ok
    }

    /// Error text for a failed call to `function`, `None` on success.
    pub fn message(self, function: &str) -> Option<String> {
        match self {
            SetStatus::Ok => None,
            SetStatus::UnsupportedFamily => {
                Some(format!("{} is not supported on this family", function))
            }
            SetStatus::UnsupportedSmu => Some(format!("{} is not supported on this SMU", function)),
            SetStatus::Rejected => Some(format!("{} is rejected by SMU", function)),
            SetStatus::Failed(code) => Some(format!("{} did fail with {}", function, code)),
        }
    }
}

/// An initialized ryzenadj session. Every hardware read and write goes through it.
pub trait RyzenAdj {
    /// Re-read the SMU power metrics table. Getters return stale values without it.
    fn refresh(&mut self) -> i32;

    fn get(&mut self, field: Field) -> f32;

    fn set(&mut self, field: Field, value: u32) -> i32;

    fn enable(&mut self, mode: PerformanceMode) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_keys_roundtrip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("category"), None);
        assert_eq!(Field::from_key("max-performance"), None);
    }

    #[test]
    fn test_names_match_symbols() {
        for field in Field::ALL {
            assert_eq!(field.setter(), format!("set_{}", field.name()));
            assert_eq!(field.getter(), format!("get_{}", field.name()));
        }
    }

    #[test]
    fn test_symbols_follow_field_names() {
        assert_eq!(Field::VrmmaxCurrent.setter(), "set_vrmmax_current");
        assert_eq!(Field::TctlTemp.getter(), "get_tctl_temp");
        assert_eq!(Field::StapmTime.setter(), "set_stapm_time");
    }

    #[test]
    fn test_store_value_scaling() {
        assert_eq!(Field::StapmLimit.to_store_value(25.0), 25000);
        assert_eq!(Field::FastLimit.to_store_value(29.9996), 30000);
        assert_eq!(Field::VrmmaxCurrent.to_store_value(62.5), 62500);
        assert_eq!(Field::TctlTemp.to_store_value(85.4), 85);
        assert_eq!(Field::SlowTime.to_store_value(29.6), 30);
    }

    #[test]
    fn test_store_value_halves_round_to_even() {
        assert_eq!(Field::TctlTemp.to_store_value(84.5), 84);
        assert_eq!(Field::TctlTemp.to_store_value(85.5), 86);
        assert_eq!(Field::StapmTime.to_store_value(150.5), 150);
        assert_eq!(Field::StapmLimit.to_store_value(0.5), 500);
    }

    #[test]
    fn test_set_status_codes() {
        assert_eq!(SetStatus::from_code(0), SetStatus::Ok);
        assert_eq!(SetStatus::from_code(-1), SetStatus::UnsupportedFamily);
        assert_eq!(SetStatus::from_code(-3), SetStatus::UnsupportedSmu);
        assert_eq!(SetStatus::from_code(-4), SetStatus::Rejected);
        assert_eq!(SetStatus::from_code(-2), SetStatus::Failed(-2));
        assert_eq!(SetStatus::from_code(7), SetStatus::Failed(7));
    }

    #[test]
    fn test_set_status_messages() {
        assert_eq!(SetStatus::Ok.message("set_fast_limit"), None);
        assert_eq!(
            SetStatus::UnsupportedFamily.message("set_fast_limit").unwrap(),
            "set_fast_limit is not supported on this family"
        );
        assert_eq!(
            SetStatus::UnsupportedSmu.message("set_tctl_temp").unwrap(),
            "set_tctl_temp is not supported on this SMU"
        );
        assert_eq!(
            SetStatus::Rejected.message("set_slow_time").unwrap(),
            "set_slow_time is rejected by SMU"
        );
        assert_eq!(
            SetStatus::Failed(-2).message("set_power_saving").unwrap(),
            "set_power_saving did fail with -2"
        );
    }

    #[test]
    fn test_performance_mode_selection() {
        assert_eq!(
            PerformanceMode::from_max_performance(true).symbol(),
            "set_max_performance"
        );
        assert_eq!(
            PerformanceMode::from_max_performance(false).symbol(),
            "set_power_saving"
        );
    }
}
