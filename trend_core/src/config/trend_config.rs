use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::common::{
    enums::{GapFill, NegativePolicy},
    trend_error::{ErrCode, TrendError, TrendResult},
};
use crate::math::{rolling_mean::DEFAULT_SMOOTH_WINDOW, trend_fit::DEFAULT_FIT_WINDOW};

/// Estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendConfig {
    /// Centered rolling-mean width applied before fitting
    pub smooth_window: usize,
    /// Centered regression window width, odd
    pub fit_window: usize,
    /// Fit on the raw series when false
    pub smooth_before_fit: bool,
    pub negative_policy: NegativePolicy,
    /// Applied to calendar gaps before anything else
    pub gap_fill: GapFill,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            smooth_window: DEFAULT_SMOOTH_WINDOW,
            fit_window: DEFAULT_FIT_WINDOW,
            smooth_before_fit: true,
            negative_policy: NegativePolicy::Keep,
            gap_fill: GapFill::None,
        }
    }
}

impl TrendConfig {
    /// Build from loosely typed key/value pairs. Absent keys take their
    /// defaults; unknown keys and values of the wrong type are rejected.
    pub fn new(conf: Option<HashMap<String, serde_json::Value>>) -> TrendResult<Self> {
        let mut conf = ConfigWithCheck::new(conf.unwrap_or_default());
        let default = Self::default();

        let config = Self {
            smooth_window: conf.get("smooth_window")?.unwrap_or(default.smooth_window),
            fit_window: conf.get("fit_window")?.unwrap_or(default.fit_window),
            smooth_before_fit: conf
                .get("smooth_before_fit")?
                .unwrap_or(default.smooth_before_fit),
            negative_policy: conf
                .get("negative_policy")?
                .unwrap_or(default.negative_policy),
            gap_fill: conf.get("gap_fill")?.unwrap_or(default.gap_fill),
        };
        conf.check()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON object such as `{"fit_window": 7, "gap_fill": "zero"}`.
    pub fn from_json_str(s: &str) -> TrendResult<Self> {
        let conf: HashMap<String, serde_json::Value> = serde_json::from_str(s).map_err(|e| {
            TrendError::new(format!("invalid config json: {}", e), ErrCode::ConfigError)
        })?;
        Self::new(Some(conf))
    }

    pub fn validate(&self) -> TrendResult<()> {
        if self.smooth_window == 0 {
            return Err(TrendError::new(
                "smooth_window must be positive",
                ErrCode::ParaError,
            ));
        }
        if self.fit_window < 3 || self.fit_window % 2 == 0 {
            return Err(TrendError::new(
                format!("fit_window must be odd and at least 3, got {}", self.fit_window),
                ErrCode::ParaError,
            ));
        }
        Ok(())
    }
}

/// Key/value bag that remembers which keys were read, so leftovers can be
/// reported as unknown.
struct ConfigWithCheck {
    conf: HashMap<String, serde_json::Value>,
}

impl ConfigWithCheck {
    fn new(conf: HashMap<String, serde_json::Value>) -> Self {
        Self { conf }
    }

    fn get<T: DeserializeOwned>(&mut self, key: &str) -> TrendResult<Option<T>> {
        match self.conf.remove(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(v) => serde_json::from_value(v).map(Some).map_err(|e| {
                TrendError::new(format!("bad value for {}: {}", key, e), ErrCode::ConfigError)
            }),
        }
    }

    fn check(&self) -> TrendResult<()> {
        let mut unknown: Vec<&str> = self.conf.keys().map(String::as_str).collect();
        if unknown.is_empty() {
            return Ok(());
        }
        unknown.sort_unstable();
        Err(TrendError::new(
            format!("unknown para = {}", unknown.join(", ")),
            ErrCode::ParaError,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn conf(pairs: &[(&str, serde_json::Value)]) -> Option<HashMap<String, serde_json::Value>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = TrendConfig::new(None).unwrap();
        assert_eq!(config, TrendConfig::default());
        assert_eq!(config.smooth_window, 7);
        assert_eq!(config.fit_window, 9);
        assert!(config.smooth_before_fit);
    }

    #[test]
    fn test_overrides() {
        let config = TrendConfig::new(conf(&[
            ("fit_window", json!(7)),
            ("negative_policy", json!("clip")),
            ("gap_fill", json!("ffill")),
            ("smooth_before_fit", json!(false)),
        ]))
        .unwrap();
        assert_eq!(config.fit_window, 7);
        assert_eq!(config.negative_policy, NegativePolicy::Clip);
        assert_eq!(config.gap_fill, GapFill::ForwardFill);
        assert!(!config.smooth_before_fit);
    }

    #[test]
    fn test_unknown_key() {
        let err = TrendConfig::new(conf(&[("window", json!(9))])).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ParaError);
        assert!(err.msg.contains("window"));
    }

    #[test]
    fn test_wrong_type() {
        let err = TrendConfig::new(conf(&[("fit_window", json!("nine"))])).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ConfigError);
    }

    #[test]
    fn test_even_fit_window() {
        let err = TrendConfig::new(conf(&[("fit_window", json!(8))])).unwrap_err();
        assert_eq!(err.errcode, ErrCode::ParaError);
    }

    #[test]
    fn test_from_json_str() {
        let config = TrendConfig::from_json_str(r#"{"smooth_window": 5, "gap_fill": "zero"}"#).unwrap();
        assert_eq!(config.smooth_window, 5);
        assert_eq!(config.gap_fill, GapFill::Zero);
        assert_eq!(
            TrendConfig::from_json_str("[1, 2]").unwrap_err().errcode,
            ErrCode::ConfigError
        );
    }
}
