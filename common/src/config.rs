//! 照合の重みと閾値
//!
//! すべての重みは設定ファイルから上書きできる。

use crate::error::{Error, Result};
use crate::types::MatchStrength;
use serde::{Deserialize, Serialize};

/// 各要素の加点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub company_exact: f64,
    pub company_substring: f64,
    pub company_acronym: f64,
    pub company_fuzzy: f64,
    pub industry_match: f64,
    pub industry_partial: f64,
    pub product_hit: f64,
    pub scope_hit: f64,
    pub keyword_hit: f64,
    /// キーワード加点の上限
    pub keyword_cap: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            company_exact: 0.6,
            company_substring: 0.45,
            company_acronym: 0.4,
            company_fuzzy: 0.25,
            industry_match: 0.3,
            industry_partial: 0.15,
            product_hit: 0.2,
            scope_hit: 0.2,
            keyword_hit: 0.05,
            keyword_cap: 0.15,
        }
    }
}

/// 照合設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// この値以上で一致とみなす
    pub threshold: f64,
    pub weights: Weights,
    /// 部分一致とみなす短い側の最小文字数
    pub min_substring_len: usize,
    /// あいまい一致の類似度下限（Jaro-Winkler）
    pub fuzzy_floor: f64,
    /// キーワードとして扱う最小文字数
    pub min_keyword_len: usize,
    /// 一致のうちこの値以上を high とする
    pub high_band: f64,
    /// 一致のうちこの値以上を medium とする（未満は low）
    pub medium_band: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.35,
            weights: Weights::default(),
            min_substring_len: 3,
            fuzzy_floor: 0.88,
            min_keyword_len: 3,
            high_band: 0.7,
            medium_band: 0.5,
        }
    }
}

impl MatchConfig {
    /// 重み・閾値が有限かつ非負であることを確認する
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        let named = [
            ("threshold", self.threshold),
            ("company_exact", w.company_exact),
            ("company_substring", w.company_substring),
            ("company_acronym", w.company_acronym),
            ("company_fuzzy", w.company_fuzzy),
            ("industry_match", w.industry_match),
            ("industry_partial", w.industry_partial),
            ("product_hit", w.product_hit),
            ("scope_hit", w.scope_hit),
            ("keyword_hit", w.keyword_hit),
            ("keyword_cap", w.keyword_cap),
            ("high_band", self.high_band),
            ("medium_band", self.medium_band),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        // score 0 は常に不一致
        if self.threshold <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "threshold must be greater than 0, got {}",
                self.threshold
            )));
        }
        if self.medium_band > self.high_band {
            return Err(Error::InvalidInput(format!(
                "medium_band ({}) must not exceed high_band ({})",
                self.medium_band, self.high_band
            )));
        }
        if !(0.0..=1.0).contains(&self.fuzzy_floor) {
            return Err(Error::InvalidInput(format!(
                "fuzzy_floor must be within 0.0..=1.0, got {}",
                self.fuzzy_floor
            )));
        }
        Ok(())
    }

    /// 一致の強さ（不一致は `None`）
    pub fn strength(&self, score: f64, matched: bool) -> MatchStrength {
        if !matched {
            MatchStrength::None
        } else if score >= self.high_band {
            MatchStrength::High
        } else if score >= self.medium_band {
            MatchStrength::Medium
        } else {
            MatchStrength::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = MatchConfig::default();
        config.weights.industry_match = -0.1;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("industry_match"));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = MatchConfig {
            threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = MatchConfig {
            threshold: 0.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn test_bands_out_of_order_rejected() {
        let config = MatchConfig {
            medium_band: 0.8,
            high_band: 0.6,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_strength_bands() {
        let config = MatchConfig::default();
        assert_eq!(config.strength(0.9, true), MatchStrength::High);
        assert_eq!(config.strength(0.55, true), MatchStrength::Medium);
        assert_eq!(config.strength(0.4, true), MatchStrength::Low);
        assert_eq!(config.strength(0.9, false), MatchStrength::None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MatchConfig =
            serde_json::from_str(r#"{"threshold": 0.5, "weights": {"company_exact": 1.0}}"#).unwrap();
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.weights.company_exact, 1.0);
        assert_eq!(config.weights.industry_match, 0.3);
        assert_eq!(config.min_substring_len, 3);
        assert_eq!(config.high_band, 0.7);
    }
}
