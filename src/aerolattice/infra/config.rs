// src/aerolattice/infra/config.rs

use serde::{Deserialize, Serialize};

use crate::aerolattice::infra::constants::defaults;

/// 涡格离散与求解设置
///
/// `spanwise_cosine_spacing` 由面板生成协作者消费，这里仅透传。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeSettings {
    pub number_spanwise_vortices: usize,
    pub number_chordwise_vortices: usize,
    pub spanwise_cosine_spacing: bool,
    /// 前缘吸力系数 (SPC)。0 关闭；符号决定吸力方向分支
    pub leading_edge_suction_multiplier: f64,
}

impl Default for LatticeSettings {
    fn default() -> Self {
        Self {
            number_spanwise_vortices: defaults::NUMBER_SPANWISE_VORTICES,
            number_chordwise_vortices: defaults::NUMBER_CHORDWISE_VORTICES,
            spanwise_cosine_spacing: true,
            leading_edge_suction_multiplier: defaults::LE_SUCTION_MULTIPLIER,
        }
    }
}

impl LatticeSettings {
    pub fn new(n_sw: usize, n_cw: usize) -> Self {
        Self {
            number_spanwise_vortices: n_sw,
            number_chordwise_vortices: n_cw,
            ..Default::default()
        }
    }

    pub fn with_cosine_spacing(mut self, enabled: bool) -> Self {
        self.spanwise_cosine_spacing = enabled;
        self
    }

    pub fn with_suction_multiplier(mut self, spc: f64) -> Self {
        self.leading_edge_suction_multiplier = spc;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.number_spanwise_vortices == 0 {
            return Err("展向涡格数必须 ≥ 1".into());
        }
        if self.number_chordwise_vortices == 0 {
            return Err("弦向涡格数必须 ≥ 1".into());
        }
        if !self.leading_edge_suction_multiplier.is_finite() {
            return Err("前缘吸力系数必须是有限值".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = LatticeSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.leading_edge_suction_multiplier, 0.0);
    }

    #[test]
    fn test_builder_pattern() {
        let settings = LatticeSettings::new(10, 4)
            .with_cosine_spacing(false)
            .with_suction_multiplier(-1.0);
        assert_eq!(settings.number_spanwise_vortices, 10);
        assert_eq!(settings.number_chordwise_vortices, 4);
        assert!(!settings.spanwise_cosine_spacing);
        assert_eq!(settings.leading_edge_suction_multiplier, -1.0);
    }

    #[test]
    fn test_validation_failure() {
        let mut settings = LatticeSettings::default();
        settings.number_chordwise_vortices = 0;
        assert!(settings.validate().is_err());
    }
}
