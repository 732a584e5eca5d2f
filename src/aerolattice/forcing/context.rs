// src/aerolattice/forcing/context.rs

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// 控制点处的来流上下文
///
/// 外部协作者 (螺旋桨尾流模型) 在每个控制点叠加的诱导速度分布，
/// 全部以自由来流速度无量纲化。无尾流时为纯自由来流。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnsetFlowContext {
    /// 轴向诱导速度分量 / V∞
    pub vx_induced: Array1<f64>,
    /// 垂向诱导速度分量 / V∞
    pub vz_induced: Array1<f64>,
    /// 当地合速度 / V∞
    pub velocity_ratio: Array1<f64>,
    /// 尾流推进时间步 [s] (无尾流模型时为 0)
    pub wake_timestep: f64,
}

impl OnsetFlowContext {
    /// 纯自由来流 (零诱导)
    pub fn freestream(n_control_points: usize) -> Self {
        Self {
            vx_induced: Array1::zeros(n_control_points),
            vz_induced: Array1::zeros(n_control_points),
            velocity_ratio: Array1::ones(n_control_points),
            wake_timestep: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.vx_induced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vx_induced.is_empty()
    }

    pub fn validate(&self, n_control_points: usize) -> Result<(), String> {
        if self.vx_induced.len() != n_control_points
            || self.vz_induced.len() != n_control_points
            || self.velocity_ratio.len() != n_control_points
        {
            return Err(format!(
                "诱导速度分布长度与控制点数 {} 不匹配",
                n_control_points
            ));
        }
        if !self.wake_timestep.is_finite() || self.wake_timestep < 0.0 {
            return Err(format!("尾流时间步无效: {}", self.wake_timestep));
        }
        let non_finite = self
            .vx_induced
            .iter()
            .chain(self.vz_induced.iter())
            .chain(self.velocity_ratio.iter())
            .filter(|v| !v.is_finite())
            .count();
        if non_finite > 0 {
            return Err(format!("诱导速度分布含 {} 个非有限值", non_finite));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freestream_context() {
        let ctx = OnsetFlowContext::freestream(8);
        assert_eq!(ctx.len(), 8);
        assert_eq!(ctx.wake_timestep, 0.0);
        assert!(ctx.validate(8).is_ok());
        assert_eq!(ctx.velocity_ratio[3], 1.0);
    }

    #[test]
    fn test_validate_length_mismatch() {
        let ctx = OnsetFlowContext::freestream(8);
        assert!(ctx.validate(9).is_err());
    }

    #[test]
    fn test_validate_non_finite() {
        let mut ctx = OnsetFlowContext::freestream(4);
        ctx.vz_induced[2] = f64::NAN;
        assert!(ctx.validate(4).is_err());
    }
}
