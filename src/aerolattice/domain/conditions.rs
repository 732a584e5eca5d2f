// src/aerolattice/domain/conditions.rs

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::aerolattice::infra::constants::{defaults, validation};
use crate::aerolattice::infra::error::{AlError, AlResult};

/// 单个来流工况
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowCondition {
    /// 攻角 [rad]
    pub angle_of_attack: f64,
    /// 自由来流马赫数
    pub mach_number: f64,
}

impl FlowCondition {
    pub fn new(angle_of_attack: f64, mach_number: f64) -> Self {
        Self {
            angle_of_attack,
            mach_number,
        }
    }

    pub fn from_degrees(aoa_deg: f64, mach_number: f64) -> Self {
        Self {
            angle_of_attack: crate::aerolattice::infra::constants::to_radians(aoa_deg),
            mach_number,
        }
    }

    /// 压缩性因子 β² = 1 − M²
    /// 正值为亚声速分支，非正值为超声速分支
    #[inline]
    pub fn beta_squared(&self) -> f64 {
        1.0 - self.mach_number * self.mach_number
    }

    #[inline]
    pub fn is_supersonic(&self) -> bool {
        self.mach_number > 1.0
    }
}

/// 工况批次
///
/// 摄入时完成声速吸附与合法性检查，批次维度是全部下游数组的首维。
#[derive(Debug, Clone)]
pub struct ConditionBatch {
    cases: Vec<FlowCondition>,
}

impl ConditionBatch {
    pub fn new(mut cases: Vec<FlowCondition>) -> AlResult<Self> {
        if cases.is_empty() {
            return Err(AlError::invalid_input("工况批次为空"));
        }

        for (k, case) in cases.iter_mut().enumerate() {
            if !case.angle_of_attack.is_finite() || !case.mach_number.is_finite() {
                return Err(AlError::invalid_input(format!(
                    "工况 #{} 含非有限值 (α={}, M={})",
                    k, case.angle_of_attack, case.mach_number
                )));
            }
            if case.mach_number < 0.0 {
                return Err(AlError::invalid_input(format!(
                    "工况 #{} 马赫数为负: {}",
                    k, case.mach_number
                )));
            }
            if case.mach_number > validation::MAX_REASONABLE_MACH {
                return Err(AlError::invalid_input(format!(
                    "工况 #{} 马赫数 {} 超出线化理论适用范围",
                    k, case.mach_number
                )));
            }
            // 恰好声速: 跨声速核函数奇异, 吸附到 1.001
            if case.mach_number == 1.0 {
                debug!("工况 #{}: M=1 吸附到 {}", k, defaults::SONIC_MACH_SNAP);
                case.mach_number = defaults::SONIC_MACH_SNAP;
            }
            if case.angle_of_attack.abs() > validation::MAX_REASONABLE_AOA {
                warn!(
                    "工况 #{}: 攻角 {:.1}° 超出附着流假设范围",
                    k,
                    crate::aerolattice::infra::constants::to_degrees(case.angle_of_attack)
                );
            }
        }

        Ok(Self { cases })
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn cases(&self) -> &[FlowCondition] {
        &self.cases
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlowCondition> {
        self.cases.iter()
    }
}
