// src/aerolattice/infra/constants.rs

use std::f64::consts::PI;

/// 物理常数 (Immutable Physics)
/// 涡格法核函数与坐标换算所依赖的固定量。
pub mod physics {
    use super::PI;

    // --- 角度转换 ---

    /// 角度转弧度系数 (π / 180)
    pub const DEG_TO_RAD: f64 = PI / 180.0;

    /// 弧度转角度系数 (1 / DEG_TO_RAD)
    /// 使用倒数定义以保证数学一致性
    pub const RAD_TO_DEG: f64 = 1.0 / DEG_TO_RAD;

    // --- 马蹄涡核函数归一化 ---

    /// 亚声速核函数归一化因子 (4π)
    pub const SUBSONIC_CPI: f64 = 4.0 * PI;

    /// 超声速核函数归一化因子 (2π)
    /// 超声速扰动只在后马赫锥内传播，立体角减半
    pub const SUPERSONIC_CPI: f64 = 2.0 * PI;
}

/// 验证阈值 (Validation Thresholds)
/// 用于 Fail-Fast 机制，检测输入是否违背物理常识。
pub mod validation {
    /// 物理上合理的最大马赫数
    /// 线化位流理论在高超声速下失效
    pub const MAX_REASONABLE_MACH: f64 = 10.0;

    /// 物理上合理的最大攻角 [rad] (约 30°)
    /// 超过此值附着流假设必然失效，仅警告不报错
    pub const MAX_REASONABLE_AOA: f64 = 0.5236;

    /// 面板法向量模长偏离 1 的容许量
    pub const MAX_NORMAL_DEVIATION: f64 = 1e-6;
}

/// 系统默认值 (Defaults)
/// 用于 `LatticeSettings` 初始化。
pub mod defaults {
    /// 默认展向涡格数 (整个翼展)
    pub const NUMBER_SPANWISE_VORTICES: usize = 25;

    /// 默认弦向涡格数
    pub const NUMBER_CHORDWISE_VORTICES: usize = 5;

    /// 前缘吸力系数默认关闭
    /// 负值启用吸力方向翻转分支
    pub const LE_SUCTION_MULTIPLIER: f64 = 0.0;

    /// 恰好声速的马赫数重映射值
    /// M=1 时跨声速核函数奇异，摄入阶段直接吸附到 1.001
    pub const SONIC_MACH_SNAP: f64 = 1.001;
}

/// 数值容差 (Numerical Tolerances)
/// 核函数奇异性防护与浮点比较。
pub mod tolerances {
    /// 通用浮点比较极小值
    pub const EPSILON: f64 = 1e-9;

    /// 几何量 (弦长, 面积, 铰线长) 的有效下限 [m]
    pub const EPSILON_GEOM: f64 = 1e-12;

    /// 核函数容差与面板半展长之比 (TOL = s / 500)
    pub const KERNEL_TOL_DIVISOR: f64 = 500.0;

    /// 共面判据放大因子 (ZSQ < 2500·TOL²)
    pub const IN_PLANE_FACTOR: f64 = 2500.0;

    /// 马赫锥边界截断系数
    /// 接收点落在锥面附近 (RO > 0.8·X²) 时该涡腿贡献置零
    pub const MACH_CONE_CUTOFF: f64 = 0.8;
}

// --- 辅助函数 ---

/// 将角度转换为弧度
#[inline(always)]
pub fn to_radians(deg: f64) -> f64 {
    deg * physics::DEG_TO_RAD
}

/// 将弧度转换为角度
#[inline(always)]
pub fn to_degrees(rad: f64) -> f64 {
    rad * physics::RAD_TO_DEG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_consistency() {
        // 测试角度转换的互逆性
        let deg = 45.0;
        let rad = to_radians(deg);
        let deg_back = to_degrees(rad);
        assert!((deg - deg_back).abs() < tolerances::EPSILON);

        // 测试乘积为 1
        assert!((physics::DEG_TO_RAD * physics::RAD_TO_DEG - 1.0).abs() < tolerances::EPSILON);
    }

    #[test]
    fn test_kernel_normalization() {
        // 超声速核的立体角是亚声速的一半
        assert!(
            (physics::SUBSONIC_CPI - 2.0 * physics::SUPERSONIC_CPI).abs() < tolerances::EPSILON
        );
    }

    #[test]
    fn test_sonic_snap_above_unity() {
        assert!(defaults::SONIC_MACH_SNAP > 1.0);
    }
}
