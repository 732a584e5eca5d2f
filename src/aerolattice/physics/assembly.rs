// src/aerolattice/physics/assembly.rs

use nalgebra::{DMatrix, DVector};

use crate::aerolattice::domain::conditions::FlowCondition;
use crate::aerolattice::domain::panels::PanelDistribution;
use crate::aerolattice::forcing::OnsetFlowContext;
use crate::aerolattice::infra::error::{AlError, AlResult};
use crate::aerolattice::physics::influence::InfluenceMatrices;

/// 单工况的线性系统: A·Γ = RHS
pub struct AssembledSystem {
    pub aic: DMatrix<f64>,
    pub rhs: DVector<f64>,
}

/// 装配气动影响系数矩阵与流面相切右端项
///
/// 三个速度分量按接收面板的上反角 φ 与弯度面角 δ 投影到当地法向;
/// 右端项是来流 (自由来流 + 外部诱导) 的法向分量。声速行在投影后
/// 由邻域平均模板整体替换。
pub fn assemble(
    dist: &PanelDistribution,
    infl: &InfluenceMatrices,
    condition: &FlowCondition,
    onset: &OnsetFlowContext,
) -> AssembledSystem {
    let n = dist.n_panels();

    // 弯度面角的亚声速 Prandtl–Glauert 拉伸; 超声速取 1
    let mach = condition.mach_number;
    let inv_root_beta = if mach < 1.0 {
        1.0 / (1.0 - mach * mach).sqrt()
    } else {
        1.0
    };

    let mut sin_delta = vec![0.0; n];
    let mut cos_delta = vec![0.0; n];
    let mut sin_phi = vec![0.0; n];
    let mut cos_phi = vec![0.0; n];
    for (i, panel) in dist.panels().iter().enumerate() {
        let (sd, cd) = panel.camber_surface_angle(inv_root_beta).sin_cos();
        let (sp, cp) = panel.dihedral_angle().sin_cos();
        sin_delta[i] = sd;
        cos_delta[i] = cd;
        sin_phi[i] = sp;
        cos_phi[i] = cp;
    }

    let mut aic = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            aic[(i, j)] = infl.u[[i, j]] * sin_delta[i] * cos_phi[i]
                + infl.v[[i, j]] * cos_delta[i] * sin_phi[i]
                - infl.w[[i, j]] * cos_phi[i] * cos_delta[i];
        }
    }

    let (sin_alpha, cos_alpha) = condition.angle_of_attack.sin_cos();
    let mut rhs = DVector::<f64>::zeros(n);
    for i in 0..n {
        let vx = cos_alpha + onset.vx_induced[i];
        let vz = sin_alpha + onset.vz_induced[i];
        rhs[i] = (vz * cos_delta[i] - vx * sin_delta[i]) * cos_phi[i];
    }

    apply_sonic_repair(&mut aic, &mut rhs, &infl.sonic, dist.n_chordwise());

    AssembledSystem { aic, rhs }
}

/// 声速行修补 (显式邻接后处理)
///
/// 被标记面板的方程替换为邻域平均模板: 对角 +2, 条带内弦向
/// 前后邻 −1, 右端项置零，解出的环量被强制趋向前后邻的平均。
/// 只有单侧邻 (条带前/后缘) 时退化为与该邻相等; 单弦向面板退化
/// 为零环量。
fn apply_sonic_repair(
    aic: &mut DMatrix<f64>,
    rhs: &mut DVector<f64>,
    sonic: &[bool],
    n_chordwise: usize,
) {
    for (j, &flagged) in sonic.iter().enumerate() {
        if !flagged {
            continue;
        }
        for col in 0..aic.ncols() {
            aic[(j, col)] = 0.0;
        }
        let cw = j % n_chordwise;
        let has_fore = cw > 0;
        let has_aft = cw + 1 < n_chordwise;
        match (has_fore, has_aft) {
            (true, true) => {
                aic[(j, j)] = 2.0;
                aic[(j, j - 1)] = -1.0;
                aic[(j, j + 1)] = -1.0;
            }
            (true, false) => {
                aic[(j, j)] = 2.0;
                aic[(j, j - 1)] = -2.0;
            }
            (false, true) => {
                aic[(j, j)] = 2.0;
                aic[(j, j + 1)] = -2.0;
            }
            (false, false) => {
                aic[(j, j)] = 1.0;
            }
        }
        rhs[j] = 0.0;
    }
}

/// 稠密直接求解环量向量
///
/// 矩阵奇异对该工况是致命的，不重试; 批次中其余工况不受影响。
pub fn solve(system: AssembledSystem, condition_index: usize) -> AlResult<DVector<f64>> {
    let AssembledSystem { aic, rhs } = system;
    let gamma = aic
        .lu()
        .solve(&rhs)
        .ok_or_else(|| AlError::singular_system(condition_index, "影响系数矩阵不可逆"))?;

    let non_finite = gamma.iter().filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        return Err(AlError::numerical_instability(
            condition_index,
            "环量解含非有限值",
            non_finite,
        ));
    }
    Ok(gamma)
}
