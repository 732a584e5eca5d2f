// src/aerolattice/physics/integrator.rs

use nalgebra::DVector;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::aerolattice::domain::conditions::FlowCondition;
use crate::aerolattice::domain::panels::PanelDistribution;
use crate::aerolattice::forcing::OnsetFlowContext;
use crate::aerolattice::infra::error::{AlError, AlResult};
use crate::aerolattice::physics::influence::InfluenceMatrices;
use crate::aerolattice::physics::kernels::VortexFrame;
use crate::aerolattice::physics::numerics::count_non_finite;

/// 诱导速度剖面记录 (供推进耦合下游使用)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityProfile {
    /// 外部 (螺旋桨尾流) 轴向诱导分布 / V∞
    pub vx_induced: Array1<f64>,
    /// 外部垂向诱导分布 / V∞
    pub vz_induced: Array1<f64>,
    /// 当地合速度分布 / V∞
    pub velocity_ratio: Array1<f64>,
    /// 尾流推进时间步 [s]
    pub wake_timestep: f64,
    /// 解算后涡系在控制点的轴向诱导速度 (U·Γ)
    pub axial_induced: Array1<f64>,
    /// 解算后涡系在控制点的下洗 (W·Γ)
    pub downwash: Array1<f64>,
}

/// 单工况求解结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSolution {
    pub condition: FlowCondition,
    /// 整机升力系数
    pub cl: f64,
    /// 整机诱导阻力系数
    pub cdi: f64,
    /// 整机俯仰力矩系数 (关于力矩参考点, 平均气动弦长归一)
    pub cm: f64,
    /// 各机翼系数 (机翼面积归一)
    pub cl_wing: Vec<f64>,
    pub cdi_wing: Vec<f64>,
    pub cm_wing: Vec<f64>,
    /// 各条带截面系数
    pub cl_y: Array1<f64>,
    pub cdi_y: Array1<f64>,
    /// 面板压力载荷系数 ΔCp
    pub delta_cp: Array1<f64>,
    /// 环量解
    pub circulation: Array1<f64>,
    pub velocity_profile: VelocityProfile,
}

/// 条带积分: 环量 → 截面/机翼/整机系数
///
/// 均匀弦向划分约定: 载荷点位于各面板 1/4 弦, 条带法向力按
/// 1/n_cw 加权; 轴向力由载荷点处的弯度面斜率给出, 可选的
/// 前缘吸力项按 √(t² − B2) 修正亚声速前缘。
#[allow(clippy::too_many_arguments)]
pub fn integrate(
    dist: &PanelDistribution,
    frames: &[VortexFrame],
    condition: &FlowCondition,
    condition_index: usize,
    gamma: &DVector<f64>,
    infl: &InfluenceMatrices,
    onset: OnsetFlowContext,
    suction_multiplier: f64,
) -> AlResult<CaseSolution> {
    let n = dist.n_panels();
    let n_cw = dist.n_chordwise();
    let n_strips = dist.n_strips();
    let n_wings = dist.wings().len();

    let (sin_alpha, cos_alpha) = condition.angle_of_attack.sin_cos();
    let b2 = -condition.beta_squared(); // M² − 1
    let (c_bar, x_ref) = dist.moment_reference();

    // 弦向载荷点参数
    let rnmax = n_cw as f64;
    let pion = 2.0 / rnmax;
    let adc = 0.5 * pion;
    // 首个涡中点的弦向位置 (弦长分数)
    let xle = 0.125 * pion;

    let mut delta_cp = Array1::<f64>::zeros(n);
    let mut cl_y = Array1::<f64>::zeros(n_strips);
    let mut cdi_y = Array1::<f64>::zeros(n_strips);
    let mut lift_wing = vec![0.0; n_wings];
    let mut drag_wing = vec![0.0; n_wings];
    let mut moment_wing = vec![0.0; n_wings];
    let mut lift_total = 0.0;
    let mut drag_total = 0.0;
    let mut moment_total = 0.0;

    for strip in 0..n_strips {
        let panels = dist.strip_panels(strip);
        let leading = &panels[0];
        let chord = leading.chord;
        let (_, cod) = leading.dihedral_sin_cos();
        // 条带展宽与名义面积
        let es = leading.hinge_span();
        let strip_area = es * chord;

        let mut cnc = 0.0;
        let mut caxl = 0.0;
        let mut bmle = 0.0;

        for (k, panel) in panels.iter().enumerate() {
            let j = strip * n_cw + k;
            // 条带归一化载荷系数
            let gnet = gamma[j] * cos_alpha * rnmax / chord;
            let dcp = 2.0 * gnet;
            delta_cp[j] = dcp;

            let sinf = adc * dcp;
            cnc += sinf;

            // 载荷点弦向位置与当地弯度面斜率
            // (相邻载荷点间的斜率混合未经验证, 此处取面板自身斜率)
            let tx = panel.camber_slope();
            caxl += -sinf * tx / (1.0 + tx * tx);

            let xx = ((k + 1) as f64 - 0.75) * pion / 2.0;
            bmle += (xle - xx) * sinf;
        }

        // 前缘吸力模拟项 (符号可选; 默认关闭)
        if suction_multiplier != 0.0 {
            let le_index = strip * n_cw;
            let dcp_le = delta_cp[le_index];
            let t_le = frames[le_index].t;
            let t2_le = t_le * t_le;
            // 亚声速前缘 (t² > B2) 才有吸力
            let stb = if b2 < t2_le { (t2_le - b2).sqrt() } else { 0.0 };
            let cle = 0.5 * dcp_le * xle.sqrt();
            let csuc = 0.5 * PI * suction_multiplier.abs() * cle * cle * stb;

            let sle = leading.camber_slope();
            let xcos = 1.0 / (1.0 + sle * sle).sqrt();
            let xsin = sle * xcos;
            let (tfx, tfz) = if suction_multiplier < 0.0 {
                (xsin * dcp_le.signum(), xcos.abs() * dcp_le.signum())
            } else {
                (xcos, -xsin)
            };
            caxl -= tfx * csuc;
            cnc += csuc * (1.0 + t2_le).sqrt() * tfz;
        }

        // 条带力的体轴分量 (零侧滑: 侧向力不进入输出系数)
        let bfx = caxl;
        let bfz = cnc * cod;

        let bmle_c = bmle * chord;

        // 条带前缘附着涡中点 = 力矩臂参考
        let le_mid = leading.hinge_mid();
        let bmy = bmle_c * cod + bfx * le_mid.z - bfz * (le_mid.x - x_ref);

        let cdc = (bfz * sin_alpha + bfx * cos_alpha) * chord;

        let lift = (bfz * cos_alpha - bfx * sin_alpha) * strip_area;
        let drag = cdc * es;
        let moment = strip_area * bmy;

        cl_y[strip] = lift / strip_area;
        cdi_y[strip] = drag / strip_area;

        let wing = dist.wing_of_strip(strip);
        lift_wing[wing] += lift;
        drag_wing[wing] += drag;
        moment_wing[wing] += moment;
        lift_total += lift;
        drag_total += drag;
        moment_total += moment;
    }

    let s_ref = dist.reference_area;
    let cl = lift_total / s_ref;
    let cdi = drag_total / s_ref;
    let cm = moment_total / s_ref / c_bar;

    let cl_wing: Vec<f64> = dist
        .wings()
        .iter()
        .enumerate()
        .map(|(w, wing)| lift_wing[w] / wing.area)
        .collect();
    let cdi_wing: Vec<f64> = dist
        .wings()
        .iter()
        .enumerate()
        .map(|(w, wing)| drag_wing[w] / wing.area)
        .collect();
    let cm_wing: Vec<f64> = dist
        .wings()
        .iter()
        .enumerate()
        .map(|(w, wing)| moment_wing[w] / wing.area / c_bar)
        .collect();

    // 解算后的控制点诱导速度
    let circulation = Array1::from_iter(gamma.iter().copied());
    let axial_induced = infl.u.dot(&circulation);
    let downwash = infl.w.dot(&circulation);

    // 有限性断言: 未被标记的声速退化会在这里显形, 不得静默传播
    let non_finite = count_non_finite(
        [cl, cdi, cm]
            .iter()
            .chain(cl_y.iter())
            .chain(cdi_y.iter())
            .chain(delta_cp.iter()),
    );
    if non_finite > 0 {
        return Err(AlError::numerical_instability(
            condition_index,
            "积分系数含非有限值",
            non_finite,
        ));
    }

    Ok(CaseSolution {
        condition: *condition,
        cl,
        cdi,
        cm,
        cl_wing,
        cdi_wing,
        cm_wing,
        cl_y,
        cdi_y,
        delta_cp,
        circulation,
        velocity_profile: VelocityProfile {
            vx_induced: onset.vx_induced,
            vz_induced: onset.vz_induced,
            velocity_ratio: onset.velocity_ratio,
            wake_timestep: onset.wake_timestep,
            axial_induced,
            downwash,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aerolattice::physics::assembly;
    use crate::aerolattice::physics::influence::compute_influence;
    use crate::aerolattice::physics::tests::flat_plate;

    fn solve_flat(aoa: f64, mach: f64, n_sw: usize, n_cw: usize, spc: f64) -> CaseSolution {
        let dist = flat_plate::rectangular_wing(10.0, 1.0, n_sw, n_cw, false);
        let frames: Vec<VortexFrame> = dist.panels().iter().map(VortexFrame::from_panel).collect();
        let condition = FlowCondition::new(aoa, mach);
        let infl = compute_influence(&dist, &frames, &condition);
        let onset = OnsetFlowContext::freestream(dist.n_panels());
        let system = assembly::assemble(&dist, &infl, &condition, &onset);
        let gamma = assembly::solve(system, 0).unwrap();
        integrate(
            &dist, &frames, &condition, 0, &gamma, &infl, onset, spc,
        )
        .unwrap()
    }

    #[test]
    fn test_zero_alpha_zero_loads() {
        let sol = solve_flat(0.0, 0.3, 4, 2, 0.0);
        assert!(sol.cl.abs() < 1e-12);
        assert!(sol.cdi.abs() < 1e-12);
        assert!(sol.cm.abs() < 1e-12);
        assert!(sol.delta_cp.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_positive_alpha_positive_lift_and_drag() {
        let sol = solve_flat(4.0_f64.to_radians(), 0.3, 8, 4, 0.0);
        assert!(sol.cl > 0.0);
        assert!(sol.cdi > 0.0);
        // 平板载荷向前缘集中: ΔCp 前缘最大
        assert!(sol.delta_cp[0] > sol.delta_cp[1]);
    }

    #[test]
    fn test_strip_coefficients_consistent_with_totals() {
        let sol = solve_flat(4.0_f64.to_radians(), 0.3, 6, 3, 0.0);
        // cl_y 加权 (条带面积/参考面积) 之和 = CL
        let span_strip = 10.0 / 6.0;
        let weighted: f64 = sol.cl_y.iter().map(|cl| cl * span_strip * 1.0 / 10.0).sum();
        assert!((weighted - sol.cl).abs() < 1e-10);
    }

    #[test]
    fn test_wing_coefficient_matches_total_single_wing() {
        // 单机翼, 机翼面积 = 参考面积: CL_wing == CL
        let sol = solve_flat(4.0_f64.to_radians(), 0.3, 6, 3, 0.0);
        assert!((sol.cl_wing[0] - sol.cl).abs() < 1e-12);
    }

    #[test]
    fn test_downwash_recorded_at_control_points() {
        let sol = solve_flat(4.0_f64.to_radians(), 0.3, 4, 2, 0.0);
        // 正升力 → 控制点处净下洗为负
        assert!(sol.velocity_profile.downwash.iter().sum::<f64>() < 0.0);
        assert_eq!(sol.velocity_profile.wake_timestep, 0.0);
    }

    #[test]
    fn test_suction_reduces_induced_drag() {
        // 前缘吸力把部分法向力旋转为推力分量
        let without = solve_flat(4.0_f64.to_radians(), 0.3, 8, 4, 0.0);
        let with = solve_flat(4.0_f64.to_radians(), 0.3, 8, 4, 1.0);
        assert!(with.cdi < without.cdi);
    }
}
