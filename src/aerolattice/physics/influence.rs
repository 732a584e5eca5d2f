// src/aerolattice/physics/influence.rs

use glam::DVec3;
use log::debug;
use ndarray::{Array2, Zip};

use crate::aerolattice::domain::conditions::FlowCondition;
use crate::aerolattice::domain::panels::PanelDistribution;
use crate::aerolattice::physics::kernels::{
    subsonic, supersonic, KernelVelocity, ReceiverGeom, VortexFrame,
};

/// 单工况速度影响矩阵组 (接收控制点 × 发射面板)
///
/// 三个分量矩阵按机体坐标给出; 超声速工况额外携带
/// 波阻对角修正 (已并入 w) 与声速面板标志。
pub struct InfluenceMatrices {
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    pub w: Array2<f64>,
    /// 每个面板的附着涡是否恰沿马赫线后掠
    pub sonic: Vec<bool>,
}

/// 计算一个工况下全部 (发射面板, 接收控制点) 对的诱导速度
///
/// 分支按工况整体选定 (亚/超声速核是两个独立的纯函数)，
/// 数值核心内部不再出现马赫数条件。
pub fn compute_influence(
    dist: &PanelDistribution,
    frames: &[VortexFrame],
    condition: &FlowCondition,
) -> InfluenceMatrices {
    let n = dist.n_panels();
    let beta_squared = condition.beta_squared();
    let is_supersonic = beta_squared <= 0.0;

    let kernel: fn(&VortexFrame, &ReceiverGeom, f64) -> KernelVelocity = if is_supersonic {
        supersonic::induced_velocity
    } else {
        subsonic::induced_velocity
    };

    let control_points: Vec<DVec3> = dist.panels().iter().map(|p| p.control_point).collect();

    let mut u = Array2::<f64>::zeros((n, n));
    let mut v = Array2::<f64>::zeros((n, n));
    let mut w = Array2::<f64>::zeros((n, n));

    Zip::indexed(&mut u)
        .and(&mut v)
        .and(&mut w)
        .par_for_each(|(i, j), u_ij, v_ij, w_ij| {
            let frame = &frames[j];
            let rx = frame.receiver(control_points[i]);
            let kv = frame.rotate_back(kernel(frame, &rx, beta_squared));
            *u_ij = kv.u;
            *v_ij = kv.v;
            *w_ij = kv.w;
        });

    let mut sonic = vec![false; n];
    if is_supersonic {
        let n_cw = dist.n_chordwise();

        // 波阻主值项: 自诱导下洗的对角修正
        for (j, frame) in frames.iter().enumerate() {
            w[[j, j]] += supersonic::wave_drag_diagonal(beta_squared, frame.t, frame.chord, n_cw);
        }

        // 声速面板检测: 弦向前后邻接判据, 条带边缘以 0 封闭
        for j in 0..n {
            let cw = j % n_cw;
            let t2_fore = if cw > 0 {
                frames[j - 1].t * frames[j - 1].t
            } else {
                0.0
            };
            let t2_aft = if cw + 1 < n_cw {
                frames[j + 1].t * frames[j + 1].t
            } else {
                0.0
            };
            sonic[j] = supersonic::is_sonic_pair(beta_squared, t2_fore, t2_aft);
        }

        let sonic_count = sonic.iter().filter(|&&f| f).count();
        if sonic_count > 0 {
            debug!(
                "M={:.3}: {} 个声速面板进入邻域平均修补",
                condition.mach_number, sonic_count
            );
        }
    }

    InfluenceMatrices { u, v, w, sonic }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aerolattice::physics::tests::flat_plate;

    #[test]
    fn test_subsonic_no_sonic_flags() {
        let dist = flat_plate::rectangular_wing(10.0, 1.0, 4, 2, false);
        let frames: Vec<VortexFrame> = dist.panels().iter().map(VortexFrame::from_panel).collect();
        let condition = FlowCondition::new(0.05, 0.3);
        let infl = compute_influence(&dist, &frames, &condition);
        assert!(infl.sonic.iter().all(|&f| !f));
        assert_eq!(infl.w.dim(), (8, 8));
    }

    #[test]
    fn test_subsonic_self_downwash_negative() {
        // 自诱导下洗: 对角元为负 (正环量产生下洗)
        let dist = flat_plate::rectangular_wing(10.0, 1.0, 4, 2, false);
        let frames: Vec<VortexFrame> = dist.panels().iter().map(VortexFrame::from_panel).collect();
        let condition = FlowCondition::new(0.05, 0.3);
        let infl = compute_influence(&dist, &frames, &condition);
        for j in 0..dist.n_panels() {
            assert!(infl.w[[j, j]] < 0.0);
        }
    }

    #[test]
    fn test_supersonic_wave_term_on_diagonal() {
        // 无后掠超声速: 自诱导由波阻主值项主导
        let dist = flat_plate::rectangular_wing(10.0, 1.0, 4, 2, false);
        let frames: Vec<VortexFrame> = dist.panels().iter().map(VortexFrame::from_panel).collect();
        let condition = FlowCondition::new(0.05, 1.4);
        let infl = compute_influence(&dist, &frames, &condition);
        let expected = -0.5 * (1.4_f64 * 1.4 - 1.0).sqrt() / 0.5; // chord/n_cw = 0.5
        for j in 0..dist.n_panels() {
            assert!((infl.w[[j, j]] - expected).abs() < 1e-9);
        }
        // 无后掠机翼没有声速面板
        assert!(infl.sonic.iter().all(|&f| !f));
    }

    #[test]
    fn test_swept_wing_sonic_flags_at_strip_edges() {
        // 后掠 45° (t=1), M=1.2: B2=0.44 < t², 条带前后缘面板被标记
        let dist = flat_plate::swept_wing(10.0, 1.0, 4, 3, 45.0_f64.to_radians(), false);
        let frames: Vec<VortexFrame> = dist.panels().iter().map(VortexFrame::from_panel).collect();
        let condition = FlowCondition::new(0.02, 1.2);
        let infl = compute_influence(&dist, &frames, &condition);
        let n_cw = dist.n_chordwise();
        for (j, &flag) in infl.sonic.iter().enumerate() {
            let cw = j % n_cw;
            if cw == 0 || cw == n_cw - 1 {
                assert!(flag, "条带边缘面板 #{} 应被标记", j);
            } else {
                assert!(!flag, "内部面板 #{} 不应被标记", j);
            }
        }
    }
}
