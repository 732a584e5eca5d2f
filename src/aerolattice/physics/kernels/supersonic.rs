// src/aerolattice/physics/kernels/supersonic.rs

use super::{KernelVelocity, ReceiverGeom, VortexFrame};
use crate::aerolattice::infra::constants::physics::SUPERSONIC_CPI;
use crate::aerolattice::infra::constants::tolerances::MACH_CONE_CUTOFF;
use crate::aerolattice::physics::numerics::clamp_denominator;

/// 超声速马蹄涡核函数 (β² ≤ 0)
///
/// Biot–Savart 核的双曲 (马赫锥) 对应式。扰动只存在于发射涡的
/// 后马赫锥内: 接收点在锥外 (根式非正)、锥面附近 (RO 超过截断)
/// 或涡腿上游 (x 低于容差) 时该腿贡献为零。接收点落在马蹄涡
/// 自身平面内时改用退化的二维面内公式。
#[inline]
pub fn induced_velocity(frame: &VortexFrame, rx: &ReceiverGeom, beta_squared: f64) -> KernelVelocity {
    let b2 = -beta_squared; // = M² − 1 ≥ 0
    let t = frame.t;

    let rtv1 = rx.y1 * rx.y1 + rx.zsq;
    let rtv2 = rx.y2 * rx.y2 + rx.zsq;
    let ro1 = b2 * rtv1;
    let ro2 = b2 * rtv2;

    let arg1 = rx.x1 * rx.x1 - ro1;
    let arg2 = rx.x2 * rx.x2 - ro2;
    let mut rad1 = if arg1 > 0.0 { arg1.sqrt() } else { 0.0 };
    let mut rad2 = if arg2 > 0.0 { arg2.sqrt() } else { 0.0 };
    if rx.x1 < frame.tol {
        rad1 = 0.0;
    }
    if rx.x2 < frame.tol {
        rad2 = 0.0;
    }

    // 共面接收点: 退化二维公式
    if rx.zsq < frame.tolsq2 {
        return in_plane(frame, rx, rad1, rad2);
    }

    let denom = clamp_denominator(rx.xty * rx.xty + (t * t - b2) * rx.zsq, frame.tolsq);

    // 锥面截断: RO > 0.8·X² 的腿不计
    let leg1 = rad1 > 0.0 && ro1 <= MACH_CONE_CUTOFF * rx.x1 * rx.x1;
    let leg2 = rad2 > 0.0 && ro2 <= MACH_CONE_CUTOFF * rx.x2 * rx.x2;

    let (fb1, ft1) = if leg1 {
        let fb = (t * rx.x1 - b2 * rx.y1) / rad1;
        let ft = if rtv1 < frame.tolsq {
            0.0
        } else {
            rx.x1 / (rad1 * rtv1)
        };
        (fb, ft)
    } else {
        (0.0, 0.0)
    };
    let (fb2, ft2) = if leg2 {
        let fb = (t * rx.x2 - b2 * rx.y2) / rad2;
        let ft = if rtv2 < frame.tolsq {
            0.0
        } else {
            rx.x2 / (rad2 * rtv2)
        };
        (fb, ft)
    } else {
        (0.0, 0.0)
    };

    let qb = (fb1 - fb2) / denom;
    let zetapi = rx.zobar / SUPERSONIC_CPI;

    KernelVelocity {
        u: zetapi * qb,
        v: zetapi * (ft1 - ft2 - qb * t),
        w: -(qb * rx.xty + ft1 * rx.y1 - ft2 * rx.y2) / SUPERSONIC_CPI,
    }
}

/// 接收点位于马蹄涡自身平面内时的退化公式
#[inline]
fn in_plane(frame: &VortexFrame, rx: &ReceiverGeom, rad1: f64, rad2: f64) -> KernelVelocity {
    let f1 = if rx.y1.abs() > frame.tol {
        rad1 / rx.y1
    } else {
        0.0
    };
    let f2 = if rx.y2.abs() > frame.tol {
        rad2 / rx.y2
    } else {
        0.0
    };
    let w = if rx.xty.abs() > frame.tol {
        (-f1 + f2) / (rx.xty * SUPERSONIC_CPI)
    } else {
        0.0
    };

    KernelVelocity { u: 0.0, v: 0.0, w }
}

/// 波阻主值项 (自诱导下洗修正)
///
/// 附着涡腿后掠角小于马赫角 (B2 > t²) 的面板，其自诱导积分的
/// 广义主值部分; 加在影响矩阵对角线上，弦向宽度 chord/n_cw 归一。
#[inline]
pub fn wave_drag_diagonal(beta_squared: f64, t: f64, chord: f64, n_chordwise: usize) -> f64 {
    let b2 = -beta_squared;
    let t2 = t * t;
    if b2 > t2 {
        let cox = chord / n_chordwise as f64;
        -0.5 * (b2 - t2).sqrt() / cox
    } else {
        0.0
    }
}

/// 判定发射面板的附着涡腿是否恰沿当地马赫线后掠
///
/// 以弦向前后相邻面板的斜置斜率平方为界: B2 落在两者之间
/// (乘积变号) 即为声速面板，其核函数奇异，由装配阶段修补。
#[inline]
pub fn is_sonic_pair(beta_squared: f64, t2_fore: f64, t2_aft: f64) -> bool {
    let b2 = -beta_squared;
    (b2 - t2_fore) * (b2 - t2_aft) < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn unswept_frame(half_span: f64, chord: f64) -> VortexFrame {
        VortexFrame {
            mid: DVec3::ZERO,
            cos_theta: 1.0,
            sin_theta: 0.0,
            s: half_span,
            t: 0.0,
            tol: half_span / 500.0,
            tolsq: (half_span / 500.0).powi(2),
            tolsq2: 2500.0 * (half_span / 500.0).powi(2),
            chord,
        }
    }

    const M14: f64 = 1.0 - 1.4 * 1.4; // β² at M=1.4

    #[test]
    fn test_upstream_point_feels_nothing() {
        // 接收点在发射涡上游: 后马赫锥外, 零贡献
        let frame = unswept_frame(0.5, 1.0);
        let rx = frame.receiver(DVec3::new(-2.0, 0.0, 0.5));
        let kv = induced_velocity(&frame, &rx, M14);
        assert_eq!(kv, KernelVelocity::default());
    }

    #[test]
    fn test_point_outside_mach_cone_feels_nothing() {
        // 正侧方: x² < (M²−1)(y²+z²), 锥外
        let frame = unswept_frame(0.5, 1.0);
        let rx = frame.receiver(DVec3::new(0.1, 5.0, 0.5));
        let kv = induced_velocity(&frame, &rx, M14);
        assert_eq!(kv, KernelVelocity::default());
    }

    #[test]
    fn test_in_plane_downstream_downwash() {
        // 共面正后方: 二维退化式, 下洗为负
        let frame = unswept_frame(0.5, 1.0);
        let rx = frame.receiver(DVec3::new(2.0, 0.0, 0.0));
        let kv = induced_velocity(&frame, &rx, -1.0); // M = √2
        assert_eq!(kv.u, 0.0);
        assert_eq!(kv.v, 0.0);
        assert!(kv.w < 0.0);
        assert!(kv.w.is_finite());
    }

    #[test]
    fn test_in_plane_matches_closed_form() {
        let s: f64 = 0.5;
        let x: f64 = 2.0;
        let frame = unswept_frame(s, 1.0);
        let rx = frame.receiver(DVec3::new(x, 0.0, 0.0));
        let kv = induced_velocity(&frame, &rx, -1.0); // b2 = 1
        let rad = (x * x - s * s).sqrt();
        let expected = -(2.0 * rad / s) / (x * SUPERSONIC_CPI);
        assert!((kv.w - expected).abs() < 1e-12);
    }

    #[test]
    fn test_off_plane_point_in_cone_is_finite() {
        let frame = unswept_frame(0.5, 1.0);
        let rx = frame.receiver(DVec3::new(3.0, 0.2, 0.4));
        let kv = induced_velocity(&frame, &rx, M14);
        assert!(kv.u.is_finite() && kv.v.is_finite() && kv.w.is_finite());
        assert!(kv.w < 0.0);
    }

    #[test]
    fn test_wave_drag_diagonal_value() {
        // 无后掠, M=1.4: −0.5·√(M²−1)/(c/n_cw)
        let w = wave_drag_diagonal(M14, 0.0, 1.0, 4);
        let expected = -0.5 * (1.4_f64 * 1.4 - 1.0).sqrt() / 0.25;
        assert!((w - expected).abs() < 1e-12);
    }

    #[test]
    fn test_wave_drag_vanishes_behind_mach_line() {
        // 后掠角大于马赫角 (t² > B2): 无主值项
        assert_eq!(wave_drag_diagonal(M14, 2.0, 1.0, 4), 0.0);
        // 亚声速腿 (B2 < 0): 无主值项
        assert_eq!(wave_drag_diagonal(0.91, 0.0, 1.0, 4), 0.0);
    }

    #[test]
    fn test_sonic_pair_detection() {
        // M=1.2: B2 = 0.44; 前邻 t²=0.2, 后邻 t²=1.0 → 马赫线落在两者之间
        let b2m12 = 1.0 - 1.2 * 1.2;
        assert!(is_sonic_pair(b2m12, 0.2, 1.0));
        // 两邻均在马赫线同侧 → 非声速
        assert!(!is_sonic_pair(b2m12, 0.1, 0.2));
        assert!(!is_sonic_pair(b2m12, 1.0, 2.0));
    }
}
