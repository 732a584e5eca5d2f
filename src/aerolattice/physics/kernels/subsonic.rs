// src/aerolattice/physics/kernels/subsonic.rs

use super::{KernelVelocity, ReceiverGeom, VortexFrame};
use crate::aerolattice::infra::constants::physics::SUBSONIC_CPI;
use crate::aerolattice::physics::numerics::clamp_denominator;

/// 亚声速马蹄涡核函数 (β² > 0)
///
/// 斜置有限展长附着涡段 + 两条顺流向半无限尾涡腿的 Biot–Savart
/// 闭式解，在发射面板涡系坐标下求值。接收点落在涡线上时
/// (|z|² 低于容差) 面内分量直接置零，不做近零除法。
#[inline]
pub fn induced_velocity(frame: &VortexFrame, rx: &ReceiverGeom, beta_squared: f64) -> KernelVelocity {
    // 记号与超声速文献一致: B2 = M² − 1, 亚声速为负
    let b2 = -beta_squared;
    let t = frame.t;

    let rtv1 = rx.y1 * rx.y1 + rx.zsq;
    let rtv2 = rx.y2 * rx.y2 + rx.zsq;

    // 亚声速根式恒正; 接收点与涡端重合时钳到容差
    let rad1 = (rx.x1 * rx.x1 - b2 * rtv1).sqrt().max(frame.tol);
    let rad2 = (rx.x2 * rx.x2 - b2 * rtv2).sqrt().max(frame.tol);

    let xbsq = rx.xty * rx.xty;
    let tbz = (t * t - b2) * rx.zsq;
    let denom = clamp_denominator(xbsq + tbz, frame.tolsq);

    // 附着涡段贡献
    let fb1 = (t * rx.x1 - b2 * rx.y1) / rad1;
    let fb2 = (t * rx.x2 - b2 * rx.y2) / rad2;

    // 尾涡腿贡献; 腿距离低于容差时该腿不计
    let ft1 = if rtv1 < frame.tolsq {
        0.0
    } else {
        (rx.x1 + rad1) / (rad1 * rtv1)
    };
    let ft2 = if rtv2 < frame.tolsq {
        0.0
    } else {
        (rx.x2 + rad2) / (rad2 * rtv2)
    };

    let qb = (fb1 - fb2) / denom;
    let zetapi = rx.zobar / SUBSONIC_CPI;

    let in_plane = rx.zsq < frame.tolsq;
    let u = if in_plane { 0.0 } else { zetapi * qb };
    let v = if in_plane {
        0.0
    } else {
        zetapi * (ft1 - ft2 - qb * t)
    };
    let w = -(qb * rx.xty + ft1 * rx.y1 - ft2 * rx.y2) / SUBSONIC_CPI;

    KernelVelocity { u, v, w }
}
