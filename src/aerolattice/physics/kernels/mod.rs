// src/aerolattice/physics/kernels/mod.rs

pub mod subsonic;
pub mod supersonic;

use glam::DVec3;

use crate::aerolattice::domain::panels::VortexPanel;
use crate::aerolattice::infra::constants::tolerances;

/// 单位环量马蹄涡在某接收点诱导的三个速度分量 (涡系局部坐标)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KernelVelocity {
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

/// 发射面板的涡系坐标参数
///
/// 把附着涡段旋转到局部 y 轴上; 线参数 s (旋转系半展长) 与
/// t (斜置斜率) 只依赖几何，整个工况批次共用一份。
#[derive(Debug, Clone, Copy)]
pub struct VortexFrame {
    /// 附着涡中点
    pub mid: DVec3,
    pub cos_theta: f64,
    pub sin_theta: f64,
    /// 旋转系下附着涡半展长
    pub s: f64,
    /// 附着涡斜置斜率 (后掠量 / 半展长)
    pub t: f64,
    /// 数值容差: s / 500
    pub tol: f64,
    pub tolsq: f64,
    /// 共面判据: 2500·tol²
    pub tolsq2: f64,
    /// 条带当地弦长 (波阻主值项用)
    pub chord: f64,
}

/// 接收点在发射面板涡系坐标下的相对量
#[derive(Debug, Clone, Copy)]
pub struct ReceiverGeom {
    /// 相对 A 端 (内侧) 的弦向/展向距离
    pub x1: f64,
    pub y1: f64,
    /// 相对 B 端 (外侧)
    pub x2: f64,
    pub y2: f64,
    /// 接收点在马蹄涡平面上的投影到斜置涡延长线的轴向距离
    pub xty: f64,
    pub zobar: f64,
    pub zsq: f64,
}

impl VortexFrame {
    pub fn from_panel(panel: &VortexPanel) -> Self {
        let a = panel.hinge_a;
        let b = panel.hinge_b;
        let mid = panel.hinge_mid();

        // 旋转角: 附着涡段在 y-z 平面内的倾角 (上反角)
        let theta = (b.z - a.z).atan2(b.y - a.y);
        let (sin_theta, cos_theta) = theta.sin_cos();

        let x1bar = b.x - mid.x;
        let y1bar = (b.y - mid.y) * cos_theta + (b.z - mid.z) * sin_theta;

        let s = y1bar.abs();
        let t = x1bar / y1bar;

        let tol = s / tolerances::KERNEL_TOL_DIVISOR;
        let tolsq = tol * tol;

        Self {
            mid,
            cos_theta,
            sin_theta,
            s,
            t,
            tol,
            tolsq,
            tolsq2: tolerances::IN_PLANE_FACTOR * tolsq,
            chord: panel.chord,
        }
    }

    /// 把接收点变换到本面板的涡系坐标
    #[inline]
    pub fn receiver(&self, point: DVec3) -> ReceiverGeom {
        let dx = point.x - self.mid.x;
        let dy = point.y - self.mid.y;
        let dz = point.z - self.mid.z;

        let xobar = dx;
        let yobar = dy * self.cos_theta + dz * self.sin_theta;
        let zobar = -dy * self.sin_theta + dz * self.cos_theta;

        ReceiverGeom {
            x1: xobar + self.t * self.s,
            y1: yobar + self.s,
            x2: xobar - self.t * self.s,
            y2: yobar - self.s,
            xty: xobar - self.t * yobar,
            zobar,
            zsq: zobar * zobar,
        }
    }

    /// 把涡系坐标下的诱导速度旋转回机体坐标
    #[inline]
    pub fn rotate_back(&self, kv: KernelVelocity) -> KernelVelocity {
        KernelVelocity {
            u: kv.u,
            v: kv.v * self.cos_theta - kv.w * self.sin_theta,
            w: kv.v * self.sin_theta + kv.w * self.cos_theta,
        }
    }
}
