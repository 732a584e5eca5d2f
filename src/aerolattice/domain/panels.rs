// src/aerolattice/domain/panels.rs

use glam::DVec3;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::aerolattice::infra::constants::{tolerances, validation};
use crate::aerolattice::infra::error::{AlError, AlResult};

/// 单个马蹄涡面板
///
/// 由面板分布协作者生成，对本核心只读。附着涡端点 A/B 位于 1/4 弦
/// 铰线上，控制点位于 3/4 弦。镜像 (负展向) 面板在摄入时统一规范化，
/// 下游核函数不再区分左右。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VortexPanel {
    /// 前缘角点 (内侧 / 外侧)
    pub front_a: DVec3,
    pub front_b: DVec3,
    /// 后缘角点
    pub rear_a: DVec3,
    pub rear_b: DVec3,
    /// 附着涡端点 (1/4 弦铰线)
    pub hinge_a: DVec3,
    pub hinge_b: DVec3,
    /// 控制点 (3/4 弦)
    pub control_point: DVec3,
    /// 条带尾缘 x 坐标 (内侧 / 外侧)
    pub te_x_a: f64,
    pub te_x_b: f64,
    /// 条带当地弦长 [m]
    pub chord: f64,
    /// 面板面积 [m²]
    pub area: f64,
    /// 单位法向量
    pub normal: DVec3,
    /// 所属机翼索引
    pub wing: usize,
    /// 全局展向条带索引
    pub spanwise: usize,
    /// 条带内弦向位置 (0 = 前缘)
    pub chordwise: usize,
}

impl VortexPanel {
    /// 附着涡中点
    #[inline]
    pub fn hinge_mid(&self) -> DVec3 {
        0.5 * (self.hinge_a + self.hinge_b)
    }

    /// 铰线在 y-z 平面内的投影长度 (条带展宽)
    #[inline]
    pub fn hinge_span(&self) -> f64 {
        let dy = self.hinge_b.y - self.hinge_a.y;
        let dz = self.hinge_b.z - self.hinge_a.z;
        (dy * dy + dz * dz).sqrt()
    }

    /// 当地上反角正弦/余弦
    #[inline]
    pub fn dihedral_sin_cos(&self) -> (f64, f64) {
        let d = self.hinge_span();
        (
            (self.hinge_b.z - self.hinge_a.z) / d,
            (self.hinge_b.y - self.hinge_a.y) / d,
        )
    }

    /// 当地上反角 [rad]
    #[inline]
    pub fn dihedral_angle(&self) -> f64 {
        (self.hinge_b.z - self.hinge_a.z).atan2(self.hinge_b.y - self.hinge_a.y)
    }

    /// 弯度面斜率: 前后缘中点连线相对 x 轴的斜率
    #[inline]
    pub fn camber_slope(&self) -> f64 {
        let front = 0.5 * (self.front_a + self.front_b);
        let rear = 0.5 * (self.rear_a + self.rear_b);
        let dx = rear.x - front.x;
        if dx.abs() < tolerances::EPSILON_GEOM {
            return 0.0;
        }
        (rear.z - front.z) / dx
    }

    /// 弯度面角 δ [rad]
    ///
    /// 控制点相对铰线中点的 z/x 偏移；弦向偏移按亚声速
    /// Prandtl–Glauert 因子拉伸 (超声速时因子取 1)。
    #[inline]
    pub fn camber_surface_angle(&self, inv_root_beta: f64) -> f64 {
        let ch = self.hinge_mid();
        let dz = self.control_point.z - ch.z;
        let dx = (self.control_point.x - ch.x) * inv_root_beta;
        dz.atan2(dx)
    }

    /// 镜像规范化: 附着涡端点按展向升序重标记
    ///
    /// 镜像 (负展向) 面板的 B 端落在 A 端内侧，须交换 A/B 标签使
    /// 环量符号约定跨对称面一致。纯重标记，不改变几何；垂直安定面
    /// (y 相等) 按 z 升序取向。
    pub fn canonicalized(mut self) -> Self {
        let swap = self.hinge_b.y < self.hinge_a.y
            || (self.hinge_b.y == self.hinge_a.y && self.hinge_b.z < self.hinge_a.z);
        if swap {
            std::mem::swap(&mut self.front_a, &mut self.front_b);
            std::mem::swap(&mut self.rear_a, &mut self.rear_b);
            std::mem::swap(&mut self.hinge_a, &mut self.hinge_b);
            std::mem::swap(&mut self.te_x_a, &mut self.te_x_b);
        }
        self
    }
}

/// 机翼级标量元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WingSurface {
    pub name: String,
    /// 参考面积 [m²]
    pub area: f64,
    /// 平均气动弦长 [m]
    pub mean_aerodynamic_chord: f64,
    /// 气动中心 x 坐标 [m]
    pub aerodynamic_center_x: f64,
    pub symmetric: bool,
    pub vertical: bool,
}

/// 面板分布 (外部协作者的输出, 本核心只读)
///
/// 面板顺序约定: 条带优先、条带内弦向连续，
/// 即面板 k 的 (条带, 弦向) = (k / n_cw, k % n_cw)。
#[derive(Debug, Clone)]
pub struct PanelDistribution {
    panels: Vec<VortexPanel>,
    wings: Vec<WingSurface>,
    n_chordwise: usize,
    n_strips: usize,
    /// 各条带所属机翼
    strip_wing: Vec<usize>,
    /// 整机参考面积 [m²]
    pub reference_area: f64,
    /// 整机重心 x 坐标；缺省时力矩参考点退化到主翼气动中心
    pub center_of_gravity_x: Option<f64>,
}

impl PanelDistribution {
    pub fn new(
        panels: Vec<VortexPanel>,
        wings: Vec<WingSurface>,
        n_chordwise: usize,
        reference_area: f64,
        center_of_gravity_x: Option<f64>,
    ) -> AlResult<Self> {
        if panels.is_empty() {
            return Err(AlError::invalid_panels("面板列表为空"));
        }
        if wings.is_empty() {
            return Err(AlError::invalid_panels("机翼元数据为空"));
        }
        if n_chordwise == 0 {
            return Err(AlError::invalid_panels("弦向涡格数必须 ≥ 1"));
        }
        if panels.len() % n_chordwise != 0 {
            return Err(AlError::invalid_panels(format!(
                "面板数 {} 不是弦向数 {} 的整数倍",
                panels.len(),
                n_chordwise
            )));
        }
        if !(reference_area.is_finite() && reference_area > 0.0) {
            return Err(AlError::invalid_panels(format!(
                "参考面积无效: {}",
                reference_area
            )));
        }
        for (w, wing) in wings.iter().enumerate() {
            if wing.area <= 0.0 || wing.mean_aerodynamic_chord <= 0.0 {
                return Err(AlError::invalid_panels(format!(
                    "机翼 #{} ({}) 面积或气动弦长非正",
                    w, wing.name
                )));
            }
        }

        let panels: Vec<VortexPanel> = panels.into_iter().map(VortexPanel::canonicalized).collect();

        let n_strips = panels.len() / n_chordwise;
        let mut strip_wing = vec![0usize; n_strips];

        for (k, panel) in panels.iter().enumerate() {
            let strip = k / n_chordwise;
            let cw = k % n_chordwise;
            if panel.spanwise != strip || panel.chordwise != cw {
                return Err(AlError::invalid_panels(format!(
                    "面板 #{} 索引 ({}, {}) 与排列位置 ({}, {}) 不一致",
                    k, panel.spanwise, panel.chordwise, strip, cw
                )));
            }
            if panel.wing >= wings.len() {
                return Err(AlError::invalid_panels(format!(
                    "面板 #{} 引用不存在的机翼 #{}",
                    k, panel.wing
                )));
            }
            if !(panel.chord.is_finite() && panel.chord > tolerances::EPSILON_GEOM) {
                return Err(AlError::invalid_panels(format!(
                    "面板 #{} 弦长无效: {}",
                    k, panel.chord
                )));
            }
            if !(panel.area.is_finite() && panel.area > 0.0) {
                return Err(AlError::invalid_panels(format!(
                    "面板 #{} 面积无效: {}",
                    k, panel.area
                )));
            }
            if panel.hinge_span() < tolerances::EPSILON_GEOM {
                return Err(AlError::invalid_panels(format!("面板 #{} 铰线长度退化", k)));
            }
            if (panel.normal.length() - 1.0).abs() > validation::MAX_NORMAL_DEVIATION {
                return Err(AlError::invalid_panels(format!(
                    "面板 #{} 法向量非单位长度: {}",
                    k,
                    panel.normal.length()
                )));
            }
            if cw == 0 {
                strip_wing[strip] = panel.wing;
            } else if strip_wing[strip] != panel.wing {
                return Err(AlError::invalid_panels(format!(
                    "条带 #{} 内面板跨机翼",
                    strip
                )));
            }
        }

        info!(
            "面板分布就绪: {} 面板, {} 条带 × {} 弦向, {} 机翼, Sref={:.3} m²",
            panels.len(),
            n_strips,
            n_chordwise,
            wings.len(),
            reference_area
        );

        Ok(Self {
            panels,
            wings,
            n_chordwise,
            n_strips,
            strip_wing,
            reference_area,
            center_of_gravity_x,
        })
    }

    #[inline]
    pub fn n_panels(&self) -> usize {
        self.panels.len()
    }

    #[inline]
    pub fn n_strips(&self) -> usize {
        self.n_strips
    }

    #[inline]
    pub fn n_chordwise(&self) -> usize {
        self.n_chordwise
    }

    #[inline]
    pub fn panels(&self) -> &[VortexPanel] {
        &self.panels
    }

    #[inline]
    pub fn wings(&self) -> &[WingSurface] {
        &self.wings
    }

    /// 条带内的弦向面板切片 (前缘在前)
    #[inline]
    pub fn strip_panels(&self, strip: usize) -> &[VortexPanel] {
        let start = strip * self.n_chordwise;
        &self.panels[start..start + self.n_chordwise]
    }

    #[inline]
    pub fn wing_of_strip(&self, strip: usize) -> usize {
        self.strip_wing[strip]
    }

    /// 主翼: 非垂直机翼中平均气动弦长最大者
    fn main_wing(&self) -> &WingSurface {
        self.wings
            .iter()
            .filter(|w| !w.vertical)
            .max_by(|a, b| {
                a.mean_aerodynamic_chord
                    .total_cmp(&b.mean_aerodynamic_chord)
            })
            .unwrap_or_else(|| {
                warn!("无水平机翼, 力矩参考退化到首个机翼");
                &self.wings[0]
            })
    }

    /// 力矩归一化弦长与参考点 x 坐标
    ///
    /// 未提供重心时退化到主翼气动中心。
    pub fn moment_reference(&self) -> (f64, f64) {
        let main = self.main_wing();
        let c_bar = main.mean_aerodynamic_chord;
        let x_ref = self
            .center_of_gravity_x
            .unwrap_or(main.aerodynamic_center_x);
        (c_bar, x_ref)
    }
}
