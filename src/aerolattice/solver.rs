// src/aerolattice/solver.rs

use glam::DVec3;
use log::{info, warn};
use rayon::prelude::*;
use std::time::Instant;

use crate::aerolattice::domain::conditions::{ConditionBatch, FlowCondition};
use crate::aerolattice::domain::panels::PanelDistribution;
use crate::aerolattice::forcing::{NoWake, PropellerWakeModel};
use crate::aerolattice::infra::config::LatticeSettings;
use crate::aerolattice::infra::error::{AlError, AlResult};
use crate::aerolattice::physics::integrator::CaseSolution;
use crate::aerolattice::physics::kernels::VortexFrame;
use crate::aerolattice::physics::{assembly, influence, integrator};

/// 涡格法批量求解器
///
/// 纯批量变换: 面板分布 + 工况批次 → 气动系数。面板几何在构造时
/// 一次性变换到涡系坐标; 各工况之间无共享可变状态, 批次维度并行。
pub struct VortexLatticeSolver {
    distribution: PanelDistribution,
    settings: LatticeSettings,
    frames: Vec<VortexFrame>,
}

impl VortexLatticeSolver {
    pub fn new(distribution: PanelDistribution, settings: LatticeSettings) -> AlResult<Self> {
        settings.validate().map_err(AlError::config)?;
        if distribution.n_chordwise() != settings.number_chordwise_vortices {
            return Err(AlError::invalid_input(format!(
                "面板分布弦向数 {} 与设置 {} 不一致",
                distribution.n_chordwise(),
                settings.number_chordwise_vortices
            )));
        }

        let frames: Vec<VortexFrame> = distribution
            .panels()
            .iter()
            .map(VortexFrame::from_panel)
            .collect();

        Ok(Self {
            distribution,
            settings,
            frames,
        })
    }

    pub fn distribution(&self) -> &PanelDistribution {
        &self.distribution
    }

    pub fn settings(&self) -> &LatticeSettings {
        &self.settings
    }

    /// 批量求解 (纯自由来流)
    pub fn evaluate(&self, batch: &ConditionBatch) -> Vec<AlResult<CaseSolution>> {
        self.evaluate_with_wake(batch, &NoWake)
    }

    /// 批量求解, 叠加外部螺旋桨尾流诱导
    ///
    /// 工况间相互隔离: 单工况失败 (奇异矩阵, 数值不稳定) 不影响
    /// 批次内其余工况。
    pub fn evaluate_with_wake(
        &self,
        batch: &ConditionBatch,
        wake: &dyn PropellerWakeModel,
    ) -> Vec<AlResult<CaseSolution>> {
        let start = Instant::now();

        let results: Vec<AlResult<CaseSolution>> = batch
            .cases()
            .par_iter()
            .enumerate()
            .map(|(index, condition)| self.solve_case(index, condition, wake))
            .collect();

        let failures = results.iter().filter(|r| r.is_err()).count();
        info!(
            "VLM 批量求解完成: {} 工况 × {} 面板, 失败 {}, 耗时 {:.1} ms",
            batch.len(),
            self.distribution.n_panels(),
            failures,
            start.elapsed().as_secs_f64() * 1e3
        );
        for (index, result) in results.iter().enumerate() {
            if let Err(e) = result {
                warn!("工况 #{} 求解失败: {}", index, e);
            }
        }

        results
    }

    fn solve_case(
        &self,
        index: usize,
        condition: &FlowCondition,
        wake: &dyn PropellerWakeModel,
    ) -> AlResult<CaseSolution> {
        let control_points: Vec<DVec3> = self
            .distribution
            .panels()
            .iter()
            .map(|p| p.control_point)
            .collect();

        let onset = wake.induced_velocities(condition, &control_points)?;
        onset
            .validate(self.distribution.n_panels())
            .map_err(|msg| {
                AlError::invalid_input(format!("工况 #{} 尾流诱导分布无效: {}", index, msg))
            })?;

        let infl = influence::compute_influence(&self.distribution, &self.frames, condition);
        let system = assembly::assemble(&self.distribution, &infl, condition, &onset);
        let gamma = assembly::solve(system, index)?;

        integrator::integrate(
            &self.distribution,
            &self.frames,
            condition,
            index,
            &gamma,
            &infl,
            onset,
            self.settings.leading_edge_suction_multiplier,
        )
    }
}
