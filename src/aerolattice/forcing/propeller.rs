// src/aerolattice/forcing/propeller.rs

use glam::DVec3;

use super::context::OnsetFlowContext;
use crate::aerolattice::domain::conditions::FlowCondition;
use crate::aerolattice::infra::error::AlResult;

/// 螺旋桨尾流模型 (外部协作者接口)
///
/// 推进耦合模块按工况给出各控制点的附加诱导速度分布；
/// 求解器把它叠加进流面相切边界条件的右端项。
pub trait PropellerWakeModel: Send + Sync {
    fn induced_velocities(
        &self,
        condition: &FlowCondition,
        control_points: &[DVec3],
    ) -> AlResult<OnsetFlowContext>;
}

/// 空尾流模型: 纯自由来流
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWake;

impl PropellerWakeModel for NoWake {
    fn induced_velocities(
        &self,
        _condition: &FlowCondition,
        control_points: &[DVec3],
    ) -> AlResult<OnsetFlowContext> {
        Ok(OnsetFlowContext::freestream(control_points.len()))
    }
}
