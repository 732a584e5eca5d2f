// src/aerolattice/infra/error.rs

use thiserror::Error;

pub type AlResult<T> = Result<T, AlError>;

#[derive(Debug, Clone, Error)]
pub enum AlError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("输入参数错误: {0}")]
    InvalidInput(String),

    #[error("面板分布错误: {message}")]
    InvalidPanels { message: String },

    #[error("线性系统奇异 (工况 #{condition}): {message}")]
    SingularSystem { condition: usize, message: String },

    #[error("数值不稳定 (工况 #{condition}, 非有限项 {non_finite}): {message}")]
    NumericalInstability {
        condition: usize,
        message: String,
        non_finite: usize,
    },

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl AlError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_panels(msg: impl Into<String>) -> Self {
        Self::InvalidPanels {
            message: msg.into(),
        }
    }

    pub fn singular_system(condition: usize, msg: impl Into<String>) -> Self {
        Self::SingularSystem {
            condition,
            message: msg.into(),
        }
    }

    pub fn numerical_instability(
        condition: usize,
        msg: impl Into<String>,
        non_finite: usize,
    ) -> Self {
        Self::NumericalInstability {
            condition,
            message: msg.into(),
            non_finite,
        }
    }
}
