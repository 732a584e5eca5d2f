// src/lib.rs

// 声明核心求解器模块
// 具体的代码位于 src/aerolattice/ 目录下
pub mod aerolattice {
    // 声明子模块
    pub mod domain; // 计算域 (涡格面板, 来流条件)
    pub mod forcing; // 外部诱导 (螺旋桨尾流来流)
    pub mod infra; // 基础设施 (配置, 日志, 错误)
    pub mod physics; // 物理核心 (影响系数, 装配, 积分)
    pub mod solver; // 批量求解驱动
}

// 初始化函数 (供可执行入口调用)
pub fn init_logging() {
    // 初始化日志系统，设置默认级别为 Info
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
}
