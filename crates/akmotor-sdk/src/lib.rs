//! AK Motor SDK - CubeMars AK 系列关节电机 Rust SDK
//!
//! 通过 CAN 总线以 MIT 模式驱动电机：每一帧指令同时携带目标位置、
//! 目标速度、KP、KD 和前馈力矩，电机回复位置、速度和力矩。
//!
//! # 架构设计
//!
//! - **协议层** (`protocol`): 量化、指令帧打包、回复帧解析、模式哨兵帧
//! - **CAN 层** (`can`): 传输抽象，支持 SocketCAN 和 Mock
//! - **驱动层** (`driver`): 单电机通道与模式状态机
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use akmotor_sdk::prelude::*;
//!
//! # #[cfg(target_os = "linux")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! akmotor_sdk::init_logger();
//!
//! let mut bus = akmotor_sdk::can::SocketCanAdapter::new("can0")?;
//! let mut motor = MotorChannel::new(0x01, true);
//! motor.init(&mut bus)?;
//! motor.set_position(&mut bus, 0.5)?;
//! println!("position = {:.3} rad", motor.position());
//! # Ok(())
//! # }
//! # #[cfg(not(target_os = "linux"))]
//! # fn main() {}
//! ```

pub mod prelude;

/// 协议层（无 I/O）
pub mod protocol {
    pub use akmotor_protocol::*;
}

/// CAN 传输层
pub mod can {
    pub use akmotor_can::*;
}

/// 驱动层
pub mod driver {
    pub use akmotor_driver::*;
}

pub use akmotor_can::{CanAdapter, CanError, MotorFrame};
pub use akmotor_driver::{
    ChannelConfig, ClampOutcome, DriverError, MotorChannel, MotorMode, SendOutcome, SkipReason,
};
pub use akmotor_protocol::ProtocolError;

/// 未设置 `RUST_LOG` 时使用的过滤指令
pub const DEFAULT_LOG_DIRECTIVES: &str = "akmotor_driver=info,akmotor_can=info";

/// 初始化全局日志
///
/// 优先读取 `RUST_LOG`，否则使用 [`DEFAULT_LOG_DIRECTIVES`]。同时把 `log`
/// crate 的记录桥接到 `tracing`。重复调用是安全的，已安装的订阅者不会被替换。
pub fn init_logger() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }

    // log -> tracing 桥接
    if tracing_log::LogTracer::init().is_err() {
        tracing::debug!("log -> tracing bridge already installed");
    }
}
