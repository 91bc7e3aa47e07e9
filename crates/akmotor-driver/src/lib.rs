//! 驱动层模块
//!
//! 本模块提供 AK 系列电机的单通道驱动，包括：
//! - 指令向量的钳位与提交
//! - 回复帧轮询与遥测更新
//! - 使能 / 失能 / 置零模式状态机
//!
//! 传输层通过 [`akmotor_can::CanAdapter`] 注入，本层不创建线程、不排队、不重试。

mod channel;
mod config;
mod error;
pub mod mode;

pub use channel::{ClampOutcome, MotorChannel, SendOutcome, SkipReason};
pub use config::ChannelConfig;
pub use error::DriverError;
pub use mode::MotorMode;
