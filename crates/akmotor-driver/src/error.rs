//! 驱动层错误类型定义

use crate::mode::MotorMode;
use akmotor_can::CanError;
use akmotor_protocol::ProtocolError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// CAN 驱动错误
    #[error("CAN driver error: {0}")]
    Can(#[from] CanError),

    /// 协议解析错误（如回复帧过短）
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 非法的模式切换
    #[error("Invalid mode transition: {from:?} -> {to:?}")]
    InvalidTransition { from: MotorMode, to: MotorMode },

    /// 回复帧来自其他电机
    #[error("Reply from unexpected motor: expected id 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedSource { expected: u8, actual: u8 },

    /// 配置文件解析失败
    #[cfg(feature = "serde")]
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}
