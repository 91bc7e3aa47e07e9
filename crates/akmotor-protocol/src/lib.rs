//! # AK Motor Protocol
//!
//! AK 系列无刷执行器 CAN 总线协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `constants`: 协议常量（参数范围、位宽、模式码）
//! - `quantize`: 浮点数与定宽无符号整数之间的量化
//! - `descriptor`: 五个指令槽位的参数描述符
//! - `command`: 指令帧打包
//! - `feedback`: 回复帧解析
//! - `mode`: 模式哨兵帧与帧类型识别
//!
//! ## 字节序
//!
//! 所有字段均为 MSB 在前（大端），12 位字段会跨越字节边界。

pub mod command;
pub mod constants;
pub mod descriptor;
pub mod feedback;
pub mod mode;
pub mod quantize;

pub use command::*;
pub use constants::*;
pub use descriptor::*;
pub use feedback::*;
pub use mode::*;
pub use quantize::*;

use thiserror::Error;

/// CAN 2.0 标准帧的统一抽象
///
/// 协议层和适配层之间的中间类型：协议层通过 `to_frame()` 构建、
/// 通过 `TryFrom<MotorFrame>` 解析，适配层负责与具体硬件帧互转。
///
/// ```rust
/// use akmotor_protocol::MotorFrame;
///
/// let frame = MotorFrame::new_standard(0x01, &[1, 2, 3, 4]);
/// assert_eq!(frame.id(), 0x01);
/// assert_eq!(frame.data_slice(), &[1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorFrame {
    /// CAN ID（标准帧或扩展帧）
    pub id: u32,

    /// 帧数据（固定 8 字节，未使用部分为 0）
    pub data: [u8; 8],

    /// 有效数据长度 (0-8)
    pub len: u8,

    /// 是否为扩展帧（29-bit ID）
    pub is_extended: bool,
}

impl MotorFrame {
    /// 创建标准帧
    pub fn new_standard(id: u16, data: &[u8]) -> Self {
        Self::new(id as u32, data, false)
    }

    /// 创建扩展帧
    pub fn new_extended(id: u32, data: &[u8]) -> Self {
        Self::new(id, data, true)
    }

    fn new(id: u32, data: &[u8], is_extended: bool) -> Self {
        let mut fixed_data = [0u8; 8];
        let len = data.len().min(8);
        fixed_data[..len].copy_from_slice(&data[..len]);

        Self {
            id,
            data: fixed_data,
            len: len as u8,
            is_extended,
        }
    }

    /// 获取数据切片（只包含有效数据）
    pub fn data_slice(&self) -> &[u8] {
        &self.data[..(self.len as usize).min(8)]
    }

    /// 获取 CAN ID
    pub fn id(&self) -> u32 {
        self.id
    }

    /// 获取完整数据（8字节固定数组）
    pub fn data(&self) -> &[u8; 8] {
        &self.data
    }
}

/// 协议编解码错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid frame length: expected at least {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Unsupported bit width: {bits} (only 12 and 16 are supported)")]
    UnsupportedBitWidth { bits: u8 },

    #[error("Invalid parameter range: min {min} must be finite and below max {max}")]
    InvalidRange { min: f32, max: f32 },

    #[error("Mode sentinel frame (code 0x{code:02X}) cannot be decoded as telemetry")]
    UnexpectedSentinel { code: u8 },

    #[error("Unknown mode code: 0x{code:02X}")]
    InvalidModeCode { code: u8 },
}
