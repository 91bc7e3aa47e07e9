//! 模式哨兵帧
//!
//! 模式切换复用同一个 8 字节帧，但内容是固定哨兵：
//! Byte 0-6 全部为 `0xFF`，Byte 7 为模式码。哨兵帧是独立的帧类型，
//! 不能按量化数据解析。

use crate::constants::{FRAME_LEN, MODE_CODE_ENTER, MODE_CODE_EXIT, MODE_CODE_ZERO, SENTINEL_FILL};
use crate::{MotorFrame, ProtocolError};

/// 模式请求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeRequest {
    /// 进入电机模式（使能）
    Enter,
    /// 退出电机模式（失能）
    Exit,
    /// 将当前位置设为零点
    Zero,
}

/// 模式码表
///
/// 不同固件版本的模式码可能不同，默认值为 `0xFC / 0xFD / 0xFE`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModeCodes {
    pub enter: u8,
    pub exit: u8,
    pub zero: u8,
}

impl Default for ModeCodes {
    fn default() -> Self {
        Self {
            enter: MODE_CODE_ENTER,
            exit: MODE_CODE_EXIT,
            zero: MODE_CODE_ZERO,
        }
    }
}

impl ModeCodes {
    pub fn code(&self, request: ModeRequest) -> u8 {
        match request {
            ModeRequest::Enter => self.enter,
            ModeRequest::Exit => self.exit,
            ModeRequest::Zero => self.zero,
        }
    }

    /// 模式码反查请求
    pub fn request_for(&self, code: u8) -> Result<ModeRequest, ProtocolError> {
        if code == self.enter {
            Ok(ModeRequest::Enter)
        } else if code == self.exit {
            Ok(ModeRequest::Exit)
        } else if code == self.zero {
            Ok(ModeRequest::Zero)
        } else {
            Err(ProtocolError::InvalidModeCode { code })
        }
    }
}

/// 构建哨兵帧数据：`{0xFF × 7, code}`
pub fn sentinel_bytes(code: u8) -> [u8; FRAME_LEN] {
    let mut data = [SENTINEL_FILL; FRAME_LEN];
    data[FRAME_LEN - 1] = code;
    data
}

/// 模式切换帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeCommand {
    pub address: u16,
    pub request: ModeRequest,
}

impl ModeCommand {
    pub fn new(address: u16, request: ModeRequest) -> Self {
        Self { address, request }
    }

    pub fn enter(address: u16) -> Self {
        Self::new(address, ModeRequest::Enter)
    }

    pub fn exit(address: u16) -> Self {
        Self::new(address, ModeRequest::Exit)
    }

    pub fn zero(address: u16) -> Self {
        Self::new(address, ModeRequest::Zero)
    }

    /// 转换为 CAN 帧
    pub fn to_frame(&self, codes: &ModeCodes) -> MotorFrame {
        MotorFrame::new_standard(self.address, &sentinel_bytes(codes.code(self.request)))
    }
}

/// 帧类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// 量化指令或回复数据
    Command,
    /// 模式哨兵帧，携带 Byte 7 的模式码
    ModeSentinel(u8),
}

/// 哨兵检测：除最后一个字节外全部为 `0xFF` 时返回最后一个字节（模式码）
///
/// 适用于任意长度的有效数据，至少需要两个字节。
pub fn sentinel_code(data: &[u8]) -> Option<u8> {
    let (&code, head) = data.split_last()?;
    if !head.is_empty() && head.iter().all(|&b| b == SENTINEL_FILL) {
        Some(code)
    } else {
        None
    }
}

/// 识别帧类型
///
/// 前 7 字节全部为 `0xFF` 即视为哨兵帧，不论模式码是否已知。
/// 量化指令可能打包出同样的字节，发送前需经过
/// [`QuantizedCommand::avoid_sentinel`](crate::QuantizedCommand::avoid_sentinel)。
pub fn classify_frame(data: &[u8; FRAME_LEN]) -> FrameKind {
    match sentinel_code(data) {
        Some(code) => FrameKind::ModeSentinel(code),
        None => FrameKind::Command,
    }
}
