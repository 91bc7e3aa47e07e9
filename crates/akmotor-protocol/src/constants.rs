//! 协议常量定义
//!
//! 当前固件版本的参数范围与模式码。不同固件版本之间可能存在差异，
//! 因此上层通过 `DescriptorTable` / `ModeCodes` 持有可覆盖的副本，
//! 这里只提供默认值。

use crate::descriptor::ParamDescriptor;
use crate::quantize::BitWidth;

/// 指令帧与回复帧的固定长度
pub const FRAME_LEN: usize = 8;

/// 回复帧最少需要的有效字节数（Byte 0-5）
pub const REPLY_MIN_LEN: usize = 6;

/// 位置：-12.5 ~ 12.5 rad，16 位
pub const POSITION_DESCRIPTOR: ParamDescriptor =
    ParamDescriptor::new_const(-12.5, 12.5, BitWidth::Bits16);

/// 速度：-50.0 ~ 50.0 rad/s，12 位
pub const VELOCITY_DESCRIPTOR: ParamDescriptor =
    ParamDescriptor::new_const(-50.0, 50.0, BitWidth::Bits12);

/// 比例增益：0.0 ~ 500.0，12 位
pub const KP_DESCRIPTOR: ParamDescriptor = ParamDescriptor::new_const(0.0, 500.0, BitWidth::Bits12);

/// 微分增益：0.0 ~ 5.0，12 位
pub const KD_DESCRIPTOR: ParamDescriptor = ParamDescriptor::new_const(0.0, 5.0, BitWidth::Bits12);

/// 前馈力矩：-25.0 ~ 25.0 N·m，12 位
pub const TORQUE_DESCRIPTOR: ParamDescriptor =
    ParamDescriptor::new_const(-25.0, 25.0, BitWidth::Bits12);

/// 哨兵帧填充字节（Byte 0-6）
pub const SENTINEL_FILL: u8 = 0xFF;

/// 进入电机模式（使能）
pub const MODE_CODE_ENTER: u8 = 0xFC;

/// 退出电机模式（失能）
pub const MODE_CODE_EXIT: u8 = 0xFD;

/// 设置当前位置为零点
pub const MODE_CODE_ZERO: u8 = 0xFE;

/// 模式哨兵帧之后的默认稳定等待时间（毫秒）
///
/// 已知固件版本使用过 500ms ~ 1000ms，取上限。
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

/// 上电预设：比例增益
pub const INIT_KP: f32 = 115.0;

/// 上电预设：微分增益
pub const INIT_KD: f32 = 0.5;
