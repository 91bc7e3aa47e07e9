//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use akmotor_sdk::prelude::*;
//! ```

// 驱动层
pub use crate::driver::{
    ChannelConfig, ClampOutcome, MotorChannel, MotorMode, SendOutcome, SkipReason,
};

// 协议层常用类型
pub use crate::protocol::{CommandSlot, CommandVector, DescriptorTable, ModeCodes, Telemetry};

// CAN 层（常用 Trait）
pub use crate::can::CanAdapter;

// 错误类型
pub use crate::can::CanError;
pub use crate::driver::DriverError;
pub use crate::protocol::ProtocolError;
