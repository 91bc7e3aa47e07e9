//! # AK Motor CAN Adapter Layer
//!
//! CAN 硬件抽象层。驱动层只依赖两个原语：
//! 向某个总线地址发送 8 字节帧，以及非阻塞地尝试接收一帧。

use thiserror::Error;

// 重新导出 akmotor-protocol 中的 MotorFrame
pub use akmotor_protocol::MotorFrame;

#[cfg(all(target_os = "linux", feature = "socketcan"))]
pub mod socketcan;

#[cfg(all(target_os = "linux", feature = "socketcan"))]
pub use socketcan::SocketCanAdapter;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::MockCanAdapter;

/// CAN 适配层统一错误类型
#[derive(Error, Debug)]
pub enum CanError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(String),
    #[error("Read timeout")]
    Timeout,
    #[error("Buffer overflow")]
    BufferOverflow,
    #[error("Bus off")]
    BusOff,
}

/// 传输层契约
///
/// - `send`: Fire-and-Forget，失败重试不属于驱动层职责
/// - `receive`: 取出一帧；没有待处理帧时返回 `CanError::Timeout`
/// - `try_receive`: 非阻塞轮询，立即返回
pub trait CanAdapter {
    fn send(&mut self, frame: MotorFrame) -> Result<(), CanError>;

    fn receive(&mut self) -> Result<MotorFrame, CanError>;

    fn try_receive(&mut self) -> Result<Option<MotorFrame>, CanError> {
        match self.receive() {
            Ok(frame) => Ok(Some(frame)),
            Err(CanError::Timeout) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<T: CanAdapter + ?Sized> CanAdapter for Box<T> {
    fn send(&mut self, frame: MotorFrame) -> Result<(), CanError> {
        (**self).send(frame)
    }

    fn receive(&mut self) -> Result<MotorFrame, CanError> {
        (**self).receive()
    }

    fn try_receive(&mut self) -> Result<Option<MotorFrame>, CanError> {
        (**self).try_receive()
    }
}
