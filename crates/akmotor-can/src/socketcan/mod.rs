//! SocketCAN 适配器（仅 Linux）
//!
//! 套接字以非阻塞方式打开：`receive()` 在没有待处理帧时立即返回
//! `CanError::Timeout`，因此 `try_receive()` 不会等待。
//!
//! 错误帧中的 Bus Off 和缓冲区溢出会作为错误返回，其余错误帧记录后跳过。

use crate::{CanAdapter, CanError, MotorFrame};
use ::socketcan::{
    CanError as SocketCanError, CanFrame, CanSocket, EmbeddedFrame, ExtendedId, Frame, Socket,
    StandardId,
};
use std::io::ErrorKind;
use tracing::{error, trace, warn};

/// SocketCAN 适配器
pub struct SocketCanAdapter {
    socket: CanSocket,
    interface: String,
}

impl SocketCanAdapter {
    /// 打开 CAN 接口（如 `can0`）
    ///
    /// 接口需要预先启动：`sudo ip link set up can0 type can bitrate 1000000`
    ///
    /// ```no_run
    /// use akmotor_can::SocketCanAdapter;
    ///
    /// let adapter = SocketCanAdapter::new("can0").unwrap();
    /// ```
    pub fn new(interface: impl Into<String>) -> Result<Self, CanError> {
        let interface = interface.into();

        let socket = CanSocket::open(&interface).map_err(|e| {
            CanError::Device(format!("Failed to open CAN interface '{}': {}", interface, e))
        })?;
        socket.set_nonblocking(true).map_err(CanError::Io)?;

        trace!("SocketCAN interface '{}' opened (non-blocking)", interface);

        Ok(Self { socket, interface })
    }

    /// 获取接口名称
    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl CanAdapter for SocketCanAdapter {
    fn send(&mut self, frame: MotorFrame) -> Result<(), CanError> {
        let can_frame = if frame.is_extended {
            ExtendedId::new(frame.id)
                .and_then(|id| CanFrame::new(id, frame.data_slice()))
                .ok_or_else(|| {
                    CanError::Device(format!(
                        "Failed to create extended frame with ID 0x{:X}",
                        frame.id
                    ))
                })?
        } else {
            StandardId::new(frame.id as u16)
                .and_then(|id| CanFrame::new(id, frame.data_slice()))
                .ok_or_else(|| {
                    CanError::Device(format!(
                        "Failed to create standard frame with ID 0x{:X}",
                        frame.id
                    ))
                })?
        };

        self.socket.write_frame(&can_frame).map_err(CanError::Io)?;

        trace!("Sent CAN frame: ID=0x{:X}, len={}", frame.id, frame.len);
        Ok(())
    }

    /// 接收一帧有效数据帧，自动跳过错误帧
    fn receive(&mut self) -> Result<MotorFrame, CanError> {
        loop {
            let can_frame = match self.socket.read_frame() {
                Ok(frame) => frame,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Err(CanError::Timeout),
                Err(e) => return Err(CanError::Io(e)),
            };

            let can_frame = match can_frame {
                CanFrame::Error(error_frame) => {
                    let socketcan_error = SocketCanError::from(error_frame);
                    match map_error_frame(&socketcan_error) {
                        Some(err) => {
                            error!("CAN {} on '{}': {}", err, self.interface, socketcan_error);
                            return Err(err);
                        },
                        None => {
                            warn!(
                                "CAN error frame on '{}': {}, ignoring",
                                self.interface, socketcan_error
                            );
                            continue;
                        },
                    }
                },
                frame => frame,
            };

            let id = if can_frame.is_extended() {
                can_frame.raw_id() & 0x1FFF_FFFF
            } else {
                can_frame.raw_id() & 0x7FF
            };

            let mut data = [0u8; 8];
            let frame_data = can_frame.data();
            let len = frame_data.len().min(8);
            data[..len].copy_from_slice(&frame_data[..len]);

            let frame = MotorFrame {
                id,
                data,
                len: len as u8,
                is_extended: can_frame.is_extended(),
            };

            trace!("Received CAN frame: ID=0x{:X}, len={}", frame.id, frame.len);
            return Ok(frame);
        }
    }
}

/// 错误帧映射：Bus Off 和缓冲区溢出需要上报，其余可以忽略
fn map_error_frame(error: &SocketCanError) -> Option<CanError> {
    match error {
        SocketCanError::BusOff => Some(CanError::BusOff),
        SocketCanError::ControllerProblem(problem) => {
            let problem_str = problem.to_string().to_lowercase();
            if problem_str.contains("overflow") {
                Some(CanError::BufferOverflow)
            } else {
                None
            }
        },
        _ => None,
    }
}
