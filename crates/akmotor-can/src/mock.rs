//! Mock CAN 适配器（无硬件依赖）
//!
//! 克隆得到的句柄共享同一份状态：测试代码持有一个句柄检查已发送的帧、
//! 注入回复帧，另一个句柄交给驱动层使用。

use crate::{CanAdapter, CanError, MotorFrame};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Default)]
struct MockState {
    sent_frames: Vec<MotorFrame>,
    receive_queue: VecDeque<MotorFrame>,
    fail_next_send: bool,
    receive_error: Option<CanError>,
}

/// 记录发送、按队列回放接收的适配器
#[derive(Debug, Clone, Default)]
pub struct MockCanAdapter {
    state: Arc<Mutex<MockState>>,
}

impl MockCanAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注入一帧待接收数据
    pub fn queue_frame(&self, frame: MotorFrame) {
        self.state.lock().receive_queue.push_back(frame);
    }

    /// 注入一帧回复（标准帧，ID 为 `id`）
    pub fn queue_reply(&self, id: u16, data: &[u8]) {
        self.queue_frame(MotorFrame::new_standard(id, data));
    }

    /// 已发送帧的快照
    pub fn sent_frames(&self) -> Vec<MotorFrame> {
        self.state.lock().sent_frames.clone()
    }

    /// 取出并清空已发送帧
    pub fn take_sent(&self) -> Vec<MotorFrame> {
        std::mem::take(&mut self.state.lock().sent_frames)
    }

    pub fn sent_count(&self) -> usize {
        self.state.lock().sent_frames.len()
    }

    /// 尚未被取走的接收帧数量
    pub fn pending_rx(&self) -> usize {
        self.state.lock().receive_queue.len()
    }

    /// 让下一次 `send` 返回 IO 错误
    pub fn fail_next_send(&self) {
        self.state.lock().fail_next_send = true;
    }

    /// 让下一次 `receive` 返回指定错误（如 `CanError::BusOff`）
    pub fn fail_next_receive(&self, error: CanError) {
        self.state.lock().receive_error = Some(error);
    }
}

impl CanAdapter for MockCanAdapter {
    fn send(&mut self, frame: MotorFrame) -> Result<(), CanError> {
        let mut state = self.state.lock();
        if state.fail_next_send {
            state.fail_next_send = false;
            return Err(CanError::Io(std::io::Error::other("mock send failure")));
        }
        trace!("Mock sent frame: ID=0x{:X}, data={:02X?}", frame.id, frame.data_slice());
        state.sent_frames.push(frame);
        Ok(())
    }

    fn receive(&mut self) -> Result<MotorFrame, CanError> {
        let mut state = self.state.lock();
        if let Some(error) = state.receive_error.take() {
            return Err(error);
        }
        state.receive_queue.pop_front().ok_or(CanError::Timeout)
    }
}
