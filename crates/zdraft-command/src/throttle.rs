//! 指针移动节流
//!
//! 悬停拾取、捕捉预览这类随鼠标移动触发的计算，每一帧最多做一次。
//! 点击不经过节流。

/// 每帧节流器
#[derive(Debug, Clone, Default)]
pub struct MoveThrottle {
    frame: u64,
    /// 最近一次放行时的帧号
    last_processed: Option<u64>,
    /// 本帧被跳过的移动事件数
    skipped: u32,
}

impl MoveThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新的一帧开始
    pub fn begin_frame(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        self.skipped = 0;
    }

    /// 本帧是否还可以处理一次移动事件
    pub fn should_process(&mut self) -> bool {
        if self.last_processed == Some(self.frame) {
            self.skipped += 1;
            return false;
        }
        self.last_processed = Some(self.frame);
        true
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn skipped(&self) -> u32 {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_move_per_frame() {
        let mut throttle = MoveThrottle::new();
        assert!(throttle.should_process());
        assert!(!throttle.should_process());
        assert!(!throttle.should_process());
        assert_eq!(throttle.skipped(), 2);

        throttle.begin_frame();
        assert_eq!(throttle.skipped(), 0);
        assert!(throttle.should_process());
        assert!(!throttle.should_process());
    }

    #[test]
    fn test_idle_frames_do_not_accumulate() {
        let mut throttle = MoveThrottle::new();
        throttle.begin_frame();
        throttle.begin_frame();
        throttle.begin_frame();
        assert!(throttle.should_process());
        assert!(!throttle.should_process());
    }
}
