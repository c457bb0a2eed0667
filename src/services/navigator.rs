//! 题目导航 - 业务能力层
//!
//! 维护当前显示的题号（从 1 开始），前后移动和跳转都做边界钳制，
//! 没有任何失败路径。

/// 题目导航器
#[derive(Debug, Clone, Copy)]
pub struct Navigator {
    current: u32,
    total: u32,
}

impl Navigator {
    /// 创建导航器，初始停在第 1 题
    pub fn new(total: u32) -> Self {
        Self { current: 1, total }
    }

    /// 当前题号（1 开始）
    pub fn current(&self) -> u32 {
        self.current
    }

    /// 总题数
    pub fn total(&self) -> u32 {
        self.total
    }

    /// 上一题（已在第 1 题则不动）
    pub fn prev(&mut self) {
        if self.current > 1 {
            self.current -= 1;
        }
    }

    /// 下一题（已在最后一题则不动）
    pub fn next(&mut self) {
        if self.current < self.total {
            self.current += 1;
        }
    }

    /// 跳转到某题，越界请求被钳制到 [1, total]
    pub fn jump(&mut self, question: u32) {
        self.current = question.clamp(1, self.total.max(1));
    }
}
