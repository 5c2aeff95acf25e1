use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::cloud::CloudStatus;

/// 单个检查的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestState {
    /// 尚未执行
    #[default]
    Pending,
    /// 正在执行
    InProgress,
    Failed,
    /// 部分成功（目前没有检查会产生该状态，仅供展示层使用）
    Partial,
    Succeeded,
}

impl TestState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TestState::Failed | TestState::Partial | TestState::Succeeded
        )
    }
}

/// 一次运行中单个检查的结果
#[derive(Debug, Clone, PartialEq)]
pub struct TestItem {
    /// 检查名称
    pub name: String,

    pub state: TestState,

    /// 执行耗时（未测量时为 0）
    pub duration: Duration,

    /// 本次运行是否已计时（耗时可能恰好为 0）
    measured: bool,
}

impl TestItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: TestState::Pending,
            duration: Duration::ZERO,
            measured: false,
        }
    }

    pub fn reset(&mut self) {
        self.state = TestState::Pending;
        self.duration = Duration::ZERO;
        self.measured = false;
    }

    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Record the duration of this run. Later calls are ignored.
    pub fn measure(&mut self, duration: Duration) -> bool {
        if self.measured {
            return false;
        }
        self.duration = duration;
        self.measured = true;
        true
    }
}

/// 运行器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Connecting,
    /// 正在执行第 i 个检查
    Running(usize),
    Completed,
    Aborted,
}

/// 推送给展示层的单项变更
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub index: usize,
    pub name: String,
    pub state: TestState,
    pub duration: Duration,
    /// 历史平均耗时
    pub average: Duration,
}

/// 运行摘要
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub items: Vec<TestItem>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub total_duration: Duration,
}

impl RunSummary {
    pub fn from_items(run_id: Uuid, started_at: DateTime<Utc>, items: Vec<TestItem>) -> Self {
        let passed = items
            .iter()
            .filter(|i| i.state == TestState::Succeeded)
            .count();
        let failed = items
            .iter()
            .filter(|i| i.state == TestState::Failed)
            .count();
        let total_duration = items.iter().map(|i| i.duration).sum();

        Self {
            run_id,
            started_at,
            total: items.len(),
            items,
            passed,
            failed,
            total_duration,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// 运行器发出的事件
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// 开始运行（连接之前）
    Started { run_id: Uuid, total: usize },

    ItemChanged(ItemUpdate),

    Completed(RunSummary),

    /// 连接失败，未执行任何检查
    Aborted {
        status: CloudStatus,
        /// 是否需要由展示层提示用户
        alert: bool,
    },
}

/// Create a channel for sending run events.
pub fn create_event_channel() -> (
    mpsc::UnboundedSender<RunEvent>,
    mpsc::UnboundedReceiver<RunEvent>,
) {
    mpsc::unbounded_channel()
}
