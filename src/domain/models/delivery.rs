// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::fmt;

/// 单条记录的提交结果
///
/// 不做持久化，只汇总进运行级别的计数和日志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionOutcome {
    Success,
    Timeout,
    OtherFailure,
}

/// 表单提交状态机
///
/// `Pending → Navigated → FieldsLocated → Filled → Submitted`，
/// 任意一步失败即结束该条记录的尝试。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormSubmissionState {
    /// 尚未开始
    Pending,
    /// 已打开表单页面
    Navigated,
    /// 三个输入框和提交按钮均已定位
    FieldsLocated,
    /// 字段已填写
    Filled,
    /// 已点击提交
    Submitted,
}

impl fmt::Display for FormSubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormSubmissionState::Pending => "pending",
            FormSubmissionState::Navigated => "navigated",
            FormSubmissionState::FieldsLocated => "fields_located",
            FormSubmissionState::Filled => "filled",
            FormSubmissionState::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

/// 一次投递的汇总报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// 后端名称
    pub backend: &'static str,
    /// 尝试提交的记录数
    pub attempted: usize,
    /// 成功数
    pub succeeded: usize,
    /// 超时数
    pub timed_out: usize,
    /// 其他失败数
    pub failed: usize,
}

impl DeliveryReport {
    pub fn new(backend: &'static str) -> Self {
        Self {
            backend,
            attempted: 0,
            succeeded: 0,
            timed_out: 0,
            failed: 0,
        }
    }

    /// 记录一条提交结果
    pub fn record(&mut self, outcome: SubmissionOutcome) {
        self.attempted += 1;
        match outcome {
            SubmissionOutcome::Success => self.succeeded += 1,
            SubmissionOutcome::Timeout => self.timed_out += 1,
            SubmissionOutcome::OtherFailure => self.failed += 1,
        }
    }

    pub fn failures(&self) -> usize {
        self.timed_out + self.failed
    }
}
