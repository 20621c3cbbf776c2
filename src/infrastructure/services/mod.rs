// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施服务模块
///
/// 表单后端、表格后端和 SMTP 邮件通知
pub mod form_backend_impl;
pub mod smtp_notification_impl;
pub mod spreadsheet_backend_impl;
