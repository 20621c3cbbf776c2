// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理页面源、投递后端、浏览器和邮件的配置
pub mod settings;
