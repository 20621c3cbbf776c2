// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 抓取-转换-投递管道的编排
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含记录模型、抽取规则和投递/通知接口
pub mod domain;

/// 引擎模块
///
/// 页面抓取客户端和浏览器驱动
pub mod engines;

/// 基础设施模块
///
/// 提供外部服务集成：表格 API、表单、邮件
pub mod infrastructure;

/// 工具模块
pub mod utils;
