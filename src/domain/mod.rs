// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：房源记录和投递报告
/// - 服务（services）：记录抽取、组合以及投递和通知的抽象接口
///
/// 领域层不依赖于任何具体的投递或通知实现。
pub mod models;
pub mod services;
