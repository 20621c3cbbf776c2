// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含投递后端和通知的具体实现，依赖于领域层的抽象接口。
pub mod services;
