// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 记录（record）：一条房源的地址、租金、链接和时间戳
/// - 投递（delivery）：提交结果、表单状态和投递报告
pub mod delivery;
pub mod record;
