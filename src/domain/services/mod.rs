// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 投递服务（delivery_service）：投递后端接口和错误
/// - 提取服务（extraction_service）：从列表页抽取地址、租金和链接
/// - 通知服务（notification_service）：运行结束后的通知接口
/// - 记录组合（record_builder）：把三个序列对齐成记录
pub mod delivery_service;
pub mod extraction_service;
pub mod notification_service;
pub mod record_builder;
