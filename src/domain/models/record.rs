// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// 采集时间戳格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 租房记录
///
/// 管道中流转的基本单元。创建后不再修改，
/// 投递后即被丢弃，不做任何持久化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 地址，可能为空字符串
    pub address: String,
    /// 租金原始文本，保留货币符号
    pub rent: String,
    /// 房源链接，绝对或相对 URL
    pub link: String,
    /// 采集时间，格式为 `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
}

impl Record {
    /// 创建一条记录，并以当前本地时间打上时间戳
    pub fn new(address: String, rent: String, link: String) -> Self {
        Self {
            address,
            rent,
            link,
            timestamp: capture_timestamp(),
        }
    }
}

/// 当前本地时间的采集时间戳
pub fn capture_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
