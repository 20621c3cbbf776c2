// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::Record;

/// 将三个并行序列组合为记录
///
/// 三个序列先截断到最短长度 `n`，再按位置逐一组合，
/// 不做任何“尽力匹配”。长度不一致时记录一条警告。
/// 每条记录在构造时单独打时间戳。
pub fn build(addresses: Vec<String>, rents: Vec<String>, links: Vec<String>) -> Vec<Record> {
    let n = addresses.len().min(rents.len()).min(links.len());

    if addresses.len() != n || rents.len() != n || links.len() != n {
        tracing::warn!(
            "Only {} complete entries will be processed (addresses: {}, rents: {}, links: {})",
            n,
            addresses.len(),
            rents.len(),
            links.len()
        );
    }

    tracing::info!("Building {} records", n);

    addresses
        .into_iter()
        .zip(rents)
        .zip(links)
        .take(n)
        .enumerate()
        .map(|(i, ((address, rent), link))| {
            tracing::debug!("Record #{}: {} | {} | {}", i + 1, address, rent, link);
            Record::new(address, rent, link)
        })
        .collect()
}
