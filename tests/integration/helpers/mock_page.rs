// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rentflow::config::settings::Settings;
use std::collections::HashMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LISTINGS: &str = include_str!("../../fixtures/listings.html");

/// 启动一个返回给定 HTML 的模拟页面
pub async fn serve_page(html: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Zillow-Clone/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(html),
        )
        .mount(&server)
        .await;
    server
}

pub fn page_url(server: &MockServer) -> String {
    format!("{}/Zillow-Clone/", server.uri())
}

/// 以模拟页面为源构建配置，额外的环境变量会覆盖默认值
pub fn settings_for(server: &MockServer, extra: &[(&str, &str)]) -> Settings {
    let mut vars: HashMap<String, String> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.insert("RENTFLOW__SOURCE__URL".to_string(), page_url(server));
    Settings::from_env(vars).unwrap()
}
