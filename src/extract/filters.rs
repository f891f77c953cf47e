// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// 按优先级检查的查询参数
const FILTER_PARAMS: [&str; 5] = ["search", "chapter", "industry", "city", "region"];

static SANITIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new("[^a-zA-Z0-9-]").unwrap());

/// 从列表页URL推导导出文件名关键词
///
/// 依次检查常见的搜索参数，取第一个清洗后非空的值
/// （仅保留字母、数字和连字符，统一小写）。没有可用
/// 参数时回退为`general`。
pub fn filter_keyword(listing_url: &str) -> String {
    let Ok(url) = Url::parse(listing_url) else {
        return "general".to_string();
    };

    for key in FILTER_PARAMS {
        let value = url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned());
        if let Some(value) = value {
            let clean = SANITIZE_RE.replace_all(&value, "").to_lowercase();
            if !clean.is_empty() {
                return clean;
            }
        }
    }

    "general".to_string()
}
