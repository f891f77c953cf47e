// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::SummaryRow;
use crate::domain::models::target::Target;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// 目标站点是MUI渲染的SPA，字段只能按生成的css类名定位。
// 类名变更时只需要调整这里。
static NAME_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".MuiBox-root.css-11zcyzm").unwrap());
static LINK_SEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        ".MuiTypography-root.MuiTypography-inherit.MuiLink-root.MuiLink-underlineAlways.css-xpp1g9",
    )
    .unwrap()
});
static CHAPTER_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".MuiBox-root.css-y8qrj").unwrap());
static COMPANY_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".MuiBox-root.css-cg3igy").unwrap());
static CITY_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".MuiBox-root.css-gglxne").unwrap());
static INDUSTRY_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".MuiBox-root.css-fhwdqw").unwrap());

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn texts(doc: &Html, sel: &Selector) -> Vec<String> {
    doc.select(sel).map(text_of).collect()
}

fn get(values: &[String], i: usize) -> String {
    values.get(i).cloned().unwrap_or_default()
}

/// 解析目录列表页
///
/// 按列并列提取各字段，行数取各列的最大长度，缺失字段留空。
/// 每一行都进入摘要（保留在最终导出中），但只有带档案链接的
/// 行才会成为抓取目标；目标索引即摘要行索引，保证结果能按
/// 原始位置回填。
///
/// # 参数
///
/// * `html` - 列表页渲染后的HTML
///
/// # 返回值
///
/// 摘要行列表和待抓取目标列表
pub fn parse(html: &str) -> (Vec<SummaryRow>, Vec<Target>) {
    let doc = Html::parse_document(html);

    let names = texts(&doc, &NAME_SEL);
    let links: Vec<String> = doc
        .select(&LINK_SEL)
        .map(|el| el.value().attr("href").unwrap_or_default().to_string())
        .collect();
    let chapters = texts(&doc, &CHAPTER_SEL);
    let companies = texts(&doc, &COMPANY_SEL);
    let cities = texts(&doc, &CITY_SEL);
    let industries = texts(&doc, &INDUSTRY_SEL);

    let count = [
        names.len(),
        links.len(),
        chapters.len(),
        companies.len(),
        cities.len(),
        industries.len(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);

    let mut rows = Vec::with_capacity(count);
    let mut targets = Vec::new();

    for i in 0..count {
        let row = SummaryRow {
            name: get(&names, i),
            profile_link: get(&links, i),
            chapter: get(&chapters, i),
            company: get(&companies, i),
            city: get(&cities, i),
            industry: get(&industries, i),
            connect: "+".to_string(),
        };

        if !row.profile_link.trim().is_empty() {
            targets.push(Target::new(i, row.profile_link.clone()));
        }

        rows.push(row);
    }

    (rows, targets)
}
