// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::ProfileRecord;
use crate::engines::traits::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static NAME_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.MuiTypography-root.MuiTypography-body1.css-s8q61v").unwrap());
static PHONE_SEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.MuiBox-root.css-ott1zk p.MuiTypography-root.MuiTypography-body1.css-1h6y3d6")
        .unwrap()
});
static CONTACT_LINK_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a.css-1ejdz4y").unwrap());
static LOCATION_SEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.MuiBox-root.css-1l43wm0 p.MuiTypography-root.MuiTypography-body1.css-jtzytg")
        .unwrap()
});
static BUSINESS_SEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.MuiBox-root.css-qsaw8 p.MuiTypography-root.MuiTypography-body1.css-1sw3fo6")
        .unwrap()
});

// 电话区块里混着地址，只能按关键词识别
static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)road|street|lane|next to|building").unwrap());

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn href_of<'a>(el: &ElementRef<'a>) -> &'a str {
    el.value().attr("href").unwrap_or_default()
}

/// 解析档案详情页
///
/// 从渲染后的HTML中提取联系方式和业务信息。姓名字段为空
/// 说明页面尚未渲染出档案内容（或根本不是档案页），
/// 视为未提取到数据。
///
/// # 参数
///
/// * `html` - 详情页渲染后的HTML
///
/// # 返回值
///
/// * `Ok(ProfileRecord)` - 提取到的档案记录
/// * `Err(ExtractError::NoData)` - 页面没有可用的档案数据
pub fn parse(html: &str) -> Result<ProfileRecord, ExtractError> {
    let doc = Html::parse_document(html);

    let name = doc.select(&NAME_SEL).next().map(text_of).unwrap_or_default();
    if name.is_empty() {
        return Err(ExtractError::NoData);
    }

    let phone_blocks: Vec<String> = doc.select(&PHONE_SEL).map(text_of).collect();
    let phone1 = phone_blocks.first().cloned().unwrap_or_default();
    let phone2 = phone_blocks.get(1).cloned().unwrap_or_default();
    let address = phone_blocks
        .iter()
        .find(|text| ADDRESS_RE.is_match(text))
        .cloned()
        .unwrap_or_default();

    let email = doc
        .select(&CONTACT_LINK_SEL)
        .find(|a| href_of(a).starts_with("mailto:"))
        .map(text_of)
        .unwrap_or_default();
    let website = doc
        .select(&CONTACT_LINK_SEL)
        .find(|a| href_of(a).starts_with("http") && !href_of(a).starts_with("mailto:"))
        .map(text_of)
        .unwrap_or_default();

    let locations: Vec<String> = doc.select(&LOCATION_SEL).map(text_of).collect();
    let city = locations.first().cloned().unwrap_or_default();
    let postal_code = locations.get(1).cloned().unwrap_or_default();
    let country = locations.get(2).cloned().unwrap_or_default();

    let business: Vec<String> = doc.select(&BUSINESS_SEL).map(text_of).collect();
    let industry = business.first().cloned().unwrap_or_default();
    let about = business.get(1).cloned().unwrap_or_default();
    let keywords = business.get(2).cloned().unwrap_or_default();
    let other = business.get(3).cloned().unwrap_or_default();

    Ok(ProfileRecord {
        name,
        phone1,
        email,
        website,
        phone2,
        address,
        city,
        postal_code,
        country,
        industry,
        about,
        keywords,
        other,
    })
}
