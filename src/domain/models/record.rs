// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 档案详情记录
///
/// 从单个成员档案页提取的结构化字段集。调度器不解释
/// 其内容，仅原样携带至合并与导出阶段。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// 成员姓名
    pub name: String,
    /// 第一电话
    pub phone1: String,
    /// 邮箱地址
    pub email: String,
    /// 个人/公司网站
    pub website: String,
    /// 第二电话
    pub phone2: String,
    /// 地址
    pub address: String,
    /// 城市
    pub city: String,
    /// 邮政编码
    pub postal_code: String,
    /// 国家
    pub country: String,
    /// 行业
    pub industry: String,
    /// 简介
    pub about: String,
    /// 关键词
    pub keywords: String,
    /// 其他信息
    pub other: String,
}

/// 目录列表摘要行
///
/// 从目录列表页提取的单个成员概要信息，与详情记录
/// 按原始位置合并后导出。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// 成员姓名
    pub name: String,
    /// 档案详情页链接（可能为空）
    pub profile_link: String,
    /// 分会名称
    pub chapter: String,
    /// 公司名称
    pub company: String,
    /// 城市
    pub city: String,
    /// 行业标签
    pub industry: String,
    /// connect按钮标记
    pub connect: String,
}
