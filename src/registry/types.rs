//! Registry 相关数据类型定义

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// 列表视图中的包条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub downloads: u64,
}

/// 包详情，比列表条目多一个创建时间（原样显示，不解析）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDetail {
    #[serde(flatten)]
    pub summary: PackageSummary,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// 详情查询结果：类型化字段 + 服务端返回的响应体原文（安装时原样落盘）
#[derive(Debug, Clone)]
pub struct FetchedDetail {
    pub detail: PackageDetail,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

/// `GET /api/packages` 的响应体
#[derive(Debug, Deserialize)]
pub(super) struct PackageList {
    pub packages: Option<Vec<PackageSummary>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("registry responded with status {0}")]
    Status(StatusCode),
    #[error("registry response is not a JSON object")]
    NotAnObject,
}
