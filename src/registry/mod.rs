//! Registry 客户端 — 对包仓库 HTTP+JSON 接口的封装

pub mod types;

pub use types::{FetchedDetail, Lookup, PackageDetail, PackageSummary, RegistryError};

use anyhow::{anyhow, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use types::PackageList;

/// 命令层依赖的仓库操作，每个操作对应一次 HTTP 请求
#[allow(async_fn_in_trait)]
pub trait Registry {
    /// 全部包；响应中没有 `packages` 字段时返回 `None`
    async fn list_all(&self) -> Result<Option<Vec<PackageSummary>>, RegistryError>;

    async fn get_detail(&self, name: &str) -> Result<Lookup<FetchedDetail>, RegistryError>;

    async fn request_install(&self, name: &str) -> Result<(), RegistryError>;
}

pub struct RegistryClient {
    client: Client,
    base_url: Url,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| anyhow!("无效的 registry 地址 {}: {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("无效的 registry 地址: {}", base_url);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// 拼接 `<base>/api/<segments...>`，包名按路径段转义
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }
}

impl Registry for RegistryClient {
    async fn list_all(&self) -> Result<Option<Vec<PackageSummary>>, RegistryError> {
        let url = self.endpoint(&["packages"]);
        log::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(RegistryError::Status(response.status()));
        }

        let body = response.text().await?;
        let list: PackageList = serde_json::from_str(&body)?;
        Ok(list.packages)
    }

    async fn get_detail(&self, name: &str) -> Result<Lookup<FetchedDetail>, RegistryError> {
        let url = self.endpoint(&["packages", name]);
        log::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            log::debug!("{} 详情查询返回状态码 {}", name, response.status());
            return Ok(Lookup::NotFound);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Lookup::NotFound);
        }

        let raw: Value = serde_json::from_str(&body)?;
        if is_empty_body(&raw) {
            return Ok(Lookup::NotFound);
        }

        let detail = PackageDetail::deserialize(&raw)?;
        Ok(Lookup::Found(FetchedDetail { detail, body }))
    }

    async fn request_install(&self, name: &str) -> Result<(), RegistryError> {
        let url = self.endpoint(&["packages", name, "install"]);
        log::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RegistryError::Status(response.status()));
        }

        let body = response.text().await?;
        match serde_json::from_str::<Value>(&body)? {
            Value::Object(_) => Ok(()),
            _ => Err(RegistryError::NotAnObject),
        }
    }
}

/// null、false、0、空串、空数组、空对象都视为没有该包
fn is_empty_body(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
