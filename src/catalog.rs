//! 可用包目录：在线列表或内置的后备列表

use crate::registry::{PackageSummary, Registry};

/// 仓库不可用时显示的内置目录 (name, version, description)
pub const FALLBACK_CATALOG: [(&str, &str, &str); 6] = [
    ("audio", "1.0.0", "Audio processing and sound generation"),
    ("gamedev", "1.2.0", "Game development utilities and graphics"),
    ("crypto", "1.0.1", "Cryptography and security functions"),
    ("network", "1.1.0", "Network programming and HTTP utilities"),
    ("ai", "1.0.0", "Artificial intelligence and machine learning"),
    ("database", "1.3.0", "Database connectivity and ORM tools"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub source: CatalogSource,
    pub packages: Vec<PackageSummary>,
}

impl Catalog {
    pub fn fallback() -> Self {
        let packages = FALLBACK_CATALOG
            .iter()
            .map(|(name, version, description)| PackageSummary {
                name: name.to_string(),
                version: version.to_string(),
                author: String::new(),
                description: description.to_string(),
                downloads: 0,
            })
            .collect();

        Self {
            source: CatalogSource::Fallback,
            packages,
        }
    }
}

/// 拉取在线目录；请求失败或没有数据时退回内置目录
pub async fn fetch_catalog<R: Registry>(registry: &R) -> Catalog {
    match registry.list_all().await {
        Ok(Some(packages)) => Catalog {
            source: CatalogSource::Live,
            packages,
        },
        Ok(None) => {
            log::warn!("registry 响应中没有 packages 字段，使用内置目录");
            Catalog::fallback()
        }
        Err(e) => {
            log::warn!("获取包列表失败，使用内置目录: {}", e);
            Catalog::fallback()
        }
    }
}

/// 名称或描述包含查询串（不区分大小写）
pub fn matches_query(package: &PackageSummary, query: &str) -> bool {
    let query = query.to_lowercase();
    package.name.to_lowercase().contains(&query)
        || package.description.to_lowercase().contains(&query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, description: &str) -> PackageSummary {
        PackageSummary {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            author: String::new(),
            description: description.to_string(),
            downloads: 0,
        }
    }

    #[test]
    fn matches_on_name_or_description_ignoring_case() {
        assert!(matches_query(&summary("crypto-utils", "math stuff"), "crypto"));
        assert!(matches_query(
            &summary("foo", "supports crypto operations"),
            "crypto"
        ));
        assert!(matches_query(&summary("foo", "Supports CRYPTO"), "Crypto"));
        assert!(!matches_query(&summary("audio", "sound generation"), "crypto"));
    }

    #[test]
    fn fallback_has_the_six_builtin_packages() {
        let catalog = Catalog::fallback();
        let names: Vec<_> = catalog.packages.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(catalog.source, CatalogSource::Fallback);
        assert_eq!(
            names,
            ["audio", "gamedev", "crypto", "network", "ai", "database"]
        );
    }
}
