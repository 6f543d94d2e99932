use anyhow::{bail, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 每个包目录下保存安装时详情快照的文件
const INFO_FILE: &str = "info.json";

/// 已安装记录；`info.json` 缺失或无法解析时只有目录名
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledRecord {
    pub name: String,
    pub version: Option<String>,
}

#[derive(Deserialize)]
struct InfoFields {
    name: String,
    version: String,
}

/// 本地安装账本：`<base>/<包名>/info.json`
pub struct Ledger {
    base_dir: PathBuf,
}

impl Ledger {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn info_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name).join(INFO_FILE)
    }

    /// 写入安装快照，覆盖旧内容
    pub fn record_install(&self, name: &str, detail_json: &str) -> Result<PathBuf> {
        validate_package_name(name)?;

        let dir = self.base_dir.join(name);
        fs::create_dir_all(&dir)?;

        let path = dir.join(INFO_FILE);
        fs::write(&path, detail_json)?;
        log::debug!("已写入安装记录 {}", path.display());

        Ok(path)
    }

    /// 按目录名排序列出已安装的包
    pub fn list_installed(&self) -> Result<Vec<InstalledRecord>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                dirs.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        dirs.sort();

        Ok(dirs
            .into_iter()
            .map(|dir| self.read_record(&dir))
            .collect())
    }

    fn read_record(&self, dir: &str) -> InstalledRecord {
        let fields = fs::read_to_string(self.info_path(dir))
            .ok()
            .and_then(|content| serde_json::from_str::<InfoFields>(&content).ok());

        match fields {
            Some(info) => InstalledRecord {
                name: info.name,
                version: Some(info.version),
            },
            None => {
                log::debug!("{} 没有可用的 {}", dir, INFO_FILE);
                InstalledRecord {
                    name: dir.to_string(),
                    version: None,
                }
            }
        }
    }
}

/// 包名只能作为单个目录名使用
pub fn validate_package_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        bail!("invalid package name: '{}'", name);
    }
    if name.contains(['/', '\\']) || Path::new(name).is_absolute() {
        bail!("invalid package name: '{}'", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> (tempfile::TempDir, Ledger) {
        let tmp = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(tmp.path().join("packages"));
        (tmp, ledger)
    }

    #[test]
    fn empty_or_missing_base_dir_lists_nothing() {
        let (tmp, ledger) = ledger();
        assert!(ledger.list_installed().unwrap().is_empty());

        fs::create_dir_all(tmp.path().join("packages")).unwrap();
        assert!(ledger.list_installed().unwrap().is_empty());
    }

    #[test]
    fn recorded_json_reads_back_byte_for_byte() {
        let (_tmp, ledger) = ledger();
        let json = "{\n  \"name\": \"audio\",\n  \"version\": \"1.0.0\",\n  \"extra\": [1, 2]\n}";

        let path = ledger.record_install("audio", json).unwrap();

        assert_eq!(path, ledger.info_path("audio"));
        assert_eq!(fs::read_to_string(path).unwrap(), json);
    }

    #[test]
    fn reinstall_overwrites_snapshot() {
        let (_tmp, ledger) = ledger();
        ledger
            .record_install("audio", r#"{"name":"audio","version":"1.0.0"}"#)
            .unwrap();
        ledger
            .record_install("audio", r#"{"name":"audio","version":"1.1.0"}"#)
            .unwrap();

        assert_eq!(
            ledger.list_installed().unwrap(),
            vec![InstalledRecord {
                name: "audio".to_string(),
                version: Some("1.1.0".to_string()),
            }]
        );
    }

    #[test]
    fn lists_sorted_with_fallback_for_bad_info() {
        let (tmp, ledger) = ledger();
        ledger
            .record_install("network", r#"{"name":"network","version":"1.1.0"}"#)
            .unwrap();
        ledger.record_install("crypto", "not json").unwrap();
        fs::create_dir_all(tmp.path().join("packages/ai")).unwrap();
        fs::write(tmp.path().join("packages/stray-file"), "x").unwrap();

        let records = ledger.list_installed().unwrap();

        assert_eq!(
            records,
            vec![
                InstalledRecord {
                    name: "ai".to_string(),
                    version: None
                },
                InstalledRecord {
                    name: "crypto".to_string(),
                    version: None
                },
                InstalledRecord {
                    name: "network".to_string(),
                    version: Some("1.1.0".to_string())
                },
            ]
        );
    }

    #[test]
    fn rejects_names_that_escape_base_dir() {
        for name in ["", " ", ".", "..", "../etc", "a/b", "a\\b", "/abs"] {
            assert!(validate_package_name(name).is_err(), "accepted {:?}", name);
        }
        assert!(validate_package_name("crypto-utils").is_ok());

        let (tmp, ledger) = ledger();
        assert!(ledger.record_install("../escape", "{}").is_err());
        assert!(!tmp.path().join("escape").exists());
    }
}
