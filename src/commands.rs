//! 子命令实现；输出写入调用方提供的 writer

use crate::catalog::{fetch_catalog, matches_query, CatalogSource};
use crate::cli::Commands;
use crate::ledger::{validate_package_name, Ledger};
use crate::registry::{Lookup, Registry, RegistryError};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// 命令执行结果，对应进程退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    InvalidInput,
    NotFound,
    Unavailable,
}

impl CommandStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            CommandStatus::Success => 0,
            CommandStatus::InvalidInput => 2,
            CommandStatus::NotFound => 3,
            CommandStatus::Unavailable => 4,
        }
    }
}

pub struct Dispatcher<R: Registry> {
    registry: R,
    ledger: Ledger,
    upload_page: String,
}

impl<R: Registry> Dispatcher<R> {
    pub fn new(registry: R, ledger: Ledger, upload_page: String) -> Self {
        Self {
            registry,
            ledger,
            upload_page,
        }
    }

    pub async fn run<W: Write>(&self, command: Commands, out: &mut W) -> Result<CommandStatus> {
        match command {
            Commands::List => self.list(out).await,
            Commands::Install { package } => self.install(&package, out).await,
            Commands::Search { query } => self.search(&query, out).await,
            Commands::Info { package } => self.info(&package, out).await,
            Commands::Upload { file } => self.upload(&file, out),
            Commands::Installed => self.installed(out),
        }
    }

    async fn list<W: Write>(&self, out: &mut W) -> Result<CommandStatus> {
        writeln!(out, "📦 Available Diamond Language Packages:")?;
        writeln!(out, "{}", "=".repeat(50))?;

        let catalog = fetch_catalog(&self.registry).await;
        for pkg in &catalog.packages {
            writeln!(out, "📌 {} v{}", pkg.name, pkg.version)?;
            if catalog.source == CatalogSource::Live {
                writeln!(out, "   Author: {}", pkg.author)?;
                writeln!(out, "   Downloads: {}", pkg.downloads)?;
            }
            writeln!(out, "   {}", pkg.description)?;
            writeln!(out)?;
        }

        Ok(CommandStatus::Success)
    }

    async fn install<W: Write>(&self, name: &str, out: &mut W) -> Result<CommandStatus> {
        writeln!(out, "🔄 Installing {}...", name)?;

        if let Err(e) = validate_package_name(name) {
            writeln!(out, "❌ {}", e)?;
            return Ok(CommandStatus::InvalidInput);
        }

        let fetched = match self.registry.get_detail(name).await {
            Ok(Lookup::Found(fetched)) => fetched,
            Ok(Lookup::NotFound) => {
                writeln!(out, "❌ Package '{}' not found", name)?;
                return Ok(CommandStatus::NotFound);
            }
            Err(e) => {
                report_unreachable(out, &e)?;
                writeln!(out, "❌ Package '{}' not found", name)?;
                return Ok(CommandStatus::Unavailable);
            }
        };

        if let Err(e) = self.registry.request_install(name).await {
            report_unreachable(out, &e)?;
            writeln!(out, "❌ Failed to install '{}'", name)?;
            return Ok(CommandStatus::Unavailable);
        }

        self.ledger.record_install(name, &fetched.body)?;

        let description = &fetched.detail.summary.description;
        writeln!(out, "✅ Package '{}' installed successfully!", name)?;
        writeln!(
            out,
            "📖 Description: {}",
            if description.is_empty() {
                "No description"
            } else {
                description
            }
        )?;

        Ok(CommandStatus::Success)
    }

    async fn search<W: Write>(&self, query: &str, out: &mut W) -> Result<CommandStatus> {
        writeln!(out, "🔍 Searching for '{}'...", query)?;

        let packages = match self.registry.list_all().await {
            Ok(Some(packages)) => packages,
            Ok(None) => {
                writeln!(out, "Unable to search packages - server unavailable")?;
                return Ok(CommandStatus::Unavailable);
            }
            Err(e) => {
                report_unreachable(out, &e)?;
                writeln!(out, "Unable to search packages - server unavailable")?;
                return Ok(CommandStatus::Unavailable);
            }
        };

        let found: Vec<_> = packages
            .iter()
            .filter(|pkg| matches_query(pkg, query))
            .collect();

        if found.is_empty() {
            writeln!(out, "No packages found matching your search")?;
        } else {
            writeln!(out, "Found {} package(s):", found.len())?;
            for pkg in found {
                writeln!(out, "📌 {} v{} - {}", pkg.name, pkg.version, pkg.description)?;
            }
        }

        Ok(CommandStatus::Success)
    }

    async fn info<W: Write>(&self, name: &str, out: &mut W) -> Result<CommandStatus> {
        if let Err(e) = validate_package_name(name) {
            writeln!(out, "❌ {}", e)?;
            return Ok(CommandStatus::InvalidInput);
        }

        let fetched = match self.registry.get_detail(name).await {
            Ok(Lookup::Found(fetched)) => fetched,
            Ok(Lookup::NotFound) => {
                writeln!(out, "❌ Package '{}' not found", name)?;
                return Ok(CommandStatus::NotFound);
            }
            Err(e) => {
                report_unreachable(out, &e)?;
                writeln!(out, "❌ Package '{}' not found", name)?;
                return Ok(CommandStatus::Unavailable);
            }
        };

        let detail = &fetched.detail;
        writeln!(out, "📦 Package Information: {}", name)?;
        writeln!(out, "{}", "=".repeat(50))?;
        writeln!(out, "Name: {}", detail.summary.name)?;
        writeln!(out, "Version: {}", detail.summary.version)?;
        writeln!(out, "Author: {}", detail.summary.author)?;
        writeln!(out, "Description: {}", detail.summary.description)?;
        writeln!(out, "Downloads: {}", detail.summary.downloads)?;
        writeln!(
            out,
            "Created: {}",
            detail.created_at.as_deref().unwrap_or("Unknown")
        )?;

        Ok(CommandStatus::Success)
    }

    /// 上传只做本地检查，实际上传走网页
    fn upload<W: Write>(&self, file: &Path, out: &mut W) -> Result<CommandStatus> {
        if !file.exists() {
            writeln!(out, "❌ File not found: {}", file.display())?;
            return Ok(CommandStatus::InvalidInput);
        }

        writeln!(out, "⬆️ Uploading {}...", file.display())?;
        writeln!(
            out,
            "Note: Use the web interface for full folder uploads with .c + .md + .h files"
        )?;
        writeln!(out, "Web interface: {}", self.upload_page)?;

        Ok(CommandStatus::Success)
    }

    fn installed<W: Write>(&self, out: &mut W) -> Result<CommandStatus> {
        let records = self.ledger.list_installed()?;
        if records.is_empty() {
            writeln!(out, "No packages installed")?;
            return Ok(CommandStatus::Success);
        }

        writeln!(out, "📦 Installed Packages:")?;
        writeln!(out, "{}", "=".repeat(30))?;
        for record in records {
            match record.version {
                Some(version) => writeln!(out, "✅ {} v{}", record.name, version)?,
                None => writeln!(out, "✅ {} (unknown version)", record.name)?,
            }
        }

        Ok(CommandStatus::Success)
    }
}

fn report_unreachable<W: Write>(out: &mut W, error: &RegistryError) -> Result<()> {
    log::warn!("registry 请求失败: {:?}", error);
    writeln!(out, "Error connecting to Diamond Language server: {}", error)?;
    writeln!(out, "Make sure the Diamond Language web service is running")?;
    Ok(())
}
