//! 主应用程序入口
//!
//! 加载配置、初始化日志、组装基础设施后执行命令。

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use config::{AppConfig, DataSourceKind};
use infrastructure::{DataSource, Infrastructure, InfrastructureConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, DataSourceArg};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    // RUST_LOG 优先于配置文件；日志写到 stderr，stdout 只输出结果
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(config = %config.sanitize(), "配置已加载");

    let infrastructure = Infrastructure::build(infrastructure_config(&config, &cli))?;
    commands::execute(cli.command, cli.account, infrastructure).await
}

fn infrastructure_config(config: &AppConfig, cli: &Cli) -> InfrastructureConfig {
    let kind = match cli.data_source {
        Some(DataSourceArg::Live) => DataSourceKind::Live,
        Some(DataSourceArg::Memory) => DataSourceKind::Memory,
        None => config.data_source,
    };
    let data_source = match kind {
        DataSourceKind::Live => DataSource::Live,
        DataSourceKind::Memory => DataSource::Memory {
            seed_account: cli.account,
        },
    };

    InfrastructureConfig {
        api_base_url: config.api.base_url.clone(),
        identity_url: config.identity.url.clone(),
        anon_key: config.identity.anon_key.clone(),
        storage_key: config.identity.storage_key.clone(),
        session_dir: config.storage.session_dir.clone(),
        data_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_is_seeded_with_explicit_account() {
        let cli = Cli::try_parse_from([
            "odie",
            "--data-source",
            "memory",
            "--account",
            "6f1c1d2e-8a61-4c3b-9d4e-0f7a2b3c4d5e",
            "domains",
            "list",
        ])
        .unwrap();

        let infrastructure = infrastructure_config(&AppConfig::default(), &cli);
        assert_eq!(
            infrastructure.data_source,
            DataSource::Memory {
                seed_account: cli.account
            }
        );
        assert_eq!(infrastructure.storage_key, "odie-supabase-auth-token");
    }

    #[test]
    fn config_data_source_applies_without_flag() {
        let cli = Cli::try_parse_from(["odie", "auth", "status"]).unwrap();
        let config = AppConfig {
            data_source: DataSourceKind::Memory,
            ..AppConfig::default()
        };

        assert_eq!(
            infrastructure_config(&config, &cli).data_source,
            DataSource::Memory { seed_account: None }
        );
    }
}
