//! 命令行参数定义

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use domain::{AccountId, DirectoryFlavor, DomainStatus, OperationType, UserRole, UserStatus};

#[derive(Debug, Parser)]
#[command(name = "odie", version, about = "Odie 目录管理客户端")]
pub struct Cli {
    /// YAML 配置文件
    #[arg(long, global = true, env = "ODIE_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// 以指定账户操作，不读取本地会话
    #[arg(long, global = true, env = "ODIE_ACCOUNT")]
    pub account: Option<AccountId>,

    /// 覆盖配置中的数据来源
    #[arg(long, global = true, value_enum)]
    pub data_source: Option<DataSourceArg>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataSourceArg {
    Live,
    Memory,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 账户认证
    #[command(subcommand)]
    Auth(AuthCommand),
    /// 域管理
    #[command(subcommand)]
    Domains(DomainCommand),
    /// 部门管理
    #[command(subcommand)]
    Departments(DepartmentCommand),
    /// 目录用户管理
    #[command(subcommand)]
    Users(UserCommand),
    /// 操作日志
    Logs(LogArgs),
}

#[derive(Debug, Args)]
pub struct CredentialArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "ODIE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    SignUp(CredentialArgs),
    SignIn(CredentialArgs),
    SignOut,
    /// 显示当前登录账户
    Status,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlavorArg {
    Ms,
    Samba,
}

impl From<FlavorArg> for DirectoryFlavor {
    fn from(value: FlavorArg) -> Self {
        match value {
            FlavorArg::Ms => DirectoryFlavor::Microsoft,
            FlavorArg::Samba => DirectoryFlavor::Samba,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DomainStatusArg {
    Online,
    Offline,
}

impl From<DomainStatusArg> for DomainStatus {
    fn from(value: DomainStatusArg) -> Self {
        match value {
            DomainStatusArg::Online => DomainStatus::Online,
            DomainStatusArg::Offline => DomainStatus::Offline,
        }
    }
}

/// 域表单字段，更新时未给出的字段保留原值
#[derive(Debug, Args)]
pub struct DomainFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub ip: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    /// 点分域名，例如 `odieproje.local`
    #[arg(long)]
    pub component: Option<String>,
    #[arg(long)]
    pub ldap_username: Option<String>,
    #[arg(long, env = "ODIE_LDAP_PASSWORD", hide_env_values = true)]
    pub ldap_password: Option<String>,
    #[arg(long, value_enum)]
    pub flavor: Option<FlavorArg>,
    #[arg(long, value_enum)]
    pub status: Option<DomainStatusArg>,
}

#[derive(Debug, Subcommand)]
pub enum DomainCommand {
    List,
    /// 显示域及其编辑表单
    Show { id: i64 },
    Add(DomainFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: DomainFields,
    },
    Delete { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum DepartmentCommand {
    /// 不指定域时列出全部部门
    List {
        #[arg(long)]
        domain: Option<i64>,
    },
    /// 按域汇总部门
    Overview,
    Search { term: String },
    Add {
        #[arg(long)]
        domain: i64,
        #[arg(long)]
        name: String,
    },
    Rename {
        #[arg(long)]
        domain: i64,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
    Delete {
        #[arg(long)]
        domain: i64,
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Admin,
    User,
    Guest,
}

impl From<RoleArg> for UserRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Admin => UserRole::Admin,
            RoleArg::User => UserRole::User,
            RoleArg::Guest => UserRole::Guest,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UserStatusArg {
    Enabled,
    Disabled,
}

impl From<UserStatusArg> for UserStatus {
    fn from(value: UserStatusArg) -> Self {
        match value {
            UserStatusArg::Enabled => UserStatus::Enabled,
            UserStatusArg::Disabled => UserStatus::Disabled,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    List {
        #[arg(long)]
        domain: i64,
        #[arg(long, value_enum)]
        status: Option<UserStatusArg>,
    },
    /// 按域汇总用户
    Overview,
    Add {
        #[arg(long)]
        domain: i64,
        #[arg(long)]
        username: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, env = "ODIE_USER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, value_enum, default_value = "user")]
        role: RoleArg,
        /// 0 表示不分配部门
        #[arg(long)]
        department: Option<i64>,
    },
    Update {
        #[arg(long)]
        domain: i64,
        username: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// 不给出时保留原密码
        #[arg(long)]
        password: Option<String>,
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
        #[arg(long)]
        department: Option<i64>,
    },
    Delete {
        #[arg(long)]
        domain: i64,
        username: String,
    },
    Enable {
        #[arg(long)]
        domain: i64,
        username: String,
    },
    Disable {
        #[arg(long)]
        domain: i64,
        username: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    Domain,
    User,
    Department,
    Login,
}

impl From<OperationArg> for OperationType {
    fn from(value: OperationArg) -> Self {
        match value {
            OperationArg::Domain => OperationType::Domain,
            OperationArg::User => OperationType::User,
            OperationArg::Department => OperationType::Department,
            OperationArg::Login => OperationType::Login,
        }
    }
}

#[derive(Debug, Args)]
pub struct LogArgs {
    #[arg(long)]
    pub endpoint: Option<String>,
    #[arg(long, value_enum)]
    pub operation_type: Option<OperationArg>,
    #[arg(long, default_value_t = 50)]
    pub limit: u32,
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_domain_update_with_partial_fields() {
        let cli = Cli::try_parse_from([
            "odie",
            "--data-source",
            "memory",
            "domains",
            "update",
            "3",
            "--flavor",
            "samba",
            "--status",
            "offline",
        ])
        .unwrap();

        assert_eq!(cli.data_source, Some(DataSourceArg::Memory));
        let Command::Domains(DomainCommand::Update { id, fields }) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(id, 3);
        assert_eq!(fields.flavor, Some(FlavorArg::Samba));
        assert_eq!(fields.status, Some(DomainStatusArg::Offline));
        assert!(fields.name.is_none());
    }

    #[test]
    fn account_is_parsed_as_uuid() {
        let cli = Cli::try_parse_from([
            "odie",
            "--account",
            "6f1c1d2e-8a61-4c3b-9d4e-0f7a2b3c4d5e",
            "logs",
            "--operation-type",
            "user",
        ])
        .unwrap();
        assert_eq!(
            cli.account.map(|account| account.to_string()).as_deref(),
            Some("6f1c1d2e-8a61-4c3b-9d4e-0f7a2b3c4d5e")
        );

        assert!(Cli::try_parse_from(["odie", "--account", "nope", "logs"]).is_err());
    }
}
