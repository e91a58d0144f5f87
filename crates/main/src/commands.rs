//! 命令执行
//!
//! 每个命令调用一个应用层服务，结果以格式化 JSON 输出到 stdout。

use std::sync::Arc;

use application::{
    ApplicationError, AuditLogService, AuthService, AuthState, Credentials, DepartmentService,
    DepartmentServiceDependencies, DomainService, UserService, UserServiceDependencies,
};
use domain::{
    AccountId, AuditLogQuery, DepartmentId, DomainDraft, DomainId, UserDraft, UserUpdate, Username,
};
use infrastructure::Infrastructure;
use serde::Serialize;
use serde_json::json;

use crate::cli::{
    AuthCommand, Command, DepartmentCommand, DomainCommand, DomainFields, LogArgs, UserCommand,
};

pub async fn execute(
    command: Command,
    account: Option<AccountId>,
    infrastructure: Infrastructure,
) -> anyhow::Result<()> {
    match command {
        Command::Auth(command) => auth(command, &infrastructure).await,
        Command::Domains(command) => {
            let account = resolve_account(account, &infrastructure).await?;
            domains(command, account, &infrastructure).await
        }
        Command::Departments(command) => {
            let account = resolve_account(account, &infrastructure).await?;
            departments(command, account, &infrastructure).await
        }
        Command::Users(command) => {
            let account = resolve_account(account, &infrastructure).await?;
            users(command, account, &infrastructure).await
        }
        Command::Logs(args) => {
            let account = resolve_account(account, &infrastructure).await?;
            logs(args, account, &infrastructure).await
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn auth_state(infrastructure: &Infrastructure) -> AuthState {
    AuthState::new(
        Arc::clone(&infrastructure.identity_provider),
        Arc::clone(&infrastructure.session_storage),
        infrastructure.storage_key.clone(),
    )
}

/// 显式账户优先，否则使用本地会话中的账户
async fn resolve_account(
    explicit: Option<AccountId>,
    infrastructure: &Infrastructure,
) -> Result<AccountId, ApplicationError> {
    if let Some(account) = explicit {
        return Ok(account);
    }
    let state = auth_state(infrastructure);
    state.initialize().await;
    state.require_account()
}

async fn auth(command: AuthCommand, infrastructure: &Infrastructure) -> anyhow::Result<()> {
    let service = AuthService::new(Arc::clone(&infrastructure.identity_provider));

    match command {
        AuthCommand::SignUp(args) => {
            let credentials = Credentials::new(args.email, args.password);
            let session = service.sign_up(&credentials).await?;
            print_json(&json!({
                "user": session.as_ref().map(|session| &session.user),
                "confirmation_required": session.is_none(),
            }))
        }
        AuthCommand::SignIn(args) => {
            let credentials = Credentials::new(args.email, args.password);
            let session = service.sign_in(&credentials).await?;
            print_json(&json!({ "user": session.user, "expires_at": session.expires_at }))
        }
        AuthCommand::SignOut => {
            service.sign_out().await?;
            print_json(&json!({ "signed_out": true }))
        }
        AuthCommand::Status => {
            let state = auth_state(infrastructure);
            state.initialize().await;
            print_json(&json!({ "user": state.current_user() }))
        }
        AuthCommand::Refresh => {
            let session = service.refresh_session().await?;
            print_json(&json!({ "user": session.user, "expires_at": session.expires_at }))
        }
    }
}

/// 未给出的字段保留表单原值
fn apply_domain_fields(fields: DomainFields, mut draft: DomainDraft) -> DomainDraft {
    if let Some(name) = fields.name {
        draft.domain_name = name;
    }
    if let Some(ip) = fields.ip {
        draft.domain_ip = ip;
    }
    if let Some(port) = fields.port {
        draft.custom_port = Some(port);
    }
    if let Some(component) = fields.component {
        draft.domain_component = component;
    }
    if let Some(username) = fields.ldap_username {
        draft.ldap_username = username;
    }
    if let Some(password) = fields.ldap_password {
        draft.ldap_password = password;
    }
    if let Some(flavor) = fields.flavor {
        draft.flavor = flavor.into();
    }
    if let Some(status) = fields.status {
        draft.status = status.into();
    }
    draft
}

async fn domains(
    command: DomainCommand,
    account: AccountId,
    infrastructure: &Infrastructure,
) -> anyhow::Result<()> {
    let service = DomainService::new(Arc::clone(&infrastructure.domain_gateway));

    match command {
        DomainCommand::List => print_json(&service.list(account).await?),
        DomainCommand::Show { id } => {
            let domain = service.find(account, DomainId(id)).await?;
            let draft = DomainDraft::from_domain(&domain);
            print_json(&json!({ "domain": domain, "draft": draft }))
        }
        DomainCommand::Add(fields) => {
            let draft = apply_domain_fields(fields, DomainDraft::default());
            print_json(&service.add(account, &draft).await?)
        }
        DomainCommand::Update { id, fields } => {
            let draft = service.load_draft(account, DomainId(id)).await?;
            let draft = apply_domain_fields(fields, draft);
            print_json(&service.update(account, DomainId(id), &draft).await?)
        }
        DomainCommand::Delete { id } => print_json(&service.delete(account, DomainId(id)).await?),
    }
}

async fn departments(
    command: DepartmentCommand,
    account: AccountId,
    infrastructure: &Infrastructure,
) -> anyhow::Result<()> {
    let service = DepartmentService::new(DepartmentServiceDependencies {
        domain_gateway: Arc::clone(&infrastructure.domain_gateway),
        department_gateway: Arc::clone(&infrastructure.department_gateway),
    });

    match command {
        DepartmentCommand::List { domain: None } => print_json(&service.list_all().await?),
        DepartmentCommand::List {
            domain: Some(domain),
        } => print_json(&service.list_by_domain(account, DomainId(domain)).await?),
        DepartmentCommand::Overview => print_json(&service.overview(account).await?),
        DepartmentCommand::Search { term } => print_json(&service.search(account, &term).await?),
        DepartmentCommand::Add { domain, name } => {
            print_json(&service.add(account, DomainId(domain), &name).await?)
        }
        DepartmentCommand::Rename { domain, id, name } => print_json(
            &service
                .rename(account, DomainId(domain), DepartmentId(id), &name)
                .await?,
        ),
        DepartmentCommand::Delete { domain, id } => print_json(
            &service
                .delete(account, DomainId(domain), DepartmentId(id))
                .await?,
        ),
    }
}

/// 0 表示不分配部门
fn department_ref(id: Option<i64>) -> Option<DepartmentId> {
    id.filter(|id| *id != 0).map(DepartmentId)
}

async fn users(
    command: UserCommand,
    account: AccountId,
    infrastructure: &Infrastructure,
) -> anyhow::Result<()> {
    let service = UserService::new(UserServiceDependencies {
        domain_gateway: Arc::clone(&infrastructure.domain_gateway),
        user_gateway: Arc::clone(&infrastructure.user_gateway),
    });

    match command {
        UserCommand::List { domain, status } => {
            print_json(&service.list(DomainId(domain), status.map(Into::into)).await?)
        }
        UserCommand::Overview => print_json(&service.overview(account).await?),
        UserCommand::Add {
            domain,
            username,
            first_name,
            last_name,
            password,
            role,
            department,
        } => {
            let draft = UserDraft {
                username,
                first_name,
                last_name,
                password,
                role: role.into(),
                department_id: department_ref(department),
                domain_id: DomainId(domain),
            };
            print_json(&service.add(account, draft).await?)
        }
        UserCommand::Update {
            domain,
            username,
            first_name,
            last_name,
            password,
            role,
            department,
        } => {
            let username = Username::parse(username)?;
            let current = service
                .list(DomainId(domain), None)
                .await?
                .into_iter()
                .find(|user| user.username == username)
                .ok_or_else(|| ApplicationError::not_found("User not found"))?;

            let mut update = UserUpdate::from_user(&current);
            if let Some(first_name) = first_name {
                update.first_name = first_name;
            }
            if let Some(last_name) = last_name {
                update.last_name = last_name;
            }
            if let Some(role) = role {
                update.role_id = role.into();
            }
            if department.is_some() {
                update.department_id = department_ref(department);
            }
            if let Some(password) = password {
                update = update.with_password(password);
            }

            print_json(
                &service
                    .update(account, DomainId(domain), &username, &update)
                    .await?,
            )
        }
        UserCommand::Delete { domain, username } => print_json(
            &service
                .delete(account, DomainId(domain), Username::parse(username)?)
                .await?,
        ),
        UserCommand::Enable { domain, username } => print_json(
            &service
                .enable(account, DomainId(domain), Username::parse(username)?)
                .await?,
        ),
        UserCommand::Disable { domain, username } => print_json(
            &service
                .disable(account, DomainId(domain), Username::parse(username)?)
                .await?,
        ),
    }
}

async fn logs(
    args: LogArgs,
    account: AccountId,
    infrastructure: &Infrastructure,
) -> anyhow::Result<()> {
    let service = AuditLogService::new(Arc::clone(&infrastructure.audit_log_gateway));
    let query = AuditLogQuery {
        endpoint: args.endpoint,
        operation_type: args.operation_type.map(Into::into),
        limit: args.limit,
        offset: args.offset,
    };
    print_json(&service.list(account, &query).await?)
}
