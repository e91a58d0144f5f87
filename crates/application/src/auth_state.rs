//! 进程级认证状态
//!
//! 保存当前登录账户并通过 `watch` 通道发布变化。启动时读取一次会话，
//! 之后跟随身份服务广播的事件更新。

use std::sync::Arc;

use domain::{AccountId, AuthEvent, AuthUser};
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;

use crate::{
    error::{ApplicationError, IdentityError},
    session::{IdentityProvider, SessionStorage},
};

/// 认证状态快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub user: Option<AuthUser>,
    /// 首次读取会话完成前为 true
    pub loading: bool,
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

pub struct AuthState {
    provider: Arc<dyn IdentityProvider>,
    storage: Arc<dyn SessionStorage>,
    storage_key: String,
    sender: Arc<watch::Sender<AuthSnapshot>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl AuthState {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        storage: Arc<dyn SessionStorage>,
        storage_key: impl Into<String>,
    ) -> Self {
        let (sender, _) = watch::channel(AuthSnapshot::default());
        Self {
            provider,
            storage,
            storage_key: storage_key.into(),
            sender: Arc::new(sender),
            listener: Mutex::new(None),
        }
    }

    /// 读取当前会话。无论结果如何，结束后 `loading` 为 false。
    pub async fn initialize(&self) {
        match self.provider.get_session().await {
            Ok(session) => {
                let user = session.map(|session| session.user);
                self.sender.send_modify(|snapshot| {
                    snapshot.user = user;
                    snapshot.loading = false;
                });
                return;
            }
            Err(err) if err.requires_sign_out() => {
                tracing::warn!(error = %err, "刷新令牌无效，清除本地会话");
                self.clear();
                if let Err(sign_out_err) = self.provider.sign_out().await {
                    tracing::warn!(error = %sign_out_err, "登出失败");
                }
            }
            Err(IdentityError::Transport(message)) => {
                tracing::error!(error = %message, "读取会话失败，清除本地会话");
                self.clear();
            }
            Err(err) => {
                tracing::warn!(error = %err, "读取会话失败");
            }
        }

        self.sender.send_modify(|snapshot| {
            snapshot.user = None;
            snapshot.loading = false;
        });
    }

    /// 订阅身份服务事件，重复调用时替换旧的监听任务
    pub async fn start_listening(&self) {
        let receiver = self.provider.subscribe();
        let handle = tokio::spawn(follow_events(
            receiver,
            Arc::clone(&self.sender),
            Arc::clone(&self.storage),
            self.storage_key.clone(),
        ));

        if let Some(previous) = self.listener.lock().await.replace(handle) {
            previous.abort();
        }
    }

    pub async fn shutdown(&self) {
        if let Some(handle) = self.listener.lock().await.take() {
            handle.abort();
        }
    }

    pub fn watch(&self) -> watch::Receiver<AuthSnapshot> {
        self.sender.subscribe()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.sender.borrow().user.clone()
    }

    pub fn require_account(&self) -> Result<AccountId, ApplicationError> {
        self.sender
            .borrow()
            .user
            .as_ref()
            .map(|user| user.id)
            .ok_or(ApplicationError::Unauthenticated)
    }

    /// 清除内存中的用户和本地存储的会话
    pub fn clear(&self) {
        self.sender.send_modify(|snapshot| snapshot.user = None);
        remove_stored_session(self.storage.as_ref(), &self.storage_key);
    }
}

fn remove_stored_session(storage: &dyn SessionStorage, key: &str) {
    if let Err(err) = storage.remove(key) {
        tracing::warn!(error = %err, key = %key, "删除本地会话失败");
    }
}

async fn follow_events(
    mut receiver: broadcast::Receiver<AuthEvent>,
    sender: Arc<watch::Sender<AuthSnapshot>>,
    storage: Arc<dyn SessionStorage>,
    storage_key: String,
) {
    loop {
        match receiver.recv().await {
            Ok(event) => {
                tracing::debug!(event = event.name(), "认证状态变化");
                // 先删除存储，订阅者看到登出时会话已不存在
                if event == AuthEvent::SignedOut {
                    remove_stored_session(storage.as_ref(), &storage_key);
                }
                let user = event.session().map(|session| session.user.clone());
                sender.send_modify(|snapshot| {
                    snapshot.user = user;
                    snapshot.loading = false;
                });
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "认证事件积压，已跳过部分事件");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
