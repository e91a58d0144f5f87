//! 跨域汇总
//!
//! 对每个域并发发起一次请求，单个域失败不影响整体结果。

use std::future::Future;

use domain::{DirectoryDomain, DomainId};
use futures::future::join_all;
use serde::Serialize;

use crate::error::ApplicationError;

/// 单个域的汇总结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainRollup<T> {
    pub domain: DirectoryDomain,
    pub items: Vec<T>,
    /// 加载失败时的提示，此时 `items` 为空
    pub error: Option<String>,
}

impl<T> DomainRollup<T> {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// 为每个域执行 `fetch`，结果顺序与输入一致。
///
/// `what` 用于失败提示，例如 `departments`。
pub async fn roll_up<T, F, Fut>(
    domains: Vec<DirectoryDomain>,
    what: &str,
    fetch: F,
) -> Vec<DomainRollup<T>>
where
    F: Fn(DomainId) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApplicationError>>,
{
    let fetches = domains.into_iter().map(|domain| {
        let pending = fetch(domain.id);
        async move {
            match pending.await {
                Ok(items) => DomainRollup {
                    domain,
                    items,
                    error: None,
                },
                Err(err) => {
                    tracing::warn!(domain_id = %domain.id, error = %err, "加载{}失败", what);
                    DomainRollup {
                        domain,
                        items: Vec::new(),
                        error: Some(format!("Failed to load {what} for this domain: {err}")),
                    }
                }
            }
        }
    });

    join_all(fetches).await
}
