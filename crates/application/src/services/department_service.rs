use std::sync::Arc;

use domain::{
    AccountId, Department, DepartmentId, DepartmentName, DepartmentUpdate, DomainId,
    NewDepartment,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    aggregate::{roll_up, DomainRollup},
    error::ApplicationError,
    gateway::{DepartmentGateway, DomainGateway},
    response::{ensure_accepted, extract_list},
};

/// 跨域搜索的命中结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentMatch {
    pub domain_id: DomainId,
    pub domain_name: String,
    pub department: Department,
}

pub struct DepartmentServiceDependencies {
    pub domain_gateway: Arc<dyn DomainGateway>,
    pub department_gateway: Arc<dyn DepartmentGateway>,
}

pub struct DepartmentService {
    deps: DepartmentServiceDependencies,
}

impl DepartmentService {
    pub fn new(deps: DepartmentServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn list_all(&self) -> Result<Vec<Department>, ApplicationError> {
        let body = ensure_accepted(self.deps.department_gateway.list_departments().await?)?;
        extract_list(&body, "departments")
    }

    pub async fn list_by_domain(
        &self,
        account: AccountId,
        domain_id: DomainId,
    ) -> Result<Vec<Department>, ApplicationError> {
        let body = self
            .deps
            .department_gateway
            .list_departments_by_domain(domain_id, account)
            .await?;
        let body = ensure_accepted(body)?;
        extract_list(&body, "departments")
    }

    pub async fn add(
        &self,
        account: AccountId,
        domain_id: DomainId,
        name: &str,
    ) -> Result<Value, ApplicationError> {
        let name = DepartmentName::parse(name)?;
        let department = NewDepartment::new(name, domain_id, account);

        tracing::info!(domain_id = %domain_id, department_name = %department.department_name, "添加部门");
        let body = ensure_accepted(self.deps.department_gateway.add_department(&department).await?)?;
        Ok(body)
    }

    pub async fn rename(
        &self,
        account: AccountId,
        domain_id: DomainId,
        department_id: DepartmentId,
        name: &str,
    ) -> Result<Value, ApplicationError> {
        let update = DepartmentUpdate::from(DepartmentName::parse(name)?);

        tracing::info!(domain_id = %domain_id, department_id = %department_id, "重命名部门");
        let body = self
            .deps
            .department_gateway
            .update_department(domain_id, department_id, &update, account)
            .await?;
        ensure_accepted(body)
    }

    pub async fn delete(
        &self,
        account: AccountId,
        domain_id: DomainId,
        department_id: DepartmentId,
    ) -> Result<Value, ApplicationError> {
        tracing::info!(domain_id = %domain_id, department_id = %department_id, "删除部门");
        let body = self
            .deps
            .department_gateway
            .delete_department(domain_id, department_id, account)
            .await?;
        ensure_accepted(body)
    }

    /// 账户下每个域的部门列表，单个域失败时该域为空并附带提示
    pub async fn overview(
        &self,
        account: AccountId,
    ) -> Result<Vec<DomainRollup<Department>>, ApplicationError> {
        let domains = ensure_accepted(self.deps.domain_gateway.list_domains(account).await?)?;
        let domains = extract_list(&domains, "domains")?;

        Ok(roll_up(domains, "departments", |domain_id| {
            self.list_by_domain(account, domain_id)
        })
        .await)
    }

    /// 按名称（忽略大小写）搜索所有域的部门，空关键字返回全部
    pub async fn search(
        &self,
        account: AccountId,
        term: &str,
    ) -> Result<Vec<DepartmentMatch>, ApplicationError> {
        let needle = term.trim().to_lowercase();
        let matches = self
            .overview(account)
            .await?
            .into_iter()
            .flat_map(|rollup| {
                let domain_id = rollup.domain.id;
                let domain_name = rollup.domain.domain_name;
                rollup
                    .items
                    .into_iter()
                    .map(move |department| DepartmentMatch {
                        domain_id,
                        domain_name: domain_name.clone(),
                        department,
                    })
            })
            .filter(|found| found.department.name.to_lowercase().contains(&needle))
            .collect();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::gateway::{MockDepartmentGateway, MockDomainGateway};
    use mockall::predicate::eq;
    use serde_json::json;
    use uuid::Uuid;

    fn account() -> AccountId {
        AccountId(Uuid::new_v4())
    }

    fn two_domains() -> MockDomainGateway {
        let mut gateway = MockDomainGateway::new();
        gateway.expect_list_domains().returning(|_| {
            Ok(json!({
                "success": true,
                "domains": [
                    {"id": 1, "domain_name": "Merkez", "domain_ip": "10.0.0.5"},
                    {"id": 2, "domain_name": "Şube", "domain_ip": "10.0.1.5"}
                ]
            }))
        });
        gateway
    }

    fn service(domains: MockDomainGateway, departments: MockDepartmentGateway) -> DepartmentService {
        DepartmentService::new(DepartmentServiceDependencies {
            domain_gateway: Arc::new(domains),
            department_gateway: Arc::new(departments),
        })
    }

    #[tokio::test]
    async fn add_trims_name() {
        let account = account();
        let mut departments = MockDepartmentGateway::new();
        departments
            .expect_add_department()
            .withf(move |department| {
                department.department_name == "Muhasebe"
                    && department.domain_id == DomainId(1)
                    && department.created_by == account
            })
            .times(1)
            .returning(|_| {
                Ok(json!({
                    "success": true,
                    "department": {"id": 7, "name": "Muhasebe", "domain_id": 1}
                }))
            });

        let service = service(MockDomainGateway::new(), departments);
        let body = service.add(account, DomainId(1), "  Muhasebe ").await.unwrap();
        assert_eq!(body["department"]["id"], 7);
    }

    #[tokio::test]
    async fn blank_names_never_reach_backend() {
        let mut departments = MockDepartmentGateway::new();
        departments.expect_add_department().never();
        departments.expect_update_department().never();

        let service = service(MockDomainGateway::new(), departments);
        assert!(service.add(account(), DomainId(1), "   ").await.is_err());
        assert!(service
            .rename(account(), DomainId(1), DepartmentId(3), "")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn rename_sends_new_name() {
        let mut departments = MockDepartmentGateway::new();
        departments
            .expect_update_department()
            .withf(|domain_id, department_id, update, _| {
                *domain_id == DomainId(1)
                    && *department_id == DepartmentId(3)
                    && update.department_name == "İnsan Kaynakları"
            })
            .times(1)
            .returning(|_, _, _, _| Ok(json!({"success": true})));

        let service = service(MockDomainGateway::new(), departments);
        service
            .rename(account(), DomainId(1), DepartmentId(3), "İnsan Kaynakları ")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn overview_tolerates_partial_failure() {
        let mut departments = MockDepartmentGateway::new();
        departments
            .expect_list_departments_by_domain()
            .with(eq(DomainId(1)), mockall::predicate::always())
            .returning(|_, _| Ok(json!({"success": true, "departments": [{"id": 3, "name": "Satış"}]})));
        departments
            .expect_list_departments_by_domain()
            .with(eq(DomainId(2)), mockall::predicate::always())
            .returning(|_, _| Err(TransportError::network("connection refused")));

        let service = service(two_domains(), departments);
        let overview = service.overview(account()).await.unwrap();

        assert_eq!(overview.len(), 2);
        assert_eq!(overview[0].items.len(), 1);
        assert_eq!(overview[0].error, None);
        assert!(overview[1].items.is_empty());
        assert_eq!(
            overview[1].error.as_deref(),
            Some("Failed to load departments for this domain: connection refused")
        );
    }

    #[tokio::test]
    async fn search_matches_case_insensitively() {
        let mut departments = MockDepartmentGateway::new();
        departments
            .expect_list_departments_by_domain()
            .returning(|domain_id, _| {
                let departments = if domain_id == DomainId(1) {
                    json!([{"id": 3, "name": "Satış"}, {"id": 4, "name": "Muhasebe"}])
                } else {
                    json!([{"id": 9, "name": "Bölge Satış"}])
                };
                Ok(json!({"success": true, "departments": departments}))
            });

        let service = service(two_domains(), departments);
        let found = service.search(account(), "sAt").await.unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].domain_name, "Merkez");
        assert_eq!(found[0].department.id, DepartmentId(3));
        assert_eq!(found[1].domain_id, DomainId(2));

        let everything = service.search(account(), "").await.unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[tokio::test]
    async fn global_list_reads_departments_key() {
        let mut departments = MockDepartmentGateway::new();
        departments.expect_list_departments().returning(|| {
            Ok(json!({"departments": [{"id": 1, "name": "Genel"}]}))
        });

        let service = service(MockDomainGateway::new(), departments);
        let all = service.list_all().await.unwrap();
        assert_eq!(all[0].name, "Genel");
    }
}
