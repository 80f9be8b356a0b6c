//! Departments domain facade.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::permissions::{ensure_admin, Requester};
use crate::entities::{normalize_code, Department};
use crate::errors::{SmartRentError, SmartRentResult};
use crate::storage::{DepartmentRepository, UserRepository};

/// Input for registering a rental unit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDepartment {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Department use-cases
pub struct DepartmentsDomain {
    departments: Arc<dyn DepartmentRepository>,
    users: Arc<dyn UserRepository>,
}

impl DepartmentsDomain {
    pub fn new(departments: Arc<dyn DepartmentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { departments, users }
    }

    async fn load(&self, department_id: &str) -> SmartRentResult<Department> {
        self.departments
            .find_by_id(department_id)
            .await?
            .ok_or_else(|| SmartRentError::DepartmentNotFound {
                department_id: department_id.to_string(),
            })
    }

    /// Register a unit; codes are unique after normalization
    pub async fn create_department(
        &self,
        input: NewDepartment,
        requester: &Requester,
    ) -> SmartRentResult<Department> {
        ensure_admin(requester, "create departments")?;

        let code = normalize_code(&input.code);
        let name = input.name.trim();
        if code.is_empty() {
            return Err(SmartRentError::validation("department code must not be empty"));
        }
        if name.is_empty() {
            return Err(SmartRentError::validation("department name must not be empty"));
        }
        if self.departments.find_by_code(&code).await?.is_some() {
            return Err(SmartRentError::conflict(format!(
                "department code '{code}' is already in use"
            )));
        }

        let department = Department::new(
            Uuid::new_v4().to_string(),
            code,
            name,
            input.description.trim(),
        );
        let department = self.departments.create(department).await?;
        info!(department_id = %department.id, code = %department.code, "Department created");
        Ok(department)
    }

    pub async fn get_department(&self, department_id: &str) -> SmartRentResult<Department> {
        self.load(department_id).await
    }

    pub async fn list_departments(&self) -> SmartRentResult<Vec<Department>> {
        self.departments.list().await
    }

    /// Move a tenant into a unit. Re-assigning the current tenant is a no-op.
    pub async fn assign_tenant(
        &self,
        department_id: &str,
        tenant_id: &str,
        requester: &Requester,
    ) -> SmartRentResult<Department> {
        ensure_admin(requester, "assign tenants")?;
        if !self.users.exists(tenant_id).await? {
            return Err(SmartRentError::UserNotFound {
                user_id: tenant_id.to_string(),
            });
        }

        let mut department = self.load(department_id).await?;
        match department.tenant_id.clone() {
            Some(current) if current == tenant_id => return Ok(department),
            Some(current) => {
                return Err(SmartRentError::conflict(format!(
                    "department '{}' is already occupied by '{current}'",
                    department.code
                )));
            }
            None => {}
        }

        department.set_tenant(Some(tenant_id.to_string()));
        self.departments.update(&department).await?;
        info!(department_id, tenant_id, "Tenant assigned to department");
        Ok(department)
    }

    pub async fn release_tenant(
        &self,
        department_id: &str,
        requester: &Requester,
    ) -> SmartRentResult<Department> {
        ensure_admin(requester, "release tenants")?;
        let mut department = self.load(department_id).await?;
        if !department.is_occupied() {
            return Ok(department);
        }

        department.set_tenant(None);
        self.departments.update(&department).await?;
        info!(department_id, "Tenant released from department");
        Ok(department)
    }

    /// Remove a vacant unit
    pub async fn delete_department(
        &self,
        department_id: &str,
        requester: &Requester,
    ) -> SmartRentResult<()> {
        ensure_admin(requester, "delete departments")?;
        let department = self.load(department_id).await?;
        if department.is_occupied() {
            return Err(SmartRentError::conflict(format!(
                "department '{}' is occupied and cannot be deleted",
                department.code
            )));
        }

        self.departments.delete(department_id).await?;
        info!(department_id, "Department deleted");
        Ok(())
    }
}
