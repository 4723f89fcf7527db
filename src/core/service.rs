//! Repository traits for the company and employee stores

use crate::core::paging::PagedList;
use crate::core::query::EmployeeParameters;
use crate::entities::{Company, Employee};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Read and stage operations on companies
///
/// Reads only see saved state. Staging methods record a change that becomes
/// visible once [`RepositoryManager::save`] succeeds.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// All companies ordered by name
    async fn get_all_companies(&self) -> Result<Vec<Company>>;

    /// Companies whose id is in `ids`, each at most once, in storage order
    ///
    /// Unknown and repeated ids are skipped, so callers compare lengths to
    /// detect them.
    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>>;

    /// Get a company by ID
    async fn get_company(&self, id: &Uuid) -> Result<Option<Company>>;

    /// Stage a new company
    fn create_company(&self, company: Company) -> Result<()>;

    /// Stage removal of a company together with its employees
    fn delete_company(&self, company: &Company) -> Result<()>;
}

/// Read and stage operations on employees of a company
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// One page of a company's employees, filtered by age and sorted
    ///
    /// The ordering comes from `orderBy` with `Name` as the default key.
    async fn get_employees(
        &self,
        company_id: &Uuid,
        parameters: &EmployeeParameters,
    ) -> Result<PagedList<Employee>>;

    /// Single employee lookup scoped to its company
    fn get_employee(&self, company_id: &Uuid, id: &Uuid) -> Result<Option<Employee>>;

    /// Stage a new employee, attaching it to `company_id`
    fn create_employee_for_company(&self, company_id: &Uuid, employee: Employee) -> Result<()>;

    /// Stage the new state of an existing employee
    fn update_employee(&self, employee: Employee) -> Result<()>;

    /// Stage removal of an employee
    fn delete_employee(&self, employee: &Employee) -> Result<()>;
}

/// Unit of work over both repositories
///
/// One manager serves one request. Staged changes are applied atomically by
/// [`save`](RepositoryManager::save) and discarded if the manager is dropped
/// without saving.
#[async_trait]
pub trait RepositoryManager: Send + Sync {
    fn company(&self) -> &dyn CompanyRepository;

    fn employee(&self) -> &dyn EmployeeRepository;

    /// Apply every staged change
    async fn save(&self) -> Result<()>;
}

/// Opens a fresh [`RepositoryManager`] per request
pub trait RepositoryProvider: Send + Sync {
    fn manager(&self) -> Arc<dyn RepositoryManager>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    async fn lookup<M>(manager: &M, company_id: &Uuid) -> Result<Option<Company>>
    where
        M: RepositoryManager + ?Sized,
    {
        manager.company().get_company(company_id).await
    }

    #[tokio::test]
    async fn test_managers_are_independent_units_of_work() {
        let provider: Arc<dyn RepositoryProvider> = Arc::new(InMemoryStore::new());
        let writer = provider.manager();
        let reader = provider.manager();

        let company = Company::new("Unit Co", "4 Work Ln", "CA");
        let company_id = company.id;
        writer.company().create_company(company).unwrap();
        assert!(lookup(reader.as_ref(), &company_id).await.unwrap().is_none());

        writer.save().await.unwrap();
        let found = lookup(reader.as_ref(), &company_id).await.unwrap();
        assert_eq!(found.map(|c| c.name), Some("Unit Co".to_string()));
    }
}
