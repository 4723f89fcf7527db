//! In-memory repository with a staged unit of work

use crate::core::error::StorageError;
use crate::core::paging::{PageSource, PagedList};
use crate::core::query::{AgeRange, EmployeeParameters};
use crate::core::service::{
    CompanyRepository, EmployeeRepository, RepositoryManager, RepositoryProvider,
};
use crate::core::sort::SortSpec;
use crate::entities::{Company, Employee};
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use uuid::Uuid;

/// Default sort key of the employee collection
const EMPLOYEE_DEFAULT_ORDER: &str = "Name";

/// Saved state, in insertion order
#[derive(Debug, Clone, Default)]
struct Tables {
    companies: IndexMap<Uuid, Company>,
    employees: IndexMap<Uuid, Employee>,
}

type SharedTables = Arc<RwLock<Tables>>;

fn read_tables(tables: &SharedTables) -> Result<std::sync::RwLockReadGuard<'_, Tables>> {
    tables.read().map_err(|_| {
        StorageError::LockPoisoned {
            resource: "tables".to_string(),
        }
        .into()
    })
}

/// A change recorded by a repository and applied on save
#[derive(Debug, Clone)]
enum Change {
    AddCompany(Company),
    RemoveCompany(Uuid),
    AddEmployee(Employee),
    UpdateEmployee(Employee),
    RemoveEmployee(Uuid),
}

impl Change {
    fn apply(self, tables: &mut Tables) -> Result<()> {
        match self {
            Change::AddCompany(company) => {
                tables.companies.insert(company.id, company);
            }
            Change::RemoveCompany(id) => {
                tables.companies.shift_remove(&id);
                tables.employees.retain(|_, e| e.company_id != id);
            }
            Change::AddEmployee(employee) => {
                if !tables.companies.contains_key(&employee.company_id) {
                    return Err(StorageError::QueryError {
                        message: format!("company '{}' does not exist", employee.company_id),
                    }
                    .into());
                }
                tables.employees.insert(employee.id, employee);
            }
            Change::UpdateEmployee(employee) => {
                let slot = tables.employees.get_mut(&employee.id).ok_or_else(|| {
                    StorageError::QueryError {
                        message: format!("employee '{}' no longer exists", employee.id),
                    }
                })?;
                *slot = employee;
            }
            Change::RemoveEmployee(id) => {
                tables.employees.shift_remove(&id);
            }
        }
        Ok(())
    }
}

/// Shared in-memory store
///
/// Cloning is cheap and every clone sees the same data. Each call to
/// [`RepositoryProvider::manager`] opens an independent unit of work.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: SharedTables,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with two companies and three employees
    pub fn with_seed_data() -> Self {
        let it_solutions = Company {
            id: Uuid::from_u128(0xc9d4c053_49b6_410c_bc78_2d54a9991870),
            name: "IT_Solutions Ltd".to_string(),
            address: "583 Wall Dr. Gwynn Oak, MD 21207".to_string(),
            country: "USA".to_string(),
        };
        let admin_solutions = Company {
            id: Uuid::from_u128(0x3d490a70_94ce_4d15_9494_5248280c2ce3),
            name: "Admin_Solutions Ltd".to_string(),
            address: "312 Forest Avenue, BF 923".to_string(),
            country: "USA".to_string(),
        };

        let employees = [
            Employee {
                id: Uuid::from_u128(0x80abbca8_664d_4b20_b5de_024705497d4a),
                name: "Sam Raiden".to_string(),
                age: 26,
                position: "Software developer".to_string(),
                company_id: it_solutions.id,
            },
            Employee {
                id: Uuid::from_u128(0x86dba8c0_d178_41e7_938c_ed49778fb52a),
                name: "Jana McLeaf".to_string(),
                age: 30,
                position: "Software developer".to_string(),
                company_id: it_solutions.id,
            },
            Employee {
                id: Uuid::from_u128(0x021ca3c1_0deb_4afd_ae94_2159a8479811),
                name: "Kane Miller".to_string(),
                age: 35,
                position: "Administrator".to_string(),
                company_id: admin_solutions.id,
            },
        ];

        let mut tables = Tables::default();
        for company in [it_solutions, admin_solutions] {
            tables.companies.insert(company.id, company);
        }
        for employee in employees {
            tables.employees.insert(employee.id, employee);
        }

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Open a unit of work over this store
    pub fn repository(&self) -> InMemoryRepository {
        InMemoryRepository {
            tables: self.tables.clone(),
            pending: Mutex::new(Vec::new()),
        }
    }
}

impl RepositoryProvider for InMemoryStore {
    fn manager(&self) -> Arc<dyn RepositoryManager> {
        Arc::new(self.repository())
    }
}

/// Unit of work implementing both repositories
///
/// Reads go straight to saved state. Writes are queued until [`save`]
/// applies them all under one write lock; if any change fails nothing is
/// applied.
///
/// [`save`]: RepositoryManager::save
pub struct InMemoryRepository {
    tables: SharedTables,
    pending: Mutex<Vec<Change>>,
}

impl InMemoryRepository {
    fn stage(&self, change: Change) -> Result<()> {
        let mut pending = self.pending.lock().map_err(|_| StorageError::LockPoisoned {
            resource: "pending changes".to_string(),
        })?;
        pending.push(change);
        Ok(())
    }

    /// Number of staged, unsaved changes
    pub fn pending_changes(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CompanyRepository for InMemoryRepository {
    async fn get_all_companies(&self) -> Result<Vec<Company>> {
        let mut companies: Vec<Company> =
            read_tables(&self.tables)?.companies.values().cloned().collect();
        SortSpec::parse::<Company>(None, "Name").apply(&mut companies);
        Ok(companies)
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>> {
        let tables = read_tables(&self.tables)?;
        Ok(tables
            .companies
            .values()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn get_company(&self, id: &Uuid) -> Result<Option<Company>> {
        Ok(read_tables(&self.tables)?.companies.get(id).cloned())
    }

    fn create_company(&self, company: Company) -> Result<()> {
        self.stage(Change::AddCompany(company))
    }

    fn delete_company(&self, company: &Company) -> Result<()> {
        self.stage(Change::RemoveCompany(company.id))
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryRepository {
    async fn get_employees(
        &self,
        company_id: &Uuid,
        parameters: &EmployeeParameters,
    ) -> Result<PagedList<Employee>> {
        let query = EmployeeQuery::new(
            self.tables.clone(),
            *company_id,
            parameters.ages,
            SortSpec::parse::<Employee>(parameters.request.order_by(), EMPLOYEE_DEFAULT_ORDER),
        );
        tracing::debug!(%company_id, sort = %query.sort, "querying employees");

        PagedList::from_source(
            &query,
            parameters.request.page_number(),
            parameters.request.page_size(),
        )
        .await
    }

    fn get_employee(&self, company_id: &Uuid, id: &Uuid) -> Result<Option<Employee>> {
        let tables = read_tables(&self.tables)?;
        Ok(tables
            .employees
            .get(id)
            .filter(|e| &e.company_id == company_id)
            .cloned())
    }

    fn create_employee_for_company(&self, company_id: &Uuid, employee: Employee) -> Result<()> {
        let mut employee = employee;
        employee.company_id = *company_id;
        self.stage(Change::AddEmployee(employee))
    }

    fn update_employee(&self, employee: Employee) -> Result<()> {
        self.stage(Change::UpdateEmployee(employee))
    }

    fn delete_employee(&self, employee: &Employee) -> Result<()> {
        self.stage(Change::RemoveEmployee(employee.id))
    }
}

#[async_trait]
impl RepositoryManager for InMemoryRepository {
    fn company(&self) -> &dyn CompanyRepository {
        self
    }

    fn employee(&self) -> &dyn EmployeeRepository {
        self
    }

    async fn save(&self) -> Result<()> {
        let changes = {
            let mut pending = self.pending.lock().map_err(|_| StorageError::LockPoisoned {
                resource: "pending changes".to_string(),
            })?;
            std::mem::take(&mut *pending)
        };
        if changes.is_empty() {
            return Ok(());
        }

        let mut tables = self.tables.write().map_err(|_| StorageError::LockPoisoned {
            resource: "tables".to_string(),
        })?;

        let count = changes.len();
        let mut staged = tables.clone();
        for change in changes {
            change.apply(&mut staged)?;
        }
        *tables = staged;

        tracing::debug!(changes = count, "saved unit of work");
        Ok(())
    }
}

/// Deferred employee query: company filter, age bounds and ordering
///
/// Nothing is read until the query is first counted or windowed. The
/// matching rows are captured then, so the count and the window always
/// describe the same saved state.
struct EmployeeQuery {
    tables: SharedTables,
    company_id: Uuid,
    ages: AgeRange,
    sort: SortSpec,
    snapshot: OnceLock<Vec<Employee>>,
}

impl EmployeeQuery {
    fn new(tables: SharedTables, company_id: Uuid, ages: AgeRange, sort: SortSpec) -> Self {
        Self {
            tables,
            company_id,
            ages,
            sort,
            snapshot: OnceLock::new(),
        }
    }

    fn matches(&self, employee: &Employee) -> bool {
        employee.company_id == self.company_id && self.ages.contains(employee.age)
    }

    fn matching(&self) -> Result<&[Employee]> {
        if let Some(rows) = self.snapshot.get() {
            return Ok(rows);
        }
        let rows: Vec<Employee> = read_tables(&self.tables)?
            .employees
            .values()
            .filter(|e| self.matches(e))
            .cloned()
            .collect();
        Ok(self.snapshot.get_or_init(|| rows))
    }
}

#[async_trait]
impl PageSource<Employee> for EmployeeQuery {
    async fn count(&self) -> Result<usize> {
        Ok(self.matching()?.len())
    }

    async fn window(&self, offset: usize, limit: usize) -> Result<Vec<Employee>> {
        let mut rows = self.matching()?.to_vec();
        self.sort.apply(&mut rows);

        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::RequestParameters;

    fn company(name: &str) -> Company {
        Company::new(name, "1 Main St", "USA")
    }

    async fn store_with_staff(ages: &[(&str, u32)]) -> (InMemoryStore, Uuid) {
        let store = InMemoryStore::new();
        let repo = store.repository();
        let acme = company("Acme");
        let acme_id = acme.id;
        repo.create_company(acme).unwrap();
        for (name, age) in ages {
            repo.create_employee_for_company(&acme_id, Employee::new(acme_id, *name, *age, "Dev"))
                .unwrap();
        }
        repo.save().await.unwrap();
        (store, acme_id)
    }

    #[tokio::test]
    async fn test_writes_are_invisible_until_saved() {
        let store = InMemoryStore::new();
        let repo = store.repository();
        let acme = company("Acme");
        let id = acme.id;

        repo.create_company(acme).unwrap();
        assert_eq!(repo.pending_changes(), 1);
        assert!(repo.get_company(&id).await.unwrap().is_none());

        repo.save().await.unwrap();
        assert_eq!(repo.pending_changes(), 0);
        assert!(repo.get_company(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_is_discarded() {
        let store = InMemoryStore::new();
        {
            let repo = store.repository();
            repo.create_company(company("Ghost")).unwrap();
        }
        let repo = store.repository();
        assert!(repo.get_all_companies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_applies_nothing() {
        let store = InMemoryStore::new();
        let repo = store.repository();
        let acme = company("Acme");
        repo.create_company(acme).unwrap();
        repo.create_employee_for_company(&Uuid::new_v4(), Employee::new(Uuid::nil(), "Orphan", 30, "Dev"))
            .unwrap();

        assert!(repo.save().await.is_err());
        assert!(repo.get_all_companies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_all_companies_ordered_by_name() {
        let store = InMemoryStore::new();
        let repo = store.repository();
        repo.create_company(company("Zeta")).unwrap();
        repo.create_company(company("Alpha")).unwrap();
        repo.save().await.unwrap();

        let names: Vec<String> = repo
            .get_all_companies()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[tokio::test]
    async fn test_get_by_ids_skips_unknown() {
        let store = InMemoryStore::with_seed_data();
        let repo = store.repository();
        let known = repo.get_all_companies().await.unwrap()[0].id;

        let found = repo.get_by_ids(&[known, Uuid::new_v4()]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, known);
    }

    #[tokio::test]
    async fn test_get_by_ids_returns_each_company_once() {
        let store = InMemoryStore::with_seed_data();
        let repo = store.repository();
        let known = repo.get_all_companies().await.unwrap()[0].id;

        let found = repo.get_by_ids(&[known, known]).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_company_cascades() {
        let (store, acme_id) = store_with_staff(&[("Ann", 30), ("Bob", 40)]).await;
        let repo = store.repository();
        let acme = repo.get_company(&acme_id).await.unwrap().unwrap();

        repo.delete_company(&acme).unwrap();
        repo.save().await.unwrap();

        let page = repo
            .get_employees(&acme_id, &EmployeeParameters::default())
            .await
            .unwrap();
        assert_eq!(page.meta().total_count, 0);
    }

    #[tokio::test]
    async fn test_get_employees_filters_sorts_and_pages() {
        let (store, acme_id) = store_with_staff(&[
            ("Dana", 41),
            ("Ann", 25),
            ("Carl", 33),
            ("Bob", 52),
            ("Eve", 19),
        ])
        .await;
        let repo = store.repository();

        let parameters = EmployeeParameters::new(
            RequestParameters::new(1, 2).with_order_by("age desc"),
            AgeRange::new(20, 50),
        );
        let page = repo.get_employees(&acme_id, &parameters).await.unwrap();

        assert_eq!(page.meta().total_count, 3);
        assert_eq!(page.meta().total_pages, 2);
        let names: Vec<&str> = page.items().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Dana", "Carl"]);
    }

    #[tokio::test]
    async fn test_count_and_window_share_one_snapshot() {
        let (store, acme_id) = store_with_staff(&[("Ann", 25), ("Bob", 30)]).await;

        let query = EmployeeQuery::new(
            store.tables.clone(),
            acme_id,
            AgeRange::default(),
            SortSpec::parse::<Employee>(None, EMPLOYEE_DEFAULT_ORDER),
        );
        assert_eq!(query.count().await.unwrap(), 2);

        let writer = store.repository();
        writer
            .create_employee_for_company(&acme_id, Employee::new(acme_id, "Cleo", 40, "Dev"))
            .unwrap();
        writer.save().await.unwrap();

        let window = query.window(0, 10).await.unwrap();
        let names: Vec<&str> = window.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
    }

    #[tokio::test]
    async fn test_get_employees_defaults_to_name_order() {
        let (store, acme_id) = store_with_staff(&[("Carl", 33), ("Ann", 25), ("Bob", 52)]).await;
        let repo = store.repository();

        let page = repo
            .get_employees(&acme_id, &EmployeeParameters::default())
            .await
            .unwrap();
        let names: Vec<&str> = page.items().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob", "Carl"]);
    }

    #[tokio::test]
    async fn test_get_employee_is_scoped_to_company() {
        let (store, acme_id) = store_with_staff(&[("Ann", 25)]).await;
        let repo = store.repository();
        let page = repo
            .get_employees(&acme_id, &EmployeeParameters::default())
            .await
            .unwrap();
        let ann = page.items()[0].clone();

        assert!(repo.get_employee(&acme_id, &ann.id).unwrap().is_some());
        assert!(repo.get_employee(&Uuid::new_v4(), &ann.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_employee() {
        let (store, acme_id) = store_with_staff(&[("Ann", 25)]).await;
        let repo = store.repository();
        let mut ann = repo
            .get_employees(&acme_id, &EmployeeParameters::default())
            .await
            .unwrap()
            .items()[0]
            .clone();

        ann.age = 26;
        repo.update_employee(ann.clone()).unwrap();
        repo.save().await.unwrap();
        assert_eq!(repo.get_employee(&acme_id, &ann.id).unwrap().unwrap().age, 26);

        repo.delete_employee(&ann).unwrap();
        repo.save().await.unwrap();
        assert!(repo.get_employee(&acme_id, &ann.id).unwrap().is_none());
    }
}
