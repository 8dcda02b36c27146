use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Row;
use sqlx::Transaction;

use crate::domain::employee::errors::EmployeeError;
use crate::domain::employee::models::Department;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::models::EmployeeName;
use crate::domain::employee::ports::EmployeeRepository;
use crate::domain::pagination::Page;
use crate::domain::pagination::PageRequest;
use crate::domain::pagination::Sort;
use crate::domain::pagination::SortDirection;
use crate::domain::pagination::SortField;

const EMAIL_CONSTRAINT: &str = "employees_email_key";

const COLUMNS: &str = "id, name, email, department, profile_image, created_at, updated_at";

pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_employee(row: &PgRow) -> Result<Employee, EmployeeError> {
        let name: String = row.try_get("name").map_err(database_error)?;
        let email: String = row.try_get("email").map_err(database_error)?;
        let department: Option<String> = row.try_get("department").map_err(database_error)?;

        Ok(Employee {
            id: EmployeeId(row.try_get("id").map_err(database_error)?),
            name: EmployeeName::new(name).map_err(|e| corrupt("name", e))?,
            email: EmailAddress::new(email).map_err(|e| corrupt("email", e))?,
            department: Department::parse(department).map_err(|e| corrupt("department", e))?,
            profile_image: row.try_get("profile_image").map_err(database_error)?,
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }

    fn map_write_error(e: sqlx::Error, employee: &Employee) -> EmployeeError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_CONSTRAINT) {
                return EmployeeError::EmailAlreadyExists(employee.email.to_string());
            }
        }
        EmployeeError::DatabaseError(e.to_string())
    }

    /// Count and fetch inside one snapshot so the total matches the slice.
    async fn fetch_page(
        &self,
        filter: Option<String>,
        request: PageRequest,
    ) -> Result<Page<Employee>, EmployeeError> {
        let mut tx: Transaction<'_, Postgres> =
            self.pool.begin().await.map_err(database_error)?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        let where_clause = match filter {
            Some(_) => r#"WHERE name ILIKE $1 ESCAPE '\' OR email ILIKE $1 ESCAPE '\'"#,
            None => "",
        };
        let (limit_param, offset_param) = match filter {
            Some(_) => ("$2", "$3"),
            None => ("$1", "$2"),
        };

        let count_sql = format!("SELECT COUNT(*) FROM employees {}", where_clause);
        let mut count_query = sqlx::query(&count_sql);
        if let Some(pattern) = &filter {
            count_query = count_query.bind(pattern);
        }
        let total: i64 = count_query
            .fetch_one(&mut *tx)
            .await
            .map_err(database_error)?
            .try_get(0)
            .map_err(database_error)?;

        let select_sql = format!(
            "SELECT {} FROM employees {} ORDER BY {} LIMIT {} OFFSET {}",
            COLUMNS,
            where_clause,
            order_by(request.sort()),
            limit_param,
            offset_param
        );
        let mut select_query = sqlx::query(&select_sql);
        if let Some(pattern) = &filter {
            select_query = select_query.bind(pattern);
        }
        let rows = select_query
            .bind(i64::from(request.size()))
            .bind(i64::try_from(request.offset()).unwrap_or(i64::MAX))
            .fetch_all(&mut *tx)
            .await
            .map_err(database_error)?;

        tx.commit().await.map_err(database_error)?;

        let content = rows
            .iter()
            .map(Self::row_to_employee)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(
            content,
            &request,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}

fn database_error(e: sqlx::Error) -> EmployeeError {
    EmployeeError::DatabaseError(e.to_string())
}

fn corrupt(column: &str, e: impl std::fmt::Display) -> EmployeeError {
    EmployeeError::DatabaseError(format!("Stored {}: {}", column, e))
}

/// ORDER BY clause for a whitelisted sort, always ending on the id tie-break.
///
/// Text columns compare bytewise (`COLLATE "C"`) and NULL departments sort
/// first ascending and last descending, matching the in-memory store.
fn order_by(sort: Sort) -> String {
    let direction = match sort.direction {
        SortDirection::Asc => "ASC NULLS FIRST",
        SortDirection::Desc => "DESC NULLS LAST",
    };

    let column = match sort.field {
        SortField::Id => return format!("id {}", sort.direction.as_sql()),
        SortField::Name => r#"name COLLATE "C""#,
        SortField::Email => r#"email COLLATE "C""#,
        SortField::Department => r#"department COLLATE "C""#,
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
    };

    format!("{} {}, id ASC", column, direction)
}

/// `%query%` with LIKE metacharacters escaped, so they match literally.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError> {
        sqlx::query(
            r#"
            INSERT INTO employees (id, name, email, department, profile_image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(employee.id.0)
        .bind(employee.name.as_str())
        .bind(employee.email.as_str())
        .bind(employee.department.as_ref().map(Department::as_str))
        .bind(employee.profile_image.as_deref())
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &employee))?;

        Ok(employee)
    }

    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, EmployeeError> {
        let sql = format!("SELECT {} FROM employees WHERE id = $1", COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        row.as_ref().map(Self::row_to_employee).transpose()
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, EmployeeError> {
        sqlx::query("SELECT EXISTS(SELECT 1 FROM employees WHERE email = $1)")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?
            .try_get::<bool, _>(0)
            .map_err(database_error)
    }

    async fn update(&self, employee: Employee) -> Result<Employee, EmployeeError> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET name = $2, email = $3, department = $4, profile_image = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(employee.id.0)
        .bind(employee.name.as_str())
        .bind(employee.email.as_str())
        .bind(employee.department.as_ref().map(Department::as_str))
        .bind(employee.profile_image.as_deref())
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &employee))?;

        if result.rows_affected() == 0 {
            return Err(EmployeeError::NotFound(employee.id));
        }

        Ok(employee)
    }

    async fn delete(&self, id: &EmployeeId) -> Result<(), EmployeeError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(EmployeeError::NotFound(*id));
        }

        Ok(())
    }

    async fn find_page(&self, request: PageRequest) -> Result<Page<Employee>, EmployeeError> {
        self.fetch_page(None, request).await
    }

    async fn search(
        &self,
        query: &str,
        request: PageRequest,
    ) -> Result<Page<Employee>, EmployeeError> {
        if query.is_empty() {
            return self.fetch_page(None, request).await;
        }
        self.fetch_page(Some(contains_pattern(query)), request).await
    }
}
