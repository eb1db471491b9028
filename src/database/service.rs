use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{normalize_areas, Employee, User, VerificationArea};
use crate::database::repository::Repository;
use crate::types::Role;

const USER_COLUMNS: &str = "id, fio AS name, login, password, role";
const EMPLOYEE_COLUMNS: &str = "id, fio AS name";
const VERIFICATION_AREAS_KEY: i32 = 1;

pub fn users(pool: PgPool) -> Repository<User> {
    Repository::new("users", USER_COLUMNS, pool)
}

pub fn employees(pool: PgPool) -> Repository<Employee> {
    Repository::new("employees", EMPLOYEE_COLUMNS, pool)
}

/// Validated input for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub login: String,
    pub password: String,
    pub role: Role,
}

/// Look up an account by its login (exact match)
pub async fn find_user_by_login(pool: &PgPool, login: &str) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE login = $1", USER_COLUMNS))
        .bind(login)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert an account; a taken login is reported as `Conflict`
pub async fn create_user(pool: &PgPool, new_user: &NewUser) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (fio, login, password, role) VALUES ($1, $2, $3, $4) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&new_user.name)
    .bind(&new_user.login)
    .bind(&new_user.password)
    .bind(new_user.role.as_str())
    .fetch_one(pool)
    .await
    .map_err(|e| DatabaseError::conflict_on_unique(e, "login is already taken"))?;

    info!("Created user {} ({}) with role {}", user.id, user.login, new_user.role);
    Ok(user)
}

pub async fn update_user_role(pool: &PgPool, id: i32, role: Role) -> Result<(), DatabaseError> {
    let touched = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
        .bind(role.as_str())
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    if touched == 0 {
        return Err(DatabaseError::NotFound(format!("user {} not found", id)));
    }
    info!("Changed role of user {} to {}", id, role);
    Ok(())
}

pub async fn create_employee(pool: &PgPool, name: &str) -> Result<Employee, DatabaseError> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "INSERT INTO employees (fio) VALUES ($1) RETURNING {}",
        EMPLOYEE_COLUMNS
    ))
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(employee)
}

/// The stored taxonomy, or an empty list when nothing was saved yet
pub async fn fetch_verification_areas(pool: &PgPool) -> Result<Vec<VerificationArea>, DatabaseError> {
    let payload: Option<Value> = sqlx::query_scalar("SELECT payload FROM verification_areas_store WHERE id = $1")
        .bind(VERIFICATION_AREAS_KEY)
        .fetch_optional(pool)
        .await?;

    let items = match payload {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value(value).map_err(|e| DatabaseError::Corrupt {
            column: "verification_areas_store.payload".to_string(),
            message: e.to_string(),
        })?,
    };
    Ok(normalize_areas(items))
}

/// Replaces the whole taxonomy document
pub async fn replace_verification_areas(pool: &PgPool, items: &[VerificationArea]) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO verification_areas_store (id, payload) VALUES ($1, $2) \
         ON CONFLICT (id) DO UPDATE SET payload = EXCLUDED.payload",
    )
    .bind(VERIFICATION_AREAS_KEY)
    .bind(Json(items))
    .execute(pool)
    .await?;

    info!("Saved {} verification areas", items.len());
    Ok(())
}
