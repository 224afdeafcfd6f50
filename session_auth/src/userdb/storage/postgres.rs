use sqlx::{Pool, Postgres};

use crate::userdb::{errors::UserError, types::Account};

use super::config::DB_TABLE_USERS;
use super::types::{AccountRow, profile_to_text};

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            username TEXT NOT NULL PRIMARY KEY,
            email TEXT NOT NULL,
            password TEXT NOT NULL DEFAULT '',
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            is_superuser BOOLEAN NOT NULL DEFAULT false,
            is_active BOOLEAN NOT NULL DEFAULT false,
            created_at TIMESTAMPTZ,
            confirmed_at TIMESTAMPTZ,
            last_login_at TIMESTAMPTZ,
            profile TEXT
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS {table_name}_email_lower_idx ON {table_name} (LOWER(email))
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn get_account_by_username_postgres(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<Account, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, AccountRow>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE username = $1
        "#
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or(UserError::NotFound)?
    .try_into()
}

pub(super) async fn get_accounts_by_email_postgres(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Vec<Account>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, AccountRow>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE LOWER(email) = LOWER($1)
        "#
    ))
    .bind(email)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(Account::try_from)
    .collect()
}

pub(super) async fn get_accounts_postgres(
    pool: &Pool<Postgres>,
    active_only: bool,
) -> Result<Vec<Account>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();
    let filter = if active_only {
        "WHERE is_active = true"
    } else {
        ""
    };

    sqlx::query_as::<_, AccountRow>(&format!(
        r#"
        SELECT * FROM {table_name} {filter} ORDER BY username ASC
        "#
    ))
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(Account::try_from)
    .collect()
}

pub(super) async fn insert_account_postgres(
    pool: &Pool<Postgres>,
    account: &Account,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (username, email, password, first_name, last_name,
            is_superuser, is_active, created_at, confirmed_at, last_login_at, profile)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#
    ))
    .bind(&account.username)
    .bind(&account.email)
    .bind(&account.password)
    .bind(&account.first_name)
    .bind(&account.last_name)
    .bind(account.is_superuser)
    .bind(account.is_active)
    .bind(account.created_at)
    .bind(account.confirmed_at)
    .bind(account.last_login_at)
    .bind(profile_to_text(account)?)
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn update_account_postgres(
    pool: &Pool<Postgres>,
    account: &Account,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET
            email = $1,
            password = $2,
            first_name = $3,
            last_name = $4,
            is_superuser = $5,
            is_active = $6,
            created_at = $7,
            confirmed_at = $8,
            last_login_at = $9,
            profile = $10
        WHERE username = $11
        "#
    ))
    .bind(&account.email)
    .bind(&account.password)
    .bind(&account.first_name)
    .bind(&account.last_name)
    .bind(account.is_superuser)
    .bind(account.is_active)
    .bind(account.created_at)
    .bind(account.confirmed_at)
    .bind(account.last_login_at)
    .bind(profile_to_text(account)?)
    .bind(&account.username)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(UserError::NotFound);
    }
    Ok(())
}

pub(super) async fn delete_account_postgres(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE username = $1
        "#
    ))
    .bind(username)
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn count_by_username_postgres(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<i64, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    Ok(sqlx::query_scalar::<_, i64>(&format!(
        r#"
        SELECT COUNT(*) FROM {table_name} WHERE username = $1
        "#
    ))
    .bind(username)
    .fetch_one(pool)
    .await?)
}

pub(super) async fn count_by_email_postgres(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<i64, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    Ok(sqlx::query_scalar::<_, i64>(&format!(
        r#"
        SELECT COUNT(*) FROM {table_name} WHERE LOWER(email) = LOWER($1)
        "#
    ))
    .bind(email)
    .fetch_one(pool)
    .await?)
}
