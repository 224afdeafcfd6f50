use sqlx::{Pool, Sqlite};

use crate::userdb::{errors::UserError, types::Account};

use super::config::DB_TABLE_USERS;
use super::types::{AccountRow, profile_to_text};

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            username TEXT NOT NULL PRIMARY KEY,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password TEXT NOT NULL DEFAULT '',
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            is_superuser BOOLEAN NOT NULL DEFAULT false,
            is_active BOOLEAN NOT NULL DEFAULT false,
            created_at TIMESTAMP,
            confirmed_at TIMESTAMP,
            last_login_at TIMESTAMP,
            profile TEXT
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn get_account_by_username_sqlite(
    pool: &Pool<Sqlite>,
    username: &str,
) -> Result<Account, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, AccountRow>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE username = ?
        "#
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or(UserError::NotFound)?
    .try_into()
}

pub(super) async fn get_accounts_by_email_sqlite(
    pool: &Pool<Sqlite>,
    email: &str,
) -> Result<Vec<Account>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query_as::<_, AccountRow>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE LOWER(email) = LOWER(?)
        "#
    ))
    .bind(email)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(Account::try_from)
    .collect()
}

pub(super) async fn get_accounts_sqlite(
    pool: &Pool<Sqlite>,
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

pub(super) async fn insert_account_sqlite(
    pool: &Pool<Sqlite>,
    account: &Account,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (username, email, password, first_name, last_name,
            is_superuser, is_active, created_at, confirmed_at, last_login_at, profile)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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

pub(super) async fn update_account_sqlite(
    pool: &Pool<Sqlite>,
    account: &Account,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET
            email = ?,
            password = ?,
            first_name = ?,
            last_name = ?,
            is_superuser = ?,
            is_active = ?,
            created_at = ?,
            confirmed_at = ?,
            last_login_at = ?,
            profile = ?
        WHERE username = ?
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

pub(super) async fn delete_account_sqlite(
    pool: &Pool<Sqlite>,
    username: &str,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE username = ?
        "#
    ))
    .bind(username)
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn count_by_username_sqlite(
    pool: &Pool<Sqlite>,
    username: &str,
) -> Result<i64, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    Ok(sqlx::query_scalar::<_, i64>(&format!(
        r#"
        SELECT COUNT(*) FROM {table_name} WHERE username = ?
        "#
    ))
    .bind(username)
    .fetch_one(pool)
    .await?)
}

pub(super) async fn count_by_email_sqlite(
    pool: &Pool<Sqlite>,
    email: &str,
) -> Result<i64, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    Ok(sqlx::query_scalar::<_, i64>(&format!(
        r#"
        SELECT COUNT(*) FROM {table_name} WHERE LOWER(email) = LOWER(?)
        "#
    ))
    .bind(email)
    .fetch_one(pool)
    .await?)
}
