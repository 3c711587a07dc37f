//! Repository functions for the credential store.
//!
//! Unique fields are normalized (reg number uppercased, email lowercased)
//! before they touch SQL, so uniqueness and lookups are case-insensitive.
//! Uniqueness itself is enforced by the database constraints, which keeps
//! concurrent signups with the same identifier safe without a check-then-
//! insert race.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::User;
use crate::validation::is_valid_reg_number;

pub async fn insert_user(pool: &PgPool, user: &User) -> Result<User, AppError> {
    let record = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, reg_number, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, reg_number, email, password_hash, created_at, updated_at
        "#,
    )
    .bind(user.id)
    .bind(&user.reg_number)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation)?;

    Ok(record)
}

/// Looks a user up by registration number or student email, whichever the
/// identifier's shape matches.
pub async fn find_user_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<User>, AppError> {
    let identifier = normalize_identifier(identifier);

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, reg_number, email, password_hash, created_at, updated_at
        FROM users
        WHERE reg_number = $1 OR email = $1
        "#,
    )
    .bind(&identifier)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, reg_number, email, password_hash, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Resolves an identifier to the account's email. Reset flow only.
pub async fn find_email_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<String>, AppError> {
    let user = find_user_by_identifier(pool, identifier).await?;
    Ok(user.map(|u| u.email))
}

/// Overwrites the password hash for the account behind `email`.
pub async fn update_password_by_email(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $1, updated_at = $2
        WHERE email = $3
        "#,
    )
    .bind(password_hash)
    .bind(Utc::now())
    .bind(email.trim().to_lowercase())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Unknown email".to_string()));
    }

    Ok(())
}

fn normalize_identifier(identifier: &str) -> String {
    let identifier = identifier.trim();
    if is_valid_reg_number(identifier) {
        identifier.to_uppercase()
    } else {
        identifier.to_lowercase()
    }
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some("users_reg_number_key") => {
                return AppError::Conflict("Registration number is already registered".to_string())
            }
            Some("users_email_key") => {
                return AppError::Conflict("Email is already registered".to_string())
            }
            _ => {}
        }
    }
    err.into()
}
