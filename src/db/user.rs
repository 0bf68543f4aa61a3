//! Repository for the singleton account record. There is at most one row,
//! stored under a fixed well-known id.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::models::{User, UserInput};
use crate::util::now;

/// Fixed primary key of the single user row.
pub const USER_ID: &str = "user";

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

pub fn get_user(conn: &Connection) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, name, created_at, updated_at FROM user WHERE id = ?1",
        [USER_ID],
        map_user_row,
    )
    .optional()
    .map_err(StoreError::from)
}

/// Create or update the account record. The original creation timestamp is
/// preserved across saves; `updated_at` is refreshed every time.
pub fn save_user(conn: &Connection, input: UserInput) -> Result<User> {
    if input.name.trim().is_empty() {
        return Err(StoreError::invalid_input(
            "name",
            "user name must not be empty",
        ));
    }

    let now = now();
    let existing = get_user(conn)?;
    let user = User {
        id: USER_ID.to_string(),
        name: input.name,
        created_at: existing.as_ref().map_or(now, |user| user.created_at),
        updated_at: now,
    };

    conn.execute(
        "INSERT OR REPLACE INTO user (id, name, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![user.id, user.name, user.created_at, user.updated_at],
    )?;

    Ok(user)
}

/// Rename the account, creating the record if it does not exist yet.
pub fn update_user_name(conn: &Connection, name: &str) -> Result<User> {
    save_user(
        conn,
        UserInput {
            name: name.to_string(),
        },
    )
}

pub fn has_user(conn: &Connection) -> Result<bool> {
    Ok(get_user(conn)?.is_some())
}
