use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, ffi, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Translates SQLite constraint failures into typed errors so handlers can
/// distinguish a missing parent from a duplicate key.
fn map_constraint(e: rusqlite::Error) -> Error {
    if let rusqlite::Error::SqliteFailure(err, _) = &e {
        if err.code == rusqlite::ErrorCode::ConstraintViolation {
            match err.extended_code {
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return Error::ForeignKey("referenced row does not exist".to_string());
                }
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Error::AlreadyExists;
                }
                _ => {}
            }
        }
    }
    Error::Database(e)
}

fn row_to_macroprocess(row: &Row<'_>) -> rusqlite::Result<Macroprocess> {
    Ok(Macroprocess {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
    })
}

fn row_to_subprocess(row: &Row<'_>) -> rusqlite::Result<Subprocess> {
    Ok(Subprocess {
        id: row.get(0)?,
        name: row.get(1)?,
        macroprocess_id: row.get(2)?,
    })
}

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        name: row.get(1)?,
        doc_type: row.get(2)?,
        url: row.get(3)?,
        subprocess_id: row.get(4)?,
    })
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        is_admin: row.get(3)?,
        macroprocess_id: row.get(4)?,
        panel_url: row.get(5)?,
        panel_title: row.get(6)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Macroprocess operations

    fn create_macroprocess(&self, input: &NewMacroprocess) -> Result<Macroprocess> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO macroprocesses (name, category) VALUES (?1, ?2)",
            params![input.name, input.category],
        )
        .map_err(map_constraint)?;

        Ok(Macroprocess {
            id: conn.last_insert_rowid(),
            name: input.name.clone(),
            category: input.category,
        })
    }

    fn get_macroprocess(&self, id: i64) -> Result<Option<Macroprocess>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, category FROM macroprocesses WHERE id = ?1",
            params![id],
            row_to_macroprocess,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_macroprocesses(&self, category: Option<Category>) -> Result<Vec<Macroprocess>> {
        let conn = self.conn();
        let rows = match category {
            Some(category) => {
                let mut stmt = conn.prepare(
                    "SELECT id, name, category FROM macroprocesses
                     WHERE category = ?1 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![category], row_to_macroprocess)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT id, name, category FROM macroprocesses ORDER BY id")?;
                let rows = stmt.query_map([], row_to_macroprocess)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
        };
        rows.map_err(Error::from)
    }

    fn update_macroprocess(
        &self,
        id: i64,
        input: &NewMacroprocess,
    ) -> Result<Option<Macroprocess>> {
        let rows = self.conn().execute(
            "UPDATE macroprocesses SET name = ?1, category = ?2 WHERE id = ?3",
            params![input.name, input.category, id],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        Ok(Some(Macroprocess {
            id,
            name: input.name.clone(),
            category: input.category,
        }))
    }

    fn delete_macroprocess(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM macroprocesses WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Subprocess operations

    fn create_subprocess(&self, input: &NewSubprocess) -> Result<Subprocess> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO subprocesses (name, macroprocess_id) VALUES (?1, ?2)",
            params![input.name, input.macroprocess_id],
        )
        .map_err(map_constraint)?;

        Ok(Subprocess {
            id: conn.last_insert_rowid(),
            name: input.name.clone(),
            macroprocess_id: input.macroprocess_id,
        })
    }

    fn get_subprocess(&self, id: i64) -> Result<Option<Subprocess>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, macroprocess_id FROM subprocesses WHERE id = ?1",
            params![id],
            row_to_subprocess,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_subprocesses(&self) -> Result<Vec<Subprocess>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id, name, macroprocess_id FROM subprocesses ORDER BY id")?;
        let rows = stmt.query_map([], row_to_subprocess)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_subprocesses_by_macroprocess(&self, macroprocess_id: i64) -> Result<Vec<Subprocess>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, macroprocess_id FROM subprocesses
             WHERE macroprocess_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![macroprocess_id], row_to_subprocess)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_subprocess(&self, id: i64, input: &NewSubprocess) -> Result<Option<Subprocess>> {
        let rows = self
            .conn()
            .execute(
                "UPDATE subprocesses SET name = ?1, macroprocess_id = ?2 WHERE id = ?3",
                params![input.name, input.macroprocess_id, id],
            )
            .map_err(map_constraint)?;

        if rows == 0 {
            return Ok(None);
        }
        Ok(Some(Subprocess {
            id,
            name: input.name.clone(),
            macroprocess_id: input.macroprocess_id,
        }))
    }

    fn delete_subprocess(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM subprocesses WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Document operations

    fn create_document(&self, input: &NewDocument) -> Result<Document> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO documents (name, type, url, subprocess_id) VALUES (?1, ?2, ?3, ?4)",
            params![input.name, input.doc_type, input.url, input.subprocess_id],
        )
        .map_err(map_constraint)?;

        Ok(Document {
            id: conn.last_insert_rowid(),
            name: input.name.clone(),
            doc_type: input.doc_type,
            url: input.url.clone(),
            subprocess_id: input.subprocess_id,
        })
    }

    fn get_document(&self, id: i64) -> Result<Option<Document>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, type, url, subprocess_id FROM documents WHERE id = ?1",
            params![id],
            row_to_document,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_documents(
        &self,
        subprocess_id: Option<i64>,
        doc_type: Option<DocType>,
    ) -> Result<Vec<Document>> {
        let conn = self.conn();
        let rows = match (subprocess_id, doc_type) {
            (Some(sp), Some(ty)) => {
                let mut stmt = conn.prepare(
                    "SELECT id, name, type, url, subprocess_id FROM documents
                     WHERE subprocess_id = ?1 AND type = ?2 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![sp, ty], row_to_document)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
            (Some(sp), None) => {
                let mut stmt = conn.prepare(
                    "SELECT id, name, type, url, subprocess_id FROM documents
                     WHERE subprocess_id = ?1 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![sp], row_to_document)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
            (None, Some(ty)) => {
                let mut stmt = conn.prepare(
                    "SELECT id, name, type, url, subprocess_id FROM documents
                     WHERE type = ?1 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![ty], row_to_document)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
            (None, None) => {
                let mut stmt = conn
                    .prepare("SELECT id, name, type, url, subprocess_id FROM documents ORDER BY id")?;
                let rows = stmt.query_map([], row_to_document)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
        };
        rows.map_err(Error::from)
    }

    fn update_document(&self, id: i64, input: &NewDocument) -> Result<Option<Document>> {
        let rows = self
            .conn()
            .execute(
                "UPDATE documents SET name = ?1, type = ?2, url = ?3, subprocess_id = ?4
                 WHERE id = ?5",
                params![input.name, input.doc_type, input.url, input.subprocess_id, id],
            )
            .map_err(map_constraint)?;

        if rows == 0 {
            return Ok(None);
        }
        Ok(Some(Document {
            id,
            name: input.name.clone(),
            doc_type: input.doc_type,
            url: input.url.clone(),
            subprocess_id: input.subprocess_id,
        }))
    }

    fn delete_document(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM documents WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // User operations

    fn create_user(&self, input: &NewUser) -> Result<User> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO users (username, password_hash, is_admin, macroprocess_id, panel_url, panel_title)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                input.username,
                input.password_hash,
                input.is_admin,
                input.macroprocess_id,
                input.panel_url,
                input.panel_title,
            ],
        )
        .map_err(map_constraint)?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            is_admin: input.is_admin,
            macroprocess_id: input.macroprocess_id,
            panel_url: input.panel_url.clone(),
            panel_title: input.panel_title.clone(),
        })
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, username, password_hash, is_admin, macroprocess_id, panel_url, panel_title
             FROM users WHERE id = ?1",
            params![id],
            row_to_user,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, username, password_hash, is_admin, macroprocess_id, panel_url, panel_title
             FROM users WHERE username = ?1",
            params![username],
            row_to_user,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, username, password_hash, is_admin, macroprocess_id, panel_url, panel_title
             FROM users ORDER BY id",
        )?;
        let rows = stmt.query_map([], row_to_user)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let rows = self
            .conn()
            .execute(
                "UPDATE users SET username = ?1, password_hash = ?2, is_admin = ?3,
                 macroprocess_id = ?4, panel_url = ?5, panel_title = ?6 WHERE id = ?7",
                params![
                    user.username,
                    user.password_hash,
                    user.is_admin,
                    user.macroprocess_id,
                    user.panel_url,
                    user.panel_title,
                    user.id,
                ],
            )
            .map_err(map_constraint)?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_user(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn has_admin_user(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i32 =
            conn.query_row("SELECT COUNT(*) FROM users WHERE is_admin = 1", [], |row| {
                row.get(0)
            })?;
        Ok(count > 0)
    }

    // Config operations

    fn get_config(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT value FROM configs WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO configs (key, value) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    // Token operations

    fn create_token(&self, token: &Token) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO tokens (id, token_hash, token_lookup, user_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    token.id,
                    token.token_hash,
                    token.token_lookup,
                    token.user_id,
                    format_datetime(&token.created_at),
                    token.expires_at.as_ref().map(format_datetime),
                ],
            )
            .map_err(map_constraint)?;
        Ok(())
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, token_hash, token_lookup, user_id, created_at, expires_at, last_used_at
             FROM tokens WHERE token_lookup = ?1",
            params![lookup],
            |row| {
                Ok(Token {
                    id: row.get(0)?,
                    token_hash: row.get(1)?,
                    token_lookup: row.get(2)?,
                    user_id: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?),
                    expires_at: row.get::<_, Option<String>>(5)?.map(|s| parse_datetime(&s)),
                    last_used_at: row.get::<_, Option<String>>(6)?.map(|s| parse_datetime(&s)),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_token(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM tokens WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
