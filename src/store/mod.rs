mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface. It is the only path to the
/// persistent state; every read hits the store directly.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Macroprocess operations
    fn create_macroprocess(&self, input: &NewMacroprocess) -> Result<Macroprocess>;
    fn get_macroprocess(&self, id: i64) -> Result<Option<Macroprocess>>;
    fn list_macroprocesses(&self, category: Option<Category>) -> Result<Vec<Macroprocess>>;
    fn update_macroprocess(&self, id: i64, input: &NewMacroprocess)
    -> Result<Option<Macroprocess>>;
    fn delete_macroprocess(&self, id: i64) -> Result<bool>;

    // Subprocess operations
    fn create_subprocess(&self, input: &NewSubprocess) -> Result<Subprocess>;
    fn get_subprocess(&self, id: i64) -> Result<Option<Subprocess>>;
    fn list_subprocesses(&self) -> Result<Vec<Subprocess>>;
    fn list_subprocesses_by_macroprocess(&self, macroprocess_id: i64) -> Result<Vec<Subprocess>>;
    fn update_subprocess(&self, id: i64, input: &NewSubprocess) -> Result<Option<Subprocess>>;
    fn delete_subprocess(&self, id: i64) -> Result<bool>;

    // Document operations
    fn create_document(&self, input: &NewDocument) -> Result<Document>;
    fn get_document(&self, id: i64) -> Result<Option<Document>>;
    fn list_documents(
        &self,
        subprocess_id: Option<i64>,
        doc_type: Option<DocType>,
    ) -> Result<Vec<Document>>;
    fn update_document(&self, id: i64, input: &NewDocument) -> Result<Option<Document>>;
    fn delete_document(&self, id: i64) -> Result<bool>;

    // User operations
    fn create_user(&self, input: &NewUser) -> Result<User>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn list_users(&self) -> Result<Vec<User>>;
    fn update_user(&self, user: &User) -> Result<()>;
    fn delete_user(&self, id: i64) -> Result<bool>;
    fn has_admin_user(&self) -> Result<bool>;

    // Config operations
    fn get_config(&self, key: &str) -> Result<Option<String>>;
    fn set_config(&self, key: &str, value: &str) -> Result<()>;

    // Token operations
    fn create_token(&self, token: &Token) -> Result<()>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>>;
    fn delete_token(&self, id: &str) -> Result<bool>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;

    fn close(&self) -> Result<()>;
}
