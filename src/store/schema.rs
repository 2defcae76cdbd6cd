pub const SCHEMA: &str = r#"
-- Top level of the content hierarchy
CREATE TABLE IF NOT EXISTS macroprocesses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    category TEXT NOT NULL  -- 'Strategic' | 'Operational' | 'Support'
);

-- Mid tier; removing a macroprocess removes its subprocesses
CREATE TABLE IF NOT EXISTS subprocesses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    macroprocess_id INTEGER NOT NULL REFERENCES macroprocesses(id) ON DELETE CASCADE
);

-- Leaf content records; removing a subprocess removes its documents
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    type TEXT NOT NULL,  -- 'Manual' | 'SOP' | 'Format'
    url TEXT NOT NULL,
    subprocess_id INTEGER NOT NULL REFERENCES subprocesses(id) ON DELETE CASCADE
);

-- Accounts; a user may be associated to a macroprocess for per-user
-- panel defaults, detached when the macroprocess goes away
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,  -- argon2id hash with embedded salt
    is_admin INTEGER NOT NULL DEFAULT 0,
    macroprocess_id INTEGER REFERENCES macroprocesses(id) ON DELETE SET NULL,
    panel_url TEXT,
    panel_title TEXT
);

-- Flat settings for side-panel embedding; one value per key
CREATE TABLE IF NOT EXISTS configs (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Tokens are auth credentials; every token belongs to a user
CREATE TABLE IF NOT EXISTS tokens (
    id TEXT PRIMARY KEY,
    token_hash TEXT NOT NULL,    -- argon2id hash with embedded salt
    token_lookup TEXT NOT NULL,  -- short prefix for fast lookup
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at TEXT DEFAULT (datetime('now')),
    expires_at TEXT,             -- NULL = never
    last_used_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_subprocesses_macroprocess ON subprocesses(macroprocess_id);
CREATE INDEX IF NOT EXISTS idx_documents_subprocess ON documents(subprocess_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_tokens_lookup ON tokens(token_lookup);
CREATE INDEX IF NOT EXISTS idx_tokens_user ON tokens(user_id);
CREATE INDEX IF NOT EXISTS idx_users_macroprocess ON users(macroprocess_id);
"#;
