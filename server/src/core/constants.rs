// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Recipebox";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".recipebox";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "recipebox.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "RECIPEBOX_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "RECIPEBOX_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "RECIPEBOX_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "RECIPEBOX_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "RECIPEBOX_DATA_DIR";

/// Environment variable to override the database file path
pub const ENV_DB_PATH: &str = "RECIPEBOX_DB_PATH";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "recipebox.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 8;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -16000 = 16MB)
pub const SQLITE_CACHE_SIZE: &str = "-16000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Pagination
// =============================================================================

/// Environment variable for the page size cap
pub const ENV_MAX_PAGE_LIMIT: &str = "RECIPEBOX_MAX_PAGE_LIMIT";

/// Largest `limit` a client may request
pub const DEFAULT_MAX_PAGE_LIMIT: u32 = 100;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
