//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the library catalog API
pub const DEFAULT_API_URL: &str = "https://fsa-book-buddy-b6e748d1380d.herokuapp.com/api";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "BOOKBUDDY_API_URL";

/// Directory under the home directory holding persisted session data
pub const CONFIG_DIR: &str = ".bookbuddy";

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "Book Buddy TUI";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
