//! Tunable submission options sent during the handshake and query.

use serde::Deserialize;

/// Per-session options with the server's customary defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Passages appearing in more than this many files are ignored (`maxmatches`)
    pub max_matches: u32,

    /// Number of matching file pairs shown in the report (`show`)
    pub show_limit: u32,

    /// Treat each directory as one submission (`directory`)
    pub directory_mode: u32,

    /// Experimental server mode (`X`)
    pub experimental: u32,

    /// Comment attached to the report (`query 0 <comment>`)
    pub comment: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_matches: 10,
            show_limit: 250,
            directory_mode: 1,
            experimental: 0,
            comment: String::new(),
        }
    }
}
