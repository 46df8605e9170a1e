//! # CLI Module
//!
//! Command-line entry points of the `coauthors` binary. Besides starting the
//! HTTP server, the CLI can query the directory snapshot directly, which is
//! handy for checking what the API would answer without issuing requests.
//!
//! ## Commands
//!
//! - [`serve`] - Starts the REST server on `SERVER_ADDRESS`
//! - [`authors`] - Runs the author search and prints the matches as a table
//! - [`guests`] - Lists guest authors, optionally filtered by a search term
//! - [`token`] - Issues a bearer token for a user of the directory
//!
//! ## Usage Patterns
//!
//! ```bash
//! coauthors serve
//! coauthors authors --q tor --exclude author1,author2
//! coauthors guests --q doe
//! coauthors token admin
//! ```
//!
//! All commands read the directory from `COAUTHORS_DATA_FILE` (see
//! [`crate::config::data_file`]). A missing file is treated as an empty
//! directory.
//!
//! Tokens are stored as plain text in the snapshot, so the file should be
//! readable only by the account running the service.

mod authors;
mod guests;
mod serve;
mod token;

pub use authors::authors;
pub use guests::guests;
pub use serve::serve;
pub use token::token;
