//! Authentication for the kitchen staff.
//!
//! Staff log in as cooks: the cook record carries an optional Argon2id password hash, and a
//! successful login via `/authentication/login` sets an HTTP-only session cookie holding a
//! signed JWT. Every catalog route sits behind [`middleware::require_login`], which rejects
//! requests without a valid session with `401 Unauthorized`.
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for the logged-in cook in handlers
//! - [`middleware`]: The `require_login` route gate
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: JWT session token creation and verification
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use kitchenctl::api::models::users::CurrentUser;
//!
//! async fn whoami(current_user: CurrentUser) -> String {
//!     format!("Hello, {}!", current_user.username)
//! }
//! ```

pub mod current_user;
pub mod middleware;
pub mod password;
pub mod session;
