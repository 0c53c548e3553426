//! Typed client for the ActivityFlow REST API.
//!
//! [`ApiClient`] owns the HTTP connection pool and the [`TokenStore`];
//! the per-resource APIs borrow it:
//!
//! ```no_run
//! # async fn run() -> activityflow_client::ClientResult<()> {
//! use activityflow_client::{ApiClient, TokenStore};
//!
//! let client = ApiClient::new("http://localhost:5000", TokenStore::new("tokens.json"))?;
//! client.auth().login("user1@example.com", "User123!").await?;
//! for activity in client.activities().get_all().await? {
//!     println!("{} {}", activity.id, activity.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod activity_api;
pub mod api_client;
pub mod auth_api;
pub mod category_api;
pub mod error;
pub mod status_api;
pub mod token_store;

pub use api_client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use token_store::{StoredTokens, TokenStore};
