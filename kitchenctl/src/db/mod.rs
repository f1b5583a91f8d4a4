//! Record store: persistence of dish types, cooks, dishes and their relationships.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Services   │  (catalog::QueryService / catalog::MutationService)
//! └──────┬───────┘
//!        │  Arc<dyn CatalogStore>
//!        ↓
//! ┌──────────────┐      ┌──────────────┐
//! │ PostgresStore│      │ InMemoryStore│  (db::store - one unit of work per call)
//! └──────┬───────┘      └──────────────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │ Repositories │  (db::handlers - queries against one connection)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │  PostgreSQL  │
//! └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`store`]: The [`store::CatalogStore`] trait and its two backends
//! - [`handlers`]: PostgreSQL repositories implementing [`handlers::Repository`]
//! - [`models`]: Request and response records exchanged with the store
//! - [`errors`]: Store error type and the shared constraint names
//!
//! # Transactions
//!
//! Repositories borrow a single `PgConnection`. The PostgreSQL store opens a transaction for
//! every mutating call and hands the transaction to the repositories, so a record and its
//! association rows commit together:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let dish = Dishes::new(&mut tx).create(&request).await?;
//! tx.commit().await?;
//! ```
//!
//! # Migrations
//!
//! Schema migrations live in `migrations/` and are embedded with [`crate::migrator`]:
//!
//! ```ignore
//! kitchenctl::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;
