//! SQLite-backed record provider for gallery photo selections.
//!
//! Exposes two small relational tables, user-chosen photo references and a
//! per-photo metadata cache, behind URI-addressed CRUD operations with
//! batch support and change notification. A thin persistence facade: URIs
//! are routed to one of the two tables, the matching SQL operation runs, and
//! subscribers are told what changed.
//!
//! ```no_run
//! use gallery_provider::{Config, GalleryProvider, RowValues};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let mut provider = GalleryProvider::open(&config, None)?;
//!
//! let chosen = provider.contract().chosen_photos_uri();
//! let minted = provider.insert(&chosen, &RowValues::with_uri("content://photo/1"))?;
//! println!("inserted {minted}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod contract;
pub mod db;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod provider;
pub mod values;

pub use config::Config;
pub use contract::{Contract, ResourceUri, TableSpec, CHOSEN_PHOTOS, METADATA_CACHE};
pub use db::Database;
pub use error::{ProviderError, ProviderResult};
pub use notifier::{ChangeNotifier, NotificationTransport};
pub use provider::{BatchOperation, BatchResult, GalleryProvider, QueryResult};
pub use values::RowValues;
