// Service exports
pub mod appwrite;
pub mod cache;
pub mod collaborators;
pub mod memory;
pub mod postgres;
pub mod store;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError, AppwriteNotifier, CachedProfileDirectory};
pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use collaborators::{
    NotificationDispatcher, NotificationError, ProfileDirectory, ProfileError, ProjectionError, UserListProjection,
};
pub use memory::{MemoryMatchStore, MemorySwipeStore, MemoryUserLists};
pub use postgres::PostgresClient;
pub use store::{CreateOutcome, InsertOutcome, MatchStore, StorageError, SwipeStore};
