//! Identity types for Fintra records

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Record identifier as issued by the backend.
pub type EntityId = Uuid;

/// Workspace (tenant) identifier. Every cache key and read is scoped by one.
pub type WorkspaceId = Uuid;

/// Authenticated user identifier.
pub type UserId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Monetary amount in the workspace currency.
pub type Money = f64;

/// Generate a new UUIDv7 identifier (timestamp-sortable).
///
/// Used for locally drafted records before the backend assigns the real id.
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}
