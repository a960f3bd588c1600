//! # Shared Constants
//!
//! Defaults shared by the library and the server crate.

/// The embedding model used when a request does not name one.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// The default collection holding ad content.
pub const DEFAULT_COLLECTION: &str = "content_requests";

/// The default page size of an advertiser filter scroll.
pub const DEFAULT_ADVERTISER_LIMIT: u32 = 15;
