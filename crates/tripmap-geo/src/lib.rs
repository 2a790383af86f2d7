//! Area boundary resolution for itinerary destinations.
//!
//! [`BoundaryResolver`] turns a destination into an outline geometry using,
//! in order: geometry embedded in the assistant's record, a country-scoped
//! geocoder search, a by-id details lookup, and finally the search result's
//! bounding box. Failures degrade to `None`; results are cached write-once.

pub mod cache;
pub mod client;
pub mod embedded;
pub mod error;
pub mod resolver;
pub mod select;
pub mod types;

mod rate_limit;

pub use cache::{BoundaryCache, InMemoryBoundaryCache};
pub use client::GeocoderClient;
pub use error::GeoError;
pub use resolver::{BoundaryResolver, ResolveBoundary};
pub use types::{OsmRef, SearchCandidate};
