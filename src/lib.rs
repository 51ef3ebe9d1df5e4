//! # Butterfly-path Library
//!
//! Frozen steps of computed OpenStreetMap routes.
//!
//! A search algorithm freezes each committed step into a [`PathElement`]
//! linked to the previous one. Once the search ends, walking the origin chain
//! back from the goal reconstructs the route, and each step can be written as
//! a fixed 14-byte record.
//!
//! ## Features
//!
//! - **Shared prefixes**: elements are reference counted, so branches that
//!   share a prefix keep it alive exactly as long as needed
//! - **Optional time/energy**: zero-valued accessors when the profile does
//!   not track them
//! - **Traffic accounting**: opt-in per element, a no-op otherwise
//! - **Compact records**: big-endian `lat, lon, elevation, cost`
//!
//! ## Basic Usage
//!
//! ```rust
//! use butterfly_path::{PathElement, Positioned, RecordReader};
//!
//! let a = PathElement::create(100_000_000, 50_000_000, 400, None, false);
//! let b = PathElement::create(100_000_100, 50_000_050, 404, Some(a), false);
//! assert_eq!(b.elevation_meters(), 101.0);
//! assert_eq!(b.chain_len(), 2);
//!
//! let mut bytes = Vec::new();
//! for element in b.route() {
//!     element.write_to(&mut bytes)?;
//! }
//! let decoded: Vec<PathElement> = RecordReader::new(bytes.as_slice())
//!     .collect::<butterfly_path::Result<_>>()?;
//! assert_eq!(decoded.len(), 2);
//! # Ok::<(), butterfly_path::Error>(())
//! ```

pub mod core;

pub use crate::core::codec::{write_route, RecordReader, RECORD_SIZE};
pub use crate::core::config::{Config, TrafficConfig};
pub use crate::core::distance::{haversine_distance, round_up_meters, DistanceFn, GreatCircle};
pub use crate::core::element::{Ancestors, InProgressPath, PathElement, PendingStep};
pub use crate::core::error::{Error, Result};
pub use crate::core::message::{Annotations, MessageData};
pub use crate::core::position::{
    position_id, split_position_id, CoordinateScale, GeoPoint, Positioned,
};
pub use crate::core::track::{Track, TrackSummary};
pub use crate::core::traffic::{TrafficRecord, TrafficSink, TrafficWriter};
