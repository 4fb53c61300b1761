//! Geographic computations
//!
//! Coordinates are WGS84 longitude/latitude in degrees throughout. Distances
//! are metres unless a name says otherwise.
//!
//! - `point`: normalized coordinate points and the validity check
//! - `geodesic`: the direct geodesic problem on the WGS84 ellipsoid
//! - `buffer`: geodesic circles built through an azimuthal-equidistant round trip

pub mod buffer;
pub mod geodesic;
pub mod point;

pub use buffer::{BufferError, GeodesicBuffer, geodesic_buffer};
pub use point::{CoordinatePoint, Units, normalize_longitude, validate};
