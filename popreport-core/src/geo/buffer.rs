//! Geodesic buffers
//!
//! A geodesic buffer approximates the set of points within a given distance
//! of a center. It is built by buffering the origin of an azimuthal-equidistant
//! projection centered on the point, then mapping the ring back to
//! longitude/latitude.
//!
//! Vertex longitudes stay continuous with the center longitude, so a ring
//! near the antimeridian may carry longitudes slightly beyond ±180. Buffers
//! that would reach a pole are refused: past that point the ring no longer
//! bounds the circle in longitude/latitude space.

use std::f64::consts::TAU;

use super::geodesic::{self, GeodesicError};
use super::point::{CoordinatePoint, normalize_longitude};

/// Segments used per quarter circle
pub const QUADRANT_SEGMENTS: usize = 16;

/// Distinct vertices in a buffer ring; the ring stores one more to close it
pub const RING_SEGMENTS: usize = 4 * QUADRANT_SEGMENTS;

/// Closed ring of `(longitude, latitude)` pairs around a center point
///
/// The first and last vertices are identical. Vertices start due east of the
/// center and run clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodesicBuffer {
    ring: Vec<(f64, f64)>,
}

impl GeodesicBuffer {
    pub fn ring(&self) -> &[(f64, f64)] {
        &self.ring
    }

    pub fn into_ring(self) -> Vec<(f64, f64)> {
        self.ring
    }

    /// Number of stored vertices, including the closing one
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Planar shoelace area in square degrees; negative for clockwise rings
    pub fn signed_area(&self) -> f64 {
        self.ring
            .windows(2)
            .map(|w| w[0].0 * w[1].1 - w[1].0 * w[0].1)
            .sum::<f64>()
            / 2.0
    }

    /// Planar area enclosed by the ring, in square degrees
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Even-odd test of a longitude/latitude pair against the ring
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        let mut inside = false;
        for w in self.ring.windows(2) {
            let ((x1, y1), (x2, y2)) = (w[0], w[1]);
            if (y1 > latitude) != (y2 > latitude) {
                let crossing = x1 + (latitude - y1) * (x2 - x1) / (y2 - y1);
                if longitude < crossing {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// Why a buffer could not be produced
#[derive(Debug, Clone, PartialEq)]
pub enum BufferError {
    /// Radius is NaN, infinite, or not positive
    InvalidRadius(f64),
    /// Center lies outside the WGS84 bounds
    InvalidCenter { longitude: f64, latitude: f64 },
    /// The circle would reach or enclose a pole
    EnclosesPole { radius_km: f64, max_radius_km: f64 },
    /// The inverse projection failed for a ring vertex
    Projection(GeodesicError),
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::InvalidRadius(radius) => write!(f, "invalid buffer radius: {radius} km"),
            BufferError::InvalidCenter {
                longitude,
                latitude,
            } => write!(f, "invalid buffer center: ({longitude}, {latitude})"),
            BufferError::EnclosesPole {
                radius_km,
                max_radius_km,
            } => write!(
                f,
                "buffer of {radius_km} km reaches a pole (limit {max_radius_km:.3} km from this center)"
            ),
            BufferError::Projection(err) => write!(f, "projection failed: {err}"),
        }
    }
}

impl std::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BufferError::Projection(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GeodesicError> for BufferError {
    fn from(err: GeodesicError) -> Self {
        BufferError::Projection(err)
    }
}

/// Builds the geodesic circle of `radius_km` around `center`
///
/// Either every vertex maps back cleanly or the whole buffer fails.
pub fn geodesic_buffer(
    center: &CoordinatePoint,
    radius_km: f64,
) -> Result<GeodesicBuffer, BufferError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(BufferError::InvalidRadius(radius_km));
    }
    if !center.is_valid() {
        return Err(BufferError::InvalidCenter {
            longitude: center.longitude(),
            latitude: center.latitude(),
        });
    }

    let radius_m = radius_km * 1000.0;
    let max_radius_m = geodesic::distance_to_nearest_pole(center.latitude());
    if radius_m >= max_radius_m {
        return Err(BufferError::EnclosesPole {
            radius_km,
            max_radius_km: max_radius_m / 1000.0,
        });
    }

    let mut ring = planar_circle(radius_m)
        .map(|(x, y)| aeqd_inverse(center, x, y))
        .collect::<Result<Vec<_>, _>>()?;

    let first = ring[0];
    ring.push(first);

    Ok(GeodesicBuffer { ring })
}

/// Clockwise vertices of a circle around the projected origin, starting on +x
fn planar_circle(radius: f64) -> impl Iterator<Item = (f64, f64)> {
    (0..RING_SEGMENTS).map(move |k| {
        let theta = -(k as f64) * TAU / RING_SEGMENTS as f64;
        let (sin, cos) = theta.sin_cos();
        (radius * cos, radius * sin)
    })
}

/// Inverse azimuthal-equidistant projection centered at `center`
///
/// The returned longitude lies within 180 degrees of the center longitude.
fn aeqd_inverse(center: &CoordinatePoint, x: f64, y: f64) -> Result<(f64, f64), GeodesicError> {
    let azimuth = x.atan2(y).to_degrees();
    let distance = x.hypot(y);
    let (lat, lon) = geodesic::destination(center.latitude(), center.longitude(), azimuth, distance)?;
    let offset = normalize_longitude(lon - center.longitude());
    Ok((center.longitude() + offset, lat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::geodesic::WGS84_A;

    fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
        let (lon1, lat1) = (a.0.to_radians(), a.1.to_radians());
        let (lon2, lat2) = (b.0.to_radians(), b.1.to_radians());
        let h = ((lat2 - lat1) / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
        2.0 * 6371.0088 * h.sqrt().asin()
    }

    #[test]
    fn test_ring_is_closed_with_fixed_resolution() {
        let buffer = geodesic_buffer(&CoordinatePoint::new(10.0, 50.0), 5.0).unwrap();
        assert_eq!(buffer.len(), RING_SEGMENTS + 1);
        assert_eq!(buffer.ring().first(), buffer.ring().last());
    }

    #[test]
    fn test_ring_contains_center() {
        let cases = [
            (0.0, 0.0, 1.0),
            (200.0, 40.0, 5.0),
            (10.0, 50.0, 0.1),
            (120.0, -33.0, 250.0),
            (-73.98, 40.75, 30.0),
            (0.0, 85.0, 100.0),
        ];
        for (lon, lat, radius) in cases {
            let center = CoordinatePoint::new(lon, lat);
            let buffer = geodesic_buffer(&center, radius).unwrap();
            assert!(
                buffer.contains(center.longitude(), center.latitude()),
                "center ({lon}, {lat}) not inside {radius} km buffer"
            );
        }
    }

    #[test]
    fn test_area_grows_with_radius() {
        let center = CoordinatePoint::new(-160.0, 40.0);
        let radii = [0.1, 0.2, 1.0, 2.0, 5.0, 10.0, 50.0, 100.0, 500.0];
        let areas: Vec<f64> = radii
            .iter()
            .map(|r| geodesic_buffer(&center, *r).unwrap().area())
            .collect();
        for pair in areas.windows(2) {
            assert!(pair[1] > pair[0], "areas not increasing: {areas:?}");
        }
    }

    #[test]
    fn test_ring_runs_clockwise_from_east() {
        let buffer = geodesic_buffer(&CoordinatePoint::new(0.0, 0.0), 100.0).unwrap();
        assert!(buffer.signed_area() < 0.0);

        let (east_lon, east_lat) = buffer.ring()[0];
        let expected = (100_000.0 / WGS84_A).to_degrees();
        assert!((east_lon - expected).abs() < 1e-9);
        assert!(east_lat.abs() < 1e-9);

        // a quarter turn clockwise from east is due south
        let (south_lon, south_lat) = buffer.ring()[QUADRANT_SEGMENTS];
        assert!(south_lon.abs() < 1e-9);
        assert!((south_lat + 0.9043).abs() < 1e-3, "south lat {south_lat}");
    }

    #[test]
    fn test_vertices_are_at_radius() {
        let center = CoordinatePoint::new(13.4, 52.5);
        let buffer = geodesic_buffer(&center, 25.0).unwrap();
        for vertex in buffer.ring() {
            let d = haversine_km((center.longitude(), center.latitude()), *vertex);
            assert!((d - 25.0).abs() < 0.25, "vertex {vertex:?} at {d} km");
        }
    }

    #[test]
    fn test_invalid_radius_fails() {
        let center = CoordinatePoint::new(0.0, 0.0);
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                geodesic_buffer(&center, radius),
                Err(BufferError::InvalidRadius(_))
            ));
        }
    }

    #[test]
    fn test_invalid_center_fails() {
        let err = geodesic_buffer(&CoordinatePoint::new(10.0, 95.0), 1.0).unwrap_err();
        assert!(matches!(err, BufferError::InvalidCenter { .. }));
        assert!(err.to_string().contains("95"));
    }

    #[test]
    fn test_projection_error_display_has_source() {
        let err = BufferError::from(GeodesicError::NotConverged);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("projection failed"));
    }

    #[test]
    fn test_ring_near_antimeridian_stays_local() {
        for lon in [179.99, -179.99, 180.0] {
            let center = CoordinatePoint::new(lon, 10.0);
            let buffer = geodesic_buffer(&center, 5.0).unwrap();

            assert!(
                buffer.contains(center.longitude(), center.latitude()),
                "center ({lon}, 10) not inside"
            );

            let (min, max) = buffer
                .ring()
                .iter()
                .fold((f64::MAX, f64::MIN), |(lo, hi), (x, _)| (lo.min(*x), hi.max(*x)));
            assert!(max - min < 0.2, "longitude span {min}..{max} around {lon}");
            assert!(buffer.area() < 0.01, "area {}", buffer.area());
        }

        // the eastern vertices of a buffer at 179.99 continue past 180
        let buffer = geodesic_buffer(&CoordinatePoint::new(179.99, 10.0), 5.0).unwrap();
        assert!(buffer.ring()[0].0 > 180.0);
    }

    #[test]
    fn test_buffer_reaching_a_pole_fails() {
        for lat in [90.0, -90.0] {
            let err = geodesic_buffer(&CoordinatePoint::new(0.0, lat), 5.0).unwrap_err();
            assert!(matches!(err, BufferError::EnclosesPole { .. }), "{err}");
        }

        // about 1.1 km from the pole
        let near_pole = CoordinatePoint::new(0.0, 89.99);
        let buffer = geodesic_buffer(&near_pole, 0.5).unwrap();
        assert!(buffer.contains(0.0, 89.99));
        assert!(matches!(
            geodesic_buffer(&near_pole, 5.0),
            Err(BufferError::EnclosesPole { .. })
        ));

        // from the equator the limit is a quarter meridian
        let equator = CoordinatePoint::new(0.0, 0.0);
        let err = geodesic_buffer(&equator, 10_002.0).unwrap_err();
        assert!(err.to_string().contains("reaches a pole"));
        assert!(geodesic_buffer(&equator, 20_000.0).is_err());
    }

    #[test]
    fn test_large_buffers_keep_growing() {
        let center = CoordinatePoint::new(0.0, 0.0);
        let radii = [1_000.0, 2_500.0, 5_000.0, 7_500.0, 9_000.0, 9_900.0];
        let areas: Vec<f64> = radii
            .iter()
            .map(|r| {
                let buffer = geodesic_buffer(&center, *r).unwrap();
                assert!(buffer.contains(0.0, 0.0), "center outside {r} km buffer");
                buffer.area()
            })
            .collect();
        for pair in areas.windows(2) {
            assert!(pair[1] > pair[0], "areas not increasing: {areas:?}");
        }
    }
}
