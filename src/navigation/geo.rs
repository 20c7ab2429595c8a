//! Geodesic primitives
//!
//! Distances and headings use the spherical earth model. Side-of-line and
//! ray/line tests work in an east/north tangent plane centred on the line's
//! reference point, which is accurate at the scale of a race course.
//!
//! Side convention: `+1` is to the right of a directed line, `-1` to the
//! left, `0` exactly on it.

use libm::{asin, atan2, cos, fabs, sin, sqrt};

/// Mean earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Ray/line pairs whose direction cross product falls below this are parallel
const PARALLEL_EPSILON: f64 = 1e-9;

/// Normalize angle to the (-180, 180] range
pub fn wrap_180(angle_deg: f64) -> f64 {
    let mut a = angle_deg % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Normalize angle to the [0, 360) range
pub fn wrap_360(angle_deg: f64) -> f64 {
    let mut a = angle_deg % 360.0;
    if a < 0.0 {
        a += 360.0;
    }
    if a >= 360.0 {
        a -= 360.0;
    }
    a
}

/// Signed bend between the leg `previous -> current` and the leg `current -> next`
///
/// Positive for a clockwise (right) turn, in (-180, 180].
pub fn turn_angle(previous: &GeoPoint, current: &GeoPoint, next: &GeoPoint) -> f64 {
    let incoming = previous.distance_heading_to(current).heading_deg;
    let outgoing = current.distance_heading_to(next).heading_deg;
    wrap_180(outgoing - incoming)
}

/// Distance and initial heading from one point to another
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DistanceHeading {
    /// Great-circle distance in meters
    pub distance_m: f64,
    /// Forward azimuth in degrees (0-360, true north)
    pub heading_deg: f64,
}

/// Geographic position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to +90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to +180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new position
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Haversine distance and forward azimuth to `other`
    pub fn distance_heading_to(&self, other: &GeoPoint) -> DistanceHeading {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let sin_dlat = sin(delta_lat / 2.0);
        let sin_dlon = sin(delta_lon / 2.0);
        let a = sin_dlat * sin_dlat + cos(lat1) * cos(lat2) * sin_dlon * sin_dlon;
        let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));

        let y = sin(delta_lon) * cos(lat2);
        let x = cos(lat1) * sin(lat2) - sin(lat1) * cos(lat2) * cos(delta_lon);

        DistanceHeading {
            distance_m: EARTH_RADIUS_M * c,
            heading_deg: wrap_360(atan2(y, x).to_degrees()),
        }
    }

    /// Offset of this point from `origin` in the tangent plane at `origin`
    ///
    /// Returns `(east_m, north_m)`.
    pub fn local_offset_from(&self, origin: &GeoPoint) -> (f64, f64) {
        let lat0 = origin.latitude.to_radians();
        let east = wrap_180(self.longitude - origin.longitude).to_radians() * cos(lat0) * EARTH_RADIUS_M;
        let north = (self.latitude - origin.latitude).to_radians() * EARTH_RADIUS_M;
        (east, north)
    }

    /// Which side of the directed line `a -> b` this point lies on
    pub fn side_of_line(&self, a: &GeoPoint, b: &GeoPoint) -> i8 {
        let direction = b.local_offset_from(a);
        let offset = self.local_offset_from(a);
        side_from_cross(cross(direction, offset))
    }

    /// Which side of the line through `through` at compass `heading_deg` this point lies on
    pub fn side_of_line_by_heading(&self, through: &GeoPoint, heading_deg: f64) -> i8 {
        let offset = self.local_offset_from(through);
        side_from_cross(cross(unit_vector(heading_deg), offset))
    }

    /// Perpendicular distance in meters to the infinite line through `a` and `b`
    ///
    /// Degenerates to the distance to `a` when the two points coincide.
    pub fn distance_to_line(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        let direction = b.local_offset_from(a);
        let offset = self.local_offset_from(a);
        let length = sqrt(direction.0 * direction.0 + direction.1 * direction.1);
        if length < PARALLEL_EPSILON {
            return sqrt(offset.0 * offset.0 + offset.1 * offset.1);
        }
        fabs(cross(direction, offset)) / length
    }

    /// Great-circle projection `distance_m` meters along `heading_deg`
    pub fn destination(&self, heading_deg: f64, distance_m: f64) -> GeoPoint {
        let lat1 = self.latitude.to_radians();
        let lon1 = self.longitude.to_radians();
        let bearing = heading_deg.to_radians();
        let angular = distance_m / EARTH_RADIUS_M;

        let lat2 = asin(sin(lat1) * cos(angular) + cos(lat1) * sin(angular) * cos(bearing));
        let lon2 = lon1
            + atan2(
                sin(bearing) * sin(angular) * cos(lat1),
                cos(angular) - sin(lat1) * sin(lat2),
            );

        GeoPoint::new(lat2.to_degrees(), wrap_180(lon2.to_degrees()))
    }

    /// Whether a ray from this point at `heading_deg` meets the line through
    /// `through` at `line_heading_deg` within `distance_limit_m`
    ///
    /// Parallel lines never cross.
    pub fn crosses_line(
        &self,
        heading_deg: f64,
        through: &GeoPoint,
        line_heading_deg: f64,
        distance_limit_m: f64,
    ) -> bool {
        let ray = unit_vector(heading_deg);
        let line = unit_vector(line_heading_deg);
        let denominator = cross(ray, line);
        if fabs(denominator) < PARALLEL_EPSILON {
            return false;
        }

        let to_line = through.local_offset_from(self);
        let along_ray = cross(to_line, line) / denominator;
        along_ray >= 0.0 && along_ray <= distance_limit_m
    }
}

/// Unit vector `(east, north)` for a compass heading
fn unit_vector(heading_deg: f64) -> (f64, f64) {
    let h = heading_deg.to_radians();
    (sin(h), cos(h))
}

/// 2D cross product `a x b` over `(east, north)` vectors
fn cross(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

/// East/north is a left-handed frame for compass headings, so a negative
/// cross product puts the point on the right.
fn side_from_cross(value: f64) -> i8 {
    if value < 0.0 {
        1
    } else if value > 0.0 {
        -1
    } else {
        0
    }
}
