//! Geographic coordinate type and spatial utilities.
//!
//! Importation searches households inside a circle given in kilometres, so
//! the helpers here speak kilometres.  `f32` lat/lon is plenty at
//! county scale.

/// Kilometres per degree of latitude (mean Earth radius).
pub const KM_PER_DEGREE: f32 = 111.195;

/// A WGS-84 geographic coordinate stored as single-precision floats.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in kilometres.
    pub fn distance_km(self, other: GeoPoint) -> f32 {
        const R: f32 = 6_371.0; // mean Earth radius, km

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Half-widths `(d_lat, d_lon)` in degrees of a box that contains every
    /// point within `radius_km` of `self`.
    ///
    /// Used to turn a radius query into an R-tree envelope query; callers
    /// still filter the candidates with [`distance_km`](Self::distance_km).
    pub fn bbox_half_degrees(self, radius_km: f32) -> (f32, f32) {
        let d_lat = radius_km / KM_PER_DEGREE;
        let cos_lat = self.lat.to_radians().cos().abs().max(1e-3);
        let d_lon = (radius_km / (KM_PER_DEGREE * cos_lat)).min(180.0);
        (d_lat, d_lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
