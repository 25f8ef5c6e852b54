//! Great-circle distance on the celestial sphere.

const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Angular distance between two (RA, Dec) points, all in degrees.
///
/// Uses the Vincenty formula, which stays accurate for both tiny and
/// near-antipodal separations.
pub fn angular_separation_deg(ra1_deg: f64, dec1_deg: f64, ra2_deg: f64, dec2_deg: f64) -> f64 {
    let (sin_lat1, cos_lat1) = libm::sincos(dec1_deg * DEG_TO_RAD);
    let (sin_lat2, cos_lat2) = libm::sincos(dec2_deg * DEG_TO_RAD);
    let (sin_dlon, cos_dlon) = libm::sincos((ra2_deg - ra1_deg) * DEG_TO_RAD);

    let num = libm::sqrt(
        (cos_lat2 * sin_dlon).powi(2)
            + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_dlon).powi(2),
    );
    let den = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_dlon;

    libm::atan2(num, den) * RAD_TO_DEG
}
