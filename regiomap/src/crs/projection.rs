//! Forward projection formulas.
//!
//! Projections here take WGS84 geographic coordinates in degrees and return
//! projected coordinates in meters. Only the systems the renderer targets are
//! implemented; the general case belongs to an external transform capability.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// WGS84 semi-major axis in meters.
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Latitude bound of the Web Mercator projection domain.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

/// Spherical Web Mercator (EPSG:3857) forward projection.
///
/// Valid for latitudes within [`MERCATOR_MAX_LAT`]; callers validate the
/// domain before projecting.
pub fn web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = WGS84_A * lon.to_radians();
    let y = WGS84_A * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// Ellipsoidal transverse Mercator forward projection on WGS84/GRS80.
///
/// `lon0` is the central meridian in degrees, `k0` the scale factor at the
/// central meridian, `fe`/`fn_` the false easting/northing in meters. The
/// UTM zones used by the renderer all instantiate this with `k0 = 0.9996`
/// and `fe = 500000`.
pub fn transverse_mercator(
    lon: f64,
    lat: f64,
    lon0: f64,
    k0: f64,
    fe: f64,
    fn_: f64,
) -> (f64, f64) {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let ep2 = e2 / (1.0 - e2);

    let phi = lat.to_radians();
    let dlam = (lon - lon0).to_radians();

    let sin_phi = phi.sin();
    let cos_phi = phi.cos();
    let tan_phi = phi.tan();

    let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = dlam * cos_phi;

    let m = meridian_arc(phi, e2);

    let x = k0
        * n
        * (a
            + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + fe;
    let y = k0
        * (m + n
            * tan_phi
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0))
        + fn_;
    (x, y)
}

/// Ellipsoidal Lambert azimuthal equal-area forward projection on WGS84/GRS80.
///
/// `lon0`/`lat0` locate the projection center in degrees, `fe`/`fn_` the
/// false origin in meters. EPSG:3035 instantiates this at 10°E, 52°N with
/// false origin (4321000, 3210000).
pub fn lambert_azimuthal_equal_area(
    lon: f64,
    lat: f64,
    lon0: f64,
    lat0: f64,
    fe: f64,
    fn_: f64,
) -> (f64, f64) {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let e = e2.sqrt();

    let phi = lat.to_radians();
    let phi0 = lat0.to_radians();
    let dlam = (lon - lon0).to_radians();

    let qp = authalic_q(FRAC_PI_2, e);
    let q = authalic_q(phi, e);
    let q0 = authalic_q(phi0, e);

    let beta = (q / qp).clamp(-1.0, 1.0).asin();
    let beta0 = (q0 / qp).clamp(-1.0, 1.0).asin();

    let rq = WGS84_A * (qp / 2.0).sqrt();
    let m0 = phi0.cos() / (1.0 - e2 * phi0.sin() * phi0.sin()).sqrt();
    let d = WGS84_A * m0 / (rq * beta0.cos());

    let b = rq
        * (2.0
            / (1.0 + beta0.sin() * beta.sin() + beta0.cos() * beta.cos() * dlam.cos()))
        .sqrt();

    let x = fe + b * d * beta.cos() * dlam.sin();
    let y = fn_ + (b / d) * (beta0.cos() * beta.sin() - beta0.sin() * beta.cos() * dlam.cos());
    (x, y)
}

/// Meridian arc length from the equator to latitude `phi` (radians).
fn meridian_arc(phi: f64, e2: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

/// Authalic latitude auxiliary `q(phi)` (Snyder's equal-area series).
fn authalic_q(phi: f64, e: f64) -> f64 {
    let sin_phi = phi.sin();
    let e_sin = e * sin_phi;
    (1.0 - e * e)
        * (sin_phi / (1.0 - e_sin * e_sin)
            - (1.0 / (2.0 * e)) * ((1.0 - e_sin) / (1.0 + e_sin)).ln())
}
