//! Coordinate math for the KMA forecast grid.
//!
//! The forecast providers address locations by cell index on a Lambert
//! conformal conic projection with fixed parameters. This module carries the
//! forward and inverse transforms between grid cells and geographic
//! coordinates, plus great-circle distance for hazard proximity.

use serde::{Deserialize, Serialize};

use haversine::{Location as HaversineLocation, Units, distance};

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Cell index on the KMA forecast grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// Projection parameters fixed by the provider.
const EARTH_RADIUS_KM: f64 = 6371.00877;
const GRID_SPACING_KM: f64 = 5.0;
const STD_PARALLEL_1_DEG: f64 = 30.0;
const STD_PARALLEL_2_DEG: f64 = 60.0;
const ORIGIN_LON_DEG: f64 = 126.0;
const ORIGIN_LAT_DEG: f64 = 38.0;
const ORIGIN_X: f64 = 43.0;
const ORIGIN_Y: f64 = 136.0;

/// Precomputed projection constants shared by both transforms.
struct Projection {
    re: f64,
    sn: f64,
    sf: f64,
    ro: f64,
    olon: f64,
}

fn projection() -> Projection {
    let re = EARTH_RADIUS_KM / GRID_SPACING_KM;
    let slat1 = STD_PARALLEL_1_DEG.to_radians();
    let slat2 = STD_PARALLEL_2_DEG.to_radians();
    let olon = ORIGIN_LON_DEG.to_radians();
    let olat = ORIGIN_LAT_DEG.to_radians();

    let mut sn = (std::f64::consts::FRAC_PI_4 + slat2 * 0.5).tan()
        / (std::f64::consts::FRAC_PI_4 + slat1 * 0.5).tan();
    sn = (slat1.cos() / slat2.cos()).ln() / sn.ln();
    let mut sf = (std::f64::consts::FRAC_PI_4 + slat1 * 0.5).tan();
    sf = sf.powf(sn) * slat1.cos() / sn;
    let mut ro = (std::f64::consts::FRAC_PI_4 + olat * 0.5).tan();
    ro = re * sf / ro.powf(sn);

    Projection {
        re,
        sn,
        sf,
        ro,
        olon,
    }
}

/// Forward transform: geographic coordinates to the enclosing grid cell.
#[must_use]
pub fn geo_to_grid(point: &GeoPoint) -> GridPoint {
    let p = projection();

    let mut ra = (std::f64::consts::FRAC_PI_4 + point.latitude.to_radians() * 0.5).tan();
    ra = p.re * p.sf / ra.powf(p.sn);

    let mut theta = point.longitude.to_radians() - p.olon;
    if theta > std::f64::consts::PI {
        theta -= 2.0 * std::f64::consts::PI;
    }
    if theta < -std::f64::consts::PI {
        theta += 2.0 * std::f64::consts::PI;
    }
    theta *= p.sn;

    GridPoint {
        x: (ra * theta.sin() + ORIGIN_X + 0.5).floor() as i32,
        y: (p.ro - ra * theta.cos() + ORIGIN_Y + 0.5).floor() as i32,
    }
}

/// Inverse transform: grid cell to the geographic coordinates of its center.
#[must_use]
pub fn grid_to_geo(grid: &GridPoint) -> GeoPoint {
    let p = projection();

    let xn = f64::from(grid.x) - ORIGIN_X;
    let yn = p.ro - f64::from(grid.y) + ORIGIN_Y;
    let mut ra = (xn * xn + yn * yn).sqrt();
    if p.sn < 0.0 {
        ra = -ra;
    }
    let mut alat = (p.re * p.sf / ra).powf(1.0 / p.sn);
    alat = 2.0 * alat.atan() - std::f64::consts::FRAC_PI_2;

    let theta = if xn.abs() <= 0.0 {
        0.0
    } else if yn.abs() <= 0.0 {
        if xn < 0.0 {
            -std::f64::consts::FRAC_PI_2
        } else {
            std::f64::consts::FRAC_PI_2
        }
    } else {
        xn.atan2(yn)
    };
    let alon = theta / p.sn + p.olon;

    GeoPoint {
        latitude: alat.to_degrees(),
        longitude: alon.to_degrees(),
    }
}

/// Great-circle distance between two points in kilometers.
#[must_use]
pub fn distance_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let from = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from, to, Units::Kilometers)
}
