//! Kensington campus buildings and distances between them.

use serde::Serialize;

/// Mean Earth radius used by the haversine formula, in metres.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Building {
    /// Grid reference, e.g. "J17"
    pub code: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl Building {
    pub fn point(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

const fn building(code: &'static str, name: &'static str, latitude: f64, longitude: f64) -> Building {
    Building {
        code,
        name,
        latitude,
        longitude,
    }
}

pub static BUILDINGS: &[Building] = &[
    building("J17", "Ainsworth Building", -33.918517519993465, 151.23151583001268),
    building("H6", "Tyree Energy Technologies Building", -33.91762963446875, 151.22674975329997),
    building("E8", "Chemical Sciences", -33.9173, 151.2307),
    building("K15", "Old Main Building", -33.91765269713936, 151.23082591731696),
    building("H13", "Science and Engineering Building", -33.9189, 151.2277),
    building("F8", "Mathews Building", -33.9184, 151.2335),
    building("E26", "Science and Engineering Building", -33.9192, 151.2317),
    building("D9", "Quadrangle Building", -33.917079138644446, 151.23056358735758),
    building("H10", "Sam Cracknell Pavilion", -33.9200, 151.2280),
    building("F21", "UNSW Library", -33.91736698535717, 151.23343618608945),
    building("F20", "Wallace Wurth Building", -33.9182, 151.2326),
    building("G17", "Law Building", -33.9177, 151.2295),
    building("E4", "Civil Engineering Building", -33.9156, 151.2305),
    building("D10", "Chancellery", -33.9154, 151.2325),
    building("H8", "John Niland Scientia Building", -33.9168, 151.2260),
    building("K17", "School of Computer Science and Engineering", -33.91866127702827, 151.2309250200572),
    building("G6", "The Square House", -33.9160275054492, 151.22637472446445),
    building("F10", "June Griffith Building", -33.91675795632593, 151.2289202109714),
    building("D2", "AGSM Building", -33.918028625320794, 151.23683833156448),
    building("J14", "Keith Burrows Theatre", -33.9181394558123, 151.2302026932067),
    building("D23", "Mathews Theatres", -33.91708922725474, 151.2342204993276),
    building("F23", "Mathews Theatres", -33.91758430549228, 151.23514248898576),
    building("M15", "Rupert Myers Building", -33.91871302947675, 151.23052416334914),
    building("E19", "Patricia O'Shane Building", -33.91709506702178, 151.23248880538088),
    building("B16", "Colombo Theatre", -33.915871204382775, 151.231540087025175),
];

/// Look up a building by code, ignoring case.
pub fn building_by_code(code: &str) -> Option<&'static Building> {
    BUILDINGS.iter().find(|b| b.code.eq_ignore_ascii_case(code))
}

/// Great-circle distance between two (latitude, longitude) points in metres.
pub fn distance_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());

    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Distance between two buildings by code, if both are known.
pub fn distance_between(code_a: &str, code_b: &str) -> Option<f64> {
    let a = building_by_code(code_a)?;
    let b = building_by_code(code_b)?;
    Some(distance_m(a.point(), b.point()))
}

/// The `n` buildings nearest to `point`, closest first, with their distances.
pub fn nearest_buildings(point: (f64, f64), n: usize) -> Vec<(&'static Building, f64)> {
    let mut distances: Vec<_> = BUILDINGS
        .iter()
        .map(|b| (b, distance_m(point, b.point())))
        .collect();

    distances.sort_by(|a, b| a.1.total_cmp(&b.1));
    distances.truncate(n);
    distances
}
