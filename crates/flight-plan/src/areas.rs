//! Fixed table of named campus areas.

use serde::Serialize;

/// A named map region with a stable anchor in map-percentage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Area {
    pub slug: &'static str,
    pub name: &'static str,
    pub x: f64,
    pub y: f64,
}

impl Area {
    pub fn anchor(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

// Iteration order matters: the intent parser picks the first area that matches.
static AREAS: [Area; 8] = [
    Area { slug: "central_plaza", name: "Central Plaza", x: 50.0, y: 50.0 },
    Area { slug: "parking_area", name: "Parking Area", x: 25.0, y: 70.0 },
    Area { slug: "building_a", name: "Building A", x: 35.0, y: 35.0 },
    Area { slug: "building_b", name: "Building B", x: 65.0, y: 35.0 },
    Area { slug: "green_zone", name: "Green Zone", x: 70.0, y: 65.0 },
    Area { slug: "rooftop", name: "Rooftop", x: 45.0, y: 30.0 },
    Area { slug: "entrance", name: "Main Entrance", x: 50.0, y: 88.0 },
    Area { slug: "thermal_hotspot", name: "Thermal Hotspot", x: 60.0, y: 45.0 },
];

/// All areas in table order.
pub fn all() -> &'static [Area] {
    &AREAS
}

/// Look an area up by slug.
pub fn lookup(slug: &str) -> Option<&'static Area> {
    AREAS.iter().find(|a| a.slug == slug)
}

/// Display names in table order.
pub fn names() -> Vec<&'static str> {
    AREAS.iter().map(|a| a.name).collect()
}

/// Lowercase and join whitespace runs with underscores.
pub fn normalize_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
