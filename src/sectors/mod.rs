//! Geospatial sector store
//!
//! Loads postcode/zipcode sector polygons from KMZ files and answers which sector,
//! if any, contains a point. Each region ships its KML in one of two layouts (see
//! [`parser::Layout`]).

use geo::{BoundingRect, Contains, GeometryCollection, Point, Rect};

use crate::types::{GeoPoint, Region};

/// KML layouts and placemark conversion
pub mod parser;
/// In-memory store
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use parser::Layout;
pub use store::MemStore;

/// Point-membership lookup, injectable for tests
pub trait SectorLookup: Send + Sync {
    /// Name of the first loaded sector containing `point`, in any region
    fn query(&self, point: GeoPoint) -> Option<String>;
}

/// A named area with its geometry
#[derive(Debug, Clone)]
pub struct Sector {
    name: String,
    geometry: GeometryCollection<f64>,
    bounds: Option<Rect<f64>>,
}

impl Sector {
    /// Create a sector, precomputing its bounding box
    pub fn new(name: String, geometry: GeometryCollection<f64>) -> Self {
        let bounds = geometry.bounding_rect();
        Self {
            name,
            geometry,
            bounds,
        }
    }

    /// Sector identifier (e.g. "AB1 0" or "10001")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sector geometry
    pub fn geometry(&self) -> &GeometryCollection<f64> {
        &self.geometry
    }

    /// Whether the sector's geometry contains `point`
    pub fn contains(&self, point: &Point<f64>) -> bool {
        match self.bounds {
            Some(bounds) => {
                let (min, max) = (bounds.min(), bounds.max());
                if point.x() < min.x || point.x() > max.x || point.y() < min.y || point.y() > max.y
                {
                    return false;
                }
            }
            None => return false,
        }
        self.geometry.contains(point)
    }
}

impl Region {
    /// The KML layout this region's files use
    pub fn layout(&self) -> Layout {
        match self {
            Region::Uk => Layout::NestedFolders,
            Region::Ny | Region::Ca | Region::Nj => Layout::FlatExtendedData,
        }
    }
}
