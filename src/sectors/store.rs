//! In-memory sector store keyed by region.

use std::collections::HashMap;
use std::path::Path;

use geo::Point;
use tracing::{debug, info};

use crate::error::{Error, Result, SectorError};
use crate::kmz::{ArchiveCodec, KmzCodec};
use crate::types::{GeoPoint, Region};

use super::{Sector, SectorLookup, parser};

/// Holds the loaded sectors of every region in memory
///
/// A full UK file is tens of megabytes uncompressed, so regions are only loaded on
/// request. Loading a region again replaces its previous sectors.
#[derive(Debug, Default)]
pub struct MemStore {
    regions: HashMap<Region, Vec<Sector>>,
}

impl MemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load UK postcode sectors from a KMZ file
    pub fn load_uk_sectors_from_kmz_file(&mut self, path: &Path) -> Result<usize> {
        self.load_sectors_from_kmz_file(Region::Uk, path)
    }

    /// Load New York zipcodes from a KMZ file
    pub fn load_ny_sectors_from_kmz_file(&mut self, path: &Path) -> Result<usize> {
        self.load_sectors_from_kmz_file(Region::Ny, path)
    }

    /// Load California zipcodes from a KMZ file
    pub fn load_ca_sectors_from_kmz_file(&mut self, path: &Path) -> Result<usize> {
        self.load_sectors_from_kmz_file(Region::Ca, path)
    }

    /// Load New Jersey zipcodes from a KMZ file
    pub fn load_nj_sectors_from_kmz_file(&mut self, path: &Path) -> Result<usize> {
        self.load_sectors_from_kmz_file(Region::Nj, path)
    }

    /// Load a region's sectors from a KMZ file, returning how many were loaded
    pub fn load_sectors_from_kmz_file(&mut self, region: Region, path: &Path) -> Result<usize> {
        debug!(%region, ?path, "loading sectors from KMZ");

        let bytes = std::fs::read(path).map_err(|e| SectorError::Archive {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let markup = KmzCodec
            .uncompress_archive_to_markup(&bytes)
            .map_err(|e| match e {
                Error::Archive(e) => Error::Sector(SectorError::Archive {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }),
                other => other,
            })?;

        self.load_sectors_from_kml_str(region, &markup)
    }

    /// Load a region's sectors from KML markup held in memory
    pub fn load_sectors_from_kml_str(&mut self, region: Region, markup: &str) -> Result<usize> {
        let sectors = parser::parse_markup(markup, region.layout())?;
        let count = sectors.len();
        self.regions.insert(region, sectors);

        info!(%region, count, "sectors loaded");
        Ok(count)
    }

    /// Name of the first sector of `region` containing `point`
    pub fn query_region(&self, region: Region, point: GeoPoint) -> Option<String> {
        let point: Point<f64> = point.into();
        self.regions
            .get(&region)?
            .iter()
            .find(|sector| sector.contains(&point))
            .map(|sector| sector.name().to_string())
    }

    /// Number of sectors loaded for `region`
    pub fn sector_count(&self, region: Region) -> usize {
        self.regions.get(&region).map_or(0, Vec::len)
    }

    /// Whether `region` has been loaded
    pub fn is_loaded(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }
}

impl SectorLookup for MemStore {
    fn query(&self, point: GeoPoint) -> Option<String> {
        Region::ALL
            .iter()
            .find_map(|region| self.query_region(*region, point))
    }
}
