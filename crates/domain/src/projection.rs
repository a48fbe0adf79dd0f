//! UTM projection backed by `proj4rs`, plus the per-zone [`Projector`] cache.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};

use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::zone::{resolve_band, resolve_zone, LatitudeBand, UtmZone};
use crate::DomainError;

const GEOGRAPHIC_DEFINITION: &str = "+proj=longlat +ellps=WGS84 +no_defs";

/// Offset applied to southern-hemisphere northings so they stay non-negative.
pub const SOUTHERN_FALSE_NORTHING: f64 = 10_000_000.0;

/// Geographic and northern UTM definitions for one zone. Northing is negative
/// south of the equator; [`Projector`] owns the false-northing shift.
pub struct ZoneTransform {
    zone: UtmZone,
    geographic: Proj,
    utm: Proj,
}

impl ZoneTransform {
    pub fn new(zone: UtmZone) -> Result<Self, DomainError> {
        let geographic = Proj::from_proj_string(GEOGRAPHIC_DEFINITION)
            .map_err(|e| DomainError::Projection(format!("{GEOGRAPHIC_DEFINITION}: {e:?}")))?;
        let definition = format!("+proj=utm +zone={zone} +ellps=WGS84 +units=m +no_defs");
        let utm = Proj::from_proj_string(&definition)
            .map_err(|e| DomainError::Projection(format!("{definition}: {e:?}")))?;
        Ok(Self {
            zone,
            geographic,
            utm,
        })
    }

    pub fn zone(&self) -> UtmZone {
        self.zone
    }

    /// Degrees in, metres out.
    pub fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        transform(&self.geographic, &self.utm, &mut point).ok()?;
        (point.0.is_finite() && point.1.is_finite()).then_some((point.0, point.1))
    }

    /// Metres in, degrees out.
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let mut point = (x, y, 0.0);
        transform(&self.utm, &self.geographic, &mut point).ok()?;
        let (lon, lat) = (point.0.to_degrees(), point.1.to_degrees());
        (lon.is_finite() && lat.is_finite()).then_some((lon, lat))
    }
}

impl Debug for ZoneTransform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneTransform")
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmCoordinate {
    pub zone: UtmZone,
    pub band: LatitudeBand,
    pub easting: f64,
    pub northing: f64,
}

impl UtmCoordinate {
    /// Zone number followed by band letter, e.g. `32V`.
    pub fn label(&self) -> String {
        format!("{}{}", self.zone, self.band)
    }
}

impl Display for UtmCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{} {:.3} {:.3}",
            self.zone, self.band, self.easting, self.northing
        )
    }
}

/// UTM projector that builds one transform per zone on first use and keeps it
/// for its own lifetime. Band letters only affect the false northing.
#[derive(Debug, Default)]
pub struct Projector {
    transforms: HashMap<UtmZone, ZoneTransform>,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&mut self, lon: f64, lat: f64) -> Result<UtmCoordinate, DomainError> {
        let zone = resolve_zone(lon, lat)?;
        let band = resolve_band(lat)?;
        let (easting, mut northing) = self
            .transform(zone)?
            .forward(lon, lat)
            .ok_or(DomainError::InvalidCoordinate { lon, lat })?;
        if northing < 0.0 {
            northing += SOUTHERN_FALSE_NORTHING;
        }
        Ok(UtmCoordinate {
            zone,
            band,
            easting,
            northing,
        })
    }

    pub fn unproject(&mut self, coordinate: &UtmCoordinate) -> Result<(f64, f64), DomainError> {
        let mut northing = coordinate.northing;
        if coordinate.band.is_southern() {
            northing -= SOUTHERN_FALSE_NORTHING;
        }
        self.transform(coordinate.zone)?
            .inverse(coordinate.easting, northing)
            .ok_or(DomainError::InvalidCoordinate {
                lon: coordinate.easting,
                lat: coordinate.northing,
            })
    }

    pub fn cached_zones(&self) -> usize {
        self.transforms.len()
    }

    fn transform(&mut self, zone: UtmZone) -> Result<&ZoneTransform, DomainError> {
        match self.transforms.entry(zone) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => Ok(&*entry.insert(ZoneTransform::new(zone)?)),
        }
    }
}
