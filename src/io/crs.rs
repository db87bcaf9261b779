//! Coordinate reference systems and reprojection to WGS84.
//!
//! Web maps want longitude/latitude. Study layers usually arrive in a UTM
//! zone (EPSG:326zz / 327zz) or in Web Mercator, so those inverse
//! projections are implemented here on the WGS84 ellipsoid.

use crate::core::Layer;
use crate::error::{GridplanError, Result};
use geojson::Value;
use serde_json::{Map, Value as JsonValue};

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const UTM_K0: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crs {
    /// Geographic lon/lat (EPSG:4326, OGC CRS84)
    #[default]
    Wgs84,
    /// Spherical Web Mercator (EPSG:3857)
    WebMercator,
    /// Universal Transverse Mercator on WGS84
    Utm { zone: u8, north: bool },
}

impl Crs {
    pub fn from_epsg(code: u32) -> Result<Self> {
        match code {
            4326 => Ok(Self::Wgs84),
            3857 | 900_913 => Ok(Self::WebMercator),
            32601..=32660 => Ok(Self::Utm {
                zone: (code - 32600) as u8,
                north: true,
            }),
            32701..=32760 => Ok(Self::Utm {
                zone: (code - 32700) as u8,
                north: false,
            }),
            other => Err(GridplanError::unsupported_crs(format!("EPSG:{}", other))),
        }
    }

    /// Parse `EPSG:32636`, `epsg:4326`, `urn:ogc:def:crs:EPSG::32636`,
    /// `urn:ogc:def:crs:OGC:1.3:CRS84`, `CRS84` or a bare EPSG number.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.to_ascii_uppercase().ends_with("CRS84") {
            return Ok(Self::Wgs84);
        }
        let code = trimmed
            .rsplit(':')
            .next()
            .and_then(|tail| tail.parse::<u32>().ok())
            .filter(|_| trimmed.parse::<u32>().is_ok() || trimmed.to_ascii_uppercase().contains("EPSG"))
            .ok_or_else(|| GridplanError::unsupported_crs(trimmed))?;
        Self::from_epsg(code)
    }

    /// Read the legacy GeoJSON `crs` member, if present.
    ///
    /// `{"crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::32636"}}}`
    pub fn from_foreign_members(members: Option<&Map<String, JsonValue>>) -> Option<Result<Self>> {
        let name = members?
            .get("crs")?
            .get("properties")?
            .get("name")?
            .as_str()?;
        Some(Self::parse(name))
    }

    pub fn epsg_code(&self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
            Self::WebMercator => 3857,
            Self::Utm { zone, north: true } => 32600 + u32::from(*zone),
            Self::Utm { zone, north: false } => 32700 + u32::from(*zone),
        }
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, Self::Wgs84)
    }

    /// Transform one projected coordinate to `(lon, lat)` in degrees.
    pub fn to_wgs84(&self, x: f64, y: f64) -> (f64, f64) {
        match *self {
            Self::Wgs84 => (x, y),
            Self::WebMercator => web_mercator_inverse(x, y),
            Self::Utm { zone, north } => utm_inverse(x, y, zone, north),
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg_code())
    }
}

fn web_mercator_inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / WGS84_A).to_degrees();
    let lat = (2.0 * (y / WGS84_A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}

/// Inverse transverse Mercator (Snyder, USGS PP 1395, eqs. 8-12 to 8-25).
fn utm_inverse(easting: f64, northing: f64, zone: u8, north: bool) -> (f64, f64) {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let ep2 = e2 / (1.0 - e2);
    let x = easting - UTM_FALSE_EASTING;
    let y = if north {
        northing
    } else {
        northing - UTM_FALSE_NORTHING_SOUTH
    };
    let lon0 = (f64::from(zone) * 6.0 - 183.0).to_radians();

    let m = y / UTM_K0;
    let mu = m / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2.powi(3) / 256.0));
    let sqrt_1me2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt_1me2) / (1.0 + sqrt_1me2);

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let tan_phi1 = phi1.tan();
    let c1 = ep2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let denom = 1.0 - e2 * sin_phi1 * sin_phi1;
    let n1 = WGS84_A / denom.sqrt();
    let r1 = WGS84_A * (1.0 - e2) / denom.powf(1.5);
    let d = x / (n1 * UTM_K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);
    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    (lon.to_degrees(), lat.to_degrees())
}

fn transform_position(position: &mut [f64], crs: Crs) {
    if position.len() >= 2 {
        let (lon, lat) = crs.to_wgs84(position[0], position[1]);
        position[0] = lon;
        position[1] = lat;
    }
}

fn transform_value(value: &mut Value, crs: Crs) {
    match value {
        Value::Point(p) => transform_position(p, crs),
        Value::MultiPoint(points) | Value::LineString(points) => points
            .iter_mut()
            .for_each(|p| transform_position(p, crs)),
        Value::MultiLineString(rings) | Value::Polygon(rings) => rings
            .iter_mut()
            .flatten()
            .for_each(|p| transform_position(p, crs)),
        Value::MultiPolygon(polygons) => polygons
            .iter_mut()
            .flatten()
            .flatten()
            .for_each(|p| transform_position(p, crs)),
        Value::GeometryCollection(geometries) => geometries.iter_mut().for_each(|g| {
            g.bbox = None;
            transform_value(&mut g.value, crs);
        }),
    }
}

/// Reproject every geometry of `layer` to WGS84. Geographic layers pass
/// through untouched.
pub fn reproject(mut layer: Layer) -> Layer {
    let crs = layer.crs;
    if crs.is_geographic() {
        return layer;
    }
    tracing::debug!(layer = %layer.name, from = %crs, "reprojecting to EPSG:4326");
    for geometry in layer.features.iter_mut().filter_map(|f| f.geometry.as_mut()) {
        geometry.bbox = None;
        transform_value(&mut geometry.value, crs);
    }
    layer.crs = Crs::Wgs84;
    layer
}
