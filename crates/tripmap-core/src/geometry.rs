//! GeoJSON geometry subset and bounding-box arithmetic.
//!
//! Positions follow GeoJSON order: `[longitude, latitude, (altitude)]`.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for the fallback circle projection.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

pub type Position = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    /// Parses a bare GeoJSON geometry object. Features and collections are
    /// not unwrapped here.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    #[must_use]
    pub fn is_polygonal(&self) -> bool {
        matches!(self, Geometry::Polygon(_) | Geometry::MultiPolygon(_))
    }

    #[must_use]
    pub fn is_linear(&self) -> bool {
        matches!(self, Geometry::LineString(_) | Geometry::MultiLineString(_))
    }

    /// Whether this geometry can be drawn as an outline (area or line).
    #[must_use]
    pub fn is_outline(&self) -> bool {
        self.is_polygonal() || self.is_linear()
    }

    fn positions(&self) -> Box<dyn Iterator<Item = &Position> + '_> {
        match self {
            Geometry::Point(p) => Box::new(std::iter::once(p)),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => Box::new(ps.iter()),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                Box::new(lines.iter().flatten())
            }
            Geometry::MultiPolygon(polys) => Box::new(polys.iter().flatten().flatten()),
        }
    }

    /// Smallest box covering every well-formed position, or `None` when the
    /// geometry has no usable coordinates.
    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        self.positions()
            .filter_map(|p| match p.as_slice() {
                [lng, lat, ..] if lng.is_finite() && lat.is_finite() => {
                    Some(LngLat::new(*lng, *lat))
                }
                _ => None,
            })
            .fold(None, |acc: Option<BBox>, pt| {
                Some(match acc {
                    None => BBox::from_point(pt),
                    Some(b) => b.extend(pt),
                })
            })
    }

    /// Closed rectangular ring covering `bbox`.
    #[must_use]
    pub fn rectangle(bbox: BBox) -> Self {
        Geometry::Polygon(vec![vec![
            vec![bbox.west, bbox.south],
            vec![bbox.east, bbox.south],
            vec![bbox.east, bbox.north],
            vec![bbox.west, bbox.north],
            vec![bbox.west, bbox.south],
        ]])
    }

    /// Approximates a circle of `radius_m` metres around `center` as a closed
    /// polygon with `steps` vertices.
    #[must_use]
    pub fn circle(center: LngLat, radius_m: f64, steps: usize) -> Self {
        let steps = steps.max(3);
        let lat_rad = center.lat.to_radians();
        let lng_rad = center.lng.to_radians();
        let angular = radius_m / EARTH_RADIUS_M;

        #[allow(clippy::cast_precision_loss)]
        let mut ring: Vec<Position> = (0..steps)
            .map(|i| {
                let bearing = std::f64::consts::TAU * (i as f64) / (steps as f64);
                let lat2 = (lat_rad.sin() * angular.cos()
                    + lat_rad.cos() * angular.sin() * bearing.cos())
                .asin();
                let lng2 = lng_rad
                    + (bearing.sin() * angular.sin() * lat_rad.cos())
                        .atan2(angular.cos() - lat_rad.sin() * lat2.sin());
                vec![lng2.to_degrees(), lat2.to_degrees()]
            })
            .collect();
        if let Some(first) = ring.first().cloned() {
            ring.push(first);
        }
        Geometry::Polygon(vec![ring])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Axis-aligned box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BBox {
    /// Builds a box from two latitude and two longitude values in any order.
    #[must_use]
    pub fn from_corners(lat_a: f64, lat_b: f64, lng_a: f64, lng_b: f64) -> Self {
        Self {
            west: lng_a.min(lng_b),
            south: lat_a.min(lat_b),
            east: lng_a.max(lng_b),
            north: lat_a.max(lat_b),
        }
    }

    #[must_use]
    pub fn from_point(p: LngLat) -> Self {
        Self {
            west: p.lng,
            south: p.lat,
            east: p.lng,
            north: p.lat,
        }
    }

    /// Box covering every point, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = LngLat>>(points: I) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => BBox::from_point(p),
                Some(b) => b.extend(p),
            })
        })
    }

    #[must_use]
    pub fn extend(self, p: LngLat) -> Self {
        Self {
            west: self.west.min(p.lng),
            south: self.south.min(p.lat),
            east: self.east.max(p.lng),
            north: self.north.max(p.lat),
        }
    }

    #[must_use]
    pub fn union(self, other: BBox) -> Self {
        Self {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width().abs() * self.height().abs()
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    #[must_use]
    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    #[must_use]
    pub fn contains(&self, p: LngLat) -> bool {
        p.lng >= self.west && p.lng <= self.east && p.lat >= self.south && p.lat <= self.north
    }

    /// Grows each side by `factor` of the box's extent on that axis. An axis
    /// with zero extent is padded by `min_pad` degrees instead. The result is
    /// clamped to valid coordinate ranges.
    #[must_use]
    pub fn expand(self, factor: f64, min_pad: f64) -> Self {
        let pad_x = if self.width() > 0.0 {
            self.width() * factor
        } else {
            min_pad
        };
        let pad_y = if self.height() > 0.0 {
            self.height() * factor
        } else {
            min_pad
        };
        Self {
            west: (self.west - pad_x).max(-180.0),
            south: (self.south - pad_y).max(-90.0),
            east: (self.east + pad_x).min(180.0),
            north: (self.north + pad_y).min(90.0),
        }
    }
}
