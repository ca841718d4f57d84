//! Map view-state: viewport, markers and the open popup.
//!
//! Tiles and clustering belong to whatever draws the map; this only tracks
//! what should be on it.

use crate::core::api::{MapData, Place};

/// Initial center before any data arrives (New York).
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 40.7128,
    lng: -74.0060,
};
pub const DEFAULT_ZOOM: u8 = 10;
/// Zoom used when centering on an itinerary's destination.
pub const DESTINATION_ZOOM: u8 = 11;
/// Zoom used when a place badge is clicked.
pub const PLACE_ZOOM: u8 = 15;
/// Fraction of the marker span added on every side when fitting.
pub const FIT_PADDING: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned lat/lng rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Smallest bounds containing every point; `None` for no points.
    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            south_west: first,
            north_east: first,
        };
        for p in iter {
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(p.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(p.lng);
        }
        Some(bounds)
    }

    /// Grow by `ratio` of the height and width on each side.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buffer = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let lng_buffer = (self.north_east.lng - self.south_west.lng).abs() * ratio;
        Bounds {
            south_west: LatLng::new(
                self.south_west.lat - lat_buffer,
                self.south_west.lng - lng_buffer,
            ),
            north_east: LatLng::new(
                self.north_east.lat + lat_buffer,
                self.north_east.lng + lng_buffer,
            ),
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Destination,
    Place,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: LatLng,
    pub title: String,
    pub description: Option<String>,
}

impl Marker {
    fn for_place(place: &Place, position: LatLng) -> Self {
        Self {
            kind: MarkerKind::Place,
            position,
            title: place.name.clone(),
            description: place.description.clone().filter(|d| !d.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Viewport {
    Center { center: LatLng, zoom: u8 },
    Fit(Bounds),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub viewport: Viewport,
    pub markers: Vec<Marker>,
    /// Index into `markers` of the marker whose popup is open.
    pub open_popup: Option<usize>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            viewport: Viewport::Center {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
            },
            markers: Vec::new(),
            open_popup: None,
        }
    }
}

impl MapView {
    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.viewport = Viewport::Center { center, zoom };
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
        self.open_popup = None;
    }

    /// Replace all markers with those of `data`, centering on the
    /// destination and fitting the view when more than one marker is shown.
    pub fn show(&mut self, data: &MapData) {
        self.clear_markers();

        if let Some(dest) = &data.destination
            && let Some(coords) = dest.coordinates()
        {
            let position = LatLng::from(coords);
            self.markers.push(Marker {
                kind: MarkerKind::Destination,
                position,
                title: dest.name.clone(),
                description: Some("Your destination".to_string()),
            });
            self.set_view(position, DESTINATION_ZOOM);
        }

        for place in &data.places {
            if let Some(coords) = place.coordinates() {
                self.markers.push(Marker::for_place(place, coords.into()));
            }
        }

        if self.markers.len() > 1
            && let Some(bounds) = Bounds::from_points(self.markers.iter().map(|m| m.position))
        {
            self.viewport = Viewport::Fit(bounds.pad(FIT_PADDING));
        }
    }

    /// Center on `position` at place zoom and open the popup of the marker there.
    pub fn focus(&mut self, position: LatLng) {
        self.set_view(position, PLACE_ZOOM);
        if let Some(idx) = self.markers.iter().position(|m| m.position == position) {
            self.open_popup = Some(idx);
        }
    }
}
