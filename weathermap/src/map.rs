//! Map adapter: marker, viewport animation and projection
//!
//! [`MapAdapter`] is the seam between the controller and whatever draws the
//! map. [`CanvasMap`] is the terminal implementation: an equirectangular
//! projection over a ratatui canvas, with cells treated as twice as tall as
//! they are wide.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use thiserror::Error;
use weathermap_core::GeoPoint;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no viewport yet (container area not set)")]
    ViewportUndefined,
}

/// Position relative to the map container's top-left cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Visible extent: center plus zoom level
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: f64,
}

/// Options for [`MapAdapter::fly_to`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlyToOptions {
    /// Target zoom level
    pub zoom: f64,
    /// Animation length (zero jumps immediately)
    pub duration: Duration,
}

impl Default for FlyToOptions {
    fn default() -> Self {
        Self {
            zoom: 14.0,
            duration: Duration::from_millis(1500),
        }
    }
}

pub trait MapAdapter {
    /// Replace any existing marker with one at `point`
    fn set_marker(&mut self, point: GeoPoint);

    fn marker(&self) -> Option<GeoPoint>;

    /// Animate the viewport towards `point`
    ///
    /// Only the end state is guaranteed: once the animation completes the
    /// viewport is exactly `point` at `options.zoom`.
    fn fly_to(&mut self, point: GeoPoint, options: FlyToOptions);

    /// Zoom in (positive) or out around the current center.
    /// Returns false if the zoom level is already at its limit.
    fn zoom_by(&mut self, delta: f64) -> bool;

    /// Container-relative cell for `point`
    fn project_to_screen(&self, point: GeoPoint) -> Result<ScreenPoint, MapError>;

    /// Map point under a container-relative cell
    fn unproject(&self, column: u16, row: u16) -> Result<GeoPoint, MapError>;

    /// Area the map is drawn in, once known
    fn container(&self) -> Option<Rect>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapConfig {
    pub initial: Viewport,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Tehran, regional view
            initial: Viewport {
                center: GeoPoint::new(35.6892, 51.389),
                zoom: 6.0,
            },
            min_zoom: 2.0,
            max_zoom: 19.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Flight {
    from: Viewport,
    to: Viewport,
    started: Instant,
    duration: Duration,
}

impl Flight {
    /// Viewport at `now`, or None once the flight is over
    fn at(&self, now: Instant) -> Option<Viewport> {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= self.duration {
            return None;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        // Ease-out cubic
        let k = 1.0 - (1.0 - t).powi(3);
        let lerp = |a: f64, b: f64| a + (b - a) * k;
        Some(Viewport {
            center: GeoPoint::new(
                lerp(self.from.center.lat, self.to.center.lat),
                lerp(self.from.center.lon, self.to.center.lon),
            ),
            zoom: lerp(self.from.zoom, self.to.zoom),
        })
    }
}

/// Geographic extent of the container at the current viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Bounds {
    fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    fn lat_span(&self) -> f64 {
        self.north - self.south
    }
}

/// Terminal map state: viewport, marker, container area, running animation
#[derive(Clone, Debug)]
pub struct CanvasMap {
    viewport: Viewport,
    marker: Option<GeoPoint>,
    container: Option<Rect>,
    flight: Option<Flight>,
    config: MapConfig,
}

impl CanvasMap {
    pub fn new(config: MapConfig) -> Self {
        Self {
            viewport: Viewport {
                center: config.initial.center,
                zoom: config.initial.zoom.clamp(config.min_zoom, config.max_zoom),
            },
            marker: None,
            container: None,
            flight: None,
            config,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Set the area the map is drawn in (startup and terminal resize)
    pub fn set_container(&mut self, area: Rect) {
        self.container = Some(area);
    }

    /// Step the fly-to animation. Returns true if the viewport moved.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(flight) = self.flight else {
            return false;
        };
        match flight.at(now) {
            Some(viewport) => self.viewport = viewport,
            None => {
                self.viewport = flight.to;
                self.flight = None;
                tracing::debug!(center = %self.viewport.center, zoom = self.viewport.zoom, "Flight finished");
            }
        }
        true
    }

    /// Geographic bounds of the container, used as canvas bounds
    pub fn bounds(&self) -> Result<Bounds, MapError> {
        let area = self.container.ok_or(MapError::ViewportUndefined)?;
        if area.width == 0 || area.height == 0 {
            return Err(MapError::ViewportUndefined);
        }
        let lon_span = 360.0 / 2f64.powf(self.viewport.zoom - 1.0);
        let lat_span =
            lon_span * f64::from(area.height) * CELL_ASPECT / f64::from(area.width);
        let center = self.viewport.center;
        Ok(Bounds {
            west: center.lon - lon_span / 2.0,
            east: center.lon + lon_span / 2.0,
            south: center.lat - lat_span / 2.0,
            north: center.lat + lat_span / 2.0,
        })
    }
}

impl Default for CanvasMap {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}

impl MapAdapter for CanvasMap {
    fn set_marker(&mut self, point: GeoPoint) {
        self.marker = Some(point);
    }

    fn marker(&self) -> Option<GeoPoint> {
        self.marker
    }

    fn fly_to(&mut self, point: GeoPoint, options: FlyToOptions) {
        let to = Viewport {
            center: point,
            zoom: options.zoom.clamp(self.config.min_zoom, self.config.max_zoom),
        };
        if options.duration.is_zero() {
            self.viewport = to;
            self.flight = None;
            return;
        }
        self.flight = Some(Flight {
            from: self.viewport,
            to,
            started: Instant::now(),
            duration: options.duration,
        });
    }

    fn zoom_by(&mut self, delta: f64) -> bool {
        let zoom = (self.viewport.zoom + delta).clamp(self.config.min_zoom, self.config.max_zoom);
        self.flight = None;
        if zoom == self.viewport.zoom {
            return false;
        }
        self.viewport.zoom = zoom;
        true
    }

    fn project_to_screen(&self, point: GeoPoint) -> Result<ScreenPoint, MapError> {
        let bounds = self.bounds()?;
        let area = self.container.ok_or(MapError::ViewportUndefined)?;
        Ok(ScreenPoint {
            x: (point.lon - bounds.west) / bounds.lon_span() * f64::from(area.width),
            y: (bounds.north - point.lat) / bounds.lat_span() * f64::from(area.height),
        })
    }

    fn unproject(&self, column: u16, row: u16) -> Result<GeoPoint, MapError> {
        let bounds = self.bounds()?;
        let area = self.container.ok_or(MapError::ViewportUndefined)?;
        // Cell centers
        let fx = (f64::from(column) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row) + 0.5) / f64::from(area.height);
        let lat = (bounds.north - fy * bounds.lat_span()).clamp(-90.0, 90.0);
        let lon = wrap_longitude(bounds.west + fx * bounds.lon_span());
        Ok(GeoPoint::new(lat, lon))
    }

    fn container(&self) -> Option<Rect> {
        self.container
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
