//! Effects - side effects declared by the reducer
//!
//! The reducer stays pure: it describes the work and the controller performs
//! it (spawning requests, driving the map, arming timers).

use weathermap_core::GeoPoint;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Resolve a (trimmed, non-empty) place name
    Geocode { query: String },
    /// Fetch current conditions; overlapping fetches are allowed
    FetchWeather { point: GeoPoint },
    /// Replace the map marker
    PlaceMarker { point: GeoPoint },
    /// Animate the viewport to a point at the configured search zoom
    FlyTo { point: GeoPoint },
    /// Change the zoom level around the current center
    ZoomMap { delta: i8 },
    /// Project the popup's point and place the popup on screen
    PositionPopup { point: GeoPoint },
    /// (Re)arm the error notification auto-hide timer
    ExpireError,
}

/// Result of dispatching an action: whether state changed plus effects to run
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult<E> {
    pub changed: bool,
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    #[inline]
    pub fn changed_with_many(effects: Vec<E>) -> Self {
        Self {
            changed: true,
            effects,
        }
    }

    /// Add an effect to this result.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}
