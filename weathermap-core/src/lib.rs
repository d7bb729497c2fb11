//! Data sources and presentation rules for weathermap
//!
//! This crate holds the leaf components of the map widget, none of which know
//! anything about the terminal:
//!
//! - **Geocoding**: free-text place name -> coordinates ([`geocode`])
//! - **Forecast**: coordinates -> current conditions ([`forecast`])
//! - **Presenter**: raw snapshot -> display-ready fields ([`presenter`])
//!
//! Both clients are traits so the controller can be driven by fakes in tests.
//!
//! # Example
//!
//! ```ignore
//! use weathermap_core::{GeocodingClient, NominatimClient, ServiceEndpoints};
//!
//! let endpoints = ServiceEndpoints::default();
//! let geocoder = NominatimClient::new(&endpoints)?;
//! let place = geocoder.resolve("Paris").await?;
//! println!("{} at {}", place.display_name, place.point);
//! ```

pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod presenter;
pub mod types;

pub use config::ServiceEndpoints;
pub use error::{ErrorKind, LookupError, Service};
pub use forecast::{OpenMeteoClient, WeatherClient};
pub use geocode::{GeocodingClient, NominatimClient};
pub use presenter::{describe, ConditionInfo, IconKey, WeatherReport};
pub use types::{GeoPoint, GeocodeResult, WeatherSnapshot};
