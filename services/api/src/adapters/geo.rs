//! services/api/src/adapters/geo.rs
//!
//! Server-side stand-in for the browser geolocation provider. Deployments
//! that know where they run can configure fixed coordinates; everything else
//! degrades to entries without location, which callers treat as normal.

use async_trait::async_trait;
use promail_core::domain::Coordinates;
use promail_core::ports::{GeolocationService, PortResult};

/// An adapter that implements `GeolocationService` from configured
/// coordinates.
#[derive(Clone)]
pub struct FixedGeoAdapter {
    coordinates: Coordinates,
}

impl FixedGeoAdapter {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl GeolocationService for FixedGeoAdapter {
    async fn locate(&self) -> PortResult<Coordinates> {
        Ok(self.coordinates)
    }
}
