//! Client side of the persistence boundary.

use std::sync::Arc;

use crate::error::GatewayError;
use crate::store::SnapshotStore;
use crate::table::Snapshot;

/// Synchronous save/load against the snapshot store.
///
/// Each call is a single request: no retry, no queuing, no cancellation.
pub trait Gateway {
    fn put(&self, snapshot: &Snapshot) -> Result<(), GatewayError>;

    /// `Ok(None)` is the not-found signal.
    fn get(&self) -> Result<Option<Snapshot>, GatewayError>;
}

/// Gateway that talks to a store living in the same process.
#[derive(Clone)]
pub struct StoreGateway {
    store: Arc<dyn SnapshotStore>,
}

impl StoreGateway {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        StoreGateway { store }
    }
}

impl Gateway for StoreGateway {
    fn put(&self, snapshot: &Snapshot) -> Result<(), GatewayError> {
        let payload =
            serde_json::to_value(snapshot).map_err(|e| GatewayError::Encode(e.to_string()))?;
        self.store.save(payload);
        Ok(())
    }

    fn get(&self) -> Result<Option<Snapshot>, GatewayError> {
        Ok(self.store.load().map(|payload| Snapshot::from_payload(&payload)))
    }
}
