//! Update notification

use teleinfo_core::Snapshot;

/// Receives the published snapshot once per closed frame
///
/// Called from the sensor task; implementations should return quickly.
pub trait UpdateListener: Send + Sync + 'static {
    fn on_update(&self, snapshot: &Snapshot);
}

impl<F> UpdateListener for F
where
    F: Fn(&Snapshot) + Send + Sync + 'static,
{
    fn on_update(&self, snapshot: &Snapshot) {
        self(snapshot)
    }
}
