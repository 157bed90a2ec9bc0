use crate::{error::CourierError, types::Update};
use async_trait::async_trait;

/// Parameters for one `getUpdates` round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Identifier of the first update to return (last seen id + 1).
    pub offset: u64,
    /// Maximum number of updates in the batch.
    pub limit: u32,
    /// Server-side long-poll wait in seconds.
    pub timeout_secs: u32,
    /// Update kinds to receive. Empty = server default.
    pub allowed_updates: Vec<String>,
}

/// Batched source of updates, read by the update poller.
///
/// `Bot` implements it over HTTP; tests substitute scripted sources.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Fetch the next batch, in server order.
    ///
    /// Network, envelope and decode failures are all reported as an error;
    /// a conflict is recognised through [`CourierError::is_conflict`].
    async fn fetch_updates(&self, request: &FetchRequest) -> Result<Vec<Update>, CourierError>;
}
