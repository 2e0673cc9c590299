use super::{ApiError, RaiPlayClient};
use crate::types::{ChannelGuide, OnAir, Schedule};

impl RaiPlayClient {
    /// Retrieves the schedule of one channel for one day.
    ///
    /// # Arguments
    ///
    /// * `channel` - API slug, e.g. `rai-1` (see `utils::normalize_channel`)
    /// * `date` - day in `dd-mm-yyyy` form
    ///
    /// # Errors
    ///
    /// Network failures, non-200 answers (`ApiError::Status`, which also
    /// covers days outside the published range) and undecodable bodies.
    pub async fn fetch_schedule(&self, channel: &str, date: &str) -> Result<Schedule, ApiError> {
        let url = self.url(&format!("/palinsesto/app/{}/{}.json", channel, date));
        self.get_json(&url, None).await
    }

    /// Retrieves the channel guide with labels and slugs.
    pub async fn fetch_channels(&self) -> Result<ChannelGuide, ApiError> {
        let url = self.url("/guidatv.json");
        self.get_json(&url, None).await
    }

    /// Retrieves what every live channel is airing, authenticated with `jwt`.
    pub async fn fetch_on_air(&self, jwt: &str) -> Result<OnAir, ApiError> {
        let url = self.url("/dl/palinsesti/oraInOnda.json");
        self.get_json(&url, Some(jwt)).await
    }
}
