use crate::Desk;
use std::{sync::Arc, time::Duration};
use study_sdk::StudyApi;

/// Parameters required to create a new desk.
/// # Default Values
/// - `poll_interval`: 4 seconds
/// - `insights_delay`: 250 milliseconds
/// - `auto_launch`: `true`
/// - `media_base_url`: [`study_sdk::studyhall::DEFAULT_BASE_URL`]
pub struct DeskParams {
    /// The API client the desk drives.
    pub api: Arc<dyn StudyApi>,
    /// How often a game generation job is polled for status.
    pub poll_interval: Duration,
    /// How long to wait after opening a document before requesting the
    /// summary and quick notes.
    pub insights_delay: Duration,
    /// Launch the generated game as soon as its job completes.
    pub auto_launch: bool,
    /// Origin that backend-relative media paths resolve against.
    pub media_base_url: String,
}

impl DeskParams {
    pub fn new(api: Arc<dyn StudyApi>) -> Self {
        Self {
            api,
            poll_interval: Duration::from_secs(4),
            insights_delay: Duration::from_millis(250),
            auto_launch: true,
            media_base_url: study_sdk::studyhall::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set the status poll interval
    #[must_use]
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the delay before the insight requests fire
    #[must_use]
    pub fn insights_delay(mut self, insights_delay: Duration) -> Self {
        self.insights_delay = insights_delay;
        self
    }

    /// Set whether a completed game launches automatically
    #[must_use]
    pub fn auto_launch(mut self, auto_launch: bool) -> Self {
        self.auto_launch = auto_launch;
        self
    }

    /// Set the origin media paths resolve against
    #[must_use]
    pub fn media_base_url(mut self, media_base_url: impl Into<String>) -> Self {
        self.media_base_url = media_base_url.into();
        self
    }

    #[must_use]
    pub fn build(self) -> Desk {
        Desk::new(self)
    }
}
