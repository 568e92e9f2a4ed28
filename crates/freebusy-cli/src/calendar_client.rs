use anyhow::{Context, Result};
use async_trait::async_trait;
use google_calendar3::api::{Event, EventDateTime};
use google_calendar3::hyper_rustls::HttpsConnector;
use google_calendar3::yup_oauth2::authenticator::Authenticator;
use google_calendar3::CalendarHub;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use slot_engine::{BusyEvent, EventSource, EventStamp, TimeInterval};

use crate::config::Config;

/// Read-only calendar access is all the tool ever needs.
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar.readonly"];

/// Client for listing busy events from the Google Calendar API.
pub struct CalendarClient {
    hub: CalendarHub<HttpsConnector<HttpConnector>>,
    auth: Authenticator<HttpsConnector<HttpConnector>>,
    calendar_id: String,
}

impl CalendarClient {
    pub async fn new(config: &Config) -> Result<Self> {
        let secret =
            google_calendar3::yup_oauth2::read_application_secret(&config.credentials_path)
                .await
                .context("Failed to read OAuth credentials")?;

        let auth = google_calendar3::yup_oauth2::InstalledFlowAuthenticator::builder(
            secret,
            google_calendar3::yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
        )
        .persist_tokens_to_disk(config.token_cache_path.clone())
        .build()
        .await
        .context("Failed to build authenticator")?;

        let connector = google_calendar3::hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .context("Failed to load native TLS roots")?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(connector);
        let hub = CalendarHub::new(client, auth.clone());

        Ok(Self {
            hub,
            auth,
            calendar_id: config.calendar_id.clone(),
        })
    }

    /// Force a token for the read-only scope. First use walks the user
    /// through the installed-app consent flow; afterwards the on-disk
    /// cache refreshes silently.
    pub async fn authorize(&self) -> Result<()> {
        self.auth
            .token(SCOPES)
            .await
            .context("Failed to obtain access token")?;

        tracing::info!("access token obtained for {}", SCOPES[0]);
        Ok(())
    }
}

#[async_trait]
impl EventSource for CalendarClient {
    async fn busy_events(&self, window: &TimeInterval) -> Result<Vec<BusyEvent>> {
        let (_, events) = self
            .hub
            .events()
            .list(&self.calendar_id)
            .time_min(window.start)
            .time_max(window.end)
            .single_events(true)
            .order_by("startTime")
            .doit()
            .await
            .context("Failed to list calendar events")?;

        let items = events.items.unwrap_or_default();
        tracing::debug!(
            "calendar '{}' returned {} events for {}",
            self.calendar_id,
            items.len(),
            window.start.date_naive()
        );

        items.iter().map(event_to_busy).collect()
    }
}

/// Map a wire event onto the engine's busy shape.
///
/// Each boundary is either `dateTime` (timed) or `date` (all-day); a
/// boundary carrying neither is refused here, and mixed timed/all-day
/// pairs are left for the computer to reject.
fn event_to_busy(event: &Event) -> Result<BusyEvent> {
    let start = stamp(event.start.as_ref())
        .with_context(|| format!("event {:?} is missing a usable start", event.id))?;
    let end = stamp(event.end.as_ref())
        .with_context(|| format!("event {:?} is missing a usable end", event.id))?;
    Ok(BusyEvent { start, end })
}

fn stamp(boundary: Option<&EventDateTime>) -> Option<EventStamp> {
    let boundary = boundary?;
    if let Some(instant) = boundary.date_time {
        return Some(EventStamp::Timed(instant));
    }
    boundary.date.map(EventStamp::AllDay)
}
