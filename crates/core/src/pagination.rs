use crate::domain::neo::{Direction, NeoFeed};
use crate::domain::record::Record;
use crate::ingest::SpaceDataClient;
use anyhow::Context;
use chrono::NaiveDate;
use std::fmt;
use tokio::sync::Mutex;

/// Browsing state for one NEO page instance.
#[derive(Debug, Clone)]
pub struct NeoPaginator {
    feed: NeoFeed,
    selected: Option<NaiveDate>,
    // Bumped on every navigation start; only the latest ticket may apply.
    generation: u64,
}

/// Handed out when a navigation starts and required to apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTicket {
    generation: u64,
    direction: Direction,
    url: String,
}

impl NavigationTicket {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// The feed carries no link in the requested direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingLink {
    pub direction: Direction,
}

impl fmt::Display for MissingLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feed has no {} link", self.direction)
    }
}

impl std::error::Error for MissingLink {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Applied,
    /// A newer navigation was started while this one was in flight.
    Superseded,
}

impl NeoPaginator {
    pub fn new(feed: NeoFeed) -> Self {
        let selected = feed.earliest_date();
        Self {
            feed,
            selected,
            generation: 0,
        }
    }

    pub fn feed(&self) -> &NeoFeed {
        &self.feed
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.feed.dates()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn current_bucket(&self) -> &[Record] {
        self.selected
            .and_then(|d| self.feed.bucket(d))
            .unwrap_or(&[])
    }

    pub fn has_link(&self, direction: Direction) -> bool {
        self.feed.link(direction).is_some()
    }

    pub fn select(&mut self, date: NaiveDate) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.feed.bucket(date).is_some(),
            "date {date} is not in the current feed window"
        );
        self.selected = Some(date);
        Ok(())
    }

    /// Starts a navigation and invalidates any navigation still in flight.
    pub fn begin(&mut self, direction: Direction) -> Result<NavigationTicket, MissingLink> {
        let url = self
            .feed
            .link(direction)
            .ok_or(MissingLink { direction })?
            .to_string();

        self.generation += 1;
        Ok(NavigationTicket {
            generation: self.generation,
            direction,
            url,
        })
    }

    /// Replaces the feed wholesale if `ticket` is still the latest one.
    pub fn complete(&mut self, ticket: &NavigationTicket, feed: NeoFeed) -> NavigationOutcome {
        if ticket.generation != self.generation {
            return NavigationOutcome::Superseded;
        }
        self.selected = feed.earliest_date();
        self.feed = feed;
        NavigationOutcome::Applied
    }
}

/// Follows the feed's `direction` link and applies the response.
///
/// The lock is released while the request is in flight, so date selection
/// and newer navigations are not blocked by it.
pub async fn navigate(
    paginator: &Mutex<NeoPaginator>,
    client: &dyn SpaceDataClient,
    direction: Direction,
) -> anyhow::Result<NavigationOutcome> {
    let ticket = paginator.lock().await.begin(direction)?;

    let feed = client
        .fetch_neo_link(ticket.url())
        .await
        .with_context(|| format!("failed to load {direction} feed page"))?;

    let outcome = paginator.lock().await.complete(&ticket, feed);
    if outcome == NavigationOutcome::Superseded {
        tracing::info!(%direction, "discarding superseded feed page");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::apod::ApodRecord;
    use crate::domain::neo::fixtures::feed;
    use crate::time::window::DateWindow;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Notify;

    const NEXT: &str = "http://api.nasa.gov/neo/rest/v1/feed?start_date=2024-01-08&end_date=2024-01-15&api_key=K";
    const PREV: &str = "http://api.nasa.gov/neo/rest/v1/feed?start_date=2023-12-25&end_date=2024-01-01&api_key=K";

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[derive(Default)]
    struct FakeClient {
        pages: HashMap<String, NeoFeed>,
        gates: HashMap<String, Arc<Notify>>,
    }

    impl FakeClient {
        fn page(mut self, url: &str, feed: NeoFeed) -> Self {
            self.pages.insert(url.to_string(), feed);
            self
        }

        fn gated(mut self, url: &str) -> (Self, Arc<Notify>) {
            let gate = Arc::new(Notify::new());
            self.gates.insert(url.to_string(), gate.clone());
            (self, gate)
        }
    }

    #[async_trait::async_trait]
    impl SpaceDataClient for FakeClient {
        fn provider_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_apod(&self) -> anyhow::Result<ApodRecord> {
            anyhow::bail!("not used")
        }

        async fn fetch_neo_feed(&self, _window: DateWindow) -> anyhow::Result<NeoFeed> {
            anyhow::bail!("not used")
        }

        async fn fetch_neo_link(&self, url: &str) -> anyhow::Result<NeoFeed> {
            if let Some(gate) = self.gates.get(url) {
                gate.notified().await;
            }
            self.pages
                .get(url)
                .cloned()
                .with_context(|| format!("no page for {url}"))
        }
    }

    #[test]
    fn selects_earliest_date_initially() {
        let p = NeoPaginator::new(feed(&["2024-01-03", "2024-01-01", "2024-01-02"], None, None));
        assert_eq!(p.selected_date(), Some(date("2024-01-01")));
        assert_eq!(p.dates().len(), 3);
        assert_eq!(p.current_bucket().len(), 1);
    }

    #[test]
    fn selecting_a_date_switches_bucket() {
        let mut p = NeoPaginator::new(feed(&["2024-01-01", "2024-01-02"], None, None));
        let before = p.current_bucket()[0].id();
        p.select(date("2024-01-02")).unwrap();
        assert_eq!(p.selected_date(), Some(date("2024-01-02")));
        assert_ne!(p.current_bucket()[0].id(), before);
    }

    #[test]
    fn selecting_an_unknown_date_keeps_state() {
        let mut p = NeoPaginator::new(feed(&["2024-01-01"], None, None));
        assert!(p.select(date("2030-01-01")).is_err());
        assert_eq!(p.selected_date(), Some(date("2024-01-01")));
    }

    #[test]
    fn empty_feed_has_no_selection() {
        let p = NeoPaginator::new(feed(&[], None, None));
        assert_eq!(p.selected_date(), None);
        assert!(p.current_bucket().is_empty());
    }

    #[test]
    fn begin_fails_without_link() {
        let mut p = NeoPaginator::new(feed(&["2024-01-01"], Some(NEXT), None));
        assert!(p.has_link(Direction::Next));
        assert!(!p.has_link(Direction::Previous));
        let err = p.begin(Direction::Previous).unwrap_err();
        assert_eq!(err.direction, Direction::Previous);
        assert!(err.to_string().contains("previous"));
    }

    #[tokio::test]
    async fn navigate_without_link_reports_missing_link() {
        let client = FakeClient::default();
        let paginator = Mutex::new(NeoPaginator::new(feed(&["2024-01-01"], None, None)));

        let err = navigate(&paginator, &client, Direction::Next).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<MissingLink>(),
            Some(&MissingLink { direction: Direction::Next })
        );
    }

    #[test]
    fn only_latest_initiated_ticket_applies() {
        let mut p = NeoPaginator::new(feed(&["2024-01-01"], Some(NEXT), Some(PREV)));
        let next = p.begin(Direction::Next).unwrap();
        let prev = p.begin(Direction::Previous).unwrap();
        assert_eq!(next.url(), NEXT);
        assert_eq!(prev.direction(), Direction::Previous);

        assert_eq!(
            p.complete(&prev, feed(&["2023-12-25"], None, None)),
            NavigationOutcome::Applied
        );
        assert_eq!(
            p.complete(&next, feed(&["2024-01-08"], None, None)),
            NavigationOutcome::Superseded
        );
        assert_eq!(p.selected_date(), Some(date("2023-12-25")));
    }

    #[tokio::test]
    async fn next_replaces_feed_and_resets_selection() {
        let client = FakeClient::default().page(NEXT, feed(&["2024-01-08"], None, None));
        let mut initial = NeoPaginator::new(feed(&["2024-01-01", "2024-01-02"], Some(NEXT), None));
        initial.select(date("2024-01-02")).unwrap();
        let paginator = Mutex::new(initial);

        let outcome = navigate(&paginator, &client, Direction::Next).await.unwrap();
        assert_eq!(outcome, NavigationOutcome::Applied);

        let p = paginator.lock().await;
        assert_eq!(p.dates(), vec![date("2024-01-08")]);
        assert_eq!(p.selected_date(), Some(date("2024-01-08")));
    }

    #[tokio::test]
    async fn failed_fetch_leaves_state_untouched() {
        let client = FakeClient::default();
        let paginator = Mutex::new(NeoPaginator::new(feed(&["2024-01-01"], Some(NEXT), None)));

        assert!(navigate(&paginator, &client, Direction::Next).await.is_err());
        assert_eq!(
            paginator.lock().await.selected_date(),
            Some(date("2024-01-01"))
        );
    }

    #[tokio::test]
    async fn racing_navigations_keep_the_latest_initiated() {
        let client = FakeClient::default()
            .page(NEXT, feed(&["2024-01-08"], None, None))
            .page(PREV, feed(&["2023-12-25"], None, None));
        let (client, next_gate) = client.gated(NEXT);
        let (client, prev_gate) = client.gated(PREV);

        let paginator = Mutex::new(NeoPaginator::new(feed(
            &["2024-01-01"],
            Some(NEXT),
            Some(PREV),
        )));

        // "next" is initiated first but settles last.
        let (next, prev, ()) = tokio::join!(
            navigate(&paginator, &client, Direction::Next),
            navigate(&paginator, &client, Direction::Previous),
            async {
                prev_gate.notify_one();
                tokio::task::yield_now().await;
                next_gate.notify_one();
            },
        );

        assert_eq!(next.unwrap(), NavigationOutcome::Superseded);
        assert_eq!(prev.unwrap(), NavigationOutcome::Applied);
        assert_eq!(
            paginator.lock().await.selected_date(),
            Some(date("2023-12-25"))
        );
    }
}
