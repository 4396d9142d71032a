use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use folio_core::{
    fallback_records, CatalogLoader, CatalogOrigin, CatalogSource, Error, LoadOutcome,
    MetricsFetcher, MetricsSource, Page, ProjectRecord, ProjectStatus, RepoMetrics, Result,
};

fn create_test_record(id: &str) -> ProjectRecord {
    ProjectRecord {
        id: id.to_string(),
        title: format!("Project {}", id),
        description: format!("What {} does", id),
        image: format!("img/{}.png", id),
        source_url: Some(format!("https://github.com/tester/{}", id)),
        demo_url: None,
        technologies: vec!["Rust".to_string()],
        status: ProjectStatus::Completed,
    }
}

/// Catalog source returning a fixed list, or failing
struct StaticSource {
    records: Option<Vec<ProjectRecord>>,
}

impl StaticSource {
    fn ok(ids: &[&str]) -> Box<Self> {
        Box::new(Self {
            records: Some(ids.iter().map(|id| create_test_record(id)).collect()),
        })
    }

    fn unreachable() -> Box<Self> {
        Box::new(Self { records: None })
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<ProjectRecord>> {
        self.records
            .clone()
            .ok_or_else(|| Error::ApiError("connection refused".to_string()))
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

/// Metrics keyed by repo name; anything else answers like a 404.
/// Responses are delayed so later records can settle first.
struct ScriptedMetrics {
    responses: HashMap<String, (RepoMetrics, u64)>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedMetrics {
    fn new(calls: Arc<AtomicUsize>) -> Self {
        Self {
            responses: HashMap::new(),
            calls,
        }
    }

    fn respond(mut self, repo: &str, stars: u32, forks: u32, delay_ms: u64) -> Self {
        self.responses
            .insert(repo.to_string(), (RepoMetrics { stars, forks }, delay_ms));
        self
    }
}

#[async_trait]
impl MetricsSource for ScriptedMetrics {
    async fn fetch(&self, owner: &str, repo: &str) -> Result<RepoMetrics> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(repo) {
            Some((metrics, delay_ms)) => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Ok(*metrics)
            }
            None => Err(Error::ApiError(format!(
                "Repository not found: {}/{}",
                owner, repo
            ))),
        }
    }
}

fn page_with(catalog: Box<dyn CatalogSource>, metrics: ScriptedMetrics) -> Page {
    Page::new(CatalogLoader::new(catalog), MetricsFetcher::new(Box::new(metrics)))
}

#[tokio::test]
async fn test_n_records_give_n_cards_with_derived_ids() {
    let ids = ["alpha", "beta", "gamma", "delta", "epsilon"];
    let calls = Arc::new(AtomicUsize::new(0));
    let mut page = page_with(StaticSource::ok(&ids), ScriptedMetrics::new(calls));

    let outcome = page.load_and_render().await;
    assert_eq!(
        outcome,
        LoadOutcome::Rendered {
            origin: CatalogOrigin::Live,
            cards: ids.len()
        }
    );

    let cards = page.surface().cards();
    assert_eq!(cards.len(), ids.len());
    for (card, id) in cards.iter().zip(ids) {
        assert_eq!(card.stats.stars_id, format!("{}-stars", id));
        assert_eq!(card.stats.forks_id, format!("{}-forks", id));
    }
}

#[tokio::test]
async fn test_unreachable_source_renders_fallback_without_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut page = page_with(StaticSource::unreachable(), ScriptedMetrics::new(calls));

    let outcome = page.load_and_render().await;
    assert_eq!(
        outcome,
        LoadOutcome::Rendered {
            origin: CatalogOrigin::Fallback,
            cards: 3
        }
    );

    let fallback = fallback_records().unwrap();
    assert_eq!(page.catalog().unwrap().records(), fallback.as_slice());
    assert!(page.surface().error_panel().is_none());

    let rendered: Vec<&str> = page
        .surface()
        .cards()
        .iter()
        .map(|c| c.record_id.as_str())
        .collect();
    let expected: Vec<&str> = fallback.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(rendered, expected);
}

#[tokio::test]
async fn test_total_failure_shows_error_panel_and_no_cards() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader = CatalogLoader::with_fallback(StaticSource::unreachable(), StaticSource::unreachable());
    let mut page = Page::new(
        loader,
        MetricsFetcher::new(Box::new(ScriptedMetrics::new(calls.clone()))),
    );

    let outcome = page.load_and_render().await;
    assert!(!outcome.is_rendered());
    assert!(page.surface().error_panel().is_some());
    assert!(page.surface().cards().is_empty());
    assert!(!page.surface().is_loading());

    // Nothing rendered, nothing to enrich
    let report = page.fetch_metrics().await;
    assert_eq!(report.requested, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reload_replaces_previous_cards() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut page = page_with(StaticSource::ok(&["a", "b"]), ScriptedMetrics::new(calls));
    page.load_and_render().await;
    assert_eq!(page.surface().cards().len(), 2);

    // Reload rebuilds from scratch rather than appending
    let outcome = page.reload().await;
    assert!(outcome.is_rendered());
    assert_eq!(page.surface().cards().len(), 2);
}

#[tokio::test]
async fn test_second_record_404_hides_only_its_stats() {
    let calls = Arc::new(AtomicUsize::new(0));
    let metrics = ScriptedMetrics::new(calls.clone())
        .respond("one", 42, 7, 30)
        .respond("three", 5, 0, 0);
    let mut page = page_with(StaticSource::ok(&["one", "two", "three"]), metrics);

    let (outcome, report) = page.run().await;
    assert!(outcome.is_rendered());
    assert_eq!(report.requested, 3);
    assert_eq!(report.shown, 2);
    assert_eq!(report.hidden, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let surface = page.surface();
    assert_eq!(surface.element_text("one-stars").as_deref(), Some("42"));
    assert_eq!(surface.element_text("one-forks").as_deref(), Some("7"));
    assert_eq!(surface.element_text("three-stars").as_deref(), Some("5"));
    assert_eq!(surface.element_text("three-forks").as_deref(), Some("0"));

    assert_eq!(surface.is_element_hidden("two-stats"), Some(true));
    assert_eq!(surface.is_element_hidden("one-stats"), Some(false));
    assert_eq!(surface.is_element_hidden("three-stats"), Some(false));

    let two = surface.card("two").unwrap();
    assert_eq!(two.title, "Project two");
    assert_eq!(two.description, "What two does");
    assert!(surface.error_panel().is_none());
}

#[tokio::test]
async fn test_metrics_are_requested_once_per_card() {
    let calls = Arc::new(AtomicUsize::new(0));
    let metrics = ScriptedMetrics::new(calls.clone())
        .respond("a", 1, 1, 0)
        .respond("b", 2, 2, 0);
    let mut page = page_with(StaticSource::ok(&["a", "b"]), metrics);

    page.load_and_render().await;
    page.fetch_metrics().await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // A second pass over the same render issues no requests
    let again = page.fetch_metrics().await;
    assert_eq!(again.requested, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(page.surface().element_text("b-stars").as_deref(), Some("2"));
}
