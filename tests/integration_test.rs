//! Integration Tests - Loader, Refresher and Preloader over Mock Ports
//!
//! Exercises the usecases against mockall implementations of the
//! `FeedSource` and `MediaProbe` ports. Uses tokio::test for async.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use mockall::mock;
use tokio::sync::broadcast;

use portfolio_feed::adapters::metrics::FeedMetrics;
use portfolio_feed::domain::{
    DEFAULT_SECTION, DeliveryOptions, FeedError, FeedResult, Layout, MediaType, PortfolioData,
    parse_feed,
};
use portfolio_feed::ports::{FeedMetricsSink, FeedSource, MediaDimensions, MediaProbe};
use portfolio_feed::usecases::{FeedRefresher, MediaPreloader, PortfolioFeedLoader};

// ---- Mock Definitions ----

mock! {
    pub Source {}

    #[async_trait::async_trait]
    impl FeedSource for Source {
        async fn fetch_csv(&self) -> FeedResult<String>;
        fn origin(&self) -> String;
    }
}

mock! {
    pub Probe {}

    #[async_trait::async_trait]
    impl MediaProbe for Probe {
        async fn probe(&self, url: &str) -> anyhow::Result<MediaDimensions>;
    }
}

const FEED: &str = "\
Section,Title,Media_URL,History,Priority,Layout
Visuales,Reel,https://youtu.be/abc123,,10,Featured
Retratos,Tarde,https://images.unsplash.com/photo-1?w=4000,,2,
Retratos,Estudio,https://img.example.com/estudio.jpg,,9,Destacado
Retratos,Ventana,https://img.example.com/ventana.jpg,,2,
,Suelto,https://cdn.example.com/v123/sample.mp4,,x,
Equipo,Ana,https://img.example.com/ana.jpg,Directora - Diez años de rodaje,1,
";

fn source_returning(result: FeedResult<String>) -> MockSource {
    let mut source = MockSource::new();
    source
        .expect_origin()
        .return_const("mock://feed".to_string());
    source
        .expect_fetch_csv()
        .returning(move || result.clone());
    source
}

fn loader_for(source: MockSource) -> PortfolioFeedLoader<MockSource> {
    PortfolioFeedLoader::new(Arc::new(source), DeliveryOptions::default())
}

fn titles(data: &PortfolioData, section: &str) -> Vec<String> {
    data.section(section).iter().map(|i| i.title.clone()).collect()
}

// ---- Loader ----

#[tokio::test]
async fn test_loader_maps_feed_from_source() {
    let loader = loader_for(source_returning(Ok(FEED.to_string())));

    let data = loader.load().await.unwrap();

    assert_eq!(data.total_items(), 6);
    assert_eq!(
        data.section_names().collect::<Vec<_>>(),
        vec!["Visuales", "Retratos", DEFAULT_SECTION, "Equipo"]
    );
    // Priority descending, equal priorities in row order.
    assert_eq!(titles(&data, "Retratos"), vec!["Estudio", "Tarde", "Ventana"]);

    let reel = &data.section("Visuales")[0];
    assert_eq!(reel.media_type, MediaType::YoutubeEmbed);
    assert_eq!(reel.layout, Layout::Featured);
    assert!(reel.media_url.contains("abc123"));

    let loose = &data.section(DEFAULT_SECTION)[0];
    assert_eq!(loose.priority, 0);
    assert_eq!(loose.media_type, MediaType::Video);

    let ana = &data.section("Equipo")[0];
    assert_eq!(ana.as_member_bio().role, "Directora");
}

#[tokio::test]
async fn test_loader_matches_pure_parse() {
    let loader = loader_for(source_returning(Ok(FEED.to_string())));
    let loaded = loader.load().await.unwrap();
    let parsed = parse_feed(FEED, &DeliveryOptions::default()).unwrap();
    assert_eq!(loaded, parsed);
}

#[tokio::test]
async fn test_loader_propagates_network_error() {
    let metrics = Arc::new(FeedMetrics::new().unwrap());
    let loader = loader_for(source_returning(Err(FeedError::status("mock://feed", 503))))
        .with_metrics(Arc::clone(&metrics));

    let err = loader.load().await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(err.http_status(), Some(503));
    assert_eq!(
        metrics.fetches.with_label_values(&["network_error"]).get(),
        1
    );
}

#[tokio::test]
async fn test_loader_surfaces_parse_error() {
    let metrics = Arc::new(FeedMetrics::new().unwrap());
    let loader = loader_for(source_returning(Ok(
        "Section,Title\nUrban,a\nUrban,b,extra\n".to_string(),
    )))
    .with_metrics(Arc::clone(&metrics));

    let err = loader.load().await.unwrap_err();

    assert!(err.is_parse());
    assert_eq!(metrics.fetches.with_label_values(&["parse_error"]).get(), 1);
    assert_eq!(metrics.fetches.with_label_values(&["success"]).get(), 0);
}

#[tokio::test]
async fn test_loader_snapshot_records_origin() {
    let loader = loader_for(source_returning(Ok(FEED.to_string())));
    let snapshot = loader.load_snapshot().await.unwrap();
    assert_eq!(snapshot.source, "mock://feed");
    assert_eq!(snapshot.data.total_items(), 6);
}

/// Sink that remembers every outcome it is told about.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl FeedMetricsSink for RecordingSink {
    fn record_success(&self, data: &PortfolioData, _elapsed_secs: f64) {
        self.events.lock().unwrap().push(format!("success:{}", data.total_items()));
    }

    fn record_failure(&self, error: &FeedError, _elapsed_secs: f64) {
        let kind = if error.is_parse() { "parse" } else { "network" };
        self.events.lock().unwrap().push(format!("failure:{kind}"));
    }

    fn record_preload(&self, decoded: usize, failed: usize) {
        self.events.lock().unwrap().push(format!("preload:{decoded}/{failed}"));
    }
}

#[tokio::test]
async fn test_usecases_report_to_any_metrics_sink() {
    let sink = Arc::new(RecordingSink::default());

    let loader = loader_for(source_returning(Ok(FEED.to_string()))).with_metrics(Arc::clone(&sink));
    let data = loader.load().await.unwrap();

    let failing = loader_for(source_returning(Err(FeedError::network("mock://feed", "reset"))))
        .with_metrics(Arc::clone(&sink));
    assert!(failing.load().await.is_err());

    MediaPreloader::new(Arc::new(probe_failing_on("ventana")), 2)
        .with_metrics(Arc::clone(&sink))
        .preload(&data)
        .await;

    assert_eq!(
        *sink.events.lock().unwrap(),
        vec!["success:6", "failure:network", "preload:3/1"]
    );
}

// ---- Refresher ----

#[tokio::test]
async fn test_refresher_keeps_previous_snapshot_on_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_mock = Arc::clone(&calls);

    let mut source = MockSource::new();
    source
        .expect_origin()
        .return_const("mock://feed".to_string());
    source.expect_fetch_csv().returning(move || {
        if calls_in_mock.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(FEED.to_string())
        } else {
            Err(FeedError::network("mock://feed", "connection reset"))
        }
    });

    let (refresher, rx) = FeedRefresher::new(Arc::new(loader_for(source)), Duration::ZERO);
    assert!(rx.borrow().is_none());

    let first = refresher.refresh_once().await.unwrap();
    assert!(refresher.refresh_once().await.is_err());

    let current = rx.borrow().clone().expect("snapshot kept");
    assert!(Arc::ptr_eq(&current, &first));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_refresher_failure_before_first_load_publishes_nothing() {
    let loader = loader_for(source_returning(Err(FeedError::network(
        "mock://feed",
        "dns failure",
    ))));
    let (refresher, rx) = FeedRefresher::new(Arc::new(loader), Duration::ZERO);

    assert!(refresher.refresh_once().await.is_err());
    assert!(rx.borrow().is_none());
    assert!(refresher.current().is_none());
}

#[tokio::test]
async fn test_refresher_zero_interval_loads_once() {
    let mut source = MockSource::new();
    source
        .expect_origin()
        .return_const("mock://feed".to_string());
    source
        .expect_fetch_csv()
        .times(1)
        .returning(|| Ok(FEED.to_string()));

    let (refresher, rx) = FeedRefresher::new(Arc::new(loader_for(source)), Duration::ZERO);
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

    tokio::time::timeout(Duration::from_secs(5), refresher.run(shutdown_rx))
        .await
        .expect("single load returns");

    assert!(rx.borrow().is_some());
}

#[tokio::test]
async fn test_refresher_stops_on_shutdown() {
    let loader = loader_for(source_returning(Ok(FEED.to_string())));
    let (refresher, mut rx) = FeedRefresher::new(Arc::new(loader), Duration::from_secs(3600));
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let handle = tokio::spawn(async move { refresher.run(shutdown_rx).await });

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("first snapshot published")
        .unwrap();
    assert!(rx.borrow().is_some());

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("refresher stops")
        .unwrap();
}

// ---- Preloader ----

fn probe_failing_on(marker: &'static str) -> MockProbe {
    let mut probe = MockProbe::new();
    probe.expect_probe().returning(move |url| {
        if url.contains(marker) {
            Err(anyhow::anyhow!("decode failed for {url}"))
        } else {
            Ok(MediaDimensions {
                width: 1200,
                height: 800,
            })
        }
    });
    probe
}

#[tokio::test]
async fn test_preloader_tolerates_failures() {
    let data = parse_feed(
        "Section,Title,Media_URL\n\
         Urban,a,https://img.example.com/ok.jpg\n\
         Urban,b,https://img.example.com/broken.jpg\n\
         Urban,c,https://img.example.com/ok.jpg\n\
         Urban,d,https://cdn.example.com/clip.mp4\n\
         Urban,e,\n",
        &DeliveryOptions::default(),
    )
    .unwrap();

    let metrics = Arc::new(FeedMetrics::new().unwrap());
    let preloader = MediaPreloader::new(Arc::new(probe_failing_on("broken")), 2)
        .with_metrics(Arc::clone(&metrics));

    let report = preloader.preload(&data).await;

    assert_eq!(report.attempted, 2);
    assert_eq!(report.decoded, 1);
    assert_eq!(report.failed, 1);
    assert!(!report.all_decoded());
    assert_eq!(
        metrics.preload_images.with_label_values(&["failed"]).get(),
        1
    );
}

#[tokio::test]
async fn test_preloader_probes_every_image() {
    let data = parse_feed(FEED, &DeliveryOptions::default()).unwrap();
    let mut probe = MockProbe::new();
    // Unsplash, estudio, ventana, ana; the YouTube and mp4 rows are skipped.
    probe.expect_probe().times(4).returning(|_| {
        Ok(MediaDimensions {
            width: 10,
            height: 10,
        })
    });

    let report = MediaPreloader::new(Arc::new(probe), 1).preload(&data).await;

    assert_eq!(report.attempted, 4);
    assert!(report.all_decoded());
}

#[tokio::test]
async fn test_preloader_follows_published_snapshots() {
    let loader = loader_for(source_returning(Ok(FEED.to_string())));
    let (refresher, rx) = FeedRefresher::new(Arc::new(loader), Duration::ZERO);

    let probed = Arc::new(AtomicUsize::new(0));
    let probed_in_mock = Arc::clone(&probed);
    let mut probe = MockProbe::new();
    probe.expect_probe().returning(move |_| {
        probed_in_mock.fetch_add(1, Ordering::SeqCst);
        Ok(MediaDimensions {
            width: 1,
            height: 1,
        })
    });

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let preloader = MediaPreloader::new(Arc::new(probe), 4);
    let handle = tokio::spawn(async move { preloader.run(rx, shutdown_rx).await });

    refresher.refresh_once().await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        while probed.load(Ordering::SeqCst) < 4 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("snapshot preloaded");

    shutdown_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("preloader stops")
        .unwrap();
}
