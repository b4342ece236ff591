use std::sync::Arc;
use std::time::Duration;

use pagekit_cache::spawn_listener;
use pagekit_core::{
    HttpTransport, PageAttributeExpression, PageResolver, PagekitConfig, ResolveError,
    TemplateCache, TemplateFetcher, TemplateLoaded, TemplatePayload, TransportFaultPolicy,
};
use reqwest::Url;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver_for(server: &MockServer, cache: Arc<TemplateCache>) -> PageResolver {
    let base = Url::parse(&format!("{}/", server.uri())).unwrap();
    let fetcher = TemplateFetcher::with_transport(cache, HttpTransport::new().unwrap())
        .with_base_url(base);
    PageResolver::new(PageAttributeExpression::new(), fetcher)
}

async fn mount(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn resolves_network_page_and_wraps_it() {
    let server = MockServer::start().await;
    mount(&server, "/page.html", 200, "<div>Hi</div>").await;

    let resolver = resolver_for(&server, Arc::new(TemplateCache::new()));
    let html = resolver.resolve("page.html").await.unwrap();

    assert_eq!(html, "<ons-page _muted><div>Hi</div></ons-page>");
}

#[tokio::test]
async fn not_found_falls_back_to_cached_page() {
    let server = MockServer::start().await;
    mount(&server, "/a.html", 404, "missing").await;

    let cache = Arc::new(TemplateCache::new());
    cache.set("b.html", "<ons-page>X</ons-page>");

    let resolver = resolver_for(&server, cache);
    let html = resolver.resolve("a.html,b.html").await.unwrap();

    assert_eq!(html, "<ons-page>X</ons-page>");
}

#[tokio::test]
async fn requests_candidates_in_order_and_stops_at_first_success() {
    let server = MockServer::start().await;
    mount(&server, "/a.html", 404, "eA").await;
    mount(&server, "/b.html", 502, "eB").await;
    mount(&server, "/c.html", 200, "  <p>C</p>\n").await;

    let resolver = resolver_for(&server, Arc::new(TemplateCache::new()));
    let html = resolver.resolve("a.html, b.html, c.html").await.unwrap();
    assert_eq!(html, "<ons-page _muted><p>C</p></ons-page>");

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(requested, vec!["/a.html", "/b.html", "/c.html"]);
}

#[tokio::test]
async fn exhaustion_rejects_with_last_body() {
    let server = MockServer::start().await;
    mount(&server, "/a.html", 404, "eA").await;
    mount(&server, "/b.html", 500, "eB").await;

    let resolver = resolver_for(&server, Arc::new(TemplateCache::new()));
    let err = resolver.resolve("a.html, b.html").await.unwrap_err();

    let last = err.last_failure().expect("fetch failure");
    assert_eq!(last.identifier(), "b.html");
    assert_eq!(last.body(), Some("eB"));
    assert!(matches!(err, ResolveError::Exhausted { attempts: 2, .. }));
}

#[tokio::test]
async fn cached_page_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("remote"))
        .expect(0)
        .mount(&server)
        .await;

    let cache = Arc::new(TemplateCache::new());
    cache.set("page.html", "local");

    let resolver = resolver_for(&server, cache);
    assert_eq!(
        resolver.resolve("page.html").await.unwrap(),
        "<ons-page _muted>local</ons-page>"
    );
    server.verify().await;
}

#[tokio::test]
async fn registered_template_is_resolved_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let cache = Arc::new(TemplateCache::new());
    let (tx, rx) = mpsc::unbounded_channel();
    let listener = spawn_listener(Arc::clone(&cache), rx);

    tx.send(TemplateLoaded::new(
        "dialog.html",
        TemplatePayload::Structured(vec![json!(0), json!("<div>dialog</div>")]),
    ))
    .unwrap();
    drop(tx);
    listener.await.unwrap();

    let resolver = resolver_for(&server, cache);
    assert_eq!(
        resolver.resolve("dialog.html").await.unwrap(),
        "<ons-page _muted><div>dialog</div></ons-page>"
    );
    server.verify().await;
}

#[tokio::test]
async fn unreachable_host_respects_transport_fault_policy() {
    let server = MockServer::start().await;
    mount(&server, "/ok.html", 200, "ok").await;

    let unreachable = "http://127.0.0.1:9/page.html";
    let reference = format!("{unreachable}, ok.html");
    let transport = || {
        HttpTransport::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap()
    };
    let base = Url::parse(&format!("{}/", server.uri())).unwrap();

    let fallback = PageResolver::new(
        PageAttributeExpression::new(),
        TemplateFetcher::with_transport(Arc::new(TemplateCache::new()), transport())
            .with_base_url(base.clone()),
    );
    assert_eq!(
        fallback.resolve(&reference).await.unwrap(),
        "<ons-page _muted>ok</ons-page>"
    );

    let abort = PageResolver::new(
        PageAttributeExpression::new(),
        TemplateFetcher::with_transport(Arc::new(TemplateCache::new()), transport())
            .with_base_url(base),
    )
    .with_transport_faults(TransportFaultPolicy::Abort);
    let err = abort.resolve(&reference).await.unwrap_err();
    assert!(matches!(err, ResolveError::TransportFault(_)));
    assert_eq!(
        err.to_string(),
        format!("Transport fault: The page is not found: {unreachable}")
    );
}

#[tokio::test]
async fn resolver_from_config_uses_base_url_and_variables() {
    let server = MockServer::start().await;
    mount(&server, "/app/home-android.html", 200, "<div>android</div>").await;

    let config = PagekitConfig::from_json(&format!(
        r#"{{
            "base_url": "{}/app/",
            "variables": {{ "platform": "android" }}
        }}"#,
        server.uri()
    ))
    .unwrap();

    let resolver = PageResolver::from_config(&config, Arc::new(TemplateCache::new())).unwrap();
    let html = resolver
        .resolve("home-${platform}.html, home.html")
        .await
        .unwrap();

    assert_eq!(html, "<ons-page _muted><div>android</div></ons-page>");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn template_registered_during_fetch_serves_later_candidate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a.html"))
        .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("remote"))
        .expect(0)
        .mount(&server)
        .await;

    let cache = Arc::new(TemplateCache::new());
    let (tx, rx) = mpsc::unbounded_channel();
    let listener = spawn_listener(Arc::clone(&cache), rx);
    let resolver = resolver_for(&server, Arc::clone(&cache));

    let (html, _) = tokio::join!(resolver.resolve("a.html, b.html"), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(TemplateLoaded::new("b.html", "<div>B</div>")).unwrap();
    });
    drop(tx);
    listener.await.unwrap();

    assert_eq!(html.unwrap(), "<ons-page _muted><div>B</div></ons-page>");
    server.verify().await;
}
