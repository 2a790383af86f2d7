//! Assistant reply → extraction → normalization → render pass, with the
//! geocoder served by `wiremock` and drawing captured by `GeoJsonEngine`.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tripmap_core::{DaySelection, LngLat};
use tripmap_extract::{extract, normalize};
use tripmap_geo::{BoundaryCache, BoundaryResolver, GeocoderClient, InMemoryBoundaryCache};
use tripmap_render::{GeoJsonEngine, PassOutcome, PassSummary, ReadySignal, RenderSync, Viewport};

fn reply() -> String {
    let payload = json!({
        "itinerary": [
            {"day": 1, "destinations": [
                {"name": "Hoan Kiem Lake", "lat": 21.0285, "lng": 105.8522,
                 "description": "Walk the lake at dawn.",
                 "geometry": {"type": "Polygon", "coordinates": [[
                     [105.850, 21.025], [105.855, 21.025], [105.855, 21.032], [105.850, 21.032], [105.850, 21.025]
                 ]]}},
                {"name": "Temple of Literature", "lat": "21,0277", "lng": "105,8355",
                 "geometry": {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon", "coordinates": [[
                     [105.834, 21.026], [105.837, 21.026], [105.837, 21.029], [105.834, 21.029], [105.834, 21.026]
                 ]]}}}
            ]},
            {"day": 2, "destinations": [
                {"name": "Ha Long Bay", "latitude": 20.91, "longitude": 107.18, "estimated_cost": "1.200.000 VND"}
            ]},
            {"day": 3, "destinations": [
                {"name": "Ninh Binh", "lat": 20.25, "lng": 105.97}
            ]}
        ]
    });
    format!(
        "Here is a relaxed three-day plan for northern Vietnam.\n\n```json\n{}\n```",
        serde_json::to_string_pretty(&payload).unwrap()
    )
}

async fn render_day(
    sync: &RenderSync<GeoJsonEngine, BoundaryResolver>,
    day: u32,
) -> PassSummary {
    sync.select(DaySelection::Day(day));
    match sync.sync().await.expect("render pass") {
        PassOutcome::Rendered(summary) => summary,
        PassOutcome::Superseded => panic!("pass was superseded"),
    }
}

#[tokio::test]
async fn three_day_itinerary_renders_per_day() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Ha Long Bay"))
        .and(query_param("countrycodes", "vn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let extraction = extract(&reply());
    assert_eq!(extraction.cleaned_text, "Here is a relaxed three-day plan for northern Vietnam.");
    let points = normalize(&extraction.structured_data.expect("payload"));
    assert_eq!(points.len(), 4);

    let cache = Arc::new(InMemoryBoundaryCache::new());
    let shared: Arc<dyn BoundaryCache> = cache.clone();
    let client = GeocoderClient::new(&server.uri(), 5, "tripmap-test/0.1", 5, 0, 0).unwrap();
    let resolver = BoundaryResolver::new(client, shared, "vn");
    let (signal, gate) = ReadySignal::new();
    let sync = RenderSync::new(GeoJsonEngine::new(), resolver, gate);
    sync.set_points(points);
    signal.mark_ready();

    let day1 = render_day(&sync, 1).await;
    assert_eq!(day1.markers, 2);
    assert_eq!(day1.outlines, 2);
    let bound = sync.view().combined_bound.expect("day 1 combined bound");
    assert!(bound.contains(LngLat::new(105.8522, 21.0285)));
    assert!(bound.contains(LngLat::new(105.8355, 21.0277)));
    assert!(matches!(day1.viewport, Viewport::Fit { max_zoom, .. } if (max_zoom - 14.0).abs() < f64::EPSILON));
    sync.with_engine(|e| {
        assert_eq!(e.markers().len(), 2);
        assert_eq!(e.markers()[0].popup.desc.as_deref(), Some("Walk the lake at dawn."));
    });

    let day2 = render_day(&sync, 2).await;
    assert_eq!(day2.markers, 1);
    assert_eq!(day2.fallbacks, 1);
    assert!(sync.view().combined_bound.is_none());
    assert_eq!(
        day2.viewport,
        Viewport::Center {
            at: LngLat::new(107.18, 20.91),
            zoom: 13.0
        }
    );
    sync.with_engine(|e| {
        assert_eq!(e.markers().len(), 1);
        assert_eq!(e.source_ids().collect::<Vec<_>>(), vec!["fallback-2-0-ha-long-bay"]);
        let fc = e.to_feature_collection();
        assert_eq!(fc["features"].as_array().unwrap().len(), 2);
    });

    // Going back to day 1 and day 2 is served from the cache.
    render_day(&sync, 1).await;
    render_day(&sync, 2).await;
    assert_eq!(cache.len(), 3);
    assert!(!sync.is_loading());
}
