//! Ranking endpoints driven through the full router.

mod support;

use axum::http::{Method, StatusCode};
use dishrank_test_utils::assertions::assert_rank_order;
use dishrank_test_utils::fixtures::{
    catalogue_with_ranking, clock_at, kst, outage, ranking_list, seeded_catalogue,
};
use dishrank_test_utils::{RankingConfig, RankingResponse};
use support::{get, send, test_app, test_app_with, TestResult};

#[tokio::test]
async fn today_returns_recipes_in_rank_order() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-10", &["30", "10", "20"])?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 12));

    let response = get(&app, "/api/v1/rankings/today").await?;
    assert_eq!(response.status, StatusCode::OK);

    let body: RankingResponse = serde_json::from_slice(&response.body)?;
    assert_eq!(body.date_kst.to_string(), "2024-05-10");
    assert_eq!(body.total_count, 3);
    assert_rank_order(&body, &["30", "10", "20"]);
    Ok(())
}

#[tokio::test]
async fn today_limit_slices_but_keeps_total_count() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-10", &["1", "2", "3", "4"])?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 12));

    let response = get(&app, "/api/v1/rankings/today?limit=2").await?;
    assert_eq!(response.status, StatusCode::OK);
    let body: RankingResponse = serde_json::from_slice(&response.body)?;
    assert_rank_order(&body, &["1", "2"]);
    assert_eq!(body.total_count, 4);
    Ok(())
}

#[tokio::test]
async fn second_read_is_served_without_catalogue_io() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-10", &["1", "2"])?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 12));

    let first = get(&app, "/api/v1/rankings/today").await?;
    let io_after_first = app.catalogue.calls().ranking_io();
    let second = get(&app, "/api/v1/rankings/today?limit=1").await?;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(app.catalogue.calls().ranking_io(), io_after_first);
    assert_eq!(app.state.ranking_cache.stats().hits, 1);
    Ok(())
}

#[tokio::test]
async fn before_cutover_serves_previous_day() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-09", &["1"])?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 6));

    let response = get(&app, "/api/v1/rankings/today").await?;
    assert_eq!(response.status, StatusCode::OK);
    let body: RankingResponse = serde_json::from_slice(&response.body)?;
    assert_eq!(body.date_kst.to_string(), "2024-05-09");
    Ok(())
}

#[tokio::test]
async fn day_rollover_reloads_after_cutover() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-09", &["1"])?;
    catalogue.insert_recipe(dishrank_test_utils::fixtures::recipe_detail("2", "next"))?;
    catalogue.insert_ranking_list(ranking_list("2024-05-10", &["2"]))?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 6));

    let before: RankingResponse =
        serde_json::from_slice(&get(&app, "/api/v1/rankings/today").await?.body)?;
    assert_eq!(before.date_kst.to_string(), "2024-05-09");

    app.clock.set(kst(2024, 5, 10, 7));
    let after: RankingResponse =
        serde_json::from_slice(&get(&app, "/api/v1/rankings/today").await?.body)?;
    assert_eq!(after.date_kst.to_string(), "2024-05-10");
    assert_rank_order(&after, &["2"]);
    Ok(())
}

#[tokio::test]
async fn limit_out_of_range_is_rejected() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-10", &["1"])?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 12));

    for uri in [
        "/api/v1/rankings/today?limit=0",
        "/api/v1/rankings/today?limit=101",
        "/api/v1/rankings/2024-05-10?limit=-1",
    ] {
        let response = get(&app, uri).await?;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(response.error_code().as_deref(), Some("INVALID_RANGE"), "{uri}");
    }

    let response = get(&app, "/api/v1/rankings/today?limit=ten").await?;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code().as_deref(), Some("INVALID_INPUT"));
    Ok(())
}

#[tokio::test]
async fn today_without_ranking_is_not_found() -> TestResult {
    let catalogue = seeded_catalogue(&["1"])?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 12));

    let response = get(&app, "/api/v1/rankings/today").await?;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code().as_deref(), Some("RANKING_NOT_FOUND"));
    let message = response.json()?["message"].as_str().map(str::to_string);
    assert_eq!(message.as_deref(), Some("No ranking data found for 2024-05-10"));

    // Nothing was cached, so publishing the list makes the next read succeed.
    app.catalogue.insert_ranking_list(ranking_list("2024-05-10", &["1"]))?;
    let response = get(&app, "/api/v1/rankings/today").await?;
    assert_eq!(response.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn catalogue_outage_is_unavailable_not_missing() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-10", &["1"])?;
    catalogue.set_failure(Some(outage()))?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 12));

    let today = get(&app, "/api/v1/rankings/today").await?;
    assert_eq!(today.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(today.error_code().as_deref(), Some("SERVICE_UNAVAILABLE"));

    let by_date = get(&app, "/api/v1/rankings/2024-05-10").await?;
    assert_eq!(by_date.status, StatusCode::SERVICE_UNAVAILABLE);

    app.catalogue.set_failure(None)?;
    let recovered = get(&app, "/api/v1/rankings/today").await?;
    assert_eq!(recovered.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn malformed_date_is_bad_request() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-10", &["1"])?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 12));

    for date in ["2024-5-10", "20240510", "2024-13-01", "today-ish", "2024-02-30"] {
        let response = get(&app, &format!("/api/v1/rankings/{date}")).await?;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{date}");
        let body = response.json()?;
        assert_eq!(body["code"], "INVALID_FORMAT");
        assert_eq!(body["message"], "Invalid date format. Use YYYY-MM-DD");
    }
    Ok(())
}

#[tokio::test]
async fn by_date_is_fresh_and_byte_identical() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-08", &["b", "a"])?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 12));

    let first = get(&app, "/api/v1/rankings/2024-05-08").await?;
    let second = get(&app, "/api/v1/rankings/2024-05-08").await?;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);

    // Each read goes to the catalogue; the today slot stays empty.
    assert_eq!(app.catalogue.calls().ranking_lookups, 2);
    assert!(app.state.ranking_cache.snapshot()?.is_none());

    let missing = get(&app, "/api/v1/rankings/2024-05-01").await?;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn pinned_snapshot_is_served_until_invalidated() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-09", &["old"])?;
    catalogue.insert_recipe(dishrank_test_utils::fixtures::recipe_detail("new", "new"))?;
    catalogue.insert_ranking_list(ranking_list("2024-05-10", &["new"]))?;
    let app = test_app_with(
        catalogue,
        clock_at(2024, 5, 10, 6),
        RankingConfig::default().with_freshness(dishrank_core::SnapshotFreshness::Pinned),
        dishrank_api::ApiConfig {
            cache_admin_enabled: true,
            ..Default::default()
        },
    );

    get(&app, "/api/v1/rankings/today").await?;
    app.clock.set(kst(2024, 5, 11, 12));
    let stale: RankingResponse =
        serde_json::from_slice(&get(&app, "/api/v1/rankings/today").await?.body)?;
    assert_eq!(stale.date_kst.to_string(), "2024-05-09");

    let status = get(&app, "/api/v1/rankings/cache").await?.json()?;
    assert_eq!(status["cached_day_key"], "2024-05-09");
    assert_eq!(status["current_day_key"], "2024-05-11");
    assert_eq!(status["freshness"], "pinned");

    let invalidated = send(&app, Method::DELETE, "/api/v1/rankings/cache").await?;
    assert_eq!(invalidated.status, StatusCode::OK);
    assert_eq!(invalidated.json()?["invalidated"], "2024-05-09");

    app.clock.set(kst(2024, 5, 10, 12));
    let fresh: RankingResponse =
        serde_json::from_slice(&get(&app, "/api/v1/rankings/today").await?.body)?;
    assert_eq!(fresh.date_kst.to_string(), "2024-05-10");
    Ok(())
}

#[tokio::test]
async fn invalidate_is_disabled_by_default() -> TestResult {
    let catalogue = catalogue_with_ranking("2024-05-10", &["1"])?;
    let app = test_app(catalogue, clock_at(2024, 5, 10, 12));
    get(&app, "/api/v1/rankings/today").await?;

    let response = send(&app, Method::DELETE, "/api/v1/rankings/cache").await?;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code().as_deref(), Some("ROUTE_NOT_FOUND"));

    let status = get(&app, "/api/v1/rankings/cache").await?.json()?;
    assert_eq!(status["cached_day_key"], "2024-05-10");
    Ok(())
}
