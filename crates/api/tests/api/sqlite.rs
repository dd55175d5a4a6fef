use crate::helpers::{get_json, seeded_db, spawn_app, TOBS_STATION};
use axum::http::StatusCode;
use climate_api::{AnchorDate, ClimateAccess, ClimateData, Error, ResultProjector};
use climate_core::{build_station_filter, date_range, trailing_year, Predicate};
use serde_json::json;
use std::sync::Arc;
use time::macros::date;

const ANCHOR: AnchorDate = AnchorDate::Fixed(date!(2017 - 08 - 23));

#[tokio::test]
async fn precipitation_scenario_includes_rows_after_the_anchor() {
    let climate_db = seeded_db(
        &["S1"],
        &[
            ("S1", "2016-08-22", Some(1.5), Some(75.0)),
            ("S1", "2017-08-20", Some(0.1), Some(80.0)),
            ("S1", "2017-08-24", Some(0.0), Some(81.0)),
        ],
    )
    .await;

    let test_app = spawn_app(Arc::new(climate_db), ANCHOR);
    let (status, body) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"precipitation": {"2017-08-20": 0.1, "2017-08-24": 0.0}})
    );
}

#[tokio::test]
async fn computed_anchor_uses_latest_date_in_table() {
    let climate_db = seeded_db(
        &["S1"],
        &[
            ("S1", "2016-08-22", Some(1.5), None),
            ("S1", "2016-08-23", Some(0.7), None),
            ("S1", "2017-08-23", None, None),
        ],
    )
    .await;
    assert_eq!(
        climate_db.latest_date().await.unwrap(),
        Some(date!(2017 - 08 - 23))
    );

    let test_app = spawn_app(Arc::new(climate_db), AnchorDate::LatestInTable);
    let (_, body) = get_json(&test_app.app, "/api/v1.0/precipitation").await;

    assert_eq!(
        body,
        json!({"precipitation": {"2016-08-23": 0.7, "2017-08-23": null}})
    );
}

#[tokio::test]
async fn same_date_from_two_stations_keeps_the_later_row() {
    let climate_db = seeded_db(
        &["S1", "S2"],
        &[
            ("S1", "2017-01-01", Some(0.5), None),
            ("S2", "2017-01-01", Some(0.2), None),
        ],
    )
    .await;
    let projector = ResultProjector::new(Arc::new(climate_db), ANCHOR);

    let predicate = trailing_year(date!(2017 - 08 - 23)).and(date_range("2017-01-01", None).unwrap());
    let first = projector.project_precipitation(&predicate).await.unwrap();
    let second = projector.project_precipitation(&predicate).await.unwrap();

    assert_eq!(first.get("2017-01-01"), Some(&Some(0.2)));
    assert_eq!(first, second);
}

#[tokio::test]
async fn temp_stats_over_january() {
    let climate_db = seeded_db(
        &["S1", "S2"],
        &[
            ("S1", "2016-12-31", None, Some(50.0)),
            ("S1", "2017-01-01", None, Some(60.0)),
            ("S2", "2017-01-15", None, Some(70.0)),
            ("S1", "2017-01-20", None, None),
            ("S1", "2017-01-31", None, Some(80.0)),
            ("S2", "2017-02-01", None, Some(100.0)),
        ],
    )
    .await;

    let test_app = spawn_app(Arc::new(climate_db), ANCHOR);
    let (status, body) = get_json(&test_app.app, "/api/v1.0/temp/2017-01-01/2017-01-31").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"temps": [60.0, 70.0, 80.0]}));
}

#[tokio::test]
async fn temp_stats_are_ordered_for_any_valid_range() {
    let temps = [64.0, 71.0, 59.0, 83.0, 77.0, 68.0, 70.0];
    let dates = [
        "2017-03-01",
        "2017-03-02",
        "2017-03-03",
        "2017-03-04",
        "2017-03-05",
        "2017-03-06",
        "2017-03-07",
    ];
    let rows: Vec<_> = dates
        .iter()
        .zip(temps)
        .map(|(date, tobs)| ("S1", *date, None::<f64>, Some(tobs)))
        .collect();
    let climate_db = seeded_db(&["S1"], &rows).await;

    for (i, start) in dates.iter().enumerate() {
        for end in &dates[i..] {
            let predicate = date_range(start, Some(*end)).unwrap();
            let stats = climate_db.temperature_stats(&predicate).await.unwrap();
            let (min, avg, max) = (stats.min.unwrap(), stats.avg.unwrap(), stats.max.unwrap());
            assert!(min <= avg && avg <= max, "{start}..{end}: {min} {avg} {max}");
        }
    }
}

#[tokio::test]
async fn temp_stats_without_matches_are_null() {
    let climate_db = seeded_db(&["S1"], &[("S1", "2017-01-01", None, Some(60.0))]).await;
    let test_app = spawn_app(Arc::new(climate_db), ANCHOR);

    let (status, body) = get_json(&test_app.app, "/api/v1.0/temp/2018-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"temps": [null, null, null]}));
}

#[tokio::test]
async fn reversed_range_matches_nothing_every_time() {
    let climate_db = seeded_db(
        &["S1"],
        &[
            ("S1", "2017-01-01", None, Some(60.0)),
            ("S1", "2017-01-15", None, Some(65.0)),
            ("S1", "2017-02-01", None, Some(70.0)),
        ],
    )
    .await;
    let test_app = spawn_app(Arc::new(climate_db), ANCHOR);

    for _ in 0..2 {
        let (status, body) =
            get_json(&test_app.app, "/api/v1.0/temp/2017-02-01/2017-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"temps": [null, null, null]}));
    }
}

#[tokio::test]
async fn stations_come_back_in_table_order() {
    let climate_db = seeded_db(&["USC00519397", "USC00513117", "USC00514830"], &[]).await;
    let test_app = spawn_app(Arc::new(climate_db), ANCHOR);

    let (status, body) = get_json(&test_app.app, "/api/v1.0/stations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"stations": ["USC00519397", "USC00513117", "USC00514830"]})
    );
}

#[tokio::test]
async fn station_list_honours_date_and_station_conditions() {
    let climate_db = seeded_db(
        &["S1", "S2", "S3"],
        &[
            ("S1", "2017-01-05", None, None),
            ("S2", "2016-12-01", None, None),
            ("S2", "2017-03-01", None, None),
            ("S3", "2017-01-20", None, None),
        ],
    )
    .await;
    let projector = ResultProjector::new(Arc::new(climate_db), ANCHOR);

    let january = date_range("2017-01-01", Some("2017-01-31")).unwrap();
    assert_eq!(
        projector.project_station_list(&january).await.unwrap(),
        vec!["S1", "S3"]
    );

    let only_s3 = build_station_filter(Some("S3")).and(january);
    assert_eq!(
        projector.project_station_list(&only_s3).await.unwrap(),
        vec!["S3"]
    );

    assert_eq!(
        projector.project_station_list(&Predicate::all()).await.unwrap(),
        vec!["S1", "S2", "S3"]
    );
}

#[tokio::test]
async fn tobs_reports_only_the_configured_station() {
    let climate_db = seeded_db(
        &[TOBS_STATION, "USC00513117"],
        &[
            (TOBS_STATION, "2016-08-22", None, Some(60.0)),
            (TOBS_STATION, "2016-08-23", None, Some(77.0)),
            ("USC00513117", "2017-01-01", None, Some(99.0)),
            (TOBS_STATION, "2017-01-01", None, Some(77.0)),
            (TOBS_STATION, "2017-05-01", None, None),
            (TOBS_STATION, "2017-08-18", None, Some(79.0)),
        ],
    )
    .await;
    let test_app = spawn_app(Arc::new(climate_db), ANCHOR);

    let (status, body) = get_json(&test_app.app, "/api/v1.0/tobs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"temps": [77.0, 77.0, null, 79.0]}));
}

#[tokio::test]
async fn empty_measurement_table_has_no_anchor() {
    let climate_db = seeded_db(&["S1"], &[]).await;
    assert_eq!(climate_db.latest_date().await.unwrap(), None);

    let test_app = spawn_app(Arc::new(climate_db), AnchorDate::LatestInTable);
    let (_, body) = get_json(&test_app.app, "/api/v1.0/tobs").await;
    assert_eq!(body, json!({"temps": []}));
}

#[tokio::test]
async fn undecodable_stored_date_is_reported() {
    let climate_db = seeded_db(&["S1"], &[("S1", "08/23/2017", None, None)]).await;

    assert!(matches!(
        climate_db.latest_date().await,
        Err(Error::StoredDate(raw)) if raw == "08/23/2017"
    ));
}

#[tokio::test]
async fn health_check_runs_against_the_pool() {
    let climate_db = seeded_db(&[], &[]).await;
    assert!(climate_db.health_check().await.is_ok());

    climate_db.pool().close().await;
    assert!(climate_db.health_check().await.is_err());
}

#[tokio::test]
async fn missing_database_file_fails_to_open() {
    let result = ClimateAccess::new("/nonexistent/dir/hawaii.sqlite").await;
    assert!(matches!(result, Err(Error::DataSourceUnavailable(_))));
}
