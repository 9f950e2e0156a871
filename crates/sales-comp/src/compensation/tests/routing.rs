use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;

fn json_request(method: Method, uri: &str, body: Value) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

#[tokio::test]
async fn classify_route_returns_tier_and_commission() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/closer/classify",
            json!({ "contract_value": 45000 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["tier"], json!("mid_low"));
    assert_eq!(payload["label"], json!("Mid-low"));
    assert_eq!(payload["commission"].to_string(), "666.67");
}

fn raw_json_request(uri: &str, body: &'static str) -> Request<axum::body::Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn classify_route_keeps_values_just_below_a_band_edge() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(raw_json_request(
            "/api/v1/closer/classify",
            r#"{ "contract_value": 29999.9999999999999 }"#,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["tier"], json!("below_floor"));
    assert_eq!(payload["commission"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn pipeline_deal_keeps_submitted_precision() {
    let (service, _) = build_service();
    let session = service.open_session().expect("session opens");
    let router = router_with_service(service);

    let response = router
        .oneshot(raw_json_request(
            &format!("/api/v1/pipelines/{}/deals", session.session_id),
            r#"{ "contract_value": 29999.9999999999999 }"#,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    let deal = &payload["deals"][0];
    assert_eq!(deal["contract_value"].to_string(), "29999.9999999999999");
    assert_eq!(deal["commission"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn oversized_amounts_are_unprocessable() {
    let (service, _) = build_service();
    let session = service.open_session().expect("session opens");
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(raw_json_request(
            &format!("/api/v1/pipelines/{}/deals", session.session_id),
            r#"{ "contract_value": 79228162514264337593543950335 }"#,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .clone()
        .oneshot(empty_request(
            Method::GET,
            &format!("/api/v1/pipelines/{}", session.session_id),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["summary"]["deal_count"], json!(0));

    let response = router
        .oneshot(raw_json_request(
            "/api/v1/head/evaluate",
            r#"{
                "credential": "board-2025",
                "closer_revenue": 140000,
                "closer_final_commission": 79228162514264337593543950335,
                "high_score_delivered": 19,
                "high_score_target": 20
            }"#,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn classify_route_rejects_negative_values() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/closer/classify",
            json!({ "contract_value": -1 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn pipeline_routes_accumulate_and_clear() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(empty_request(Method::POST, "/api/v1/pipelines"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    let session_id = payload["session_id"].as_str().expect("session id").to_string();
    let deals_uri = format!("/api/v1/pipelines/{session_id}/deals");

    for value in [30000, 80000] {
        let response = router
            .clone()
            .oneshot(json_request(
                Method::POST,
                &deals_uri,
                json!({ "contract_value": value }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = router
        .clone()
        .oneshot(empty_request(
            Method::GET,
            &format!("/api/v1/pipelines/{session_id}"),
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["summary"]["trigger_met"], json!(true));
    assert_eq!(payload["summary"]["final_commission"].as_f64(), Some(2000.0));
    assert_eq!(payload["display"]["total_revenue"], json!("R$ 110.000,00"));
    assert_eq!(payload["deals"].as_array().map(Vec::len), Some(2));

    let response = router
        .clone()
        .oneshot(empty_request(Method::DELETE, &deals_uri))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["summary"]["deal_count"], json!(0));
}

#[tokio::test]
async fn zero_value_deal_is_unprocessable() {
    let (service, _) = build_service();
    let session = service.open_session().expect("session opens");
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/pipelines/{}/deals", session.session_id),
            json!({ "contract_value": 0 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_pipeline_is_not_found() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(empty_request(Method::GET, "/api/v1/pipelines/session-unknown"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sdr_route_clamps_high_score() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/sdr/evaluate",
            json!({ "qualified": 10, "high_score": 14, "closed_deals": 1 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["high_score_adjusted"], json!(true));
    assert_eq!(payload["high_score"], json!(10));
    assert_eq!(payload["total"].as_f64(), Some(1200.0));
}

#[tokio::test]
async fn scorecard_routes_score_and_list_rubric() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/scorecard",
            json!({ "units_over_200": true, "urgency": true, "openness_to_proposal": true }),
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], json!(65));
    assert_eq!(payload["high_score"], json!(false));
    assert_eq!(payload["points_to_high_score"], json!(10));

    let response = router
        .oneshot(empty_request(Method::GET, "/api/v1/scorecard/rubric"))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn head_route_denies_wrong_credential_without_panel_content() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/head/evaluate",
            json!({
                "credential": "letmein",
                "closer_revenue": 140000,
                "closer_final_commission": 4100,
                "high_score_delivered": 19,
                "high_score_target": 20
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "access denied" }));
}

#[tokio::test]
async fn head_route_returns_matrix_evaluation() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/head/evaluate",
            json!({
                "credential": LEADERSHIP_SECRET,
                "closer_revenue": 140000,
                "closer_final_commission": 4100,
                "high_score_delivered": 19,
                "high_score_target": 20
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["strategy"], json!("multiplier_matrix"));
    assert_eq!(payload["sdr_band"], json!("near_target"));
    assert_eq!(payload["closer_band"], json!("stretch"));
    assert_eq!(payload["head_commission"].as_f64(), Some(4100.0));
}
