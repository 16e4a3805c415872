// Integration tests for the OpenMensa client against a local stub server


use mensa::api::{ApiSettings, DaysQuery, OpenMensaApi};
use mensa::error::MensaError;
use mensa::format::{self, DisplayOptions};
use std::collections::HashMap;
use std::time::Duration;
use test_helpers::{StubResponse, StubServer};

const CANTEEN_32: &str =
    r#"{"id":32,"name":"Mensa Test\n","city":"Berlin","address":"Teststr. 1","coordinates":null}"#;

fn client(server: &StubServer, concurrency: usize) -> OpenMensaApi {
    OpenMensaApi::new(ApiSettings {
        base_url: server.base_url.clone(),
        timeout: Some(Duration::from_secs(5)),
        concurrency,
    })
    .unwrap()
}

fn canteen_json(id: u32) -> String {
    format!(
        r#"{{"id":{id},"name":"Mensa {id}","city":"City {id}","address":"Street {id}"}}"#
    )
}

fn listing_page(ids: &[u32], total: u32) -> StubResponse {
    let items: Vec<String> = ids.iter().map(|id| canteen_json(*id)).collect();
    StubResponse::json(format!("[{}]", items.join(","))).header("X-Total-Pages", &total.to_string())
}

/// Three pages of two canteens each, answering out of order
fn paginated_routes() -> HashMap<String, StubResponse> {
    let mut routes = HashMap::new();
    routes.insert(
        "/api/v2/canteens?page=1".to_string(),
        listing_page(&[1, 2], 3).delayed(Duration::from_millis(80)),
    );
    routes.insert("/api/v2/canteens?page=2".to_string(), listing_page(&[3, 4], 3));
    routes.insert(
        "/api/v2/canteens?page=3".to_string(),
        listing_page(&[5, 6], 3).delayed(Duration::from_millis(20)),
    );
    routes
}

#[tokio::test]
async fn test_today_meals_end_to_end() {
    let mut routes = HashMap::new();
    routes.insert("/api/v2/canteens/32".to_string(), StubResponse::json(CANTEEN_32));
    routes.insert(
        "/api/v2/canteens/32/days?limit=1".to_string(),
        StubResponse::json(r#"[{"date":"2020-01-15","closed":false}]"#),
    );
    routes.insert(
        "/api/v2/canteens/32/days/2020-01-15/meals".to_string(),
        StubResponse::json(
            r#"[{"id":1,"name":"Soup","category":"Main","notes":["vegan"],
                "prices":{"students":1.5,"employees":2.5,"pupils":null,"others":3.0}}]"#,
        ),
    );
    let server = StubServer::start(routes).await;
    let api = client(&server, 5);

    let canteen = api.canteen(32).await.unwrap();
    assert_eq!(canteen.name, "Mensa Test");
    assert_eq!(canteen.address, "Teststr. 1");

    let day = api.meals_today(32).await.unwrap();
    assert_eq!(day.day.date.to_string(), "2020-01-15");
    assert_eq!(day.meals.len(), 1);

    let options = DisplayOptions {
        show_price: true,
        ..DisplayOptions::default()
    };
    let text = format::day_meals_to_string(&canteen.name, &day, &options);
    assert!(text.starts_with("Mensa Test meals for date: 2020-01-15:\n"));
    assert!(text.contains("Soup"));
    assert!(text.contains("students: 1.50€"));
    assert!(text.contains("employees: 2.50€"));
    assert!(!text.contains("pupils"));
}

#[tokio::test]
async fn test_tomorrow_requests_second_page() {
    let mut routes = HashMap::new();
    routes.insert(
        "/api/v2/canteens/32/days?page=2&limit=1".to_string(),
        StubResponse::json(r#"[{"date":"2020-01-16","closed":true}]"#),
    );
    let server = StubServer::start(routes).await;
    let api = client(&server, 5);

    let day = api.tomorrow(32).await.unwrap();
    assert_eq!(day.date.to_string(), "2020-01-16");
    assert!(day.closed);
    assert_eq!(server.requests(), vec!["/api/v2/canteens/32/days?page=2&limit=1"]);
}

#[tokio::test]
async fn test_date_status_sends_start() {
    let mut routes = HashMap::new();
    routes.insert(
        "/api/v2/canteens/32/days?limit=1&start=2020-02-13".to_string(),
        StubResponse::json(r#"[{"date":"2020-02-13","closed":false}]"#),
    );
    let server = StubServer::start(routes).await;
    let api = client(&server, 5);

    let day = api.date_status(32, "2020-02-13").await.unwrap();
    assert_eq!(day.date.to_string(), "2020-02-13");
    assert!(!day.closed);
}

#[tokio::test]
async fn test_invalid_start_date_falls_back_to_current() {
    let mut routes = HashMap::new();
    routes.insert(
        "/api/v2/canteens/32/days?limit=1".to_string(),
        StubResponse::json(r#"[{"date":"2020-01-15","closed":false}]"#),
    );
    let server = StubServer::start(routes).await;
    let api = client(&server, 5);

    let query = DaysQuery {
        start: Some("15.01.2020".to_string()),
        page: 0,
        limit: 1,
    };
    let days = api.days(32, &query).await.unwrap();
    assert_eq!(days.len(), 1);
    assert!(server.was_requested("/api/v2/canteens/32/days?limit=1"));
}

#[tokio::test]
async fn test_empty_day_listing_is_not_found() {
    let mut routes = HashMap::new();
    routes.insert(
        "/api/v2/canteens/32/days?limit=1".to_string(),
        StubResponse::json("[]"),
    );
    routes.insert(
        "/api/v2/canteens/32/days?limit=7".to_string(),
        StubResponse::json("[]"),
    );
    let server = StubServer::start(routes).await;
    let api = client(&server, 5);

    assert!(api.today(32).await.unwrap_err().is_not_found());
    assert!(api.meals_week(32).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_unknown_canteen_is_not_found() {
    let server = StubServer::start(HashMap::new()).await;
    let api = client(&server, 5);

    let err = api.canteen(6666).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
    assert!(server.was_requested("/api/v2/canteens/6666"));
}

#[tokio::test]
async fn test_empty_canteen_body_is_not_found() {
    let mut routes = HashMap::new();
    routes.insert("/api/v2/canteens/7".to_string(), StubResponse::json("{}"));
    routes.insert("/api/v2/canteens/8".to_string(), StubResponse::json("null"));
    let server = StubServer::start(routes).await;
    let api = client(&server, 5);

    assert!(api.canteen(7).await.unwrap_err().is_not_found());
    assert!(api.canteen(8).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_server_error_is_http_error() {
    let mut routes = HashMap::new();
    routes.insert("/api/v2/canteens/32".to_string(), StubResponse::status(500));
    let server = StubServer::start(routes).await;
    let api = client(&server, 5);

    match api.canteen(32).await {
        Err(MensaError::Http { status, .. }) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected HTTP error, got {:?}", other.map(|c| c.id)),
    }
}

#[tokio::test]
async fn test_malformed_meals_are_decode_errors() {
    let mut routes = HashMap::new();
    routes.insert(
        "/api/v2/canteens/32/days/2020-01-15/meals".to_string(),
        StubResponse::json("this is not json"),
    );
    let server = StubServer::start(routes).await;
    let api = client(&server, 5);

    let date = mensa::models::parse_date("2020-01-15").unwrap();
    assert!(api.meals(32, date).await.unwrap_err().is_decode());
}

#[tokio::test]
async fn test_week_keeps_days_without_meal_data() {
    let mut routes = HashMap::new();
    routes.insert(
        "/api/v2/canteens/32/days?limit=7".to_string(),
        StubResponse::json(
            r#"[{"date":"2020-01-15","closed":false},{"date":"2020-01-16","closed":false}]"#,
        ),
    );
    routes.insert(
        "/api/v2/canteens/32/days/2020-01-15/meals".to_string(),
        StubResponse::json(r#"[{"id":7,"name":"Pasta","category":"Main","notes":[],"prices":null}]"#),
    );
    let server = StubServer::start(routes).await;
    let api = client(&server, 5);

    let week = api.meals_week(32).await.unwrap();
    assert_eq!(week.len(), 2);
    assert_eq!(week[0].meals[0].name, "Pasta");
    assert_eq!(week[0].meals[0].prices.students, 0.0);
    assert!(week[1].meals.is_empty());

    let text = format::week_meals_to_string("Mensa Test", &week, &DisplayOptions::default());
    assert!(text.starts_with("Mensa Test meals for dates: 2020-01-15 - 2020-01-16\n"));
    assert!(text.contains("No meals listed."));
}

#[tokio::test]
async fn test_fetch_all_canteens_keeps_page_order() {
    let server = StubServer::start(paginated_routes()).await;
    let api = client(&server, 5);

    let canteens = api.fetch_all_canteens().await.unwrap();
    let ids: Vec<u32> = canteens.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

    for page in 1..=3 {
        assert!(server.was_requested(&format!("/api/v2/canteens?page={}", page)));
    }
    assert!(!server.was_requested("/api/v2/canteens?page=4"));
}

#[tokio::test]
async fn test_fetch_all_canteens_sequential() {
    let server = StubServer::start(paginated_routes()).await;
    let api = client(&server, 1);

    let canteens = api.fetch_all_canteens().await.unwrap();
    assert_eq!(canteens.len(), 6);
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn test_fetch_all_canteens_aborts_on_failed_page() {
    let mut routes = paginated_routes();
    routes.insert("/api/v2/canteens?page=2".to_string(), StubResponse::status(500));
    let server = StubServer::start(routes).await;
    let api = client(&server, 5);

    assert!(api.fetch_all_canteens().await.is_err());
}

#[tokio::test]
async fn test_fetch_all_canteens_requires_page_count() {
    let mut routes = HashMap::new();
    routes.insert(
        "/api/v2/canteens?page=1".to_string(),
        StubResponse::json(format!("[{}]", canteen_json(1))),
    );
    let server = StubServer::start(routes).await;
    let api = client(&server, 1);

    assert!(matches!(
        api.fetch_all_canteens().await,
        Err(MensaError::MissingHeader(_))
    ));
}
