/// Integration tests for the Norktown router
///
/// The full router is driven in-process with `tower::ServiceExt::oneshot`
/// against an in-memory SQLite database (one pooled connection, since each
/// `sqlite::memory:` connection sees its own database).
///
/// The first account registered gets person id 1 and with it the admin
/// role, so the admin flows below register their admin first.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use norktown_api::app::{build_router, AppState};
use norktown_api::config::{Config, DatabaseConfig, ServerConfig, SessionConfig};
use norktown_shared::db::pool::{create_pool, DatabaseConfig as PoolConfig};
use norktown_shared::db::schema::init_schema;
use norktown_shared::models::person::{CreatePerson, Person};
use norktown_shared::models::vehicle::Vehicle;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        session: SessionConfig { ttl_hours: 1 },
    }
}

async fn test_state() -> AppState {
    let pool = create_pool(PoolConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        ..Default::default()
    })
    .await
    .expect("pool should be created");

    init_schema(&pool).await.expect("schema should initialize");

    AppState::new(pool, test_config())
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Extracts the `name=value` pair from a Set-Cookie header, for replay in
/// a Cookie header
fn cookie_pair(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    Some(set_cookie.split(';').next()?.trim().to_string())
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Registers an account and logs it in, returning the session cookie pair
async fn register_and_login(app: &Router, email: &str, password: &str) -> String {
    let body = format!("email={}&name=Test&password={}", email, password);
    let response = send(app, post_form("/register", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let body = format!("email={}&password={}", email, password);
    let response = send(app, post_form("/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    cookie_pair(&response).expect("login should set a session cookie")
}

#[tokio::test]
async fn test_public_routes_return_200() {
    let state = test_state().await;

    Person::create(
        &state.db,
        CreatePerson {
            email: "first@test.com".to_string(),
            name: "First".to_string(),
            password_hash: "$argon2id$stub".to_string(),
        },
    )
    .await
    .unwrap();

    let app = build_router(state);

    for uri in ["/", "/person/1", "/register", "/login", "/health"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {} should be 200", uri);
    }
}

#[tokio::test]
async fn test_admin_routes_forbidden_when_logged_out() {
    let app = build_router(test_state().await);

    for uri in ["/edit/1", "/deletevehicle/1/1"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(
            response.status(),
            StatusCode::FORBIDDEN,
            "GET {} should be 403",
            uri
        );
    }
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_non_admin() {
    let app = build_router(test_state().await);

    // First account takes id 1 (admin); the second is an ordinary person
    register_and_login(&app, "admin%40test.com", "password123").await;
    let cookie = register_and_login(&app, "person%40test.com", "password123").await;

    let response = send(&app, get("/edit/1", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_show_person_missing_is_404() {
    let app = build_router(test_state().await);

    let response = send(&app, get("/person/42", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_creates_person() {
    let state = test_state().await;
    let app = build_router(state.clone());

    let response = send(
        &app,
        post_form(
            "/register",
            "email=jo%40test.com&name=Jo&password=password123",
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let person = Person::find_by_email(&state.db, "jo@test.com")
        .await
        .unwrap()
        .expect("person should exist");
    assert_eq!(person.name, "Jo");
    assert!(person.password_hash.starts_with("$argon2id$"));
    assert_ne!(person.password_hash, "password123");
}

#[tokio::test]
async fn test_register_duplicate_email_redirects_to_login_without_new_row() {
    let state = test_state().await;
    let app = build_router(state.clone());

    let form = "email=jo%40test.com&name=Jo&password=password123";
    send(&app, post_form("/register", form, None)).await;
    assert_eq!(Person::count(&state.db).await.unwrap(), 1);

    let response = send(&app, post_form("/register", form, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert_eq!(Person::count(&state.db).await.unwrap(), 1);

    // The flash message shows on the next login page render, then is gone
    let cookie = cookie_pair(&response).expect("flash should ride on a session cookie");

    let response = send(&app, get("/login", Some(&cookie))).await;
    let html = body_text(response).await;
    assert!(html.contains("log in instead"));

    let response = send(&app, get("/login", Some(&cookie))).await;
    let html = body_text(response).await;
    assert!(!html.contains("log in instead"));
}

#[tokio::test]
async fn test_register_rejects_invalid_form() {
    let state = test_state().await;
    let app = build_router(state.clone());

    let response = send(
        &app,
        post_form("/register", "email=not-an-email&name=Jo&password=password123", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/register");
    assert_eq!(Person::count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_login_wrong_password_does_not_grant_access() {
    let app = build_router(test_state().await);

    register_and_login(&app, "admin%40test.com", "password123").await;

    let response = send(
        &app,
        post_form("/login", "email=admin%40test.com&password=wrong-password", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    // The cookie from the failed attempt only carries the flash message
    if let Some(cookie) = cookie_pair(&response) {
        let response = send(&app, get("/edit/1", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_login_unknown_email_flashes() {
    let app = build_router(test_state().await);

    let response = send(
        &app,
        post_form("/login", "email=ghost%40test.com&password=password123", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let cookie = cookie_pair(&response).unwrap();
    let response = send(&app, get("/login", Some(&cookie))).await;
    let html = body_text(response).await;
    assert!(html.contains("That email does not exist"));
}

#[tokio::test]
async fn test_login_grants_admin_and_logout_revokes_it() {
    let app = build_router(test_state().await);

    let cookie = register_and_login(&app, "admin%40test.com", "password123").await;

    let response = send(&app, get("/edit/1", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // The server-side session is gone; the old cookie no longer works
    let response = send(&app, get("/edit/1", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_vehicle_cap_is_enforced() {
    let state = test_state().await;
    let app = build_router(state.clone());

    let cookie = register_and_login(&app, "admin%40test.com", "password123").await;

    for _ in 0..3 {
        let response = send(
            &app,
            post_form("/edit/1", "name=SEDAN&color=BLUE&sale=false", Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/edit/1");
    }
    assert_eq!(Vehicle::count_by_person(&state.db, 1).await.unwrap(), 3);

    // Fourth vehicle is refused
    let response = send(
        &app,
        post_form("/edit/1", "name=HATCH&color=YELLOW&sale=true", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(Vehicle::count_by_person(&state.db, 1).await.unwrap(), 3);

    let response = send(&app, get("/edit/1", Some(&cookie))).await;
    let html = body_text(response).await;
    assert!(html.contains("Max 3 vehicles"));
}

#[tokio::test]
async fn test_delete_vehicle_removes_exactly_that_row() {
    let state = test_state().await;
    let app = build_router(state.clone());

    let cookie = register_and_login(&app, "admin%40test.com", "password123").await;

    send(
        &app,
        post_form("/edit/1", "name=SEDAN&color=BLUE&sale=false", Some(&cookie)),
    )
    .await;
    send(
        &app,
        post_form(
            "/edit/1",
            "name=CONVERTIBLE&color=YELLOW&sale=true",
            Some(&cookie),
        ),
    )
    .await;

    let vehicles = Vehicle::list_by_person(&state.db, 1).await.unwrap();
    assert_eq!(vehicles.len(), 2);

    let uri = format!("/deletevehicle/{}/1", vehicles[0].id);
    let response = send(&app, get(&uri, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/edit/1");

    let remaining = Vehicle::list_by_person(&state.db, 1).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, vehicles[1].id);
}

#[tokio::test]
async fn test_vehicle_form_rejects_off_catalogue_values() {
    let app = build_router(test_state().await);

    let cookie = register_and_login(&app, "admin%40test.com", "password123").await;

    let response = send(
        &app,
        post_form("/edit/1", "name=TRUCK&color=BLUE&sale=false", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = build_router(test_state().await);

    let response = send(&app, get("/", None)).await;
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");
}
