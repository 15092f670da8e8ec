use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use kindaebay_accounts::SessionClaims;
use kindaebay_api::config::AppConfig;
use kindaebay_core::AccountId;
use reqwest::StatusCode;
use serde_json::json;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = kindaebay_api::app::build_app(&AppConfig::for_tests(JWT_SECRET))
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(secret: &str, claims: &SessionClaims) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn signup(
    client: &reqwest::Client,
    srv: &TestServer,
    username: &str,
    password: &str,
) -> serde_json::Value {
    let res = client
        .post(srv.url("/signup"))
        .json(&json!({
            "username": username,
            "email": format!("{username}@case.edu"),
            "password1": password,
            "password2": password,
        }))
        .send()
        .await
        .unwrap();
    if res.status() != StatusCode::CREATED {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        panic!("expected 201 from signup, got {status} body={body}");
    }
    res.json().await.unwrap()
}

fn listing(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "Second-hand TV",
        "price": "99.99",
        "summary": "Second-hand TV",
        "category": "E",
        "label": "N",
    })
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/whoami", "/users"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
    }

    let res = client
        .post(srv.url("/create"))
        .json(&listing("Television"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");

    // POST on the public catalogue path still goes through auth.
    let res = client
        .post(srv.url("/products"))
        .json(&listing("Television"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");

    let res = client.get(srv.url("/products")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = signup(&client, &srv, "seller", "grapefruit9").await;
    let token = created["token"].as_str().unwrap().to_string();

    let mut numeric_price = listing("Television");
    numeric_price["price"] = json!(99.99);
    let res = client
        .post(srv.url("/create"))
        .bearer_auth(&token)
        .json(&numeric_price)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_request");
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON payload"));

    let res = client
        .post(srv.url("/signup"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_request");

    let res = client
        .post(srv.url("/login"))
        .body("username=testuser")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn concurrent_signups_all_complete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut set = tokio::task::JoinSet::new();
    for i in 0..8 {
        let client = client.clone();
        let url = srv.url("/signup");
        set.spawn(async move {
            client
                .post(url)
                .json(&json!({
                    "username": format!("seller{i}"),
                    "email": format!("seller{i}@case.edu"),
                    "password1": "grapefruit9",
                    "password2": "grapefruit9",
                }))
                .send()
                .await
                .unwrap()
                .status()
        });
    }
    let mut statuses = Vec::new();
    while let Some(status) = set.join_next().await {
        statuses.push(status.unwrap());
    }
    assert_eq!(statuses.len(), 8);
    assert!(statuses.iter().all(|s| *s == StatusCode::CREATED), "{statuses:?}");

    let res = client
        .post(srv.url("/login"))
        .json(&json!({ "username": "seller3", "password": "grapefruit9" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn signup_rejections_are_reported_per_field() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/signup"))
        .json(&json!({
            "username": "testuse",
            "email": "user@user.com",
            "password1": "asdf",
            "password2": "asdf",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(
        body["errors"]["email"],
        json!(["Only @case.edu email addresses are allowed"])
    );
    let password2 = body["errors"]["password2"].as_array().unwrap();
    assert_eq!(password2.len(), 2);
    assert!(password2.iter().any(|m| m == "This password is too common."));
}

#[tokio::test]
async fn signup_then_whoami_and_duplicate_username() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = signup(&client, &srv, "393testUser", "testpassword").await;
    assert_eq!(created["message"], "Registration successful.");
    assert_eq!(created["account"]["username"], "393testUser");
    let token = created["token"].as_str().unwrap().to_string();

    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["username"], "393testUser");
    assert_eq!(me["pk"], created["account"]["pk"]);

    let res = client
        .post(srv.url("/signup"))
        .json(&json!({
            "username": "393testUser",
            "email": "other@case.edu",
            "password1": "testpassword",
            "password2": "testpassword",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["errors"]["username"],
        json!(["A user with that username already exists."])
    );
}

#[tokio::test]
async fn login_logout_cycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    signup(&client, &srv, "testuser", "mytestpassword").await;

    let res = client
        .post(srv.url("/login"))
        .json(&json!({ "username": "testuser", "password": "usertest1234" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid username or password.");

    let res = client
        .post(srv.url("/login?next=/product/abc"))
        .json(&json!({ "username": "testuser", "password": "mytestpassword" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "You are now logged in as testuser.");
    assert_eq!(body["redirect"], "/product/abc");
    let token = body["token"].as_str().unwrap().to_string();

    let res = client
        .post(srv.url("/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_requires_both_fields() {
    let srv = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .post(srv.url("/login"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["username"], json!(["This field is required."]));
    assert_eq!(body["errors"]["password"], json!(["This field is required."]));
}

#[tokio::test]
async fn forged_and_expired_tokens_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = signup(&client, &srv, "alice", "grapefruit9").await;
    let pk: AccountId = created["account"]["pk"].as_str().unwrap().parse().unwrap();

    let now = Utc::now();
    let claims = SessionClaims {
        sub: pk,
        username: "alice".to_string(),
        jti: uuid::Uuid::now_v7(),
        iat: now.timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };

    let forged = mint_jwt("not-the-secret", &claims);
    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth(forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let expired = mint_jwt(
        JWT_SECRET,
        &SessionClaims {
            iat: (now - ChronoDuration::hours(2)).timestamp(),
            exp: (now - ChronoDuration::hours(1)).timestamp(),
            ..claims.clone()
        },
    );
    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth(expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Correctly signed and unexpired is accepted.
    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth(mint_jwt(JWT_SECRET, &claims))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn listing_lifecycle_create_list_detail() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = signup(&client, &srv, "seller", "grapefruit9").await;
    let token = created["token"].as_str().unwrap().to_string();

    let res = client
        .post(srv.url("/create"))
        .bearer_auth(&token)
        .json(&listing("Television"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let product: serde_json::Value = res.json().await.unwrap();
    assert_eq!(product["publisher"], "seller");
    assert_eq!(product["price"], "99.99");
    let id = product["id"].as_str().unwrap().to_string();

    let res = client
        .post(srv.url("/products"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Oak table",
            "price": "45",
            "summary": "Solid oak",
            "category": "F",
            "label": "S",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client.get(srv.url("/home")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let res = client
        .get(srv.url("/products?q=television&category=E"))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id.as_str());

    let res = client
        .get(srv.url(&format!("/product/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let detail: serde_json::Value = res.json().await.unwrap();
    assert_eq!(detail["title"], "Television");

    let res = client
        .get(srv.url(&format!("/product/{}", kindaebay_core::ProductId::new())))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(srv.url("/product/42")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_listing_reports_every_field() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let created = signup(&client, &srv, "seller", "grapefruit9").await;
    let token = created["token"].as_str().unwrap().to_string();

    let res = client
        .post(srv.url("/create"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "x".repeat(121),
            "price": "999999999.99",
            "summary": "",
            "category": "1",
            "label": "1",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    let errors = &body["errors"];
    assert_eq!(
        errors["title"],
        json!(["Ensure this value has at most 120 characters (it has 121)."])
    );
    assert_eq!(
        errors["price"],
        json!(["Ensure that there are no more than 10 digits in total."])
    );
    assert_eq!(errors["summary"], json!(["This field is required."]));
    assert_eq!(
        errors["label"],
        json!(["Select a valid choice. 1 is not one of the available choices."])
    );
    assert!(errors["category"].is_array());

    let res = client.get(srv.url("/")).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn users_lists_everyone_but_the_caller() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let alice = signup(&client, &srv, "alice", "grapefruit9").await;
    let bob = signup(&client, &srv, "bob", "grapefruit9").await;

    let res = client
        .get(srv.url("/users"))
        .bearer_auth(alice["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let users: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        users,
        json!([{ "username": "bob", "pk": bob["account"]["pk"] }])
    );
}
