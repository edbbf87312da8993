//! Shared harness for API integration tests
//!
//! Builds the full application over an in-memory database and a temporary
//! storage directory, and drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Method, Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use menu_server::auth::{Claims, JwtConfig, JwtService};
use menu_server::db::DbService;
use menu_server::services::{AssetStorage, LocalStorage, PngQrCodeGenerator, QrCodeGenerator};
use menu_server::{Config, ServerState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PUBLIC_URL: &str = "http://menu.test";

/// PNG signature and IHDR chunk header
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, 0x49, 0x48, 0x44, 0x52,
];

const BOUNDARY: &str = "menu-test-boundary";
const JWT_SECRET: &str = "integration-test-secret-with-enough-length";

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    pub admin_token: String,
    pub staff_token: String,
    _dir: TempDir,
}

pub async fn spawn() -> TestApp {
    let dir = TempDir::new().unwrap();

    let mut config = Config::with_overrides(dir.path().to_string_lossy(), 0);
    config.public_url = PUBLIC_URL.to_string();
    config.jwt = JwtConfig {
        secret: JWT_SECRET.to_string(),
        issuer: "menu-server".to_string(),
        audience: "menu-clients".to_string(),
    };

    let db = DbService::in_memory().await.unwrap();
    for (id, name) in [(1, "Mains"), (2, "Desserts")] {
        sqlx::query("INSERT INTO category (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(&db.pool)
            .await
            .unwrap();
    }

    let storage: Arc<dyn AssetStorage> =
        Arc::new(LocalStorage::new(config.storage_dir(), PUBLIC_URL));
    let qr_codes: Arc<dyn QrCodeGenerator> =
        Arc::new(PngQrCodeGenerator::new(storage.clone(), PUBLIC_URL));
    let jwt = Arc::new(JwtService::with_config(&config.jwt));

    let admin_token = token(&config.jwt, "1", "admin");
    let staff_token = token(&config.jwt, "2", "staff");

    let state = ServerState::new(config, db.pool, storage, qr_codes, jwt);
    let app = menu_server::api::build_app(state.clone());

    TestApp {
        app,
        state,
        admin_token,
        staff_token,
        _dir: dir,
    }
}

/// Sign a token the way the back-office login service does
pub fn token(config: &JwtConfig, user_id: &str, role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        username: format!("user-{user_id}"),
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap()
}

impl TestApp {
    pub async fn send_raw(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send_raw(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::DELETE, uri, token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let req = request(method, uri, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    /// POST a multipart form; `image` is `(file name, bytes)`
    pub async fn multipart(
        &self,
        uri: &str,
        token: Option<&str>,
        fields: &[(&str, &str)],
        image: Option<(&str, &[u8])>,
    ) -> (StatusCode, Value) {
        let req = request(Method::POST, uri, token)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, image)))
            .unwrap();
        self.send(req).await
    }

    /// Create a meal through the API and return its id
    pub async fn create_meal(&self, fields: &[(&str, &str)]) -> i64 {
        let (status, body) = self
            .multipart(
                "/api/meals",
                Some(&self.admin_token),
                fields,
                Some(("dish.png", PNG_BYTES)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        let name = fields
            .iter()
            .find(|(k, _)| *k == "name")
            .map(|(_, v)| *v)
            .unwrap();
        sqlx::query_scalar::<_, i64>("SELECT id FROM meal WHERE name = ?")
            .bind(name)
            .fetch_one(&self.state.pool)
            .await
            .unwrap()
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>) -> http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Form fields of a valid meal
pub fn meal_fields(name: &str) -> Vec<(&str, &str)> {
    vec![
        ("name", name),
        ("description", "Slow cooked and well seasoned"),
        ("type", "non-vegetarian"),
        ("category_id", "1"),
        ("size", "2"),
        ("cost", "9.5"),
    ]
}
