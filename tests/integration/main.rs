//! Integration tests for affiliate-hub

mod api {
    //! In-process storefront API used by the tests below

    use axum::extract::{Path, State};
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::routing::{get, post, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    pub const TOKEN: &str = "tok-admin";

    /// Requests the API has seen
    #[derive(Default)]
    pub struct Recorded {
        pub products: Vec<Value>,
        /// `(method path, Authorization header)` per request
        pub requests: Vec<(String, Option<String>)>,
        /// JSON bodies of create and update calls
        pub bodies: Vec<Value>,
        /// `Content-Type` header per request, in the same order as `requests`
        pub content_types: Vec<Option<String>>,
        next_id: usize,
    }

    #[derive(Clone, Default)]
    pub struct ApiState(Arc<Mutex<Recorded>>);

    impl ApiState {
        fn seeded() -> Self {
            let state = Self::default();
            state.0.lock().unwrap().products = vec![
                json!({
                    "_id": "a1",
                    "title": "Travel Mug",
                    "price": 10,
                    "imageUrl": "https://img.example.com/a1.jpg",
                    "amazonUrl": "https://www.amazon.com/dp/A1",
                    "createdAt": "2024-01-05T09:00:00Z",
                    "updatedAt": "2024-01-05T09:00:00Z"
                }),
                json!({
                    "id": 2,
                    "title": "Desk Lamp",
                    "price": "50",
                    "imageUrl": "https://img.example.com/2.jpg",
                    "amazonUrl": "https://amzn.to/lamp",
                    "createdAt": "2024-02-10T09:00:00Z",
                    "updatedAt": "2024-02-10T09:00:00Z"
                }),
                json!({
                    "_id": "c3",
                    "id": "legacy-3",
                    "title": "Standing Desk",
                    "price": 999,
                    "imageUrl": "https://img.example.com/c3.jpg",
                    "amazonUrl": "https://www.amazon.de/dp/C3",
                    "createdAt": "2024-03-15T09:00:00Z",
                    "updatedAt": "2024-03-15T09:00:00Z"
                }),
            ];
            state
        }

        pub fn add_product(&self, product: Value) {
            self.0.lock().unwrap().products.push(product);
        }

        pub fn recorded<T>(&self, f: impl FnOnce(&Recorded) -> T) -> T {
            f(&self.0.lock().unwrap())
        }

        fn note(&self, request: &str, headers: &HeaderMap) {
            let auth = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let content_type = headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let mut recorded = self.0.lock().unwrap();
            recorded.requests.push((request.to_string(), auth));
            recorded.content_types.push(content_type);
        }

        fn authorize(&self, request: &str, headers: &HeaderMap) -> Result<(), StatusCode> {
            self.note(request, headers);
            let expected = format!("Bearer {TOKEN}");
            match headers.get(header::AUTHORIZATION) {
                Some(value) if value.to_str().ok() == Some(expected.as_str()) => Ok(()),
                _ => Err(StatusCode::UNAUTHORIZED),
            }
        }
    }

    fn matches_id(product: &Value, id: &str) -> bool {
        let text = |v: &Value| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        product.get("_id").and_then(text).or_else(|| product.get("id").and_then(text))
            == Some(id.to_string())
    }

    async fn list(State(state): State<ApiState>, headers: HeaderMap) -> Json<Value> {
        state.note("GET /products", &headers);
        Json(Value::Array(state.0.lock().unwrap().products.clone()))
    }

    async fn create(
        State(state): State<ApiState>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<(StatusCode, Json<Value>), StatusCode> {
        state.authorize("POST /products", &headers)?;
        let mut recorded = state.0.lock().unwrap();
        recorded.bodies.push(body.clone());
        recorded.next_id += 1;

        let mut created = body;
        created["_id"] = json!(format!("new{}", recorded.next_id));
        created["createdAt"] = json!("2024-06-01T00:00:00Z");
        created["updatedAt"] = json!("2024-06-01T00:00:00Z");
        recorded.products.push(created.clone());
        Ok((StatusCode::CREATED, Json(created)))
    }

    async fn update(
        State(state): State<ApiState>,
        Path(id): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Result<Json<Value>, StatusCode> {
        state.authorize(&format!("PUT /products/{id}"), &headers)?;
        let mut recorded = state.0.lock().unwrap();
        recorded.bodies.push(body.clone());

        let product = recorded
            .products
            .iter_mut()
            .find(|p| matches_id(p, &id))
            .ok_or(StatusCode::NOT_FOUND)?;
        if let (Value::Object(target), Value::Object(changes)) = (product, body) {
            target.extend(changes);
        }
        let updated = recorded
            .products
            .iter()
            .find(|p| matches_id(p, &id))
            .cloned()
            .ok_or(StatusCode::NOT_FOUND)?;
        Ok(Json(updated))
    }

    async fn remove(
        State(state): State<ApiState>,
        Path(id): Path<String>,
        headers: HeaderMap,
    ) -> Result<StatusCode, StatusCode> {
        state.authorize(&format!("DELETE /products/{id}"), &headers)?;
        state
            .0
            .lock()
            .unwrap()
            .products
            .retain(|p| !matches_id(p, &id));
        Ok(StatusCode::NO_CONTENT)
    }

    async fn login(Json(body): Json<Value>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
        if body["username"] == "admin" && body["password"] == "hunter2" {
            Ok(Json(json!({ "token": TOKEN })))
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid credentials" })),
            ))
        }
    }

    async fn verify(State(state): State<ApiState>, headers: HeaderMap) -> StatusCode {
        match state.authorize("GET /auth/verify", &headers) {
            Ok(()) => StatusCode::OK,
            Err(status) => status,
        }
    }

    async fn broken() -> (StatusCode, Json<Value>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "database offline" })),
        )
    }

    fn router(state: ApiState) -> Router {
        Router::new()
            .route("/api/products", get(list).post(create))
            .route("/api/products/{id}", put(update).delete(remove))
            .route("/api/auth/login", post(login))
            .route("/api/auth/verify", get(verify))
            .route("/broken/products", get(broken))
            .with_state(state)
    }

    /// A running API on an ephemeral port
    pub struct TestApi {
        pub addr: SocketAddr,
        pub state: ApiState,
    }

    impl TestApi {
        /// Serve on a dedicated thread so blocking CLI tests can use it too
        pub fn start() -> Self {
            let state = ApiState::seeded();
            let served = state.clone();
            let (tx, rx) = std::sync::mpsc::channel();

            std::thread::spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .unwrap();
                runtime.block_on(async move {
                    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                    tx.send(listener.local_addr().unwrap()).unwrap();
                    axum::serve(listener, router(served)).await.unwrap();
                });
            });

            let addr = rx.recv().unwrap();
            Self { addr, state }
        }

        pub fn base_url(&self) -> String {
            format!("http://{}/api", self.addr)
        }

        pub fn broken_url(&self) -> String {
            format!("http://{}/broken", self.addr)
        }
    }
}

mod gateway_tests {
    use super::api::{TestApi, TOKEN};
    use affiliate_hub::gateway::{Gateway, HttpGateway};
    use affiliate_hub::model::{LoginCredentials, NewProduct, PriceInput, ProductId, ProductPatch};
    use affiliate_hub::session::{Credential, MemoryTokenStore, Session};
    use affiliate_hub::HubError;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::Arc;

    fn connect(api: &TestApi, token: Option<&str>) -> (HttpGateway, Arc<Session>, Arc<MemoryTokenStore>) {
        let store = Arc::new(match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        });
        let session = Arc::new(Session::with_credential(
            store.clone(),
            token.map(Credential::new),
        ));
        let gateway = HttpGateway::new(&api.base_url(), Arc::clone(&session)).unwrap();
        (gateway, session, store)
    }

    #[tokio::test]
    async fn list_normalizes_identifiers_and_prices() {
        let api = TestApi::start();
        let (gateway, _, _) = connect(&api, None);

        let products = gateway.list().await.unwrap();

        let ids: Vec<_> = products
            .iter()
            .map(|p| p.id.as_ref().map(|id| id.as_str().to_string()))
            .collect();
        assert_eq!(
            ids,
            vec![Some("a1".into()), Some("2".into()), Some("c3".into())]
        );
        assert_eq!(products[1].price, Decimal::from(50));
    }

    #[tokio::test]
    async fn list_skips_negative_prices_and_accepts_float_ids() {
        let api = TestApi::start();
        api.state.add_product(json!({"_id": "refund", "title": "Refund", "price": -4}));
        api.state.add_product(json!({"id": 7.0, "title": "Sticker", "price": 0}));
        let (gateway, _, _) = connect(&api, None);

        let products = gateway.list().await.unwrap();

        let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Travel Mug", "Desk Lamp", "Standing Desk", "Sticker"]);
        assert_eq!(products[3].id, Some(ProductId::new("7")));
    }

    #[tokio::test]
    async fn requests_declare_json_content_type() {
        let api = TestApi::start();
        let (gateway, _, _) = connect(&api, Some(TOKEN));

        gateway.list().await.unwrap();
        gateway.delete(&ProductId::new("a1")).await.unwrap();

        let types = api.state.recorded(|r| r.content_types.clone());
        assert_eq!(types, vec![Some("application/json".to_string()); 2]);
    }

    #[tokio::test]
    async fn bearer_token_attached_only_when_held() {
        let api = TestApi::start();

        let (anonymous, _, _) = connect(&api, None);
        anonymous.list().await.unwrap();
        let (signed_in, _, _) = connect(&api, Some(TOKEN));
        signed_in.list().await.unwrap();

        let auth: Vec<_> = api
            .state
            .recorded(|r| r.requests.iter().map(|(_, a)| a.clone()).collect());
        assert_eq!(auth, vec![None, Some(format!("Bearer {TOKEN}"))]);
    }

    #[tokio::test]
    async fn create_sends_text_price_as_number() {
        let api = TestApi::start();
        let (gateway, _, _) = connect(&api, Some(TOKEN));

        let created = gateway
            .create(&NewProduct {
                title: "Kettle".to_string(),
                price: PriceInput::from("19.99"),
                image_url: "https://img.example.com/kettle.jpg".to_string(),
                affiliate_url: "https://amzn.to/kettle".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.id, Some(ProductId::new("new1")));
        assert_eq!(created.price, Decimal::new(1999, 2));
        let body = api.state.recorded(|r| r.bodies[0].clone());
        assert_eq!(body["price"], json!(19.99));
        assert_eq!(body["amazonUrl"], json!("https://amzn.to/kettle"));
    }

    #[tokio::test]
    async fn update_sends_only_given_fields() {
        let api = TestApi::start();
        let (gateway, _, _) = connect(&api, Some(TOKEN));

        let patch = ProductPatch {
            price: Some(PriceInput::from(Decimal::from(45))),
            ..Default::default()
        };
        let updated = gateway.update(&ProductId::new("2"), &patch).await.unwrap();

        assert_eq!(updated.price, Decimal::from(45));
        assert_eq!(updated.title, "Desk Lamp");
        assert_eq!(api.state.recorded(|r| r.bodies[0].clone()), json!({"price": 45.0}));
    }

    #[tokio::test]
    async fn delete_accepts_no_content() {
        let api = TestApi::start();
        let (gateway, _, _) = connect(&api, Some(TOKEN));

        gateway.delete(&ProductId::new("a1")).await.unwrap();

        assert_eq!(gateway.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unauthorized_clears_the_session() {
        let api = TestApi::start();
        let (gateway, session, store) = connect(&api, Some("stale"));
        let mut watcher = session.subscribe();

        let err = gateway.verify().await.unwrap_err();

        assert!(matches!(err, HubError::AuthExpired));
        assert!(!session.is_authenticated());
        assert!(!store.has_token());
        assert!(watcher.has_changed().unwrap());
        assert!(watcher.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn login_round_trip() {
        let api = TestApi::start();
        let (gateway, session, store) = connect(&api, None);

        session
            .login(&gateway, &LoginCredentials::new("admin", "hunter2"))
            .await
            .unwrap();
        assert!(session.is_authenticated());
        assert!(store.has_token());

        gateway.verify().await.unwrap();
    }

    #[tokio::test]
    async fn rejected_login_is_reported() {
        let api = TestApi::start();
        let (gateway, session, _) = connect(&api, None);

        let err = session
            .login(&gateway, &LoginCredentials::new("admin", "nope"))
            .await
            .unwrap_err();

        assert!(matches!(err, HubError::LoginRejected));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn server_error_message_is_surfaced() {
        let api = TestApi::start();
        let session = Arc::new(Session::with_credential(
            Arc::new(MemoryTokenStore::new()),
            None,
        ));
        let gateway = HttpGateway::new(&api.broken_url(), session).unwrap();

        match gateway.list().await.unwrap_err() {
            HubError::RequestFailed { operation, reason } => {
                assert_eq!(operation, "list products");
                assert!(reason.contains("database offline"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

mod cli_tests {
    use super::api::TestApi;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Isolated config and state directories for one test
    struct Workspace {
        dir: TempDir,
        api_url: String,
    }

    impl Workspace {
        fn new(api_url: impl Into<String>) -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                api_url: api_url.into(),
            }
        }

        /// No API listening
        fn offline() -> Self {
            Self::new("http://127.0.0.1:9/api")
        }

        fn state(&self, file: &str) -> PathBuf {
            self.dir.path().join("state").join(file)
        }

        fn hub(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("affiliate-hub");
            cmd.env("AFFILIATE_HUB_CONFIG", self.dir.path().join("config.toml"))
                .env("AFFILIATE_HUB_STATE_DIR", self.dir.path().join("state"))
                .env("AFFILIATE_HUB_API_URL", &self.api_url)
                .env("AFFILIATE_HUB_NON_INTERACTIVE", "1")
                .env_remove("AFFILIATE_HUB_PASSWORD");
            cmd
        }

        fn login(&self) {
            self.hub()
                .args(["login", "--username", "admin", "--password", "hunter2"])
                .assert()
                .success();
        }
    }

    #[test]
    fn help_displays() {
        Workspace::offline()
            .hub()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("affiliate product storefront"));
    }

    #[test]
    fn version_displays() {
        Workspace::offline()
            .hub()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("affiliate-hub"));
    }

    #[test]
    fn config_path_follows_override() {
        Workspace::offline()
            .hub()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_init_then_set() {
        let ws = Workspace::offline();
        ws.hub().args(["config", "init"]).assert().success();
        ws.hub()
            .args(["config", "set", "catalog.sort", "date-desc"])
            .assert()
            .success();

        let content = std::fs::read_to_string(ws.dir.path().join("config.toml")).unwrap();
        assert!(content.contains("sort = \"date-desc\""));

        ws.hub()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[catalog]"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        Workspace::offline()
            .hub()
            .args(["config", "set", "api.port", "80"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn completions_generate() {
        Workspace::offline()
            .hub()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("affiliate-hub"));
    }

    #[test]
    fn admin_requires_login() {
        Workspace::offline()
            .hub()
            .args(["admin", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not logged in"))
            .stderr(predicate::str::contains("affiliate-hub login"));
    }

    #[test]
    fn catalog_reports_unreachable_api() {
        Workspace::offline()
            .hub()
            .arg("catalog")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Request failed: list products"));
    }

    #[test]
    fn catalog_filters_and_sorts() {
        let api = TestApi::start();
        let ws = Workspace::new(api.base_url());

        let output = ws
            .hub()
            .args(["catalog", "--format", "json", "--max-price", "100", "--sort", "price-desc"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let shown: Value = serde_json::from_slice(&output.stdout).unwrap();
        let prices: Vec<_> = shown
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["price"].clone())
            .collect();
        assert_eq!(prices, vec![json!(50.0), json!(10.0)]);
    }

    #[test]
    fn catalog_search_plain() {
        let api = TestApi::start();
        let ws = Workspace::new(api.base_url());

        ws.hub()
            .args(["catalog", "--format", "plain", "--search", "DESK", "--max-price", "1000"])
            .assert()
            .success()
            .stdout("Desk Lamp\t$50.00\nStanding Desk\t$999.00\n");
    }

    #[test]
    fn login_stores_credential_and_records_activity() {
        let api = TestApi::start();
        let ws = Workspace::new(api.base_url());

        ws.login();

        assert!(ws.state("token.json").exists());
        let activity = std::fs::read_to_string(ws.state("activity.log")).unwrap();
        assert!(activity.contains("\"event\":\"logged_in\""));

        ws.hub()
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("logged in (verified)"));
    }

    #[test]
    fn rejected_login_stores_nothing() {
        let api = TestApi::start();
        let ws = Workspace::new(api.base_url());

        ws.hub()
            .args(["login", "--username", "admin", "--password", "wrong"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Login rejected"));

        assert!(!ws.state("token.json").exists());
    }

    #[test]
    fn login_without_password_in_non_interactive_mode() {
        let api = TestApi::start();
        Workspace::new(api.base_url())
            .hub()
            .args(["login", "--username", "admin"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--password"));
    }

    #[test]
    fn admin_add_sends_numeric_price_with_bearer() {
        let api = TestApi::start();
        let ws = Workspace::new(api.base_url());
        ws.login();

        ws.hub()
            .args([
                "admin",
                "add",
                "--title",
                "Kettle",
                "--price",
                "19.99",
                "--image-url",
                "https://img.example.com/kettle.jpg",
                "--affiliate-url",
                "https://www.amazon.com/dp/B0K",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Product created successfully"));

        let body = api.state.recorded(|r| r.bodies[0].clone());
        assert_eq!(
            body,
            json!({
                "title": "Kettle",
                "price": 19.99,
                "imageUrl": "https://img.example.com/kettle.jpg",
                "amazonUrl": "https://www.amazon.com/dp/B0K"
            })
        );
        let auth = api.state.recorded(|r| {
            r.requests
                .iter()
                .find(|(req, _)| req == "POST /products")
                .and_then(|(_, a)| a.clone())
        });
        assert_eq!(auth.as_deref(), Some("Bearer tok-admin"));
    }

    #[test]
    fn admin_add_invalid_never_reaches_api() {
        let api = TestApi::start();
        let ws = Workspace::new(api.base_url());
        ws.login();

        ws.hub()
            .args([
                "admin",
                "add",
                "--title",
                "Kettle",
                "--price",
                "-5",
                "--image-url",
                "https://img.example.com/kettle.jpg",
                "--affiliate-url",
                "https://example.com/kettle",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid product"))
            .stderr(predicate::str::contains("amazonUrl"));

        assert!(api.state.recorded(|r| r.bodies.is_empty()));
    }

    #[test]
    fn admin_edit_and_remove() {
        let api = TestApi::start();
        let ws = Workspace::new(api.base_url());
        ws.login();

        ws.hub()
            .args(["admin", "edit", "2", "--price", "45"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Product updated successfully"));
        let body = api.state.recorded(|r| r.bodies[0].clone());
        assert_eq!(body["price"], json!(45.0));
        assert_eq!(body["title"], json!("Desk Lamp"));

        ws.hub()
            .args(["admin", "remove", "a1", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Product deleted successfully"));
        assert_eq!(api.state.recorded(|r| r.products.len()), 2);

        ws.hub()
            .args(["admin", "remove", "a1", "--yes"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Product not found: a1"));
    }

    #[test]
    fn remove_without_confirmation_keeps_product() {
        let api = TestApi::start();
        let ws = Workspace::new(api.base_url());
        ws.login();

        ws.hub()
            .args(["admin", "remove", "c3"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Not deleted"));
        assert_eq!(api.state.recorded(|r| r.products.len()), 3);
    }

    #[test]
    fn stale_credential_is_cleared_on_401() {
        let api = TestApi::start();
        let ws = Workspace::new(api.base_url());
        std::fs::create_dir_all(ws.state("")).unwrap();
        std::fs::write(
            ws.state("token.json"),
            r#"{"token":"stale","stored_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        ws.hub()
            .args([
                "admin",
                "add",
                "--title",
                "Kettle",
                "--price",
                "12",
                "--image-url",
                "https://img.example.com/kettle.jpg",
                "--affiliate-url",
                "https://amzn.to/kettle",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Session expired"))
            .stderr(predicate::str::contains("affiliate-hub login"));

        assert!(!ws.state("token.json").exists());
        let activity = std::fs::read_to_string(ws.state("activity.log")).unwrap();
        assert!(activity.contains("session_expired"));
    }
}
