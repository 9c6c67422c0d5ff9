//! Integration tests for the portfolio backend.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::{Config, EmailConfig, LogFormat};
use crate::db::{init_repository, Repository};
use crate::errors::AppError;
use crate::notify::{ContactNotification, ContactNotifier, NotificationQueue, RetryPolicy};
use crate::{create_router, AppState};

/// Records every notification it is handed.
#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<ContactNotification>>,
}

#[async_trait]
impl ContactNotifier for RecordingNotifier {
    fn kind(&self) -> &'static str {
        "recording"
    }

    async fn notify(&self, notification: &ContactNotification) -> Result<(), AppError> {
        self.seen.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Always fails, like an unreachable email provider.
struct FailingNotifier;

#[async_trait]
impl ContactNotifier for FailingNotifier {
    fn kind(&self) -> &'static str {
        "failing"
    }

    async fn notify(&self, _notification: &ContactNotification) -> Result<(), AppError> {
        Err(AppError::Notification {
            message: "provider down".to_string(),
            retryable: true,
        })
    }
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
}

impl TestFixture {
    async fn new() -> Self {
        Self::build(true, Arc::new(RecordingNotifier::default()), None).await
    }

    async fn public_only() -> Self {
        Self::build(false, Arc::new(RecordingNotifier::default()), None).await
    }

    /// Admin routes on, nothing stored yet.
    async fn empty_store() -> Self {
        Self::serve(
            Repository::empty(),
            true,
            Arc::new(RecordingNotifier::default()),
            None,
        )
        .await
    }

    async fn build(
        admin_routes: bool,
        notifier: Arc<dyn ContactNotifier>,
        static_dir: Option<PathBuf>,
    ) -> Self {
        Self::serve(init_repository(), admin_routes, notifier, static_dir).await
    }

    async fn serve(
        repo: Repository,
        admin_routes: bool,
        notifier: Arc<dyn ContactNotifier>,
        static_dir: Option<PathBuf>,
    ) -> Self {
        let config = Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Text,
            static_dir,
            admin_routes,
            email: EmailConfig {
                sendgrid_api_key: None,
                to: "owner@example.com".to_string(),
                from: "noreply@example.com".to_string(),
                queue_capacity: 16,
                max_attempts: 2,
            },
        };

        let (notifications, _worker) = NotificationQueue::start(
            notifier,
            config.email.queue_capacity,
            RetryPolicy {
                max_attempts: config.email.max_attempts,
                initial_backoff: Duration::from_millis(1),
            },
        );

        let state = AppState {
            repo: Arc::new(repo),
            notifications,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn send_json(&self, method: reqwest::Method, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .request(method, self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

fn contact_body() -> Value {
    json!({
        "name": "Ana",
        "email": "a@x.com",
        "subject": "Hi",
        "message": "Hello"
    })
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_get_seeded_profile() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/profile").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["name"], "Alex Chen");
    assert_eq!(
        body["data"]["currentRole"],
        "Senior Full Stack Developer\nTech Innovations Inc."
    );
}

#[tokio::test]
async fn test_skills_list_and_grouped() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/skills").await;
    assert_eq!(status, 200);
    let skills = body["data"].as_array().unwrap();
    assert_eq!(skills.len(), 9);
    let ids: Vec<i64> = skills.iter().map(|s| s["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, (1..=9).collect::<Vec<i64>>());

    // A new category appends after the seeded ones
    let (status, created) = fixture
        .send_json(
            reqwest::Method::POST,
            "/api/skills",
            json!({"category": "Mobile", "name": "Flutter", "level": "Expert", "percentage": 95}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(created["data"]["id"], 10);

    let (_, grouped) = fixture.get_json("/api/skills/grouped").await;
    let groups = grouped["data"].as_array().unwrap();
    let categories: Vec<&str> = groups
        .iter()
        .map(|g| g["category"].as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["Frontend", "Backend", "Tools", "Mobile"]);
    assert_eq!(groups[1]["icon"], "server");
    assert_eq!(groups[3]["icon"], "smartphone");
    assert_eq!(groups[3]["skills"][0]["name"], "Flutter");
}

#[tokio::test]
async fn test_percentage_boundaries() {
    let fixture = TestFixture::new().await;

    for percentage in [0, 100] {
        let (status, body) = fixture
            .send_json(
                reqwest::Method::POST,
                "/api/skills",
                json!({"category": "Tools", "name": "Edge", "level": "Intermediate", "percentage": percentage}),
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["percentage"], percentage);
    }

    for percentage in [-1, 101] {
        let (status, body) = fixture
            .send_json(
                reqwest::Method::POST,
                "/api/skills",
                json!({"category": "Tools", "name": "Edge", "level": "Intermediate", "percentage": percentage}),
            )
            .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["details"][0]["field"], "percentage");
    }

    let (_, skills) = fixture.get_json("/api/skills").await;
    assert_eq!(skills["data"].as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn test_projects_featured_filter() {
    let fixture = TestFixture::new().await;

    let (status, created) = fixture
        .send_json(
            reqwest::Method::POST,
            "/api/projects",
            json!({
                "title": "Side Project",
                "description": "Not on the landing page",
                "imageUrl": "https://img.example/side.png",
                "technologies": ["Rust"],
                "featured": 0
            }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(created["data"]["id"], 4);
    assert_eq!(created["data"]["featured"], 0);
    assert!(created["data"]["liveUrl"].is_null());

    let (_, all) = fixture.get_json("/api/projects").await;
    assert_eq!(all["data"].as_array().unwrap().len(), 4);

    let (_, featured) = fixture.get_json("/api/projects?featured=true").await;
    let featured = featured["data"].as_array().unwrap();
    let ids: Vec<i64> = featured.iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(featured.iter().all(|p| p["featured"] == 1));

    // Anything other than "true" lists everything
    let (_, other) = fixture.get_json("/api/projects?featured=yes").await;
    assert_eq!(other["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_contact_submission_flow() {
    let notifier = Arc::new(RecordingNotifier::default());
    let fixture = TestFixture::build(true, notifier.clone(), None).await;

    let (status, body) = fixture
        .send_json(reqwest::Method::POST, "/api/contact", contact_body())
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["message"], "Message sent successfully!");
    let id = body["data"]["id"].as_i64().unwrap();
    assert!(id > 0);
    let created_at = body["data"]["createdAt"].as_str().unwrap().to_string();
    assert!(chrono::DateTime::parse_from_rfc3339(&created_at).is_ok());

    let (status, contacts) = fixture.get_json("/api/contacts").await;
    assert_eq!(status, 200);
    let contacts = contacts["data"].as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["id"], id);
    assert_eq!(contacts[0]["name"], "Ana");
    assert_eq!(contacts[0]["subject"], "Hi");
    assert_eq!(contacts[0]["createdAt"], created_at.as_str());

    // Delivery happens off the request path
    tokio::time::sleep(Duration::from_millis(100)).await;
    let seen = notifier.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].contact_id, id);
    assert_eq!(seen[0].email, "a@x.com");
}

#[tokio::test]
async fn test_contact_succeeds_when_notifier_fails() {
    let fixture = TestFixture::build(true, Arc::new(FailingNotifier), None).await;

    let (status, body) = fixture
        .send_json(reqwest::Method::POST, "/api/contact", contact_body())
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let (_, contacts) = fixture.get_json("/api/contacts").await;
    assert_eq!(contacts["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_contact_validation_errors() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .send_json(
            reqwest::Method::POST,
            "/api/contact",
            json!({"name": "Ana", "email": "not-an-email", "subject": ""}),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "subject", "message"]);

    // Nothing was stored
    let (_, contacts) = fixture.get_json("/api/contacts").await;
    assert!(contacts["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/contact"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_profile_update_merges() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .send_json(
            reqwest::Method::PUT,
            "/api/profile",
            json!({"title": "Mobile App Developer"}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["title"], "Mobile App Developer");
    assert_eq!(body["data"]["name"], "Alex Chen");
    assert_eq!(body["data"]["email"], "alex.chen@email.com");

    let (_, fetched) = fixture.get_json("/api/profile").await;
    assert_eq!(fetched["data"], body["data"]);

    let (status, body) = fixture
        .send_json(reqwest::Method::PUT, "/api/profile", json!({}))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_profile_image_cleared_with_null() {
    let fixture = TestFixture::new().await;

    let (_, before) = fixture.get_json("/api/profile").await;
    assert!(before["data"]["profileImageUrl"].is_string());

    let (status, body) = fixture
        .send_json(
            reqwest::Method::PUT,
            "/api/profile",
            json!({"profileImageUrl": null}),
        )
        .await;
    assert_eq!(status, 200);
    assert!(body["data"]["profileImageUrl"].is_null());
    assert_eq!(body["data"]["name"], "Alex Chen");

    let (_, fetched) = fixture.get_json("/api/profile").await;
    assert!(fetched["data"]["profileImageUrl"].is_null());
}

#[tokio::test]
async fn test_update_without_profile_is_not_found() {
    let fixture = TestFixture::empty_store().await;

    let (status, body) = fixture.get_json("/api/profile").await;
    assert_eq!(status, 200);
    assert!(body["data"].is_null());

    let (status, body) = fixture
        .send_json(
            reqwest::Method::PUT,
            "/api/profile",
            json!({"title": "Ghost"}),
        )
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (_, body) = fixture.get_json("/api/profile").await;
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_second_profile_conflicts() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .send_json(
            reqwest::Method::POST,
            "/api/profile",
            json!({
                "name": "Someone Else",
                "title": "Designer",
                "bio": "Bio",
                "email": "else@example.com",
                "phone": "1",
                "location": "Nowhere",
                "education": "None",
                "currentRole": "Freelance"
            }),
        )
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (_, fetched) = fixture.get_json("/api/profile").await;
    assert_eq!(fetched["data"]["name"], "Alex Chen");
}

#[tokio::test]
async fn test_admin_routes_disabled() {
    let fixture = TestFixture::public_only().await;

    let (status, body) = fixture.get_json("/api/contacts").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let resp = fixture
        .client
        .post(fixture.url("/api/skills"))
        .json(&json!({"category": "Tools", "name": "Vim", "level": "Expert", "percentage": 90}))
        .send()
        .await
        .unwrap();
    // GET /api/skills exists, so the write is either unmatched or method-rejected
    assert!(matches!(resp.status().as_u16(), 404 | 405));

    // Public routes still work
    let (status, _) = fixture
        .send_json(reqwest::Method::POST, "/api/contact", contact_body())
        .await;
    assert_eq!(status, 200);
    let (_, skills) = fixture.get_json("/api/skills").await;
    assert_eq!(skills["data"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/nope").await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_static_frontend_fallback() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("index.html"), "<html>portfolio</html>").unwrap();
    std::fs::write(temp_dir.path().join("app.js"), "console.log('hi')").unwrap();

    let fixture = TestFixture::build(
        false,
        Arc::new(RecordingNotifier::default()),
        Some(temp_dir.path().to_path_buf()),
    )
    .await;

    let asset = fixture
        .client
        .get(fixture.url("/app.js"))
        .send()
        .await
        .unwrap();
    assert_eq!(asset.status(), 200);
    assert_eq!(asset.text().await.unwrap(), "console.log('hi')");

    // Client-side routes fall back to index.html
    let page = fixture
        .client
        .get(fixture.url("/projects/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), 200);
    assert_eq!(page.text().await.unwrap(), "<html>portfolio</html>");

    // API paths are not swallowed by the fallback
    let (status, _) = fixture.get_json("/api/nope").await;
    assert_eq!(status, 404);
}
