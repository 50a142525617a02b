use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use string_analyzer::config::Config;
use string_analyzer::db;
use string_analyzer::migrate::run_migrations;
use string_analyzer::server::{router, AppState};
use string_analyzer::sqlite_store::SqliteStore;

struct TestApp {
    base: String,
    client: Client,
    _tmp: TempDir,
}

impl TestApp {
    async fn spawn() -> Self {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.db.url = format!("sqlite://{}", tmp.path().join("strings.sqlite").display());

        let pool = db::connect(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let app = router(AppState::new(Arc::new(SqliteStore::new(pool))));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            client: Client::new(),
            _tmp: tmp,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn create(&self, value: &str) -> reqwest::Response {
        self.client
            .post(self.url("/strings"))
            .json(&json!({ "value": value }))
            .send()
            .await
            .unwrap()
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }
}

fn values(body: &Value) -> Vec<String> {
    let mut out: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["value"].as_str().unwrap().to_string())
        .collect();
    out.sort();
    out
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_returns_full_record() {
    let app = TestApp::spawn().await;
    let resp = app.create("racecar").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    let expected_id = string_analyzer::content_hash("racecar");
    assert_eq!(body["id"], expected_id.as_str());
    assert_eq!(body["value"], "racecar");
    assert!(body["created_at"].is_string());

    let props = &body["properties"];
    assert_eq!(props["length"], 7);
    assert_eq!(props["is_palindrome"], true);
    assert_eq!(props["unique_characters"], 4);
    assert_eq!(props["word_count"], 1);
    assert_eq!(props["sha256_hash"], expected_id.as_str());
    assert_eq!(props["character_frequency_map"]["r"], 2);
    assert_eq!(props["character_frequency_map"]["e"], 1);
}

#[tokio::test]
async fn test_duplicate_create_is_rejected() {
    let app = TestApp::spawn().await;
    assert_eq!(app.create("only once").await.status(), StatusCode::OK);

    let resp = app.create("only once").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));

    let (_, list) = app.get_json("/strings").await;
    assert_eq!(list["count"], 1);
}

#[tokio::test]
async fn test_create_rejects_missing_value() {
    let app = TestApp::spawn().await;
    let resp = app
        .client
        .post(app.url("/strings"))
        .json(&json!({ "text": "wrong field" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_by_value() {
    let app = TestApp::spawn().await;
    app.create("hello world").await;

    let (status, body) = app.get_json("/strings/hello%20world").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], "hello world");
    assert_eq!(body["properties"]["word_count"], 2);

    let (status, body) = app.get_json("/strings/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_delete_lifecycle() {
    let app = TestApp::spawn().await;

    let resp = app.client.delete(app.url("/strings/nothing")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    app.create("temporary").await;
    let resp = app
        .client
        .delete(app.url("/strings/temporary"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(resp.text().await.unwrap().is_empty());

    let (status, _) = app.get_json("/strings/temporary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // can be created again once deleted
    assert_eq!(app.create("temporary").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_structured_filters() {
    let app = TestApp::spawn().await;
    for v in ["level", "noon", "hello", "a man a plan", "pizza"] {
        app.create(v).await;
    }

    let (status, body) = app.get_json("/strings?is_palindrome=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(values(&body), vec!["level", "noon"]);
    assert_eq!(body["count"], 2);
    assert_eq!(
        body["filters_applied"],
        json!({
            "is_palindrome": true,
            "min_length": null,
            "max_length": null,
            "word_count": null,
            "contains_character": null,
        })
    );

    let (_, body) = app.get_json("/strings?min_length=5&max_length=5").await;
    assert_eq!(values(&body), vec!["hello", "level", "pizza"]);

    let (_, body) = app.get_json("/strings?word_count=4").await;
    assert_eq!(values(&body), vec!["a man a plan"]);

    let (_, body) = app
        .get_json("/strings?contains_character=z&is_palindrome=false")
        .await;
    assert_eq!(values(&body), vec!["pizza"]);
    assert_eq!(body["filters_applied"]["contains_character"], "z");
}

#[tokio::test]
async fn test_inverted_length_range_is_empty() {
    let app = TestApp::spawn().await;
    app.create("abcd").await;

    let (status, body) = app.get_json("/strings?min_length=5&max_length=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_invalid_query_parameters() {
    let app = TestApp::spawn().await;
    for query in [
        "/strings?contains_character=ab",
        "/strings?word_count=0",
        "/strings?min_length=-1",
        "/strings?is_palindrome=maybe",
    ] {
        let (status, body) = app.get_json(query).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert_eq!(body["error"]["code"], "bad_request", "{query}");
    }
}

#[tokio::test]
async fn test_natural_language_longer_than_ten() {
    let app = TestApp::spawn().await;
    for v in ["short", "exactly 10", "definitely longer"] {
        app.create(v).await;
    }

    let (status, body) = app
        .get_json("/strings/filter-by-natural-language?query=strings%20longer%20than%2010%20characters")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(values(&body), vec!["definitely longer"]);
    assert_eq!(body["count"], 1);
    assert_eq!(
        body["interpreted_query"],
        json!({
            "original": "strings longer than 10 characters",
            "parsed_filters": { "min_length": 11 },
        })
    );
}

#[tokio::test]
async fn test_natural_language_palindromes() {
    let app = TestApp::spawn().await;
    for v in ["kayak", "abba", "nurses run", "zz", "banana"] {
        app.create(v).await;
    }

    let (_, body) = app
        .get_json("/strings/filter-by-natural-language?query=all%20single%20word%20palindromic%20strings")
        .await;
    assert_eq!(values(&body), vec!["abba", "kayak", "zz"]);

    let (_, body) = app
        .get_json("/strings/filter-by-natural-language?query=palindromic%20strings%20that%20contain%20the%20first%20vowel")
        .await;
    assert_eq!(values(&body), vec!["abba", "kayak"]);
    assert_eq!(
        body["interpreted_query"]["parsed_filters"],
        json!({ "is_palindrome": true, "contains_character": "a" })
    );

    let (_, body) = app
        .get_json("/strings/filter-by-natural-language?query=strings%20containing%20the%20letter%20z")
        .await;
    assert_eq!(values(&body), vec!["zz"]);
}

#[tokio::test]
async fn test_natural_language_fallback_returns_everything() {
    let app = TestApp::spawn().await;
    for v in ["one", "two", "three"] {
        app.create(v).await;
    }

    let (status, body) = app
        .get_json("/strings/filter-by-natural-language?query=anything%20goes")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["interpreted_query"]["original"], "anything goes");
    assert_eq!(body["interpreted_query"]["parsed_filters"], json!({}));

    let (_, body) = app.get_json("/strings/filter-by-natural-language").await;
    assert_eq!(body["count"], 3);
    assert!(body["interpreted_query"]["original"].is_null());
}

#[tokio::test]
async fn test_is_palindrome_accepts_bool_words() {
    let app = TestApp::spawn().await;
    for v in ["level", "hello"] {
        app.create(v).await;
    }

    for (param, expected) in [
        ("1", "level"),
        ("True", "level"),
        ("yes", "level"),
        ("False", "hello"),
        ("0", "hello"),
        ("off", "hello"),
    ] {
        let (status, body) = app
            .get_json(&format!("/strings?is_palindrome={param}"))
            .await;
        assert_eq!(status, StatusCode::OK, "{param}");
        assert_eq!(values(&body), vec![expected], "{param}");
        assert_eq!(
            body["filters_applied"]["is_palindrome"],
            expected == "level",
            "{param}"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_of_distinct_values_all_succeed() {
    let app = TestApp::spawn().await;

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let client = app.client.clone();
            let url = app.url("/strings");
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({ "value": format!("value {i}") }))
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let (_, list) = app.get_json("/strings").await;
    assert_eq!(list["count"], 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_of_same_value_have_one_winner() {
    let app = TestApp::spawn().await;

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let client = app.client.clone();
            let url = app.url("/strings");
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({ "value": "contended" }))
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    let mut ok = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::BAD_REQUEST => rejected += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(rejected, 19);

    let (_, list) = app.get_json("/strings").await;
    assert_eq!(list["count"], 1);
}

#[tokio::test]
async fn test_delete_value_matching_natural_language_path() {
    let app = TestApp::spawn().await;
    let path = "/strings/filter-by-natural-language";

    let resp = app.client.delete(app.url(path)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    app.create("filter-by-natural-language").await;
    let resp = app.client.delete(app.url(path)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let (_, list) = app.get_json("/strings").await;
    assert_eq!(list["count"], 0);
}
