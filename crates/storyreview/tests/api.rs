use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use mongodb::bson::Bson;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use storyreview::server::error::ReviewError;
use storyreview::server::models::story::{StoryContext, StoryRecord};
use storyreview::server::routing::create_router;
use storyreview::server::services::embeddings::EmbeddingService;
use storyreview::server::services::narrative::NarrativeService;
use storyreview::server::services::review_format::{fallback_review, CRITERIA};
use storyreview::server::services::vector_database::VectorDatabase;
use storyreview::server::state::AppState;

const NURSE_STORY: &str = "As a nurse, I want to record vitals";

const MODEL_REVIEW: &str = "PARAMETER SCORES:
• Clarity: 17/20
• Completeness: 11/20
• Business Value: 18/20
• Testability: 12/20
• Technical Feasibility: 15/20
• Overall Score: 73/100

IMPROVEMENT RECOMMENDATIONS:
• List the vital signs captured
• State where the readings are stored
• Add acceptance criteria for out-of-range values

SUMMARY:
Clear intent with a strong safety angle. Needs acceptance criteria before it is ready.";

// Test doubles
// ============

struct FakeEmbeddings {
  calls: AtomicUsize,
  outcome: fn() -> Result<Vec<f32>, ReviewError>,
}

#[async_trait]
impl EmbeddingService for FakeEmbeddings {
  async fn embed(&self, _text: &str) -> Result<Vec<f32>, ReviewError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    (self.outcome)()
  }
}

struct FakeVectors {
  calls: AtomicUsize,
  records: Vec<StoryRecord>,
  failure: Option<&'static str>,
}

#[async_trait]
impl VectorDatabase for FakeVectors {
  async fn search_similar(
    &self,
    _query_embedding: &[f32],
    limit: usize,
  ) -> Result<Vec<StoryRecord>, ReviewError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    match self.failure {
      Some(message) => Err(ReviewError::upstream(message)),
      None => Ok(self.records.iter().take(limit).cloned().collect()),
    }
  }
}

/// Answers like the production generator: model text, or the fallback when "down"
struct FakeNarrator {
  calls: AtomicUsize,
  seen: Mutex<Vec<StoryContext>>,
  reply: Option<&'static str>,
}

#[async_trait]
impl NarrativeService for FakeNarrator {
  async fn review(&self, _user_story: &str, related: &[StoryContext]) -> String {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.seen.lock().unwrap().extend_from_slice(related);
    self.reply.map(str::to_string).unwrap_or_else(fallback_review)
  }
}

struct Harness {
  embeddings: Arc<FakeEmbeddings>,
  vectors: Arc<FakeVectors>,
  narrator: Arc<FakeNarrator>,
}

impl Harness {
  fn new() -> Self {
    Self {
      embeddings: Arc::new(FakeEmbeddings {
        calls: AtomicUsize::new(0),
        outcome: || Ok(vec![0.12, -0.4, 0.9]),
      }),
      vectors: Arc::new(FakeVectors {
        calls: AtomicUsize::new(0),
        records: stored_stories(5),
        failure: None,
      }),
      narrator: Arc::new(FakeNarrator {
        calls: AtomicUsize::new(0),
        seen: Mutex::new(Vec::new()),
        reply: Some(MODEL_REVIEW),
      }),
    }
  }

  fn state(&self) -> AppState {
    AppState::new(self.embeddings.clone(), self.vectors.clone(), self.narrator.clone(), 4)
  }

  fn downstream_calls(&self) -> usize {
    self.embeddings.calls.load(Ordering::SeqCst)
      + self.vectors.calls.load(Ordering::SeqCst)
      + self.narrator.calls.load(Ordering::SeqCst)
  }
}

fn stored_stories(count: usize) -> Vec<StoryRecord> {
  (1..=count)
    .map(|i| StoryRecord {
      id: Some(Bson::String(format!("oid-{i}"))),
      story_id: Some(Bson::String(format!("HC-{i}"))),
      summary: Some(Bson::String(format!("Nursing workflow story {i}"))),
      project_name: Some(Bson::String("Vitals Capture".to_string())),
      priority: Some(Bson::String("High".to_string())),
      risk: Some(Bson::String("Patient safety".to_string())),
    })
    .collect()
}

async fn post_search(state: AppState, body: Body) -> (StatusCode, Value) {
  let request = Request::builder()
    .method("POST")
    .uri("/search")
    .header("content-type", "application/json")
    .body(body)
    .unwrap();

  let response = create_router(state).oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_story(state: AppState, body: Value) -> (StatusCode, Value) {
  post_search(state, Body::from(body.to_string())).await
}

/// Five scored criteria, an overall score, three recommendations and a summary
fn matches_review_format(text: &str) -> bool {
  let lines: Vec<&str> = text.lines().collect();
  if lines.len() < 15 || lines[0] != "PARAMETER SCORES:" {
    return false;
  }

  let scores_ok = CRITERIA.iter().enumerate().all(|(i, criterion)| {
    lines[i + 1]
      .strip_prefix(&format!("• {}: ", criterion.label))
      .and_then(|rest| rest.strip_suffix("/20"))
      .and_then(|score| score.trim().parse::<u8>().ok())
      .is_some_and(|score| score <= 20)
  });
  let overall_ok = lines[6]
    .strip_prefix("• Overall Score: ")
    .and_then(|rest| rest.strip_suffix("/100"))
    .and_then(|score| score.parse::<u8>().ok())
    .is_some_and(|score| score <= 100);

  scores_ok
    && overall_ok
    && lines[8] == "IMPROVEMENT RECOMMENDATIONS:"
    && lines[9..12].iter().all(|line| line.starts_with("• "))
    && lines[13] == "SUMMARY:"
    && !lines[14].is_empty()
}

// Validation
// ==========

#[tokio::test]
async fn test_empty_story_is_rejected_without_downstream_calls() {
  let harness = Harness::new();
  let (status, body) = post_story(harness.state(), json!({ "userStory": "" })).await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "error": "userStory required" }));
  assert_eq!(harness.downstream_calls(), 0);
}

#[tokio::test]
async fn test_whitespace_and_missing_story_are_rejected() {
  for payload in [json!({ "userStory": "   \n\t" }), json!({}), json!({ "userStory": null })] {
    let harness = Harness::new();
    let (status, body) = post_story(harness.state(), payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "userStory required");
    assert_eq!(harness.downstream_calls(), 0);
  }
}

#[tokio::test]
async fn test_unreadable_body_is_a_validation_error() {
  let harness = Harness::new();
  let (status, body) = post_search(harness.state(), Body::from("{not json")).await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "error": "userStory required" }));
  assert_eq!(harness.downstream_calls(), 0);
}

// Successful reviews
// ==================

#[tokio::test]
async fn test_nurse_story_returns_default_k_related_stories() {
  let harness = Harness::new();
  let (status, body) = post_story(harness.state(), json!({ "userStory": NURSE_STORY })).await;

  assert_eq!(status, StatusCode::OK);
  let review = body["reviewSummary"].as_str().unwrap();
  assert_eq!(review, MODEL_REVIEW);
  assert!(matches_review_format(review));

  let related = body["relatedStories"].as_array().unwrap();
  assert_eq!(related.len(), 4);
  for (i, story) in related.iter().enumerate() {
    let object = story.as_object().unwrap();
    assert_eq!(object.len(), 4);
    assert_eq!(story["storyId"], json!(format!("HC-{}", i + 1)));
    assert_eq!(story["projectName"], "Vitals Capture");
    assert_eq!(story["priority"], "High");
    assert!(object.contains_key("summary"));
  }
}

#[tokio::test]
async fn test_narrative_sees_at_most_three_stories_with_risk() {
  let harness = Harness::new();
  let (status, _) = post_story(harness.state(), json!({ "userStory": NURSE_STORY })).await;
  assert_eq!(status, StatusCode::OK);

  let seen = harness.narrator.seen.lock().unwrap();
  assert_eq!(seen.len(), 3);
  assert_eq!(seen[0].story_id, "HC-1");
  assert_eq!(seen[2].story_id, "HC-3");
  assert!(seen.iter().all(|story| story.risk == Some(json!("Patient safety"))));
}

#[tokio::test]
async fn test_fewer_matches_than_k() {
  let mut harness = Harness::new();
  harness.vectors = Arc::new(FakeVectors {
    calls: AtomicUsize::new(0),
    records: stored_stories(2),
    failure: None,
  });

  let (status, body) = post_story(harness.state(), json!({ "userStory": NURSE_STORY })).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["relatedStories"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_generation_failure_still_answers_with_fallback() {
  let mut harness = Harness::new();
  harness.narrator = Arc::new(FakeNarrator {
    calls: AtomicUsize::new(0),
    seen: Mutex::new(Vec::new()),
    reply: None,
  });

  let (status, body) = post_story(harness.state(), json!({ "userStory": NURSE_STORY })).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["reviewSummary"], json!(fallback_review()));
  assert!(matches_review_format(&fallback_review()));
  assert_eq!(body["relatedStories"].as_array().unwrap().len(), 4);
}

// Upstream failures
// =================

#[tokio::test]
async fn test_embedding_failure_is_server_error_with_details() {
  let mut harness = Harness::new();
  harness.embeddings = Arc::new(FakeEmbeddings {
    calls: AtomicUsize::new(0),
    outcome: || {
      Err(ReviewError::upstream_with_details(
        "Embedding request failed with status 401 Unauthorized",
        json!({ "message": "Unauthorized", "request_id": "abc" }),
      ))
    },
  });

  let (status, body) = post_story(harness.state(), json!({ "userStory": NURSE_STORY })).await;

  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body["error"], "Embedding request failed with status 401 Unauthorized");
  assert_eq!(body["details"], json!({ "message": "Unauthorized", "request_id": "abc" }));
  assert_eq!(harness.vectors.calls.load(Ordering::SeqCst), 0);
  assert_eq!(harness.narrator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_failure_is_server_error_without_details() {
  let mut harness = Harness::new();
  harness.vectors = Arc::new(FakeVectors {
    calls: AtomicUsize::new(0),
    records: Vec::new(),
    failure: Some("Server selection timeout: No available servers"),
  });

  let (status, body) = post_story(harness.state(), json!({ "userStory": NURSE_STORY })).await;

  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body, json!({ "error": "Server selection timeout: No available servers" }));
  assert_eq!(harness.narrator.calls.load(Ordering::SeqCst), 0);
}

// Health
// ======

#[tokio::test]
async fn test_health_endpoint() {
  let harness = Harness::new();
  let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

  let response = create_router(harness.state()).oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);

  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert_eq!(body["status"], "ok");
  assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
  assert_eq!(harness.downstream_calls(), 0);
}
