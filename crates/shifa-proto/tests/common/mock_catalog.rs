#![allow(dead_code)]

//! In-process stand-in for the `/medecines/` catalog service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    Serve,
    /// Reply with this status and an empty body.
    Fail(u16),
    /// Reply 200 with a body that is not a list of records.
    Garbage,
}

#[derive(Clone)]
struct MockState {
    records: Arc<Vec<Value>>,
    behaviour: Behaviour,
    /// Per-page response delay, indexed by `skip / limit`.
    delays: Arc<Vec<Duration>>,
    hits: Arc<AtomicUsize>,
    last_query: Arc<std::sync::Mutex<Option<(usize, usize)>>>,
}

#[derive(Debug, Deserialize)]
struct PageParams {
    skip: usize,
    limit: usize,
}

pub struct MockCatalog {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    last_query: Arc<std::sync::Mutex<Option<(usize, usize)>>>,
    task: tokio::task::JoinHandle<()>,
}

impl MockCatalog {
    pub async fn start(records: Vec<Value>, behaviour: Behaviour) -> Self {
        Self::start_with_delays(records, behaviour, Vec::new()).await
    }

    pub async fn start_with_delays(
        records: Vec<Value>,
        behaviour: Behaviour,
        delays: Vec<Duration>,
    ) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let last_query = Arc::new(std::sync::Mutex::new(None));
        let state = MockState {
            records: Arc::new(records),
            behaviour,
            delays: Arc::new(delays),
            hits: hits.clone(),
            last_query: last_query.clone(),
        };
        let app = Router::new()
            .route("/medecines/", get(list_medicines))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock catalog");
        let addr = listener.local_addr().expect("mock catalog addr");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
            last_query,
            task,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<(usize, usize)> {
        *self.last_query.lock().unwrap()
    }
}

impl Drop for MockCatalog {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn list_medicines(
    State(state): State<MockState>,
    Query(params): Query<PageParams>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_query.lock().unwrap() = Some((params.skip, params.limit));

    if params.limit > 0 {
        if let Some(delay) = state.delays.get(params.skip / params.limit) {
            tokio::time::sleep(*delay).await;
        }
    }

    match state.behaviour {
        Behaviour::Fail(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Behaviour::Garbage => Json(json!({"detail": "not a page"})).into_response(),
        Behaviour::Serve => {
            let page: Vec<Value> = state
                .records
                .iter()
                .skip(params.skip)
                .take(params.limit)
                .cloned()
                .collect();
            Json(page).into_response()
        }
    }
}

/// A record shaped like the real service output.
pub fn record(id: i64, name: &str, class: &str) -> Value {
    json!({
        "id": id,
        "CODE": 6118000000000i64 + id,
        "SPECIALITE": name,
        "DOSAGE": "500 MG",
        "FORME": "COMPRIME",
        "PRESENTATION": "BOITE DE 20",
        "SUBSTANCE_ACTIVE": "PARACETAMOL",
        "CLASSE_THERAPEUTIQUE": class,
        "PPV": 12.5,
        "PH": 8.1,
        "STATUT_AMM": "AMM",
        "STATUT_COMMERCIALISATION": "Commercialisé",
    })
}

/// `count` records; index `special_at` (if any) is named `special_name`.
pub fn catalog(count: i64, special: Option<(i64, &str)>) -> Vec<Value> {
    (1..=count)
        .map(|id| match special {
            Some((at, name)) if at == id => record(id, name, "ANTALGIQUES"),
            _ => record(id, &format!("SPECIALITE {}", id), "DIVERS"),
        })
        .collect()
}
