// common/mod.rs - Shared test utilities
//
// Fake backends are small axum routers bound to an ephemeral port; each test
// gets its own server, so tests never share state.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use serde_json::{json, Value};

/// Serve `app` on 127.0.0.1 with an OS-assigned port and return its base URL
pub async fn start_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// HTTP client with a short timeout for tests
pub fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Query strings received by a fake server, in arrival order
#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl Recorder {
    pub fn record(&self, query: HashMap<String, String>) {
        self.requests.lock().unwrap().push(query);
    }

    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> HashMap<String, String> {
        self.requests.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

/// Product in the REST backend's JSON shape
pub fn rest_product(id: &str, title: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} hecha a mano"),
        "price": price,
        "image": format!("https://cdn.example.com/{id}.jpg"),
    })
}

/// One REST listing page
pub fn rest_page(items: Vec<Value>, page: u32, per_page: u32, total_items: u64) -> Value {
    json!({
        "items": items,
        "page": page,
        "perPage": per_page,
        "totalItems": total_items,
        "totalPages": 0,
    })
}

/// Product record in PocketBase's JSON shape
pub fn pocketbase_record(id: &str, title: &str, price: f64, image: &str) -> Value {
    json!({
        "id": id,
        "collectionId": "pbc_products",
        "collectionName": "products",
        "title": title,
        "description": format!("{title} personalizada"),
        "price": price,
        "image": image,
        "created": "2024-05-01 10:00:00.000Z",
        "updated": "2024-05-01 10:00:00.000Z",
    })
}
