//! Helpers for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use pushkind_inventory::notify::{Notifier, Severity};
use serde::Deserialize;
use serde_json::{Value, json};

/// In-process stand-in for the remote catalog API, served on an ephemeral port.
pub struct FakeCatalog {
    /// Base URL to hand to the repository, including the API prefix.
    pub base_url: String,
    pub state: web::Data<CatalogState>,
    handle: ServerHandle,
}

pub struct CatalogState {
    products: Mutex<Vec<Value>>,
    requests: Mutex<Vec<String>>,
    next_id: AtomicI64,
    fail_search: AtomicBool,
}

impl CatalogState {
    fn seeded() -> Self {
        let products = (1..=12)
            .map(|id| {
                let title = if id % 2 == 0 {
                    format!("Running Shoes {id}")
                } else {
                    format!("Cotton Shirt {id}")
                };
                json!({
                    "id": id,
                    "title": title,
                    "slug": format!("product-{id}"),
                    "price": 10 * id,
                    "description": format!("Description {id}"),
                    "category": category(if id % 2 == 0 { 4 } else { 1 }),
                    "images": [format!("https://i.imgur.com/{id}.png")],
                    "creationAt": format!("2024-03-{:02}T09:30:00.000Z", id),
                    "updatedAt": format!("2024-03-{:02}T09:30:00.000Z", id),
                })
            })
            .collect();

        Self {
            products: Mutex::new(products),
            requests: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(100),
            fail_search: AtomicBool::new(false),
        }
    }

    /// Requests received so far, as `METHOD /path?query`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().expect("requests lock").clear();
    }

    pub fn fail_search(&self, fail: bool) {
        self.fail_search.store(fail, Ordering::SeqCst);
    }

    pub fn product_count(&self) -> usize {
        self.products.lock().expect("products lock").len()
    }

    fn record(&self, req: &HttpRequest) {
        self.requests
            .lock()
            .expect("requests lock")
            .push(format!("{} {}", req.method(), req.uri()));
    }
}

fn category(id: i64) -> Value {
    let name = match id {
        1 => "Clothes",
        2 => "Electronics",
        3 => "Furniture",
        4 => "Shoes",
        _ => "Others",
    };
    json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase(),
        "image": format!("https://i.imgur.com/category-{id}.png"),
        "creationAt": "2024-01-01T00:00:00.000Z",
    })
}

#[derive(Deserialize)]
struct ListParams {
    offset: Option<usize>,
    limit: Option<usize>,
    title: Option<String>,
}

async fn list_products(
    req: HttpRequest,
    params: web::Query<ListParams>,
    state: web::Data<CatalogState>,
) -> HttpResponse {
    state.record(&req);

    if let Some(title) = params.title.as_ref() {
        if state.fail_search.load(Ordering::SeqCst) {
            return HttpResponse::InternalServerError().body("search unavailable");
        }
        let needle = title.to_lowercase();
        let found: Vec<Value> = state
            .products
            .lock()
            .expect("products lock")
            .iter()
            .filter(|product| {
                product["title"]
                    .as_str()
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        return HttpResponse::Ok().json(found);
    }

    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(10);
    let page: Vec<Value> = state
        .products
        .lock()
        .expect("products lock")
        .iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();
    HttpResponse::Ok().json(page)
}

fn product_from_draft(id: i64, draft: &Value) -> Value {
    json!({
        "id": id,
        "title": draft["title"],
        "price": draft["price"],
        "description": draft["description"],
        "category": category(draft["categoryId"].as_i64().unwrap_or(5)),
        "images": draft["images"],
        "creationAt": "2024-04-01T12:00:00.000Z",
        "updatedAt": "2024-04-01T12:00:00.000Z",
    })
}

async fn create_product(
    req: HttpRequest,
    body: web::Json<Value>,
    state: web::Data<CatalogState>,
) -> HttpResponse {
    state.record(&req);

    if body["title"].as_str().is_none_or(str::is_empty) {
        return HttpResponse::BadRequest().json(json!({ "message": ["title should not be empty"] }));
    }

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let product = product_from_draft(id, &body);
    state
        .products
        .lock()
        .expect("products lock")
        .push(product.clone());
    HttpResponse::Created().json(product)
}

async fn update_product(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<Value>,
    state: web::Data<CatalogState>,
) -> HttpResponse {
    state.record(&req);

    let id = path.into_inner();
    let mut products = state.products.lock().expect("products lock");
    match products.iter_mut().find(|product| product["id"] == id) {
        Some(product) => {
            *product = product_from_draft(id, &body);
            HttpResponse::Ok().json(product.clone())
        }
        None => HttpResponse::NotFound().finish(),
    }
}

async fn delete_product(
    req: HttpRequest,
    path: web::Path<i64>,
    state: web::Data<CatalogState>,
) -> HttpResponse {
    state.record(&req);

    let id = path.into_inner();
    let mut products = state.products.lock().expect("products lock");
    let before = products.len();
    products.retain(|product| product["id"] != id);
    if products.len() == before {
        HttpResponse::NotFound().finish()
    } else {
        HttpResponse::Ok().json(true)
    }
}

async fn list_categories(req: HttpRequest, state: web::Data<CatalogState>) -> HttpResponse {
    state.record(&req);
    let categories: Vec<Value> = (1..=5).map(category).collect();
    HttpResponse::Ok().json(categories)
}

impl FakeCatalog {
    /// Start the fake catalog. Must be called from within an actix system.
    pub fn start() -> Self {
        let state = web::Data::new(CatalogState::seeded());
        let app_state = state.clone();

        let server = HttpServer::new(move || {
            App::new().app_data(app_state.clone()).service(
                web::scope("/api/v1")
                    .route("/products", web::get().to(list_products))
                    .route("/products", web::post().to(create_product))
                    .route("/products/{id}", web::put().to(update_product))
                    .route("/products/{id}", web::delete().to(delete_product))
                    .route("/categories", web::get().to(list_categories)),
            )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind fake catalog");

        let address = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        FakeCatalog {
            base_url: format!("http://{address}/api/v1"),
            state,
            handle,
        }
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// Notifier that keeps every notification for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notes: Mutex<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    pub fn notes(&self) -> Vec<(Severity, String)> {
        self.notes.lock().expect("notes lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.notes
            .lock()
            .expect("notes lock")
            .push((severity, message.to_string()));
    }
}
