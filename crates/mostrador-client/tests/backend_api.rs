//! Client round trips against an in-process backend.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use mostrador_client::{ApiClient, CatalogSession, ClientConfig, ClientError};
use mostrador_core::sale::SaleRecord;
use mostrador_core::stock::StockIngressInput;
use mostrador_core::{AssignError, BandRule, Money, PaymentMethod};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

// =============================================================================
// Fake backend
// =============================================================================

#[derive(Clone, Default)]
struct Backend {
    pending: Arc<Mutex<Vec<Value>>>,
    exported: Arc<Mutex<Vec<Value>>>,
}

async fn catalogo() -> Json<Value> {
    Json(json!({
        "productos_por_id": {
            "A1": {"nombre": "Aritos Rango de precio 1"},
            "A2": {"nombre": "Aritos Rango de precio 2"},
            "A3": {"nombre": "Aritos Rango de precio 3"},
            "AN1": {"nombre": "Anillos Rango de precio 1"},
            "AN2": {"nombre": "Anillos Rango de precio 2"}
        }
    }))
}

async fn rangos() -> Json<Value> {
    Json(json!({
        "rangos": {
            "A": [0, 8000, 11600],
            "AN": [3000, 1000]
        }
    }))
}

async fn rangos_down() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "hoja de rangos no disponible"})),
    )
}

async fn stock_actual() -> Json<Value> {
    Json(json!({
        "success": true,
        "rows": [
            {"id_articulo": "A1", "cantidad_total": "3", "costo_promedio": 1200.5, "tipo": "Aritos"},
            {"id_articulo": "A2", "cantidad_total": 0, "costo_promedio": null, "tipo": "Aritos"}
        ]
    }))
}

async fn ingresos() -> Json<Value> {
    Json(json!({"success": false, "error": "hoja protegida"}))
}

async fn crear_ingreso(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["costo_total"].as_f64() == Some(3000.0) && body["id_articulo"] == "A1" {
        (StatusCode::CREATED, Json(json!({"success": true})))
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({"error": "payload inesperado"})))
    }
}

async fn borrar_ingreso(Path(_id): Path<i64>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Ingreso no encontrado"})),
    )
}

async fn listar_ventas(State(backend): State<Backend>) -> Json<Value> {
    let pending = backend.pending.lock().unwrap().clone();
    Json(Value::Array(pending))
}

async fn agregar_venta(
    State(backend): State<Backend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.pending.lock().unwrap().push(body);
    (StatusCode::CREATED, Json(json!({"message": "Venta agregada"})))
}

async fn actualizar_venta(
    State(backend): State<Backend>,
    Path(index): Path<usize>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut pending = backend.pending.lock().unwrap();
    match pending.get_mut(index) {
        Some(slot) => {
            *slot = body;
            (StatusCode::OK, Json(json!({"message": "Venta actualizada"})))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Índice fuera de rango"})),
        ),
    }
}

async fn eliminar_venta(
    State(backend): State<Backend>,
    Path(index): Path<usize>,
) -> (StatusCode, Json<Value>) {
    let mut pending = backend.pending.lock().unwrap();
    if index < pending.len() {
        pending.remove(index);
        (StatusCode::OK, Json(json!({"message": "Venta eliminada"})))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Índice fuera de rango"})),
        )
    }
}

async fn vaciar_ventas(State(backend): State<Backend>) -> Json<Value> {
    backend.pending.lock().unwrap().clear();
    Json(json!({"message": "Ventas vaciadas"}))
}

async fn exportar(State(backend): State<Backend>) -> Json<Value> {
    let pending = backend.pending.lock().unwrap().clone();
    let count = pending.len();
    backend.exported.lock().unwrap().extend(pending);
    Json(json!({"success": true, "message": format!("Exportadas {count} ventas")}))
}

async fn historial(State(backend): State<Backend>) -> Json<Value> {
    let exported = backend.exported.lock().unwrap().clone();
    let mut days = serde_json::Map::new();
    for sale in exported {
        let key = sale["fecha"].as_str().unwrap_or("sin-fecha").to_string();
        days.entry(key)
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .unwrap()
            .push(sale);
    }
    Json(Value::Object(days))
}

fn router(backend: Backend, ranges_up: bool) -> Router {
    let router = Router::new()
        .route("/api/catalogo", get(catalogo))
        .route("/api/stock/actual", get(stock_actual))
        .route("/api/stock/ingresos", get(ingresos).post(crear_ingreso))
        .route("/api/stock/ingresos/{id}", delete(borrar_ingreso))
        .route(
            "/api/ventas",
            get(listar_ventas).post(agregar_venta).delete(vaciar_ventas),
        )
        .route(
            "/api/ventas/{index}",
            put(actualizar_venta).delete(eliminar_venta),
        )
        .route("/api/exportar", post(exportar))
        .route("/api/historial", get(historial));

    let router = if ranges_up {
        router.route("/api/rangos", get(rangos))
    } else {
        router.route("/api/rangos", get(rangos_down))
    };
    router.with_state(backend)
}

struct TestServer {
    client: ApiClient,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(ranges_up: bool) -> Self {
        let app = router(Backend::default(), ranges_up);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = ClientConfig {
            api_url: format!("http://{addr}/"),
            timeout_secs: 5,
            ..ClientConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        TestServer { client, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn sale(id: &str, price_cents: i64, units: i64, payment: PaymentMethod) -> SaleRecord {
    SaleRecord {
        date: day(),
        id: id.into(),
        name: String::new(),
        unit_price: Money::from_cents(price_cents),
        units,
        payment,
        notes: None,
        total: None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_session_assigns_from_backend_tables() {
    let server = TestServer::spawn(true).await;
    let session = CatalogSession::load(&server.client, BandRule::LowerBoundInclusive)
        .await
        .unwrap();

    assert_eq!(session.catalog().len(), 5);
    assert_eq!(session.product_types(), vec!["Anillos", "Aritos"]);
    assert_eq!(session.assign("Aritos", 5000.0), Ok("A1"));
    assert_eq!(session.assign("Aritos Rango de precio 2", 9000.0), Ok("A2"));
    assert_eq!(session.assign("Aritos", 20000.0), Ok("A3"));
    assert_eq!(session.assign("Aritos", 99999.0), Ok("A3"));

    // AN thresholds are descending and get rejected at load
    assert_eq!(
        session.assign("Anillos", 500.0),
        Err(AssignError::NoRanges("AN".to_string()))
    );
}

#[tokio::test]
async fn test_session_survives_missing_ranges() {
    let server = TestServer::spawn(false).await;

    let err = server.client.price_ranges().await.unwrap_err();
    assert!(
        matches!(&err, ClientError::Api { status: 500, message } if message == "hoja de rangos no disponible")
    );
    assert!(err.is_transient());

    let session = CatalogSession::load(&server.client, BandRule::default())
        .await
        .unwrap();
    assert!(session.ranges().is_empty());
    assert_eq!(session.product_types(), vec!["Anillos", "Aritos"]);
    assert_eq!(
        session.assign("Aritos", 5000.0),
        Err(AssignError::NoRanges("A".to_string()))
    );
}

#[tokio::test]
async fn test_stock_endpoints() {
    let server = TestServer::spawn(true).await;

    let levels = server.client.stock_levels().await.unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].quantity, 3);
    assert_eq!(levels[0].average_cost, Money::from_cents(120_050));
    assert_eq!(levels[1].average_cost, Money::zero());

    let err = server.client.stock_ingresses().await.unwrap_err();
    assert!(matches!(err, ClientError::Core(_) | ClientError::Rejected(_)));

    let ingress = StockIngressInput {
        date: Some(day()),
        article_id: "a1".into(),
        product_type: "Aritos".into(),
        unit_cost: Some(1000.0),
        quantity: 3,
        ..StockIngressInput::default()
    }
    .build()
    .unwrap();
    server.client.create_ingress(&ingress).await.unwrap();

    let err = server.client.delete_ingress(42).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(m) if m == "Ingreso no encontrado"));
}

#[tokio::test]
async fn test_pending_sales_lifecycle() {
    let server = TestServer::spawn(true).await;
    let client = &server.client;

    assert!(client.sales().await.unwrap().is_empty());

    client
        .add_sale(&sale("A1", 5_000, 2, PaymentMethod::Efectivo))
        .await
        .unwrap();
    client
        .add_sale(&sale("AN1", 3_000, -1, PaymentMethod::Debito))
        .await
        .unwrap();

    let sales = client.sales().await.unwrap();
    assert_eq!(sales.len(), 2);
    assert_eq!(sales[0].unit_price, Money::from_cents(5_000));
    assert_eq!(sales[1].units, -1);

    client
        .update_sale(1, &sale("AN2", 3_500, 1, PaymentMethod::Credito))
        .await
        .unwrap();
    assert_eq!(client.sales().await.unwrap()[1].id, "AN2");

    let err = client.delete_sale(7).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(m) if m == "Índice fuera de rango"));

    client.delete_sale(1).await.unwrap();
    let outcome = client.export().await.unwrap();
    assert_eq!(outcome.message.as_deref(), Some("Exportadas 1 ventas"));

    // Export clears the pending list
    assert!(client.sales().await.unwrap().is_empty());

    let history = client.history().await.unwrap();
    let exported = history.sales_on(day());
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0].line_total(), Some(Money::from_cents(10_000)));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let config = ClientConfig {
        api_url: "http://127.0.0.1:9".into(),
        timeout_secs: 2,
        ..ClientConfig::default()
    };
    let client = ApiClient::new(&config).unwrap();
    let err = client.catalog().await.unwrap_err();
    assert!(err.is_transient());
}
