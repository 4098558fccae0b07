//! In-process mock of the clinic backends.
//!
//! One axum router serves every service under `/api`, so all three base
//! URLs can point at the same listener.

#![allow(dead_code)]

use axum::extract::{Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use clinica_client::config::ServiceSettings;
use clinica_client::{App, ClientConfig, MemoryTokenStore, TokenStore};
use clinica_core::AuthMode;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TOKEN: &str = "token-123";
pub const REFRESH: &str = "refresh-456";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct MockBackend {
    pub pacientes: Mutex<Vec<Value>>,
    pub contactos: Mutex<HashMap<String, Value>>,
    pub consultas: Mutex<Vec<Value>>,
    pub requests: Mutex<Vec<Recorded>>,
    /// Forced status for `GET /pacientes/{id}/contacto`.
    pub contacto_status: Mutex<Option<u16>>,
    /// Milliseconds to stall a patient search, by query.
    pub search_delays: Mutex<HashMap<String, u64>>,
    /// Paths whose POST answers 405.
    pub post_not_allowed: Mutex<HashSet<String>>,
    pub logout_fails: AtomicBool,
    pub contacto_save_fails: AtomicBool,
    /// Per-path stalls, consumed one per request.
    pub delays: Mutex<HashMap<String, VecDeque<u64>>>,
}

impl MockBackend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn find(&self, method: &str, path: &str) -> Option<Recorded> {
        self.requests()
            .into_iter()
            .find(|r| r.method == method && r.path == path)
    }

    /// Stall the next request to `path` by `ms` after its response is built.
    pub fn delay_next(&self, path: &str, ms: u64) {
        self.delays
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(ms);
    }

    pub fn seed_contacto(&self, paciente_id: &str, telefono: &str) {
        self.contactos.lock().unwrap().insert(
            paciente_id.to_string(),
            json!({ "pacienteId": paciente_id, "telefono": telefono }),
        );
    }

    pub fn seed_paciente(&self, id: &str, nombre: &str, documento: &str) {
        self.pacientes.lock().unwrap().push(json!({
            "id": id,
            "nombre": nombre,
            "tipoDocumento": "DNI",
            "documento": documento,
        }));
    }
}

pub struct TestBackend {
    pub base_url: String,
    pub mock: Arc<MockBackend>,
}

impl TestBackend {
    pub fn config(&self, mode: AuthMode) -> ClientConfig {
        let service = ServiceSettings {
            base_url: self.base_url.clone(),
            verb_fallback: false,
        };
        let mut config = ClientConfig::default();
        config.services.pacientes = service.clone();
        config.services.consultas = service.clone();
        config.services.orquestador = service;
        config.http.timeout_ms = 5_000;
        config.auth.mode = mode;
        config
    }

    pub fn app(&self, mode: AuthMode) -> App {
        self.app_with(self.config(mode))
    }

    pub fn app_with(&self, config: ClientConfig) -> App {
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        App::with_tokens(config, tokens).unwrap()
    }
}

/// Start the mock on a random port.
pub async fn start_backend() -> TestBackend {
    let mock = Arc::new(MockBackend::default());

    let api = Router::new()
        .route("/pacientes", get(list_pacientes).post(create_paciente).put(put_paciente_collection))
        .route("/pacientes/search", get(search_pacientes))
        .route(
            "/pacientes/{id}",
            get(get_paciente)
                .put(update_paciente)
                .patch(update_paciente)
                .delete(delete_paciente),
        )
        .route("/pacientes/{id}/contacto", get(get_contacto).post(save_contacto))
        .route("/pacientes/{id}/consultas", get(consultas_de_paciente))
        .route("/consultas", get(list_consultas).post(create_consulta))
        .route("/consultas/{id}/estado", patch(update_estado_consulta))
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/system/health", get(system_health))
        .route("/dashboard", get(dashboard))
        .route("/reportes/consultas", get(reporte_consultas))
        .route("/usuarios/{id}/notificaciones", get(notificaciones))
        .route("/notificaciones/{id}/leer", patch(marcar_leida));

    let app = Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(mock.clone(), record))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend {
        base_url: format!("http://{}/api", addr),
        mock,
    }
}

type Mock = State<Arc<MockBackend>>;

async fn record(State(mock): Mock, request: Request, next: Next) -> Response {
    let path = request.uri().path().trim_start_matches("/api").to_string();
    let query = request.uri().query().map(str::to_string);
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    mock.requests.lock().unwrap().push(Recorded {
        method: request.method().to_string(),
        path,
        query,
        authorization,
    });

    next.run(request).await
}

async fn stall(mock: &MockBackend, path: &str) {
    let delay = mock
        .delays
        .lock()
        .unwrap()
        .get_mut(path)
        .and_then(VecDeque::pop_front);
    if let Some(ms) = delay {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": format!("{} no encontrado", what) }))).into_response()
}

fn rejects_post(mock: &MockBackend, path: &str) -> bool {
    mock.post_not_allowed.lock().unwrap().contains(path)
}

fn insert_paciente(mock: &MockBackend, mut body: Value) -> Response {
    body["id"] = json!(uuid::Uuid::new_v4().to_string());
    mock.pacientes.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn list_pacientes(State(mock): Mock) -> Json<Vec<Value>> {
    Json(mock.pacientes.lock().unwrap().clone())
}

async fn create_paciente(State(mock): Mock, Json(body): Json<Value>) -> Response {
    if rejects_post(&mock, "/pacientes") {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }
    insert_paciente(&mock, body)
}

async fn put_paciente_collection(State(mock): Mock, Json(body): Json<Value>) -> Response {
    insert_paciente(&mock, body)
}

async fn search_pacientes(State(mock): Mock, Query(params): Query<HashMap<String, String>>) -> Json<Vec<Value>> {
    let q = params.get("q").cloned().unwrap_or_default().to_lowercase();
    let delay = mock.search_delays.lock().unwrap().get(&q).copied();
    let matches: Vec<Value> = mock
        .pacientes
        .lock()
        .unwrap()
        .iter()
        .filter(|p| {
            p["nombre"]
                .as_str()
                .is_some_and(|n| n.to_lowercase().contains(&q))
        })
        .cloned()
        .collect();

    if let Some(ms) = delay {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
    Json(matches)
}

async fn get_paciente(State(mock): Mock, Path(id): Path<String>) -> Response {
    let found = mock
        .pacientes
        .lock()
        .unwrap()
        .iter()
        .find(|p| p["id"] == id)
        .cloned();
    match found {
        Some(p) => Json(p).into_response(),
        None => not_found("Paciente"),
    }
}

async fn update_paciente(State(mock): Mock, Path(id): Path<String>, Json(mut body): Json<Value>) -> Response {
    let mut pacientes = mock.pacientes.lock().unwrap();
    match pacientes.iter_mut().find(|p| p["id"] == id) {
        Some(slot) => {
            body["id"] = json!(id);
            *slot = body.clone();
            Json(body).into_response()
        }
        None => not_found("Paciente"),
    }
}

async fn delete_paciente(State(mock): Mock, Path(id): Path<String>) -> StatusCode {
    let mut pacientes = mock.pacientes.lock().unwrap();
    let before = pacientes.len();
    pacientes.retain(|p| p["id"] != id);
    if pacientes.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn get_contacto(State(mock): Mock, Path(id): Path<String>) -> Response {
    let forced = *mock.contacto_status.lock().unwrap();
    let response = if let Some(status) = forced {
        let status = StatusCode::from_u16(status).unwrap();
        (status, Json(json!({ "message": status.canonical_reason() }))).into_response()
    } else {
        let found = mock.contactos.lock().unwrap().get(&id).cloned();
        match found {
            Some(contacto) => Json(contacto).into_response(),
            None => not_found("Contacto"),
        }
    };
    stall(&mock, &format!("/pacientes/{}/contacto", id)).await;
    response
}

async fn save_contacto(State(mock): Mock, Path(id): Path<String>, Json(mut body): Json<Value>) -> Response {
    if mock.contacto_save_fails.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "No se pudo guardar" }))).into_response();
    }
    body["pacienteId"] = json!(id);
    mock.contactos.lock().unwrap().insert(id, body.clone());
    Json(body).into_response()
}

async fn consultas_de_paciente(State(mock): Mock, Path(id): Path<String>) -> Json<Vec<Value>> {
    Json(
        mock.consultas
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c["pacienteId"] == id)
            .cloned()
            .collect(),
    )
}

async fn list_consultas(State(mock): Mock) -> Json<Vec<Value>> {
    Json(mock.consultas.lock().unwrap().clone())
}

async fn create_consulta(State(mock): Mock, Json(mut body): Json<Value>) -> Response {
    body["id"] = json!(uuid::Uuid::new_v4().to_string());
    mock.consultas.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_estado_consulta(State(mock): Mock, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let mut consultas = mock.consultas.lock().unwrap();
    match consultas.iter_mut().find(|c| c["id"] == id) {
        Some(slot) => {
            slot["estado"] = body["estado"].clone();
            Json(slot.clone()).into_response()
        }
        None => not_found("Consulta"),
    }
}

fn usuario() -> Value {
    json!({
        "id": 7,
        "email": "ana@clinica.pe",
        "nombre": "Ana",
        "apellido": "Torres",
        "role": "medico"
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == "ana@clinica.pe" && body["password"] == "secreta" {
        Json(json!({ "token": TOKEN, "refreshToken": REFRESH, "user": usuario() })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Credenciales inválidas" }))).into_response()
    }
}

async fn profile(request: Request) -> Response {
    let bearer = format!("Bearer {}", TOKEN);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(bearer.as_str());
    if authorized {
        Json(usuario()).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn logout(State(mock): Mock) -> StatusCode {
    if mock.logout_fails.load(Ordering::SeqCst) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn refresh_token(Json(body): Json<Value>) -> Response {
    if body["refreshToken"] == REFRESH {
        Json(json!({ "token": "token-789" })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn system_health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "servicios": {
                "pacientes": { "status": "up", "latencia": 12.5, "ultimaActualizacion": "2025-03-10T19:30:00Z" },
                "consultas": { "status": "down", "latencia": 0, "ultimaActualizacion": "2025-03-10T19:30:00Z" }
            },
            "general": "degraded"
        }
    }))
}

async fn dashboard(State(mock): Mock) -> Json<Value> {
    let total_pacientes = mock.pacientes.lock().unwrap().len();
    stall(&mock, "/dashboard").await;
    Json(json!({
        "success": true,
        "data": {
            "totalPacientes": total_pacientes,
            "totalConsultas": 0,
            "consultasPorEstado": { "pendiente": 0 },
            "consultasRecientes": []
        }
    }))
}

async fn reporte_consultas(Query(params): Query<HashMap<String, String>>) -> Response {
    if !params.contains_key("startDate") || !params.contains_key("endDate") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Rango de fechas requerido" }))).into_response();
    }
    let bucket = |key: &str, fallback: &str| {
        let mut map = serde_json::Map::new();
        let name = params.get(key).map(String::as_str).unwrap_or(fallback);
        map.insert(name.to_string(), json!(3));
        Value::Object(map)
    };
    Json(json!({
        "success": true,
        "data": {
            "totalConsultas": 3,
            "consultasPorEspecialidad": bucket("especialidad", "general"),
            "consultasPorEstado": bucket("estado", "pendiente"),
            "consultasPorDia": bucket("startDate", "")
        }
    }))
    .into_response()
}

async fn notificaciones(Path(id): Path<String>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "notificaciones": [
                { "id": 1, "tipo": "consulta", "mensaje": format!("Consulta asignada a {}", id), "leida": false, "fecha": "2025-03-10T19:30:00Z" },
                { "id": 2, "tipo": "examen", "mensaje": "Resultado disponible", "leida": true, "fecha": "2025-03-09T10:00:00Z" }
            ],
            "noLeidas": 1
        }
    }))
}

async fn marcar_leida(Path(_id): Path<String>, Json(body): Json<Value>) -> Response {
    if body != json!({}) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Cuerpo inesperado" }))).into_response();
    }
    Json(json!({ "success": true, "data": { "success": true } })).into_response()
}
