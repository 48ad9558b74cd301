use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::forms::DATE_FORMAT;
use crate::transport::{ApiRequest, ApiResponse, ChannelTransport, Method, TransportRequest};

// =============================================================================
// 1. COLLECTION SCHEMAS
// =============================================================================

/// What a write to one collection must carry.
struct Schema {
    name: &'static str,
    /// Writable fields. All are required except `write_only` ones on update.
    fields: &'static [&'static str],
    /// Accepted on writes, never returned.
    write_only: &'static [&'static str],
    /// `(field, collection)` foreign keys.
    references: &'static [(&'static str, &'static str)],
    /// Collections whose records point here and go away with it.
    dependents: &'static [(&'static str, &'static str)],
}

static SCHEMAS: [Schema; 4] = [
    Schema {
        name: "usuario",
        fields: &["nombre", "email", "direccion", "telefono", "password", "fecha"],
        write_only: &["password"],
        references: &[],
        dependents: &[("pedido", "usuario")],
    },
    Schema {
        name: "pedido",
        fields: &["usuario", "nombre", "dni", "direccion", "telefono", "email", "fecha"],
        write_only: &[],
        references: &[("usuario", "usuario")],
        dependents: &[("detallepedido", "pedido")],
    },
    Schema {
        name: "detallepedido",
        fields: &["pedido", "producto_nombre", "cantidad", "precio"],
        write_only: &[],
        references: &[("pedido", "pedido")],
        dependents: &[],
    },
    Schema {
        name: "marca",
        fields: &["nombre", "descripcion", "fecha"],
        write_only: &[],
        references: &[],
        dependents: &[],
    },
];

fn schema(name: &str) -> Option<&'static Schema> {
    SCHEMAS.iter().find(|schema| schema.name == name)
}

type Record = Map<String, Value>;

#[derive(Default)]
struct Collection {
    records: BTreeMap<i64, Record>,
    last_id: i64,
}

impl Collection {
    fn insert(&mut self, mut record: Record) -> i64 {
        self.last_id += 1;
        let id = self.last_id;
        record.insert("id".to_string(), json!(id));
        self.records.insert(id, record);
        id
    }
}

// =============================================================================
// 2. THE BACKEND ACTOR
// =============================================================================

/// Single owner of the in-memory store. Requests arrive through a
/// [`ChannelTransport`] and are answered with the status codes of the real
/// REST backend.
pub struct MemoryBackend {
    receiver: mpsc::Receiver<TransportRequest>,
    collections: HashMap<&'static str, Collection>,
    accounts: HashMap<String, String>,
    tokens: HashSet<String>,
    issued: u64,
}

impl MemoryBackend {
    pub fn new(buffer_size: usize) -> (Self, ChannelTransport) {
        let (transport, receiver) = ChannelTransport::pair(buffer_size);
        let backend = Self {
            receiver,
            collections: SCHEMAS
                .iter()
                .map(|schema| (schema.name, Collection::default()))
                .collect(),
            accounts: HashMap::new(),
            tokens: HashSet::new(),
            issued: 0,
        };
        (backend, transport)
    }

    /// Adds a login account for `token/`.
    pub fn with_account(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.accounts.insert(username.into(), password.into());
        self
    }

    /// Stores a record as-is and returns its id, or `None` for an unknown
    /// collection or a non-object record.
    pub fn seed(&mut self, collection: &str, record: Value) -> Option<i64> {
        let schema = schema(collection)?;
        let Value::Object(mut record) = record else {
            return None;
        };
        if schema.name == "detallepedido" {
            self.denormalize_line(&mut record);
        }
        let collection = self.collections.get_mut(schema.name)?;
        Some(collection.insert(record))
    }

    /// An `admin`/`admin` account plus a few records of every kind.
    pub fn with_demo_data(mut self) -> Self {
        self.accounts.insert("admin".to_string(), "admin".to_string());
        let ana = self.seed(
            "usuario",
            json!({"nombre": "Ana Pérez", "email": "ana@example.com", "direccion": "Av. Siempre Viva 742",
                   "telefono": "555-0101", "password": "ana", "fecha": "2024-01-10"}),
        );
        let luis = self.seed(
            "usuario",
            json!({"nombre": "Luis Gómez", "email": "luis@example.com", "direccion": "Calle Falsa 123",
                   "telefono": "555-0202", "password": "luis", "fecha": "2024-02-11"}),
        );
        self.seed(
            "marca",
            json!({"nombre": "Acme", "descripcion": "Herramientas y ferretería", "fecha": "2024-03-01"}),
        );
        self.seed(
            "marca",
            json!({"nombre": "Globex", "descripcion": "Insumos de oficina", "fecha": "2024-04-15"}),
        );
        let order = self.seed(
            "pedido",
            json!({"usuario": ana, "nombre": "Ana Pérez", "dni": "30111222", "direccion": "Av. Siempre Viva 742",
                   "telefono": "555-0101", "email": "ana@example.com", "fecha": "2024-05-02"}),
        );
        self.seed(
            "pedido",
            json!({"usuario": luis, "nombre": "Luis Gómez", "dni": "28999111", "direccion": "Calle Falsa 123",
                   "telefono": "555-0202", "email": "luis@example.com", "fecha": "2024-05-20"}),
        );
        self.seed(
            "detallepedido",
            json!({"pedido": order, "producto_nombre": "Tornillo", "cantidad": 100, "precio": "0.25"}),
        );
        self.seed(
            "detallepedido",
            json!({"pedido": order, "producto_nombre": "Martillo", "cantidad": 2, "precio": "18.90"}),
        );
        self
    }

    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        info!("Memory backend started");
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Memory backend shutting down");
                    break;
                }
                message = self.receiver.recv() => {
                    let Some(TransportRequest { request, respond_to }) = message else {
                        info!("All clients dropped, memory backend stopping");
                        break;
                    };
                    let response = self.handle(request);
                    let _ = respond_to.send(Ok(response));
                }
            }
        }
    }

    /// Routes one request. Never fails: every problem is a status code.
    pub fn handle(&mut self, request: ApiRequest) -> ApiResponse {
        debug!(method = %request.method, path = %request.path, "Handling request");
        let ApiRequest {
            method,
            path,
            body,
            bearer,
        } = request;
        let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();

        let response = match segments.as_slice() {
            ["token"] => match method {
                Method::Post => self.issue_token(body),
                other => method_not_allowed(other),
            },
            ["create_super_user"] => match method {
                Method::Post => self.create_super_user(bearer, body),
                other => method_not_allowed(other),
            },
            [collection] => match schema(collection) {
                Some(schema) => match method {
                    Method::Get => self.list(schema),
                    Method::Post => self.create(schema, body),
                    other => method_not_allowed(other),
                },
                None => not_found(),
            },
            [collection, id] => match (schema(collection), id.parse::<i64>()) {
                (Some(schema), Ok(id)) => match method {
                    Method::Get => self.retrieve(schema, id),
                    Method::Put => self.update(schema, id, body),
                    Method::Delete => self.destroy(schema, id),
                    other => method_not_allowed(other),
                },
                _ => not_found(),
            },
            _ => not_found(),
        };

        if !response.is_success() {
            warn!(%method, %path, status = response.status, "Request rejected");
        }
        response
    }

    // -------------------------------------------------------------------------
    // Collections
    // -------------------------------------------------------------------------

    fn list(&self, schema: &Schema) -> ApiResponse {
        let records: Vec<Value> = self
            .records(schema.name)
            .map(|records| records.values().map(|record| public(schema, record)).collect())
            .unwrap_or_default();
        ApiResponse::ok(Value::Array(records))
    }

    fn retrieve(&self, schema: &Schema, id: i64) -> ApiResponse {
        match self.records(schema.name).and_then(|records| records.get(&id)) {
            Some(record) => ApiResponse::ok(public(schema, record)),
            None => not_found(),
        }
    }

    fn create(&mut self, schema: &Schema, body: Option<Value>) -> ApiResponse {
        let mut record = match self.validate(schema, body, true) {
            Ok(record) => record,
            Err(errors) => return ApiResponse::new(400, errors),
        };
        if schema.name == "detallepedido" {
            self.denormalize_line(&mut record);
        }
        let Some(collection) = self.collections.get_mut(schema.name) else {
            return not_found();
        };
        let id = collection.insert(record);
        info!(collection = schema.name, id, "Record created");
        self.retrieve(schema, id).with_status(201)
    }

    fn update(&mut self, schema: &Schema, id: i64, body: Option<Value>) -> ApiResponse {
        let Some(existing) = self.records(schema.name).and_then(|records| records.get(&id)).cloned() else {
            return not_found();
        };
        let mut record = match self.validate(schema, body, false) {
            Ok(record) => record,
            Err(errors) => return ApiResponse::new(400, errors),
        };
        for field in schema.write_only {
            if let (false, Some(value)) = (record.contains_key(*field), existing.get(*field)) {
                record.insert(field.to_string(), value.clone());
            }
        }
        if schema.name == "detallepedido" {
            self.denormalize_line(&mut record);
        }
        record.insert("id".to_string(), json!(id));
        if let Some(collection) = self.collections.get_mut(schema.name) {
            collection.records.insert(id, record);
        }
        info!(collection = schema.name, id, "Record updated");
        self.retrieve(schema, id)
    }

    fn destroy(&mut self, schema: &Schema, id: i64) -> ApiResponse {
        let removed = self
            .collections
            .get_mut(schema.name)
            .and_then(|collection| collection.records.remove(&id));
        if removed.is_none() {
            return not_found();
        }
        info!(collection = schema.name, id, "Record deleted");
        self.cascade(schema, id);
        ApiResponse::new(204, Value::Null)
    }

    /// Removes records that referenced a deleted one.
    fn cascade(&mut self, schema: &Schema, id: i64) {
        for (dependent, field) in schema.dependents {
            let Some(dependent_schema) = self::schema(dependent) else {
                continue;
            };
            let orphans: Vec<i64> = self
                .records(dependent)
                .map(|records| {
                    records
                        .iter()
                        .filter(|(_, record)| record.get(*field).and_then(Value::as_i64) == Some(id))
                        .map(|(orphan, _)| *orphan)
                        .collect()
                })
                .unwrap_or_default();
            for orphan in orphans {
                if let Some(collection) = self.collections.get_mut(dependent) {
                    collection.records.remove(&orphan);
                }
                debug!(collection = dependent, id = orphan, "Cascade delete");
                self.cascade(dependent_schema, orphan);
            }
        }
    }

    fn records(&self, collection: &str) -> Option<&BTreeMap<i64, Record>> {
        self.collections.get(collection).map(|collection| &collection.records)
    }

    fn exists(&self, collection: &str, id: i64) -> bool {
        self.records(collection)
            .is_some_and(|records| records.contains_key(&id))
    }

    /// Checks a write body field by field, like the backend's serializers.
    /// Errors come back as `{field: [message]}`.
    fn validate(&self, schema: &Schema, body: Option<Value>, creating: bool) -> Result<Record, Value> {
        let Some(Value::Object(body)) = body else {
            return Err(json!({"detail": "JSON inválido."}));
        };

        let mut errors = Map::new();
        let mut record = Record::new();
        for field in schema.fields {
            let optional = !creating && schema.write_only.contains(field);
            match body.get(*field) {
                None | Some(Value::Null) if optional => {}
                None | Some(Value::Null) => {
                    errors.insert(field.to_string(), json!(["Este campo es requerido."]));
                }
                Some(Value::String(text)) if text.trim().is_empty() => {
                    errors.insert(field.to_string(), json!(["Este campo no puede estar en blanco."]));
                }
                Some(value) => match self.check(schema, field, value) {
                    Ok(value) => {
                        record.insert(field.to_string(), value);
                    }
                    Err(message) => {
                        errors.insert(field.to_string(), json!([message]));
                    }
                },
            }
        }

        if errors.is_empty() {
            Ok(record)
        } else {
            Err(Value::Object(errors))
        }
    }

    /// Type and reference checks for one present value.
    fn check(&self, schema: &Schema, field: &str, value: &Value) -> Result<Value, String> {
        if let Some((_, target)) = schema.references.iter().find(|(name, _)| *name == field) {
            let id = value
                .as_i64()
                .or_else(|| value.as_str().and_then(|text| text.trim().parse().ok()));
            return match id {
                Some(id) if self.exists(target, id) => Ok(json!(id)),
                _ => Err(format!("Clave primaria \"{value}\" inválida - objeto no existe.")),
            };
        }
        match field {
            "fecha" => value
                .as_str()
                .and_then(|text| NaiveDate::parse_from_str(text, DATE_FORMAT).ok())
                .map(|_| value.clone())
                .ok_or_else(|| "Formato de fecha inválido. Use uno de estos formatos: YYYY-MM-DD.".to_string()),
            "cantidad" => value
                .as_u64()
                .map(|quantity| json!(quantity))
                .ok_or_else(|| "Introduzca un número entero válido.".to_string()),
            // Decimal columns come back as two-place strings.
            "precio" => value
                .as_f64()
                .or_else(|| value.as_str().and_then(|text| text.trim().parse().ok()))
                .filter(|price| price.is_finite() && *price >= 0.0)
                .map(|price| json!(format!("{price:.2}")))
                .ok_or_else(|| "Introduzca un número válido.".to_string()),
            _ => Ok(value.clone()),
        }
    }

    /// Copies the parent order's date and customer name onto an order line.
    fn denormalize_line(&self, line: &mut Record) {
        let order = line
            .get("pedido")
            .and_then(Value::as_i64)
            .and_then(|id| self.records("pedido")?.get(&id));
        let Some(order) = order else {
            return;
        };
        let customer = order
            .get("usuario")
            .and_then(Value::as_i64)
            .and_then(|id| self.records("usuario")?.get(&id))
            .and_then(|user| user.get("nombre"))
            .or_else(|| order.get("nombre"))
            .cloned()
            .unwrap_or(Value::Null);
        line.insert(
            "pedido_fecha".to_string(),
            order.get("fecha").cloned().unwrap_or(Value::Null),
        );
        line.insert("pedido_nombre_usuario".to_string(), customer);
    }

    // -------------------------------------------------------------------------
    // Authentication
    // -------------------------------------------------------------------------

    fn issue_token(&mut self, body: Option<Value>) -> ApiResponse {
        let (username, password) = credentials(body.as_ref());
        let valid = matches!(
            (username, password),
            (Some(username), Some(password)) if self.accounts.get(username).is_some_and(|p| p == password)
        );
        if !valid {
            return ApiResponse::new(
                401,
                json!({"detail": "No active account found with the given credentials"}),
            );
        }

        self.issued += 1;
        let access = format!("access-{}", self.issued);
        let refresh = format!("refresh-{}", self.issued);
        self.tokens.insert(access.clone());
        info!(username = username.unwrap_or_default(), "Token issued");
        ApiResponse::ok(json!({"access": access, "refresh": refresh}))
    }

    fn create_super_user(&mut self, bearer: Option<String>, body: Option<Value>) -> ApiResponse {
        if !bearer.is_some_and(|token| self.tokens.contains(&token)) {
            return ApiResponse::new(
                401,
                json!({"detail": "Las credenciales de autenticación no se proveyeron."}),
            );
        }
        let (Some(username), Some(password)) = credentials(body.as_ref()) else {
            return ApiResponse::new(400, json!({"detail": "Se requieren usuario y contraseña."}));
        };
        if self.accounts.contains_key(username) {
            return ApiResponse::new(400, json!({"detail": "El usuario ya existe."}));
        }
        self.accounts.insert(username.to_string(), password.to_string());
        info!(username, "Superuser created");
        ApiResponse::new(201, json!({"detail": "Superusuario creado correctamente."}))
    }
}

fn credentials(body: Option<&Value>) -> (Option<&str>, Option<&str>) {
    let field = |name: &str| {
        body.and_then(|body| body.get(name))
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    };
    (field("username"), field("password"))
}

/// A record as the API returns it, without write-only fields.
fn public(schema: &Schema, record: &Record) -> Value {
    let mut record = record.clone();
    for field in schema.write_only {
        record.remove(*field);
    }
    Value::Object(record)
}

fn not_found() -> ApiResponse {
    ApiResponse::new(404, json!({"detail": "No encontrado."}))
}

fn method_not_allowed(method: Method) -> ApiResponse {
    ApiResponse::new(405, json!({"detail": format!("Método \"{method}\" no permitido.")}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Transport;

    fn backend() -> MemoryBackend {
        MemoryBackend::new(8).0.with_account("admin", "admin")
    }

    fn post(path: &str, body: Value) -> ApiRequest {
        ApiRequest::new(Method::Post, path).with_body(body)
    }

    #[test]
    fn create_assigns_ids_and_hides_passwords() {
        let mut backend = backend();
        let response = backend.handle(post(
            "usuario/",
            json!({"nombre": "Ana", "email": "a@x.com", "direccion": "Calle 1", "telefono": "555",
                   "password": "secreto", "fecha": "2024-03-01"}),
        ));
        assert_eq!(response.status, 201);
        assert_eq!(response.body["id"], 1);
        assert!(response.body.get("password").is_none());

        let list = backend.handle(ApiRequest::new(Method::Get, "usuario/"));
        assert_eq!(list.body.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn blank_and_missing_fields_are_rejected() {
        let mut backend = backend();
        let response = backend.handle(post("marca/", json!({"nombre": "  ", "fecha": "2024-03-01"})));
        assert_eq!(response.status, 400);
        assert_eq!(response.body["nombre"][0], "Este campo no puede estar en blanco.");
        assert_eq!(response.body["descripcion"][0], "Este campo es requerido.");
    }

    #[test]
    fn order_lines_carry_order_details() {
        let mut backend = backend().with_demo_data();
        let response = backend.handle(post(
            "detallepedido/",
            json!({"pedido": 2, "producto_nombre": "Clavo", "cantidad": 10, "precio": 1.5}),
        ));
        assert_eq!(response.status, 201);
        assert_eq!(response.body["precio"], "1.50");
        assert_eq!(response.body["pedido_fecha"], "2024-05-20");
        assert_eq!(response.body["pedido_nombre_usuario"], "Luis Gómez");

        let dangling = backend.handle(post(
            "detallepedido/",
            json!({"pedido": 99, "producto_nombre": "Clavo", "cantidad": 10, "precio": 1.5}),
        ));
        assert_eq!(dangling.status, 400);
    }

    #[test]
    fn update_keeps_the_stored_password_when_omitted() {
        let mut backend = backend().with_demo_data();
        let response = backend.handle(
            ApiRequest::new(Method::Put, "usuario/1/").with_body(json!({
                "nombre": "Ana María", "email": "ana@example.com", "direccion": "Av. Siempre Viva 742",
                "telefono": "555-0101", "fecha": "2024-01-10"
            })),
        );
        assert_eq!(response.status, 200);
        assert_eq!(response.body["nombre"], "Ana María");

        let stored = &backend.collections["usuario"].records[&1];
        assert_eq!(stored["password"], "ana");
    }

    #[test]
    fn delete_cascades_to_dependents() {
        let mut backend = backend().with_demo_data();
        let response = backend.handle(ApiRequest::new(Method::Delete, "pedido/1/"));
        assert_eq!(response.status, 204);

        let lines = backend.handle(ApiRequest::new(Method::Get, "detallepedido/"));
        assert_eq!(lines.body, json!([]));
        let again = backend.handle(ApiRequest::new(Method::Delete, "pedido/1/"));
        assert_eq!(again.status, 404);
    }

    #[test]
    fn unknown_routes_and_methods() {
        let mut backend = backend();
        assert_eq!(backend.handle(ApiRequest::new(Method::Get, "producto/")).status, 404);
        assert_eq!(backend.handle(ApiRequest::new(Method::Put, "marca/")).status, 405);
        assert_eq!(backend.handle(ApiRequest::new(Method::Get, "marca/abc/")).status, 404);
    }

    #[test]
    fn super_user_creation_requires_an_issued_token() {
        let mut backend = backend();
        let body = json!({"username": "root", "password": "toor"});

        let anonymous = backend.handle(post("create_super_user/", body.clone()));
        assert_eq!(anonymous.status, 401);

        let bad_login = backend.handle(post("token/", json!({"username": "admin", "password": "nope"})));
        assert_eq!(bad_login.status, 401);

        let login = backend.handle(post("token/", json!({"username": "admin", "password": "admin"})));
        let access = login.body["access"].as_str().unwrap().to_string();
        let created = backend.handle(post("create_super_user/", body.clone()).with_bearer(&access));
        assert_eq!(created.status, 201);

        let duplicate = backend.handle(post("create_super_user/", body).with_bearer(access));
        assert_eq!(duplicate.status, 400);
    }

    #[tokio::test]
    async fn run_answers_until_shutdown() {
        let (backend, transport) = MemoryBackend::new(8);
        let (stop, shutdown) = oneshot::channel();
        let handle = tokio::spawn(backend.with_demo_data().run(shutdown));

        let response = transport.send(ApiRequest::new(Method::Get, "marca/")).await.unwrap();
        assert_eq!(response.body.as_array().map(Vec::len), Some(2));

        stop.send(()).unwrap();
        handle.await.unwrap();
        assert!(transport.send(ApiRequest::new(Method::Get, "marca/")).await.is_err());
    }
}
