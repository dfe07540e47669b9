//! API integration tests against an in-process axum backend

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use union_catalog_admin::{
    api::{AdminApi, ApiClient, RestAdminApi},
    config::{ApiConfig, AppConfig},
    models::{
        BookForm, BookType, EmailVerifiedFilter, LoginOutcome, RegistrationQuery, RegistrationStatus,
        StatusFilter,
    },
    services::Services,
    session::{Session, SessionStore},
    AppError, AppState,
};

// ---------------------------------------------------------------------------
// Test backend
// ---------------------------------------------------------------------------

/// A request as the backend saw it
#[derive(Debug, Clone)]
struct Seen {
    method: String,
    uri: String,
    authorization: Option<String>,
    cookie: Option<String>,
}

/// One multipart part
#[derive(Debug, Clone)]
struct Upload {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    value: Vec<u8>,
}

impl Upload {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

#[derive(Default)]
struct Backend {
    libraries: Mutex<Vec<Value>>,
    requests: Mutex<Vec<Seen>>,
    uploads: Mutex<Vec<Vec<Upload>>>,
    delay: Duration,
}

type Shared = Arc<Backend>;

impl Backend {
    fn new(libraries: Vec<Value>) -> Shared {
        Arc::new(Self {
            libraries: Mutex::new(libraries),
            ..Default::default()
        })
    }

    fn slow(libraries: Vec<Value>, delay: Duration) -> Shared {
        Arc::new(Self {
            libraries: Mutex::new(libraries),
            delay,
            ..Default::default()
        })
    }

    fn requests(&self) -> Vec<Seen> {
        self.requests.lock().unwrap().clone()
    }

    fn uploads(&self) -> Vec<Vec<Upload>> {
        self.uploads.lock().unwrap().clone()
    }

    /// Move a library to `status`. Unknown ids are a 404; banning a banned
    /// library is a `success: false` reply.
    fn transition(&self, id: Option<&String>, status: &str, note: Option<&String>, message: &str) -> Response {
        let mut libraries = self.libraries.lock().unwrap();
        let Some(record) = libraries
            .iter_mut()
            .find(|r| id.is_some_and(|id| read(r, ["PublicId", "publicId"]) == id.as_str()))
        else {
            return (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response();
        };

        if status == "Banned" && read(record, ["Status", "status"]) == "Banned" {
            return Json(json!({ "success": false, "message": "Library already banned" })).into_response();
        }
        write(record, ["Status", "status"], json!(status));
        if let Some(note) = note {
            write(record, ["AdminNotes", "adminNotes"], json!(note));
        }
        Json(json!({ "success": true, "message": message })).into_response()
    }
}

/// Records keep whichever key casing they were seeded with
fn key<'a>(record: &Value, names: [&'a str; 2]) -> &'a str {
    names
        .into_iter()
        .find(|name| record.get(*name).is_some())
        .unwrap_or(names[0])
}

fn read<'v>(record: &'v Value, names: [&str; 2]) -> &'v str {
    record[key(record, names)].as_str().unwrap_or_default()
}

fn write(record: &mut Value, names: [&str; 2], value: Value) {
    let key = key(record, names);
    record[key] = value;
}

async fn record_request(State(backend): State<Shared>, request: Request, next: Next) -> Response {
    let seen = {
        let header_value = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Seen {
            method: request.method().to_string(),
            uri: request.uri().to_string(),
            authorization: header_value(header::AUTHORIZATION),
            cookie: header_value(header::COOKIE),
        }
    };
    backend.requests.lock().unwrap().push(seen);

    if !backend.delay.is_zero() {
        tokio::time::sleep(backend.delay).await;
    }
    next.run(request).await
}

/// Filters are recorded but not applied, like a backend that ignores them
async fn library_list(State(backend): State<Shared>) -> Json<Value> {
    let items = backend.libraries.lock().unwrap().clone();
    Json(json!({
        "success": true,
        "data": {
            "result": {
                "TotalItems": items.len(),
                "TotalPages": 1,
                "PageNumber": 1,
                "Items": items
            }
        }
    }))
}

async fn approve_library(State(backend): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Response {
    backend.transition(q.get("publicId"), "Approved", None, "Library approved")
}

async fn decline_library(State(backend): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Response {
    backend.transition(q.get("libraryId"), "Declined", q.get("adminNote"), "Library declined")
}

async fn ban_library(State(backend): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Response {
    backend.transition(q.get("libraryId"), "Banned", q.get("adminNote"), "Library banned")
}

async fn unban_library(State(backend): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Response {
    backend.transition(q.get("libraryId"), "Approved", None, "Library unbanned")
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != "pw" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "" }))).into_response();
    }
    (
        [(header::SET_COOKIE, "uc_auth=abc; Path=/; HttpOnly")],
        Json(json!({
            "success": true,
            "message": "Login successful",
            "data": { "token": "jwt", "userType": "SuperAdmin" }
        })),
    )
        .into_response()
}

async fn book_details(Path(id): Path<String>) -> Response {
    if id == "broken" {
        return (StatusCode::OK, "<html>gateway</html>").into_response();
    }
    Json(json!({
        "success": true,
        "data": { "result": { "BookID": id, "Title": "Dune", "BookType": "English" } }
    }))
    .into_response()
}

async fn store_upload(backend: &Backend, mut multipart: Multipart) -> Result<(), StatusCode> {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|_| StatusCode::BAD_REQUEST)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let value = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?.to_vec();
        parts.push(Upload {
            name,
            file_name,
            content_type,
            value,
        });
    }
    backend.uploads.lock().unwrap().push(parts);
    Ok(())
}

async fn add_book(State(backend): State<Shared>, multipart: Multipart) -> Response {
    match store_upload(&backend, multipart).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(status) => status.into_response(),
    }
}

async fn update_book(State(backend): State<Shared>, Path(_id): Path<String>, multipart: Multipart) -> Response {
    match store_upload(&backend, multipart).await {
        Ok(()) => Json(json!({ "success": true, "message": "Book saved" })).into_response(),
        Err(status) => status.into_response(),
    }
}

/// Serve `backend` on an ephemeral port, return its API base URL
async fn serve(backend: Shared) -> String {
    let app = Router::new()
        .route("/api/admin/get-library-list", get(library_list))
        .route("/api/admin/approve-library", post(approve_library))
        .route("/api/admin/decline-library", post(decline_library))
        .route("/api/admin/ban-library", post(ban_library))
        .route("/api/admin/unban-library", post(unban_library))
        .route("/api/auth/login", post(login))
        .route("/api/Book/get-book-details/:id", get(book_details))
        .route("/api/Book/add-book", post(add_book))
        .route("/api/Book/update-book/:id", put(update_book))
        .layer(middleware::from_fn_with_state(backend.clone(), record_request))
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind backend");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn api_config(base_url: &str, timeout_secs: u64) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs,
    }
}

fn client(base_url: &str, timeout_secs: u64) -> ApiClient {
    ApiClient::new(&api_config(base_url, timeout_secs)).expect("client")
}

fn app_config(base_url: &str) -> AppConfig {
    AppConfig {
        api: api_config(base_url, 5),
        ..Default::default()
    }
}

fn libraries() -> Vec<Value> {
    vec![
        json!({
            "PublicId": "A",
            "RegistrationNumber": "LIB-20240131-4F2A9C",
            "LibraryName": "Mandalay Public Library",
            "Status": "Pending",
            "IsEmailVerified": true,
            "DocumentFile": "https://files.example/a.pdf"
        }),
        json!({
            "publicId": "B",
            "libraryName": "Yangon University Library",
            "status": "Declined",
            "isEmailVerified": false,
            "adminNotes": "Missing license"
        }),
        json!({
            "PublicId": "C",
            "LibraryName": "Bago Township Library",
            "Status": "Banned",
            "IsEmailVerified": true
        }),
    ]
}

fn dune() -> BookForm {
    BookForm {
        isbn: "978-0441013593".to_string(),
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        publisher: "Chilton".to_string(),
        published_year: Some(1965),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Registrations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_library_list_parses_mixed_casing() {
    let backend = Backend::new(libraries());
    let services = Services::new(client(&serve(backend.clone()).await, 5));

    let page = services
        .registry
        .list(&RegistrationQuery {
            name: "  mandalay ".to_string(),
            status: StatusFilter::Only(RegistrationStatus::Pending),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.records.len(), 3);
    assert_eq!(page.total_items, 3);
    assert_eq!(page.records[0].public_id, "A");
    assert!(page.records[0].has_document());
    assert_eq!(page.records[1].status, RegistrationStatus::Declined);
    assert_eq!(page.records[1].admin_notes.as_deref(), Some("Missing license"));

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let uri = &requests[0].uri;
    assert!(uri.starts_with("/api/admin/get-library-list?"));
    assert!(uri.contains("pageNumber=1"));
    assert!(uri.contains("libraryName=mandalay"));
    assert!(uri.contains("status=Pending"));
    // All is the default and is not sent
    assert!(!uri.contains("emailVerified"));
}

#[tokio::test]
async fn test_email_filter_sent_and_reapplied() {
    let backend = Backend::new(libraries());
    let services = Services::new(client(&serve(backend.clone()).await, 5));

    let page = services
        .registry
        .list(&RegistrationQuery {
            email_verified: EmailVerifiedFilter::NotVerified,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].public_id, "B");
    // Totals still describe the server page
    assert_eq!(page.total_items, 3);
    assert!(backend.requests()[0].uri.contains("emailVerified=NotVerified"));
}

#[tokio::test]
async fn test_approve_then_refetch_shows_new_status() {
    let backend = Backend::new(libraries());
    let state = AppState::new(app_config(&serve(backend.clone()).await), None).unwrap();
    let screen = state.registrations_screen();

    screen.load().await.unwrap();
    let status_of = |id: &str| {
        screen
            .records()
            .into_iter()
            .find(|r| r.public_id == id)
            .map(|r| r.status)
    };
    assert_eq!(status_of("A"), Some(RegistrationStatus::Pending));

    let outcome = screen.approve("A").await.unwrap();
    assert_eq!(outcome.message, "Library approved");
    assert_eq!(status_of("A"), Some(RegistrationStatus::Approved));
    assert_eq!(screen.current_message().map(|m| m.text).as_deref(), Some("Library approved"));

    let calls: Vec<_> = backend
        .requests()
        .into_iter()
        .map(|r| format!("{} {}", r.method, r.uri.split('?').next().unwrap_or_default()))
        .collect();
    assert_eq!(
        calls,
        [
            "GET /api/admin/get-library-list",
            "POST /api/admin/approve-library",
            "GET /api/admin/get-library-list",
        ]
    );
    assert!(backend.requests()[1].uri.ends_with("?publicId=A"));
}

#[tokio::test]
async fn test_decline_note_shown_after_refetch() {
    let backend = Backend::new(libraries());
    let state = AppState::new(app_config(&serve(backend.clone()).await), None).unwrap();
    let screen = state.registrations_screen();

    screen.load().await.unwrap();
    screen.decline("A", Some("Blurry license scan")).await.unwrap();

    let record = screen.records().into_iter().find(|r| r.public_id == "A").unwrap();
    assert_eq!(record.status, RegistrationStatus::Declined);
    assert_eq!(record.admin_notes.as_deref(), Some("Blurry license scan"));
    assert!(backend.requests()[1].uri.contains("adminNote=Blurry+license+scan"));
}

#[tokio::test]
async fn test_bearer_sent() {
    let backend = Backend::new(libraries());
    let base_url = serve(backend.clone()).await;
    let api = RestAdminApi::new(client(&base_url, 5).with_bearer(Some("jwt".to_string())));

    let response = api.approve_library("A").await.unwrap();
    assert_eq!(response.message.as_deref(), Some("Library approved"));
    assert_eq!(backend.requests()[0].authorization.as_deref(), Some("Bearer jwt"));
}

#[tokio::test]
async fn test_success_false_is_rejection() {
    let backend = Backend::new(libraries());
    let api = RestAdminApi::new(client(&serve(backend).await, 5));

    let err = api.ban_library("C", "spam").await.unwrap_err();
    assert!(matches!(err, AppError::BackendRejected { .. }));
    assert_eq!(err.user_message(), "Library already banned");
}

#[tokio::test]
async fn test_error_status_uses_body_message() {
    let backend = Backend::new(libraries());
    let services = Services::new(client(&serve(backend).await, 5));

    let err = services.actions.decline("Z", Some("incomplete")).await.unwrap_err();
    assert_eq!(
        err,
        AppError::BackendRejected {
            status: Some(404),
            message: "Not found".to_string()
        }
    );
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = Backend::slow(libraries(), Duration::from_secs(3));
    let services = Services::new(client(&serve(backend).await, 1));

    let err = services.registry.list(&RegistrationQuery::default()).await.unwrap_err();
    assert!(matches!(err, AppError::Timeout));
    assert_eq!(err.user_message(), "Request timed out.");
}

#[tokio::test]
async fn test_unreachable_backend() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = RestAdminApi::new(client(&format!("http://{}/api", addr), 5));
    let err = api.unban_library("A").await.unwrap_err();
    assert_eq!(err.user_message(), "Cannot reach the server.");
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_cookie_replayed_by_next_run() {
    let backend = Backend::new(libraries());
    let base_url = serve(backend.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));

    {
        let state = AppState::new(app_config(&base_url), None).unwrap();
        let mut session = Session::load(store.clone());
        match state.services.auth.login("root@catalog.mm", "pw", false).await.unwrap() {
            LoginOutcome::SignedIn(user) => session.sign_in(user).unwrap(),
            other => panic!("expected sign-in, got {:?}", other),
        }
    }

    // A fresh process: nothing but the session file carries over
    let session = Session::load(store);
    let state = AppState::new(app_config(&base_url), session.user()).unwrap();
    state.services.registry.list(&RegistrationQuery::default()).await.unwrap();

    let last = backend.requests().pop().unwrap();
    assert!(last.uri.starts_with("/api/admin/get-library-list"));
    assert!(last.cookie.as_deref().is_some_and(|c| c.contains("uc_auth=abc")));
    assert_eq!(last.authorization.as_deref(), Some("Bearer jwt"));
}

#[tokio::test]
async fn test_wrong_password_is_authentication_error() {
    let backend = Backend::new(Vec::new());
    let services = Services::new(client(&serve(backend).await, 5));

    let err = services.auth.login("root@catalog.mm", "nope", false).await.unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_book_id_is_one_path_segment() {
    let backend = Backend::new(Vec::new());
    let services = Services::new(client(&serve(backend.clone()).await, 5));

    let book = services.books.details("1/../2", BookType::English).await.unwrap();
    assert_eq!(book.id, "1/../2");
    assert!(backend.requests()[0]
        .uri
        .starts_with("/api/Book/get-book-details/1%2F..%2F2?bookType=English"));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let backend = Backend::new(Vec::new());
    let services = Services::new(client(&serve(backend).await, 5));

    let err = services.books.details("broken", BookType::English).await.unwrap_err();
    assert!(matches!(err, AppError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_add_book_uploads_multipart_form() {
    let backend = Backend::new(Vec::new());
    let services = Services::new(client(&serve(backend.clone()).await, 5));

    let dir = tempfile::tempdir().unwrap();
    let cover = dir.path().join("dune.png");
    std::fs::write(&cover, [0x89, b'P', b'N', b'G']).unwrap();

    let message = services.books.add(dune(), Some(&cover)).await.unwrap();
    assert_eq!(message, "Book added");

    let uploads = backend.uploads();
    assert_eq!(uploads.len(), 1);
    let names: Vec<_> = uploads[0].iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        ["BookType", "BookCoverFile", "ISBN", "Title", "Author", "Publisher", "PublishedYear"]
    );

    let file = &uploads[0][1];
    assert_eq!(file.file_name.as_deref(), Some("dune.png"));
    assert_eq!(file.content_type.as_deref(), Some("image/png"));
    assert_eq!(file.value, [0x89, b'P', b'N', b'G']);
    assert_eq!(uploads[0][0].text(), "English");
    assert_eq!(uploads[0][6].text(), "1965");

    let requests = backend.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].uri, "/api/Book/add-book");
}

#[tokio::test]
async fn test_update_book_puts_with_remove_flag() {
    let backend = Backend::new(Vec::new());
    let services = Services::new(client(&serve(backend.clone()).await, 5));

    let form = BookForm {
        book_type: BookType::Myanmar,
        remove_cover: true,
        ..dune()
    };
    let message = services.books.update("42", form, None).await.unwrap();
    assert_eq!(message, "Book saved");

    let uploads = backend.uploads();
    let parts = &uploads[0];
    let field = |name: &str| parts.iter().find(|p| p.name == name).map(Upload::text);
    assert_eq!(parts[0].name, "BookID");
    assert_eq!(field("BookID").as_deref(), Some("42"));
    assert_eq!(field("BookType").as_deref(), Some("Myanmar"));
    assert_eq!(field("RemoveBookCover").as_deref(), Some("true"));
    assert!(field("BookCoverFile").is_none());

    let requests = backend.requests();
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].uri, "/api/Book/update-book/42");
}
