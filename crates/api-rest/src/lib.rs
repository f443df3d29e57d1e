//! # API REST
//!
//! REST API implementation for medstock.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (form decoding, JSON responses, status codes, CORS)
//!
//! Uses `api-shared` for request and response types and `medstock-core` for all data
//! operations.

#![warn(rust_2018_idioms)]

use api_shared::{
    AveragePriceRes, CreateMedicineReq, DeleteMedicineReq, ErrorRes, HealthRes, HealthService,
    ListMedicinesRes, Medicine, MessageRes, UpdateMedicineReq,
};
use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Form, Router,
};
use med_types::Price;
use medstock_core::{ErrorKind, MedicineError, MedicineService, MedicineUpdate, StoredMedicine};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Message returned to clients for any storage failure. Details only go to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message returned when a mutation body is not a URL-encoded form.
pub const INVALID_FORM_MESSAGE: &str =
    "Request body must be form data (application/x-www-form-urlencoded).";

/// Application state for the REST API server
///
/// Contains shared state that needs to be accessible to all request handlers.
#[derive(Clone)]
pub struct AppState {
    medicine_service: MedicineService,
}

impl AppState {
    pub fn new(medicine_service: MedicineService) -> Self {
        Self { medicine_service }
    }
}

type ApiError = (StatusCode, Json<ErrorRes>);

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_medicines,
        average_price,
        get_medicine,
        create_medicine,
        update_medicine,
        delete_medicine,
    ),
    components(schemas(
        HealthRes,
        Medicine,
        ListMedicinesRes,
        AveragePriceRes,
        MessageRes,
        ErrorRes,
        CreateMedicineReq,
        UpdateMedicineReq,
        DeleteMedicineReq,
    ))
)]
struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/medicines", get(list_medicines))
        .route("/medicines/average-price", get(average_price))
        .route("/medicines/:name", get(get_medicine))
        .route("/create", post(create_medicine))
        .route("/update", post(update_medicine))
        .route("/delete", delete(delete_medicine))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/medicines",
    responses(
        (status = 200, description = "All medicines in stored order", body = ListMedicinesRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all medicines
///
/// # Errors
/// Returns `500 Internal Server Error` if the data file is missing or malformed. A broken
/// file is never reported as an empty list.
#[axum::debug_handler]
async fn list_medicines(
    State(state): State<AppState>,
) -> Result<Json<ListMedicinesRes>, ApiError> {
    let medicines = state
        .medicine_service
        .list()
        .map_err(|e| error_response("List medicines", e))?;
    Ok(Json(ListMedicinesRes {
        medicines: medicines.into_iter().map(to_wire).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/medicines/average-price",
    responses(
        (status = 200, description = "Average over numeric prices", body = AveragePriceRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Average price of all medicines with a numeric price
#[axum::debug_handler]
async fn average_price(State(state): State<AppState>) -> Result<Json<AveragePriceRes>, ApiError> {
    let aggregate = state
        .medicine_service
        .average_price()
        .map_err(|e| error_response("Average price", e))?;
    Ok(Json(AveragePriceRes {
        average_price: aggregate.average,
        count: aggregate.count as u64,
    }))
}

#[utoipa::path(
    get,
    path = "/medicines/{name}",
    params(("name" = String, Path, description = "Medicine name, matched case-insensitively")),
    responses(
        (status = 200, description = "The medicine", body = Medicine),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 404, description = "Medicine not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Fetch a single medicine by name
#[axum::debug_handler]
async fn get_medicine(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Medicine>, ApiError> {
    state
        .medicine_service
        .get(&name)
        .map(|m| Json(to_wire(m)))
        .map_err(|e| error_response("Get medicine", e))
}

#[utoipa::path(
    post,
    path = "/create",
    request_body(content = CreateMedicineReq, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Medicine created", body = MessageRes),
        (status = 400, description = "Empty name, invalid price or duplicate name", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new medicine
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the name is missing or blank,
/// - the price is missing, not a number, or not greater than zero,
/// - a medicine with the same case-insensitive name already exists.
///
/// Returns `500 Internal Server Error` if the data file cannot be read or written.
#[axum::debug_handler]
async fn create_medicine(
    State(state): State<AppState>,
    form: Result<Form<CreateMedicineReq>, FormRejection>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    let req = form_body("Create medicine", form)?;
    let name = req.name.unwrap_or_default();
    let price = form_price(req.price.as_deref());

    let record = state
        .medicine_service
        .create(&name, price)
        .map_err(|e| error_response("Create medicine", e))?;
    Ok((
        StatusCode::CREATED,
        Json(MessageRes {
            message: format!(
                "Medicine created successfully with name: {}",
                record.name_str().unwrap_or_default()
            ),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/update",
    request_body(content = UpdateMedicineReq, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Medicine updated", body = MessageRes),
        (status = 400, description = "Invalid input or name collision", body = ErrorRes),
        (status = 404, description = "Medicine not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Update the price and/or the name of a medicine
///
/// A blank `price` field is treated as "price unchanged". A `new_name` field that is present
/// but blank is rejected.
#[axum::debug_handler]
async fn update_medicine(
    State(state): State<AppState>,
    form: Result<Form<UpdateMedicineReq>, FormRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let req = form_body("Update medicine", form)?;
    let name = req.name.unwrap_or_default();
    let changes = MedicineUpdate {
        price: req
            .price
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| form_price(Some(p))),
        new_name: req.new_name,
    };

    let record = state
        .medicine_service
        .update(&name, changes)
        .map_err(|e| error_response("Update medicine", e))?;
    Ok(Json(MessageRes {
        message: format!(
            "Medicine updated successfully with name: {}",
            record.name_str().unwrap_or_default()
        ),
    }))
}

#[utoipa::path(
    delete,
    path = "/delete",
    request_body(content = DeleteMedicineReq, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Medicine deleted", body = MessageRes),
        (status = 400, description = "Blank name", body = ErrorRes),
        (status = 404, description = "Medicine not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Delete a medicine by name
#[axum::debug_handler]
async fn delete_medicine(
    State(state): State<AppState>,
    form: Result<Form<DeleteMedicineReq>, FormRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let req = form_body("Delete medicine", form)?;
    let name = req.name.unwrap_or_default();

    let deleted = state
        .medicine_service
        .delete(&name)
        .map_err(|e| error_response("Delete medicine", e))?;
    Ok(Json(MessageRes {
        message: format!("Medicine deleted successfully with name: {deleted}"),
    }))
}

// Helper functions

/// Unwraps a form body, turning extractor rejections into the usual `{ error }` response.
fn form_body<T>(context: &str, form: Result<Form<T>, FormRejection>) -> Result<T, ApiError> {
    match form {
        Ok(Form(req)) => Ok(req),
        Err(rejection) => {
            tracing::debug!("{} rejected form body: {}", context, rejection.body_text());
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorRes {
                    error: INVALID_FORM_MESSAGE.to_string(),
                }),
            ))
        }
    }
}

/// Converts a form price into a number.
///
/// Missing or invalid text becomes NaN, which the service rejects with its usual price error
/// once the name has been checked.
fn form_price(raw: Option<&str>) -> f64 {
    raw.and_then(|p| Price::parse(p).ok())
        .map_or(f64::NAN, |p| p.value())
}

fn to_wire(record: StoredMedicine) -> Medicine {
    Medicine {
        name: record.name_str().map(str::to_owned),
        price: record.price,
    }
}

fn error_response(context: &str, err: MedicineError) -> ApiError {
    let (status, message) = match err.kind() {
        ErrorKind::Validation => {
            tracing::debug!("{} rejected: {}", context, err);
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        ErrorKind::NotFound => {
            tracing::debug!("{} rejected: {}", context, err);
            (StatusCode::NOT_FOUND, err.to_string())
        }
        ErrorKind::Storage => {
            tracing::error!("{} error: {:?}", context, err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            )
        }
    };
    (status, Json(ErrorRes { error: message }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use medstock_core::CoreConfig;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app(temp: &TempDir, contents: Option<&str>) -> Router {
        let path = temp.path().join("data.json");
        if let Some(contents) = contents {
            fs::write(&path, contents).unwrap();
        }
        let cfg = CoreConfig::new(path).unwrap();
        router(AppState::new(MedicineService::new(&cfg)))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        form: Option<&str>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match form {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_owned()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[test]
    fn test_form_price() {
        assert_eq!(form_price(Some(" 5.5 ")), 5.5);
        assert!(form_price(Some("abc")).is_nan());
        assert!(form_price(Some("-3")).is_nan());
        assert!(form_price(Some("inf")).is_nan());
        assert!(form_price(None).is_nan());
    }

    #[tokio::test]
    async fn test_health() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, None);

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_create_then_list_and_average() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Some(r#"{"medicines": []}"#));

        let (status, body) =
            send(&app, Method::POST, "/create", Some("name=Aspirin&price=5.5")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body["message"],
            "Medicine created successfully with name: Aspirin"
        );

        let (status, body) = send(&app, Method::GET, "/medicines", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"medicines": [{"name": "Aspirin", "price": 5.5}]})
        );

        let (status, body) = send(&app, Method::GET, "/medicines/average-price", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"average_price": 5.5, "count": 1}));
    }

    #[tokio::test]
    async fn test_create_validation_errors() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Some(r#"{"medicines": []}"#));

        let cases = [
            ("name=%20%20&price=1", "Medicine name cannot be empty."),
            ("price=1", "Medicine name cannot be empty."),
            ("name=A&price=0", "Price must be a positive number greater than 0."),
            ("name=A&price=abc", "Price must be a positive number greater than 0."),
            ("name=A", "Price must be a positive number greater than 0."),
        ];
        for (form, message) in cases {
            let (status, body) = send(&app, Method::POST, "/create", Some(form)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "form {form}");
            assert_eq!(body["error"], message, "form {form}");
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_is_rejected() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Some(r#"{"medicines": [{"name": "Aspirin", "price": 5.5}]}"#));

        let (status, body) =
            send(&app, Method::POST, "/create", Some("name=+aspirin+&price=2")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "A medicine with this name already exists.");

        let (_, body) = send(&app, Method::GET, "/medicines/average-price", None).await;
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn test_update_negative_price_is_rejected() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Some(r#"{"medicines": [{"name": "Aspirin", "price": 5.5}]}"#));

        let (status, body) =
            send(&app, Method::POST, "/update", Some("name=Aspirin&price=-1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Price must be a positive number greater than 0."
        );

        let (_, body) = send(&app, Method::GET, "/medicines/aspirin", None).await;
        assert_eq!(body["price"], 5.5);
    }

    #[tokio::test]
    async fn test_update_rename_and_price() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Some(r#"{"medicines": [{"name": "Asprin", "price": 5.5}]}"#));

        let (status, body) = send(
            &app,
            Method::POST,
            "/update",
            Some("name=Asprin&price=6&new_name=Aspirin"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Medicine updated successfully with name: Aspirin"
        );

        let (status, body) = send(&app, Method::GET, "/medicines/ASPIRIN", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"name": "Aspirin", "price": 6.0}));
    }

    #[tokio::test]
    async fn test_update_blank_price_renames_only() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Some(r#"{"medicines": [{"name": "Asprin", "price": 5.5}]}"#));

        let (status, _) = send(
            &app,
            Method::POST,
            "/update",
            Some("name=Asprin&price=&new_name=Aspirin"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/medicines/aspirin", None).await;
        assert_eq!(body["price"], 5.5);
    }

    #[tokio::test]
    async fn test_update_missing_medicine_is_not_found() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Some(r#"{"medicines": []}"#));

        let (status, body) =
            send(&app, Method::POST, "/update", Some("name=Ghost&price=1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Medicine not found");
    }

    #[tokio::test]
    async fn test_delete() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Some(r#"{"medicines": [{"name": "Aspirin", "price": 5.5}]}"#));

        let (status, body) = send(&app, Method::DELETE, "/delete", Some("name=Ghost")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Medicine not found");

        let (status, body) = send(&app, Method::DELETE, "/delete", Some("name=ASPIRIN")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Medicine deleted successfully with name: ASPIRIN"
        );

        let (_, body) = send(&app, Method::GET, "/medicines", None).await;
        assert_eq!(body, serde_json::json!({"medicines": []}));
    }

    #[tokio::test]
    async fn test_mutation_without_form_content_type_is_a_json_error() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Some(r#"{"medicines": [{"name": "Aspirin", "price": 5.5}]}"#));

        for (method, uri, body) in [
            (Method::POST, "/create", "name=Zinc&price=1"),
            (Method::POST, "/update", "name=Aspirin&price=2"),
            (Method::DELETE, "/delete", "name=Aspirin"),
        ] {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::from(body))
                .unwrap();
            let resp = app.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
            let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["error"], INVALID_FORM_MESSAGE, "{uri}");
        }

        let (_, body) = send(&app, Method::GET, "/medicines", None).await;
        assert_eq!(
            body,
            serde_json::json!({"medicines": [{"name": "Aspirin", "price": 5.5}]})
        );
    }

    #[tokio::test]
    async fn test_get_unknown_medicine() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, Some(r#"{"medicines": []}"#));

        let (status, body) = send(&app, Method::GET, "/medicines/Ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Medicine not found");
    }

    #[tokio::test]
    async fn test_storage_failures_are_server_errors() {
        let temp = TempDir::new().unwrap();
        let missing = test_app(&temp, None);

        let (status, body) = send(&missing, Method::GET, "/medicines", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);

        let corrupt = test_app(&temp, Some("{ not json"));
        let (status, _) = send(&corrupt, Method::GET, "/medicines/average-price", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) =
            send(&corrupt, Method::POST, "/create", Some("name=A&price=1")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_list_passes_malformed_records_through() {
        let temp = TempDir::new().unwrap();
        let app = test_app(
            &temp,
            Some(r#"{"medicines": [{"name": "A", "price": 10}, {"name": "B", "price": "x"}, {"name": "C", "price": 20}]}"#),
        );

        let (_, body) = send(&app, Method::GET, "/medicines", None).await;
        assert_eq!(body["medicines"][1]["price"], "x");

        let (_, body) = send(&app, Method::GET, "/medicines/average-price", None).await;
        assert_eq!(body, serde_json::json!({"average_price": 15.0, "count": 2}));
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, None);

        let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/medicines/average-price"].is_object());
    }
}
