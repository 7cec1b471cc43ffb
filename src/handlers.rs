//! Request handlers for the generic resource endpoints.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Host, OriginalUri, Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::Response;
use serde_json::Value;

use crate::error::StorageError;
use crate::resource::{Record, Resource, ID_FIELD};
use crate::response::{self, Envelope};
use crate::state::AppState;

/// Body bytes become a record. Anything that is not a JSON object is the
/// caller's mistake, reported with one fixed message.
fn parse_record(body: &Bytes) -> Result<Record, StorageError> {
    serde_json::from_slice(body).map_err(|_| StorageError::validation("payload could not be parsed"))
}

/// The path id used as an exact-match filter. It stays a string; the
/// backend coerces it against the column type.
fn id_record(id: &str) -> Record {
    let mut record = Record::new();
    record.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    record
}

/// Integer query parameter, defaulted when absent. A present but
/// non-integer value is an error, not a silent fallback.
fn int_param(
    params: &HashMap<String, String>,
    name: &str,
    default: i64,
) -> Result<i64, StorageError> {
    match params.get(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| StorageError::validation(format!("improper value for '{}'", name))),
        None => Ok(default),
    }
}

fn request_uri(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}

/// GET /{resource}: a page of records with navigation links.
pub async fn list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Host(host): Host,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, StorageError> {
    let offset = int_param(&params, "offset", 0)?.max(0);
    let limit = int_param(&params, "limit", state.config.limit_default)?.max(1);
    let resource = Resource::new(resource);
    let result = state.storage.read(&resource, None, offset, limit).await?;
    let links = response::page_links(
        &host,
        request_uri(&uri),
        uri.path(),
        offset,
        limit,
        result.data.len(),
    );
    Ok(response::respond(
        StatusCode::OK,
        Envelope::from_result(result).with_links(links),
    ))
}

/// GET /{resource}/{id}: exactly one record, or a 404 message.
pub async fn read_one(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Host(host): Host,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, StorageError> {
    let resource = Resource::new(resource);
    let filter = id_record(&id);
    let result = state.storage.read(&resource, Some(&filter), 0, 1).await?;
    if result.data.is_empty() {
        return Ok(response::message(StatusCode::NOT_FOUND, "no records found"));
    }
    let links = vec![response::self_link(&host, request_uri(&uri))];
    Ok(response::respond(
        StatusCode::OK,
        Envelope::from_result(result).with_links(links),
    ))
}

/// PUT /{resource}: inserts the body as one record. 201 on insertion; a
/// backend that reports nothing created answers 200 with the bare counts.
pub async fn create(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    body: Bytes,
) -> Result<Response, StorageError> {
    let record = parse_record(&body)?;
    let resource = Resource::new(resource);
    let result = state.storage.create(&resource, &record).await?;
    if result.created != 0 {
        return Ok(response::respond(
            StatusCode::CREATED,
            Envelope::from_result(result).with_message("success"),
        ));
    }
    Ok(response::respond(
        StatusCode::OK,
        Envelope::from_result(result),
    ))
}

/// POST /{resource}/{id}: updates the row named by the path. The path id
/// wins over any id in the body. No matching row is a 404.
pub async fn update(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Response, StorageError> {
    let mut record = parse_record(&body)?;
    record.insert(ID_FIELD.to_string(), Value::String(id));
    let resource = Resource::new(resource);
    let result = state.storage.update(&resource, &record).await?;
    if result.updated == 0 {
        return Ok(response::message(StatusCode::NOT_FOUND, "record not found"));
    }
    Ok(response::respond(
        StatusCode::OK,
        Envelope::from_result(result),
    ))
}

/// DELETE /{resource}/{id}. No matching row is a 404.
pub async fn delete(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Response, StorageError> {
    let resource = Resource::new(resource);
    let record = id_record(&id);
    let result = state.storage.delete(&resource, &record).await?;
    if result.deleted == 0 {
        return Ok(response::message(StatusCode::NOT_FOUND, "record not found"));
    }
    Ok(response::respond(
        StatusCode::OK,
        Envelope::from_result(result),
    ))
}

/// OPTIONS answers an empty acknowledgement.
pub async fn preflight() -> Response {
    response::message(StatusCode::OK, "")
}

/// Any verb outside the resource table.
pub async fn unsupported() -> Response {
    response::message(StatusCode::BAD_REQUEST, "Unsupported method")
}

/// Any path outside the resource shapes.
pub async fn not_found() -> Response {
    response::message(StatusCode::NOT_FOUND, "resource not found")
}
