//! The response envelope every endpoint answers with, success or failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::resource::{QueryResult, Records};

/// One shape for every response so clients parse one thing. `status`
/// mirrors the HTTP status code; the counts report what a write touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    pub status: u16,
    pub message: String,
    pub data: Records,
    pub created: u64,
    pub updated: u64,
    pub deleted: u64,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
    pub method: String,
}

impl Link {
    pub fn get(rel: &str, href: String) -> Self {
        Link {
            rel: rel.to_string(),
            href,
            method: "GET".to_string(),
        }
    }
}

impl Envelope {
    pub fn from_result(result: QueryResult) -> Self {
        Envelope {
            data: result.data,
            created: result.created,
            updated: result.updated,
            deleted: result.deleted,
            ..Envelope::default()
        }
    }

    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = links;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Renders the envelope at the given status, mirroring the code into the
/// body so the two cannot disagree.
pub fn respond(status: StatusCode, mut envelope: Envelope) -> Response {
    envelope.status = status.as_u16();
    (status, Json(envelope)).into_response()
}

/// Message-only envelope, used for errors and empty acknowledgements.
pub fn message(status: StatusCode, text: impl Into<String>) -> Response {
    respond(
        status,
        Envelope {
            message: text.into(),
            ..Envelope::default()
        },
    )
}

/// Navigation links for a listing. `self` echoes the request as made,
/// `prev` appears once the offset is past zero, and `next` appears when the
/// page came back full, each rebuilt from the bare path.
pub fn page_links(
    host: &str,
    request_uri: &str,
    path: &str,
    offset: i64,
    limit: i64,
    returned: usize,
) -> Vec<Link> {
    let mut links = vec![self_link(host, request_uri)];
    if offset > 0 {
        let prev = (offset - limit).max(0);
        links.push(Link::get(
            "prev",
            format!("http://{}{}?offset={}&limit={}", host, path, prev, limit),
        ));
    }
    if returned as i64 == limit {
        links.push(Link::get(
            "next",
            format!(
                "http://{}{}?offset={}&limit={}",
                host,
                path,
                offset + limit,
                limit
            ),
        ));
    }
    links
}

pub fn self_link(host: &str, request_uri: &str) -> Link {
    Link::get("self", format!("http://{}{}", host, request_uri))
}
