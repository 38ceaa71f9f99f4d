//! Core types for batch-api

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::TaskError;

/// One validated request: where to POST and what to send
///
/// Only constructible through validation or [`RequestDescriptor::new`], so a
/// descriptor always has a non-empty url.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestDescriptor {
    url: String,
    body: String,
}

impl RequestDescriptor {
    /// Build a descriptor, rejecting an empty url
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Option<Self> {
        let url = url.into();
        if url.is_empty() {
            return None;
        }
        Some(Self {
            url,
            body: body.into(),
        })
    }

    pub(crate) fn from_validated(url: String, body: String) -> Self {
        Self { url, body }
    }

    /// Target url
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request body (may be empty)
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// An ordered, validated batch of descriptors
///
/// The position of a descriptor is its identity for the rest of the call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchJob {
    requests: Vec<RequestDescriptor>,
}

impl BatchJob {
    /// Number of requests in the batch
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// True when the batch holds no requests
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Descriptor at `index`
    pub fn get(&self, index: usize) -> Option<&RequestDescriptor> {
        self.requests.get(index)
    }

    /// Iterate descriptors in input order
    pub fn iter(&self) -> impl Iterator<Item = &RequestDescriptor> {
        self.requests.iter()
    }

    /// Consume the job into `(index, descriptor)` units of work
    pub fn into_indexed(self) -> impl Iterator<Item = (usize, RequestDescriptor)> {
        self.requests.into_iter().enumerate()
    }
}

impl From<Vec<RequestDescriptor>> for BatchJob {
    fn from(requests: Vec<RequestDescriptor>) -> Self {
        Self { requests }
    }
}

impl FromIterator<RequestDescriptor> for BatchJob {
    fn from_iter<I: IntoIterator<Item = RequestDescriptor>>(iter: I) -> Self {
        Self {
            requests: iter.into_iter().collect(),
        }
    }
}

/// What the remote sent back
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub http_status_code: u16,
    /// Response body as text
    pub body: String,
    /// Response headers, lower-cased names
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Response {
    /// Whether the status code is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.http_status_code)
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Flatten into the string map handed to scripting hosts: `body` and `http_status_code`
    pub fn into_map(self) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(2);
        map.insert("body".to_string(), self.body);
        map.insert(
            "http_status_code".to_string(),
            self.http_status_code.to_string(),
        );
        map
    }
}

/// Result of one request: a response or a classified failure
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The remote answered
    Success(Response),
    /// The request failed; siblings are unaffected
    Failure(TaskError),
}

impl Outcome {
    /// True for [`Outcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The response, if the request succeeded
    pub fn response(&self) -> Option<&Response> {
        match self {
            Outcome::Success(r) => Some(r),
            Outcome::Failure(_) => None,
        }
    }

    /// The error, if the request failed
    pub fn error(&self) -> Option<&TaskError> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(e) => Some(e),
        }
    }

    /// Convert into a standard `Result`
    pub fn into_result(self) -> std::result::Result<Response, TaskError> {
        match self {
            Outcome::Success(r) => Ok(r),
            Outcome::Failure(e) => Err(e),
        }
    }
}

impl From<std::result::Result<Response, TaskError>> for Outcome {
    fn from(result: std::result::Result<Response, TaskError>) -> Self {
        match result {
            Ok(r) => Outcome::Success(r),
            Err(e) => Outcome::Failure(e),
        }
    }
}

/// A finished unit of work, tagged with its position in the batch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskResult {
    /// Position of the request in the batch
    pub index: usize,
    /// What happened
    pub outcome: Outcome,
}

/// Outcomes in input order; position `i` belongs to request `i`
pub type BatchResult = Vec<Outcome>;

/// A point for sector lookups, longitude first
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees (x)
    pub lng: f64,
    /// Latitude in degrees (y)
    pub lat: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude
    pub fn from_lat_lng(lat: f64, lng: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.lng, p.lat)
    }
}

/// Regions the sector store knows how to load
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// United Kingdom postcode sectors
    Uk,
    /// New York zipcodes
    Ny,
    /// California zipcodes
    Ca,
    /// New Jersey zipcodes
    Nj,
}

impl Region {
    /// All regions, in lookup order
    pub const ALL: [Region; 4] = [Region::Uk, Region::Ny, Region::Ca, Region::Nj];
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Region::Uk => "uk",
            Region::Ny => "ny",
            Region::Ca => "ca",
            Region::Nj => "nj",
        };
        f.write_str(s)
    }
}
