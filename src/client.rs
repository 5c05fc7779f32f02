//! HTTP access to the appliance REST API.

use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
    StatusCode, Url,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Connection;
use crate::error::ApplianceError;
use crate::model::{Filesystem, FilesystemList, Inventory, NewSnapshot, Scope};

/// The appliance operations snapshot actions are built on.
///
/// `RestClient` talks to a real appliance; tests substitute an in-memory one.
pub trait Appliance {
    /// Fetch the full filesystem collection.
    fn filesystems(&self) -> Result<Vec<Filesystem>, ApplianceError>;
    /// Fetch the snapshot inventory of one filesystem.
    fn snapshots(&self, scope: &Scope) -> Result<Inventory, ApplianceError>;
    /// Request a new unlocked snapshot, returning the appliance's status.
    fn create_snapshot(&self, scope: &Scope, name: &str) -> Result<StatusCode, ApplianceError>;
    /// Request deletion of a snapshot, returning the appliance's status.
    fn destroy_snapshot(&self, scope: &Scope, name: &str) -> Result<StatusCode, ApplianceError>;
}

/// URL layout of the storage v1 API for one appliance.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(storage: &str, port: u16) -> Result<Self, ApplianceError> {
        let raw = format!("https://{}:{}/api/storage/v1/", storage, port);
        let base = Url::parse(&raw).map_err(|e| ApplianceError::InvalidUrl {
            url: raw,
            message: e.to_string(),
        })?;
        Self::from_base(base)
    }

    /// Use `base` (the `.../api/storage/v1/` root) as given.
    pub fn from_base(base: Url) -> Result<Self, ApplianceError> {
        if base.cannot_be_a_base() {
            return Err(ApplianceError::InvalidUrl {
                url: base.to_string(),
                message: "not a hierarchical URL".into(),
            });
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn filesystems(&self) -> Url {
        self.join(&["filesystems"])
    }

    pub fn snapshots(&self, scope: &Scope) -> Url {
        self.join(&[
            "pools",
            &scope.pool,
            "projects",
            &scope.project,
            "filesystems",
            &scope.filesystem,
            "snapshots",
        ])
    }

    /// URL deleting `name`; the appliance requires `confirm=true`.
    pub fn snapshot_deletion(&self, scope: &Scope, name: &str) -> Url {
        let mut url = self.snapshots(scope);
        if let Ok(mut path) = url.path_segments_mut() {
            path.push(name);
        }
        url.query_pairs_mut().append_pair("confirm", "true");
        url
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `from_base`: the URL has a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Blocking REST client with the appliance's credential headers baked in.
#[derive(Debug)]
pub struct RestClient {
    http: Client,
    endpoints: Endpoints,
}

impl RestClient {
    pub fn new(connection: &Connection) -> Result<Self, ApplianceError> {
        let endpoints = Endpoints::new(&connection.storage, connection.port)?;
        Self::with_endpoints(connection, endpoints)
    }

    /// Client for `endpoints`, ignoring the connection's storage and port.
    pub fn with_endpoints(
        connection: &Connection,
        endpoints: Endpoints,
    ) -> Result<Self, ApplianceError> {
        let http = Client::builder()
            .default_headers(auth_headers(connection)?)
            // Appliances ship self-signed certificates.
            .danger_accept_invalid_certs(true)
            .timeout(connection.timeout)
            .build()
            .map_err(ApplianceError::Client)?;
        Ok(Self { http, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn send(
        &self,
        method: &'static str,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<Response, ApplianceError> {
        let response = request.send().map_err(|source| ApplianceError::Transport {
            method,
            url: url.to_string(),
            source,
        })?;
        debug!(method, %url, status = %response.status(), "appliance request");
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApplianceError> {
        let response = self.send("GET", &url, self.http.get(url.clone()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApplianceError::Status {
                method: "GET",
                url: url.to_string(),
                status,
            });
        }
        response.json().map_err(|source| ApplianceError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl Appliance for RestClient {
    fn filesystems(&self) -> Result<Vec<Filesystem>, ApplianceError> {
        let list: FilesystemList = self.get_json(self.endpoints.filesystems())?;
        Ok(list.filesystems)
    }

    fn snapshots(&self, scope: &Scope) -> Result<Inventory, ApplianceError> {
        self.get_json(self.endpoints.snapshots(scope))
    }

    fn create_snapshot(&self, scope: &Scope, name: &str) -> Result<StatusCode, ApplianceError> {
        let url = self.endpoints.snapshots(scope);
        let request = self.http.post(url.clone()).json(&NewSnapshot::unlocked(name));
        Ok(self.send("POST", &url, request)?.status())
    }

    fn destroy_snapshot(&self, scope: &Scope, name: &str) -> Result<StatusCode, ApplianceError> {
        let url = self.endpoints.snapshot_deletion(scope, name);
        let request = self.http.delete(url.clone());
        Ok(self.send("DELETE", &url, request)?.status())
    }
}

fn auth_headers(connection: &Connection) -> Result<HeaderMap, ApplianceError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let user = HeaderValue::from_str(&connection.user)
        .map_err(|_| ApplianceError::InvalidHeader("X-Auth-User"))?;
    let mut key = HeaderValue::from_str(&connection.key)
        .map_err(|_| ApplianceError::InvalidHeader("X-Auth-Key"))?;
    key.set_sensitive(true);
    headers.insert("X-Auth-User", user);
    headers.insert("X-Auth-Key", key);
    Ok(headers)
}
