use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::modules::storage::{
    ListPage, ObjectResponse, ObjectStoreClient, ObjectSummary, StoreError, USER_METADATA_HEADER,
};

/// Content type S3 assigns when a write does not name one
const S3_DEFAULT_CONTENT_TYPE: &str = "binary/octet-stream";

#[derive(Debug, Clone)]
struct FakeObject {
    content: Vec<u8>,
    content_type: String,
    headers: BTreeMap<String, String>,
}

/// In-memory stand-in for an S3 bucket that records every request it serves
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<BTreeMap<String, FakeObject>>,
    calls: Mutex<Vec<String>>,
    forced_status: Mutex<Option<u16>>,
    write_status: Mutex<Option<u16>>,
    offline: AtomicBool,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without recording a request
    pub fn insert(&self, key: &str, content: &[u8], content_type: &str) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            FakeObject {
                content: content.to_vec(),
                content_type: content_type.to_string(),
                headers: BTreeMap::new(),
            },
        );
    }

    /// Attach a raw response header to a seeded object
    pub fn set_header(&self, key: &str, name: &str, value: &str) {
        if let Some(object) = self.objects.lock().unwrap().get_mut(key) {
            object.headers.insert(name.to_string(), value.to_string());
        }
    }

    /// Answer every following request with `status`
    pub fn respond_with_status(&self, status: u16) {
        *self.forced_status.lock().unwrap() = Some(status);
    }

    pub fn clear_status(&self) {
        *self.forced_status.lock().unwrap() = None;
    }

    /// Answer uploads and metadata updates with `status`
    pub fn fail_writes_with(&self, status: u16) {
        *self.write_status.lock().unwrap() = Some(status);
    }

    /// Fail every following request before a status is obtained
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn content_of(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|object| object.content.clone())
    }

    pub fn header_of(&self, key: &str, name: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .and_then(|object| object.headers.get(name).cloned())
    }

    fn record(&self, method: &str, key: &str) -> Result<Option<u16>, StoreError> {
        self.calls.lock().unwrap().push(format!("{} {}", method, key));
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(*self.forced_status.lock().unwrap())
    }

    fn write_status(&self) -> Option<u16> {
        *self.write_status.lock().unwrap()
    }

    fn respond(&self, key: &str, with_body: bool) -> ObjectResponse {
        let objects = self.objects.lock().unwrap();
        let Some(object) = objects.get(key) else {
            return ObjectResponse {
                status: 404,
                ..Default::default()
            };
        };

        let mut headers = std::collections::HashMap::new();
        headers.insert("content-type".to_string(), object.content_type.clone());
        headers.insert(
            "content-length".to_string(),
            object.content.len().to_string(),
        );
        for (name, value) in &object.headers {
            headers.insert(name.clone(), value.clone());
        }

        ObjectResponse {
            status: 200,
            headers,
            body: if with_body {
                object.content.clone()
            } else {
                Vec::new()
            },
        }
    }
}

#[async_trait]
impl ObjectStoreClient for InMemoryObjectStore {
    async fn head_object(&self, key: &str) -> Result<ObjectResponse, StoreError> {
        if let Some(status) = self.record("HEAD", key)? {
            return Ok(ObjectResponse {
                status,
                ..Default::default()
            });
        }
        Ok(self.respond(key, false))
    }

    async fn get_object(&self, key: &str) -> Result<ObjectResponse, StoreError> {
        if let Some(status) = self.record("GET", key)? {
            return Ok(ObjectResponse {
                status,
                ..Default::default()
            });
        }
        Ok(self.respond(key, true))
    }

    async fn put_object(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
        headers: &[(String, String)],
    ) -> Result<u16, StoreError> {
        if let Some(status) = self.record("PUT", key)?.or(self.write_status()) {
            return Ok(status);
        }
        self.objects.lock().unwrap().insert(
            key.to_string(),
            FakeObject {
                content: content.to_vec(),
                content_type: content_type.to_string(),
                headers: headers.iter().cloned().collect(),
            },
        );
        Ok(200)
    }

    async fn replace_metadata(
        &self,
        key: &str,
        headers: &[(String, String)],
    ) -> Result<u16, StoreError> {
        if let Some(status) = self.record("COPY", key)?.or(self.write_status()) {
            return Ok(status);
        }
        let mut objects = self.objects.lock().unwrap();
        let Some(object) = objects.get_mut(key) else {
            return Ok(404);
        };
        // A REPLACE copy keeps only what the request carries
        object.content_type = S3_DEFAULT_CONTENT_TYPE.to_string();
        object
            .headers
            .retain(|name, _| !name.starts_with(USER_METADATA_HEADER));
        for (name, value) in headers {
            if name.eq_ignore_ascii_case("content-type") {
                object.content_type = value.clone();
            } else {
                object.headers.insert(name.clone(), value.clone());
            }
        }
        Ok(200)
    }

    async fn delete_object(&self, key: &str) -> Result<u16, StoreError> {
        if let Some(status) = self.record("DELETE", key)? {
            return Ok(status);
        }
        // S3 answers 204 whether or not the key existed
        self.objects.lock().unwrap().remove(key);
        Ok(204)
    }

    async fn list_objects(&self, marker: Option<&str>) -> Result<(u16, ListPage), StoreError> {
        if let Some(status) = self.record("LIST", marker.unwrap_or(""))? {
            return Ok((status, ListPage::default()));
        }
        let objects = self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| marker.map_or(true, |m| key.as_str() > m))
            .map(|(key, object)| ObjectSummary {
                key: key.clone(),
                size: object.content.len() as u64,
                last_modified: "2024-01-01T00:00:00.000Z".to_string(),
                e_tag: None,
            })
            .collect();
        Ok((
            200,
            ListPage {
                objects,
                next_marker: None,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_without_content_type_resets_it() {
        let store = InMemoryObjectStore::new();
        store.insert("a.png", b"png", "image/png");

        let headers = vec![("x-amz-meta-credit".to_string(), "\"AP\"".to_string())];
        assert_eq!(store.replace_metadata("a.png", &headers).await.unwrap(), 200);

        let head = store.head_object("a.png").await.unwrap();
        assert_eq!(head.header("content-type"), Some(S3_DEFAULT_CONTENT_TYPE));
        assert_eq!(head.header("x-amz-meta-credit"), Some("\"AP\""));
    }
}
