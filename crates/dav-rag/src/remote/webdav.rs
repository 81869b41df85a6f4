//! WebDAV remote file store client
//!
//! Talks to a Nextcloud-style WebDAV server: files live under
//! `{base_url}/files/{login}/`, existence checks and listings use PROPFIND
//! (207 multistatus responses), downloads use plain GET with basic auth.

use async_trait::async_trait;
use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, Method, StatusCode, Url};
use std::time::Duration;

use super::{RemoteEntry, RemoteFileHandle, RemoteStore};
use crate::config::WebdavConfig;
use crate::error::{Error, Result};

const PROPFIND_EXISTS_BODY: &str = r#"<?xml version="1.0"?>
<d:propfind xmlns:d="DAV:">
  <d:prop>
    <d:getcontentlength/>
  </d:prop>
</d:propfind>"#;

const PROPFIND_LIST_BODY: &str = r#"<?xml version="1.0"?>
<d:propfind xmlns:d="DAV:">
  <d:prop>
    <d:resourcetype/>
    <d:getcontenttype/>
  </d:prop>
</d:propfind>"#;

/// WebDAV-backed remote store
pub struct WebdavStore {
    client: Client,
    config: WebdavConfig,
}

impl WebdavStore {
    /// Create a client from WebDAV configuration
    pub fn new(config: WebdavConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build WebDAV client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build the URL of a path under the user's file root
    ///
    /// Path segments are percent-encoded individually so filenames with
    /// spaces or unicode survive the round trip.
    fn url_for(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| Error::Config(format!("Invalid WebDAV base URL: {}", e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::Config("WebDAV base URL cannot be a base".to_string()))?;
            segments.pop_if_empty();
            segments.push("files");
            segments.push(&self.config.login);
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }

        Ok(url)
    }

    async fn propfind(&self, url: Url, depth: &str, body: &'static str) -> Result<reqwest::Response> {
        let method = Method::from_bytes(b"PROPFIND")
            .map_err(|e| Error::internal(format!("Invalid HTTP method: {}", e)))?;

        self.client
            .request(method, url)
            .basic_auth(&self.config.login, Some(&self.config.password))
            .header("Depth", depth)
            .header("Content-Type", "application/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("PROPFIND failed: {}", e)))
    }
}

#[async_trait]
impl RemoteStore for WebdavStore {
    async fn exists(&self, name: &str) -> Result<RemoteFileHandle> {
        let url = self.url_for(name)?;
        let response = self.propfind(url, "0", PROPFIND_EXISTS_BODY).await?;

        match response.status() {
            StatusCode::MULTI_STATUS => {
                let xml = response
                    .text()
                    .await
                    .map_err(|e| Error::transport(format!("PROPFIND body read failed: {}", e)))?;
                Ok(RemoteFileHandle {
                    remote_name: name.to_string(),
                    exists: true,
                    size: parse_content_length(&xml),
                })
            }
            StatusCode::NOT_FOUND => Ok(RemoteFileHandle {
                remote_name: name.to_string(),
                exists: false,
                size: None,
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::transport(format!(
                "WebDAV auth rejected for '{}' ({})",
                name,
                response.status()
            ))),
            status => Err(Error::transport(format!(
                "Unexpected PROPFIND status for '{}': {}",
                name, status
            ))),
        }
    }

    async fn fetch(&self, name: &str) -> Result<Bytes> {
        let url = self.url_for(name)?;
        let response = self
            .client
            .get(url)
            .basic_auth(&self.config.login, Some(&self.config.password))
            .send()
            .await
            .map_err(|e| Error::transport(format!("Download of '{}' failed: {}", name, e)))?;

        match response.status() {
            status if status.is_success() => response
                .bytes()
                .await
                .map_err(|e| Error::transport(format!("Download of '{}' aborted: {}", name, e))),
            StatusCode::NOT_FOUND => Err(Error::RemoteNotFound(name.to_string())),
            status => Err(Error::transport(format!(
                "Download of '{}' returned {}",
                name, status
            ))),
        }
    }

    async fn list(&self, directory: &str) -> Result<Vec<RemoteEntry>> {
        let url = self.url_for(directory)?;
        let request_path = url.path().to_string();
        let response = self.propfind(url, "1", PROPFIND_LIST_BODY).await?;

        match response.status() {
            StatusCode::MULTI_STATUS => {
                let xml = response
                    .text()
                    .await
                    .map_err(|e| Error::transport(format!("Listing body read failed: {}", e)))?;
                // The listing echoes the requested collection itself; drop it.
                Ok(parse_multistatus(&xml)
                    .into_iter()
                    .filter(|entry| entry.href.trim_end_matches('/') != request_path.trim_end_matches('/'))
                    .collect())
            }
            StatusCode::NOT_FOUND => Err(Error::RemoteNotFound(directory.to_string())),
            status => Err(Error::transport(format!(
                "Listing of '{}' returned {}",
                directory, status
            ))),
        }
    }

    fn name(&self) -> &str {
        "webdav"
    }
}

/// Pull `getcontentlength` out of a Depth-0 PROPFIND response
fn parse_content_length(xml: &str) -> Option<u64> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_length = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"getcontentlength" {
                    in_length = true;
                }
            }
            Ok(Event::Text(e)) => {
                if in_length {
                    if let Ok(text) = e.unescape() {
                        if let Ok(size) = text.trim().parse() {
                            return Some(size);
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"getcontentlength" {
                    in_length = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }
    None
}

/// Parse a Depth-1 multistatus listing into entries
fn parse_multistatus(xml: &str) -> Vec<RemoteEntry> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut href: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut is_directory = false;
    let mut current: Option<&'static str> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"response" => {
                    href = None;
                    content_type = None;
                    is_directory = false;
                }
                b"href" => current = Some("href"),
                b"getcontenttype" => current = Some("contenttype"),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"collection" {
                    is_directory = true;
                }
            }
            Ok(Event::Text(e)) => {
                if let Ok(text) = e.unescape() {
                    match current {
                        Some("href") => href = Some(text.into_owned()),
                        Some("contenttype") => content_type = Some(text.into_owned()),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"href" | b"getcontenttype" => current = None,
                b"response" => {
                    if let Some(href) = href.take() {
                        let name = percent_decode(
                            href.trim_end_matches('/')
                                .rsplit('/')
                                .next()
                                .unwrap_or(&href),
                        );
                        entries.push(RemoteEntry {
                            href,
                            name,
                            is_directory,
                            content_type: content_type.take(),
                        });
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    entries
}

/// Decode percent-encoded path segments from hrefs
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let high = (bytes[i + 1] as char).to_digit(16);
            let low = (bytes[i + 2] as char).to_digit(16);
            if let (Some(high), Some(low)) = (high, low) {
                out.push((high * 16 + low) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> WebdavStore {
        WebdavStore::new(WebdavConfig {
            base_url: "https://cloud.example.com/remote.php/dav".to_string(),
            login: "alice".to_string(),
            password: "secret".to_string(),
            request_timeout_secs: 5,
        })
        .expect("client should build")
    }

    #[test]
    fn file_urls_live_under_the_user_root_and_encode_spaces() {
        let url = store().url_for("Projects/Q3 report.pdf").expect("url should build");
        assert_eq!(
            url.as_str(),
            "https://cloud.example.com/remote.php/dav/files/alice/Projects/Q3%20report.pdf"
        );
    }

    #[test]
    fn parses_content_length_from_propfind() {
        let xml = r#"<?xml version="1.0"?>
            <d:multistatus xmlns:d="DAV:">
              <d:response>
                <d:href>/remote.php/dav/files/alice/report.pdf</d:href>
                <d:propstat>
                  <d:prop><d:getcontentlength>40960</d:getcontentlength></d:prop>
                  <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
              </d:response>
            </d:multistatus>"#;
        assert_eq!(parse_content_length(xml), Some(40960));
        assert_eq!(parse_content_length("<d:multistatus xmlns:d=\"DAV:\"/>"), None);
    }

    #[test]
    fn parses_directory_listing_with_collections_and_files() {
        let xml = r#"<?xml version="1.0"?>
            <d:multistatus xmlns:d="DAV:">
              <d:response>
                <d:href>/remote.php/dav/files/alice/docs/</d:href>
                <d:propstat>
                  <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
                  <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
              </d:response>
              <d:response>
                <d:href>/remote.php/dav/files/alice/docs/Q3%20report.pdf</d:href>
                <d:propstat>
                  <d:prop>
                    <d:resourcetype/>
                    <d:getcontenttype>application/pdf</d:getcontenttype>
                  </d:prop>
                  <d:status>HTTP/1.1 200 OK</d:status>
                </d:propstat>
              </d:response>
            </d:multistatus>"#;

        let entries = parse_multistatus(xml);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_directory);
        assert_eq!(entries[0].name, "docs");
        assert!(!entries[1].is_directory);
        assert_eq!(entries[1].name, "Q3 report.pdf");
        assert_eq!(entries[1].content_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn percent_decoding_handles_utf8_and_bad_sequences() {
        assert_eq!(percent_decode("Q3%20report.pdf"), "Q3 report.pdf");
        assert_eq!(percent_decode("%C3%BCbersicht.txt"), "übersicht.txt");
        assert_eq!(percent_decode("100%_done"), "100%_done");
    }
}
