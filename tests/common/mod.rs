#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use yt_harvest::youtube::{SearchPage, TranscriptError, TranscriptSource, VideoApi, VideoRecord};

pub fn video(id: &str, minutes: Option<f64>) -> VideoRecord {
    let mut rec = VideoRecord::new(id, format!("title {id}"));
    rec.duration_minutes = minutes;
    rec
}

/// Search pages keyed by (category, cursor) and a pool of known videos.
#[derive(Default)]
pub struct FakeApi {
    pages: HashMap<(String, Option<String>), SearchPage>,
    videos: HashMap<String, VideoRecord>,
    failing_categories: Vec<String>,
    pub search_calls: Mutex<Vec<(String, Option<String>)>>,
    pub detail_calls: Mutex<Vec<Vec<String>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chain of pages for a category; each page gets a cursor
    /// pointing at the next, the last one none.
    pub fn with_pages(mut self, category: &str, pages: Vec<Vec<VideoRecord>>) -> Self {
        let n = pages.len();
        for (idx, page) in pages.into_iter().enumerate() {
            let token = (idx > 0).then(|| format!("{category}-p{idx}"));
            let next = (idx + 1 < n).then(|| format!("{category}-p{}", idx + 1));
            let ids = page.iter().map(|v| v.video_id.clone()).collect();
            for v in page {
                self.videos.insert(v.video_id.clone(), v);
            }
            self.pages.insert(
                (category.to_string(), token),
                SearchPage {
                    video_ids: ids,
                    next_page_token: next,
                },
            );
        }
        self
    }

    pub fn failing(mut self, category: &str) -> Self {
        self.failing_categories.push(category.to_string());
        self
    }

    pub fn searched_categories(&self) -> Vec<String> {
        let calls = self.search_calls.lock().unwrap();
        let mut out: Vec<String> = Vec::new();
        for (cat, _) in calls.iter() {
            if out.last() != Some(cat) {
                out.push(cat.clone());
            }
        }
        out
    }

    pub fn search_count(&self) -> usize {
        self.search_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl VideoApi for FakeApi {
    async fn search_page(
        &self,
        category_id: &str,
        _region_code: &str,
        _max_results: u32,
        page_token: Option<&str>,
    ) -> Result<SearchPage> {
        let key = (category_id.to_string(), page_token.map(|s| s.to_string()));
        self.search_calls.lock().unwrap().push(key.clone());
        if self.failing_categories.iter().any(|c| c == category_id) {
            return Err(anyhow!("search failed: 403 quotaExceeded"));
        }
        Ok(self.pages.get(&key).cloned().unwrap_or_default())
    }

    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoRecord>> {
        self.detail_calls.lock().unwrap().push(video_ids.to_vec());
        Ok(video_ids
            .iter()
            .filter_map(|id| self.videos.get(id).cloned())
            .collect())
    }
}

pub enum Canned {
    Text(&'static str),
    Disabled,
    NotFound,
    Broken,
}

#[derive(Default)]
pub struct FakeTranscripts {
    answers: HashMap<String, Canned>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTranscripts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, id: &str, canned: Canned) -> Self {
        self.answers.insert(id.to_string(), canned);
        self
    }
}

#[async_trait]
impl TranscriptSource for FakeTranscripts {
    async fn fetch_transcript(&self, video_id: &str) -> Result<String, TranscriptError> {
        self.calls.lock().unwrap().push(video_id.to_string());
        match self.answers.get(video_id) {
            Some(Canned::Text(t)) => Ok(t.to_string()),
            Some(Canned::Disabled) => Err(TranscriptError::Disabled(video_id.to_string())),
            Some(Canned::NotFound) | None => Err(TranscriptError::NotFound(video_id.to_string())),
            Some(Canned::Broken) => Err(TranscriptError::Http {
                status: 500,
                body: "boom".into(),
            }),
        }
    }
}

/// Local HTTP/1.1 responder that answers every request with the same
/// status and body and records each request target (`/path?query`).
pub struct CannedHttp {
    pub base_url: String,
    pub targets: Arc<Mutex<Vec<String>>>,
}

impl CannedHttp {
    pub async fn start(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let targets = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&targets);
        let body = body.to_string();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&buf);
                if let Some(target) = head.lines().next().and_then(|l| l.split(' ').nth(1)) {
                    seen.lock().unwrap().push(target.replace("%2C", ","));
                }
                let resp = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(resp.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            targets,
        }
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}
