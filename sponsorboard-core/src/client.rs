use anyhow::{Result, bail};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// 只读 JSON API 客户端，clone 开销很小（内部共享连接池）
#[derive(Clone)]
pub struct SponsorClient {
    http: reqwest::Client,
    base_url: String,
}

impl SponsorClient {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("sponsorboard/0.1.0"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .gzip(true)
            .build()?;

        let base_url = base_url
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 解析响应：非 2xx 状态一律视为错误，附带路径和 `error` 字段（若有）
    pub(crate) fn parse_response<T: serde::de::DeserializeOwned>(
        path: &str,
        status: reqwest::StatusCode,
        text: &str,
    ) -> Result<T> {
        if !status.is_success() {
            // 后端出错时返回 {"error": "..."}
            if let Ok(obj) = serde_json::from_str::<serde_json::Value>(text) {
                if let Some(err) = obj.get("error").and_then(|v| v.as_str()) {
                    bail!("[{}] HTTP {}: {}", path, status.as_u16(), err);
                }
            }
            bail!("[{}] HTTP {}", path, status.as_u16());
        }
        match serde_json::from_str::<T>(text) {
            Ok(v) => Ok(v),
            Err(e) => {
                let end = text.char_indices().nth(200).map_or(text.len(), |(i, _)| i);
                bail!("[{}] unexpected response ({}): {}", path, e, &text[..end]);
            }
        }
    }

    /// GET 请求（无参数）
    pub async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        Self::parse_response(path, status, &text)
    }

    /// GET 请求（带查询参数）
    pub async fn get_with_query<Q: serde::Serialize + ?Sized, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let url = self.url(path);
        let req = self.http.get(&url).query(query);
        debug!(%url, "GET with query");
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        Self::parse_response(path, status, &text)
    }
}
