use serde_json::Value;
use yansi::Paint;
use std::sync::atomic::{AtomicBool, Ordering};

use super::error::ApiError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

/// Connection details for one caller: shared HTTP client, backend root and
/// the caller's bearer token (empty when logged out).
#[derive(Clone, Debug)]
pub struct ApiContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub token: String,
}

impl ApiContext {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

/// `Authorization` header value; tokens already carrying the scheme are kept as is.
pub fn bearer_header(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {}", token)
    }
}

fn mask_token(token: &str) -> String {
    let raw = token.strip_prefix("Bearer ").unwrap_or(token);
    if raw.chars().count() <= 8 {
        "***".to_string()
    } else {
        format!("{}...", raw.chars().take(8).collect::<String>())
    }
}

/// Copy of a request body safe to print: `password` values are masked.
fn redact(body: &Value) -> Value {
    let mut copy = body.clone();
    if let Some(obj) = copy.as_object_mut() {
        if let Some(pw) = obj.get_mut("password") {
            *pw = Value::String("***".into());
        }
    }
    copy
}

fn log_request(ctx: &ApiContext, method: &str, url: &str, body: Option<&Value>, multipart: bool) {
    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(url).fg(yansi::Color::Cyan)));

    if !ctx.token.is_empty() {
        parts.push(format!("{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new(format!("'Authorization: Bearer {}'", mask_token(&ctx.token))).fg(yansi::Color::Magenta)
        ));
    }
    if let Some(d) = body {
        let json_str = serde_json::to_string_pretty(&redact(d)).unwrap_or_default();
        let escaped_json = json_str.replace('\'', "'\\''");
        parts.push(format!("{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Content-Type: application/json'").fg(yansi::Color::Magenta)
        ));
        parts.push(format!("{} {}",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(format!("'{}'", escaped_json)).fg(yansi::Color::White)
        ));
    }
    if multipart {
        parts.push(format!("{} {}",
            Paint::new("-F").fg(yansi::Color::Blue),
            Paint::new("<multipart form>").fg(yansi::Color::White)
        ));
    }
    log_output(format!("Request:\n{}", parts.join(" ")));
}

fn log_response(result: &Result<Value, ApiError>) {
    let text = match result {
        Ok(v) => serde_json::to_string(v).unwrap_or_else(|_| format!("{:?}", v)),
        Err(e) => format!("{} {}", e, e.body().map(|b| b.to_string()).unwrap_or_default()),
    };
    log_output(format!("Response:\n{}", Paint::new(text).rgb(100, 100, 100)));
}

fn build_request(ctx: &ApiContext, method: &str, url: &str) -> reqwest::RequestBuilder {
    let req = match method {
        "GET" => ctx.client.get(url),
        "POST" => ctx.client.post(url),
        "PUT" => ctx.client.put(url),
        "DELETE" => ctx.client.delete(url),
        "PATCH" => ctx.client.patch(url),
        _ => ctx.client.get(url),
    };
    let req = req.header(reqwest::header::ACCEPT, "application/json");
    if ctx.token.is_empty() {
        req
    } else {
        req.header(reqwest::header::AUTHORIZATION, bearer_header(&ctx.token))
    }
}

/// Decode a response body: JSON when it parses, the raw text otherwise,
/// `Null` when empty.
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

async fn finish(req: reqwest::RequestBuilder) -> Result<Value, ApiError> {
    let resp = req.send().await?;
    let status = resp.status();
    let text = resp.text().await?;
    let body = decode_body(&text);
    if status.is_success() {
        Ok(body)
    } else {
        Err(ApiError::Status { status: status.as_u16(), body })
    }
}

/// Core HTTP client function for making API calls.
/// Handles authentication, request building, and error responses.
pub async fn api_call(
    ctx: &ApiContext,
    method: &str,
    endpoint: &str,
    body: Option<Value>,
    params: Option<Vec<(String, String)>>,
) -> Result<Value, ApiError> {
    let mut url_for_log = ctx.url(endpoint);
    if let Some(ref p) = params {
        if !p.is_empty() {
            url_for_log = format!("{}?{}", url_for_log, crate::utils::build_query_string(p));
        }
    }
    log_request(ctx, method, &url_for_log, body.as_ref(), false);

    let mut req = build_request(ctx, method, &ctx.url(endpoint));
    if let Some(ref p) = params {
        req = req.query(p);
    }
    if let Some(ref b) = body {
        req = req.json(b);
    }

    let result = finish(req).await;
    log_response(&result);
    result
}

/// POST a multipart form (file uploads).
pub async fn api_call_multipart(
    ctx: &ApiContext,
    endpoint: &str,
    form: reqwest::multipart::Form,
) -> Result<Value, ApiError> {
    let url = ctx.url(endpoint);
    log_request(ctx, "POST", &url, None, true);
    let req = build_request(ctx, "POST", &url).multipart(form);
    let result = finish(req).await;
    log_response(&result);
    result
}

/// Authenticated GET returning the raw response, for binary downloads.
/// Non-success statuses are turned into [`ApiError::Status`].
pub async fn api_get_raw(ctx: &ApiContext, endpoint: &str) -> Result<reqwest::Response, ApiError> {
    let url = ctx.url(endpoint);
    log_request(ctx, "GET", &url, None, false);
    let resp = build_request(ctx, "GET", &url).send().await?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    Err(ApiError::Status { status: status.as_u16(), body: decode_body(&text) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_adds_scheme_once() {
        assert_eq!(bearer_header("abc"), "Bearer abc");
        assert_eq!(bearer_header("Bearer abc"), "Bearer abc");
    }

    #[test]
    fn decode_body_falls_back_to_text() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("[1,2]"), serde_json::json!([1, 2]));
        assert_eq!(decode_body("plain failure"), Value::String("plain failure".into()));
    }

    #[test]
    fn passwords_are_not_logged() {
        let body = serde_json::json!({"email": "a@b", "password": "hunter2"});
        assert_eq!(redact(&body)["password"], "***");
        assert_eq!(redact(&body)["email"], "a@b");
    }

    #[test]
    fn mask_token_hides_secret() {
        assert_eq!(mask_token("short"), "***");
        assert_eq!(mask_token("Bearer abcdefghijkl"), "abcdefgh...");
    }
}
