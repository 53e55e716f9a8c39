//! `HttpClient` over the browser `fetch` API.
//!
//! Bodies are read whole into `Bytes`. Any status the browser hands back is
//! a response; only network and CORS failures are errors.

use std::collections::HashMap;

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    http::{HttpClient, HttpRequest, HttpResponse},
};
use bytes::Bytes;
use js_sys::{try_iter, Array, Uint8Array};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response, Window};

use crate::error::js_message;

pub struct WasmHttpClient {
    window: Window,
}

impl WasmHttpClient {
    /// Bind to the current window. Fails in workers and other window-less
    /// contexts.
    pub fn new() -> BridgeResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| BridgeError::NotAvailable("window".to_string()))?;
        Ok(Self { window })
    }

    async fn send(&self, request: &Request) -> BridgeResult<Response> {
        let value = JsFuture::from(self.window.fetch_with_request(request))
            .await
            .map_err(|err| fetch_error("fetch", &err))?;
        value
            .dyn_into::<Response>()
            .map_err(|_| BridgeError::OperationFailed("fetch resolved to a non-Response".into()))
    }
}

fn to_request(request: &HttpRequest) -> BridgeResult<Request> {
    let headers = Headers::new().map_err(|err| fetch_error("headers", &err))?;
    for (name, value) in &request.headers {
        headers
            .append(name, value)
            .map_err(|err| fetch_error("header", &err))?;
    }

    let init = RequestInit::new();
    init.set_method(request.method.as_str());
    init.set_mode(RequestMode::Cors);
    init.set_headers(&headers);

    Request::new_with_str_and_init(&request.url, &init).map_err(|err| fetch_error("request", &err))
}

async fn body_bytes(response: &Response) -> BridgeResult<Bytes> {
    let promise = response
        .array_buffer()
        .map_err(|err| fetch_error("arrayBuffer", &err))?;
    let buffer = JsFuture::from(promise)
        .await
        .map_err(|err| fetch_error("body", &err))?;
    Ok(Bytes::from(Uint8Array::new(&buffer).to_vec()))
}

fn response_headers(response: &Response) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Ok(Some(entries)) = try_iter(&JsValue::from(response.headers())) else {
        return map;
    };

    for entry in entries.flatten() {
        let pair = Array::from(&entry);
        if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            map.insert(name, value);
        }
    }
    map
}

#[async_trait(?Send)]
impl HttpClient for WasmHttpClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        let response = self.send(&to_request(&request)?).await?;
        let status = response.status();
        let body = body_bytes(&response).await?;

        debug!(url = %request.url, status, bytes = body.len(), "fetch completed");

        Ok(HttpResponse {
            status,
            headers: response_headers(&response),
            body,
        })
    }
}

fn fetch_error(stage: &str, err: &JsValue) -> BridgeError {
    BridgeError::OperationFailed(format!("fetch {stage} failed: {}", js_message(err)))
}
