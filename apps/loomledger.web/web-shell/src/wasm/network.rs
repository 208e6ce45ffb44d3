use super::*;

use async_trait::async_trait;
use gloo_net::http::Request;

pub(super) type DashboardClient = ApiClient<GlooTransport, LocalStorageStore, LocationNavigator>;

#[derive(Debug, Clone, Copy, Default)]
pub(super) struct GlooTransport;

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            HttpMethod::Get => Request::get(&request.url),
            HttpMethod::Post => Request::post(&request.url),
            HttpMethod::Put => Request::put(&request.url),
            HttpMethod::Patch => Request::patch(&request.url),
            HttpMethod::Delete => Request::delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let sent = match request.body {
            Some(body) => {
                builder
                    .body(body)
                    .map_err(|error| ApiError::network(format!("invalid request body: {error}")))?
                    .send()
                    .await
            }
            None => builder.send().await,
        };
        let response = sent.map_err(|error| {
            ApiError::network(format!(
                "{} {} failed: {error}",
                request.method.as_str(),
                request.url
            ))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|error| {
            ApiError::decode(status, format!("failed to read response body: {error}"))
        })?;
        Ok(HttpResponse { status, body })
    }
}

pub(super) fn json_to_js(value: &Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

pub(super) fn js_to_json(value: &JsValue) -> Option<Value> {
    serde_wasm_bindgen::from_value(value.clone()).ok()
}

/// Message argument from page scripts as JSON. `Error` objects contribute
/// their message.
pub(super) fn message_value(message: &JsValue) -> Value {
    if let Some(error) = message.dyn_ref::<js_sys::Error>() {
        return Value::String(String::from(error.message()));
    }
    js_to_json(message).unwrap_or_else(|| Value::String(format!("{message:?}")))
}

fn reflect_get(target: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// `error.response.data.detail` of a rejection, when present.
pub(super) fn response_detail(error: &JsValue) -> Option<Value> {
    let response = reflect_get(error, "response")?;
    let data = reflect_get(&response, "data")?;
    let detail = reflect_get(&data, "detail")?;
    js_to_json(&detail)
}

/// Rejection value for page scripts: an `Error` with `response.status` and
/// `response.data.detail` when the server answered.
pub(super) fn api_error_to_js(error: &ApiError) -> JsValue {
    let js_error = js_sys::Error::new(&error.message);
    let target: &JsValue = js_error.as_ref();
    let _ = js_sys::Reflect::set(
        target,
        &JsValue::from_str("kind"),
        &JsValue::from_str(error.kind.as_str()),
    );
    let _ = js_sys::Reflect::set(
        target,
        &JsValue::from_str("retryable"),
        &JsValue::from_bool(error.retryable),
    );

    if error.status_code != 0 {
        let response = js_sys::Object::new();
        let data = js_sys::Object::new();
        if let Some(detail) = &error.detail {
            let _ = js_sys::Reflect::set(&data, &JsValue::from_str("detail"), &json_to_js(detail));
        }
        let _ = js_sys::Reflect::set(
            &response,
            &JsValue::from_str("status"),
            &JsValue::from_f64(f64::from(error.status_code)),
        );
        let _ = js_sys::Reflect::set(&response, &JsValue::from_str("data"), &data);
        let _ = js_sys::Reflect::set(target, &JsValue::from_str("response"), &response);
    }
    js_error.into()
}
