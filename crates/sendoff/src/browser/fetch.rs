//! `fetch()` wrapper returning [`HttpReply`].

use sendoff_widgets::{FetchError, HttpReply};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// GET `url` and read the body as text.
pub async fn get(url: &str) -> Result<HttpReply, FetchError> {
    send(url, "GET", None).await
}

/// POST a JSON `body` to `url` and read the reply as text.
pub async fn post_json(url: &str, body: &str) -> Result<HttpReply, FetchError> {
    send(url, "POST", Some(body)).await
}

async fn send(url: &str, method: &str, body: Option<&str>) -> Result<HttpReply, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Network("No window".into()))?;

    let init = RequestInit::new();
    init.set_method(method);
    init.set_mode(RequestMode::SameOrigin);
    if let Some(body) = body {
        init.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &init).map_err(network)?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(network)?;
    }

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;

    let status = response.status();
    let text = JsFuture::from(response.text().map_err(body_error)?)
        .await
        .map_err(body_error)?;

    Ok(HttpReply::new(status, text.as_string().unwrap_or_default()))
}

fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|json| json.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

#[allow(clippy::needless_pass_by_value)]
fn network(value: JsValue) -> FetchError {
    FetchError::Network(describe(&value))
}

#[allow(clippy::needless_pass_by_value)]
fn body_error(value: JsValue) -> FetchError {
    FetchError::Body(describe(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_describe_string() {
        assert_eq!(describe(&JsValue::from_str("offline")), "offline");
    }

    #[wasm_bindgen_test]
    fn test_describe_error_uses_message() {
        let error: JsValue = js_sys::Error::new("Failed to fetch").into();
        assert_eq!(describe(&error), "Failed to fetch");
        assert!(matches!(network(error), FetchError::Network(m) if m == "Failed to fetch"));
    }

    #[wasm_bindgen_test]
    fn test_describe_object_as_json() {
        let value = js_sys::JSON::parse(r#"{"code":7}"#).expect("json");
        assert_eq!(describe(&value), r#"{"code":7}"#);
    }
}
