//! JsValue → エラーメッセージ変換

use photo_magic_common::Error;
use wasm_bindgen::{JsCast, JsValue};

/// fetch の失敗を共通エラーに変換（AbortSignal の時間切れは Timeout）
pub fn request_error(value: JsValue) -> Error {
    if is_timeout(&value) {
        Error::Timeout
    } else {
        Error::Remote(js_message(&value))
    }
}

fn is_timeout(value: &JsValue) -> bool {
    value
        .dyn_ref::<web_sys::DomException>()
        .map(|e| matches!(e.name().as_str(), "TimeoutError" | "AbortError"))
        .unwrap_or(false)
}

/// JS側の例外から人が読めるメッセージを取り出す
pub fn js_message(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Some(exception) = value.dyn_ref::<web_sys::DomException>() {
        return exception.message();
    }
    format!("{:?}", value)
}

#[cfg(all(target_arch = "wasm32", test))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_string_value() {
        assert_eq!(js_message(&JsValue::from_str("Failed to fetch")), "Failed to fetch");
    }

    #[wasm_bindgen_test]
    fn test_timeout_exception_maps_to_timeout() {
        for name in ["TimeoutError", "AbortError"] {
            let exception =
                web_sys::DomException::new_with_message_and_name("signal timed out", name).unwrap();
            let err = request_error(exception.into());
            assert!(matches!(err, Error::Timeout));
            assert_eq!(err.to_string(), "The request to the image service timed out.");
        }
    }

    #[wasm_bindgen_test]
    fn test_other_failure_keeps_message() {
        let err = request_error(js_sys::Error::new("Failed to fetch").into());
        assert!(matches!(&err, Error::Remote(m) if m == "Failed to fetch"));
    }

    #[wasm_bindgen_test]
    fn test_js_error_message() {
        let error = js_sys::Error::new("quota exceeded");
        assert_eq!(js_message(&error.into()), "quota exceeded");
    }
}
