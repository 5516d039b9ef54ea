//! 日志输出：浏览器中写入控制台，其它平台写入标准输出。

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

pub fn log(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    println!("{}", message);
}

pub fn error(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{}", message);
}
