//! JS interop: embedded glue scripts, library readiness and fetch.
//!
//! The Leaflet and Chart.js glue lives in `assets/js/*.js`, is embedded at
//! compile time and evaluated once at start-up. It only defines
//! `window.danaMap` / `window.danaCharts`; the libraries themselves are
//! loaded by the host page and may arrive later, so callers wait for them
//! with [`wait_for_global`].

use anyhow::{anyhow, Context};
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

static STORY_MAP_JS: &str = include_str!("../assets/js/story-map.js");
static CHARTS_JS: &str = include_str!("../assets/js/charts.js");

/// Delay between readiness checks.
const POLL_MS: i32 = 100;

/// Evaluate the glue scripts at global scope. Safe to call more than once.
pub fn init_scripts() {
    let loaded = web_sys::window()
        .map(|w| Reflect::has(&w, &"danaMap".into()).unwrap_or(false))
        .unwrap_or(false);
    if loaded {
        return;
    }
    let all_js = [STORY_MAP_JS, CHARTS_JS].join("\n");
    if let Err(e) = js_sys::eval(&all_js) {
        log::error!("[DANA] js: glue scripts failed: {:?}", e);
        return;
    }
    log::info!("[DANA] js: glue scripts loaded");
}

fn has_global(name: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    Reflect::get(&window, &name.into())
        .map(|v| !v.is_undefined() && !v.is_null())
        .unwrap_or(false)
}

/// Resolve after `ms` milliseconds, or at once if no timer can be set.
pub async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        let scheduled = match web_sys::window() {
            Some(window) => window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .map_err(js_error),
            None => Err(anyhow!("no window")),
        };
        if let Err(e) = scheduled {
            log::warn!("[DANA] js: timer not scheduled: {:#}", e);
            if let Err(e) = resolve.call0(&JsValue::NULL) {
                log::warn!("[DANA] js: {:?}", e);
            }
        }
    });
    if let Err(e) = JsFuture::from(promise).await {
        log::warn!("[DANA] js: sleep rejected: {:?}", e);
    }
}

/// Poll until `window[name]` exists, giving up after `attempts` checks.
pub async fn wait_for_global(name: &str, attempts: u32) -> anyhow::Result<()> {
    for _ in 0..attempts {
        if has_global(name) {
            return Ok(());
        }
        sleep(POLL_MS).await;
    }
    Err(anyhow!("{} did not load", name))
}

/// Turn a thrown JS value into an error message.
pub(crate) fn js_error(value: JsValue) -> anyhow::Error {
    match value.dyn_ref::<js_sys::Error>() {
        Some(err) => anyhow!("{}", String::from(err.message())),
        None => anyhow!("{:?}", value),
    }
}

/// GET a same-origin resource as text. Non-2xx statuses are errors.
pub async fn fetch_text(url: &str) -> anyhow::Result<String> {
    let window = web_sys::window().context("no window")?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);
    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)
        .with_context(|| format!("fetching {}", url))?;
    let response: Response = response.dyn_into().map_err(js_error)?;
    if !response.ok() {
        return Err(anyhow!("{} returned HTTP {}", url, response.status()));
    }

    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)
        .with_context(|| format!("reading {}", url))?;
    text.as_string()
        .with_context(|| format!("{} body is not text", url))
}
