use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlDocument};

use crate::cookies::store::HostCookieStore;

/// Host store bound to the page's `document.cookie`.
///
/// The document is looked up on every call, so the store holds no JS handles
/// and stays `Send + Sync`. Failures of the underlying getter/setter are
/// logged and otherwise ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentCookieStore;

impl DocumentCookieStore {
    pub fn new() -> Self {
        Self
    }
}

fn html_document() -> Option<HtmlDocument> {
    let document = window()?.document()?;
    document.dyn_into::<HtmlDocument>().ok()
}

impl HostCookieStore for DocumentCookieStore {
    fn read(&self) -> String {
        let Some(document) = html_document() else {
            warn!("document.cookie unavailable: no HTML document in this context");
            return String::new();
        };

        document.cookie().unwrap_or_else(|err| {
            warn!("reading document.cookie failed: {err:?}");
            String::new()
        })
    }

    fn write(&self, serialized: &str) {
        let Some(document) = html_document() else {
            warn!("document.cookie unavailable: dropping write `{serialized}`");
            return;
        };

        if let Err(err) = document.set_cookie(serialized) {
            warn!("writing document.cookie failed: {err:?}");
        }
    }
}
