use crate::constants::{HIDDEN_CLASS, HINT_SELECTOR};
use web_sys as web;

fn hint(document: &web::Document) -> Option<web::Element> {
    document.query_selector(HINT_SELECTOR).ok().flatten()
}

#[inline]
pub fn is_hidden(document: &web::Document) -> bool {
    hint(document)
        .map(|el| el.class_list().contains(HIDDEN_CLASS))
        .unwrap_or(true)
}

/// Show or hide the `.hint` overlay; a page without one is left alone.
pub fn toggle_hint(document: &web::Document) {
    if let Some(el) = hint(document) {
        _ = el.class_list().toggle(HIDDEN_CLASS);
        log::debug!("[overlay] hint hidden={}", is_hidden(document));
    }
}
