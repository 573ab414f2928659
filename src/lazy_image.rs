//! Swapping an image's placeholder for its real source.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::dom::{Element, ElementKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped,
    /// No usable `data_src`; placeholder kept and a diagnostic recorded.
    MissingSource,
    /// Not an image element; left untouched.
    Skipped,
}

/// Copy the pending full URL into the rendered source.
///
/// Reads only `data_src`, never the placeholder. A missing or blank URL is a
/// data problem, not a transient one, so it is reported once and never retried.
pub fn swap_in_source(element: &mut Element, diagnostics: &Diagnostics) -> SwapOutcome {
    if element.kind() != ElementKind::Image {
        return SwapOutcome::Skipped;
    }

    let url = match element.data_src() {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => {
            diagnostics.record(Diagnostic::MissingImageSource {
                element: element.id(),
            });
            return SwapOutcome::MissingSource;
        }
    };

    log::debug!("{} visible, loading {}", element.id(), url);
    element.set_src(url);
    SwapOutcome::Swapped
}

/// Callback for one-shot image watches.
pub fn lazy_image_callback(diagnostics: Diagnostics) -> impl FnMut(&mut Element) + Send + 'static {
    move |element: &mut Element| {
        swap_in_source(element, &diagnostics);
    }
}
