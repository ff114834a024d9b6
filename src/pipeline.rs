//! View composition.
//!
//! A component's output is produced by its views in reverse declaration
//! order: the last view renders first with nothing yielded, and each earlier
//! view receives the output of the one after it. The first declared view is
//! therefore the outermost wrapper. All views of one pass share a [`Pipe`].

use track_core::{Attrs, Error, Pipe, Result, VNode};

use crate::{cache::ResolvedView, component::Component};

/// Renders `component` with a caller-provided pipe.
///
/// # Errors
///
/// Returns [`Error::RenderPrecondition`] when no view was resolved and the
/// host requires views, or any resolution error of the component's views.
pub fn render(component: &Component, pipe: &mut Pipe) -> Result<Option<VNode>> {
    let views = component.views()?;
    if views.is_empty() {
        if component.host().config().require_views {
            return Err(Error::RenderPrecondition {
                component: component.name().into(),
            });
        }
        return Ok(None);
    }

    let attrs = component.attrs();
    let output = compose(&views, component.name(), &attrs, pipe);
    tracing::trace!(
        component = component.name(),
        views = views.len(),
        empty = output.is_none(),
        "rendered component"
    );
    Ok(output)
}

/// Folds `views` from last to first, threading each output into the next.
pub fn compose(
    views: &[ResolvedView],
    component: &str,
    attrs: &Attrs,
    pipe: &mut Pipe,
) -> Option<VNode> {
    views
        .iter()
        .rev()
        .fold(None, |yielded, view| view.render(component, attrs, pipe, yielded))
}
