//! Views and the values they produce.
//!
//! A [`View`] renders one layer of a component. Views are composed by the
//! pipeline from the last declared to the first: each one receives the output
//! of the view declared after it (`yielded`) and returns a new output, so the
//! first declared view ends up as the outermost wrapper.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{pipe::Pipe, view_model::ViewModel};

/// Attributes the host passes to a rendering node.
pub type Attrs = serde_json::Map<String, Value>;

/// A renderer unit composed into a component's view pipeline.
pub trait View: 'static {
    /// Renders this layer.
    ///
    /// `yielded` is the output of the view declared right after this one,
    /// or `None` for the innermost view.
    fn render(&self, cx: &mut RenderContext<'_>, yielded: Option<VNode>) -> Option<VNode>;
}

impl<F> View for F
where
    F: Fn(&mut RenderContext<'_>, Option<VNode>) -> Option<VNode> + 'static,
{
    fn render(&self, cx: &mut RenderContext<'_>, yielded: Option<VNode>) -> Option<VNode> {
        self(cx, yielded)
    }
}

/// Pins the signature of a closure so it can be used as a [`View`].
pub const fn view_fn<F>(f: F) -> F
where
    F: Fn(&mut RenderContext<'_>, Option<VNode>) -> Option<VNode> + 'static,
{
    f
}

/// Everything a view can see while it renders.
pub struct RenderContext<'a> {
    component: &'a str,
    attrs: &'a Attrs,
    pipe: &'a mut Pipe,
    view_model: Option<&'a dyn ViewModel>,
}

impl core::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderContext")
            .field("component", &self.component)
            .field("attrs", &self.attrs)
            .field("pipe", &self.pipe)
            .field("view_model", &self.view_model.is_some())
            .finish()
    }
}

impl<'a> RenderContext<'a> {
    /// Creates a context for rendering `component`.
    pub const fn new(
        component: &'a str,
        attrs: &'a Attrs,
        pipe: &'a mut Pipe,
        view_model: Option<&'a dyn ViewModel>,
    ) -> Self {
        Self {
            component,
            attrs,
            pipe,
            view_model,
        }
    }

    /// Name of the component being rendered.
    #[must_use]
    pub const fn component(&self) -> &str {
        self.component
    }

    /// Attributes of the rendering node.
    #[must_use]
    pub const fn attrs(&self) -> &Attrs {
        self.attrs
    }

    /// Returns a single attribute.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// The pipe shared by every view of this render pass.
    #[must_use]
    pub const fn pipe(&self) -> &Pipe {
        self.pipe
    }

    /// Mutable access to the shared pipe.
    #[must_use]
    pub const fn pipe_mut(&mut self) -> &mut Pipe {
        self.pipe
    }

    /// The viewmodel bound to the views, if one could be resolved.
    #[must_use]
    pub fn view_model(&self) -> Option<&dyn ViewModel> {
        self.view_model
    }

    /// Downcasts the bound viewmodel.
    #[must_use]
    pub fn view_model_as<T: ViewModel>(&self) -> Option<&T> {
        self.view_model.and_then(|vm| vm.downcast_ref::<T>())
    }
}

/// Output of a render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VNode {
    /// A text leaf.
    Text {
        /// Text content.
        text: String,
    },
    /// A tagged element.
    Element {
        /// Tag name, e.g. `div`.
        tag: String,
        /// Element attributes.
        #[serde(default, skip_serializing_if = "Attrs::is_empty")]
        attrs: Attrs,
        /// Child nodes in order.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<VNode>,
    },
    /// An ordered group of nodes without a wrapper element.
    Fragment {
        /// Grouped nodes.
        children: Vec<VNode>,
    },
}

impl VNode {
    /// Creates a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates an empty element.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: Attrs::new(),
            children: Vec::new(),
        }
    }

    /// Creates a fragment.
    pub fn fragment(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Fragment {
            children: children.into_iter().collect(),
        }
    }

    /// Sets an attribute. Has no effect on text nodes and fragments.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.insert(key.into(), value.into());
        }
        self
    }

    /// Appends a child. A text node is promoted to a fragment.
    #[must_use]
    pub fn child(self, child: Self) -> Self {
        match self {
            Self::Element {
                tag,
                attrs,
                mut children,
            } => {
                children.push(child);
                Self::Element {
                    tag,
                    attrs,
                    children,
                }
            }
            Self::Fragment { mut children } => {
                children.push(child);
                Self::Fragment { children }
            }
            text @ Self::Text { .. } => Self::fragment([text, child]),
        }
    }

    /// Appends `child` when it is present.
    #[must_use]
    pub fn child_opt(self, child: Option<Self>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    /// Returns the tag of an element node.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Returns the children of an element or fragment.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Element { children, .. } | Self::Fragment { children } => children,
            Self::Text { .. } => &[],
        }
    }

    /// Concatenates every text leaf below this node.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            _ => self.children().iter().map(Self::text_content).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_nested_elements() {
        let node = VNode::element("div")
            .attr("class", "mock")
            .child(VNode::text("mock"));
        assert_eq!(node.tag(), Some("div"));
        assert_eq!(node.text_content(), "mock");
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "type": "element",
                "tag": "div",
                "attrs": {"class": "mock"},
                "children": [{"type": "text", "text": "mock"}],
            })
        );
    }

    #[test]
    fn text_child_becomes_fragment() {
        let node = VNode::text("a").child(VNode::text("b"));
        assert!(matches!(node, VNode::Fragment { .. }));
        assert_eq!(node.text_content(), "ab");
    }

    #[test]
    fn closures_render() {
        let view = view_fn(|cx, yielded| {
            let label = cx.attr("label").and_then(Value::as_str).unwrap_or("none");
            Some(VNode::element("span").child(VNode::text(label)).child_opt(yielded))
        });

        let attrs: Attrs = json!({"label": "hi"}).as_object().cloned().unwrap();
        let mut pipe = Pipe::new();
        let mut cx = RenderContext::new("mock", &attrs, &mut pipe, None);
        let out = view.render(&mut cx, Some(VNode::text("!"))).unwrap();
        assert_eq!(out.text_content(), "hi!");
        assert_eq!(cx.component(), "mock");
        assert!(cx.view_model().is_none());
    }
}
