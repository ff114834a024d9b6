//! The definer vocabulary.
//!
//! A definer only ever sees a [`Verbs`] value. Every verb call, typed or
//! dynamic, is dispatched by name through a fixed [`VerbTable`], so a definer
//! cannot reach anything the active table does not list. Two tables exist:
//! [`COMPONENT_VERBS`] (`name`, `views`, `viewmodel`, `event`) and
//! [`VIEW_MODEL_VERBS`] (`name` only).
//!
//! ```
//! use track_core::dsl::{COMPONENT_VERBS, evaluate, Definer};
//! use std::rc::Rc;
//!
//! let base: Definer = Rc::new(|d| {
//!     d.name("base").views(["a", "b"]);
//! });
//! let derived: Definer = Rc::new(|d| {
//!     d.name("derived").view("c");
//! });
//!
//! let declarations = evaluate(&COMPONENT_VERBS, &[base, derived]).unwrap();
//! assert_eq!(declarations.name(), Some("derived"));
//! assert_eq!(declarations.views().len(), 3);
//! ```

use alloc::rc::Rc;

use crate::{
    class::{Capability, Class},
    error::{ConfigurationError, Error, Result},
    metadata::{Declaration, EventBinding},
};

/// A declarative configuration function.
pub type Definer = Rc<dyn Fn(&mut Verbs<'_>)>;

/// A single argument passed to a verb.
#[derive(Debug, Clone)]
pub enum Argument {
    /// A string: a name, an identifier or an event/handler name.
    Text(String),
    /// A class reference.
    Class(Class),
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Class> for Argument {
    fn from(value: Class) -> Self {
        Self::Class(value)
    }
}

impl From<&Class> for Argument {
    fn from(value: &Class) -> Self {
        Self::Class(value.clone())
    }
}

impl From<Declaration> for Argument {
    fn from(value: Declaration) -> Self {
        match value {
            Declaration::Ident(ident) => Self::Text(ident),
            Declaration::Class(class) => Self::Class(class),
        }
    }
}

/// Metadata field a verb writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The component or viewmodel name.
    Name,
    /// The ordered view declarations.
    Views,
    /// The viewmodel declaration.
    ViewModel,
    /// The global event bindings.
    Events,
}

/// How repeated calls of a verb combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The last call wins.
    Overwrite,
    /// Calls accumulate in chain order, then call order.
    Append,
}

type Handler = fn(&mut Declarations, Vec<Argument>) -> Result<()>;

/// One entry of a [`VerbTable`].
pub struct Verb {
    name: &'static str,
    target: Target,
    mode: Mode,
    handler: Handler,
}

impl core::fmt::Debug for Verb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Verb")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Verb {
    /// Verb name as called from a definer.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Field this verb writes to.
    #[must_use]
    pub const fn target(&self) -> Target {
        self.target
    }

    /// Whether calls overwrite or accumulate.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }
}

/// Fixed, process-wide mapping from verb name to handler.
#[derive(Debug, Clone, Copy)]
pub struct VerbTable {
    verbs: &'static [Verb],
}

impl VerbTable {
    /// Looks a verb up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static Verb> {
        self.verbs.iter().find(|verb| verb.name == name)
    }

    /// Iterates over the verb names in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.verbs.iter().map(|verb| verb.name)
    }
}

const NAME: Verb = Verb {
    name: "name",
    target: Target::Name,
    mode: Mode::Overwrite,
    handler: set_name,
};

/// Vocabulary of component definers.
pub static COMPONENT_VERBS: VerbTable = VerbTable {
    verbs: &[
        NAME,
        Verb {
            name: "views",
            target: Target::Views,
            mode: Mode::Append,
            handler: append_views,
        },
        Verb {
            name: "viewmodel",
            target: Target::ViewModel,
            mode: Mode::Overwrite,
            handler: set_view_model,
        },
        Verb {
            name: "event",
            target: Target::Events,
            mode: Mode::Append,
            handler: add_event,
        },
    ],
};

/// Vocabulary of viewmodel definers.
pub static VIEW_MODEL_VERBS: VerbTable = VerbTable { verbs: &[NAME] };

fn text(verb: &'static str, argument: Argument) -> Result<String> {
    match argument {
        Argument::Text(text) => Ok(text),
        Argument::Class(class) => Err(invalid(
            verb,
            format!("expected a string, got class `{}`", class.name()),
        )),
    }
}

fn invalid(verb: &'static str, reason: impl Into<String>) -> Error {
    ConfigurationError::InvalidArguments {
        verb,
        reason: reason.into(),
    }
    .into()
}

fn exactly<const N: usize>(verb: &'static str, arguments: Vec<Argument>) -> Result<[Argument; N]> {
    let count = arguments.len();
    arguments
        .try_into()
        .map_err(|_| invalid(verb, format!("expected {N} argument(s), got {count}")))
}

fn declaration(argument: Argument, capability: Capability) -> Result<Declaration> {
    match argument {
        Argument::Text(ident) => Ok(Declaration::Ident(ident)),
        Argument::Class(class) => {
            class.ensure(capability)?;
            Ok(Declaration::Class(class))
        }
    }
}

fn set_name(declarations: &mut Declarations, arguments: Vec<Argument>) -> Result<()> {
    let [name] = exactly("name", arguments)?;
    declarations.name = Some(text("name", name)?);
    Ok(())
}

fn append_views(declarations: &mut Declarations, arguments: Vec<Argument>) -> Result<()> {
    // Validate the whole call before registering anything.
    let views = arguments
        .into_iter()
        .map(|argument| declaration(argument, Capability::View))
        .collect::<Result<Vec<_>>>()?;
    declarations.views.extend(views);
    Ok(())
}

fn set_view_model(declarations: &mut Declarations, arguments: Vec<Argument>) -> Result<()> {
    let [view_model] = exactly("viewmodel", arguments)?;
    declarations.view_model = Some(declaration(view_model, Capability::ViewModel)?);
    Ok(())
}

fn add_event(declarations: &mut Declarations, arguments: Vec<Argument>) -> Result<()> {
    let [event, handler] = exactly("event", arguments)?;
    declarations.events.push(EventBinding::new(
        text("event", event)?,
        text("event", handler)?,
    ));
    Ok(())
}

/// Raw result of evaluating a definer chain, before validation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Declarations {
    pub(crate) name: Option<String>,
    pub(crate) views: Vec<Declaration>,
    pub(crate) view_model: Option<Declaration>,
    pub(crate) events: Vec<EventBinding>,
}

impl Declarations {
    /// The last name written, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Accumulated view declarations.
    #[must_use]
    pub fn views(&self) -> &[Declaration] {
        &self.views
    }

    /// The last viewmodel declaration written, if any.
    #[must_use]
    pub const fn view_model(&self) -> Option<&Declaration> {
        self.view_model.as_ref()
    }

    /// Accumulated event bindings.
    #[must_use]
    pub fn events(&self) -> &[EventBinding] {
        &self.events
    }
}

/// The vocabulary handed to a definer.
///
/// Verb calls return `&mut Self` so they can be chained. The first failing
/// call is recorded and every later call of the same evaluation is ignored.
#[derive(Debug)]
pub struct Verbs<'a> {
    table: &'a VerbTable,
    declarations: &'a mut Declarations,
    error: Option<Error>,
}

impl<'a> Verbs<'a> {
    const fn new(table: &'a VerbTable, declarations: &'a mut Declarations) -> Self {
        Self {
            table,
            declarations,
            error: None,
        }
    }

    /// Calls `verb` by name with raw arguments.
    pub fn call(
        &mut self,
        verb: &str,
        arguments: impl IntoIterator<Item = Argument>,
    ) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        let result = match self.table.get(verb) {
            Some(entry) => {
                let arguments: Vec<Argument> = arguments.into_iter().collect();
                tracing::trace!(verb, arguments = arguments.len(), "evaluating verb");
                (entry.handler)(self.declarations, arguments)
            }
            None => Err(ConfigurationError::UnknownVerb(verb.into()).into()),
        };
        if let Err(error) = result {
            self.error = Some(error);
        }
        self
    }

    /// Sets the name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.call("name", [Argument::Text(name.into())])
    }

    /// Appends view declarations in order.
    pub fn views<I>(&mut self, views: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Argument>,
    {
        self.call("views", views.into_iter().map(Into::into))
    }

    /// Appends a single view declaration.
    pub fn view(&mut self, view: impl Into<Argument>) -> &mut Self {
        self.call("views", [view.into()])
    }

    /// Sets the viewmodel declaration.
    pub fn viewmodel(&mut self, view_model: impl Into<Argument>) -> &mut Self {
        self.call("viewmodel", [view_model.into()])
    }

    /// Declares a global event handled by the component method `handler`.
    pub fn event(&mut self, event: impl Into<String>, handler: impl Into<String>) -> &mut Self {
        self.call(
            "event",
            [Argument::Text(event.into()), Argument::Text(handler.into())],
        )
    }

    /// The error recorded so far, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }
}

/// Runs `chain` in order against `table`.
///
/// # Errors
///
/// Returns the first error recorded by any definer of the chain; later
/// definers are not evaluated.
pub fn evaluate(table: &VerbTable, chain: &[Definer]) -> Result<Declarations> {
    let mut declarations = Declarations::default();
    for definer in chain {
        let mut verbs = Verbs::new(table, &mut declarations);
        definer(&mut verbs);
        if let Some(error) = verbs.error {
            return Err(error);
        }
    }
    Ok(declarations)
}
