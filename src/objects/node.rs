use crate::{
    foundation::core::{Attrs, Value},
    foundation::error::{FuError, FuResult},
    objects::{
        application::Application,
        composition::Composition,
        flow::FlowView,
        image::Image,
        link::{Input, Output},
        registry::Registry,
        tool::Tool,
    },
    remote::host::RemoteHandle,
    resolve::kind::Kind,
    resolve::resolver::Wrapper,
};

/// Operations shared by every wrapper.
pub trait Object {
    /// The one remote handle this wrapper is bound to.
    fn handle(&self) -> &RemoteHandle;

    /// Concrete kind of the wrapper.
    fn kind(&self) -> Kind;

    fn get_attrs(&self) -> FuResult<Attrs> {
        self.handle().attrs()
    }

    /// Single attribute; a missing key is a validation error.
    fn get_attr(&self, key: &str) -> FuResult<Value> {
        self.get_attrs()?
            .remove(key)
            .ok_or_else(|| FuError::validation(format!("{} has no attribute '{key}'", self.kind())))
    }

    fn set_attrs(&self, attrs: Attrs) -> FuResult<()> {
        self.handle().set_attrs(attrs)
    }

    fn set_attr(&self, key: &str, value: Value) -> FuResult<()> {
        self.set_attrs(Attrs::from([(key.to_string(), value)]))
    }

    /// Store persistent data on the object.
    ///
    /// Data set on anything belonging to a composition is saved with the composition file;
    /// data set on the application ends up in its preferences. `name` may use
    /// `"table.subtable"` notation.
    fn set_data(&self, name: &str, value: Value) -> FuResult<()> {
        self.handle()
            .call("SetData", vec![Value::from(name), value])
            .map(|_| ())
    }

    /// Persistent data previously stored with [`Object::set_data`]; `nil` when unset.
    fn get_data(&self, name: &str) -> FuResult<Value> {
        self.handle().call("GetData", vec![Value::from(name)])
    }

    /// Internal name of the object.
    fn name(&self) -> FuResult<String> {
        self.handle().get("Name")?.expect_text("Name")
    }

    /// Internal ID (registry id, e.g. `"Merge"` for merge tools).
    fn id(&self) -> FuResult<String> {
        self.handle().call("GetID", vec![])?.expect_text("GetID")
    }

    /// Formatted internal help text.
    fn help(&self) -> FuResult<String> {
        self.handle().call("GetHelp", vec![])?.expect_text("GetHelp")
    }

    /// Registry entry describing this object's class.
    fn reg(&self) -> FuResult<Registry> {
        let h = self.handle();
        h.resolve(h.call("GetReg", vec![])?)
    }

    /// Composition this object belongs to.
    fn comp(&self) -> FuResult<Composition> {
        let h = self.handle();
        h.resolve(h.call("Comp", vec![])?)
    }
}

/// Shared `Display` body: `Kind("name")`, falling back to the handle id.
pub(crate) fn fmt_named(obj: &dyn Object, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match obj.name() {
        Ok(name) => write!(f, "{}(\"{}\")", obj.kind(), name),
        Err(_) => write!(f, "{}({})", obj.kind(), obj.handle().id()),
    }
}

macro_rules! concrete_wrapper {
    ($ty:ident) => {
        impl $ty {
            pub(crate) fn from_handle(handle: $crate::remote::host::RemoteHandle) -> Self {
                Self { handle }
            }
        }

        impl $crate::objects::node::Object for $ty {
            fn handle(&self) -> &$crate::remote::host::RemoteHandle {
                &self.handle
            }

            fn kind(&self) -> $crate::resolve::kind::Kind {
                $crate::resolve::kind::Kind::$ty
            }
        }

        impl $crate::resolve::resolver::Wrapper for $ty {
            const KIND: $crate::resolve::kind::Kind = $crate::resolve::kind::Kind::$ty;

            fn from_node(
                node: $crate::objects::node::Node,
            ) -> Result<Self, $crate::objects::node::Node> {
                match node {
                    $crate::objects::node::Node::$ty(w) => Ok(w),
                    other => Err(other),
                }
            }
        }

        impl From<$ty> for $crate::objects::node::Node {
            fn from(w: $ty) -> Self {
                $crate::objects::node::Node::$ty(w)
            }
        }

        impl From<$ty> for $crate::resolve::resolver::Candidate {
            fn from(w: $ty) -> Self {
                $crate::resolve::resolver::Candidate::Wrapped(w.into())
            }
        }

        impl From<&$ty> for $crate::resolve::resolver::Candidate {
            fn from(w: &$ty) -> Self {
                $crate::resolve::resolver::Candidate::Wrapped(w.clone().into())
            }
        }
    };
}

pub(crate) use concrete_wrapper;

#[derive(Clone, Debug)]
/// Any resolved remote object, tagged by its concrete kind.
pub enum Node {
    /// The host application.
    Application(Application),
    /// A composition.
    Composition(Composition),
    /// A tool.
    Tool(Tool),
    /// A tool input.
    Input(Input),
    /// A tool output.
    Output(Output),
    /// A flow view.
    FlowView(FlowView),
    /// An image value.
    Image(Image),
    /// A registry entry.
    Registry(Registry),
}

impl Node {
    /// Build the wrapper for a concrete `kind`; `None` for abstract kinds.
    pub(crate) fn bind(kind: Kind, handle: RemoteHandle) -> Option<Node> {
        let node = match kind {
            Kind::Application => Node::Application(Application::from_handle(handle)),
            Kind::Composition => Node::Composition(Composition::from_handle(handle)),
            Kind::Tool => Node::Tool(Tool::from_handle(handle)),
            Kind::Input => Node::Input(Input::from_handle(handle)),
            Kind::Output => Node::Output(Output::from_handle(handle)),
            Kind::FlowView => Node::FlowView(FlowView::from_handle(handle)),
            Kind::Image => Node::Image(Image::from_handle(handle)),
            Kind::Registry => Node::Registry(Registry::from_handle(handle)),
            Kind::Object | Kind::Link | Kind::Parameter => return None,
        };
        Some(node)
    }

    fn as_object(&self) -> &dyn Object {
        match self {
            Node::Application(w) => w,
            Node::Composition(w) => w,
            Node::Tool(w) => w,
            Node::Input(w) => w,
            Node::Output(w) => w,
            Node::FlowView(w) => w,
            Node::Image(w) => w,
            Node::Registry(w) => w,
        }
    }

    /// Narrow into a typed wrapper, `None` when the variant does not fit.
    pub fn downcast<T: Wrapper>(self) -> Option<T> {
        T::from_node(self).ok()
    }
}

impl Object for Node {
    fn handle(&self) -> &RemoteHandle {
        self.as_object().handle()
    }

    fn kind(&self) -> Kind {
        self.as_object().kind()
    }
}

impl Wrapper for Node {
    const KIND: Kind = Kind::Object;

    fn from_node(node: Node) -> Result<Self, Node> {
        Ok(node)
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Application(w) => std::fmt::Display::fmt(w, f),
            Node::Composition(w) => std::fmt::Display::fmt(w, f),
            Node::Tool(w) => std::fmt::Display::fmt(w, f),
            Node::Input(w) => std::fmt::Display::fmt(w, f),
            Node::Output(w) => std::fmt::Display::fmt(w, f),
            Node::FlowView(w) => std::fmt::Display::fmt(w, f),
            Node::Image(w) => std::fmt::Display::fmt(w, f),
            Node::Registry(w) => std::fmt::Display::fmt(w, f),
        }
    }
}
