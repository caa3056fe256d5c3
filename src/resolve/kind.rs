use crate::remote::ambient::DefaultSlot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Wrapper kinds known to the resolver.
///
/// `Object`, `Link` and `Parameter` are abstract: nothing resolves *to* them, but they can be
/// requested to accept any of their subtypes.
pub enum Kind {
    /// Any remote object ("infer freely").
    Object,
    /// The host application.
    Application,
    /// A composition (project/session container).
    Composition,
    /// A node in a composition's graph.
    Tool,
    /// Abstract base of [`Kind::Input`] and [`Kind::Output`].
    Link,
    /// A settable/connectable slot on a tool.
    Input,
    /// A producible slot on a tool.
    Output,
    /// The graphical layout surface of a composition.
    FlowView,
    /// Abstract base of value snapshots.
    Parameter,
    /// A produced image value.
    Image,
    /// A registry entry describing a class of host objects.
    Registry,
}

/// Attribute-name prefixes in priority order.
///
/// The first entry for which any attribute name starts with the prefix decides the kind.
pub const ATTR_PREFIX_TABLE: &[(&str, Kind)] = &[
    ("COMP", Kind::Composition),
    ("TOOL", Kind::Tool),
    ("INP", Kind::Input),
    ("OUT", Kind::Output),
    ("VIEW", Kind::FlowView),
    ("FUSION", Kind::Application),
    ("REG", Kind::Registry),
];

/// Leading debug-label tokens for handles that expose no attributes.
pub const LABEL_TOKEN_TABLE: &[(&str, Kind)] = &[("Image", Kind::Image)];

impl Kind {
    /// Every kind, abstract ones included.
    pub const ALL: [Kind; 11] = [
        Kind::Object,
        Kind::Application,
        Kind::Composition,
        Kind::Tool,
        Kind::Link,
        Kind::Input,
        Kind::Output,
        Kind::FlowView,
        Kind::Parameter,
        Kind::Image,
        Kind::Registry,
    ];

    /// Display name, also used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Object => "Object",
            Kind::Application => "Application",
            Kind::Composition => "Composition",
            Kind::Tool => "Tool",
            Kind::Link => "Link",
            Kind::Input => "Input",
            Kind::Output => "Output",
            Kind::FlowView => "FlowView",
            Kind::Parameter => "Parameter",
            Kind::Image => "Image",
            Kind::Registry => "Registry",
        }
    }

    /// Case-insensitive lookup by name (`"flowview"`, `"Tool"`, ...).
    pub fn from_name(name: &str) -> Option<Kind> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }

    /// Direct supertype, `None` for [`Kind::Object`].
    pub fn parent(self) -> Option<Kind> {
        match self {
            Kind::Object => None,
            Kind::Input | Kind::Output => Some(Kind::Link),
            Kind::Image => Some(Kind::Parameter),
            _ => Some(Kind::Object),
        }
    }

    /// Abstract kinds are never the result of inference.
    pub fn is_abstract(self) -> bool {
        matches!(self, Kind::Object | Kind::Link | Kind::Parameter)
    }

    /// `true` when `self` equals `other` or derives from it.
    pub fn is_subtype_of(self, other: Kind) -> bool {
        let mut cur = Some(self);
        while let Some(k) = cur {
            if k == other {
                return true;
            }
            cur = k.parent();
        }
        false
    }

    /// Ambient slot consulted when this kind is requested without a candidate.
    pub fn default_slot(self) -> Option<DefaultSlot> {
        match self {
            Kind::Composition => Some(DefaultSlot::CurrentComposition),
            Kind::Application => Some(DefaultSlot::CurrentApplication),
            _ => None,
        }
    }

    /// Infer a kind from a handle's attribute names.
    ///
    /// Enumeration order of `names` does not matter: the prefix table is walked in priority
    /// order and the whole set is checked against each entry.
    pub fn from_attr_names<'a, I>(names: I) -> Option<Kind>
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: Clone,
    {
        let names = names.into_iter();
        ATTR_PREFIX_TABLE
            .iter()
            .find(|(prefix, _)| names.clone().any(|n| n.starts_with(prefix)))
            .map(|(_, kind)| *kind)
    }

    /// Infer a kind from the leading whitespace-separated token of a debug label.
    pub fn from_label(label: &str) -> Option<Kind> {
        let token = label.split_whitespace().next()?;
        LABEL_TOKEN_TABLE
            .iter()
            .find(|(literal, _)| *literal == token)
            .map(|(_, kind)| *kind)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/kind.rs"]
mod tests;
