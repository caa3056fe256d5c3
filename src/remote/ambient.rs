use crate::foundation::core::HandleId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Process-wide "current" objects a script environment exposes implicitly.
pub enum DefaultSlot {
    /// The composition a script was launched from.
    CurrentComposition,
    /// The application the script is connected to.
    CurrentApplication,
}

/// Provider of ambient default handles.
///
/// Returning `None` means "nothing available" (e.g. not running inside a composition).
pub trait AmbientDefaults: Send + Sync {
    /// Handle currently occupying `slot`, if any.
    fn default_handle(&self, slot: DefaultSlot) -> Option<HandleId>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Fixed set of ambient handles, e.g. captured at script start-up.
pub struct AmbientSlots {
    /// Current composition handle.
    #[serde(default)]
    pub composition: Option<HandleId>,
    /// Current application handle.
    #[serde(default)]
    pub application: Option<HandleId>,
}

impl AmbientDefaults for AmbientSlots {
    fn default_handle(&self, slot: DefaultSlot) -> Option<HandleId> {
        match slot {
            DefaultSlot::CurrentComposition => self.composition,
            DefaultSlot::CurrentApplication => self.application,
        }
    }
}
