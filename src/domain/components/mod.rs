//! Optional per-message decorations.
//!
//! A message carries at most one component of each kind. Components are
//! stored in a tag-keyed slot map and accessed by type:
//!
//! ```ignore
//! message.components.insert(Edited::new(ts));
//! if let Some(edited) = message.components.get::<Edited>() { /* ... */ }
//! ```

mod annotations;
mod documents;
mod forwarding;
mod grouping;
mod reply_markup;
mod separators;
mod voice;

use std::collections::BTreeMap;

pub use annotations::{Edited, Signed, Via, Views};
pub use documents::{DocumentCaption, DocumentName};
pub use forwarding::{Forwarded, MessageLookup, Reply};
pub use grouping::{Group, MessageGroupId};
pub use reply_markup::ReplyMarkup;
pub use separators::{DateMark, UnreadBar};
pub use voice::Voice;

/// Implemented by every component type that can live in a [`MessageComponents`] slot.
pub trait MessageComponent: Sized + Into<Component> {
    const TAG: ComponentTag;

    fn from_ref(component: &Component) -> Option<&Self>;
    fn from_mut(component: &mut Component) -> Option<&mut Self>;
    fn from_component(component: Component) -> Option<Self>;
}

macro_rules! message_components {
    ($($name:ident),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ComponentTag {
            $($name,)+
        }

        #[derive(Debug, Clone, PartialEq)]
        pub enum Component {
            $($name($name),)+
        }

        #[cfg(test)]
        impl Component {
            pub fn tag(&self) -> ComponentTag {
                match self {
                    $(Component::$name(_) => ComponentTag::$name,)+
                }
            }
        }

        $(
            impl From<$name> for Component {
                fn from(value: $name) -> Self {
                    Component::$name(value)
                }
            }

            impl MessageComponent for $name {
                const TAG: ComponentTag = ComponentTag::$name;

                fn from_ref(component: &Component) -> Option<&Self> {
                    match component {
                        Component::$name(value) => Some(value),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_mut(component: &mut Component) -> Option<&mut Self> {
                    match component {
                        Component::$name(value) => Some(value),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_component(component: Component) -> Option<Self> {
                    match component {
                        Component::$name(value) => Some(value),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+
    };
}

message_components!(
    Via,
    Views,
    Signed,
    Edited,
    Forwarded,
    Reply,
    ReplyMarkup,
    DateMark,
    UnreadBar,
    Voice,
    Group,
    DocumentName,
    DocumentCaption,
);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageComponents {
    slots: BTreeMap<ComponentTag, Component>,
}

impl MessageComponents {
    /// Stores `component`, returning the one it replaced.
    pub fn insert<T: MessageComponent>(&mut self, component: T) -> Option<T> {
        self.slots
            .insert(T::TAG, component.into())
            .and_then(T::from_component)
    }

    pub fn get<T: MessageComponent>(&self) -> Option<&T> {
        self.slots.get(&T::TAG).and_then(T::from_ref)
    }

    pub fn get_mut<T: MessageComponent>(&mut self) -> Option<&mut T> {
        self.slots.get_mut(&T::TAG).and_then(T::from_mut)
    }

    pub fn remove<T: MessageComponent>(&mut self) -> Option<T> {
        self.slots.remove(&T::TAG).and_then(T::from_component)
    }

    pub fn has<T: MessageComponent>(&self) -> bool {
        self.slots.contains_key(&T::TAG)
    }

    #[cfg(test)]
    pub fn tags(&self) -> impl Iterator<Item = ComponentTag> + '_ {
        self.slots.keys().copied()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
