//! Domain layer: messages, their decorations and keyboard markup.

pub mod click_binding;
pub mod components;
pub mod events;
pub mod markup;
pub mod message;
pub mod open_chat_state;
pub mod shell_state;
pub mod text;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
