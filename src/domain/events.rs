use super::message::MessageRef;

/// Milliseconds on the shell's monotonic clock.
pub type TimeMs = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    Pointer(PointerInput),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Moved,
    Pressed,
    Released,
    /// Secondary (right) button press.
    ContextPressed,
    ScrollUp,
    ScrollDown,
}

/// Mouse input in screen cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerInput {
    pub action: PointerAction,
    pub column: u16,
    pub row: u16,
}

impl PointerInput {
    pub fn new(action: PointerAction, column: u16, row: u16) -> Self {
        Self {
            action,
            column,
            row,
        }
    }
}

/// Notices from the orchestrator to the view layer, drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRequest {
    ClearSelection,
    /// A message got a new id; its keyboard keeps its state.
    Rekeyed { from: MessageRef, to: MessageRef },
}
