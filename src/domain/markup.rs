//! Inline keyboard markup attached to a message.

use super::message::MessageRef;

/// Identifier of an in-flight request issued for a callback or game button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Kind of an inline keyboard button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonKind {
    #[default]
    Default,
    Url,
    Callback,
    RequestPhone,
    RequestLocation,
    SwitchInline,
    SwitchInlineSame,
    Game,
    Buy,
}

impl ButtonKind {
    /// Parses a kind received from upstream. Unknown kinds fall back to
    /// `Default` so the button still renders.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "default" | "text" => Self::Default,
            "url" => Self::Url,
            "callback" => Self::Callback,
            "request_phone" => Self::RequestPhone,
            "request_location" => Self::RequestLocation,
            "switch_inline" => Self::SwitchInline,
            "switch_inline_same" => Self::SwitchInlineSame,
            "game" => Self::Game,
            "buy" => Self::Buy,
            other => {
                tracing::warn!(kind = other, "unknown button kind, rendering as default");
                Self::Default
            }
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Url => "url",
            Self::Callback => "callback",
            Self::RequestPhone => "request_phone",
            Self::RequestLocation => "request_location",
            Self::SwitchInline => "switch_inline",
            Self::SwitchInlineSame => "switch_inline_same",
            Self::Game => "game",
            Self::Buy => "buy",
        }
    }

    /// Kinds whose activation goes through a request and shows a loading
    /// indicator until it completes.
    pub fn issues_request(self) -> bool {
        matches!(self, Self::Callback | Self::Game)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupButton {
    kind: ButtonKind,
    label: String,
    payload: Vec<u8>,
    pending_request: Option<RequestId>,
}

impl MarkupButton {
    pub fn new(kind: ButtonKind, label: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            label: label.into(),
            payload: payload.into(),
            pending_request: None,
        }
    }

    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload as text, for URLs and inline queries.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending_request
    }

    pub fn set_pending_request(&mut self, request: Option<RequestId>) {
        self.pending_request = request;
    }
}

/// Row/column position of a button inside a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonCoords {
    pub row: usize,
    pub column: usize,
}

impl ButtonCoords {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkupGrid {
    rows: Vec<Vec<MarkupButton>>,
}

impl MarkupGrid {
    pub fn new(rows: Vec<Vec<MarkupButton>>) -> Self {
        // Empty rows carry no buttons and would only add vertical gaps.
        let rows = rows.into_iter().filter(|row| !row.is_empty()).collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<MarkupButton>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn button(&self, coords: ButtonCoords) -> Option<&MarkupButton> {
        self.rows.get(coords.row)?.get(coords.column)
    }

    pub fn button_mut(&mut self, coords: ButtonCoords) -> Option<&mut MarkupButton> {
        self.rows.get_mut(coords.row)?.get_mut(coords.column)
    }

    /// Clears the pending request marker wherever it matches `request`.
    /// Returns the message-local coordinates of the affected button.
    pub fn complete_request(&mut self, request: RequestId) -> Option<ButtonCoords> {
        for (row, buttons) in self.rows.iter_mut().enumerate() {
            for (column, button) in buttons.iter_mut().enumerate() {
                if button.pending_request == Some(request) {
                    button.pending_request = None;
                    return Some(ButtonCoords::new(row, column));
                }
            }
        }
        None
    }
}

/// Flags carried by a reply markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkupFlags {
    pub inline: bool,
    pub resize: bool,
    pub single_use: bool,
    pub selective: bool,
}

/// Lookup of the current markup of a message by stable reference.
///
/// Implemented by whatever owns the messages; keyboards and click bindings
/// only ever hold a [`MessageRef`].
pub trait MarkupResolver {
    fn markup(&self, message: MessageRef) -> Option<&MarkupGrid>;
    fn markup_mut(&mut self, message: MessageRef) -> Option<&mut MarkupGrid>;
}
