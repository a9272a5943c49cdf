//! Turns a clicked keyboard button into an action.

use anyhow::Result;

use crate::domain::{
    click_binding::ClickBinding,
    markup::{ButtonKind, MarkupButton, MarkupResolver, RequestId},
};

use super::contracts::{ButtonActionSink, RequestIssuer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Plain keyboard button: its label is sent as a message.
    SendText(String),
    OpenUrl(String),
    SendCallback(Vec<u8>),
    StartGame(Vec<u8>),
    SharePhone,
    ShareLocation,
    SwitchInline { query: String, same_chat: bool },
    Buy,
}

impl ButtonAction {
    pub fn from_button(button: &MarkupButton) -> Self {
        match button.kind() {
            ButtonKind::Default => Self::SendText(button.label().to_owned()),
            ButtonKind::Url => Self::OpenUrl(button.payload_text()),
            ButtonKind::Callback => Self::SendCallback(button.payload().to_vec()),
            ButtonKind::Game => Self::StartGame(button.payload().to_vec()),
            ButtonKind::RequestPhone => Self::SharePhone,
            ButtonKind::RequestLocation => Self::ShareLocation,
            ButtonKind::SwitchInline => Self::SwitchInline {
                query: button.payload_text(),
                same_chat: false,
            },
            ButtonKind::SwitchInlineSame => Self::SwitchInline {
                query: button.payload_text(),
                same_chat: true,
            },
            ButtonKind::Buy => Self::Buy,
        }
    }

    /// Short status-line description.
    pub fn describe(&self) -> String {
        match self {
            Self::SendText(text) => format!("Sent \"{text}\""),
            Self::OpenUrl(url) => format!("Opened {url}"),
            Self::SendCallback(_) => "Waiting for bot answer".to_owned(),
            Self::StartGame(_) => "Starting game".to_owned(),
            Self::SharePhone => "Phone number shared".to_owned(),
            Self::ShareLocation => "Location shared".to_owned(),
            Self::SwitchInline { query, same_chat: true } => format!("Inline query \"{query}\" in this chat"),
            Self::SwitchInline { query, same_chat: false } => format!("Inline query \"{query}\""),
            Self::Buy => "Opening payment form".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The message or the button at the bound coordinates is gone.
    ButtonNotFound,
    RequestAlreadyPending,
    Dispatched {
        action: ButtonAction,
        request: Option<RequestId>,
    },
}

/// Resolves `binding` against the current markup and dispatches the action
/// of whatever button sits at its coordinates now.
pub fn activate(
    binding: &ClickBinding,
    resolver: &mut dyn MarkupResolver,
    sink: &mut dyn ButtonActionSink,
    issuer: &mut dyn RequestIssuer,
) -> Result<ActivationOutcome> {
    let Some(button) = binding.button(&*resolver).cloned() else {
        tracing::debug!(
            message = ?binding.message(),
            coords = ?binding.coords(),
            "activation target no longer exists"
        );
        return Ok(ActivationOutcome::ButtonNotFound);
    };

    if button.kind().issues_request() && button.pending_request().is_some() {
        return Ok(ActivationOutcome::RequestAlreadyPending);
    }

    let action = ButtonAction::from_button(&button);
    let request = if button.kind().issues_request() {
        let request = issuer.issue(binding.message(), button.payload())?;
        if let Some(current) = binding.button_mut(resolver) {
            current.set_pending_request(Some(request));
        }
        Some(request)
    } else {
        None
    };

    if let Err(error) = sink.dispatch(binding.message(), &action) {
        if let Some(current) = request.and_then(|_| binding.button_mut(resolver)) {
            current.set_pending_request(None);
        }
        return Err(error);
    }

    tracing::info!(
        message = ?binding.message(),
        coords = ?binding.coords(),
        kind = button.kind().as_wire(),
        ?request,
        "button activated"
    );
    Ok(ActivationOutcome::Dispatched { action, request })
}
