use anyhow::Result;

use crate::{
    domain::{markup::RequestId, message::MessageRef},
    infra::contracts::ExternalOpener,
    usecases::{
        activate_button::ButtonAction,
        contracts::{ButtonActionSink, RequestIssuer},
    },
};

/// Opens URL buttons and records everything else in the log.
#[derive(Debug, Clone, Default)]
pub struct OpenerActionSink<O: ExternalOpener> {
    opener: O,
}

impl<O: ExternalOpener> OpenerActionSink<O> {
    pub fn new(opener: O) -> Self {
        Self { opener }
    }
}

impl<O: ExternalOpener> ButtonActionSink for OpenerActionSink<O> {
    fn dispatch(&mut self, message: MessageRef, action: &ButtonAction) -> Result<()> {
        match action {
            ButtonAction::OpenUrl(url) => self.opener.open(url),
            other => {
                tracing::info!(?message, action = ?other, "button action dispatched");
                Ok(())
            }
        }
    }
}

/// Hands out increasing request ids starting from 1.
#[derive(Debug, Clone, Default)]
pub struct SequentialRequestIssuer {
    last: u64,
}

impl RequestIssuer for SequentialRequestIssuer {
    fn issue(&mut self, message: MessageRef, payload: &[u8]) -> Result<RequestId> {
        self.last += 1;
        tracing::debug!(?message, request = self.last, payload_len = payload.len(), "request issued");
        Ok(RequestId(self.last))
    }
}
