use crate::{domain::open_chat_state::OpenChatState, infra::config::AppConfig};

#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub chat: OpenChatState,
}

impl AppContext {
    pub fn new(config: AppConfig, chat: OpenChatState) -> Self {
        Self { config, chat }
    }
}
