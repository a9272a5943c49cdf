use super::{events::ViewRequest, open_chat_state::OpenChatState};

#[derive(Debug, Clone, PartialEq)]
pub struct ShellState {
    running: bool,
    open_chat: OpenChatState,
    status: Option<String>,
    view_requests: Vec<ViewRequest>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            running: true,
            open_chat: OpenChatState::default(),
            status: None,
            view_requests: Vec::new(),
        }
    }
}

impl ShellState {
    pub fn new(open_chat: OpenChatState) -> Self {
        Self {
            open_chat,
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn open_chat(&self) -> &OpenChatState {
        &self.open_chat
    }

    pub fn open_chat_mut(&mut self) -> &mut OpenChatState {
        &mut self.open_chat
    }

    /// Last user-facing notice, shown in the status line.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn request_view(&mut self, request: ViewRequest) {
        self.view_requests.push(request);
    }

    pub fn take_view_requests(&mut self) -> Vec<ViewRequest> {
        std::mem::take(&mut self.view_requests)
    }
}
