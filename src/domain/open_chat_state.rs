use super::{
    components::{DateMark, Group, MessageLookup, Reply, ReplyMarkup, UnreadBar, Views, Voice},
    markup::{MarkupGrid, MarkupResolver, RequestId},
    message::{ChatId, Message, MessageId, MessageRef},
    text::timestamp_to_date,
};

/// Messages of the chat currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenChatState {
    chat_id: ChatId,
    chat_title: String,
    messages: Vec<Message>,
    scroll_offset: u16,
}

impl Default for OpenChatState {
    fn default() -> Self {
        Self {
            chat_id: ChatId(0),
            chat_title: String::new(),
            messages: Vec::new(),
            scroll_offset: 0,
        }
    }
}

impl OpenChatState {
    pub fn open(chat_id: ChatId, chat_title: impl Into<String>, messages: Vec<Message>) -> Self {
        let mut state = Self {
            chat_id,
            chat_title: chat_title.into(),
            messages,
            scroll_offset: 0,
        };
        state.refresh_date_marks();
        state.resolve_replies(true);
        state
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn chat_title(&self) -> &str {
        &self.chat_title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the current scroll offset in rows from the top of the history.
    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn scroll_by(&mut self, delta: i32, content_height: u16, viewport_height: u16) {
        let max_offset = content_height.saturating_sub(viewport_height);
        let next = i32::from(self.scroll_offset) + delta;
        self.scroll_offset = u16::try_from(next.max(0)).unwrap_or(u16::MAX).min(max_offset);
    }

    /// First message that carries a keyboard, if any.
    pub fn first_with_markup(&self) -> Option<MessageRef> {
        self.messages
            .iter()
            .find(|message| message.components.has::<ReplyMarkup>())
            .map(|message| message.reference)
    }

    /// Replaces the keyboard of a message. Returns false when the message is gone.
    pub fn replace_markup(&mut self, reference: MessageRef, grid: MarkupGrid, current_top: Option<u16>) -> bool {
        let Some(markup) = self
            .message_mut(reference)
            .and_then(|message| message.components.get_mut::<ReplyMarkup>())
        else {
            return false;
        };
        markup.edit(grid, current_top);
        true
    }

    pub fn remove_message(&mut self, reference: MessageRef) -> Option<Message> {
        let index = self
            .messages
            .iter()
            .position(|message| message.reference == reference)?;
        let removed = self.messages.remove(index);
        self.refresh_date_marks();

        let removed_group = removed.components.get::<Group>().map(Group::id);
        for message in &mut self.messages {
            if let Some(reply) = message.components.get_mut::<Reply>() {
                reply.item_removed(reference.message_id);
            }
            let Some(group) = message.components.get_mut::<Group>() else {
                continue;
            };
            if Some(group.id()) == removed_group && !group.item_removed(reference.message_id) {
                message.components.remove::<Group>();
            }
        }

        Some(removed)
    }

    /// Moves a message to a new id, as happens when a locally sent message is
    /// confirmed by the server.
    pub fn rekey_message(&mut self, reference: MessageRef, new_id: MessageId) -> Option<MessageRef> {
        let message = self.message_mut(reference)?;
        message.reference.message_id = new_id;
        let rekeyed = message.reference;

        for message in &mut self.messages {
            if let Some(group) = message.components.get_mut::<Group>() {
                group.item_rekeyed(reference.message_id, new_id);
            }
        }
        Some(rekeyed)
    }

    /// Clears a finished request. Returns the message whose keyboard changed.
    pub fn complete_request(&mut self, request: RequestId) -> Option<MessageRef> {
        self.messages.iter_mut().find_map(|message| {
            let markup = message.components.get_mut::<ReplyMarkup>()?;
            markup.grid_mut().complete_request(request)?;
            Some(message.reference)
        })
    }

    /// Marks new incoming messages on the unread bar, unless it is frozen.
    pub fn add_unread(&mut self, count: u32) {
        if let Some(bar) = self
            .messages
            .iter_mut()
            .find_map(|message| message.components.get_mut::<UnreadBar>())
        {
            bar.add_unread(count);
        }
    }

    /// Stops the unread bar from growing once the user has seen it.
    pub fn freeze_unread_bar(&mut self) -> bool {
        let Some(bar) = self
            .messages
            .iter_mut()
            .find_map(|message| message.components.get_mut::<UnreadBar>())
        else {
            return false;
        };
        if bar.is_frozen() {
            return false;
        }
        bar.freeze();
        true
    }

    /// Adds `delta` views to every post that shows a counter. Returns how
    /// many counters changed.
    pub fn add_views(&mut self, delta: u32) -> usize {
        let mut changed = 0;
        for views in self
            .messages
            .iter_mut()
            .filter_map(|message| message.components.get_mut::<Views>())
        {
            let count = views.count().saturating_add(delta);
            if views.set_count(count) {
                changed += 1;
            }
        }
        changed
    }

    /// Seeks the first voice message by `delta` of its length. Reaching the
    /// end drops its playback state.
    pub fn seek_voice(&mut self, delta: f64) -> Option<MessageRef> {
        let message = self
            .messages
            .iter_mut()
            .find(|message| message.components.has::<Voice>())?;
        let voice = message.components.get_mut::<Voice>()?;

        voice.set_seeking_start(voice.display_progress());
        voice.start_seeking();
        voice.set_seeking_current(voice.seeking_start() + delta);
        let target = voice.seeking_current();
        voice.stop_seeking();

        let duration_ms = voice.duration_ms();
        voice.update_position((target * f64::from(duration_ms)).round() as u32, duration_ms);
        voice.check_playback_finished();
        Some(message.reference)
    }

    /// Resolves reply previews against the loaded history.
    pub fn resolve_replies(&mut self, force: bool) {
        let chat_id = self.chat_id;
        for index in 0..self.messages.len() {
            let Some(mut reply) = self.messages[index].components.remove::<Reply>() else {
                continue;
            };
            reply.update_data(chat_id, &*self, force);
            self.messages[index].components.insert(reply);
        }
    }

    /// Puts a day mark on the first message of every calendar day and
    /// removes stale ones.
    pub fn refresh_date_marks(&mut self) {
        let mut previous = None;
        for message in &mut self.messages {
            let date = timestamp_to_date(message.timestamp_ms);
            if previous == Some(date) {
                message.components.remove::<DateMark>();
            } else if !message.components.has::<DateMark>() {
                message.components.insert(DateMark::from_date(date));
            }
            previous = Some(date);
        }
    }

    fn message_mut(&mut self, reference: MessageRef) -> Option<&mut Message> {
        self.messages
            .iter_mut()
            .find(|message| message.reference == reference)
    }
}

impl MessageLookup for OpenChatState {
    fn find_message(&self, reference: MessageRef) -> Option<&Message> {
        if reference.chat_id != self.chat_id {
            return None;
        }
        self.messages
            .iter()
            .find(|message| message.reference == reference)
    }
}

impl MarkupResolver for OpenChatState {
    fn markup(&self, message: MessageRef) -> Option<&MarkupGrid> {
        self.find_message(message)?
            .components
            .get::<ReplyMarkup>()
            .map(ReplyMarkup::grid)
    }

    fn markup_mut(&mut self, message: MessageRef) -> Option<&mut MarkupGrid> {
        if message.chat_id != self.chat_id {
            return None;
        }
        self.message_mut(message)?
            .components
            .get_mut::<ReplyMarkup>()
            .map(ReplyMarkup::grid_mut)
    }
}
