//! Album grouping of consecutive media messages.

use crate::domain::message::MessageId;

/// Album id shared by all messages sent together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageGroupId(pub u64);

/// Membership of a message in an album. Every member carries the same
/// leader and list of other members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: MessageGroupId,
    leader: MessageId,
    others: Vec<MessageId>,
}

impl Group {
    pub fn new(id: MessageGroupId, leader: MessageId, others: Vec<MessageId>) -> Self {
        Self { id, leader, others }
    }

    pub fn id(&self) -> MessageGroupId {
        self.id
    }

    pub fn leader(&self) -> MessageId {
        self.leader
    }

    #[cfg(test)]
    pub fn others(&self) -> &[MessageId] {
        &self.others
    }

    /// Number of messages in the album, the leader included.
    pub fn item_count(&self) -> usize {
        self.others.len() + 1
    }

    /// Forgets a deleted member, promoting the next one when the leader
    /// went away. Returns false once a single message is left and the
    /// album should be dissolved.
    pub fn item_removed(&mut self, removed: MessageId) -> bool {
        if removed == self.leader {
            if self.others.is_empty() {
                return false;
            }
            self.leader = self.others.remove(0);
        } else {
            self.others.retain(|id| *id != removed);
        }
        !self.others.is_empty()
    }

    /// Follows a member that moved to a new id.
    pub fn item_rekeyed(&mut self, from: MessageId, to: MessageId) {
        if self.leader == from {
            self.leader = to;
        }
        for id in &mut self.others {
            if *id == from {
                *id = to;
            }
        }
    }
}
