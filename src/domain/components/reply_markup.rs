use crate::domain::markup::{MarkupFlags, MarkupGrid};

/// Keyboard markup attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyMarkup {
    pub flags: MarkupFlags,
    grid: MarkupGrid,
    version: u64,
    /// Top row of the keyboard before the last edit, while the view still
    /// shows the old position.
    pub old_top: Option<u16>,
}

impl ReplyMarkup {
    pub fn new(flags: MarkupFlags, grid: MarkupGrid) -> Self {
        Self {
            flags,
            grid,
            version: 0,
            old_top: None,
        }
    }

    pub fn grid(&self) -> &MarkupGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut MarkupGrid {
        &mut self.grid
    }

    /// Bumped by [`ReplyMarkup::edit`]; views rebuild their keyboard when it changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces the grid, remembering where the keyboard used to start.
    pub fn edit(&mut self, grid: MarkupGrid, current_top: Option<u16>) {
        self.grid = grid;
        self.version += 1;
        self.old_top = current_top;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::markup::{ButtonKind, MarkupButton};

    #[test]
    fn edit_bumps_version_and_keeps_old_top() {
        let mut markup = ReplyMarkup::new(MarkupFlags::default(), MarkupGrid::default());
        assert_eq!(markup.version(), 0);

        markup.edit(
            MarkupGrid::new(vec![vec![MarkupButton::new(ButtonKind::Default, "Hi", Vec::new())]]),
            Some(12),
        );

        assert_eq!(markup.version(), 1);
        assert_eq!(markup.old_top, Some(12));
        assert_eq!(markup.grid().rows().len(), 1);
    }
}
