use gridbrawl_protocol::{Position, SlotId};

/// Hit points a player starts with.
pub const INITIAL_HP: u32 = 100;

/// One row of the player table.
///
/// A record exists for every slot whether or not anyone is connected;
/// `active` says whether the slot is in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub slot: SlotId,
    pub position: Position,
    /// Never drops below zero.
    pub hp: u32,
    pub active: bool,
    /// At most one message, consumed by the next snapshot.
    pub pending_message: Option<String>,
}

impl Player {
    pub(crate) fn vacant(slot: SlotId) -> Self {
        Self {
            slot,
            position: Position::new(0, 0),
            hp: INITIAL_HP,
            active: false,
            pending_message: None,
        }
    }

    /// Active and not yet defeated. Only such players are drawn, listed,
    /// targeted, and allowed to move or attack.
    pub fn is_alive(&self) -> bool {
        self.active && self.hp > 0
    }

    /// Subtracts `amount`, flooring at zero. Returns `true` if this hit
    /// defeated the player.
    pub(crate) fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.hp > 0;
        self.hp = self.hp.saturating_sub(amount);
        was_alive && self.hp == 0
    }
}
