//! Rendering the world as the text every client receives.

use std::fmt;

use gridbrawl_protocol::{Position, SNAPSHOT_HEADER, SlotId};

use crate::World;

/// One line of the `Players:` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatus {
    pub slot: SlotId,
    pub hp: u32,
    pub position: Position,
}

/// A rendered copy of the world at one instant.
///
/// `Display` produces the exact wire body. Build one with
/// [`World::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub rows: Vec<String>,
    pub players: Vec<PlayerStatus>,
    pub messages: Vec<(SlotId, String)>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{SNAPSHOT_HEADER}\n")?;
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }

        f.write_str("\nPlayers:\n")?;
        for p in &self.players {
            writeln!(f, "Player {}: HP={} Pos={}", p.slot, p.hp, p.position)?;
        }

        if !self.messages.is_empty() {
            f.write_str("\nNew Message:\n")?;
            for (slot, text) in &self.messages {
                writeln!(f, "Player {slot} says: {text}")?;
            }
        }
        Ok(())
    }
}

impl World {
    /// Renders the grid and player table, consuming every pending message
    /// of an active player.
    ///
    /// Call [`refresh_markers`](World::refresh_markers) first; the grid
    /// rows are taken as they stand.
    pub fn snapshot(&mut self) -> Snapshot {
        let rows = (0..self.grid.rows())
            .map(|r| self.grid.row_markers(r))
            .collect();

        let players = self
            .players
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| PlayerStatus {
                slot: p.slot,
                hp: p.hp,
                position: p.position,
            })
            .collect();

        let messages = self
            .players
            .iter_mut()
            .filter(|p| p.active)
            .filter_map(|p| {
                p.pending_message
                    .take()
                    .filter(|text| !text.is_empty())
                    .map(|text| (p.slot, text))
            })
            .collect();

        Snapshot {
            rows,
            players,
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorldConfig;
    use gridbrawl_protocol::Command;

    fn started(slots: &[usize]) -> World {
        let mut w = World::new(&WorldConfig::default()).unwrap();
        for s in slots {
            w.spawn(SlotId(*s)).unwrap();
        }
        w.refresh_markers();
        w
    }

    #[test]
    fn test_snapshot_initial_layout_exact_text() {
        let mut w = started(&[0, 1]);
        let text = w.snapshot().to_string();
        let expected = "\n--- GAME STATE ---\n\
                        A....\n\
                        B..#.\n\
                        ..#..\n\
                        .....\n\
                        .....\n\
                        \nPlayers:\n\
                        Player A: HP=100 Pos=(0, 0)\n\
                        Player B: HP=100 Pos=(1, 0)\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_snapshot_messages_section_once_then_cleared() {
        let mut w = started(&[0, 1]);
        w.apply(SlotId(0), &Command::Msg("hello".into()));
        w.apply(SlotId(1), &Command::Msg("hi there".into()));

        let text = w.snapshot().to_string();
        assert!(text.ends_with(
            "\nNew Message:\nPlayer A says: hello\nPlayer B says: hi there\n"
        ));
        assert_eq!(text.matches("New Message:").count(), 1);

        let again = w.snapshot();
        assert!(again.messages.is_empty());
        assert!(!again.to_string().contains("New Message:"));
    }

    #[test]
    fn test_snapshot_omits_defeated_players() {
        let mut w = started(&[0, 1]);
        w.players[1].hp = 0;
        w.refresh_markers();
        let snap = w.snapshot();
        assert_eq!(snap.players.len(), 1);
        assert_eq!(snap.players[0].slot, SlotId(0));
        assert_eq!(snap.rows[1], "...#.");
    }

    #[test]
    fn test_snapshot_with_no_players_has_empty_list() {
        let mut w = started(&[]);
        let text = w.snapshot().to_string();
        assert!(text.ends_with("\nPlayers:\n"));
    }
}
