//! Command processor: applies one parsed command on behalf of one slot.
//!
//! Gameplay is total. A blocked move, a swing that hits nobody, or a
//! command from a defeated player is an [`Outcome`], never an error.

use gridbrawl_protocol::{Command, Direction, Position, SlotId};

use crate::World;

/// What [`World::apply`] did. Used for logging and tests; the wire only
/// ever sees the next snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The player stepped from `from` to `to`.
    Moved { from: Position, to: Position },
    /// The step left the grid or ran into an obstacle.
    Blocked,
    /// An attack resolved. `targets` may be empty.
    Hit { targets: Vec<SlotId>, damage: u32 },
    /// The text replaced the player's pending message.
    MessageQueued,
    /// Nothing changed: inactive or defeated actor, or `QUIT` (which the
    /// connection handler acts on).
    Ignored,
}

/// An area attack: every other living player inside the square of the
/// given radius around the attacker loses `damage` hp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub radius: usize,
    pub damage: u32,
}

impl Strike {
    pub const MELEE: Strike = Strike { radius: 1, damage: 10 };
    pub const FIREBALL: Strike = Strike { radius: 2, damage: 20 };
}

/// Inclusive rectangle of cells, already clamped to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Area {
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
}

impl Area {
    /// The square of `radius` around `center`, clamped to
    /// `[0, rows-1] x [0, cols-1]`.
    pub(crate) fn around(center: Position, radius: usize, rows: usize, cols: usize) -> Self {
        Self {
            top: center.row.saturating_sub(radius),
            bottom: center.row.saturating_add(radius).min(rows.saturating_sub(1)),
            left: center.col.saturating_sub(radius),
            right: center.col.saturating_add(radius).min(cols.saturating_sub(1)),
        }
    }

    pub(crate) fn contains(&self, pos: Position) -> bool {
        (self.top..=self.bottom).contains(&pos.row) && (self.left..=self.right).contains(&pos.col)
    }
}

/// One step from `pos` in `dir`, or `None` if it would go below zero.
/// The upper bound is checked by the caller against the grid.
fn step(pos: Position, dir: Direction) -> Option<Position> {
    match dir {
        Direction::Up => pos.row.checked_sub(1).map(|row| Position::new(row, pos.col)),
        Direction::Down => Some(Position::new(pos.row + 1, pos.col)),
        Direction::Left => pos.col.checked_sub(1).map(|col| Position::new(pos.row, col)),
        Direction::Right => Some(Position::new(pos.row, pos.col + 1)),
    }
}

impl World {
    /// Applies `command` for the player in `slot`.
    ///
    /// Markers are not refreshed here; the caller refreshes once before
    /// rendering the next snapshot.
    pub fn apply(&mut self, slot: SlotId, command: &Command) -> Outcome {
        let Some(actor) = self.players.get(slot.index()) else {
            return Outcome::Ignored;
        };
        if !actor.active {
            return Outcome::Ignored;
        }
        let alive = actor.is_alive();

        let outcome = match command {
            Command::Msg(text) => {
                self.players[slot.index()].pending_message = Some(text.clone());
                Outcome::MessageQueued
            }
            Command::Quit => Outcome::Ignored,
            // Defeated players keep their slot but can only talk.
            _ if !alive => Outcome::Ignored,
            Command::Move(dir) => self.move_player(slot, *dir),
            Command::Attack => self.strike(slot, Strike::MELEE),
            Command::Fireball => self.strike(slot, Strike::FIREBALL),
        };
        tracing::debug!(%slot, %command, ?outcome, "command applied");
        outcome
    }

    fn move_player(&mut self, slot: SlotId, dir: Direction) -> Outcome {
        let from = self.players[slot.index()].position;
        match step(from, dir) {
            Some(to) if self.is_walkable(to) => {
                self.players[slot.index()].position = to;
                Outcome::Moved { from, to }
            }
            _ => Outcome::Blocked,
        }
    }

    fn strike(&mut self, slot: SlotId, strike: Strike) -> Outcome {
        let center = self.players[slot.index()].position;
        let area = Area::around(center, strike.radius, self.grid.rows(), self.grid.cols());

        let mut targets = Vec::new();
        for target in self.players.iter_mut() {
            if target.slot == slot || !target.is_alive() || !area.contains(target.position) {
                continue;
            }
            if target.take_damage(strike.damage) {
                tracing::info!(attacker = %slot, defeated = %target.slot, "player defeated");
            }
            targets.push(target.slot);
        }
        Outcome::Hit {
            targets,
            damage: strike.damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorldConfig;
    use crate::player::INITIAL_HP;

    fn world_with(players: &[(usize, Position)]) -> World {
        let mut w = World::new(&WorldConfig::default()).unwrap();
        for (slot, pos) in players {
            w.spawn(SlotId(*slot)).unwrap();
            w.players[*slot].position = *pos;
        }
        w
    }

    fn hp(w: &World, slot: usize) -> u32 {
        w.player(SlotId(slot)).unwrap().hp
    }

    #[test]
    fn test_area_around_clamps_to_grid() {
        let area = Area::around(Position::new(0, 4), 2, 5, 5);
        assert!(area.contains(Position::new(0, 2)));
        assert!(area.contains(Position::new(2, 4)));
        assert!(!area.contains(Position::new(3, 4)));
        assert!(!area.contains(Position::new(0, 1)));
    }

    #[test]
    fn test_apply_move_right_commits() {
        let mut w = world_with(&[(0, Position::new(0, 0))]);
        let out = w.apply(SlotId(0), &Command::Move(Direction::Right));
        assert_eq!(
            out,
            Outcome::Moved { from: Position::new(0, 0), to: Position::new(0, 1) }
        );
        assert_eq!(w.player(SlotId(0)).unwrap().position, Position::new(0, 1));
    }

    #[test]
    fn test_apply_move_up_from_top_row_is_blocked() {
        let mut w = world_with(&[(0, Position::new(0, 0))]);
        assert_eq!(w.apply(SlotId(0), &Command::Move(Direction::Up)), Outcome::Blocked);
        assert_eq!(w.apply(SlotId(0), &Command::Move(Direction::Left)), Outcome::Blocked);
        assert_eq!(w.player(SlotId(0)).unwrap().position, Position::new(0, 0));
    }

    #[test]
    fn test_apply_move_off_bottom_right_is_blocked() {
        let mut w = world_with(&[(0, Position::new(4, 4))]);
        assert_eq!(w.apply(SlotId(0), &Command::Move(Direction::Down)), Outcome::Blocked);
        assert_eq!(w.apply(SlotId(0), &Command::Move(Direction::Right)), Outcome::Blocked);
    }

    #[test]
    fn test_apply_move_into_obstacle_is_blocked() {
        let mut w = world_with(&[(0, Position::new(2, 1))]);
        assert_eq!(w.apply(SlotId(0), &Command::Move(Direction::Right)), Outcome::Blocked);
        assert_eq!(w.player(SlotId(0)).unwrap().position, Position::new(2, 1));
    }

    #[test]
    fn test_apply_move_onto_other_player_is_allowed() {
        let mut w = world_with(&[(0, Position::new(0, 0)), (1, Position::new(0, 1))]);
        let out = w.apply(SlotId(0), &Command::Move(Direction::Right));
        assert!(matches!(out, Outcome::Moved { .. }));
    }

    #[test]
    fn test_apply_attack_adjacent_deals_ten() {
        let mut w = world_with(&[(0, Position::new(2, 2)), (1, Position::new(2, 3))]);
        let out = w.apply(SlotId(0), &Command::Attack);
        assert_eq!(out, Outcome::Hit { targets: vec![SlotId(1)], damage: 10 });
        assert_eq!(hp(&w, 1), INITIAL_HP - 10);
        assert_eq!(hp(&w, 0), INITIAL_HP);
    }

    #[test]
    fn test_apply_fireball_adjacent_deals_twenty() {
        let mut w = world_with(&[(0, Position::new(2, 2)), (1, Position::new(2, 3))]);
        w.apply(SlotId(0), &Command::Fireball);
        assert_eq!(hp(&w, 1), INITIAL_HP - 20);
    }

    #[test]
    fn test_apply_attack_misses_outside_radius() {
        let mut w = world_with(&[(0, Position::new(0, 0)), (1, Position::new(2, 0))]);
        let out = w.apply(SlotId(0), &Command::Attack);
        assert_eq!(out, Outcome::Hit { targets: vec![], damage: 10 });
        assert_eq!(hp(&w, 1), INITIAL_HP);

        w.apply(SlotId(0), &Command::Fireball);
        assert_eq!(hp(&w, 1), INITIAL_HP - 20);
    }

    #[test]
    fn test_apply_attack_skips_inactive_and_defeated() {
        let mut w = world_with(&[
            (0, Position::new(1, 1)),
            (1, Position::new(1, 2)),
            (2, Position::new(0, 1)),
        ]);
        w.players[1].hp = 0;
        w.despawn(SlotId(2)).unwrap();
        let out = w.apply(SlotId(0), &Command::Attack);
        assert_eq!(out, Outcome::Hit { targets: vec![], damage: 10 });
        assert_eq!(hp(&w, 1), 0);
    }

    #[test]
    fn test_apply_attack_floors_hp_at_zero() {
        let mut w = world_with(&[(0, Position::new(0, 0)), (1, Position::new(0, 1))]);
        w.players[1].hp = 15;
        w.apply(SlotId(0), &Command::Fireball);
        assert_eq!(hp(&w, 1), 0);
        assert!(!w.player(SlotId(1)).unwrap().is_alive());
    }

    #[test]
    fn test_apply_defeated_player_is_frozen_but_can_talk() {
        let mut w = world_with(&[(0, Position::new(0, 0)), (1, Position::new(0, 1))]);
        w.players[0].hp = 0;
        assert_eq!(w.apply(SlotId(0), &Command::Move(Direction::Down)), Outcome::Ignored);
        assert_eq!(w.apply(SlotId(0), &Command::Attack), Outcome::Ignored);
        assert_eq!(hp(&w, 1), INITIAL_HP);

        let out = w.apply(SlotId(0), &Command::Msg("gg".into()));
        assert_eq!(out, Outcome::MessageQueued);
        assert_eq!(w.player(SlotId(0)).unwrap().pending_message.as_deref(), Some("gg"));
    }

    #[test]
    fn test_apply_msg_overwrites_pending() {
        let mut w = world_with(&[(0, Position::new(0, 0))]);
        w.apply(SlotId(0), &Command::Msg("first".into()));
        w.apply(SlotId(0), &Command::Msg("second".into()));
        assert_eq!(w.player(SlotId(0)).unwrap().pending_message.as_deref(), Some("second"));
    }

    #[test]
    fn test_apply_inactive_slot_is_ignored() {
        let mut w = world_with(&[]);
        assert_eq!(w.apply(SlotId(0), &Command::Attack), Outcome::Ignored);
        assert_eq!(w.apply(SlotId(9), &Command::Attack), Outcome::Ignored);
    }

    #[test]
    fn test_apply_quit_changes_nothing() {
        let mut w = world_with(&[(0, Position::new(0, 0))]);
        assert_eq!(w.apply(SlotId(0), &Command::Quit), Outcome::Ignored);
        assert!(w.player(SlotId(0)).unwrap().active);
    }
}
