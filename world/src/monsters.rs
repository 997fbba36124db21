//! Monster state and movement policies.

use rand::Rng;
use rogue_core::{Direction, MonsterId, MonsterKind, MonsterSnapshot, Position};

const BLUE_SLIME_CYCLE: [Option<Direction>; 4] =
    [Some(Direction::East), None, Some(Direction::West), None];

/// Monster stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Monster {
    pub(crate) id: MonsterId,
    pub(crate) kind: MonsterKind,
    pub(crate) position: Position,
    pub(crate) hit_points: i32,
    behavior: Behavior,
}

impl Monster {
    /// Spawns a monster of the given kind with its starting stats.
    pub(crate) fn spawn<R>(id: MonsterId, kind: MonsterKind, position: Position, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            id,
            kind,
            position,
            hit_points: kind.hit_points(),
            behavior: Behavior::for_kind(kind, position, rng),
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    pub(crate) fn base_hit(&self) -> i32 {
        self.kind.base_hit()
    }

    pub(crate) fn score_value(&self) -> u32 {
        self.kind.score_value()
    }

    /// Applies damage and returns the hit points left.
    pub(crate) fn suffer(&mut self, damage: i32) -> i32 {
        self.hit_points = self.hit_points.saturating_sub(damage);
        self.hit_points
    }

    /// Asks the movement policy where the monster wants to go this turn.
    pub(crate) fn propose_move<R>(&mut self, rng: &mut R) -> Position
    where
        R: Rng + ?Sized,
    {
        self.behavior.propose(self.position, rng)
    }

    pub(crate) fn snapshot(&self) -> MonsterSnapshot {
        MonsterSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            hit_points: self.hit_points,
        }
    }
}

/// Per-instance movement state of each monster kind.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Behavior {
    /// Rests while `resting` is set, then takes one random step.
    Bat { resting: bool },
    /// Keeps walking along `heading` until a turn passes without movement.
    Zombie {
        heading: Direction,
        last_position: Position,
    },
    GreenSlime,
    /// Index of the next entry in [`BLUE_SLIME_CYCLE`].
    BlueSlime { phase: usize },
}

impl Behavior {
    fn for_kind<R>(kind: MonsterKind, position: Position, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        match kind {
            MonsterKind::Bat => Self::Bat { resting: true },
            MonsterKind::Zombie => Self::Zombie {
                heading: random_direction(rng),
                last_position: position,
            },
            MonsterKind::GreenSlime => Self::GreenSlime,
            MonsterKind::BlueSlime => Self::BlueSlime { phase: 0 },
        }
    }

    fn propose<R>(&mut self, current: Position, rng: &mut R) -> Position
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Bat { resting } => {
                let proposal = if *resting {
                    current
                } else {
                    current.step(random_direction(rng))
                };
                *resting = !*resting;
                proposal
            }
            Self::Zombie {
                heading,
                last_position,
            } => {
                if *last_position == current {
                    *heading = random_direction(rng);
                }
                *last_position = current;
                current.step(*heading)
            }
            Self::GreenSlime => current,
            Self::BlueSlime { phase } => {
                let step = BLUE_SLIME_CYCLE[*phase];
                *phase = (*phase + 1) % BLUE_SLIME_CYCLE.len();
                step.map_or(current, |direction| current.step(direction))
            }
        }
    }
}

fn random_direction<R>(rng: &mut R) -> Direction
where
    R: Rng + ?Sized,
{
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}
