//! Legality invariants for game states.
//!
//! Each rule is a first-class type that can be checked on its own. A
//! [`GameState`](crate::GameState) is only created after every rule in
//! [`StateInvariants`] holds for its candidate [`Draft`].

use crate::bits::{Mask, population_count};
use crate::error::{BoardError, BoardErrorKind};
use crate::lines::is_won;
use crate::player::{Player, TurnOrder};
use tracing::{instrument, trace};

/// Candidate position that has not been validated yet.
///
/// `masks` are aligned with the players of `order`.
#[derive(Debug, Clone, Copy)]
pub struct Draft<'a> {
    order: &'a TurnOrder,
    masks: &'a [Mask],
    turn: Player,
    lines: &'a [Mask],
}

impl<'a> Draft<'a> {
    /// Creates a draft from per-player masks in turn order.
    pub fn new(order: &'a TurnOrder, masks: &'a [Mask], turn: Player, lines: &'a [Mask]) -> Self {
        debug_assert_eq!(order.len(), masks.len());
        Self {
            order,
            masks,
            turn,
            lines,
        }
    }

    /// Players paired with their masks.
    pub fn entries(&self) -> impl Iterator<Item = (Player, Mask)> + '_ {
        self.order.players().iter().copied().zip(self.masks.iter().copied())
    }

    /// Players that complete at least one line.
    pub fn winners(&self) -> Vec<Player> {
        self.entries()
            .filter(|&(_, mask)| self.lines.iter().any(|&line| is_won(mask, line)))
            .map(|(player, _)| player)
            .collect()
    }

    /// Every unordered pair of masks.
    fn pairs(&self) -> impl Iterator<Item = (Mask, Mask)> + '_ {
        self.masks
            .iter()
            .enumerate()
            .flat_map(move |(i, &a)| self.masks[i + 1..].iter().map(move |&b| (a, b)))
    }
}

/// A logical property that must hold for every game state.
pub trait Invariant {
    /// Checks the property, returning the matching error when it fails.
    fn check(draft: &Draft<'_>) -> Result<(), BoardError>;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;

    /// Returns true if the property holds.
    fn holds(draft: &Draft<'_>) -> bool {
        Self::check(draft).is_ok()
    }
}

/// Invariants checked together, in order, stopping at the first failure.
pub trait InvariantSet {
    /// Checks every invariant in the set.
    fn check_all(draft: &Draft<'_>) -> Result<(), BoardError>;
}

macro_rules! impl_invariant_set {
    ($($name:ident),+) => {
        impl<$($name: Invariant),+> InvariantSet for ($($name,)+) {
            fn check_all(draft: &Draft<'_>) -> Result<(), BoardError> {
                $(
                    trace!(invariant = $name::description(), "Checking invariant");
                    $name::check(draft)?;
                )+
                Ok(())
            }
        }
    };
}

impl_invariant_set!(I1);
impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);
impl_invariant_set!(I1, I2, I3, I4, I5);

/// The player to move takes part in the game.
pub struct TurnHolderKnown;

impl Invariant for TurnHolderKnown {
    fn check(draft: &Draft<'_>) -> Result<(), BoardError> {
        match draft.order.index_of(draft.turn) {
            Some(_) => Ok(()),
            None => Err(BoardError::new(BoardErrorKind::UnknownTurnHolder(draft.turn))),
        }
    }

    fn description() -> &'static str {
        "The player to move takes part in the game"
    }
}

/// No cell is held by two players.
pub struct DisjointMasks;

impl Invariant for DisjointMasks {
    fn check(draft: &Draft<'_>) -> Result<(), BoardError> {
        if draft.pairs().any(|(a, b)| a & b != 0) {
            return Err(BoardError::new(BoardErrorKind::SharedCell));
        }
        Ok(())
    }

    fn description() -> &'static str {
        "No cell is occupied by more than one player"
    }
}

/// Move counts of any two players differ by at most one.
pub struct BalancedCounts;

impl Invariant for BalancedCounts {
    fn check(draft: &Draft<'_>) -> Result<(), BoardError> {
        if draft
            .pairs()
            .any(|(a, b)| population_count(a).abs_diff(population_count(b)) > 1)
        {
            return Err(BoardError::new(BoardErrorKind::UnbalancedCells));
        }
        Ok(())
    }

    fn description() -> &'static str {
        "Occupied-cell counts differ by at most one"
    }
}

/// At most one player completes a line.
pub struct SingleWinner;

impl Invariant for SingleWinner {
    fn check(draft: &Draft<'_>) -> Result<(), BoardError> {
        if draft.winners().len() > 1 {
            return Err(BoardError::new(BoardErrorKind::MultipleWinners));
        }
        Ok(())
    }

    fn description() -> &'static str {
        "At most one player has a winning line"
    }
}

/// After a winning move the turn passes to the winner's successor and stays.
pub struct TurnFollowsWinner;

impl Invariant for TurnFollowsWinner {
    fn check(draft: &Draft<'_>) -> Result<(), BoardError> {
        if let [winner] = draft.winners()[..] {
            let expected = draft.order.next_after(winner)?;
            if expected != draft.turn {
                return Err(BoardError::new(BoardErrorKind::TurnWinnerMismatch {
                    winner,
                    turn: draft.turn,
                }));
            }
        }
        Ok(())
    }

    fn description() -> &'static str {
        "If a player has won, the turn belongs to that player's successor"
    }
}

/// Every invariant a game state satisfies, in checking order.
pub type StateInvariants = (
    TurnHolderKnown,
    DisjointMasks,
    BalancedCounts,
    SingleWinner,
    TurnFollowsWinner,
);

/// Validates a draft against [`StateInvariants`].
#[instrument(skip(draft), fields(turn = %draft.turn))]
pub fn validate(draft: &Draft<'_>) -> Result<(), BoardError> {
    StateInvariants::check_all(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::generate_lines;

    fn order() -> TurnOrder {
        TurnOrder::new([Player::new("X").unwrap(), Player::new("O").unwrap()]).unwrap()
    }

    fn x() -> Player {
        Player::new("X").unwrap()
    }

    fn o() -> Player {
        Player::new("O").unwrap()
    }

    #[test]
    fn test_empty_board_holds() {
        let order = order();
        let lines = generate_lines(3).unwrap();
        let draft = Draft::new(&order, &[0, 0], x(), &lines);
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_smaller_sets_check_only_their_members() {
        let order = order();
        let lines = generate_lines(3).unwrap();
        let draft = Draft::new(&order, &[0b111_000_000, 0b000_111_000], x(), &lines);
        assert!(<(TurnHolderKnown,)>::check_all(&draft).is_ok());
        assert!(<(TurnHolderKnown, DisjointMasks)>::check_all(&draft).is_ok());
        assert!(<(TurnHolderKnown, DisjointMasks, BalancedCounts)>::check_all(&draft).is_ok());
        let err = <(TurnHolderKnown, DisjointMasks, BalancedCounts, SingleWinner)>::check_all(&draft)
            .unwrap_err();
        assert_eq!(err.kind(), &BoardErrorKind::MultipleWinners);
    }

    #[test]
    fn test_unknown_turn_holder() {
        let order = order();
        let lines = generate_lines(3).unwrap();
        let z = Player::new("Z").unwrap();
        let draft = Draft::new(&order, &[0, 0], z, &lines);
        assert!(!TurnHolderKnown::holds(&draft));
        let err = validate(&draft).unwrap_err();
        assert_eq!(err.kind(), &BoardErrorKind::UnknownTurnHolder(z));
    }

    #[test]
    fn test_shared_cell_detected() {
        let order = order();
        let lines = generate_lines(3).unwrap();
        let draft = Draft::new(&order, &[0b100_000_000, 0b100_000_000], x(), &lines);
        assert!(!DisjointMasks::holds(&draft));
        assert_eq!(validate(&draft).unwrap_err().kind(), &BoardErrorKind::SharedCell);
    }

    #[test]
    fn test_unbalanced_counts_detected() {
        let order = order();
        let lines = generate_lines(3).unwrap();
        let draft = Draft::new(&order, &[0b110_000_000, 0], o(), &lines);
        assert!(DisjointMasks::holds(&draft));
        assert!(!BalancedCounts::holds(&draft));
    }

    #[test]
    fn test_two_winners_detected() {
        let order = order();
        let lines = generate_lines(3).unwrap();
        let draft = Draft::new(&order, &[0b111_000_000, 0b000_111_000], x(), &lines);
        assert_eq!(draft.winners(), vec![x(), o()]);
        assert_eq!(
            validate(&draft).unwrap_err().kind(),
            &BoardErrorKind::MultipleWinners
        );
    }

    #[test]
    fn test_turn_must_follow_winner() {
        let order = order();
        let lines = generate_lines(3).unwrap();
        let masks = [0b111_000_000, 0b000_110_000];

        let frozen = Draft::new(&order, &masks, o(), &lines);
        assert!(TurnFollowsWinner::holds(&frozen));

        let late = Draft::new(&order, &masks, x(), &lines);
        assert_eq!(
            validate(&late).unwrap_err().kind(),
            &BoardErrorKind::TurnWinnerMismatch {
                winner: x(),
                turn: x()
            }
        );
    }

    #[test]
    fn test_three_player_balance_is_pairwise() {
        let z = Player::new("Z").unwrap();
        let order = TurnOrder::new([x(), o(), z]).unwrap();
        let lines = generate_lines(4).unwrap();
        let draft = Draft::new(&order, &[0b11, 0b1100, 0b10000], z, &lines);
        assert!(validate(&draft).is_ok());

        let draft = Draft::new(&order, &[0b11, 0b1100, 0], z, &lines);
        assert!(!BalancedCounts::holds(&draft));
    }
}
