//! Players and the cyclic turn order.

use crate::error::{BoardError, BoardErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// A participant, identified by a single printable character.
///
/// Two players with the same tag are the same player.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "String", into = "String")]
#[display("{tag}")]
pub struct Player {
    tag: char,
}

impl Player {
    /// Creates a player from a one-character tag.
    ///
    /// # Errors
    ///
    /// Returns a format error unless `tag` is exactly one character that is
    /// neither whitespace nor a control character.
    #[track_caller]
    pub fn new(tag: &str) -> Result<Self, BoardError> {
        let mut chars = tag.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => Err(BoardError::new(BoardErrorKind::PlayerTag(tag.to_string()))),
        }
    }

    /// Creates a player from a tag character.
    #[track_caller]
    pub fn from_char(tag: char) -> Result<Self, BoardError> {
        if tag.is_whitespace() || tag.is_control() {
            return Err(BoardError::new(BoardErrorKind::PlayerTag(tag.to_string())));
        }
        Ok(Self { tag })
    }

    /// Returns the player's tag.
    pub fn tag(self) -> char {
        self.tag
    }
}

impl FromStr for Player {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Player {
    type Error = BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Player> for String {
    fn from(player: Player) -> Self {
        player.tag.to_string()
    }
}

/// Ordered ring of distinct players.
///
/// The player after index `i` is the one at `(i + 1) % len`, with the last
/// player wrapping to the first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TurnOrder {
    players: Vec<Player>,
}

impl TurnOrder {
    /// Links the players in the given order.
    ///
    /// # Errors
    ///
    /// Returns a format error if the list is empty or names a player twice.
    #[instrument(skip(players))]
    pub fn new(players: impl IntoIterator<Item = Player>) -> Result<Self, BoardError> {
        let mut ordered: Vec<Player> = Vec::new();
        for player in players {
            if ordered.contains(&player) {
                return Err(BoardError::new(BoardErrorKind::DuplicatePlayer(player)));
            }
            ordered.push(player);
        }
        if ordered.is_empty() {
            return Err(BoardError::new(BoardErrorKind::NoPlayers));
        }
        Ok(Self { players: ordered })
    }

    /// Players in turn order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Always false; a turn order has at least one player.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Player who moves first.
    pub fn first(&self) -> Player {
        self.players[0]
    }

    /// Position of a player in the ring.
    pub fn index_of(&self, player: Player) -> Option<usize> {
        self.players.iter().position(|&p| p == player)
    }

    /// Index of the player after `index`.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.players.len()
    }

    /// Player at a ring index.
    pub(crate) fn at(&self, index: usize) -> Player {
        self.players[index]
    }

    /// Returns the player who moves after `player`.
    ///
    /// # Errors
    ///
    /// Returns a usage error if `player` is not part of the ring.
    #[track_caller]
    pub fn next_after(&self, player: Player) -> Result<Player, BoardError> {
        self.index_of(player)
            .map(|i| self.players[self.next_index(i)])
            .ok_or_else(|| BoardError::new(BoardErrorKind::NoSuccessor(player)))
    }
}
