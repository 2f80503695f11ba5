//! The three hand gestures and the fixed payoff table between them.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One of the three trainable hand shapes. Closed set; order is the cycle used
/// for the countdown bluff and for index-based lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GestureClass {
    Rock,
    Paper,
    Scissors,
}

impl GestureClass {
    pub const ALL: [GestureClass; 3] = [GestureClass::Rock, GestureClass::Paper, GestureClass::Scissors];

    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        match self {
            GestureClass::Rock => 0,
            GestureClass::Paper => 1,
            GestureClass::Scissors => 2,
        }
    }

    /// Stable lowercase id, also used for DOM ids and JS calls.
    pub fn id(self) -> &'static str {
        match self {
            GestureClass::Rock => "rock",
            GestureClass::Paper => "paper",
            GestureClass::Scissors => "scissors",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GestureClass::Rock => "Rock",
            GestureClass::Paper => "Paper",
            GestureClass::Scissors => "Scissors",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            GestureClass::Rock => "✊",
            GestureClass::Paper => "✋",
            GestureClass::Scissors => "✌️",
        }
    }

    /// The move this one defeats.
    pub fn beats(self) -> GestureClass {
        match self {
            GestureClass::Rock => GestureClass::Scissors,
            GestureClass::Scissors => GestureClass::Paper,
            GestureClass::Paper => GestureClass::Rock,
        }
    }
}

impl fmt::Display for GestureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("unknown gesture class '{0}'")]
pub struct UnknownGesture(pub String);

impl FromStr for GestureClass {
    type Err = UnknownGesture;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        GestureClass::ALL
            .into_iter()
            .find(|g| g.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownGesture(trimmed.to_string()))
    }
}

/// Result of one round from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    PlayerWins,
    ComputerWins,
    Tie,
}

impl Outcome {
    /// Cyclic dominance: rock > scissors > paper > rock.
    pub fn decide(player: GestureClass, computer: GestureClass) -> Outcome {
        if player == computer {
            Outcome::Tie
        } else if player.beats() == computer {
            Outcome::PlayerWins
        } else {
            Outcome::ComputerWins
        }
    }

    /// Human readable round summary shown in the outcome slot.
    pub fn message(self, player: GestureClass, computer: GestureClass) -> String {
        match self {
            Outcome::PlayerWins => format!("Player's {} beats Computer's {}. You win!", player, computer),
            Outcome::ComputerWins => format!("Computer's {} beats Player's {}. You lose!", computer, player),
            Outcome::Tie => format!("Player and Computer both threw {}. It's a tie!", player),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoff_table_fixed_cases() {
        use GestureClass::*;
        assert_eq!(Outcome::decide(Rock, Scissors), Outcome::PlayerWins);
        assert_eq!(Outcome::decide(Scissors, Rock), Outcome::ComputerWins);
        assert_eq!(Outcome::decide(Paper, Paper), Outcome::Tie);
        assert_eq!(Outcome::decide(Paper, Rock), Outcome::PlayerWins);
        assert_eq!(Outcome::decide(Scissors, Paper), Outcome::PlayerWins);
    }

    #[test]
    fn test_payoff_is_antisymmetric_and_cyclic() {
        for a in GestureClass::ALL {
            // each move beats exactly one other and loses to exactly one other
            let wins = GestureClass::ALL.iter().filter(|&&b| Outcome::decide(a, b) == Outcome::PlayerWins).count();
            let losses = GestureClass::ALL.iter().filter(|&&b| Outcome::decide(a, b) == Outcome::ComputerWins).count();
            assert_eq!((wins, losses), (1, 1), "{a}");
            for b in GestureClass::ALL {
                let there = Outcome::decide(a, b);
                let back = Outcome::decide(b, a);
                match there {
                    Outcome::Tie => assert_eq!(a, b),
                    Outcome::PlayerWins => assert_eq!(back, Outcome::ComputerWins),
                    Outcome::ComputerWins => assert_eq!(back, Outcome::PlayerWins),
                }
            }
        }
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!("rock".parse::<GestureClass>(), Ok(GestureClass::Rock));
        assert_eq!(" Scissors ".parse::<GestureClass>(), Ok(GestureClass::Scissors));
        assert!("lizard".parse::<GestureClass>().is_err());
        for g in GestureClass::ALL {
            assert_eq!(GestureClass::from_index(g.index()), g);
        }
    }

    #[test]
    fn test_messages() {
        use GestureClass::*;
        let win = Outcome::PlayerWins.message(Rock, Scissors);
        assert!(win.starts_with("Player's rock beats"), "{win}");
        let lose = Outcome::ComputerWins.message(Scissors, Rock);
        assert!(lose.contains("Computer's rock beats Player's scissors"), "{lose}");
        assert!(Outcome::Tie.message(Paper, Paper).contains("tie"));
    }
}
