//! Round resolution
//!
//! The outcome of a round depends only on which hands were thrown, never on
//! how many players threw them or in which order.

use shared::Hand;

/// Which of the three hands appear at least once in a round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandSet {
    rock: bool,
    paper: bool,
    scissors: bool,
}

impl HandSet {
    pub fn from_hands<I>(hands: I) -> Self
    where
        I: IntoIterator<Item = Hand>,
    {
        let mut set = HandSet::default();
        for hand in hands {
            set.insert(hand);
        }
        set
    }

    pub fn insert(&mut self, hand: Hand) {
        match hand {
            Hand::Rock => self.rock = true,
            Hand::Paper => self.paper = true,
            Hand::Scissors => self.scissors = true,
        }
    }

    pub fn contains(&self, hand: Hand) -> bool {
        match hand {
            Hand::Rock => self.rock,
            Hand::Paper => self.paper,
            Hand::Scissors => self.scissors,
        }
    }

    pub fn distinct(&self) -> usize {
        Hand::ALL.iter().filter(|h| self.contains(**h)).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// One distinct hand, or all three
    Tie,
    /// Exactly two distinct hands; everyone holding `winning` scores
    Decisive { winning: Hand },
}

/// What a single player is told after the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    Win,
    Loss,
    Tie,
}

impl RoundOutcome {
    pub fn result_for(&self, hand: Hand) -> RoundResult {
        match self {
            RoundOutcome::Tie => RoundResult::Tie,
            RoundOutcome::Decisive { winning } if *winning == hand => RoundResult::Win,
            RoundOutcome::Decisive { .. } => RoundResult::Loss,
        }
    }
}

/// Resolves a round from every committed hand
pub fn resolve<I>(hands: I) -> RoundOutcome
where
    I: IntoIterator<Item = Hand>,
{
    let present = HandSet::from_hands(hands);
    if present.distinct() != 2 {
        return RoundOutcome::Tie;
    }

    // A present hand wins when nobody threw a hand that beats it
    Hand::ALL
        .into_iter()
        .find(|h| {
            present.contains(*h)
                && !Hand::ALL
                    .iter()
                    .any(|other| present.contains(*other) && other.beats(*h))
        })
        .map_or(RoundOutcome::Tie, |winning| RoundOutcome::Decisive { winning })
}
