//! Contact dispatcher
//!
//! Turns raw physics contacts into game events by looking at the
//! unordered pair of categories that touched. One contact yields at most
//! one event; simultaneous contacts are never merged.

use serde::{Deserialize, Serialize};

use super::world::{BodyId, Category, Contact};

/// Semantic event raised by a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball touched the paddle
    Score { ball: BodyId, paddle: BodyId },
    /// Ball reached the outer boundary
    OutOfBounds { ball: BodyId, boundary: BodyId },
    /// Ball passed over a star
    StarHit { ball: BodyId, star: BodyId },
}

/// Classify a single contact
pub fn classify(contact: &Contact) -> Option<GameEvent> {
    use Category::*;

    // Put the ball first whichever side it arrived on
    let (ball, other, other_category) = match (contact.category_a, contact.category_b) {
        (Ball, c) if c != Ball => (contact.a, contact.b, c),
        (c, Ball) if c != Ball => (contact.b, contact.a, c),
        _ => return None,
    };

    match other_category {
        Player => Some(GameEvent::Score {
            ball,
            paddle: other,
        }),
        Boundary => Some(GameEvent::OutOfBounds {
            ball,
            boundary: other,
        }),
        Star => Some(GameEvent::StarHit { ball, star: other }),
        Ball => None,
    }
}

/// Classify every contact from one step, in contact order
pub fn dispatch(contacts: &[Contact]) -> Vec<GameEvent> {
    contacts.iter().filter_map(classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn contact(a: (u32, Category), b: (u32, Category)) -> Contact {
        Contact {
            a: BodyId(a.0),
            b: BodyId(b.0),
            category_a: a.1,
            category_b: b.1,
            point: Vec2::ZERO,
            normal: Vec2::X,
        }
    }

    #[test]
    fn test_pairs_are_unordered() {
        let forward = classify(&contact((1, Category::Ball), (2, Category::Player)));
        let reverse = classify(&contact((2, Category::Player), (1, Category::Ball)));
        let expected = Some(GameEvent::Score {
            ball: BodyId(1),
            paddle: BodyId(2),
        });
        assert_eq!(forward, expected);
        assert_eq!(reverse, expected);
    }

    #[test]
    fn test_each_pair_kind() {
        assert!(matches!(
            classify(&contact((1, Category::Ball), (3, Category::Boundary))),
            Some(GameEvent::OutOfBounds { .. })
        ));
        assert!(matches!(
            classify(&contact((4, Category::Star), (1, Category::Ball))),
            Some(GameEvent::StarHit { .. })
        ));
    }

    #[test]
    fn test_unrelated_pairs_ignored() {
        assert_eq!(classify(&contact((1, Category::Star), (2, Category::Player))), None);
        assert_eq!(classify(&contact((1, Category::Ball), (2, Category::Ball))), None);
    }

    #[test]
    fn test_simultaneous_contacts_not_coalesced() {
        let contacts = [
            contact((1, Category::Ball), (2, Category::Boundary)),
            contact((1, Category::Ball), (3, Category::Boundary)),
            contact((1, Category::Ball), (9, Category::Star)),
        ];
        let events = dispatch(&contacts);
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], GameEvent::OutOfBounds { boundary: BodyId(2), .. }));
        assert!(matches!(events[1], GameEvent::OutOfBounds { boundary: BodyId(3), .. }));
        assert!(matches!(events[2], GameEvent::StarHit { .. }));
    }
}
