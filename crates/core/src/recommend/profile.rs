use std::collections::HashMap;

use crate::domain::interaction::{InteractionEvent, UserId};
use crate::domain::item::ItemId;

/// Sparse per-user interaction weight for one item.
pub type ItemVector = HashMap<UserId, f64>;

/// Item vectors keyed by item; items without events are absent.
pub type ItemVectors = HashMap<ItemId, ItemVector>;

/// Aggregate raw interaction events into per-item user-weight vectors.
///
/// Repeated events for the same (item, user) pair are summed.
pub fn build_item_vectors<'a, I>(events: I) -> ItemVectors
where
    I: IntoIterator<Item = &'a InteractionEvent>,
{
    let mut vectors = ItemVectors::new();

    for event in events {
        *vectors.entry(event.item_id).or_default().entry(event.user_id).or_insert(0.0) +=
            f64::from(event.action_score);
    }

    vectors
}

#[cfg(test)]
mod tests {
    use super::build_item_vectors;
    use crate::domain::interaction::{InteractionEvent, UserId};
    use crate::domain::item::ItemId;

    #[test]
    fn repeated_events_for_same_pair_are_summed() {
        let events = vec![
            InteractionEvent::new(1, 10, 3),
            InteractionEvent::new(1, 10, 5),
            InteractionEvent::new(2, 10, 1),
        ];

        let vectors = build_item_vectors(&events);
        let item = &vectors[&ItemId(10)];

        assert_eq!(item[&UserId(1)], 8.0);
        assert_eq!(item[&UserId(2)], 1.0);
    }

    #[test]
    fn items_without_events_are_absent() {
        let events = vec![InteractionEvent::new(1, 10, 3)];
        let vectors = build_item_vectors(&events);

        assert_eq!(vectors.len(), 1);
        assert!(!vectors.contains_key(&ItemId(11)));
    }

    #[test]
    fn empty_event_set_builds_empty_map() {
        assert!(build_item_vectors(&Vec::<InteractionEvent>::new()).is_empty());
    }

    #[test]
    fn build_is_a_pure_function_of_events() {
        let events = vec![
            InteractionEvent::new(1, 10, 3),
            InteractionEvent::new(2, 11, 0),
            InteractionEvent::new(3, 10, 2),
        ];

        assert_eq!(build_item_vectors(&events), build_item_vectors(&events));
    }
}
