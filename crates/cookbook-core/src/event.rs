//! Index activity notifications over `tokio::sync::broadcast`

use crate::config::IndexConfig;
use crate::models::EntityClass;
use tokio::sync::broadcast;

/// Events emitted by the index layer
#[derive(Debug, Clone, PartialEq)]
pub enum IndexEvent {
    /// One entity was pushed into the trie and ordered indexes
    EntityIndexed { class: EntityClass, name: String },
    /// A cache dropped its least recently used entry
    CacheEvicted { class: EntityClass, key: String },
    /// Trie and ordered indexes were rebuilt from the catalogue
    Rebuilt { recipes: usize, ingredients: usize },
}

/// Broadcast channel of [`IndexEvent`]s
///
/// Publishing never blocks; slow subscribers lag and skip events instead of
/// holding up index writes.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<IndexEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Sized by [`IndexConfig::event_capacity`]
    pub fn from_config(config: &IndexConfig) -> Self {
        Self::new(config.event_capacity)
    }

    pub fn publish(&self, event: IndexEvent) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IndexEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::from_config(&IndexConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(IndexEvent::EntityIndexed {
            class: EntityClass::Recipe,
            name: "Pasta".to_string(),
        });
        bus.publish(IndexEvent::Rebuilt {
            recipes: 3,
            ingredients: 0,
        });

        let event1 = rx.recv().await.unwrap();
        assert!(matches!(event1, IndexEvent::EntityIndexed { ref name, .. } if name == "Pasta"));

        let event2 = rx.recv().await.unwrap();
        assert_eq!(
            event2,
            IndexEvent::Rebuilt {
                recipes: 3,
                ingredients: 0
            }
        );
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.clone().subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(IndexEvent::CacheEvicted {
            class: EntityClass::Ingredient,
            key: "basil".to_string(),
        });

        assert!(matches!(rx1.recv().await.unwrap(), IndexEvent::CacheEvicted { .. }));
        assert!(matches!(rx2.recv().await.unwrap(), IndexEvent::CacheEvicted { .. }));
    }

    #[tokio::test]
    async fn test_event_bus_capacity_from_config() {
        let config = IndexConfig {
            event_capacity: 2,
            ..IndexConfig::default()
        };
        let bus = EventBus::from_config(&config);
        let mut rx = bus.subscribe();

        for recipes in 0..3 {
            bus.publish(IndexEvent::Rebuilt {
                recipes,
                ingredients: 0,
            });
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
    }

    #[test]
    fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::default();
        bus.publish(IndexEvent::Rebuilt {
            recipes: 0,
            ingredients: 0,
        });
    }
}
