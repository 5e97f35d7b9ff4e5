//! Chat client against an in-process gateway.
//!
//! Exercises the full client path: mount, own-room join, send, receive,
//! subscriptions, and unmount cleanup.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crewdesk::adapters::{InMemoryConnectionRegistry, InProcessConnector};
use crewdesk::application::{ChatClient, SessionGateway, TranscriptEntry};
use crewdesk::domain::foundation::UserId;
use crewdesk::domain::messaging::{Participant, RoomName};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    gateway: Arc<SessionGateway>,
}

impl Harness {
    fn new() -> Self {
        Self {
            gateway: Arc::new(SessionGateway::new(Arc::new(
                InMemoryConnectionRegistry::new(),
            ))),
        }
    }

    /// Mounts a client and waits until its own-room join has been processed.
    async fn mount(&self, participant: Participant) -> ChatClient {
        let connector =
            InProcessConnector::new(Arc::clone(&self.gateway)).with_participant(participant.clone());
        let client = ChatClient::mount(&connector, participant).await.unwrap();
        client.sync().await.unwrap();
        client
    }
}

fn owner() -> Participant {
    Participant::owner(UserId::new("1").unwrap(), "Morgan")
}

fn employee(id: &str, name: &str) -> Participant {
    Participant::employee(UserId::new(id).unwrap(), name).unwrap()
}

async fn eventually<F: Fn() -> bool>(cond: F) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn owner_and_employee_exchange_messages() {
    let harness = Harness::new();
    let boss = harness.mount(owner()).await;
    let dana = harness.mount(employee("42", "Dana")).await;

    assert!(boss.send_to_employee("42", "hi").unwrap());
    eventually(|| dana.received().len() == 1).await;
    assert_eq!(dana.received()[0].text, "hi");
    assert_eq!(dana.received()[0].from, "owner");

    assert!(dana.send("on my way").unwrap());
    eventually(|| boss.received().len() == 1).await;
    assert_eq!(boss.received()[0].from, "Dana");

    let transcript = boss.transcript();
    assert_eq!(transcript.len(), 2);
    assert!(matches!(
        &transcript[0],
        TranscriptEntry::Outgoing { to, .. } if to.as_str() == "employee:42"
    ));
    assert!(transcript[1].is_incoming());
}

#[tokio::test]
async fn other_employee_transcript_stays_empty() {
    let harness = Harness::new();
    let boss = harness.mount(owner()).await;
    let first = harness.mount(employee("1", "Ari")).await;
    let second = harness.mount(employee("2", "Bo")).await;

    boss.send_to_employee("1", "just for you").unwrap();
    eventually(|| first.received().len() == 1).await;
    second.sync().await.unwrap();

    assert!(second.transcript().is_empty());
}

#[tokio::test]
async fn connection_id_is_learned_from_greeting() {
    let harness = Harness::new();
    let dana = harness.mount(employee("42", "Dana")).await;

    let id = dana.connection_id().expect("greeting processed before pong");

    assert!(harness.gateway.state_of(&id).await.is_some());
    assert_eq!(
        harness.gateway.registry().rooms_of(&id).await,
        vec![dana.own_room().clone()]
    );
}

#[tokio::test]
async fn subscriber_sees_messages_until_unsubscribed() {
    let harness = Harness::new();
    let boss = harness.mount(owner()).await;
    let dana = harness.mount(employee("42", "Dana")).await;
    let seen = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&seen);
    let subscription = dana.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    boss.send_to_employee("42", "one").unwrap();
    eventually(|| seen.load(Ordering::SeqCst) == 1).await;

    subscription.unsubscribe();
    boss.send_to_employee("42", "two").unwrap();
    eventually(|| dana.received().len() == 2).await;

    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unmount_leaves_every_room() {
    let harness = Harness::new();
    let boss = harness.mount(owner()).await;
    let dana = harness.mount(employee("42", "Dana")).await;
    assert_eq!(harness.gateway.open_connections().await, 2);

    dana.unmount().await;
    let gateway = Arc::clone(&harness.gateway);
    tokio::time::timeout(Duration::from_secs(2), async move {
        while gateway.open_connections().await != 1 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    let rooms = harness.gateway.registry().active_rooms().await;
    assert_eq!(rooms, vec![RoomName::owner()]);
    drop(boss);
}

#[tokio::test]
async fn blank_send_leaves_transcript_untouched() {
    let harness = Harness::new();
    let boss = harness.mount(owner()).await;
    let dana = harness.mount(employee("42", "Dana")).await;

    assert!(!boss.send_to_employee("42", " \t ").unwrap());
    dana.sync().await.unwrap();

    assert!(boss.transcript().is_empty());
    assert!(dana.transcript().is_empty());
}
