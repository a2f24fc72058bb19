// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

fn pair() -> (LocalEndpoint, LocalEndpoint) {
    let fabric = LocalFabric::new(2);
    let mut eps = fabric.endpoints().into_iter();
    (eps.next().unwrap(), eps.next().unwrap())
}

#[tokio::test]
async fn probe_reports_sender_kind_and_length() {
    let (a, b) = pair();
    a.send(Rank(1), MessageKind::Data, b"hello").await.unwrap();

    let probe = b.probe(Source::Any, &[MessageKind::Data]).await.unwrap();
    assert_eq!(probe, Probe { source: Rank(0), kind: MessageKind::Data, len: 5 });

    let mut buf = Vec::new();
    b.receive(&probe, &mut buf).await.unwrap();
    assert_eq!(buf, b"hello");
}

#[tokio::test]
async fn same_kind_preserves_send_order() {
    let (a, b) = pair();
    for i in 0u8..5 {
        a.send(Rank(1), MessageKind::Output, &[i]).await.unwrap();
    }
    for i in 0u8..5 {
        let msg = b.probe_and_receive(MessageKind::Output, Source::Rank(Rank(0))).await.unwrap();
        assert_eq!(msg.payload, vec![i]);
    }
}

/// Queue: (1, OUTPUT, 3 bytes), (2, DATA-ACK, 5 bytes), (2, OUTPUT, 1 byte).
fn mailbox() -> Mailbox {
    let mailbox = Mailbox::default();
    for (source, kind, len) in
        [(1, MessageKind::Output, 3), (2, MessageKind::DataAck, 5), (2, MessageKind::Output, 1)]
    {
        mailbox.queue.lock().push_back(Parcel { source: Rank(source), kind, payload: vec![0; len] });
    }
    mailbox
}

#[yare::parameterized(
    any_output       = { Source::Any,           &[MessageKind::Output],  Some((1, MessageKind::Output, 3)) },
    any_ack          = { Source::Any,           &[MessageKind::DataAck], Some((2, MessageKind::DataAck, 5)) },
    output_from_two  = { Source::Rank(Rank(2)), &[MessageKind::Output],  Some((2, MessageKind::Output, 1)) },
    oldest_of_kinds  = { Source::Rank(Rank(2)), &[MessageKind::Output, MessageKind::DataAck], Some((2, MessageKind::DataAck, 5)) },
    ack_from_one     = { Source::Rank(Rank(1)), &[MessageKind::DataAck], None },
    unsent_kind      = { Source::Any,           &[MessageKind::Task],    None },
    no_kinds         = { Source::Any,           &[],                     None },
)]
fn probe_filters_by_source_and_kind(
    source: Source,
    kinds: &[MessageKind],
    expected: Option<(u32, MessageKind, usize)>,
) {
    let expected = expected.map(|(r, kind, len)| Probe { source: Rank(r), kind, len });
    assert_eq!(mailbox().find(source, kinds), expected);
}

#[tokio::test]
async fn receive_takes_the_probed_message_only() {
    let fabric = LocalFabric::new(3);
    let eps = fabric.endpoints();
    eps[1].send(Rank(0), MessageKind::Output, b"one").await.unwrap();
    eps[2].send(Rank(0), MessageKind::Output, b"two").await.unwrap();

    let msg = eps[0].probe_and_receive(MessageKind::Output, Source::Rank(Rank(2))).await.unwrap();
    assert_eq!((msg.source, msg.payload), (Rank(2), b"two".to_vec()));
    let msg = eps[0].probe_and_receive(MessageKind::Output, Source::Any).await.unwrap();
    assert_eq!((msg.source, msg.payload), (Rank(1), b"one".to_vec()));
}

#[tokio::test]
async fn probe_blocks_until_message_arrives() {
    let (a, b) = pair();
    let waiter = tokio::spawn(async move {
        b.probe_and_receive(MessageKind::Task, Source::Rank(Rank(0))).await
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    a.send(Rank(1), MessageKind::Task, b"t").await.unwrap();
    let msg = waiter.await.unwrap().unwrap();
    assert_eq!(msg.payload, b"t");
}

#[tokio::test]
async fn send_to_unknown_peer_fails() {
    let (a, _b) = pair();
    let err = a.send(Rank(7), MessageKind::Data, b"").await.unwrap_err();
    assert_eq!(err, ChannelError::UnknownPeer { peer: Rank(7), world_size: 2 });
}

#[tokio::test]
async fn receive_without_pending_message_fails() {
    let (_a, b) = pair();
    let probe = Probe { source: Rank(0), kind: MessageKind::Data, len: 0 };
    let err = b.receive(&probe, &mut Vec::new()).await.unwrap_err();
    assert_eq!(err, ChannelError::NoPendingMessage { from: Rank(0), kind: MessageKind::Data });
}

#[tokio::test]
async fn close_wakes_blocked_probes() {
    let fabric = LocalFabric::new(2);
    let b = fabric.endpoint(Rank(1)).unwrap();
    let waiter = tokio::spawn(async move { b.probe(Source::Any, &[MessageKind::Detach]).await });
    tokio::time::sleep(Duration::from_millis(10)).await;
    fabric.close();
    assert_eq!(waiter.await.unwrap(), Err(ChannelError::Closed));
}

#[tokio::test]
async fn close_releases_ranks_waiting_on_a_broadcast() {
    let fabric = LocalFabric::new(3);
    let b = fabric.endpoint(Rank(1)).unwrap();
    let waiter = tokio::spawn(async move {
        let mut buf = vec![0u8; 4];
        b.broadcast(Rank(0), &mut buf).await
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!waiter.is_finished());

    fabric.close();
    assert_eq!(waiter.await.unwrap(), Err(ChannelError::Closed));
}

#[test]
fn endpoint_outside_world_is_none() {
    let fabric = LocalFabric::new(2);
    assert!(fabric.endpoint(Rank(2)).is_none());
    assert_eq!(fabric.endpoint(Rank(1)).unwrap().rank(), Rank(1));
}

#[tokio::test]
async fn broadcast_reaches_every_rank() {
    let fabric = LocalFabric::new(4);
    let data: Vec<u8> = (0..=255).collect();

    let mut receivers = Vec::new();
    for ep in fabric.endpoints().into_iter().skip(1) {
        let len = data.len();
        receivers.push(tokio::spawn(async move {
            let mut buf = vec![0u8; len];
            ep.broadcast(Rank(0), &mut buf).await?;
            Ok::<_, ChannelError>(buf)
        }));
    }

    let root = fabric.endpoint(Rank(0)).unwrap();
    let mut buf = data.clone();
    root.broadcast(Rank(0), &mut buf).await.unwrap();

    for r in receivers {
        assert_eq!(r.await.unwrap().unwrap(), data);
    }
}

#[tokio::test]
async fn broadcast_length_mismatch_is_reported() {
    let fabric = LocalFabric::new(2);
    let b = fabric.endpoint(Rank(1)).unwrap();
    let receiver = tokio::spawn(async move {
        let mut buf = vec![0u8; 3];
        b.broadcast(Rank(0), &mut buf).await
    });

    let mut buf = vec![1u8; 8];
    fabric.endpoint(Rank(0)).unwrap().broadcast(Rank(0), &mut buf).await.unwrap();

    assert_eq!(
        receiver.await.unwrap(),
        Err(ChannelError::BroadcastLength { root: Rank(0), expected: 3, actual: 8 })
    );
}

#[tokio::test]
async fn consecutive_broadcasts_do_not_mix() {
    let fabric = LocalFabric::new(2);
    let b = fabric.endpoint(Rank(1)).unwrap();
    let receiver = tokio::spawn(async move {
        let mut first = vec![0u8; 1];
        b.broadcast(Rank(0), &mut first).await?;
        let mut second = vec![0u8; 1];
        b.broadcast(Rank(0), &mut second).await?;
        Ok::<_, ChannelError>((first, second))
    });

    let root = fabric.endpoint(Rank(0)).unwrap();
    root.broadcast(Rank(0), &mut vec![1]).await.unwrap();
    root.broadcast(Rank(0), &mut vec![2]).await.unwrap();

    assert_eq!(receiver.await.unwrap().unwrap(), (vec![1], vec![2]));
}
