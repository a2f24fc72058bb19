// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared data reaches every worker through one collective.

use crate::prelude::*;
use dd_channel::{Call, RecordingChannel};
use dd_core::{Rank, StoredInfo, COORDINATOR};
use dd_engine::Distributor;
use dd_wire::decode_size;

fn payload() -> Vec<u8> {
    (0..1024u32).map(|i| (i % 251) as u8).collect()
}

#[tokio::test]
async fn three_notices_precede_one_collective() {
    let channel = RecordingChannel::new(COORDINATOR, 4);
    let distributor = Distributor::new(channel.clone(), COORDINATOR);
    distributor.send_to_all(&payload()).await.unwrap();

    let calls = channel.calls();
    let notices: Vec<_> = calls[..3]
        .iter()
        .map(|c| match c {
            Call::Send { peer, kind: MessageKind::Broadcast, payload } => {
                (*peer, decode_size(payload).unwrap())
            }
            other => panic!("expected a BROADCAST notice, got {other:?}"),
        })
        .collect();
    assert_eq!(notices, vec![(Rank(1), 1024), (Rank(2), 1024), (Rank(3), 1024)]);
    assert_eq!(calls[3..], [Call::Broadcast { root: COORDINATOR, payload: payload() }]);
}

#[tokio::test]
async fn every_worker_stores_identical_bytes() {
    let mut cluster = Cluster::start(3, StoredInfo::new("unused", 0, 0), b"");
    assert!(cluster.session.share("shared", &payload()).await.unwrap());

    let acks = cluster.session.await_acks().await.unwrap();
    let mut ranks: Vec<_> = acks.iter().map(|a| a.rank).collect();
    ranks.sort();
    assert_eq!(ranks, vec![Rank(1), Rank(2), Rank(3)]);

    for worker in &cluster.workers {
        assert_eq!(worker.journal.lock().stored, vec![payload()]);
        let record = cluster.session.registry().get(worker.rank).unwrap();
        assert!(record.resident("shared").is_some());
    }
    cluster.session.teardown().await.unwrap();
}
