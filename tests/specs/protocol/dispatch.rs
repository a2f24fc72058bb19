// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A task travels to one worker and its acknowledgment and output come back.

use crate::prelude::*;
use dd_core::{Rank, StoredInfo, Task, WorkerStatus};
use dd_engine::{Assignment, Input, Pending};

const FIXTURE: &[u8] = b"column sums of X";

#[tokio::test]
async fn task_result_handle_is_recorded_and_output_returned() {
    let y = StoredInfo::new("Y", 4, 1);
    let mut cluster = Cluster::start(2, y.clone(), FIXTURE);
    let a = Rank(1);

    let task = Task::new("compute(e)", vec![StoredInfo::new("X", 4, 4)]);
    cluster.session.dispatch(a, &task).await.unwrap();

    let acks = cluster.session.await_acks().await.unwrap();
    assert_eq!(acks.len(), 1);
    assert_eq!((acks[0].rank, &acks[0].handle, &acks[0].pending), (a, &y, &Pending::Task));
    assert_eq!(cluster.session.registry().get(a).unwrap().handles(), &[y.clone()]);
    assert!(cluster.session.registry().get(Rank(2)).unwrap().handles().is_empty());

    assert_eq!(cluster.session.collect_output(a).await.unwrap(), FIXTURE);
    assert_eq!(cluster.worker(a).journal.lock().executed, vec![task]);

    cluster.session.teardown().await.unwrap();
    for worker in cluster.workers {
        let (status, result) = worker.join().await;
        result.unwrap();
        assert_eq!(status, WorkerStatus::Terminated);
    }
}

#[tokio::test]
async fn result_object_can_be_fetched_back() {
    let y = StoredInfo::new("Y", 4, 1);
    let mut cluster = Cluster::start(1, y.clone(), FIXTURE);
    let a = Rank(1);

    cluster.session.dispatch(a, &Task::new("compute(e)", vec![])).await.unwrap();
    cluster.session.await_acks().await.unwrap();
    cluster.session.collect_output(a).await.unwrap();

    assert_eq!(cluster.session.fetch_object(a, b"Y").await.unwrap(), FIXTURE);
    cluster.session.teardown().await.unwrap();
}

#[tokio::test]
async fn compute_places_then_dispatches_on_every_worker() {
    let mut cluster = Cluster::start(3, StoredInfo::new("R", 1, 1), b"r");
    let assignments = [1, 2, 3]
        .map(|r| {
            Assignment::new(
                Rank(r),
                "compute(p)",
                vec![Input::Partition { key: format!("p{r}"), bytes: vec![r as u8; 16] }],
            )
        })
        .to_vec();

    let outcomes = cluster.session.compute(assignments).await.unwrap();
    assert_eq!(outcomes.len(), 3);

    for worker in &cluster.workers {
        let journal = worker.journal.lock();
        assert_eq!(journal.stored, vec![vec![worker.rank.get() as u8; 16]]);
        // The task names the handle this worker assigned to the partition.
        assert_eq!(journal.executed[0].inputs, vec![StoredInfo::new("stored-1", 0, 0)]);
    }
    cluster.session.teardown().await.unwrap();
}
