// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! After DETACH a worker takes no more work, on either side of the wire.

use std::sync::Arc;

use crate::prelude::*;
use dd_core::{Rank, StoredInfo, Task, WorkerStatus};
use dd_engine::SessionError;
use dd_worker::{Lifecycle, WorkerError};

#[tokio::test]
async fn coordinator_refuses_work_for_detached_workers() {
    let mut cluster = Cluster::start(2, StoredInfo::new("Y", 4, 1), b"");
    cluster.session.teardown().await.unwrap();

    for rank in [Rank(1), Rank(2)] {
        let record = cluster.session.registry().get(rank).unwrap();
        assert_eq!(record.status, WorkerStatus::Detached);
    }

    let task = Task::new("compute(e)", vec![StoredInfo::new("X", 4, 4)]);
    let err = cluster.session.dispatch(Rank(1), &task).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Protocol { rank: Rank(1), kind: MessageKind::TaskSize, .. }
    ));

    let err = cluster.session.place(Rank(2), "k", b"data").await.unwrap_err();
    assert_eq!(err, SessionError::Aborted);

    for worker in cluster.workers {
        let journal = Arc::clone(&worker.journal);
        let (status, result) = worker.join().await;
        result.unwrap();
        assert_eq!(status, WorkerStatus::Terminated);
        assert!(journal.lock().executed.is_empty());
        assert!(journal.lock().stored.is_empty());
    }
}

#[test]
fn worker_rejects_work_after_detach() {
    let mut lifecycle = Lifecycle::new();
    lifecycle.detach().unwrap();
    let work = [MessageKind::TaskSize, MessageKind::Task, MessageKind::DataSize, MessageKind::Data];
    for kind in work {
        assert_eq!(
            lifecycle.admit(kind),
            Err(WorkerError::NotListening { status: WorkerStatus::Detached, kind })
        );
    }
}
