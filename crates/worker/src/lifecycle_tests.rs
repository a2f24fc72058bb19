// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn detached() -> Lifecycle {
    let mut lc = Lifecycle::new();
    lc.detach().unwrap();
    lc
}

#[test]
fn starts_listening() {
    assert_eq!(Lifecycle::new().status(), WorkerStatus::Listening);
}

#[yare::parameterized(
    broadcast      = { MessageKind::Broadcast },
    data_size      = { MessageKind::DataSize },
    data           = { MessageKind::Data },
    task_size      = { MessageKind::TaskSize },
    task           = { MessageKind::Task },
    object_id_size = { MessageKind::ObjectIdSize },
    object_id      = { MessageKind::ObjectId },
    detach         = { MessageKind::Detach },
)]
fn listening_admits_coordinator_kinds(kind: MessageKind) {
    Lifecycle::new().admit(kind).unwrap();
}

#[yare::parameterized(
    data_ack   = { MessageKind::DataAck },
    output     = { MessageKind::Output },
    input_keys = { MessageKind::InputKeys },
    output_key = { MessageKind::OutputKey },
)]
fn worker_to_coordinator_kinds_are_never_admitted(kind: MessageKind) {
    let err = Lifecycle::new().admit(kind).unwrap_err();
    assert!(matches!(err, WorkerError::Protocol { kind: k, .. } if k == kind));
}

#[yare::parameterized(
    task_size = { MessageKind::TaskSize },
    task      = { MessageKind::Task },
    data_size = { MessageKind::DataSize },
    data      = { MessageKind::Data },
    broadcast = { MessageKind::Broadcast },
    object_id = { MessageKind::ObjectIdSize },
)]
fn detached_rejects_work(kind: MessageKind) {
    let err = detached().admit(kind).unwrap_err();
    assert_eq!(err, WorkerError::NotListening { status: WorkerStatus::Detached, kind });
}

#[test]
fn second_detach_is_rejected() {
    let mut lc = detached();
    let err = lc.detach().unwrap_err();
    assert_eq!(
        err,
        WorkerError::NotListening { status: WorkerStatus::Detached, kind: MessageKind::Detach }
    );
    assert_eq!(lc.status(), WorkerStatus::Detached);
}

#[test]
fn terminate_after_detach() {
    let mut lc = detached();
    lc.terminate();
    assert_eq!(lc.status(), WorkerStatus::Terminated);
    let err = lc.admit(MessageKind::Task).unwrap_err();
    assert_eq!(
        err,
        WorkerError::NotListening { status: WorkerStatus::Terminated, kind: MessageKind::Task }
    );
}

#[test]
fn terminate_is_idempotent() {
    let mut lc = Lifecycle::new();
    lc.terminate();
    lc.terminate();
    assert_eq!(lc.status(), WorkerStatus::Terminated);
}
