use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use switchboard_core::AppError;
use switchboard_domain::{DeviceId, JobId, ScheduleRecurrence};

use super::{ScheduleJobInput, ScheduleService};
use crate::device_service::{DeviceService, SaveDeviceInput};
use crate::job_service::{JobService, SaveJobInput};
use crate::persisted_collection::PersistedCollection;
use crate::storage_ports::{KeyValueStore, storage_keys};
use crate::test_support::{MemoryStore, ScriptedRandom};

struct Fixture {
    service: ScheduleService,
    device_service: DeviceService,
    device_id: DeviceId,
    job_id: JobId,
}

async fn fixture() -> Fixture {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::default());
    let device_service = DeviceService::new(
        Arc::new(PersistedCollection::load(store.clone(), storage_keys::DEVICES).await),
        Arc::new(ScriptedRandom::new(vec![0.0])),
    );
    let job_service = JobService::new(Arc::new(
        PersistedCollection::load(store.clone(), storage_keys::JOBS).await,
    ));
    let schedules = PersistedCollection::load(store, storage_keys::SCHEDULED_JOBS).await;

    let device = device_service
        .create_device(SaveDeviceInput {
            name: "dist-1".to_owned(),
            ip_address: "172.16.0.1".to_owned(),
            device_type: "switch".to_owned(),
            location: Some("Rack 4".to_owned()),
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    let job = job_service
        .create_job(SaveJobInput {
            name: "aaa".to_owned(),
            command: "show run | section aaa".to_owned(),
            template: "aaa new-model".to_owned(),
            description: None,
        })
        .await
        .unwrap_or_else(|_| unreachable!());

    Fixture {
        service: ScheduleService::new(
            Arc::new(schedules),
            device_service.clone(),
            job_service,
        ),
        device_service,
        device_id: device.id(),
        job_id: job.id(),
    }
}

fn input(fixture: &Fixture, recurrence: ScheduleRecurrence, offset: TimeDelta) -> ScheduleJobInput {
    ScheduleJobInput {
        compliance_name: format!("{} audit", recurrence.as_str()),
        device_ids: vec![fixture.device_id],
        job_ids: vec![fixture.job_id],
        recurrence,
        next_run_at: Some(Utc::now() + offset),
    }
}

#[tokio::test]
async fn scheduling_unknown_job_is_rejected() {
    let fixture = fixture().await;
    let mut request = input(&fixture, ScheduleRecurrence::Once, TimeDelta::zero());
    request.job_ids = vec![JobId::new()];

    let result = fixture.service.schedule_job(request).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn once_schedule_is_claimed_then_removed() {
    let fixture = fixture().await;
    let schedule = fixture
        .service
        .schedule_job(input(
            &fixture,
            ScheduleRecurrence::Once,
            -TimeDelta::minutes(1),
        ))
        .await
        .unwrap_or_else(|_| unreachable!());

    let claimed = fixture
        .service
        .claim_due_jobs(Utc::now(), 10)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].scheduled_job_id, schedule.id());
    assert_eq!(claimed[0].devices.len(), 1);
    assert_eq!(claimed[0].jobs.len(), 1);
    assert!(fixture.service.list_scheduled_jobs().await.is_empty());
}

#[tokio::test]
async fn recurring_schedule_advances_and_is_not_reclaimed() {
    let fixture = fixture().await;
    assert!(
        fixture
            .service
            .schedule_job(input(
                &fixture,
                ScheduleRecurrence::Hourly,
                -TimeDelta::minutes(5),
            ))
            .await
            .is_ok()
    );

    let now = Utc::now();
    let first = fixture
        .service
        .claim_due_jobs(now, 10)
        .await
        .unwrap_or_else(|_| unreachable!());
    let second = fixture
        .service
        .claim_due_jobs(now, 10)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());

    let remaining = fixture.service.list_scheduled_jobs().await;
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].next_run_at() > now);
    assert_eq!(remaining[0].last_run_at(), Some(now));
}

#[tokio::test]
async fn future_schedules_are_not_claimed() {
    let fixture = fixture().await;
    assert!(
        fixture
            .service
            .schedule_job(input(&fixture, ScheduleRecurrence::Daily, TimeDelta::hours(2)))
            .await
            .is_ok()
    );

    let claimed = fixture
        .service
        .claim_due_jobs(Utc::now(), 10)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(claimed.is_empty());
}

#[tokio::test]
async fn claim_respects_limit_and_due_order() {
    let fixture = fixture().await;
    for minutes in [3, 10, 6] {
        assert!(
            fixture
                .service
                .schedule_job(input(
                    &fixture,
                    ScheduleRecurrence::Once,
                    -TimeDelta::minutes(minutes),
                ))
                .await
                .is_ok()
        );
    }

    let claimed = fixture
        .service
        .claim_due_jobs(Utc::now(), 2)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(claimed.len(), 2);
    assert!(claimed[0].scheduled_for < claimed[1].scheduled_for);
    assert_eq!(fixture.service.list_scheduled_jobs().await.len(), 1);
}

#[tokio::test]
async fn orphaned_schedule_is_dropped() {
    let fixture = fixture().await;
    assert!(
        fixture
            .service
            .schedule_job(input(
                &fixture,
                ScheduleRecurrence::Weekly,
                -TimeDelta::minutes(1),
            ))
            .await
            .is_ok()
    );
    assert!(
        fixture
            .device_service
            .delete_device(fixture.device_id)
            .await
            .is_ok()
    );

    let claimed = fixture
        .service
        .claim_due_jobs(Utc::now(), 10)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(claimed.is_empty());
    assert!(fixture.service.list_scheduled_jobs().await.is_empty());
}

#[tokio::test]
async fn cancel_unknown_schedule_is_not_found() {
    let fixture = fixture().await;
    let result = fixture
        .service
        .cancel_scheduled_job(switchboard_domain::ScheduledJobId::new())
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn claim_resolves_only_devices_that_still_exist() {
    let fixture = fixture().await;
    let spare = fixture
        .device_service
        .create_device(SaveDeviceInput {
            name: "dist-2".to_owned(),
            ip_address: "172.16.0.2".to_owned(),
            device_type: "switch".to_owned(),
            location: None,
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    let mut request = input(&fixture, ScheduleRecurrence::Daily, -TimeDelta::minutes(1));
    request.device_ids.push(spare.id());
    assert!(fixture.service.schedule_job(request).await.is_ok());

    assert!(fixture.device_service.delete_device(spare.id()).await.is_ok());
    let claimed = fixture
        .service
        .claim_due_jobs(Utc::now(), 10)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(claimed.len(), 1);
    let device_ids: Vec<DeviceId> = claimed[0].devices.iter().map(|device| device.id()).collect();
    assert_eq!(device_ids, vec![fixture.device_id]);
}
