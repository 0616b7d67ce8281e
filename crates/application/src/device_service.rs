use std::sync::Arc;

use chrono::Utc;
use switchboard_core::{AppError, AppResult};
use switchboard_domain::{Device, DeviceId, Reachability, simulate_reachability};
use tracing::info;

use crate::persisted_collection::PersistedCollection;
use crate::simulation_ports::RandomSource;

/// Input payload for device create/update operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDeviceInput {
    /// Display name, unique case-insensitively.
    pub name: String,
    /// IPv4 or IPv6 management address.
    pub ip_address: String,
    /// Free-text device type.
    pub device_type: String,
    /// Optional location label.
    pub location: Option<String>,
}

/// Application service for the managed device inventory.
#[derive(Clone)]
pub struct DeviceService {
    devices: Arc<PersistedCollection<Device>>,
    random_source: Arc<dyn RandomSource>,
}

impl DeviceService {
    /// Creates a service over a persisted device collection.
    #[must_use]
    pub fn new(
        devices: Arc<PersistedCollection<Device>>,
        random_source: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            devices,
            random_source,
        }
    }

    /// Lists devices in registration order.
    pub async fn list_devices(&self) -> Vec<Device> {
        self.devices.snapshot().await
    }

    /// Returns one device.
    pub async fn get_device(&self, device_id: DeviceId) -> AppResult<Device> {
        self.devices
            .snapshot()
            .await
            .into_iter()
            .find(|device| device.id() == device_id)
            .ok_or_else(|| device_not_found(device_id))
    }

    /// Resolves every requested id, in request order.
    pub async fn find_devices(&self, device_ids: &[DeviceId]) -> AppResult<Vec<Device>> {
        let devices = self.devices.snapshot().await;
        device_ids
            .iter()
            .map(|device_id| {
                devices
                    .iter()
                    .find(|device| device.id() == *device_id)
                    .cloned()
                    .ok_or_else(|| device_not_found(*device_id))
            })
            .collect()
    }

    /// Registers a new device.
    pub async fn create_device(&self, input: SaveDeviceInput) -> AppResult<Device> {
        let device = Device::new(
            DeviceId::new(),
            input.name,
            input.ip_address.as_str(),
            input.device_type,
            input.location,
            Utc::now(),
        )?;

        let created = device.clone();
        self.devices
            .mutate(move |devices| {
                ensure_unique_name(devices, &device, None)?;
                devices.push(device);
                Ok(())
            })
            .await?;

        info!(
            device_id = %created.id(),
            name = %created.name(),
            "device registered"
        );
        Ok(created)
    }

    /// Replaces the editable attributes of a device.
    pub async fn update_device(
        &self,
        device_id: DeviceId,
        input: SaveDeviceInput,
    ) -> AppResult<Device> {
        self.devices
            .mutate(move |devices| {
                let position = devices
                    .iter()
                    .position(|device| device.id() == device_id)
                    .ok_or_else(|| device_not_found(device_id))?;

                let revised = devices[position].revise(
                    input.name,
                    input.ip_address.as_str(),
                    input.device_type,
                    input.location,
                )?;
                ensure_unique_name(devices, &revised, Some(device_id))?;
                devices[position] = revised.clone();
                Ok(revised)
            })
            .await
    }

    /// Removes a device.
    pub async fn delete_device(&self, device_id: DeviceId) -> AppResult<()> {
        self.devices
            .mutate(move |devices| {
                let before = devices.len();
                devices.retain(|device| device.id() != device_id);
                if devices.len() == before {
                    return Err(device_not_found(device_id));
                }
                Ok(())
            })
            .await?;

        info!(device_id = %device_id, "device removed");
        Ok(())
    }

    /// Runs a simulated reachability probe against one device.
    pub async fn check_reachability(&self, device_id: DeviceId) -> AppResult<Device> {
        let random_source = self.random_source.clone();
        let checked_at = Utc::now();
        self.devices
            .mutate(move |devices| {
                let device = devices
                    .iter_mut()
                    .find(|device| device.id() == device_id)
                    .ok_or_else(|| device_not_found(device_id))?;

                let reachable = simulate_reachability(|| random_source.next_unit())?;
                *device = device.with_probe_result(reachable, checked_at);
                Ok(device.clone())
            })
            .await
    }

    /// Runs a simulated reachability probe against every device.
    pub async fn check_all_reachability(&self) -> AppResult<Vec<Device>> {
        let random_source = self.random_source.clone();
        let checked_at = Utc::now();
        let devices = self
            .devices
            .mutate(move |devices| {
                for device in devices.iter_mut() {
                    let reachable = simulate_reachability(|| random_source.next_unit())?;
                    *device = device.with_probe_result(reachable, checked_at);
                }
                Ok(devices.clone())
            })
            .await?;

        let reachable = devices
            .iter()
            .filter(|device| device.reachability() == Reachability::Reachable)
            .count();
        info!(
            probed = devices.len(),
            reachable, "device reachability sweep finished"
        );
        Ok(devices)
    }
}

fn ensure_unique_name(
    devices: &[Device],
    candidate: &Device,
    excluded: Option<DeviceId>,
) -> AppResult<()> {
    let clash = devices.iter().any(|device| {
        Some(device.id()) != excluded
            && device
                .name()
                .as_str()
                .eq_ignore_ascii_case(candidate.name().as_str())
    });

    if clash {
        return Err(AppError::Conflict(format!(
            "device '{}' already exists",
            candidate.name()
        )));
    }

    Ok(())
}

fn device_not_found(device_id: DeviceId) -> AppError {
    AppError::NotFound(format!("device '{device_id}' does not exist"))
}
