use super::config::DeviceKind;
use candle_core::Device;
use candle_core::utils::{cuda_is_available, metal_is_available};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Requested accelerator is unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to initialize {kind} device: {source}")]
    Init {
        kind: &'static str,
        #[source]
        source: candle_core::Error,
    },
}

/// Resolves a [`DeviceKind`] to a concrete device.
///
/// `Accelerator` fails when neither CUDA nor Metal support is available in this
/// build or on this machine; `Auto` falls back to the CPU instead.
pub fn select_device(kind: DeviceKind) -> Result<Device, DeviceError> {
    match kind {
        DeviceKind::Cpu => Ok(Device::Cpu),
        DeviceKind::Accelerator => accelerator().unwrap_or_else(|| {
            Err(DeviceError::Unavailable(
                "no CUDA or Metal device detected (build with `--features cuda` or `--features metal`)"
                    .to_string(),
            ))
        }),
        DeviceKind::Auto => match accelerator() {
            Some(Ok(device)) => Ok(device),
            Some(Err(e)) => {
                debug!("Accelerator detected but unusable ({}), falling back to CPU.", e);
                Ok(Device::Cpu)
            }
            None => {
                info!("No accelerator available, running on CPU.");
                Ok(Device::Cpu)
            }
        },
    }
}

fn accelerator() -> Option<Result<Device, DeviceError>> {
    if cuda_is_available() {
        return Some(
            Device::new_cuda(0).map_err(|source| DeviceError::Init {
                kind: "CUDA",
                source,
            }),
        );
    }
    if metal_is_available() {
        return Some(
            Device::new_metal(0).map_err(|source| DeviceError::Init {
                kind: "Metal",
                source,
            }),
        );
    }
    None
}

/// Device name in the form external model runtimes understand.
pub fn device_label(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else if device.is_metal() {
        "mps"
    } else {
        "cpu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_is_always_available() {
        let device = select_device(DeviceKind::Cpu).unwrap();
        assert!(device.is_cpu());
        assert_eq!(device_label(&device), "cpu");
    }

    #[test]
    fn auto_always_yields_a_device() {
        assert!(select_device(DeviceKind::Auto).is_ok());
    }

    #[test]
    fn accelerator_request_matches_availability() {
        let result = select_device(DeviceKind::Accelerator);
        if cuda_is_available() || metal_is_available() {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(DeviceError::Unavailable(_))));
        }
    }
}
