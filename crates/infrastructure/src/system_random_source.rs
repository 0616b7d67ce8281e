use switchboard_application::RandomSource;
use switchboard_core::{AppError, AppResult};

/// Uniform draws backed by the operating system's random number generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandomSource;

impl SystemRandomSource {
    /// Creates a source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for SystemRandomSource {
    fn next_unit(&self) -> AppResult<f64> {
        let mut bytes = [0_u8; 8];
        getrandom::fill(&mut bytes).map_err(|error| {
            AppError::Internal(format!("os random source unavailable: {error}"))
        })?;

        Ok(unit_from_bytes(bytes))
    }
}

// 53 random mantissa bits give an exact value in [0, 1).
fn unit_from_bytes(bytes: [u8; 8]) -> f64 {
    let bits = u64::from_le_bytes(bytes) >> 11;
    bits as f64 / (1_u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use switchboard_application::RandomSource;

    use super::{SystemRandomSource, unit_from_bytes};

    #[test]
    fn draws_stay_in_unit_interval() {
        let source = SystemRandomSource::new();
        let draws: Vec<f64> = (0..1000)
            .map(|_| source.next_unit().unwrap_or_else(|_| unreachable!()))
            .collect();

        assert!(draws.iter().all(|draw| (0.0..1.0).contains(draw)));
        assert!(draws.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn extreme_bytes_map_inside_unit_interval() {
        assert_eq!(unit_from_bytes([0; 8]), 0.0);
        assert!(unit_from_bytes([0xFF; 8]) < 1.0);
    }
}
