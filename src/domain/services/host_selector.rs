//! Host Selector Service
//!
//! Pure domain logic for choosing the replica with the lowest mean latency.
//! This service has NO external dependencies - probing happens elsewhere.

use crate::domain::entities::{HostLatency, SelectedHost};
use crate::domain::errors::ConfigError;

/// Replica selection by mean probe latency.
///
/// Hosts with zero successful attempts are never chosen. Among the rest the
/// lowest mean wins; on a tie the host listed first wins.
pub struct HostSelector;

impl HostSelector {
    /// Pick the best host from aggregated probe results.
    ///
    /// `stats` must be in configuration order for the tie-break to hold.
    ///
    /// # Errors
    /// [`ConfigError::NoReachableHost`] if no host had a successful attempt.
    pub fn pick_host(stats: &[HostLatency]) -> Result<SelectedHost, ConfigError> {
        let mut best: Option<&HostLatency> = None;

        for candidate in stats.iter().filter(|s| s.is_reachable()) {
            match best {
                Some(current) if candidate.mean < current.mean => best = Some(candidate),
                None => best = Some(candidate),
                _ => {}
            }
        }

        match best {
            Some(HostLatency {
                host,
                mean: Some(mean),
                ..
            }) => Ok(SelectedHost::new(host.clone(), *mean)),
            _ => Err(ConfigError::NoReachableHost {
                candidates: stats.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::HostCandidate;
    use std::time::Duration;

    fn stats(name: &str, mean_ms: Option<u64>) -> HostLatency {
        HostLatency {
            host: HostCandidate::new(name, 5432),
            attempts: 5,
            successes: if mean_ms.is_some() { 5 } else { 0 },
            mean: mean_ms.map(Duration::from_millis),
        }
    }

    #[test]
    fn test_pick_lowest_mean() {
        let selected =
            HostSelector::pick_host(&[stats("h1", Some(10)), stats("h2", Some(50))]).unwrap();
        assert_eq!(selected.host().address, "h1");
        assert_eq!(selected.mean_latency(), Duration::from_millis(10));
    }

    #[test]
    fn test_pick_lowest_mean_not_first() {
        let selected = HostSelector::pick_host(&[
            stats("eu", Some(80)),
            stats("us", Some(12)),
            stats("ap", Some(200)),
        ])
        .unwrap();
        assert_eq!(selected.host().address, "us");
    }

    #[test]
    fn test_pick_skips_unreachable() {
        let selected =
            HostSelector::pick_host(&[stats("down", None), stats("slow", Some(400))]).unwrap();
        assert_eq!(selected.host().address, "slow");
    }

    #[test]
    fn test_tie_prefers_input_order() {
        let selected = HostSelector::pick_host(&[
            stats("first", Some(20)),
            stats("second", Some(20)),
        ])
        .unwrap();
        assert_eq!(selected.host().address, "first");
    }

    #[test]
    fn test_no_reachable_host() {
        let result = HostSelector::pick_host(&[stats("h1", None), stats("h2", None)]);
        assert_eq!(result, Err(ConfigError::NoReachableHost { candidates: 2 }));
    }

    #[test]
    fn test_empty_input() {
        let result = HostSelector::pick_host(&[]);
        assert_eq!(result, Err(ConfigError::NoReachableHost { candidates: 0 }));
    }
}
