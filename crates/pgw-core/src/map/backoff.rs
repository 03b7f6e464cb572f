use std::time::Duration;

use pgw_model::BackoffStrategy;
use taskvisor::BackoffPolicy;

use super::to_jitter_policy;

/// Retry delay policy for one publish call.
///
/// `policy.next(None)` is the first delay; feeding back the previous delay grows it by `factor` up to `max`.
pub fn to_backoff_policy(s: &BackoffStrategy) -> BackoffPolicy {
    BackoffPolicy {
        first: Duration::from_millis(s.first_ms),
        max: Duration::from_millis(s.max_ms),
        factor: s.factor,
        jitter: to_jitter_policy(s.jitter),
    }
}

#[cfg(test)]
mod tests {
    use pgw_model::JitterStrategy;

    use super::*;

    fn strategy(jitter: JitterStrategy) -> BackoffStrategy {
        BackoffStrategy {
            jitter,
            first_ms: 500,
            max_ms: 4_000,
            factor: 2.0,
        }
    }

    fn delays(policy: &BackoffPolicy, n: usize) -> Vec<Duration> {
        let mut prev = None;
        (0..n)
            .map(|_| {
                let d = policy.next(prev);
                prev = Some(d);
                d
            })
            .collect()
    }

    #[test]
    fn grows_exponentially_and_caps() {
        let policy = to_backoff_policy(&strategy(JitterStrategy::None));
        let ms: Vec<u128> = delays(&policy, 6).iter().map(Duration::as_millis).collect();
        assert_eq!(ms, vec![500, 1_000, 2_000, 4_000, 4_000, 4_000]);
    }

    #[test]
    fn default_strategy_maps_to_pushgateway_defaults() {
        let policy = to_backoff_policy(&BackoffStrategy::default());
        assert_eq!(policy.first, Duration::from_millis(500));
        assert_eq!(policy.max, Duration::from_secs(60));
        assert_eq!(policy.factor, 1.5);
        assert_eq!(policy.jitter, taskvisor::JitterPolicy::Equal);
    }

    #[test]
    fn jittered_delays_stay_within_bounds() {
        for jitter in [JitterStrategy::Full, JitterStrategy::Equal, JitterStrategy::Decorrelated] {
            let policy = to_backoff_policy(&strategy(jitter));
            for d in delays(&policy, 50) {
                assert!(d <= Duration::from_millis(4_000), "{jitter}: {d:?} above max");
            }
        }
    }

    #[test]
    fn each_jitter_maps_to_its_policy() {
        use taskvisor::JitterPolicy;
        assert_eq!(to_jitter_policy(JitterStrategy::None), JitterPolicy::None);
        assert_eq!(to_jitter_policy(JitterStrategy::Full), JitterPolicy::Full);
        assert_eq!(to_jitter_policy(JitterStrategy::Equal), JitterPolicy::Equal);
        assert_eq!(
            to_jitter_policy(JitterStrategy::Decorrelated),
            JitterPolicy::Decorrelated
        );
    }
}
