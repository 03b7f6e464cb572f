use pgw_model::JitterStrategy;
use taskvisor::JitterPolicy;

pub fn to_jitter_policy(s: JitterStrategy) -> JitterPolicy {
    match s {
        JitterStrategy::None => JitterPolicy::None,
        JitterStrategy::Full => JitterPolicy::Full,
        JitterStrategy::Equal => JitterPolicy::Equal,
        JitterStrategy::Decorrelated => JitterPolicy::Decorrelated,
    }
}
