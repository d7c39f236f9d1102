/// Environment lookup, injectable so config resolution can be tested without
/// touching the process environment.
pub(super) type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub(super) fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[must_use]
pub(super) fn read_non_empty_env(env: EnvLookup<'_>, name: &str) -> Option<String> {
    env(name)
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parsed value at or above `min_value`; anything else reads as unset.
#[must_use]
pub(super) fn read_env_u64_min(env: EnvLookup<'_>, name: &str, min_value: u64) -> Option<u64> {
    env(name)
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|value| *value >= min_value)
}

#[must_use]
pub(super) fn read_env_usize_min(
    env: EnvLookup<'_>,
    name: &str,
    min_value: usize,
) -> Option<usize> {
    env(name)
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value >= min_value)
}
