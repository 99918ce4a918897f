/// Centralized error mapping for commands.
///
/// Uses the alternate format so `anyhow` chains keep their causes.
pub fn map_err<E: std::fmt::Display>(err: E) -> String {
    format!("{err:#}")
}
