use anyhow::Result;

/// Trait for building configuration structs
///
/// Implementors read from environment variables, files, or other sources
/// and construct the configuration once at process start. The result is
/// passed down explicitly, never read from a global.
pub trait ConfigBuilder: Clone + Send + Sync + 'static {
    /// Build the configuration instance
    fn build() -> Result<Self>;
}
