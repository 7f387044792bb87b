//! Logging initialisation.
//!
//! Host applications embedding the provider call [`init`] once at startup;
//! the crate itself only emits `tracing` events.
//!
//! Log level is controlled via the `GALLERY_LOG` environment variable:
//! - `GALLERY_LOG=debug` for verbose output
//! - `GALLERY_LOG=info` for standard output (default)
//! - `GALLERY_LOG=warn` for warnings and errors only

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_env("GALLERY_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}
