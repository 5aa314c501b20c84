//! Headless notification host.
//!
//! Reads JSON commands from stdin and writes notification events to stdout.
//! Logs go to stderr.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    notify_host_lib::run().await
}
