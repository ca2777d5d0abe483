mod app;
mod config;
mod ui;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let mut app = app::App::new().await?;
    app.run().await
}

/// 终端被 UI 占用，日志写到缓存目录下的文件
fn init_tracing() -> Result<()> {
    let path = config::paths::log_file()?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sponsorboard=info".parse()?)
                .add_directive("sponsorboard_core=info".parse()?),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
