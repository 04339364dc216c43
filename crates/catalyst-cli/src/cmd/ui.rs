use anyhow::Context;
use catalyst_core::config::Config;
use catalyst_core::cycle::Cycle;
use catalyst_core::repository::MemoryRepository;
use catalyst_core::store::CycleStore;
use catalyst_server::AppState;
use std::path::Path;
use std::sync::Arc;

pub fn run(root: &Path, port: u16, open_browser: bool, ephemeral: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    for w in config.validate() {
        tracing::warn!(level = ?w.level, "{}", w.message);
    }

    let rt = tokio::runtime::Runtime::new()?;
    let root_buf = root.to_path_buf();

    rt.block_on(async move {
        let state = if ephemeral {
            ephemeral_state(root_buf, config)?
        } else {
            catalyst_server::load_state(root_buf, config).await?
        };

        let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;
        let actual_port = listener.local_addr()?.port();
        println!("Catalyst API → http://localhost:{actual_port}/api/summary  (PID {})", std::process::id());

        let result = tokio::select! {
            res = catalyst_server::serve_on(state.clone(), listener, open_browser) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        };

        // Write the last edits before the process exits.
        state.flush().await;
        tracing::info!("server stopped");
        result
    })
}

fn ephemeral_state(root: std::path::PathBuf, config: Config) -> anyhow::Result<AppState> {
    tracing::info!("ephemeral mode: nothing will be written");
    let coach = catalyst_coach::from_config(&config.coach)?;
    Ok(AppState::new(
        root,
        config,
        CycleStore::new(Some(Cycle::new())),
        Arc::new(MemoryRepository::new()),
        coach,
    ))
}
