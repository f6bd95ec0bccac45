use laraship_build::{ContainerEngine, HTTP_PORT};

/// Build and start the app, then follow its logs until Ctrl-C or exit.
pub async fn serve(opts: &super::Options, detach: bool) -> anyhow::Result<()> {
    let assembler = super::pipeline::assembler(opts)?;
    let service = assembler.serve().await?;

    if detach {
        println!("{}", service.id);
        return Ok(());
    }

    println!("Serving on http://localhost:{HTTP_PORT} (container {})", service.id);
    println!("Press Ctrl-C to stop.");

    let engine = assembler.engine();
    let outcome = tokio::select! {
        logs = engine.follow_logs(&service.id) => logs.map_err(anyhow::Error::from),
        signal = tokio::signal::ctrl_c() => signal.map_err(anyhow::Error::from),
    };

    engine.stop_service(&service).await?;
    println!("Stopped {}", service.id);

    outcome
}
