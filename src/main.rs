use std::process::ExitCode;
use wasm_devserver::{logger, Server, ServerConfig, ServerError};

fn main() -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            logger::log_error(&format!("Failed to start runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(async_main(ServerConfig::default())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn async_main(cfg: ServerConfig) -> Result<(), ServerError> {
    logger::log_server_start(&cfg);

    let server = Server::bind(cfg)?;
    server.run().await;
    Ok(())
}
