#[tokio::main]
async fn main() {
    let code = match airport_view::run_with_config().await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "view client failed");
            1
        }
    };
    // A pending stdin read parks a blocking thread the runtime would wait on.
    std::process::exit(code);
}
