//! `tenantctl` binary entrypoint.

#[tokio::main]
async fn main() {
    let code = tenantctl_cli::run().await;
    std::process::exit(code);
}
