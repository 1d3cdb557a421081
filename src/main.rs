#[tokio::main]
async fn main() {
    ngo_backend::start_server().await;
}
