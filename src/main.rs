#[tokio::main]
async fn main() {
    appointa_backend::run().await;
}
