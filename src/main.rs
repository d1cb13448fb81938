#[tokio::main]
async fn main() {
    escapade_backend::run().await;
}
