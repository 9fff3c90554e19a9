#[tokio::main]
async fn main() -> anyhow::Result<()> {
    crew_voucher_form::run().await
}
