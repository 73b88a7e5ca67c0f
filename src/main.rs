#[tokio::main]
async fn main() {
    if let Err(e) = agency_booking::run().await {
        eprintln!("agency-booking failed to start: {}", e);
        std::process::exit(1);
    }
}
