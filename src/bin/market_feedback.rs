use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    market_feedback::cli::run_market_feedback(std::env::args().skip(1))
}
