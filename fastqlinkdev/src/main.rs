mod application;
mod presentation;

use fastqlink_core::error::Result;

fn main() -> Result<()> {
    // a missing .env is fine; flags and the environment still apply
    let _ = dotenvy::dotenv();
    application::run()
}
