use anyhow::Result;

use actmon::commands::{build_command, execute};

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    if matches.get_flag("version") {
        println!("actmon version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    execute(&matches)
}
