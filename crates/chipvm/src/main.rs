use chipvm::{Options, DEMO_PROGRAM};
use clap::Parser;

fn main() {
    env_logger::init();
    let options = Options::parse();

    let rom = match &options.rom_path {
        Some(path) => {
            log::info!("Playing ROM path: '{}'", path);
            match std::fs::read(path) {
                Ok(rom) => rom,
                Err(e) => {
                    eprintln!("Failed to read ROM file '{}': {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            log::info!("No ROM path provided, running the bundled demo");
            DEMO_PROGRAM.to_vec()
        }
    };

    if let Err(e) = chipvm::run(&rom, options) {
        eprintln!("chipvm: {:#}", e);
        std::process::exit(1);
    }
}
