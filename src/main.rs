//! Reel Rush entry point
//!
//! Runs one spin headless at 60 fps and logs the settled grid.
//! Usage: `reel-rush [settings.json] [reference|staggered|turbo]`

use std::path::PathBuf;
use std::rc::Rc;

use reel_rush::consts::FRAME_MS;
use reel_rush::settings::TimingPreset;
use reel_rush::{Session, Settings, SoundBank};

/// Give up after this much simulated time
const MAX_SPIN_MS: f32 = 30_000.0;

fn main() {
    env_logger::init();
    log::info!("Reel Rush (native) starting...");

    let mut args = std::env::args().skip(1);
    let path = args.next().map(PathBuf::from);
    let mut settings = Settings::load(path.as_deref());

    if let Some(name) = args.next() {
        match TimingPreset::from_str(&name) {
            Some(preset) => settings.apply_preset(preset),
            None => log::warn!(
                "Unknown timing preset '{name}', keeping {}",
                settings.timing_preset.as_str()
            ),
        }
    }

    let sound = Rc::new(SoundBank::new(&settings.audio));
    let mut session = Session::new(&settings, sound.clone());

    if !session.request_spin() {
        log::error!("Machine refused to spin");
        sound.dispose();
        return;
    }

    let mut elapsed = 0.0;
    while session.is_busy() && elapsed < MAX_SPIN_MS {
        session.tick(FRAME_MS);
        elapsed += FRAME_MS;
    }

    if session.is_busy() {
        log::warn!("Spin still running after {MAX_SPIN_MS:.0} ms");
    } else {
        log::info!("Spin settled after {elapsed:.0} ms");
    }

    let alphabet = &settings.machine.symbols;
    for (i, row) in session.machine().symbol_grid().iter().enumerate() {
        let names: Vec<&str> = row
            .iter()
            .map(|id| alphabet.name(*id).unwrap_or("?"))
            .collect();
        println!("reel {}: {}", i + 1, names.join(" "));
    }

    sound.dispose();
}
