//! Raspberry Pi header demo.
//!
//! Walks through each driver on real hardware:
//! - Flashes and fades an LED on physical pin 12
//! - Plays a short tune on a passive buzzer on physical pin 32
//! - Reads a DHT11 on physical pin 7
//! - Counts button presses on physical pin 11 for five seconds
//!
//! # Hardware Setup
//!
//! LED with resistor from pin 12 to ground, passive buzzer from pin 32 to
//! ground, DHT11 data on pin 7, push button from pin 11 to 3V3.
//!
//! # Build
//!
//! ```bash
//! cargo run --release --features rpi --bin pi_demo
//!
//! # With a JSON config (needs the json feature)
//! PI_HEADER_CONFIG=board.json cargo run --release --features rpi,json --bin pi_demo
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pi_header::config::EdgeConfig;
use pi_header::drivers::{Dht11, Frame, Note};
use pi_header::hal::{wait_ms, RpiDht11, RpiGpio, StdDelay};
use pi_header::pins::{to_channel, PhysicalPin};
use pi_header::{Board, Config, Edge, Pull};

const LED_PIN: PhysicalPin = PhysicalPin(12);
const BUZZER_PIN: PhysicalPin = PhysicalPin(32);
const DHT_PIN: PhysicalPin = PhysicalPin(7);
const BUTTON_PIN: PhysicalPin = PhysicalPin(11);

/// How long to count button presses
const WATCH_MS: u32 = 5000;

fn load_config() -> anyhow::Result<Config> {
    #[cfg(feature = "json")]
    if let Ok(path) = std::env::var("PI_HEADER_CONFIG") {
        let json = std::fs::read_to_string(&path)?;
        return Config::from_json(&json);
    }
    // Button wired to 3V3
    Ok(Config::default().with_edge(EdgeConfig::default().with_pull(Pull::Down)))
}

fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let gpio = RpiGpio::new()?;
    let board = Board::new(gpio.clone(), StdDelay, config)?;

    // =========================================================================
    // LED
    // =========================================================================
    {
        let mut pin = board.open_physical(LED_PIN)?;
        let mut led = board.led(&mut pin)?;
        println!("LED: flash x3");
        led.flash(200, 3)?;

        println!("LED: fade in");
        led.animate(50, |t| {
            if t <= 1000 {
                Frame::Continue(t as f64 / 1000.0)
            } else {
                Frame::Stop
            }
        })?;
        led.off()?;
    }

    // =========================================================================
    // Buzzer
    // =========================================================================
    {
        let mut pin = board.open_physical(BUZZER_PIN)?;
        let mut buzzer = board.passive_buzzer(&mut pin)?;
        println!("Buzzer: scale");
        buzzer.play_sequence(&[
            Note::new(262.0, 0.5, 200),
            Note::new(294.0, 0.5, 200),
            Note::new(330.0, 0.5, 200),
            Note::rest(100),
            Note::new(392.0, 0.5, 400),
        ])?;
    }

    // =========================================================================
    // DHT11
    // =========================================================================
    {
        let sensor = RpiDht11::open(&gpio, to_channel(DHT_PIN)?)?;
        let mut dht = Dht11::new(sensor);
        let climate = dht.read();
        match (climate.temperature_c, climate.humidity_pct) {
            (Some(t), Some(h)) => println!("DHT11: {t:.0} C, {h:.0} %"),
            _ => println!("DHT11: no reading"),
        }
    }

    // =========================================================================
    // Button
    // =========================================================================
    {
        let mut pin = board.open_physical(BUTTON_PIN)?;
        let presses = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&presses);
        pin.register_edge_callback(
            Edge::Rising,
            Box::new(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        );
        board.watch_edges(&mut pin)?;
        println!("Button: press it a few times ({} s)", WATCH_MS / 1000);
        wait_ms(WATCH_MS);
        pin.stop_edge_watch()?;
        println!("Button: {} presses", presses.load(Ordering::Relaxed));
    }

    board.cleanup();
    Ok(())
}
