//! Fingerprint a synthesized tone and print the first items.
//!
//! Run with: `cargo run -p fingerprint --example fingerprint_demo`

use std::f64::consts::PI;

use fingerprint::{Algorithm, Fingerprinter};

fn main() {
    let sample_rate = 11025u32;
    let audio: Vec<i16> = (0..sample_rate as usize * 8)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let v = 0.5 * (2.0 * PI * 440.0 * t).sin() + 0.3 * (2.0 * PI * 554.37 * t).sin();
            (v * 12000.0) as i16
        })
        .collect();

    let mut printer = Fingerprinter::new(Algorithm::V2);
    printer.start(sample_rate, 1).expect("supported rate");
    printer.consume(&audio).expect("started");
    printer.finish().expect("started");

    let fp = printer.take_fingerprint();
    println!("algorithm : {:?} (id {})", fp.algorithm, fp.algorithm.id());
    println!("items     : {}", fp.len());
    for (i, item) in fp.items.iter().take(8).enumerate() {
        println!("  [{i}] {item:08X}");
    }
}
