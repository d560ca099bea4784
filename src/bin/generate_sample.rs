use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Serialize)]
struct SampleVideo {
    id: String,
    name: String,
}

/// `HHMMSS.mmm-AM|PM-DD-Mon-YYYY`, 12-hour clock.
fn random_timestamp(rng: &mut StdRng) -> String {
    let hour = rng.gen_range(1..=12);
    let minute = rng.gen_range(0..60);
    let second = rng.gen_range(0..60);
    let millis = rng.gen_range(0..1000);
    let meridiem = if rng.gen_bool(0.5) { "AM" } else { "PM" };
    let day = rng.gen_range(1..=28);
    let month = MONTHS[rng.gen_range(0..MONTHS.len())];
    format!("{hour:02}{minute:02}{second:02}.{millis:03}-{meridiem}-{day:02}-{month}-2025")
}

fn main() {
    let mut rng = StdRng::seed_from_u64(42);

    let vis = [5.0, 10.0, 15.0];
    let minsep = [1.0, 1.5, 2.0];
    let maxalignturn = [2.0, 5.0];
    let maxcohereturn = [1.5, 3.0];
    let maxsepturn = [1.0, 3.0, 5.0];
    let pop = [100.0, 200.0];

    let mut videos = Vec::new();
    for &v in &vis {
        for &s in &maxsepturn {
            // A few runs per grouping combination, other parameters random.
            let runs = rng.gen_range(1..=3);
            for _ in 0..runs {
                let stamp = random_timestamp(&mut rng);
                let id = format!(
                    "../public/swarm-videos//{stamp}_vis={v}_minsep={}_maxalignturn={}_maxcohereturn={}_maxsepturn={s}_pop={}.mp4",
                    minsep.choose(&mut rng).copied().unwrap_or(1.0),
                    maxalignturn.choose(&mut rng).copied().unwrap_or(2.0),
                    maxcohereturn.choose(&mut rng).copied().unwrap_or(1.5),
                    pop.choose(&mut rng).copied().unwrap_or(100.0),
                );
                videos.push(SampleVideo {
                    id,
                    name: format!("VID{:04}.mp4", videos.len() + 1),
                });
            }
        }
    }

    // One video without a grouping parameter, dropped at load time.
    videos.push(SampleVideo {
        id: format!(
            "../public/swarm-videos//{}_vis=10_minsep=1.mp4",
            random_timestamp(&mut rng)
        ),
        name: format!("VID{:04}.mp4", videos.len() + 1),
    });

    let output_path = "json-videos.json";
    let json = serde_json::to_string_pretty(&videos).expect("Failed to serialize videos");
    std::fs::write(output_path, json).expect("Failed to write output file");

    println!("Wrote {} videos to {output_path}", videos.len());
}
