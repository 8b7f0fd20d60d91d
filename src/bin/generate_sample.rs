use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;

const GENRES: [(&str, f64); 6] = [
    ("Action", 0.30),
    ("Comedy", 0.35),
    ("Drama", 0.45),
    ("Horror", 0.10),
    ("Romance", 0.20),
    ("Thriller", 0.25),
];

const ROWS: usize = 200;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, low: i64, high: i64) -> i64 {
        low + (self.next_f64() * (high - low + 1) as f64) as i64
    }
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // Columns: id;year;rating;<genres...>
    let csv_path = out_dir.join("movies.csv");
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;

    let mut header = vec!["id".to_string(), "year".to_string(), "rating".to_string()];
    header.extend(GENRES.iter().map(|(name, _)| name.to_string()));
    writer.write_record(&header)?;

    for row in 0..ROWS {
        let year = rng.range(1950, 2024);
        let rating = (rng.next_f64() * 50.0).round() / 10.0;
        let mut record = vec![format!("movie_{row:04}"), year.to_string(), format!("{rating:.1}")];
        for (_, probability) in GENRES {
            let member = rng.next_f64() < probability;
            record.push(if member { "1" } else { "0" }.to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    let description = json!({
        "name": "Sample Movies",
        "file": "movies.csv",
        "separator": ";",
        "header": 0,
        "sets": [ { "format": "binary", "start": 3, "end": 3 + GENRES.len() - 1 } ],
        "meta": [
            { "type": "id", "index": 0 },
            { "type": "integer", "index": 1 },
            { "name": "Average Rating", "type": "float", "index": 2, "min": 0, "max": 5 }
        ]
    });
    let description_path = out_dir.join("movies.json");
    std::fs::write(&description_path, serde_json::to_string_pretty(&description)?)
        .with_context(|| format!("writing {}", description_path.display()))?;

    let catalog_path = out_dir.join("datasets.json");
    std::fs::write(&catalog_path, serde_json::to_string_pretty(&json!(["movies.json"]))?)
        .with_context(|| format!("writing {}", catalog_path.display()))?;

    println!(
        "Wrote {ROWS} movies with {} genre sets to {}",
        GENRES.len(),
        out_dir.display()
    );
    Ok(())
}
