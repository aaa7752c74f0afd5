//! Synthetic message corpus for demos and load tests.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use crate::error::{GraphError, Result};
use crate::record::Record;

const PREFIXES: &[&str] = &[
    "dark", "shadow", "light", "blue", "red", "green", "gold", "silver", "phantom", "ninja",
    "stealth", "epic", "legend", "super", "mega",
];
const SUFFIXES: &[&str] = &[
    "warrior", "hunter", "mage", "slayer", "knight", "rogue", "wizard", "assassin", "lord",
    "king", "queen", "master", "pro", "noob", "gamer",
];
const HASHTAGS: &[&str] = &[
    "rust", "spark", "graphs", "bigdata", "opensource", "gaming", "music", "news", "ai",
    "weekend",
];
const WORDS: &[&str] = &[
    "hello", "great", "match", "tonight", "check", "this", "out", "thanks", "agree", "loving",
    "the", "new", "update", "who", "is", "in",
];

pub struct UsernameGenerator {
    seed: u64,
}

impl UsernameGenerator {
    pub fn new(seed: u64) -> Self {
        UsernameGenerator { seed }
    }

    /// Up to `count` distinct usernames; fewer if the name space runs dry.
    pub fn generate_unique_batch(&self, count: usize) -> Vec<String> {
        let candidates: Vec<String> = (0..count * 2)
            .into_par_iter()
            .map(|i| {
                let stream = (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                let mut rng = StdRng::seed_from_u64(self.seed ^ stream);
                let prefix = PREFIXES[rng.gen_range(0..PREFIXES.len())];
                let suffix = SUFFIXES[rng.gen_range(0..SUFFIXES.len())];
                let num = rng.gen_range(1..999);
                format!("{prefix}{suffix}{num}")
            })
            .collect();

        let mut used = HashSet::with_capacity(count);
        candidates
            .into_iter()
            .filter(|name| used.insert(name.clone()))
            .take(count)
            .collect()
    }
}

/// Builds `num_messages` records from `num_users` authors. Each message has
/// zero to three mentions and zero to two hashtags. Deterministic in `seed`.
pub fn generate_messages(num_users: usize, num_messages: usize, seed: u64) -> Vec<Record> {
    let users = UsernameGenerator::new(seed).generate_unique_batch(num_users);
    if users.is_empty() {
        return Vec::new();
    }

    (0..num_messages)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            let author = users[rng.gen_range(0..users.len())].clone();

            let word_count = rng.gen_range(2..6);
            let mut tokens: Vec<String> = WORDS
                .choose_multiple(&mut rng, word_count)
                .map(|w| w.to_string())
                .collect();
            for _ in 0..rng.gen_range(0..=3) {
                tokens.push(format!("@{}", users[rng.gen_range(0..users.len())]));
            }
            for _ in 0..rng.gen_range(0..=2) {
                tokens.push(format!("#{}", HASHTAGS[rng.gen_range(0..HASHTAGS.len())]));
            }
            tokens.shuffle(&mut rng);

            Record {
                author,
                text: Some(tokens.join(" ")),
                timestamp: Some(format!(
                    "2024-{:02}-{:02}T{:02}:{:02}:00Z",
                    rng.gen_range(1..=12),
                    rng.gen_range(1..=28),
                    rng.gen_range(0..24),
                    rng.gen_range(0..60)
                )),
            }
        })
        .collect()
}

pub fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["author", "text", "timestamp"])?;
    for r in records {
        wtr.write_record([
            r.author.as_str(),
            r.text.as_deref().unwrap_or_default(),
            r.timestamp.as_deref().unwrap_or_default(),
        ])?;
    }
    wtr.flush().map_err(|e| GraphError::io(e, "<csv writer>"))
}

pub fn generate_message_csv(
    num_users: usize,
    num_messages: usize,
    seed: u64,
    path: &Path,
) -> Result<()> {
    let records = generate_messages(num_users, num_messages, seed);
    let file = File::create(path).map_err(|e| GraphError::io(e, path))?;
    write_records(BufWriter::new(file), &records)?;
    info!(path = %path.display(), messages = records.len(), "synthetic corpus written");
    Ok(())
}
