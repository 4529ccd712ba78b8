use log::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use xstream::{Error, Segment, segment_stream};

/// Segments loaded from an input file.
#[derive(Debug, Default)]
pub struct Trace {
    pub segments: Vec<Segment>,
    /// First unparsable line (1-based) and why; segments after it are not loaded.
    pub malformed: Option<(usize, Error)>,
}

impl Trace {
    /// Parses segment lines. Blank lines and lines starting with `#` are skipped.
    pub fn parse(text: &str) -> Self {
        let mut trace = Trace::default();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            match Segment::parse_line(line) {
                Ok(segment) => trace.segments.push(segment),
                Err(e) => {
                    warn!("Trace line {}: {}", i + 1, e);
                    trace.malformed = Some((i + 1, e));
                    break;
                }
            }
        }
        trace
    }

    /// Cuts raw bytes into in-order segments.
    pub fn split(data: &[u8], max_segment_size: usize) -> Self {
        Trace {
            segments: segment_stream(data, max_segment_size),
            malformed: None,
        }
    }

    /// Reorders and optionally duplicates segments, reproducibly for a seed.
    pub fn scramble(&mut self, seed: Option<u64>, duplicate: bool) {
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None if duplicate => SmallRng::seed_from_u64(0),
            None => return,
        };

        if duplicate {
            let copies: Vec<Segment> = self
                .segments
                .iter()
                .filter(|_| rng.gen_bool(0.25))
                .cloned()
                .collect();
            debug!("Duplicating {} segments", copies.len());
            self.segments.extend(copies);
        }
        if seed.is_some() {
            self.segments.shuffle(&mut rng);
        }
    }

    /// Total payload bytes across all segments, duplicates included.
    pub fn payload_bytes(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}
