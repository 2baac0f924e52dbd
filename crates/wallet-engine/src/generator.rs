#![forbid(unsafe_code)]

//! Deterministic card generator.
//!
//! Records are a pure function of `(seed, id)`: the generator reseeds its
//! PRNG per card, so `card(7)` is the same whether or not cards 1..=6 were
//! generated first.

use crate::card::{CardId, CardKind, CardRecord, IssueDate};

const FIRST_NAMES: [&str; 8] = [
    "Alex", "Nina", "Louis", "Camille", "Sara", "Adam", "Léa", "Ilan",
];
const LAST_NAMES: [&str; 8] = [
    "Martin", "Durand", "Bernard", "Petit", "Roux", "Lefèvre", "Moreau", "Fournier",
];
const CITIES: [&str; 6] = ["Paris", "Lyon", "Marseille", "Nantes", "Bordeaux", "Lille"];
const AIRPORTS: [&str; 7] = ["CDG", "ORY", "LYS", "NTE", "MRS", "BCN", "FCO"];
const LOYALTY_BRANDS: [&str; 5] = [
    "Café Nova",
    "Bookstore+",
    "Cinema Club",
    "Green Coffee",
    "Music House",
];
const METRO_LINES: [&str; 4] = ["A", "B", "C", "D"];

// ---------------------------------------------------------------------------
// PRNG
// ---------------------------------------------------------------------------

/// xorshift64 with a non-zero state.
#[derive(Debug, Clone)]
pub(crate) struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    pub(crate) fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift.
        Self {
            state: seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1,
        }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in `0..bound`; `bound` must be non-zero.
    pub(crate) fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    /// Uniform in `[lo, hi)`.
    pub(crate) fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        lo + (hi - lo) * unit
    }

    pub(crate) fn pick<'a>(&mut self, pool: &[&'a str]) -> &'a str {
        pool[self.below(pool.len())]
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Produces card records from integer ids.
#[derive(Debug, Clone, Copy)]
pub struct CardGenerator {
    seed: u64,
}

impl CardGenerator {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generate the record for `id`. The kind is fixed by `id % 4`.
    #[must_use]
    pub fn card(&self, id: u32) -> CardRecord {
        let mut rng = Xorshift64::new(self.seed ^ ((u64::from(id) << 32) | u64::from(id)));
        let holder = format!("{} {}", rng.pick(&FIRST_NAMES), rng.pick(&LAST_NAMES));
        let issued = IssueDate {
            day: 1 + rng.below(28) as u8,
            month: 1 + rng.below(12) as u8,
        };

        let (title, subtitle, kind) = match id % 4 {
            0 => (
                "IDF Mobilités".to_string(),
                "Pass Navigo".to_string(),
                CardKind::Transit {
                    zone: "Zones 1-5".to_string(),
                    line: format!("Ligne {}", METRO_LINES[(id % 4) as usize]),
                },
            ),
            1 => (
                "SNCF TGV Inoui".to_string(),
                format!("{} → {}", rng.pick(&CITIES), rng.pick(&CITIES)),
                CardKind::Rail {
                    seat: format!("Voiture {}, Place {}", 1 + id % 12, 10 + rng.below(71)),
                },
            ),
            2 => {
                let (carrier, code) = if id % 2 == 0 {
                    ("Air France", "AF")
                } else {
                    ("Vueling", "VY")
                };
                (
                    carrier.to_string(),
                    format!("{} → {}", rng.pick(&AIRPORTS), rng.pick(&AIRPORTS)),
                    CardKind::Flight {
                        flight: format!("{code}{}", 1000 + id),
                    },
                )
            }
            _ => (
                rng.pick(&LOYALTY_BRANDS).to_string(),
                "Carte Gold".to_string(),
                CardKind::Loyalty {
                    points: 1000 + id.saturating_mul(7),
                },
            ),
        };

        CardRecord {
            id: CardId(id),
            holder,
            title,
            subtitle,
            issued,
            kind,
        }
    }

    /// Records for ids `1..=count`.
    #[must_use]
    pub fn cards(&self, count: u32) -> Vec<CardRecord> {
        (1..=count).map(|id| self.card(id)).collect()
    }
}
