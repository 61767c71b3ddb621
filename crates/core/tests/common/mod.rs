#![allow(dead_code)]

use zonetext_core::Token;

/// Deterministic generator so synthetic pages are reproducible.
#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    pub fn gen_f64(&mut self, min: f64, max: f64) -> f64 {
        let n = self.next_u64() as f64 / u64::MAX as f64;
        min + (max - min) * n
    }

    pub fn gen_index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

const SYLLABLES: &[&str] = &["นา", "ย", "สม", "ชาย", "ใจ", "ดี", "ab", "cd", "12", "น.ส."];

/// A page of jittered text rows, tokens emitted in shuffled order.
pub fn synthetic_tokens(seed: u64, rows: usize, per_row: usize) -> Vec<Token> {
    let mut rng = XorShift64::new(seed);
    let mut tokens = Vec::with_capacity(rows * per_row);
    for row in 0..rows {
        let base_y = 40.0 + row as f64 * 45.0;
        let mut x = 30.0 + rng.gen_f64(0.0, 10.0);
        for _ in 0..per_row {
            let w = rng.gen_f64(15.0, 70.0);
            let h = rng.gen_f64(16.0, 24.0);
            let y = base_y + rng.gen_f64(-3.0, 3.0);
            let text = SYLLABLES[rng.gen_index(SYLLABLES.len())];
            tokens.push(Token::new(text, x, y, w, h));
            x += w + rng.gen_f64(2.0, 120.0);
        }
    }
    for i in (1..tokens.len()).rev() {
        let j = rng.gen_index(i + 1);
        tokens.swap(i, j);
    }
    tokens
}

pub fn tok(text: &str, x: f64, y: f64, w: f64, h: f64) -> Token {
    Token::new(text, x, y, w, h)
}
