//! Small helpers shared by the engine and the command line.

use {
    std::io::{
        prelude::*,
        stdin,
        stdout,
    },
    rand::Rng,
    uuid::{
        Builder,
        Uuid,
    },
};

/// Rounds to two decimal places.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A version 4 UUID built from the given generator, so seeded runs get reproducible ids.
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Prompts on stdout and reads one line from stdin, without the line ending.
pub fn input(msg: &str) -> String {
    print!("[ ?? ] {}: ", msg);
    stdout().flush().expect("failed to flush stdout");
    let mut result = String::new();
    stdin().read_line(&mut result).expect("failed to read input");
    while result.ends_with('\n') || result.ends_with('\r') {
        result.pop();
    }
    result
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use super::*;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_to_cents(33.333333), 33.33);
        assert_eq!(round_to_cents(66.666666), 66.67);
        assert_eq!(round_to_cents(12.0), 12.0);
    }

    #[test]
    fn uuids_are_reproducible_and_distinct() {
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(1);
        let first = random_uuid(&mut a);
        assert_eq!(first, random_uuid(&mut b));
        assert_ne!(first, random_uuid(&mut a));
        assert_eq!(first.get_version_num(), 4);
    }
}
