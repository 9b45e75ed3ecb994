//! Synthetic test data
//!
//! Fields with a bespoke generator (PAN, amount, PIN block) use it; other
//! numeric fields get a zero-padded digit string of their full width. Fields
//! of any other class are left alone.

use rand_core::RngCore;
use tracing::debug;

use super::{FieldSelection, Registry, TypeClass};

const PAN_DIGITS: usize = 16;
const PIN_BLOCK_DIGITS: usize = 16;
const MAX_AMOUNT: u64 = 999_999_999_999;

/// Replace the value of each targeted field with generated data.
///
/// Inclusion flags are not touched, nor are fields outside `fields`. Unknown
/// field numbers and unsupported classes are skipped. Returns how many fields
/// received a new value.
pub fn randomize<R, I>(
    selection: &mut FieldSelection,
    registry: &Registry,
    fields: I,
    rng: &mut R,
) -> usize
where
    R: RngCore + ?Sized,
    I: IntoIterator<Item = u8>,
{
    let mut changed = 0;
    for number in fields {
        let Ok(field) = registry.lookup(number) else {
            continue;
        };
        if field.is_reserved() {
            continue;
        }

        let value = match (number, field.type_class()) {
            (2, _) => digits(rng, PAN_DIGITS),
            (4, _) => amount(rng),
            (52, _) => digits(rng, PIN_BLOCK_DIGITS),
            (_, TypeClass::Numeric) => digits(rng, field.max_length()),
            _ => continue,
        };

        match selection.value_mut(number) {
            Some(slot) => *slot = value,
            None => {
                if selection.set_value(number, value).is_err() {
                    continue;
                }
            }
        }
        changed += 1;
    }

    debug!(changed, "randomised fields");
    changed
}

fn digits<R: RngCore + ?Sized>(rng: &mut R, count: usize) -> String {
    (0..count)
        .map(|_| char::from(b'0' + (rng.next_u32() % 10) as u8))
        .collect()
}

fn amount<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let value = 1 + rng.next_u64() % MAX_AMOUNT;
    format!("{value:012}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::validate;
    use time::macros::datetime;

    /// Deterministic generator for repeatable tests
    struct Lcg(u64);

    impl RngCore for Lcg {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            const A: u64 = 6364136223846793005;
            const C: u64 = 1442695040888963407;
            self.0 = self.0.wrapping_mul(A).wrapping_add(C);
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            rand_core::impls::fill_bytes_via_next(self, dest);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn registry() -> Registry {
        Registry::at(datetime!(2025-06-14 09:05:07 UTC))
    }

    #[test]
    fn test_generators_respect_width_and_class() {
        let registry = registry();
        let mut selection = FieldSelection::seeded(&registry);
        let mut rng = Lcg(7);

        let changed = randomize(&mut selection, &registry, [2, 4, 11, 32, 52], &mut rng);
        assert_eq!(changed, 5);

        assert_eq!(selection.value(2).unwrap().len(), 16);
        assert_eq!(selection.value(4).unwrap().len(), 12);
        assert_ne!(selection.value(4), Some("000000000000"));
        assert_eq!(selection.value(11).unwrap().len(), 6);
        assert_eq!(selection.value(32).unwrap().len(), 11);
        assert_eq!(selection.value(52).unwrap().len(), 16);
        for number in [2, 4, 11, 32, 52] {
            assert!(selection.value(number).unwrap().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_only_targeted_fields_change() {
        let registry = registry();
        let original = FieldSelection::seeded(&registry);
        let mut selection = original.clone();

        randomize(&mut selection, &registry, [3], &mut Lcg(1));

        for (number, entry) in original.iter() {
            if number == 3 {
                continue;
            }
            assert_eq!(selection.get(number), Some(entry));
        }
        assert_eq!(selection.is_included(3), original.is_included(3));
    }

    #[test]
    fn test_unsupported_classes_and_numbers_are_skipped() {
        let registry = registry();
        let original = FieldSelection::seeded(&registry);
        let mut selection = original.clone();

        // track data, alphanumeric, binary MAC, reserved, unknown
        let changed = randomize(&mut selection, &registry, [35, 41, 64, 1, 0, 99], &mut Lcg(3));
        assert_eq!(changed, 0);
        assert_eq!(selection, original);
    }

    #[test]
    fn test_randomised_selection_validates() {
        let registry = registry();
        let mut selection = FieldSelection::seeded(&registry);
        for number in 8..=27 {
            selection.include(number, &registry).unwrap();
        }
        let targets: Vec<u8> = selection.included_numbers().collect();

        randomize(&mut selection, &registry, targets, &mut Lcg(42));
        assert!(validate(&selection, &registry).is_valid());
    }

    #[test]
    fn test_same_seed_same_values() {
        let registry = registry();
        let mut first = FieldSelection::new();
        let mut second = FieldSelection::new();

        randomize(&mut first, &registry, [2, 4, 11], &mut Lcg(9));
        randomize(&mut second, &registry, [2, 4, 11], &mut Lcg(9));
        assert_eq!(first, second);
        assert!(!first.is_included(2));
    }
}
