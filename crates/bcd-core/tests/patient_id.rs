use bcd_core::patient_id::{DEFAULT_PREFIX, PatientId};
use jiff::civil::date;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn matches_bc_format(id: &str) -> bool {
    let bytes = id.as_bytes();
    id.len() == 16
        && id.starts_with("BC-")
        && bytes[3..11].iter().all(u8::is_ascii_digit)
        && bytes[11] == b'-'
        && bytes[12..]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

#[test]
fn generated_ids_match_format() {
    for _ in 0..500 {
        let id = PatientId::generate(DEFAULT_PREFIX);
        assert!(matches_bc_format(id.as_str()), "bad id: {id}");
        assert!(PatientId::is_well_formed(id.as_str()));
    }
}

#[test]
fn date_part_comes_from_supplied_date() {
    let mut rng = StdRng::seed_from_u64(7);
    let id = PatientId::generate_with("BC", date(2025, 3, 9), &mut rng);
    assert!(id.as_str().starts_with("BC-20250309-"), "got {id}");
}

#[test]
fn same_seed_gives_same_id() {
    let a = PatientId::generate_with("BC", date(2024, 1, 1), &mut StdRng::seed_from_u64(42));
    let b = PatientId::generate_with("BC", date(2024, 1, 1), &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn custom_prefix_is_used() {
    let id = PatientId::generate_with("JMC", date(2024, 12, 31), &mut StdRng::seed_from_u64(1));
    assert!(id.as_str().starts_with("JMC-20241231-"));
    assert!(PatientId::is_well_formed(id.as_str()));
}

#[test]
fn unusable_prefix_falls_back_to_default() {
    let blank = PatientId::generate_with("  ", date(2024, 12, 31), &mut StdRng::seed_from_u64(1));
    let dashed = PatientId::generate_with("A-B", date(2024, 12, 31), &mut StdRng::seed_from_u64(1));
    assert!(blank.as_str().starts_with("BC-"));
    assert!(dashed.as_str().starts_with("BC-"));
}

#[test]
fn well_formed_rejects_malformed_values() {
    assert!(PatientId::is_well_formed("BC-20250101-A1B2"));
    assert!(!PatientId::is_well_formed("BC-2025011-A1B2"));
    assert!(!PatientId::is_well_formed("BC-20250101-a1b2"));
    assert!(!PatientId::is_well_formed("BC-20250101-A1B2C"));
    assert!(!PatientId::is_well_formed("-20250101-A1B2"));
    assert!(!PatientId::is_well_formed("BC-20250101-A1B2-X"));
    assert!(!PatientId::is_well_formed(""));
}
