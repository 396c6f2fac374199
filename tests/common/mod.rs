use collatz_delay::{oracle::delay_of, Construction, StepChoice};

/// Check every structural property a finished construction must have.
pub fn assert_valid_construction(construction: &Construction, delay: usize) {
    assert_eq!(construction.len(), delay, "construction length");
    assert_eq!(
        construction.ups() + construction.downs(),
        delay,
        "ups + downs must equal delay"
    );
    assert_eq!(
        delay_of(construction.value(), construction.convention()),
        Some(delay),
        "forward map from {} should take {} steps",
        construction.value(),
        delay
    );
    assert!(construction.verify(), "forward parities must mirror choices");

    // Warm-up: the last three forward steps are 8 → 4 → 2 → 1
    let first: Vec<_> = construction.choices().take(3).collect();
    assert_eq!(first, vec![StepChoice::Increase; 3]);
}
