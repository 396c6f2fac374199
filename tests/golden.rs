//! Known results for fixed parameters

use collatz_delay::{
    Convention, DelaySearcher, ResidueExceptionTable, SearchConfig, SearchError, Strategy,
};
use test_case::test_case;

mod common;
use common::assert_valid_construction;

fn run(config: SearchConfig) -> String {
    let delay = config.delay;
    let report = DelaySearcher::new(config).run().expect("search succeeds");
    assert_valid_construction(&report.construction, delay);
    report.construction.value().to_string()
}

fn greedy_with(delay: usize, table: ResidueExceptionTable) -> SearchConfig {
    SearchConfig {
        strategy: Strategy::Greedy { table },
        ..SearchConfig::greedy(delay)
    }
}

#[test_case(5, "3" ; "minimum delay")]
#[test_case(6, "6")]
#[test_case(10, "11")]
#[test_case(30, "542")]
#[test_case(50, "1063")]
#[test_case(100, "52207")]
#[test_case(200, "1138084535")]
fn greedy_default_table(delay: usize, expected: &str) {
    assert_eq!(run(SearchConfig::greedy(delay)), expected);
}

#[test_case(ResidueExceptionTable::empty(), "753012183985" ; "no table")]
#[test_case(ResidueExceptionTable::mod_27(), "117795707" ; "mod 27")]
#[test_case(ResidueExceptionTable::mod_81(), "13098491" ; "mod 81")]
#[test_case(ResidueExceptionTable::mod_243(), "4227785" ; "mod 243")]
#[test_case(ResidueExceptionTable::mod_729(), "52207" ; "mod 729")]
fn greedy_tables_at_delay_100(table: ResidueExceptionTable, expected: &str) {
    assert_eq!(run(greedy_with(100, table)), expected);
}

#[test_case(6, 1, "6")]
#[test_case(30, 3, "185")]
#[test_case(50, 4, "1063")]
#[test_case(100, 8, "2023")]
#[test_case(100, 10, "2023")]
#[test_case(200, 10, "61999")]
fn beam(delay: usize, lookahead: u32, expected: &str) {
    assert_eq!(run(SearchConfig::beam(delay, lookahead)), expected);
}

#[test_case(30, 8, "185")]
#[test_case(50, 16, "1063")]
#[test_case(100, 64, "2023")]
#[test_case(200, 256, "545193")]
fn pool(delay: usize, paths: usize, expected: &str) {
    assert_eq!(run(SearchConfig::pool(delay, paths)), expected);
}

#[test_case(SearchConfig::greedy(5), "5" ; "greedy delay 5")]
#[test_case(SearchConfig::greedy(7), "3" ; "greedy delay 7")]
#[test_case(SearchConfig::greedy(30), "86" ; "greedy delay 30")]
#[test_case(SearchConfig::beam(50, 4), "329" ; "beam delay 50")]
#[test_case(SearchConfig::beam(100, 8), "107" ; "beam delay 100")]
#[test_case(SearchConfig::pool(100, 64), "107" ; "pool delay 100")]
fn standard_convention(config: SearchConfig, expected: &str) {
    assert_eq!(run(config.with_convention(Convention::Standard)), expected);
}

#[test]
fn delay_five_trace() {
    // 3 → 5 → 8 → 4 → 2 → 1
    let report = DelaySearcher::new(SearchConfig::greedy(5)).run().unwrap();
    assert_eq!(report.construction.value().to_string(), "3");
    assert_eq!(report.ups(), 3);
    assert_eq!(report.downs(), 2);
}

#[test]
fn long_delay_exceeds_128_bits() {
    let report = DelaySearcher::new(SearchConfig::greedy(1000)).run().unwrap();
    assert_eq!(report.construction.value().bits(), 160);
    assert_valid_construction(&report.construction, 1000);
}

#[test]
fn wider_beam_beats_greedy_at_long_delay() {
    let greedy = run(SearchConfig::greedy(100));
    let beam = run(SearchConfig::beam(100, 8));
    assert!(beam.parse::<u64>().unwrap() < greedy.parse::<u64>().unwrap());
}

#[test_case(10, 20 ; "lookahead deeper than delay")]
#[test_case(10, 6 ; "no room for tail")]
#[test_case(5, 1 ; "minimum delay")]
fn rejects_deep_lookahead(delay: usize, lookahead: u32) {
    let err = DelaySearcher::new(SearchConfig::beam(delay, lookahead))
        .run()
        .unwrap_err();
    assert!(matches!(err, SearchError::LookaheadTooDeep { .. }));
}

#[test]
fn rejects_short_delay() {
    for config in [
        SearchConfig::greedy(4),
        SearchConfig::beam(3, 1),
        SearchConfig::pool(0, 8),
    ] {
        assert!(matches!(
            DelaySearcher::new(config).run(),
            Err(SearchError::DelayTooShort { .. })
        ));
    }
}
