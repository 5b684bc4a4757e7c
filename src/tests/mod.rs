mod scenarios;

use crate::verify::RoundTripFailure;

pub(super) fn assert_no_failures(failures: &[RoundTripFailure], total: u64) {
    assert!(
        failures.is_empty(),
        "{total} round-trip failures, first ones: {failures:#?}"
    );
}
