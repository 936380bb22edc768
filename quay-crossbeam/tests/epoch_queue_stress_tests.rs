use quay_core::QueueOptions;
use quay_core::common_tests::queue_stress_tests::*;
use quay_crossbeam::EpochQueue;
use rstest::rstest;
use serial_test::serial;

const DEFAULT: QueueOptions = QueueOptions::new();
const NO_BACKOFF: QueueOptions = QueueOptions::new().with_backoff(false);
const CHASE_TAIL: QueueOptions = QueueOptions::new().with_help_lagging_tail(false);

#[rstest]
#[serial(stress_tests)]
#[case::default(DEFAULT)]
#[case::no_backoff(NO_BACKOFF)]
#[case::chase_tail(CHASE_TAIL)]
fn stress_no_loss_no_duplication(#[case] options: QueueOptions) {
    test_no_loss_no_duplication(|| EpochQueue::<usize>::with_options(options));
}

#[rstest]
#[serial(stress_tests)]
#[case::default(DEFAULT)]
#[case::no_backoff(NO_BACKOFF)]
#[case::chase_tail(CHASE_TAIL)]
fn stress_per_producer_order(#[case] options: QueueOptions) {
    test_per_producer_order(|| EpochQueue::<usize>::with_options(options));
}

#[rstest]
#[serial(stress_tests)]
#[case::default(DEFAULT)]
#[case::no_backoff(NO_BACKOFF)]
#[case::chase_tail(CHASE_TAIL)]
fn stress_payload_visibility(#[case] options: QueueOptions) {
    test_payload_visibility(|| EpochQueue::<Box<[usize; 4]>>::with_options(options));
}

#[rstest]
#[serial(stress_tests)]
#[case::default(DEFAULT)]
#[case::no_backoff(NO_BACKOFF)]
#[case::chase_tail(CHASE_TAIL)]
fn stress_progress_guarantee(#[case] options: QueueOptions) {
    test_progress_guarantee(|| EpochQueue::<usize>::with_options(options));
}

#[rstest]
#[serial(stress_tests)]
#[case::default(DEFAULT)]
#[case::no_backoff(NO_BACKOFF)]
#[case::chase_tail(CHASE_TAIL)]
fn stress_contention_near_empty(#[case] options: QueueOptions) {
    test_contention_near_empty(|| EpochQueue::<usize>::with_options(options));
}
