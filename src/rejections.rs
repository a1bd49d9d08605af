use crate::domain::{Error, RejectionSink};

/// User-facing rejection channel; every failed command lands here instead
/// of aborting the session.
#[derive(Default, Debug)]
pub struct StdErrRejections {}

impl RejectionSink for StdErrRejections {
    fn report(&self, error: &Error) {
        eprintln!("Rejected - {}", error);
    }
}
