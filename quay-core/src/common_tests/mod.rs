//! Generic test bodies shared by the integration tests of every guard.
