// End-to-end tests for the reader core
//
// Providers, audio hardware and the remote credential store are replaced by
// fakes (helpers/) or by wiremock servers; everything between them is the
// real crate wiring: orchestrator, preload coordinator, reader controller,
// vocabulary service and the blob-backed library.

mod test_alignment;
mod test_credentials;
mod test_preload;
mod test_providers;
mod test_vocabulary;
