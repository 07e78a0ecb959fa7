
// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: configuration, dispatch and embed composition
// - feed_server: the feed actor against a local HTTP server
// - selection_flow: the date prompt driven by a mock messenger
