
mod batch_tests;
mod orchestrator_tests;
