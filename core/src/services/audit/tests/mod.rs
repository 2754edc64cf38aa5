mod recorder_tests;
