// rv_trapio/src/test/mod.rs

//! # On-Target Self-Tests
//!
//! Suites that run on the real hart during boot (feature `selftest`), after
//! the dispatcher is installed and before interrupts are enabled.


use crate::{error_print, info_print, println, warn_print};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestResult {
    Pass,
    Fail,
    Skip,
}

pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
    pub description: &'static str,
}

/// Counts and reports suite results.
pub struct TestRunner {
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
}

impl TestRunner {
    pub fn new() -> Self {
        Self {
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
        }
    }

    pub fn run_test(&mut self, test: &TestCase) {
        self.total += 1;
        println!("Running test: {} - {}", test.name, test.description);

        match (test.func)() {
            TestResult::Pass => {
                self.passed += 1;
                info_print!("  [PASS] {}", test.name);
            }
            TestResult::Fail => {
                self.failed += 1;
                error_print!("  [FAIL] {}", test.name);
            }
            TestResult::Skip => {
                self.skipped += 1;
                warn_print!("  [SKIP] {}", test.name);
            }
        }
    }

    pub fn run_suite(&mut self, suite_name: &str, tests: &[TestCase]) {
        println!("=== {} Test Suite ===", suite_name);
        for test in tests {
            self.run_test(test);
        }
        println!("=== {} Test Suite Complete ===", suite_name);
    }

    pub fn print_summary(&self) {
        println!("=== Test Summary ===");
        println!("Total tests: {}", self.total);
        info_print!("Passed: {}", self.passed);
        if self.failed > 0 {
            error_print!("Failed: {}", self.failed);
        }
        if self.skipped > 0 {
            warn_print!("Skipped: {}", self.skipped);
        }
        println!("==================");
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.total > 0
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a condition inside a test function, failing it on `false`.
macro_rules! check {
    ($cond:expr) => {
        if !$cond {
            $crate::error_print!("    check failed: {}", stringify!($cond));
            return $crate::test::TestResult::Fail;
        }
    };
}
pub(crate) use check;

pub fn run_all_tests() {
    let mut runner = TestRunner::new();

    cause_test::run_cause_tests(&mut runner);
    plic_test::run_plic_tests(&mut runner);

    runner.print_summary();
    if runner.all_passed() {
        info_print!("All self-test suites passed");
    } else {
        warn_print!("Some self-tests failed or were skipped");
    }
}
