//! Deterministic verdict classification.

use probe_primitives::{TestCase, ToolCallResult, Verdict};

/// Classifies a run from the expected tool names and the calls made.
///
/// | expected  | calls                     | verdict |
/// |-----------|---------------------------|---------|
/// | empty     | empty                     | FAIL    |
/// | empty     | any                       | PASS    |
/// | non-empty | missing an expected name  | PARTIAL when any call was made, else FAIL |
/// | non-empty | covers expected, a failure| PARTIAL |
/// | non-empty | covers expected, all ok   | PASS    |
///
/// "All ok" considers every call made, not only the expected ones.
#[must_use]
pub fn evaluate(expected: &[String], results: &[ToolCallResult]) -> Verdict {
    if expected.is_empty() {
        return if results.is_empty() {
            Verdict::Fail
        } else {
            Verdict::Pass
        };
    }

    let all_called = expected
        .iter()
        .all(|name| results.iter().any(|call| call.tool_name() == name));

    if !all_called {
        return if results.is_empty() {
            Verdict::Fail
        } else {
            Verdict::Partial
        };
    }

    if results.iter().all(ToolCallResult::is_success) {
        Verdict::Pass
    } else {
        Verdict::Partial
    }
}

/// Classifies a case that expects the model to answer without tools.
///
/// Zero calls is a pass; so is any number of successful calls. A failed call
/// downgrades to PARTIAL.
#[must_use]
pub fn evaluate_direct_answer(results: &[ToolCallResult]) -> Verdict {
    if results.iter().all(ToolCallResult::is_success) {
        Verdict::Pass
    } else {
        Verdict::Partial
    }
}

/// Picks the rule matching `case` and classifies `results`.
#[must_use]
pub fn evaluate_case(case: &TestCase, results: &[ToolCallResult]) -> Verdict {
    if case.is_direct_answer() {
        evaluate_direct_answer(results)
    } else {
        evaluate(case.expected_tools(), results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn ok(name: &str) -> ToolCallResult {
        ToolCallResult::succeeded(name, Map::new())
    }

    fn failed(name: &str) -> ToolCallResult {
        ToolCallResult::failed(name, Map::new(), "boom")
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn decision_table() {
        assert_eq!(evaluate(&[], &[]), Verdict::Fail);
        assert_eq!(evaluate(&[], &[ok("calculate")]), Verdict::Pass);
        assert_eq!(evaluate(&names(&["a", "b"]), &[ok("a")]), Verdict::Partial);
        assert_eq!(evaluate(&names(&["a"]), &[ok("a")]), Verdict::Pass);
        assert_eq!(evaluate(&names(&["a"]), &[failed("a")]), Verdict::Partial);
        assert_eq!(evaluate(&names(&["a"]), &[]), Verdict::Fail);
    }

    #[test]
    fn unexpected_failures_count_against_pass() {
        let results = [ok("write_file"), failed("calculate"), ok("read_file")];
        assert_eq!(
            evaluate(&names(&["write_file", "read_file"]), &results),
            Verdict::Partial
        );
    }

    #[test]
    fn call_order_and_repeats_do_not_matter() {
        let results = [ok("read_file"), ok("write_file"), ok("read_file")];
        assert_eq!(
            evaluate(&names(&["write_file", "read_file"]), &results),
            Verdict::Pass
        );
    }

    #[test]
    fn wrong_tools_only_is_partial() {
        assert_eq!(evaluate(&names(&["calculate"]), &[ok("read_file")]), Verdict::Partial);
    }

    #[test]
    fn direct_answer_rule() {
        assert_eq!(evaluate_direct_answer(&[]), Verdict::Pass);
        assert_eq!(evaluate_direct_answer(&[ok("calculate")]), Verdict::Pass);
        assert_eq!(
            evaluate_direct_answer(&[ok("calculate"), failed("read_file")]),
            Verdict::Partial
        );
    }

    #[test]
    fn case_dispatch() {
        let direct = TestCase::new("no_tools_needed", "What is the capital of France?")
            .unwrap()
            .expecting_direct_answer();
        assert_eq!(evaluate_case(&direct, &[]), Verdict::Pass);

        let plain = TestCase::new("plain", "hi").unwrap();
        assert_eq!(evaluate_case(&plain, &[]), Verdict::Fail);

        let calc = TestCase::new("calc", "Calculate 2 + 2")
            .unwrap()
            .with_expected_tools(["calculate"]);
        assert_eq!(evaluate_case(&calc, &[ok("calculate")]), Verdict::Pass);
    }
}
