mod support;

use std::sync::Arc;

use probe_adapters::traits::AdapterError;
use probe_kernel::{ExitStatus, SuiteError, SuiteRunner};
use probe_primitives::{TestCase, Verdict};
use serde_json::json;

use support::{ScriptedAdapter, Step, driver, fenced, reply};

fn catalog() -> Vec<TestCase> {
    vec![
        TestCase::new("no_tools_needed", "What is the capital of France?")
            .unwrap()
            .expecting_direct_answer(),
        TestCase::new("basic_tool_call", "Calculate 2 + 2")
            .unwrap()
            .with_expected_tools(["calculate"]),
        TestCase::new("error_handling", "Read /nonexistent/file.txt")
            .unwrap()
            .with_expected_tools(["read_file"]),
    ]
}

#[tokio::test]
async fn runs_cases_in_catalog_order() {
    let adapter = Arc::new(ScriptedAdapter::new([
        reply("Paris."),
        reply(&fenced("calculate", &json!({"expression": "2 + 2"}))),
        reply("4"),
        reply(&fenced("read_file", &json!({"path": "/nonexistent/file.txt"}))),
        reply("The file does not exist."),
    ]));
    let runner = SuiteRunner::new(driver(&adapter), catalog()).unwrap();

    let report = runner.run().await;

    let names: Vec<_> = report.results().keys().map(String::as_str).collect();
    assert_eq!(names, ["no_tools_needed", "basic_tool_call", "error_handling"]);
    assert!(report.results().values().all(|r| r.verdict() == Verdict::Pass));
    assert!(!report.interrupted());
    assert_eq!(report.exit_status(), ExitStatus::AllPassed);
    assert_eq!(report.exit_status().code(), 0);
}

#[tokio::test]
async fn failures_lower_the_exit_status() {
    let adapter = Arc::new(ScriptedAdapter::new([
        reply("Paris."),
        Step::Fail(AdapterError::response("model not found")),
        reply("I cannot read files."),
    ]));
    let runner = SuiteRunner::new(driver(&adapter), catalog()).unwrap();

    let report = runner.run().await;

    let counts = report.counts();
    assert_eq!((counts.pass, counts.fail, counts.total), (1, 2, 3));
    assert_eq!(report.exit_status(), ExitStatus::MostlyFailed);
    assert_eq!(report.exit_status().code(), 2);
}

#[tokio::test]
async fn interrupt_skips_in_flight_and_remaining_cases() {
    let adapter = Arc::new(ScriptedAdapter::new([reply("Paris."), Step::Hang]));
    let hung = adapter.hung();
    let runner = SuiteRunner::new(driver(&adapter), catalog()).unwrap();

    let report = runner
        .run_until(async move { hung.notified().await })
        .await;

    let verdicts: Vec<_> = report.results().values().map(|r| r.verdict()).collect();
    assert_eq!(verdicts, [Verdict::Pass, Verdict::Skip, Verdict::Skip]);
    assert!(report.interrupted());
    assert_eq!(report.exit_status().code(), 3);
    assert_eq!(adapter.requests().len(), 2);

    let skipped = &report.results()["error_handling"];
    assert!(skipped.notes().unwrap().contains("interrupted"));
}

#[test]
fn rejects_duplicate_and_empty_catalogs() {
    let adapter = Arc::new(ScriptedAdapter::new([]));

    let mut cases = catalog();
    cases.push(TestCase::new("basic_tool_call", "again").unwrap());
    let err = SuiteRunner::new(driver(&adapter), cases).unwrap_err();
    assert_eq!(
        err,
        SuiteError::DuplicateCase {
            name: "basic_tool_call".into()
        }
    );

    let err = SuiteRunner::new(driver(&adapter), Vec::new()).unwrap_err();
    assert_eq!(err, SuiteError::EmptyCatalog);
}
