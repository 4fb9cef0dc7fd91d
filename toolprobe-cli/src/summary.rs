//! Human-readable and JSON renderings of a suite report.

use std::fmt;

use probe_kernel::{SuiteReport, SuiteResults};
use probe_primitives::{TestCase, Verdict};
use serde::Serialize;
use serde_json::Value;

const RULE_WIDTH: usize = 60;

/// Overall assessment of a model's tool-call support.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Excellent,
    Good,
    Moderate,
    Poor,
}

impl Rating {
    pub fn for_report(report: &SuiteReport) -> Self {
        let counts = report.counts();
        let (passed, total) = (counts.pass, counts.total);
        if passed == total {
            Self::Excellent
        } else if passed * 100 >= total * 80 {
            Self::Good
        } else if passed * 100 >= total * 50 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Excellent => "EXCELLENT: robust tool call support",
            Self::Good => "GOOD: solid tool call support with minor issues",
            Self::Moderate => "MODERATE: partial tool call support",
            Self::Poor => "POOR: limited or broken tool call support",
        })
    }
}

fn marker(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Pass => "[PASS]   ",
        Verdict::Partial => "[PARTIAL]",
        Verdict::Fail => "[FAIL]   ",
        Verdict::Skip => "[SKIP]   ",
    }
}

/// Renders the end-of-run summary.
pub fn render(report: &SuiteReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_summary(&mut out, report);
    out
}

/// Writes the end-of-run summary to `out`.
pub fn write_summary(out: &mut impl fmt::Write, report: &SuiteReport) -> fmt::Result {
    let counts = report.counts();
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "\n{rule}\nTEST SUMMARY\n{rule}")?;
    writeln!(out, "Total Tests: {}", counts.total)?;
    writeln!(out, "Passed:      {}", counts.pass)?;
    writeln!(out, "Failed:      {}", counts.fail)?;
    writeln!(out, "Partial:     {}", counts.partial)?;
    if counts.skip > 0 {
        writeln!(out, "Skipped:     {}", counts.skip)?;
    }
    writeln!(out, "Success Rate: {:.1}%", report.pass_rate() * 100.0)?;

    writeln!(out, "\nDETAILED RESULTS:")?;
    for (name, result) in report.results() {
        writeln!(out, "\n{} {name}", marker(result.verdict()))?;
        writeln!(out, "   Duration: {:.2}s", result.duration().as_secs_f64())?;
        writeln!(out, "   Round-trips: {}", result.round_trips())?;
        writeln!(out, "   Tool Calls: {}", result.tool_calls().len())?;
        for call in result.tool_calls() {
            let status = if call.is_success() { "✓" } else { "✗" };
            write!(
                out,
                "     {status} {}({})",
                call.tool_name(),
                Value::Object(call.arguments().clone())
            )?;
            match call.error() {
                Some(error) => writeln!(out, ": {error}")?,
                None => writeln!(out)?,
            }
        }
        if let Some(notes) = result.notes() {
            writeln!(out, "   Notes: {notes}")?;
        }
    }

    writeln!(out, "\n{rule}")?;
    if report.interrupted() {
        writeln!(out, "Run interrupted; remaining cases were skipped.")
    } else {
        writeln!(out, "{}", Rating::for_report(report))
    }
}

/// Renders the catalog for `--list`.
pub fn render_catalog(cases: &[TestCase]) -> String {
    let mut out = String::new();
    let _ = write_catalog(&mut out, cases);
    out
}

fn write_catalog(out: &mut impl fmt::Write, cases: &[TestCase]) -> fmt::Result {
    for case in cases {
        let expected = if case.is_direct_answer() {
            "direct answer".to_owned()
        } else if case.expected_tools().is_empty() {
            "any tool".to_owned()
        } else {
            case.expected_tools().join(", ")
        };
        writeln!(
            out,
            "{:<24} cap {:>2}  expects {expected}",
            case.name(),
            case.max_round_trips()
        )?;
        if !case.description().is_empty() {
            writeln!(out, "{:<24} {}", "", case.description())?;
        }
    }
    Ok(())
}

/// Machine-readable report written by `--report`.
///
/// Serialized straight from the suite's ordered map so results keep run order.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    model: &'a str,
    interrupted: bool,
    exit_code: i32,
    counts: JsonCounts,
    pass_rate: f64,
    results: &'a SuiteResults,
}

#[derive(Debug, Serialize)]
struct JsonCounts {
    pass: usize,
    fail: usize,
    partial: usize,
    skip: usize,
    total: usize,
}

impl<'a> JsonReport<'a> {
    pub fn new(model: &'a str, report: &'a SuiteReport) -> Self {
        let counts = report.counts();
        Self {
            model,
            interrupted: report.interrupted(),
            exit_code: report.exit_status().code(),
            counts: JsonCounts {
                pass: counts.pass,
                fail: counts.fail,
                partial: counts.partial,
                skip: counts.skip,
                total: counts.total,
            },
            pass_rate: report.pass_rate(),
            results: report.results(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_primitives::{TestResult, ToolCallResult};
    use serde_json::Map;

    fn report(verdicts: &[Verdict]) -> SuiteReport {
        let results: SuiteResults = verdicts
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("case_{i}"), TestResult::new(format!("case_{i}"), *v)))
            .collect();
        SuiteReport::new(results, false)
    }

    #[test]
    fn rating_bands() {
        use Verdict::{Fail, Pass};
        assert_eq!(Rating::for_report(&report(&[Pass, Pass])), Rating::Excellent);
        assert_eq!(
            Rating::for_report(&report(&[Pass, Pass, Pass, Pass, Fail])),
            Rating::Good
        );
        assert_eq!(Rating::for_report(&report(&[Pass, Fail])), Rating::Moderate);
        assert_eq!(Rating::for_report(&report(&[Pass, Fail, Fail])), Rating::Poor);
    }

    #[test]
    fn summary_lists_calls_and_notes() {
        let mut args = Map::new();
        args.insert("path".into(), "x.txt".into());
        let result = TestResult::new("error_handling", Verdict::Partial)
            .with_tool_calls(vec![ToolCallResult::failed(
                "read_file",
                args,
                "missing required argument `path`",
            )])
            .with_round_trips(2)
            .with_notes("model gave up");
        let mut results = SuiteResults::new();
        results.insert("error_handling".into(), result);

        let text = render(&SuiteReport::new(results, false));
        assert!(text.contains("[PARTIAL] error_handling"));
        assert!(text.contains("✗ read_file({\"path\":\"x.txt\"})"));
        assert!(text.contains("Notes: model gave up"));
        assert!(text.contains("Success Rate: 0.0%"));
        assert!(text.contains("POOR"));
    }

    #[test]
    fn interrupted_summary_has_no_rating() {
        let results: SuiteResults = [(
            "a".to_owned(),
            TestResult::skipped("a", "interrupted before completion"),
        )]
        .into_iter()
        .collect();
        let text = render(&SuiteReport::new(results, true));
        assert!(text.contains("Skipped:     1"));
        assert!(text.contains("Run interrupted"));
        assert!(!text.contains("POOR"));
    }

    #[test]
    fn json_report_keeps_run_order_and_counts() {
        let results: SuiteResults = [
            ("sequential_tool_calls", Verdict::Pass),
            ("basic_tool_call", Verdict::Fail),
            ("no_tools_needed", Verdict::Pass),
        ]
        .into_iter()
        .map(|(name, verdict)| (name.to_owned(), TestResult::new(name, verdict)))
        .collect();
        let report = SuiteReport::new(results, false);

        let body = serde_json::to_string_pretty(&JsonReport::new("llama3", &report)).unwrap();
        let positions: Vec<_> = ["sequential_tool_calls", "basic_tool_call", "no_tools_needed"]
            .iter()
            .map(|name| body.find(&format!("\"{name}\": {{")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{body}");

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["model"], "llama3");
        assert_eq!(value["counts"]["total"], 3);
        assert_eq!(value["counts"]["pass"], 2);
        assert_eq!(value["exit_code"], 2);
        assert_eq!(value["results"]["basic_tool_call"]["verdict"], "FAIL");
    }

    #[test]
    fn catalog_lists_expectations() {
        let cases = [
            TestCase::new("no_tools_needed", "Capital of France?")
                .unwrap()
                .expecting_direct_answer(),
            TestCase::new("basic_tool_call", "Calculate 2 + 2")
                .unwrap()
                .with_expected_tools(["calculate"]),
        ];
        let text = render_catalog(&cases);
        assert!(text.contains("expects direct answer"));
        assert!(text.contains("expects calculate"));
    }
}
