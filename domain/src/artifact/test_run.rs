//! Visual Studio test result (`.trx`) documents.
//!
//! ```text
//! <TestRun>
//!   <Results>
//!     <UnitTestResult testName=".." outcome="Passed|Failed|NotExecuted|.."
//!                     startTime="2021-03-01T10:00:00.1234567-05:00"
//!                     duration="00:00:01.2500000">
//!       <Output>
//!         <StdOut>..</StdOut>
//!         <ErrorInfo><Message>..</Message><StackTrace>..</StackTrace></ErrorInfo>
//!       </Output>
//!     </UnitTestResult>
//!   </Results>
//! </TestRun>
//! ```

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;

use super::{ArtifactError, child, element_text, expect_root, parse_document};

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})(?:\.(\d+))?$").expect("valid duration pattern")
});

/// Outcome of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestOutcome {
    Passed,
    Failed,
    Inconclusive,
}

impl TestOutcome {
    /// Map a `.trx` outcome attribute; unknown values count as failures.
    pub fn from_trx(outcome: &str) -> Self {
        match outcome {
            "Passed" => TestOutcome::Passed,
            "NotExecuted" => TestOutcome::Inconclusive,
            _ => TestOutcome::Failed,
        }
    }
}

impl std::fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TestOutcome::Passed => "Passed",
            TestOutcome::Failed => "Failed",
            TestOutcome::Inconclusive => "Inconclusive",
        };
        f.write_str(s)
    }
}

/// One test result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    pub outcome: TestOutcome,
    /// "Passed", "Ignored", or the captured output / error message and stack trace
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<FixedOffset>>,
    pub duration: Duration,
}

/// Test records in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedTestRun {
    pub records: Vec<TestRecord>,
}

impl ParsedTestRun {
    /// True when any record failed.
    pub fn has_failures(&self) -> bool {
        self.records.iter().any(|r| r.outcome == TestOutcome::Failed)
    }

    pub fn count(&self, outcome: TestOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn total_duration(&self) -> Duration {
        self.records
            .iter()
            .fold(Duration::ZERO, |total, r| total.saturating_add(r.duration))
    }

    pub fn failed(&self) -> impl Iterator<Item = &TestRecord> {
        self.records
            .iter()
            .filter(|r| r.outcome == TestOutcome::Failed)
    }
}

/// Parse an `hh:mm:ss[.fraction]` duration; anything else is zero.
pub fn parse_duration(text: &str) -> Duration {
    let Some(caps) = DURATION_PATTERN.captures(text.trim()) else {
        return Duration::ZERO;
    };

    let field = |i: usize| -> Option<u64> { caps.get(i)?.as_str().parse().ok() };
    let seconds = field(1)
        .and_then(|h| h.checked_mul(3600))
        .and_then(|s| s.checked_add(field(2)? * 60))
        .and_then(|s| s.checked_add(field(3)?));
    let Some(seconds) = seconds else {
        return Duration::ZERO;
    };

    let nanos = caps
        .get(4)
        .map(|m| {
            let digits: String = m.as_str().chars().take(9).collect();
            format!("{:0<9}", digits).parse::<u32>().unwrap_or(0)
        })
        .unwrap_or(0);

    Duration::new(seconds, nanos)
}

/// Parse a `.trx` document.
pub fn parse_test_run(xml: &str) -> Result<ParsedTestRun, ArtifactError> {
    let doc = parse_document(xml)?;
    let root = expect_root(&doc, "TestRun")?;

    let Some(results) = child(root, "Results") else {
        return Ok(ParsedTestRun::default());
    };

    let records = results
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "UnitTestResult")
        .map(parse_record)
        .collect();

    Ok(ParsedTestRun { records })
}

fn parse_record(node: roxmltree::Node<'_, '_>) -> TestRecord {
    let name = node.attribute("testName").unwrap_or_default().to_string();
    let raw_outcome = node.attribute("outcome").unwrap_or_default();
    let outcome = TestOutcome::from_trx(raw_outcome);
    let output = child(node, "Output");

    let text = match outcome {
        TestOutcome::Passed => "Passed".to_string(),
        TestOutcome::Inconclusive => match output {
            None => "Ignored".to_string(),
            Some(output) => error_text(output)
                .or_else(|| child(output, "StdOut").and_then(element_text))
                .unwrap_or_else(|| raw_outcome.to_string()),
        },
        TestOutcome::Failed => output
            .and_then(error_text)
            .unwrap_or_else(|| raw_outcome.to_string()),
    };

    TestRecord {
        name,
        outcome,
        text,
        start_time: node
            .attribute("startTime")
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok()),
        duration: node.attribute("duration").map(parse_duration).unwrap_or_default(),
    }
}

/// `Message` and `StackTrace` of an `Output/ErrorInfo` element, joined by a newline.
fn error_text(output: roxmltree::Node<'_, '_>) -> Option<String> {
    let info = child(output, "ErrorInfo")?;
    let parts: Vec<String> = ["Message", "StackTrace"]
        .into_iter()
        .filter_map(|name| child(info, name).and_then(element_text))
        .collect();
    (!parts.is_empty()).then(|| parts.join("\n"))
}
