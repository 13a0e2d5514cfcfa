use gdal_verify::checks::Check;
use gdal_verify::suite::{Suite, Summary};
use gdal_verify::transcript::Transcript;

struct Fixed(&'static str, bool);

impl Check for Fixed {
    fn title(&self) -> &str {
        self.0
    }

    fn run(&self, out: &mut Transcript<'_>) -> anyhow::Result<bool> {
        if self.1 {
            out.pass(self.0);
        } else {
            out.fail(self.0);
        }
        Ok(self.1)
    }
}

struct Broken;

impl Check for Broken {
    fn title(&self) -> &str {
        "broken"
    }

    fn run(&self, _out: &mut Transcript<'_>) -> anyhow::Result<bool> {
        anyhow::bail!("defect in the check itself")
    }
}

struct Panics;

impl Check for Panics {
    fn title(&self) -> &str {
        "panics"
    }

    fn run(&self, _out: &mut Transcript<'_>) -> anyhow::Result<bool> {
        panic!("index out of bounds")
    }
}

fn run(suite: Suite) -> (Summary, String) {
    let mut buf = Vec::new();
    let summary = {
        let mut out = Transcript::new(&mut buf);
        let summary = suite.run(&mut out);
        summary.report(&mut out);
        summary
    };
    (summary, String::from_utf8(buf).unwrap())
}

#[test]
fn two_failures_and_an_error() {
    let (summary, text) = run(Suite::new(vec![
        Box::new(Fixed("first", true)),
        Box::new(Fixed("second", false)),
        Box::new(Broken),
        Box::new(Fixed("fourth", false)),
        Box::new(Fixed("fifth", true)),
    ]));

    assert_eq!(summary.passed(), 2);
    assert_eq!(summary.total(), 5);
    assert_eq!(summary.exit_code(), 1);
    let passed: Vec<bool> = summary.outcomes().iter().map(|o| o.passed).collect();
    assert_eq!(passed, vec![true, false, false, false, true]);

    assert!(text.contains("Test 3: broken"));
    assert!(text.contains("✗ Test failed with error: defect in the check itself"));
    assert!(text.contains("Passed: 2/5"));
    assert!(text.ends_with("✗ Some tests failed\n"));
}

#[test]
fn all_pass() {
    let checks: Vec<Box<dyn Check>> = (0..5)
        .map(|_| Box::new(Fixed("ok", true)) as Box<dyn Check>)
        .collect();
    let (summary, text) = run(Suite::new(checks));

    assert!(summary.all_passed());
    assert_eq!(summary.exit_code(), 0);
    assert!(text.contains("Passed: 5/5"));
    assert!(text.ends_with("✓ All tests passed!\n"));
}

#[test]
fn panic_is_contained() {
    let (summary, text) = run(Suite::new(vec![
        Box::new(Panics),
        Box::new(Fixed("after the panic", true)),
    ]));

    assert_eq!(summary.passed(), 1);
    assert_eq!(summary.exit_code(), 1);
    assert!(
        text.contains("✗ Test panicked: index out of bounds\n    panicked at tests/suite.rs:")
    );
    assert!(text.contains("    Stack backtrace:\n"));
    assert!(text.contains("✓ after the panic"));
}

#[test]
fn standard_suite_runs_in_order() {
    let (summary, text) = run(Suite::default());
    let titles: Vec<&str> = summary.outcomes().iter().map(|o| o.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Import GDAL bindings",
            "Check GDAL and PROJ versions",
            "Verify GDAL drivers",
            "Round-trip in-memory raster",
            "CRS operations",
        ]
    );
    // drivers depend on how GDAL was built; the other checks must pass with any build
    for outcome in summary.outcomes() {
        if outcome.title != "Verify GDAL drivers" {
            assert!(outcome.passed, "{} failed:\n{text}", outcome.title);
        }
    }
}
