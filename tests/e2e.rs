// End-to-end tests for hirestats
//
// Extracts on disk -> ReportSession -> report files on disk

use hirestats::{ReportSession, RuntimeConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DEPARTMENTS: &str = "1,Engineering\n2,Sales\n3,Legal\n";
const JOBS: &str = "1,Dev\n2,Manager\n";
const HIRES: &str = "\
1,A,2021-01-15T00:00:00Z,1,1
2,B,2021-04-20T00:00:00Z,1,1
3,C,2021-02-10T00:00:00Z,2,1
4,D,2021-11-02T13:45:10.250Z,1,2
5,E,2020-06-01T00:00:00Z,3,2
6,F,2021-08-30T08:00:00Z,7,2
";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(hires: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("departments.csv"), DEPARTMENTS).unwrap();
        fs::write(dir.path().join("jobs.csv"), JOBS).unwrap();
        fs::write(dir.path().join("hired_employees.csv"), hires).unwrap();
        Self { dir }
    }

    fn out(&self) -> std::path::PathBuf {
        self.dir.path().join("out")
    }

    fn config(&self) -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.input.departments = self.dir.path().join("departments.csv");
        config.input.jobs = self.dir.path().join("jobs.csv");
        config.input.hired_employees = self.dir.path().join("hired_employees.csv");
        config.output.dir = self.out();
        config
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

#[test]
fn test_full_run_writes_both_reports() {
    let workspace = Workspace::new(HIRES);
    let config = workspace.config();

    let summary = ReportSession::start(config).unwrap().run().unwrap();
    assert_eq!(summary.reports.hires_in_year, 5);

    // department 7 is unknown: counted under an empty department, sorted first
    assert_eq!(
        read(&workspace.out().join("hired_by_quarter.csv")),
        "department,job,1,2,3,4\n\
         ,Manager,0,0,1,0\n\
         Engineering,Dev,1,1,0,0\n\
         Engineering,Manager,0,0,0,1\n\
         Sales,Dev,1,0,0,0\n"
    );

    // counts {1:3, 2:1, 7:1}, mean 5/3
    assert_eq!(
        read(&workspace.out().join("departments_above_mean.csv")),
        "id,department,hired\n1,Engineering,3\n"
    );

    assert_eq!(summary.written.quarterly.row_count, 4);
    assert_eq!(summary.written.above_average.row_count, 1);
}

#[test]
fn test_rerun_produces_identical_files() {
    let workspace = Workspace::new(HIRES);

    ReportSession::start(workspace.config()).unwrap().run().unwrap();
    let first = read(&workspace.out().join("hired_by_quarter.csv"));

    ReportSession::start(workspace.config()).unwrap().run().unwrap();
    let second = read(&workspace.out().join("hired_by_quarter.csv"));

    assert_eq!(first, second);
}

#[test]
fn test_unparseable_timestamp_leaves_no_outputs() {
    let workspace = Workspace::new("1,A,2021-01-15T00:00:00,1,1\n2,B,not-a-date,1,1\n");

    let session = ReportSession::start(workspace.config()).unwrap();
    let err = session.run().unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("employee 2"), "{message}");

    assert_eq!(fs::read_dir(workspace.out()).unwrap().count(), 0);
}

#[test]
fn test_schema_violation_leaves_no_outputs() {
    let workspace = Workspace::new("1,A,2021-01-15T00:00:00,1,1\nX,B,2021-01-15T00:00:00,1,1\n");

    let err = ReportSession::start(workspace.config())
        .unwrap()
        .run()
        .unwrap_err();
    assert!(format!("{:#}", err).contains("hired_employees"));

    assert_eq!(fs::read_dir(workspace.out()).unwrap().count(), 0);
}

#[test]
fn test_other_year_and_exclude_policy() {
    let workspace = Workspace::new("1,A,,1,1\n2,B,2020-06-01T00:00:00,3,2\n");

    let mut config = workspace.config();
    config.run.target_year = 2020;
    assert!(ReportSession::start(config.clone()).unwrap().run().is_err());

    config.temporal.missing = "exclude".parse().unwrap();
    let summary = ReportSession::start(config).unwrap().run().unwrap();
    assert_eq!(summary.reports.hires_in_year, 1);

    // a single department can never be above its own mean
    assert_eq!(
        read(&workspace.out().join("departments_above_mean.csv")),
        "id,department,hired\n"
    );
    assert_eq!(
        read(&workspace.out().join("hired_by_quarter.csv")),
        "department,job,1,2,3,4\nLegal,Manager,0,1,0,0\n"
    );
}
