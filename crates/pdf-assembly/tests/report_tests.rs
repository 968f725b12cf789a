use pdf_assembly::sources::{Printout, ReportCommand, ReportDatabase};
use pdf_assembly::{AssemblyError, Command};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// In-memory stand-in for the report database
#[derive(Debug, Default)]
struct FakeDatabase {
    /// report -> (record source, order by)
    settings: HashMap<String, (String, String)>,
    /// (report, record source, order by, output) per export
    exports: Vec<(String, String, String, PathBuf)>,
    opened: Option<PathBuf>,
    closed: bool,
    fail_on_export: Option<String>,
}

impl FakeDatabase {
    fn with_reports(reports: &[(&str, &str, &str)]) -> Self {
        Self {
            settings: reports
                .iter()
                .map(|(name, query, order)| {
                    (name.to_string(), (query.to_string(), order.to_string()))
                })
                .collect(),
            ..Default::default()
        }
    }

    fn settings_mut(&mut self, report: &str) -> Result<&mut (String, String), String> {
        self.settings
            .get_mut(report)
            .ok_or_else(|| format!("no report named '{}'", report))
    }
}

impl ReportDatabase for FakeDatabase {
    fn open(&mut self, path: &Path) -> Result<(), String> {
        self.opened = Some(path.to_path_buf());
        Ok(())
    }

    fn record_source(&mut self, report: &str) -> Result<String, String> {
        Ok(self.settings_mut(report)?.0.clone())
    }

    fn set_record_source(&mut self, report: &str, query: &str) -> Result<(), String> {
        self.settings_mut(report)?.0 = query.to_string();
        Ok(())
    }

    fn order_by(&mut self, report: &str) -> Result<String, String> {
        Ok(self.settings_mut(report)?.1.clone())
    }

    fn set_order_by(&mut self, report: &str, order_by: &str) -> Result<(), String> {
        self.settings_mut(report)?.1 = order_by.to_string();
        Ok(())
    }

    fn export_pdf(&mut self, report: &str, output: &Path) -> Result<(), String> {
        if self.fail_on_export.as_deref() == Some(report) {
            return Err("printer offline".to_string());
        }
        let (query, order_by) = self.settings_mut(report)?.clone();
        std::fs::write(output, format!("{}|{}", query, order_by)).map_err(|e| e.to_string())?;
        self.exports
            .push((report.to_string(), query, order_by, output.to_path_buf()));
        Ok(())
    }

    fn close(&mut self) -> Result<(), String> {
        self.closed = true;
        Ok(())
    }
}

fn printout(report: &str, query: &str, order_by: &str, output: Option<PathBuf>) -> Printout {
    Printout {
        report: report.to_string(),
        query: query.to_string(),
        order_by: order_by.to_string(),
        output,
    }
}

#[test]
fn test_printouts_export_in_order_and_restore_state() {
    let dir = TempDir::new().unwrap();
    let db = FakeDatabase::with_reports(&[
        ("members", "SELECT * FROM members", "name"),
        ("groups", "SELECT * FROM groups", "id"),
    ]);
    let first = dir.path().join("first.pdf");
    let second = dir.path().join("second.pdf");
    let third = dir.path().join("third.pdf");

    let mut cmd = ReportCommand::new(
        db,
        "church.accdb",
        vec![
            printout("members", "q_group_1", "age", Some(first.clone())),
            printout("members", "q_group_2", "name DESC", Some(second.clone())),
            printout("groups", "q_active", "title", Some(third.clone())),
        ],
    );
    cmd.execute().unwrap();

    let db = cmd.database();
    assert_eq!(db.opened.as_deref(), Some(Path::new("church.accdb")));
    assert!(db.closed);

    let exported: Vec<_> = db
        .exports
        .iter()
        .map(|(report, query, order, _)| (report.as_str(), query.as_str(), order.as_str()))
        .collect();
    assert_eq!(
        exported,
        vec![
            ("members", "q_group_1", "age"),
            ("members", "q_group_2", "name DESC"),
            ("groups", "q_active", "title"),
        ]
    );
    assert_eq!(std::fs::read_to_string(&second).unwrap(), "q_group_2|name DESC");

    assert_eq!(
        db.settings["members"],
        ("SELECT * FROM members".to_string(), "name".to_string())
    );
    assert_eq!(
        db.settings["groups"],
        ("SELECT * FROM groups".to_string(), "id".to_string())
    );

    drop(cmd);
    assert!(first.exists() && second.exists() && third.exists());
}

#[test]
fn test_failed_export_still_restores_and_closes() {
    let dir = TempDir::new().unwrap();
    let mut db = FakeDatabase::with_reports(&[
        ("members", "base", "name"),
        ("groups", "groups", "id"),
    ]);
    db.fail_on_export = Some("groups".to_string());
    let failing = dir.path().join("groups.pdf");

    let mut cmd = ReportCommand::new(
        db,
        "church.accdb",
        vec![
            printout("members", "q1", "age", Some(dir.path().join("members.pdf"))),
            printout("groups", "q2", "title", Some(failing.clone())),
        ],
    );

    match cmd.execute().unwrap_err() {
        AssemblyError::External { stage, target, message } => {
            assert_eq!(stage, "report");
            assert_eq!(target, failing);
            assert_eq!(message, "printer offline");
        }
        other => panic!("unexpected error: {other}"),
    }

    let db = cmd.database();
    assert!(db.closed);
    assert_eq!(db.settings["members"], ("base".to_string(), "name".to_string()));
    assert_eq!(db.settings["groups"], ("groups".to_string(), "id".to_string()));
}

#[test]
fn test_stale_output_is_removed_before_export() {
    let dir = TempDir::new().unwrap();
    let mut db = FakeDatabase::with_reports(&[("members", "base", "name")]);
    db.fail_on_export = Some("members".to_string());
    let output = dir.path().join("members.pdf");
    std::fs::write(&output, b"stale").unwrap();

    let mut cmd = ReportCommand::new(
        db,
        "church.accdb",
        vec![printout("members", "q1", "age", Some(output.clone()))],
    );
    assert!(cmd.execute().is_err());
    assert!(!output.exists());
}

#[test]
fn test_unnamed_printouts_are_temporary() {
    let db = FakeDatabase::with_reports(&[("members", "base", "name")]);
    let mut cmd = ReportCommand::new(
        db,
        "church.accdb",
        vec![
            printout("members", "q1", "age", None),
            printout("members", "q2", "age", None),
        ],
    );
    cmd.execute().unwrap();

    let paths: Vec<PathBuf> = cmd
        .outputs()
        .paths()
        .into_iter()
        .map(Path::to_path_buf)
        .collect();
    assert_eq!(paths.len(), 2);
    assert_ne!(paths[0], paths[1]);
    assert_eq!(std::fs::read_to_string(&paths[1]).unwrap(), "q2|age");

    drop(cmd);
    assert!(paths.iter().all(|path| !path.exists()));
}

#[test]
fn test_unknown_report_is_an_external_error() {
    let db = FakeDatabase::with_reports(&[]);
    let mut cmd = ReportCommand::new(
        db,
        "church.accdb",
        vec![printout("missing", "q1", "age", None)],
    );

    match cmd.execute().unwrap_err() {
        AssemblyError::External { stage, target, .. } => {
            assert_eq!(stage, "report");
            assert_eq!(target, PathBuf::from("church.accdb"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(cmd.database().closed);
}
